/// Candidate lookup
///
/// Where candidates come from is hidden behind [`CandidateSource`]; the app
/// uses the Google Places nearby search (google.rs). The user's position comes
/// from a [`LocationProvider`].

pub mod google;

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::FetchError;
use crate::state::data::{Coordinate, Restaurant};

pub use google::GooglePlaces;

/// Anything that can list restaurants around a coordinate.
///
/// An empty list is a valid answer, not an error.
pub trait CandidateSource: Send + Sync {
    fn nearby(
        &self,
        at: Coordinate,
    ) -> impl Future<Output = Result<Vec<Restaurant>, FetchError>> + Send;
}

/// Where the user is
pub trait LocationProvider: Send + Sync {
    /// [`FetchError::PermissionDenied`] when the position is not available to us
    fn current(&self) -> Result<Coordinate, FetchError>;
}

/// A position fixed by configuration. Desktops have no GPS, so this is the
/// only provider; no configured position behaves like a denied permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinate>);

impl LocationProvider for FixedLocation {
    fn current(&self) -> Result<Coordinate, FetchError> {
        self.0.ok_or(FetchError::PermissionDenied)
    }
}

/// Locate the user, then ask `source` for candidates around them.
pub async fn discover<L, S>(
    location: &L,
    source: &S,
    timeout: Duration,
) -> Result<Vec<Restaurant>, FetchError>
where
    L: LocationProvider,
    S: CandidateSource,
{
    let at = location.current().inspect_err(|_| {
        warn!("No location available, skipping fetch");
    })?;

    let candidates = tokio::time::timeout(timeout, source.nearby(at))
        .await
        .map_err(|_| FetchError::Timeout)??;

    info!(
        "Found {} restaurants near {}",
        candidates.len(),
        at.to_query()
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource(Result<Vec<Restaurant>, FetchError>);

    impl CandidateSource for FakeSource {
        async fn nearby(&self, _at: Coordinate) -> Result<Vec<Restaurant>, FetchError> {
            self.0.clone()
        }
    }

    struct SlowSource;

    impl CandidateSource for SlowSource {
        async fn nearby(&self, _at: Coordinate) -> Result<Vec<Restaurant>, FetchError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    const HERE: FixedLocation = FixedLocation(Some(Coordinate {
        latitude: 40.0,
        longitude: -86.9,
    }));

    #[tokio::test]
    async fn test_discover_returns_candidates() {
        let source = FakeSource(Ok(vec![Restaurant::new("a", "A", "", "")]));
        let found = discover(&HERE, &source, Duration::from_secs(1)).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_discover_without_location_is_permission_denied() {
        let source = FakeSource(Ok(vec![Restaurant::new("a", "A", "", "")]));
        let result = discover(&FixedLocation(None), &source, Duration::from_secs(1)).await;
        assert_eq!(result, Err(FetchError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_discover_passes_source_errors_through() {
        let source = FakeSource(Err(FetchError::Network("offline".into())));
        let result = discover(&HERE, &source, Duration::from_secs(1)).await;
        assert_eq!(result, Err(FetchError::Network("offline".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_discover_times_out() {
        let result = discover(&HERE, &SlowSource, Duration::from_secs(5)).await;
        assert_eq!(result, Err(FetchError::Timeout));
    }
}
