/// Error taxonomy and user-visible notices
///
/// Every failure is caught where it happens and turned into a [`Notice`];
/// nothing here is allowed to unwind through the swipe state machine.

use thiserror::Error;

/// Failures while locating the user or fetching candidates.
///
/// Payloads are strings so the error can travel inside an iced `Message`,
/// which must be `Clone`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Location access denied")]
    PermissionDenied,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Places API error: {0}")]
    Api(String),

    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Failures of the saved restaurants database
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create data directory: {0}")]
    CreateDir(std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Nothing went wrong, but the user should know (e.g. no results)
    Info,
    Error,
}

/// A message shown to the user in place of an alert dialog
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    pub fn no_results() -> Self {
        Self::info("No Results", "No restaurants found in your area.")
    }

    /// Storage failure while performing `action` (e.g. "save the restaurant")
    pub fn storage(action: &str, err: &StoreError) -> Self {
        Self::error(
            "Error",
            format!("Failed to {action}. Please try again. ({err})"),
        )
    }
}

impl From<&FetchError> for Notice {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::PermissionDenied => Notice::error(
                "Permission Denied",
                "Please allow location access to use this feature.",
            ),
            FetchError::Timeout | FetchError::Network(_) | FetchError::Api(_) => Notice::error(
                "Error",
                format!("Failed to fetch restaurants. Please try again later. ({err})"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_notice() {
        let notice = Notice::from(&FetchError::PermissionDenied);
        assert!(notice.is_error());
        assert_eq!(notice.title, "Permission Denied");
    }

    #[test]
    fn test_network_notice_mentions_retry() {
        let notice = Notice::from(&FetchError::Network("connection reset".into()));
        assert!(notice.is_error());
        assert!(notice.message.contains("try again"));
        assert!(notice.message.contains("connection reset"));
    }

    #[test]
    fn test_no_results_is_informational() {
        assert!(!Notice::no_results().is_error());
    }
}
