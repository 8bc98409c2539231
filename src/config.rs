use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::state::data::Coordinate;

pub struct Config {
    pub places_api_key: String,
    pub places_base_url: String,
    pub search_radius_m: u32,
    pub place_type: String,
    pub keyword: String,
    /// Where to search; `None` means we don't know where the user is
    pub location: Option<Coordinate>,
    /// Database file; `None` uses the platform data directory
    pub db_path: Option<PathBuf>,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            places_api_key: String::new(),
            places_base_url: "https://maps.googleapis.com".to_string(),
            search_radius_m: 5000,
            place_type: "restaurant".to_string(),
            keyword: "takeaway".to_string(),
            location: None,
            db_path: None,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Read configuration from the environment
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let places_api_key = lookup("EATS_PLACES_API_KEY").unwrap_or_else(|| {
            warn!("EATS_PLACES_API_KEY not set, nearby search will be refused");
            String::new()
        });

        let latitude: Option<f64> = try_parse(&lookup, "EATS_LATITUDE");
        let longitude: Option<f64> = try_parse(&lookup, "EATS_LONGITUDE");
        let location = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            (None, None) => {
                info!("No location configured");
                None
            }
            _ => {
                warn!("Only one of EATS_LATITUDE/EATS_LONGITUDE set, ignoring location");
                None
            }
        };

        Self {
            places_api_key,
            places_base_url: lookup("EATS_PLACES_BASE_URL").unwrap_or(defaults.places_base_url),
            search_radius_m: try_load(&lookup, "EATS_SEARCH_RADIUS", defaults.search_radius_m),
            place_type: lookup("EATS_PLACE_TYPE").unwrap_or(defaults.place_type),
            keyword: lookup("EATS_KEYWORD").unwrap_or(defaults.keyword),
            location,
            db_path: lookup("EATS_DB_PATH").map(PathBuf::from),
            fetch_timeout: Duration::from_secs(try_load(
                &lookup,
                "EATS_FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout.as_secs(),
            )),
        }
    }
}

fn try_parse<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key)?;
    raw.trim()
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value {raw:?}: {e}");
        })
        .ok()
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    try_parse(lookup, key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.search_radius_m, 5000);
        assert_eq!(config.place_type, "restaurant");
        assert_eq!(config.keyword, "takeaway");
        assert_eq!(config.location, None);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_location_needs_both_halves() {
        let config_full = config(&[("EATS_LATITUDE", "40.42"), ("EATS_LONGITUDE", "-86.91")]);
        assert_eq!(config_full.location, Some(Coordinate::new(40.42, -86.91)));

        let config_half = config(&[("EATS_LATITUDE", "40.42")]);
        assert_eq!(config_half.location, None);
    }

    #[test]
    fn test_invalid_number_falls_back() {
        let config = config(&[("EATS_SEARCH_RADIUS", "far"), ("EATS_KEYWORD", "pizza")]);
        assert_eq!(config.search_radius_m, 5000);
        assert_eq!(config.keyword, "pizza");
    }
}
