use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::CandidateSource;
use crate::config::Config;
use crate::error::FetchError;
use crate::state::data::{Coordinate, Restaurant, PLACEHOLDER_IMAGE};

const NEARBY_PATH: &str = "/maps/api/place/nearbysearch/json";
const PHOTO_PATH: &str = "/maps/api/place/photo";
const PHOTO_MAX_WIDTH: u32 = 400;
const NO_DETAILS: &str = "No details available";

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<Place>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Place {
    place_id: String,
    name: String,
    vicinity: Option<String>,
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    photo_reference: String,
}

/// Nearby search against the Google Places web API
#[derive(Debug, Clone)]
pub struct GooglePlaces {
    client: Client,
    api_key: String,
    base_url: String,
    radius_m: u32,
    place_type: String,
    keyword: String,
}

impl GooglePlaces {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.places_api_key.clone(),
            base_url: config.places_base_url.trim_end_matches('/').to_string(),
            radius_m: config.search_radius_m,
            place_type: config.place_type.clone(),
            keyword: config.keyword.clone(),
        }
    }

    /// Photo URL with every query value encoded; `None` if the base URL is unusable
    fn photo_url(&self, reference: &str) -> Option<String> {
        let max_width = PHOTO_MAX_WIDTH.to_string();
        let params = [
            ("maxwidth", max_width.as_str()),
            ("photoreference", reference),
            ("key", self.api_key.as_str()),
        ];
        match Url::parse_with_params(&format!("{}{PHOTO_PATH}", self.base_url), &params) {
            Ok(url) => Some(url.to_string()),
            Err(err) => {
                warn!("Could not build photo URL from {}: {err}", self.base_url);
                None
            }
        }
    }

    /// Map a raw response body to restaurants, keeping the API's order.
    fn parse(&self, response: NearbyResponse) -> Result<Vec<Restaurant>, FetchError> {
        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            status => {
                let message = response
                    .error_message
                    .map(|m| format!("{status}: {m}"))
                    .unwrap_or_else(|| status.to_string());
                warn!("Places API refused the request: {message}");
                return Err(FetchError::Api(message));
            }
        }

        Ok(response
            .results
            .into_iter()
            .map(|place| Restaurant {
                image: place
                    .photos
                    .first()
                    .and_then(|photo| self.photo_url(&photo.photo_reference))
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                details: place
                    .vicinity
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| NO_DETAILS.to_string()),
                id: place.place_id,
                title: place.name,
            })
            .collect())
    }
}

impl CandidateSource for GooglePlaces {
    async fn nearby(&self, at: Coordinate) -> Result<Vec<Restaurant>, FetchError> {
        let url = format!("{}{NEARBY_PATH}", self.base_url);
        debug!(%url, location = %at.to_query(), "Searching nearby places");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("location", at.to_query()),
                ("radius", self.radius_m.to_string()),
                ("type", self.place_type.clone()),
                ("keyword", self.keyword.clone()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<NearbyResponse>()
            .await?;

        self.parse(response)
    }
}
