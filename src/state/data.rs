/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the places client, the card queue, the database layer and the UI layer.

/// Image shown when a place has no photo
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x250?text=No+Image";

/// A single restaurant, either a candidate on the card stack or a saved favorite.
///
/// Both share one shape: a saved record is exactly the candidate the user kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    /// Place identifier, the primary key once saved
    pub id: String,
    /// Display name
    pub title: String,
    /// Address or short description
    pub details: String,
    /// Photo URL or [`PLACEHOLDER_IMAGE`]
    pub image: String,
}

impl Restaurant {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        details: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            details: details.into(),
            image: image.into(),
        }
    }

    /// Whether this record points at a real photo
    pub fn has_photo(&self) -> bool {
        self.image != PLACEHOLDER_IMAGE
    }
}

/// A point on the globe to search around
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// `lat,lng` as the places API expects it
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_not_a_photo() {
        let plain = Restaurant::new("a", "A", "somewhere", PLACEHOLDER_IMAGE);
        assert!(!plain.has_photo());

        let pictured = Restaurant::new("b", "B", "elsewhere", "https://example.com/b.jpg");
        assert!(pictured.has_photo());
    }

    #[test]
    fn test_coordinate_query() {
        let here = Coordinate::new(51.5, -0.125);
        assert_eq!(here.to_query(), "51.5,-0.125");
    }
}
