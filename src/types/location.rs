use serde::{Deserialize, Serialize};

/// The marker type for the main destination; the map centers on it.
pub const DESTINATION_KIND: &str = "destination";

/// A map marker for the itinerary side panel.
///
/// Locations have no lifecycle of their own; the whole set is replaced
/// when new results arrive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Display name of the place.
    pub name: String,

    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    pub lng: f64,

    /// Marker category, e.g. `destination`, `attraction`, `trekking`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Location {
    /// Creates a new location marker.
    pub fn new(name: impl Into<String>, lat: f64, lng: f64, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
            kind: kind.into(),
        }
    }

    /// Returns true if this marker is the main destination.
    pub fn is_destination(&self) -> bool {
        self.kind == DESTINATION_KIND
    }
}
