//! Map and itinerary side-panel state.
//!
//! The assistant's recommendations arrive as a batch of [`Location`]
//! markers and, for a planned trip, a [`TravelData`] summary. The panel
//! replaces its contents wholesale each time; nothing here is merged.
//! Drawing tiles and markers is the frontend's job.

use crate::types::{Location, TravelData};

/// Map center used before any locations arrive (Coorg).
pub const DEFAULT_CENTER: (f64, f64) = (12.3375, 75.8069);

/// State for the map and itinerary panel.
#[derive(Debug, Clone, Default)]
pub struct MapState {
    locations: Vec<Location>,
    travel_data: Option<TravelData>,
}

impl MapState {
    /// Creates an empty panel centered on the default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current markers.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Returns the current trip summary, if any.
    pub fn travel_data(&self) -> Option<&TravelData> {
        self.travel_data.as_ref()
    }

    /// Replaces all markers with a new batch.
    pub fn set_locations(&mut self, locations: Vec<Location>) {
        self.locations = locations;
    }

    /// Replaces the trip summary and derives a destination marker from
    /// its coordinates.
    pub fn set_travel_data(&mut self, travel_data: TravelData) {
        let (lat, lng) = travel_data.coordinates;
        self.locations = vec![Location::new(
            travel_data.destination.clone(),
            lat,
            lng,
            crate::types::DESTINATION_KIND,
        )];
        self.travel_data = Some(travel_data);
    }

    /// Clears markers and trip summary.
    pub fn clear(&mut self) {
        self.locations.clear();
        self.travel_data = None;
    }

    /// The point the map should center on.
    ///
    /// Follows the `destination`-typed marker when present, else the
    /// first marker, else the default.
    pub fn center(&self) -> (f64, f64) {
        self.locations
            .iter()
            .find(|loc| loc.is_destination())
            .or_else(|| self.locations.first())
            .map(|loc| (loc.lat, loc.lng))
            .unwrap_or(DEFAULT_CENTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DESTINATION_KIND, ItineraryDay};

    #[test]
    fn empty_panel_uses_default_center() {
        let state = MapState::new();
        assert_eq!(state.center(), DEFAULT_CENTER);
        assert!(state.locations().is_empty());
    }

    #[test]
    fn center_follows_destination_marker() {
        let mut state = MapState::new();
        state.set_locations(vec![
            Location::new("Abbey Falls", 12.4544, 75.7167, "waterfall"),
            Location::new("Munnar", 10.0889, 77.0595, DESTINATION_KIND),
        ]);
        assert_eq!(state.center(), (10.0889, 77.0595));
    }

    #[test]
    fn center_falls_back_to_first_marker() {
        let mut state = MapState::new();
        state.set_locations(vec![
            Location::new("Raja's Seat", 12.4244, 75.7382, "attraction"),
            Location::new("Dubare Camp", 12.3608, 75.8975, "activity"),
        ]);
        assert_eq!(state.center(), (12.4244, 75.7382));
    }

    #[test]
    fn locations_are_replaced_wholesale() {
        let mut state = MapState::new();
        state.set_locations(vec![Location::new("A", 1.0, 2.0, "attraction")]);
        state.set_locations(vec![Location::new("B", 3.0, 4.0, "attraction")]);
        assert_eq!(state.locations().len(), 1);
        assert_eq!(state.locations()[0].name, "B");
    }

    #[test]
    fn travel_data_centers_on_its_coordinates() {
        let mut state = MapState::new();
        state.set_travel_data(TravelData {
            destination: "Munnar".to_string(),
            dates: "Mar 3 - Mar 7, 2025".to_string(),
            total_cost: "18000Rs".to_string(),
            coordinates: (10.0889, 77.0595),
            itinerary: vec![ItineraryDay {
                day: 1,
                title: "Tea country".to_string(),
                activities: vec!["Kolukkumalai sunrise".to_string()],
            }],
        });
        assert_eq!(state.center(), (10.0889, 77.0595));
        assert!(state.travel_data().is_some());
        assert!(state.locations()[0].is_destination());
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = MapState::new();
        state.set_locations(vec![Location::new("A", 1.0, 2.0, "attraction")]);
        state.clear();
        assert!(state.locations().is_empty());
        assert_eq!(state.center(), DEFAULT_CENTER);
    }
}
