use serde::{Deserialize, Serialize};

/// One day of a proposed itinerary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItineraryDay {
    /// Day number, starting at 1.
    pub day: u32,

    /// Short headline for the day.
    pub title: String,

    /// Planned activities, in order.
    pub activities: Vec<String>,
}

/// The side-panel summary of a planned trip.
///
/// Replaced wholesale when the assistant produces new recommendations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TravelData {
    /// The trip's main destination.
    pub destination: String,

    /// Human-readable date range, e.g. "Feb 12 - Feb 19, 2025".
    pub dates: String,

    /// Estimated total cost, formatted by the service.
    pub total_cost: String,

    /// Map center for the destination: (latitude, longitude).
    pub coordinates: (f64, f64),

    /// Day-by-day plan.
    pub itinerary: Vec<ItineraryDay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let data = TravelData {
            destination: "Coorg".to_string(),
            dates: "Feb 12 - Feb 19, 2025".to_string(),
            total_cost: "10000Rs".to_string(),
            coordinates: (12.3375, 75.8069),
            itinerary: vec![ItineraryDay {
                day: 1,
                title: "Arrival".to_string(),
                activities: vec!["Sunset at Raja's Seat".to_string()],
            }],
        };
        let json = serde_json::to_string(&data).unwrap();
        let back: TravelData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
