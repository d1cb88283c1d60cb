//! Data types shared across the wayfarer SDK.

mod chat_request;
mod location;
mod message;
mod post;
mod travel_data;

pub use chat_request::ChatRequest;
pub use location::{DESTINATION_KIND, Location};
pub use message::{Message, MessageRole};
pub use post::Post;
pub use travel_data::{ItineraryDay, TravelData};
