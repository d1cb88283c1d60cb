// Public modules
pub mod chat;
pub mod client;
pub mod community;
pub mod error;
pub mod frame;
pub mod itinerary;
pub mod markdown;
pub mod observability;
pub mod render;
pub mod session;
pub mod transcript;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{Navigator, NoopNavigator, Wayfarer};
pub use community::{CommunityFeed, FeedStats};
pub use error::{Error, Result};
pub use frame::Frame;
pub use itinerary::MapState;
pub use markdown::{GatedStream, MarkdownGate, safe_boundary};
pub use render::{PlainTextRenderer, Renderer};
pub use session::{FileStorage, MemoryStorage, SessionStorage, SessionStore, StoredSession, TokenResponse};
pub use transcript::{GREETING, Transcript};
pub use types::*;
