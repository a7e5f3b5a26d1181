// concierge-api: Async Rust client for the concierge guest API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ConciergeClient;
pub use error::Error;
pub use models::{
    ChatReply, ChatRequest, HealthStatus, MatchGuestRequest, MatchedGuest, RegisterGuestRequest,
    RegisteredGuest, ReservationRecord,
};
pub use transport::{TlsMode, TransportConfig};
