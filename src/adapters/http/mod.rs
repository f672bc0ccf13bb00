//! HTTP adapter - the OpenAI-compatible REST surface.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{ConciergeApiError, ConciergeAppState};
pub use routes::{concierge_router, concierge_routes};
