//! Request and Response models for the diagnostic API
//!
//! DTOs serialized to and from the debug HTTP bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::InvalidateRequest;
pub use responses::{ErrorResponse, HealthResponse, InvalidateResponse, MessageResponse};
