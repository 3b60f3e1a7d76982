//! Response DTOs for the diagnostic API

use serde::Serialize;

use crate::invalidation::InvalidationOutcome;

/// Response body for POST /debug/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// The event that was requested
    pub event: String,
    /// False when the event was unknown or incomplete
    pub applied: bool,
    /// Number of cache keys removed
    pub keys_removed: usize,
}

impl InvalidateResponse {
    pub fn new(event: impl Into<String>, outcome: InvalidationOutcome) -> Self {
        Self {
            event: event.into(),
            applied: outcome.applied,
            keys_removed: outcome.keys_removed,
        }
    }
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
