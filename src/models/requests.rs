//! Request DTOs for the diagnostic API

use serde::Deserialize;

use crate::invalidation::InvalidationContext;

/// Request body for POST /debug/invalidate
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Event name, e.g. `project_updated`
    pub event: String,
    /// Entity id the event refers to
    #[serde(default)]
    pub id: Option<String>,
    /// Extra event data
    #[serde(default)]
    pub context: Option<InvalidationContext>,
}

impl InvalidateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.event.trim().is_empty() {
            return Some("Event cannot be empty".to_string());
        }
        None
    }
}
