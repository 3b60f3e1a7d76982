//! Error types for the cache subsystem
//!
//! Cache operations themselves never fail; these errors come from data
//! sources feeding the caches and from the diagnostic surface.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for warming and diagnostics.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Upstream data source failed while filling a cache
    #[error("Data source error: {0}")]
    DataSource(#[from] anyhow::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Fixture document could not be loaded
    #[error("Fixture error: {0}")]
    Fixture(String),
}

// == IntoResponse Implementation ==
#[cfg(feature = "debug-api")]
mod response {
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };

    use super::CacheError;
    use crate::models::ErrorResponse;

    impl IntoResponse for CacheError {
        fn into_response(self) -> Response {
            let status = match &self {
                CacheError::DataSource(_) => StatusCode::BAD_GATEWAY,
                CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                CacheError::Fixture(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };

            (status, Json(ErrorResponse::new(self.to_string()))).into_response()
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache subsystem.
pub type Result<T> = std::result::Result<T, CacheError>;
