//! Error types
//!
//! Only construction and configuration can fail. Per-tick operations are
//! infallible once these are validated.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Body radius must be positive, with a finite diameter and mass
    #[error("invalid body radius: {0}")]
    InvalidRadius(f64),
    /// Body position must be finite
    #[error("invalid body position: ({0}, {1})")]
    InvalidPosition(f64, f64),
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
