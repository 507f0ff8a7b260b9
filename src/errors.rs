//! Error types for edgeward

use thiserror::Error;

use crate::middleware::MiddlewareError;
use crate::plugins::LoadError;

/// Main error type for edgeward
#[derive(Error, Debug)]
pub enum EdgewardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Plugin error: {0}")]
    Plugin(#[from] LoadError),

    #[error("Middleware error: {0}")]
    Middleware(#[from] MiddlewareError),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

pub type Result<T> = std::result::Result<T, EdgewardError>;
