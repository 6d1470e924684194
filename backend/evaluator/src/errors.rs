//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EvaluatorError>;
