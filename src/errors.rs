use thiserror::Error;

use crate::soft_assert::SoftAssertionError;

#[derive(Debug, Error)]
pub enum LatencyGateError {
    #[error("benchmark not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("benchmark error: {0}")]
    Benchmark(String),
    #[error("io error: {0}")]
    Io(String),
    #[error(transparent)]
    Assertions(#[from] SoftAssertionError),
}

impl LatencyGateError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LatencyGateError::NotFound(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        LatencyGateError::InvalidInput(msg.into())
    }

    pub fn benchmark<T: Into<String>>(msg: T) -> Self {
        LatencyGateError::Benchmark(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        LatencyGateError::Io(msg.into())
    }
}
