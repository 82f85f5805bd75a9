//! Error types for race simulation.

use thiserror::Error;

/// Errors encountered while configuring or driving a simulation batch.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<lca_core::CoreError> for SimError {
    fn from(e: lca_core::CoreError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
