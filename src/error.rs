//! Error types for the crossing scheduler

use thiserror::Error;

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding, solving or decoding an instance.
///
/// An unsatisfiable horizon is not an error: the fixed-horizon query reports
/// it as `Ok(None)` and the minimal-horizon search moves on to the next one.
#[derive(Debug, Error)]
pub enum Error {
    /// The instance was rejected before anything was handed to a solver
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The solver collaborator failed or was interrupted
    #[error("solver backend error: {0}")]
    Backend(String),

    /// The solver collaborator broke its contract (incomplete model, or an
    /// answer that contradicts a known feasible schedule)
    #[error("solver contract violated: {reason}")]
    SolverContract { reason: String },

    /// The caller-imposed horizon cap was reached without a schedule
    #[error("no schedule found up to horizon {max_horizon}")]
    HorizonExhausted { max_horizon: u32 },
}

impl Error {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn contract(reason: impl Into<String>) -> Self {
        Error::SolverContract {
            reason: reason.into(),
        }
    }

    pub fn backend(err: impl std::fmt::Display) -> Self {
        Error::Backend(err.to_string())
    }
}
