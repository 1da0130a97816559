use thiserror::Error;

/// Failures a data provider can report.
///
/// Every provider call may fail. Callers are expected to fold these into a
/// fallback view state (empty list, signed-out header, "video not found")
/// instead of surfacing them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("No active session")]
    Unauthenticated,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Video '{0}' not found")]
    NotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("{0} is not implemented yet")]
    NotImplemented(&'static str),

    #[error("Simulated network failure during {0}")]
    NetworkSimulationFailure(&'static str),
}

impl ProviderError {
    /// True for the "nobody is signed in" answer, which is a normal state
    /// rather than a failure.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ProviderError::Unauthenticated)
    }
}
