use thiserror::Error;

/// Failures reported by a [`DataSource`](super::DataSource).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// No further history is available. Callers treat this as a normal stop.
    #[error("Source exhausted: no further history available")]
    Exhausted,

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid response from source: {0}")]
    InvalidResponse(String),
}

impl SourceError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, SourceError::Exhausted)
    }
}
