//! Error types for the influence engine.

use thiserror::Error;

/// Errors that abort a query.
///
/// Exhausted candidate pools, zero activations and emptied peels are not
/// errors; those paths return well-formed empty results with a message.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown model name, out-of-range budget, truss k below 2.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Empty seed inputs or an unreadable dataset. Unreadable datasets are
    /// fatal to the whole operation.
    #[error("missing input: {0}")]
    InputMissing(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
