//! Error types for schema emission.

use thiserror::Error;

/// Error type for emission operations.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Repository parsing error.
    #[error("repository parse error: {0}")]
    Parse(#[from] ironorchestra_schema::ParseError),

    /// Field resolution error.
    #[error("resolution error: {0}")]
    Resolve(#[from] ironorchestra_schema::ResolveError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
