//! Foundational error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::SpotId;

/// The error type for `ps-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("spot {0} out of range")]
    SpotOutOfRange(SpotId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ps-core`.
pub type CoreResult<T> = Result<T, CoreError>;
