//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced by `sn-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A coordinate pair outside the domain of the operation.  `a`/`b` are
    /// `lon`/`lat` for geographic input and `x`/`y` for projected input.
    #[error("invalid coordinate ({a}, {b}): {reason}")]
    InvalidCoordinate {
        a:      f64,
        b:      f64,
        reason: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `sn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
