use thiserror::Error;

use sn_core::CoreError;

#[derive(Debug, Error)]
pub enum AddressError {
    /// The query is shorter than the configured minimum (counted in chars,
    /// after trimming surrounding whitespace).
    #[error("query too short: {got} character(s), need at least {min}")]
    QueryTooShort { min: usize, got: usize },

    /// Invalid coordinate or other core failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("address parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AddressResult<T> = Result<T, AddressError>;
