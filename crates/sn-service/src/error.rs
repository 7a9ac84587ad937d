use thiserror::Error;

use sn_address::AddressError;
use sn_core::CoreError;
use sn_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid query coordinate or configuration.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// An address query used by `find_path` matched nothing.
    #[error("no address matches {0:?}")]
    NoMatch(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
