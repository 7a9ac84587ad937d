//! Spatial-subsystem error type.

use thiserror::Error;

use sn_core::{CoreError, NodeId, StreetId};

/// Errors produced by `sn-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The two nodes are in different connected components.
    #[error("no path from {from} to {to}")]
    NoPathFound { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    /// Per-record failure: fewer than two usable vertices after repair.
    /// Skipped during a build, never fatal on its own.
    #[error("street {street} is degenerate: {points} usable point(s)")]
    DegenerateGeometry { street: StreetId, points: usize },

    /// No valid geometry survived validation; nothing to build.
    #[error("no valid street geometries ({skipped} skipped)")]
    EmptyInput { skipped: usize },

    #[error("edge cost must be finite and non-negative, got {0}")]
    InvalidCost(f64),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "geojson")]
    #[error("GeoJSON parse error: {0}")]
    GeoJson(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
