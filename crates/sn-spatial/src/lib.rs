//! `sn-spatial` — street topology, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`geometry`] | `StreetRecord`, `RawGeometry`, `StreetGeometry`, `repair`      |
//! | [`topology`] | `TopologyBuilder`, `BuildReport`                               |
//! | [`network`]  | `NetworkGraph` (CSR + R-tree), `NetworkGraphBuilder`           |
//! | [`index`]    | `SpatialIndex` (points), `SegmentIndex` (street segments)      |
//! | [`router`]   | `Router` trait, `Path`, `DijkstraRouter`                       |
//! | [`analysis`] | `analyze` → `GraphAnalysis`                                    |
//! | [`geojson`]  | `load_streets_reader` (feature = `"geojson"`, on by default)   |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `geojson`  | GeoJSON street loader via the `geojson` crate.             |
//! | `parallel` | Geometry repair on Rayon's thread pool.                    |
//! | `serde`    | Propagates serde derives from `sn-core`.                   |

pub mod analysis;
pub mod error;
pub mod geometry;
pub mod index;
pub mod network;
pub mod router;
pub mod topology;

#[cfg(feature = "geojson")]
pub mod geojson;

#[cfg(test)]
mod tests;

pub use analysis::{analyze, GraphAnalysis};
pub use error::{SpatialError, SpatialResult};
pub use geometry::{RawGeometry, StreetGeometry, StreetRecord};
pub use index::{SegmentIndex, SpatialIndex};
pub use network::{Edge, NetworkGraph, NetworkGraphBuilder, Traversal};
pub use router::{DijkstraRouter, Path, PathStep, Router};
pub use topology::{BuildReport, Built, SkippedStreet, TopologyBuilder};
