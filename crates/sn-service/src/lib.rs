//! `sn-service` — query façade for the streetnet workspace.
//!
//! # Operations
//!
//! | Method                         | Returns                                   |
//! |--------------------------------|-------------------------------------------|
//! | `geocode(text)`                | `[{label, latitude, longitude}]`          |
//! | `suggest(text)`                | up to `suggest_limit` labels              |
//! | `snap_to_network(lat, lon)`    | `{nodeId, latitude, longitude, distance}` |
//! | `nearest_street(lat, lon)`     | `{streetId, edgeId, distance}`            |
//! | `route(start, end)`            | `{edgeIds, geometry, totalCost, nodePath}`|
//! | `find_path(start, end)`        | both geocode hits plus the route          |
//!
//! All results are `serde::Serialize`; the web layer serialises them as-is.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sn_core::NetworkConfig;
//! use sn_service::ServiceBuilder;
//!
//! let service = ServiceBuilder::new(NetworkConfig::default())
//!     .addresses(addresses)
//!     .streets(streets)
//!     .build()?;
//! let route = service.find_path("123 main", "45 oak")?;
//! ```

pub mod builder;
pub mod error;
pub mod response;
pub mod service;


pub use builder::ServiceBuilder;
pub use error::{ServiceError, ServiceResult};
pub use response::{FindPathResponse, GeocodeHit, NearestStreet, RouteResponse, SnappedNode};
pub use service::RoutingService;
