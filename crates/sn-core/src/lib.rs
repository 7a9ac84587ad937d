//! `sn-core` — foundational types for the `streetnet` routing workspace.
//!
//! This crate is a dependency of every other `sn-*` crate.  It intentionally
//! has no `sn-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`ids`]        | `NodeId`, `EdgeId`, `StreetId`, `AddressId`            |
//! | [`geo`]        | `GeoPoint` (lon/lat), `PlanarPoint` (projected x/y)    |
//! | [`projection`] | `Projector` trait, `TransverseMercator`                 |
//! | [`config`]     | `NetworkConfig`, `MultiPartPolicy`                     |
//! | [`error`]      | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod projection;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{MultiPartPolicy, NetworkConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, PlanarPoint};
pub use ids::{AddressId, EdgeId, NodeId, StreetId};
pub use projection::{Projector, TransverseMercator};
