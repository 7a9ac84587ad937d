//! `sn-address` — geocoded address records and text lookup.
//!
//! # Crate layout
//!
//! | Module     | Contents                                             |
//! |------------|------------------------------------------------------|
//! | [`index`]  | `Address`, `AddressIndex` (substring / prefix search) |
//! | [`loader`] | `load_addresses_csv`, `load_addresses_reader`        |
//! | [`error`]  | `AddressError`, `AddressResult<T>`                   |

pub mod error;
pub mod index;
pub mod loader;


pub use error::{AddressError, AddressResult};
pub use index::{Address, AddressIndex};
pub use loader::{load_addresses_csv, load_addresses_reader};
