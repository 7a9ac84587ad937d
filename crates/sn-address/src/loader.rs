//! CSV address loader.
//!
//! # CSV format
//!
//! One row per address, geographic coordinates in degrees.
//!
//! ```csv
//! id,label,longitude,latitude
//! 1,123 MAIN ST,-71.2080,46.8139
//! 2,45 OAK AVE,-71.2110,46.8120
//! ```
//!
//! Header aliases match the municipal export:
//!
//! | Column      | Also accepted |
//! |-------------|---------------|
//! | `id`        | `OBJECTID`    |
//! | `label`     | `ADRESSE`     |
//! | `longitude` | `lon`         |
//! | `latitude`  | `lat`         |
//!
//! Extra columns are ignored.  A row that does not parse is an error; a row
//! that parses but whose coordinates are out of range is logged and skipped.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::index::Address;
use crate::{AddressError, AddressResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AddressRecord {
    #[serde(alias = "OBJECTID")]
    id:        i64,
    #[serde(alias = "ADRESSE")]
    label:     String,
    #[serde(alias = "lon")]
    longitude: f64,
    #[serde(alias = "lat")]
    latitude:  f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load addresses from a CSV file.
pub fn load_addresses_csv(path: &Path) -> AddressResult<Vec<Address>> {
    let file = std::fs::File::open(path).map_err(AddressError::Io)?;
    load_addresses_reader(file)
}

/// Like [`load_addresses_csv`] but accepts any `Read` source.
pub fn load_addresses_reader<R: Read>(reader: R) -> AddressResult<Vec<Address>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    let mut skipped = 0usize;

    for result in csv_reader.deserialize::<AddressRecord>() {
        let row = result.map_err(|e| AddressError::Parse(e.to_string()))?;
        match Address::new(row.id, row.label, row.longitude, row.latitude) {
            Ok(a) => out.push(a),
            Err(e) => {
                warn!(address = row.id, error = %e, "skipping address with invalid coordinates");
                skipped += 1;
            }
        }
    }

    info!(loaded = out.len(), skipped, "addresses read");
    Ok(out)
}
