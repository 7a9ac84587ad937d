//! In-memory address store with case-insensitive text search.
//!
//! # Matching
//!
//! Labels and queries are both folded with Unicode lower-casing, then
//! compared as plain strings: [`AddressIndex::search`] keeps labels that
//! *contain* the query, [`AddressIndex::search_prefix`] labels that *start
//! with* it.  No wildcard characters are interpreted.
//!
//! Results come back in insertion order and are never truncated here;
//! callers apply their own limit.
//!
//! # Short queries
//!
//! A query (trimmed) shorter than `min_query_chars` characters fails with
//! [`AddressError::QueryTooShort`] rather than returning everything.

use tracing::{debug, info};

use sn_core::{AddressId, CoreResult, GeoPoint, NetworkConfig};

use crate::{AddressError, AddressResult};

/// Default for [`AddressIndex::min_query_chars`].
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// One geocoded address.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Address {
    pub id:       AddressId,
    pub label:    String,
    /// Geographic position (lon/lat).
    pub location: GeoPoint,
}

impl Address {
    /// Build an address, rejecting out-of-range coordinates.
    pub fn new(id: i64, label: impl Into<String>, lon: f64, lat: f64) -> CoreResult<Self> {
        Ok(Self {
            id:       AddressId(id),
            label:    label.into(),
            location: GeoPoint::checked(lon, lat)?,
        })
    }
}

/// Read-only text index over [`Address`] records.
///
/// Populated once with [`load`](Self::load); afterwards every method takes
/// `&self`, so one index can be shared across threads behind an `Arc`.
#[derive(Clone, Debug)]
pub struct AddressIndex {
    records:         Vec<Address>,
    /// Lower-cased labels, parallel to `records`.
    folded:          Vec<String>,
    min_query_chars: usize,
}

impl Default for AddressIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressIndex {
    pub fn new() -> Self {
        Self::with_min_query_chars(DEFAULT_MIN_QUERY_CHARS)
    }

    pub fn with_min_query_chars(min_query_chars: usize) -> Self {
        Self { records: Vec::new(), folded: Vec::new(), min_query_chars }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::with_min_query_chars(config.min_query_chars)
    }

    /// Replace the whole contents with `records`.  Nothing of the previous
    /// load survives.
    pub fn load(&mut self, records: impl IntoIterator<Item = Address>) {
        self.records = records.into_iter().collect();
        self.folded = self.records.iter().map(|a| a.label.to_lowercase()).collect();
        info!(addresses = self.records.len(), "address index loaded");
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_query_chars(&self) -> usize {
        self.min_query_chars
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[Address] {
        &self.records
    }

    /// First record with the given id, if any.
    pub fn get(&self, id: AddressId) -> Option<&Address> {
        self.records.iter().find(|a| a.id == id)
    }

    /// Every address whose label contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> AddressResult<Vec<&Address>> {
        let needle = self.fold_query(query)?;
        let hits = self.matching(|label| label.contains(needle.as_str()));
        debug!(query, hits = hits.len(), "address search");
        Ok(hits)
    }

    /// Every address whose label starts with `query`, ignoring case.
    pub fn search_prefix(&self, query: &str) -> AddressResult<Vec<&Address>> {
        let needle = self.fold_query(query)?;
        let hits = self.matching(|label| label.starts_with(needle.as_str()));
        debug!(query, hits = hits.len(), "address prefix search");
        Ok(hits)
    }

    fn fold_query(&self, query: &str) -> AddressResult<String> {
        let query = query.trim();
        let got = query.chars().count();
        // An empty query never matches everything, whatever the setting.
        let min = self.min_query_chars.max(1);
        if got < min {
            return Err(AddressError::QueryTooShort { min, got });
        }
        Ok(query.to_lowercase())
    }

    fn matching(&self, pred: impl Fn(&str) -> bool) -> Vec<&Address> {
        self.records
            .iter()
            .zip(&self.folded)
            .filter(|(_, label)| pred(label))
            .map(|(a, _)| a)
            .collect()
    }
}
