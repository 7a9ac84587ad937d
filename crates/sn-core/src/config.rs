//! Network and query configuration.

use crate::{CoreError, CoreResult, TransverseMercator};

/// How a street made of several disconnected parts becomes edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MultiPartPolicy {
    /// One edge per valid part.  No street segment is dropped.
    #[default]
    SplitParts,
    /// Keep only the first part and discard the rest.  Lossy; matches
    /// networks built by older tooling.
    FirstPartOnly,
}

/// Top-level configuration for building and querying a street network.
///
/// Typically loaded from a JSON file by the application crate (`serde`
/// feature) and handed to the service builder.  Every field has a default,
/// so a partial file is fine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkConfig {
    /// Endpoints closer than this (projected units, metres) share a node.
    /// Default: 1.0.
    pub snapping_tolerance: f64,

    /// Shortest accepted address query, in characters.  Default: 2.
    pub min_query_chars: usize,

    /// Maximum number of labels returned by `suggest`.  Default: 10.
    pub suggest_limit: usize,

    /// Treatment of multi-part street geometries.
    pub multipart: MultiPartPolicy,

    /// Projection between query coordinates and network coordinates.
    pub projection: TransverseMercator,
}

impl NetworkConfig {
    /// Reject values the builder and indexes cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.snapping_tolerance > 0.0 && self.snapping_tolerance.is_finite()) {
            return Err(CoreError::Config(format!(
                "snapping_tolerance must be positive and finite, got {}",
                self.snapping_tolerance
            )));
        }
        if self.min_query_chars == 0 {
            return Err(CoreError::Config("min_query_chars must be at least 1".into()));
        }
        self.projection.validate()
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            snapping_tolerance: 1.0,
            min_query_chars:    2,
            suggest_limit:      10,
            multipart:          MultiPartPolicy::SplitParts,
            projection:         TransverseMercator::mtm_zone7(),
        }
    }
}
