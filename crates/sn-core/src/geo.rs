//! Coordinate value types.
//!
//! The workspace keeps two coordinate systems apart at the type level:
//!
//! - [`GeoPoint`] — WGS-84 / NAD83 longitude and latitude in degrees.  All
//!   public query inputs and outputs use this type.
//! - [`PlanarPoint`] — projected `x`/`y` in metres.  All distances and edge
//!   costs are computed in this system.
//!
//! Conversion between the two goes through a [`Projector`](crate::Projector).
//! Both types use `f64`; the projection round-trip needs better than 1e-6°.

use crate::{CoreError, CoreResult};

/// A geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    /// Construct without validation.  Use [`GeoPoint::checked`] for
    /// untrusted input.
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Construct and validate: both values finite, latitude in [-90, 90],
    /// longitude in [-180, 180].
    pub fn checked(lon: f64, lat: f64) -> CoreResult<Self> {
        let p = Self { lon, lat };
        p.validate()?;
        Ok(p)
    }

    /// Check that this point lies in the geographic domain.
    pub fn validate(self) -> CoreResult<()> {
        let reason = if !self.lon.is_finite() || !self.lat.is_finite() {
            Some("non-finite value")
        } else if !(-90.0..=90.0).contains(&self.lat) {
            Some("latitude outside [-90, 90]")
        } else if !(-180.0..=180.0).contains(&self.lon) {
            Some("longitude outside [-180, 180]")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(CoreError::InvalidCoordinate {
                a: self.lon,
                b: self.lat,
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lon, self.lat)
    }
}

/// A point in the projected (planar, metric) coordinate system.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Squared Euclidean distance.  Cheaper than [`distance`](Self::distance)
    /// for comparisons.
    #[inline]
    pub fn distance_2(self, other: PlanarPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance in projected units (metres).
    #[inline]
    pub fn distance(self, other: PlanarPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for PlanarPoint {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for PlanarPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Sum of consecutive-vertex distances along a polyline.
///
/// Returns `0.0` for fewer than two vertices.
pub fn polyline_length(points: &[PlanarPoint]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
