//! Geographic ↔ projected coordinate conversion.
//!
//! # Projection
//!
//! [`TransverseMercator`] implements the ellipsoidal transverse Mercator
//! projection with Krüger's n-series carried to 6th order.  Within the
//! supported band around the central meridian the forward/inverse pair is
//! accurate to well under a millimetre, so the round-trip error is bounded
//! by floating-point rounding (≪ 1e-6°).
//!
//! The default parameters are NAD83 / MTM zone 7 (EPSG:32187), the projected
//! system of the Québec City street and address data:
//!
//! | Parameter         | Value                 |
//! |-------------------|-----------------------|
//! | Ellipsoid         | GRS80                 |
//! | Central meridian  | −70.5°                |
//! | Scale factor      | 0.9999                |
//! | False easting     | 304 800 m             |
//! | False northing    | 0 m                   |
//!
//! # Domain
//!
//! Geographic input must be finite, latitude ∈ [−90, 90], longitude ∈
//! [−180, 180], and within `max_lon_offset_deg` of the central meridian.
//! The series diverge far from the central meridian, so the band is part
//! of the contract rather than a soft limit.  The inverse accepts points a
//! hair outside the band so every point the forward projection accepts
//! converts back.
//!
//! At the poles longitude is undefined; a pole converts back with the
//! central meridian's longitude.

use crate::{CoreError, CoreResult, GeoPoint, PlanarPoint};

/// Longitude tolerance of the inverse band check, in degrees (~0.1 m).
const INVERSE_BAND_SLACK_DEG: f64 = 1e-6;

/// Pure conversion between geographic and projected coordinates.
///
/// Implementations must be deterministic and side-effect free so a single
/// instance can be shared by concurrent readers.
pub trait Projector: Send + Sync {
    /// Geographic (lon/lat degrees) → projected (metres).
    fn to_projected(&self, p: GeoPoint) -> CoreResult<PlanarPoint>;

    /// Projected (metres) → geographic (lon/lat degrees).
    fn to_geographic(&self, p: PlanarPoint) -> CoreResult<GeoPoint>;
}

// ── TransverseMercator ───────────────────────────────────────────────────────

/// Ellipsoidal transverse Mercator parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransverseMercator {
    /// Ellipsoid semi-major axis in metres.
    pub semi_major_m: f64,
    /// Ellipsoid inverse flattening (1/f).
    pub inverse_flattening: f64,
    pub central_meridian_deg: f64,
    pub scale_factor: f64,
    pub false_easting_m: f64,
    pub false_northing_m: f64,
    /// Widest accepted longitude offset from the central meridian.
    pub max_lon_offset_deg: f64,
}

impl TransverseMercator {
    /// NAD83 / MTM zone 7 (EPSG:32187).
    pub fn mtm_zone7() -> Self {
        Self {
            semi_major_m:         6_378_137.0,
            inverse_flattening:   298.257_222_101,
            central_meridian_deg: -70.5,
            scale_factor:         0.9999,
            false_easting_m:      304_800.0,
            false_northing_m:     0.0,
            max_lon_offset_deg:   20.0,
        }
    }

    /// Reject parameter sets the series cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.semi_major_m > 0.0 && self.semi_major_m.is_finite()) {
            return Err(CoreError::Config(format!(
                "semi_major_m must be positive, got {}",
                self.semi_major_m
            )));
        }
        if !(self.inverse_flattening > 1.0 && self.inverse_flattening.is_finite()) {
            return Err(CoreError::Config(format!(
                "inverse_flattening must be > 1, got {}",
                self.inverse_flattening
            )));
        }
        if !(self.scale_factor > 0.0 && self.scale_factor.is_finite()) {
            return Err(CoreError::Config(format!(
                "scale_factor must be positive, got {}",
                self.scale_factor
            )));
        }
        if !(self.max_lon_offset_deg > 0.0 && self.max_lon_offset_deg < 90.0) {
            return Err(CoreError::Config(format!(
                "max_lon_offset_deg must be in (0, 90), got {}",
                self.max_lon_offset_deg
            )));
        }
        Ok(())
    }

    /// Longitude offset from the central meridian, wrapped into (−180, 180].
    fn lon_offset_deg(&self, lon: f64) -> f64 {
        let d = (lon - self.central_meridian_deg).rem_euclid(360.0);
        if d > 180.0 { d - 360.0 } else { d }
    }

    fn check_band(&self, p: GeoPoint) -> CoreResult<f64> {
        p.validate()?;
        let dlon = self.lon_offset_deg(p.lon);
        if dlon.abs() > self.max_lon_offset_deg {
            return Err(CoreError::InvalidCoordinate {
                a:      p.lon,
                b:      p.lat,
                reason: "longitude too far from the central meridian",
            });
        }
        Ok(dlon)
    }
}

impl Default for TransverseMercator {
    fn default() -> Self {
        Self::mtm_zone7()
    }
}

impl Projector for TransverseMercator {
    fn to_projected(&self, p: GeoPoint) -> CoreResult<PlanarPoint> {
        let dlon = self.check_band(p)?;
        let s = Series::new(self);

        let phi = p.lat.to_radians();
        let lam = dlon.to_radians();

        // Conformal latitude via its tangent; infinite at the poles, which
        // atan2 and hypot below absorb.
        let sin_phi = phi.sin();
        let tau = (sin_phi.atanh() - s.e * (s.e * sin_phi).atanh()).sinh();
        let xi_p = tau.atan2(lam.cos());
        let eta_p = (lam.sin() / tau.hypot(1.0)).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, alpha) in s.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        let scale = self.scale_factor * s.rectifying_radius;
        Ok(PlanarPoint::new(
            self.false_easting_m + scale * eta,
            self.false_northing_m + scale * xi,
        ))
    }

    fn to_geographic(&self, p: PlanarPoint) -> CoreResult<GeoPoint> {
        if !p.is_finite() {
            return Err(CoreError::InvalidCoordinate {
                a:      p.x,
                b:      p.y,
                reason: "non-finite value",
            });
        }
        let s = Series::new(self);
        let scale = self.scale_factor * s.rectifying_radius;

        let xi = (p.y - self.false_northing_m) / scale;
        let eta = (p.x - self.false_easting_m) / scale;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, beta) in s.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).clamp(-1.0, 1.0).asin();
        let mut phi = chi;
        for (j, delta) in s.delta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            phi += delta * (k * chi).sin();
        }
        let lam = eta_p.sinh().atan2(xi_p.cos());

        let lon = self.central_meridian_deg + lam.to_degrees();
        let lat = phi.to_degrees().clamp(-90.0, 90.0);
        let out = GeoPoint::new(lon, lat);
        if out.validate().is_err()
            || lam.to_degrees().abs() > self.max_lon_offset_deg + INVERSE_BAND_SLACK_DEG
        {
            return Err(CoreError::InvalidCoordinate {
                a:      p.x,
                b:      p.y,
                reason: "projected point outside the projection's valid band",
            });
        }
        Ok(out)
    }
}

// ── Krüger series coefficients ───────────────────────────────────────────────

/// Ellipsoid-derived constants.  Recomputed per call; the cost is a few
/// dozen multiplications.
struct Series {
    e:                 f64,
    rectifying_radius: f64,
    alpha:             [f64; 6],
    beta:              [f64; 6],
    delta:             [f64; 3],
}

impl Series {
    fn new(tm: &TransverseMercator) -> Self {
        let f = 1.0 / tm.inverse_flattening;
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let e = (f * (2.0 - f)).sqrt();
        let rectifying_radius =
            tm.semi_major_m / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0
                - 127.0 * n5 / 288.0 + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                - 1983433.0 * n6 / 1935360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167603.0 * n6 / 181440.0,
            49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
            34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
            212378941.0 * n6 / 319334400.0,
        ];

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                + 96199.0 * n6 / 604800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1118711.0 * n6 / 3870720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0
                + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
            4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
            20648693.0 * n6 / 638668800.0,
        ];

        // Conformal → geodetic latitude.
        let delta = [
            2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
            7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
            56.0 * n3 / 15.0,
        ];

        Self { e, rectifying_radius, alpha, beta, delta }
    }
}
