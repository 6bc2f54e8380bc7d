//! Great-circle distance on a spherical Earth approximation.
//!
//! Pure arithmetic, no error conditions: every pair of finite inputs
//! produces a finite result. Callers are responsible for validating
//! geographic domain bounds (see [`in_bounds`]) before calling
//! [`distance_meters`]; out-of-range values are accepted uncritically.

/// Mean Earth radius in meters, as used by the Haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Computes the great-circle distance in meters between two points given
/// as decimal-degree latitude/longitude pairs (WGS84 assumed).
///
/// Uses the Haversine formula, which is well-behaved at coincident and
/// antipodal points (precision degrades near antipodes, acceptable for
/// collar-scale distances).
#[must_use]
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Returns `true` if the pair is a valid geographic coordinate:
/// finite, `|lat| <= 90`, `|lon| <= 180`.
#[must_use]
pub fn in_bounds(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0
}
