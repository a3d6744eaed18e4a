use std::f64::consts::FRAC_PI_4;

/// Projects a longitude in degrees onto the world X axis.
///
/// World units keep longitude as-is; only latitude is warped by the
/// Mercator projection.
#[must_use]
pub fn mercator_x(lon: f64) -> f64 {
    lon
}

/// Projects a latitude in degrees onto the world Y axis using the
/// spherical Mercator formula `ln(tan(π/4 + lat/2))`.
///
/// Valid for latitudes strictly between -90° and 90°; the poles map to
/// infinity.
#[must_use]
pub fn mercator_y(lat: f64) -> f64 {
    (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln()
}

/// Inverse of [`mercator_y`]: recovers the latitude in degrees from a
/// world Y coordinate.
#[must_use]
pub fn mercator_y_to_lat(y: f64) -> f64 {
    (2.0 * y.exp().atan() - 2.0 * FRAC_PI_4).to_degrees()
}
