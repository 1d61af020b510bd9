//! Spherical geometry on the unit celestial sphere.
//!
//! All angles are in **degrees**. Right ascension is the longitude-like
//! coordinate in `[0, 360)` and declination the latitude-like coordinate in
//! `[-90, 90]`. Everything here is a pure function.

use crate::Vector3;

/// Great-circle distance between two points, in degrees.
///
/// Uses the haversine form, which stays accurate for the very small
/// separations typical of catalog matching.
pub fn great_circle_distance(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let (ra1, dec1) = (ra1.to_radians(), dec1.to_radians());
    let (ra2, dec2) = (ra2.to_radians(), dec2.to_radians());

    let half_dra = (ra2 - ra1) / 2.0;
    let half_ddec = (dec2 - dec1) / 2.0;
    let a = half_ddec.sin().powi(2) + dec1.cos() * dec2.cos() * half_dra.sin().powi(2);
    (2.0 * a.clamp(0.0, 1.0).sqrt().asin()).to_degrees()
}

/// Great-circle distances from `target` to every point in `points`.
pub fn distances_to_target(target: (f64, f64), points: &[(f64, f64)]) -> Vec<f64> {
    points
        .iter()
        .map(|&(ra, dec)| great_circle_distance(target.0, target.1, ra, dec))
        .collect()
}

/// The point reached by travelling `distance` degrees from `origin` along
/// the great circle leaving it with bearing `theta`.
///
/// `theta` is measured in degrees counter-clockwise from the direction of
/// increasing declination, as seen from the center of the sphere looking
/// outwards (so `theta = 90` moves towards increasing right ascension).
/// The returned right ascension is wrapped into `[0, 360)`.
pub fn point_offset(origin: (f64, f64), distance: f64, theta: f64) -> (f64, f64) {
    let ra1 = origin.0.to_radians();
    let dec1 = origin.1.to_radians();
    let d = distance.to_radians();
    let theta = theta.to_radians();

    let (sin_dec1, cos_dec1) = dec1.sin_cos();
    let (sin_d, cos_d) = d.sin_cos();

    let sin_dec2 = (sin_dec1 * cos_d + cos_dec1 * sin_d * theta.cos()).clamp(-1.0, 1.0);
    let dec2 = sin_dec2.asin();
    let ra2 = ra1 + (sin_d * theta.sin()).atan2(cos_dec1 * cos_d - sin_dec1 * sin_d * theta.cos());

    (wrap_ra(ra2.to_degrees()), dec2.to_degrees())
}

/// Unit vector for a sky position.
pub fn radec_to_cartesian(ra: f64, dec: f64) -> Vector3 {
    let (sin_ra, cos_ra) = ra.to_radians().sin_cos();
    let (sin_dec, cos_dec) = dec.to_radians().sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}

/// Sky position of a Cartesian direction.
///
/// The vector does not need to be normalized; only its direction is used.
/// The zero vector maps to `(0, 0)`.
pub fn cartesian_to_radec(v: &Vector3) -> (f64, f64) {
    let norm = v.norm();
    if norm == 0.0 {
        return (0.0, 0.0);
    }
    let ra = wrap_ra(v.y.atan2(v.x).to_degrees());
    let dec = (v.z / norm).clamp(-1.0, 1.0).asin().to_degrees();
    (ra, dec)
}

/// Rotate `v` by `theta` degrees about the unit axis `k` (Rodrigues' formula).
pub fn rodrigues_rotation(v: &Vector3, k: &Vector3, theta: f64) -> Vector3 {
    let (sin_t, cos_t) = theta.to_radians().sin_cos();
    v * cos_t + k.cross(v) * sin_t + k * (k.dot(v) * (1.0 - cos_t))
}

/// Rotate a sky position by `theta` degrees about the axis pointing at
/// `(axis_ra, axis_dec)`.
pub fn rotate_radec_about_axis(
    ra: f64,
    dec: f64,
    axis_ra: f64,
    axis_dec: f64,
    theta: f64,
) -> (f64, f64) {
    let v = radec_to_cartesian(ra, dec);
    let k = radec_to_cartesian(axis_ra, axis_dec);
    cartesian_to_radec(&rodrigues_rotation(&v, &k, theta))
}

/// Wrap a right ascension into `[0, 360)`.
pub fn wrap_ra(ra: f64) -> f64 {
    let wrapped = ra.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Absolute right-ascension separation, aware of the 0/360 seam.
///
/// Always in `[0, 180]` for inputs already wrapped into `[0, 360)`.
pub fn ra_difference(ra1: f64, ra2: f64) -> f64 {
    let d = (ra1 - ra2).abs();
    d.min(360.0 - d)
}
