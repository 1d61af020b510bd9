//! Discrepancy between planar and great-circle distance after local flattening.
//!
//! Each tile is rotated so its center lands on `(180°, 0°)`, and the candidate
//! search then treats the rotated `(ra, dec)` pairs as flat Cartesian
//! coordinates. The flattening stretches right ascension by roughly
//! `1 / cos(dec)`, so a planar search radius equal to the tolerance would miss
//! true pairs far from the reference point. This module measures how much
//! larger the planar distance can get.
//!
//! The bound is numerical: from an origin at `(180°, declination)` it steps
//! `distance` degrees along a fan of bearings between due north and due east,
//! and returns the largest `|planar - angular| / angular` seen.

use crate::spherical::point_offset;

/// Default number of bearings sampled between 0° and 90°.
pub const DEFAULT_ERROR_SAMPLES: usize = 100;

/// Largest relative error at `declination` for separation `distance`, using
/// [`DEFAULT_ERROR_SAMPLES`] bearings.
///
/// Callers pass a tile's angular radius as `declination`: it is the highest
/// declination a tile member can reach once the tile is flattened.
pub fn relative_error(declination: f64, distance: f64) -> f64 {
    max_relative_error(declination, distance, DEFAULT_ERROR_SAMPLES).0
}

/// Largest relative error over `samples` evenly spaced bearings in `[0°, 90°]`.
///
/// Returns `(error, bearing)` where `bearing` is the direction (degrees from
/// north towards east) at which the error peaks. `declination` is clamped to
/// `[-90°, 90°]`; `distance` must be positive.
pub fn max_relative_error(declination: f64, distance: f64, samples: usize) -> (f64, f64) {
    let origin = (180.0, declination.clamp(-90.0, 90.0));
    let samples = samples.max(1);
    let step = if samples > 1 {
        90.0 / (samples - 1) as f64
    } else {
        0.0
    };

    let mut worst = (0.0_f64, 0.0_f64);
    for i in 0..samples {
        let theta = step * i as f64;
        let (ra, dec) = point_offset(origin, distance, theta);
        let planar = ((ra - origin.0).powi(2) + (dec - origin.1).powi(2)).sqrt();
        let error = ((planar - distance) / distance).abs();
        if error > worst.0 {
            worst = (error, theta);
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_at_the_equator() {
        // Pure curvature error grows like ~1.27e-5 * d^2
        let e = relative_error(0.0, 1.0);
        assert!(e < 1e-4, "e = {e}");
        assert!(e > 0.0);
    }

    #[test]
    fn non_decreasing_in_distance() {
        let distances = [0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0];
        let errors: Vec<f64> = distances.iter().map(|&d| relative_error(0.0, d)).collect();
        for w in errors.windows(2) {
            assert!(w[1] >= w[0], "errors not monotone: {errors:?}");
        }
    }

    #[test]
    fn grows_with_declination() {
        let low = relative_error(10.0, 1.0);
        let mid = relative_error(30.0, 1.0);
        let high = relative_error(45.0, 1.0);
        assert!(low < mid && mid < high);
        // Stretching of right ascension dominates away from the equator
        let expected = 1.0 / 45f64.to_radians().cos() - 1.0;
        assert!((high - expected).abs() < 0.05, "high = {high}, expected ~{expected}");
    }

    #[test]
    fn bounded_below_one_for_modest_extent() {
        for dec in [0.0, 15.0, 30.0, 40.0, 45.0] {
            for d in [0.001, 0.1, 1.0, 3.0] {
                let e = relative_error(dec, d);
                assert!(e < 1.0, "dec {dec} d {d}: {e}");
            }
        }
    }

    #[test]
    fn worst_bearing_moves_east_with_declination() {
        let (_, bearing_high) = max_relative_error(40.0, 1.0, DEFAULT_ERROR_SAMPLES);
        assert!(bearing_high > 60.0, "bearing = {bearing_high}");
    }

    #[test]
    fn single_sample_looks_north() {
        let (e, bearing) = max_relative_error(30.0, 1.0, 1);
        assert_eq!(bearing, 0.0);
        assert!(e < 1e-6);
    }
}
