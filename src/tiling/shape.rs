//! Tile shapes and their membership tests.

use crate::errors::{MatchError, Result};
use crate::spherical::{great_circle_distance, ra_difference};

/// Slack, in degrees, added to every edge test.
///
/// Ring centers and half-widths of layouts whose sector or band count does
/// not divide the sky evenly are rounded, so two neighbours can both miss a
/// point on their shared edge by an ulp. With the slack they both contain it
/// and the later tile wins.
pub const EDGE_SLACK: f64 = 1e-9;

/// Which celestial pole a polar cap surrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pole {
    North,
    South,
}

/// Un-inflated region of one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileShape {
    /// Cap `dec > dec_bound` (north) or `dec < -dec_bound` (south).
    Polar { pole: Pole, dec_bound: f64 },
    /// Rectangle in `(ra, dec)` space; half-widths in degrees.
    Ring {
        center_ra: f64,
        center_dec: f64,
        half_width_ra: f64,
        half_width_dec: f64,
    },
}

/// A tile shape together with the margin it is inflated by.
///
/// Ring tiles also carry an RA margin: the right-ascension span that holds
/// every point within `margin` degrees of the tile's RA edges at the highest
/// declination the inflated tile reaches. Near the poles a degree of RA
/// shrinks, so this is wider than `margin` itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileConfig {
    shape: TileShape,
    margin: f64,
    ra_margin: f64,
}

impl TileConfig {
    /// Polar cap beyond `|dec| > dec_bound`.
    pub fn polar(pole: Pole, dec_bound: f64, margin: f64) -> Result<Self> {
        check_margin(margin)?;
        if !(dec_bound > 0.0 && dec_bound < 90.0) {
            return Err(MatchError::config(format!(
                "polar dec_bound must lie in (0, 90), got {dec_bound}"
            )));
        }
        Ok(Self {
            shape: TileShape::Polar { pole, dec_bound },
            margin,
            ra_margin: margin,
        })
    }

    /// Ring rectangle centered at `center = (ra, dec)` with the given half-widths.
    pub fn ring(
        center: (f64, f64),
        half_width_ra: f64,
        half_width_dec: f64,
        margin: f64,
    ) -> Result<Self> {
        check_margin(margin)?;
        if !(half_width_ra > 0.0 && half_width_dec > 0.0) {
            return Err(MatchError::config(format!(
                "ring widths must be positive, got ({half_width_ra}, {half_width_dec})"
            )));
        }
        if !(-90.0..=90.0).contains(&center.1) {
            return Err(MatchError::config(format!(
                "ring center dec must lie in [-90, 90], got {}",
                center.1
            )));
        }

        let dec_max = (center.1 - half_width_dec - margin)
            .abs()
            .max((center.1 + half_width_dec + margin).abs());
        Ok(Self {
            shape: TileShape::Ring {
                center_ra: center.0,
                center_dec: center.1,
                half_width_ra,
                half_width_dec,
            },
            margin,
            ra_margin: ra_margin_at(margin, dec_max),
        })
    }

    pub fn shape(&self) -> TileShape {
        self.shape
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Right-ascension width of the halo on each side (ring tiles).
    pub fn ra_margin(&self) -> f64 {
        self.ra_margin
    }

    pub fn center(&self) -> (f64, f64) {
        match self.shape {
            TileShape::Polar { pole: Pole::North, .. } => (180.0, 90.0),
            TileShape::Polar { pole: Pole::South, .. } => (180.0, -90.0),
            TileShape::Ring {
                center_ra,
                center_dec,
                ..
            } => (center_ra, center_dec),
        }
    }

    /// Largest angular distance from the center to any point admitted into
    /// the tile, halo included.
    pub fn max_radius(&self) -> f64 {
        match self.shape {
            TileShape::Polar { dec_bound, .. } => 90.0 - dec_bound + self.margin + EDGE_SLACK,
            TileShape::Ring {
                center_ra,
                center_dec,
                half_width_ra,
                half_width_dec,
            } => {
                let m = self.margin + EDGE_SLACK;
                let ra_far = center_ra + (half_width_ra + self.ra_margin + EDGE_SLACK).min(180.0);
                let top = (center_dec + half_width_dec + m).min(90.0);
                let bottom = (center_dec - half_width_dec - m).max(-90.0);
                let d1 = great_circle_distance(center_ra, center_dec, ra_far, top);
                let d2 = great_circle_distance(center_ra, center_dec, ra_far, bottom);
                d1.max(d2)
            }
        }
    }

    /// `true` if the point lies in the un-inflated region. `ra` must be
    /// wrapped into `[0, 360)`.
    pub fn contains(&self, ra: f64, dec: f64) -> bool {
        match self.shape {
            TileShape::Polar {
                pole: Pole::North,
                dec_bound,
            } => dec > dec_bound,
            TileShape::Polar {
                pole: Pole::South,
                dec_bound,
            } => dec < -dec_bound,
            TileShape::Ring {
                center_ra,
                center_dec,
                half_width_ra,
                half_width_dec,
            } => {
                ra_difference(ra, center_ra) <= half_width_ra + EDGE_SLACK
                    && (dec - center_dec).abs() <= half_width_dec + EDGE_SLACK
            }
        }
    }

    /// `true` if the point lies in the halo: outside (or on) an edge of the
    /// region but within the margin of it. `ra` must be wrapped into `[0, 360)`.
    ///
    /// The outer bound is widened by [`EDGE_SLACK`] like the region itself.
    pub fn boundary_test(&self, ra: f64, dec: f64) -> bool {
        let m = self.margin + EDGE_SLACK;
        match self.shape {
            TileShape::Polar {
                pole: Pole::North,
                dec_bound,
            } => dec <= dec_bound && dec >= dec_bound - m,
            TileShape::Polar {
                pole: Pole::South,
                dec_bound,
            } => dec >= -dec_bound && dec <= -dec_bound + m,
            TileShape::Ring {
                center_ra,
                center_dec,
                half_width_ra,
                half_width_dec,
            } => {
                let ra_diff = ra_difference(ra, center_ra);
                let dec_diff = (dec - center_dec).abs();
                let ra_reach = half_width_ra + self.ra_margin + EDGE_SLACK;
                let ra_edge = ra_diff >= half_width_ra
                    && ra_diff <= ra_reach
                    && dec_diff <= half_width_dec + m;
                let dec_edge = dec_diff >= half_width_dec
                    && dec_diff <= half_width_dec + m
                    && ra_diff <= ra_reach;
                ra_edge || dec_edge
            }
        }
    }
}

fn check_margin(margin: f64) -> Result<()> {
    if margin.is_finite() && margin >= 0.0 {
        Ok(())
    } else {
        Err(MatchError::config(format!(
            "margin must be finite and non-negative, got {margin}"
        )))
    }
}

/// RA half-span within `margin` of a meridian, for points up to `|dec_max|`.
///
/// A point at declination `dec` and RA offset `dra` from a meridian is
/// `asin(cos(dec) * sin(dra))` away from it, so the span is
/// `asin(sin(margin) / cos(dec_max))`. Returns 180 when the halo covers the
/// whole ring.
fn ra_margin_at(margin: f64, dec_max: f64) -> f64 {
    if margin == 0.0 {
        return 0.0;
    }
    if dec_max >= 90.0 || margin >= 90.0 {
        return 180.0;
    }
    let s = margin.to_radians().sin() / dec_max.to_radians().cos();
    if s >= 1.0 {
        180.0
    } else {
        s.asin().to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_radius_includes_margin() {
        let cfg = TileConfig::polar(Pole::North, 60.0, 2.0).unwrap();
        assert!((cfg.max_radius() - 32.0).abs() < 1e-6);
        assert_eq!(cfg.center(), (180.0, 90.0));
    }

    #[test]
    fn polar_membership() {
        let north = TileConfig::polar(Pole::North, 60.0, 1.0).unwrap();
        assert!(north.contains(0.0, 60.5));
        assert!(!north.contains(0.0, 60.0));
        assert!(north.boundary_test(0.0, 60.0));
        assert!(north.boundary_test(0.0, 59.0));
        assert!(!north.boundary_test(0.0, 58.9));
        assert!(!north.boundary_test(0.0, 61.0));

        let south = TileConfig::polar(Pole::South, 60.0, 1.0).unwrap();
        assert!(south.contains(10.0, -89.0));
        assert!(south.boundary_test(10.0, -59.5));
        assert!(!south.boundary_test(10.0, -58.5));
    }

    #[test]
    fn ring_radius_uses_far_corner() {
        let cfg = TileConfig::ring((30.0, 30.0), 30.0, 30.0, 0.0).unwrap();
        // The equatorward corner is farther than the poleward one
        let bottom = great_circle_distance(30.0, 30.0, 60.0, 0.0);
        let top = great_circle_distance(30.0, 30.0, 60.0, 60.0);
        assert!(bottom > top);
        assert!((cfg.max_radius() - bottom).abs() < 1e-6);
    }

    #[test]
    fn ring_margin_widens_with_declination() {
        let low = TileConfig::ring((30.0, 0.0), 30.0, 10.0, 1.0).unwrap();
        let high = TileConfig::ring((30.0, 60.0), 30.0, 10.0, 1.0).unwrap();
        assert!(low.ra_margin() > 1.0 && low.ra_margin() < 1.1);
        // dec_max = 71
        let expected = (1f64.to_radians().sin() / 71f64.to_radians().cos()).asin().to_degrees();
        assert!((high.ra_margin() - expected).abs() < 1e-12);
        assert!(high.ra_margin() > 3.0);
    }

    #[test]
    fn ring_membership_wraps_ra() {
        let cfg = TileConfig::ring((330.0, 30.0), 30.0, 30.0, 1.0).unwrap();
        assert!(cfg.contains(359.9, 30.0));
        assert!(cfg.contains(0.0, 30.0));
        assert!(!cfg.contains(0.1, 30.0));
        assert!(cfg.boundary_test(0.1, 30.0));
        assert!(cfg.boundary_test(0.0, 30.0));
        assert!(!cfg.boundary_test(20.0, 30.0));
        // Below the bottom edge
        assert!(cfg.boundary_test(330.0, -0.5));
        assert!(!cfg.boundary_test(330.0, -1.5));
        // Interior points are not halo points
        assert!(!cfg.boundary_test(330.0, 30.0));
    }

    #[test]
    fn edges_tolerate_round_off() {
        let hw = 180.0 / 7.0;
        let cfg = TileConfig::ring((hw * 3.0, 0.0), hw, 10.0, 0.0).unwrap();
        let edge = 360.0 / 7.0 * 2.0;
        assert!(cfg.contains(edge + 1e-12, 10.0 + 1e-12));
        assert!(!cfg.contains(edge + 1e-6, 0.0));
        assert!(!cfg.contains(edge, 10.0 + 1e-6));
    }

    #[test]
    fn invalid_configs() {
        assert!(TileConfig::polar(Pole::North, 0.0, 1.0).is_err());
        assert!(TileConfig::polar(Pole::North, 90.0, 1.0).is_err());
        assert!(TileConfig::polar(Pole::South, 60.0, -1.0).is_err());
        assert!(TileConfig::ring((0.0, 0.0), 0.0, 10.0, 1.0).is_err());
        assert!(TileConfig::ring((0.0, 0.0), 10.0, -1.0, 1.0).is_err());
        assert!(TileConfig::ring((0.0, 0.0), 10.0, 10.0, f64::NAN).is_err());
    }

    #[test]
    fn ra_margin_saturates() {
        assert_eq!(ra_margin_at(0.0, 80.0), 0.0);
        assert_eq!(ra_margin_at(5.0, 90.0), 180.0);
        assert_eq!(ra_margin_at(20.0, 85.0), 180.0);
    }
}
