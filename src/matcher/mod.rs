//! Tile-local matching engine.
//!
//! Both entry points share one per-tile pipeline:
//!
//! 1. Rotate the tile's members so the tile center lands on `(180°, 0°)`
//!    ([`LocalFrame`]).
//! 2. Pad the search radius: `r = t * (1 + e) * safety`, where `e` is the
//!    worst relative planar distance error at the tile's radius
//!    ([`error_model`](crate::error_model)).
//! 3. Search candidates within `r` in a planar k-d tree over the rotated
//!    `[ra, dec]`.
//! 4. Keep candidates whose exact great-circle distance is below the
//!    tolerance, or equal to it up to round-off.
//!
//! Only rows central to a tile are used as queries. With a margin of at least
//! the tolerance, the partner of any true pair is a member (central or halo)
//! of the query row's central tile, so each pair is found without scanning
//! halo-only rows.
//!
//! Tiles are independent and run on the rayon thread pool unless
//! [`MatchConfig::parallel`] is cleared.

mod fof;
mod frame;
mod xmatch;

pub use fof::{fof, fof_with_config};
pub use frame::{LocalFrame, REFERENCE_POINT};
pub use xmatch::{merge_matches, xmatch, xmatch_with_config, MatchMap};

use std::collections::hash_map::{Entry, HashMap};

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::catalog::Catalog;
use crate::error_model::{max_relative_error, DEFAULT_ERROR_SAMPLES};
use crate::errors::{MatchError, Result};
use crate::tiling::{Tile, TileLayout};

/// Safety factor applied to friends-of-friends search radii.
pub const FOF_SAFETY_FACTOR: f64 = 1.05;

/// Safety factor applied to cross-match search radii.
pub const XMATCH_SAFETY_FACTOR: f64 = 1.01;

/// Relative and absolute slack when comparing a distance to the tolerance.
pub const TOLERANCE_SLACK: f64 = 1e-8;

/// In-plane angle (radians) applied to local coordinates before indexing.
const INDEX_SKEW: f64 = 0.5;

/// Planar index over rotated `[ra, dec]`; queries yield positions in the
/// slice it was built from.
///
/// A k-d bucket cannot be split when all its items share a value on the
/// split axis. Coincident positions are therefore stored once, and the
/// plane is turned by [`INDEX_SKEW`] so rows on a common meridian or
/// parallel do not line up with a tree axis. Turning preserves distances.
pub(crate) struct PlanarIndex {
    tree: ImmutableKdTree<f64, u64, 2, 32>,
    /// Input positions behind each tree entry.
    slots: Vec<Vec<usize>>,
    sin_cos: (f64, f64),
}

impl PlanarIndex {
    /// `points` must not be empty.
    pub(crate) fn new(points: &[[f64; 2]]) -> Self {
        let sin_cos = INDEX_SKEW.sin_cos();
        let mut seen: HashMap<[u64; 2], usize> = HashMap::with_capacity(points.len());
        let mut unique: Vec<[f64; 2]> = Vec::with_capacity(points.len());
        let mut slots: Vec<Vec<usize>> = Vec::with_capacity(points.len());

        for (pos, point) in points.iter().enumerate() {
            let p = skew(point, sin_cos);
            match seen.entry([p[0].to_bits(), p[1].to_bits()]) {
                Entry::Occupied(slot) => slots[*slot.get()].push(pos),
                Entry::Vacant(slot) => {
                    slot.insert(unique.len());
                    unique.push(p);
                    slots.push(vec![pos]);
                }
            }
        }

        Self {
            tree: ImmutableKdTree::new_from_slice(&unique),
            slots,
            sin_cos,
        }
    }

    /// Number of distinct positions in the tree.
    pub(crate) fn distinct(&self) -> usize {
        self.slots.len()
    }

    /// Positions within `radius` of `query`, in no particular order.
    pub(crate) fn within(&self, query: &[f64; 2], radius: f64) -> impl Iterator<Item = usize> + '_ {
        let q = skew(query, self.sin_cos);
        self.tree
            .within_unsorted::<SquaredEuclidean>(&q, radius * radius)
            .into_iter()
            .flat_map(move |n| self.slots[n.item as usize].iter().copied())
    }
}

/// Turn a point about the origin; `+ 0.0` folds `-0.0` onto `0.0`.
fn skew(p: &[f64; 2], (sin, cos): (f64, f64)) -> [f64; 2] {
    [
        p[0] * cos - p[1] * sin + 0.0,
        p[0] * sin + p[1] * cos + 0.0,
    ]
}

/// Tuning knobs shared by [`fof_with_config`] and [`xmatch_with_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Sky partition.
    pub layout: TileLayout,
    /// Margin as a multiple of the tolerance (>= 1).
    pub margin_factor: f64,
    /// Extra padding of the planar search radius (>= 1).
    pub safety_factor: f64,
    /// Bearings sampled by the distance-error model.
    pub error_samples: usize,
    /// Process tiles on the rayon thread pool.
    pub parallel: bool,
}

impl MatchConfig {
    pub fn fof_default() -> Self {
        Self {
            layout: TileLayout::default(),
            margin_factor: 2.0,
            safety_factor: FOF_SAFETY_FACTOR,
            error_samples: DEFAULT_ERROR_SAMPLES,
            parallel: true,
        }
    }

    pub fn xmatch_default() -> Self {
        Self {
            safety_factor: XMATCH_SAFETY_FACTOR,
            ..Self::fof_default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.margin_factor.is_finite() && self.margin_factor >= 1.0) {
            return Err(MatchError::config(format!(
                "margin_factor must be at least 1, got {}",
                self.margin_factor
            )));
        }
        if !(self.safety_factor.is_finite() && self.safety_factor >= 1.0) {
            return Err(MatchError::config(format!(
                "safety_factor must be at least 1, got {}",
                self.safety_factor
            )));
        }
        if self.error_samples == 0 {
            return Err(MatchError::config("error_samples must be positive"));
        }
        Ok(())
    }

    /// Tile margin for a tolerance.
    pub fn margin(&self, tolerance: f64) -> f64 {
        self.margin_factor * tolerance
    }

    /// Planar search radius for a tile reaching `max_radius` degrees from
    /// its center.
    pub fn padded_radius(&self, tolerance: f64, max_radius: f64) -> f64 {
        let (error, _) = max_relative_error(max_radius, tolerance, self.error_samples);
        tolerance * (1.0 + error) * self.safety_factor
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::fof_default()
    }
}

/// `true` if `distance` is below `tolerance` or equal to it up to round-off.
pub fn within_tolerance(distance: f64, tolerance: f64) -> bool {
    distance < tolerance || (distance - tolerance).abs() <= TOLERANCE_SLACK * (1.0 + tolerance)
}

pub(crate) fn check_tolerance(tolerance: f64) -> Result<()> {
    if tolerance.is_finite() && tolerance > 0.0 {
        Ok(())
    } else {
        Err(MatchError::InvalidTolerance(tolerance))
    }
}

/// Rotated coordinates of `rows` in the tile's local frame.
pub(crate) fn project_rows(catalog: &Catalog, rows: &[usize], frame: &LocalFrame) -> Vec<[f64; 2]> {
    rows.iter()
        .map(|&i| {
            let (ra, dec) = catalog.point(i);
            frame.project(ra, dec)
        })
        .collect()
}

/// Tiles built for two catalogs must describe the same partition.
pub(crate) fn check_tiles_agree(a: &[Tile], b: &[Tile]) -> Result<()> {
    if a.len() != b.len() {
        return Err(MatchError::TileMismatch {
            tile: a.len().min(b.len()),
            message: format!("tile counts differ ({} vs {})", a.len(), b.len()),
        });
    }
    for (ta, tb) in a.iter().zip(b) {
        if ta.id() != tb.id() || ta.center() != tb.center() {
            return Err(MatchError::TileMismatch {
                tile: ta.id(),
                message: format!("centers differ ({:?} vs {:?})", ta.center(), tb.center()),
            });
        }
        if ta.max_radius() != tb.max_radius() {
            return Err(MatchError::TileMismatch {
                tile: ta.id(),
                message: format!(
                    "max radii differ ({} vs {})",
                    ta.max_radius(),
                    tb.max_radius()
                ),
            });
        }
    }
    Ok(())
}
