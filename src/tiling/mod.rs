//! Sky partitioning with overlapping halos.
//!
//! The sphere is cut into two polar caps plus declination bands of equal-width
//! right-ascension sectors. Every catalog row is *central* to exactly one
//! tile, and is copied into the *boundary* set of every other tile whose
//! edge lies within the margin. With a margin at least as large as the match
//! tolerance, any two rows closer than the tolerance end up together in at
//! least one tile, so tiles can be matched independently.
//!
//! # Layouts
//!
//! | Preset | Polar cap | Bands (sectors per band) | Tiles |
//! |--------|-----------|--------------------------|-------|
//! | [`TileLayout::grid`] | ±60° | 6, 6 | 14 |
//! | [`TileLayout::dense`] | ±75° | 6, 12, 12, 6 | 38 |
//! | [`TileLayout::super_dense`] | ±80° | 24 × 10 | 242 |

mod generator;
mod shape;
mod tile;

pub use generator::TileGenerator;
pub use shape::{Pole, TileConfig, TileShape, EDGE_SLACK};
pub use tile::Tile;

/// Symmetric tiling: caps beyond `±polar_dec` and one declination band per
/// entry of `rings`, each split into that many RA sectors.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayout {
    /// Declination bound of the polar caps, degrees.
    pub polar_dec: f64,
    /// Number of RA sectors per band, north to south.
    pub rings: Vec<usize>,
}

impl TileLayout {
    pub fn grid() -> Self {
        Self {
            polar_dec: 60.0,
            rings: vec![6, 6],
        }
    }

    pub fn dense() -> Self {
        Self {
            polar_dec: 75.0,
            rings: vec![6, 12, 12, 6],
        }
    }

    pub fn super_dense() -> Self {
        Self {
            polar_dec: 80.0,
            rings: vec![24; 10],
        }
    }

    /// Number of tiles the layout produces.
    pub fn num_tiles(&self) -> usize {
        2 + self.rings.iter().sum::<usize>()
    }
}

impl Default for TileLayout {
    fn default() -> Self {
        Self::grid()
    }
}
