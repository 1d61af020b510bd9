use tracing::{debug, info};

use super::shape::{Pole, TileConfig, TileShape};
use super::tile::Tile;
use super::TileLayout;
use crate::catalog::Catalog;
use crate::errors::{MatchError, Result};
use crate::spherical::wrap_ra;

/// Builds a fixed sky partition and assigns catalog rows to it.
///
/// Tile ids follow configuration order: the two polar caps first, then the
/// ring tiles in the order they were added.
///
/// ```
/// use skymatch::tiling::TileGenerator;
///
/// let generator = TileGenerator::grid(0.0).unwrap();
/// assert_eq!(generator.tiles().len(), 14);
/// assert_eq!(generator.central_id(15.0, 30.0), Some(2));
/// assert_eq!(generator.central_id(15.0, -30.0), Some(8));
/// ```
#[derive(Debug, Clone)]
pub struct TileGenerator {
    margin: f64,
    polar: Vec<TileConfig>,
    rings: Vec<TileConfig>,
    tiles: Vec<Tile>,
}

impl TileGenerator {
    /// Empty generator; add configs, then call [`generate`](Self::generate).
    pub fn new(margin: f64) -> Result<Self> {
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(MatchError::config(format!(
                "margin must be finite and non-negative, got {margin}"
            )));
        }
        Ok(Self {
            margin,
            polar: Vec::new(),
            rings: Vec::new(),
            tiles: Vec::new(),
        })
    }

    /// Generator with a symmetric layout already generated.
    pub fn from_layout(layout: &TileLayout, margin: f64) -> Result<Self> {
        let mut generator = Self::new(margin)?;
        generator.set_symmetric_rings(layout.polar_dec, &layout.rings)?;
        Ok(generator)
    }

    /// Two caps beyond ±60° and two bands of six sectors (14 tiles).
    pub fn grid(margin: f64) -> Result<Self> {
        Self::from_layout(&TileLayout::grid(), margin)
    }

    /// Caps beyond ±75° and bands of 6, 12, 12 and 6 sectors (38 tiles).
    pub fn dense(margin: f64) -> Result<Self> {
        Self::from_layout(&TileLayout::dense(), margin)
    }

    /// Caps beyond ±80° and ten bands of 24 sectors (242 tiles).
    pub fn super_dense(margin: f64) -> Result<Self> {
        Self::from_layout(&TileLayout::super_dense(), margin)
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Add a polar cap covering `|dec| > dec_bound` around `pole`.
    pub fn add_polar_config(&mut self, pole: Pole, dec_bound: f64) -> Result<()> {
        self.polar.push(TileConfig::polar(pole, dec_bound, self.margin)?);
        self.tiles.clear();
        Ok(())
    }

    /// Add a ring rectangle centered at `(ra, dec)` with `(ra, dec)` half-widths.
    pub fn add_ring_config(&mut self, center: (f64, f64), half_width: (f64, f64)) -> Result<()> {
        self.rings.push(TileConfig::ring(
            center,
            half_width.0,
            half_width.1,
            self.margin,
        )?);
        self.tiles.clear();
        Ok(())
    }

    /// Add two caps beyond `±polar_dec` and `rings.len()` equal declination
    /// bands between them, band `i` split into `rings[i]` equal RA sectors
    /// starting at RA 0. Bands run from north to south. Generates the tiles.
    pub fn set_symmetric_rings(&mut self, polar_dec: f64, rings: &[usize]) -> Result<()> {
        if !(polar_dec > 0.0 && polar_dec < 90.0) {
            return Err(MatchError::config(format!(
                "polar_dec must lie in (0, 90), got {polar_dec}"
            )));
        }
        if rings.is_empty() || rings.contains(&0) {
            return Err(MatchError::config(format!(
                "every declination band needs at least one sector, got {rings:?}"
            )));
        }

        self.add_polar_config(Pole::North, polar_dec)?;
        self.add_polar_config(Pole::South, polar_dec)?;

        let n_dec = rings.len() as f64;
        let half_dec = polar_dec / n_dec;
        for (i, &n_ra) in rings.iter().enumerate() {
            let center_dec = polar_dec - half_dec * (1.0 + 2.0 * i as f64);
            let half_ra = 180.0 / n_ra as f64;
            for j in 0..n_ra {
                let center_ra = half_ra * (1.0 + 2.0 * j as f64);
                self.add_ring_config((center_ra, center_dec), (half_ra, half_dec))?;
            }
        }
        self.generate()
    }

    /// Build the (empty) tiles from the configs added so far.
    ///
    /// Requires exactly one north and one south polar config.
    pub fn generate(&mut self) -> Result<()> {
        let north = self.polar.iter().filter(|c| is_pole(c, Pole::North)).count();
        let south = self.polar.iter().filter(|c| is_pole(c, Pole::South)).count();
        if self.polar.len() != 2 || north != 1 || south != 1 {
            return Err(MatchError::config(format!(
                "expected one north and one south polar tile, got {north} north and {south} south"
            )));
        }

        self.tiles = self
            .configs()
            .enumerate()
            .map(|(id, config)| Tile::new(id, *config))
            .collect();

        info!(
            "Generated {} tiles ({} polar, {} ring) with margin {:.6}°",
            self.tiles.len(),
            self.polar.len(),
            self.rings.len(),
            self.margin
        );
        Ok(())
    }

    /// All configs in tile-id order.
    pub fn configs(&self) -> impl Iterator<Item = &TileConfig> + '_ {
        self.polar.iter().chain(self.rings.iter())
    }

    /// Generated tiles, without members.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: usize) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Id of the tile whose un-inflated region contains the point.
    ///
    /// Shared edges go to the later tile in id order.
    pub fn central_id(&self, ra: f64, dec: f64) -> Option<usize> {
        let ra = wrap_ra(ra);
        self.configs()
            .enumerate()
            .filter(|(_, c)| c.contains(ra, dec))
            .map(|(id, _)| id)
            .last()
    }

    /// Ids of the other tiles whose halo contains the point, ascending.
    pub fn boundary_ids(&self, ra: f64, dec: f64) -> Vec<usize> {
        let ra = wrap_ra(ra);
        let central = self.central_id(ra, dec);
        self.halo_ids(ra, dec, central)
    }

    fn halo_ids(&self, ra: f64, dec: f64, central: Option<usize>) -> Vec<usize> {
        self.configs()
            .enumerate()
            .filter(|&(id, c)| Some(id) != central && c.boundary_test(ra, dec))
            .map(|(id, _)| id)
            .collect()
    }

    /// Assign every catalog row to its central tile and to every tile whose
    /// halo it lies in. Returns freshly populated copies of the tiles; the
    /// generator itself is unchanged and can distribute further catalogs.
    pub fn distribute(&self, catalog: &Catalog) -> Result<Vec<Tile>> {
        if self.tiles.is_empty() {
            return Err(MatchError::config("tiles have not been generated"));
        }

        let mut tiles: Vec<Tile> = self.tiles.iter().map(Tile::empty_copy).collect();
        for index in catalog.indexes() {
            let (ra, dec) = catalog.point(index);
            let ra = wrap_ra(ra);
            let central = self
                .central_id(ra, dec)
                .ok_or(MatchError::UncoveredPoint { index, ra, dec })?;
            tiles[central].central.push(index);
            for id in self.halo_ids(ra, dec, Some(central)) {
                tiles[id].boundary.push(index);
            }
        }

        for tile in &tiles {
            debug!(
                "Tile {}: {} central, {} boundary, max radius {:.4}°",
                tile.id(),
                tile.central().len(),
                tile.boundary().len(),
                tile.max_radius()
            );
        }
        let halo: usize = tiles.iter().map(|t| t.boundary().len()).sum();
        info!(
            "Distributed {} points over {} tiles ({} halo copies)",
            catalog.len(),
            tiles.len(),
            halo
        );
        Ok(tiles)
    }
}

fn is_pole(config: &TileConfig, pole: Pole) -> bool {
    matches!(config.shape(), TileShape::Polar { pole: p, .. } if p == pole)
}
