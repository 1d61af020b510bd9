use super::shape::{TileConfig, TileShape};

/// One cell of the sky partition, populated with catalog row indices.
///
/// `central` holds the rows whose un-inflated region is this tile; each row
/// is central to exactly one tile. `boundary` holds rows from neighbouring
/// tiles that fall in this tile's halo.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    id: usize,
    config: TileConfig,
    max_radius: f64,
    pub(crate) central: Vec<usize>,
    pub(crate) boundary: Vec<usize>,
}

impl Tile {
    pub(crate) fn new(id: usize, config: TileConfig) -> Self {
        Self {
            id,
            config,
            max_radius: config.max_radius(),
            central: Vec::new(),
            boundary: Vec::new(),
        }
    }

    /// A copy of this tile with no members.
    pub(crate) fn empty_copy(&self) -> Self {
        Self {
            central: Vec::new(),
            boundary: Vec::new(),
            ..self.clone()
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// `(ra, dec)` of the tile center, degrees.
    pub fn center(&self) -> (f64, f64) {
        self.config.center()
    }

    /// Farthest angular distance from the center to any admitted point.
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    pub fn shape(&self) -> TileShape {
        self.config.shape()
    }

    pub fn central(&self) -> &[usize] {
        &self.central
    }

    pub fn boundary(&self) -> &[usize] {
        &self.boundary
    }

    /// Central rows followed by boundary rows.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.central.iter().chain(self.boundary.iter()).copied()
    }

    /// Total number of member rows, halo included.
    pub fn len(&self) -> usize {
        self.central.len() + self.boundary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.central.is_empty() && self.boundary.is_empty()
    }
}
