//! # skymatch
//!
//! **Cross-matching and friends-of-friends clustering of celestial catalogs**
//! written in Rust.
//!
//! Given one or two catalogs of sky positions `(ra, dec)` in degrees,
//! `skymatch` finds every pair of objects closer than an angular tolerance.
//! Exact great-circle distance is the final judge, so no true pair is missed
//! at the poles or across the RA 0/360 seam.
//!
//! ## Features
//!
//! - **Friends-of-friends** — transitive grouping of a single catalog ([`fof`])
//! - **Cross-match** — every catalog-B neighbour of every catalog-A object ([`xmatch`])
//! - **Tiled** — the sky is split into overlapping tiles that are matched
//!   independently, in parallel with [rayon](https://docs.rs/rayon)
//! - **Planar search** — each tile is rotated onto the equator and searched with a
//!   [kiddo](https://docs.rs/kiddo) k-d tree, with the radius padded by a
//!   numerical bound on the flattening error
//! - **Flexible input** — coordinate arrays, tuples, or named-column tables
//!   (including CSV files) with automatic `ra`/`dec` column detection
//!
//! ## Example
//!
//! ```
//! use skymatch::{fof, xmatch};
//!
//! let stars = vec![[10.0, 20.0], [10.001, 20.0], [10.002, 20.001], [250.0, -40.0]];
//!
//! // Groups of objects linked by separations of at most 5 arcsec
//! let grouping = fof(&stars, 5.0 / 3600.0).unwrap();
//! assert_eq!(grouping.group_sizes(), vec![3, 1]);
//!
//! // Counterparts in a second catalog within 10 arcsec
//! let other = vec![[250.0, -40.001], [10.0, 20.002]];
//! let table = xmatch(&stars, &other, 10.0 / 3600.0).unwrap();
//! assert_eq!(table.matches_of(3), vec![0]);
//! assert_eq!(table.pairs(), vec![(0, 1), (1, 1), (2, 1), (3, 0)]);
//! ```
//!
//! ## Algorithm overview
//!
//! 1. **Tiling** — two polar caps plus declination bands of RA sectors; every
//!    object is central to one tile and copied into the halo of each tile whose
//!    edge lies within the margin (twice the tolerance by default)
//! 2. **Local flattening** — each tile is rotated so its center lands on
//!    `(180°, 0°)`, away from the poles and the RA seam
//! 3. **Candidate search** — planar k-d tree queries with a safety-padded radius
//! 4. **Confirmation** — exact great-circle distance against the tolerance
//! 5. **Merge** — union-find for groups, set-union of partial maps for matches
//!
//! Logging goes through [tracing](https://docs.rs/tracing); install a
//! subscriber to see per-tile progress.
//!

pub mod catalog;
pub mod disjoint_set;
pub mod error_model;
pub mod errors;
mod grouping;
mod match_table;
pub mod matcher;
pub mod spherical;
pub mod tiling;

pub use catalog::{Catalog, CatalogSource, Column, ResolvedCoordinates, SideData, Table};
pub use disjoint_set::DisjointSet;
pub use errors::{CoordinateKind, MatchError, Result};
pub use grouping::Grouping;
pub use match_table::MatchTable;
pub use matcher::{
    fof, fof_with_config, merge_matches, xmatch, xmatch_with_config, MatchConfig, MatchMap,
};
pub use tiling::{Tile, TileGenerator, TileLayout};

// Sky positions are kept in 64-bit floats: tolerances of a few
// milliarcseconds are below 32-bit resolution at RA ~ 360.
pub type Vector3 = nalgebra::Vector3<f64>;
