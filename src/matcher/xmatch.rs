use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::{debug, info};

use super::{
    check_tiles_agree, check_tolerance, project_rows, within_tolerance, LocalFrame, MatchConfig,
    PlanarIndex,
};
use crate::catalog::{Catalog, CatalogSource};
use crate::errors::Result;
use crate::match_table::MatchTable;
use crate::spherical::great_circle_distance;
use crate::tiling::{Tile, TileGenerator};

/// Catalog-A row → matched catalog-B rows. Rows without matches are absent.
pub type MatchMap = BTreeMap<usize, BTreeSet<usize>>;

/// Merge two partial match maps, taking the set union for shared keys.
///
/// Associative and commutative, so partial results can be folded in any
/// order.
pub fn merge_matches(mut a: MatchMap, mut b: MatchMap) -> MatchMap {
    if a.len() < b.len() {
        std::mem::swap(&mut a, &mut b);
    }
    for (key, values) in b {
        a.entry(key).or_default().extend(values);
    }
    a
}

/// Cross-match two catalogs with the default configuration.
///
/// Every row of `a` is paired with every row of `b` within `tolerance`
/// degrees.
///
/// ```
/// use skymatch::xmatch;
///
/// let a = vec![[10.0, 10.0], [80.0, 40.0]];
/// let b = vec![[10.0, 10.05], [200.0, 0.0], [9.98, 10.0]];
/// let table = xmatch(&a, &b, 0.1).unwrap();
/// assert_eq!(table.matches_of(0), vec![0, 2]);
/// assert!(table.matches_of(1).is_empty());
/// ```
pub fn xmatch<A: CatalogSource, B: CatalogSource>(a: A, b: B, tolerance: f64) -> Result<MatchTable> {
    xmatch_with_config(a, b, tolerance, &MatchConfig::xmatch_default())
}

/// Cross-match two catalogs with an explicit configuration.
pub fn xmatch_with_config<A: CatalogSource, B: CatalogSource>(
    a: A,
    b: B,
    tolerance: f64,
    config: &MatchConfig,
) -> Result<MatchTable> {
    check_tolerance(tolerance)?;
    config.validate()?;
    let catalog_a = Catalog::new(a)?;
    let catalog_b = Catalog::new(b)?;

    let generator = TileGenerator::from_layout(&config.layout, config.margin(tolerance))?;
    let tiles_a = generator.distribute(&catalog_a)?;
    let tiles_b = generator.distribute(&catalog_b)?;
    check_tiles_agree(&tiles_a, &tiles_b)?;

    let matches = if config.parallel {
        tiles_a
            .par_iter()
            .zip(tiles_b.par_iter())
            .map(|(ta, tb)| tile_matches(&catalog_a, ta, &catalog_b, tb, tolerance, config))
            .reduce(MatchMap::new, merge_matches)
    } else {
        tiles_a
            .iter()
            .zip(&tiles_b)
            .map(|(ta, tb)| tile_matches(&catalog_a, ta, &catalog_b, tb, tolerance, config))
            .fold(MatchMap::new(), merge_matches)
    };

    info!(
        "Cross-match: {} x {} points, {} matched, {} pairs (tolerance {}°)",
        catalog_a.len(),
        catalog_b.len(),
        matches.len(),
        matches.values().map(BTreeSet::len).sum::<usize>(),
        tolerance
    );
    Ok(MatchTable::new(catalog_a, catalog_b, tolerance, matches))
}

/// Matches of the A rows central to a tile among all B members of the same tile.
fn tile_matches(
    catalog_a: &Catalog,
    tile_a: &Tile,
    catalog_b: &Catalog,
    tile_b: &Tile,
    tolerance: f64,
    config: &MatchConfig,
) -> MatchMap {
    let mut matches = MatchMap::new();
    if tile_a.central().is_empty() || tile_b.is_empty() {
        return matches;
    }

    let (center_ra, center_dec) = tile_a.center();
    let frame = LocalFrame::new(center_ra, center_dec);
    let members_b: Vec<usize> = tile_b.indices().collect();
    let index = PlanarIndex::new(&project_rows(catalog_b, &members_b, &frame));
    let queries = project_rows(catalog_a, tile_a.central(), &frame);

    let radius = config.padded_radius(tolerance, tile_a.max_radius());

    for (&row_a, query) in tile_a.central().iter().zip(&queries) {
        let (ra_a, dec_a) = catalog_a.point(row_a);
        for pos in index.within(query, radius) {
            let row_b = members_b[pos];
            let (ra_b, dec_b) = catalog_b.point(row_b);
            if within_tolerance(great_circle_distance(ra_a, dec_a, ra_b, dec_b), tolerance) {
                matches.entry(row_a).or_default().insert(row_b);
            }
        }
    }

    debug!(
        "Tile {}: {} queries against {} members ({} distinct), search radius {:.6}°, {} matched",
        tile_a.id(),
        queries.len(),
        members_b.len(),
        index.distinct(),
        radius,
        matches.len()
    );
    matches
}
