use rayon::prelude::*;
use tracing::{debug, info};

use super::{check_tolerance, project_rows, within_tolerance, LocalFrame, MatchConfig, PlanarIndex};
use crate::catalog::{Catalog, CatalogSource};
use crate::disjoint_set::DisjointSet;
use crate::errors::Result;
use crate::grouping::Grouping;
use crate::spherical::great_circle_distance;
use crate::tiling::{Tile, TileGenerator};

/// Friends-of-friends clustering with the default configuration.
///
/// Two rows are friends when their great-circle distance is at most
/// `tolerance` degrees; groups are the transitive closure of friendship.
///
/// ```
/// use skymatch::fof;
///
/// let points = vec![[10.0, 10.0], [10.5, 10.0], [11.0, 10.0], [50.0, -20.0]];
/// let grouping = fof(&points, 0.6).unwrap();
/// assert_eq!(grouping.groups(), &[vec![0, 1, 2], vec![3]]);
/// ```
pub fn fof<S: CatalogSource>(source: S, tolerance: f64) -> Result<Grouping> {
    fof_with_config(source, tolerance, &MatchConfig::fof_default())
}

/// Friends-of-friends clustering with an explicit configuration.
pub fn fof_with_config<S: CatalogSource>(
    source: S,
    tolerance: f64,
    config: &MatchConfig,
) -> Result<Grouping> {
    check_tolerance(tolerance)?;
    config.validate()?;
    let catalog = Catalog::new(source)?;

    let generator = TileGenerator::from_layout(&config.layout, config.margin(tolerance))?;
    let tiles = generator.distribute(&catalog)?;

    let pair_lists: Vec<Vec<(usize, usize)>> = if config.parallel {
        tiles
            .par_iter()
            .map(|tile| tile_pairs(&catalog, tile, tolerance, config))
            .collect()
    } else {
        tiles
            .iter()
            .map(|tile| tile_pairs(&catalog, tile, tolerance, config))
            .collect()
    };

    let mut ds = DisjointSet::new(catalog.len());
    let mut n_pairs = 0;
    for pairs in pair_lists {
        n_pairs += pairs.len();
        for (i, j) in pairs {
            ds.union(i, j);
        }
    }
    let groups = ds.get_groups();

    info!(
        "Friends-of-friends: {} points, {} confirmed pairs, {} groups (tolerance {}°)",
        catalog.len(),
        n_pairs,
        groups.len(),
        tolerance
    );
    Ok(Grouping::new(catalog, tolerance, groups))
}

/// Confirmed pairs `(i, j)` involving at least one row central to `tile`.
///
/// A pair of two central rows is reported once.
fn tile_pairs(
    catalog: &Catalog,
    tile: &Tile,
    tolerance: f64,
    config: &MatchConfig,
) -> Vec<(usize, usize)> {
    if tile.central().is_empty() {
        return Vec::new();
    }

    let (center_ra, center_dec) = tile.center();
    let frame = LocalFrame::new(center_ra, center_dec);
    let members: Vec<usize> = tile.indices().collect();
    let n_central = tile.central().len();
    let points = project_rows(catalog, &members, &frame);
    let index = PlanarIndex::new(&points);

    let radius = config.padded_radius(tolerance, tile.max_radius());

    let mut pairs = Vec::new();
    let mut candidates = 0usize;
    for (pos, query) in points.iter().enumerate().take(n_central) {
        let (ra_i, dec_i) = catalog.point(members[pos]);
        for other in index.within(query, radius) {
            // Skip self, and central pairs already seen from the other side
            if other == pos || (other < n_central && other < pos) {
                continue;
            }
            candidates += 1;
            let (ra_j, dec_j) = catalog.point(members[other]);
            if within_tolerance(great_circle_distance(ra_i, dec_i, ra_j, dec_j), tolerance) {
                pairs.push((members[pos], members[other]));
            }
        }
    }

    debug!(
        "Tile {}: {} members ({} distinct), search radius {:.6}°, {} candidates, {} pairs",
        tile.id(),
        members.len(),
        index.distinct(),
        radius,
        candidates,
        pairs.len()
    );
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MatchError;

    #[test]
    fn chain_merges_transitively() {
        let points: Vec<[f64; 2]> = (0..20).map(|i| [100.0 + 0.4 * i as f64, 20.0]).collect();
        let grouping = fof(&points, 0.5).unwrap();
        assert_eq!(grouping.len(), 1);
        assert_eq!(grouping.groups()[0].len(), 20);
    }

    #[test]
    fn pairs_across_the_seam_and_poles() {
        let points = vec![
            [359.95, 10.0],
            [0.05, 10.0],
            [0.0, 89.99],
            [180.0, 89.99],
            [90.0, -60.0],
            [90.0, -60.05],
        ];
        let grouping = fof(&points, 0.1).unwrap();
        assert_eq!(
            grouping.groups(),
            &[vec![0, 1], vec![2, 3], vec![4, 5]]
        );
    }

    #[test]
    fn exact_tolerance_is_a_match() {
        let points = vec![[10.0, 0.0], [11.0, 0.0]];
        let d = great_circle_distance(10.0, 0.0, 11.0, 0.0);
        assert_eq!(fof(&points, d).unwrap().len(), 1);
        assert_eq!(fof(&points, d * 0.999).unwrap().len(), 2);
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let mut points = Vec::new();
        for i in 0..90 {
            for j in 0..45 {
                points.push([i as f64 * 4.0 + 0.5 * (j % 3) as f64, j as f64 * 4.0 - 88.0]);
            }
        }
        let mut cfg = MatchConfig::fof_default();
        let parallel = fof_with_config(&points, 3.0, &cfg).unwrap();
        cfg.parallel = false;
        let sequential = fof_with_config(&points, 3.0, &cfg).unwrap();
        assert_eq!(parallel.groups(), sequential.groups());
    }

    #[test]
    fn rejects_bad_tolerance() {
        let points = vec![[1.0, 1.0]];
        assert_eq!(
            fof(&points, 0.0).unwrap_err(),
            MatchError::InvalidTolerance(0.0)
        );
    }

    #[test]
    fn empty_catalog() {
        let points: Vec<[f64; 2]> = Vec::new();
        let grouping = fof(&points, 1.0).unwrap();
        assert!(grouping.is_empty());
    }
}
