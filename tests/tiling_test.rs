//! Partition and halo properties of the sky tiling.


use rand::RngExt;
use skymatch::tiling::{Tile, TileGenerator, TileLayout};
use skymatch::Catalog;

fn layouts() -> Vec<TileLayout> {
    vec![
        TileLayout::grid(),
        TileLayout::dense(),
        TileLayout::super_dense(),
        TileLayout {
            polar_dec: 66.0,
            rings: vec![9, 5, 7],
        },
    ]
}

/// For every row: its central tile and every tile it is a member of.
fn memberships(tiles: &[Tile], n: usize) -> (Vec<usize>, Vec<Vec<usize>>) {
    let mut central = vec![usize::MAX; n];
    let mut member_of = vec![Vec::new(); n];
    for tile in tiles {
        for &i in tile.central() {
            assert_eq!(central[i], usize::MAX, "row {i} central to two tiles");
            central[i] = tile.id();
        }
        for i in tile.indices() {
            member_of[i].push(tile.id());
        }
    }
    (central, member_of)
}

#[test]
fn central_sets_partition_the_catalog() {
    sky_data::init_tracing();
    let mut rng = sky_data::seeded(61);
    let mut points = sky_data::uniform_sky(20_000, &mut rng);
    // Exact poles, seam and tile edges
    points.extend([
        [0.0, 90.0],
        [0.0, -90.0],
        [0.0, 0.0],
        [360.0, 0.0],
        [60.0, 60.0],
        [90.0, -75.0],
        [15.0, 80.0],
    ]);
    let catalog = Catalog::new(points).unwrap();

    for layout in layouts() {
        let generator = TileGenerator::from_layout(&layout, 0.5).unwrap();
        assert_eq!(generator.tiles().len(), layout.num_tiles());
        let tiles = generator.distribute(&catalog).unwrap();
        let (central, _) = memberships(&tiles, catalog.len());
        assert!(central.iter().all(|&c| c != usize::MAX));
        let total: usize = tiles.iter().map(|t| t.central().len()).sum();
        assert_eq!(total, catalog.len());
    }
}

#[test]
fn close_pairs_share_a_tile() {
    let mut rng = sky_data::seeded(67);
    for tolerance in [0.01, 0.5, 2.0] {
        let seeds = sky_data::uniform_sky(5000, &mut rng);
        let mut points = Vec::with_capacity(2 * seeds.len());
        for &seed in &seeds {
            points.push(seed);
            points.push(sky_data::scatter(seed, 0.0, tolerance * 0.999, &mut rng));
        }
        let catalog = Catalog::new(points).unwrap();

        for layout in layouts() {
            // Margin equal to the tolerance, the tightest allowed
            let generator = TileGenerator::from_layout(&layout, tolerance).unwrap();
            let tiles = generator.distribute(&catalog).unwrap();
            let (central, member_of) = memberships(&tiles, catalog.len());

            for pair in 0..seeds.len() {
                let (i, j) = (2 * pair, 2 * pair + 1);
                assert!(
                    member_of[j].contains(&central[i]),
                    "row {j} missing from tile {} of its partner ({layout:?}, tol {tolerance})",
                    central[i]
                );
                assert!(
                    member_of[i].contains(&central[j]),
                    "row {i} missing from tile {} of its partner ({layout:?}, tol {tolerance})",
                    central[j]
                );
            }
        }
    }
}

#[test]
fn halo_points_lie_within_max_radius() {
    let mut rng = sky_data::seeded(71);
    let points = sky_data::uniform_sky(20_000, &mut rng);
    let catalog = Catalog::new(points).unwrap();

    for layout in layouts() {
        let margin = 0.2 + 3.0 * rng.random::<f64>();
        let generator = TileGenerator::from_layout(&layout, margin).unwrap();
        for tile in generator.distribute(&catalog).unwrap() {
            let (ra, dec) = tile.center();
            for i in tile.indices() {
                let (pra, pdec) = catalog.point(i);
                let d = skymatch::spherical::great_circle_distance(ra, dec, pra, pdec);
                assert!(
                    d <= tile.max_radius() + 1e-9,
                    "tile {} row {i}: {d} > {}",
                    tile.id(),
                    tile.max_radius()
                );
            }
        }
    }
}
