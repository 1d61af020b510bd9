//! Result of friends-of-friends clustering.

use crate::catalog::Catalog;
use crate::spherical::{cartesian_to_radec, radec_to_cartesian};
use crate::Vector3;

/// Partition of a catalog's rows into friends-of-friends groups.
///
/// Groups are sorted ascending internally and ordered by their smallest row,
/// so the result does not depend on the order tiles were processed in.
///
/// Built only by [`fof`](crate::fof), so every row index is in range:
///
/// ```compile_fail
/// use skymatch::{Catalog, Grouping};
///
/// let catalog = Catalog::new(vec![[0.0, 0.0]]).unwrap();
/// let grouping = Grouping::new(catalog, 1.0, vec![vec![0, 5]]);
/// ```
#[derive(Debug, Clone)]
pub struct Grouping {
    catalog: Catalog,
    tolerance: f64,
    groups: Vec<Vec<usize>>,
}

impl Grouping {
    pub(crate) fn new(catalog: Catalog, tolerance: f64, groups: Vec<Vec<usize>>) -> Self {
        Self {
            catalog,
            tolerance,
            groups,
        }
    }

    /// Row indices of every group.
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Number of groups, singletons included.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// `(ra, dec)` of every member, grouped.
    pub fn coordinates(&self) -> Vec<Vec<(f64, f64)>> {
        self.groups
            .iter()
            .map(|g| g.iter().map(|&i| self.catalog.point(i)).collect())
            .collect()
    }

    /// Center of each group: direction of the mean unit vector of its members.
    ///
    /// Averaging on the sphere keeps groups that straddle RA 0/360 centered
    /// on the seam instead of at RA 180.
    pub fn group_centers(&self) -> Vec<(f64, f64)> {
        self.groups
            .iter()
            .map(|g| {
                let sum = g.iter().fold(Vector3::zeros(), |acc, &i| {
                    let (ra, dec) = self.catalog.point(i);
                    acc + radec_to_cartesian(ra, dec)
                });
                cartesian_to_radec(&sum)
            })
            .collect()
    }

    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// Group index of every catalog row.
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0; self.catalog.len()];
        for (label, group) in self.groups.iter().enumerate() {
            for &i in group {
                labels[i] = label;
            }
        }
        labels
    }

    /// Groups with at least `min_size` members, with their group index.
    pub fn groups_with_min_size(
        &self,
        min_size: usize,
    ) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.groups
            .iter()
            .enumerate()
            .filter(move |(_, g)| g.len() >= min_size)
            .map(|(label, g)| (label, g.as_slice()))
    }
}
