//! Result of cross-matching two catalogs.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;
use crate::matcher::MatchMap;

/// Every pair `(a, b)` of rows within the tolerance, keyed by catalog-A row.
///
/// Built only by [`xmatch`](crate::xmatch), so every row index is in range:
///
/// ```compile_fail
/// use skymatch::{Catalog, MatchMap, MatchTable};
///
/// let a = Catalog::new(vec![[0.0, 0.0]]).unwrap();
/// let b = Catalog::new(vec![[0.0, 0.0]]).unwrap();
/// let mut matches = MatchMap::new();
/// matches.entry(0).or_default().insert(7);
/// let table = MatchTable::new(a, b, 1.0, matches);
/// ```
#[derive(Debug, Clone)]
pub struct MatchTable {
    catalog_a: Catalog,
    catalog_b: Catalog,
    tolerance: f64,
    matches: MatchMap,
}

impl MatchTable {
    pub(crate) fn new(
        catalog_a: Catalog,
        catalog_b: Catalog,
        tolerance: f64,
        matches: MatchMap,
    ) -> Self {
        Self {
            catalog_a,
            catalog_b,
            tolerance,
            matches,
        }
    }

    pub fn catalog_a(&self) -> &Catalog {
        &self.catalog_a
    }

    pub fn catalog_b(&self) -> &Catalog {
        &self.catalog_b
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// A rows with at least one match, mapped to their B rows.
    pub fn matches(&self) -> &MatchMap {
        &self.matches
    }

    /// B rows matched to A row `a`, ascending. Empty if none.
    pub fn matches_of(&self, a: usize) -> Vec<usize> {
        self.matches
            .get(&a)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Matches for every A row in order, empty for unmatched rows.
    pub fn dense_matches(&self) -> Vec<Vec<usize>> {
        self.catalog_a.indexes().map(|a| self.matches_of(a)).collect()
    }

    /// A rows matched to every B row in order, empty for unmatched rows.
    pub fn reverse_matches(&self) -> Vec<Vec<usize>> {
        let mut reverse = vec![Vec::new(); self.catalog_b.len()];
        for (&a, set) in &self.matches {
            for &b in set {
                reverse[b].push(a);
            }
        }
        reverse
    }

    /// Number of matches for every A row.
    pub fn match_counts(&self) -> Vec<usize> {
        self.catalog_a
            .indexes()
            .map(|a| self.matches.get(&a).map_or(0, BTreeSet::len))
            .collect()
    }

    /// Number of matches for every B row.
    pub fn reverse_match_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.catalog_b.len()];
        for &b in self.matches.values().flatten() {
            counts[b] += 1;
        }
        counts
    }

    /// How many A rows have each match count, zero included.
    pub fn number_distribution(&self) -> BTreeMap<usize, usize> {
        let mut distribution = BTreeMap::new();
        for n in self.match_counts() {
            *distribution.entry(n).or_insert(0) += 1;
        }
        distribution
    }

    /// All matched `(a, b)` pairs, ordered by `a` then `b`.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.matches
            .iter()
            .flat_map(|(&a, set)| set.iter().map(move |&b| (a, b)))
            .collect()
    }

    pub fn total_pairs(&self) -> usize {
        self.matches.values().map(BTreeSet::len).sum()
    }

    /// The same matches seen from catalog B.
    pub fn swapped(&self) -> MatchTable {
        let mut matches = MatchMap::new();
        for (a, b) in self.pairs() {
            matches.entry(b).or_default().insert(a);
        }
        MatchTable::new(
            self.catalog_b.clone(),
            self.catalog_a.clone(),
            self.tolerance,
            matches,
        )
    }
}

impl std::fmt::Display for MatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MatchTable: {} x {} objects, {} pairs within {}°",
            self.catalog_a.len(),
            self.catalog_b.len(),
            self.total_pairs(),
            self.tolerance
        )
    }
}
