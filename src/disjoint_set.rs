//! Disjoint-set forest (union-find) over the dense index range `0..n`.
//!
//! Union by rank with path halving; both operations are iterative, so deep
//! or degenerate chains of unions cannot overflow the stack.

#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set containing `i`.
    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            let grandparent = self.parent[self.parent[i]];
            self.parent[i] = grandparent;
            i = grandparent;
        }
        i
    }

    /// Merge the sets containing `i` and `j`.
    ///
    /// Returns `true` if they were previously disjoint.
    pub fn union(&mut self, i: usize, j: usize) -> bool {
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i == root_j {
            return false;
        }
        match self.rank[root_i].cmp(&self.rank[root_j]) {
            std::cmp::Ordering::Less => self.parent[root_i] = root_j,
            std::cmp::Ordering::Greater => self.parent[root_j] = root_i,
            std::cmp::Ordering::Equal => {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
        true
    }

    /// `true` if `i` and `j` are in the same set.
    pub fn connected(&mut self, i: usize, j: usize) -> bool {
        self.find(i) == self.find(j)
    }

    /// The current partition of `0..n`.
    ///
    /// Each group is sorted ascending and groups are ordered by their smallest
    /// member, so the output depends only on the partition and not on the
    /// order in which unions were applied.
    pub fn get_groups(&mut self) -> Vec<Vec<usize>> {
        let n = self.len();
        let mut slot_of_root = vec![usize::MAX; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..n {
            let root = self.find(i);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = groups.len();
                groups.push(Vec::new());
            }
            groups[slot_of_root[root]].push(i);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_by_default() {
        let mut ds = DisjointSet::new(4);
        assert_eq!(ds.get_groups(), vec![vec![0], vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn unions_merge_components() {
        let mut ds = DisjointSet::new(6);
        assert!(ds.union(0, 3));
        assert!(ds.union(4, 5));
        assert!(ds.union(3, 5));
        assert!(!ds.union(0, 4));
        assert!(ds.connected(0, 5));
        assert!(!ds.connected(1, 2));
        assert_eq!(ds.get_groups(), vec![vec![0, 3, 4, 5], vec![1], vec![2]]);
    }

    #[test]
    fn repeated_unions_are_idempotent() {
        let mut ds = DisjointSet::new(5);
        ds.union(1, 2);
        ds.union(2, 3);
        let before = ds.get_groups();
        for _ in 0..3 {
            ds.union(1, 3);
            ds.union(3, 2);
            ds.union(2, 2);
        }
        assert_eq!(ds.get_groups(), before);
    }

    #[test]
    fn partition_is_independent_of_union_order() {
        let pairs = [(0, 7), (7, 3), (5, 6), (2, 9), (9, 8), (1, 1)];
        let mut forward = DisjointSet::new(10);
        for &(i, j) in &pairs {
            forward.union(i, j);
        }
        let mut backward = DisjointSet::new(10);
        for &(i, j) in pairs.iter().rev() {
            backward.union(j, i);
        }
        assert_eq!(forward.get_groups(), backward.get_groups());
    }

    #[test]
    fn long_chain_does_not_recurse() {
        let n = 200_000;
        let mut ds = DisjointSet::new(n);
        for i in 1..n {
            ds.union(i - 1, i);
        }
        let groups = ds.get_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), n);
    }

    #[test]
    fn empty_set() {
        let mut ds = DisjointSet::new(0);
        assert!(ds.is_empty());
        assert!(ds.get_groups().is_empty());
    }
}
