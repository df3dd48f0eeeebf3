use tracing::trace;

/// Disjoint sets over `0..len` with path compression and union by rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Greater => self.parent[root_y] = root_x,
            std::cmp::Ordering::Less => self.parent[root_x] = root_y,
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
    }
}

/// Partitions `0..len` into the connected components of the graph with an
/// edge wherever `related(i, j)` holds.
///
/// Every ordered pair `i != j` is tested, so a one-sided predicate still
/// links both ends. Groups, and the indices inside each group, come out in
/// order of first appearance.
pub fn group_indices<F>(len: usize, mut related: F) -> Vec<Vec<usize>>
where
    F: FnMut(usize, usize) -> bool,
{
    let mut sets = UnionFind::new(len);
    for i in 0..len {
        for j in 0..len {
            if i == j || sets.find(i) == sets.find(j) {
                continue;
            }
            if related(i, j) {
                trace!("link {} <-> {}", i, j);
                sets.union(i, j);
            }
        }
    }

    let mut slot_of_root = vec![usize::MAX; len];
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for i in 0..len {
        let root = sets.find(i);
        if slot_of_root[root] == usize::MAX {
            slot_of_root[root] = groups.len();
            groups.push(Vec::new());
        }
        groups[slot_of_root[root]].push(i);
    }
    groups
}

/// Groups `items` into the transitive closure of `condition`.
///
/// Items unrelated to any other item form singleton groups. The result is
/// group discovery only: callers order each group themselves.
pub fn group_by_condition<T, F>(items: &[T], mut condition: F) -> Vec<Vec<T>>
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    group_indices(items.len(), |i, j| condition(&items[i], &items[j]))
        .into_iter()
        .map(|group| group.into_iter().map(|i| items[i].clone()).collect())
        .collect()
}
