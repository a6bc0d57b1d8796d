use crate::distance::CondensedDistances;

///
/// One step of the agglomeration. Ids below the number of leaves are observations;
/// id `n + k` is the cluster created by step `k`.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub height: f64,
    pub size: usize,
}

///
/// Result of an agglomerative clustering, in the same shape as a SciPy linkage matrix:
/// merges sorted by height, `left` always the smaller cluster id.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    n_leaves: usize,
    merges: Vec<Merge>,
}

impl Dendrogram {
    ///
    /// Average-linkage (UPGMA) clustering of the observations behind `distances`.
    ///
    /// Uses the nearest-neighbour chain algorithm, which needs `O(n^2)` time and the
    /// condensed matrix as its only working memory.
    ///
    pub fn average_linkage(distances: CondensedDistances) -> Self {
        let n_leaves = distances.len();
        let raw = nn_chain(distances);

        Dendrogram {
            n_leaves,
            merges: relabel(n_leaves, raw),
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    ///
    /// Observations in the order they are met walking the tree left child first.
    ///
    pub fn leaves(&self) -> Vec<usize> {
        let n = self.n_leaves;
        if n == 0 {
            return vec![];
        }

        let mut order = Vec::with_capacity(n);
        let mut stack = vec![2 * n - 2];

        while let Some(node) = stack.pop() {
            if node < n {
                order.push(node);
                continue;
            }
            let merge = &self.merges[node - n];
            // right goes first so left is popped first
            stack.push(merge.right);
            stack.push(merge.left);
        }

        order
    }
}

/// Merges as found by the chain, labelled by the slot that absorbed each cluster.
fn nn_chain(mut distances: CondensedDistances) -> Vec<Merge> {
    let n = distances.len();
    let mut size = vec![1usize; n];
    let mut merges = Vec::with_capacity(n.saturating_sub(1));
    let mut chain: Vec<usize> = Vec::with_capacity(n);

    for _ in 0..n.saturating_sub(1) {
        if chain.is_empty() {
            match size.iter().position(|&s| s > 0) {
                Some(first) => chain.push(first),
                None => break,
            }
        }

        let (x, y, height) = loop {
            let x = chain[chain.len() - 1];

            let (mut nearest, mut current) = match chain.len() > 1 {
                true => {
                    let previous = chain[chain.len() - 2];
                    (Some(previous), distances.get(x, previous))
                }
                false => (None, f64::INFINITY),
            };

            for i in 0..n {
                if size[i] == 0 || i == x {
                    continue;
                }
                let dist = distances.get(x, i);
                if nearest.is_none() || dist < current {
                    current = dist;
                    nearest = Some(i);
                }
            }

            let Some(y) = nearest else {
                return merges;
            };

            if chain.len() > 1 && y == chain[chain.len() - 2] {
                break (x, y, current);
            }

            chain.push(y);
        };

        chain.pop();
        chain.pop();

        let (x, y) = if x < y { (x, y) } else { (y, x) };
        let (nx, ny) = (size[x], size[y]);

        merges.push(Merge {
            left: x,
            right: y,
            height,
            size: nx + ny,
        });

        size[x] = 0;
        size[y] = nx + ny;

        // Lance-Williams update for average linkage
        for i in 0..n {
            if size[i] == 0 || i == y {
                continue;
            }
            let updated = (nx as f64 * distances.get(i, x) + ny as f64 * distances.get(i, y))
                / (nx + ny) as f64;
            distances.set(i, y, updated);
        }
    }

    merges
}

/// Sort merges by height (stable) and rename clusters to `n + step`.
fn relabel(n: usize, mut raw: Vec<Merge>) -> Vec<Merge> {
    raw.sort_by(|a, b| a.height.total_cmp(&b.height));

    let mut clusters = UnionFind::new(n);

    raw.iter()
        .map(|merge| {
            let a = clusters.find(merge.left);
            let b = clusters.find(merge.right);
            let size = clusters.union(a, b);
            Merge {
                left: a.min(b),
                right: a.max(b),
                height: merge.height,
                size,
            }
        })
        .collect()
}

struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    next_label: usize,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        let capacity = (2 * n).saturating_sub(1);
        UnionFind {
            parent: (0..capacity).collect(),
            size: (0..capacity).map(|i| if i < n { 1 } else { 0 }).collect(),
            next_label: n,
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    /// Join two roots under a fresh label and return the new cluster size.
    fn union(&mut self, a: usize, b: usize) -> usize {
        let label = self.next_label;
        self.parent[a] = label;
        self.parent[b] = label;
        self.size[label] = self.size[a] + self.size[b];
        self.next_label += 1;
        self.size[label]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::{Array2, array};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn tree(values: &Array2<f64>) -> Dendrogram {
        Dendrogram::average_linkage(CondensedDistances::euclidean(values))
    }

    #[rstest]
    fn test_two_pairs() {
        let dendrogram = tree(&array![[0.0], [10.0], [1.0], [11.0]]);

        assert_eq!(
            dendrogram.merges(),
            &[
                Merge { left: 0, right: 2, height: 1.0, size: 2 },
                Merge { left: 1, right: 3, height: 1.0, size: 2 },
                Merge { left: 4, right: 5, height: 10.0, size: 4 },
            ]
        );
        assert_eq!(dendrogram.leaves(), vec![0, 2, 1, 3]);
    }

    #[rstest]
    fn test_average_height() {
        // (0,1) join at 1, then 5 joins at mean(5, 4) = 4.5
        let dendrogram = tree(&array![[0.0], [1.0], [5.0]]);

        let heights: Vec<f64> = dendrogram.merges().iter().map(|m| m.height).collect();
        assert_eq!(heights, vec![1.0, 4.5]);
        assert_eq!(dendrogram.leaves(), vec![2, 0, 1]);
    }

    #[rstest]
    #[case(0, vec![])]
    #[case(1, vec![0])]
    fn test_trivial_sizes(#[case] n: usize, #[case] expected: Vec<usize>) {
        let dendrogram = tree(&Array2::zeros((n, 3)));

        assert_eq!(dendrogram.merges().len(), 0);
        assert_eq!(dendrogram.leaves(), expected);
    }

    #[rstest]
    fn test_deterministic() {
        let values = Array2::from_shape_fn((40, 6), |(i, j)| ((i * 7 + j * 3) % 11) as f64);

        let first = tree(&values);
        let second = tree(&values);
        assert_eq!(first, second);
        assert_eq!(first.leaves(), second.leaves());
    }

    #[rstest]
    fn test_deep_tree_is_a_permutation() {
        // points on a line produce a deep, unbalanced tree
        let n = 2_000;
        let values = Array2::from_shape_fn((n, 1), |(i, _)| (i * i) as f64);

        let mut leaves = tree(&values).leaves();
        assert_eq!(leaves.len(), n);

        leaves.sort();
        assert_eq!(leaves, (0..n).collect::<Vec<usize>>());
    }

    #[rstest]
    fn test_unreachable_rows_still_join() {
        let values = array![[1.0, f64::NAN], [1.5, f64::NAN], [f64::NAN, 3.0]];
        let dendrogram = tree(&values);

        assert_eq!(dendrogram.merges().len(), 2);
        assert_eq!(dendrogram.merges()[1].height, f64::INFINITY);
        assert_eq!(dendrogram.leaves(), vec![2, 0, 1]);
    }
}
