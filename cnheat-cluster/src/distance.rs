use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

///
/// Euclidean distance over the coordinates where both rows hold a finite value.
/// Rows without any shared finite coordinate are infinitely far apart.
///
pub fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let mut shared = false;
    let mut sum = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        if x.is_finite() && y.is_finite() {
            shared = true;
            sum += (x - y) * (x - y);
        }
    }

    match shared {
        true => sum.sqrt(),
        false => f64::INFINITY,
    }
}

///
/// Upper triangle of a symmetric distance matrix stored row by row, the same layout
/// as a condensed `pdist` vector: `(0,1), (0,2), .., (0,n-1), (1,2), ..`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CondensedDistances {
    n: usize,
    data: Vec<f64>,
}

impl CondensedDistances {
    ///
    /// Pairwise Euclidean distances between the rows of `values`.
    /// Rows are processed in parallel; the result does not depend on scheduling.
    ///
    pub fn euclidean(values: &Array2<f64>) -> Self {
        let n = values.nrows();

        let data: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|i| {
                let row = values.row(i);
                ((i + 1)..n)
                    .map(|j| euclidean(row, values.row(j)))
                    .collect::<Vec<f64>>()
            })
            .collect::<Vec<Vec<f64>>>()
            .into_iter()
            .flatten()
            .collect();

        CondensedDistances { n, data }
    }

    /// Number of observations (rows), not the number of stored distances.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    fn offset(&self, i: usize, j: usize) -> usize {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        self.n * i - i * (i + 1) / 2 + (j - i - 1)
    }

    /// Distance between observations `i` and `j`; `i` and `j` must differ.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.offset(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let offset = self.offset(i, j);
        self.data[offset] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
