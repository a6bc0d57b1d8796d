use std::collections::HashSet;

use log::info;
use ndarray::{Array2, ArrayView1, Axis};

use cnheat_core::models::{Bin, GenomicBinIndex};
use cnheat_core::{HeatmapError, Result};
use cnheat_io::SegmentTable;

///
/// Dense samples x bins matrix. Rows follow `samples`, columns follow the canonical bin order.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CopyNumberMatrix {
    samples: Vec<String>,
    bins: Vec<Bin>,
    values: Array2<f64>,
}

impl CopyNumberMatrix {
    ///
    /// Build the dense matrix from the sparse segment table.
    ///
    /// The matrix is allocated first and then filled by looking up every (sample, bin) pair.
    /// Samples without a single finite value are dropped afterwards.
    ///
    /// # Errors
    /// [HeatmapError::MissingSegment] when a sample has no row for one of the canonical bins.
    pub fn assemble(table: &SegmentTable, index: &GenomicBinIndex) -> Result<Self> {
        let bins = index.bins();
        let mut values = Array2::from_elem((table.samples.len(), bins.len()), f64::NAN);

        for (row, sample) in table.samples.iter().enumerate() {
            let sample_values =
                table
                    .values
                    .get(sample)
                    .ok_or_else(|| HeatmapError::MissingSegment {
                        sample: sample.clone(),
                        bin: bins.first().map(|b| b.to_string()).unwrap_or_default(),
                    })?;

            for (col, bin) in bins.iter().enumerate() {
                let value = sample_values
                    .get(bin)
                    .ok_or_else(|| HeatmapError::MissingSegment {
                        sample: sample.clone(),
                        bin: bin.to_string(),
                    })?;
                values[[row, col]] = *value;
            }
        }

        // skip samples that are just NaN or inf
        let keep: Vec<usize> = values
            .outer_iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|v| v.is_finite()))
            .map(|(i, _)| i)
            .collect();

        let dropped = table.samples.len() - keep.len();
        if dropped > 0 {
            info!("Dropped {} sample(s) without any finite value", dropped);
        }

        Ok(CopyNumberMatrix {
            samples: keep.iter().map(|&i| table.samples[i].clone()).collect(),
            bins: bins.to_vec(),
            values: values.select(Axis(0), &keep),
        })
    }

    ///
    /// Wrap already dense data. `values` must be `samples.len() x bins.len()`.
    ///
    pub fn from_parts(samples: Vec<String>, bins: Vec<Bin>, values: Array2<f64>) -> Self {
        debug_assert_eq!(values.dim(), (samples.len(), bins.len()));
        CopyNumberMatrix {
            samples,
            bins,
            values,
        }
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.samples.len()
    }

    pub fn ncols(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn contains(&self, sample: &str) -> bool {
        self.sample_index(sample).is_some()
    }

    pub fn sample_index(&self, sample: &str) -> Option<usize> {
        self.samples.iter().position(|s| s == sample)
    }

    pub fn row(&self, sample: &str) -> Option<ArrayView1<'_, f64>> {
        self.sample_index(sample).map(|i| self.values.row(i))
    }

    ///
    /// Restrict the matrix to the given samples. Row order of `self` is preserved and unknown
    /// ids are ignored.
    ///
    pub fn select(&self, samples: &[String]) -> Self {
        let wanted: HashSet<&str> = samples.iter().map(String::as_str).collect();
        let rows: Vec<usize> = self
            .samples
            .iter()
            .enumerate()
            .filter(|(_, s)| wanted.contains(s.as_str()))
            .map(|(i, _)| i)
            .collect();

        CopyNumberMatrix {
            samples: rows.iter().map(|&i| self.samples[i].clone()).collect(),
            bins: self.bins.clone(),
            values: self.values.select(Axis(0), &rows),
        }
    }

    /// Smallest and largest finite value in the matrix.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
