use log::info;

use cnheat_core::consts::MIN_SAMPLES;
use cnheat_core::{HeatmapConfig, HeatmapError, Result};
use cnheat_io::MetricsTable;

use crate::matrix::CopyNumberMatrix;

///
/// Quality and category thresholds deciding which cells are clustered and plotted.
/// Every criterion is optional; unset criteria let every sample through.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleFilter {
    pub categories: Option<Vec<String>>,
    /// inclusive upper bound on the MAD score
    pub max_quality: Option<f64>,
    /// inclusive lower bound on mapped reads
    pub min_reads: Option<u64>,
}

impl SampleFilter {
    pub fn from_config(config: &HeatmapConfig) -> Self {
        SampleFilter {
            categories: config.category_allow_list().map(|c| c.to_vec()),
            max_quality: config.mad_threshold,
            min_reads: config.numreads_threshold,
        }
    }

    ///
    /// Narrow `samples` by category, then MAD score, then read count. A sample without
    /// metrics fails every active criterion.
    ///
    pub fn eligible(&self, samples: &[String], metrics: &MetricsTable) -> Vec<String> {
        let mut samples: Vec<String> = samples.to_vec();

        if let Some(categories) = &self.categories {
            samples.retain(|s| {
                metrics
                    .category(s)
                    .is_some_and(|c| categories.iter().any(|allowed| allowed == c))
            });
        }

        // remove samples over the MAD threshold
        if let Some(threshold) = self.max_quality {
            samples.retain(|s| {
                metrics
                    .quality_score(s)
                    .is_some_and(|q| !q.is_nan() && q <= threshold)
            });
        }

        // remove samples with too few reads
        if let Some(threshold) = self.min_reads {
            samples.retain(|s| metrics.read_count(s).is_some_and(|r| r >= threshold));
        }

        samples
    }

    ///
    /// Restrict the matrix to eligible samples.
    ///
    /// # Errors
    /// [HeatmapError::InsufficientData] when fewer than two samples survive.
    pub fn apply(&self, matrix: &CopyNumberMatrix, metrics: &MetricsTable) -> Result<CopyNumberMatrix> {
        let samples = self.eligible(matrix.samples(), metrics);

        if samples.len() < MIN_SAMPLES {
            return Err(HeatmapError::InsufficientData {
                remaining: samples.len(),
            });
        }

        info!(
            "{} of {} sample(s) passed filtering",
            samples.len(),
            matrix.nrows()
        );

        Ok(matrix.select(&samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cnheat_core::models::Bin;
    use ndarray::Array2;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn matrix() -> CopyNumberMatrix {
        let samples: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let bins = vec![Bin::new("1", 0, 10), Bin::new("1", 10, 20)];
        let values = Array2::from_shape_fn((4, 2), |(i, j)| (i + j) as f64);
        CopyNumberMatrix::from_parts(samples, bins, values)
    }

    #[fixture]
    fn metrics(matrix: CopyNumberMatrix) -> MetricsTable {
        let raw = "cell_id,mad_neutral_state,total_mapped_reads,cell_call\n\
                   A,0.10,500000,C1\n\
                   B,NA,600000,C1\n\
                   C,0.20,1000,C1\n\
                   D,0.05,900000,C2\n";
        let config = HeatmapConfig::new("copy");
        MetricsTable::from_reader(raw.as_bytes(), &config, matrix.samples()).unwrap()
    }

    #[rstest]
    fn test_no_filters_keeps_everything(matrix: CopyNumberMatrix, metrics: MetricsTable) {
        let filtered = SampleFilter::default().apply(&matrix, &metrics).unwrap();
        assert_eq!(filtered, matrix);
    }

    #[rstest]
    fn test_category_filter(matrix: CopyNumberMatrix, metrics: MetricsTable) {
        let filter = SampleFilter {
            categories: Some(vec!["C1".to_string()]),
            ..Default::default()
        };
        assert_eq!(filter.eligible(matrix.samples(), &metrics), vec!["A", "B", "C"]);
    }

    #[rstest]
    fn test_quality_filter_is_inclusive_and_drops_nan(matrix: CopyNumberMatrix, metrics: MetricsTable) {
        let filter = SampleFilter {
            max_quality: Some(0.10),
            ..Default::default()
        };
        assert_eq!(filter.eligible(matrix.samples(), &metrics), vec!["A", "D"]);
    }

    #[rstest]
    fn test_read_filter_is_inclusive(matrix: CopyNumberMatrix, metrics: MetricsTable) {
        let filter = SampleFilter {
            min_reads: Some(600_000),
            ..Default::default()
        };
        assert_eq!(filter.eligible(matrix.samples(), &metrics), vec!["B", "D"]);
    }

    #[rstest]
    fn test_filters_combine(matrix: CopyNumberMatrix, metrics: MetricsTable) {
        let filter = SampleFilter {
            categories: Some(vec!["C1".to_string()]),
            max_quality: Some(0.5),
            min_reads: Some(100_000),
        };
        let result = filter.apply(&matrix, &metrics);

        assert!(matches!(
            result,
            Err(HeatmapError::InsufficientData { remaining: 1 })
        ));
    }

    #[rstest]
    fn test_exactly_two_samples_pass(matrix: CopyNumberMatrix, metrics: MetricsTable) {
        let filter = SampleFilter {
            max_quality: Some(0.10),
            ..Default::default()
        };
        let filtered = filter.apply(&matrix, &metrics).unwrap();

        assert_eq!(filtered.samples(), &["A".to_string(), "D".to_string()]);
        assert_eq!(filtered.row("D").unwrap()[1], 4.0);
    }

    #[rstest]
    fn test_from_config() {
        let mut config = HeatmapConfig::new("copy");
        config.cellcalls = Some(vec![]);
        config.mad_threshold = Some(0.2);

        let filter = SampleFilter::from_config(&config);
        assert_eq!(filter.categories, None);
        assert_eq!(filter.max_quality, Some(0.2));
        assert_eq!(filter.min_reads, None);
    }
}
