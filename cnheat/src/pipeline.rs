use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use cnheat_cluster::ClusterOrder;
use cnheat_core::consts::ALL_GROUP;
use cnheat_core::{GenomicBinIndex, HeatmapConfig};
use cnheat_io::{Grouping, MetricsTable, SegmentTable};
use cnheat_matrix::{CopyNumberMatrix, SampleFilter};
use cnheat_plot::{HeatmapRenderer, plan_pages};

///
/// One heatmap run: read both tables, assemble the matrix, then optionally write the
/// cluster order and the plot document.
///
#[derive(Debug, Clone)]
pub struct HeatmapPipeline {
    pub config: HeatmapConfig,
    /// segment table
    pub input: PathBuf,
    /// metrics table
    pub metrics: PathBuf,
    /// cluster-order CSV; clustering is skipped when unset
    pub order_data: Option<PathBuf>,
    /// plot document; rendering is skipped when unset
    pub output: Option<PathBuf>,
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// rows of the assembled matrix
    pub samples: usize,
    pub bins: usize,
    /// samples written to the order file
    pub ordered: usize,
    pub pages: usize,
}

impl HeatmapPipeline {
    pub fn new(config: HeatmapConfig, input: &Path, metrics: &Path) -> Self {
        HeatmapPipeline {
            config,
            input: input.to_path_buf(),
            metrics: metrics.to_path_buf(),
            order_data: None,
            output: None,
        }
    }

    pub fn with_order_data(mut self, path: &Path) -> Self {
        self.order_data = Some(path.to_path_buf());
        self
    }

    pub fn with_output(mut self, path: &Path) -> Self {
        self.output = Some(path.to_path_buf());
        self
    }

    pub fn run(&self) -> Result<RunSummary> {
        let matrix = self.load_matrix()?;

        let mut summary = RunSummary {
            samples: matrix.nrows(),
            bins: matrix.ncols(),
            ..Default::default()
        };

        let needs_metrics = self.output.is_some()
            || (self.order_data.is_some() && self.config.clustering_filters_configured());
        let metrics = match needs_metrics {
            true => Some(self.load_metrics(&matrix)?),
            false => None,
        };

        if let Some(path) = &self.order_data {
            let order = self.cluster(&matrix, metrics.as_ref())?;
            order
                .write_to_file(path)
                .with_context(|| format!("Failed to write cluster order to {}", path.display()))?;
            summary.ordered = order.len();
        }

        if let (Some(path), Some(metrics)) = (&self.output, &metrics) {
            summary.pages = self.plot(&matrix, metrics, path)?;
        }

        Ok(summary)
    }

    ///
    /// Segment table to dense matrix.
    ///
    /// Fails when the chromosome set is not canonical or a (sample, bin) pair is duplicated or
    /// missing. A matrix of fewer than two samples is not an error here: unfiltered clustering
    /// skips it, filtering and plotting reject it.
    ///
    pub fn load_matrix(&self) -> Result<CopyNumberMatrix> {
        let table = SegmentTable::from_path(&self.input, self.config.separator, &self.config.column_name)
            .with_context(|| format!("Failed to read segment table {}", self.input.display()))?;

        let index = GenomicBinIndex::build(&table.bins)?;
        let matrix = CopyNumberMatrix::assemble(&table, &index)?;

        info!(
            "Assembled matrix of {} sample(s) x {} bin(s)",
            matrix.nrows(),
            matrix.ncols()
        );

        Ok(matrix)
    }

    fn load_metrics(&self, matrix: &CopyNumberMatrix) -> Result<MetricsTable> {
        MetricsTable::from_path(&self.metrics, &self.config, matrix.samples())
            .with_context(|| format!("Failed to read metrics table {}", self.metrics.display()))
    }

    ///
    /// Cluster order of the run. With every clustering filter configured, the filtered
    /// samples are clustered per metrics group; otherwise all samples form the single group
    /// `all`.
    ///
    pub fn cluster(&self, matrix: &CopyNumberMatrix, metrics: Option<&MetricsTable>) -> Result<ClusterOrder> {
        let column = self.config.order_column();

        let order = match (self.config.clustering_filters_configured(), metrics) {
            (true, Some(metrics)) => {
                let filtered = SampleFilter::from_config(&self.config).apply(matrix, metrics)?;
                ClusterOrder::compute(&filtered, &metrics.grouping, &column)
            }
            _ => {
                let grouping = Grouping::single(ALL_GROUP, matrix.samples().to_vec());
                ClusterOrder::compute(matrix, &grouping, &column)
            }
        };

        info!(
            "Clustered {} sample(s) in {} group(s)",
            order.len(),
            order.groups.len()
        );

        Ok(order)
    }

    ///
    /// Filter, lay out and render every page, then write the document. Returns the number of
    /// pages written.
    ///
    pub fn plot(&self, matrix: &CopyNumberMatrix, metrics: &MetricsTable, path: &Path) -> Result<usize> {
        let filtered = SampleFilter::from_config(&self.config).apply(matrix, metrics)?;

        let pages = plan_pages(&filtered, &metrics.grouping, self.config.high_memory);
        let renderer = HeatmapRenderer::new(&filtered, metrics, &self.config);
        let document = renderer.render_document(&pages)?;

        document
            .write_to_file(path)
            .with_context(|| format!("Failed to write heatmap document to {}", path.display()))?;

        Ok(document.len())
    }
}
