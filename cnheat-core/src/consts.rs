pub const CELL_ID_COL: &str = "cell_id";
pub const CHR_COL: &str = "chr";
pub const START_COL: &str = "start";
pub const END_COL: &str = "end";
pub const QUALITY_COL: &str = "mad_neutral_state";
pub const READS_COL: &str = "total_mapped_reads";

pub const DEFAULT_COLOR_COL: &str = "cell_call";
pub const ALL_GROUP: &str = "all";

/// Value column holding integer copy-number states.
pub const INTEGER_COPY_NUMBER: &str = "integer_copy_number";

/// Literal used for missing numeric values in both tables.
pub const MISSING_VALUE: &str = "NA";

/// Samples drawn per page unless the high-memory override is set.
pub const MAX_SAMPLES_PER_PAGE: usize = 1000;

/// Minimum number of samples needed to cluster or draw a heatmap.
pub const MIN_SAMPLES: usize = 2;

pub const ORDER_COL_SUFFIX: &str = "_heatmap_order";

///
/// The fixed chromosome order used for every heatmap column layout: `1..22`, `X`, `Y`.
///
pub fn canonical_chromosomes() -> Vec<String> {
    (1..=22)
        .map(|c| c.to_string())
        .chain(["X".to_string(), "Y".to_string()])
        .collect()
}
