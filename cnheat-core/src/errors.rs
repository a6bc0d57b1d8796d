use std::path::PathBuf;

use thiserror::Error;

/// Error type shared by every cnheat crate.
#[derive(Error, Debug)]
pub enum HeatmapError {
    /// The observed chromosomes differ from the canonical `1..22, X, Y` set.
    #[error(
        "Chromosome set does not match the canonical set. Missing: [{}], unexpected: [{}]",
        missing.join(", "),
        unexpected.join(", ")
    )]
    Schema {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// The same (sample, bin) pair was seen twice in the segment table.
    #[error("Duplicate segment for sample {sample} at {bin}; input data is corrupted")]
    DuplicateSegment { sample: String, bin: String },

    /// A sample has no value for one of the canonical bins.
    #[error("Sample {sample} has no value for bin {bin}")]
    MissingSegment { sample: String, bin: String },

    /// Fewer than two samples are left to cluster or plot.
    #[error("Not enough data to plot: {remaining} sample(s) left after filtering, at least 2 required")]
    InsufficientData { remaining: usize },

    #[error("Required column `{column}` not found in header")]
    MissingColumn { column: String },

    #[error("Invalid value `{value}` in column `{column}` at line {line}")]
    InvalidValue {
        column: String,
        value: String,
        line: u64,
    },

    #[error("Unknown separator `{0}`, expected `comma` or `tab`")]
    InvalidSeparator(String),

    #[error("Can't open file {path:?}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Plotting error: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Format(#[from] std::fmt::Error),
}

/// Result type alias for cnheat operations.
pub type Result<T> = std::result::Result<T, HeatmapError>;
