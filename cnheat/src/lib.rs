//! # cnheat
//!
//! Copy-number heatmaps and per-group hierarchical clustering of single cells.
//!
//! The member crates are re-exported under short names; [`HeatmapPipeline`] strings them
//! together in the order a run needs them:
//!
//! 1. read the segment table and build the canonical bin order
//! 2. assemble the dense samples x bins matrix
//! 3. optionally cluster each group and write the order file
//! 4. read the metrics table, filter samples and render the multi-page heatmap document
//!
//! ```no_run
//! use std::path::Path;
//! use cnheat::HeatmapPipeline;
//! use cnheat::core::HeatmapConfig;
//!
//! let config = HeatmapConfig::new("integer_copy_number");
//! let summary = HeatmapPipeline::new(config, Path::new("reads.csv.gz"), Path::new("metrics.csv.gz"))
//!     .with_order_data(Path::new("order.csv"))
//!     .with_output(Path::new("heatmap.html"))
//!     .run()?;
//!
//! println!("{} page(s)", summary.pages);
//! # Ok::<(), anyhow::Error>(())
//! ```
#[doc(inline)]
pub use cnheat_core as core;

#[doc(inline)]
pub use cnheat_io as io;

#[doc(inline)]
pub use cnheat_matrix as matrix;

#[doc(inline)]
pub use cnheat_cluster as cluster;

#[doc(inline)]
pub use cnheat_plot as plot;

pub mod pipeline;

pub use pipeline::{HeatmapPipeline, RunSummary};
