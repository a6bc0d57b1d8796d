//! # Table readers for cnheat.
//!
//! Two delimited, header-led tables feed a heatmap run:
//!
//! - the **segment table**, a long-format dump with one row per (cell, bin) pair, read by
//!   [`SegmentTable`];
//! - the **metrics table**, one row per cell with quality and classification columns, read by
//!   [`MetricsTable`].
//!
//! Both accept plain or gzip-compressed files.
//!
pub mod metrics;
pub mod segments;

pub use metrics::*;
pub use segments::*;
