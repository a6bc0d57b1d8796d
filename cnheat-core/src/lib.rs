//! Core building blocks for copy-number heatmaps.
//!
//! This crate holds the pieces every other `cnheat` crate agrees on: the genomic [`Bin`]
//! model, the canonical bin ordering ([`GenomicBinIndex`]), the run configuration
//! ([`HeatmapConfig`]) and the shared error type ([`HeatmapError`]).
//!
//! ```rust
//! use std::collections::{BTreeSet, HashMap};
//! use cnheat_core::GenomicBinIndex;
//! use cnheat_core::consts::canonical_chromosomes;
//!
//! let mut observed: HashMap<String, BTreeSet<(u64, u64)>> = HashMap::new();
//! for chrom in canonical_chromosomes() {
//!     observed.entry(chrom).or_default().insert((0, 500_000));
//! }
//!
//! let index = GenomicBinIndex::build(&observed).unwrap();
//! assert_eq!(index.len(), 24);
//! assert_eq!(index.chromosome_boundaries()[1], 1);
//! ```
pub mod config;
pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;

// re-exports
pub use config::{HeatmapConfig, Separator};
pub use errors::{HeatmapError, Result};
pub use models::{Bin, GenomicBinIndex};
