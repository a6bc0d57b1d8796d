pub mod bin;
pub mod bin_index;

// re-export for cleaner imports
pub use self::bin::Bin;
pub use self::bin_index::{GenomicBinIndex, ObservedBins};
