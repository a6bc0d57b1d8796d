pub mod filter;
pub mod matrix;

// re-exports
pub use filter::*;
pub use matrix::*;
