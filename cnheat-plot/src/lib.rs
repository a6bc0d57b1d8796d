//! Heatmap rendering for cnheat.
//!
//! A run produces one document with one page per (group, chunk). Pages share the color
//! scale of the whole filtered matrix so they can be compared side by side.
pub mod colormap;
pub mod document;
pub mod paging;
pub mod render;

// re-exports
pub use colormap::*;
pub use document::*;
pub use paging::*;
pub use render::*;
