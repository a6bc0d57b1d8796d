//! Hierarchical clustering of copy-number profiles.
//!
//! Rows of a [`CopyNumberMatrix`](cnheat_matrix::CopyNumberMatrix) are compared with a
//! Euclidean distance, joined with average linkage (UPGMA) and read back as the leaf order of
//! the resulting tree. Placing rows in that order puts cells with similar copy-number
//! profiles next to each other.
//!
//! ## Quick Start
//!
//! ```rust
//! use cnheat_cluster::{CondensedDistances, Dendrogram};
//! use ndarray::array;
//!
//! let profiles = array![[0.0], [10.0], [1.0], [11.0]];
//!
//! let distances = CondensedDistances::euclidean(&profiles);
//! let tree = Dendrogram::average_linkage(distances);
//!
//! assert_eq!(tree.leaves(), vec![0, 2, 1, 3]);
//! ```
//!
//! The tree is walked with an explicit stack, so very deep trees (thousands of cells merged
//! one at a time) never touch the call-stack limit.

/// Pairwise distances between matrix rows.
pub mod distance;

/// Average-linkage tree construction and leaf ordering.
pub mod linkage;

/// Per-group leaf orders and the order file.
pub mod order;

// re-exports
pub use self::distance::{CondensedDistances, euclidean};
pub use self::linkage::{Dendrogram, Merge};
pub use self::order::{ClusterOrder, GroupOrder, OrderRecord, leaf_order, read_cluster_order};
