//! # stela-core
//!
//! Position rebasing and pending-edit reconciliation for tree-structured
//! text documents.
//!
//! A document is a [`Node`] tree whose leaves hold text. Locations in it are
//! [`Path`]s (child indexes from the root), [`Point`]s (a path plus a
//! character offset into its leaf), and [`Range`]s (a pair of points).
//! Committed changes are [`Operation`]s: structural edits that insert,
//! remove, split, merge, and move nodes, plus text edits within one leaf.
//!
//! ## Rebasing
//!
//! Every location type has a `transform` method that rebases it through one
//! operation, so positions held outside the tree (cursors, selections,
//! bookmarks) stay valid as operations are applied:
//!
//! ```
//! use stela_core::{Affinity, Operation, Path, Point};
//!
//! let split = Operation::SplitNode { path: Path::from([0, 1]), position: 2 };
//!
//! // A caret past the split point moves onto the new sibling leaf.
//! let caret = Point::new([0, 1], 4);
//! assert_eq!(
//!     caret.transform(&split, Affinity::Forward),
//!     Some(Point::new([0, 2], 2)),
//! );
//! ```
//!
//! `transform` returns `None` when the operation destroys the location
//! outright, and [`Affinity`] decides which side a position at an operation
//! boundary sticks to.
//!
//! ## Pending edits
//!
//! Input surfaces report text edits before the host commits them, so the
//! observed document runs ahead of the committed tree. The [`pending`]
//! module reconciles the two:
//!
//! ```text
//! observed edit  → StringDiff  → PendingDiffs::record     (normalize/merge)
//! committed op   →               PendingDiffs::apply_operation
//! commit time    →               take → apply → verify_diff_state
//! ```
//!
//! [`PendingDiffs`] keeps one minimal [`StringDiff`] per edited leaf, folds
//! new edits in, rebases entries through committed operations, and resolves
//! positions expressed against text the tree does not contain yet.

pub mod diff;
pub mod node;
pub mod operation;
pub mod path;
pub mod pending;
pub mod point;
pub mod range;

// Re-export key types for easier usage
pub use diff::*;
pub use node::*;
pub use operation::*;
pub use path::*;
pub use pending::*;
pub use point::*;
pub use range::*;
