//! The atomic edits a document log is made of.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::path::Path;

/// Property assignments carried by [`Operation::SetNode`].
///
/// Ordered so that serialized logs are byte-stable.
pub type Properties = BTreeMap<String, String>;

/// One atomic edit against a document tree.
///
/// Operations are what hosts append to their edit log and what every
/// transform in this crate rebases positions through. The five node kinds
/// reshape the tree; [`InsertText`](Operation::InsertText) and
/// [`RemoveText`](Operation::RemoveText) touch a single leaf's content;
/// [`SetNode`](Operation::SetNode) changes neither shape nor content and is
/// ignored by every transform.
///
/// The set of kinds is closed on purpose. Every transform matches
/// exhaustively, so adding a kind fails to compile until each case analysis
/// has decided how to handle it.
///
/// Serialized form is internally tagged, so a log entry reads as
/// `{"type": "split_node", "path": [0, 1], "position": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Insert `node` so that it ends up at `path`.
    InsertNode { path: Path, node: Node },
    /// Remove the node at `path` together with its subtree.
    RemoveNode { path: Path },
    /// Fold the node at `path` into its previous sibling. `position` is the
    /// length the sibling had before the merge (child count for elements,
    /// character count for text), which is where the merged content begins.
    MergeNode { path: Path, position: usize },
    /// Split the node at `path` in two at `position` (a child index for
    /// elements, a character offset for text); the tail becomes a new next
    /// sibling.
    SplitNode { path: Path, position: usize },
    /// Relocate the subtree at `path` so that it ends up at `new_path`,
    /// expressed against the tree as it was before the removal.
    MoveNode { path: Path, new_path: Path },
    /// Insert `text` into the leaf at `path`, before character `offset`.
    InsertText { path: Path, offset: usize, text: String },
    /// Remove `text` from the leaf at `path`, starting at character
    /// `offset`. Carrying the removed text keeps the operation invertible.
    RemoveText { path: Path, offset: usize, text: String },
    /// Assign properties on the node at `path`. Every transform ignores it.
    SetNode { path: Path, properties: Properties },
}

impl Operation {
    /// Fast filter for the kinds that can displace a path at all. Callers
    /// rebasing many positions skip the full case analysis when this is
    /// false.
    pub fn can_transform_path(&self) -> bool {
        matches!(
            self,
            Operation::InsertNode { .. }
                | Operation::RemoveNode { .. }
                | Operation::MergeNode { .. }
                | Operation::SplitNode { .. }
                | Operation::MoveNode { .. }
        )
    }
}
