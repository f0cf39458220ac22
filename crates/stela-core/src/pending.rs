//! Reconciliation of text edits that have been observed but not committed.
//!
//! An input surface reports edits faster than a host commits them to its
//! operation log, so there is a window where a leaf's *observed* content and
//! its *committed* content disagree. [`PendingDiffs`] owns that window: it
//! holds one outstanding [`TextDiff`] per leaf, folds newly observed edits
//! into it, rebases every entry when an operation does land, and answers
//! position queries that have to account for text the tree does not contain
//! yet.
//!
//! ## Lifecycle
//!
//! - [`PendingDiffs::record`] normalizes a fresh edit against the live leaf
//!   and either stores it, merges it into the leaf's existing entry, or
//!   drops the entry when the edits cancel out.
//! - [`PendingDiffs::apply_operation`] rebases every entry through a newly
//!   committed operation, discarding entries whose leaf the operation
//!   destroyed.
//! - [`PendingDiffs::remove`] / [`PendingDiffs::take`] hand entries back to
//!   the host when it is ready to commit them, and [`verify_diff_state`]
//!   checks afterwards that the committed tree matches what the input
//!   surface showed.

use serde::{Deserialize, Serialize};

use crate::diff::{StringDiff, char_slice};
use crate::node::{Node, TreeError};
use crate::operation::Operation;
use crate::path::{Affinity, Path};
use crate::point::Point;
use crate::range::Range;

/// Identifier for one pending diff, unique within its [`PendingDiffs`]
/// store for the store's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffId(u32);

/// A [`StringDiff`] bound to the text leaf it edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDiff {
    pub id: DiffId,
    pub path: Path,
    pub diff: StringDiff,
}

impl TextDiff {
    /// The span this diff will replace, as a range on its leaf in
    /// pre-commit coordinates.
    pub fn target_range(&self) -> Range {
        Range {
            anchor: Point { path: self.path.clone(), offset: self.diff.start },
            focus: Point { path: self.path.clone(), offset: self.diff.end },
        }
    }

    /// Rebases the diff through one committed operation. Returns `None`
    /// when the leaf it belongs to no longer exists.
    ///
    /// Text edits and splits/merges of the owning leaf adjust the span in
    /// place; any other path-affecting operation re-addresses the leaf via
    /// [`Path::transform`].
    pub fn transform(&self, op: &Operation) -> Option<TextDiff> {
        let d = &self.diff;
        match op {
            Operation::InsertText { path, offset, text } if path == &self.path => {
                if *offset >= d.end {
                    return Some(self.clone());
                }
                let inserted = text.chars().count();
                let diff = if *offset <= d.start {
                    StringDiff::new(d.start + inserted, d.end + inserted, d.text.clone())
                } else {
                    StringDiff::new(d.start, d.end + inserted, d.text.clone())
                };
                Some(TextDiff { id: self.id, path: self.path.clone(), diff })
            }
            Operation::RemoveText { path, offset, text } if path == &self.path => {
                if *offset >= d.end {
                    return Some(self.clone());
                }
                let removed = text.chars().count();
                let diff = if offset + removed <= d.start {
                    StringDiff::new(d.start - removed, d.end - removed, d.text.clone())
                } else {
                    let end = d.end.saturating_sub(removed).max(*offset).max(d.start);
                    StringDiff::new(d.start, end, d.text.clone())
                };
                Some(TextDiff { id: self.id, path: self.path.clone(), diff })
            }
            Operation::SplitNode { path, position } if path == &self.path => {
                if *position >= d.end {
                    return Some(self.clone());
                }
                if *position > d.start {
                    // Truncated at the split: the part of the span past the
                    // split point stays behind and is dropped, not carried
                    // to the new sibling.
                    let diff = StringDiff::new(d.start, (*position).min(d.end), d.text.clone());
                    return Some(TextDiff { id: self.id, path: self.path.clone(), diff });
                }
                let path = self.path.transform(op, Affinity::Forward)?;
                let diff = StringDiff::new(d.start - position, d.end - position, d.text.clone());
                Some(TextDiff { id: self.id, path, diff })
            }
            Operation::MergeNode { path, position } if path == &self.path => {
                let path = self.path.transform(op, Affinity::Forward)?;
                let diff = StringDiff::new(d.start + position, d.end + position, d.text.clone());
                Some(TextDiff { id: self.id, path, diff })
            }
            _ => {
                if !op.can_transform_path() {
                    return Some(self.clone());
                }
                let path = self.path.transform(op, Affinity::Forward)?;
                Some(TextDiff { id: self.id, path, diff: d.clone() })
            }
        }
    }
}

/// The pending edits of one live document, keyed by leaf path.
///
/// Owned by whatever object represents the editing session; creating the
/// session creates the store and dropping it discards any edits still
/// pending. At most one entry exists per leaf; successive edits to the same
/// leaf merge into it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingDiffs {
    diffs: Vec<TextDiff>,
    next_id: u32,
}

impl PendingDiffs {
    pub fn new() -> PendingDiffs {
        PendingDiffs::default()
    }

    /// Folds one observed edit into the store. `root` must hold the
    /// *committed* tree: the incoming diff is normalized against the leaf's
    /// committed text (or merged with the entry already pending on it).
    ///
    /// Returns the id now pending on the leaf, or `Ok(None)` when the edit
    /// normalized or merged away to nothing. A merge that cancels out drops
    /// the leaf's existing entry too.
    pub fn record(
        &mut self,
        root: &Node,
        path: Path,
        diff: StringDiff,
    ) -> Result<Option<DiffId>, TreeError> {
        let target = root.leaf(&path)?;
        let Some(index) = self.diffs.iter().position(|entry| entry.path == path) else {
            let Some(normalized) = diff.normalize(target) else {
                return Ok(None);
            };
            let id = DiffId(self.next_id);
            self.next_id += 1;
            self.diffs.push(TextDiff { id, path, diff: normalized });
            return Ok(Some(id));
        };
        match self.diffs[index].diff.merge(target, &diff) {
            Some(merged) => {
                self.diffs[index].diff = merged;
                Ok(Some(self.diffs[index].id))
            }
            None => {
                self.diffs.remove(index);
                Ok(None)
            }
        }
    }

    /// The entry pending on `path`, if any.
    pub fn get(&self, path: &Path) -> Option<&TextDiff> {
        self.diffs.iter().find(|entry| &entry.path == path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextDiff> {
        self.diffs.iter()
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Rebases every entry through a committed operation, dropping entries
    /// whose leaf it destroyed.
    pub fn apply_operation(&mut self, op: &Operation) {
        self.diffs = std::mem::take(&mut self.diffs)
            .into_iter()
            .filter_map(|entry| entry.transform(op))
            .collect();
    }

    /// Detaches the entry pending on `path`, for committing or discarding.
    pub fn remove(&mut self, path: &Path) -> Option<TextDiff> {
        let index = self.diffs.iter().position(|entry| &entry.path == path)?;
        Some(self.diffs.remove(index))
    }

    /// Detaches every entry, in the order the leaves were first edited.
    pub fn take(&mut self) -> Vec<TextDiff> {
        std::mem::take(&mut self.diffs)
    }

    pub fn clear(&mut self) {
        self.diffs.clear();
    }

    /// Rebases a point through `op`, accounting for a pending diff on the
    /// point's leaf.
    ///
    /// A point inside or past a pending span sits in *observed* coordinates
    /// that the committed tree cannot resolve. The point is re-expressed
    /// relative to the diff's start (or to the span's pre-edit end), that
    /// anchor is rebased, and the observed distance is added back. Points
    /// at or before the pending span, and points on leaves with nothing
    /// pending, rebase directly with backward affinity.
    pub fn transform_point(&self, point: &Point, op: &Operation) -> Option<Point> {
        let Some(entry) = self
            .get(&point.path)
            .filter(|entry| point.offset > entry.diff.start)
        else {
            return point.transform(op, Affinity::Backward);
        };
        let diff = &entry.diff;
        let text_len = diff.text.chars().count();

        // Inside the replacement text.
        if point.offset <= diff.start + text_len {
            let anchor = Point { path: point.path.clone(), offset: diff.start };
            let anchor = anchor.transform(op, Affinity::Backward)?;
            return Some(Point {
                path: anchor.path,
                offset: anchor.offset + (point.offset - diff.start),
            });
        }

        // Past the replacement: anchor at the span's end in committed
        // coordinates.
        let anchor_offset = point.offset - text_len + (diff.end - diff.start);
        let anchor = Point { path: point.path.clone(), offset: anchor_offset };
        let transformed = anchor.transform(op, Affinity::Backward)?;

        // A same-leaf split landing past the committed anchor resolves the
        // point to the rebased anchor itself; the observed distance is not
        // re-added.
        if let Operation::SplitNode { path, position } = op {
            if path == &point.path && anchor_offset < *position && diff.start < *position {
                return Some(transformed);
            }
        }

        Some(Point {
            path: transformed.path,
            offset: (transformed.offset + point.offset).saturating_sub(anchor_offset),
        })
    }

    /// Rebases a range through `op` via [`PendingDiffs::transform_point`];
    /// collapsed ranges mirror the rebased anchor.
    pub fn transform_range(&self, range: &Range, op: &Operation) -> Option<Range> {
        let anchor = self.transform_point(&range.anchor, op)?;
        let focus = if range.is_collapsed() {
            anchor.clone()
        } else {
            self.transform_point(&range.focus, op)?
        };
        Some(Range { anchor, focus })
    }
}

/// Checks that a pending diff's effect is present in `root` after the host
/// applied it: the leaf must hold the replacement text verbatim at the
/// span's start.
///
/// The one exception is a non-empty insertion recorded at the very end of
/// its leaf. Committing can split formatting such that the inserted
/// characters begin the *next* leaf instead; the diff is still valid when
/// that sibling is a text leaf starting with the replacement text.
///
/// Fails closed: a missing leaf, a non-text node, or any content mismatch
/// means the observed edit no longer matches reality and must be
/// discarded.
pub fn verify_diff_state(root: &Node, text_diff: &TextDiff) -> bool {
    let TextDiff { path, diff, .. } = text_diff;
    let Some(Node::Text { text }) = root.get(path) else {
        return false;
    };
    let leaf_len = text.chars().count();
    if diff.start != leaf_len || diff.text.is_empty() {
        let replaced = char_slice(text, diff.start, diff.start + diff.text.chars().count());
        return replaced == diff.text;
    }
    let Ok(next_path) = path.next_sibling() else {
        return false;
    };
    match root.get(&next_path) {
        Some(Node::Text { text: next_text }) => next_text.starts_with(&diff.text),
        _ => false,
    }
}

/// Resolves a point whose offset was computed against observed text that
/// the committed tree stores across several leaves.
///
/// While the offset overruns the current leaf, the overrun is carried into
/// the next text leaf in document order. The walk must stay inside the
/// point's enclosing block; leaving it (or running out of leaves) means
/// the point cannot be resolved.
pub fn normalize_point(root: &Node, point: &Point) -> Option<Point> {
    let mut path = point.path.clone();
    let mut offset = point.offset;
    let Some(Node::Text { text }) = root.get(&path) else {
        return None;
    };
    let (block_path, _) = root.closest_block(&path)?;

    let mut leaf_len = text.chars().count();
    while offset > leaf_len {
        let (next_path, next_text) = root.next_text_leaf(&path)?;
        if !block_path.is_ancestor_of(&next_path) {
            return None;
        }
        offset -= leaf_len;
        path = next_path;
        leaf_len = next_text.chars().count();
    }
    Some(Point { path, offset })
}

/// [`normalize_point`] over both endpoints; collapsed ranges mirror the
/// normalized anchor.
pub fn normalize_range(root: &Node, range: &Range) -> Option<Range> {
    let anchor = normalize_point(root, &range.anchor)?;
    let focus = if range.is_collapsed() {
        anchor.clone()
    } else {
        normalize_point(root, &range.focus)?
    };
    Some(Range { anchor, focus })
}
