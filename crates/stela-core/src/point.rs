//! Character positions inside text leaves.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::operation::Operation;
use crate::path::{Affinity, Path};

/// A position inside a text leaf: the leaf's path plus a character offset
/// into its content.
///
/// Offsets count characters, not bytes, and are only meaningful against the
/// tree snapshot the point was created for. [`Point::transform`] carries a
/// point across one operation so it keeps addressing the same spot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: impl Into<Path>, offset: usize) -> Point {
        Point { path: path.into(), offset }
    }

    /// Document order: path order first, offset as the tie-break.
    pub fn compare(&self, other: &Point) -> Ordering {
        match self.path.compare(&other.path) {
            Ordering::Equal => self.offset.cmp(&other.offset),
            ord => ord,
        }
    }

    pub fn is_before(&self, other: &Point) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn is_after(&self, other: &Point) -> bool {
        self.compare(other) == Ordering::Greater
    }

    /// Rebases this point through one operation.
    ///
    /// Text operations on the point's own leaf shift the offset; a split of
    /// that leaf re-addresses the point onto whichever side `affinity`
    /// picks; everything else delegates to [`Path::transform`] and keeps the
    /// offset. Returns `None` when the leaf was destroyed or a split landed
    /// exactly on the offset under [`Affinity::None`].
    ///
    /// ```
    /// use stela_core::{Affinity, Operation, Path, Point};
    ///
    /// let point = Point::new([0], 5);
    /// let split = Operation::SplitNode { path: Path::from([0]), position: 3 };
    ///
    /// assert_eq!(
    ///     point.transform(&split, Affinity::Forward),
    ///     Some(Point::new([1], 2)),
    /// );
    /// ```
    pub fn transform(&self, op: &Operation, affinity: Affinity) -> Option<Point> {
        match op {
            Operation::InsertText { path, offset, text } => {
                let mut point = self.clone();
                if path == &self.path
                    && (*offset < self.offset
                        || (*offset == self.offset && affinity == Affinity::Forward))
                {
                    point.offset += text.chars().count();
                }
                Some(point)
            }
            Operation::RemoveText { path, offset, text } => {
                let mut point = self.clone();
                if path == &self.path && *offset < self.offset {
                    // Clamp so the point never lands before the removal.
                    point.offset =
                        (*offset).max(self.offset.saturating_sub(text.chars().count()));
                }
                Some(point)
            }
            Operation::MergeNode { path, position } => {
                let offset = if path == &self.path {
                    self.offset + *position
                } else {
                    self.offset
                };
                let path = self.path.transform(op, affinity)?;
                Some(Point { path, offset })
            }
            Operation::SplitNode { path, position } => {
                if path == &self.path {
                    if *position == self.offset && affinity == Affinity::None {
                        None
                    } else if *position < self.offset
                        || (*position == self.offset && affinity == Affinity::Forward)
                    {
                        let path = self.path.transform(op, Affinity::Forward)?;
                        Some(Point { path, offset: self.offset - *position })
                    } else {
                        Some(self.clone())
                    }
                } else {
                    let path = self.path.transform(op, affinity)?;
                    Some(Point { path, offset: self.offset })
                }
            }
            Operation::InsertNode { .. }
            | Operation::RemoveNode { .. }
            | Operation::MoveNode { .. } => {
                let path = self.path.transform(op, affinity)?;
                Some(Point { path, offset: self.offset })
            }
            Operation::SetNode { .. } => Some(self.clone()),
        }
    }
}
