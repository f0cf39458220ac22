//! Tree paths and the structural rebase.
//!
//! A [`Path`] addresses one node in a document tree as the sequence of child
//! indices walked from the root. Paths are plain values: nothing here touches
//! a live tree, so a path is only ever correct *relative to the snapshot it
//! was created against*. [`Path::transform`] is what keeps a path correct as
//! the tree changes underneath it, one operation at a time.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::operation::Operation;

/// Tie-break for a position that sits exactly on a split boundary.
///
/// When a node splits at precisely the position being rebased, both sides of
/// the split are defensible answers. The affinity picks one, or refuses:
/// [`Affinity::None`] destroys the position instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affinity {
    /// Follow the content after the boundary (the new right-hand node).
    #[default]
    Forward,
    /// Stay with the content before the boundary.
    Backward,
    /// Refuse to pick a side; the ambiguous position is destroyed.
    None,
}

/// Errors for path navigation that violates the caller contract.
///
/// These are loud failures for misuse (asking for the parent of the root),
/// not for positions that an edit legitimately destroyed. Transforms signal
/// the latter by returning `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("the root path has no parent or siblings")]
    Root,
    #[error("path {0} is a first child and has no previous sibling")]
    FirstChild(Path),
    #[error("{ancestor} is not an ancestor of {path}")]
    NotAncestor { ancestor: Path, path: Path },
}

/// The location of a node in the tree, as child indices from the root.
///
/// The root itself is the empty path. Paths compare structurally: two paths
/// are [`Ordering::Equal`] under [`Path::compare`] when either is a prefix of
/// the other, so an ancestor sorts *equal to* its descendants rather than
/// before them. Because of that, `Path` deliberately implements neither `Ord`
/// nor `PartialOrd`; use [`Path::compare`] and the ancestry predicates.
///
/// ```
/// use std::cmp::Ordering;
/// use stela_core::Path;
///
/// let parent = Path::from([0]);
/// let child = Path::from([0, 2]);
///
/// assert!(parent.is_ancestor_of(&child));
/// assert_eq!(parent.compare(&child), Ordering::Equal);
/// assert_eq!(Path::from([0, 1]).compare(&child), Ordering::Less);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    /// The empty path addressing the tree root.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Lexicographic order in which ancestry counts as equality.
    pub fn compare(&self, other: &Path) -> Ordering {
        for (a, b) in self.0.iter().zip(other.iter()) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }

    /// Length of the shared prefix of the two paths.
    pub fn common_depth(&self, other: &Path) -> usize {
        self.0
            .iter()
            .zip(other.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// The deepest common ancestor of the two paths.
    pub fn common(&self, other: &Path) -> Path {
        Path(self.0[..self.common_depth(other)].to_vec())
    }

    /// True when `self` is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.len() < other.len() && other[..self.len()] == self.0[..]
    }

    pub fn is_descendant_of(&self, other: &Path) -> bool {
        other.is_ancestor_of(self)
    }

    /// True when `self` equals `other` or is one of its ancestors.
    pub fn is_at_or_above(&self, other: &Path) -> bool {
        self.len() <= other.len() && other[..self.len()] == self.0[..]
    }

    pub fn is_parent_of(&self, other: &Path) -> bool {
        self.len() + 1 == other.len() && self.is_ancestor_of(other)
    }

    pub fn is_child_of(&self, other: &Path) -> bool {
        other.is_parent_of(self)
    }

    /// True when both paths share a parent but address different children.
    pub fn is_sibling_of(&self, other: &Path) -> bool {
        match (self.0.split_last(), other.0.split_last()) {
            (Some((a, a_parent)), Some((b, b_parent))) => a_parent == b_parent && a != b,
            _ => false,
        }
    }

    /// True when `self` sits before `other` as an earlier sibling of `other`
    /// itself or of one of `other`'s ancestors.
    pub fn ends_before(&self, other: &Path) -> bool {
        match self.0.split_last() {
            Some((last, prefix)) => {
                other.len() >= self.len()
                    && other[..prefix.len()] == *prefix
                    && *last < other[prefix.len()]
            }
            None => false,
        }
    }

    pub fn parent(&self) -> Result<Path, PathError> {
        match self.0.split_last() {
            Some((_, prefix)) => Ok(Path(prefix.to_vec())),
            None => Err(PathError::Root),
        }
    }

    /// The path of the sibling immediately after this one.
    pub fn next_sibling(&self) -> Result<Path, PathError> {
        match self.0.split_last() {
            Some((last, prefix)) => {
                let mut indices = prefix.to_vec();
                indices.push(last + 1);
                Ok(Path(indices))
            }
            None => Err(PathError::Root),
        }
    }

    /// The path of the sibling immediately before this one.
    pub fn previous_sibling(&self) -> Result<Path, PathError> {
        match self.0.split_last() {
            Some((0, _)) => Err(PathError::FirstChild(self.clone())),
            Some((last, prefix)) => {
                let mut indices = prefix.to_vec();
                indices.push(last - 1);
                Ok(Path(indices))
            }
            None => Err(PathError::Root),
        }
    }

    /// Strips an ancestor prefix, leaving the suffix below it.
    pub fn relative_to(&self, ancestor: &Path) -> Result<Path, PathError> {
        if ancestor.is_at_or_above(self) {
            Ok(Path(self.0[ancestor.len()..].to_vec()))
        } else {
            Err(PathError::NotAncestor {
                ancestor: ancestor.clone(),
                path: self.clone(),
            })
        }
    }

    /// Every prefix of this path from the root down to the path itself.
    pub fn levels(&self) -> Vec<Path> {
        (0..=self.len()).map(|i| Path(self.0[..i].to_vec())).collect()
    }

    /// Every strict ancestor of this path, from the root down to the parent.
    pub fn ancestors(&self) -> Vec<Path> {
        let mut levels = self.levels();
        levels.pop();
        levels
    }

    /// Rebases this path through one structural operation.
    ///
    /// Returns `None` when the operation destroyed the addressed location
    /// (the node or one of its ancestors was removed, or a split landed
    /// exactly here and `affinity` is [`Affinity::None`]). The root path is
    /// never displaced. Operations anchored on the root path cause no index
    /// shifts (the root has no siblings), with one consequence worth naming:
    /// removing the root removes everything, so it destroys every non-root
    /// path.
    ///
    /// ```
    /// use stela_core::{Affinity, Node, Operation, Path};
    ///
    /// let path = Path::from([0, 1]);
    /// let op = Operation::InsertNode {
    ///     path: Path::from([0, 0]),
    ///     node: Node::text("new"),
    /// };
    ///
    /// assert_eq!(path.transform(&op, Affinity::Forward), Some(Path::from([0, 2])));
    /// ```
    pub fn transform(&self, op: &Operation, affinity: Affinity) -> Option<Path> {
        if self.is_root() {
            return Some(self.clone());
        }
        match op {
            Operation::InsertNode { path: at, .. } => {
                let Some(depth) = at.len().checked_sub(1) else {
                    return Some(self.clone());
                };
                let mut p = self.clone();
                if at.is_at_or_above(self) || at.ends_before(self) {
                    p.0[depth] += 1;
                }
                Some(p)
            }
            Operation::RemoveNode { path: at } => {
                if at.is_at_or_above(self) {
                    return None;
                }
                let mut p = self.clone();
                if at.ends_before(self) {
                    p.0[at.len() - 1] -= 1;
                }
                Some(p)
            }
            Operation::MergeNode { path: at, position } => {
                let Some(depth) = at.len().checked_sub(1) else {
                    return Some(self.clone());
                };
                let mut p = self.clone();
                if at == self || at.ends_before(self) {
                    // Merging a first child has no left-hand target; a path
                    // that would need that slot is gone.
                    p.0[depth] = p.0[depth].checked_sub(1)?;
                } else if at.is_ancestor_of(self) {
                    p.0[depth] = p.0[depth].checked_sub(1)?;
                    p.0[at.len()] += *position;
                }
                Some(p)
            }
            Operation::SplitNode { path: at, position } => {
                let Some(depth) = at.len().checked_sub(1) else {
                    return Some(self.clone());
                };
                let mut p = self.clone();
                if at == self {
                    match affinity {
                        Affinity::Forward => p.0[depth] += 1,
                        Affinity::Backward => {}
                        Affinity::None => return None,
                    }
                } else if at.ends_before(self) {
                    p.0[depth] += 1;
                } else if at.is_ancestor_of(self) && self.0[at.len()] >= *position {
                    p.0[depth] += 1;
                    p.0[at.len()] -= *position;
                }
                Some(p)
            }
            Operation::MoveNode { path: at, new_path } => {
                if at.is_root() || new_path.is_root() {
                    return Some(self.clone());
                }
                // Moving a node onto itself or into its own subtree cannot be
                // applied; treat it as a no-op.
                if at == new_path || at.is_ancestor_of(new_path) {
                    return Some(self.clone());
                }
                // Where the node lands once its own removal has shifted the
                // destination's ancestor index.
                let mut dest = new_path.clone();
                if at.ends_before(new_path) && at.len() < new_path.len() {
                    dest.0[at.len() - 1] -= 1;
                }
                if at.is_at_or_above(self) {
                    let mut moved = dest;
                    moved.0.extend_from_slice(&self.0[at.len()..]);
                    return Some(moved);
                }
                // Outside the moved subtree a move is a removal followed by
                // an insertion; the two shifts compose (and can cancel).
                let mut p = self.clone();
                if at.ends_before(&p) {
                    p.0[at.len() - 1] -= 1;
                }
                if dest.is_at_or_above(&p) || dest.ends_before(&p) {
                    p.0[dest.len() - 1] += 1;
                }
                Some(p)
            }
            Operation::InsertText { .. }
            | Operation::RemoveText { .. }
            | Operation::SetNode { .. } => Some(self.clone()),
        }
    }
}

impl Deref for Path {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, "]")
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Path(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Path(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Path(indices.to_vec())
    }
}

impl FromIterator<usize> for Path {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}
