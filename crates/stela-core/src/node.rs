//! The minimal document tree the transforms are defined against.
//!
//! Hosts own richer node types; the algebra only ever needs to answer "what
//! is at this path" and "where is the neighbouring text". This module keeps
//! that contract to two shapes: elements with children, and text leaves.
//! There is no mutation API on purpose: applying operations to a tree is
//! the host engine's job, not this crate's.

use serde::{Deserialize, Serialize};

use crate::path::Path;

/// Errors for tree lookups that violate the caller contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("no node exists at {0}")]
    Missing(Path),
    #[error("node at {0} is not a text leaf")]
    NotText(Path),
}

/// One node in a document tree.
///
/// Serialized by shape rather than by tag: a text leaf reads
/// `{"text": "hi"}` and an element reads `{"inline": false, "children":
/// [...]}`, matching how hosts persist documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Element { inline: bool, children: Vec<Node> },
    Text { text: String },
}

impl Node {
    /// A text leaf.
    pub fn text(text: impl Into<String>) -> Node {
        Node::Text { text: text.into() }
    }

    /// A block-level element.
    pub fn block(children: Vec<Node>) -> Node {
        Node::Element { inline: false, children }
    }

    /// An inline element.
    pub fn inline(children: Vec<Node>) -> Node {
        Node::Element { inline: true, children }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text { .. })
    }

    /// True for elements that stack vertically; text leaves and inline
    /// elements are not blocks.
    pub fn is_block(&self) -> bool {
        matches!(self, Node::Element { inline: false, .. })
    }

    /// The node at `path`, if the path resolves in this tree. The empty
    /// path resolves to `self`.
    pub fn get(&self, path: &Path) -> Option<&Node> {
        let mut node = self;
        for &index in path.iter() {
            match node {
                Node::Element { children, .. } => node = children.get(index)?,
                Node::Text { .. } => return None,
            }
        }
        Some(node)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let mut node = self;
        for &index in path.iter() {
            match node {
                Node::Element { children, .. } => node = children.get_mut(index)?,
                Node::Text { .. } => return None,
            }
        }
        Some(node)
    }

    pub fn has(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    /// The text content of the leaf at `path`. Fails loudly when the path
    /// does not resolve or resolves to an element, since that is a caller
    /// bug rather than a rebasing outcome.
    pub fn leaf(&self, path: &Path) -> Result<&str, TreeError> {
        match self.get(path) {
            Some(Node::Text { text }) => Ok(text),
            Some(Node::Element { .. }) => Err(TreeError::NotText(path.clone())),
            None => Err(TreeError::Missing(path.clone())),
        }
    }

    /// Every text leaf of the tree in document order, with its path.
    pub fn text_leaves(&self) -> Vec<(Path, &str)> {
        let mut leaves = Vec::new();
        self.collect_text_leaves(&mut Vec::new(), &mut leaves);
        leaves
    }

    fn collect_text_leaves<'a>(&'a self, prefix: &mut Vec<usize>, out: &mut Vec<(Path, &'a str)>) {
        match self {
            Node::Text { text } => out.push((Path::from(prefix.clone()), text.as_str())),
            Node::Element { children, .. } => {
                for (index, child) in children.iter().enumerate() {
                    prefix.push(index);
                    child.collect_text_leaves(prefix, out);
                    prefix.pop();
                }
            }
        }
    }

    /// The first text leaf strictly after `path` in document order.
    /// Descendants of `path` do not count; the anchor is expected to
    /// address a leaf.
    pub fn next_text_leaf(&self, path: &Path) -> Option<(Path, &str)> {
        self.text_leaves()
            .into_iter()
            .find(|(leaf, _)| leaf.compare(path) == std::cmp::Ordering::Greater)
    }

    /// The last text leaf strictly before `path` in document order.
    pub fn previous_text_leaf(&self, path: &Path) -> Option<(Path, &str)> {
        self.text_leaves()
            .into_iter()
            .rev()
            .find(|(leaf, _)| leaf.compare(path) == std::cmp::Ordering::Less)
    }

    /// The nearest block element strictly above `path`. The root is the
    /// document container, not a block, so it is never returned.
    pub fn closest_block(&self, path: &Path) -> Option<(Path, &Node)> {
        for depth in (1..path.len()).rev() {
            let ancestor = Path::from(&path[..depth]);
            let node = self.get(&ancestor)?;
            if node.is_block() {
                return Some((ancestor, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// <root><p>"ab" <em>"cd"</em> "ef"</p><p>"gh"</p></root>
    fn doc() -> Node {
        Node::block(vec![
            Node::block(vec![
                Node::text("ab"),
                Node::inline(vec![Node::text("cd")]),
                Node::text("ef"),
            ]),
            Node::block(vec![Node::text("gh")]),
        ])
    }

    #[test]
    fn get_resolves_paths_and_the_root() {
        let doc = doc();
        assert_eq!(doc.get(&Path::root()), Some(&doc));
        assert_eq!(doc.get(&Path::from([0, 0])), Some(&Node::text("ab")));
        assert_eq!(doc.get(&Path::from([0, 1, 0])), Some(&Node::text("cd")));
        assert_eq!(doc.get(&Path::from([2])), None);
        // Paths cannot descend through a text leaf.
        assert_eq!(doc.get(&Path::from([0, 0, 0])), None);
        assert!(doc.has(&Path::from([1, 0])));
        assert!(!doc.has(&Path::from([1, 1])));
    }

    #[test]
    fn leaf_distinguishes_missing_from_non_text() {
        let doc = doc();
        assert_eq!(doc.leaf(&Path::from([0, 2])), Ok("ef"));
        assert_eq!(
            doc.leaf(&Path::from([0, 1])),
            Err(TreeError::NotText(Path::from([0, 1])))
        );
        assert_eq!(
            doc.leaf(&Path::from([3])),
            Err(TreeError::Missing(Path::from([3])))
        );
    }

    #[test]
    fn text_leaves_walk_in_document_order() {
        let doc = doc();
        let leaves: Vec<(Path, &str)> = doc.text_leaves();
        assert_eq!(
            leaves,
            vec![
                (Path::from([0, 0]), "ab"),
                (Path::from([0, 1, 0]), "cd"),
                (Path::from([0, 2]), "ef"),
                (Path::from([1, 0]), "gh"),
            ]
        );
    }

    #[test]
    fn neighbouring_leaves_cross_nesting_levels() {
        let doc = doc();
        assert_eq!(
            doc.next_text_leaf(&Path::from([0, 0])),
            Some((Path::from([0, 1, 0]), "cd"))
        );
        assert_eq!(
            doc.next_text_leaf(&Path::from([0, 2])),
            Some((Path::from([1, 0]), "gh"))
        );
        assert_eq!(doc.next_text_leaf(&Path::from([1, 0])), None);
        assert_eq!(
            doc.previous_text_leaf(&Path::from([1, 0])),
            Some((Path::from([0, 2]), "ef"))
        );
        assert_eq!(
            doc.previous_text_leaf(&Path::from([0, 1, 0])),
            Some((Path::from([0, 0]), "ab"))
        );
        assert_eq!(doc.previous_text_leaf(&Path::from([0, 0])), None);
    }

    #[test]
    fn closest_block_skips_inline_wrappers_and_the_root() {
        let doc = doc();
        let (path, node) = doc.closest_block(&Path::from([0, 1, 0])).unwrap();
        assert_eq!(path, Path::from([0]));
        assert!(node.is_block());
        assert_eq!(
            doc.closest_block(&Path::from([1, 0])).unwrap().0,
            Path::from([1])
        );
        // A leaf hanging directly off the root has no enclosing block.
        let flat = Node::block(vec![Node::text("x")]);
        assert_eq!(flat.closest_block(&Path::from([0])), None);
    }

    #[test]
    fn nodes_serialize_by_shape() {
        let doc = Node::block(vec![Node::text("hi")]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"inline": false, "children": [{"text": "hi"}]})
        );
        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }
}
