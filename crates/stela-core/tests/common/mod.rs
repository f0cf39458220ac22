#![allow(dead_code)]

use stela_core::{Affinity, Node, Operation, Path};

/// Applies one operation to the tree the way a host editor would commit
/// it. Panics on malformed operations; tests construct consistent ones.
pub fn apply(root: &mut Node, op: &Operation) {
    match op {
        Operation::InsertNode { path, node } => {
            let (parent, index) = parent_and_index(root, path);
            children_mut(parent).insert(index, node.clone());
        }
        Operation::RemoveNode { path } => {
            let (parent, index) = parent_and_index(root, path);
            children_mut(parent).remove(index);
        }
        Operation::MergeNode { path, .. } => {
            let (parent, index) = parent_and_index(root, path);
            let children = children_mut(parent);
            let node = children.remove(index);
            match (&mut children[index - 1], node) {
                (Node::Text { text }, Node::Text { text: rest }) => {
                    text.push_str(&rest);
                }
                (Node::Element { children: prev, .. }, Node::Element { children: rest, .. }) => {
                    prev.extend(rest);
                }
                _ => panic!("cannot merge a text node with an element"),
            }
        }
        Operation::SplitNode { path, position } => {
            let (parent, index) = parent_and_index(root, path);
            let children = children_mut(parent);
            let split_off = match &mut children[index] {
                Node::Text { text } => {
                    let at = byte_index(text, *position);
                    Node::Text { text: text.split_off(at) }
                }
                Node::Element { inline, children } => Node::Element {
                    inline: *inline,
                    children: children.split_off(*position),
                },
            };
            children.insert(index + 1, split_off);
        }
        Operation::MoveNode { path, new_path } => {
            if path == new_path || path.is_ancestor_of(new_path) {
                return;
            }
            let (parent, index) = parent_and_index(root, path);
            let node = children_mut(parent).remove(index);
            let destination = path
                .transform(op, Affinity::Forward)
                .expect("a moved node keeps a destination");
            let (parent, index) = parent_and_index(root, &destination);
            children_mut(parent).insert(index, node);
        }
        Operation::InsertText { path, offset, text } => {
            let target = text_mut(root, path);
            let at = byte_index(target, *offset);
            target.insert_str(at, text);
        }
        Operation::RemoveText { path, offset, text } => {
            let target = text_mut(root, path);
            let start = byte_index(target, *offset);
            let end = byte_index(target, offset + text.chars().count());
            target.replace_range(start..end, "");
        }
        // Attribute storage is the host's concern; the tree shape and its
        // text are unaffected.
        Operation::SetNode { .. } => {}
    }
}

/// Applies a sequence of operations in order.
pub fn apply_all(root: &mut Node, ops: &[Operation]) {
    for op in ops {
        apply(root, op);
    }
}

fn parent_and_index<'a>(root: &'a mut Node, path: &Path) -> (&'a mut Node, usize) {
    let parent = path.parent().expect("operations address non-root nodes");
    let index = path[path.len() - 1];
    let node = root
        .get_mut(&parent)
        .expect("operation path resolves in the tree");
    (node, index)
}

fn children_mut(node: &mut Node) -> &mut Vec<Node> {
    match node {
        Node::Element { children, .. } => children,
        Node::Text { .. } => panic!("expected an element"),
    }
}

fn text_mut<'a>(root: &'a mut Node, path: &Path) -> &'a mut String {
    match root.get_mut(path) {
        Some(Node::Text { text }) => text,
        _ => panic!("expected a text leaf at {path}"),
    }
}

fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(index, _)| index)
}

/// Three paragraphs with one leaf each.
pub fn three_paragraphs() -> Node {
    Node::block(vec![
        Node::block(vec![Node::text("alpha")]),
        Node::block(vec![Node::text("beta")]),
        Node::block(vec![Node::text("gamma")]),
    ])
}
