//! Wire-format coverage for the payloads hosts exchange: operation logs,
//! persisted pending stores, and selections.

mod common;

use common::apply_all;
use serde_json::json;
use stela_core::{Node, Operation, Path, PendingDiffs, Point, Range, StringDiff};

#[test]
fn a_host_log_deserializes_and_replays() {
    let log = json!([
        { "type": "split_node", "path": [0, 0], "position": 5 },
        {
            "type": "insert_node",
            "path": [1],
            "node": { "inline": false, "children": [{ "text": "new" }] },
        },
        { "type": "insert_text", "path": [0, 1], "offset": 1, "text": "!" },
    ]);
    let ops: Vec<Operation> = serde_json::from_value(log.clone()).unwrap();

    let mut doc = Node::block(vec![Node::block(vec![Node::text("hello world")])]);
    apply_all(&mut doc, &ops);

    assert_eq!(doc.leaf(&Path::from([0, 0])), Ok("hello"));
    assert_eq!(doc.leaf(&Path::from([0, 1])), Ok(" !world"));
    assert_eq!(doc.leaf(&Path::from([1, 0])), Ok("new"));

    // Serializing the log back reproduces the original wire form.
    assert_eq!(serde_json::to_value(&ops).unwrap(), log);
}

#[test]
fn a_persisted_pending_store_keeps_ids_unique() {
    let doc = Node::block(vec![Node::block(vec![
        Node::text("ab"),
        Node::text("cd"),
    ])]);
    let mut pending = PendingDiffs::new();
    pending
        .record(&doc, Path::from([0, 0]), StringDiff::new(1, 1, "X"))
        .unwrap();

    let wire = serde_json::to_value(&pending).unwrap();
    assert_eq!(
        wire,
        json!({
            "diffs": [
                {
                    "id": 0,
                    "path": [0, 0],
                    "diff": { "start": 1, "end": 1, "text": "X" },
                },
            ],
            "next_id": 1,
        })
    );

    // Restoring the store keeps issuing ids that do not collide with the
    // persisted entries.
    let mut restored: PendingDiffs = serde_json::from_value(wire).unwrap();
    let old = restored.get(&Path::from([0, 0])).unwrap().id;
    let new = restored
        .record(&doc, Path::from([0, 1]), StringDiff::new(0, 0, "Y"))
        .unwrap()
        .unwrap();
    assert_ne!(old, new);
}

#[test]
fn selections_serialize_as_plain_point_pairs() {
    let selection = Range::new(Point::new([0, 1], 3), Point::new([2], 0));
    assert_eq!(
        serde_json::to_value(&selection).unwrap(),
        json!({
            "anchor": { "path": [0, 1], "offset": 3 },
            "focus": { "path": [2], "offset": 0 },
        })
    );
}
