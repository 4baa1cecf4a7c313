// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of key tables and recorded traces.
//!
//! [`export_table`] writes a [`KeyTable`] in draw order, bottom-most first.
//! Keys are written as strings because `u128` values overflow JSON numbers
//! in most readers.
//!
//! [`export_recording`] converts bytes produced by
//! [`RecorderSink`](crate::recorder::RecorderSink) into a JSON array with one
//! object per event.

use std::io::{self, Write};

use serde_json::{Value, json};
use strata_core::id::NodeId;
use strata_core::table::KeyTable;

use crate::pretty::fallback_name;
use crate::recorder::{RecordedEvent, decode};

/// Writes `table` as a JSON object listing every key in draw order.
///
/// # Errors
///
/// Returns any I/O error from `writer`.
pub fn export_table(table: &KeyTable, writer: &mut dyn Write) -> io::Result<()> {
    let stats = table.stats();
    let entries: Vec<Value> = table
        .draw_order()
        .iter()
        .map(|entry| {
            json!({
                "owner": node(entry.owner),
                "layer": entry.layer,
                "key": entry.key.to_string(),
                "raw": entry.key.raw().to_string(),
            })
        })
        .collect();

    let doc = json!({
        "generation": stats.generation,
        "root": table.root().map(node),
        "digits": stats.digits,
        "nodes": stats.nodes,
        "entries": entries,
    });
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

/// Converts a binary recording into a JSON array of events.
///
/// # Errors
///
/// Returns any I/O error from `writer`.
pub fn export_recording(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for event in decode(bytes) {
        match event {
            RecordedEvent::Mutation { kind, node: id } => {
                events.push(json!({
                    "event": "mutation",
                    "kind": format!("{kind:?}"),
                    "node": node(id),
                }));
            }
            RecordedEvent::Recompute(e) => {
                events.push(json!({
                    "event": "recompute",
                    "generation": e.generation,
                    "nodes": e.nodes,
                    "entries": e.entries,
                    "digits": e.digits,
                }));
            }
            RecordedEvent::UnresolvedLayer {
                generation,
                owner,
                layer,
                fallback,
            } => {
                events.push(json!({
                    "event": "unresolved_layer",
                    "generation": generation,
                    "owner": node(owner),
                    "layer": layer,
                    "fallback": fallback_name(fallback),
                }));
            }
            RecordedEvent::KeyTableCount { generation, count } => {
                events.push(json!({
                    "event": "key_table",
                    "generation": generation,
                    "count": count,
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn node(id: NodeId) -> Value {
    json!({ "index": id.index(), "generation": id.generation() })
}

#[cfg(test)]
mod tests {
    use strata_core::trace::{MutationEvent, MutationKind, TraceSink, Tracer};
    use strata_core::tree::LayerTree;

    use super::*;
    use crate::recorder::RecorderSink;

    fn scene() -> LayerTree {
        let mut tree = LayerTree::new();
        let root = tree.register_root().unwrap();
        tree.declare_layers(root, ["bg", "fg"]).unwrap();
        let backdrop = tree.add_view(root).unwrap();
        tree.set_view_layer(backdrop, Some("bg")).unwrap();
        tree
    }

    #[test]
    fn table_export_is_in_draw_order() {
        let tree = scene();
        let mut out = Vec::new();
        export_table(tree.keys(), &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();

        let entries = parsed["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0]["layer"], "bg");
        assert_eq!(entries[1]["layer"], Value::Null);
        assert_eq!(entries[2]["layer"], "fg");
        assert_eq!(entries[3]["layer"], Value::Null);
        assert_eq!(entries[3]["owner"]["index"], 0);

        let raws: Vec<u128> = entries
            .iter()
            .map(|e| e["raw"].as_str().unwrap().parse().unwrap())
            .collect();
        assert!(raws.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(parsed["generation"], tree.keys().stats().generation);
    }

    #[test]
    fn empty_table_export() {
        let mut out = Vec::new();
        export_table(&KeyTable::new(), &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["root"], Value::Null);
        assert!(parsed["entries"].as_array().unwrap().is_empty());
    }

    #[test]
    fn recording_export_produces_valid_json() {
        let tree = scene();
        let root = tree.root().unwrap();
        let mut rec = RecorderSink::new();
        rec.on_mutation(&MutationEvent {
            kind: MutationKind::AddView,
            node: root,
        });
        let mut tracer = Tracer::new(&mut rec);
        tree.trace_keys(&mut tracer);
        tree.query_key_traced(root, "menu", &mut tracer);
        drop(tracer);

        let mut out = Vec::new();
        export_recording(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[0]["event"], "mutation");
        assert_eq!(parsed[0]["kind"], "AddView");
        assert_eq!(parsed[1]["event"], "recompute");
        assert_eq!(parsed[2]["event"], "key_table");
        assert_eq!(parsed[2]["count"], 4);
        assert_eq!(parsed[3]["layer"], "menu");
        assert_eq!(parsed[3]["fallback"], "owner");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export_recording(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
