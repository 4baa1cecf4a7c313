// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builds a small scene that exercises the layer registry and its diagnostics.
//!
//! Every mutation is reported to both a
//! [`PrettyPrintSink`](strata_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](strata_debug::recorder::RecorderSink). The final key table
//! and the recording are exported as JSON files.

use std::fs::File;
use std::io::BufWriter;

use strata_core::id::NodeId;
use strata_core::trace::{MutationEvent, MutationKind, TraceSink, Tracer};
use strata_core::tree::LayerTree;

use strata_debug::pretty::PrettyPrintSink;
use strata_debug::recorder::RecorderSink;

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout())).verbose(true);
    let mut recorder = RecorderSink::new();

    // -- scene -------------------------------------------------------------
    let mut tree = LayerTree::new();
    let scene = tree.register_root().expect("fresh tree");
    emit(&mut pretty, &mut recorder, MutationKind::RegisterRoot, scene);
    tree.declare_layers(scene, ["background", "content", "overlay"])
        .expect("first declaration");
    emit(&mut pretty, &mut recorder, MutationKind::DeclareLayers, scene);

    let wallpaper = tree.add_view(scene).expect("scene is live");
    emit(&mut pretty, &mut recorder, MutationKind::AddView, wallpaper);
    tree.set_view_layer(wallpaper, Some("background"))
        .expect("view is live");
    emit(&mut pretty, &mut recorder, MutationKind::SetViewLayer, wallpaper);

    let sidebar = tree.add_view(scene).expect("scene is live");
    emit(&mut pretty, &mut recorder, MutationKind::AddView, sidebar);
    tree.set_view_layer(sidebar, Some("content"))
        .expect("view is live");
    emit(&mut pretty, &mut recorder, MutationKind::SetViewLayer, sidebar);
    tree.declare_layers(sidebar, ["panel", "badges"])
        .expect("first declaration");
    emit(&mut pretty, &mut recorder, MutationKind::DeclareLayers, sidebar);

    let badge = tree.add_view(sidebar).expect("sidebar is live");
    emit(&mut pretty, &mut recorder, MutationKind::AddView, badge);
    tree.set_view_layer(badge, Some("badges")).expect("view is live");
    emit(&mut pretty, &mut recorder, MutationKind::SetViewLayer, badge);

    let toast = tree.add_view(scene).expect("scene is live");
    emit(&mut pretty, &mut recorder, MutationKind::AddView, toast);
    tree.set_view_layer(toast, Some("overlay")).expect("view is live");
    emit(&mut pretty, &mut recorder, MutationKind::SetViewLayer, toast);

    // -- queries -----------------------------------------------------------
    {
        let mut tracer = Tracer::new(&mut pretty);
        tree.trace_keys(&mut tracer);
        // Misspelled on purpose: falls back to the scene's own position.
        tree.query_key_traced(scene, "overly:above", &mut tracer);
    }
    {
        let mut tracer = Tracer::new(&mut recorder);
        tree.trace_keys(&mut tracer);
        tree.query_key_traced(scene, "overly:above", &mut tracer);
    }

    let before = tree.snapshot();
    tree.remove_view(sidebar).expect("view is live");
    emit(&mut pretty, &mut recorder, MutationKind::RemoveView, sidebar);
    tree.trace_keys(&mut Tracer::new(&mut pretty));
    tree.trace_keys(&mut Tracer::new(&mut recorder));

    println!(
        "removed sidebar: {} keys before, {} after",
        before.len(),
        tree.keys().len()
    );

    // -- export ------------------------------------------------------------
    let path = "keys.json";
    let file = File::create(path).expect("failed to create keys.json");
    let mut writer = BufWriter::new(file);
    strata_debug::json::export_table(tree.keys(), &mut writer).expect("failed to write key table");
    println!("Wrote {path}");

    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    strata_debug::json::export_recording(recorder.as_bytes(), &mut writer)
        .expect("failed to write trace");
    println!("Wrote {path}");
}

fn emit(
    pretty: &mut PrettyPrintSink,
    recorder: &mut RecorderSink,
    kind: MutationKind,
    node: NodeId,
) {
    let e = MutationEvent { kind, node };
    pretty.on_mutation(&e);
    recorder.on_mutation(&e);
}
