// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the layer registry.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! registry instrumentation calls. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! The most useful event in practice is [`UnresolvedLayerEvent`]: queries
//! never fail on a misspelled layer name, so this is where such typos become
//! visible.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates the per-entry key table event.

use crate::id::NodeId;
use crate::table::{Fallback, RecomputeStats};

#[cfg(feature = "trace-rich")]
use crate::table::KeyEntry;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which registry operation ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// The scene was registered.
    RegisterRoot,
    /// A view was added.
    AddView,
    /// A view and its subtree were removed.
    RemoveView,
    /// Layers were declared on a node.
    DeclareLayers,
    /// A view changed the parent layer it occupies.
    SetViewLayer,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a registry mutation.
#[derive(Clone, Copy, Debug)]
pub struct MutationEvent {
    /// What happened.
    pub kind: MutationKind,
    /// The node that was registered, removed, or modified.
    pub node: NodeId,
}

/// Summary of a recompute pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecomputeEvent {
    /// Pass counter.
    pub generation: u64,
    /// Live nodes visited.
    pub nodes: u32,
    /// Keys stored.
    pub entries: u32,
    /// Radix places per key.
    pub digits: u32,
}

impl From<&RecomputeStats> for RecomputeEvent {
    fn from(stats: &RecomputeStats) -> Self {
        Self {
            generation: stats.generation,
            nodes: stats.nodes,
            entries: stats.entries,
            digits: stats.digits,
        }
    }
}

/// Emitted when a query could not find its exact slot.
#[derive(Clone, Copy, Debug)]
pub struct UnresolvedLayerEvent<'a> {
    /// Pass counter of the table that answered.
    pub generation: u64,
    /// Owner the query named.
    pub owner: NodeId,
    /// Layer name the query named (modifier stripped).
    pub layer: &'a str,
    /// Which fallback answered instead.
    pub fallback: Fallback,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the registry.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a registry mutation.
    fn on_mutation(&mut self, e: &MutationEvent) {
        _ = e;
    }

    /// Called with the summary of a recompute pass.
    fn on_recompute(&mut self, e: &RecomputeEvent) {
        _ = e;
    }

    /// Called when a query fell back to a coarser slot.
    fn on_unresolved_layer(&mut self, e: &UnresolvedLayerEvent<'_>) {
        _ = e;
    }

    /// Called with every key of a table in draw order (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_key_table(&mut self, generation: u64, entries: &[KeyEntry<'_>]) {
        _ = (generation, entries);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`MutationEvent`].
    #[inline]
    pub fn mutation(&mut self, e: &MutationEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_mutation(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RecomputeEvent`].
    #[inline]
    pub fn recompute(&mut self, e: &RecomputeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_recompute(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UnresolvedLayerEvent`].
    #[inline]
    pub fn unresolved_layer(&mut self, e: &UnresolvedLayerEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unresolved_layer(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a full key table (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn key_table(&mut self, generation: u64, entries: &[KeyEntry<'_>]) {
        if let Some(s) = &mut self.sink {
            s.on_key_table(generation, entries);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats() -> RecomputeStats {
        RecomputeStats {
            generation: 42,
            nodes: 3,
            entries: 5,
            digits: 3,
        }
    }

    #[test]
    fn recompute_event_from_stats() {
        let evt = RecomputeEvent::from(&sample_stats());
        assert_eq!(evt.generation, 42);
        assert_eq!(evt.nodes, 3);
        assert_eq!(evt.entries, 5);
        assert_eq!(evt.digits, 3);
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_mutation(&MutationEvent {
            kind: MutationKind::AddView,
            node: NodeId::from_raw_parts(1, 0),
        });
        sink.on_recompute(&RecomputeEvent::from(&sample_stats()));
        sink.on_unresolved_layer(&UnresolvedLayerEvent {
            generation: 1,
            owner: NodeId::from_raw_parts(1, 0),
            layer: "typo",
            fallback: Fallback::UnknownLayer,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.recompute(&RecomputeEvent::from(&sample_stats()));
        tracer.mutation(&MutationEvent {
            kind: MutationKind::RemoveView,
            node: NodeId::from_raw_parts(2, 1),
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::string::String;
        use alloc::vec::Vec;

        use crate::tree::LayerTree;

        #[derive(Default)]
        struct RecordingSink {
            passes: Vec<u64>,
            typos: Vec<String>,
        }
        impl TraceSink for RecordingSink {
            fn on_recompute(&mut self, e: &RecomputeEvent) {
                self.passes.push(e.generation);
            }
            fn on_unresolved_layer(&mut self, e: &UnresolvedLayerEvent<'_>) {
                self.typos.push(e.layer.into());
            }
        }

        let mut tree = LayerTree::new();
        let root = tree.register_root().unwrap();
        tree.declare_layers(root, ["bg"]).unwrap();

        let mut sink = RecordingSink::default();
        let mut tracer = Tracer::new(&mut sink);
        tree.trace_keys(&mut tracer);
        let exact = tree.query_key_traced(root, "bg:above", &mut tracer);
        let typo = tree.query_key_traced(root, "gb:above", &mut tracer);
        // Access sink after tracer is dropped.
        drop(tracer);

        assert_eq!(exact, tree.query_key(root, "bg:above"));
        assert_eq!(typo, tree.query_key(root, ":above"));
        assert_eq!(sink.passes, &[2]);
        assert_eq!(sink.typos, &["gb"]);
    }
}
