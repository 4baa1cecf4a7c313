// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::table::{Fallback, KeyEntry};
use strata_core::trace::{
    MutationEvent, MutationKind, RecomputeEvent, TraceSink, UnresolvedLayerEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    /// Also print one line per key on `on_key_table`.
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            verbose: false,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }

    /// Prints every entry of a key table instead of just the count.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn mutation_name(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::RegisterRoot => "register_root",
        MutationKind::AddView => "add_view",
        MutationKind::RemoveView => "remove_view",
        MutationKind::DeclareLayers => "declare_layers",
        MutationKind::SetViewLayer => "set_view_layer",
    }
}

pub(crate) fn fallback_name(fallback: Fallback) -> &'static str {
    match fallback {
        Fallback::UnknownLayer => "owner",
        Fallback::UnknownOwner => "scene",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_mutation(&mut self, e: &MutationEvent) {
        let _ = writeln!(
            self.writer,
            "[mutation] {} node={}",
            mutation_name(e.kind),
            e.node,
        );
    }

    fn on_recompute(&mut self, e: &RecomputeEvent) {
        let _ = writeln!(
            self.writer,
            "[recompute] gen={} nodes={} entries={} digits={}",
            e.generation, e.nodes, e.entries, e.digits,
        );
    }

    fn on_unresolved_layer(&mut self, e: &UnresolvedLayerEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[unresolved] gen={} owner={} layer={:?} fallback={}",
            e.generation,
            e.owner,
            e.layer,
            fallback_name(e.fallback),
        );
    }

    fn on_key_table(&mut self, generation: u64, entries: &[KeyEntry<'_>]) {
        let _ = writeln!(
            self.writer,
            "[keys] gen={generation} entries={}",
            entries.len()
        );
        if self.verbose {
            for entry in entries {
                let _ = writeln!(
                    self.writer,
                    "  {:>12} {}{}",
                    entry.key.to_string(),
                    entry.owner,
                    entry.layer.map(|l| format!(" {l:?}")).unwrap_or_default(),
                );
            }
        }
    }
}
