// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Key tables ([`on_key_table`](TraceSink::on_key_table)) store only the
//! entry count. Unresolved layer names are stored length-prefixed.

use strata_core::id::NodeId;
use strata_core::table::{Fallback, KeyEntry};
use strata_core::trace::{
    MutationEvent, MutationKind, RecomputeEvent, TraceSink, UnresolvedLayerEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_MUTATION: u8 = 1;
const TAG_RECOMPUTE: u8 = 2;
const TAG_UNRESOLVED_LAYER: u8 = 3;
const TAG_KEY_TABLE_COUNT: u8 = 4;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_node(&mut self, node: NodeId) {
        self.write_u32(node.index());
        self.write_u32(node.generation());
    }

    fn write_str(&mut self, s: &str) {
        // Names longer than u32::MAX bytes are truncated.
        let len = u32::try_from(s.len()).unwrap_or(u32::MAX);
        self.write_u32(len);
        self.buf.extend_from_slice(&s.as_bytes()[..len as usize]);
    }
}

fn mutation_to_u8(kind: MutationKind) -> u8 {
    match kind {
        MutationKind::RegisterRoot => 0,
        MutationKind::AddView => 1,
        MutationKind::RemoveView => 2,
        MutationKind::DeclareLayers => 3,
        MutationKind::SetViewLayer => 4,
    }
}

fn u8_to_mutation(v: u8) -> Option<MutationKind> {
    match v {
        0 => Some(MutationKind::RegisterRoot),
        1 => Some(MutationKind::AddView),
        2 => Some(MutationKind::RemoveView),
        3 => Some(MutationKind::DeclareLayers),
        4 => Some(MutationKind::SetViewLayer),
        _ => None,
    }
}

fn fallback_to_u8(fallback: Fallback) -> u8 {
    match fallback {
        Fallback::UnknownLayer => 0,
        Fallback::UnknownOwner => 1,
    }
}

fn u8_to_fallback(v: u8) -> Option<Fallback> {
    match v {
        0 => Some(Fallback::UnknownLayer),
        1 => Some(Fallback::UnknownOwner),
        _ => None,
    }
}

impl TraceSink for RecorderSink {
    fn on_mutation(&mut self, e: &MutationEvent) {
        self.write_u8(TAG_MUTATION);
        self.write_u8(mutation_to_u8(e.kind));
        self.write_node(e.node);
    }

    fn on_recompute(&mut self, e: &RecomputeEvent) {
        self.write_u8(TAG_RECOMPUTE);
        self.write_u64(e.generation);
        self.write_u32(e.nodes);
        self.write_u32(e.entries);
        self.write_u32(e.digits);
    }

    fn on_unresolved_layer(&mut self, e: &UnresolvedLayerEvent<'_>) {
        self.write_u8(TAG_UNRESOLVED_LAYER);
        self.write_u64(e.generation);
        self.write_node(e.owner);
        self.write_u8(fallback_to_u8(e.fallback));
        self.write_str(e.layer);
    }

    fn on_key_table(&mut self, generation: u64, entries: &[KeyEntry<'_>]) {
        self.write_u8(TAG_KEY_TABLE_COUNT);
        self.write_u64(generation);
        self.write_u32(u32::try_from(entries.len()).unwrap_or(u32::MAX));
    }
}

// ---------------------------------------------------------------------------
// Decoded events
// ---------------------------------------------------------------------------

/// A decoded trace event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A registry mutation.
    Mutation {
        /// What happened.
        kind: MutationKind,
        /// The node involved.
        node: NodeId,
    },
    /// A recompute summary.
    Recompute(RecomputeEvent),
    /// A query that fell back to a coarser slot.
    UnresolvedLayer {
        /// Pass counter of the table that answered.
        generation: u64,
        /// Owner the query named.
        owner: NodeId,
        /// Layer name the query named.
        layer: String,
        /// Which fallback answered instead.
        fallback: Fallback,
    },
    /// Entry count of a key table snapshot.
    KeyTableCount {
        /// Pass counter of the table.
        generation: u64,
        /// Number of keys.
        count: u32,
    },
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Decodes a byte buffer produced by [`RecorderSink`] into events.
///
/// Iteration stops at the first unknown tag or truncated record.
#[must_use]
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter { bytes, pos: 0 }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn read_u8(&mut self) -> Option<u8> {
        let v = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        let end = self.pos.checked_add(4)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(u32::from_le_bytes(slice.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        let end = self.pos.checked_add(8)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(u64::from_le_bytes(slice.try_into().ok()?))
    }

    fn read_node(&mut self) -> Option<NodeId> {
        let idx = self.read_u32()?;
        let generation = self.read_u32()?;
        Some(NodeId::from_raw_parts(idx, generation))
    }

    fn read_string(&mut self) -> Option<String> {
        let len = self.read_u32()? as usize;
        let end = self.pos.checked_add(len)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(String::from_utf8_lossy(slice).into_owned())
    }

    fn decode_event(&mut self) -> Option<RecordedEvent> {
        let tag = self.read_u8()?;
        match tag {
            TAG_MUTATION => {
                let kind = u8_to_mutation(self.read_u8()?)?;
                let node = self.read_node()?;
                Some(RecordedEvent::Mutation { kind, node })
            }
            TAG_RECOMPUTE => Some(RecordedEvent::Recompute(RecomputeEvent {
                generation: self.read_u64()?,
                nodes: self.read_u32()?,
                entries: self.read_u32()?,
                digits: self.read_u32()?,
            })),
            TAG_UNRESOLVED_LAYER => {
                let generation = self.read_u64()?;
                let owner = self.read_node()?;
                let fallback = u8_to_fallback(self.read_u8()?)?;
                let layer = self.read_string()?;
                Some(RecordedEvent::UnresolvedLayer {
                    generation,
                    owner,
                    layer,
                    fallback,
                })
            }
            TAG_KEY_TABLE_COUNT => Some(RecordedEvent::KeyTableCount {
                generation: self.read_u64()?,
                count: self.read_u32()?,
            }),
            _ => None,
        }
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<RecordedEvent> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let event = self.decode_event();
        if event.is_none() {
            // Stop for good on garbage.
            self.pos = self.bytes.len();
        }
        event
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
