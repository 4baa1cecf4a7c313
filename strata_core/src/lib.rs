// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree with globally ordered draw keys.
//!
//! `strata_core` assigns every drawable surface of a scene graph (a *view*,
//! or a named *layer* declared on a view or on the root *scene*) a single
//! [`DrawKey`](key::DrawKey). Compositing surfaces from the lowest key to the
//! highest yields the intended stacking for arbitrary nesting and for explicit
//! `:above` / `:below` hints. It is `no_std` compatible (with `alloc`) and
//! stores nodes in struct-of-arrays form behind generational handles.
//!
//! # Architecture
//!
//! ```text
//!   register_root / add_view / remove_view
//!   declare_layers / set_view_layer
//!       │
//!       ▼
//!   LayerTree (registry) ──► recompute ──► Arc<KeyTable>
//!                                              │
//!                 ┌────────────────────────────┘
//!                 ▼
//!   query_key("ui:above") ──► LayerSpec ──► KeyTable::resolve ──► DrawKey
//! ```
//!
//! **[`tree`]**: The registry. Every successful mutation rebuilds the whole
//! key table in one depth-first pass and swaps it in; queries never
//! recompute.
//!
//! **[`key`]**: Fixed-radix positional encoding of per-level slot chains
//! into one comparable integer.
//!
//! **[`table`]**: Immutable key snapshot produced by a recompute pass.
//!
//! **[`spec`]**: The `<name>[:above|:below]` layer grammar.
//!
//! **[`config`]**: Radix and fallback policy.
//!
//! **[`error`]**: [`TreeError`](error::TreeError).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! registry instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Example
//!
//! ```
//! use strata_core::tree::LayerTree;
//!
//! let mut tree = LayerTree::new();
//! let scene = tree.register_root().unwrap();
//! tree.declare_layers(scene, ["bg", "fg"]).unwrap();
//!
//! let backdrop = tree.add_view(scene).unwrap();
//! tree.set_view_layer(backdrop, Some("bg")).unwrap();
//! let hud = tree.add_view(scene).unwrap();
//!
//! assert!(tree.query_key(backdrop, "") < tree.query_key(scene, "fg"));
//! assert!(tree.query_key(scene, "") < tree.query_key(hud, ""));
//! assert!(tree.query_key(scene, "fg:below") < tree.query_key(scene, "fg"));
//! ```
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-entry key
//!   table events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod error;
pub mod id;
pub mod key;
pub mod spec;
pub mod table;
pub mod trace;
pub mod tree;
