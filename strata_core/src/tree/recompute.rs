// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full key recomputation.
//!
//! One depth-first pre-order pass from the scene assigns every slot a chain
//! of digits and encodes it with [`key::encode`]:
//!
//! 1. A node with base chain `B` and `n` declared layers gives layer `i`
//!    (1-indexed) the chain `B + [i]` and its own default position
//!    `B + [n + 1]`. Digit 0 stays free so that the base itself sorts below
//!    everything the node declares.
//! 2. The scene's base chain is empty.
//! 3. The `k`-th child (0-indexed) of a node gets the base chain
//!    `slot + [k + 1]`, where `slot` is the chain of the parent position it
//!    stacks in: the occupied layer if the parent declared it, the parent's
//!    default position if no layer is set, and for an undeclared name
//!    whatever [`ChildLayerFallback`] selects.
//!
//! All chains are padded to `2 * depth + 1` digits, the length of the
//! deepest view's own chain. The pass always walks the entire tree; the
//! result replaces the previous table as a whole.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::config::ChildLayerFallback;
use crate::key::{self, DrawKey};
use crate::table::{KeyTable, OwnerKeys};

use super::LayerTree;
use super::traverse::ChildSlots;

/// State threaded through one pass.
struct Pass {
    radix: u32,
    digits: u32,
    fallback: ChildLayerFallback,
    scene_default: Vec<u32>,
    table: KeyTable,
}

impl Pass {
    fn key(&self, chain: &[u32]) -> DrawKey {
        DrawKey::from_position(key::encode(chain, self.digits, self.radix))
    }
}

impl LayerTree {
    /// Rebuilds the key table from scratch and swaps it in.
    pub(crate) fn recompute(&mut self) {
        self.passes += 1;
        let Some(root) = self.root() else {
            self.keys = Arc::new(KeyTable::new());
            return;
        };
        let digits = key::digits_for_depth(self.tree_depth());
        debug_assert!(
            key::key_space(self.config().max_layers, digits).is_some(),
            "{digits} digits overflow the key space"
        );

        let mut pass = Pass {
            radix: self.config().max_layers,
            digits,
            fallback: self.config().child_layer_fallback,
            scene_default: Vec::new(),
            table: KeyTable::with_capacity(root, self.len(), digits, self.passes),
        };
        self.visit(root.idx, &[], &mut pass);
        self.keys = Arc::new(pass.table);
    }

    fn visit(&self, idx: u32, base: &[u32], pass: &mut Pass) {
        let layers = self.declared[idx as usize].as_deref().unwrap_or_default();

        let mut chain = Vec::with_capacity(base.len() + 1);
        chain.extend_from_slice(base);
        let layer_keys = (1_u32..)
            .zip(layers)
            .map(|(digit, name)| {
                chain.push(digit);
                let key = pass.key(&chain);
                chain.pop();
                (name.clone(), key)
            })
            .collect();

        let default_digit = own_digit(layers);
        chain.push(default_digit);
        pass.table.insert(
            self.handle(idx),
            OwnerKeys {
                own: pass.key(&chain),
                layers: layer_keys,
            },
        );
        if idx == self.root {
            pass.scene_default.clone_from(&chain);
        }

        for (sibling, child) in (1_u32..).zip(ChildSlots::new(self, idx)) {
            let slot = match self.occupied[child as usize].as_deref() {
                None => Some(default_digit),
                Some(name) => match (1_u32..).zip(layers).find(|(_, l)| &***l == name) {
                    Some((digit, _)) => Some(digit),
                    None => match pass.fallback {
                        ChildLayerFallback::Parent => Some(default_digit),
                        ChildLayerFallback::Root => None,
                    },
                },
            };
            let mut child_base = match slot {
                Some(digit) => {
                    let mut slot_chain = base.to_vec();
                    slot_chain.push(digit);
                    slot_chain
                }
                None => pass.scene_default.clone(),
            };
            child_base.push(sibling);
            self.visit(child, &child_base, pass);
        }
    }
}

/// Digit of a node's own default position: just above its declared layers.
fn own_digit(layers: &[alloc::boxed::Box<str>]) -> u32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "declarations are capped below the radix, a u32"
    )]
    let n = layers.len() as u32;
    n + 1
}
