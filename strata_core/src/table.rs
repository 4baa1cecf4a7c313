// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable key snapshots.
//!
//! A [`KeyTable`] is the output of one recompute pass: the default key of
//! every live node plus the key of every layer it declared. Tables are never
//! mutated after construction; the tree swaps in a fresh one after each
//! mutation, so a compositor holding an `Arc<KeyTable>` for a frame always
//! sees one consistent ordering.

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::id::NodeId;
use crate::key::DrawKey;
use crate::spec::LayerSpec;

/// Which fallback a lookup took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fallback {
    /// The owner is live but never declared the requested layer; its own
    /// default key was used.
    UnknownLayer,
    /// The owner is not in the table; the scene's default key was used.
    UnknownOwner,
}

/// Result of [`KeyTable::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Key to sort by, modifier applied.
    pub key: DrawKey,
    /// Set when the exact slot was not found.
    pub fallback: Option<Fallback>,
}

/// Summary of the recompute pass that produced a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecomputeStats {
    /// Monotonic pass counter of the owning tree (0 for an empty table).
    pub generation: u64,
    /// Live nodes visited.
    pub nodes: u32,
    /// Keys stored (default keys plus layer keys).
    pub entries: u32,
    /// Radix places used by every key.
    pub digits: u32,
}

/// One stored key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEntry<'a> {
    /// Node the key belongs to.
    pub owner: NodeId,
    /// Declared layer name, or `None` for the node's default position.
    pub layer: Option<&'a str>,
    /// The key.
    pub key: DrawKey,
}

#[derive(Clone, Debug)]
pub(crate) struct OwnerKeys {
    pub(crate) own: DrawKey,
    pub(crate) layers: Vec<(Box<str>, DrawKey)>,
}

impl OwnerKeys {
    fn layer(&self, name: &str) -> Option<DrawKey> {
        self.layers
            .iter()
            .find(|(layer, _)| &**layer == name)
            .map(|&(_, key)| key)
    }
}

/// Draw keys of every live node and declared layer.
#[derive(Clone, Debug, Default)]
pub struct KeyTable {
    root: Option<NodeId>,
    owners: HashMap<NodeId, OwnerKeys>,
    stats: RecomputeStats,
}

impl KeyTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(root: NodeId, nodes: usize, digits: u32, generation: u64) -> Self {
        Self {
            root: Some(root),
            owners: HashMap::with_capacity(nodes),
            stats: RecomputeStats {
                generation,
                nodes: 0,
                entries: 0,
                digits,
            },
        }
    }

    pub(crate) fn insert(&mut self, owner: NodeId, keys: OwnerKeys) {
        self.stats.nodes += 1;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "layer count is capped by the radix, a u32"
        )]
        let entries = keys.layers.len() as u32 + 1;
        self.stats.entries += entries;
        let previous = self.owners.insert(owner, keys);
        debug_assert!(previous.is_none(), "{owner:?} visited twice");
    }

    /// Returns statistics of the pass that produced this table.
    #[must_use]
    pub fn stats(&self) -> RecomputeStats {
        self.stats
    }

    /// Returns the scene the table was computed from.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the number of nodes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns whether the table holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Returns whether `owner` has keys in this table.
    #[must_use]
    pub fn contains(&self, owner: NodeId) -> bool {
        self.owners.contains_key(&owner)
    }

    /// Returns the exact key of a slot without any fallback.
    ///
    /// `None` as the layer selects the owner's default position.
    #[must_use]
    pub fn get(&self, owner: NodeId, layer: Option<&str>) -> Option<DrawKey> {
        let keys = self.owners.get(&owner)?;
        match layer {
            None => Some(keys.own),
            Some(name) => keys.layer(name),
        }
    }

    /// Resolves a specifier to a key, degrading gracefully.
    ///
    /// Lookup order: the declared layer on `owner`; `owner`'s own default
    /// key; the scene's default key; [`DrawKey::ZERO`] when the table is
    /// empty. The modifier is applied to whichever key was found. An empty
    /// layer name selects the owner's default position and is not a fallback.
    #[must_use]
    pub fn resolve(&self, owner: NodeId, spec: &LayerSpec<'_>) -> Resolution {
        let (key, fallback) = match self.owners.get(&owner) {
            Some(keys) if spec.is_default() => (keys.own, None),
            Some(keys) => match keys.layer(spec.name) {
                Some(key) => (key, None),
                None => (keys.own, Some(Fallback::UnknownLayer)),
            },
            None => {
                let scene = self
                    .root
                    .and_then(|root| self.owners.get(&root))
                    .map_or(DrawKey::ZERO, |keys| keys.own);
                (scene, Some(Fallback::UnknownOwner))
            }
        };
        Resolution {
            key: key.with_modifier(spec.modifier),
            fallback,
        }
    }

    /// Iterates over all stored keys in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = KeyEntry<'_>> + '_ {
        self.owners.iter().flat_map(|(&owner, keys)| {
            let layers = keys.layers.iter().map(move |(name, key)| KeyEntry {
                owner,
                layer: Some(&**name),
                key: *key,
            });
            core::iter::once(KeyEntry {
                owner,
                layer: None,
                key: keys.own,
            })
            .chain(layers)
        })
    }

    /// Returns every stored key sorted from bottom to top.
    ///
    /// Keys are unique except under [`ChildLayerFallback::Root`]; entries
    /// with equal keys are ordered by owner handle, then layer name.
    ///
    /// [`ChildLayerFallback::Root`]: crate::config::ChildLayerFallback::Root
    #[must_use]
    pub fn draw_order(&self) -> Vec<KeyEntry<'_>> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|entry| (entry.key, entry.owner, entry.layer));
        entries
    }
}
