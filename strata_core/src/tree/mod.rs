// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node registry with allocation, topology, and layer declarations.
//!
//! A [`LayerTree`] owns the authoritative ownership structure: one root
//! *scene*, views nested under it, the ordered layer names each node
//! declares, and the layer each view occupies inside its parent. Nodes are
//! stored in struct-of-arrays layout and addressed by generational
//! [`NodeId`] handles; removing a view frees its whole subtree and bumps the
//! slot generations so stale handles are rejected with
//! [`TreeError::NodeNotRegistered`].
//!
//! # Recompute
//!
//! Every successful mutation rebuilds the full [`KeyTable`] in one
//! depth-first pass (see the `recompute` module) and swaps it in. Queries
//! only read the current table. A failed mutation changes nothing.

mod recompute;
mod traverse;

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::config::TreeConfig;
use crate::error::TreeError;
use crate::id::{INVALID, NodeId};
use crate::key::DrawKey;
use crate::spec::LayerSpec;
use crate::table::{KeyTable, Resolution};
use crate::trace::{RecomputeEvent, Tracer, UnresolvedLayerEvent};

pub use traverse::Children;
use traverse::ChildSlots;

/// Registry of the scene, its views, and their layers.
#[derive(Debug)]
pub struct LayerTree {
    config: TreeConfig,
    max_depth: u32,

    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,
    pub(crate) child_count: Vec<u32>,
    pub(crate) root: u32,

    // -- Layers --
    pub(crate) declared: Vec<Option<Vec<Box<str>>>>,
    pub(crate) occupied: Vec<Option<Box<str>>>,

    // -- Depth tracking --
    pub(crate) depth: Vec<u32>,
    /// Levels of views below each node; the root's value is the tree depth.
    pub(crate) height: Vec<u32>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
    /// Live nodes, scene included.
    live: u32,

    // -- Key cache --
    keys: Arc<KeyTable>,
    passes: u64,
}

impl Default for LayerTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerTree {
    /// Creates an empty tree with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Creates an empty tree.
    ///
    /// # Panics
    ///
    /// Panics if `config.max_layers < 2`.
    #[must_use]
    pub fn with_config(config: TreeConfig) -> Self {
        assert!(
            config.max_layers >= 2,
            "max_layers must be at least 2, got {}",
            config.max_layers
        );
        Self {
            config,
            max_depth: config.max_depth(),
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            child_count: Vec::new(),
            root: INVALID,
            declared: Vec::new(),
            occupied: Vec::new(),
            depth: Vec::new(),
            height: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            live: 0,
            keys: Arc::new(KeyTable::new()),
            passes: 0,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    // -- Registration API --

    /// Registers the root scene.
    ///
    /// # Errors
    ///
    /// [`TreeError::RootAlreadyRegistered`] on a second call.
    pub fn register_root(&mut self) -> Result<NodeId, TreeError> {
        if self.root != INVALID {
            return Err(TreeError::RootAlreadyRegistered);
        }
        let idx = self.alloc(INVALID, 0);
        self.root = idx;
        self.recompute();
        Ok(self.handle(idx))
    }

    /// Registers a new view as the topmost child of `parent`.
    ///
    /// # Errors
    ///
    /// - [`TreeError::RootNotRegistered`] before [`register_root`](Self::register_root).
    /// - [`TreeError::NodeNotRegistered`] if `parent` is stale.
    /// - [`TreeError::DepthExceeded`] if the view would nest deeper than
    ///   [`TreeConfig::max_depth`].
    /// - [`TreeError::LayerCapacityExceeded`] if `parent` already holds
    ///   `max_layers - 1` children.
    pub fn add_view(&mut self, parent: NodeId) -> Result<NodeId, TreeError> {
        if self.root == INVALID {
            return Err(TreeError::RootNotRegistered);
        }
        let p = self.validate(parent)?;
        let depth = self.depth[p as usize] + 1;
        if depth > self.max_depth {
            return Err(TreeError::DepthExceeded {
                depth,
                max_depth: self.max_depth,
            });
        }
        let requested = self.child_count[p as usize] + 1;
        if requested >= self.config.max_layers {
            return Err(TreeError::LayerCapacityExceeded {
                owner: parent,
                requested,
                max_layers: self.config.max_layers,
            });
        }

        let c = self.alloc(p, depth);
        self.link_last(p, c);
        self.raise_heights(c);
        self.recompute();
        Ok(self.handle(c))
    }

    /// Removes a view together with its entire subtree.
    ///
    /// All handles into the subtree become stale.
    ///
    /// # Errors
    ///
    /// [`TreeError::NodeNotRegistered`] if `view` is stale,
    /// [`TreeError::RootIsNotAView`] for the scene.
    pub fn remove_view(&mut self, view: NodeId) -> Result<(), TreeError> {
        let idx = self.validate_view(view)?;
        let p = self.parent[idx as usize];
        self.unlink_from_parent(idx);

        let mut stack = Vec::from([idx]);
        while let Some(next) = stack.pop() {
            stack.extend(ChildSlots::new(self, next));
            self.free(next);
        }

        self.settle_heights(p);
        self.recompute();
        Ok(())
    }

    /// Declares the ordered layer names of a view or the scene, bottom-most
    /// first.
    ///
    /// Layers can be declared once per node. Repeating the identical list is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// - [`TreeError::NodeNotRegistered`] if `owner` is stale.
    /// - [`TreeError::LayersAlreadyDeclared`] if a different list was
    ///   declared before.
    /// - [`TreeError::LayerCapacityExceeded`] if the layers plus the node's
    ///   own default position would reach `max_layers`.
    /// - [`TreeError::DuplicateLayerName`] if a name repeats.
    /// - [`TreeError::InvalidLayerName`] if a name is empty or ends in
    ///   `:above` / `:below`, since queries could never reach it.
    pub fn declare_layers<I, S>(&mut self, owner: NodeId, names: I) -> Result<(), TreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let idx = self.validate(owner)?;
        let names: Vec<Box<str>> = names.into_iter().map(|n| n.as_ref().into()).collect();

        if let Some(existing) = &self.declared[idx as usize] {
            return if *existing == names {
                Ok(())
            } else {
                Err(TreeError::LayersAlreadyDeclared { owner })
            };
        }

        let requested = u32::try_from(names.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        if requested >= self.config.max_layers {
            return Err(TreeError::LayerCapacityExceeded {
                owner,
                requested,
                max_layers: self.config.max_layers,
            });
        }
        for (i, name) in names.iter().enumerate() {
            if !is_addressable(name) {
                return Err(TreeError::InvalidLayerName {
                    owner,
                    name: name.clone(),
                });
            }
            if names[..i].contains(name) {
                return Err(TreeError::DuplicateLayerName {
                    owner,
                    name: name.clone(),
                });
            }
        }

        self.declared[idx as usize] = Some(names);
        self.recompute();
        Ok(())
    }

    /// Sets the layer of its parent that `view` stacks in.
    ///
    /// `None` stacks the view at the parent's own default position, above all
    /// of the parent's declared layers. `Some("")` means the same. The name is not checked against the
    /// parent's declarations; an unknown name is placed according to
    /// [`TreeConfig::child_layer_fallback`].
    ///
    /// # Errors
    ///
    /// [`TreeError::NodeNotRegistered`] if `view` is stale,
    /// [`TreeError::RootIsNotAView`] for the scene.
    pub fn set_view_layer(&mut self, view: NodeId, layer: Option<&str>) -> Result<(), TreeError> {
        let idx = self.validate_view(view)?;
        let layer = layer.filter(|name| !name.is_empty());
        if self.occupied[idx as usize].as_deref() == layer {
            return Ok(());
        }
        self.occupied[idx as usize] = layer.map(Box::from);
        self.recompute();
        Ok(())
    }

    // -- Query API --

    /// Returns the draw key for a `<name>[:above|:below]` specifier on
    /// `owner`.
    ///
    /// Never fails: unknown layers resolve to the owner's default key, and
    /// unknown owners to the scene's. Use
    /// [`query_key_traced`](Self::query_key_traced) to surface those
    /// fallbacks.
    #[must_use]
    pub fn query_key(&self, owner: NodeId, spec: &str) -> DrawKey {
        self.resolve(owner, &LayerSpec::parse(spec)).key
    }

    /// Like [`query_key`](Self::query_key), but reports fallbacks as
    /// [`UnresolvedLayerEvent`]s.
    pub fn query_key_traced(&self, owner: NodeId, spec: &str, tracer: &mut Tracer<'_>) -> DrawKey {
        let spec = LayerSpec::parse(spec);
        let resolution = self.resolve(owner, &spec);
        if let Some(fallback) = resolution.fallback {
            tracer.unresolved_layer(&UnresolvedLayerEvent {
                generation: self.keys.stats().generation,
                owner,
                layer: spec.name,
                fallback,
            });
        }
        resolution.key
    }

    /// Resolves a parsed specifier against the current key table.
    #[must_use]
    pub fn resolve(&self, owner: NodeId, spec: &LayerSpec<'_>) -> Resolution {
        self.keys.resolve(owner, spec)
    }

    /// Returns the current key table.
    #[must_use]
    pub fn keys(&self) -> &KeyTable {
        &self.keys
    }

    /// Returns a shared handle to the current key table.
    ///
    /// The snapshot stays valid and unchanged across later mutations.
    #[must_use]
    pub fn snapshot(&self) -> Arc<KeyTable> {
        Arc::clone(&self.keys)
    }

    /// Emits the current table's [`RecomputeEvent`], and with `trace-rich`
    /// every stored key in draw order.
    pub fn trace_keys(&self, tracer: &mut Tracer<'_>) {
        let stats = self.keys.stats();
        tracer.recompute(&RecomputeEvent::from(&stats));
        #[cfg(feature = "trace-rich")]
        tracer.key_table(stats.generation, &self.keys.draw_order());
    }

    // -- Structure getters --

    /// Returns the scene, if registered.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        (self.root != INVALID).then(|| self.handle(self.root))
    }

    /// Returns whether the handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.validate(id).is_ok()
    }

    /// Returns the number of live nodes, scene included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live as usize
    }

    /// Returns whether no node is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root == INVALID
    }

    /// Returns the parent of a node; `None` for the scene.
    ///
    /// # Errors
    ///
    /// [`TreeError::NodeNotRegistered`] if `id` is stale.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        let idx = self.validate(id)?;
        let p = self.parent[idx as usize];
        Ok((p != INVALID).then(|| self.handle(p)))
    }

    /// Returns an iterator over the direct children of a node.
    ///
    /// # Errors
    ///
    /// [`TreeError::NodeNotRegistered`] if `id` is stale.
    pub fn children(&self, id: NodeId) -> Result<Children<'_>, TreeError> {
        let idx = self.validate(id)?;
        Ok(Children::new(self, idx))
    }

    /// Returns the declared layers of a node, or `None` if never declared.
    ///
    /// # Errors
    ///
    /// [`TreeError::NodeNotRegistered`] if `id` is stale.
    pub fn layers(&self, id: NodeId) -> Result<Option<&[Box<str>]>, TreeError> {
        let idx = self.validate(id)?;
        Ok(self.declared[idx as usize].as_deref())
    }

    /// Returns the parent layer a view occupies.
    ///
    /// # Errors
    ///
    /// [`TreeError::NodeNotRegistered`] if `view` is stale.
    pub fn view_layer(&self, view: NodeId) -> Result<Option<&str>, TreeError> {
        let idx = self.validate(view)?;
        Ok(self.occupied[idx as usize].as_deref())
    }

    /// Returns the nesting depth of a node (the scene is 0).
    ///
    /// # Errors
    ///
    /// [`TreeError::NodeNotRegistered`] if `id` is stale.
    pub fn depth(&self, id: NodeId) -> Result<u32, TreeError> {
        let idx = self.validate(id)?;
        Ok(self.depth[idx as usize])
    }

    /// Returns the depth of the deepest view (0 for a scene without views).
    #[must_use]
    pub fn tree_depth(&self) -> u32 {
        if self.root == INVALID {
            0
        } else {
            self.height[self.root as usize]
        }
    }

    // -- Internal helpers --

    fn handle(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    fn validate(&self, id: NodeId) -> Result<u32, TreeError> {
        let live = id.idx < self.len
            && self.alive[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation;
        if live {
            Ok(id.idx)
        } else {
            Err(TreeError::NodeNotRegistered { node: id })
        }
    }

    fn validate_view(&self, id: NodeId) -> Result<u32, TreeError> {
        let idx = self.validate(id)?;
        if idx == self.root {
            return Err(TreeError::RootIsNotAView);
        }
        Ok(idx)
    }

    /// Claims a slot, reusing a freed one when possible.
    fn alloc(&mut self, parent: u32, depth: u32) -> u32 {
        self.live += 1;
        if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.parent[i] = parent;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.child_count[i] = 0;
            self.declared[i] = None;
            self.occupied[i] = None;
            self.depth[i] = depth;
            self.height[i] = 0;
            self.alive[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(parent);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.child_count.push(0);
            self.declared.push(None);
            self.occupied.push(None);
            self.depth.push(depth);
            self.height.push(0);
            self.generation.push(0);
            self.alive.push(true);
            idx
        }
    }

    /// Releases a slot and invalidates its handles.
    fn free(&mut self, idx: u32) {
        let i = idx as usize;
        self.alive[i] = false;
        self.live -= 1;
        // Bump generation so old handles immediately fail validation.
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.parent[i] = INVALID;
        self.first_child[i] = INVALID;
        self.next_sibling[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.child_count[i] = 0;
        self.declared[i] = None;
        self.occupied[i] = None;
        self.free_list.push(idx);
    }

    /// Appends `c` to the child list of `p`.
    fn link_last(&mut self, p: u32, c: u32) {
        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
        self.child_count[p as usize] += 1;
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.child_count[p as usize] -= 1;
        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Propagates a new leaf's height to its ancestors, stopping at the first
    /// ancestor that is already tall enough.
    fn raise_heights(&mut self, leaf: u32) {
        let mut idx = leaf;
        let mut height = 0;
        loop {
            let p = self.parent[idx as usize];
            if p == INVALID || self.height[p as usize] > height {
                break;
            }
            height += 1;
            self.height[p as usize] = height;
            idx = p;
        }
    }

    /// Recomputes heights from `idx` upward after a subtree was detached,
    /// stopping at the first unchanged ancestor.
    fn settle_heights(&mut self, start: u32) {
        let mut idx = start;
        loop {
            let height = ChildSlots::new(self, idx)
                .map(|c| self.height[c as usize] + 1)
                .max()
                .unwrap_or(0);
            if height == self.height[idx as usize] {
                break;
            }
            self.height[idx as usize] = height;
            idx = self.parent[idx as usize];
            if idx == INVALID {
                break;
            }
        }
    }
}

/// Whether queries can name `layer`: non-empty and not parsed as carrying
/// a modifier.
fn is_addressable(layer: &str) -> bool {
    !layer.is_empty() && LayerSpec::parse(layer).name == layer
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn scene() -> (LayerTree, NodeId) {
        let mut tree = LayerTree::new();
        let root = tree.register_root().unwrap();
        (tree, root)
    }

    #[test]
    fn register_root_once() {
        let (mut tree, root) = scene();
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.register_root(), Err(TreeError::RootAlreadyRegistered));
    }

    #[test]
    fn add_view_requires_root() {
        let mut tree = LayerTree::new();
        let bogus = NodeId::from_raw_parts(0, 0);
        assert_eq!(tree.add_view(bogus), Err(TreeError::RootNotRegistered));
        assert!(tree.is_empty());
    }

    #[test]
    fn add_view_and_query_structure() {
        let (mut tree, root) = scene();
        let a = tree.add_view(root).unwrap();
        let b = tree.add_view(root).unwrap();
        let c = tree.add_view(a).unwrap();

        assert_eq!(tree.parent(a), Ok(Some(root)));
        assert_eq!(tree.parent(c), Ok(Some(a)));
        assert_eq!(tree.parent(root), Ok(None));
        let kids: Vec<_> = tree.children(root).unwrap().collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.depth(c), Ok(2));
        assert_eq!(tree.tree_depth(), 2);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn remove_view_tears_down_subtree() {
        let (mut tree, root) = scene();
        let a = tree.add_view(root).unwrap();
        let b = tree.add_view(a).unwrap();
        let c = tree.add_view(b).unwrap();
        let d = tree.add_view(root).unwrap();

        tree.remove_view(a).unwrap();

        for id in [a, b, c] {
            assert!(!tree.is_alive(id), "{id:?} should be gone");
            assert!(!tree.keys().contains(id));
        }
        assert!(tree.is_alive(d));
        let kids: Vec<_> = tree.children(root).unwrap().collect();
        assert_eq!(kids, vec![d]);
        assert_eq!(tree.tree_depth(), 1);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let (mut tree, root) = scene();
        let id1 = tree.add_view(root).unwrap();
        tree.remove_view(id1).unwrap();
        let id2 = tree.add_view(root).unwrap();
        // id2 reuses the same slot but has a different generation.
        assert_eq!(id1.index(), id2.index());
        assert_ne!(id1.generation(), id2.generation());
        assert!(!tree.is_alive(id1));
        assert!(tree.is_alive(id2));
        assert_eq!(
            tree.set_view_layer(id1, Some("x")),
            Err(TreeError::NodeNotRegistered { node: id1 })
        );
        assert_eq!(
            tree.declare_layers(id1, ["x"]),
            Err(TreeError::NodeNotRegistered { node: id1 })
        );
        assert_eq!(
            tree.remove_view(id1),
            Err(TreeError::NodeNotRegistered { node: id1 })
        );
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn reused_slot_starts_clean() {
        let (mut tree, root) = scene();
        let a = tree.add_view(root).unwrap();
        tree.declare_layers(a, ["x"]).unwrap();
        tree.set_view_layer(a, Some("nowhere")).unwrap();
        tree.remove_view(a).unwrap();

        let b = tree.add_view(root).unwrap();
        assert_eq!(b.index(), a.index());
        assert_eq!(tree.layers(b), Ok(None));
        assert_eq!(tree.view_layer(b), Ok(None));
        assert!(tree.children(b).unwrap().next().is_none());
    }

    #[test]
    fn stale_parent_is_rejected() {
        let (mut tree, root) = scene();
        let a = tree.add_view(root).unwrap();
        tree.remove_view(a).unwrap();
        assert_eq!(
            tree.add_view(a),
            Err(TreeError::NodeNotRegistered { node: a })
        );
    }

    #[test]
    fn root_is_not_a_view() {
        let (mut tree, root) = scene();
        assert_eq!(tree.remove_view(root), Err(TreeError::RootIsNotAView));
        assert_eq!(
            tree.set_view_layer(root, Some("bg")),
            Err(TreeError::RootIsNotAView)
        );
    }

    #[test]
    fn declare_layers_once() {
        let (mut tree, root) = scene();
        tree.declare_layers(root, ["a", "b"]).unwrap();
        assert_eq!(
            tree.declare_layers(root, ["a", "c"]),
            Err(TreeError::LayersAlreadyDeclared { owner: root })
        );
        let declared: Vec<&str> = tree
            .layers(root)
            .unwrap()
            .unwrap()
            .iter()
            .map(|s| &**s)
            .collect();
        assert_eq!(declared, ["a", "b"]);
    }

    #[test]
    fn identical_redeclare_skips_recompute() {
        let (mut tree, root) = scene();
        tree.declare_layers(root, ["a", "b"]).unwrap();
        let before = tree.keys().stats().generation;
        tree.declare_layers(root, vec!["a", "b"]).unwrap();
        assert_eq!(tree.keys().stats().generation, before);
    }

    #[test]
    fn empty_declaration_counts() {
        let (mut tree, root) = scene();
        tree.declare_layers(root, core::iter::empty::<&str>()).unwrap();
        assert_eq!(
            tree.declare_layers(root, ["a"]),
            Err(TreeError::LayersAlreadyDeclared { owner: root })
        );
    }

    #[test]
    fn duplicate_layer_names_rejected() {
        let (mut tree, root) = scene();
        assert_eq!(
            tree.declare_layers(root, ["a", "b", "a"]),
            Err(TreeError::DuplicateLayerName {
                owner: root,
                name: "a".into(),
            })
        );
        // A rejected declaration does not count as a declaration.
        tree.declare_layers(root, ["a", "b"]).unwrap();
    }

    #[test]
    fn unaddressable_layer_names_rejected() {
        let (mut tree, root) = scene();
        for bad in ["", "x:above", "x:below", ":below"] {
            assert_eq!(
                tree.declare_layers(root, ["a", bad]),
                Err(TreeError::InvalidLayerName {
                    owner: root,
                    name: bad.into(),
                }),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(tree.layers(root), Ok(None));

        // Other colons are plain name characters.
        tree.declare_layers(root, ["hud:top", "a:"]).unwrap();
        assert_eq!(
            Some(tree.query_key(root, "hud:top")),
            tree.keys().get(root, Some("hud:top"))
        );
    }

    #[test]
    fn empty_view_layer_means_default_slot() {
        let (mut tree, root) = scene();
        tree.declare_layers(root, ["bg"]).unwrap();
        let a = tree.add_view(root).unwrap();
        let before = tree.keys().stats().generation;

        tree.set_view_layer(a, Some("")).unwrap();
        assert_eq!(tree.view_layer(a), Ok(None));
        assert_eq!(tree.keys().stats().generation, before);
        assert!(tree.query_key(root, "") < tree.query_key(a, ""));

        tree.set_view_layer(a, Some("bg")).unwrap();
        tree.set_view_layer(a, Some("")).unwrap();
        assert_eq!(tree.view_layer(a), Ok(None));
        assert!(tree.query_key(root, "") < tree.query_key(a, ""));
    }

    #[test]
    fn sibling_capacity() {
        let mut tree = LayerTree::with_config(TreeConfig::new(4));
        let root = tree.register_root().unwrap();
        for _ in 0..3 {
            tree.add_view(root).unwrap();
        }
        assert_eq!(
            tree.add_view(root),
            Err(TreeError::LayerCapacityExceeded {
                owner: root,
                requested: 4,
                max_layers: 4,
            })
        );
    }

    #[test]
    fn depth_limit() {
        let mut tree = LayerTree::new();
        let mut node = tree.register_root().unwrap();
        let max_depth = tree.config().max_depth();
        for _ in 0..max_depth {
            node = tree.add_view(node).unwrap();
        }
        assert_eq!(
            tree.add_view(node),
            Err(TreeError::DepthExceeded {
                depth: max_depth + 1,
                max_depth,
            })
        );
        assert_eq!(tree.tree_depth(), max_depth);
    }

    #[test]
    fn heights_shrink_after_removal() {
        let (mut tree, root) = scene();
        let a = tree.add_view(root).unwrap();
        let b = tree.add_view(root).unwrap();
        let a1 = tree.add_view(a).unwrap();
        let _a2 = tree.add_view(a1).unwrap();
        let _b1 = tree.add_view(b).unwrap();
        assert_eq!(tree.tree_depth(), 3);

        tree.remove_view(a1).unwrap();
        assert_eq!(tree.tree_depth(), 2);
        tree.remove_view(b).unwrap();
        assert_eq!(tree.tree_depth(), 1);
    }

    #[test]
    fn set_view_layer_round_trip() {
        let (mut tree, root) = scene();
        let a = tree.add_view(root).unwrap();
        tree.set_view_layer(a, Some("bg")).unwrap();
        assert_eq!(tree.view_layer(a), Ok(Some("bg")));
        tree.set_view_layer(a, None).unwrap();
        assert_eq!(tree.view_layer(a), Ok(None));
    }

    #[test]
    fn failed_mutation_keeps_table() {
        let (mut tree, root) = scene();
        tree.declare_layers(root, ["a"]).unwrap();
        let before = tree.snapshot();
        let _ = tree.declare_layers(root, ["b"]);
        assert!(Arc::ptr_eq(&before, &tree.snapshot()));
    }

    #[test]
    #[should_panic(expected = "max_layers must be at least 2")]
    fn radix_one_panics() {
        let _ = LayerTree::with_config(TreeConfig::new(1));
    }
}
