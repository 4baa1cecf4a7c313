// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use crate::id::{INVALID, NodeId};

use super::LayerTree;

/// Raw slot indices of a node's children, in insertion order.
#[derive(Clone, Debug)]
pub(crate) struct ChildSlots<'a> {
    next_sibling: &'a [u32],
    current: u32,
}

impl<'a> ChildSlots<'a> {
    pub(crate) fn new(tree: &'a LayerTree, idx: u32) -> Self {
        Self {
            next_sibling: &tree.next_sibling,
            current: tree.first_child[idx as usize],
        }
    }
}

impl Iterator for ChildSlots<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.next_sibling[idx as usize];
        Some(idx)
    }
}

/// An iterator over the direct children of a node, bottom-most first.
///
/// Created by [`LayerTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    slots: ChildSlots<'a>,
    generation: &'a [u32],
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a LayerTree, idx: u32) -> Self {
        Self {
            slots: ChildSlots::new(tree, idx),
            generation: &tree.generation,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.slots.next()?;
        Some(NodeId {
            idx,
            generation: self.generation[idx as usize],
        })
    }
}
