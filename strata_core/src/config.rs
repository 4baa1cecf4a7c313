// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree configuration.

use crate::key;

/// Default radix of the positional key numeral.
pub const DEFAULT_MAX_LAYERS: u32 = 40;

/// Where a view stacks when it occupies a layer name its parent never
/// declared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChildLayerFallback {
    /// Stack at the parent's own default position, as if no layer was set.
    #[default]
    Parent,
    /// Stack at the scene's own default position, regardless of where the
    /// parent sits in the tree.
    Root,
}

/// Configuration for a [`LayerTree`](crate::tree::LayerTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeConfig {
    /// Radix of the key numeral.
    ///
    /// Caps the slots available at any single nesting level: the declared
    /// layers of one node plus its own default position, and the children of
    /// one node, must each stay below this value.
    pub max_layers: u32,
    /// Placement of views whose layer name is unknown to their parent.
    pub child_layer_fallback: ChildLayerFallback,
}

impl TreeConfig {
    /// Creates a configuration with the given radix and the default fallback.
    #[must_use]
    pub const fn new(max_layers: u32) -> Self {
        Self {
            max_layers,
            child_layer_fallback: ChildLayerFallback::Parent,
        }
    }

    /// Configuration matching the historical engine: radix 40, and views on an
    /// undeclared layer fall back to the scene's default position.
    #[must_use]
    pub const fn compat() -> Self {
        Self {
            max_layers: DEFAULT_MAX_LAYERS,
            child_layer_fallback: ChildLayerFallback::Root,
        }
    }

    /// Returns a copy with a different fallback policy.
    #[must_use]
    pub const fn with_child_layer_fallback(mut self, fallback: ChildLayerFallback) -> Self {
        self.child_layer_fallback = fallback;
        self
    }

    /// Returns the deepest view nesting (the scene is depth 0) whose keys
    /// still fit in the key space.
    #[must_use]
    pub fn max_depth(&self) -> u32 {
        if self.max_layers < 2 {
            return 0;
        }
        let mut depth = 0;
        while key::key_space(self.max_layers, key::digits_for_depth(depth + 1)).is_some() {
            depth += 1;
        }
        depth
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LAYERS)
    }
}
