// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry errors.
//!
//! Every [`TreeError`] is returned synchronously by the mutation that caused
//! it; a failed mutation leaves the tree and its key table untouched. These
//! are programmer errors surfaced during scene construction. Unknown layer
//! names at query time are not errors (see
//! [`KeyTable::resolve`](crate::table::KeyTable::resolve)).

use alloc::boxed::Box;

use crate::id::NodeId;

/// Errors returned by [`LayerTree`](crate::tree::LayerTree) mutations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// `declare_layers` was called again with a different list.
    #[error("layers already set on {owner}")]
    LayersAlreadyDeclared {
        /// The node whose layers were already declared.
        owner: NodeId,
    },
    /// The handle is stale or was never issued by this tree.
    #[error("node {node} is not registered")]
    NodeNotRegistered {
        /// The offending handle.
        node: NodeId,
    },
    /// A single nesting level would need a slot digit at or above the radix.
    #[error("{owner} needs {requested} slots at one level, radix {max_layers} allows {}", .max_layers - 1)]
    LayerCapacityExceeded {
        /// The node whose level overflowed.
        owner: NodeId,
        /// Highest slot digit the operation would need.
        requested: u32,
        /// Configured radix.
        max_layers: u32,
    },
    /// The view would sit deeper than the key space can encode.
    #[error("nesting depth {depth} exceeds the maximum of {max_depth}")]
    DepthExceeded {
        /// Depth the new view would have.
        depth: u32,
        /// Deepest supported nesting for the configured radix.
        max_depth: u32,
    },
    /// A layer list names the same layer twice.
    #[error("layer {name:?} declared twice on {owner}")]
    DuplicateLayerName {
        /// The node being declared.
        owner: NodeId,
        /// The repeated name.
        name: Box<str>,
    },
    /// A layer name the query grammar cannot address: empty, or ending in
    /// a `:above` / `:below` modifier.
    #[error("layer name {name:?} on {owner} is not addressable")]
    InvalidLayerName {
        /// The node being declared.
        owner: NodeId,
        /// The rejected name.
        name: Box<str>,
    },
    /// `register_root` was called on a tree that already has a scene.
    #[error("root scene already registered")]
    RootAlreadyRegistered,
    /// A view was added before the scene was registered.
    #[error("no root scene registered")]
    RootNotRegistered,
    /// A view-only operation was applied to the scene.
    #[error("the root scene is not a view")]
    RootIsNotAView,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages() {
        let owner = NodeId::from_raw_parts(2, 0);
        assert_eq!(
            TreeError::LayersAlreadyDeclared { owner }.to_string(),
            "layers already set on #2.0"
        );
        assert_eq!(
            TreeError::LayerCapacityExceeded {
                owner,
                requested: 40,
                max_layers: 40,
            }
            .to_string(),
            "#2.0 needs 40 slots at one level, radix 40 allows 39"
        );
        assert_eq!(
            TreeError::DuplicateLayerName {
                owner,
                name: "bg".into(),
            }
            .to_string(),
            "layer \"bg\" declared twice on #2.0"
        );
        assert_eq!(
            TreeError::InvalidLayerName {
                owner,
                name: "x:above".into(),
            }
            .to_string(),
            "layer name \"x:above\" on #2.0 is not addressable"
        );
    }
}
