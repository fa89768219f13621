// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural errors reported by tree surgery and payload updates.

use crate::tree::NodeId;

/// Misuse of the node tree.
///
/// Operations that return this error leave the tree unchanged. Lifecycle
/// hooks and dispatch log these with `tracing` and carry on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The operation needs a parent and the node has none.
    #[error("{0:?} has no parent")]
    NoParent(NodeId),
    /// The two nodes were expected to share a parent.
    #[error("{0:?} and {1:?} are not siblings")]
    NotSiblings(NodeId, NodeId),
    /// The second node is not an ancestor of the first.
    #[error("{1:?} is not an ancestor of {0:?}")]
    NotAnAncestor(NodeId, NodeId),
    /// The move would make a node its own ancestor.
    #[error("moving {0:?} under {1:?} would create a cycle")]
    WouldCycle(NodeId, NodeId),
    /// Both operands are the same node.
    #[error("{0:?} cannot be moved relative to itself")]
    SameNode(NodeId),
    /// The node carries a payload of another kind.
    #[error("{node:?} has a {found} payload, expected {expected}")]
    WrongPayloadKind {
        /// The node that was updated.
        node: NodeId,
        /// The kind the operation needs.
        expected: &'static str,
        /// The kind the node carries.
        found: &'static str,
    },
    /// The node has no payload at all.
    #[error("{0:?} has no display payload")]
    NoPayload(NodeId),
    /// The node must be detached for this operation and already has a
    /// parent.
    #[error("{0:?} is already attached")]
    Attached(NodeId),
}
