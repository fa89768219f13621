// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity and display payload handles.

use core::fmt;

/// Sentinel value indicating "no node" in index fields.
pub(crate) const INVALID: u32 = u32::MAX;

/// A handle to a node in a [`NodeTree`](super::NodeTree).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a node is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}@gen{})", self.idx, self.generation)
    }
}

/// An opaque handle to an externally managed resource (texture, mesh, text
/// layout). The tree stores it and hands it back to the renderer; it never
/// looks inside.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle(pub u32);

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceHandle({})", self.0)
    }
}

/// What a leaf node draws.
///
/// Nodes without a payload are pure grouping nodes: they position and scale
/// their children but are never drawn themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Payload {
    /// One tile of a tiled texture.
    Texture {
        /// The texture.
        texture: ResourceHandle,
        /// Tile index within the texture.
        tile: u32,
    },
    /// A mesh drawn with its own vertex data.
    Mesh(ResourceHandle),
    /// A shaped text run.
    Text(ResourceHandle),
    /// A tile drawn as a disk filled clockwise up to `filled` out of
    /// [`Payload::PROGRESS_FULL`].
    Progress {
        /// The texture.
        texture: ResourceHandle,
        /// Tile index within the texture.
        tile: u32,
        /// Filled part.
        filled: u16,
    },
}

impl Payload {
    /// `filled` of a complete [`Payload::Progress`].
    pub const PROGRESS_FULL: u16 = 1000;

    /// Short name of the payload kind, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Texture { .. } => "texture",
            Self::Mesh(_) => "mesh",
            Self::Text(_) => "text",
            Self::Progress { .. } => "progress",
        }
    }
}
