// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, linking, and property access.

use core::any::Any;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::flags::{Flag, NodeFlags};
use super::id::{INVALID, NodeId, Payload, ResourceHandle};
use super::props::{NodeTransform, Prop};
use super::traverse::Children;
use crate::behavior::NodeBehavior;
use crate::dirty;
use crate::error::TreeError;
use crate::smooth::{ShowTransition, SmoothValue};
use crate::time::FrameTime;

/// Everything needed to create a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeDesc {
    /// Centre x in the parent's frame.
    pub x: f64,
    /// Centre y in the parent's frame.
    pub y: f64,
    /// Unscaled width.
    pub width: f64,
    /// Unscaled height.
    pub height: f64,
    /// Critical damping of every property; `0` snaps.
    pub lambda: f64,
    /// Initial flags.
    pub flags: NodeFlags,
    /// What the node draws, if anything.
    pub payload: Option<Payload>,
}

impl NodeDesc {
    /// A static (non-animated) node with no flags and no payload.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            lambda: 0.0,
            flags: NodeFlags::default(),
            payload: None,
        }
    }

    /// Sets the damping.
    #[must_use]
    pub fn lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Replaces the flags.
    #[must_use]
    pub fn flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Raises one flag.
    #[must_use]
    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.set(flag, true);
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Struct-of-arrays storage for all nodes of a scene.
///
/// Nodes are addressed by [`NodeId`] handles. Each node occupies a slot in
/// parallel arrays; destroyed nodes are recycled through a free list and
/// generation counters make stale handles detectable.
///
/// Sibling lists are doubly linked and the parent knows both ends, so
/// appending, prepending, and walking in either direction are O(1) per step.
///
/// The tree also carries the current [`FrameTime`]: every animated setter
/// evaluates the outgoing motion at [`now`](Self::now).
#[derive(Debug)]
pub struct NodeTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) last_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Node state --
    pub(crate) flags: Vec<NodeFlags>,
    pub(crate) transform: Vec<NodeTransform>,
    pub(crate) transition: Vec<ShowTransition>,
    pub(crate) payload: Vec<Option<Payload>>,
    pub(crate) behavior: Vec<Option<Box<dyn NodeBehavior>>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) pending_removed: Vec<NodeId>,

    // -- Clock --
    now: FrameTime,
    transition_template: ShowTransition,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new(ShowTransition::new(
            crate::time::Duration::from_millis(500),
            crate::smooth::PopCurve::default(),
        ))
    }
}

impl NodeTree {
    /// Creates an empty tree. Every node gets a copy of `transition` as its
    /// show/hide ramp.
    #[must_use]
    pub fn new(transition: ShowTransition) -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            last_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            flags: Vec::new(),
            transform: Vec::new(),
            transition: Vec::new(),
            payload: Vec::new(),
            behavior: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_removed: Vec::new(),
            now: FrameTime::ZERO,
            transition_template: transition,
        }
    }

    // -- Clock --

    /// Returns the time every setter evaluates against.
    #[inline]
    #[must_use]
    pub const fn now(&self) -> FrameTime {
        self.now
    }

    /// Advances the tree's clock. Scene time never goes backwards, so an
    /// earlier `now` is ignored.
    pub fn set_now(&mut self, now: FrameTime) {
        if now > self.now {
            self.now = now;
        }
    }

    // -- Allocation API --

    /// Creates a detached node and returns its handle.
    pub fn create(&mut self, desc: NodeDesc) -> NodeId {
        let transform = NodeTransform::new(desc.x, desc.y, desc.width, desc.height, desc.lambda);
        let mut transition = self.transition_template;
        transition.set_options(false, desc.flags.layout.popping);
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.last_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.flags[i] = desc.flags;
            self.transform[i] = transform;
            self.transition[i] = transition;
            self.payload[i] = desc.payload;
            self.behavior[i] = None;
            self.alive[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.last_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.flags.push(desc.flags);
            self.transform.push(transform);
            self.transition.push(transition);
            self.payload.push(desc.payload);
            self.behavior.push(None);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.id_at(idx)
    }

    /// Creates a node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, desc: NodeDesc) -> NodeId {
        self.validate(parent);
        let id = self.create(desc);
        self.link_as_child(id.idx, parent.idx, false);
        id
    }

    /// Creates a node as the first child of `parent`.
    pub fn add_first_child(&mut self, parent: NodeId, desc: NodeDesc) -> NodeId {
        self.validate(parent);
        let id = self.create(desc);
        self.link_as_child(id.idx, parent.idx, true);
        id
    }

    /// Creates a node next to `bro`: just before it (as its big brother)
    /// when `before`, just after it otherwise.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoParent`] if `bro` is detached; nothing is created.
    pub fn add_sibling(
        &mut self,
        bro: NodeId,
        desc: NodeDesc,
        before: bool,
    ) -> Result<NodeId, TreeError> {
        self.validate(bro);
        if self.parent[bro.idx as usize] == INVALID {
            return Err(TreeError::NoParent(bro));
        }
        let id = self.create(desc);
        self.link_as_sibling(id.idx, bro.idx, before);
        Ok(id)
    }

    /// Destroys a node and its whole subtree, freeing their slots.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy(&mut self, id: NodeId) {
        self.validate(id);
        if self.parent[id.idx as usize] != INVALID {
            self.unlink(id.idx);
        }
        let mut stack = vec![id.idx];
        while let Some(idx) = stack.pop() {
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
            self.free(idx);
        }
    }

    /// Destroys every child of `id` (and their subtrees).
    pub fn destroy_children(&mut self, id: NodeId) {
        self.validate(id);
        while let Some(child) = self.first_child(id) {
            self.destroy(child);
        }
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len
            && self.alive[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology queries --

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.parent[id.idx as usize])
    }

    /// Returns the first (eldest) child.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.first_child[id.idx as usize])
    }

    /// Returns the last (youngest) child.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.last_child[id.idx as usize])
    }

    /// Returns the next (younger) sibling: the little brother.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.next_sibling[id.idx as usize])
    }

    /// Returns the previous (elder) sibling: the big brother.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.prev_sibling[id.idx as usize])
    }

    /// Returns whether the node has at least one child.
    #[must_use]
    pub fn has_children(&self, id: NodeId) -> bool {
        self.validate(id);
        self.first_child[id.idx as usize] != INVALID
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns whether `ancestor` is `id` itself or one of its ancestors.
    #[must_use]
    pub fn is_in_branch_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.validate(id);
        self.validate(ancestor);
        let mut idx = id.idx;
        while idx != INVALID {
            if idx == ancestor.idx {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }

    /// Returns the topmost ancestor of a node (itself if detached).
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.validate(id);
        let mut idx = id.idx;
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
        }
        self.id_at(idx)
    }

    // -- Flags --

    /// Returns the flags of a node.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> &NodeFlags {
        self.validate(id);
        &self.flags[id.idx as usize]
    }

    /// Returns the flags of a node mutably.
    ///
    /// Prefer [`set_show`](Self::set_show) for the `show` flag: it keeps the
    /// display walk's pruning flags and the visibility report consistent.
    #[must_use]
    pub fn flags_mut(&mut self, id: NodeId) -> &mut NodeFlags {
        self.validate(id);
        &mut self.flags[id.idx as usize]
    }

    /// Returns the state of one flag.
    #[must_use]
    pub fn has_flag(&self, id: NodeId, flag: Flag) -> bool {
        self.flags(id).get(flag)
    }

    /// Sets one flag. `Flag::Show` is routed through
    /// [`set_show`](Self::set_show).
    pub fn set_flag(&mut self, id: NodeId, flag: Flag, on: bool) {
        if flag == Flag::Show {
            self.set_show(id, on);
        } else {
            self.flags_mut(id).set(flag, on);
        }
    }

    /// Shows or un-shows a node.
    ///
    /// Showing raises `branch_to_display` on the ancestors so the next display
    /// walk reaches the node even if the pruning flags went stale.
    pub fn set_show(&mut self, id: NodeId, show: bool) {
        self.validate(id);
        let i = id.idx as usize;
        if self.flags[i].visibility.show == show {
            return;
        }
        self.flags[i].visibility.show = show;
        self.dirty.mark(id.idx, dirty::VISIBILITY);
        if show {
            let mut p = self.parent[i];
            while p != INVALID && !self.flags[p as usize].visibility.branch_to_display {
                self.flags[p as usize].visibility.branch_to_display = true;
                p = self.parent[p as usize];
            }
        }
    }

    /// Whether the display walk should keep this node (or its branch) on
    /// screen: shown, something below it is shown, or its fade-out is still
    /// running.
    #[must_use]
    pub fn is_display_active(&self, id: NodeId) -> bool {
        self.validate(id);
        self.is_display_active_at(id.idx)
    }

    // -- Animated properties --

    /// Returns all animated properties of a node.
    #[must_use]
    pub fn transform(&self, id: NodeId) -> &NodeTransform {
        self.validate(id);
        &self.transform[id.idx as usize]
    }

    /// Returns all animated properties of a node mutably.
    #[must_use]
    pub fn transform_mut(&mut self, id: NodeId) -> &mut NodeTransform {
        self.validate(id);
        &mut self.transform[id.idx as usize]
    }

    /// Returns one animated property.
    #[must_use]
    pub fn value(&self, id: NodeId, prop: Prop) -> &SmoothValue {
        self.transform(id).get(prop)
    }

    /// Returns one animated property mutably.
    #[must_use]
    pub fn value_mut(&mut self, id: NodeId, prop: Prop) -> &mut SmoothValue {
        self.transform_mut(id).get_mut(prop)
    }

    /// Returns the displayed value of a property at [`now`](Self::now).
    #[must_use]
    pub fn pos(&self, id: NodeId, prop: Prop) -> f64 {
        self.value(id, prop).pos(self.now)
    }

    /// Returns the target value of a property.
    #[must_use]
    pub fn real(&self, id: NodeId, prop: Prop) -> f64 {
        self.value(id, prop).real()
    }

    /// Sets the target (and rest position) of a property, gliding there
    /// unless `fix`.
    pub fn set(&mut self, id: NodeId, prop: Prop, value: f64, fix: bool) {
        let now = self.now;
        self.value_mut(id, prop).set(value, fix, true, now);
    }

    /// Half the scaled width of a node (see [`NodeTransform::delta_x`]).
    #[must_use]
    pub fn delta_x(&self, id: NodeId) -> f64 {
        self.transform(id).delta_x()
    }

    /// Half the scaled height of a node.
    #[must_use]
    pub fn delta_y(&self, id: NodeId) -> f64 {
        self.transform(id).delta_y()
    }

    /// Changes the damping of every property of a node without jumps.
    pub fn set_lambda(&mut self, id: NodeId, lambda: f64) {
        let now = self.now;
        let t = self.transform_mut(id);
        for v in [
            &mut t.x,
            &mut t.y,
            &mut t.z,
            &mut t.width,
            &mut t.height,
            &mut t.scale_x,
            &mut t.scale_y,
        ] {
            v.update_lambda(lambda, now);
        }
    }

    // -- Show transition --

    /// Returns the show/hide ramp of a node.
    #[must_use]
    pub fn transition(&self, id: NodeId) -> &ShowTransition {
        self.validate(id);
        &self.transition[id.idx as usize]
    }

    /// Returns the show/hide ramp of a node mutably.
    #[must_use]
    pub fn transition_mut(&mut self, id: NodeId) -> &mut ShowTransition {
        self.validate(id);
        &mut self.transition[id.idx as usize]
    }

    // -- Payload --

    /// Returns what the node draws.
    #[must_use]
    pub fn payload(&self, id: NodeId) -> Option<Payload> {
        self.validate(id);
        self.payload[id.idx as usize]
    }

    /// Replaces what the node draws.
    pub fn set_payload(&mut self, id: NodeId, payload: Option<Payload>) {
        self.validate(id);
        self.payload[id.idx as usize] = payload;
    }

    /// Changes the tile of a texture payload.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoPayload`] or [`TreeError::WrongPayloadKind`] if the node
    /// does not draw a texture; the node is unchanged.
    pub fn set_tile(&mut self, id: NodeId, new_tile: u32) -> Result<(), TreeError> {
        self.validate(id);
        match &mut self.payload[id.idx as usize] {
            Some(Payload::Texture { tile, .. }) => {
                *tile = new_tile;
                Ok(())
            }
            Some(other) => Err(TreeError::WrongPayloadKind {
                node: id,
                expected: "texture",
                found: other.kind_name(),
            }),
            None => Err(TreeError::NoPayload(id)),
        }
    }

    /// Sets how much of a progress payload is filled, `ratio` being clamped
    /// to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoPayload`] or [`TreeError::WrongPayloadKind`] if the node
    /// does not draw a progress disk; the node is unchanged.
    pub fn set_progress(&mut self, id: NodeId, ratio: f64) -> Result<(), TreeError> {
        self.validate(id);
        match &mut self.payload[id.idx as usize] {
            Some(Payload::Progress { filled, .. }) => {
                let full = f64::from(Payload::PROGRESS_FULL);
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "clamped to [0, PROGRESS_FULL] first"
                )]
                let value = (ratio.clamp(0.0, 1.0) * full).round() as u16;
                *filled = value;
                Ok(())
            }
            Some(other) => Err(TreeError::WrongPayloadKind {
                node: id,
                expected: "progress",
                found: other.kind_name(),
            }),
            None => Err(TreeError::NoPayload(id)),
        }
    }

    /// Swaps the text run of a text payload.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoPayload`] or [`TreeError::WrongPayloadKind`] if the node
    /// does not draw text; the node is unchanged.
    pub fn set_text(&mut self, id: NodeId, text: ResourceHandle) -> Result<(), TreeError> {
        self.validate(id);
        match &mut self.payload[id.idx as usize] {
            Some(Payload::Text(handle)) => {
                *handle = text;
                Ok(())
            }
            Some(other) => Err(TreeError::WrongPayloadKind {
                node: id,
                expected: "text",
                found: other.kind_name(),
            }),
            None => Err(TreeError::NoPayload(id)),
        }
    }

    // -- Behaviors --

    /// Attaches a behavior, replacing any previous one.
    pub fn set_behavior(&mut self, id: NodeId, behavior: impl NodeBehavior) {
        self.validate(id);
        self.behavior[id.idx as usize] = Some(Box::new(behavior));
    }

    /// Returns the node's behavior if it is a `T`.
    #[must_use]
    pub fn behavior<T: NodeBehavior>(&self, id: NodeId) -> Option<&T> {
        self.validate(id);
        let b: &dyn Any = self.behavior[id.idx as usize].as_deref()?;
        b.downcast_ref::<T>()
    }

    /// Returns the node's behavior mutably if it is a `T`.
    #[must_use]
    pub fn behavior_mut<T: NodeBehavior>(&mut self, id: NodeId) -> Option<&mut T> {
        self.validate(id);
        let b: &mut dyn Any = self.behavior[id.idx as usize].as_deref_mut()?;
        b.downcast_mut::<T>()
    }

    /// Whether a behavior is attached (and not currently running).
    #[must_use]
    pub fn has_behavior(&self, id: NodeId) -> bool {
        self.validate(id);
        self.behavior[id.idx as usize].is_some()
    }

    /// Takes the behavior out of its slot so it can be called with the
    /// whole scene borrowed mutably.
    pub(crate) fn take_behavior(&mut self, id: NodeId) -> Option<Box<dyn NodeBehavior>> {
        if !self.is_alive(id) {
            return None;
        }
        self.behavior[id.idx as usize].take()
    }

    /// Puts a behavior back after a call. Dropped if the node died meanwhile
    /// or a new behavior was installed.
    pub(crate) fn restore_behavior(&mut self, id: NodeId, behavior: Box<dyn NodeBehavior>) {
        if self.is_alive(id) && self.behavior[id.idx as usize].is_none() {
            self.behavior[id.idx as usize] = Some(behavior);
        }
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Builds the current handle of a live slot.
    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    #[inline]
    pub(crate) fn opt_id(&self, idx: u32) -> Option<NodeId> {
        (idx != INVALID).then(|| self.id_at(idx))
    }

    /// Drains one dirty channel, keeping the keys of live nodes.
    pub(crate) fn drain_dirty(&mut self, channel: understory_dirty::Channel) -> Vec<NodeId> {
        let keys: Vec<u32> = self.dirty.drain(channel).deterministic().run().collect();
        keys.into_iter()
            .filter(|&idx| idx < self.len && self.alive[idx as usize])
            .map(|idx| self.id_at(idx))
            .collect()
    }

    pub(crate) fn take_removed(&mut self) -> Vec<NodeId> {
        core::mem::take(&mut self.pending_removed)
    }

    pub(crate) fn is_display_active_at(&self, idx: u32) -> bool {
        let i = idx as usize;
        let v = self.flags[i].visibility;
        v.show
            || v.branch_to_display
            || (self.payload[i].is_some() && self.transition[i].is_active())
    }

    /// Links a detached `c` under `p`, first or last.
    pub(crate) fn link_as_child(&mut self, c: u32, p: u32, first: bool) {
        let (ci, pi) = (c as usize, p as usize);
        self.parent[ci] = p;
        self.prev_sibling[ci] = INVALID;
        self.next_sibling[ci] = INVALID;
        if self.first_child[pi] == INVALID {
            self.first_child[pi] = c;
            self.last_child[pi] = c;
        } else if first {
            let old = self.first_child[pi];
            self.next_sibling[ci] = old;
            self.prev_sibling[old as usize] = c;
            self.first_child[pi] = c;
        } else {
            let old = self.last_child[pi];
            self.prev_sibling[ci] = old;
            self.next_sibling[old as usize] = c;
            self.last_child[pi] = c;
        }
        self.after_link(c);
    }

    /// Links a detached `c` next to `bro`, which must have a parent.
    pub(crate) fn link_as_sibling(&mut self, c: u32, bro: u32, before: bool) {
        let p = self.parent[bro as usize];
        let ci = c as usize;
        self.parent[ci] = p;
        if before {
            let big = self.prev_sibling[bro as usize];
            self.next_sibling[ci] = bro;
            self.prev_sibling[ci] = big;
            self.prev_sibling[bro as usize] = c;
            if big == INVALID {
                self.first_child[p as usize] = c;
            } else {
                self.next_sibling[big as usize] = c;
            }
        } else {
            let little = self.next_sibling[bro as usize];
            self.prev_sibling[ci] = bro;
            self.next_sibling[ci] = little;
            self.next_sibling[bro as usize] = c;
            if little == INVALID {
                self.last_child[p as usize] = c;
            } else {
                self.prev_sibling[little as usize] = c;
            }
        }
        self.after_link(c);
    }

    /// Removes `idx` from its parent's child list.
    pub(crate) fn unlink(&mut self, idx: u32) {
        let i = idx as usize;
        let p = self.parent[i];
        let prev = self.prev_sibling[i];
        let next = self.next_sibling[i];
        if prev == INVALID {
            self.first_child[p as usize] = next;
        } else {
            self.next_sibling[prev as usize] = next;
        }
        if next == INVALID {
            self.last_child[p as usize] = prev;
        } else {
            self.prev_sibling[next as usize] = prev;
        }
        self.parent[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.next_sibling[i] = INVALID;
        self.dirty.mark(p, dirty::TOPOLOGY);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    fn after_link(&mut self, c: u32) {
        let p = self.parent[c as usize];
        self.dirty.mark(p, dirty::TOPOLOGY);
        self.dirty.mark(c, dirty::TOPOLOGY);
        // A shown node moved under a pruned branch must stay reachable.
        if self.is_display_active_at(c) {
            let mut a = p;
            while a != INVALID && !self.flags[a as usize].visibility.branch_to_display {
                self.flags[a as usize].visibility.branch_to_display = true;
                a = self.parent[a as usize];
            }
        }
    }

    fn free(&mut self, idx: u32) {
        let i = idx as usize;
        let id = self.id_at(idx);
        self.dirty.remove_key(idx);
        self.generation[i] += 1;
        self.alive[i] = false;
        self.parent[i] = INVALID;
        self.first_child[i] = INVALID;
        self.last_child[i] = INVALID;
        self.next_sibling[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.behavior[i] = None;
        self.payload[i] = None;
        self.free_list.push(idx);
        self.pending_removed.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf() -> NodeDesc {
        NodeDesc::new(0.0, 0.0, 1.0, 1.0)
    }

    fn kids(tree: &NodeTree, id: NodeId) -> Vec<NodeId> {
        tree.children(id).collect()
    }

    #[test]
    fn create_and_destroy() {
        let mut tree = NodeTree::default();
        let id = tree.create(leaf());
        assert!(tree.is_alive(id));
        assert_eq!(tree.node_count(), 1);
        tree.destroy(id);
        assert!(!tree.is_alive(id));
        assert_eq!(tree.node_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut tree = NodeTree::default();
        let id1 = tree.create(leaf());
        tree.destroy(id1);
        let id2 = tree.create(leaf());
        assert!(!tree.is_alive(id1));
        assert!(tree.is_alive(id2));
        assert_eq!(id1.index(), id2.index());
        assert_ne!(id1.generation(), id2.generation());
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn stale_handle_panics() {
        let mut tree = NodeTree::default();
        let id = tree.create(leaf());
        tree.destroy(id);
        let _ = tree.parent(id);
    }

    #[test]
    fn child_and_sibling_linking() {
        let mut tree = NodeTree::default();
        let root = tree.create(leaf());
        let b = tree.add_child(root, leaf());
        let a = tree.add_first_child(root, leaf());
        let d = tree.add_child(root, leaf());
        let c = tree.add_sibling(d, leaf(), true).unwrap();
        let e = tree.add_sibling(d, leaf(), false).unwrap();
        assert_eq!(kids(&tree, root), vec![a, b, c, d, e]);
        assert_eq!(tree.first_child(root), Some(a));
        assert_eq!(tree.last_child(root), Some(e));
        assert_eq!(tree.prev_sibling(c), Some(b));
        assert_eq!(tree.next_sibling(c), Some(d));
        assert_eq!(tree.parent(e), Some(root));
    }

    #[test]
    fn sibling_of_detached_node_is_refused() {
        let mut tree = NodeTree::default();
        let lonely = tree.create(leaf());
        assert_eq!(
            tree.add_sibling(lonely, leaf(), true),
            Err(TreeError::NoParent(lonely))
        );
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn destroy_takes_the_subtree() {
        let mut tree = NodeTree::default();
        let root = tree.create(leaf());
        let a = tree.add_child(root, leaf());
        let a1 = tree.add_child(a, leaf());
        let b = tree.add_child(root, leaf());
        tree.destroy(a);
        assert!(!tree.is_alive(a1));
        assert_eq!(kids(&tree, root), vec![b]);
        assert_eq!(tree.first_child(root), Some(b));
        assert_eq!(tree.last_child(root), Some(b));
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn show_raises_branch_flags() {
        let mut tree = NodeTree::default();
        let root = tree.create(leaf());
        let mid = tree.add_child(root, leaf());
        let leaf_id = tree.add_child(mid, leaf());
        tree.set_show(leaf_id, true);
        assert!(tree.flags(mid).visibility.branch_to_display);
        assert!(tree.flags(root).visibility.branch_to_display);
        assert!(tree.is_display_active(mid));
    }

    #[test]
    fn payload_kind_is_checked() {
        let mut tree = NodeTree::default();
        let tex = tree.create(leaf().payload(Payload::Texture {
            texture: ResourceHandle(1),
            tile: 0,
        }));
        let mesh = tree.create(leaf().payload(Payload::Mesh(ResourceHandle(2))));
        let bare = tree.create(leaf());
        assert_eq!(tree.set_tile(tex, 3), Ok(()));
        assert_eq!(
            tree.payload(tex),
            Some(Payload::Texture {
                texture: ResourceHandle(1),
                tile: 3
            })
        );
        assert!(matches!(
            tree.set_tile(mesh, 1),
            Err(TreeError::WrongPayloadKind { found: "mesh", .. })
        ));
        assert_eq!(tree.set_text(bare, ResourceHandle(0)), Err(TreeError::NoPayload(bare)));
    }

    #[test]
    fn progress_is_clamped_to_full() {
        let mut tree = NodeTree::default();
        let disk = tree.create(leaf().payload(Payload::Progress {
            texture: ResourceHandle(1),
            tile: 2,
            filled: 0,
        }));
        let filled = |tree: &NodeTree| match tree.payload(disk) {
            Some(Payload::Progress { filled, .. }) => filled,
            other => panic!("not a progress payload: {other:?}"),
        };
        assert_eq!(tree.set_progress(disk, 0.25), Ok(()));
        assert_eq!(filled(&tree), 250);
        tree.set_progress(disk, 3.0).unwrap();
        assert_eq!(filled(&tree), Payload::PROGRESS_FULL);
        tree.set_progress(disk, -1.0).unwrap();
        assert_eq!(filled(&tree), 0);
        let mesh = tree.create(leaf().payload(Payload::Mesh(ResourceHandle(2))));
        assert!(matches!(
            tree.set_progress(mesh, 0.5),
            Err(TreeError::WrongPayloadKind { expected: "progress", .. })
        ));
    }

    #[test]
    fn setters_use_tree_clock() {
        let mut tree = NodeTree::default();
        let id = tree.create(leaf().lambda(5.0));
        tree.set_now(FrameTime::from_millis(1_000));
        tree.set(id, Prop::X, 10.0, false);
        assert!(tree.pos(id, Prop::X).abs() < 1e-9);
        assert!((tree.real(id, Prop::X) - 10.0).abs() < 1e-9);
        tree.set_now(FrameTime::from_millis(500));
        assert_eq!(tree.now(), FrameTime::from_millis(1_000));
    }
}
