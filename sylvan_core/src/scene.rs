// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Scene`]: a node tree plus everything that drives it.
//!
//! A scene owns the [`NodeTree`], the [`TaskScheduler`] for deferred work,
//! the [`SceneConfig`], and the interaction state of hit dispatch. Its tree
//! always has a root sized to the usable area of the view and a *front
//! screen* kept above every other screen, for popovers.
//!
//! The host drives it once per rendered frame:
//!
//! 1. [`begin_frame`](Scene::begin_frame) advances the clock, fires due
//!    tasks and runs requested reshapes.
//! 2. [`display`](Scene::display) walks the shown part of the tree and
//!    produces the draw list.
//!
//! Input arrives at any time between frames through the
//! [hit dispatch](crate::hit) entry points.

use std::collections::HashMap;

use crate::behavior::NodeBehavior;
use crate::config::SceneConfig;
use crate::dirty;
use crate::error::TreeError;
use crate::lifecycle;
use crate::scheduler::{DueTask, TaskKind, TaskScheduler};
use crate::screen::Screen;
use crate::smooth::{PopCurve, ShowTransition};
use crate::time::FrameTime;
use crate::trace::{FrameBeginEvent, TaskFiredEvent, TraceSink, Tracer};
use crate::tree::{LayoutRole, NodeDesc, NodeFlags, NodeId, NodeTree, Prop, Selection, Visibility};
use crate::widgets::SlidingMenu;

/// What happened during [`Scene::begin_frame`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Monotonic frame counter, starting at 1.
    pub frame_index: u64,
    /// The clock value the frame runs at.
    pub now: FrameTime,
    /// Number of scheduled tasks that fired.
    pub tasks_fired: usize,
    /// Nodes whose branch was reshaped on request.
    pub reshaped: Vec<NodeId>,
    /// Live nodes that were created, linked or unlinked since last frame.
    pub topology: Vec<NodeId>,
    /// Live nodes whose `show` flag changed since last frame.
    pub visibility: Vec<NodeId>,
    /// Nodes destroyed since last frame. Their handles are stale.
    pub removed: Vec<NodeId>,
}

/// A node tree with its clock, task scheduler and interaction state.
pub struct Scene {
    pub(crate) tree: NodeTree,
    pub(crate) tasks: TaskScheduler,
    config: SceneConfig,

    // -- Fixed nodes --
    root: NodeId,
    front_screen: NodeId,
    pub(crate) active_screen: Option<NodeId>,

    // -- Interaction --
    pub(crate) selected: Option<NodeId>,
    pub(crate) grabbed: Option<NodeId>,
    pub(crate) hovered: Option<NodeId>,
    pub(crate) touch_mode: bool,
    /// Touch-mode labels, keyed by the node they annotate.
    pub(crate) inline_labels: HashMap<NodeId, NodeId>,

    frame_index: u64,
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("root", &self.root)
            .field("front_screen", &self.front_screen)
            .field("active_screen", &self.active_screen)
            .field("nodes", &self.tree.node_count())
            .field("pending_tasks", &self.tasks.len())
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    /// Creates a scene with a 4×4 root and an empty front screen.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        let mut tree = NodeTree::new(ShowTransition::new(
            config.show_transition,
            PopCurve::from_factor(config.pop_factor),
        ));
        let root_flags = NodeFlags {
            visibility: Visibility {
                show: true,
                exposed: true,
                branch_to_display: true,
                ..Visibility::default()
            },
            selection: Selection {
                selectable_root: true,
                ..Selection::default()
            },
            layout: LayoutRole {
                is_root: true,
                reshape_root: true,
                ..LayoutRole::default()
            },
            ..NodeFlags::default()
        };
        let root = tree.create(NodeDesc::new(0.0, 0.0, 4.0, 4.0).lambda(10.0).flags(root_flags));
        let front_flags = NodeFlags {
            visibility: Visibility {
                show: true,
                exposed: true,
                ..Visibility::default()
            },
            layout: LayoutRole {
                reshape_root: true,
                persistent: true,
                dont_align: true,
                ..LayoutRole::default()
            },
            ..NodeFlags::default()
        };
        let front_screen = tree.add_child(root, NodeDesc::new(0.0, 0.0, 4.0, 4.0).flags(front_flags));
        tree.set_behavior(front_screen, Screen::new(&config));
        tracing::debug!(?root, ?front_screen, "scene created");
        Self {
            tree,
            tasks: TaskScheduler::new(),
            config,
            root,
            front_screen,
            active_screen: None,
            selected: None,
            grabbed: None,
            hovered: None,
            touch_mode: config.touch_mode,
            inline_labels: HashMap::new(),
            frame_index: 0,
            sink: None,
        }
    }

    // -- Accessors --

    /// The node tree.
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// The node tree, mutably.
    #[inline]
    #[must_use]
    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    /// Pending deferred work.
    #[inline]
    #[must_use]
    pub fn tasks(&self) -> &TaskScheduler {
        &self.tasks
    }

    /// Pending deferred work, mutably.
    #[inline]
    #[must_use]
    pub fn tasks_mut(&mut self) -> &mut TaskScheduler {
        &mut self.tasks
    }

    /// The configuration the scene was created with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The root node. Its width and height are the usable area of the view.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The screen drawn above all others.
    #[inline]
    #[must_use]
    pub const fn front_screen(&self) -> NodeId {
        self.front_screen
    }

    /// The screen currently open, if any.
    #[inline]
    #[must_use]
    pub const fn active_screen(&self) -> Option<NodeId> {
        self.active_screen
    }

    /// The current clock value.
    #[inline]
    #[must_use]
    pub const fn now(&self) -> FrameTime {
        self.tree.now()
    }

    /// Number of frames begun so far.
    #[inline]
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Installs (or removes) the receiver of structured trace events.
    ///
    /// Events are only emitted when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.sink = sink;
    }

    pub(crate) fn trace(&mut self) -> Tracer<'_> {
        match self.sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        }
    }

    // -- Frame --

    /// Asks for `reshape_branch(id)` at the start of the next frame.
    pub fn request_reshape(&mut self, id: NodeId) {
        self.tree.validate(id);
        self.tree.dirty.mark(id.idx, dirty::RESHAPE);
    }

    /// Starts a frame at `now`.
    ///
    /// Advances the clock (never backwards), fires every task due by then in
    /// due order, reshapes the branches requested with
    /// [`request_reshape`](Self::request_reshape), and reports what changed.
    pub fn begin_frame(&mut self, now: FrameTime) -> FrameReport {
        self.tree.set_now(now);
        let now = self.tree.now();
        self.frame_index += 1;
        let mut report = FrameReport {
            frame_index: self.frame_index,
            now,
            ..FrameReport::default()
        };

        // Tasks are popped one at a time so a handler can cancel later ones.
        while let Some(task) = self.tasks.pop_due(now) {
            report.tasks_fired += 1;
            self.trace().task_fired(&TaskFiredEvent {
                task: task.id,
                node: task.node,
                kind: task.kind,
                due: task.due,
            });
            self.run_task(task);
        }

        for id in self.tree.drain_dirty(dirty::RESHAPE) {
            if self.tree.is_alive(id) {
                self.reshape_branch(id);
                report.reshaped.push(id);
            }
        }

        report.topology = self.tree.drain_dirty(dirty::TOPOLOGY);
        report.visibility = self.tree.drain_dirty(dirty::VISIBILITY);
        report.removed = self.tree.take_removed();

        let event = FrameBeginEvent {
            frame_index: self.frame_index,
            now,
            tasks_fired: report.tasks_fired,
            reshaped: report.reshaped.len(),
            topology_changes: report.topology.len(),
        };
        self.trace().frame_begin(&event);
        report
    }

    /// Sets the usable size of the view and reshapes the whole tree.
    pub fn resize(&mut self, width: f64, height: f64) {
        let root = self.root;
        self.tree.set(root, Prop::Width, width, false);
        self.tree.set(root, Prop::Height, height, false);
        self.reshape_branch(root);
    }

    fn run_task(&mut self, task: DueTask) {
        if !self.tree.is_alive(task.node) {
            // Only a repeating task can outlive its node.
            self.tasks.cancel(task.id);
            return;
        }
        let node = task.node;
        match task.kind {
            TaskKind::Disconnect => self.destroy(node),
            TaskKind::CloseBranch => self.close_branch(node),
            TaskKind::DiscardPopover => self.discard_popover(node),
            TaskKind::ShowHoverPopover => self.show_hover_popover(node),
            TaskKind::FlingStep => {
                let handled = self.with_behavior_as::<SlidingMenu, _>(node, |menu, scene| {
                    menu.fling_step(scene, node, task.id);
                });
                if handled.is_none() {
                    tracing::warn!(?node, "fling step for a node that is not a sliding menu");
                    self.tasks.cancel(task.id);
                }
            }
            TaskKind::Custom(token) => {
                self.with_behavior(node, |b, scene| b.on_task(scene, node, token));
            }
        }
    }

    // -- Removal --

    /// Unlinks a node from its parent. The node stays alive and can be
    /// reconnected; its pending tasks are cancelled.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoParent`] if the node is already detached.
    pub fn disconnect(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.forget_branch(id, false);
        self.tree.disconnect(id)
    }

    /// Destroys a node and its subtree, cancelling their pending tasks.
    pub fn destroy(&mut self, id: NodeId) {
        self.forget_branch(id, true);
        self.tree.destroy(id);
    }

    /// Destroys `id` after the configured removal delay, leaving time for
    /// its closing transition.
    pub fn schedule_removal(&mut self, id: NodeId) {
        self.tree.validate(id);
        let now = self.tree.now();
        self.tasks
            .schedule_after(now, self.config.removal_delay, id, TaskKind::Disconnect);
    }

    /// Drops the tasks and interaction state referring into the branch of
    /// `id`, and its inline labels when the branch is about to be freed.
    fn forget_branch(&mut self, id: NodeId, destroying: bool) {
        let ids: Vec<NodeId> = self.tree.branch(id).collect();
        for n in &ids {
            self.tasks.cancel_for_node(*n);
        }
        if destroying {
            self.inline_labels
                .retain(|node, label| !ids.contains(node) && !ids.contains(label));
        }
        for slot in [
            &mut self.selected,
            &mut self.grabbed,
            &mut self.hovered,
            &mut self.active_screen,
        ] {
            if slot.is_some_and(|n| ids.contains(&n)) {
                *slot = None;
            }
        }
    }

    // -- Behaviors --

    /// Runs `f` with the node's behavior taken out of the tree.
    ///
    /// Returns `None` (without calling `f`) if the node has no behavior.
    pub(crate) fn with_behavior<R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut dyn NodeBehavior, &mut Self) -> R,
    ) -> Option<R> {
        let mut behavior = self.tree.take_behavior(node)?;
        let result = f(&mut *behavior, self);
        self.tree.restore_behavior(node, behavior);
        Some(result)
    }

    /// Like [`with_behavior`](Self::with_behavior) for a behavior of a known
    /// type.
    pub fn with_behavior_as<T: NodeBehavior, R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut T, &mut Self) -> R,
    ) -> Option<R> {
        if self.tree.behavior::<T>(node).is_none() {
            return None;
        }
        self.with_behavior(node, |b, scene| {
            let any: &mut dyn core::any::Any = b;
            any.downcast_mut::<T>().map(|t| f(t, scene))
        })
        .flatten()
    }

    pub(crate) fn run_open(&mut self, node: NodeId) {
        if self.with_behavior(node, |b, s| b.open(s, node)).is_none() {
            lifecycle::default_open(self, node);
        }
    }

    pub(crate) fn run_close(&mut self, node: NodeId) {
        if self.with_behavior(node, |b, s| b.close(s, node)).is_none() {
            lifecycle::default_close(self, node);
        }
    }

    pub(crate) fn run_reshape(&mut self, node: NodeId) {
        if self.with_behavior(node, |b, s| b.reshape(s, node)).is_none() {
            lifecycle::default_reshape(self, node);
        }
    }

    /// Whether the node's behavior has a capability, tested by `check`.
    pub(crate) fn behavior_has(
        &mut self,
        node: NodeId,
        check: impl FnOnce(&mut dyn NodeBehavior) -> bool,
    ) -> bool {
        self.tree.validate(node);
        self.tree.behavior[node.idx as usize]
            .as_deref_mut()
            .is_some_and(check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Duration;

    #[test]
    fn new_scene_has_root_and_front_screen() {
        let scene = Scene::default();
        let root = scene.root();
        let front = scene.front_screen();
        assert_eq!(scene.tree().parent(front), Some(root));
        let flags = scene.tree().flags(root);
        assert!(flags.layout.is_root && flags.visibility.show && flags.selection.selectable_root);
        assert!(scene.tree().flags(front).layout.persistent);
        assert!(scene.tree().behavior::<Screen>(front).is_some());
        assert_eq!(scene.active_screen(), None);
    }

    #[test]
    fn tasks_fire_in_begin_frame() {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let node = scene.tree_mut().add_child(front, NodeDesc::new(0.0, 0.0, 1.0, 1.0));
        scene.schedule_removal(node);
        let report = scene.begin_frame(FrameTime::from_millis(500));
        assert_eq!(report.tasks_fired, 0);
        assert!(scene.tree().is_alive(node));
        let report = scene.begin_frame(FrameTime::from_millis(1_000));
        assert_eq!(report.tasks_fired, 1);
        assert!(!scene.tree().is_alive(node));
        assert_eq!(report.removed, vec![node]);
        assert_eq!(report.frame_index, 2);
    }

    #[test]
    fn destroy_cancels_pending_tasks() {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let group = scene.tree_mut().add_child(front, NodeDesc::new(0.0, 0.0, 1.0, 1.0));
        let leaf = scene.tree_mut().add_child(group, NodeDesc::new(0.0, 0.0, 1.0, 1.0));
        let now = scene.now();
        scene
            .tasks_mut()
            .schedule_after(now, Duration::from_millis(10), leaf, TaskKind::CloseBranch);
        scene.destroy(group);
        assert!(scene.tasks().is_empty());
    }

    #[test]
    fn requested_reshapes_run_once() {
        let mut scene = Scene::default();
        let root = scene.root();
        scene.request_reshape(root);
        scene.request_reshape(root);
        let report = scene.begin_frame(FrameTime::from_millis(16));
        assert_eq!(report.reshaped, vec![root]);
        let report = scene.begin_frame(FrameTime::from_millis(32));
        assert!(report.reshaped.is_empty());
    }

    #[test]
    fn resize_reshapes_the_front_screen() {
        let mut scene = Scene::default();
        scene.resize(3.0, 2.0);
        let front = scene.front_screen();
        assert!((scene.tree().real(front, Prop::Width) - 3.0).abs() < 1e-9);
        assert!((scene.tree().real(front, Prop::Height) - 2.0).abs() < 1e-9);
    }
}
