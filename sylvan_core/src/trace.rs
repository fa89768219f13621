// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Scene`](crate::scene::Scene) calls at each stage of a frame and for every
//! dispatched input event. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! These events are structured data for tools. Human-readable reports of
//! misuse go through `tracing` instead.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;

use crate::scheduler::{TaskId, TaskKind};
use crate::time::FrameTime;
use crate::tree::NodeId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which branch-wide lifecycle walk ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    /// `open_and_show_branch`.
    Open,
    /// `close_branch`.
    Close,
    /// `reshape_branch`.
    Reshape,
}

/// Which input event was dispatched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitKind {
    /// Pointer pressed at a point.
    Press(Point),
    /// Pointer moved while pressed.
    Move(Point),
    /// Pointer released.
    Release,
    /// Pointer hovering at a point.
    Hover(Point),
    /// Wheel scroll, vertical delta.
    Scroll(f64),
    /// Enter key.
    Enter,
    /// Escape key.
    Escape,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted by [`Scene::begin_frame`](crate::scene::Scene::begin_frame) after
/// tasks and reshapes ran.
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// The frame time.
    pub now: FrameTime,
    /// Number of scheduled tasks that fired.
    pub tasks_fired: usize,
    /// Number of branches reshaped.
    pub reshaped: usize,
    /// Number of nodes whose structure changed since last frame.
    pub topology_changes: usize,
}

/// Emitted after a display walk.
#[derive(Clone, Copy, Debug)]
pub struct DisplayPassEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Nodes the walk visited.
    pub visited: usize,
    /// Items produced for rendering.
    pub items: usize,
}

/// Emitted after a lifecycle walk.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleEvent {
    /// Which walk.
    pub kind: LifecycleKind,
    /// The node the walk started from.
    pub root: NodeId,
    /// Nodes whose hook ran.
    pub visited: usize,
}

/// Emitted for every dispatched input event.
#[derive(Clone, Copy, Debug)]
pub struct HitEvent {
    /// The event.
    pub kind: HitKind,
    /// The node that received it, if any.
    pub target: Option<NodeId>,
}

/// Emitted when a scheduled task fires.
#[derive(Clone, Copy, Debug)]
pub struct TaskFiredEvent {
    /// Its handle.
    pub task: TaskId,
    /// The node it acted on.
    pub node: NodeId,
    /// What it did.
    pub kind: TaskKind,
    /// When it was due.
    pub due: FrameTime,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receiver for structured scene events.
pub trait TraceSink {
    /// Called once per frame, after tasks and reshapes.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called after each display walk.
    fn on_display_pass(&mut self, e: &DisplayPassEvent) {
        _ = e;
    }

    /// Called after each lifecycle walk.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called for each dispatched input event.
    fn on_hit(&mut self, e: &HitEvent) {
        _ = e;
    }

    /// Called for each fired task.
    fn on_task_fired(&mut self, e: &TaskFiredEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A sink that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Shares a sink between the scene and the tool reading it.
impl<T: TraceSink + ?Sized> TraceSink for Rc<RefCell<T>> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.borrow_mut().on_frame_begin(e);
    }

    fn on_display_pass(&mut self, e: &DisplayPassEvent) {
        self.borrow_mut().on_display_pass(e);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.borrow_mut().on_lifecycle(e);
    }

    fn on_hit(&mut self, e: &HitEvent) {
        self.borrow_mut().on_hit(e);
    }

    fn on_task_fired(&mut self, e: &TaskFiredEvent) {
        self.borrow_mut().on_task_fired(e);
    }
}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Zero-cost wrapper around an optional [`TraceSink`].
///
/// With the `trace` feature off this holds nothing and every method is empty.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that forwards to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer with no sink.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Forwards a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Forwards a [`DisplayPassEvent`].
    #[inline]
    pub fn display_pass(&mut self, e: &DisplayPassEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_display_pass(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Forwards a [`LifecycleEvent`].
    #[inline]
    pub fn lifecycle(&mut self, e: &LifecycleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lifecycle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Forwards a [`HitEvent`].
    #[inline]
    pub fn hit(&mut self, e: &HitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_hit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Forwards a [`TaskFiredEvent`].
    #[inline]
    pub fn task_fired(&mut self, e: &TaskFiredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_task_fired(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
