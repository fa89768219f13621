// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use sylvan_core::trace::{
    DisplayPassEvent, FrameBeginEvent, HitEvent, HitKind, LifecycleEvent, LifecycleKind,
    TaskFiredEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    /// Skip display passes, which come every frame.
    quiet_display: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("quiet_display", &self.quiet_display)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            quiet_display: false,
        }
    }

    /// Builder: leave display passes out.
    #[must_use]
    pub fn quiet_display(mut self, quiet: bool) -> Self {
        self.quiet_display = quiet;
        self
    }

    /// Gives the writer back.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn lifecycle_name(kind: LifecycleKind) -> &'static str {
    match kind {
        LifecycleKind::Open => "open",
        LifecycleKind::Close => "close",
        LifecycleKind::Reshape => "reshape",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] #{} now={:.3}s tasks={} reshaped={} changes={}",
            e.frame_index,
            e.now.as_secs_f64(),
            e.tasks_fired,
            e.reshaped,
            e.topology_changes,
        );
    }

    fn on_display_pass(&mut self, e: &DisplayPassEvent) {
        if self.quiet_display {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[display] #{} visited={} items={}",
            e.frame_index, e.visited, e.items,
        );
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let _ = writeln!(
            self.writer,
            "[{}] root={:?} visited={}",
            lifecycle_name(e.kind),
            e.root,
            e.visited,
        );
    }

    fn on_hit(&mut self, e: &HitEvent) {
        let event = match e.kind {
            HitKind::Press(p) => format!("press ({:.2}, {:.2})", p.x, p.y),
            HitKind::Move(p) => format!("move ({:.2}, {:.2})", p.x, p.y),
            HitKind::Hover(p) => format!("hover ({:.2}, {:.2})", p.x, p.y),
            HitKind::Scroll(dy) => format!("scroll {dy:.2}"),
            HitKind::Release => "release".to_owned(),
            HitKind::Enter => "enter".to_owned(),
            HitKind::Escape => "escape".to_owned(),
        };
        let _ = match e.target {
            Some(target) => writeln!(self.writer, "[input] {event} -> {target:?}"),
            None => writeln!(self.writer, "[input] {event} -> none"),
        };
    }

    fn on_task_fired(&mut self, e: &TaskFiredEvent) {
        let _ = writeln!(
            self.writer,
            "[task] {:?} {:?} on {:?} due={:.3}s",
            e.task,
            e.kind,
            e.node,
            e.due.as_secs_f64(),
        );
    }
}
