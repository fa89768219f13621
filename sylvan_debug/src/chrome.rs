// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`ChromeTraceSink`] collects scene events as they happen and
//! [`write_json`](ChromeTraceSink::write_json) writes them as
//! [Chrome Trace Event Format][spec] JSON.
//!
//! Only frame begins carry a time. Every other event is stamped with the
//! time of the frame it happened in.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use sylvan_core::time::FrameTime;
use sylvan_core::trace::{
    DisplayPassEvent, FrameBeginEvent, HitEvent, HitKind, LifecycleEvent, TaskFiredEvent,
    TraceSink,
};

/// Collects scene events as Chrome trace events.
#[derive(Debug, Default)]
pub struct ChromeTraceSink {
    events: Vec<Value>,
    now: FrameTime,
}

impl ChromeTraceSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The events collected so far.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Drops the collected events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Writes the collected events as a JSON array of trace event objects,
    /// suitable for loading into `chrome://tracing` or
    /// [Perfetto](https://ui.perfetto.dev/).
    pub fn write_json(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }

    fn instant(&mut self, name: &str, cat: &str, args: Value) {
        self.events.push(json!({
            "ph": "i",
            "name": name,
            "cat": cat,
            "ts": self.now.micros(),
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": args,
        }));
    }
}

impl TraceSink for ChromeTraceSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.now = e.now;
        self.events.push(json!({
            "ph": "i",
            "name": "FrameBegin",
            "cat": "Frame",
            "ts": e.now.micros(),
            "pid": 0,
            "tid": 0,
            "s": "g",
            "args": {
                "frame_index": e.frame_index,
                "tasks_fired": e.tasks_fired,
                "reshaped": e.reshaped,
                "topology_changes": e.topology_changes,
            }
        }));
    }

    fn on_display_pass(&mut self, e: &DisplayPassEvent) {
        self.events.push(json!({
            "ph": "C",
            "name": "Display",
            "cat": "Frame",
            "ts": self.now.micros(),
            "pid": 0,
            "tid": 0,
            "args": {
                "visited": e.visited,
                "items": e.items,
            }
        }));
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.instant(
            &format!("{:?}", e.kind),
            "Lifecycle",
            json!({
                "root": format!("{:?}", e.root),
                "visited": e.visited,
            }),
        );
    }

    fn on_hit(&mut self, e: &HitEvent) {
        let (name, mut args) = match e.kind {
            HitKind::Press(p) => ("Press", json!({ "x": p.x, "y": p.y })),
            HitKind::Move(p) => ("Move", json!({ "x": p.x, "y": p.y })),
            HitKind::Hover(p) => ("Hover", json!({ "x": p.x, "y": p.y })),
            HitKind::Scroll(dy) => ("Scroll", json!({ "dy": dy })),
            HitKind::Release => ("Release", json!({})),
            HitKind::Enter => ("Enter", json!({})),
            HitKind::Escape => ("Escape", json!({})),
        };
        args["target"] = e
            .target
            .map_or(Value::Null, |t| Value::from(format!("{t:?}")));
        self.instant(name, "Input", args);
    }

    fn on_task_fired(&mut self, e: &TaskFiredEvent) {
        self.instant(
            "TaskFired",
            "Scheduler",
            json!({
                "task": format!("{:?}", e.task),
                "kind": format!("{:?}", e.kind),
                "node": format!("{:?}", e.node),
                "due_us": e.due.micros(),
            }),
        );
    }
}
