// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred work as explicit expiring tasks.
//!
//! Nodes never hold live timers. Popover auto-dismissal, hover delays, fling
//! steps and deferred disconnects are entries in a [`TaskScheduler`] owned by
//! the [`Scene`](crate::scene::Scene), which pops due entries at the start
//! of every frame and runs them on the frame thread.
//!
//! A task names the node it acts on; destroying or disconnecting that node
//! through the scene cancels its tasks.

use crate::time::{Duration, FrameTime};
use crate::tree::NodeId;

/// Handle to a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// What a task does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Disconnect and destroy the node.
    Disconnect,
    /// Close the node's branch.
    CloseBranch,
    /// Close a popover and schedule its removal.
    DiscardPopover,
    /// Show the hover popover of the node.
    ShowHoverPopover,
    /// Advance the fling of a sliding menu.
    FlingStep,
    /// Forwarded to the node's behavior
    /// ([`NodeBehavior::on_task`](crate::behavior::NodeBehavior::on_task)).
    Custom(u64),
}

/// A task that came due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DueTask {
    /// Its handle. Repeating tasks keep the same handle.
    pub id: TaskId,
    /// The node it acts on.
    pub node: NodeId,
    /// What to do.
    pub kind: TaskKind,
    /// When it was due.
    pub due: FrameTime,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    id: TaskId,
    node: NodeId,
    kind: TaskKind,
    due: FrameTime,
    period: Option<Duration>,
}

/// Pending tasks, popped in due-time order.
///
/// The scheduler has no clock of its own: callers pass the current
/// [`FrameTime`] when scheduling and polling.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    entries: Vec<Entry>,
    next_id: u64,
}

impl TaskScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a one-shot task `delay` after `now`.
    pub fn schedule_after(
        &mut self,
        now: FrameTime,
        delay: Duration,
        node: NodeId,
        kind: TaskKind,
    ) -> TaskId {
        self.push(node, kind, now + delay, None)
    }

    /// Schedules a task that fires every `period`, first at `now + period`.
    ///
    /// A zero period is treated as one microsecond.
    pub fn schedule_repeating(
        &mut self,
        now: FrameTime,
        period: Duration,
        node: NodeId,
        kind: TaskKind,
    ) -> TaskId {
        let period = Duration(period.micros().max(1));
        self.push(node, kind, now + period, Some(period))
    }

    /// Cancels a task. Returns `false` if it had already fired (one-shot) or
    /// was never scheduled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancels every task acting on `node`. Returns how many were removed.
    pub fn cancel_for_node(&mut self, node: NodeId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.node != node);
        before - self.entries.len()
    }

    /// Cancels the tasks of one kind acting on `node`.
    pub fn cancel_kind_for_node(&mut self, node: NodeId, kind: TaskKind) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.node != node || e.kind != kind);
        before - self.entries.len()
    }

    /// Whether the task is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Whether `node` has a pending task of this kind.
    #[must_use]
    pub fn has_pending(&self, node: NodeId, kind: TaskKind) -> bool {
        self.entries.iter().any(|e| e.node == node && e.kind == kind)
    }

    /// The earliest due time, if anything is pending.
    #[must_use]
    pub fn next_due(&self) -> Option<FrameTime> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pops the earliest task due at or before `now`.
    ///
    /// Ties fire in scheduling order. A repeating task is re-armed one
    /// period later, and never at or before `now`, so polling in a loop
    /// terminates.
    pub fn pop_due(&mut self, now: FrameTime) -> Option<DueTask> {
        let (pos, entry) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.id))
            .map(|(i, e)| (i, *e))?;
        match entry.period {
            Some(period) => {
                let mut next = entry.due + period;
                if next <= now {
                    next = now + period;
                }
                self.entries[pos].due = next;
            }
            None => {
                self.entries.swap_remove(pos);
            }
        }
        Some(DueTask {
            id: entry.id,
            node: entry.node,
            kind: entry.kind,
            due: entry.due,
        })
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push(
        &mut self,
        node: NodeId,
        kind: TaskKind,
        due: FrameTime,
        period: Option<Duration>,
    ) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            node,
            kind,
            due,
            period,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeDesc, NodeTree};

    fn ms(ms: u64) -> FrameTime {
        FrameTime::from_millis(ms)
    }

    fn node() -> (NodeTree, NodeId, NodeId) {
        let mut tree = NodeTree::default();
        let a = tree.create(NodeDesc::new(0.0, 0.0, 1.0, 1.0));
        let b = tree.create(NodeDesc::new(0.0, 0.0, 1.0, 1.0));
        (tree, a, b)
    }

    #[test]
    fn fires_in_due_order() {
        let (_tree, a, b) = node();
        let mut s = TaskScheduler::new();
        let late = s.schedule_after(ms(0), Duration::from_millis(200), a, TaskKind::Disconnect);
        let early = s.schedule_after(ms(0), Duration::from_millis(100), b, TaskKind::CloseBranch);
        assert_eq!(s.pop_due(ms(50)), None);
        assert_eq!(s.next_due(), Some(ms(100)));
        let first = s.pop_due(ms(250)).unwrap();
        assert_eq!((first.id, first.node, first.kind), (early, b, TaskKind::CloseBranch));
        assert_eq!(s.pop_due(ms(250)).unwrap().id, late);
        assert!(s.pop_due(ms(250)).is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn repeating_rearms_past_now() {
        let (_tree, a, _) = node();
        let mut s = TaskScheduler::new();
        let id = s.schedule_repeating(ms(0), Duration::from_millis(40), a, TaskKind::FlingStep);
        // Polling long after the first due time fires once, then waits.
        assert_eq!(s.pop_due(ms(500)).map(|t| t.id), Some(id));
        assert!(s.pop_due(ms(500)).is_none());
        assert_eq!(s.next_due(), Some(ms(540)));
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
    }

    #[test]
    fn cancel_by_node() {
        let (_tree, a, b) = node();
        let mut s = TaskScheduler::new();
        s.schedule_after(ms(0), Duration::from_millis(10), a, TaskKind::Disconnect);
        s.schedule_after(ms(0), Duration::from_millis(10), a, TaskKind::ShowHoverPopover);
        s.schedule_after(ms(0), Duration::from_millis(10), b, TaskKind::Disconnect);
        assert_eq!(s.cancel_kind_for_node(a, TaskKind::ShowHoverPopover), 1);
        assert!(s.has_pending(a, TaskKind::Disconnect));
        assert_eq!(s.cancel_for_node(a), 1);
        assert_eq!(s.len(), 1);
        assert_eq!(s.pop_due(ms(10)).map(|t| t.node), Some(b));
    }
}
