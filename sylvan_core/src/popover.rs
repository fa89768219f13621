// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popovers and hover labels.
//!
//! A popover is a transient framed text placed in the front screen just above
//! a reference node. It slides and grows in, stays inside the screen, and
//! discards itself after the configured lifetime: it closes, then is
//! destroyed once the closing transition had time to run.
//!
//! [`Hoverable`](crate::behavior::Hoverable) nodes get one after the pointer
//! rested on them for the hover delay. Touch screens have no hovering, so
//! there the text is shown as an inline label under the node instead.
//!
//! The effect popovers follow the same pattern without text: a
//! [`PopDisk`] fills up over a duration, a pop surface flashes a tile over a
//! node, and sparkles burst around a point. Their whole lifetime is a pair
//! of scheduler entries (close, then disconnect), so none of them needs to
//! be cleaned up by the caller.

use kurbo::Point;

use crate::behavior::NodeBehavior;
use crate::scene::Scene;
use crate::scheduler::TaskKind;
use crate::time::{Duration, FrameTime};
use crate::tree::{Flag, NodeDesc, NodeId, Payload, Prop, ResourceHandle, Sampling};

/// Popover height relative to the reference node.
const REL_HEIGHT: f64 = 0.5;
/// Room reserved for the text, in popover heights.
const WIDTH_IN_HEIGHTS: f64 = 20.0;
const LAMBDA: f64 = 4.0;
/// Starting scale offset of the grow-in.
const FADE_SCALE: f64 = -0.5;

/// Refresh period of a pop disk's fill.
const DISK_REFRESH_PERIOD: Duration = Duration::from_millis(50);
const DISK_REFRESH: u64 = 0;
const DISK_DONE: u64 = 1;
/// A pop disk stays up at least this share of its duration...
const DISK_MIN_SHARE: f64 = 0.3;
/// ...and an early discard is retried at this share.
const DISK_RETRY_SHARE: f64 = 0.32;
/// Grow-in offset of a pop disk, in disk heights.
const DISK_FADE: f64 = -0.3;

const SPARKLE_COUNT: u32 = 9;
/// Side of one sparkle, in sparkles heights.
const SPARKLE_SIZE: f64 = 0.3;
const SPARKLE_SPREAD: f64 = 0.3;
const SPARKLE_LAMBDA: f64 = 5.0;
const SPARKLES_CLOSE: Duration = Duration::from_millis(600);
const SPARKLES_REMOVE: Duration = Duration::from_millis(1_600);

/// How far a box centred on `c` with half extent `d` sticks out of
/// `[-s/2, s/2]`: negative on the low side, positive on the high side.
fn overflow(c: f64, d: f64, s: f64) -> f64 {
    let low = c - d + s / 2.0;
    let high = c + d - s / 2.0;
    low.min(high.max(0.0))
}

impl Scene {
    /// Pops `text` (optionally framed by the texture `frame`) above
    /// `reference`. Returns the popover node.
    pub fn popover_over(
        &mut self,
        reference: NodeId,
        text: ResourceHandle,
        frame: Option<ResourceHandle>,
    ) -> NodeId {
        let front = self.front_screen();
        let lifetime = self.config().popover_lifetime;
        let (centre, reference_height) = self.front_box(reference);
        let anchor = Point::new(centre.x, centre.y + reference_height / 2.0);
        let height = reference_height * REL_HEIGHT;
        let width = WIDTH_IN_HEIGHTS * height;
        let tree = &mut self.tree;

        let pop = tree.add_child(
            front,
            NodeDesc::new(anchor.x, anchor.y, width, height)
                .lambda(LAMBDA)
                .flag(Flag::NotToAlign),
        );
        if let Some(texture) = frame {
            tree.add_child(
                pop,
                NodeDesc::new(0.0, 0.0, width, height)
                    .lambda(LAMBDA)
                    .payload(Payload::Texture { texture, tile: 0 }),
            );
        }
        tree.add_child(
            pop,
            NodeDesc::new(0.0, 0.0, width, height)
                .lambda(LAMBDA)
                .payload(Payload::Text(text)),
        );
        self.open_and_show_branch(pop);

        let tree = &mut self.tree;
        let (sw, sh) = (tree.real(front, Prop::Width), tree.real(front, Prop::Height));
        let x_adj = overflow(anchor.x, tree.delta_x(pop), sw);
        let y_adj = overflow(anchor.y, tree.delta_y(pop), sh);
        let now = tree.now();
        let t = tree.transform_mut(pop);
        t.x.set_relative_to_default(0.0, true, now);
        t.x.set_relative_to_default(-x_adj, false, now);
        t.y.set_relative_to_default(-0.5 * height, true, now);
        t.y.set_relative_to_default(-y_adj, false, now);
        t.scale_x.fade_in(FADE_SCALE, now);
        t.scale_y.fade_in(FADE_SCALE, now);

        self.tasks
            .schedule_after(now, lifetime, pop, TaskKind::DiscardPopover);
        tracing::debug!(?pop, ?reference, "popover shown");
        pop
    }

    /// Closes a popover and schedules its removal.
    pub fn discard_popover(&mut self, pop: NodeId) {
        if self.tree.has_flag(pop, Flag::Show) {
            self.close_branch(pop);
        }
        self.schedule_removal(pop);
    }

    /// Centre and height of `node` in the front screen's frame.
    fn front_box(&self, node: NodeId) -> (Point, f64) {
        let front = self.front_screen();
        let inner = self.tree.inner_frame(node, Sampling::Target);
        let outer = self.tree.parent_frame(node, Sampling::Target);
        let screen = self.tree.inner_frame(front, Sampling::Target);
        let centre = screen.to_local(inner.to_reference(Point::ZERO));
        let k = if screen.scale.y == 0.0 {
            1.0
        } else {
            outer.scale.y / screen.scale.y
        };
        (centre, self.tree.real(node, Prop::Height) * k)
    }

    // -- Effects --

    /// Pops a progress disk under `parent`. It fills up over
    /// `desc.duration`, then discards itself.
    pub fn pop_disk(&mut self, parent: NodeId, desc: PopDiskDesc) -> NodeId {
        let now = self.tree.now();
        let h = desc.height;
        let node = self.tree.add_child(
            parent,
            NodeDesc::new(desc.x, desc.y, h, h)
                .lambda(desc.lambda)
                .flag(Flag::NotToAlign)
                .payload(Payload::Progress {
                    texture: desc.texture,
                    tile: desc.tile,
                    filled: 0,
                }),
        );
        self.tree.set_behavior(
            node,
            PopDisk {
                started: now,
                duration: desc.duration,
            },
        );
        self.open_and_show_branch(node);

        let t = self.tree.transform_mut(node);
        t.y.fade_in_from_default(if desc.down { -h } else { h }, now);
        t.width.fade_in(DISK_FADE * h, now);
        t.height.fade_in(DISK_FADE * h, now);

        self.tasks
            .schedule_repeating(now, DISK_REFRESH_PERIOD, node, TaskKind::Custom(DISK_REFRESH));
        self.tasks
            .schedule_after(now, desc.duration, node, TaskKind::Custom(DISK_DONE));
        node
    }

    /// Takes a pop disk away before it is full. Returns `false` if `node` is
    /// not a live pop disk.
    pub fn discard_pop_disk(&mut self, node: NodeId) -> bool {
        if !self.tree.is_alive(node) {
            return false;
        }
        self.with_behavior_as::<PopDisk, _>(node, |disk, scene| disk.discard(scene, node))
            .is_some()
    }

    /// Flashes a tile over `over` in the front screen for `desc.lifetime`.
    ///
    /// Offsets and height are in units of `over`'s displayed height.
    pub fn pop_surface(&mut self, over: NodeId, desc: PopSurfaceDesc) -> NodeId {
        let front = self.front_screen();
        let (centre, unit) = self.front_box(over);
        let h = desc.height * unit;
        let node = self.tree.add_child(
            front,
            NodeDesc::new(centre.x + desc.x * unit, centre.y + desc.y * unit, h, h)
                .lambda(desc.lambda)
                .flag(Flag::NotToAlign)
                .payload(Payload::Texture {
                    texture: desc.texture,
                    tile: desc.tile,
                }),
        );
        self.open_and_show_branch(node);
        let now = self.tree.now();
        let removal = self.config().removal_delay;
        self.tasks
            .schedule_after(now, desc.lifetime, node, TaskKind::CloseBranch);
        self.tasks
            .schedule_after(now, desc.lifetime + removal, node, TaskKind::Disconnect);
        node
    }

    /// Bursts sparkles centred on `at` (front screen frame).
    pub fn sparkles(&mut self, at: Point, desc: SparklesDesc) -> NodeId {
        let front = self.front_screen();
        let tree = &mut self.tree;
        let group = tree.add_child(front, NodeDesc::new(at.x, at.y, 1.0, 1.0).flag(Flag::NotToAlign));
        tree.set(group, Prop::ScaleX, desc.height, true);
        tree.set(group, Prop::ScaleY, desc.height, true);
        let mut rest = Vec::new();
        for i in 0..SPARKLE_COUNT {
            // Golden-angle spiral.
            let f = f64::from(i);
            let angle = f * 2.399_963_229_728_653;
            let r = SPARKLE_SPREAD * ((f + 0.5) / f64::from(SPARKLE_COUNT)).sqrt();
            let (x, y) = (r * angle.cos(), r * angle.sin());
            let spark = tree.add_child(
                group,
                NodeDesc::new(x, y, SPARKLE_SIZE, SPARKLE_SIZE)
                    .lambda(SPARKLE_LAMBDA)
                    .flag(Flag::Popping)
                    .payload(Payload::Texture {
                        texture: desc.texture,
                        tile: desc.first_tile + i,
                    }),
            );
            rest.push((spark, x, y));
        }
        self.open_and_show_branch(group);

        let now = self.tree.now();
        for (spark, x, y) in rest {
            let t = self.tree.transform_mut(spark);
            t.x.fade_in(-x, now);
            t.y.fade_in(-y, now);
        }
        self.tasks
            .schedule_after(now, SPARKLES_CLOSE, group, TaskKind::CloseBranch);
        self.tasks
            .schedule_after(now, SPARKLES_REMOVE, group, TaskKind::Disconnect);
        tracing::trace!(?group, "sparkles");
        group
    }

    /// Bursts sparkles over `reference`, as tall as its smaller displayed
    /// side unless `desc.height` is positive.
    pub fn sparkles_over(&mut self, reference: NodeId, mut desc: SparklesDesc) -> NodeId {
        let (centre, height) = self.front_box(reference);
        if desc.height <= 0.0 {
            let (w, h) = (
                self.tree.real(reference, Prop::Width),
                self.tree.real(reference, Prop::Height),
            );
            desc.height = if h > 0.0 { height * w.min(h) / h } else { 0.0 };
        }
        self.sparkles(centre, desc)
    }

    // -- Hovering --

    /// Whether hover popovers are replaced by inline labels.
    #[inline]
    #[must_use]
    pub const fn touch_mode(&self) -> bool {
        self.touch_mode
    }

    /// Switches between pointer and touch interaction, creating or removing
    /// the inline labels of every hoverable node.
    pub fn set_touch_mode(&mut self, on: bool) {
        if self.touch_mode == on {
            return;
        }
        self.touch_mode = on;
        if let Some(h) = self.hovered.take() {
            self.cancel_hover_popover(h);
        }
        let root = self.root();
        let nodes: Vec<NodeId> = self.tree.branch(root).collect();
        for node in nodes {
            if !self.tree.is_alive(node) {
                continue;
            }
            if let Some((text, _)) = self.hover_content(node) {
                self.update_hover_label(node, Some(text));
            } else if self.inline_labels.contains_key(&node) {
                self.update_hover_label(node, None);
            }
        }
    }

    /// The inline label of a node, in touch mode.
    #[must_use]
    pub fn inline_label(&self, node: NodeId) -> Option<NodeId> {
        self.inline_labels.get(&node).copied()
    }

    /// Sets the inline label text of `node`.
    ///
    /// In touch mode the label is created, or its text replaced. Outside
    /// touch mode, or with `None`, any existing label is destroyed.
    pub fn update_hover_label(&mut self, node: NodeId, text: Option<ResourceHandle>) {
        let text = text.filter(|_| self.touch_mode);
        let existing = self
            .inline_labels
            .get(&node)
            .copied()
            .filter(|&l| self.tree.is_alive(l));
        let Some(text) = text else {
            self.inline_labels.remove(&node);
            if let Some(label) = existing {
                self.destroy(label);
            }
            return;
        };
        if let Some(label) = existing {
            if let Err(e) = self.tree.set_text(label, text) {
                tracing::warn!(%e, "inline label lost its text payload");
            }
            return;
        }
        let h = self.tree.real(node, Prop::Height);
        let label = self.tree.add_child(
            node,
            NodeDesc::new(0.0, 0.5 * h, 5.0 * h, 0.5 * h)
                .flag(Flag::NotToAlign)
                .payload(Payload::Text(text)),
        );
        self.inline_labels.insert(node, label);
        if self.tree.has_flag(node, Flag::Show) {
            self.open_and_show_branch(label);
        }
    }

    /// Arms the hover popover of `node`, unless one is already pending or
    /// the node shows an inline label.
    pub fn schedule_hover_popover(&mut self, node: NodeId) {
        if self.tasks.has_pending(node, TaskKind::ShowHoverPopover)
            || self.inline_labels.contains_key(&node)
        {
            return;
        }
        let now = self.tree.now();
        let delay = self.config().hover_delay;
        self.tasks
            .schedule_after(now, delay, node, TaskKind::ShowHoverPopover);
    }

    /// Disarms the hover popover of `node`.
    pub fn cancel_hover_popover(&mut self, node: NodeId) {
        self.tasks
            .cancel_kind_for_node(node, TaskKind::ShowHoverPopover);
    }

    pub(crate) fn show_hover_popover(&mut self, node: NodeId) {
        if self.touch_mode {
            return;
        }
        if let Some((text, frame)) = self.hover_content(node) {
            self.popover_over(node, text, frame);
        }
    }

    fn hover_content(&mut self, node: NodeId) -> Option<(ResourceHandle, Option<ResourceHandle>)> {
        self.with_behavior(node, |b, _| {
            let h = b.as_hoverable()?;
            Some((h.popover_text()?, h.popover_frame()))
        })
        .flatten()
    }
}

/// Look and timing of a [`Scene::pop_disk`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopDiskDesc {
    /// Rest centre x in the parent's frame.
    pub x: f64,
    /// Rest centre y in the parent's frame.
    pub y: f64,
    /// Diameter.
    pub height: f64,
    /// Damping of the pop-in.
    pub lambda: f64,
    /// Disk texture.
    pub texture: ResourceHandle,
    /// Tile of the disk texture.
    pub tile: u32,
    /// Time to fill up.
    pub duration: Duration,
    /// Drop in from above instead of rising from below.
    pub down: bool,
}

/// Look and timing of a [`Scene::pop_surface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopSurfaceDesc {
    /// Texture shown.
    pub texture: ResourceHandle,
    /// Tile of the texture.
    pub tile: u32,
    /// Horizontal offset from the reference's centre.
    pub x: f64,
    /// Vertical offset from the reference's centre.
    pub y: f64,
    /// Height.
    pub height: f64,
    /// Damping.
    pub lambda: f64,
    /// Time shown before closing.
    pub lifetime: Duration,
}

/// Look of a [`Scene::sparkles`] burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparklesDesc {
    /// Sparkle texture; consecutive tiles are used.
    pub texture: ResourceHandle,
    /// Tile of the first sparkle.
    pub first_tile: u32,
    /// Height of the burst.
    pub height: f64,
}

/// Behavior of a progress disk made by [`Scene::pop_disk`].
#[derive(Debug)]
pub struct PopDisk {
    started: FrameTime,
    duration: Duration,
}

impl PopDisk {
    /// Filled share at `now`.
    #[must_use]
    pub fn ratio(&self, now: FrameTime) -> f64 {
        let total = self.duration.as_secs_f64();
        if total <= 0.0 {
            return 1.0;
        }
        ((now - self.started).as_secs_f64() / total).min(1.0)
    }

    fn discard(&mut self, scene: &mut Scene, node: NodeId) {
        let now = scene.tree.now();
        let elapsed = now - self.started;
        let total = self.duration.as_secs_f64();
        if elapsed < Duration::from_secs_f64(total * DISK_MIN_SHARE) {
            let wait = Duration::from_secs_f64(total * DISK_RETRY_SHARE).saturating_sub(elapsed);
            scene
                .tasks
                .cancel_kind_for_node(node, TaskKind::Custom(DISK_DONE));
            scene
                .tasks
                .schedule_after(now, wait, node, TaskKind::Custom(DISK_DONE));
            return;
        }
        scene.tasks.cancel_for_node(node);
        scene.close_branch(node);
        scene.schedule_removal(node);
    }
}

impl NodeBehavior for PopDisk {
    fn on_task(&mut self, scene: &mut Scene, node: NodeId, token: u64) {
        match token {
            DISK_REFRESH => {
                let ratio = self.ratio(scene.tree.now());
                if let Err(e) = scene.tree.set_progress(node, ratio) {
                    tracing::warn!(%e, "pop disk lost its progress payload");
                }
            }
            DISK_DONE => self.discard(scene, node),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Hoverable, NodeBehavior};
    use crate::time::FrameTime;

    const EPS: f64 = 1e-9;

    #[derive(Debug)]
    struct Tip(ResourceHandle);

    impl NodeBehavior for Tip {
        fn as_hoverable(&mut self) -> Option<&mut dyn Hoverable> {
            Some(self)
        }
    }

    impl Hoverable for Tip {
        fn popover_text(&self) -> Option<ResourceHandle> {
            Some(self.0)
        }
    }

    fn reference(scene: &mut Scene, x: f64) -> NodeId {
        let front = scene.front_screen();
        let r = scene
            .tree_mut()
            .add_child(front, NodeDesc::new(x, 0.0, 1.0, 0.4).flag(Flag::Show));
        scene.tree_mut().make_selectable(r);
        r
    }

    #[test]
    fn popover_sits_above_and_discards_itself() {
        let mut scene = Scene::default();
        let r = reference(&mut scene, 0.0);
        let pop = scene.popover_over(r, ResourceHandle(7), None);
        let t = scene.tree();
        assert_eq!(t.parent(pop), Some(scene.front_screen()));
        assert!(t.has_flag(pop, Flag::Show));
        assert!((t.real(pop, Prop::Height) - 0.2).abs() < EPS);
        assert!((t.real(pop, Prop::Y) - 0.2).abs() < EPS);
        // Slides up from half a height below.
        assert!((t.pos(pop, Prop::Y) - 0.1).abs() < EPS);
        let text = t.first_child(pop).unwrap();
        assert_eq!(t.payload(text), Some(Payload::Text(ResourceHandle(7))));

        let lifetime = scene.config().popover_lifetime;
        scene.begin_frame(FrameTime::ZERO + lifetime);
        assert!(!scene.tree().has_flag(pop, Flag::Show));
        assert!(scene.tree().is_alive(pop));
        let removal = scene.config().removal_delay;
        scene.begin_frame(FrameTime::ZERO + lifetime + removal);
        assert!(!scene.tree().is_alive(pop));
    }

    #[test]
    fn popover_is_pushed_back_inside_the_screen() {
        let mut scene = Scene::default();
        let r = reference(&mut scene, 1.5);
        let frame = ResourceHandle(2);
        let pop = scene.popover_over(r, ResourceHandle(7), Some(frame));
        let t = scene.tree();
        // 4 wide in a 4 wide screen: centred.
        assert!(t.real(pop, Prop::X).abs() < EPS);
        assert_eq!(t.children(pop).count(), 2);
    }

    #[test]
    fn resting_pointer_shows_a_popover() {
        let mut scene = Scene::default();
        let r = reference(&mut scene, 0.0);
        scene.tree_mut().set_behavior(r, Tip(ResourceHandle(3)));
        let front = scene.front_screen();
        let before = scene.tree().children(front).count();

        assert_eq!(scene.on_hover(Point::new(0.0, 0.0)), Some(r));
        assert!(scene.tasks().has_pending(r, TaskKind::ShowHoverPopover));
        scene.on_hover(Point::new(1.9, 1.9));
        assert!(!scene.tasks().has_pending(r, TaskKind::ShowHoverPopover));

        scene.on_hover(Point::new(0.1, 0.0));
        let delay = scene.config().hover_delay;
        scene.begin_frame(FrameTime::ZERO + delay);
        assert_eq!(scene.tree().children(front).count(), before + 1);
    }

    #[test]
    fn touch_mode_uses_inline_labels() {
        let mut scene = Scene::default();
        let r = reference(&mut scene, 0.0);
        scene.tree_mut().set_behavior(r, Tip(ResourceHandle(3)));

        scene.set_touch_mode(true);
        let label = scene.inline_label(r).unwrap();
        let t = scene.tree();
        assert_eq!(t.parent(label), Some(r));
        assert!((t.real(label, Prop::Y) - 0.2).abs() < EPS);
        assert!((t.real(label, Prop::Width) - 2.0).abs() < EPS);
        assert!(t.has_flag(label, Flag::Show));
        assert_eq!(scene.on_hover(Point::new(0.0, 0.0)), None);

        scene.update_hover_label(r, Some(ResourceHandle(4)));
        assert_eq!(
            scene.tree().payload(label),
            Some(Payload::Text(ResourceHandle(4)))
        );

        scene.set_touch_mode(false);
        assert_eq!(scene.inline_label(r), None);
        assert!(!scene.tree().is_alive(label));
    }

    fn ms(ms: u64) -> FrameTime {
        FrameTime::from_millis(ms)
    }

    fn filled(scene: &Scene, disk: NodeId) -> u16 {
        match scene.tree().payload(disk) {
            Some(Payload::Progress { filled, .. }) => filled,
            other => panic!("not a progress disk: {other:?}"),
        }
    }

    fn disk_desc() -> PopDiskDesc {
        PopDiskDesc {
            x: 0.0,
            y: 0.0,
            height: 0.5,
            lambda: 10.0,
            texture: ResourceHandle(5),
            tile: 1,
            duration: Duration::from_millis(1_000),
            down: false,
        }
    }

    #[test]
    fn pop_disk_fills_then_goes_away() {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let disk = scene.pop_disk(front, disk_desc());
        assert!(scene.tree().has_flag(disk, Flag::Show));
        assert_eq!(filled(&scene, disk), 0);

        scene.begin_frame(ms(500));
        assert_eq!(filled(&scene, disk), 500);
        scene.begin_frame(ms(1_000));
        assert_eq!(filled(&scene, disk), Payload::PROGRESS_FULL);
        assert!(!scene.tree().has_flag(disk, Flag::Show));
        assert!(!scene.tasks().has_pending(disk, TaskKind::Custom(DISK_REFRESH)));
        scene.begin_frame(ms(2_000));
        assert!(!scene.tree().is_alive(disk));
    }

    #[test]
    fn early_discard_keeps_the_disk_up_a_moment() {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let disk = scene.pop_disk(front, disk_desc());
        scene.begin_frame(ms(100));
        assert!(scene.discard_pop_disk(disk));
        assert!(scene.tree().has_flag(disk, Flag::Show));
        scene.begin_frame(ms(319));
        assert!(scene.tree().has_flag(disk, Flag::Show));
        scene.begin_frame(ms(320));
        assert!(!scene.tree().has_flag(disk, Flag::Show));
        assert!(scene.tasks().has_pending(disk, TaskKind::Disconnect));

        assert!(!scene.discard_pop_disk(front));
    }

    #[test]
    fn pop_surface_flashes_over_its_reference() {
        let mut scene = Scene::default();
        let r = reference(&mut scene, 1.0);
        let surface = scene.pop_surface(
            r,
            PopSurfaceDesc {
                texture: ResourceHandle(9),
                tile: 4,
                x: 0.0,
                y: 1.0,
                height: 0.5,
                lambda: 0.0,
                lifetime: Duration::from_millis(500),
            },
        );
        let t = scene.tree();
        assert_eq!(t.parent(surface), Some(scene.front_screen()));
        assert!((t.real(surface, Prop::X) - 1.0).abs() < EPS);
        assert!((t.real(surface, Prop::Y) - 0.4).abs() < EPS);
        assert!((t.real(surface, Prop::Height) - 0.2).abs() < EPS);
        assert!(t.has_flag(surface, Flag::Show));

        scene.begin_frame(ms(500));
        assert!(!scene.tree().has_flag(surface, Flag::Show));
        assert!(scene.tree().is_alive(surface));
        let removal = scene.config().removal_delay;
        scene.begin_frame(ms(500) + removal);
        assert!(!scene.tree().is_alive(surface));
    }

    #[test]
    fn sparkles_close_then_disconnect() {
        let mut scene = Scene::default();
        let desc = SparklesDesc {
            texture: ResourceHandle(6),
            first_tile: 3,
            height: 0.8,
        };
        let group = scene.sparkles(Point::new(0.5, 0.0), desc);
        let t = scene.tree();
        assert!((t.real(group, Prop::ScaleX) - 0.8).abs() < EPS);
        let sparks: Vec<NodeId> = t.children(group).collect();
        assert_eq!(sparks.len(), 9);
        for (i, &s) in sparks.iter().enumerate() {
            assert!(t.has_flag(s, Flag::Show));
            assert_eq!(
                t.payload(s),
                Some(Payload::Texture {
                    texture: ResourceHandle(6),
                    tile: 3 + i as u32,
                })
            );
            let rest = Point::new(t.real(s, Prop::X), t.real(s, Prop::Y));
            assert!(rest.to_vec2().hypot() <= SPARKLE_SPREAD + EPS);
            // Bursts out of the centre.
            assert!(t.pos(s, Prop::X).abs() < EPS);
        }

        scene.begin_frame(ms(599));
        assert!(scene.tree().has_flag(group, Flag::Show));
        scene.begin_frame(ms(600));
        assert!(!scene.tree().has_flag(group, Flag::Show));
        assert!(scene.tree().is_alive(group));
        scene.begin_frame(ms(1_600));
        assert!(!scene.tree().is_alive(group));
    }

    #[test]
    fn sparkles_over_take_the_smaller_side() {
        let mut scene = Scene::default();
        let r = reference(&mut scene, -1.0);
        let desc = SparklesDesc {
            texture: ResourceHandle(6),
            first_tile: 0,
            height: 0.0,
        };
        let group = scene.sparkles_over(r, desc);
        let t = scene.tree();
        assert!((t.real(group, Prop::X) + 1.0).abs() < EPS);
        assert!((t.real(group, Prop::ScaleY) - 0.4).abs() < EPS);
    }
}
