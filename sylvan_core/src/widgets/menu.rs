// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A vertically scrolling list.

use kurbo::Point;

use crate::behavior::{Draggable, NodeBehavior, Scrollable};
use crate::layout::AlignOptions;
use crate::lifecycle;
use crate::scene::Scene;
use crate::scheduler::{TaskId, TaskKind};
use crate::smooth::SmoothValue;
use crate::time::FrameTime;
use crate::tree::{Flag, NodeDesc, NodeId, Prop};

/// Drags slower than this (units per second) snap instead of flinging.
const FLING_MIN_SPEED: f64 = 1.0;

/// Geometry of a [`SlidingMenu`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlidingMenuDesc {
    /// Centre x in the parent's frame.
    pub x: f64,
    /// Centre y in the parent's frame.
    pub y: f64,
    /// Width, scroll bar included.
    pub width: f64,
    /// Height of the visible window.
    pub height: f64,
    /// Number of items visible at once.
    pub displayed: usize,
    /// Item pitch relative to item height. Below 1 items overlap.
    pub spacing: f64,
}

/// A window onto a vertical list of items that slides under it.
///
/// The menu node holds a *list* node (the items' parent) and a scroll bar.
/// Add items under [`list`](Self::list) and (re)open the menu: opening
/// normalizes item heights so that `displayed` of them fill the window,
/// stacks them, and scrolls to [`open_index`](Self::open_index).
///
/// Items outside the window are flagged `hidden` and closed, so they are
/// neither drawn nor hit.
#[derive(Debug)]
pub struct SlidingMenu {
    /// Index of the item shown at the top when the menu opens.
    pub open_index: usize,
    displayed: usize,
    spacing: f64,
    list: NodeId,
    bar: NodeId,
    nub: NodeId,
    // Drag and fling state.
    y_grab_to_list: f64,
    y0: f64,
    y1: f64,
    speed0: f64,
    speed1: f64,
    last_drag: Option<FrameTime>,
    fling_speed: SmoothValue,
    fling_start: Option<FrameTime>,
    last_step: FrameTime,
    fling_task: Option<TaskId>,
}

impl SlidingMenu {
    /// Creates a sliding menu under `parent` and returns its node.
    pub fn install(scene: &mut Scene, parent: NodeId, desc: SlidingMenuDesc) -> NodeId {
        let tree = scene.tree_mut();
        let (w, h) = (desc.width, desc.height);
        let node = tree.add_child(
            parent,
            NodeDesc::new(desc.x, desc.y, w, h)
                .lambda(10.0)
                .flag(Flag::SelectableRoot),
        );
        tree.make_selectable(node);
        let bar_width = w.max(h) * 0.025;
        let list = tree.add_child(
            node,
            NodeDesc::new(-0.5 * bar_width, 0.0, w - bar_width, h)
                .lambda(20.0)
                .flag(Flag::SelectableRoot),
        );
        let bar = tree.add_child(
            node,
            NodeDesc::new(w / 2.0 - bar_width / 2.0, 0.0, bar_width, h),
        );
        let nub = tree.add_child(
            bar,
            NodeDesc::new(0.0, h / 4.0, bar_width, bar_width * 3.0).lambda(30.0),
        );
        tree.set_behavior(
            node,
            Self {
                open_index: 0,
                displayed: desc.displayed.max(1),
                spacing: desc.spacing,
                list,
                bar,
                nub,
                y_grab_to_list: 0.0,
                y0: 0.0,
                y1: 0.0,
                speed0: 0.0,
                speed1: 0.0,
                last_drag: None,
                fling_speed: SmoothValue::with_lambda(0.0, 4.0),
                fling_start: None,
                last_step: FrameTime::ZERO,
                fling_task: None,
            },
        );
        node
    }

    /// The parent of the items.
    #[inline]
    #[must_use]
    pub const fn list(&self) -> NodeId {
        self.list
    }

    /// The scroll bar's moving part.
    #[inline]
    #[must_use]
    pub const fn nub(&self) -> NodeId {
        self.nub
    }

    /// Destroys every item. Reopen the menu afterwards.
    pub fn remove_all_items(&self, scene: &mut Scene) {
        let list = self.list;
        let items: Vec<NodeId> = scene.tree().children(list).collect();
        for item in items {
            scene.destroy(item);
        }
    }

    fn total(scene: &Scene, list: NodeId) -> usize {
        scene.tree().children(list).count()
    }

    fn item_height(&self, scene: &Scene, node: NodeId) -> f64 {
        scene.tree().real(node, Prop::Height) / self.displayed as f64
    }

    /// How far the list may slide either way, if it does not fit.
    fn max_delta_y(&self, scene: &Scene, node: NodeId) -> Option<f64> {
        let total = Self::total(scene, self.list);
        (total > self.displayed)
            .then(|| 0.5 * self.item_height(scene, node) * (total - self.displayed) as f64)
    }

    /// Moves the list, snapping to whole items and staying in range.
    fn set_list_y(&self, scene: &mut Scene, node: NodeId, y: f64, snap: bool, fix: bool) {
        let Some(max_dy) = self.max_delta_y(scene, node) else {
            scene.tree_mut().set(self.list, Prop::Y, 0.0, fix);
            return;
        };
        let ih = self.item_height(scene, node);
        let y = if snap {
            ((y - max_dy) / ih).round() * ih + max_dy
        } else {
            y
        };
        let tree = scene.tree_mut();
        tree.set(self.list, Prop::Y, y.clamp(-max_dy, max_dy), fix);
        // The nub runs top to bottom while the list runs bottom to top.
        let rel = tree.real(self.list, Prop::Y) / max_dy;
        let room = (tree.real(self.bar, Prop::Height) - tree.real(self.nub, Prop::Height)) / 2.0;
        tree.set(self.nub, Prop::Y, -rel * room, false);
    }

    /// Hides the items outside the window and unhides those inside.
    fn check_items_visibility(&mut self, scene: &mut Scene, node: NodeId, open_nodes: bool) {
        let items: Vec<NodeId> = scene.tree().children(self.list).collect();
        if items.is_empty() || !scene.tree().has_flag(self.list, Flag::Show) {
            self.stop_fling(scene);
            return;
        }
        let list_y = scene.tree().real(self.list, Prop::Y);
        let half = scene.tree().real(node, Prop::Height) / 2.0;
        for item in items {
            let to_show = (list_y + scene.tree().real(item, Prop::Y)).abs() < half;
            let hidden = scene.tree().has_flag(item, Flag::Hidden);
            if to_show && hidden {
                scene.tree_mut().set_flag(item, Flag::Hidden, false);
                if open_nodes {
                    scene.open_and_show_branch(item);
                }
            } else if !to_show && !hidden {
                scene.tree_mut().set_flag(item, Flag::Hidden, true);
                if open_nodes {
                    scene.close_branch(item);
                }
            }
        }
    }

    /// Sizes the scroll bar nub, or hides the bar when everything fits.
    fn set_nub_height(&self, scene: &mut Scene, rel: f64) {
        if rel <= 0.0 || rel >= 1.0 {
            scene.tree_mut().set_flag(self.bar, Flag::Hidden, true);
            if scene.tree().has_flag(self.bar, Flag::Show) {
                scene.close_branch(self.bar);
            }
            return;
        }
        let tree = scene.tree_mut();
        tree.set_flag(self.bar, Flag::Hidden, false);
        let w = tree.real(self.bar, Prop::Width);
        let h = (tree.real(self.bar, Prop::Height) * rel).max(2.0 * w);
        tree.set(self.nub, Prop::Height, h, false);
    }

    fn stop_fling(&mut self, scene: &mut Scene) {
        if let Some(task) = self.fling_task.take() {
            scene.tasks_mut().cancel(task);
        }
        self.fling_start = None;
        self.last_drag = None;
    }

    /// Advances a fling. Run by the repeating
    /// [`TaskKind::FlingStep`] task scheduled on let go.
    pub fn fling_step(&mut self, scene: &mut Scene, node: NodeId, task: TaskId) {
        let Some(start) = self.fling_start else {
            scene.tasks_mut().cancel(task);
            return;
        };
        let now = scene.now();
        let config = *scene.config();
        let flying = now.saturating_duration_since(start);
        if flying > config.fling_hold {
            if flying > config.fling_length {
                self.stop_fling(scene);
                scene.tasks_mut().cancel(task);
                let y = scene.tree().real(self.list, Prop::Y);
                self.set_list_y(scene, node, y, true, false);
                self.check_items_visibility(scene, node, true);
                return;
            }
            self.fling_speed.set(0.0, false, false, now);
        }
        let dt = now.saturating_duration_since(self.last_step).as_secs_f64();
        if dt > 0.0 {
            let y = scene.tree().real(self.list, Prop::Y) + dt * self.fling_speed.pos(now);
            self.set_list_y(scene, node, y, false, false);
            self.last_step = now;
        }
        self.check_items_visibility(scene, node, true);
    }
}

impl NodeBehavior for SlidingMenu {
    fn open(&mut self, scene: &mut Scene, node: NodeId) {
        if !scene.tree().has_flag(self.list, Flag::Hidden) {
            scene.tree_mut().set_show(self.list, true);
        }
        self.stop_fling(scene);

        let total = Self::total(scene, self.list);
        self.set_nub_height(scene, self.displayed as f64 / total.max(1) as f64);

        let items: Vec<NodeId> = scene.tree().children(self.list).collect();
        if !items.is_empty() {
            let small = self.item_height(scene, node) / self.spacing;
            let tree = scene.tree_mut();
            for &item in &items {
                tree.set_flag(item, Flag::Hidden, false);
                let h = tree.real(item, Prop::Height);
                if h > 0.0 {
                    tree.set(item, Prop::ScaleX, small / h, false);
                    tree.set(item, Prop::ScaleY, small / h, false);
                }
            }
            tree.align_children(self.list, AlignOptions::VERTICAL.fixed(), 1.0, self.spacing);
            // Keep the list as wide as the window, not as its widest item.
            let rest = tree.value(self.list, Prop::Width).default_pos();
            tree.set(self.list, Prop::Width, rest, false);
        }

        match self.max_delta_y(scene, node) {
            Some(max_dy) => {
                let y = self.item_height(scene, node) * self.open_index as f64 - max_dy;
                self.set_list_y(scene, node, y, true, true);
            }
            None => self.set_list_y(scene, node, 0.0, true, true),
        }
        self.check_items_visibility(scene, node, false);
        lifecycle::default_open(scene, node);
    }

    fn as_draggable(&mut self) -> Option<&mut dyn Draggable> {
        Some(self)
    }

    fn as_scrollable(&mut self) -> Option<&mut dyn Scrollable> {
        Some(self)
    }
}

impl Scrollable for SlidingMenu {
    fn scroll(&mut self, scene: &mut Scene, node: NodeId, delta_y: f64) {
        let ih = self.item_height(scene, node);
        let step = if delta_y > 0.0 { -ih } else { ih };
        let y = scene.tree().real(self.list, Prop::Y) + step;
        self.set_list_y(scene, node, y, true, false);
        self.check_items_visibility(scene, node, true);
    }
}

impl Draggable for SlidingMenu {
    fn grab(&mut self, scene: &mut Scene, _node: NodeId, point: Point) {
        self.stop_fling(scene);
        self.y0 = point.y;
        self.y1 = point.y;
        self.speed0 = 0.0;
        self.speed1 = 0.0;
        self.last_drag = Some(scene.now());
        self.y_grab_to_list = point.y - scene.tree().real(self.list, Prop::Y);
    }

    fn drag(&mut self, scene: &mut Scene, node: NodeId, point: Point) {
        let now = scene.now();
        let dt = self
            .last_drag
            .map_or(0.0, |t| now.saturating_duration_since(t).as_secs_f64());
        // Updates closer than 10 ms give meaningless speeds.
        if dt < 0.010 {
            return;
        }
        self.y0 = self.y1;
        self.y1 = point.y;
        self.speed0 = self.speed1;
        self.speed1 = (self.y1 - self.y0) / dt;
        self.last_drag = Some(now);
        self.set_list_y(scene, node, self.y1 - self.y_grab_to_list, false, false);
        self.check_items_visibility(scene, node, true);
    }

    fn let_go(&mut self, scene: &mut Scene, node: NodeId) {
        let speed = (self.speed0 + self.speed1) / 2.0;
        if speed.abs() < FLING_MIN_SPEED {
            let y = scene.tree().real(self.list, Prop::Y);
            self.set_list_y(scene, node, y, true, false);
            self.check_items_visibility(scene, node, true);
            return;
        }
        let now = scene.now();
        let step = scene.config().fling_step;
        self.fling_speed.set(speed, true, false, now);
        self.fling_start = Some(now);
        self.last_step = now;
        self.fling_task = Some(
            scene
                .tasks_mut()
                .schedule_repeating(now, step, node, TaskKind::FlingStep),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Duration;

    const EPS: f64 = 1e-9;

    fn menu_with_items(n: usize) -> (Scene, NodeId, Vec<NodeId>) {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let menu = SlidingMenu::install(
            &mut scene,
            front,
            SlidingMenuDesc {
                x: 0.0,
                y: 0.0,
                width: 2.0,
                height: 3.0,
                displayed: 3,
                spacing: 1.0,
            },
        );
        let list = scene.tree().behavior::<SlidingMenu>(menu).unwrap().list();
        let items = (0..n)
            .map(|_| {
                scene
                    .tree_mut()
                    .add_child(list, NodeDesc::new(0.0, 0.0, 0.5, 0.5))
            })
            .collect();
        scene.open_and_show_branch(menu);
        (scene, menu, items)
    }

    fn shown(scene: &Scene, items: &[NodeId]) -> Vec<usize> {
        (0..items.len())
            .filter(|&i| scene.tree().has_flag(items[i], Flag::Show))
            .collect()
    }

    fn list_y(scene: &Scene, menu: NodeId) -> f64 {
        let list = scene.tree().behavior::<SlidingMenu>(menu).unwrap().list();
        scene.tree().real(list, Prop::Y)
    }

    #[test]
    fn opening_normalizes_and_shows_the_first_items() {
        let (scene, menu, items) = menu_with_items(6);
        let t = scene.tree();
        // Items are scaled to one third of the window.
        assert!((t.real(items[0], Prop::ScaleY) - 2.0).abs() < EPS);
        assert!((t.real(items[0], Prop::Y) - 2.5).abs() < EPS);
        assert!((t.real(items[5], Prop::Y) + 2.5).abs() < EPS);
        assert!((list_y(&scene, menu) + 1.5).abs() < EPS);
        assert_eq!(shown(&scene, &items), vec![0, 1, 2]);
        assert!(t.has_flag(items[4], Flag::Hidden));
    }

    #[test]
    fn short_lists_do_not_slide() {
        let (mut scene, menu, items) = menu_with_items(2);
        assert!(list_y(&scene, menu).abs() < EPS);
        assert_eq!(shown(&scene, &items), vec![0, 1]);
        scene.on_scroll(-1.0);
        assert!(list_y(&scene, menu).abs() < EPS);
    }

    #[test]
    fn wheel_scrolls_by_one_item() {
        let (mut scene, menu, items) = menu_with_items(6);
        assert_eq!(scene.on_scroll(-1.0), Some(menu));
        assert!((list_y(&scene, menu) + 0.5).abs() < EPS);
        assert_eq!(shown(&scene, &items), vec![1, 2, 3]);
        // Clamped at the start of the list.
        scene.on_scroll(1.0);
        scene.on_scroll(1.0);
        assert!((list_y(&scene, menu) + 1.5).abs() < EPS);
    }

    #[test]
    fn slow_drag_snaps_on_release() {
        let (mut scene, menu, _) = menu_with_items(6);
        assert_eq!(scene.on_press(Point::new(0.0, 0.0)), Some(menu));
        scene.begin_frame(FrameTime::from_millis(500));
        scene.on_move(Point::new(0.0, 0.4));
        assert!((list_y(&scene, menu) + 1.1).abs() < EPS);
        scene.on_release();
        assert!((list_y(&scene, menu) + 1.5).abs() < EPS);
        assert!(!scene.tasks().has_pending(menu, TaskKind::FlingStep));
    }

    #[test]
    fn fling_decays_and_snaps() {
        let (mut scene, menu, _) = menu_with_items(8);
        scene.on_press(Point::new(0.0, 0.0));
        let mut now = FrameTime::from_millis(20);
        scene.begin_frame(now);
        scene.on_move(Point::new(0.0, 0.5));
        scene.on_release();
        assert!(scene.tasks().has_pending(menu, TaskKind::FlingStep));
        let start = list_y(&scene, menu);

        now = now + Duration::from_millis(40);
        scene.begin_frame(now);
        assert!(list_y(&scene, menu) > start);

        while now < FrameTime::from_millis(1_200) {
            now = now + Duration::from_millis(40);
            scene.begin_frame(now);
        }
        assert!(!scene.tasks().has_pending(menu, TaskKind::FlingStep));
        let y = list_y(&scene, menu);
        // 8 items, 3 shown: the list slides within ±2.5 in whole items.
        assert!(y.abs() <= 2.5 + EPS, "{y}");
        assert!(((y - 2.5) - (y - 2.5).round()).abs() < 1e-6, "{y}");
    }
}
