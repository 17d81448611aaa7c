//! A horizontal panel whose items the user can reorder by dragging.
//!
//! Pressing an item starts tracking; the item only starts following the
//! pointer once it has travelled past a small dead zone, so a twitchy click
//! doesn't reorder anything. While dragging, crossing a neighbour's midpoint
//! swaps the two in the logical order and the neighbour takes over the
//! vacated slot. Releasing re-packs all items left to right.

use std::collections::HashMap;

use crate::collection::ElementCollection;
use crate::gfx::{PointDIP, RectDIP, SizeDIP};
use crate::layout::model::UIKey;
use crate::layout::{self, OwnedUITree};
use crate::property::Property;
use crate::util;
use crate::widgets::{Bounds, Event, EventPhase, Instance, MouseButton, State, Widget};
use crate::{RedrawRequest, Shell, with_state};

/// Drag travel required before the pressed item starts moving.
const DRAG_DEAD_ZONE: f32 = 4.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct SortablePanel;

struct SortablePanelState {
    items: ElementCollection<UIKey>,
    ordered: Vec<UIKey>,
    lefts: HashMap<UIKey, Property<f32>>,
    moving: Moving,
    sorted: bool,
}

/// The in-flight drag: which item, its slot position, and the dead-zone
/// tracker.
#[derive(Default)]
struct Moving {
    active: bool,
    item: Option<UIKey>,
    index: usize,
    /// The dragged item's slot position (where it belongs when dropped).
    left: f32,
    max_left: f32,
    mover: Mover,
}

/// Computes a new position from pointer deltas, ignoring movement until the
/// pointer has left the dead zone around the press point.
#[derive(Default)]
struct Mover {
    started: bool,
    starting_point: f32,
    starting_mouse: f32,
}

impl Mover {
    fn start(&mut self, starting_point: f32, mouse: f32) {
        self.starting_point = starting_point;
        self.starting_mouse = mouse;
        self.started = false;
    }

    fn track(&mut self, mouse: f32) -> f32 {
        if !self.started && (mouse - self.starting_mouse).abs() > DRAG_DEAD_ZONE {
            self.started = true;
        }

        if self.started {
            self.starting_point + (mouse - self.starting_mouse)
        } else {
            self.starting_point
        }
    }
}

fn left_property() -> Property<f32> {
    // slot positions reject NaN/Infinity and never go negative
    Property::new("left", 0.0).with_coerce(|value| {
        if !value.is_finite() || value < 0.0 {
            0.0
        } else {
            value
        }
    })
}

impl SortablePanel {
    /// Adds `item` to the panel, unless a collection preview handler cancels
    /// the addition.
    pub fn add_item<Message>(tree: &mut OwnedUITree<Message>, panel: UIKey, item: UIKey) -> bool {
        let Some(id) = tree.slots[panel].id else {
            debug_assert!(false, "sortable panel element has no id");
            return false;
        };
        let Some(mut instance) = tree.widget_state.remove(&id) else {
            return false;
        };

        let state = with_state!(mut instance as SortablePanelState);
        let added = state.items.add(item).is_some();
        if added {
            state.ordered.push(item);
            state.lefts.insert(item, left_property());
            state.sorted = false;
            tree.append_child(panel, item);
        }

        tree.widget_state.insert(id, instance);
        added
    }

    /// Removes `item` from the panel, unless a preview handler cancels the
    /// removal.
    pub fn remove_item<Message>(
        tree: &mut OwnedUITree<Message>,
        panel: UIKey,
        item: UIKey,
    ) -> bool {
        let Some(id) = tree.slots[panel].id else {
            return false;
        };
        let Some(mut instance) = tree.widget_state.remove(&id) else {
            return false;
        };

        let state = with_state!(mut instance as SortablePanelState);
        let removed = state.items.remove_item(&item);
        if removed {
            state.ordered.retain(|&k| k != item);
            state.lefts.remove(&item);
            state.sorted = false;
            tree.detach_child(item);
        }

        tree.widget_state.insert(id, instance);
        removed
    }

    /// The items in their user-arranged order.
    pub fn ordered(instance: &Instance) -> &[UIKey] {
        &with_state!(instance as SortablePanelState).ordered
    }

    /// The panel's child collection, for registering preview/notification
    /// handlers.
    pub fn items_mut(instance: &mut Instance) -> &mut ElementCollection<UIKey> {
        &mut with_state!(mut instance as SortablePanelState).items
    }

    pub fn item_left(instance: &Instance, item: UIKey) -> f32 {
        with_state!(instance as SortablePanelState)
            .lefts
            .get(&item)
            .map(|left| left.value())
            .unwrap_or(0.0)
    }

    pub fn can_move_left(instance: &Instance, item: UIKey) -> bool {
        let state = with_state!(instance as SortablePanelState);
        state.ordered.len() > 1 && state.ordered.iter().position(|&k| k == item) > Some(0)
    }

    pub fn can_move_right(instance: &Instance, item: UIKey) -> bool {
        let state = with_state!(instance as SortablePanelState);
        state.ordered.len() > 1
            && state
                .ordered
                .iter()
                .position(|&k| k == item)
                .is_some_and(|index| index < state.ordered.len() - 1)
    }

    /// Moves `item` one position left in the order. The caller re-validates
    /// layout afterwards.
    pub fn move_left(instance: &mut Instance, item: UIKey) {
        let state = with_state!(mut instance as SortablePanelState);
        if let Some(index) = state.ordered.iter().position(|&k| k == item)
            && index > 0
        {
            util::swap_previous(&mut state.ordered, index);
            state.sorted = false;
        }
    }

    /// Moves `item` one position right in the order.
    pub fn move_right(instance: &mut Instance, item: UIKey) {
        let state = with_state!(mut instance as SortablePanelState);
        if let Some(index) = state.ordered.iter().position(|&k| k == item)
            && index + 1 < state.ordered.len()
        {
            util::swap_next(&mut state.ordered, index);
            state.sorted = false;
        }
    }
}

fn item_width<Message>(tree: &OwnedUITree<Message>, item: UIKey) -> f32 {
    tree.slots[item].desired_width
}

fn set_left(state: &mut SortablePanelState, item: UIKey, value: f32) {
    if let Some(left) = state.lefts.get_mut(&item) {
        let _ = left.set(value);
    }
}

fn left_of(state: &SortablePanelState, item: UIKey) -> f32 {
    state
        .lefts
        .get(&item)
        .map(|left| left.value())
        .unwrap_or(0.0)
}

fn mid_point<Message>(tree: &OwnedUITree<Message>, state: &SortablePanelState, item: UIKey) -> f32 {
    left_of(state, item) + item_width(tree, item) / 2.0
}

/// Swaps the dragged item with a neighbour once its edge crosses the
/// neighbour's midpoint. At most one swap per pointer move.
fn check_order<Message>(tree: &OwnedUITree<Message>, state: &mut SortablePanelState) {
    let Some(item) = state.moving.item else {
        return;
    };

    let p1 = left_of(state, item);
    let p2 = p1 + item_width(tree, item);
    let index = state.moving.index;

    if index + 1 < state.ordered.len() {
        let next = state.ordered[index + 1];
        if p2 > mid_point(tree, state, next) {
            let next_left = left_of(state, next);
            set_left(state, next, state.moving.left);
            util::swap_next(&mut state.ordered, index);
            state.moving.left = next_left;
            state.moving.index += 1;
            return;
        }
    }

    if index > 0 {
        let previous = state.ordered[index - 1];
        if p1 < mid_point(tree, state, previous) {
            let previous_left = left_of(state, previous);
            set_left(state, previous, state.moving.left);
            util::swap_previous(&mut state.ordered, index);
            state.moving.left = previous_left;
            state.moving.index -= 1;
        }
    }
}

/// Re-packs items left to right in logical order, no gaps.
fn sort<Message>(tree: &OwnedUITree<Message>, state: &mut SortablePanelState) {
    debug_assert!(!state.sorted, "sort called on an already sorted panel");
    let mut cursor = 0.0;
    let ordered = state.ordered.clone();
    for item in ordered {
        set_left(state, item, cursor);
        cursor += item_width(tree, item);
    }
    state.sorted = true;
}

impl<Message> Widget<Message> for SortablePanel {
    fn state(&self) -> State {
        Some(Box::new(SortablePanelState {
            items: ElementCollection::new(),
            ordered: Vec::new(),
            lefts: HashMap::new(),
            moving: Moving::default(),
            sorted: true,
        }))
    }

    fn measure(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        _instance: &mut Instance,
        available: SizeDIP,
    ) -> SizeDIP {
        let children = tree.slots[key].children.clone();
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for &child in &children {
            let size = layout::measure(tree, child, available);
            width += size.width;
            height = height.max(size.height);
        }

        SizeDIP::new(width, height)
    }

    fn arrange(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        instance: &mut Instance,
        rect: RectDIP,
    ) {
        let state = with_state!(mut instance as SortablePanelState);

        display(tree, key, state, rect);
        if !state.sorted {
            sort(tree, state);
            display(tree, key, state, rect);
        }
    }

    fn update(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        instance: &mut Instance,
        shell: &mut Shell<Message>,
        event: &Event,
        phase: EventPhase,
        bounds: Bounds,
    ) {
        let id = instance.id();
        let state = with_state!(mut instance as SortablePanelState);

        match (phase, event) {
            // presses come in on the bubble pass, after the item itself
            (
                EventPhase::Bubble,
                Event::MouseButtonDown {
                    button: MouseButton::Left,
                    x,
                    y,
                    ..
                },
            ) => {
                let point = PointDIP { x: *x, y: *y };
                if !state.sorted || !point.within(bounds.border_box) {
                    return;
                }

                let children = tree.slots[key].children.clone();
                let Some(item) = children
                    .iter()
                    .rev()
                    .copied()
                    .find(|&child| point.within(tree.slots[child].bounds().border_box))
                else {
                    return;
                };

                start_moving(tree, key, state, item, point, bounds);
                shell.capture_pointer(id);
            }
            // drag tracking tunnels so descendants cannot swallow it
            (EventPhase::Tunnel, Event::MouseMove { x, .. }) => {
                if !state.moving.active {
                    return;
                }

                let mut new_left = state.moving.mover.track(*x);
                if new_left > state.moving.max_left {
                    new_left = state.moving.max_left;
                }

                if let Some(item) = state.moving.item {
                    set_left(state, item, new_left);
                }
                check_order(tree, state);

                shell.request_arrange();
                shell.request_redraw(RedrawRequest::Immediate);
            }
            (
                EventPhase::Tunnel,
                Event::MouseButtonUp {
                    button: MouseButton::Left,
                    ..
                },
            ) => {
                if !state.moving.active {
                    return;
                }

                state.moving.active = false;
                state.moving.item = None;
                state.sorted = false;
                shell.release_pointer(id);
                shell.request_arrange();
                shell.request_redraw(RedrawRequest::Immediate);
            }
            _ => {}
        }
    }
}

fn start_moving<Message>(
    tree: &mut OwnedUITree<Message>,
    key: UIKey,
    state: &mut SortablePanelState,
    item: UIKey,
    point: PointDIP,
    bounds: Bounds,
) {
    let Some(index) = state.ordered.iter().position(|&k| k == item) else {
        return;
    };

    state.moving.active = true;
    state.moving.item = Some(item);
    state.moving.index = index;
    state.moving.left = left_of(state, item);
    state.moving.max_left = bounds.border_box.width - item_width(tree, item);
    state.moving.mover.start(state.moving.left, point.x);

    // dragged item renders and hit-tests above its siblings
    state.items.bring_to_front(&item);
    let children = &mut tree.slots[key].children;
    children.retain(|&k| k != item);
    children.push(item);

    log::debug!("drag reorder started at index {index}");
}

fn display<Message>(
    tree: &mut OwnedUITree<Message>,
    key: UIKey,
    state: &SortablePanelState,
    rect: RectDIP,
) {
    let children = tree.slots[key].children.clone();
    for child in children {
        let size = tree.slots[child].desired_size();
        layout::arrange(
            tree,
            child,
            RectDIP {
                x: rect.x + left_of(state, child),
                y: rect.y,
                width: size.width,
                height: size.height,
            },
        );
    }
}
