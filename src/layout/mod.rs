//! The retained UI tree and its measure/arrange passes.
//!
//! Widgets that lay out their own children (panels, the scroll container)
//! get called back during both passes; plain elements stack their children
//! along `direction`.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::gfx::{RectDIP, SizeDIP};
use crate::widgets::Instance;

pub mod model;
pub mod scroll;
pub mod visitors;

use model::{Direction, Sizing, UIElement, UIKey, WidgetContent};

pub struct OwnedUITree<Message> {
    pub slots: SlotMap<UIKey, UIElement<Message>>,
    pub root: UIKey,
    pub widget_state: HashMap<u64, Instance>,
}

impl<Message> Default for OwnedUITree<Message> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Message> OwnedUITree<Message> {
    pub fn new() -> Self {
        let mut slots = SlotMap::new();
        let root = slots.insert(UIElement {
            width: Sizing::grow(),
            height: Sizing::grow(),
            ..Default::default()
        });

        Self {
            slots,
            root,
            widget_state: HashMap::new(),
        }
    }

    /// Inserts `element` as the last child of `parent`.
    pub fn insert(&mut self, parent: UIKey, element: UIElement<Message>) -> UIKey {
        let key = self.insert_detached(element);
        self.append_child(parent, key);
        key
    }

    /// Inserts `element` without attaching it to the tree.
    pub fn insert_detached(&mut self, element: UIElement<Message>) -> UIKey {
        let key = self.slots.insert(element);
        self.ensure_instance(key);
        key
    }

    pub fn append_child(&mut self, parent: UIKey, child: UIKey) {
        debug_assert!(self.slots[child].parent.is_none(), "child already attached");
        self.slots[child].parent = Some(parent);
        self.slots[parent].children.push(child);
    }

    /// Detaches `child` from its parent, leaving it in the slot map.
    pub fn detach_child(&mut self, child: UIKey) {
        if let Some(parent) = self.slots[child].parent.take() {
            self.slots[parent].children.retain(|&k| k != child);
        }
    }

    /// Removes an element and its whole subtree, dropping widget state.
    pub fn remove(&mut self, key: UIKey) {
        self.detach_child(key);
        for k in visitors::descendants(self, key) {
            if let Some(id) = self.slots[k].id {
                self.widget_state.remove(&id);
            }
            self.slots.remove(k);
        }
    }

    pub fn find_by_id(&self, id: u64) -> Option<UIKey> {
        self.slots
            .iter()
            .find(|(_, element)| element.id == Some(id))
            .map(|(key, _)| key)
    }

    fn ensure_instance(&mut self, key: UIKey) {
        let element = &self.slots[key];
        let (Some(id), Some(widget)) = (element.id, element.content.as_ref()) else {
            debug_assert!(
                element.content.is_none(),
                "widget content requires an element id"
            );
            return;
        };

        if !self.widget_state.contains_key(&id) {
            let state = widget.state();
            self.widget_state.insert(id, Instance::new(id, state));
        }
    }
}

/// Runs a closure against an element's widget with the widget and its
/// instance temporarily taken out of the tree, so the closure can borrow the
/// rest of the tree freely.
pub(crate) fn with_widget<Message, R>(
    tree: &mut OwnedUITree<Message>,
    key: UIKey,
    f: impl FnOnce(&mut OwnedUITree<Message>, UIKey, &mut WidgetContent<Message>, &mut Instance) -> R,
) -> Option<R> {
    let id = tree.slots[key].id?;
    let mut widget = tree.slots[key].content.take()?;
    let mut instance = tree
        .widget_state
        .remove(&id)
        .unwrap_or_else(|| Instance::new(id, widget.state()));

    let result = f(tree, key, &mut widget, &mut instance);

    tree.slots[key].content = Some(widget);
    tree.widget_state.insert(id, instance);
    Some(result)
}

/// Measures the whole tree and arranges it into `viewport`.
pub fn perform_layout<Message>(tree: &mut OwnedUITree<Message>, viewport: SizeDIP) {
    let root = tree.root;
    measure(tree, root, viewport);
    let size = tree.slots[root].desired_size();
    arrange(
        tree,
        root,
        RectDIP {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
        },
    );
}

/// Measure pass: computes the element's desired size within `available` and
/// stores it on the element.
pub fn measure<Message>(tree: &mut OwnedUITree<Message>, key: UIKey, available: SizeDIP) -> SizeDIP {
    let (width, height, padding, has_widget) = {
        let element = &tree.slots[key];
        (
            element.width,
            element.height,
            element.padding,
            element.content.is_some(),
        )
    };

    let inner_available = SizeDIP {
        width: available_for(width, available.width) - padding.horizontal(),
        height: available_for(height, available.height) - padding.vertical(),
    };

    let content = if has_widget {
        with_widget(tree, key, |tree, key, widget, instance| {
            widget.measure(tree, key, instance, inner_available)
        })
        .unwrap_or_default()
    } else {
        measure_children_stacked(tree, key, inner_available)
    };

    let desired = SizeDIP {
        width: width.resolve(content.width + padding.horizontal(), available.width),
        height: height.resolve(content.height + padding.vertical(), available.height),
    };

    let element = &mut tree.slots[key];
    element.desired_width = desired.width;
    element.desired_height = desired.height;
    desired
}

/// Arrange pass: positions the element within `rect` and lets it place its
/// children.
pub fn arrange<Message>(tree: &mut OwnedUITree<Message>, key: UIKey, rect: RectDIP) {
    let has_widget = {
        let element = &mut tree.slots[key];
        element.x = rect.x;
        element.y = rect.y;
        element.computed_width = rect.width;
        element.computed_height = rect.height;
        element.content.is_some()
    };

    if has_widget {
        with_widget(tree, key, |tree, key, widget, instance| {
            widget.arrange(tree, key, instance, rect);
        });
    } else {
        arrange_children_stacked(tree, key, rect);
    }
}

/// Default measure behavior: children stacked along `direction`.
pub fn measure_children_stacked<Message>(
    tree: &mut OwnedUITree<Message>,
    key: UIKey,
    available: SizeDIP,
) -> SizeDIP {
    let children = tree.slots[key].children.clone();
    let direction = tree.slots[key].direction;
    let child_gap = tree.slots[key].child_gap;

    let mut main = 0.0f32;
    let mut cross = 0.0f32;
    for (i, &child) in children.iter().enumerate() {
        let size = measure(tree, child, available);
        if i > 0 {
            main += child_gap;
        }
        match direction {
            Direction::LeftToRight => {
                main += size.width;
                cross = cross.max(size.height);
            }
            Direction::TopToBottom => {
                main += size.height;
                cross = cross.max(size.width);
            }
        }
    }

    match direction {
        Direction::LeftToRight => SizeDIP::new(main, cross),
        Direction::TopToBottom => SizeDIP::new(cross, main),
    }
}

/// Default arrange behavior: children placed sequentially at their desired
/// sizes, inside the padded content box.
pub fn arrange_children_stacked<Message>(
    tree: &mut OwnedUITree<Message>,
    key: UIKey,
    rect: RectDIP,
) {
    let children = tree.slots[key].children.clone();
    let direction = tree.slots[key].direction;
    let child_gap = tree.slots[key].child_gap;
    let padding = tree.slots[key].padding;

    let mut x = rect.x + padding.left;
    let mut y = rect.y + padding.top;
    for &child in &children {
        let size = tree.slots[child].desired_size();
        arrange(
            tree,
            child,
            RectDIP {
                x,
                y,
                width: size.width,
                height: size.height,
            },
        );
        match direction {
            Direction::LeftToRight => x += size.width + child_gap,
            Direction::TopToBottom => y += size.height + child_gap,
        }
    }
}

fn available_for(sizing: Sizing, available: f32) -> f32 {
    match sizing {
        Sizing::Fixed { px } => px,
        Sizing::Percent { percent } => {
            if available.is_finite() {
                available * percent
            } else {
                available
            }
        }
        _ => available,
    }
}
