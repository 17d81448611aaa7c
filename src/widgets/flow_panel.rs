//! A carousel-style panel: the selected item sits centered, the rest fan out
//! to its sides at a fixed gap.

use crate::collection::ElementCollection;
use crate::gfx::{RectDIP, SizeDIP};
use crate::layout::model::UIKey;
use crate::layout::{self, OwnedUITree};
use crate::property::{Property, PropertyError};
use crate::widgets::{Instance, State, Widget};
use crate::with_state;

const DEFAULT_ITEM_SIZE: SizeDIP = SizeDIP {
    width: 500.0,
    height: 500.0,
};
const DEFAULT_ITEM_GAP: f32 = 100.0;
const DEFAULT_FRONT_ITEM_GAP: f32 = 20.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct FlowPanel;

struct FlowPanelState {
    items: ElementCollection<UIKey>,
    item_size: Property<SizeDIP>,
    selected_index: Property<i32>,
    item_gap: Property<f32>,
    front_item_gap: Property<f32>,
}

fn valid_item_size(size: &SizeDIP) -> bool {
    size.is_valid() && size.width > 0.0 && size.height > 0.0
}

fn valid_index(index: &i32) -> bool {
    *index >= 0
}

fn valid_gap(gap: &f32) -> bool {
    gap.is_finite()
}

impl FlowPanel {
    pub fn add_item<Message>(tree: &mut OwnedUITree<Message>, panel: UIKey, item: UIKey) -> bool {
        let Some(id) = tree.slots[panel].id else {
            debug_assert!(false, "flow panel element has no id");
            return false;
        };
        let Some(mut instance) = tree.widget_state.remove(&id) else {
            return false;
        };

        let state = with_state!(mut instance as FlowPanelState);
        let added = state.items.add(item).is_some();
        if added {
            tree.append_child(panel, item);
        }

        tree.widget_state.insert(id, instance);
        added
    }

    pub fn items_mut(instance: &mut Instance) -> &mut ElementCollection<UIKey> {
        &mut with_state!(mut instance as FlowPanelState).items
    }

    pub fn item_size(instance: &Instance) -> SizeDIP {
        with_state!(instance as FlowPanelState).item_size.value()
    }

    pub fn set_item_size(instance: &mut Instance, size: SizeDIP) -> Result<bool, PropertyError> {
        with_state!(mut instance as FlowPanelState)
            .item_size
            .set(size)
    }

    pub fn selected_index(instance: &Instance) -> i32 {
        with_state!(instance as FlowPanelState)
            .selected_index
            .value()
    }

    pub fn set_selected_index(instance: &mut Instance, index: i32) -> Result<bool, PropertyError> {
        with_state!(mut instance as FlowPanelState)
            .selected_index
            .set(index)
    }

    pub fn set_item_gap(instance: &mut Instance, gap: f32) -> Result<bool, PropertyError> {
        with_state!(mut instance as FlowPanelState).item_gap.set(gap)
    }

    pub fn set_front_item_gap(instance: &mut Instance, gap: f32) -> Result<bool, PropertyError> {
        with_state!(mut instance as FlowPanelState)
            .front_item_gap
            .set(gap)
    }
}

/// The selected index pulled into the range of present items.
fn coerced_selected_index(state: &FlowPanelState, count: usize) -> usize {
    (state.selected_index.value() as usize).min(count.saturating_sub(1))
}

impl<Message> Widget<Message> for FlowPanel {
    fn state(&self) -> State {
        Some(Box::new(FlowPanelState {
            items: ElementCollection::new(),
            item_size: Property::new("item_size", DEFAULT_ITEM_SIZE).with_validator(valid_item_size),
            selected_index: Property::new("selected_index", 0).with_validator(valid_index),
            item_gap: Property::new("item_gap", DEFAULT_ITEM_GAP).with_validator(valid_gap),
            front_item_gap: Property::new("front_item_gap", DEFAULT_FRONT_ITEM_GAP)
                .with_validator(valid_gap),
        }))
    }

    fn measure(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        instance: &mut Instance,
        available: SizeDIP,
    ) -> SizeDIP {
        let item_size = with_state!(instance as FlowPanelState).item_size.value();

        let children = tree.slots[key].children.clone();
        for &child in &children {
            layout::measure(tree, child, item_size);
        }

        item_size.min(available)
    }

    fn arrange(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        instance: &mut Instance,
        rect: RectDIP,
    ) {
        let state = with_state!(mut instance as FlowPanelState);
        let children = tree.slots[key].children.clone();
        let count = children.len();
        if count == 0 {
            return;
        }

        let item_size = state.item_size.value();
        let item_gap = state.item_gap.value();
        let front_item_gap = state.front_item_gap.value();
        let selected = coerced_selected_index(state, count);

        let place = |tree: &mut OwnedUITree<Message>, child: UIKey, x: f32| {
            layout::arrange(
                tree,
                child,
                RectDIP {
                    x,
                    y: rect.y,
                    width: item_size.width,
                    height: item_size.height,
                },
            );
        };

        // selected item centered, the rest fanned out to each side
        let center = rect.x + (rect.width - item_size.width) / 2.0;
        place(tree, children[selected], center);

        let mut left_side = center - item_size.width - front_item_gap;
        for index in (0..selected).rev() {
            place(tree, children[index], left_side);
            left_side -= item_gap;
        }

        let mut right_side = center + item_size.width + front_item_gap;
        for index in selected + 1..count {
            place(tree, children[index], right_side);
            right_side += item_gap;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::model::{Sizing, UIElement};
    use crate::layout::perform_layout;
    use crate::w_id;
    use crate::widgets::widget;

    struct Fixture {
        tree: OwnedUITree<()>,
        id: u64,
        items: Vec<UIKey>,
    }

    fn fixture(item_count: usize) -> Fixture {
        let mut tree = OwnedUITree::<()>::new();
        let id = w_id!();
        let panel = tree.insert(
            tree.root,
            UIElement {
                id: Some(id),
                content: widget(FlowPanel),
                width: Sizing::grow(),
                height: Sizing::grow(),
                ..Default::default()
            },
        );

        let instance = tree.widget_state.get_mut(&id).unwrap();
        FlowPanel::set_item_size(instance, SizeDIP::new(100.0, 100.0)).unwrap();
        FlowPanel::set_item_gap(instance, 30.0).unwrap();
        FlowPanel::set_front_item_gap(instance, 10.0).unwrap();

        let mut items = Vec::new();
        for _ in 0..item_count {
            let item = tree.insert_detached(UIElement::default());
            assert!(FlowPanel::add_item(&mut tree, panel, item));
            items.push(item);
        }

        Fixture { tree, id, items }
    }

    #[test]
    fn selected_item_is_centered_with_wings_fanned_out() {
        let mut f = fixture(4);
        let instance = f.tree.widget_state.get_mut(&f.id).unwrap();
        FlowPanel::set_selected_index(instance, 1).unwrap();

        perform_layout(&mut f.tree, SizeDIP::new(400.0, 200.0));

        // center = (400 - 100) / 2
        assert_eq!(f.tree.slots[f.items[1]].x, 150.0);
        // one item fanned left: center - width - front gap
        assert_eq!(f.tree.slots[f.items[0]].x, 40.0);
        // right wing starts symmetric, then steps by the item gap
        assert_eq!(f.tree.slots[f.items[2]].x, 260.0);
        assert_eq!(f.tree.slots[f.items[3]].x, 290.0);
    }

    #[test]
    fn out_of_range_selection_coerces_to_the_last_item() {
        let mut f = fixture(2);
        let instance = f.tree.widget_state.get_mut(&f.id).unwrap();
        FlowPanel::set_selected_index(instance, 7).unwrap();

        perform_layout(&mut f.tree, SizeDIP::new(400.0, 200.0));

        assert_eq!(f.tree.slots[f.items[1]].x, 150.0);
    }

    #[test]
    fn invalid_property_writes_are_rejected() {
        let mut f = fixture(1);
        let instance = f.tree.widget_state.get_mut(&f.id).unwrap();

        assert!(FlowPanel::set_selected_index(instance, -1).is_err());
        assert!(FlowPanel::set_item_size(instance, SizeDIP::new(f32::NAN, 10.0)).is_err());
        assert!(FlowPanel::set_item_gap(instance, f32::INFINITY).is_err());
        assert_eq!(FlowPanel::item_size(instance), SizeDIP::new(100.0, 100.0));
    }

    #[test]
    fn panel_clamps_to_the_available_space() {
        let mut f = fixture(3);
        perform_layout(&mut f.tree, SizeDIP::new(80.0, 60.0));

        let panel = f.tree.find_by_id(f.id).unwrap();
        assert_eq!(f.tree.slots[panel].desired_width, 80.0);
        assert_eq!(f.tree.slots[panel].desired_height, 60.0);
    }
}
