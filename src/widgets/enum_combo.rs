//! A selector over a closed option set. Clicking cycles forward through the
//! options; the wheel steps back and forth. The option set is described by
//! the [`Choices`] trait, which gives each option a display label and an
//! optional stable id.

use crate::gfx::PointDIP;
use crate::layout::OwnedUITree;
use crate::layout::model::UIKey;
use crate::runtime::cursor::CursorKind;
use crate::widgets::{Bounds, Event, EventPhase, Instance, MouseButton, State, Widget};
use crate::{RedrawRequest, Shell, with_state};

/// A closed set of selectable values.
pub trait Choices: Clone + PartialEq + 'static {
    fn all() -> &'static [Self];

    /// Display label for the option.
    fn label(&self) -> &'static str;

    /// Stable identifier, for persisting a selection independently of the
    /// label text.
    fn id(&self) -> Option<&'static str> {
        None
    }
}

pub type OnChangedFn<T, Message> = dyn Fn(&T) -> Message;

pub struct EnumComboBox<T: Choices, Message> {
    on_changed: Option<Box<OnChangedFn<T, Message>>>,
}

impl<T: Choices, Message> std::fmt::Debug for EnumComboBox<T, Message> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumComboBox")
            .field("options", &T::all().len())
            .finish()
    }
}

struct EnumComboBoxState {
    selected: usize,
}

impl<T: Choices, Message: 'static> EnumComboBox<T, Message> {
    pub fn new() -> Self {
        debug_assert!(!T::all().is_empty(), "choice set must not be empty");
        Self { on_changed: None }
    }

    pub fn with_changed(mut self, handler: impl Fn(&T) -> Message + 'static) -> Self {
        self.on_changed = Some(Box::new(handler));
        self
    }

    pub fn selected(instance: &Instance) -> &'static T {
        let state = with_state!(instance as EnumComboBoxState);
        &T::all()[state.selected]
    }

    pub fn selected_index(instance: &Instance) -> usize {
        with_state!(instance as EnumComboBoxState).selected
    }

    /// Selects `value`. Ignored when the value is not part of the set.
    pub fn select(instance: &mut Instance, value: &T) -> bool {
        let Some(index) = T::all().iter().position(|candidate| candidate == value) else {
            return false;
        };
        with_state!(mut instance as EnumComboBoxState).selected = index;
        true
    }

    /// Selects the option with the given stable id.
    pub fn select_by_id(instance: &mut Instance, id: &str) -> bool {
        let Some(index) = T::all()
            .iter()
            .position(|candidate| candidate.id() == Some(id))
        else {
            return false;
        };
        with_state!(mut instance as EnumComboBoxState).selected = index;
        true
    }

    fn change(
        &self,
        state: &mut EnumComboBoxState,
        shell: &mut Shell<Message>,
        next: usize,
    ) {
        if next == state.selected {
            return;
        }

        state.selected = next;
        if let Some(handler) = self.on_changed.as_ref() {
            shell.publish(handler(&T::all()[next]));
        }
        shell.request_redraw(RedrawRequest::Immediate);
    }
}

impl<T: Choices, Message: 'static> Default for EnumComboBox<T, Message> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Choices, Message: 'static> Widget<Message> for EnumComboBox<T, Message> {
    fn state(&self) -> State {
        Some(Box::new(EnumComboBoxState { selected: 0 }))
    }

    fn update(
        &mut self,
        _tree: &mut OwnedUITree<Message>,
        _key: UIKey,
        instance: &mut Instance,
        shell: &mut Shell<Message>,
        event: &Event,
        phase: EventPhase,
        bounds: Bounds,
    ) {
        if phase != EventPhase::Bubble {
            return;
        }

        let state = with_state!(mut instance as EnumComboBoxState);
        let count = T::all().len();

        match event {
            Event::MouseButtonDown {
                button: MouseButton::Left,
                x,
                y,
                ..
            } => {
                let point = PointDIP { x: *x, y: *y };
                if point.within(bounds.border_box) {
                    // clicking cycles forward, wrapping at the end
                    self.change(state, shell, (state.selected + 1) % count);
                    shell.mark_handled();
                }
            }
            Event::MouseWheel {
                x, y, wheel_delta, ..
            } => {
                let point = PointDIP { x: *x, y: *y };
                if !point.within(bounds.border_box) {
                    return;
                }

                let next = if *wheel_delta > 0.0 {
                    state.selected.saturating_sub(1)
                } else {
                    (state.selected + 1).min(count - 1)
                };
                self.change(state, shell, next);
                shell.mark_handled();
            }
            _ => {}
        }
    }

    fn cursor(&self, _instance: &Instance, point: PointDIP, bounds: Bounds) -> Option<CursorKind> {
        point.within(bounds.border_box).then_some(CursorKind::Arrow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::SizeDIP;
    use crate::layout::model::{Sizing, UIElement};
    use crate::layout::perform_layout;
    use crate::w_id;
    use crate::widgets::{Modifiers, widget};
    use std::sync::mpsc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Fruit {
        Apple,
        Pear,
        Plum,
    }

    impl Choices for Fruit {
        fn all() -> &'static [Self] {
            &[Fruit::Apple, Fruit::Pear, Fruit::Plum]
        }

        fn label(&self) -> &'static str {
            match self {
                Fruit::Apple => "Apple",
                Fruit::Pear => "Pear",
                Fruit::Plum => "Plum",
            }
        }

        fn id(&self) -> Option<&'static str> {
            match self {
                Fruit::Apple => Some("apple"),
                _ => None,
            }
        }
    }

    struct Fixture {
        tree: OwnedUITree<Fruit>,
        shell: Shell<Fruit>,
        id: u64,
        messages: mpsc::Receiver<Fruit>,
    }

    fn fixture() -> Fixture {
        let (sender, messages) = mpsc::channel();
        let mut tree = OwnedUITree::new();
        let id = w_id!();
        tree.insert(
            tree.root,
            UIElement {
                id: Some(id),
                content: widget(EnumComboBox::<Fruit, Fruit>::new().with_changed(|fruit| *fruit)),
                width: Sizing::fixed(80.0),
                height: Sizing::fixed(20.0),
                ..Default::default()
            },
        );
        perform_layout(&mut tree, SizeDIP::new(80.0, 20.0));

        Fixture {
            tree,
            shell: Shell::new(sender),
            id,
            messages,
        }
    }

    #[test]
    fn click_cycles_through_the_options() {
        let mut f = fixture();
        let click = Event::MouseButtonDown {
            button: MouseButton::Left,
            x: 10.0,
            y: 10.0,
            click_count: 1,
            modifiers: Modifiers::default(),
        };

        f.shell.dispatch_event(&mut f.tree, &click);
        assert_eq!(f.messages.try_recv(), Ok(Fruit::Pear));
        f.shell.dispatch_event(&mut f.tree, &click);
        f.shell.dispatch_event(&mut f.tree, &click);
        assert_eq!(
            EnumComboBox::<Fruit, Fruit>::selected(&f.tree.widget_state[&f.id]),
            &Fruit::Apple
        );
    }

    #[test]
    fn wheel_steps_and_clamps_at_the_ends() {
        let mut f = fixture();
        let wheel = |delta: f32| Event::MouseWheel {
            x: 10.0,
            y: 10.0,
            wheel_delta: delta,
            modifiers: Modifiers::default(),
        };

        // already at the first option
        f.shell.dispatch_event(&mut f.tree, &wheel(120.0));
        assert!(f.messages.try_recv().is_err());

        f.shell.dispatch_event(&mut f.tree, &wheel(-120.0));
        assert_eq!(f.messages.try_recv(), Ok(Fruit::Pear));
    }

    #[test]
    fn selection_by_value_and_id() {
        let mut f = fixture();
        let instance = f.tree.widget_state.get_mut(&f.id).unwrap();

        assert!(EnumComboBox::<Fruit, Fruit>::select(instance, &Fruit::Plum));
        assert_eq!(EnumComboBox::<Fruit, Fruit>::selected_index(instance), 2);

        assert!(EnumComboBox::<Fruit, Fruit>::select_by_id(instance, "apple"));
        assert_eq!(EnumComboBox::<Fruit, Fruit>::selected_index(instance), 0);
        assert!(!EnumComboBox::<Fruit, Fruit>::select_by_id(instance, "kiwi"));

        assert_eq!(Fruit::Apple.label(), "Apple");
    }
}
