//! Numeric text entry. Characters that would make the buffer non-numeric
//! are rejected at the input stage, and committed values clamp into an
//! optional minimum/maximum range.

use crate::gfx::PointDIP;
use crate::layout::OwnedUITree;
use crate::layout::model::UIKey;
use crate::property::Property;
use crate::runtime::cursor::CursorKind;
use crate::widgets::{Bounds, Event, EventPhase, Instance, Key, MouseButton, State, Widget};
use crate::{RedrawRequest, Shell, with_state};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskType {
    /// No masking at all.
    Any,
    #[default]
    Integer,
    Decimal,
}

pub type OnValueChangedFn<Message> = dyn Fn(f64) -> Message;

pub struct NumericInput<Message> {
    pub mask: MaskType,
    on_value_changed: Option<Box<OnValueChangedFn<Message>>>,
}

impl<Message> std::fmt::Debug for NumericInput<Message> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumericInput")
            .field("mask", &self.mask)
            .finish()
    }
}

struct NumericInputState {
    text: String,
    value: Property<f64>,
    minimum: Option<f64>,
    maximum: Option<f64>,
}

fn finite_f64(value: &f64) -> bool {
    value.is_finite()
}

/// Whether `symbol` may be appended to `text` under `mask`.
fn is_symbol_valid(mask: MaskType, symbol: char, text: &str, minimum: Option<f64>) -> bool {
    match mask {
        MaskType::Any => true,
        MaskType::Integer | MaskType::Decimal => {
            if symbol == '-' {
                // a sign only makes sense up front, and only when the range
                // admits negative values
                return text.is_empty() && minimum.is_none_or(|minimum| minimum < 0.0);
            }
            if symbol == '.' {
                return mask == MaskType::Decimal && !text.contains('.');
            }
            symbol.is_ascii_digit()
        }
    }
}

fn clamp(value: f64, minimum: Option<f64>, maximum: Option<f64>) -> f64 {
    let mut value = value;
    if let Some(minimum) = minimum {
        value = value.max(minimum);
    }
    if let Some(maximum) = maximum {
        value = value.min(maximum);
    }
    value
}

impl<Message: 'static> NumericInput<Message> {
    pub fn new(mask: MaskType) -> Self {
        Self {
            mask,
            on_value_changed: None,
        }
    }

    pub fn with_value_changed(mut self, handler: impl Fn(f64) -> Message + 'static) -> Self {
        self.on_value_changed = Some(Box::new(handler));
        self
    }

    pub fn text(instance: &Instance) -> &str {
        &with_state!(instance as NumericInputState).text
    }

    pub fn value(instance: &Instance) -> f64 {
        with_state!(instance as NumericInputState).value.value()
    }

    /// Restricts the low end of the range and re-validates the current
    /// value against it.
    pub fn set_minimum(instance: &mut Instance, minimum: Option<f64>) {
        let state = with_state!(mut instance as NumericInputState);
        state.minimum = minimum;
        revalidate(state);
    }

    /// Restricts the high end of the range and re-validates the current
    /// value against it.
    pub fn set_maximum(instance: &mut Instance, maximum: Option<f64>) {
        let state = with_state!(mut instance as NumericInputState);
        state.maximum = maximum;
        revalidate(state);
    }

    fn commit(&self, state: &mut NumericInputState, shell: &mut Shell<Message>) {
        let Ok(parsed) = state.text.parse::<f64>() else {
            // partial input like "" or "-" keeps the last committed value
            return;
        };

        let clamped = clamp(parsed, state.minimum, state.maximum);
        if clamped != parsed {
            state.text = clamped.to_string();
        }

        if state.value.set(clamped).unwrap_or(false) {
            if let Some(handler) = self.on_value_changed.as_ref() {
                shell.publish(handler(clamped));
            }
        }
    }

    fn step(&self, state: &mut NumericInputState, shell: &mut Shell<Message>, delta: f64) {
        let stepped = clamp(state.value.value() + delta, state.minimum, state.maximum);
        state.text = stepped.to_string();
        if state.value.set(stepped).unwrap_or(false) {
            if let Some(handler) = self.on_value_changed.as_ref() {
                shell.publish(handler(stepped));
            }
        }
    }
}

/// Pulls the committed value back into the current range, rewriting the
/// text to match.
fn revalidate(state: &mut NumericInputState) {
    let clamped = clamp(state.value.value(), state.minimum, state.maximum);
    if state.value.set(clamped).unwrap_or(false) {
        state.text = clamped.to_string();
    }
}

impl<Message: 'static> Widget<Message> for NumericInput<Message> {
    fn state(&self) -> State {
        Some(Box::new(NumericInputState {
            text: String::new(),
            value: Property::new("value", 0.0).with_validator(finite_f64),
            minimum: None,
            maximum: None,
        }))
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

        let id = instance.id();
        let state = with_state!(mut instance as NumericInputState);

        match event {
            Event::MouseButtonDown {
                button: MouseButton::Left,
                x,
                y,
                ..
            } => {
                let point = PointDIP { x: *x, y: *y };
                if point.within(bounds.border_box) {
                    shell.set_focus(id);
                    shell.mark_handled();
                }
            }
            Event::Char { text } => {
                if shell.focus() != Some(id) {
                    return;
                }

                let mut accepted = false;
                for symbol in text.chars() {
                    if is_symbol_valid(self.mask, symbol, &state.text, state.minimum) {
                        state.text.push(symbol);
                        accepted = true;
                    }
                }

                if accepted {
                    self.commit(state, shell);
                    shell.request_redraw(RedrawRequest::Immediate);
                }
            }
            Event::KeyDown { key, .. } => {
                if shell.focus() != Some(id) {
                    return;
                }

                match key {
                    Key::Back => {
                        if state.text.pop().is_some() {
                            self.commit(state, shell);
                            shell.request_redraw(RedrawRequest::Immediate);
                        }
                    }
                    Key::Up => self.step(state, shell, 1.0),
                    Key::Down => self.step(state, shell, -1.0),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn cursor(&self, _instance: &Instance, point: PointDIP, bounds: Bounds) -> Option<CursorKind> {
        point.within(bounds.border_box).then_some(CursorKind::IBeam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::SizeDIP;
    use crate::layout::model::{Sizing, UIElement};
    use crate::layout::perform_layout;
    use crate::w_id;
    use crate::widgets::widget;
    use smol_str::SmolStr;
    use std::sync::mpsc;

    struct Fixture {
        tree: OwnedUITree<f64>,
        shell: Shell<f64>,
        id: u64,
        messages: mpsc::Receiver<f64>,
    }

    fn fixture(mask: MaskType) -> Fixture {
        let (sender, messages) = mpsc::channel();
        let mut tree = OwnedUITree::new();
        let id = w_id!();
        tree.insert(
            tree.root,
            UIElement {
                id: Some(id),
                content: widget(NumericInput::new(mask).with_value_changed(|value| value)),
                width: Sizing::fixed(120.0),
                height: Sizing::fixed(20.0),
                ..Default::default()
            },
        );
        perform_layout(&mut tree, SizeDIP::new(120.0, 20.0));

        let mut shell = Shell::new(sender);
        shell.set_focus(id);

        Fixture {
            tree,
            shell,
            id,
            messages,
        }
    }

    fn type_text(f: &mut Fixture, text: &str) {
        f.shell.dispatch_event(
            &mut f.tree,
            &Event::Char {
                text: SmolStr::new(text),
            },
        );
    }

    #[test]
    fn integer_mask_rejects_non_digits() {
        let mut f = fixture(MaskType::Integer);
        type_text(&mut f, "1a2.3");

        let instance = &f.tree.widget_state[&f.id];
        assert_eq!(NumericInput::<f64>::text(instance), "123");
        assert_eq!(NumericInput::<f64>::value(instance), 123.0);
    }

    #[test]
    fn decimal_mask_allows_a_single_separator() {
        let mut f = fixture(MaskType::Decimal);
        type_text(&mut f, "3.1.4");

        let instance = &f.tree.widget_state[&f.id];
        assert_eq!(NumericInput::<f64>::text(instance), "3.14");
    }

    #[test]
    fn sign_requires_a_negative_range_and_leading_position() {
        let mut f = fixture(MaskType::Integer);
        // default range is unbounded, so a leading sign is fine
        type_text(&mut f, "-5");
        assert_eq!(NumericInput::<f64>::value(&f.tree.widget_state[&f.id]), -5.0);

        let mut g = fixture(MaskType::Integer);
        NumericInput::<f64>::set_minimum(g.tree.widget_state.get_mut(&g.id).unwrap(), Some(0.0));
        type_text(&mut g, "-5");
        assert_eq!(NumericInput::<f64>::text(&g.tree.widget_state[&g.id]), "5");
    }

    #[test]
    fn committed_values_clamp_into_the_range() {
        let mut f = fixture(MaskType::Integer);
        NumericInput::<f64>::set_maximum(f.tree.widget_state.get_mut(&f.id).unwrap(), Some(100.0));

        type_text(&mut f, "250");

        let instance = &f.tree.widget_state[&f.id];
        assert_eq!(NumericInput::<f64>::value(instance), 100.0);
        assert_eq!(NumericInput::<f64>::text(instance), "100");
    }

    #[test]
    fn arrow_keys_step_the_value() {
        let mut f = fixture(MaskType::Integer);
        type_text(&mut f, "41");
        // drain the commit notification
        let _ = f.messages.try_recv();

        f.shell.dispatch_event(
            &mut f.tree,
            &Event::KeyDown {
                key: Key::Up,
                modifiers: Default::default(),
            },
        );

        let instance = &f.tree.widget_state[&f.id];
        assert_eq!(NumericInput::<f64>::value(instance), 42.0);
        assert_eq!(f.messages.try_recv(), Ok(42.0));
    }

    #[test]
    fn backspace_edits_and_recommits() {
        let mut f = fixture(MaskType::Integer);
        type_text(&mut f, "78");

        f.shell.dispatch_event(
            &mut f.tree,
            &Event::KeyDown {
                key: Key::Back,
                modifiers: Default::default(),
            },
        );

        let instance = &f.tree.widget_state[&f.id];
        assert_eq!(NumericInput::<f64>::text(instance), "7");
        assert_eq!(NumericInput::<f64>::value(instance), 7.0);
    }

    #[test]
    fn unfocused_input_ignores_characters() {
        let mut f = fixture(MaskType::Integer);
        f.shell.clear_focus();
        type_text(&mut f, "9");

        assert_eq!(NumericInput::<f64>::text(&f.tree.widget_state[&f.id]), "");
    }
}
