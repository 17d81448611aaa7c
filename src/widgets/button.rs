//! A push button wired to a command: the click handler only fires while the
//! command reports itself executable.

use crate::gfx::PointDIP;
use crate::layout::OwnedUITree;
use crate::layout::model::UIKey;
use crate::runtime::cursor::CursorKind;
use crate::widgets::{Bounds, Event, EventPhase, Instance, MouseButton, State, Widget};
use crate::{RedrawRequest, Shell, with_state};

/// Button states for visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Normal,
    Hover,
    Pressed,
    Disabled,
}

pub type OnClickFn<Message> = dyn Fn(&mut Shell<Message>);
pub type CanExecuteFn = dyn Fn() -> bool;

pub struct CommandButton<Message> {
    pub enabled: bool,
    on_click: Option<Box<OnClickFn<Message>>>,
    can_execute: Option<Box<CanExecuteFn>>,
}

impl<Message> std::fmt::Debug for CommandButton<Message> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandButton")
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl<Message: 'static> CommandButton<Message> {
    pub fn new() -> Self {
        Self {
            enabled: true,
            on_click: None,
            can_execute: None,
        }
    }

    pub fn with_click_handler(mut self, handler: impl Fn(&mut Shell<Message>) + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    /// Gates the click handler behind a command-style predicate, re-queried
    /// on every event.
    pub fn with_can_execute(mut self, can_execute: impl Fn() -> bool + 'static) -> Self {
        self.can_execute = Some(Box::new(can_execute));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn visual_state(instance: &Instance) -> ButtonState {
        with_state!(instance as ButtonWidgetState).state
    }

    fn effective_enabled(&self) -> bool {
        self.enabled
            && self
                .can_execute
                .as_ref()
                .map(|can_execute| can_execute())
                .unwrap_or(true)
    }
}

impl<Message: 'static> Default for CommandButton<Message> {
    fn default() -> Self {
        Self::new()
    }
}

struct ButtonWidgetState {
    state: ButtonState,
    is_mouse_down: bool,
    is_mouse_over: bool,
}

impl ButtonWidgetState {
    fn new() -> Self {
        Self {
            state: ButtonState::Normal,
            is_mouse_down: false,
            is_mouse_over: false,
        }
    }

    fn update_state(&mut self, enabled: bool) {
        self.state = if !enabled {
            ButtonState::Disabled
        } else if self.is_mouse_down && self.is_mouse_over {
            ButtonState::Pressed
        } else if self.is_mouse_over {
            ButtonState::Hover
        } else {
            ButtonState::Normal
        };
    }
}

impl<Message: 'static> Widget<Message> for CommandButton<Message> {
    fn state(&self) -> State {
        Some(Box::new(ButtonWidgetState::new()))
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
        let enabled = self.effective_enabled();
        let state = with_state!(mut instance as ButtonWidgetState);

        match event {
            Event::MouseButtonDown {
                button: MouseButton::Left,
                x,
                y,
                ..
            } => {
                let point = PointDIP { x: *x, y: *y };
                if point.within(bounds.border_box) && enabled {
                    state.is_mouse_down = true;
                    state.is_mouse_over = true;
                    state.update_state(enabled);
                    // hold capture so the release finds us even off-bounds
                    shell.capture_pointer(id);
                    shell.request_redraw(RedrawRequest::Immediate);
                }
            }
            Event::MouseButtonUp {
                button: MouseButton::Left,
                x,
                y,
                ..
            } => {
                let point = PointDIP { x: *x, y: *y };
                let was_pressed = state.is_mouse_down && state.is_mouse_over;

                state.is_mouse_down = false;
                state.is_mouse_over = point.within(bounds.border_box);
                state.update_state(enabled);
                shell.release_pointer(id);

                if was_pressed && point.within(bounds.border_box) && enabled {
                    if let Some(handler) = self.on_click.as_ref() {
                        handler(shell);
                    }
                }

                shell.request_redraw(RedrawRequest::Immediate);
            }
            Event::MouseMove { x, y } => {
                let point = PointDIP { x: *x, y: *y };
                let was_over = state.is_mouse_over;
                state.is_mouse_over = point.within(bounds.border_box);

                if was_over != state.is_mouse_over {
                    state.update_state(enabled);
                    shell.request_redraw(RedrawRequest::Immediate);
                }
            }
            Event::MouseLeave { .. } => {
                if state.is_mouse_over {
                    state.is_mouse_over = false;
                    state.update_state(enabled);
                    shell.request_redraw(RedrawRequest::Immediate);
                }
            }
            _ => {}
        }
    }

    fn cursor(&self, _instance: &Instance, point: PointDIP, bounds: Bounds) -> Option<CursorKind> {
        if point.within(bounds.border_box) && self.effective_enabled() {
            Some(CursorKind::Arrow)
        } else {
            None
        }
    }
}
