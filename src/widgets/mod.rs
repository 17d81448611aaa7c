use std::any::Any;
use std::time::Instant;

use smol_str::SmolStr;

use crate::Shell;
use crate::gfx::{PointDIP, RectDIP, SizeDIP};
use crate::layout::model::{UIElement, UIKey, WidgetContent};
use crate::layout::{self, OwnedUITree};
use crate::runtime::cursor::CursorKind;

pub mod button;
pub mod enum_combo;
pub mod flow_panel;
pub mod numeric_input;
pub mod scroll_view;
pub mod sortable_panel;
pub mod zoombox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// The keys the stock widgets bind. The embedder maps platform key codes
/// onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Left,
    Right,
    Up,
    Down,
    Plus,
    Minus,
    Back,
}

#[derive(Debug, Clone)]
pub enum Event {
    MouseButtonDown {
        button: MouseButton,
        x: f32,
        y: f32,
        click_count: u32,
        modifiers: Modifiers,
    },
    MouseButtonUp {
        button: MouseButton,
        x: f32,
        y: f32,
        click_count: u32,
        modifiers: Modifiers,
    },
    MouseMove {
        x: f32,
        y: f32,
    },
    /// Synthesized by the shell for elements the pointer has moved off of.
    MouseLeave {
        x: f32,
        y: f32,
    },
    MouseWheel {
        x: f32,
        y: f32,
        wheel_delta: f32,
        modifiers: Modifiers,
    },
    /// Horizontal wheel tilt.
    MouseWheelH {
        x: f32,
        y: f32,
        wheel_delta: f32,
        modifiers: Modifiers,
    },
    KeyDown {
        key: Key,
        modifiers: Modifiers,
    },
    KeyUp {
        key: Key,
        modifiers: Modifiers,
    },
    Char {
        text: SmolStr,
    },
    /// Autoscroll timer tick, marshaled from the tick channel.
    Tick,
    /// Frame pulse for animations.
    Redraw {
        now: Instant,
    },
}

impl Event {
    pub fn position(&self) -> Option<PointDIP> {
        match self {
            Event::MouseButtonDown { x, y, .. }
            | Event::MouseButtonUp { x, y, .. }
            | Event::MouseMove { x, y }
            | Event::MouseWheel { x, y, .. }
            | Event::MouseWheelH { x, y, .. } => Some(PointDIP { x: *x, y: *y }),
            _ => None,
        }
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(
            self,
            Event::KeyDown { .. } | Event::KeyUp { .. } | Event::Char { .. }
        )
    }
}

/// Dispatch phase for routed events: a tunnel pass from the root down to the
/// hit target, then a bubble pass back up unless the tunnel pass handled the
/// event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    Tunnel,
    Bubble,
}

pub type State = Option<Box<dyn Any>>;

#[macro_export]
macro_rules! with_state {
    ($instance:ident as $state:ty) => {
        $instance
            .state
            .as_ref()
            .unwrap()
            .downcast_ref::<$state>()
            .unwrap()
    };

    (mut $instance:ident as $state:ty) => {
        $instance
            .state
            .as_mut()
            .unwrap()
            .downcast_mut::<$state>()
            .unwrap()
    };
}

pub struct Instance {
    id: u64,
    pub state: State,
}

impl Instance {
    pub fn new(id: u64, state: State) -> Self {
        Self { id, state }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

pub struct Bounds {
    pub content_box: RectDIP,
    pub border_box: RectDIP,
}

#[allow(unused)]
pub trait Widget<Message>: std::fmt::Debug {
    fn state(&self) -> State {
        None
    }

    /// Reports the desired content size within `available`. Widgets that
    /// lay out children measure them through the tree here.
    fn measure(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        instance: &mut Instance,
        available: SizeDIP,
    ) -> SizeDIP {
        layout::measure_children_stacked(tree, key, available)
    }

    /// Positions children within the final border rect.
    fn arrange(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        instance: &mut Instance,
        rect: RectDIP,
    ) {
        layout::arrange_children_stacked(tree, key, rect);
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
    }

    fn cursor(&self, instance: &Instance, point: PointDIP, bounds: Bounds) -> Option<CursorKind> {
        None
    }
}

pub fn widget<Message>(widget: impl Widget<Message> + 'static) -> Option<WidgetContent<Message>> {
    Some(Box::new(widget))
}

impl<Message> UIElement<Message> {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            content_box: RectDIP {
                x: self.x + self.padding.left,
                y: self.y + self.padding.top,
                width: self.computed_width - self.padding.left - self.padding.right,
                height: self.computed_height - self.padding.top - self.padding.bottom,
            },
            border_box: RectDIP {
                x: self.x,
                y: self.y,
                width: self.computed_width,
                height: self.computed_height,
            },
        }
    }
}
