//! Geometry, sizing, and element types for the UI tree.

use crate::widgets::Widget;

// ---------- Basic types ----------

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxAmount {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl BoxAmount {
    pub fn all(amount: f32) -> Self {
        Self {
            top: amount,
            right: amount,
            bottom: amount,
            left: amount,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    TopToBottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

// ---------- Sizing ----------

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sizing {
    /// Fixed pixel size.
    Fixed { px: f32 },
    /// Grow to the available space, between [min, max].
    Grow { min: f32, max: f32 },
    /// Fit content between [min, max].
    Fit { min: f32, max: f32 },
    /// Percentage of the available space (0..=1).
    Percent { percent: f32 },
}

impl Sizing {
    pub fn fit() -> Self {
        Sizing::Fit {
            min: 0.0,
            max: f32::INFINITY,
        }
    }

    pub fn grow() -> Self {
        Sizing::Grow {
            min: 0.0,
            max: f32::INFINITY,
        }
    }

    pub fn fixed(px: f32) -> Self {
        Sizing::Fixed { px }
    }

    pub fn percent(percent: f32) -> Self {
        Sizing::Percent { percent }
    }

    /// Resolves the final size from the measured content size and the space
    /// offered by the parent.
    pub fn resolve(&self, content: f32, available: f32) -> f32 {
        match *self {
            Sizing::Fixed { px } => px,
            Sizing::Percent { percent } => {
                if available.is_finite() {
                    available * percent
                } else {
                    content
                }
            }
            Sizing::Fit { min, max } => content.clamp(min, max),
            Sizing::Grow { min, max } => {
                if available.is_finite() {
                    available.clamp(min, max)
                } else {
                    content.clamp(min, max)
                }
            }
        }
    }
}

impl Default for Sizing {
    fn default() -> Self {
        Sizing::fit()
    }
}

// ---------- Element tree ----------

pub type UIKey = slotmap::DefaultKey;

pub type WidgetContent<Message> = Box<dyn Widget<Message>>;

pub struct UIElement<Message> {
    pub parent: Option<UIKey>,
    pub children: Vec<UIKey>,

    pub content: Option<WidgetContent<Message>>,

    pub direction: Direction,
    pub width: Sizing,
    pub height: Sizing,
    pub child_gap: f32,
    pub padding: BoxAmount,

    pub id: Option<u64>,

    pub desired_width: f32,
    pub desired_height: f32,
    pub computed_width: f32,
    pub computed_height: f32,
    pub x: f32,
    pub y: f32,
}

impl<Message> Default for UIElement<Message> {
    fn default() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            content: None,
            direction: Direction::LeftToRight,
            width: Sizing::default(),
            height: Sizing::default(),
            child_gap: 0.0,
            padding: BoxAmount::default(),
            id: None,
            desired_width: 0.0,
            desired_height: 0.0,
            computed_width: 0.0,
            computed_height: 0.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl<Message> std::fmt::Debug for UIElement<Message> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UIElement")
            .field("id", &self.id)
            .field("children", &self.children.len())
            .field("x", &self.x)
            .field("y", &self.y)
            .field("computed_width", &self.computed_width)
            .field("computed_height", &self.computed_height)
            .finish()
    }
}

impl<Message> UIElement<Message> {
    pub fn desired_size(&self) -> crate::gfx::SizeDIP {
        crate::gfx::SizeDIP {
            width: self.desired_width,
            height: self.desired_height,
        }
    }
}
