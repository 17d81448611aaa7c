pub mod panner;
pub mod scroller;
pub mod wheel;

use crate::gfx::PointDIP;
use crate::layout::model::Axis;
use crate::runtime::cursor::CursorKind;

/// What a scrollable container offers to its gesture state machines: clamped
/// offset manipulation, cursor and capture control, and layout bookkeeping.
///
/// Offsets written through `scroll_to` are clamped by the scroll model; the
/// state machines never bypass that clamp.
pub trait ScrollSurface {
    fn offset(&self, axis: Axis) -> f32;
    fn extent(&self, axis: Axis) -> f32;
    fn viewport(&self, axis: Axis) -> f32;
    fn scroll_to(&mut self, axis: Axis, offset: f32);

    fn set_cursor(&mut self, cursor: CursorKind);
    fn restore_cursor(&mut self);

    fn capture_pointer(&mut self);
    fn release_pointer(&mut self);

    fn show_indicator(&mut self, origin: PointDIP);
    fn hide_indicator(&mut self);

    /// Asks the container to re-validate its layout.
    fn request_arrange(&mut self);

    fn can_scroll_up(&self) -> bool {
        self.offset(Axis::Y) > 0.0
    }

    fn can_scroll_down(&self) -> bool {
        self.offset(Axis::Y) < self.extent(Axis::Y) - self.viewport(Axis::Y)
    }

    fn can_scroll_left(&self) -> bool {
        self.offset(Axis::X) > 0.0
    }

    fn can_scroll_right(&self) -> bool {
        self.offset(Axis::X) < self.extent(Axis::X) - self.viewport(Axis::X)
    }
}
