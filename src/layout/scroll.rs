use crate::gfx::SizeDIP;
use crate::layout::model::Axis;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScrollPosition {
    pub x: f32,
    pub y: f32,
}

/// Scroll offsets for one scrollable container, together with the content
/// extent and viewport size that bound them. Offsets set through this type
/// always land in `[0, extent - viewport]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScrollModel {
    position: ScrollPosition,
    extent: SizeDIP,
    viewport: SizeDIP,
}

impl ScrollModel {
    pub fn position(&self) -> ScrollPosition {
        self.position
    }

    pub fn offset(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.position.x,
            Axis::Y => self.position.y,
        }
    }

    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.extent.width,
            Axis::Y => self.extent.height,
        }
    }

    pub fn viewport(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.viewport.width,
            Axis::Y => self.viewport.height,
        }
    }

    pub fn max_scroll(&self, axis: Axis) -> f32 {
        (self.extent(axis) - self.viewport(axis)).max(0.0)
    }

    pub fn scroll_to(&mut self, axis: Axis, offset: f32) {
        let clamped = offset.clamp(0.0, self.max_scroll(axis));
        match axis {
            Axis::X => self.position.x = clamped,
            Axis::Y => self.position.y = clamped,
        }
    }

    pub fn scroll_by(&mut self, axis: Axis, delta: f32) {
        self.scroll_to(axis, self.offset(axis) + delta);
    }

    /// Updates the content extent and viewport after a layout pass and
    /// re-clamps the offsets against the new bounds.
    pub fn set_extents(&mut self, extent: SizeDIP, viewport: SizeDIP) {
        self.extent = extent;
        self.viewport = viewport;
        self.scroll_to(Axis::X, self.position.x);
        self.scroll_to(Axis::Y, self.position.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ScrollModel {
        let mut model = ScrollModel::default();
        model.set_extents(SizeDIP::new(500.0, 400.0), SizeDIP::new(100.0, 100.0));
        model
    }

    #[test]
    fn offsets_clamp_to_extent_minus_viewport() {
        let mut model = model();
        model.scroll_to(Axis::X, 1000.0);
        assert_eq!(model.offset(Axis::X), 400.0);
        model.scroll_to(Axis::Y, -5.0);
        assert_eq!(model.offset(Axis::Y), 0.0);
    }

    #[test]
    fn shrinking_content_reclamps_offsets() {
        let mut model = model();
        model.scroll_to(Axis::Y, 300.0);
        model.set_extents(SizeDIP::new(500.0, 150.0), SizeDIP::new(100.0, 100.0));
        assert_eq!(model.offset(Axis::Y), 50.0);
    }

    #[test]
    fn content_smaller_than_viewport_pins_offset_at_zero() {
        let mut model = ScrollModel::default();
        model.set_extents(SizeDIP::new(50.0, 50.0), SizeDIP::new(100.0, 100.0));
        model.scroll_by(Axis::X, 25.0);
        assert_eq!(model.offset(Axis::X), 0.0);
        assert_eq!(model.max_scroll(Axis::X), 0.0);
    }
}
