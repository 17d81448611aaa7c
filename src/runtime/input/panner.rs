//! Key+drag panning.
//!
//! Holding the pan key and the primary button together pans the content 1:1
//! under the pointer. Either release stops the gesture. Unlike the
//! autoscroller there is no timer and no acceleration, just direct deltas.

use crate::gfx::PointDIP;
use crate::layout::model::Axis;
use crate::runtime::cursor::CursorKind;
use crate::runtime::input::ScrollSurface;

#[derive(Debug, Default)]
pub struct Panner {
    key_down: bool,
    mouse_down: bool,
    panning: bool,
    start: PointDIP,
}

impl Panner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// The pan key went down.
    pub fn key_down(&mut self, surface: &mut dyn ScrollSurface) {
        self.key_down = true;
        self.check_pan(surface);
        self.update_cursor(surface);
    }

    /// The pan key went up.
    pub fn key_up(&mut self, surface: &mut dyn ScrollSurface) {
        self.key_down = false;
        self.check_pan(surface);
        self.update_cursor(surface);
    }

    /// The primary button went down at `position`.
    pub fn mouse_down(&mut self, position: PointDIP, surface: &mut dyn ScrollSurface) {
        self.mouse_down = true;
        self.start = position;
        self.check_pan(surface);
    }

    /// The primary button went up.
    pub fn mouse_up(&mut self, surface: &mut dyn ScrollSurface) {
        self.mouse_down = false;
        self.check_pan(surface);
    }

    /// Applies the pointer delta since the last reference point to both
    /// offsets, inverted: dragging content rightwards moves the offset left.
    pub fn track(&mut self, position: PointDIP, surface: &mut dyn ScrollSurface) {
        debug_assert!(self.panning, "panner gesture not active");

        let dx = position.x - self.start.x;
        let dy = position.y - self.start.y;

        if dx != 0.0 {
            surface.scroll_to(Axis::X, surface.offset(Axis::X) - dx);
        }
        if dy != 0.0 {
            surface.scroll_to(Axis::Y, surface.offset(Axis::Y) - dy);
        }

        self.start = position;
    }

    /// Starts or stops panning after any key/button transition. Stopping is
    /// idempotent; a transition that changes nothing does nothing.
    fn check_pan(&mut self, surface: &mut dyn ScrollSurface) {
        if !self.panning {
            if self.key_down && self.mouse_down {
                self.start_pan(surface);
            }
        } else if !self.key_down || !self.mouse_down {
            self.finish_pan(surface);
        }
    }

    fn start_pan(&mut self, surface: &mut dyn ScrollSurface) {
        debug_assert!(!self.panning, "panner gesture already active");

        self.panning = true;
        surface.capture_pointer();
        self.update_cursor(surface);

        log::debug!("panning started at ({}, {})", self.start.x, self.start.y);
    }

    fn finish_pan(&mut self, surface: &mut dyn ScrollSurface) {
        debug_assert!(self.panning, "panner gesture not active");

        self.key_down = false;
        self.mouse_down = false;
        self.panning = false;
        surface.release_pointer();
        self.update_cursor(surface);

        log::debug!("panning finished");
    }

    fn update_cursor(&self, surface: &mut dyn ScrollSurface) {
        if self.panning {
            surface.set_cursor(CursorKind::HandClosed);
        } else if self.key_down {
            surface.set_cursor(CursorKind::HandOpen);
        } else {
            surface.restore_cursor();
        }
    }
}
