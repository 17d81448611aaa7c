//! Cursor-driven autoscroll.
//!
//! A middle-click captures the gesture origin and a fixed dead-zone square
//! around it. While the gesture is active a millisecond tick classifies the
//! latest pointer position into one of nine zones and advances the scroll
//! offsets in the implied direction(s), with a cubic distance function so
//! small overshoots crawl and large ones fly.

use std::time::Duration;

use crate::gfx::PointDIP;
use crate::layout::model::Axis;
use crate::runtime::cursor::{self, CursorKind};
use crate::runtime::input::ScrollSurface;
use crate::runtime::ticker::{TickSender, Ticker};

/// Half-width of the dead-zone square around the gesture origin.
pub const DEAD_ZONE_HALF_WIDTH: f32 = 10.0;

const DISTANCE_OFFSET: f32 = DEAD_ZONE_HALF_WIDTH - 1.0;
const DISTANCE_GAIN: f32 = 0.00001;

const TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Pointer position relative to the dead zone, row by vertical side and
/// column by horizontal side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollZone {
    TopLeft,
    Top,
    TopRight,
    Left,
    None,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

const ZONE_MATRIX: [[ScrollZone; 3]; 3] = [
    [ScrollZone::TopLeft, ScrollZone::Top, ScrollZone::TopRight],
    [ScrollZone::Left, ScrollZone::None, ScrollZone::Right],
    [
        ScrollZone::BottomLeft,
        ScrollZone::Bottom,
        ScrollZone::BottomRight,
    ],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vertical {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Horizontal {
    Left,
    Right,
}

impl ScrollZone {
    /// Classifies `position` against the dead-zone square centered on
    /// `origin`.
    pub fn classify(origin: PointDIP, position: PointDIP) -> ScrollZone {
        let row = if position.y < origin.y - DEAD_ZONE_HALF_WIDTH {
            0
        } else if position.y > origin.y + DEAD_ZONE_HALF_WIDTH {
            2
        } else {
            1
        };

        let column = if position.x < origin.x - DEAD_ZONE_HALF_WIDTH {
            0
        } else if position.x > origin.x + DEAD_ZONE_HALF_WIDTH {
            2
        } else {
            1
        };

        ZONE_MATRIX[row][column]
    }

    fn directions(self) -> (Option<Vertical>, Option<Horizontal>) {
        match self {
            ScrollZone::TopLeft => (Some(Vertical::Up), Some(Horizontal::Left)),
            ScrollZone::Top => (Some(Vertical::Up), None),
            ScrollZone::TopRight => (Some(Vertical::Up), Some(Horizontal::Right)),
            ScrollZone::Left => (None, Some(Horizontal::Left)),
            ScrollZone::None => (None, None),
            ScrollZone::Right => (None, Some(Horizontal::Right)),
            ScrollZone::BottomLeft => (Some(Vertical::Down), Some(Horizontal::Left)),
            ScrollZone::Bottom => (Some(Vertical::Down), None),
            ScrollZone::BottomRight => (Some(Vertical::Down), Some(Horizontal::Right)),
        }
    }

    fn from_directions(vertical: Option<Vertical>, horizontal: Option<Horizontal>) -> ScrollZone {
        match (vertical, horizontal) {
            (Some(Vertical::Up), Some(Horizontal::Left)) => ScrollZone::TopLeft,
            (Some(Vertical::Up), None) => ScrollZone::Top,
            (Some(Vertical::Up), Some(Horizontal::Right)) => ScrollZone::TopRight,
            (None, Some(Horizontal::Left)) => ScrollZone::Left,
            (None, None) => ScrollZone::None,
            (None, Some(Horizontal::Right)) => ScrollZone::Right,
            (Some(Vertical::Down), Some(Horizontal::Left)) => ScrollZone::BottomLeft,
            (Some(Vertical::Down), None) => ScrollZone::Bottom,
            (Some(Vertical::Down), Some(Horizontal::Right)) => ScrollZone::BottomRight,
        }
    }
}

/// Per-tick scroll distance for a pointer `delta` past the gesture origin.
/// Cubic on purpose: near-zero just outside the dead zone, fast far away.
pub fn scroll_distance(delta: f32) -> f32 {
    let delta = delta + 1.0 - DISTANCE_OFFSET;
    DISTANCE_GAIN * (delta * delta * delta)
}

pub struct Scroller {
    scrolling: bool,
    origin: PointDIP,
    position: PointDIP,
    ticker: Ticker,
}

impl std::fmt::Debug for Scroller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scroller")
            .field("scrolling", &self.scrolling)
            .field("origin", &self.origin)
            .finish()
    }
}

impl Default for Scroller {
    fn default() -> Self {
        Self::new()
    }
}

impl Scroller {
    pub fn new() -> Self {
        Self {
            scrolling: false,
            origin: PointDIP::default(),
            position: PointDIP::default(),
            ticker: Ticker::new(TICK_INTERVAL),
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// The gesture origin. Meaningful while scrolling.
    pub fn start_position(&self) -> PointDIP {
        self.origin
    }

    /// Begins a gesture at `start`. Ticks for `id` are posted into `ticks`
    /// until the gesture finishes.
    pub fn start(
        &mut self,
        start: PointDIP,
        id: u64,
        ticks: TickSender,
        surface: &mut dyn ScrollSurface,
    ) {
        debug_assert!(!self.scrolling, "scroller gesture already active");

        self.origin = start;
        self.position = start;
        self.scrolling = true;

        surface.set_cursor(CursorKind::ScrollAll);
        surface.show_indicator(start);
        self.ticker.start(id, ticks);

        log::debug!("cursor scroll started at ({}, {})", start.x, start.y);
    }

    /// Records the latest pointer position. The next tick picks it up; the
    /// offset does not move here, which keeps high-frequency pointer moves
    /// from outrunning the fixed tick cadence.
    pub fn track(&mut self, position: PointDIP) {
        debug_assert!(self.scrolling, "scroller gesture not active");
        self.position = position;
    }

    /// Ends the gesture: stops the tick task, restores the cursor, hides the
    /// start indicator, and asks for a layout re-validation.
    pub fn finish(&mut self, surface: &mut dyn ScrollSurface) {
        debug_assert!(self.scrolling, "scroller gesture not active");

        self.scrolling = false;
        self.ticker.stop();
        surface.restore_cursor();
        surface.hide_indicator();
        surface.request_arrange();

        log::debug!("cursor scroll finished");
    }

    /// One tick: re-classifies the pointer against the dead zone around the
    /// gesture origin and advances whatever implied directions the surface
    /// can still move in. Ticks that arrive after the gesture ended are
    /// no-ops.
    pub fn tick(&mut self, surface: &mut dyn ScrollSurface) {
        if !self.scrolling {
            return;
        }

        let zone = ScrollZone::classify(self.origin, self.position);
        if zone == ScrollZone::None {
            surface.set_cursor(CursorKind::ScrollAll);
            return;
        }

        let (vertical, horizontal) = zone.directions();
        let vertical = vertical.filter(|direction| match direction {
            Vertical::Up => surface.can_scroll_up(),
            Vertical::Down => surface.can_scroll_down(),
        });
        let horizontal = horizontal.filter(|direction| match direction {
            Horizontal::Left => surface.can_scroll_left(),
            Horizontal::Right => surface.can_scroll_right(),
        });

        // Every implied axis blocked: keep the gesture alive but show the
        // neutral glyph so the user can tell the edge has been reached.
        if vertical.is_none() && horizontal.is_none() {
            surface.set_cursor(CursorKind::ScrollAll);
            return;
        }

        surface.set_cursor(cursor::scroll_glyph(ScrollZone::from_directions(
            vertical, horizontal,
        )));

        match vertical {
            Some(Vertical::Up) => surface.scroll_to(
                Axis::Y,
                surface.offset(Axis::Y) - scroll_distance(self.origin.y - self.position.y),
            ),
            Some(Vertical::Down) => surface.scroll_to(
                Axis::Y,
                surface.offset(Axis::Y) + scroll_distance(self.position.y - self.origin.y),
            ),
            None => {}
        }

        match horizontal {
            Some(Horizontal::Left) => surface.scroll_to(
                Axis::X,
                surface.offset(Axis::X) - scroll_distance(self.origin.x - self.position.x),
            ),
            Some(Horizontal::Right) => surface.scroll_to(
                Axis::X,
                surface.offset(Axis::X) + scroll_distance(self.position.x - self.origin.x),
            ),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::SizeDIP;
    use crate::layout::model::Axis;
    use crate::runtime::input::test_surface::TestSurface;
    use futures::channel::mpsc;

    fn point(x: f32, y: f32) -> PointDIP {
        PointDIP { x, y }
    }

    fn surface_mid_scroll() -> TestSurface {
        let mut surface = TestSurface::default();
        surface
            .scroll
            .set_extents(SizeDIP::new(1000.0, 1000.0), SizeDIP::new(100.0, 100.0));
        surface.scroll.scroll_to(Axis::X, 200.0);
        surface.scroll.scroll_to(Axis::Y, 200.0);
        surface
    }

    fn started_scroller(surface: &mut TestSurface, origin: PointDIP) -> Scroller {
        let (ticks, _rx) = mpsc::unbounded();
        let mut scroller = Scroller::new();
        scroller.start(origin, 1, ticks, surface);
        scroller
    }

    #[test]
    fn zone_classification_covers_all_nine_regions() {
        let origin = point(100.0, 100.0);
        let classify = |x, y| ScrollZone::classify(origin, point(x, y));

        // strictly inside the square
        assert_eq!(classify(100.0, 100.0), ScrollZone::None);
        assert_eq!(classify(109.0, 91.0), ScrollZone::None);

        assert_eq!(classify(100.0, 80.0), ScrollZone::Top);
        assert_eq!(classify(100.0, 120.0), ScrollZone::Bottom);
        assert_eq!(classify(80.0, 100.0), ScrollZone::Left);
        assert_eq!(classify(120.0, 100.0), ScrollZone::Right);
        assert_eq!(classify(80.0, 80.0), ScrollZone::TopLeft);
        assert_eq!(classify(120.0, 80.0), ScrollZone::TopRight);
        assert_eq!(classify(80.0, 120.0), ScrollZone::BottomLeft);
        assert_eq!(classify(120.0, 120.0), ScrollZone::BottomRight);
    }

    #[test]
    fn zone_boundary_is_part_of_the_dead_zone() {
        let origin = point(0.0, 0.0);
        assert_eq!(
            ScrollZone::classify(origin, point(10.0, -10.0)),
            ScrollZone::None
        );
        assert_eq!(
            ScrollZone::classify(origin, point(10.1, 0.0)),
            ScrollZone::Right
        );
    }

    #[test]
    fn distance_is_cubic_in_the_shifted_delta() {
        // delta = 9 shifts to 1
        assert!((scroll_distance(9.0) - 0.00001).abs() < 1e-9);
        // delta = 19 shifts to 11, 11^3 = 1331
        assert!((scroll_distance(19.0) - 0.01331).abs() < 1e-6);

        let mut last = 0.0;
        for delta in [10.0, 15.0, 25.0, 40.0, 80.0] {
            let increment = scroll_distance(delta);
            assert!(increment > last, "expected monotone growth at {delta}");
            last = increment;
        }
    }

    #[test]
    fn tick_advances_both_axes_of_a_corner_zone() {
        let mut surface = surface_mid_scroll();
        let origin = point(100.0, 100.0);
        let mut scroller = started_scroller(&mut surface, origin);

        scroller.track(point(119.0, 119.0));
        scroller.tick(&mut surface);

        let expected = scroll_distance(19.0);
        assert!((surface.offset(Axis::Y) - (200.0 + expected)).abs() < 1e-4);
        assert!((surface.offset(Axis::X) - (200.0 + expected)).abs() < 1e-4);
        assert_eq!(surface.cursor, Some(CursorKind::ScrollSE));

        scroller.finish(&mut surface);
    }

    #[test]
    fn blocked_axis_is_skipped_and_neutral_glyph_shown() {
        let mut surface = TestSurface::default();
        surface
            .scroll
            .set_extents(SizeDIP::new(1000.0, 100.0), SizeDIP::new(100.0, 100.0));
        // offset X = 0: cannot scroll left, and no vertical travel at all

        let origin = point(100.0, 100.0);
        let mut scroller = started_scroller(&mut surface, origin);

        scroller.track(point(60.0, 100.0));
        scroller.tick(&mut surface);

        assert_eq!(surface.offset(Axis::X), 0.0);
        assert_eq!(surface.cursor, Some(CursorKind::ScrollAll));

        scroller.finish(&mut surface);
    }

    #[test]
    fn partially_blocked_corner_falls_back_to_the_open_axis() {
        let mut surface = TestSurface::default();
        surface
            .scroll
            .set_extents(SizeDIP::new(1000.0, 1000.0), SizeDIP::new(100.0, 100.0));
        // at the top edge: up is blocked, right is open

        let origin = point(100.0, 100.0);
        let mut scroller = started_scroller(&mut surface, origin);

        scroller.track(point(130.0, 70.0));
        scroller.tick(&mut surface);

        assert_eq!(surface.offset(Axis::Y), 0.0);
        assert!(surface.offset(Axis::X) > 0.0);
        assert_eq!(surface.cursor, Some(CursorKind::ScrollE));

        scroller.finish(&mut surface);
    }

    #[test]
    fn finish_restores_cursor_and_requests_arrange() {
        let mut surface = surface_mid_scroll();
        let mut scroller = started_scroller(&mut surface, point(50.0, 50.0));
        assert!(scroller.is_scrolling());
        assert_eq!(surface.indicator, Some(point(50.0, 50.0)));

        scroller.finish(&mut surface);

        assert!(!scroller.is_scrolling());
        assert!(surface.cursor.is_none());
        assert!(surface.indicator.is_none());
        assert_eq!(surface.arrange_requests, 1);

        // a tick queued before the stop must not move anything
        let before = surface.scroll.position();
        scroller.tick(&mut surface);
        assert_eq!(surface.scroll.position(), before);
    }
}
