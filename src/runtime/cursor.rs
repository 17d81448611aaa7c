//! Cursor glyphs and the helper that swaps them in and out for a widget.

use std::sync::OnceLock;

use crate::runtime::input::scroller::ScrollZone;
use crate::{DeferredControl, Shell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Arrow,
    IBeam,
    /// Omnidirectional scroll origin glyph.
    ScrollAll,
    ScrollN,
    ScrollS,
    ScrollW,
    ScrollE,
    ScrollNW,
    ScrollNE,
    ScrollSW,
    ScrollSE,
    /// Open hand, shown while the pan key alone is held.
    HandOpen,
    /// Closed hand, shown while panning.
    HandClosed,
}

static SCROLL_GLYPHS: OnceLock<[(ScrollZone, CursorKind); 9]> = OnceLock::new();

/// The directional glyph for a scroll zone. The table is built once per
/// process and shared.
pub fn scroll_glyph(zone: ScrollZone) -> CursorKind {
    let table = SCROLL_GLYPHS.get_or_init(|| {
        [
            (ScrollZone::TopLeft, CursorKind::ScrollNW),
            (ScrollZone::Top, CursorKind::ScrollN),
            (ScrollZone::TopRight, CursorKind::ScrollNE),
            (ScrollZone::Left, CursorKind::ScrollW),
            (ScrollZone::None, CursorKind::ScrollAll),
            (ScrollZone::Right, CursorKind::ScrollE),
            (ScrollZone::BottomLeft, CursorKind::ScrollSW),
            (ScrollZone::Bottom, CursorKind::ScrollS),
            (ScrollZone::BottomRight, CursorKind::ScrollSE),
        ]
    });

    table
        .iter()
        .find(|(candidate, _)| *candidate == zone)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(CursorKind::ScrollAll)
}

/// Tracks the cursor a widget has pushed onto the host, so the widget can
/// put things back the way it found them when a gesture ends.
#[derive(Debug, Default)]
pub struct CursorUpdator {
    active: Option<CursorKind>,
}

impl CursorUpdator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests `cursor` from the host. Repeated requests for the cursor
    /// already in effect are dropped, since the scroll tick re-resolves the
    /// glyph every millisecond.
    pub fn apply<Message>(&mut self, shell: &mut Shell<Message>, cursor: CursorKind) {
        if self.active == Some(cursor) {
            return;
        }
        self.active = Some(cursor);
        shell.queue_deferred_control(DeferredControl::SetCursor(cursor));
    }

    /// Hands the cursor back to the host. A no-op when nothing was applied.
    pub fn restore<Message>(&mut self, shell: &mut Shell<Message>) {
        if self.active.take().is_some() {
            shell.queue_deferred_control(DeferredControl::RestoreCursor);
        }
    }

    pub fn active(&self) -> Option<CursorKind> {
        self.active
    }
}
