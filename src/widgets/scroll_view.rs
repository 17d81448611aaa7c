//! A scrollable container that supports scrolling by the cursor: middle-click
//! autoscroll around a fixed origin, and pan-key + primary-button panning.

use crate::gfx::{PointDIP, RectDIP, SizeDIP};
use crate::layout::model::{Axis, UIKey};
use crate::layout::scroll::{ScrollModel, ScrollPosition};
use crate::layout::{self, OwnedUITree};
use crate::runtime::cursor::{CursorKind, CursorUpdator};
use crate::runtime::input::ScrollSurface;
use crate::runtime::input::panner::Panner;
use crate::runtime::input::scroller::Scroller;
use crate::widgets::{Bounds, Event, EventPhase, Instance, Key, MouseButton, State, Widget};
use crate::{RedrawRequest, Shell, with_state};

const INDICATOR_SIZE: f32 = 4.0;
const INDICATOR_OFFSET: f32 = 1.0;

/// The extended scroll container. Behaviour toggles mirror the properties of
/// the control it descends from: cursor scrolling and panning can each be
/// disabled, the pan key is configurable, and the start indicator optional.
#[derive(Debug, Clone)]
pub struct ScrollView {
    pub allow_cursor_scrolling: bool,
    pub allow_panning: bool,
    pub pan_key: Key,
    pub draw_start_indicator: bool,
}

impl Default for ScrollView {
    fn default() -> Self {
        Self {
            allow_cursor_scrolling: true,
            allow_panning: true,
            pan_key: Key::Space,
            draw_start_indicator: true,
        }
    }
}

struct ScrollViewState {
    scroll: ScrollModel,
    scroller: Scroller,
    panner: Panner,
    cursor: CursorUpdator,
    indicator: Option<RectDIP>,
}

/// Adapts the widget's shell access and scroll model to the surface the
/// gesture state machines drive.
struct SurfaceAdapter<'a, Message> {
    shell: &'a mut Shell<Message>,
    scroll: &'a mut ScrollModel,
    cursor: &'a mut CursorUpdator,
    indicator: &'a mut Option<RectDIP>,
    draw_indicator: bool,
    id: u64,
}

impl<Message> ScrollSurface for SurfaceAdapter<'_, Message> {
    fn offset(&self, axis: Axis) -> f32 {
        self.scroll.offset(axis)
    }

    fn extent(&self, axis: Axis) -> f32 {
        self.scroll.extent(axis)
    }

    fn viewport(&self, axis: Axis) -> f32 {
        self.scroll.viewport(axis)
    }

    fn scroll_to(&mut self, axis: Axis, offset: f32) {
        self.scroll.scroll_to(axis, offset);
        self.shell.request_arrange();
        self.shell.request_redraw(RedrawRequest::Immediate);
    }

    fn set_cursor(&mut self, cursor: CursorKind) {
        self.cursor.apply(self.shell, cursor);
    }

    fn restore_cursor(&mut self) {
        self.cursor.restore(self.shell);
    }

    fn capture_pointer(&mut self) {
        self.shell.capture_pointer(self.id);
    }

    fn release_pointer(&mut self) {
        self.shell.release_pointer(self.id);
    }

    fn show_indicator(&mut self, origin: PointDIP) {
        if self.draw_indicator {
            *self.indicator = Some(RectDIP {
                x: origin.x - INDICATOR_OFFSET,
                y: origin.y - INDICATOR_OFFSET,
                width: INDICATOR_SIZE,
                height: INDICATOR_SIZE,
            });
        }
    }

    fn hide_indicator(&mut self) {
        *self.indicator = None;
    }

    fn request_arrange(&mut self) {
        self.shell.request_arrange();
    }
}

impl ScrollView {
    pub fn offset(instance: &Instance) -> ScrollPosition {
        with_state!(instance as ScrollViewState).scroll.position()
    }

    pub fn scroll_to(instance: &mut Instance, axis: Axis, offset: f32) {
        with_state!(mut instance as ScrollViewState)
            .scroll
            .scroll_to(axis, offset);
    }

    pub fn is_scrolling(instance: &Instance) -> bool {
        with_state!(instance as ScrollViewState).scroller.is_scrolling()
    }

    pub fn is_panning(instance: &Instance) -> bool {
        with_state!(instance as ScrollViewState).panner.is_panning()
    }

    /// The arranged rect of the scroll-start indicator, when visible.
    pub fn indicator(instance: &Instance) -> Option<RectDIP> {
        with_state!(instance as ScrollViewState).indicator
    }

    pub fn can_scroll_up(instance: &Instance) -> bool {
        let scroll = &with_state!(instance as ScrollViewState).scroll;
        scroll.offset(Axis::Y) > 0.0
    }

    pub fn can_scroll_down(instance: &Instance) -> bool {
        let scroll = &with_state!(instance as ScrollViewState).scroll;
        scroll.offset(Axis::Y) < scroll.extent(Axis::Y) - scroll.viewport(Axis::Y)
    }

    pub fn can_scroll_left(instance: &Instance) -> bool {
        let scroll = &with_state!(instance as ScrollViewState).scroll;
        scroll.offset(Axis::X) > 0.0
    }

    pub fn can_scroll_right(instance: &Instance) -> bool {
        let scroll = &with_state!(instance as ScrollViewState).scroll;
        scroll.offset(Axis::X) < scroll.extent(Axis::X) - scroll.viewport(Axis::X)
    }
}

impl<Message> Widget<Message> for ScrollView {
    fn state(&self) -> State {
        Some(Box::new(ScrollViewState {
            scroll: ScrollModel::default(),
            scroller: Scroller::new(),
            panner: Panner::new(),
            cursor: CursorUpdator::new(),
            indicator: None,
        }))
    }

    fn measure(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        _instance: &mut Instance,
        available: SizeDIP,
    ) -> SizeDIP {
        // content measures against unbounded space; the viewport clamps
        let children = tree.slots[key].children.clone();
        let mut content = SizeDIP::default();
        for &child in &children {
            let size = layout::measure(tree, child, SizeDIP::INFINITE);
            content.width = content.width.max(size.width);
            content.height = content.height.max(size.height);
        }
        content.min(available)
    }

    fn arrange(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        instance: &mut Instance,
        rect: RectDIP,
    ) {
        let padding = tree.slots[key].padding;
        let children = tree.slots[key].children.clone();

        let mut extent = SizeDIP::default();
        for &child in &children {
            let size = tree.slots[child].desired_size();
            extent.width = extent.width.max(size.width);
            extent.height = extent.height.max(size.height);
        }

        let viewport = SizeDIP {
            width: rect.width - padding.horizontal(),
            height: rect.height - padding.vertical(),
        };

        let state = with_state!(mut instance as ScrollViewState);
        state.scroll.set_extents(extent, viewport);
        let position = state.scroll.position();

        for &child in &children {
            let size = tree.slots[child].desired_size();
            layout::arrange(
                tree,
                child,
                RectDIP {
                    x: rect.x + padding.left - position.x,
                    y: rect.y + padding.top - position.y,
                    width: size.width,
                    height: size.height,
                },
            );
        }

        if state.scroller.is_scrolling() && self.draw_start_indicator {
            let origin = state.scroller.start_position();
            state.indicator = Some(RectDIP {
                x: origin.x - INDICATOR_OFFSET,
                y: origin.y - INDICATOR_OFFSET,
                width: INDICATOR_SIZE,
                height: INDICATOR_SIZE,
            });
        }
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
        // gestures attach on the bubble pass, leaving the tunnel pass free
        // for descendants and interceptors
        if phase != EventPhase::Bubble {
            return;
        }

        let id = instance.id();
        let ticks = shell.tick_sender();
        let state = with_state!(mut instance as ScrollViewState);
        let ScrollViewState {
            scroll,
            scroller,
            panner,
            cursor,
            indicator,
        } = state;
        let mut surface = SurfaceAdapter {
            shell: &mut *shell,
            scroll,
            cursor,
            indicator,
            draw_indicator: self.draw_start_indicator,
            id,
        };

        match event {
            Event::MouseButtonDown {
                button, x, y, ..
            } => {
                let point = PointDIP { x: *x, y: *y };
                let inside = point.within(bounds.border_box);
                let mut handled = false;

                if self.allow_cursor_scrolling {
                    if scroller.is_scrolling() {
                        // any press while autoscrolling ends the gesture
                        scroller.finish(&mut surface);
                        surface.release_pointer();
                        handled = true;
                    } else if *button == MouseButton::Middle && inside {
                        scroller.start(point, id, ticks, &mut surface);
                        surface.capture_pointer();
                        handled = true;
                    }
                }

                if self.allow_panning && *button == MouseButton::Left && inside {
                    panner.mouse_down(point, &mut surface);
                }

                if handled {
                    shell.set_focus(id);
                    shell.mark_handled();
                }
            }
            Event::MouseButtonUp { button, .. } => {
                if self.allow_panning && *button == MouseButton::Left {
                    panner.mouse_up(&mut surface);
                }
            }
            Event::MouseMove { x, y } => {
                let point = PointDIP { x: *x, y: *y };
                let mut handled = false;

                if self.allow_cursor_scrolling && scroller.is_scrolling() {
                    scroller.track(point);
                    handled = true;
                }

                if self.allow_panning && panner.is_panning() {
                    panner.track(point, &mut surface);
                }

                if handled {
                    shell.mark_handled();
                }
            }
            Event::MouseWheel { wheel_delta, .. } => {
                if self.allow_cursor_scrolling && scroller.is_scrolling() {
                    scroller.finish(&mut surface);
                    surface.release_pointer();
                }

                if surface.scroll.max_scroll(Axis::Y) > 0.0 {
                    let offset = surface.offset(Axis::Y) - wheel_delta;
                    surface.scroll_to(Axis::Y, offset);
                    shell.mark_handled();
                }
            }
            Event::MouseWheelH { wheel_delta, .. } => {
                if surface.scroll.max_scroll(Axis::X) > 0.0 {
                    let offset = surface.offset(Axis::X) + wheel_delta;
                    surface.scroll_to(Axis::X, offset);
                    shell.mark_handled();
                }
            }
            Event::KeyDown { key, .. } => {
                if self.allow_cursor_scrolling && scroller.is_scrolling() {
                    scroller.finish(&mut surface);
                    surface.release_pointer();
                }

                if self.allow_panning && *key == self.pan_key {
                    panner.key_down(&mut surface);
                }
            }
            Event::KeyUp { key, .. } => {
                if self.allow_panning && *key == self.pan_key {
                    panner.key_up(&mut surface);
                }
            }
            Event::Tick => {
                scroller.tick(&mut surface);
            }
            _ => {}
        }
    }
}
