//! A collection of custom widgets on a small retained-mode shell: a scroll
//! container with cursor autoscroll and key+drag panning, a drag-reorderable
//! panel, a zoom container, and friends.
//!
//! The embedding host owns the window and renderer. It feeds [`Event`]s into
//! [`Shell::dispatch_event`], drains deferred controls / redraw requests /
//! autoscroll ticks afterwards, and runs [`layout::perform_layout`] whenever
//! the shell asks for re-validation.

use std::sync::mpsc;
use std::time::Instant;

pub mod collection;
pub mod gfx;
pub mod layout;
pub mod math;
pub mod property;
pub mod runtime;
pub mod util;
pub mod widgets;

use layout::OwnedUITree;
use layout::model::UIKey;
use layout::visitors;
use runtime::cursor::CursorKind;
use runtime::ticker::{TickReceiver, TickSender};
use widgets::{Event, EventPhase};

/// Host-facing side effects queued by widgets during dispatch and drained by
/// the embedder afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredControl {
    SetCursor(CursorKind),
    RestoreCursor,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum RedrawRequest {
    Immediate,
    At(Instant),
    Wait,
}

pub struct Shell<Message> {
    focus: Option<u64>,
    pointer_capture: Option<u64>,
    hover_path: Vec<UIKey>,

    event_handled: bool,

    deferred_controls: Vec<DeferredControl>,
    redraw_request: RedrawRequest,
    needs_arrange: bool,

    tick_sender: TickSender,
    tick_receiver: TickReceiver,

    message_sender: mpsc::Sender<Message>,
}

impl<Message> Shell<Message> {
    pub fn new(message_sender: mpsc::Sender<Message>) -> Self {
        let (tick_sender, tick_receiver) = futures::channel::mpsc::unbounded();

        Self {
            focus: None,
            pointer_capture: None,
            hover_path: Vec::new(),
            event_handled: false,
            deferred_controls: Vec::new(),
            redraw_request: RedrawRequest::Wait,
            needs_arrange: false,
            tick_sender,
            tick_receiver,
            message_sender,
        }
    }

    /// Sends a message to the embedder's update loop.
    pub fn publish(&self, message: Message) {
        if self.message_sender.send(message).is_err() {
            log::warn!("message receiver dropped, message discarded");
        }
    }

    /// Marks the current event handled, ending its dispatch. Returns false
    /// if it was already handled.
    pub fn mark_handled(&mut self) -> bool {
        if self.event_handled {
            return false;
        }
        self.event_handled = true;
        true
    }

    pub fn set_focus(&mut self, id: u64) {
        self.focus = Some(id);
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    pub fn focus(&self) -> Option<u64> {
        self.focus
    }

    /// Claims pointer input for the widget with `id`: every later pointer
    /// event routes to it until released.
    pub fn capture_pointer(&mut self, id: u64) {
        self.pointer_capture = Some(id);
    }

    /// Releases pointer capture held by `id`. Releasing capture that was
    /// never acquired, or already released, is a no-op.
    pub fn release_pointer(&mut self, id: u64) {
        if self.pointer_capture == Some(id) {
            self.pointer_capture = None;
        }
    }

    pub fn pointer_capture(&self) -> Option<u64> {
        self.pointer_capture
    }

    pub fn queue_deferred_control(&mut self, control: DeferredControl) {
        self.deferred_controls.push(control);
    }

    pub fn drain_deferred_controls(&mut self) -> Option<Vec<DeferredControl>> {
        if self.deferred_controls.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.deferred_controls))
        }
    }

    pub fn request_redraw(&mut self, request: RedrawRequest) {
        if request < self.redraw_request {
            self.redraw_request = request;
        }
    }

    /// The earliest redraw requested since the last take, resetting it.
    pub fn take_redraw_request(&mut self) -> RedrawRequest {
        std::mem::replace(&mut self.redraw_request, RedrawRequest::Wait)
    }

    /// Asks the embedder to run a layout pass before the next frame.
    pub fn request_arrange(&mut self) {
        self.needs_arrange = true;
    }

    pub fn take_needs_arrange(&mut self) -> bool {
        std::mem::take(&mut self.needs_arrange)
    }

    /// The channel end handed to autoscroll tickers.
    pub fn tick_sender(&self) -> TickSender {
        self.tick_sender.clone()
    }

    /// Widget ids with ticks pending. The embedder dispatches
    /// [`Event::Tick`] to each via [`Shell::dispatch_event_to`]; a tick for
    /// a finished gesture is a no-op on the widget side.
    pub fn drain_ticks(&mut self) -> Vec<u64> {
        let mut ids = Vec::new();
        while let Ok(Some(id)) = self.tick_receiver.try_next() {
            ids.push(id);
        }
        ids
    }

    /// Routes `event` through the tree: tunnel from the root down to the
    /// target, then bubble back up unless a tunnel handler marked the event
    /// handled. Pointer events go to the innermost element under the
    /// pointer, or to the capture holder; keyboard events go to the focused
    /// element; `Redraw` is broadcast.
    pub fn dispatch_event(&mut self, tree: &mut OwnedUITree<Message>, event: &Event) {
        if matches!(event, Event::Redraw { .. }) {
            self.broadcast(tree, event);
            return;
        }

        let Some(target) = self.route_target(tree, event) else {
            return;
        };

        if let Event::MouseMove { x, y } = *event
            && self.pointer_capture.is_none()
        {
            self.notify_hover_changes(tree, target, x, y);
        }

        self.dispatch_phases(tree, event, target);
    }

    /// Delivers [`Event::MouseLeave`] to elements the pointer has moved off
    /// of since the last move.
    fn notify_hover_changes(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        target: UIKey,
        x: f32,
        y: f32,
    ) {
        let path = visitors::ancestry_path(tree, target);
        let previous = std::mem::replace(&mut self.hover_path, path);

        let leave = Event::MouseLeave { x, y };
        for key in previous {
            if !self.hover_path.contains(&key) && tree.slots.contains_key(key) {
                self.deliver(tree, key, &leave, EventPhase::Bubble);
            }
        }
    }

    /// Routes `event` directly at the element with `target_id`, running both
    /// phases along its ancestor chain.
    pub fn dispatch_event_to(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        event: &Event,
        target_id: u64,
    ) {
        let Some(target) = tree.find_by_id(target_id) else {
            return;
        };
        self.dispatch_phases(tree, event, target);
    }

    /// Innermost cursor suggestion for the pointer at `point`, for the host
    /// to apply when no gesture holds the cursor.
    pub fn cursor_hint(&self, tree: &OwnedUITree<Message>, point: gfx::PointDIP) -> Option<CursorKind> {
        let mut key = visitors::hit_test(tree, tree.root, point)?;
        loop {
            let element = &tree.slots[key];
            if let (Some(id), Some(widget)) = (element.id, element.content.as_ref())
                && let Some(instance) = tree.widget_state.get(&id)
                && let Some(cursor) = widget.cursor(instance, point, element.bounds())
            {
                return Some(cursor);
            }
            key = element.parent?;
        }
    }

    fn dispatch_phases(&mut self, tree: &mut OwnedUITree<Message>, event: &Event, target: UIKey) {
        self.event_handled = false;

        let path = visitors::ancestry_path(tree, target);
        for &key in &path {
            self.deliver(tree, key, event, EventPhase::Tunnel);
            if self.event_handled {
                return;
            }
        }

        for &key in path.iter().rev() {
            self.deliver(tree, key, event, EventPhase::Bubble);
            if self.event_handled {
                return;
            }
        }
    }

    fn route_target(&self, tree: &OwnedUITree<Message>, event: &Event) -> Option<UIKey> {
        if let Some(position) = event.position() {
            if let Some(id) = self.pointer_capture {
                return tree.find_by_id(id);
            }
            return visitors::hit_test(tree, tree.root, position).or(Some(tree.root));
        }

        if event.is_keyboard()
            && let Some(id) = self.focus
            && let Some(key) = tree.find_by_id(id)
        {
            return Some(key);
        }

        Some(tree.root)
    }

    fn broadcast(&mut self, tree: &mut OwnedUITree<Message>, event: &Event) {
        self.event_handled = false;
        for key in visitors::descendants(tree, tree.root) {
            self.deliver(tree, key, event, EventPhase::Bubble);
        }
    }

    fn deliver(&mut self, tree: &mut OwnedUITree<Message>, key: UIKey, event: &Event, phase: EventPhase) {
        let bounds = tree.slots[key].bounds();
        layout::with_widget(tree, key, |tree, key, widget, instance| {
            widget.update(tree, key, instance, self, event, phase, bounds);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{PointDIP, SizeDIP};
    use crate::layout::model::{Sizing, UIElement};
    use crate::layout::perform_layout;
    use crate::widgets::{Bounds, Event, Instance, MouseButton, Widget, widget};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc;

    type Log = Rc<RefCell<Vec<(&'static str, EventPhase)>>>;

    /// Records every delivery, optionally handling the tunnel pass.
    struct Probe {
        name: &'static str,
        log: Log,
        handle_in_tunnel: bool,
        cursor: Option<CursorKind>,
    }

    impl std::fmt::Debug for Probe {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Probe").field("name", &self.name).finish()
        }
    }

    impl Widget<()> for Probe {
        fn update(
            &mut self,
            _tree: &mut OwnedUITree<()>,
            _key: UIKey,
            _instance: &mut Instance,
            shell: &mut Shell<()>,
            event: &Event,
            phase: EventPhase,
            _bounds: Bounds,
        ) {
            if matches!(event, Event::MouseLeave { .. }) {
                return;
            }

            self.log.borrow_mut().push((self.name, phase));
            if self.handle_in_tunnel && phase == EventPhase::Tunnel {
                shell.mark_handled();
            }
        }

        fn cursor(
            &self,
            _instance: &Instance,
            point: PointDIP,
            bounds: Bounds,
        ) -> Option<CursorKind> {
            if point.within(bounds.border_box) {
                self.cursor
            } else {
                None
            }
        }
    }

    struct Fixture {
        tree: OwnedUITree<()>,
        shell: Shell<()>,
        log: Log,
        outer_id: u64,
        inner_id: u64,
        _messages: mpsc::Receiver<()>,
    }

    fn fixture(outer_handles_tunnel: bool) -> Fixture {
        let (sender, receiver) = mpsc::channel();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = OwnedUITree::<()>::new();

        let outer_id = crate::w_id!();
        let inner_id = crate::w_id!();

        let outer = tree.insert(
            tree.root,
            UIElement {
                id: Some(outer_id),
                content: widget(Probe {
                    name: "outer",
                    log: log.clone(),
                    handle_in_tunnel: outer_handles_tunnel,
                    cursor: None,
                }),
                width: Sizing::fixed(100.0),
                height: Sizing::fixed(100.0),
                ..Default::default()
            },
        );
        tree.insert(
            outer,
            UIElement {
                id: Some(inner_id),
                content: widget(Probe {
                    name: "inner",
                    log: log.clone(),
                    handle_in_tunnel: false,
                    cursor: Some(CursorKind::IBeam),
                }),
                width: Sizing::fixed(100.0),
                height: Sizing::fixed(100.0),
                ..Default::default()
            },
        );

        perform_layout(&mut tree, SizeDIP::new(100.0, 100.0));

        Fixture {
            tree,
            shell: Shell::new(sender),
            log,
            outer_id,
            inner_id,
            _messages: receiver,
        }
    }

    fn press(x: f32, y: f32) -> Event {
        Event::MouseButtonDown {
            button: MouseButton::Left,
            x,
            y,
            click_count: 1,
            modifiers: Default::default(),
        }
    }

    #[test]
    fn events_tunnel_to_the_target_then_bubble_back() {
        let mut f = fixture(false);
        f.shell.dispatch_event(&mut f.tree, &press(50.0, 50.0));

        assert_eq!(
            *f.log.borrow(),
            vec![
                ("outer", EventPhase::Tunnel),
                ("inner", EventPhase::Tunnel),
                ("inner", EventPhase::Bubble),
                ("outer", EventPhase::Bubble),
            ]
        );
    }

    #[test]
    fn a_handled_tunnel_pass_suppresses_bubbling() {
        let mut f = fixture(true);
        f.shell.dispatch_event(&mut f.tree, &press(50.0, 50.0));

        assert_eq!(*f.log.borrow(), vec![("outer", EventPhase::Tunnel)]);
    }

    #[test]
    fn capture_routes_pointer_events_to_the_holder() {
        let mut f = fixture(false);
        f.shell.capture_pointer(f.outer_id);

        // far outside every element, still delivered to the capture holder
        f.shell
            .dispatch_event(&mut f.tree, &Event::MouseMove { x: 900.0, y: 900.0 });

        assert_eq!(
            *f.log.borrow(),
            vec![
                ("outer", EventPhase::Tunnel),
                ("outer", EventPhase::Bubble),
            ]
        );
    }

    #[test]
    fn release_is_idempotent_and_owner_checked() {
        let mut f = fixture(false);
        f.shell.capture_pointer(f.inner_id);

        // a non-owner release is a no-op
        f.shell.release_pointer(f.outer_id);
        assert_eq!(f.shell.pointer_capture(), Some(f.inner_id));

        f.shell.release_pointer(f.inner_id);
        f.shell.release_pointer(f.inner_id);
        assert_eq!(f.shell.pointer_capture(), None);
    }

    #[test]
    fn deferred_controls_drain_once() {
        let (sender, _receiver) = mpsc::channel::<()>();
        let mut shell = Shell::new(sender);
        shell.queue_deferred_control(DeferredControl::SetCursor(CursorKind::ScrollAll));

        assert_eq!(
            shell.drain_deferred_controls(),
            Some(vec![DeferredControl::SetCursor(CursorKind::ScrollAll)])
        );
        assert_eq!(shell.drain_deferred_controls(), None);
    }

    #[test]
    fn redraw_requests_keep_the_earliest() {
        let (sender, _receiver) = mpsc::channel::<()>();
        let mut shell = Shell::new(sender);

        shell.request_redraw(RedrawRequest::At(Instant::now()));
        shell.request_redraw(RedrawRequest::Immediate);
        shell.request_redraw(RedrawRequest::Wait);

        assert_eq!(shell.take_redraw_request(), RedrawRequest::Immediate);
        assert_eq!(shell.take_redraw_request(), RedrawRequest::Wait);
    }

    #[test]
    fn cursor_hint_comes_from_the_innermost_widget() {
        let f = fixture(false);
        let hint = f
            .shell
            .cursor_hint(&f.tree, PointDIP { x: 50.0, y: 50.0 });
        assert_eq!(hint, Some(CursorKind::IBeam));
    }
}
