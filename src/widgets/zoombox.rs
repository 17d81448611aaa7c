//! A container that scales its child. Zoom is a percentage bounded by
//! min/max properties; stepping, Ctrl+wheel, and Ctrl+plus/minus all go
//! through the same coercion chain. Zoom changes can animate.

use std::time::{Duration, Instant};

use crate::gfx::{RectDIP, SizeDIP};
use crate::layout::model::UIKey;
use crate::layout::{self, OwnedUITree};
use crate::math::easing::Easing;
use crate::property::{Property, PropertyError, finite_positive};
use crate::runtime::input::wheel::{MouseWheelAction, MouseWheelGesture};
use crate::widgets::{Bounds, Event, EventPhase, Instance, Key, Modifiers, State, Widget};
use crate::{RedrawRequest, Shell, with_state};

const DEFAULT_MIN_ZOOM: f32 = 10.0;
const DEFAULT_MAX_ZOOM: f32 = 1000.0;
const DEFAULT_ZOOM: f32 = 100.0;
const DEFAULT_ZOOM_INCREMENT: f32 = 10.0;

const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(200);

pub type OnZoomChangedFn<Message> = dyn Fn(f32) -> Message;

pub struct Zoombox<Message> {
    pub animate_zoom: bool,
    pub animation_duration: Duration,
    on_zoom_changed: Option<Box<OnZoomChangedFn<Message>>>,
}

impl<Message> std::fmt::Debug for Zoombox<Message> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zoombox")
            .field("animate_zoom", &self.animate_zoom)
            .finish()
    }
}

impl<Message> Default for Zoombox<Message> {
    fn default() -> Self {
        Self {
            animate_zoom: true,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            on_zoom_changed: None,
        }
    }
}

struct ZoomboxState {
    zoom: Property<f32>,
    min_zoom: Property<f32>,
    max_zoom: Property<f32>,
    zoom_increment: Property<f32>,
    can_zoom_in: bool,
    can_zoom_out: bool,
    /// Scale factor applied to the child, possibly mid-animation.
    factor: f32,
    animation: Option<ZoomAnimation>,
    /// Set after the first arrange; zoom changes before that snap.
    initialized: bool,
}

/// Scalar animation towards a target scale factor.
#[derive(Clone, Copy, Debug)]
struct ZoomAnimation {
    start_factor: f32,
    target_factor: f32,
    start_time: Instant,
    duration: Duration,
    easing: Easing,
}

impl ZoomAnimation {
    fn current(&self, now: Instant) -> f32 {
        let elapsed = now.duration_since(self.start_time).as_millis() as f32;
        let progress = (elapsed / self.duration.as_millis() as f32).clamp(0.0, 1.0);
        let eased = self.easing.apply(progress);
        self.start_factor + (self.target_factor - self.start_factor) * eased
    }

    fn is_complete(&self, now: Instant) -> bool {
        now.duration_since(self.start_time) >= self.duration
    }
}

impl<Message: 'static> Zoombox<Message> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_animation(mut self) -> Self {
        self.animate_zoom = false;
        self
    }

    pub fn with_zoom_changed(mut self, handler: impl Fn(f32) -> Message + 'static) -> Self {
        self.on_zoom_changed = Some(Box::new(handler));
        self
    }

    pub fn zoom(instance: &Instance) -> f32 {
        with_state!(instance as ZoomboxState).zoom.value()
    }

    /// The scale factor currently applied to the child (zoom / 100, or the
    /// in-flight animated value).
    pub fn scale(instance: &Instance) -> f32 {
        with_state!(instance as ZoomboxState).factor
    }

    pub fn can_zoom_in(instance: &Instance) -> bool {
        with_state!(instance as ZoomboxState).can_zoom_in
    }

    pub fn can_zoom_out(instance: &Instance) -> bool {
        with_state!(instance as ZoomboxState).can_zoom_out
    }

    /// Sets the zoom percentage. The write is validated (finite, positive),
    /// then coerced into `[min_zoom, max_zoom]`.
    pub fn set_zoom(&self, instance: &mut Instance, zoom: f32) -> Result<bool, PropertyError> {
        let state = with_state!(mut instance as ZoomboxState);
        self.apply_zoom(state, zoom)
    }

    /// Raises the minimum. A minimum above the maximum drags the maximum up;
    /// the current zoom follows if it fell below.
    pub fn set_min_zoom(&self, instance: &mut Instance, min: f32) -> Result<bool, PropertyError> {
        let state = with_state!(mut instance as ZoomboxState);
        let changed = state.min_zoom.set(min)?;

        if state.max_zoom.value() < min {
            state.max_zoom.set(min)?;
        }
        if state.zoom.value() < min {
            self.apply_zoom(state, min)?;
        }

        update_can_zoom(state);
        Ok(changed)
    }

    /// Lowers the maximum. A maximum below the minimum drags the minimum
    /// down; the current zoom follows if it rose above.
    pub fn set_max_zoom(&self, instance: &mut Instance, max: f32) -> Result<bool, PropertyError> {
        let state = with_state!(mut instance as ZoomboxState);
        let changed = state.max_zoom.set(max)?;

        if state.min_zoom.value() > max {
            state.min_zoom.set(max)?;
        }
        if state.zoom.value() > max {
            self.apply_zoom(state, max)?;
        }

        update_can_zoom(state);
        Ok(changed)
    }

    pub fn set_zoom_increment(
        &self,
        instance: &mut Instance,
        increment: f32,
    ) -> Result<bool, PropertyError> {
        with_state!(mut instance as ZoomboxState)
            .zoom_increment
            .set(increment)
    }

    /// Zooms in by one increment, saturating at the maximum.
    pub fn zoom_in(&self, instance: &mut Instance) -> bool {
        let state = with_state!(mut instance as ZoomboxState);
        let target = (state.zoom.value() + state.zoom_increment.value()).min(state.max_zoom.value());
        self.apply_zoom(state, target).unwrap_or(false)
    }

    /// Zooms out by one increment, saturating at the minimum.
    pub fn zoom_out(&self, instance: &mut Instance) -> bool {
        let state = with_state!(mut instance as ZoomboxState);
        let target = (state.zoom.value() - state.zoom_increment.value()).max(state.min_zoom.value());
        self.apply_zoom(state, target).unwrap_or(false)
    }

    /// Validates, coerces into range, writes, and kicks the scale factor
    /// (animated once the box has been laid out). Validation runs before the
    /// range coercion, so an invalid write is rejected rather than clamped.
    fn apply_zoom(&self, state: &mut ZoomboxState, zoom: f32) -> Result<bool, PropertyError> {
        if !finite_positive(&zoom) {
            return Err(PropertyError::Rejected {
                property: state.zoom.name(),
            });
        }

        let coerced = zoom.clamp(state.min_zoom.value(), state.max_zoom.value());
        let changed = state.zoom.set(coerced)?;
        update_can_zoom(state);

        if changed {
            let target = state.zoom.value() / 100.0;
            if self.animate_zoom && state.initialized {
                state.animation = Some(ZoomAnimation {
                    start_factor: state.factor,
                    target_factor: target,
                    start_time: Instant::now(),
                    duration: self.animation_duration,
                    easing: Easing::EaseOutCubic,
                });
            } else {
                // direct set cancels any running animation
                state.animation = None;
                state.factor = target;
            }
        }

        Ok(changed)
    }
}

fn update_can_zoom(state: &mut ZoomboxState) {
    state.can_zoom_in = state.zoom.value() != state.max_zoom.value();
    state.can_zoom_out = state.zoom.value() != state.min_zoom.value();
}

fn zoom_in_gesture() -> MouseWheelGesture {
    MouseWheelGesture::new(
        MouseWheelAction::WheelUp,
        Modifiers {
            ctrl: true,
            ..Default::default()
        },
    )
}

fn zoom_out_gesture() -> MouseWheelGesture {
    MouseWheelGesture::new(
        MouseWheelAction::WheelDown,
        Modifiers {
            ctrl: true,
            ..Default::default()
        },
    )
}

impl<Message: 'static> Widget<Message> for Zoombox<Message> {
    fn state(&self) -> State {
        Some(Box::new(ZoomboxState {
            zoom: Property::new("zoom", DEFAULT_ZOOM).with_validator(finite_positive),
            min_zoom: Property::new("min_zoom", DEFAULT_MIN_ZOOM).with_validator(finite_positive),
            max_zoom: Property::new("max_zoom", DEFAULT_MAX_ZOOM).with_validator(finite_positive),
            zoom_increment: Property::new("zoom_increment", DEFAULT_ZOOM_INCREMENT)
                .with_validator(finite_positive),
            can_zoom_in: true,
            can_zoom_out: true,
            factor: DEFAULT_ZOOM / 100.0,
            animation: None,
            initialized: false,
        }))
    }

    fn measure(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        instance: &mut Instance,
        available: SizeDIP,
    ) -> SizeDIP {
        let factor = with_state!(instance as ZoomboxState).factor;

        // the child sees the unscaled space; the desired size scales back up
        let child_available = SizeDIP {
            width: available.width / factor,
            height: available.height / factor,
        };

        let children = tree.slots[key].children.clone();
        let mut content = SizeDIP::default();
        for &child in &children {
            let size = layout::measure(tree, child, child_available);
            content.width = content.width.max(size.width);
            content.height = content.height.max(size.height);
        }

        SizeDIP {
            width: content.width * factor,
            height: content.height * factor,
        }
    }

    fn arrange(
        &mut self,
        tree: &mut OwnedUITree<Message>,
        key: UIKey,
        instance: &mut Instance,
        rect: RectDIP,
    ) {
        let state = with_state!(mut instance as ZoomboxState);
        state.initialized = true;

        let children = tree.slots[key].children.clone();
        for &child in &children {
            let size = tree.slots[child].desired_size();
            // the child keeps its unscaled geometry; the host applies the
            // scale factor when rendering
            layout::arrange(
                tree,
                child,
                RectDIP {
                    x: rect.x,
                    y: rect.y,
                    width: size.width,
                    height: size.height,
                },
            );
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
        if phase != EventPhase::Bubble {
            return;
        }

        match event {
            Event::MouseWheel { x, y, .. } => {
                let point = crate::gfx::PointDIP { x: *x, y: *y };
                if !point.within(bounds.border_box) {
                    return;
                }

                let changed = if zoom_in_gesture().matches(event) {
                    self.zoom_in(instance)
                } else if zoom_out_gesture().matches(event) {
                    self.zoom_out(instance)
                } else {
                    return;
                };

                shell.mark_handled();
                if changed {
                    self.notify(instance, shell);
                    shell.request_arrange();
                    shell.request_redraw(RedrawRequest::Immediate);
                }
            }
            Event::KeyDown { key, modifiers } if modifiers.ctrl => {
                let changed = match key {
                    Key::Plus => self.zoom_in(instance),
                    Key::Minus => self.zoom_out(instance),
                    _ => return,
                };

                if changed {
                    self.notify(instance, shell);
                    shell.request_arrange();
                    shell.request_redraw(RedrawRequest::Immediate);
                }
            }
            Event::Redraw { now } => {
                let state = with_state!(mut instance as ZoomboxState);
                if let Some(animation) = state.animation {
                    state.factor = animation.current(*now);
                    if animation.is_complete(*now) {
                        state.animation = None;
                    } else {
                        shell.request_redraw(RedrawRequest::Immediate);
                    }
                    shell.request_arrange();
                }
            }
            _ => {}
        }
    }
}

impl<Message: 'static> Zoombox<Message> {
    fn notify(&self, instance: &Instance, shell: &mut Shell<Message>) {
        if let Some(handler) = self.on_zoom_changed.as_ref() {
            shell.publish(handler(Self::zoom(instance)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::model::UIElement;
    use crate::w_id;
    use crate::widgets::widget;
    use std::sync::mpsc;

    fn instance_for(zoombox: &Zoombox<()>) -> Instance {
        Instance::new(w_id!(), Widget::<()>::state(zoombox))
    }

    #[test]
    fn zoom_coerces_into_the_min_max_range() {
        let zoombox = Zoombox::<()>::new().without_animation();
        let mut instance = instance_for(&zoombox);

        zoombox.set_zoom(&mut instance, 5000.0).unwrap();
        assert_eq!(Zoombox::<()>::zoom(&instance), 1000.0);
        assert!(!Zoombox::<()>::can_zoom_in(&instance));

        zoombox.set_zoom(&mut instance, 1.0).unwrap();
        assert_eq!(Zoombox::<()>::zoom(&instance), 10.0);
        assert!(!Zoombox::<()>::can_zoom_out(&instance));
    }

    #[test]
    fn invalid_zoom_writes_are_rejected() {
        let zoombox = Zoombox::<()>::new();
        let mut instance = instance_for(&zoombox);

        assert!(zoombox.set_zoom(&mut instance, f32::NAN).is_err());
        assert!(zoombox.set_zoom(&mut instance, -10.0).is_err());
        assert_eq!(Zoombox::<()>::zoom(&instance), 100.0);
    }

    #[test]
    fn raising_min_zoom_drags_the_other_properties_along() {
        let zoombox = Zoombox::<()>::new().without_animation();
        let mut instance = instance_for(&zoombox);

        zoombox.set_min_zoom(&mut instance, 2000.0).unwrap();
        assert_eq!(Zoombox::<()>::zoom(&instance), 2000.0);

        let state = with_state!(instance as ZoomboxState);
        assert_eq!(state.max_zoom.value(), 2000.0);
    }

    #[test]
    fn stepping_saturates_at_the_bounds() {
        let zoombox = Zoombox::<()>::new().without_animation();
        let mut instance = instance_for(&zoombox);

        zoombox.set_zoom(&mut instance, 995.0).unwrap();
        assert!(zoombox.zoom_in(&mut instance));
        assert_eq!(Zoombox::<()>::zoom(&instance), 1000.0);
        assert!(!zoombox.zoom_in(&mut instance));

        assert_eq!(Zoombox::<()>::scale(&instance), 10.0);
    }

    #[test]
    fn animated_zoom_interpolates_and_settles_on_redraw() {
        let (sender, _receiver) = mpsc::channel::<()>();
        let mut shell = Shell::new(sender);
        let mut tree = OwnedUITree::<()>::new();
        let id = w_id!();
        tree.insert(
            tree.root,
            UIElement {
                id: Some(id),
                content: widget(Zoombox::<()>::new()),
                width: crate::layout::model::Sizing::fixed(100.0),
                height: crate::layout::model::Sizing::fixed(100.0),
                ..Default::default()
            },
        );
        crate::layout::perform_layout(&mut tree, SizeDIP::new(100.0, 100.0));

        let zoombox = Zoombox::<()>::new();
        let instance = tree.widget_state.get_mut(&id).unwrap();
        zoombox.set_zoom(instance, 200.0).unwrap();
        // the write lands immediately; the factor catches up over the frames
        assert_eq!(Zoombox::<()>::zoom(instance), 200.0);
        assert_eq!(Zoombox::<()>::scale(instance), 1.0);

        let settled = Instant::now() + DEFAULT_ANIMATION_DURATION + Duration::from_millis(50);
        shell.dispatch_event(&mut tree, &Event::Redraw { now: settled });
        assert_eq!(Zoombox::<()>::scale(&tree.widget_state[&id]), 2.0);

        // a direct (unanimated) set cancels any animation in flight
        let zoombox = Zoombox::<()>::new().without_animation();
        let instance = tree.widget_state.get_mut(&id).unwrap();
        zoombox.set_zoom(instance, 400.0).unwrap();
        assert_eq!(Zoombox::<()>::scale(instance), 4.0);
    }

    #[test]
    fn ctrl_wheel_zooms_and_publishes() {
        let (sender, receiver) = mpsc::channel();
        let mut shell = Shell::new(sender);
        let mut tree = OwnedUITree::<f32>::new();
        let id = w_id!();
        let zoombox = Zoombox::<f32>::new().without_animation().with_zoom_changed(|zoom| zoom);
        tree.insert(
            tree.root,
            UIElement {
                id: Some(id),
                content: widget(zoombox),
                width: crate::layout::model::Sizing::fixed(200.0),
                height: crate::layout::model::Sizing::fixed(200.0),
                ..Default::default()
            },
        );
        crate::layout::perform_layout(&mut tree, SizeDIP::new(200.0, 200.0));

        shell.dispatch_event(
            &mut tree,
            &Event::MouseWheel {
                x: 50.0,
                y: 50.0,
                wheel_delta: 120.0,
                modifiers: Modifiers {
                    ctrl: true,
                    ..Default::default()
                },
            },
        );

        assert_eq!(receiver.try_recv(), Ok(110.0));
        assert!(shell.take_needs_arrange());
    }
}
