//! Event propagation.
//!
//! [`Application::notify`] is the single entry point every event passes
//! through. After the shutdown check, the input snapshot, the gesture
//! filter and the tooltip timers it hands the event to the walk for its
//! type:
//!
//! | Events | Walk |
//! |--------|------|
//! | mouse, wheel, tablet, context menu, tooltip | positional walk, a translated copy per ancestor |
//! | key press/release | the same event up to the window, accept flag reset per hop |
//! | touch begin | touch points re-based per ancestor; the acceptor grabs the points |
//! | drag enter | first enabled ancestor accepting drops becomes the drag target |
//! | drag move/drop/leave | straight to the drag target |
//! | native gesture | ignore-then-deliver up to the window |
//! | gesture, gesture override | each gesture to the nearest widget subscribed to its type |
//!
//! Everything else is delivered once through the notify helper.
//!
//! Each walk checks that its current widget still exists after every
//! delivery, since a handler may destroy any widget, the receiver included.

use horizon_input_core::logging::{span_names, targets};
use horizon_input_core::{FocusPolicy, PerfSpan, Point, WidgetAttributes, WidgetId};

use crate::application::Application;
use crate::events::{Event, EventType, FocusReason, GestureEvent};
use crate::gesture::{GestureFlags, GestureState};

/// How a positional walk treats each hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Propagation {
    /// Mouse events: moves without buttons only reach widgets that track
    /// the mouse, and every hop clears the no-replay attribute.
    Mouse,
    /// Wheel, tablet and context menu events.
    Pointer,
    /// Tooltips ignore the no-propagation attribute.
    ToolTip,
}

impl Propagation {
    fn honors_no_mouse_propagation(self) -> bool {
        self != Propagation::ToolTip
    }
}

impl Application {
    /// Deliver `event` to `receiver`, propagating it to ancestors as its type
    /// requires. Returns whether the event was handled.
    pub fn notify(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        if self.state.closing {
            return true;
        }
        if !self.tree.contains(receiver) {
            tracing::warn!(
                target: targets::DISPATCH,
                ?receiver,
                event_type = ?event.event_type(),
                "notify: unexpected invalid receiver"
            );
            return true;
        }
        let _perf = PerfSpan::new(span_names::NOTIFY);
        let event_type = event.event_type();

        if event.spontaneous() {
            self.state.capture_input(event);
        }
        if !event_type.bypasses_gesture_filter() && self.filter_gestures(receiver, event) {
            tracing::trace!(target: targets::DISPATCH, ?receiver, ?event_type, "event consumed by gesture filter");
            return true;
        }
        self.stop_tooltip_timers(event_type);

        match event_type {
            EventType::KeyPress | EventType::KeyRelease => self.propagate_key(receiver, event),
            EventType::MouseButtonPress
            | EventType::MouseButtonRelease
            | EventType::MouseButtonDblClick
            | EventType::MouseMove => self.propagate_mouse(receiver, event),
            EventType::Wheel => {
                if event.spontaneous() {
                    self.give_focus_according_to_policy(receiver, FocusPolicy::WHEEL, FocusReason::Mouse);
                }
                self.propagate_positional(receiver, event, Propagation::Pointer)
            }
            EventType::ContextMenu | EventType::TabletPress | EventType::TabletMove | EventType::TabletRelease => {
                self.propagate_positional(receiver, event, Propagation::Pointer)
            }
            EventType::ToolTip => self.propagate_positional(receiver, event, Propagation::ToolTip),
            EventType::DragEnter => self.propagate_drag_enter(receiver, event),
            EventType::DragMove | EventType::Drop | EventType::DragLeave => self.deliver_to_drag_target(receiver, event),
            EventType::TouchBegin => self.propagate_touch_begin(receiver, event),
            EventType::TouchEnd => {
                if event.spontaneous() && self.config.focus_on_release {
                    self.focus_on_release(receiver, FocusPolicy::CLICK);
                }
                self.notify_helper(receiver, event)
            }
            EventType::NativeGesture => self.propagate_native_gesture(receiver, event),
            EventType::Gesture | EventType::GestureOverride => self.propagate_gesture(receiver, event),
            _ => self.notify_helper(receiver, event),
        }
    }

    fn propagate_key(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        if let Event::Key(key) = &*event
            && key.event_type == EventType::KeyPress
        {
            self.state.key_is_focus_navigation = key.key.is_focus_navigation();
        }

        let initially_accepted = event.is_accepted();
        let mut widget = receiver;
        let mut res;
        loop {
            event.set_accepted(initially_accepted);
            res = self.notify_helper(widget, event);
            if (res && event.is_accepted()) || !self.tree.contains(receiver) || !self.tree.contains(widget) {
                break;
            }
            if self.tree.is_window(widget) {
                break;
            }
            match self.tree.parent(widget) {
                Some(parent) => widget = parent,
                None => break,
            }
        }
        self.state.key_is_focus_navigation = false;
        res
    }

    fn propagate_mouse(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        let Some(mouse) = event.as_mouse() else {
            return self.notify_helper(receiver, event);
        };
        let (event_type, pos, global_pos, buttons) = (mouse.event_type, mouse.pos, mouse.global_pos, mouse.buttons);

        if event.spontaneous() {
            match event_type {
                EventType::MouseButtonPress => {
                    if self.config.focus_on_release {
                        self.state.focus_at_press = Some(self.state.focus_widget);
                    } else {
                        self.give_focus_according_to_policy(receiver, FocusPolicy::CLICK, FocusReason::Mouse);
                    }
                }
                EventType::MouseButtonRelease if self.config.focus_on_release => {
                    self.focus_on_release(receiver, FocusPolicy::CLICK);
                }
                EventType::MouseMove if buttons.is_empty() => {
                    self.arm_tooltip(receiver, pos, global_pos);
                }
                _ => {}
            }
        }
        if !self.tree.contains(receiver) {
            return true;
        }

        let res = self.propagate_positional(receiver, event, Propagation::Mouse);

        if event_type == EventType::MouseMove && self.tree.contains(receiver) {
            self.send_hover_moves(receiver, pos);
        }
        self.state.hover_global_pos = global_pos;
        res
    }

    /// Walk a positional event from `receiver` towards its window.
    ///
    /// The receiver gets `event` itself; every ancestor gets a copy with the
    /// position translated into its frame. The walk ends at the first hop
    /// that handled and accepted the event, at the window, or (except for
    /// tooltips) at a widget that blocks mouse propagation. The final accept
    /// flag is written back to `event`.
    fn propagate_positional(&mut self, receiver: WidgetId, event: &mut Event, propagation: Propagation) -> bool {
        let mut relpos = event.pos().unwrap_or(Point::ZERO);
        let tracking_only = propagation == Propagation::Mouse
            && event
                .as_mouse()
                .is_some_and(|m| m.event_type == EventType::MouseMove && m.buttons.is_empty());

        let mut event_accepted;
        let mut res;
        let mut widget = receiver;
        loop {
            let mut copy;
            let current: &mut Event = if widget == receiver {
                &mut *event
            } else {
                copy = event.clone();
                copy.set_pos(relpos);
                copy.set_accepted(true);
                &mut copy
            };

            if tracking_only && !self.tree.test_attribute(widget, WidgetAttributes::MOUSE_TRACKING) {
                self.send_through_app_filters(widget, current);
                res = true;
            } else {
                if propagation == Propagation::Mouse {
                    let _ = self.tree.set_attribute(widget, WidgetAttributes::NO_MOUSE_REPLAY, false);
                }
                res = self.notify_helper(widget, current);
            }
            event_accepted = current.is_accepted();

            if res && event_accepted {
                break;
            }
            if !self.tree.contains(widget) || self.tree.is_window(widget) {
                break;
            }
            if propagation.honors_no_mouse_propagation()
                && self.tree.test_attribute(widget, WidgetAttributes::NO_MOUSE_PROPAGATION)
            {
                break;
            }
            relpos += self.tree.pos(widget);
            match self.tree.parent(widget) {
                Some(parent) => widget = parent,
                None => break,
            }
        }
        event.set_accepted(event_accepted);
        res
    }

    /// HoverMove for every hovering widget from `receiver` up.
    fn send_hover_moves(&mut self, receiver: WidgetId, pos: Point) {
        let mut relpos = pos;
        let diff = relpos - self.tree.map_from_global(receiver, self.state.hover_global_pos);
        let mut widget = receiver;
        loop {
            if !self.tree.contains(widget) {
                return;
            }
            if self.tree.test_attribute(widget, WidgetAttributes::HOVER) && self.is_hover_eligible(widget) {
                let mut hover = Event::hover(EventType::HoverMove, Some(relpos), Some(relpos - diff));
                self.notify_helper(widget, &mut hover);
                if !self.tree.contains(widget) {
                    return;
                }
            }
            if self.tree.is_window(widget) || self.tree.test_attribute(widget, WidgetAttributes::NO_MOUSE_PROPAGATION) {
                return;
            }
            relpos += self.tree.pos(widget);
            match self.tree.parent(widget) {
                Some(parent) => widget = parent,
                None => return,
            }
        }
    }

    /// Hover events only go to widgets outside popup mode or inside the
    /// active popup.
    pub(crate) fn is_hover_eligible(&self, widget: WidgetId) -> bool {
        match self.state.popups.active() {
            None => true,
            Some(popup) => self.tree.window(widget) == Some(popup),
        }
    }

    fn propagate_drag_enter(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        let mut res = false;
        let mut widget = receiver;
        loop {
            if self.tree.is_enabled(widget) && self.tree.test_attribute(widget, WidgetAttributes::ACCEPT_DROPS) {
                res = self.notify_helper(widget, event);
                if res && event.is_accepted() {
                    if self.tree.contains(widget) {
                        tracing::trace!(target: targets::DISPATCH, ?widget, "drag target set");
                        self.state.drag_target = Some(widget);
                    }
                    break;
                }
            }
            if !self.tree.contains(widget) || self.tree.is_window(widget) {
                break;
            }
            if let Some(pos) = event.pos() {
                event.set_pos(self.tree.map_to_parent(widget, pos));
            }
            match self.tree.parent(widget) {
                Some(parent) => widget = parent,
                None => break,
            }
        }
        res
    }

    fn deliver_to_drag_target(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        let event_type = event.event_type();
        let Some(target) = self.state.drag_target.filter(|&t| self.tree.contains(t)) else {
            self.state.drag_target = None;
            return false;
        };
        if matches!(event_type, EventType::DragMove | EventType::Drop)
            && target != receiver
            && let Some(pos) = event.pos()
        {
            let global = self.tree.map_to_global(receiver, pos);
            event.set_pos(self.tree.map_from_global(target, global));
        }
        let res = self.notify_helper(target, event);
        if event_type != EventType::DragMove {
            self.state.drag_target = None;
        }
        res
    }

    fn propagate_touch_begin(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        if event.spontaneous() && self.tree.test_attribute(receiver, WidgetAttributes::ACCEPT_TOUCH_EVENTS) {
            if self.config.focus_on_release {
                self.state.focus_at_press = Some(self.state.focus_widget);
            } else {
                self.give_focus_according_to_policy(receiver, FocusPolicy::CLICK, FocusReason::Mouse);
            }
        }

        let mut event_accepted = event.is_accepted();
        let mut res = false;
        let mut widget = receiver;
        while self.tree.contains(widget) {
            let accepts_touch = self.tree.test_attribute(widget, WidgetAttributes::ACCEPT_TOUCH_EVENTS);
            if let Event::Touch(touch) = event {
                touch.widget = Some(widget);
            }
            event.set_accepted(accepts_touch);
            res = accepts_touch && self.notify_helper(widget, event);
            event_accepted = event.is_accepted();
            event.base_mut().set_spontaneous(false);

            if !self.tree.contains(widget) {
                break;
            }
            let _ = self
                .tree
                .set_attribute(widget, WidgetAttributes::ACCEPTED_TOUCH_BEGIN, res && event_accepted);

            if res && event_accepted {
                if let Event::Touch(touch) = &*event {
                    self.state.touch.grab_points(touch.device.id, touch.points.iter().map(|p| p.id), widget);
                }
                break;
            }
            if self.tree.is_window(widget) || self.tree.test_attribute(widget, WidgetAttributes::NO_MOUSE_PROPAGATION) {
                break;
            }
            let offset = self.tree.pos(widget);
            let Some(parent) = self.tree.parent(widget) else {
                break;
            };
            widget = parent;
            if let Event::Touch(touch) = event {
                touch.widget = Some(widget);
                for point in &mut touch.points {
                    point.translate(offset);
                }
            }
        }
        event.set_accepted(event_accepted);
        res
    }

    fn propagate_native_gesture(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        let mut res;
        let mut widget = receiver;
        loop {
            event.ignore();
            res = self.notify_helper(widget, event);
            if (res && event.is_accepted()) || !self.tree.contains(widget) || self.tree.is_window(widget) {
                break;
            }
            if let Some(pos) = event.pos() {
                event.set_pos(self.tree.map_to_parent(widget, pos));
            }
            match self.tree.parent(widget) {
                Some(parent) => widget = parent,
                None => break,
            }
        }
        res
    }

    /// Hand each gesture to the nearest widget from `receiver` up that is
    /// subscribed to its type. A widget further up only gets a gesture that
    /// is starting, unless it asked for partial gestures. Gestures ignored
    /// by a widget continue upwards.
    ///
    /// On return the event carries the accepted gestures with their target
    /// widgets and the rest marked as ignored; the event's own accept flag is
    /// cleared so that callers look at the individual gestures.
    fn propagate_gesture(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        let event_type = event.event_type();
        let was_accepted = event.is_accepted();
        let spontaneous = event.spontaneous();
        let Some(gesture_event) = event.as_gesture_mut() else {
            return self.notify_helper(receiver, event);
        };
        let mut remaining = gesture_event.take_gestures();
        let mut accepted = Vec::new();
        let mut targets_by_type = Vec::new();

        let mut res = false;
        let mut widget = receiver;
        while self.tree.contains(widget) {
            let (mine, rest): (Vec<_>, Vec<_>) = remaining.into_iter().partition(|entry| {
                self.state
                    .gestures
                    .context_flags(widget, entry.gesture_type)
                    .is_some_and(|flags| {
                        entry.state == GestureState::Started
                            || widget == receiver
                            || flags.has(GestureFlags::RECEIVE_PARTIAL)
                    })
            });
            remaining = rest;

            if !mine.is_empty() {
                let ids: Vec<_> = mine.iter().map(|e| e.id).collect();
                let mut hop = GestureEvent::new(event_type, mine);
                hop.base.set_accepted(was_accepted);
                hop.base.set_spontaneous(spontaneous);
                let mut hop = Event::Gesture(hop);
                res = self.notify_helper(widget, &mut hop);
                event.base_mut().set_spontaneous(false);

                if let Event::Gesture(mut hop) = hop {
                    let hop_accepted = hop.base.is_accepted();
                    for id in ids {
                        if hop_accepted || hop.is_gesture_accepted(id) {
                            hop.set_gesture_accepted(id, true);
                        }
                    }
                    for entry in hop.take_gestures() {
                        if entry.is_accepted() {
                            targets_by_type.push((entry.gesture_type, widget));
                            accepted.push(entry);
                        } else {
                            remaining.push(entry);
                        }
                    }
                }
            }

            if remaining.is_empty() || !self.tree.contains(widget) || self.tree.is_window(widget) {
                break;
            }
            match self.tree.parent(widget) {
                Some(parent) => widget = parent,
                None => break,
            }
        }

        let ignored: Vec<_> = remaining.iter().map(|e| e.id).collect();
        accepted.extend(remaining);
        if let Some(gesture_event) = event.as_gesture_mut() {
            gesture_event.set_gestures(accepted);
            for id in ignored {
                gesture_event.set_gesture_accepted(id, false);
            }
            for (gesture_type, target) in targets_by_type {
                gesture_event.set_target_widget(gesture_type, target);
            }
        }
        event.set_accepted(false);
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::events::{
        DragEvent, KeyEvent, KeyboardModifiers, Key, MouseButton, MouseButtons, MouseEvent, NativeGestureEvent,
        NativeGestureType, TouchDevice, TouchEvent, TouchPoint, TouchPointState,
    };
    use crate::handler::EventContext;
    use horizon_input_core::{Rect, WindowType};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(WidgetId, EventType, Option<Point>)>>>;

    struct Fixture {
        app: Application,
        window: WidgetId,
        outer: WidgetId,
        inner: WidgetId,
        log: Log,
    }

    /// window (0,0 200x200) > outer (10,10) > inner (5,5). Every widget
    /// records what it sees; `accepting` widgets accept, the others ignore.
    fn setup(accepting: &[&str]) -> Fixture {
        let mut app = Application::new(InputConfig::default().with_default_recognizers(false));
        let window = app
            .tree_mut()
            .create_window("window", WindowType::Window, Rect::new(0.0, 0.0, 200.0, 200.0));
        let outer = app
            .tree_mut()
            .create_child(window, "outer", Rect::new(10.0, 10.0, 100.0, 100.0))
            .unwrap();
        let inner = app
            .tree_mut()
            .create_child(outer, "inner", Rect::new(5.0, 5.0, 50.0, 50.0))
            .unwrap();
        app.show(window);
        let log: Log = Rc::default();
        for (id, name) in [(window, "window"), (outer, "outer"), (inner, "inner")] {
            let log = log.clone();
            let accepts = accepting.contains(&name);
            app.set_handler(id, move |ctx: &mut EventContext<'_>, event: &mut Event| {
                log.borrow_mut().push((ctx.widget(), event.event_type(), event.pos()));
                if !accepts {
                    event.ignore();
                }
                true
            });
        }
        Fixture {
            app,
            window,
            outer,
            inner,
            log,
        }
    }

    fn seen(log: &Log, event_type: EventType) -> Vec<(WidgetId, Option<Point>)> {
        log.borrow()
            .iter()
            .filter(|(_, t, _)| *t == event_type)
            .map(|&(w, _, p)| (w, p))
            .collect()
    }

    fn press(pos: (f32, f32)) -> Event {
        MouseEvent::new(
            EventType::MouseButtonPress,
            Point::from(pos),
            Point::from(pos),
            Some(MouseButton::Left),
            MouseButton::Left.into(),
            KeyboardModifiers::NONE,
        )
        .into()
    }

    #[test]
    fn test_mouse_walk_translates_until_accepted() {
        let mut f = setup(&["outer"]);
        let mut event = press((1.0, 2.0));
        assert!(f.app.send_event(f.inner, &mut event));
        assert!(event.is_accepted());
        assert_eq!(
            seen(&f.log, EventType::MouseButtonPress),
            vec![
                (f.inner, Some(Point::new(1.0, 2.0))),
                (f.outer, Some(Point::new(6.0, 7.0))),
            ]
        );
    }

    #[test]
    fn test_mouse_walk_stops_at_no_propagation() {
        let mut f = setup(&[]);
        f.app
            .tree_mut()
            .set_attribute(f.inner, WidgetAttributes::NO_MOUSE_PROPAGATION, true)
            .unwrap();
        let mut event = press((1.0, 1.0));
        f.app.send_event(f.inner, &mut event);
        assert!(!event.is_accepted());
        assert_eq!(seen(&f.log, EventType::MouseButtonPress).len(), 1);

        let mut tip = Event::tool_tip(Point::new(1.0, 1.0), Point::new(16.0, 16.0));
        f.app.send_event(f.inner, &mut tip);
        assert_eq!(seen(&f.log, EventType::ToolTip).len(), 3);
    }

    #[test]
    fn test_tracking_only_move_needs_mouse_tracking() {
        let mut f = setup(&[]);
        let mut event: Event = MouseEvent::new(
            EventType::MouseMove,
            Point::new(1.0, 1.0),
            Point::new(16.0, 16.0),
            None,
            MouseButtons::NONE,
            KeyboardModifiers::NONE,
        )
        .into();
        let mut untracked = event.clone();
        f.app.send_event(f.inner, &mut untracked);
        assert!(seen(&f.log, EventType::MouseMove).is_empty());

        f.app
            .tree_mut()
            .set_attribute(f.inner, WidgetAttributes::MOUSE_TRACKING, true)
            .unwrap();
        f.app.send_event(f.inner, &mut event);
        assert_eq!(seen(&f.log, EventType::MouseMove), vec![(f.inner, Some(Point::new(1.0, 1.0)))]);
    }

    #[test]
    fn test_hover_move_reaches_hover_widgets() {
        let mut f = setup(&["inner"]);
        f.app
            .tree_mut()
            .set_attribute(f.outer, WidgetAttributes::HOVER, true)
            .unwrap();
        f.app
            .tree_mut()
            .set_attribute(f.inner, WidgetAttributes::MOUSE_TRACKING, true)
            .unwrap();
        let mut event: Event = MouseEvent::new(
            EventType::MouseMove,
            Point::new(2.0, 2.0),
            Point::new(17.0, 17.0),
            None,
            MouseButtons::NONE,
            KeyboardModifiers::NONE,
        )
        .into();
        f.app.send_event(f.inner, &mut event);
        assert_eq!(seen(&f.log, EventType::HoverMove), vec![(f.outer, Some(Point::new(7.0, 7.0)))]);
        assert_eq!(f.app.state().hover_global_pos, Point::new(17.0, 17.0));
    }

    #[test]
    fn test_key_walk_resets_accept_and_flags_navigation() {
        let mut f = setup(&["window"]);
        let flag = Rc::new(RefCell::new(false));
        let seen_flag = flag.clone();
        f.app.set_handler(f.outer, move |ctx: &mut EventContext<'_>, event: &mut Event| {
            *seen_flag.borrow_mut() = ctx.state().key_is_focus_navigation();
            event.ignore();
            true
        });
        let mut event: Event = KeyEvent::new(EventType::KeyPress, Key::Tab, KeyboardModifiers::NONE).into();
        assert!(f.app.send_event(f.inner, &mut event));
        assert!(*flag.borrow());
        assert!(!f.app.state().key_is_focus_navigation());
        assert_eq!(
            seen(&f.log, EventType::KeyPress).iter().map(|e| e.0).collect::<Vec<_>>(),
            vec![f.inner, f.window]
        );
    }

    #[test]
    fn test_drag_enter_picks_first_drop_site() {
        let mut f = setup(&["outer"]);
        f.app
            .tree_mut()
            .set_attribute(f.outer, WidgetAttributes::ACCEPT_DROPS, true)
            .unwrap();
        let mut enter: Event = DragEvent::new(EventType::DragEnter, Point::new(1.0, 1.0)).into();
        assert!(f.app.send_event(f.inner, &mut enter));
        assert_eq!(f.app.state().drag_target(), Some(f.outer));
        assert!(f.app.tree().test_attribute(f.outer, WidgetAttributes::UNDER_MOUSE));
        assert_eq!(seen(&f.log, EventType::DragEnter), vec![(f.outer, Some(Point::new(6.0, 6.0)))]);

        let mut drag_move: Event = DragEvent::new(EventType::DragMove, Point::new(2.0, 2.0)).into();
        f.app.send_event(f.inner, &mut drag_move);
        assert_eq!(seen(&f.log, EventType::DragMove), vec![(f.outer, Some(Point::new(7.0, 7.0)))]);
        assert_eq!(f.app.state().drag_target(), Some(f.outer));

        let mut drop: Event = DragEvent::new(EventType::Drop, Point::new(2.0, 2.0)).into();
        f.app.send_event(f.inner, &mut drop);
        assert_eq!(f.app.state().drag_target(), None);

        let mut stray: Event = DragEvent::new(EventType::DragLeave, Point::ZERO).into();
        assert!(!f.app.send_event(f.inner, &mut stray));
    }

    #[test]
    fn test_touch_begin_grabs_points_for_acceptor() {
        let mut f = setup(&["outer"]);
        for w in [f.inner, f.outer] {
            f.app
                .tree_mut()
                .set_attribute(w, WidgetAttributes::ACCEPT_TOUCH_EVENTS, true)
                .unwrap();
        }
        f.app.set_handler(f.inner, |_ctx: &mut EventContext<'_>, event: &mut Event| {
            event.ignore();
            true
        });
        let mut point = TouchPoint::new(7, TouchPointState::Pressed, Point::new(16.0, 16.0));
        point.pos = Point::new(1.0, 1.0);
        let mut event: Event = TouchEvent::new(EventType::TouchBegin, TouchDevice::screen(3), vec![point], 0).into();
        assert!(f.app.send_event(f.inner, &mut event));

        assert_eq!(f.app.state().touch().widget_for_point(3, 7), Some(f.outer));
        assert!(f.app.tree().test_attribute(f.outer, WidgetAttributes::ACCEPTED_TOUCH_BEGIN));
        assert!(!f.app.tree().test_attribute(f.inner, WidgetAttributes::ACCEPTED_TOUCH_BEGIN));
        let touch = event.as_touch().unwrap();
        assert_eq!(touch.widget, Some(f.outer));
        assert_eq!(touch.points[0].pos, Point::new(6.0, 6.0));
    }

    #[test]
    fn test_native_gesture_walk_starts_ignored() {
        let mut f = setup(&[]);
        f.app.set_handler(f.outer, |_ctx: &mut EventContext<'_>, event: &mut Event| {
            event.accept();
            true
        });
        let mut event: Event =
            NativeGestureEvent::new(NativeGestureType::Zoom, Point::new(1.0, 1.0), Point::new(16.0, 16.0), 0.5).into();
        assert!(f.app.send_event(f.inner, &mut event));
        assert!(event.is_accepted());
        assert_eq!(seen(&f.log, EventType::NativeGesture), vec![(f.inner, Some(Point::new(1.0, 1.0)))]);
    }
}
