//! Raw pointer input.
//!
//! The `handle_*` entry points take pointer input as the window system
//! reports it: bound to a window, positions in that window's coordinates.
//! They pick the receiving widget and hand a spontaneous event to
//! [`Application::notify`].
//!
//! While a popup is open, mouse input goes to the active popup no matter
//! which window reported it. The widget under a press inside the popup
//! keeps receiving the mouse until the release. When a press outside the
//! popup closes the last popup, the press is replayed to the widget under
//! the pointer.
//!
//! Outside popup mode the receiver is the mouse grabber, else the widget
//! that took the press, else the widget under the pointer. Crossing from
//! one alien widget to another generates Enter and Leave here, since the
//! window system only reports crossings of native windows.

use horizon_input_core::logging::targets;
use horizon_input_core::{Point, WidgetId};

use crate::application::Application;
use crate::events::{
    ContextMenuEvent, ContextMenuReason, DragEvent, Event, EventBase, EventType, MouseButton, MouseButtons, MouseEvent,
    NativeGestureEvent, TabletEvent, WheelEvent,
};

impl Application {
    /// Dispatch a raw mouse event reported by `window`.
    ///
    /// Returns whether a widget handled the event.
    pub fn handle_mouse(&mut self, window: WidgetId, event: MouseEvent) -> bool {
        if self.state.closing || !self.tree.contains(window) {
            return false;
        }
        let event_type = event.event_type;
        if !event_type.is_mouse() {
            tracing::warn!(target: targets::DISPATCH, ?event_type, "handle_mouse with a non-mouse event");
            return false;
        }
        self.state.cursor_pos = event.global_pos;
        if matches!(event_type, EventType::MouseButtonPress | EventType::MouseButtonDblClick) {
            self.state.last_press_global = event.global_pos;
        }

        if self.state.popups.active().is_some() {
            return self.handle_popup_mouse(window, event);
        }

        let hit = self.tree.child_at(window, event.pos);
        if !self.accepts_raw_input(window, event_type, hit) {
            return false;
        }
        if event_type == EventType::MouseMove && event.buttons.is_empty() {
            self.state.button_down = None;
        }

        let mut pos = event.pos;
        let Some(receiver) = self.pick_mouse_receiver(window, event.global_pos, &mut pos, event_type, event.buttons, hit)
        else {
            if event_type == EventType::MouseButtonRelease
                && let Some(button) = event.button
            {
                self.state.mouse_buttons = self.state.mouse_buttons.without(button);
            }
            return false;
        };

        let opened_before = self.state.popups.opened_count();
        let global_pos = event.global_pos;
        let modifiers = event.modifiers;
        let is_right_press = event_type == EventType::MouseButtonPress && event.button == Some(MouseButton::Right);
        let mut mouse = event;
        mouse.pos = pos;
        let res = self.send_mouse_event(receiver, Event::Mouse(mouse), hit, window);

        if is_right_press
            && self.state.popups.opened_count() == opened_before
            && self.tree.contains(receiver)
        {
            let mut menu: Event = ContextMenuEvent::new(ContextMenuReason::Mouse, pos, global_pos, modifiers).into();
            self.send_spontaneous_event(receiver, &mut menu);
        }

        if event_type == EventType::MouseButtonPress && self.state.button_down.is_none() {
            self.state.button_down = hit.or(Some(window)).filter(|&w| self.tree.contains(w));
        }
        res
    }

    /// Mouse input while a popup is open. Positions are taken relative to
    /// the active popup, whichever window reported them.
    fn handle_popup_mouse(&mut self, window: WidgetId, event: MouseEvent) -> bool {
        let Some(popup) = self.state.popups.active() else {
            return false;
        };
        let event_type = event.event_type;
        let global_pos = event.global_pos;
        let pos = if popup == window {
            event.pos
        } else {
            self.tree.map_from_global(popup, global_pos)
        };
        let popup_child = self.tree.child_at(popup, pos);

        if self.state.popup_down != Some(popup) {
            self.state.button_down = None;
            self.state.popup_down = None;
        }
        let mut release_after = false;
        match event_type {
            EventType::MouseButtonPress | EventType::MouseButtonDblClick => {
                self.state.button_down = popup_child;
                self.state.popup_down = Some(popup);
            }
            EventType::MouseButtonRelease => release_after = true,
            _ => {}
        }

        let opened_before = self.state.popups.opened_count();
        let target = self.state.button_down.or(popup_child).unwrap_or(popup);
        let mut res = false;
        if self.tree.is_enabled(popup) {
            self.state.replay_mouse_press = false;
            let mut mouse = event.clone();
            mouse.pos = if target == popup {
                pos
            } else {
                self.tree.map_from_global(target, global_pos)
            };
            res = self.send_mouse_event(target, Event::Mouse(mouse), popup_child, popup);
        } else if event_type.is_mouse_button() {
            tracing::debug!(target: targets::POPUP, ?popup, "closing disabled popup");
            self.close(popup);
        }

        if self.state.popups.active() != Some(popup) && self.state.replay_mouse_press {
            self.state.replay_mouse_press = false;
            self.state.button_down = None;
            self.state.popup_down = None;
            if matches!(event_type, EventType::MouseButtonPress | EventType::MouseButtonDblClick) {
                self.replay_mouse_press(event);
            }
        } else if event_type == EventType::MouseButtonPress
            && event.button == Some(MouseButton::Right)
            && self.state.popups.opened_count() == opened_before
            && self.tree.contains(target)
        {
            let local = self.tree.map_from_global(target, global_pos);
            let mut menu: Event =
                ContextMenuEvent::new(ContextMenuReason::Mouse, local, global_pos, event.modifiers).into();
            self.send_spontaneous_event(target, &mut menu);
        }

        if release_after {
            self.state.button_down = None;
            self.state.popup_down = None;
        }
        res
    }

    /// Deliver a press that closed the last popup to the widget under the
    /// pointer, as if the popup had never been there.
    fn replay_mouse_press(&mut self, event: MouseEvent) {
        let global_pos = event.global_pos;
        let Some(widget) = self.tree.widget_at(global_pos) else {
            return;
        };
        if self.is_window_blocked(widget) {
            return;
        }
        let Some(window) = self.tree.window(widget) else {
            return;
        };
        tracing::debug!(target: targets::POPUP, ?widget, ?global_pos, "replaying mouse press");
        if self.state.active_window != Some(window) {
            self.activate_window(Some(window));
        }
        let mut replay = event;
        replay.base = EventBase::new();
        replay.pos = self.tree.map_from_global(window, global_pos);
        self.handle_mouse(window, replay);
    }

    /// The widget that receives mouse input hit-testing to `candidate`, or
    /// `None` if the input should be dropped. `pos` is rewritten into the
    /// receiver's coordinates when the receiver differs from the candidate.
    pub(crate) fn pick_mouse_receiver(
        &self,
        candidate: WidgetId,
        global_pos: Point,
        pos: &mut Point,
        event_type: EventType,
        buttons: MouseButtons,
        alien: Option<WidgetId>,
    ) -> Option<WidgetId> {
        let grabber = self.state.mouse_grabber.filter(|&g| self.tree.contains(g));
        let button_down = self.state.button_down.filter(|&b| self.tree.contains(b));
        let needs_press = (event_type == EventType::MouseMove && !buttons.is_empty())
            || event_type == EventType::MouseButtonRelease;
        if needs_press && button_down.is_none() && grabber.is_none() {
            return None;
        }

        let alien = alien.filter(|&a| self.tree.is_alien(a));
        let grabber = grabber
            .or_else(|| button_down.filter(|&b| !self.is_window_blocked(b)))
            .or(alien);
        match grabber {
            Some(grabber) if grabber != candidate => {
                *pos = self.tree.map_from_global(grabber, global_pos);
                Some(grabber)
            }
            _ => Some(candidate),
        }
    }

    /// Send a spontaneous mouse event to `receiver` and keep the crossing
    /// bookkeeping in step: enter/leave between alien widgets, a leave
    /// deferred until the button is released, and the last mouse receiver.
    pub(crate) fn send_mouse_event(
        &mut self,
        receiver: WidgetId,
        mut event: Event,
        alien: Option<WidgetId>,
        native: WidgetId,
    ) -> bool {
        let Some((event_type, buttons, global_pos)) = event.as_mouse().map(|m| (m.event_type, m.buttons, m.global_pos))
        else {
            return self.send_spontaneous_event(receiver, &mut event);
        };
        let alien = alien.filter(|&a| self.tree.contains(a) && self.tree.is_alien(a));
        let in_popup_mode = self.state.popups.active().is_some();
        let final_release = event_type == EventType::MouseButtonRelease && buttons.is_empty();

        if let Some(down) = self.state.button_down {
            if (alien.is_some() || self.tree.is_alien(receiver))
                && self.state.leave_after_release.is_none()
                && self.state.mouse_grabber.is_none()
            {
                self.state.leave_after_release = Some(down);
            }
            if final_release {
                self.state.button_down = None;
            }
        } else if let Some(last) = self.state.last_mouse_receiver.filter(|&l| self.tree.contains(l)) {
            let crossed = alien.is_some_and(|a| a != last) || (self.tree.is_alien(last) && alien.is_none());
            if crossed {
                if !in_popup_mode {
                    self.dispatch_enter_leave(Some(receiver), Some(last));
                } else if self.state.mouse_grabber.is_none() {
                    self.dispatch_enter_leave(alien.or(Some(native)), Some(last));
                }
            }
        }

        let had_leave_after_release = self.state.leave_after_release.is_some();
        let res = self.send_spontaneous_event(receiver, &mut event);

        if let Some(leave) = self.state.leave_after_release
            && final_release
            && self.state.mouse_grabber != Some(leave)
        {
            let enter = if self.tree.contains(native) {
                alien.filter(|&a| self.tree.contains(a)).or(Some(native))
            } else {
                self.tree.widget_at(global_pos)
            };
            self.dispatch_enter_leave(enter, Some(leave));
            self.state.leave_after_release = None;
            self.state.last_mouse_receiver = enter;
        } else if !had_leave_after_release {
            if !in_popup_mode {
                self.state.last_mouse_receiver = if self.tree.contains(receiver) {
                    Some(receiver)
                } else {
                    self.tree.widget_at(global_pos)
                };
            } else if self.state.mouse_grabber.is_none() {
                self.state.last_mouse_receiver = alien
                    .filter(|&a| self.tree.contains(a))
                    .or(Some(native).filter(|&n| self.tree.contains(n)));
            }
        }
        res
    }

    /// Dispatch a raw wheel event reported by `window`.
    ///
    /// The widget under the pointer gets the wheel first; if nobody handles
    /// it, the focus widget is offered it too. While a popup is open the hit
    /// test happens in the popup.
    pub fn handle_wheel(&mut self, window: WidgetId, event: WheelEvent) -> bool {
        if self.state.closing || !self.tree.contains(window) {
            return false;
        }
        let global_pos = event.global_pos;
        self.state.cursor_pos = global_pos;
        let target_window = self.state.popups.active().unwrap_or(window);
        let window_pos = if target_window == window {
            event.pos
        } else {
            self.tree.map_from_global(target_window, global_pos)
        };
        let hit = self.tree.child_at(target_window, window_pos);
        if !self.accepts_raw_input(target_window, EventType::Wheel, hit) {
            return false;
        }

        let widget = hit.unwrap_or(target_window);
        let mut wheel = event.clone();
        wheel.pos = self.tree.map_from_global(widget, global_pos);
        let mut first: Event = wheel.into();
        let res = self.send_spontaneous_event(widget, &mut first);
        if res && first.is_accepted() {
            return true;
        }

        match self.state.focus_widget.filter(|&f| f != widget && self.tree.contains(f)) {
            Some(focus) => {
                let mut wheel = event;
                wheel.pos = self.tree.map_from_global(focus, global_pos);
                let mut second: Event = wheel.into();
                self.send_spontaneous_event(focus, &mut second) && second.is_accepted()
            }
            None => res && first.is_accepted(),
        }
    }

    /// Dispatch a raw tablet event reported by `window`.
    pub fn handle_tablet(&mut self, window: WidgetId, event: TabletEvent) -> bool {
        if self.state.closing || !self.tree.contains(window) {
            return false;
        }
        let Some((widget, pos)) = self.pointer_target(window, event.event_type, event.pos, event.global_pos) else {
            return false;
        };
        let mut tablet = event;
        tablet.pos = pos;
        let mut tablet: Event = tablet.into();
        self.send_spontaneous_event(widget, &mut tablet) && tablet.is_accepted()
    }

    /// Dispatch a context menu request reported by `window`. A keyboard
    /// request goes to the focus widget, a mouse request to the widget
    /// under the pointer.
    pub fn handle_context_menu(&mut self, window: WidgetId, event: ContextMenuEvent) -> bool {
        if self.state.closing || !self.tree.contains(window) {
            return false;
        }
        let keyboard_target = self
            .state
            .focus_widget
            .filter(|&f| event.reason == ContextMenuReason::Keyboard && self.tree.contains(f));
        let (widget, pos) = match keyboard_target {
            Some(focus) => {
                if !self.accepts_raw_input(window, EventType::ContextMenu, Some(focus)) {
                    return false;
                }
                (focus, self.tree.map_from_global(focus, event.global_pos))
            }
            None => match self.pointer_target(window, EventType::ContextMenu, event.pos, event.global_pos) {
                Some(target) => target,
                None => return false,
            },
        };
        let mut menu = event;
        menu.pos = pos;
        let mut menu: Event = menu.into();
        self.send_spontaneous_event(widget, &mut menu) && menu.is_accepted()
    }

    /// Dispatch a gesture recognized by the operating system.
    pub fn handle_native_gesture(&mut self, window: WidgetId, event: NativeGestureEvent) -> bool {
        if self.state.closing || !self.tree.contains(window) {
            return false;
        }
        let Some((widget, pos)) = self.pointer_target(window, EventType::NativeGesture, event.pos, event.global_pos)
        else {
            return false;
        };
        let mut gesture = event;
        gesture.pos = pos;
        let mut gesture: Event = gesture.into();
        self.send_spontaneous_event(widget, &mut gesture) && gesture.is_accepted()
    }

    /// Hit test positional input in `window` and check it against the modal
    /// list. Returns the widget under `pos` (or the window) and the position
    /// in its coordinates.
    fn pointer_target(
        &mut self,
        window: WidgetId,
        event_type: EventType,
        pos: Point,
        global_pos: Point,
    ) -> Option<(WidgetId, Point)> {
        self.state.cursor_pos = global_pos;
        let hit = self.tree.child_at(window, pos);
        if !self.accepts_raw_input(window, event_type, hit) {
            return None;
        }
        let widget = hit.unwrap_or(window);
        Some((widget, self.tree.map_from_global(widget, global_pos)))
    }

    /// Dispatch a drag-and-drop event reported by `window`, `pos` in window
    /// coordinates.
    ///
    /// DragEnter looks for a drop site from the widget under the pointer
    /// up. A move that crosses into another widget while no drop site is
    /// recorded starts over with a fresh DragEnter. DragMove, DragLeave and
    /// Drop go to the recorded drop site.
    pub fn handle_drag(&mut self, window: WidgetId, event: DragEvent) -> bool {
        if self.state.closing || !self.tree.contains(window) {
            return false;
        }
        let event_type = event.event_type;
        let widget = self.tree.child_at(window, event.pos).unwrap_or(window);
        let local = self.tree.map_from_global(widget, self.tree.map_to_global(window, event.pos));
        let mut drag = event;
        drag.pos = local;

        match event_type {
            EventType::DragEnter => {
                self.state.drag_target = None;
                let mut enter: Event = drag.into();
                self.send_spontaneous_event(widget, &mut enter) && enter.is_accepted()
            }
            EventType::DragMove => {
                if self.state.drag_target.is_none() {
                    let mut enter = drag.clone();
                    enter.event_type = EventType::DragEnter;
                    let mut enter: Event = enter.into();
                    if !self.send_spontaneous_event(widget, &mut enter) || !enter.is_accepted() {
                        return false;
                    }
                }
                let mut moved: Event = drag.into();
                self.send_spontaneous_event(widget, &mut moved) && moved.is_accepted()
            }
            EventType::DragLeave | EventType::Drop => {
                let mut last: Event = drag.into();
                self.send_spontaneous_event(widget, &mut last) && last.is_accepted()
            }
            other => {
                tracing::warn!(target: targets::DISPATCH, event_type = ?other, "handle_drag with a non-drag event");
                false
            }
        }
    }
}
