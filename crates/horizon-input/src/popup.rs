//! The popup stack.
//!
//! Showing a popup window pushes it; the top of the stack is the active
//! popup. While any popup is open the application is in popup mode: mouse
//! input is routed to the active popup, hover only reaches widgets inside
//! it, and the platform grabs are held by the popup rather than by the
//! widget-level grabbers.
//!
//! Closing the last popup restores the grabs and focus that were in place
//! before the first one opened. When the popup was closed by a press outside
//! it, that press is marked for replay so that "click outside to dismiss"
//! also reaches the widget that was clicked.

use horizon_input_core::logging::targets;
use horizon_input_core::{WidgetAttributes, WidgetId};

use crate::application::Application;
use crate::events::{Event, EventType, FocusReason};

/// Upper bound on close attempts in [`Application::close_all_popups`].
const MAX_CLOSE_ATTEMPTS: usize = 1024;

/// Open popups, most recent last.
#[derive(Debug, Clone, Default)]
pub struct PopupStack {
    stack: Vec<WidgetId>,
    /// Number of popups opened so far. A handler that opens a popup while
    /// a press is delivered changes it, which suppresses the synthetic
    /// context menu for that press.
    opened: u64,
}

impl PopupStack {
    /// The active popup.
    pub fn active(&self) -> Option<WidgetId> {
        self.stack.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn contains(&self, popup: WidgetId) -> bool {
        self.stack.contains(&popup)
    }

    /// Open popups from the bottom of the stack to the top.
    pub fn iter(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.stack.iter().copied()
    }

    /// How many popups were ever opened.
    pub fn opened_count(&self) -> u64 {
        self.opened
    }

    pub(crate) fn push(&mut self, popup: WidgetId) {
        self.stack.retain(|&p| p != popup);
        self.stack.push(popup);
        self.opened += 1;
    }

    pub(crate) fn remove(&mut self, popup: WidgetId) -> bool {
        let before = self.stack.len();
        self.stack.retain(|&p| p != popup);
        self.stack.len() != before
    }
}

impl Application {
    /// The popup on top of the popup stack.
    pub fn active_popup(&self) -> Option<WidgetId> {
        self.state.popups.active()
    }

    /// Whether any popup is open.
    pub fn in_popup_mode(&self) -> bool {
        !self.state.popups.is_empty()
    }

    /// Push `popup` on the popup stack.
    ///
    /// The first popup takes the platform mouse and keyboard grab. Focus
    /// moves to the popup's focus child; a popup without one leaves the
    /// focus widget in place but sends it FocusOut.
    pub fn open_popup(&mut self, popup: WidgetId) {
        if !self.tree.contains(popup) {
            tracing::warn!(target: targets::POPUP, ?popup, "open_popup on an invalid widget");
            return;
        }
        self.state.popups.push(popup);
        let first = self.state.popups.len() == 1;
        tracing::debug!(target: targets::POPUP, ?popup, depth = self.state.popups.len(), "popup opened");

        if first {
            self.window_system.grab_keyboard(popup);
            self.window_system.grab_mouse(popup);
        }

        if let Some(focus_child) = self.tree.focus_child(popup) {
            self.set_focus(focus_child, FocusReason::Popup);
        } else if first
            && let Some(focus) = self.state.focus_widget
            && self.tree.contains(focus)
        {
            self.send_event(focus, &mut Event::focus(EventType::FocusOut, FocusReason::Popup));
        }
    }

    /// Remove `popup` from the popup stack, wherever it is.
    pub fn close_popup(&mut self, popup: WidgetId) {
        if !self.state.popups.remove(popup) {
            return;
        }
        tracing::debug!(target: targets::POPUP, ?popup, depth = self.state.popups.len(), "popup closed");
        if self.state.popup_down == Some(popup) {
            self.state.button_down = None;
            self.state.popup_down = None;
        }

        match self.state.popups.active() {
            None => {
                let inside = self.tree.geometry(popup).contains(self.state.last_press_global);
                self.state.replay_mouse_press =
                    !(inside || self.tree.test_attribute(popup, WidgetAttributes::NO_MOUSE_REPLAY));
                self.restore_platform_grabs();

                if let Some(active) = self.state.active_window.filter(|&w| self.tree.contains(w))
                    && let Some(focus_child) = self.tree.focus_child(active)
                {
                    if self.state.focus_widget != Some(focus_child) {
                        self.set_focus(focus_child, FocusReason::Popup);
                    } else {
                        self.send_event(focus_child, &mut Event::focus(EventType::FocusIn, FocusReason::Popup));
                    }
                }
            }
            Some(top) => {
                if let Some(focus_child) = self.tree.focus_child(top) {
                    self.set_focus(focus_child, FocusReason::Popup);
                }
                if self.state.popups.active() == Some(top) {
                    self.window_system.grab_keyboard(top);
                    self.window_system.grab_mouse(top);
                }
            }
        }
    }

    /// Close popups from the top until none is left. A popup that refuses
    /// to close is retried, up to a fixed number of attempts.
    pub fn close_all_popups(&mut self) {
        let mut attempts = 0;
        while let Some(popup) = self.state.popups.active() {
            if attempts == MAX_CLOSE_ATTEMPTS {
                tracing::warn!(target: targets::POPUP, ?popup, "popup refused to close, giving up");
                return;
            }
            attempts += 1;
            self.close(popup);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::handler::EventContext;
    use crate::window_system::HeadlessWindowSystem;
    use horizon_input_core::{Point, Rect, WindowType};

    fn setup() -> (Application, HeadlessWindowSystem, WidgetId, WidgetId, WidgetId) {
        let ws = HeadlessWindowSystem::new();
        let mut app = Application::with_window_system(
            InputConfig::default().with_default_recognizers(false),
            Box::new(ws.clone()),
        );
        let window = app
            .tree_mut()
            .create_window("window", WindowType::Window, Rect::new(0.0, 0.0, 300.0, 300.0));
        let menu = app
            .tree_mut()
            .create_window("menu", WindowType::Popup, Rect::new(10.0, 10.0, 50.0, 80.0));
        let submenu = app
            .tree_mut()
            .create_window("submenu", WindowType::Popup, Rect::new(60.0, 10.0, 50.0, 80.0));
        app.show(window);
        app.activate_window(Some(window));
        (app, ws, window, menu, submenu)
    }

    #[test]
    fn test_stack_is_lifo_and_restores_grabs() {
        let (mut app, ws, window, menu, submenu) = setup();
        app.grab_mouse(window);
        assert_eq!(ws.mouse_grab(), Some(window));

        app.show(menu);
        app.show(submenu);
        assert_eq!(app.active_popup(), Some(submenu));
        assert_eq!(ws.mouse_grab(), Some(menu));
        assert_eq!(app.state().mouse_grabber(), Some(window));

        app.hide(submenu);
        assert_eq!(app.active_popup(), Some(menu));
        assert_eq!(ws.mouse_grab(), Some(menu));

        app.hide(menu);
        assert!(!app.in_popup_mode());
        assert_eq!(ws.mouse_grab(), Some(window));
        assert_eq!(ws.keyboard_grab(), None);
        assert_eq!(app.state().popups().opened_count(), 2);
    }

    #[test]
    fn test_close_popup_anywhere_in_stack() {
        let (mut app, _ws, _window, menu, submenu) = setup();
        app.show(menu);
        app.show(submenu);
        app.close_popup(menu);
        assert_eq!(app.state().popups().iter().collect::<Vec<_>>(), vec![submenu]);
    }

    #[test]
    fn test_replay_only_for_press_outside() {
        let (mut app, _ws, _window, menu, _submenu) = setup();
        app.show(menu);
        app.state.last_press_global = Point::new(200.0, 200.0);
        app.hide(menu);
        assert!(app.state.replay_mouse_press);

        app.show(menu);
        app.state.last_press_global = Point::new(20.0, 20.0);
        app.hide(menu);
        assert!(!app.state.replay_mouse_press);

        app.show(menu);
        app.tree_mut()
            .set_attribute(menu, WidgetAttributes::NO_MOUSE_REPLAY, true)
            .unwrap();
        app.state.last_press_global = Point::new(200.0, 200.0);
        app.hide(menu);
        assert!(!app.state.replay_mouse_press);
    }

    #[test]
    fn test_popup_focus_round_trip() {
        let (mut app, _ws, window, menu, _submenu) = setup();
        let field = app
            .tree_mut()
            .create_child(window, "field", Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        let item = app
            .tree_mut()
            .create_child(menu, "item", Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        app.set_focus(field, FocusReason::Other);
        app.tree_mut().set_focus_child_chain(item);

        app.show(menu);
        assert_eq!(app.focus_widget(), Some(item));
        app.hide(menu);
        assert_eq!(app.focus_widget(), Some(field));
    }

    #[test]
    fn test_close_all_popups_is_bounded() {
        let (mut app, _ws, _window, menu, _submenu) = setup();
        let attempts = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = attempts.clone();
        app.set_handler(menu, move |_ctx: &mut EventContext<'_>, event: &mut Event| {
            if event.event_type() == EventType::Close {
                counter.set(counter.get() + 1);
                event.ignore();
            }
            true
        });
        app.show(menu);
        app.close_all_popups();
        assert_eq!(attempts.get(), MAX_CLOSE_ATTEMPTS);
        assert_eq!(app.active_popup(), Some(menu));
    }

    #[test]
    fn test_application_deactivate_closes_popups() {
        let (mut app, _ws, _window, menu, submenu) = setup();
        app.show(menu);
        app.show(submenu);
        app.activate_window(None);
        assert!(!app.in_popup_mode());
        assert!(!app.tree().is_visible(menu));
    }
}
