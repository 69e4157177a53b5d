//! Raw keyboard input.

use horizon_input_core::logging::targets;
use horizon_input_core::WidgetId;

use crate::application::Application;
use crate::events::{Event, EventType, KeyEvent};

impl Application {
    /// Dispatch a raw key event reported by `window`.
    ///
    /// The key goes to the keyboard grabber, else to the active popup's
    /// focus widget (or the popup itself), else to the focus widget, else
    /// to `window`. Keys for disabled widgets and blocked windows are
    /// dropped. Returns whether a widget accepted the key.
    pub fn handle_key(&mut self, window: WidgetId, event: KeyEvent) -> bool {
        if self.state.closing || !self.tree.contains(window) {
            return false;
        }
        let event_type = event.event_type;
        if !matches!(event_type, EventType::KeyPress | EventType::KeyRelease) {
            tracing::warn!(target: targets::DISPATCH, ?event_type, "handle_key with a non-key event");
            return false;
        }

        let receiver = self.key_receiver(window);
        if !self.tree.is_enabled(receiver) {
            tracing::trace!(target: targets::DISPATCH, ?receiver, "key dropped for disabled widget");
            return false;
        }
        let Some(receiver_window) = self.tree.window(receiver) else {
            return false;
        };
        if !self.accepts_raw_input(receiver_window, event_type, Some(receiver)) {
            return false;
        }

        let mut key: Event = event.into();
        self.send_spontaneous_event(receiver, &mut key) && key.is_accepted()
    }

    fn key_receiver(&self, window: WidgetId) -> WidgetId {
        if let Some(grabber) = self.state.keyboard_grabber.filter(|&g| self.tree.contains(g)) {
            return grabber;
        }
        if let Some(popup) = self.state.popups.active().filter(|&p| self.tree.contains(p)) {
            return self.tree.focus_child(popup).unwrap_or(popup);
        }
        self.state
            .focus_widget
            .filter(|&f| self.tree.contains(f))
            .unwrap_or(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::events::{FocusReason, Key, KeyboardModifiers};
    use crate::handler::EventContext;
    use horizon_input_core::{Rect, WindowModality, WindowType};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<WidgetId>>>;

    fn setup() -> (Application, WidgetId, WidgetId, WidgetId, Log) {
        let mut app = Application::new(InputConfig::default().with_default_recognizers(false));
        let window = app
            .tree_mut()
            .create_window("window", WindowType::Window, Rect::new(0.0, 0.0, 100.0, 100.0));
        let field = app
            .tree_mut()
            .create_child(window, "field", Rect::new(0.0, 0.0, 50.0, 20.0))
            .unwrap();
        let menu = app
            .tree_mut()
            .create_window("menu", WindowType::Popup, Rect::new(0.0, 0.0, 30.0, 30.0));
        app.show(window);
        app.activate_window(Some(window));

        let log: Log = Rc::default();
        for w in [window, field, menu] {
            let log = log.clone();
            app.set_handler(w, move |ctx: &mut EventContext<'_>, event: &mut Event| {
                if event.event_type() == EventType::KeyPress {
                    log.borrow_mut().push(ctx.widget());
                    return true;
                }
                false
            });
        }
        (app, window, field, menu, log)
    }

    fn key() -> KeyEvent {
        KeyEvent::new(EventType::KeyPress, Key::Enter, KeyboardModifiers::NONE)
    }

    #[test]
    fn test_key_goes_to_focus_widget_then_window() {
        let (mut app, window, field, _menu, log) = setup();
        assert!(app.handle_key(window, key()));
        app.set_focus(field, FocusReason::Other);
        assert!(app.handle_key(window, key()));
        assert_eq!(*log.borrow(), vec![window, field]);
    }

    #[test]
    fn test_grabber_and_popup_take_precedence() {
        let (mut app, window, field, menu, log) = setup();
        app.set_focus(field, FocusReason::Other);
        app.show(menu);
        app.handle_key(window, key());
        app.grab_keyboard(window);
        app.handle_key(window, key());
        assert_eq!(*log.borrow(), vec![menu, window]);
    }

    #[test]
    fn test_blocked_window_drops_keys() {
        let (mut app, window, _field, _menu, log) = setup();
        let dialog = app
            .tree_mut()
            .create_window("dialog", WindowType::Dialog, Rect::new(0.0, 0.0, 10.0, 10.0));
        app.tree_mut()
            .set_modality(dialog, WindowModality::ApplicationModal)
            .unwrap();
        app.show(dialog);
        app.activate_window(Some(window));
        assert!(!app.handle_key(window, key()));
        assert!(log.borrow().is_empty());
    }
}
