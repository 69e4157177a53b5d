//! Explicit mouse and keyboard grabs.
//!
//! At most one widget holds each grab. Grabbing releases the previous
//! holder first. While a popup is open the platform grab belongs to the
//! popup, so widget grabs only update the bookkeeping until the last popup
//! closes and [`Application::restore_platform_grabs`] applies them.

use horizon_input_core::logging::targets;
use horizon_input_core::WidgetId;

use crate::application::Application;

impl Application {
    /// The widget holding the mouse grab.
    pub fn mouse_grabber(&self) -> Option<WidgetId> {
        self.state.mouse_grabber
    }

    /// The widget holding the keyboard grab.
    pub fn keyboard_grabber(&self) -> Option<WidgetId> {
        self.state.keyboard_grabber
    }

    /// Route all mouse input to `widget` until it releases the grab.
    pub fn grab_mouse(&mut self, widget: WidgetId) {
        if !self.tree.contains(widget) {
            tracing::warn!(target: targets::DISPATCH, ?widget, "grab_mouse on an invalid widget");
            return;
        }
        if let Some(previous) = self.state.mouse_grabber
            && previous != widget
        {
            self.release_mouse(previous);
        }
        self.state.mouse_grabber = Some(widget);
        tracing::debug!(target: targets::DISPATCH, ?widget, "mouse grabbed");
        if self.state.popups.is_empty()
            && let Some(window) = self.tree.window(widget)
        {
            self.window_system.grab_mouse(window);
        }
    }

    /// Release the mouse grab if `widget` holds it.
    pub fn release_mouse(&mut self, widget: WidgetId) {
        if self.state.mouse_grabber != Some(widget) {
            return;
        }
        self.state.mouse_grabber = None;
        tracing::debug!(target: targets::DISPATCH, ?widget, "mouse released");
        if self.state.popups.is_empty() {
            self.window_system.ungrab_mouse();
        }
    }

    /// Route all keyboard input to `widget` until it releases the grab.
    pub fn grab_keyboard(&mut self, widget: WidgetId) {
        if !self.tree.contains(widget) {
            tracing::warn!(target: targets::DISPATCH, ?widget, "grab_keyboard on an invalid widget");
            return;
        }
        if let Some(previous) = self.state.keyboard_grabber
            && previous != widget
        {
            self.release_keyboard(previous);
        }
        self.state.keyboard_grabber = Some(widget);
        tracing::debug!(target: targets::DISPATCH, ?widget, "keyboard grabbed");
        if self.state.popups.is_empty()
            && let Some(window) = self.tree.window(widget)
        {
            self.window_system.grab_keyboard(window);
        }
    }

    /// Release the keyboard grab if `widget` holds it.
    pub fn release_keyboard(&mut self, widget: WidgetId) {
        if self.state.keyboard_grabber != Some(widget) {
            return;
        }
        self.state.keyboard_grabber = None;
        tracing::debug!(target: targets::DISPATCH, ?widget, "keyboard released");
        if self.state.popups.is_empty() {
            self.window_system.ungrab_keyboard();
        }
    }

    /// Hand the platform grabs back to the widget grabbers once popup mode
    /// ends.
    pub(crate) fn restore_platform_grabs(&mut self) {
        match self.state.mouse_grabber.and_then(|w| self.tree.window(w)) {
            Some(window) => self.window_system.grab_mouse(window),
            None => self.window_system.ungrab_mouse(),
        }
        match self.state.keyboard_grabber.and_then(|w| self.tree.window(w)) {
            Some(window) => self.window_system.grab_keyboard(window),
            None => self.window_system.ungrab_keyboard(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::window_system::HeadlessWindowSystem;
    use horizon_input_core::{Rect, WindowType};

    fn setup() -> (Application, HeadlessWindowSystem, WidgetId, WidgetId) {
        let ws = HeadlessWindowSystem::new();
        let mut app = Application::with_window_system(
            InputConfig::default().with_default_recognizers(false),
            Box::new(ws.clone()),
        );
        let window = app
            .tree_mut()
            .create_window("window", WindowType::Window, Rect::new(0.0, 0.0, 100.0, 100.0));
        let button = app
            .tree_mut()
            .create_child(window, "button", Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        (app, ws, window, button)
    }

    #[test]
    fn test_grab_is_exclusive() {
        let (mut app, ws, window, button) = setup();
        app.grab_mouse(button);
        app.grab_mouse(window);
        assert_eq!(app.mouse_grabber(), Some(window));
        assert_eq!(ws.mouse_grab(), Some(window));

        app.release_mouse(button);
        assert_eq!(app.mouse_grabber(), Some(window));
        app.release_mouse(window);
        assert_eq!(app.mouse_grabber(), None);
        assert_eq!(ws.mouse_grab(), None);
    }

    #[test]
    fn test_keyboard_grab_platform_window() {
        let (mut app, ws, window, button) = setup();
        app.grab_keyboard(button);
        assert_eq!(app.keyboard_grabber(), Some(button));
        assert_eq!(ws.keyboard_grab(), Some(window));
        app.release_keyboard(button);
        assert_eq!(ws.keyboard_grab(), None);
    }

    #[test]
    fn test_grab_during_popup_waits_for_popup_to_close() {
        let (mut app, ws, window, button) = setup();
        let menu = app
            .tree_mut()
            .create_window("menu", WindowType::Popup, Rect::new(0.0, 0.0, 10.0, 10.0));
        app.show(menu);
        app.grab_keyboard(button);
        assert_eq!(ws.keyboard_grab(), Some(menu));
        app.hide(menu);
        assert_eq!(ws.keyboard_grab(), Some(window));
    }
}
