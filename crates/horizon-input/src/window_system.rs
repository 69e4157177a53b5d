//! The platform window layer as seen by the dispatch core.
//!
//! The core never talks to a windowing backend directly. Grabs, cursors and
//! stacking changes go through the [`WindowSystem`] trait, whose methods take
//! the window (or native widget) the change applies to.
//!
//! [`HeadlessWindowSystem`] only records what was asked of it. It is the
//! default for [`Application::new`](crate::Application::new) and what the
//! tests inspect.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use horizon_input_core::{CursorIcon, WidgetId};

/// Operations the dispatch core needs from the platform window layer.
pub trait WindowSystem {
    /// Route all mouse input to `window`.
    fn grab_mouse(&mut self, window: WidgetId);

    /// Release the platform mouse grab.
    fn ungrab_mouse(&mut self);

    /// Route all keyboard input to `window`.
    fn grab_keyboard(&mut self, window: WidgetId);

    /// Release the platform keyboard grab.
    fn ungrab_keyboard(&mut self);

    /// Apply `cursor` to the native widget `native`; `None` restores the
    /// platform default.
    fn set_cursor(&mut self, native: WidgetId, cursor: Option<CursorIcon>);

    /// Bring `window` to the front.
    fn raise(&mut self, window: WidgetId);
}

/// What a [`HeadlessWindowSystem`] has been asked to do.
#[derive(Debug, Default)]
struct Recorded {
    mouse_grab: Option<WidgetId>,
    keyboard_grab: Option<WidgetId>,
    cursors: HashMap<WidgetId, CursorIcon>,
    raised: Vec<WidgetId>,
}

/// A [`WindowSystem`] without a backend.
///
/// Clones share their record, so a clone kept outside the application sees
/// every request the application made.
#[derive(Debug, Default, Clone)]
pub struct HeadlessWindowSystem {
    recorded: Rc<RefCell<Recorded>>,
}

impl HeadlessWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// The window holding the platform mouse grab.
    pub fn mouse_grab(&self) -> Option<WidgetId> {
        self.recorded.borrow().mouse_grab
    }

    /// The window holding the platform keyboard grab.
    pub fn keyboard_grab(&self) -> Option<WidgetId> {
        self.recorded.borrow().keyboard_grab
    }

    /// The cursor last applied to `native`, if it is not the default.
    pub fn cursor(&self, native: WidgetId) -> Option<CursorIcon> {
        self.recorded.borrow().cursors.get(&native).copied()
    }

    /// Windows raised so far, oldest first.
    pub fn raised(&self) -> Vec<WidgetId> {
        self.recorded.borrow().raised.clone()
    }
}

impl WindowSystem for HeadlessWindowSystem {
    fn grab_mouse(&mut self, window: WidgetId) {
        self.recorded.borrow_mut().mouse_grab = Some(window);
    }

    fn ungrab_mouse(&mut self) {
        self.recorded.borrow_mut().mouse_grab = None;
    }

    fn grab_keyboard(&mut self, window: WidgetId) {
        self.recorded.borrow_mut().keyboard_grab = Some(window);
    }

    fn ungrab_keyboard(&mut self) {
        self.recorded.borrow_mut().keyboard_grab = None;
    }

    fn set_cursor(&mut self, native: WidgetId, cursor: Option<CursorIcon>) {
        let mut recorded = self.recorded.borrow_mut();
        match cursor {
            Some(cursor) => {
                recorded.cursors.insert(native, cursor);
            }
            None => {
                recorded.cursors.remove(&native);
            }
        }
    }

    fn raise(&mut self, window: WidgetId) {
        self.recorded.borrow_mut().raised.push(window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_input_core::{Rect, WidgetTree, WindowType};

    #[test]
    fn test_headless_records_grabs_and_cursors() {
        let mut tree = WidgetTree::new();
        let window = tree.create_window("w", WindowType::Window, Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut ws = HeadlessWindowSystem::new();
        let observer = ws.clone();

        ws.grab_mouse(window);
        ws.grab_keyboard(window);
        assert_eq!(observer.mouse_grab(), Some(window));
        assert_eq!(observer.keyboard_grab(), Some(window));
        ws.ungrab_mouse();
        assert_eq!(ws.mouse_grab(), None);

        ws.set_cursor(window, Some(CursorIcon::Pointer));
        assert_eq!(ws.cursor(window), Some(CursorIcon::Pointer));
        ws.set_cursor(window, None);
        assert_eq!(ws.cursor(window), None);

        ws.raise(window);
        assert_eq!(observer.raised(), vec![window]);
    }
}
