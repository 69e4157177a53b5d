//! Enter and leave dispatch, hover enter/leave and the platform cursor.

use horizon_input_core::logging::{span_names, targets};
use horizon_input_core::{CursorIcon, PerfSpan, Point, WidgetAttributes, WidgetId};

use crate::application::Application;
use crate::events::{Event, EventType};

impl Application {
    /// Send Leave to the widgets the pointer left and Enter to the widgets
    /// it entered.
    ///
    /// Within one window only the parts of the two chains below their
    /// nearest common ancestor change; across windows each whole chain up to
    /// its window does. Leaves go innermost first and enters outermost
    /// first. While a modal window is open, blocked widgets are skipped.
    pub fn dispatch_enter_leave(&mut self, enter: Option<WidgetId>, leave: Option<WidgetId>) {
        let enter = enter.filter(|&w| self.tree.contains(w));
        let leave = leave.filter(|&w| self.tree.contains(w));
        if enter == leave {
            return;
        }
        let _perf = PerfSpan::new(span_names::ENTER_LEAVE);
        let (leave_list, enter_list) = self.enter_leave_chains(enter, leave);
        tracing::trace!(target: targets::DISPATCH, ?enter, ?leave, leaving = leave_list.len(), entering = enter_list.len(), "enter/leave");

        let hover_global = self.state.hover_global_pos;
        let cursor = self.state.cursor_pos;
        for &w in &leave_list {
            if !self.tree.contains(w) || !self.passes_modal(w) {
                continue;
            }
            if self.state.leave_after_release == Some(w) {
                self.state.leave_after_release = None;
            }
            self.send_event(w, &mut Event::basic(EventType::Leave));
            if self.wants_hover_event(w) {
                let old = self.tree.map_from_global(w, hover_global);
                self.notify_helper(w, &mut Event::hover(EventType::HoverLeave, None, Some(old)));
            }
        }
        for &w in &enter_list {
            if !self.tree.contains(w) || !self.passes_modal(w) {
                continue;
            }
            let pos = self.tree.map_from_global(w, cursor);
            self.send_event(w, &mut Event::enter(pos, cursor));
            if self.wants_hover_event(w) {
                let pos = self.tree.map_from_global(w, cursor);
                self.notify_helper(w, &mut Event::hover(EventType::HoverEnter, Some(pos), None));
            }
        }

        self.update_cursor_after_crossing(enter, &leave_list);
    }

    /// The widgets to notify of a leave (innermost first) and of an enter
    /// (outermost first).
    fn enter_leave_chains(&self, enter: Option<WidgetId>, leave: Option<WidgetId>) -> (Vec<WidgetId>, Vec<WidgetId>) {
        let chain_to_window = |start: WidgetId| {
            let mut chain = vec![start];
            let mut w = start;
            while !self.tree.is_window(w)
                && let Some(parent) = self.tree.parent(w)
            {
                chain.push(parent);
                w = parent;
            }
            chain
        };

        let same_window = match (enter, leave) {
            (Some(e), Some(l)) => self.tree.window(e) == self.tree.window(l),
            _ => false,
        };
        if !same_window {
            let leave_list = leave.map(chain_to_window).unwrap_or_default();
            let mut enter_list = enter.map(chain_to_window).unwrap_or_default();
            enter_list.reverse();
            return (leave_list, enter_list);
        }

        let (Some(enter), Some(leave)) = (enter, leave) else {
            return (Vec::new(), Vec::new());
        };
        let enter_chain = chain_to_window(enter);
        let leave_chain = chain_to_window(leave);
        let common = enter_chain.iter().copied().find(|w| leave_chain.contains(w));

        let leave_list: Vec<_> = leave_chain.into_iter().take_while(|&w| Some(w) != common).collect();
        let mut enter_list: Vec<_> = enter_chain.into_iter().take_while(|&w| Some(w) != common).collect();
        enter_list.reverse();
        (leave_list, enter_list)
    }

    fn passes_modal(&self, widget: WidgetId) -> bool {
        self.state.modals.is_empty() || self.try_modal(widget)
    }

    fn wants_hover_event(&self, widget: WidgetId) -> bool {
        self.tree.contains(widget)
            && self.tree.test_attribute(widget, WidgetAttributes::HOVER)
            && self.is_hover_eligible(widget)
    }

    /// Only native widgets own a platform cursor. Leaving an alien widget
    /// with its own cursor resets the cursor of its native parent, and
    /// entering an alien widget applies the cursor it should show.
    fn update_cursor_after_crossing(&mut self, enter: Option<WidgetId>, leave_list: &[WidgetId]) {
        let enter_on_alien = enter.is_some_and(|e| self.tree.is_alien(e));

        let mut parent_of_leaving_cursor = None;
        for &w in leave_list {
            if !self.tree.is_alien(w) {
                break;
            }
            if self.tree.test_attribute(w, WidgetAttributes::SET_CURSOR) {
                parent_of_leaving_cursor = self.tree.parent(w);
            }
        }
        if let Some(parent) = parent_of_leaving_cursor.filter(|&p| self.tree.contains(p)) {
            let same_native = enter_on_alien
                && enter.and_then(|e| self.tree.effective_native(e)) == self.tree.effective_native(parent);
            if !same_native {
                self.enforce_cursor(parent);
            }
        }

        if let Some(mut cursor_widget) = enter.filter(|_| enter_on_alien) {
            while !self.tree.is_window(cursor_widget) && !self.tree.is_enabled(cursor_widget) {
                match self.tree.parent(cursor_widget) {
                    Some(parent) => cursor_widget = parent,
                    None => break,
                }
            }
            self.enforce_cursor(cursor_widget);
        }
    }

    /// The cursor `widget` shows: its own, else the nearest ancestor's in
    /// the same window. Disabled widgets show their ancestors' cursor.
    pub fn effective_cursor(&self, widget: WidgetId) -> Option<CursorIcon> {
        let mut w = widget;
        loop {
            if !self.tree.contains(w) {
                return None;
            }
            if self.tree.is_enabled(w)
                && let Some(cursor) = self.tree.cursor(w)
            {
                return Some(cursor);
            }
            if self.tree.is_window(w) {
                return None;
            }
            w = self.tree.parent(w)?;
        }
    }

    /// Apply the cursor of `widget` to the native window backing it.
    fn enforce_cursor(&mut self, widget: WidgetId) {
        let Some(native) = self.tree.effective_native(widget) else {
            return;
        };
        let cursor = self.effective_cursor(widget);
        tracing::trace!(target: targets::DISPATCH, ?widget, ?native, ?cursor, "cursor applied");
        self.window_system.set_cursor(native, cursor);
    }

    /// The pointer entered `window` at the global position `global_pos`.
    ///
    /// Ignored while a button is held or the mouse is grabbed, and for
    /// blocked windows.
    pub fn handle_enter(&mut self, window: WidgetId, global_pos: Point) {
        if self.state.closing || !self.tree.contains(window) {
            return;
        }
        if !self.accepts_raw_input(window, EventType::Enter, None) {
            return;
        }
        self.state.cursor_pos = global_pos;
        if self.state.button_down.is_some() || self.state.mouse_grabber.is_some() {
            return;
        }
        let local = self.tree.map_from_global(window, global_pos);
        let enter = self.tree.child_at(window, local).unwrap_or(window);
        let leave = self.state.last_mouse_receiver;
        self.dispatch_enter_leave(Some(enter), leave);
        self.state.last_mouse_receiver = Some(enter).filter(|&w| self.tree.contains(w));
    }

    /// The pointer left `window`. While a button is held the leave is
    /// deferred until the release.
    pub fn handle_leave(&mut self, window: WidgetId) {
        if self.state.closing || !self.tree.contains(window) {
            return;
        }
        if !self.accepts_raw_input(window, EventType::Leave, None) {
            return;
        }
        let Some(leave) = self
            .state
            .last_mouse_receiver
            .filter(|&w| self.tree.window(w) == Some(window))
        else {
            return;
        };
        if self.state.button_down.is_some() {
            self.state.leave_after_release = Some(leave);
            return;
        }
        self.dispatch_enter_leave(None, Some(leave));
        self.state.last_mouse_receiver = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::handler::EventContext;
    use crate::window_system::HeadlessWindowSystem;
    use horizon_input_core::{Rect, WindowType};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(WidgetId, EventType)>>>;

    struct Fixture {
        app: Application,
        ws: HeadlessWindowSystem,
        window: WidgetId,
        panel: WidgetId,
        left: WidgetId,
        right: WidgetId,
        log: Log,
    }

    /// window > panel > {left, right}
    fn setup() -> Fixture {
        let ws = HeadlessWindowSystem::new();
        let mut app = Application::with_window_system(
            InputConfig::default().with_default_recognizers(false),
            Box::new(ws.clone()),
        );
        let window = app
            .tree_mut()
            .create_window("window", WindowType::Window, Rect::new(0.0, 0.0, 200.0, 200.0));
        let panel = app
            .tree_mut()
            .create_child(window, "panel", Rect::new(0.0, 0.0, 200.0, 100.0))
            .unwrap();
        let left = app
            .tree_mut()
            .create_child(panel, "left", Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        let right = app
            .tree_mut()
            .create_child(panel, "right", Rect::new(100.0, 0.0, 100.0, 100.0))
            .unwrap();
        app.show(window);
        let log: Log = Rc::default();
        for w in [window, panel, left, right] {
            let log = log.clone();
            app.set_handler(w, move |ctx: &mut EventContext<'_>, event: &mut Event| {
                if matches!(
                    event.event_type(),
                    EventType::Enter | EventType::Leave | EventType::HoverEnter | EventType::HoverLeave
                ) {
                    log.borrow_mut().push((ctx.widget(), event.event_type()));
                }
                true
            });
        }
        Fixture {
            app,
            ws,
            window,
            panel,
            left,
            right,
            log,
        }
    }

    #[test]
    fn test_same_window_notifies_divergent_chains_only() {
        let mut f = setup();
        f.app.dispatch_enter_leave(Some(f.right), Some(f.left));
        assert_eq!(*f.log.borrow(), vec![(f.left, EventType::Leave), (f.right, EventType::Enter)]);
        assert!(f.app.tree().test_attribute(f.right, WidgetAttributes::UNDER_MOUSE));
        assert!(!f.app.tree().test_attribute(f.left, WidgetAttributes::UNDER_MOUSE));

        f.log.borrow_mut().clear();
        f.app.dispatch_enter_leave(Some(f.panel), Some(f.right));
        assert_eq!(*f.log.borrow(), vec![(f.right, EventType::Leave)]);
    }

    #[test]
    fn test_cross_window_notifies_whole_chains() {
        let mut f = setup();
        let other = f
            .app
            .tree_mut()
            .create_window("other", WindowType::Window, Rect::new(300.0, 0.0, 50.0, 50.0));
        f.app.dispatch_enter_leave(Some(other), Some(f.left));
        assert_eq!(
            *f.log.borrow(),
            vec![
                (f.left, EventType::Leave),
                (f.panel, EventType::Leave),
                (f.window, EventType::Leave),
            ]
        );

        f.log.borrow_mut().clear();
        f.app.dispatch_enter_leave(Some(f.left), None);
        assert_eq!(
            *f.log.borrow(),
            vec![
                (f.window, EventType::Enter),
                (f.panel, EventType::Enter),
                (f.left, EventType::Enter),
            ]
        );
    }

    #[test]
    fn test_hover_enter_and_leave() {
        let mut f = setup();
        f.app
            .tree_mut()
            .set_attribute(f.left, WidgetAttributes::HOVER, true)
            .unwrap();
        f.app.dispatch_enter_leave(Some(f.left), Some(f.right));
        f.app.dispatch_enter_leave(Some(f.right), Some(f.left));
        let hovers: Vec<_> = f
            .log
            .borrow()
            .iter()
            .copied()
            .filter(|(_, t)| matches!(t, EventType::HoverEnter | EventType::HoverLeave))
            .collect();
        assert_eq!(hovers, vec![(f.left, EventType::HoverEnter), (f.left, EventType::HoverLeave)]);
    }

    #[test]
    fn test_alien_cursor_is_applied_to_native_parent() {
        let mut f = setup();
        f.app.tree_mut().set_cursor(f.left, Some(CursorIcon::Text)).unwrap();
        f.app.dispatch_enter_leave(Some(f.left), None);
        assert_eq!(f.ws.cursor(f.window), Some(CursorIcon::Text));

        f.app.dispatch_enter_leave(Some(f.right), Some(f.left));
        assert_eq!(f.ws.cursor(f.window), None);
    }

    #[test]
    fn test_window_leave_deferred_while_button_down() {
        let mut f = setup();
        f.app.handle_enter(f.window, Point::new(10.0, 10.0));
        assert_eq!(f.app.state().last_mouse_receiver(), Some(f.left));

        f.app.state.button_down = Some(f.left);
        f.app.handle_leave(f.window);
        assert_eq!(f.app.state().leave_after_release(), Some(f.left));
        assert_eq!(f.app.state().last_mouse_receiver(), Some(f.left));

        f.app.state.button_down = None;
        f.app.handle_leave(f.window);
        assert_eq!(f.app.state().last_mouse_receiver(), None);
        assert!(!f.app.tree().test_attribute(f.left, WidgetAttributes::UNDER_MOUSE));
    }
}
