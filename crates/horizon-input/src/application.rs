//! The dispatch root.
//!
//! [`Application`] owns the widget tree, the per-widget handlers, the
//! event filters, the [`DispatchState`] and the gesture manager. Raw input
//! enters through the `handle_*` methods; synthetic events go through
//! [`Application::send_event`]. Both end up in [`Application::notify`],
//! which runs the gesture filter and then walks the event up the parent
//! chain as its type requires.
//!
//! # Re-entrancy
//!
//! A handler runs with the application borrowed through its
//! [`EventContext`], so it may send events, open popups or destroy widgets
//! (the receiver included). While a handler runs it is taken out of the
//! handler table; an event sent re-entrantly to the same widget finds no
//! handler and is not handled. Every walk re-checks its widget ids after
//! each delivery and stops once its widget is gone.

use std::time::Instant;

use horizon_input_core::logging::targets;
use horizon_input_core::{WidgetAttributes, WidgetId, WidgetTree};
use slotmap::SecondaryMap;

use crate::config::InputConfig;
use crate::error::GestureError;
use crate::events::{Event, EventType};
use crate::gesture::{
    CancelPolicy, Gesture, GestureFlags, GestureId, GestureManager, GestureRecognizer, GestureType,
    NativePanRecognizer, NativePinchRecognizer, NativeSwipeRecognizer, PanRecognizer, PinchRecognizer,
    SwipeRecognizer, TapAndHoldRecognizer, TapRecognizer,
};
use crate::handler::{EventContext, EventHandler};
use crate::state::DispatchState;
use crate::window_system::{HeadlessWindowSystem, WindowSystem};

/// The event dispatch root.
pub struct Application {
    pub(crate) tree: WidgetTree,
    pub(crate) state: DispatchState,
    pub(crate) config: InputConfig,
    pub(crate) handlers: SecondaryMap<WidgetId, Box<dyn EventHandler>>,
    /// Application-wide filters, in installation order.
    pub(crate) app_filters: Vec<WidgetId>,
    /// Per-widget filters, in installation order.
    pub(crate) object_filters: SecondaryMap<WidgetId, Vec<WidgetId>>,
    pub(crate) window_system: Box<dyn WindowSystem>,
    /// `None` while the manager is delivering gesture events.
    pub(crate) gesture_manager: Option<Box<GestureManager>>,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("widgets", &self.tree.len())
            .field("handlers", &self.handlers.len())
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl Application {
    /// Create an application with a [`HeadlessWindowSystem`].
    pub fn new(config: InputConfig) -> Self {
        Self::with_window_system(config, Box::new(HeadlessWindowSystem::new()))
    }

    /// Create an application on top of `window_system`.
    ///
    /// Unless the configuration says otherwise, the built-in recognizers
    /// are registered here.
    pub fn with_window_system(config: InputConfig, window_system: Box<dyn WindowSystem>) -> Self {
        let mut app = Self {
            tree: WidgetTree::new(),
            state: DispatchState::new(),
            config,
            handlers: SecondaryMap::new(),
            app_filters: Vec::new(),
            object_filters: SecondaryMap::new(),
            window_system,
            gesture_manager: Some(Box::new(GestureManager::new())),
        };
        app.register_default_recognizers();
        app
    }

    fn register_default_recognizers(&mut self) {
        let mut recognizers: Vec<Box<dyn GestureRecognizer>> = Vec::new();
        if self.config.register_default_recognizers {
            recognizers.push(Box::new(PanRecognizer::new(self.config.pan_point_count)));
            recognizers.push(Box::new(PinchRecognizer::new()));
            recognizers.push(Box::new(SwipeRecognizer::new()));
            recognizers.push(Box::new(TapRecognizer::new()));
            recognizers.push(Box::new(TapAndHoldRecognizer::new(self.config.tap_and_hold_timeout())));
        }
        if self.config.native_gestures {
            recognizers.push(Box::new(NativePanRecognizer::new()));
            recognizers.push(Box::new(NativePinchRecognizer::new()));
            recognizers.push(Box::new(NativeSwipeRecognizer::new()));
        }
        for recognizer in recognizers {
            // A failure is already logged by the manager.
            let _ = self.register_recognizer(recognizer);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// Mutable access to the widget tree.
    ///
    /// Structural changes made here bypass the dispatch bookkeeping; use
    /// [`Application::destroy_widget`], [`Application::show`] and
    /// [`Application::hide`] for widgets that may be involved in dispatch.
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// The gesture manager, unless it is currently delivering.
    pub fn gesture_manager(&self) -> Option<&GestureManager> {
        self.gesture_manager.as_deref()
    }

    /// Swallow every event from now on.
    pub fn shutdown(&mut self) {
        tracing::debug!(target: targets::DISPATCH, "application shutting down");
        self.state.closing = true;
    }

    // =========================================================================
    // Handlers and filters
    // =========================================================================

    /// Install the handler for `widget`, replacing any previous one.
    pub fn set_handler(&mut self, widget: WidgetId, handler: impl EventHandler + 'static) {
        if !self.tree.contains(widget) {
            tracing::warn!(target: targets::DISPATCH, ?widget, "set_handler on an invalid widget");
            return;
        }
        self.handlers.insert(widget, Box::new(handler));
    }

    /// Remove the handler of `widget`.
    pub fn remove_handler(&mut self, widget: WidgetId) -> Option<Box<dyn EventHandler>> {
        self.handlers.remove(widget)
    }

    /// Let `filter` see events sent to `watched` before `watched` does.
    /// Filters installed later run first.
    pub fn install_event_filter(&mut self, watched: WidgetId, filter: WidgetId) {
        if !self.tree.contains(watched) || !self.tree.contains(filter) {
            tracing::warn!(target: targets::DISPATCH, ?watched, ?filter, "install_event_filter on an invalid widget");
            return;
        }
        let Some(filters) = self.object_filters.entry(watched).map(|e| e.or_default()) else {
            return;
        };
        filters.retain(|&f| f != filter);
        filters.push(filter);
    }

    pub fn remove_event_filter(&mut self, watched: WidgetId, filter: WidgetId) {
        if let Some(filters) = self.object_filters.get_mut(watched) {
            filters.retain(|&f| f != filter);
        }
    }

    /// Let `filter` see every event before its receiver.
    pub fn install_app_event_filter(&mut self, filter: WidgetId) {
        if !self.tree.contains(filter) {
            tracing::warn!(target: targets::DISPATCH, ?filter, "install_app_event_filter on an invalid widget");
            return;
        }
        self.app_filters.retain(|&f| f != filter);
        self.app_filters.push(filter);
    }

    pub fn remove_app_event_filter(&mut self, filter: WidgetId) {
        self.app_filters.retain(|&f| f != filter);
    }

    // =========================================================================
    // Delivery
    // =========================================================================

    /// Send a synthetic event to `receiver` and return whether it was handled.
    pub fn send_event(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        event.base_mut().set_spontaneous(false);
        self.notify(receiver, event)
    }

    /// Send an event that came from the window system.
    pub fn send_spontaneous_event(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        event.base_mut().set_spontaneous(true);
        self.notify(receiver, event)
    }

    /// Single-shot delivery: application filters, the under-mouse
    /// attribute, object filters, then the receiver's handler.
    pub(crate) fn notify_helper(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        if self.send_through_app_filters(receiver, event) {
            return true;
        }
        if !self.tree.contains(receiver) {
            return true;
        }

        match event.event_type() {
            EventType::Enter | EventType::DragEnter => {
                let active_popup = self.state.popups.active();
                if active_popup.is_none() || active_popup == self.tree.window(receiver) {
                    let _ = self.tree.set_attribute(receiver, WidgetAttributes::UNDER_MOUSE, true);
                }
            }
            EventType::Leave | EventType::DragLeave => {
                let _ = self.tree.set_attribute(receiver, WidgetAttributes::UNDER_MOUSE, false);
            }
            _ => {}
        }

        if self.send_through_object_filters(receiver, event) {
            return true;
        }
        let consumed = self.deliver(receiver, event);
        event.base_mut().set_spontaneous(false);
        consumed
    }

    /// Run the application filters only.
    pub(crate) fn send_through_app_filters(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        let filters: Vec<WidgetId> = self.app_filters.iter().rev().copied().collect();
        filters.into_iter().any(|filter| self.call_filter(filter, receiver, event))
    }

    fn send_through_object_filters(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        let Some(filters) = self.object_filters.get(receiver) else {
            return false;
        };
        let filters: Vec<WidgetId> = filters.iter().rev().copied().collect();
        for filter in filters {
            if !self.tree.contains(receiver) {
                return true;
            }
            if self.call_filter(filter, receiver, event) {
                return true;
            }
        }
        !self.tree.contains(receiver)
    }

    fn call_filter(&mut self, filter: WidgetId, watched: WidgetId, event: &mut Event) -> bool {
        if !self.tree.contains(filter) {
            return false;
        }
        let Some(mut handler) = self.handlers.remove(filter) else {
            return false;
        };
        let filtered = {
            let mut ctx = EventContext::new(self, filter);
            handler.event_filter(&mut ctx, watched, event)
        };
        self.restore_handler(filter, handler);
        filtered
    }

    fn deliver(&mut self, receiver: WidgetId, event: &mut Event) -> bool {
        let Some(mut handler) = self.handlers.remove(receiver) else {
            return false;
        };
        let handled = {
            let mut ctx = EventContext::new(self, receiver);
            handler.event(&mut ctx, event)
        };
        self.restore_handler(receiver, handler);
        handled
    }

    /// Put a handler back unless its widget died or it was replaced while
    /// it ran.
    fn restore_handler(&mut self, widget: WidgetId, handler: Box<dyn EventHandler>) {
        if self.tree.contains(widget) && !self.handlers.contains_key(widget) {
            self.handlers.insert(widget, handler);
        }
    }

    /// Offer an event to the gesture manager.
    pub(crate) fn filter_gestures(&mut self, receiver: WidgetId, event: &Event) -> bool {
        if !self.state.gestures.has_contexts() {
            return false;
        }
        let Some(mut manager) = self.gesture_manager.take() else {
            return false;
        };
        let consumed = manager.filter_event(self, receiver, event);
        self.gesture_manager = Some(manager);
        consumed
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Subscribe `widget` to gestures of `gesture_type`.
    pub fn grab_gesture(&mut self, widget: WidgetId, gesture_type: GestureType, flags: GestureFlags) {
        if !self.tree.contains(widget) {
            tracing::warn!(target: targets::GESTURE, ?widget, "grab_gesture on an invalid widget");
            return;
        }
        self.state.gestures.set_context(widget, gesture_type, flags);
    }

    /// Unsubscribe `widget` from `gesture_type` and drop its idle gestures
    /// of that type.
    pub fn ungrab_gesture(&mut self, widget: WidgetId, gesture_type: GestureType) {
        if self.state.gestures.remove_context(widget, gesture_type) {
            self.state.gestures.cleanup_cached(widget, gesture_type);
        }
    }

    /// Register a recognizer and return the gesture type it serves.
    pub fn register_recognizer(
        &mut self,
        recognizer: Box<dyn GestureRecognizer>,
    ) -> Result<GestureType, GestureError> {
        let manager = self.gesture_manager.as_mut().ok_or(GestureError::ManagerBusy)?;
        manager.register_recognizer(recognizer, &mut self.tree)
    }

    /// Unregister every recognizer of `gesture_type`.
    pub fn unregister_recognizer(&mut self, gesture_type: GestureType) -> Result<(), GestureError> {
        let manager = self.gesture_manager.as_mut().ok_or(GestureError::ManagerBusy)?;
        manager.unregister_recognizer(gesture_type, &mut self.state.gestures)
    }

    pub fn gesture(&self, id: GestureId) -> Option<&Gesture> {
        self.state.gestures.get(id)
    }

    /// Mutable access to a gesture object, for recognizer-specific fields.
    pub fn gesture_mut(&mut self, id: GestureId) -> Option<&mut Gesture> {
        self.state.gestures.get_mut(id)
    }

    /// Set what else is canceled when the gesture starts.
    pub fn set_gesture_cancel_policy(&mut self, id: GestureId, policy: CancelPolicy) {
        if let Some(gesture) = self.state.gestures.get_mut(id) {
            gesture.set_cancel_policy(policy);
        }
    }

    // =========================================================================
    // Widget lifecycle
    // =========================================================================

    /// Show a widget. Popups are pushed on the popup stack and modal
    /// windows enter the modal list.
    pub fn show(&mut self, widget: WidgetId) {
        if !self.tree.contains(widget) || self.tree.get(widget).is_some_and(|d| d.is_visible_self()) {
            return;
        }
        let _ = self.tree.set_visible(widget, true);
        if self.tree.is_window(widget) {
            if self.tree.is_popup(widget) {
                self.open_popup(widget);
            } else if !self.tree.modality(widget).is_non_modal() {
                self.enter_modal(widget);
            }
        }
        if self.tree.contains(widget) {
            self.send_event(widget, &mut Event::basic(EventType::Show));
        }
    }

    /// Hide a widget.
    ///
    /// A popup leaves the popup stack and a modal window the modal list.
    /// Focus inside the hidden subtree is cleared, and the widgets under the
    /// mouse in it get Leave.
    pub fn hide(&mut self, widget: WidgetId) {
        if !self.tree.contains(widget) || !self.tree.get(widget).is_some_and(|d| d.is_visible_self()) {
            return;
        }
        let is_window = self.tree.is_window(widget);
        let _ = self.tree.set_visible(widget, false);
        if is_window {
            if self.state.popups.contains(widget) {
                self.close_popup(widget);
            }
            if self.state.modals.contains(widget) {
                self.leave_modal(widget);
            }
        }
        if let Some(focus) = self.state.focus_widget
            && self.is_in_subtree(widget, focus)
        {
            self.clear_focus();
        }
        if let Some(last) = self.state.last_mouse_receiver
            && self.is_in_subtree(widget, last)
        {
            let enter = if is_window { None } else { self.tree.parent(widget) };
            self.dispatch_enter_leave(enter, Some(last));
            self.state.last_mouse_receiver = enter;
        }
        if self.tree.contains(widget) {
            self.send_event(widget, &mut Event::basic(EventType::Hide));
        }
    }

    /// Ask `widget` to close. Returns whether it accepted and was hidden.
    pub fn close(&mut self, widget: WidgetId) -> bool {
        if !self.tree.contains(widget) {
            return false;
        }
        let mut event = Event::basic(EventType::Close);
        self.send_event(widget, &mut event);
        if !event.is_accepted() || !self.tree.contains(widget) {
            return false;
        }
        self.hide(widget);
        true
    }

    /// Destroy `widget` and its descendants, dropping every reference the
    /// dispatch state holds to them.
    pub fn destroy_widget(&mut self, widget: WidgetId) {
        if !self.tree.contains(widget) {
            return;
        }
        if self.tree.is_window(widget) {
            if self.state.popups.contains(widget) {
                self.close_popup(widget);
            }
            if self.state.modals.contains(widget) {
                self.leave_modal(widget);
            }
        }
        let Ok(removed) = self.tree.destroy(widget) else {
            return;
        };
        for &id in &removed {
            if self.state.mouse_grabber == Some(id) {
                self.release_mouse(id);
            }
            if self.state.keyboard_grabber == Some(id) {
                self.release_keyboard(id);
            }
            self.state.forget_widget(id);
            self.handlers.remove(id);
            self.object_filters.remove(id);
        }
        self.app_filters.retain(|f| !removed.contains(f));
        for filters in self.object_filters.values_mut() {
            filters.retain(|f| !removed.contains(f));
        }
        tracing::debug!(target: targets::DISPATCH, ?widget, count = removed.len(), "destroyed widgets");
    }

    /// Whether `widget` is `root` or below it, across window boundaries.
    pub(crate) fn is_in_subtree(&self, root: WidgetId, widget: WidgetId) -> bool {
        widget == root || self.tree.ancestors(widget).contains(&root)
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Fire every gesture and tooltip timer due at `now`.
    pub fn process_timers(&mut self, now: Instant) {
        if self.gesture_manager.is_some() {
            for (timer, gesture) in self.state.gestures.timers.take_due(now) {
                let Some(mut manager) = self.gesture_manager.take() else {
                    break;
                };
                manager.filter_timer(self, gesture, timer);
                self.gesture_manager = Some(manager);
            }
        }
        self.process_tooltip_timers(now);
    }

    /// The earliest pending timer deadline.
    pub fn next_timer_deadline(&self) -> Option<Instant> {
        let gesture = self.state.gestures.timers.next_deadline();
        let tooltip = self.state.tooltip.next_deadline();
        match (gesture, tooltip) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

static_assertions::assert_impl_all!(Application: std::fmt::Debug, Default);

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_input_core::{Rect, WindowType};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (Application, WidgetId, WidgetId) {
        let mut app = Application::new(InputConfig::default());
        let window = app
            .tree_mut()
            .create_window("window", WindowType::Window, Rect::new(0.0, 0.0, 200.0, 200.0));
        let child = app
            .tree_mut()
            .create_child(window, "child", Rect::new(10.0, 10.0, 50.0, 50.0))
            .unwrap();
        (app, window, child)
    }

    #[test]
    fn test_default_recognizers_registered() {
        let app = Application::default();
        let manager = app.gesture_manager().unwrap();
        assert!(manager.is_registered(GestureType::Pan));
        assert!(manager.is_registered(GestureType::TapAndHold));
        assert_eq!(manager.recognizer_count(GestureType::Pinch), 1);

        let app = Application::new(InputConfig::default().with_native_gestures(true));
        assert_eq!(app.gesture_manager().unwrap().recognizer_count(GestureType::Pinch), 2);

        let app = Application::new(InputConfig::default().with_default_recognizers(false));
        assert!(!app.gesture_manager().unwrap().is_registered(GestureType::Tap));
    }

    #[test]
    fn test_filters_run_before_handler_most_recent_first() {
        let (mut app, window, child) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));

        struct Filter(&'static str, bool, Rc<RefCell<Vec<&'static str>>>);
        impl EventHandler for Filter {
            fn event(&mut self, _ctx: &mut EventContext<'_>, _event: &mut Event) -> bool {
                false
            }
            fn event_filter(&mut self, _ctx: &mut EventContext<'_>, _watched: WidgetId, _event: &mut Event) -> bool {
                self.2.borrow_mut().push(self.0);
                self.1
            }
        }

        let first = app.tree_mut().create_child(window, "first", Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        let second = app.tree_mut().create_child(window, "second", Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        let global = app.tree_mut().create_child(window, "global", Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        app.set_handler(first, Filter("first", false, log.clone()));
        app.set_handler(second, Filter("second", false, log.clone()));
        app.set_handler(global, Filter("global", false, log.clone()));
        let handler_log = log.clone();
        app.set_handler(child, move |_ctx: &mut EventContext<'_>, _event: &mut Event| {
            handler_log.borrow_mut().push("handler");
            true
        });

        app.install_event_filter(child, first);
        app.install_event_filter(child, second);
        app.install_app_event_filter(global);

        assert!(app.send_event(child, &mut Event::basic(EventType::Show)));
        assert_eq!(*log.borrow(), vec!["global", "second", "first", "handler"]);

        log.borrow_mut().clear();
        app.set_handler(second, Filter("second", true, log.clone()));
        assert!(app.send_event(child, &mut Event::basic(EventType::Show)));
        assert_eq!(*log.borrow(), vec!["global", "second"]);
    }

    #[test]
    fn test_handler_may_destroy_its_widget() {
        let (mut app, _window, child) = setup();
        app.set_handler(child, |ctx: &mut EventContext<'_>, _event: &mut Event| {
            let me = ctx.widget();
            ctx.destroy_widget(me);
            true
        });
        assert!(app.send_event(child, &mut Event::basic(EventType::Show)));
        assert!(!app.tree().contains(child));
        assert!(app.remove_handler(child).is_none());
    }

    #[test]
    fn test_shutdown_swallows_events() {
        let (mut app, _window, child) = setup();
        let hits = Rc::new(RefCell::new(0));
        let counter = hits.clone();
        app.set_handler(child, move |_ctx: &mut EventContext<'_>, _event: &mut Event| {
            *counter.borrow_mut() += 1;
            true
        });
        app.shutdown();
        assert!(app.state().is_closing());
        assert!(app.send_event(child, &mut Event::basic(EventType::Show)));
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_close_hides_only_when_accepted() {
        let (mut app, window, _child) = setup();
        app.show(window);
        app.set_handler(window, |_ctx: &mut EventContext<'_>, event: &mut Event| {
            if event.event_type() == EventType::Close {
                event.ignore();
            }
            true
        });
        assert!(!app.close(window));
        assert!(app.tree().is_visible(window));

        app.remove_handler(window);
        assert!(app.close(window));
        assert!(!app.tree().is_visible(window));
    }

    #[test]
    fn test_ungrab_gesture_removes_context() {
        let (mut app, window, _child) = setup();
        app.grab_gesture(window, GestureType::Tap, GestureFlags::NONE);
        assert!(app.state().gestures().has_contexts());
        app.ungrab_gesture(window, GestureType::Tap);
        assert!(app.state().gestures().contexts(window).is_empty());
    }

    #[test]
    fn test_destroy_forgets_filters_and_state() {
        let (mut app, window, child) = setup();
        app.install_event_filter(window, child);
        app.install_app_event_filter(child);
        app.grab_mouse(child);
        app.destroy_widget(child);
        assert!(app.app_filters.is_empty());
        assert!(app.object_filters.get(window).is_none_or(|f| f.is_empty()));
        assert_eq!(app.state().mouse_grabber(), None);
    }
}
