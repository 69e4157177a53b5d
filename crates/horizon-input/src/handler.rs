//! Widget event handlers and event filters.
//!
//! A widget reacts to events through the [`EventHandler`] installed for it
//! with [`Application::set_handler`](crate::Application::set_handler). The
//! same trait serves as an event filter: a widget installed as a filter on
//! another widget (or on the application) sees events before their receiver
//! through [`EventHandler::event_filter`].
//!
//! Handlers get an [`EventContext`], which dereferences to the
//! [`Application`], so a handler may send further events, open popups,
//! move focus or destroy widgets while it runs.
//!
//! # Example
//!
//! ```
//! use horizon_input::prelude::*;
//!
//! let mut app = Application::new(InputConfig::default());
//! let window = app.tree_mut().create_window("main", WindowType::Window, Rect::new(0.0, 0.0, 100.0, 100.0));
//! app.set_handler(window, |_ctx: &mut EventContext<'_>, event: &mut Event| {
//!     event.event_type() == EventType::KeyPress
//! });
//! ```

use std::ops::{Deref, DerefMut};

use horizon_input_core::WidgetId;

use crate::application::Application;
use crate::events::Event;

/// Reacts to events delivered to a widget.
pub trait EventHandler {
    /// Handle `event`. Returns whether the event was recognized; whether it
    /// was *handled* is the event's accept flag.
    fn event(&mut self, ctx: &mut EventContext<'_>, event: &mut Event) -> bool;

    /// Inspect an event sent to `watched` before it reaches it. Returning
    /// `true` stops delivery.
    fn event_filter(&mut self, _ctx: &mut EventContext<'_>, _watched: WidgetId, _event: &mut Event) -> bool {
        false
    }
}

impl<F> EventHandler for F
where
    F: FnMut(&mut EventContext<'_>, &mut Event) -> bool,
{
    fn event(&mut self, ctx: &mut EventContext<'_>, event: &mut Event) -> bool {
        self(ctx, event)
    }
}

/// Access to the application from inside a handler.
pub struct EventContext<'a> {
    app: &'a mut Application,
    widget: WidgetId,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(app: &'a mut Application, widget: WidgetId) -> Self {
        Self { app, widget }
    }

    /// The widget whose handler is running.
    pub fn widget(&self) -> WidgetId {
        self.widget
    }
}

impl Deref for EventContext<'_> {
    type Target = Application;

    fn deref(&self) -> &Application {
        self.app
    }
}

impl DerefMut for EventContext<'_> {
    fn deref_mut(&mut self) -> &mut Application {
        self.app
    }
}
