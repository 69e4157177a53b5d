//! Tooltip timers.
//!
//! A mouse move without buttons arms the wake-up timer for the widget under
//! the pointer. When it fires and the widget's window is active, the widget
//! gets a ToolTip event. If that event is accepted a tooltip is showing,
//! and the fall-asleep timer starts: while it runs, the next tooltip wakes
//! up almost immediately.

use std::time::{Duration, Instant};

use horizon_input_core::logging::targets;
use horizon_input_core::{Point, WidgetId};

use crate::application::Application;
use crate::events::{Event, EventType};

/// Wake-up delay while the fall-asleep timer runs.
const QUICK_WAKE_UP: Duration = Duration::from_millis(20);

/// The pending tooltip and its timers.
#[derive(Debug, Clone, Default)]
pub struct ToolTipState {
    widget: Option<WidgetId>,
    pos: Point,
    global_pos: Point,
    wake_up: Option<Instant>,
    fall_asleep: Option<Instant>,
}

impl ToolTipState {
    /// The widget the next tooltip is for.
    pub fn widget(&self) -> Option<WidgetId> {
        self.widget
    }

    pub fn wake_up_deadline(&self) -> Option<Instant> {
        self.wake_up
    }

    pub fn fall_asleep_deadline(&self) -> Option<Instant> {
        self.fall_asleep
    }

    /// The earlier of the two deadlines.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.wake_up, self.fall_asleep) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub(crate) fn forget_widget(&mut self, widget: WidgetId) {
        if self.widget == Some(widget) {
            self.widget = None;
            self.wake_up = None;
        }
    }
}

impl Application {
    /// Record `receiver` as the tooltip widget and (re)start the wake-up
    /// timer.
    pub(crate) fn arm_tooltip(&mut self, receiver: WidgetId, pos: Point, global_pos: Point) {
        let delay = if self.state.tooltip.fall_asleep.is_some() {
            QUICK_WAKE_UP
        } else {
            self.config.tooltip_wake_up()
        };
        let tooltip = &mut self.state.tooltip;
        tooltip.widget = Some(receiver);
        tooltip.pos = pos;
        tooltip.global_pos = global_pos;
        tooltip.wake_up = Some(Instant::now() + delay);
    }

    /// Stop the timers an event of `event_type` interrupts.
    pub(crate) fn stop_tooltip_timers(&mut self, event_type: EventType) {
        if event_type == EventType::Leave {
            self.state.tooltip.wake_up = None;
        } else if event_type.stops_tooltip_fall_asleep() {
            self.state.tooltip.wake_up = None;
            self.state.tooltip.fall_asleep = None;
        }
    }

    /// Fire the tooltip timers due at `now`.
    pub(crate) fn process_tooltip_timers(&mut self, now: Instant) {
        if self.state.tooltip.fall_asleep.is_some_and(|at| at <= now) {
            self.state.tooltip.fall_asleep = None;
        }
        if !self.state.tooltip.wake_up.is_some_and(|at| at <= now) {
            return;
        }
        self.state.tooltip.wake_up = None;

        let Some(widget) = self.state.tooltip.widget.filter(|&w| self.tree.contains(w)) else {
            return;
        };
        if !self.is_active_window(widget) {
            return;
        }
        let (pos, global_pos) = (self.state.tooltip.pos, self.state.tooltip.global_pos);
        tracing::trace!(target: targets::DISPATCH, ?widget, ?pos, "tooltip wake-up");
        let mut event = Event::tool_tip(pos, global_pos);
        if self.notify(widget, &mut event) && event.is_accepted() {
            self.state.tooltip.fall_asleep = Some(now + self.config.tooltip_fall_asleep());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::events::{KeyboardModifiers, MouseButtons, MouseEvent};
    use crate::handler::EventContext;
    use horizon_input_core::{Rect, WindowType};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup(accept: bool) -> (Application, WidgetId, WidgetId, Rc<RefCell<Vec<Point>>>) {
        let mut app = Application::new(InputConfig::default().with_default_recognizers(false));
        let window = app
            .tree_mut()
            .create_window("window", WindowType::Window, Rect::new(0.0, 0.0, 100.0, 100.0));
        let label = app
            .tree_mut()
            .create_child(window, "label", Rect::new(10.0, 10.0, 50.0, 20.0))
            .unwrap();
        app.show(window);
        app.activate_window(Some(window));

        let shown: Rc<RefCell<Vec<Point>>> = Rc::default();
        let log = shown.clone();
        app.set_handler(label, move |_ctx: &mut EventContext<'_>, event: &mut Event| {
            if event.event_type() == EventType::ToolTip {
                log.borrow_mut().push(event.pos().unwrap_or(Point::ZERO));
                event.set_accepted(accept);
                return true;
            }
            false
        });
        (app, window, label, shown)
    }

    fn hover(app: &mut Application, window: WidgetId, global: (f32, f32)) {
        let event = MouseEvent::new(
            EventType::MouseMove,
            global.into(),
            global.into(),
            None,
            MouseButtons::NONE,
            KeyboardModifiers::NONE,
        );
        app.handle_mouse(window, event);
    }

    #[test]
    fn test_wake_up_sends_tooltip() {
        let (mut app, window, label, shown) = setup(true);
        hover(&mut app, window, (15.0, 15.0));
        assert_eq!(app.state().tooltip().widget(), Some(label));

        app.process_timers(Instant::now());
        assert!(shown.borrow().is_empty());

        app.process_timers(Instant::now() + Duration::from_millis(800));
        assert_eq!(*shown.borrow(), vec![Point::new(5.0, 5.0)]);
        assert!(app.state().tooltip().fall_asleep_deadline().is_some());
        assert!(app.state().tooltip().wake_up_deadline().is_none());
    }

    #[test]
    fn test_awake_tooltips_wake_up_quickly() {
        let (mut app, window, _label, _shown) = setup(true);
        hover(&mut app, window, (15.0, 15.0));
        app.process_timers(Instant::now() + Duration::from_millis(800));

        hover(&mut app, window, (16.0, 15.0));
        let wake_up = app.state().tooltip().wake_up_deadline().unwrap();
        assert!(wake_up <= Instant::now() + QUICK_WAKE_UP);
    }

    #[test]
    fn test_ignored_tooltip_does_not_start_fall_asleep() {
        let (mut app, window, _label, shown) = setup(false);
        hover(&mut app, window, (15.0, 15.0));
        app.process_timers(Instant::now() + Duration::from_millis(800));
        assert_eq!(shown.borrow().len(), 1);
        assert!(app.state().tooltip().fall_asleep_deadline().is_none());
    }

    #[test]
    fn test_interrupting_events_stop_timers() {
        let (mut app, window, _label, _shown) = setup(true);
        hover(&mut app, window, (15.0, 15.0));
        app.stop_tooltip_timers(EventType::Leave);
        assert!(app.state().tooltip().wake_up_deadline().is_none());

        hover(&mut app, window, (15.0, 15.0));
        app.process_timers(Instant::now() + Duration::from_millis(800));
        app.stop_tooltip_timers(EventType::KeyPress);
        assert!(app.next_timer_deadline().is_none());
    }

    #[test]
    fn test_inactive_window_shows_no_tooltip() {
        let (mut app, window, _label, shown) = setup(true);
        app.activate_window(None);
        hover(&mut app, window, (15.0, 15.0));
        app.process_timers(Instant::now() + Duration::from_millis(800));
        assert!(shown.borrow().is_empty());
    }
}
