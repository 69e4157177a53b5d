//! Raw touch input.
//!
//! The window system reports every active point of a device at once. Each
//! pressed point is assigned a widget; every later report of the point goes
//! to that widget until the point is released. The widget that accepts a
//! TouchBegin takes over the points of that event (see the touch walk in
//! [`Application::notify`]).
//!
//! On a touch screen a new point joins the widget of the nearest active
//! point when one of the two widgets contains the other, so that a second
//! finger landing on a child of the widget already being touched goes to
//! the same widget. On a touch pad all points go to the first widget
//! touched.

use std::collections::BTreeMap;

use horizon_input_core::logging::{span_names, targets};
use horizon_input_core::{PerfSpan, Point, WidgetAttributes, WidgetId};

use crate::application::Application;
use crate::events::{
    Event, EventType, TouchDevice, TouchDeviceType, TouchEvent, TouchPoint, TouchPointState, TouchPointStates,
};

/// Key of an active point: device id and point id.
type PointKey = (u64, u64);

/// Active touch points and the widgets they are bound to.
#[derive(Debug, Clone, Default)]
pub struct TouchState {
    widgets: BTreeMap<PointKey, WidgetId>,
    points: BTreeMap<PointKey, TouchPoint>,
}

impl TouchState {
    /// The widget receiving point `point` of device `device`.
    pub fn widget_for_point(&self, device: u64, point: u64) -> Option<WidgetId> {
        self.widgets.get(&(device, point)).copied()
    }

    /// Number of points currently down on all devices.
    pub fn active_point_count(&self) -> usize {
        self.points.len()
    }

    /// Bind `points` of `device` to `widget`.
    pub(crate) fn grab_points(&mut self, device: u64, points: impl IntoIterator<Item = u64>, widget: WidgetId) {
        for point in points {
            self.widgets.insert((device, point), widget);
        }
    }

    /// The widget of any active point of `device`.
    fn first_widget(&self, device: u64) -> Option<WidgetId> {
        self.widgets.range((device, 0)..=(device, u64::MAX)).next().map(|(_, &w)| w)
    }

    /// The active point of `device` closest to `screen_pos`.
    fn closest_point(&self, device: u64, screen_pos: Point) -> Option<u64> {
        self.points
            .range((device, 0)..=(device, u64::MAX))
            .map(|(&(_, id), point)| (id, (point.screen_pos - screen_pos).length()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Drop every point of `device`, returning the widgets they were bound
    /// to in point order without repeats.
    fn release_device(&mut self, device: u64) -> Vec<WidgetId> {
        let keys: Vec<PointKey> = self.widgets.range((device, 0)..=(device, u64::MAX)).map(|(&k, _)| k).collect();
        let mut widgets = Vec::new();
        for key in keys {
            if let Some(widget) = self.widgets.remove(&key)
                && !widgets.contains(&widget)
            {
                widgets.push(widget);
            }
        }
        self.points.retain(|&(d, _), _| d != device);
        widgets
    }

    pub(crate) fn forget_widget(&mut self, widget: WidgetId) {
        let stale: Vec<PointKey> = self.widgets.iter().filter(|&(_, &w)| w == widget).map(|(&k, _)| k).collect();
        for key in stale {
            self.widgets.remove(&key);
            self.points.remove(&key);
        }
    }
}

impl Application {
    /// Dispatch one raw touch report.
    ///
    /// `window` is the window the report arrived at, or `None` to hit test
    /// each new point against the top-level windows. Returns whether any
    /// widget accepted an event built from the report. Touch input is
    /// ignored while a popup is open.
    pub fn handle_touch(
        &mut self,
        window: Option<WidgetId>,
        device: TouchDevice,
        points: Vec<TouchPoint>,
        timestamp: u64,
    ) -> bool {
        if self.state.closing {
            return false;
        }
        if self.state.popups.active().is_some() {
            tracing::trace!(target: targets::TOUCH, device = device.id, "touch ignored in popup mode");
            return false;
        }
        let _perf = PerfSpan::new(span_names::TRANSLATE);

        let mut groups: Vec<(WidgetId, Vec<TouchPoint>)> = Vec::new();
        for mut point in points {
            let key = (device.id, point.id);
            let widget = match point.state {
                TouchPointState::Pressed => {
                    let Some(widget) = self.touch_target(window, device, point.screen_pos) else {
                        continue;
                    };
                    self.state.touch.widgets.insert(key, widget);
                    point.start_screen_pos = point.screen_pos;
                    point.last_screen_pos = point.screen_pos;
                    self.state.touch.points.insert(key, point.clone());
                    widget
                }
                TouchPointState::Released => {
                    let Some(widget) = self.state.touch.widgets.remove(&key) else {
                        continue;
                    };
                    if let Some(previous) = self.state.touch.points.remove(&key) {
                        point.start_screen_pos = previous.start_screen_pos;
                        point.last_screen_pos = previous.screen_pos;
                    }
                    widget
                }
                TouchPointState::Moved | TouchPointState::Stationary => {
                    let Some(widget) = self.state.touch.widget_for_point(device.id, point.id) else {
                        continue;
                    };
                    if let Some(previous) = self.state.touch.points.get(&key) {
                        point.start_screen_pos = previous.start_screen_pos;
                        point.last_screen_pos = previous.screen_pos;
                    }
                    self.state.touch.points.insert(key, point.clone());
                    widget
                }
            };
            match groups.iter_mut().find(|(w, _)| *w == widget) {
                Some((_, group)) => group.push(point),
                None => groups.push((widget, vec![point])),
            }
        }

        let mut accepted = false;
        for (widget, mut points) in groups {
            if !self.tree.contains(widget) || !self.try_modal(widget) {
                continue;
            }
            let states = TouchPointStates::of(&points);
            let event_type = if states.is_only(TouchPointState::Pressed) {
                EventType::TouchBegin
            } else if states.is_only(TouchPointState::Released) {
                EventType::TouchEnd
            } else if states.is_only(TouchPointState::Stationary) {
                continue;
            } else {
                EventType::TouchUpdate
            };

            for point in &mut points {
                point.pos = self.tree.map_from_global(widget, point.screen_pos);
                point.start_pos = self.tree.map_from_global(widget, point.start_screen_pos);
                point.last_pos = self.tree.map_from_global(widget, point.last_screen_pos);
            }
            let mut touch = TouchEvent::new(event_type, device, points, timestamp);
            touch.modifiers = self.state.modifiers;
            touch.widget = Some(widget);
            let mut event: Event = touch.into();

            if event_type == EventType::TouchBegin {
                let _ = self
                    .tree
                    .set_attribute(widget, WidgetAttributes::ACCEPTED_TOUCH_BEGIN, true);
            } else {
                let began = self.tree.test_attribute(widget, WidgetAttributes::ACCEPTED_TOUCH_BEGIN);
                if !began && !self.state.gestures.owns_gesture(widget) {
                    continue;
                }
                if event_type == EventType::TouchEnd {
                    let _ = self
                        .tree
                        .set_attribute(widget, WidgetAttributes::ACCEPTED_TOUCH_BEGIN, false);
                }
            }
            tracing::trace!(target: targets::TOUCH, ?widget, ?event_type, device = device.id, "touch event");
            let res = self.send_spontaneous_event(widget, &mut event);
            accepted |= res && event.is_accepted();
        }
        accepted
    }

    /// The widget a newly pressed point goes to.
    fn touch_target(&self, window: Option<WidgetId>, device: TouchDevice, screen_pos: Point) -> Option<WidgetId> {
        if device.kind == TouchDeviceType::TouchPad
            && let Some(widget) = self.state.touch.first_widget(device.id)
        {
            return Some(widget);
        }

        let window = window
            .filter(|&w| self.tree.contains(w))
            .or_else(|| self.tree.top_level_at(screen_pos))?;
        let local = self.tree.map_from_global(window, screen_pos);
        let mut widget = self.tree.child_at(window, local).unwrap_or(window);

        if device.kind == TouchDeviceType::TouchScreen
            && let Some(closest) = self
                .state
                .touch
                .closest_point(device.id, screen_pos)
                .and_then(|id| self.state.touch.widget_for_point(device.id, id))
            && (self.tree.is_ancestor_of(widget, closest) || self.tree.is_ancestor_of(closest, widget))
        {
            widget = closest;
        }
        Some(widget)
    }

    /// The device lost all its points without releasing them. Every widget
    /// holding points of the device gets TouchCancel.
    pub fn handle_touch_cancel(&mut self, device: TouchDevice, timestamp: u64) {
        if self.state.closing {
            return;
        }
        let widgets = self.state.touch.release_device(device.id);
        tracing::debug!(target: targets::TOUCH, device = device.id, widgets = widgets.len(), "touch canceled");
        for widget in widgets {
            if !self.tree.contains(widget) {
                continue;
            }
            let _ = self
                .tree
                .set_attribute(widget, WidgetAttributes::ACCEPTED_TOUCH_BEGIN, false);
            let mut touch = TouchEvent::new(EventType::TouchCancel, device, Vec::new(), timestamp);
            touch.widget = Some(widget);
            let mut event: Event = touch.into();
            self.send_spontaneous_event(widget, &mut event);
        }
    }
}
