//! Keyboard focus and window activation.
//!
//! Every window remembers its focus child (the widget that last had focus
//! inside it, recorded on each ancestor by the widget tree). The application
//! focus widget is the focus child of the active window, or of a popup while
//! one is open.

use horizon_input_core::logging::targets;
use horizon_input_core::{FocusPolicy, WidgetId};

use crate::application::Application;
use crate::events::{Event, EventType, FocusReason};

impl Application {
    /// The widget with keyboard focus.
    pub fn focus_widget(&self) -> Option<WidgetId> {
        self.state.focus_widget
    }

    /// The active window.
    pub fn active_window(&self) -> Option<WidgetId> {
        self.state.active_window
    }

    /// Whether `widget` lives in the active window. Widgets in a visible
    /// popup count as active too.
    pub fn is_active_window(&self, widget: WidgetId) -> bool {
        let Some(window) = self.tree.window(widget) else {
            return false;
        };
        self.state.active_window == Some(window) || (self.tree.is_popup(window) && self.tree.is_visible(window))
    }

    /// Give focus to `widget`, or to the end of its focus proxy chain.
    ///
    /// The widget becomes the focus child of every ancestor up to its
    /// window. Focus events are only sent when that window is active.
    pub fn set_focus(&mut self, widget: WidgetId, reason: FocusReason) {
        if !self.tree.contains(widget) || !self.tree.is_enabled(widget) {
            return;
        }
        let focus = self.tree.resolve_focus_proxy(widget);
        if self.state.focus_widget == Some(focus) {
            return;
        }
        self.tree.set_focus_child_chain(focus);
        if self.is_active_window(focus) {
            self.set_focus_widget(Some(focus), reason);
        }
    }

    /// Take focus away from the focus widget.
    pub fn clear_focus(&mut self) {
        let Some(focus) = self.state.focus_widget else {
            return;
        };
        if self.tree.contains(focus) {
            self.tree.clear_focus_child_chain(focus);
        }
        self.set_focus_widget(None, FocusReason::Other);
    }

    /// Switch the focus widget, sending FocusOut to the old one and FocusIn
    /// to the new one.
    pub(crate) fn set_focus_widget(&mut self, focus: Option<WidgetId>, reason: FocusReason) {
        if self.state.focus_widget == focus {
            return;
        }
        if let Some(widget) = focus
            && !self.tree.is_visible(widget)
        {
            return;
        }
        let previous = std::mem::replace(&mut self.state.focus_widget, focus);
        tracing::debug!(target: targets::FOCUS, ?previous, ?focus, ?reason, "focus changed");

        if let Some(previous) = previous
            && self.tree.contains(previous)
        {
            self.send_event(previous, &mut Event::focus(EventType::FocusOut, reason));
        }
        if let Some(focus) = focus
            && self.state.focus_widget == Some(focus)
            && self.tree.contains(focus)
        {
            self.send_event(focus, &mut Event::focus(EventType::FocusIn, reason));
        }
    }

    /// Whether `widget` may take focus for a trigger needing `policy`: both
    /// the widget and the end of its focus proxy chain must allow it.
    fn should_set_focus(&self, widget: WidgetId, policy: FocusPolicy) -> bool {
        let proxy = self.tree.resolve_focus_proxy(widget);
        self.tree.focus_policy(widget).has(policy) && (proxy == widget || self.tree.focus_policy(proxy).has(policy))
    }

    /// Focus the first enabled widget from `widget` up to its window whose
    /// policy allows focus for this trigger.
    pub(crate) fn give_focus_according_to_policy(&mut self, widget: WidgetId, policy: FocusPolicy, reason: FocusReason) {
        let mut current = widget;
        while self.tree.contains(current) {
            if self.tree.is_enabled(current) && self.should_set_focus(current, policy) {
                self.set_focus(current, reason);
                return;
            }
            if self.tree.is_window(current) {
                return;
            }
            match self.tree.parent(current) {
                Some(parent) => current = parent,
                None => return,
            }
        }
    }

    /// Focus-on-release: only move focus if nothing else moved it since the
    /// press.
    pub(crate) fn focus_on_release(&mut self, widget: WidgetId, policy: FocusPolicy) {
        if self.state.focus_at_press.take() == Some(self.state.focus_widget) {
            self.give_focus_according_to_policy(widget, policy, FocusReason::Mouse);
        }
    }

    /// Make `window` (or the window of the given widget) the active window;
    /// `None` deactivates the application, which closes every popup.
    pub fn activate_window(&mut self, window: Option<WidgetId>) {
        let window = window.and_then(|w| self.tree.window(w));
        if self.state.active_window == window {
            return;
        }
        let previous = std::mem::replace(&mut self.state.active_window, window);
        tracing::debug!(target: targets::FOCUS, ?previous, ?window, "active window changed");

        if let Some(window) = window {
            self.send_spontaneous_event(window, &mut Event::basic(EventType::WindowActivate));
            if self.tree.contains(window) {
                self.send_spontaneous_event(window, &mut Event::basic(EventType::ActivationChange));
            }
        }
        if let Some(previous) = previous
            && self.tree.contains(previous)
        {
            self.send_spontaneous_event(previous, &mut Event::basic(EventType::WindowDeactivate));
            if self.tree.contains(previous) {
                self.send_spontaneous_event(previous, &mut Event::basic(EventType::ActivationChange));
            }
        }

        if window.is_none() {
            tracing::debug!(target: targets::FOCUS, "application deactivated");
            self.close_all_popups();
        }

        if !self.state.popups.is_empty() {
            return;
        }
        match self.state.active_window.filter(|&w| self.tree.contains(w)) {
            None => {
                if self.state.focus_widget.is_some() {
                    self.set_focus_widget(None, FocusReason::ActiveWindow);
                }
            }
            Some(active) => match self.tree.focus_child(active) {
                Some(child) if self.tree.is_visible(child) => self.set_focus(child, FocusReason::ActiveWindow),
                _ => {
                    if self.tree.focus_policy(active) != FocusPolicy::NO_FOCUS {
                        self.set_focus(active, FocusReason::ActiveWindow);
                    } else if self
                        .state
                        .focus_widget
                        .is_some_and(|f| self.tree.window(f) != Some(active))
                    {
                        self.set_focus_widget(None, FocusReason::ActiveWindow);
                    }
                }
            },
        }
    }
}
