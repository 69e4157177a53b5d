//! Modal windows.
//!
//! Showing a window with a modality other than non-modal puts it at the
//! front of the modal list. A window is blocked when some modal window
//! claims it:
//!
//! - an application-modal window blocks every window that is not the modal
//!   window, one of its owners, or in a group led by a group leader the
//!   modal window does not belong to;
//! - a window-modal window blocks every window whose owner chain meets the
//!   modal window's owner chain, except the modal window's own owners
//!   and descendants.
//!
//! The owner of a window is its parent, or its transient parent when it
//! has none. The active popup is never blocked.

use horizon_input_core::logging::targets;
use horizon_input_core::{WidgetAttributes, WidgetId, WindowModality};

use crate::application::Application;
use crate::events::{Event, EventType};

/// Visible modal windows, most recently shown first.
#[derive(Debug, Clone, Default)]
pub struct ModalStack {
    windows: Vec<WidgetId>,
}

impl ModalStack {
    /// The most recently shown modal window.
    pub fn active(&self) -> Option<WidgetId> {
        self.windows.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn contains(&self, window: WidgetId) -> bool {
        self.windows.contains(&window)
    }

    /// Modal windows, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.windows.iter().copied()
    }

    pub(crate) fn push_front(&mut self, window: WidgetId) {
        self.windows.retain(|&w| w != window);
        self.windows.insert(0, window);
    }

    pub(crate) fn remove(&mut self, window: WidgetId) -> bool {
        let before = self.windows.len();
        self.windows.retain(|&w| w != window);
        self.windows.len() != before
    }
}

impl Application {
    /// The most recently shown modal window.
    pub fn active_modal_window(&self) -> Option<WidgetId> {
        self.state.modals.active()
    }

    /// Whether the window of `widget` is blocked by a modal window.
    ///
    /// An invalid id is not blocked.
    pub fn is_window_blocked(&self, widget: WidgetId) -> bool {
        let Some(window) = self.tree.window(widget) else {
            tracing::warn!(target: targets::MODAL, ?widget, "is_window_blocked on an invalid widget");
            return false;
        };
        if self.state.modals.is_empty() || self.state.popups.active() == Some(window) {
            return false;
        }
        self.state
            .modals
            .iter()
            .filter(|&modal| self.tree.contains(modal))
            .any(|modal| self.is_blocked_by(window, modal))
    }

    fn is_blocked_by(&self, window: WidgetId, modal: WidgetId) -> bool {
        if self.owner_chain(window).any(|w| w == modal) {
            return false;
        }
        match self.effective_modality(modal) {
            WindowModality::WindowModal => {
                let modal_windows: Vec<WidgetId> = self.owner_windows(modal).collect();
                self.owner_windows(window).any(|w| modal_windows.contains(&w))
            }
            _ => match self
                .owner_chain(window)
                .find(|&w| self.tree.test_attribute(w, WidgetAttributes::GROUP_LEADER))
            {
                Some(leader) => self
                    .owner_chain(modal)
                    .find(|&m| m == leader || self.tree.test_attribute(m, WidgetAttributes::GROUP_LEADER))
                    == Some(leader),
                None => modal != window,
            },
        }
    }

    /// A modal window without an explicit modality is window-modal when it
    /// belongs to a group leader and application-modal otherwise.
    fn effective_modality(&self, modal: WidgetId) -> WindowModality {
        let modality = self.tree.modality(modal);
        if !modality.is_non_modal() {
            return modality;
        }
        if self
            .owner_windows(modal)
            .any(|w| self.tree.test_attribute(w, WidgetAttributes::GROUP_LEADER))
        {
            WindowModality::WindowModal
        } else {
            WindowModality::ApplicationModal
        }
    }

    /// `widget` and its owners, widget by widget.
    fn owner_chain(&self, widget: WidgetId) -> impl Iterator<Item = WidgetId> + '_ {
        std::iter::successors(Some(widget), |&w| self.tree.parent_or_transient(w))
    }

    /// The window of `widget` and the windows of its owners.
    fn owner_windows(&self, widget: WidgetId) -> impl Iterator<Item = WidgetId> + '_ {
        std::iter::successors(self.tree.window(widget), |&w| {
            self.tree.parent_or_transient(w).and_then(|owner| self.tree.window(owner))
        })
    }

    /// Whether `widget` may receive input: always while a popup is open,
    /// otherwise only when its window is not blocked.
    pub fn try_modal(&self, widget: WidgetId) -> bool {
        self.state.popups.active().is_some() || !self.is_window_blocked(widget)
    }

    /// Whether raw input of `event_type` arriving at `window` may be
    /// dispatched. A release still reaches the widget that took the press,
    /// and mouse input passes while a drag is in progress. Of the rest,
    /// only pointer, key and crossing input is dropped for blocked windows.
    pub(crate) fn accepts_raw_input(&self, window: WidgetId, event_type: EventType, hit: Option<WidgetId>) -> bool {
        if event_type.is_mouse() && self.state.drag_target.is_some() {
            return true;
        }
        if event_type == EventType::MouseButtonRelease
            && let Some(down) = self.state.button_down
            && (down == window || hit == Some(down))
        {
            return true;
        }
        if self.try_modal(window) {
            return true;
        }
        let dropped = event_type.is_mouse()
            || event_type.is_touch()
            || matches!(
                event_type,
                EventType::Wheel
                    | EventType::KeyPress
                    | EventType::KeyRelease
                    | EventType::Enter
                    | EventType::Leave
                    | EventType::TabletPress
                    | EventType::TabletMove
                    | EventType::TabletRelease
                    | EventType::ContextMenu
                    | EventType::NativeGesture
            );
        if dropped {
            tracing::trace!(target: targets::MODAL, ?window, ?event_type, "input dropped for blocked window");
        }
        !dropped
    }

    /// Windows currently blocked, in top-level order.
    fn blocked_windows(&self) -> Vec<WidgetId> {
        self.tree
            .top_levels()
            .iter()
            .copied()
            .filter(|&w| self.is_window_blocked(w))
            .collect()
    }

    /// Put `window` at the front of the modal list and send WindowBlocked
    /// to every window that became blocked.
    pub(crate) fn enter_modal(&mut self, window: WidgetId) {
        let blocked_before = self.blocked_windows();

        let leave = self.state.last_mouse_receiver.take();
        if leave.is_some() {
            self.dispatch_enter_leave(None, leave);
        }
        self.state.modals.push_front(window);
        tracing::debug!(target: targets::MODAL, ?window, modality = ?self.tree.modality(window), "modal window entered");

        for blocked in self.blocked_windows() {
            if !blocked_before.contains(&blocked) && self.tree.contains(blocked) {
                self.send_event(blocked, &mut Event::basic(EventType::WindowBlocked));
            }
        }
    }

    /// Remove `window` from the modal list and send WindowUnblocked to every
    /// window it released. When the last modal window goes, the widget under
    /// the pointer (or the mouse grabber) gets Enter.
    pub(crate) fn leave_modal(&mut self, window: WidgetId) {
        let blocked_before = self.blocked_windows();

        if !self.state.modals.remove(window) {
            return;
        }
        tracing::debug!(target: targets::MODAL, ?window, "modal window left");

        if self.state.modals.is_empty() {
            let mut enter = self.tree.widget_at(self.state.cursor_pos);
            let mut leave = self.state.last_mouse_receiver;
            if let Some(grabber) = self.state.mouse_grabber.filter(|&g| self.tree.contains(g)) {
                enter = Some(grabber);
                if leave == enter {
                    leave = None;
                }
            }
            self.dispatch_enter_leave(enter, leave);
            self.state.last_mouse_receiver = enter.filter(|&w| self.tree.contains(w));
        }

        for unblocked in blocked_before {
            if self.tree.contains(unblocked) && !self.is_window_blocked(unblocked) {
                self.send_event(unblocked, &mut Event::basic(EventType::WindowUnblocked));
            }
        }
    }
}
