//! Process-wide dispatch state.
//!
//! Everything the dispatch core remembers between events lives in one
//! [`DispatchState`] owned by the [`Application`](crate::Application):
//! the popup and modal stacks, grabs, focus, the widget under the mouse and
//! the per-device touch bookkeeping. Widget ids stored here may go stale
//! when a handler destroys a widget, so every reader re-checks them against
//! the tree.

use horizon_input_core::{Point, WidgetId};

use crate::events::{Event, EventType, KeyboardModifiers, MouseButtons};
use crate::gesture::GestureStore;
use crate::modal::ModalStack;
use crate::popup::PopupStack;
use crate::tooltip::ToolTipState;
use crate::touch::TouchState;

/// State shared by every dispatch path.
#[derive(Debug, Default)]
pub struct DispatchState {
    /// Set during shutdown; every event is swallowed.
    pub(crate) closing: bool,
    /// Modifiers of the last spontaneous input event.
    pub(crate) modifiers: KeyboardModifiers,
    /// Buttons held according to spontaneous press and release events.
    pub(crate) mouse_buttons: MouseButtons,

    pub(crate) popups: PopupStack,
    pub(crate) modals: ModalStack,
    pub(crate) mouse_grabber: Option<WidgetId>,
    pub(crate) keyboard_grabber: Option<WidgetId>,
    pub(crate) focus_widget: Option<WidgetId>,
    pub(crate) active_window: Option<WidgetId>,
    /// Focus at the time of the last spontaneous press, recorded when focus
    /// moves on release.
    pub(crate) focus_at_press: Option<Option<WidgetId>>,

    /// Implicit grab target between a press and the matching release.
    pub(crate) button_down: Option<WidgetId>,
    /// The popup that received the press `button_down` belongs to.
    pub(crate) popup_down: Option<WidgetId>,
    pub(crate) last_mouse_receiver: Option<WidgetId>,
    /// Widget whose leave was deferred until the button is released.
    pub(crate) leave_after_release: Option<WidgetId>,
    /// Set when the last popup closed because of a press outside it.
    pub(crate) replay_mouse_press: bool,
    pub(crate) last_press_global: Point,
    /// Global pointer position as of the last hover event.
    pub(crate) hover_global_pos: Point,
    /// Global pointer position as of the last raw pointer input.
    pub(crate) cursor_pos: Point,

    pub(crate) drag_target: Option<WidgetId>,
    pub(crate) touch: TouchState,
    pub(crate) tooltip: ToolTipState,
    pub(crate) gestures: GestureStore,
    /// Set while a key press travels up the parent chain.
    pub(crate) key_is_focus_navigation: bool,
}

impl DispatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the application is shutting down.
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Keyboard modifiers as of the last spontaneous input event.
    pub fn modifiers(&self) -> KeyboardModifiers {
        self.modifiers
    }

    /// Mouse buttons currently held.
    pub fn mouse_buttons(&self) -> MouseButtons {
        self.mouse_buttons
    }

    pub fn popups(&self) -> &PopupStack {
        &self.popups
    }

    pub fn modals(&self) -> &ModalStack {
        &self.modals
    }

    pub fn mouse_grabber(&self) -> Option<WidgetId> {
        self.mouse_grabber
    }

    pub fn keyboard_grabber(&self) -> Option<WidgetId> {
        self.keyboard_grabber
    }

    pub fn focus_widget(&self) -> Option<WidgetId> {
        self.focus_widget
    }

    pub fn active_window(&self) -> Option<WidgetId> {
        self.active_window
    }

    /// The widget holding the implicit press grab.
    pub fn button_down(&self) -> Option<WidgetId> {
        self.button_down
    }

    /// The widget that received the last mouse event.
    pub fn last_mouse_receiver(&self) -> Option<WidgetId> {
        self.last_mouse_receiver
    }

    /// The pointer position as of the last raw pointer input.
    pub fn cursor_pos(&self) -> Point {
        self.cursor_pos
    }

    pub fn leave_after_release(&self) -> Option<WidgetId> {
        self.leave_after_release
    }

    /// Whether a dismissing press is waiting to be replayed.
    pub fn replay_mouse_press(&self) -> bool {
        self.replay_mouse_press
    }

    /// The widget that accepted the current drag.
    pub fn drag_target(&self) -> Option<WidgetId> {
        self.drag_target
    }

    pub fn touch(&self) -> &TouchState {
        &self.touch
    }

    pub fn tooltip(&self) -> &ToolTipState {
        &self.tooltip
    }

    pub fn gestures(&self) -> &GestureStore {
        &self.gestures
    }

    /// Whether a key press is currently being offered to the parents of the
    /// focus widget. Handlers use it to leave navigation keys alone.
    pub fn key_is_focus_navigation(&self) -> bool {
        self.key_is_focus_navigation
    }

    /// Record modifiers and held buttons from a spontaneous input event.
    pub(crate) fn capture_input(&mut self, event: &Event) {
        match event {
            Event::Mouse(mouse) => {
                self.modifiers = mouse.modifiers;
                if let Some(button) = mouse.button {
                    match mouse.event_type {
                        EventType::MouseButtonPress => self.mouse_buttons = self.mouse_buttons.with(button),
                        EventType::MouseButtonRelease => self.mouse_buttons = self.mouse_buttons.without(button),
                        _ => {}
                    }
                }
            }
            Event::Key(key) => self.modifiers = key.modifiers,
            Event::Wheel(wheel) => self.modifiers = wheel.modifiers,
            Event::Tablet(tablet) => self.modifiers = tablet.modifiers,
            _ => {}
        }
    }

    /// Drop every reference to a destroyed widget.
    pub(crate) fn forget_widget(&mut self, widget: WidgetId) {
        let clear = |slot: &mut Option<WidgetId>| {
            if *slot == Some(widget) {
                *slot = None;
            }
        };
        clear(&mut self.mouse_grabber);
        clear(&mut self.keyboard_grabber);
        clear(&mut self.focus_widget);
        clear(&mut self.active_window);
        clear(&mut self.button_down);
        clear(&mut self.popup_down);
        clear(&mut self.last_mouse_receiver);
        clear(&mut self.leave_after_release);
        clear(&mut self.drag_target);
        if self.focus_at_press == Some(Some(widget)) {
            self.focus_at_press = None;
        }
        self.popups.remove(widget);
        self.modals.remove(widget);
        self.touch.forget_widget(widget);
        self.tooltip.forget_widget(widget);
        self.gestures.forget_widget(widget);
    }
}
