//! Conversions from winit input types.
//!
//! A window system integration built on winit turns its window events into
//! the raw events taken by the `Application::handle_*` entry points with
//! these helpers.

use horizon_input_core::Point;
use winit::event::{ElementState, Modifiers, MouseButton as WinitMouseButton, MouseScrollDelta, Touch, TouchPhase};
use winit::keyboard::{Key as WinitKey, NamedKey};

use crate::events::{EventType, Key, KeyboardModifiers, MouseButton, TouchPoint, TouchPointState};

/// Wheel rotation reported for one line (one notch), in eighths of a
/// degree.
pub const ANGLE_PER_LINE: f32 = 120.0;

/// Converts a winit mouse button. Buttons beyond the fifth are not mapped.
pub fn from_winit_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Back => Some(MouseButton::Button4),
        WinitMouseButton::Forward => Some(MouseButton::Button5),
        WinitMouseButton::Other(_) => None,
    }
}

/// The mouse event type for a button state change.
pub fn mouse_event_type(state: ElementState) -> EventType {
    match state {
        ElementState::Pressed => EventType::MouseButtonPress,
        ElementState::Released => EventType::MouseButtonRelease,
    }
}

/// The key event type for a key state change.
pub fn key_event_type(state: ElementState) -> EventType {
    match state {
        ElementState::Pressed => EventType::KeyPress,
        ElementState::Released => EventType::KeyRelease,
    }
}

pub fn from_winit_modifiers(modifiers: &Modifiers) -> KeyboardModifiers {
    let state = modifiers.state();
    KeyboardModifiers {
        shift: state.shift_key(),
        control: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

/// Converts a winit logical key. Tab with Shift held is reported as
/// [`Key::Backtab`].
pub fn from_winit_key(key: &WinitKey, modifiers: KeyboardModifiers) -> Key {
    match key {
        WinitKey::Named(NamedKey::Tab) if modifiers.shift => Key::Backtab,
        WinitKey::Named(named) => from_winit_named_key(*named),
        WinitKey::Character(text) => text.chars().next().map_or(Key::Unknown, Key::Character),
        WinitKey::Unidentified(_) | WinitKey::Dead(_) => Key::Unknown,
    }
}

fn from_winit_named_key(key: NamedKey) -> Key {
    match key {
        NamedKey::ArrowUp => Key::ArrowUp,
        NamedKey::ArrowDown => Key::ArrowDown,
        NamedKey::ArrowLeft => Key::ArrowLeft,
        NamedKey::ArrowRight => Key::ArrowRight,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        NamedKey::PageUp => Key::PageUp,
        NamedKey::PageDown => Key::PageDown,
        NamedKey::Tab => Key::Tab,
        NamedKey::Enter => Key::Enter,
        NamedKey::Escape => Key::Escape,
        NamedKey::Space => Key::Space,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Delete => Key::Delete,
        NamedKey::Insert => Key::Insert,
        NamedKey::ContextMenu => Key::Menu,
        NamedKey::F1 => Key::F(1),
        NamedKey::F2 => Key::F(2),
        NamedKey::F3 => Key::F(3),
        NamedKey::F4 => Key::F(4),
        NamedKey::F5 => Key::F(5),
        NamedKey::F6 => Key::F(6),
        NamedKey::F7 => Key::F(7),
        NamedKey::F8 => Key::F(8),
        NamedKey::F9 => Key::F(9),
        NamedKey::F10 => Key::F(10),
        NamedKey::F11 => Key::F(11),
        NamedKey::F12 => Key::F(12),
        _ => Key::Unknown,
    }
}

/// Splits a winit scroll delta into the wheel event's angle delta and
/// pixel delta. Line deltas become whole notches; pixel deltas are reported
/// as both.
pub fn from_winit_scroll_delta(delta: MouseScrollDelta) -> (Point, Point) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (Point::new(x * ANGLE_PER_LINE, y * ANGLE_PER_LINE), Point::ZERO),
        MouseScrollDelta::PixelDelta(pos) => {
            let pixels = Point::new(pos.x as f32, pos.y as f32);
            (pixels, pixels)
        }
    }
}

/// The point state for a touch phase. A cancelled touch has none: the
/// whole device is canceled with
/// [`Application::handle_touch_cancel`](crate::Application::handle_touch_cancel).
pub fn from_winit_touch_phase(phase: TouchPhase) -> Option<TouchPointState> {
    match phase {
        TouchPhase::Started => Some(TouchPointState::Pressed),
        TouchPhase::Moved => Some(TouchPointState::Moved),
        TouchPhase::Ended => Some(TouchPointState::Released),
        TouchPhase::Cancelled => None,
    }
}

/// A raw touch point from a winit touch, given the global position of the
/// window's origin.
pub fn from_winit_touch(touch: &Touch, window_origin: Point) -> Option<TouchPoint> {
    let state = from_winit_touch_phase(touch.phase)?;
    let screen_pos = window_origin + Point::new(touch.location.x as f32, touch.location.y as f32);
    let mut point = TouchPoint::new(touch.id, state, screen_pos);
    if let Some(force) = touch.force {
        point.pressure = force.normalized() as f32;
    }
    Some(point)
}
