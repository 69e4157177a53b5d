//! Widget identity and the attribute types the dispatch core consumes.
//!
//! A widget is identified by a [`WidgetId`], a generation-checked handle into
//! the [`WidgetTree`](crate::WidgetTree) arena. Handles stay cheap to copy and
//! compare, and a handle to a destroyed widget never aliases a newer one: the
//! slot's generation changes on reuse, so "was this widget destroyed while I
//! was delivering an event" is a single lookup.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use slotmap::new_key_type;

new_key_type! {
    /// A unique, generation-checked identifier for a widget.
    ///
    /// `WidgetId`s remain stable while the tree is restructured and become
    /// invalid when the widget is destroyed.
    pub struct WidgetId;
}

impl WidgetId {
    /// Convert the id to a raw u64 value.
    ///
    /// The raw value can be converted back using [`WidgetId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create a `WidgetId` from a raw u64 value.
    ///
    /// This does not check whether the widget exists.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// The kind of window a widget represents.
///
/// Anything other than [`WindowType::Widget`] is a top-level window with its
/// own native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowType {
    /// A plain child widget.
    #[default]
    Widget,
    /// A normal top-level window.
    Window,
    /// A dialog window.
    Dialog,
    /// A popup (menu, dropdown). Takes an implicit input grab while shown.
    Popup,
    /// A tooltip window.
    ToolTip,
    /// The desktop window.
    Desktop,
}

impl WindowType {
    /// Whether this type makes a widget a top-level window.
    pub fn is_window(self) -> bool {
        !matches!(self, WindowType::Widget)
    }

    /// Whether this is a popup window.
    pub fn is_popup(self) -> bool {
        matches!(self, WindowType::Popup)
    }
}

/// The modality of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowModality {
    /// The window does not block other windows.
    #[default]
    NonModal,
    /// The window blocks its parent/transient-parent chain.
    WindowModal,
    /// The window blocks every other window of the application.
    ApplicationModal,
}

impl WindowModality {
    /// Check if the window is non-modal.
    pub fn is_non_modal(&self) -> bool {
        matches!(self, WindowModality::NonModal)
    }

    /// Check if the window is window-modal.
    pub fn is_window_modal(&self) -> bool {
        matches!(self, WindowModality::WindowModal)
    }

    /// Check if the window is application-modal.
    pub fn is_application_modal(&self) -> bool {
        matches!(self, WindowModality::ApplicationModal)
    }
}

/// How a widget accepts keyboard focus.
///
/// The policy is a bit set: [`FocusPolicy::STRONG`] contains both tab and
/// click focus, [`FocusPolicy::WHEEL`] additionally contains wheel focus.
/// Focus assignment checks that all bits of the required policy are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FocusPolicy(u8);

impl FocusPolicy {
    /// The widget never takes focus.
    pub const NO_FOCUS: FocusPolicy = FocusPolicy(0);

    /// Focus by tabbing.
    pub const TAB: FocusPolicy = FocusPolicy(0x1);

    /// Focus by clicking.
    pub const CLICK: FocusPolicy = FocusPolicy(0x2);

    /// Focus by tabbing and clicking.
    pub const STRONG: FocusPolicy = FocusPolicy(0x1 | 0x2 | 0x8);

    /// Strong focus plus focus by using the mouse wheel.
    pub const WHEEL: FocusPolicy = FocusPolicy(0x1 | 0x2 | 0x8 | 0x4);

    /// Check whether every bit of `required` is set.
    pub fn has(&self, required: FocusPolicy) -> bool {
        (self.0 & required.0) == required.0
    }

    /// Raw bit value.
    pub fn bits(&self) -> u8 {
        self.0
    }
}

/// Per-widget boolean attributes consulted during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WidgetAttributes(u32);

impl WidgetAttributes {
    /// No attributes.
    pub const NONE: WidgetAttributes = WidgetAttributes(0);

    /// The widget wants touch events.
    pub const ACCEPT_TOUCH_EVENTS: WidgetAttributes = WidgetAttributes(1 << 0);

    /// The widget accepts drops.
    pub const ACCEPT_DROPS: WidgetAttributes = WidgetAttributes(1 << 1);

    /// Mouse-like events never propagate past this widget.
    pub const NO_MOUSE_PROPAGATION: WidgetAttributes = WidgetAttributes(1 << 2);

    /// The widget receives hover enter/move/leave events.
    pub const HOVER: WidgetAttributes = WidgetAttributes(1 << 3);

    /// Set while the mouse cursor is over the widget.
    pub const UNDER_MOUSE: WidgetAttributes = WidgetAttributes(1 << 4);

    /// The widget has an explicitly set cursor.
    pub const SET_CURSOR: WidgetAttributes = WidgetAttributes(1 << 5);

    /// The widget owns a native platform window even though it is not a
    /// top-level window.
    pub const NATIVE_WINDOW: WidgetAttributes = WidgetAttributes(1 << 6);

    /// The window is a modality group leader.
    pub const GROUP_LEADER: WidgetAttributes = WidgetAttributes(1 << 7);

    /// A press that closes this popup is never replayed.
    pub const NO_MOUSE_REPLAY: WidgetAttributes = WidgetAttributes(1 << 8);

    /// The widget receives mouse moves with no button pressed.
    pub const MOUSE_TRACKING: WidgetAttributes = WidgetAttributes(1 << 9);

    /// The widget accepted the touch begin of the current touch sequence.
    pub const ACCEPTED_TOUCH_BEGIN: WidgetAttributes = WidgetAttributes(1 << 10);

    /// Check if all flags of `flag` are set.
    pub fn has(&self, flag: WidgetAttributes) -> bool {
        (self.0 & flag.0) == flag.0
    }

    /// Set or clear `flag`.
    pub fn set(&mut self, flag: WidgetAttributes, on: bool) {
        if on {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }

    /// Names of the set attributes, for diagnostics.
    pub fn names(&self) -> Vec<&'static str> {
        const NAMES: [(WidgetAttributes, &str); 11] = [
            (WidgetAttributes::ACCEPT_TOUCH_EVENTS, "accept-touch"),
            (WidgetAttributes::ACCEPT_DROPS, "accept-drops"),
            (WidgetAttributes::NO_MOUSE_PROPAGATION, "no-mouse-propagation"),
            (WidgetAttributes::HOVER, "hover"),
            (WidgetAttributes::UNDER_MOUSE, "under-mouse"),
            (WidgetAttributes::SET_CURSOR, "set-cursor"),
            (WidgetAttributes::NATIVE_WINDOW, "native"),
            (WidgetAttributes::GROUP_LEADER, "group-leader"),
            (WidgetAttributes::NO_MOUSE_REPLAY, "no-mouse-replay"),
            (WidgetAttributes::MOUSE_TRACKING, "mouse-tracking"),
            (WidgetAttributes::ACCEPTED_TOUCH_BEGIN, "accepted-touch-begin"),
        ];
        NAMES
            .iter()
            .filter(|(flag, _)| self.has(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for WidgetAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        WidgetAttributes(self.0 | rhs.0)
    }
}

impl BitOrAssign for WidgetAttributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for WidgetAttributes {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        WidgetAttributes(self.0 & rhs.0)
    }
}

static_assertions::assert_impl_all!(WidgetId: Copy, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_policy_bits() {
        assert!(FocusPolicy::STRONG.has(FocusPolicy::CLICK));
        assert!(FocusPolicy::STRONG.has(FocusPolicy::TAB));
        assert!(!FocusPolicy::STRONG.has(FocusPolicy::WHEEL));
        assert!(FocusPolicy::WHEEL.has(FocusPolicy::STRONG));
        assert!(!FocusPolicy::TAB.has(FocusPolicy::CLICK));
        assert!(FocusPolicy::CLICK.has(FocusPolicy::NO_FOCUS));
    }

    #[test]
    fn test_attribute_set_and_clear() {
        let mut attrs = WidgetAttributes::HOVER | WidgetAttributes::ACCEPT_DROPS;
        assert!(attrs.has(WidgetAttributes::HOVER));
        attrs.set(WidgetAttributes::HOVER, false);
        assert!(!attrs.has(WidgetAttributes::HOVER));
        assert!(attrs.has(WidgetAttributes::ACCEPT_DROPS));
        assert_eq!(attrs.names(), vec!["accept-drops"]);
    }

    #[test]
    fn test_widget_id_raw_roundtrip() {
        let id = WidgetId::from_raw((1_u64 << 32) | 7);
        assert_eq!(WidgetId::from_raw(id.as_raw()), id);
    }
}
