//! The event taxonomy.
//!
//! Every event delivered through [`Application::notify`](crate::Application::notify)
//! is an [`Event`]: one enum variant per payload shape, each payload carrying
//! an [`EventBase`] with the accept and spontaneous flags. Variants that cover
//! several event types (press/release/move, touch begin/update/end) store
//! their [`EventType`] alongside the payload.
//!
//! Events are constructed accepted. A handler that does not want an event
//! calls [`Event::ignore`] so the dispatcher can offer it to the parent.

use std::collections::HashMap;

use horizon_input_core::{Point, WidgetId};

use crate::gesture::{GestureId, GestureState, GestureTimerId, GestureType};

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Meta modifier only.
    pub const META: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: true,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left = 0,
    /// Secondary button (usually right).
    Right = 1,
    /// Middle button (scroll wheel click).
    Middle = 2,
    /// Additional button 1 (e.g., browser back).
    Button4 = 3,
    /// Additional button 2 (e.g., browser forward).
    Button5 = 4,
}

/// The set of mouse buttons currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MouseButtons(u8);

impl MouseButtons {
    /// No buttons held.
    pub const NONE: Self = Self(0);

    /// Whether `button` is held.
    pub fn contains(self, button: MouseButton) -> bool {
        self.0 & (1 << button as u8) != 0
    }

    /// This set with `button` added.
    #[must_use]
    pub fn with(self, button: MouseButton) -> Self {
        Self(self.0 | (1 << button as u8))
    }

    /// This set with `button` removed.
    #[must_use]
    pub fn without(self, button: MouseButton) -> Self {
        Self(self.0 & !(1 << button as u8))
    }

    /// Whether no button is held.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        Self::NONE.with(button)
    }
}

/// Logical keys the dispatch core distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    /// Shift+Tab.
    Backtab,
    Enter,
    Escape,
    Space,
    Backspace,
    Delete,
    Insert,
    /// The context-menu key.
    Menu,
    /// Function key F1..F24.
    F(u8),
    /// A key that produces a character.
    Character(char),
    /// A key with no mapping.
    Unknown,
}

impl Key {
    /// Keys that move focus between widgets.
    pub fn is_focus_navigation(self) -> bool {
        matches!(
            self,
            Key::Tab | Key::Backtab | Key::ArrowLeft | Key::ArrowUp | Key::ArrowRight | Key::ArrowDown
        )
    }
}

/// The type tag of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    MouseButtonPress,
    MouseButtonRelease,
    MouseButtonDblClick,
    MouseMove,
    Wheel,
    KeyPress,
    KeyRelease,
    TouchBegin,
    TouchUpdate,
    TouchEnd,
    TouchCancel,
    TabletPress,
    TabletMove,
    TabletRelease,
    ContextMenu,
    ToolTip,
    DragEnter,
    DragMove,
    DragLeave,
    Drop,
    Gesture,
    GestureOverride,
    NativeGesture,
    FocusIn,
    FocusOut,
    Enter,
    Leave,
    HoverEnter,
    HoverMove,
    HoverLeave,
    ActivationChange,
    WindowActivate,
    WindowDeactivate,
    WindowBlocked,
    WindowUnblocked,
    ApplicationDeactivate,
    Close,
    Show,
    Hide,
    Timer,
    Paint,
    ChildAdded,
    ChildPolished,
    ChildRemoved,
    DeferredDelete,
    UpdateRequest,
    LocaleChange,
    Style,
    StyleChange,
    DynamicPropertyChange,
}

impl EventType {
    /// Press, release and double click.
    pub fn is_mouse_button(self) -> bool {
        matches!(
            self,
            EventType::MouseButtonPress | EventType::MouseButtonRelease | EventType::MouseButtonDblClick
        )
    }

    /// Mouse button and move events.
    pub fn is_mouse(self) -> bool {
        self.is_mouse_button() || self == EventType::MouseMove
    }

    /// Touch begin, update, end and cancel.
    pub fn is_touch(self) -> bool {
        matches!(
            self,
            EventType::TouchBegin | EventType::TouchUpdate | EventType::TouchEnd | EventType::TouchCancel
        )
    }

    /// Events that are never shown to gesture recognizers. Some of them are
    /// emitted while gestures are being processed.
    pub fn bypasses_gesture_filter(self) -> bool {
        matches!(
            self,
            EventType::Paint
                | EventType::DeferredDelete
                | EventType::DragEnter
                | EventType::DragMove
                | EventType::DragLeave
                | EventType::Drop
                | EventType::ChildAdded
                | EventType::ChildPolished
                | EventType::ChildRemoved
                | EventType::UpdateRequest
                | EventType::LocaleChange
                | EventType::Style
                | EventType::StyleChange
                | EventType::DynamicPropertyChange
        )
    }

    /// Events that put the tooltip machinery to sleep.
    pub(crate) fn stops_tooltip_fall_asleep(self) -> bool {
        matches!(
            self,
            EventType::Wheel
                | EventType::ActivationChange
                | EventType::KeyPress
                | EventType::KeyRelease
                | EventType::FocusOut
                | EventType::FocusIn
                | EventType::MouseButtonPress
                | EventType::MouseButtonRelease
                | EventType::MouseButtonDblClick
        )
    }
}

/// Common data for all events.
#[derive(Debug, Clone, Copy)]
pub struct EventBase {
    accepted: bool,
    spontaneous: bool,
}

impl Default for EventBase {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBase {
    /// Create an accepted, non-spontaneous event base.
    pub fn new() -> Self {
        Self {
            accepted: true,
            spontaneous: false,
        }
    }

    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Accept the event, preventing further propagation.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Ignore the event, allowing further propagation.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }

    /// Set the accept flag.
    pub fn set_accepted(&mut self, accepted: bool) {
        self.accepted = accepted;
    }

    /// Whether the event came from the window system.
    pub fn spontaneous(&self) -> bool {
        self.spontaneous
    }

    pub(crate) fn set_spontaneous(&mut self, spontaneous: bool) {
        self.spontaneous = spontaneous;
    }
}

/// Mouse press, release, double click and move.
#[derive(Debug, Clone)]
pub struct MouseEvent {
    pub base: EventBase,
    pub event_type: EventType,
    /// Position in the receiver's coordinates.
    pub pos: Point,
    /// Position in global coordinates.
    pub global_pos: Point,
    /// The button that caused the event; `None` for moves.
    pub button: Option<MouseButton>,
    /// Buttons held after the event.
    pub buttons: MouseButtons,
    pub modifiers: KeyboardModifiers,
}

impl MouseEvent {
    /// Create a mouse event.
    pub fn new(
        event_type: EventType,
        pos: Point,
        global_pos: Point,
        button: Option<MouseButton>,
        buttons: MouseButtons,
        modifiers: KeyboardModifiers,
    ) -> Self {
        Self {
            base: EventBase::new(),
            event_type,
            pos,
            global_pos,
            button,
            buttons,
            modifiers,
        }
    }
}

/// Scroll wheel event.
#[derive(Debug, Clone)]
pub struct WheelEvent {
    pub base: EventBase,
    pub pos: Point,
    pub global_pos: Point,
    /// Rotation in eighths of a degree.
    pub angle_delta: Point,
    /// Scroll distance in pixels, for high-resolution devices.
    pub pixel_delta: Point,
    pub buttons: MouseButtons,
    pub modifiers: KeyboardModifiers,
}

impl WheelEvent {
    /// Create a wheel event.
    pub fn new(pos: Point, global_pos: Point, angle_delta: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            pos,
            global_pos,
            angle_delta,
            pixel_delta: Point::ZERO,
            buttons: MouseButtons::NONE,
            modifiers,
        }
    }
}

/// Key press or release.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    pub base: EventBase,
    pub event_type: EventType,
    pub key: Key,
    /// Text the key produced, possibly empty.
    pub text: String,
    pub modifiers: KeyboardModifiers,
    pub is_repeat: bool,
}

impl KeyEvent {
    /// Create a key event.
    pub fn new(event_type: EventType, key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            event_type,
            key,
            text: String::new(),
            modifiers,
            is_repeat: false,
        }
    }
}

/// Kind of touch input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TouchDeviceType {
    /// Points are reported where the finger is; different points may
    /// target different widgets.
    #[default]
    TouchScreen,
    /// Points are relative to the pad; all points go to one widget.
    TouchPad,
}

/// A touch input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchDevice {
    pub id: u64,
    pub kind: TouchDeviceType,
}

impl TouchDevice {
    /// A touch screen with the given id.
    pub const fn screen(id: u64) -> Self {
        Self {
            id,
            kind: TouchDeviceType::TouchScreen,
        }
    }

    /// A touch pad with the given id.
    pub const fn pad(id: u64) -> Self {
        Self {
            id,
            kind: TouchDeviceType::TouchPad,
        }
    }
}

/// The state of one touch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TouchPointState {
    Pressed = 0x1,
    Moved = 0x2,
    Stationary = 0x4,
    Released = 0x8,
}

/// The union of the states of all points in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TouchPointStates(u8);

impl TouchPointStates {
    /// The empty set.
    pub const NONE: Self = Self(0);

    /// Add a state.
    pub fn insert(&mut self, state: TouchPointState) {
        self.0 |= state as u8;
    }

    /// Whether `state` is in the set.
    pub fn contains(self, state: TouchPointState) -> bool {
        self.0 & state as u8 != 0
    }

    /// Whether the set holds exactly `state`.
    pub fn is_only(self, state: TouchPointState) -> bool {
        self.0 == state as u8
    }

    /// The union of the states of `points`.
    pub fn of(points: &[TouchPoint]) -> Self {
        let mut states = Self::NONE;
        for point in points {
            states.insert(point.state);
        }
        states
    }
}

/// One finger in a touch event.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub state: TouchPointState,
    /// Position in the receiver's coordinates.
    pub pos: Point,
    pub start_pos: Point,
    pub last_pos: Point,
    /// Position in global coordinates.
    pub screen_pos: Point,
    pub start_screen_pos: Point,
    pub last_screen_pos: Point,
    pub pressure: f32,
}

impl TouchPoint {
    /// A raw point as reported by the window system. Start and last
    /// positions are filled in during translation.
    pub fn new(id: u64, state: TouchPointState, screen_pos: Point) -> Self {
        Self {
            id,
            state,
            pos: screen_pos,
            start_pos: screen_pos,
            last_pos: screen_pos,
            screen_pos,
            start_screen_pos: screen_pos,
            last_screen_pos: screen_pos,
            pressure: if state == TouchPointState::Released { 0.0 } else { 1.0 },
        }
    }

    pub(crate) fn translate(&mut self, offset: Point) {
        self.pos += offset;
        self.start_pos += offset;
        self.last_pos += offset;
    }
}

/// Touch begin, update, end or cancel.
#[derive(Debug, Clone)]
pub struct TouchEvent {
    pub base: EventBase,
    pub event_type: EventType,
    pub device: TouchDevice,
    pub points: Vec<TouchPoint>,
    pub states: TouchPointStates,
    pub modifiers: KeyboardModifiers,
    /// Milliseconds on an arbitrary monotonic clock.
    pub timestamp: u64,
    /// The widget currently being offered the event.
    pub widget: Option<WidgetId>,
}

impl TouchEvent {
    /// Create a touch event; the state mask is computed from the points.
    pub fn new(event_type: EventType, device: TouchDevice, points: Vec<TouchPoint>, timestamp: u64) -> Self {
        let states = TouchPointStates::of(&points);
        Self {
            base: EventBase::new(),
            event_type,
            device,
            points,
            states,
            modifiers: KeyboardModifiers::NONE,
            timestamp,
            widget: None,
        }
    }
}

/// Tablet stylus press, move or release.
#[derive(Debug, Clone)]
pub struct TabletEvent {
    pub base: EventBase,
    pub event_type: EventType,
    pub pos: Point,
    pub global_pos: Point,
    pub pressure: f32,
    pub x_tilt: i32,
    pub y_tilt: i32,
    pub button: Option<MouseButton>,
    pub buttons: MouseButtons,
    pub modifiers: KeyboardModifiers,
}

impl TabletEvent {
    /// Create a tablet event.
    pub fn new(event_type: EventType, pos: Point, global_pos: Point, pressure: f32) -> Self {
        Self {
            base: EventBase::new(),
            event_type,
            pos,
            global_pos,
            pressure,
            x_tilt: 0,
            y_tilt: 0,
            button: None,
            buttons: MouseButtons::NONE,
            modifiers: KeyboardModifiers::NONE,
        }
    }
}

/// Why a context menu was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextMenuReason {
    /// Right mouse button.
    #[default]
    Mouse,
    /// The menu key.
    Keyboard,
    Other,
}

/// Context menu request.
#[derive(Debug, Clone)]
pub struct ContextMenuEvent {
    pub base: EventBase,
    pub reason: ContextMenuReason,
    pub pos: Point,
    pub global_pos: Point,
    pub modifiers: KeyboardModifiers,
}

impl ContextMenuEvent {
    /// Create a context menu event.
    pub fn new(reason: ContextMenuReason, pos: Point, global_pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            reason,
            pos,
            global_pos,
            modifiers,
        }
    }
}

/// Tooltip request.
#[derive(Debug, Clone)]
pub struct HelpEvent {
    pub base: EventBase,
    pub pos: Point,
    pub global_pos: Point,
}

/// Proposed action of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropAction {
    #[default]
    Copy,
    Move,
    Link,
    Ignore,
}

/// Drag enter, move, leave and drop.
#[derive(Debug, Clone)]
pub struct DragEvent {
    pub base: EventBase,
    pub event_type: EventType,
    pub pos: Point,
    pub action: DropAction,
    pub buttons: MouseButtons,
    pub modifiers: KeyboardModifiers,
}

impl DragEvent {
    /// Create a drag event.
    pub fn new(event_type: EventType, pos: Point) -> Self {
        Self {
            base: EventBase::new(),
            event_type,
            pos,
            action: DropAction::default(),
            buttons: MouseButtons::NONE,
            modifiers: KeyboardModifiers::NONE,
        }
    }
}

/// One gesture carried by a [`GestureEvent`].
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEntry {
    pub id: GestureId,
    pub gesture_type: GestureType,
    pub state: GestureState,
    pub hot_spot: Option<Point>,
    accepted: bool,
}

impl GestureEntry {
    pub(crate) fn new(id: GestureId, gesture_type: GestureType, state: GestureState, hot_spot: Option<Point>) -> Self {
        Self {
            id,
            gesture_type,
            state,
            hot_spot,
            accepted: true,
        }
    }

    /// Whether the gesture is still accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }
}

/// A batch of gestures for one widget, or an override probe.
#[derive(Debug, Clone)]
pub struct GestureEvent {
    pub base: EventBase,
    /// [`EventType::Gesture`] or [`EventType::GestureOverride`].
    pub event_type: EventType,
    gestures: Vec<GestureEntry>,
    target_widgets: HashMap<GestureType, WidgetId>,
}

impl GestureEvent {
    /// Create a gesture event.
    pub fn new(event_type: EventType, gestures: Vec<GestureEntry>) -> Self {
        Self {
            base: EventBase::new(),
            event_type,
            gestures,
            target_widgets: HashMap::new(),
        }
    }

    /// All gestures in the event.
    pub fn gestures(&self) -> &[GestureEntry] {
        &self.gestures
    }

    /// The gesture of the given type, if present.
    pub fn gesture(&self, gesture_type: GestureType) -> Option<&GestureEntry> {
        self.gestures.iter().find(|g| g.gesture_type == gesture_type)
    }

    /// Gestures that have not finished or been canceled.
    pub fn active_gestures(&self) -> impl Iterator<Item = &GestureEntry> {
        self.gestures
            .iter()
            .filter(|g| !matches!(g.state, GestureState::Finished | GestureState::Canceled))
    }

    /// Gestures that were canceled.
    pub fn canceled_gestures(&self) -> impl Iterator<Item = &GestureEntry> {
        self.gestures.iter().filter(|g| g.state == GestureState::Canceled)
    }

    /// Accept one gesture.
    pub fn accept_gesture(&mut self, id: GestureId) {
        self.set_gesture_accepted(id, true);
    }

    /// Ignore one gesture so the parent may receive it.
    pub fn ignore_gesture(&mut self, id: GestureId) {
        self.set_gesture_accepted(id, false);
    }

    /// Set the accept flag of one gesture.
    pub fn set_gesture_accepted(&mut self, id: GestureId, accepted: bool) {
        if let Some(entry) = self.gestures.iter_mut().find(|g| g.id == id) {
            entry.accepted = accepted;
        }
    }

    /// Whether one gesture is accepted. Unknown ids are not.
    pub fn is_gesture_accepted(&self, id: GestureId) -> bool {
        self.gestures.iter().any(|g| g.id == id && g.accepted)
    }

    /// The widget that accepted gestures of `gesture_type` during the
    /// gesture walk.
    pub fn target_widget(&self, gesture_type: GestureType) -> Option<WidgetId> {
        self.target_widgets.get(&gesture_type).copied()
    }

    pub(crate) fn set_target_widget(&mut self, gesture_type: GestureType, widget: WidgetId) {
        self.target_widgets.insert(gesture_type, widget);
    }

    pub(crate) fn set_all_gestures_accepted(&mut self, accepted: bool) {
        for entry in &mut self.gestures {
            entry.accepted = accepted;
        }
    }

    pub(crate) fn take_gestures(&mut self) -> Vec<GestureEntry> {
        std::mem::take(&mut self.gestures)
    }

    pub(crate) fn set_gestures(&mut self, gestures: Vec<GestureEntry>) {
        self.gestures = gestures;
    }
}

/// Kinds of platform gesture markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeGestureType {
    Begin,
    End,
    Pan,
    Zoom,
    SmartZoom,
    Rotate,
    Swipe,
}

/// A gesture recognized by the operating system.
#[derive(Debug, Clone)]
pub struct NativeGestureEvent {
    pub base: EventBase,
    pub kind: NativeGestureType,
    pub pos: Point,
    pub global_pos: Point,
    /// Zoom factor delta, rotation delta in degrees, or swipe angle in
    /// degrees, depending on `kind`.
    pub value: f64,
    /// Pan delta for [`NativeGestureType::Pan`].
    pub delta: Point,
}

impl NativeGestureEvent {
    /// Create a native gesture event.
    pub fn new(kind: NativeGestureType, pos: Point, global_pos: Point, value: f64) -> Self {
        Self {
            base: EventBase::new(),
            kind,
            pos,
            global_pos,
            value,
            delta: Point::ZERO,
        }
    }
}

/// Why focus moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusReason {
    Mouse,
    Tab,
    Backtab,
    ActiveWindow,
    Popup,
    Shortcut,
    #[default]
    Other,
}

/// Focus in or out.
#[derive(Debug, Clone)]
pub struct FocusEvent {
    pub base: EventBase,
    pub event_type: EventType,
    pub reason: FocusReason,
}

impl FocusEvent {
    /// Create a focus event.
    pub fn new(event_type: EventType, reason: FocusReason) -> Self {
        Self {
            base: EventBase::new(),
            event_type,
            reason,
        }
    }
}

/// The pointer entered a widget.
#[derive(Debug, Clone)]
pub struct EnterEvent {
    pub base: EventBase,
    pub pos: Point,
    pub global_pos: Point,
}

/// Hover enter, move or leave for widgets with the hover attribute.
#[derive(Debug, Clone)]
pub struct HoverEvent {
    pub base: EventBase,
    pub event_type: EventType,
    /// New position; `None` for a leave.
    pub pos: Option<Point>,
    /// Previous position; `None` for an enter.
    pub old_pos: Option<Point>,
    pub modifiers: KeyboardModifiers,
}

/// A gesture timer fired.
#[derive(Debug, Clone)]
pub struct TimerEvent {
    pub base: EventBase,
    pub timer: GestureTimerId,
}

/// Events without a payload.
#[derive(Debug, Clone)]
pub struct BasicEvent {
    pub base: EventBase,
    pub event_type: EventType,
}

/// Any event delivered through the dispatch core.
#[derive(Debug, Clone)]
pub enum Event {
    Mouse(MouseEvent),
    Wheel(WheelEvent),
    Key(KeyEvent),
    Touch(TouchEvent),
    Tablet(TabletEvent),
    ContextMenu(ContextMenuEvent),
    ToolTip(HelpEvent),
    Drag(DragEvent),
    Gesture(GestureEvent),
    NativeGesture(NativeGestureEvent),
    Focus(FocusEvent),
    Enter(EnterEvent),
    Hover(HoverEvent),
    Timer(TimerEvent),
    Basic(BasicEvent),
}

impl Event {
    /// An event without payload.
    pub fn basic(event_type: EventType) -> Self {
        Event::Basic(BasicEvent {
            base: EventBase::new(),
            event_type,
        })
    }

    /// A tooltip request.
    pub fn tool_tip(pos: Point, global_pos: Point) -> Self {
        Event::ToolTip(HelpEvent {
            base: EventBase::new(),
            pos,
            global_pos,
        })
    }

    /// An enter event.
    pub fn enter(pos: Point, global_pos: Point) -> Self {
        Event::Enter(EnterEvent {
            base: EventBase::new(),
            pos,
            global_pos,
        })
    }

    /// A hover event.
    pub fn hover(event_type: EventType, pos: Option<Point>, old_pos: Option<Point>) -> Self {
        Event::Hover(HoverEvent {
            base: EventBase::new(),
            event_type,
            pos,
            old_pos,
            modifiers: KeyboardModifiers::NONE,
        })
    }

    /// A focus event.
    pub fn focus(event_type: EventType, reason: FocusReason) -> Self {
        Event::Focus(FocusEvent::new(event_type, reason))
    }

    /// The event's type tag.
    pub fn event_type(&self) -> EventType {
        match self {
            Event::Mouse(e) => e.event_type,
            Event::Wheel(_) => EventType::Wheel,
            Event::Key(e) => e.event_type,
            Event::Touch(e) => e.event_type,
            Event::Tablet(e) => e.event_type,
            Event::ContextMenu(_) => EventType::ContextMenu,
            Event::ToolTip(_) => EventType::ToolTip,
            Event::Drag(e) => e.event_type,
            Event::Gesture(e) => e.event_type,
            Event::NativeGesture(_) => EventType::NativeGesture,
            Event::Focus(e) => e.event_type,
            Event::Enter(_) => EventType::Enter,
            Event::Hover(e) => e.event_type,
            Event::Timer(_) => EventType::Timer,
            Event::Basic(e) => e.event_type,
        }
    }

    /// The common event data.
    pub fn base(&self) -> &EventBase {
        match self {
            Event::Mouse(e) => &e.base,
            Event::Wheel(e) => &e.base,
            Event::Key(e) => &e.base,
            Event::Touch(e) => &e.base,
            Event::Tablet(e) => &e.base,
            Event::ContextMenu(e) => &e.base,
            Event::ToolTip(e) => &e.base,
            Event::Drag(e) => &e.base,
            Event::Gesture(e) => &e.base,
            Event::NativeGesture(e) => &e.base,
            Event::Focus(e) => &e.base,
            Event::Enter(e) => &e.base,
            Event::Hover(e) => &e.base,
            Event::Timer(e) => &e.base,
            Event::Basic(e) => &e.base,
        }
    }

    /// Mutable access to the common event data.
    pub fn base_mut(&mut self) -> &mut EventBase {
        match self {
            Event::Mouse(e) => &mut e.base,
            Event::Wheel(e) => &mut e.base,
            Event::Key(e) => &mut e.base,
            Event::Touch(e) => &mut e.base,
            Event::Tablet(e) => &mut e.base,
            Event::ContextMenu(e) => &mut e.base,
            Event::ToolTip(e) => &mut e.base,
            Event::Drag(e) => &mut e.base,
            Event::Gesture(e) => &mut e.base,
            Event::NativeGesture(e) => &mut e.base,
            Event::Focus(e) => &mut e.base,
            Event::Enter(e) => &mut e.base,
            Event::Hover(e) => &mut e.base,
            Event::Timer(e) => &mut e.base,
            Event::Basic(e) => &mut e.base,
        }
    }

    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.base().is_accepted()
    }

    /// Accept the event.
    pub fn accept(&mut self) {
        self.base_mut().accept();
    }

    /// Ignore the event.
    pub fn ignore(&mut self) {
        self.base_mut().ignore();
    }

    /// Set the accept flag.
    pub fn set_accepted(&mut self, accepted: bool) {
        self.base_mut().set_accepted(accepted);
    }

    /// Whether the event came from the window system.
    pub fn spontaneous(&self) -> bool {
        self.base().spontaneous()
    }

    /// The receiver-local position of positional events.
    pub fn pos(&self) -> Option<Point> {
        match self {
            Event::Mouse(e) => Some(e.pos),
            Event::Wheel(e) => Some(e.pos),
            Event::Tablet(e) => Some(e.pos),
            Event::ContextMenu(e) => Some(e.pos),
            Event::ToolTip(e) => Some(e.pos),
            Event::Drag(e) => Some(e.pos),
            Event::NativeGesture(e) => Some(e.pos),
            Event::Enter(e) => Some(e.pos),
            Event::Hover(e) => e.pos,
            _ => None,
        }
    }

    /// Replace the receiver-local position of positional events.
    pub(crate) fn set_pos(&mut self, pos: Point) {
        match self {
            Event::Mouse(e) => e.pos = pos,
            Event::Wheel(e) => e.pos = pos,
            Event::Tablet(e) => e.pos = pos,
            Event::ContextMenu(e) => e.pos = pos,
            Event::ToolTip(e) => e.pos = pos,
            Event::Drag(e) => e.pos = pos,
            Event::NativeGesture(e) => e.pos = pos,
            Event::Enter(e) => e.pos = pos,
            Event::Hover(e) => e.pos = Some(pos),
            _ => {}
        }
    }

    /// The global position of positional events.
    pub fn global_pos(&self) -> Option<Point> {
        match self {
            Event::Mouse(e) => Some(e.global_pos),
            Event::Wheel(e) => Some(e.global_pos),
            Event::Tablet(e) => Some(e.global_pos),
            Event::ContextMenu(e) => Some(e.global_pos),
            Event::ToolTip(e) => Some(e.global_pos),
            Event::NativeGesture(e) => Some(e.global_pos),
            Event::Enter(e) => Some(e.global_pos),
            _ => None,
        }
    }

    /// Modifiers carried by input events.
    pub fn modifiers(&self) -> Option<KeyboardModifiers> {
        match self {
            Event::Mouse(e) => Some(e.modifiers),
            Event::Wheel(e) => Some(e.modifiers),
            Event::Key(e) => Some(e.modifiers),
            Event::Touch(e) => Some(e.modifiers),
            Event::Tablet(e) => Some(e.modifiers),
            Event::ContextMenu(e) => Some(e.modifiers),
            _ => None,
        }
    }

    /// The mouse payload, if this is a mouse event.
    pub fn as_mouse(&self) -> Option<&MouseEvent> {
        match self {
            Event::Mouse(e) => Some(e),
            _ => None,
        }
    }

    /// The touch payload, if this is a touch event.
    pub fn as_touch(&self) -> Option<&TouchEvent> {
        match self {
            Event::Touch(e) => Some(e),
            _ => None,
        }
    }

    /// The gesture payload, if this is a gesture event.
    pub fn as_gesture(&self) -> Option<&GestureEvent> {
        match self {
            Event::Gesture(e) => Some(e),
            _ => None,
        }
    }

    /// Mutable gesture payload, if this is a gesture event.
    pub fn as_gesture_mut(&mut self) -> Option<&mut GestureEvent> {
        match self {
            Event::Gesture(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MouseEvent> for Event {
    fn from(event: MouseEvent) -> Self {
        Event::Mouse(event)
    }
}

impl From<WheelEvent> for Event {
    fn from(event: WheelEvent) -> Self {
        Event::Wheel(event)
    }
}

impl From<KeyEvent> for Event {
    fn from(event: KeyEvent) -> Self {
        Event::Key(event)
    }
}

impl From<TouchEvent> for Event {
    fn from(event: TouchEvent) -> Self {
        Event::Touch(event)
    }
}

impl From<TabletEvent> for Event {
    fn from(event: TabletEvent) -> Self {
        Event::Tablet(event)
    }
}

impl From<ContextMenuEvent> for Event {
    fn from(event: ContextMenuEvent) -> Self {
        Event::ContextMenu(event)
    }
}

impl From<DragEvent> for Event {
    fn from(event: DragEvent) -> Self {
        Event::Drag(event)
    }
}

impl From<GestureEvent> for Event {
    fn from(event: GestureEvent) -> Self {
        Event::Gesture(event)
    }
}

impl From<NativeGestureEvent> for Event {
    fn from(event: NativeGestureEvent) -> Self {
        Event::NativeGesture(event)
    }
}

impl From<FocusEvent> for Event {
    fn from(event: FocusEvent) -> Self {
        Event::Focus(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_start_accepted() {
        let mut event = Event::basic(EventType::Close);
        assert!(event.is_accepted());
        assert!(!event.spontaneous());
        event.ignore();
        assert!(!event.is_accepted());
    }

    #[test]
    fn test_mouse_buttons_set() {
        let buttons = MouseButtons::from(MouseButton::Left).with(MouseButton::Right);
        assert!(buttons.contains(MouseButton::Left));
        assert!(buttons.contains(MouseButton::Right));
        assert!(!buttons.contains(MouseButton::Middle));
        assert!(buttons.without(MouseButton::Left).without(MouseButton::Right).is_empty());
    }

    #[test]
    fn test_touch_state_mask() {
        let points = vec![
            TouchPoint::new(1, TouchPointState::Moved, Point::ZERO),
            TouchPoint::new(2, TouchPointState::Stationary, Point::ZERO),
        ];
        let states = TouchPointStates::of(&points);
        assert!(states.contains(TouchPointState::Moved));
        assert!(!states.is_only(TouchPointState::Stationary));
        assert!(TouchPointStates::of(&points[1..]).is_only(TouchPointState::Stationary));
    }

    #[test]
    fn test_positional_accessors() {
        let mut event: Event = MouseEvent::new(
            EventType::MouseMove,
            Point::new(1.0, 2.0),
            Point::new(11.0, 12.0),
            None,
            MouseButtons::NONE,
            KeyboardModifiers::SHIFT,
        )
        .into();
        event.set_pos(Point::new(5.0, 5.0));
        assert_eq!(event.pos(), Some(Point::new(5.0, 5.0)));
        assert_eq!(event.global_pos(), Some(Point::new(11.0, 12.0)));
        assert_eq!(event.modifiers(), Some(KeyboardModifiers::SHIFT));
        assert_eq!(Event::basic(EventType::Show).pos(), None);
    }

    #[test]
    fn test_gesture_filter_bypass_list() {
        assert!(EventType::Paint.bypasses_gesture_filter());
        assert!(EventType::Drop.bypasses_gesture_filter());
        assert!(!EventType::TouchBegin.bypasses_gesture_filter());
        assert!(!EventType::Timer.bypasses_gesture_filter());
    }

    #[test]
    fn test_focus_navigation_keys() {
        assert!(Key::Backtab.is_focus_navigation());
        assert!(Key::ArrowDown.is_focus_navigation());
        assert!(!Key::Enter.is_focus_navigation());
    }
}
