//! Widget event dispatch and gesture recognition for Horizon.
//!
//! This crate routes input through a widget tree the way a desktop toolkit
//! does:
//!
//! - **Dispatch**: [`Application::notify`] runs application and object
//!   filters, the gesture filter and the propagation walk for each event
//!   type
//! - **Raw input**: `handle_*` entry points pick the receiving widget for
//!   mouse, wheel, key, touch, tablet, drag and native gesture input
//! - **Popups and modals**: a popup stack that captures input and replays
//!   dismissing clicks, and a modal list that blocks windows
//! - **Focus and crossing**: focus, window activation, grabs, enter/leave,
//!   hover and the platform cursor
//! - **Gestures**: a gesture manager resolving competing recognizers for
//!   tap, tap-and-hold, pan, pinch and swipe
//!
//! # Example
//!
//! ```
//! use horizon_input::prelude::*;
//!
//! let mut app = Application::new(InputConfig::default());
//! let window = app
//!     .tree_mut()
//!     .create_window("main", WindowType::Window, Rect::new(0.0, 0.0, 200.0, 100.0));
//! let button = app
//!     .tree_mut()
//!     .create_child(window, "ok", Rect::new(10.0, 10.0, 80.0, 24.0))
//!     .unwrap();
//! app.show(window);
//!
//! app.set_handler(button, |_ctx: &mut EventContext<'_>, event: &mut Event| {
//!     event.event_type() == EventType::MouseButtonPress
//! });
//!
//! let press = MouseEvent::new(
//!     EventType::MouseButtonPress,
//!     Point::new(20.0, 20.0),
//!     Point::new(20.0, 20.0),
//!     Some(MouseButton::Left),
//!     MouseButton::Left.into(),
//!     KeyboardModifiers::NONE,
//! );
//! assert!(app.handle_mouse(window, press));
//! ```

mod application;
mod config;
mod dispatcher;
mod enter_leave;
mod error;
pub mod events;
mod focus;
pub mod gesture;
mod grab;
mod handler;
mod keyboard;
mod modal;
mod mouse;
pub mod platform;
mod popup;
mod state;
mod tooltip;
mod touch;
mod window_system;


pub use application::Application;
pub use config::InputConfig;
pub use error::{ConfigError, GestureError, InputError, InputResult};
pub use events::{
    ContextMenuEvent, ContextMenuReason, DragEvent, Event, EventType, FocusReason, GestureEntry, GestureEvent, Key,
    KeyEvent, KeyboardModifiers, MouseButton, MouseButtons, MouseEvent, NativeGestureEvent, NativeGestureType,
    TabletEvent, TouchDevice, TouchDeviceType, TouchEvent, TouchPoint, TouchPointState, WheelEvent,
};
pub use gesture::{
    CancelPolicy, Gesture, GestureFlags, GestureId, GestureManager, GestureRecognizer, GestureState, GestureType,
    RecognizerContext, RecognizerResult,
};
pub use handler::{EventContext, EventHandler};
pub use modal::ModalStack;
pub use popup::PopupStack;
pub use state::DispatchState;
pub use tooltip::ToolTipState;
pub use touch::TouchState;
pub use window_system::{HeadlessWindowSystem, WindowSystem};

pub use horizon_input_core::{
    CursorIcon, FocusPolicy, Point, Rect, Size, WidgetAttributes, WidgetError, WidgetId, WidgetResult, WidgetTree,
    WindowModality, WindowType,
};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::application::Application;
    pub use crate::config::InputConfig;
    pub use crate::events::{Event, EventType, KeyEvent, KeyboardModifiers, MouseButton, MouseEvent, TouchPoint};
    pub use crate::gesture::{GestureFlags, GestureState, GestureType};
    pub use crate::handler::{EventContext, EventHandler};
    pub use horizon_input_core::{Point, Rect, WidgetId, WindowType};
}
