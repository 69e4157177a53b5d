//! Core types for Horizon Input.
//!
//! This crate holds the pieces of the input dispatch core that do not depend
//! on events:
//!
//! - **Widget tree**: an arena of rectangles with parent/child links,
//!   stacking order, hit testing and coordinate mapping ([`WidgetTree`])
//! - **Widget identity**: generational [`WidgetId`] handles that never alias
//!   a destroyed widget
//! - **Widget flags**: window types, modality, focus policy and the
//!   attribute set consulted during dispatch
//! - **Geometry**: [`Point`], [`Size`] and [`Rect`] in logical pixels
//! - **Logging**: tracing targets, [`PerfSpan`] and a tree dump
//!
//! # Example
//!
//! ```
//! use horizon_input_core::{Point, Rect, WidgetTree, WindowType};
//!
//! let mut tree = WidgetTree::new();
//! let window = tree.create_window("main", WindowType::Window, Rect::new(50.0, 50.0, 300.0, 200.0));
//! tree.set_visible(window, true).unwrap();
//! let button = tree
//!     .create_child(window, "ok", Rect::new(10.0, 10.0, 80.0, 24.0))
//!     .unwrap();
//!
//! assert_eq!(tree.widget_at(Point::new(65.0, 65.0)), Some(button));
//! assert_eq!(tree.map_from_global(button, Point::new(65.0, 65.0)), Point::new(5.0, 5.0));
//! ```

mod error;
pub mod geometry;
pub mod logging;
pub mod tree;
pub mod widget;

pub use error::{WidgetError, WidgetResult};
pub use geometry::{Point, Rect, Size};
pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle, WidgetTreeDebug};
pub use tree::{WidgetData, WidgetTree};
pub use widget::{FocusPolicy, WidgetAttributes, WidgetId, WindowModality, WindowType};

pub use cursor_icon::CursorIcon;
