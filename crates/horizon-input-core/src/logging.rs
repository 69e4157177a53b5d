//! Logging and debugging facilities for Horizon Input.
//!
//! This module provides:
//! - Target names for filtering the dispatch core's `tracing` output
//! - A text dump of the widget tree ([`WidgetTreeDebug`])
//! - A span guard for timing dispatch passes ([`PerfSpan`])
//!
//! # Tracing Integration
//!
//! Nothing is printed unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_input::gesture=trace,horizon_input::popup=debug")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! ```
//! use horizon_input_core::{Rect, WidgetTree, WidgetTreeDebug, WindowType};
//!
//! let mut tree = WidgetTree::new();
//! let window = tree.create_window("main", WindowType::Window, Rect::new(0.0, 0.0, 100.0, 100.0));
//! tree.create_child(window, "button", Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
//!
//! let dump = WidgetTreeDebug::new().format_all(&tree);
//! assert!(dump.contains("button"));
//! ```

use std::fmt::Write as FmtWrite;

use crate::tree::WidgetTree;
use crate::widget::WidgetId;

/// Span names used throughout Horizon Input for tracing.
pub mod span_names {
    /// One call to the central notify routine.
    pub const NOTIFY: &str = "horizon_input::notify";
    /// Translation of a raw window-system event.
    pub const TRANSLATE: &str = "horizon_input::translate";
    /// One gesture recognition round.
    pub const GESTURE_ROUND: &str = "horizon_input::gesture_round";
    /// Enter/leave computation.
    pub const ENTER_LEAVE: &str = "horizon_input::enter_leave";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_input_core";
    /// Widget tree mutations.
    pub const TREE: &str = "horizon_input_core::tree";
    /// Event dispatch and propagation.
    pub const DISPATCH: &str = "horizon_input::dispatch";
    /// Popup stack.
    pub const POPUP: &str = "horizon_input::popup";
    /// Modal blocking.
    pub const MODAL: &str = "horizon_input::modal";
    /// Keyboard focus.
    pub const FOCUS: &str = "horizon_input::focus";
    /// Touch point routing.
    pub const TOUCH: &str = "horizon_input::touch";
    /// Gesture manager and recognizers.
    pub const GESTURE: &str = "horizon_input::gesture";
}

/// Style options for widget tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for widget tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show widget IDs.
    pub show_ids: bool,
    /// Whether to show geometry.
    pub show_geometry: bool,
    /// Whether to show set attributes and hidden/disabled markers.
    pub show_state: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_geometry: true,
            show_state: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Everything on.
    pub fn detailed() -> Self {
        Self {
            show_state: true,
            ..Default::default()
        }
    }

    /// Names only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_geometry: false,
            show_state: false,
            ..Default::default()
        }
    }
}

/// Renders a [`WidgetTree`] as indented text.
#[derive(Debug, Clone, Default)]
pub struct WidgetTreeDebug {
    options: TreeFormatOptions,
}

impl WidgetTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every top-level window and its subtree, in stacking order.
    pub fn format_all(&self, tree: &WidgetTree) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Widget Tree ({} widgets):", tree.len());
        if tree.top_levels().is_empty() {
            output.push_str("  (empty)\n");
        }
        for &root in tree.top_levels() {
            self.format_into(tree, root, 0, true, &mut output);
        }
        output
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, tree: &WidgetTree, root: WidgetId) -> String {
        let mut output = String::new();
        self.format_into(tree, root, 0, true, &mut output);
        output
    }

    fn format_into(
        &self,
        tree: &WidgetTree,
        id: WidgetId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(data) = tree.get(id) else {
            return;
        };

        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(if data.name().is_empty() {
            "(unnamed)"
        } else {
            data.name()
        });

        if self.options.show_ids {
            let _ = write!(output, " [{:?}]", id);
        }
        if tree.is_window(id) {
            let _ = write!(output, " <{:?}>", data.window_type());
        }
        if self.options.show_geometry {
            let g = data.geometry();
            let _ = write!(
                output,
                " @({}, {} {}x{})",
                g.left(),
                g.top(),
                g.width(),
                g.height()
            );
        }
        if self.options.show_state {
            if !data.is_visible_self() {
                output.push_str(" hidden");
            }
            if !data.is_enabled_self() {
                output.push_str(" disabled");
            }
            let names = data.attributes().names();
            if !names.is_empty() {
                let _ = write!(output, " {{{}}}", names.join(", "));
            }
        }
        output.push('\n');

        let children = tree.children(id);
        let count = children.len();
        for (i, &child) in children.iter().enumerate() {
            self.format_into(tree, child, depth + 1, i + 1 == count, output);
        }
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }
        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.extend(std::iter::repeat_n(' ', self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a span named after `name`.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_input::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[macro_export]
macro_rules! input_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_input_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! input_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_input_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! input_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "horizon_input_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! input_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_input_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! input_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "horizon_input_core", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::widget::{WidgetAttributes, WindowType};

    fn setup() -> (WidgetTree, WidgetId) {
        let mut tree = WidgetTree::new();
        let window = tree.create_window("window", WindowType::Dialog, Rect::new(0.0, 0.0, 200.0, 100.0));
        let a = tree
            .create_child(window, "button1", Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        tree.create_child(window, "button2", Rect::new(20.0, 0.0, 10.0, 10.0))
            .unwrap();
        tree.set_attribute(a, WidgetAttributes::HOVER, true).unwrap();
        (tree, window)
    }

    #[test]
    fn test_tree_format_empty() {
        let tree = WidgetTree::new();
        let output = WidgetTreeDebug::new().format_all(&tree);
        assert!(output.contains("Widget Tree (0 widgets)"));
        assert!(output.contains("(empty)"));
    }

    #[test]
    fn test_tree_format_hierarchy() {
        let (tree, window) = setup();
        let output = WidgetTreeDebug::new().format_subtree(&tree, window);
        assert!(output.starts_with("window"));
        assert!(output.contains("<Dialog>"));
        assert!(output.contains("\u{251c}\u{2500}\u{2500} button1"));
        assert!(output.contains("\u{2514}\u{2500}\u{2500} button2"));
    }

    #[test]
    fn test_tree_format_minimal() {
        let (tree, window) = setup();
        let output =
            WidgetTreeDebug::with_options(TreeFormatOptions::minimal()).format_subtree(&tree, window);
        assert!(output.contains("button1"));
        assert!(!output.contains('['));
        assert!(!output.contains('@'));
    }

    #[test]
    fn test_tree_format_state_and_depth() {
        let (tree, window) = setup();
        let options = TreeFormatOptions {
            style: TreeStyle::Ascii,
            max_depth: Some(0),
            ..TreeFormatOptions::detailed()
        };
        let output = WidgetTreeDebug::with_options(options.clone()).format_subtree(&tree, window);
        assert!(output.contains("hidden"));
        assert!(!output.contains("button1"));

        let output = WidgetTreeDebug::with_options(TreeFormatOptions {
            max_depth: None,
            ..options
        })
        .format_subtree(&tree, window);
        assert!(output.contains("+-- button1"));
        assert!(output.contains("{hover}"));
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }
}
