//! The widget tree arena.
//!
//! [`WidgetTree`] owns the parent/child hierarchy of rectangles that events
//! are routed through. It is a plain arena keyed by [`WidgetId`]; the
//! dispatch core never holds references into it across a handler call, only
//! ids, and re-validates them with [`WidgetTree::contains`] afterwards.
//!
//! # Coordinates
//!
//! A child widget's geometry is relative to its parent. A top-level window's
//! geometry is in global coordinates. [`WidgetTree::map_to_global`] and
//! [`WidgetTree::map_from_global`] convert between the two.
//!
//! # Stacking
//!
//! Later children stack above earlier ones, later top-level windows above
//! earlier ones. [`WidgetTree::raise`] moves a widget to the top of its
//! level.

use cursor_icon::CursorIcon;
use slotmap::SlotMap;

use crate::error::{WidgetError, WidgetResult};
use crate::geometry::{Point, Rect};
use crate::logging::targets;
use crate::widget::{FocusPolicy, WidgetAttributes, WidgetId, WindowModality, WindowType};

/// Data stored in the tree for each widget.
#[derive(Debug, Clone)]
pub struct WidgetData {
    name: String,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    geometry: Rect,
    visible: bool,
    enabled: bool,
    window_type: WindowType,
    modality: WindowModality,
    focus_policy: FocusPolicy,
    focus_proxy: Option<WidgetId>,
    focus_child: Option<WidgetId>,
    transient_parent: Option<WidgetId>,
    attributes: WidgetAttributes,
    cursor: Option<CursorIcon>,
}

impl WidgetData {
    fn new(name: String, window_type: WindowType, geometry: Rect) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            geometry,
            // Windows start hidden, children start visible.
            visible: !window_type.is_window(),
            enabled: true,
            window_type,
            modality: WindowModality::NonModal,
            focus_policy: FocusPolicy::NO_FOCUS,
            focus_proxy: None,
            focus_child: None,
            transient_parent: None,
            attributes: WidgetAttributes::NONE,
            cursor: None,
        }
    }

    /// The widget's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The widget's geometry relative to its parent (global for windows).
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// The window type.
    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    /// The window modality.
    pub fn modality(&self) -> WindowModality {
        self.modality
    }

    /// The focus policy.
    pub fn focus_policy(&self) -> FocusPolicy {
        self.focus_policy
    }

    /// The widget's own visibility flag, ignoring ancestors.
    pub fn is_visible_self(&self) -> bool {
        self.visible
    }

    /// The widget's own enabled flag, ignoring ancestors.
    pub fn is_enabled_self(&self) -> bool {
        self.enabled
    }

    /// The attribute set.
    pub fn attributes(&self) -> WidgetAttributes {
        self.attributes
    }

    /// Check a single attribute.
    pub fn test_attribute(&self, attribute: WidgetAttributes) -> bool {
        self.attributes.has(attribute)
    }

    /// Set or clear a single attribute.
    pub fn set_attribute(&mut self, attribute: WidgetAttributes, on: bool) {
        self.attributes.set(attribute, on);
    }

    /// The explicitly set cursor, if any.
    pub fn cursor(&self) -> Option<CursorIcon> {
        self.cursor
    }
}

/// The arena that owns every widget and its relationships.
#[derive(Debug, Default)]
pub struct WidgetTree {
    widgets: SlotMap<WidgetId, WidgetData>,
    top_levels: Vec<WidgetId>,
}

impl WidgetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            widgets: SlotMap::with_key(),
            top_levels: Vec::new(),
        }
    }

    /// Create a top-level window with global `geometry`.
    ///
    /// Windows start hidden. Passing [`WindowType::Widget`] creates a
    /// [`WindowType::Window`].
    pub fn create_window(
        &mut self,
        name: impl Into<String>,
        window_type: WindowType,
        geometry: Rect,
    ) -> WidgetId {
        let window_type = if window_type.is_window() {
            window_type
        } else {
            WindowType::Window
        };
        let name = name.into();
        let id = self
            .widgets
            .insert(WidgetData::new(name, window_type, geometry));
        self.top_levels.push(id);
        tracing::trace!(target: targets::TREE, ?id, ?window_type, "created window");
        id
    }

    /// Create a child widget of `parent` with parent-relative `geometry`.
    pub fn create_child(
        &mut self,
        parent: WidgetId,
        name: impl Into<String>,
        geometry: Rect,
    ) -> WidgetResult<WidgetId> {
        if !self.widgets.contains_key(parent) {
            return Err(WidgetError::InvalidWidgetId);
        }
        let mut data = WidgetData::new(name.into(), WindowType::Widget, geometry);
        data.parent = Some(parent);
        let id = self.widgets.insert(data);
        if let Some(parent_data) = self.widgets.get_mut(parent) {
            parent_data.children.push(id);
        }
        tracing::trace!(target: targets::TREE, ?id, ?parent, "created child widget");
        Ok(id)
    }

    /// Destroy a widget and all of its descendants.
    ///
    /// Returns the destroyed ids, descendants before their parents. Every
    /// outstanding handle to them becomes invalid.
    #[tracing::instrument(skip(self), target = "horizon_input_core::tree", level = "trace")]
    pub fn destroy(&mut self, id: WidgetId) -> WidgetResult<Vec<WidgetId>> {
        let mut removed = Vec::new();
        self.collect_descendants(id, &mut removed)?;
        removed.push(id);

        if let Some(parent) = self.widgets.get(id).and_then(|d| d.parent) {
            if let Some(parent_data) = self.widgets.get_mut(parent) {
                parent_data.children.retain(|&child| child != id);
            }
        }
        for &dead in &removed {
            self.widgets.remove(dead);
        }
        self.top_levels.retain(|w| !removed.contains(w));

        tracing::trace!(target: targets::TREE, ?id, count = removed.len(), "destroyed widget subtree");
        Ok(removed)
    }

    fn collect_descendants(&self, id: WidgetId, out: &mut Vec<WidgetId>) -> WidgetResult<()> {
        let data = self.widgets.get(id).ok_or(WidgetError::InvalidWidgetId)?;
        for &child in &data.children {
            self.collect_descendants(child, out)?;
            out.push(child);
        }
        Ok(())
    }

    /// Check if a widget exists.
    #[inline]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether the tree holds no widgets.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Borrow a widget's data.
    pub fn get(&self, id: WidgetId) -> Option<&WidgetData> {
        self.widgets.get(id)
    }

    /// Mutably borrow a widget's data.
    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetData> {
        self.widgets.get_mut(id)
    }

    fn data(&self, id: WidgetId) -> WidgetResult<&WidgetData> {
        self.widgets.get(id).ok_or(WidgetError::InvalidWidgetId)
    }

    fn data_mut(&mut self, id: WidgetId) -> WidgetResult<&mut WidgetData> {
        self.widgets.get_mut(id).ok_or(WidgetError::InvalidWidgetId)
    }

    /// Top-level widgets in stacking order (bottom first).
    pub fn top_levels(&self) -> &[WidgetId] {
        &self.top_levels
    }

    // ------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------

    /// Reparent a widget. `None` turns it into a top-level window.
    pub fn set_parent(&mut self, id: WidgetId, new_parent: Option<WidgetId>) -> WidgetResult<()> {
        if !self.widgets.contains_key(id) {
            return Err(WidgetError::InvalidWidgetId);
        }
        if let Some(parent) = new_parent {
            if !self.widgets.contains_key(parent) {
                return Err(WidgetError::InvalidWidgetId);
            }
            if self.is_ancestor_or_self(id, parent) {
                crate::input_warn!(?id, ?parent, "rejected reparenting that would create a cycle");
                return Err(WidgetError::CircularParentage);
            }
        }

        if let Some(old_parent) = self.widgets.get(id).and_then(|d| d.parent) {
            if let Some(old) = self.widgets.get_mut(old_parent) {
                old.children.retain(|&child| child != id);
            }
        } else {
            self.top_levels.retain(|&w| w != id);
        }

        let data = self.data_mut(id)?;
        data.parent = new_parent;
        if new_parent.is_none() && !data.window_type.is_window() {
            data.window_type = WindowType::Window;
        }

        match new_parent {
            Some(parent) => self.data_mut(parent)?.children.push(id),
            None => self.top_levels.push(id),
        }
        Ok(())
    }

    /// Walks plain parent links, ignoring window boundaries.
    fn is_ancestor_or_self(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(w) = current {
            if w == ancestor {
                return true;
            }
            current = self.widgets.get(w).and_then(|d| d.parent);
        }
        false
    }

    /// The parent widget, or `None` for windows without a parent and for
    /// invalid ids.
    #[inline]
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.widgets.get(id).and_then(|d| d.parent)
    }

    /// Children in stacking order (bottom first).
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.widgets
            .get(id)
            .map(|d| d.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the widget is a top-level window.
    pub fn is_window(&self, id: WidgetId) -> bool {
        self.widgets
            .get(id)
            .is_some_and(|d| d.window_type.is_window() || d.parent.is_none())
    }

    /// The window containing `id` (itself if it is a window).
    pub fn window(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = id;
        loop {
            if !self.contains(current) {
                return None;
            }
            if self.is_window(current) {
                return Some(current);
            }
            current = self.parent(current)?;
        }
    }

    /// Whether `ancestor` is `child` or one of its ancestors within the same
    /// window. The walk stops at window boundaries.
    pub fn is_ancestor_of(&self, ancestor: WidgetId, child: WidgetId) -> bool {
        let mut current = Some(child);
        while let Some(w) = current {
            if !self.contains(w) {
                return false;
            }
            if w == ancestor {
                return true;
            }
            if self.is_window(w) {
                return false;
            }
            current = self.parent(w);
        }
        false
    }

    /// Number of parent links from `id` up to its window.
    pub fn depth_in_window(&self, id: WidgetId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while !self.is_window(current) {
            match self.parent(current) {
                Some(parent) => {
                    depth += 1;
                    current = parent;
                }
                None => break,
            }
        }
        depth
    }

    /// Ancestors from the parent up to the root, crossing window boundaries.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(w) = current {
            result.push(w);
            current = self.parent(w);
        }
        result
    }

    /// Move a widget to the top of its siblings (or of the top-level
    /// windows).
    pub fn raise(&mut self, id: WidgetId) -> WidgetResult<()> {
        match self.data(id)?.parent {
            Some(parent) => {
                let siblings = &mut self.data_mut(parent)?.children;
                siblings.retain(|&w| w != id);
                siblings.push(id);
            }
            None => {
                self.top_levels.retain(|&w| w != id);
                self.top_levels.push(id);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Geometry and hit testing
    // ------------------------------------------------------------------

    /// The widget's geometry (parent-relative, global for windows).
    pub fn geometry(&self, id: WidgetId) -> Rect {
        self.widgets.get(id).map(|d| d.geometry).unwrap_or(Rect::ZERO)
    }

    /// Set the widget's geometry.
    pub fn set_geometry(&mut self, id: WidgetId, geometry: Rect) -> WidgetResult<()> {
        self.data_mut(id)?.geometry = geometry;
        Ok(())
    }

    /// The widget's position within its parent.
    #[inline]
    pub fn pos(&self, id: WidgetId) -> Point {
        self.geometry(id).origin
    }

    /// The widget's rectangle in its own coordinates.
    #[inline]
    pub fn rect(&self, id: WidgetId) -> Rect {
        self.geometry(id).local()
    }

    /// Map a widget-local point to global coordinates.
    pub fn map_to_global(&self, id: WidgetId, point: Point) -> Point {
        let mut result = point;
        let mut current = Some(id);
        while let Some(w) = current {
            if !self.contains(w) {
                break;
            }
            result += self.pos(w);
            if self.is_window(w) {
                break;
            }
            current = self.parent(w);
        }
        result
    }

    /// Map a global point to widget-local coordinates.
    pub fn map_from_global(&self, id: WidgetId, point: Point) -> Point {
        point - self.map_to_global(id, Point::ZERO)
    }

    /// Map a point in `id`'s coordinates into its parent's coordinates.
    #[inline]
    pub fn map_to_parent(&self, id: WidgetId, point: Point) -> Point {
        point + self.pos(id)
    }

    /// Map a point from `ancestor`'s coordinates into `id`'s coordinates.
    pub fn map_from(&self, id: WidgetId, ancestor: WidgetId, point: Point) -> Point {
        let global = self.map_to_global(ancestor, point);
        self.map_from_global(id, global)
    }

    /// The deepest visible descendant of `id` under the widget-local
    /// `point`, or `None` if no child is hit. Child windows are skipped.
    pub fn child_at(&self, id: WidgetId, point: Point) -> Option<WidgetId> {
        let data = self.widgets.get(id)?;
        for &child in data.children.iter().rev() {
            let Some(child_data) = self.widgets.get(child) else {
                continue;
            };
            if !child_data.visible || child_data.window_type.is_window() {
                continue;
            }
            if child_data.geometry.contains(point) {
                let local = point - child_data.geometry.origin;
                return Some(self.child_at(child, local).unwrap_or(child));
            }
        }
        None
    }

    /// The topmost visible top-level window containing the global `point`.
    pub fn top_level_at(&self, point: Point) -> Option<WidgetId> {
        self.top_levels.iter().rev().copied().find(|&w| {
            self.widgets
                .get(w)
                .is_some_and(|d| d.visible && d.window_type != WindowType::Desktop && d.geometry.contains(point))
        })
    }

    /// The deepest visible widget under the global `point`.
    pub fn widget_at(&self, point: Point) -> Option<WidgetId> {
        let window = self.top_level_at(point)?;
        let local = self.map_from_global(window, point);
        Some(self.child_at(window, local).unwrap_or(window))
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Set the widget's own visibility flag.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> WidgetResult<()> {
        self.data_mut(id)?.visible = visible;
        Ok(())
    }

    /// Whether the widget and every ancestor up to its window are visible.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        let mut current = id;
        loop {
            let Some(data) = self.widgets.get(current) else {
                return false;
            };
            if !data.visible {
                return false;
            }
            if self.is_window(current) {
                return true;
            }
            match data.parent {
                Some(parent) => current = parent,
                None => return true,
            }
        }
    }

    /// Set the widget's own enabled flag.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> WidgetResult<()> {
        self.data_mut(id)?.enabled = enabled;
        Ok(())
    }

    /// Whether the widget and every ancestor up to its window are enabled.
    pub fn is_enabled(&self, id: WidgetId) -> bool {
        let mut current = id;
        loop {
            let Some(data) = self.widgets.get(current) else {
                return false;
            };
            if !data.enabled {
                return false;
            }
            if self.is_window(current) {
                return true;
            }
            match data.parent {
                Some(parent) => current = parent,
                None => return true,
            }
        }
    }

    /// The window type, [`WindowType::Widget`] for invalid ids.
    pub fn window_type(&self, id: WidgetId) -> WindowType {
        self.widgets
            .get(id)
            .map(|d| d.window_type)
            .unwrap_or_default()
    }

    /// Change the window type. Turning a parentless widget into a plain
    /// widget is ignored.
    pub fn set_window_type(&mut self, id: WidgetId, window_type: WindowType) -> WidgetResult<()> {
        let data = self.data_mut(id)?;
        if data.parent.is_none() && !window_type.is_window() {
            return Ok(());
        }
        let was_window = data.window_type.is_window() || data.parent.is_none();
        data.window_type = window_type;
        let is_window = window_type.is_window();
        if is_window && !was_window {
            self.top_levels.push(id);
        } else if !is_window && was_window {
            self.top_levels.retain(|&w| w != id);
        }
        Ok(())
    }

    /// Whether the widget is a popup window.
    pub fn is_popup(&self, id: WidgetId) -> bool {
        self.window_type(id).is_popup()
    }

    /// The window modality.
    pub fn modality(&self, id: WidgetId) -> WindowModality {
        self.widgets.get(id).map(|d| d.modality).unwrap_or_default()
    }

    /// Set the window modality.
    pub fn set_modality(&mut self, id: WidgetId, modality: WindowModality) -> WidgetResult<()> {
        self.data_mut(id)?.modality = modality;
        Ok(())
    }

    /// The transient parent of a window.
    pub fn transient_parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.widgets
            .get(id)
            .and_then(|d| d.transient_parent)
            .filter(|&w| self.contains(w))
    }

    /// Set the transient parent of a window.
    pub fn set_transient_parent(&mut self, id: WidgetId, parent: Option<WidgetId>) -> WidgetResult<()> {
        self.data_mut(id)?.transient_parent = parent;
        Ok(())
    }

    /// The parent, falling back to the transient parent.
    pub fn parent_or_transient(&self, id: WidgetId) -> Option<WidgetId> {
        self.parent(id).or_else(|| self.transient_parent(id))
    }

    /// Check an attribute. Invalid ids have no attributes.
    #[inline]
    pub fn test_attribute(&self, id: WidgetId, attribute: WidgetAttributes) -> bool {
        self.widgets
            .get(id)
            .is_some_and(|d| d.attributes.has(attribute))
    }

    /// Set or clear an attribute.
    pub fn set_attribute(
        &mut self,
        id: WidgetId,
        attribute: WidgetAttributes,
        on: bool,
    ) -> WidgetResult<()> {
        self.data_mut(id)?.attributes.set(attribute, on);
        Ok(())
    }

    /// Whether the widget has no native window of its own.
    pub fn is_alien(&self, id: WidgetId) -> bool {
        self.contains(id)
            && !self.is_window(id)
            && !self.test_attribute(id, WidgetAttributes::NATIVE_WINDOW)
    }

    /// The nearest ancestor (excluding `id`) that owns a native window.
    pub fn native_parent(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = self.parent(id);
        while let Some(w) = current {
            if !self.is_alien(w) {
                return Some(w);
            }
            current = self.parent(w);
        }
        None
    }

    /// The native window that actually backs `id`: itself if native,
    /// otherwise its native parent.
    pub fn effective_native(&self, id: WidgetId) -> Option<WidgetId> {
        if !self.contains(id) {
            return None;
        }
        if self.is_alien(id) {
            self.native_parent(id)
        } else {
            Some(id)
        }
    }

    /// The explicitly set cursor.
    pub fn cursor(&self, id: WidgetId) -> Option<CursorIcon> {
        self.widgets.get(id).and_then(|d| d.cursor)
    }

    /// Set or unset the widget's cursor. Maintains the set-cursor attribute.
    pub fn set_cursor(&mut self, id: WidgetId, cursor: Option<CursorIcon>) -> WidgetResult<()> {
        let data = self.data_mut(id)?;
        data.cursor = cursor;
        data.attributes.set(WidgetAttributes::SET_CURSOR, cursor.is_some());
        Ok(())
    }

    /// Set the widget's name.
    pub fn set_name(&mut self, id: WidgetId, name: impl Into<String>) -> WidgetResult<()> {
        self.data_mut(id)?.name = name.into();
        Ok(())
    }

    /// The widget's name, empty for invalid ids.
    pub fn name(&self, id: WidgetId) -> &str {
        self.widgets.get(id).map(|d| d.name.as_str()).unwrap_or("")
    }

    // ------------------------------------------------------------------
    // Focus bookkeeping
    // ------------------------------------------------------------------

    /// The focus policy, [`FocusPolicy::NO_FOCUS`] for invalid ids.
    pub fn focus_policy(&self, id: WidgetId) -> FocusPolicy {
        self.widgets
            .get(id)
            .map(|d| d.focus_policy)
            .unwrap_or_default()
    }

    /// Set the focus policy.
    pub fn set_focus_policy(&mut self, id: WidgetId, policy: FocusPolicy) -> WidgetResult<()> {
        self.data_mut(id)?.focus_policy = policy;
        Ok(())
    }

    /// The direct focus proxy of a widget.
    pub fn focus_proxy(&self, id: WidgetId) -> Option<WidgetId> {
        self.widgets
            .get(id)
            .and_then(|d| d.focus_proxy)
            .filter(|&w| self.contains(w))
    }

    /// Set the focus proxy. Rejects proxies that would loop back to `id`.
    pub fn set_focus_proxy(&mut self, id: WidgetId, proxy: Option<WidgetId>) -> WidgetResult<()> {
        if let Some(proxy) = proxy {
            if !self.contains(proxy) {
                return Err(WidgetError::InvalidWidgetId);
            }
            let mut current = Some(proxy);
            while let Some(w) = current {
                if w == id {
                    return Err(WidgetError::FocusProxyLoop);
                }
                current = self.focus_proxy(w);
            }
        }
        self.data_mut(id)?.focus_proxy = proxy;
        Ok(())
    }

    /// Follow the focus proxy chain to its end.
    pub fn resolve_focus_proxy(&self, id: WidgetId) -> WidgetId {
        let mut current = id;
        while let Some(proxy) = self.focus_proxy(current) {
            current = proxy;
        }
        current
    }

    /// The last widget that received focus inside `id`'s subtree.
    pub fn focus_child(&self, id: WidgetId) -> Option<WidgetId> {
        self.widgets
            .get(id)
            .and_then(|d| d.focus_child)
            .filter(|&w| self.contains(w))
    }

    /// Record `id` as the focus child of itself and every ancestor up to its
    /// window.
    pub fn set_focus_child_chain(&mut self, id: WidgetId) {
        let mut current = Some(id);
        while let Some(w) = current {
            let is_window = self.is_window(w);
            let Some(data) = self.widgets.get_mut(w) else {
                break;
            };
            data.focus_child = Some(id);
            if is_window {
                break;
            }
            current = data.parent;
        }
    }

    /// Forget `id` as focus child wherever an ancestor still records it.
    pub fn clear_focus_child_chain(&mut self, id: WidgetId) {
        let mut current = Some(id);
        while let Some(w) = current {
            let Some(data) = self.widgets.get_mut(w) else {
                break;
            };
            if data.focus_child == Some(id) {
                data.focus_child = None;
            }
            current = data.parent;
        }
    }
}

static_assertions::assert_impl_all!(WidgetTree: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (WidgetTree, WidgetId, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new();
        let window = tree.create_window("window", WindowType::Window, Rect::new(100.0, 100.0, 400.0, 300.0));
        tree.set_visible(window, true).unwrap();
        let panel = tree
            .create_child(window, "panel", Rect::new(10.0, 20.0, 200.0, 200.0))
            .unwrap();
        let button = tree
            .create_child(panel, "button", Rect::new(5.0, 5.0, 50.0, 20.0))
            .unwrap();
        (tree, window, panel, button)
    }

    #[test]
    fn test_child_at_finds_deepest() {
        let (tree, window, panel, button) = setup();
        assert_eq!(tree.child_at(window, Point::new(20.0, 30.0)), Some(button));
        assert_eq!(tree.child_at(window, Point::new(150.0, 150.0)), Some(panel));
        assert_eq!(tree.child_at(window, Point::new(350.0, 10.0)), None);
    }

    #[test]
    fn test_child_at_prefers_topmost_sibling() {
        let (mut tree, window, panel, _) = setup();
        let overlay = tree
            .create_child(window, "overlay", Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        assert_eq!(tree.child_at(window, Point::new(50.0, 50.0)), Some(overlay));
        tree.raise(panel).unwrap();
        assert_ne!(tree.child_at(window, Point::new(50.0, 50.0)), Some(overlay));
    }

    #[test]
    fn test_hidden_child_is_not_hit() {
        let (mut tree, window, panel, button) = setup();
        tree.set_visible(button, false).unwrap();
        assert_eq!(tree.child_at(window, Point::new(20.0, 30.0)), Some(panel));
    }

    #[test]
    fn test_global_mapping() {
        let (tree, _, _, button) = setup();
        let global = tree.map_to_global(button, Point::new(1.0, 1.0));
        assert_eq!(global, Point::new(116.0, 126.0));
        assert_eq!(tree.map_from_global(button, global), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_widget_at_global_point() {
        let (tree, window, _, button) = setup();
        assert_eq!(tree.widget_at(Point::new(116.0, 126.0)), Some(button));
        assert_eq!(tree.widget_at(Point::new(450.0, 350.0)), Some(window));
        assert_eq!(tree.widget_at(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_top_level_at_respects_stacking() {
        let (mut tree, window, _, _) = setup();
        let other = tree.create_window("other", WindowType::Dialog, Rect::new(150.0, 150.0, 50.0, 50.0));
        assert_eq!(tree.top_level_at(Point::new(160.0, 160.0)), Some(window));
        tree.set_visible(other, true).unwrap();
        assert_eq!(tree.top_level_at(Point::new(160.0, 160.0)), Some(other));
        tree.raise(window).unwrap();
        assert_eq!(tree.top_level_at(Point::new(160.0, 160.0)), Some(window));
    }

    #[test]
    fn test_destroy_cascades_and_invalidates() {
        let (mut tree, window, panel, button) = setup();
        let removed = tree.destroy(panel).unwrap();
        assert_eq!(removed, vec![button, panel]);
        assert!(!tree.contains(panel));
        assert!(!tree.contains(button));
        assert!(tree.children(window).is_empty());

        // A new widget reusing the slot never aliases the old handle.
        let fresh = tree
            .create_child(window, "fresh", Rect::new(0.0, 0.0, 1.0, 1.0))
            .unwrap();
        assert_ne!(fresh, panel);
        assert!(!tree.contains(panel));
    }

    #[test]
    fn test_circular_parentage_rejected() {
        let (mut tree, _, panel, button) = setup();
        assert_eq!(
            tree.set_parent(panel, Some(button)),
            Err(WidgetError::CircularParentage)
        );
        assert_eq!(tree.set_parent(panel, Some(panel)), Err(WidgetError::CircularParentage));
    }

    #[test]
    fn test_is_ancestor_of_stops_at_window() {
        let (mut tree, window, panel, button) = setup();
        assert!(tree.is_ancestor_of(window, button));
        assert!(tree.is_ancestor_of(panel, button));
        assert!(!tree.is_ancestor_of(button, panel));

        let popup = tree.create_window("popup", WindowType::Popup, Rect::new(0.0, 0.0, 10.0, 10.0));
        tree.set_parent(popup, Some(panel)).unwrap();
        assert!(tree.is_window(popup));
        assert!(!tree.is_ancestor_of(panel, popup));
        assert_eq!(tree.window(popup), Some(popup));
    }

    #[test]
    fn test_enabled_and_visible_propagate() {
        let (mut tree, _, panel, button) = setup();
        assert!(tree.is_enabled(button));
        tree.set_enabled(panel, false).unwrap();
        assert!(!tree.is_enabled(button));
        assert!(tree.is_visible(button));
        tree.set_visible(panel, false).unwrap();
        assert!(!tree.is_visible(button));
    }

    #[test]
    fn test_alien_and_native_parent() {
        let (mut tree, window, panel, button) = setup();
        assert!(tree.is_alien(button));
        assert!(!tree.is_alien(window));
        assert_eq!(tree.native_parent(button), Some(window));
        tree.set_attribute(panel, WidgetAttributes::NATIVE_WINDOW, true).unwrap();
        assert_eq!(tree.native_parent(button), Some(panel));
        assert_eq!(tree.effective_native(panel), Some(panel));
    }

    #[test]
    fn test_focus_child_chain() {
        let (mut tree, window, panel, button) = setup();
        tree.set_focus_child_chain(button);
        assert_eq!(tree.focus_child(window), Some(button));
        assert_eq!(tree.focus_child(panel), Some(button));
        tree.clear_focus_child_chain(button);
        assert_eq!(tree.focus_child(window), None);
    }

    #[test]
    fn test_focus_proxy_loop_rejected() {
        let (mut tree, _, panel, button) = setup();
        tree.set_focus_proxy(panel, Some(button)).unwrap();
        assert_eq!(tree.resolve_focus_proxy(panel), button);
        assert_eq!(
            tree.set_focus_proxy(button, Some(panel)),
            Err(WidgetError::FocusProxyLoop)
        );
    }

    #[test]
    fn test_depth_in_window() {
        let (tree, window, panel, button) = setup();
        assert_eq!(tree.depth_in_window(window), 0);
        assert_eq!(tree.depth_in_window(panel), 1);
        assert_eq!(tree.depth_in_window(button), 2);
    }
}
