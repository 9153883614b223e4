//! Widget node types: WidgetId, WidgetNode.

use std::collections::BTreeMap;

use slotmap::new_key_type;

use super::dirty::{DirtyFlags, RenderState};
use super::kind::WidgetKind;
use crate::geometry::Length;
use crate::layout::LayoutId;

new_key_type! {
    /// Unique identifier for a widget in a [`WidgetTree`](super::WidgetTree).
    pub struct WidgetId;
}

/// One widget in the retained tree.
///
/// Parent and child links live in the tree arena; the node only carries its
/// own state.
#[derive(Debug)]
pub struct WidgetNode {
    /// What kind of widget this is, and its kind-specific state.
    pub kind: WidgetKind,
    /// Identifier of the element this widget renders to.
    pub(crate) dom_id: String,
    pub(crate) state: RenderState,
    /// Whether the client has acknowledged an element for this widget.
    pub(crate) rendered: bool,
    /// Re-create the whole element (and its subtree) on the next pass.
    pub(crate) full_rerender: bool,
    pub(crate) hidden: bool,
    pub(crate) style_class: String,
    /// Free-form HTML attributes set by the application.
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) width: Length,
    pub(crate) height: Length,
    pub(crate) min_width: Length,
    pub(crate) min_height: Length,
    pub(crate) max_width: Length,
    pub(crate) max_height: Length,
    /// Layout managing this widget's children (containers only).
    pub(crate) layout: Option<LayoutId>,
    /// Layout this widget is placed in, if any.
    pub(crate) in_layout: Option<LayoutId>,
}

impl WidgetNode {
    pub(crate) fn new(kind: WidgetKind, dom_id: String) -> Self {
        Self {
            kind,
            dom_id,
            state: RenderState::Dirty(DirtyFlags::all()),
            rendered: false,
            full_rerender: false,
            hidden: false,
            style_class: String::new(),
            attributes: BTreeMap::new(),
            width: Length::Auto,
            height: Length::Auto,
            min_width: Length::Auto,
            min_height: Length::Auto,
            max_width: Length::Auto,
            max_height: Length::Auto,
            layout: None,
            in_layout: None,
        }
    }

    /// Identifier of the DOM element for this widget.
    pub fn dom_id(&self) -> &str {
        &self.dom_id
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Whether an element for this widget exists on the client.
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Whether the next pass re-creates this widget from scratch.
    pub fn needs_full_rerender(&self) -> bool {
        self.full_rerender
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn style_class(&self) -> &str {
        &self.style_class
    }

    /// Application-defined attribute, if set.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn width(&self) -> Length {
        self.width
    }

    pub fn height(&self) -> Length {
        self.height
    }

    pub fn minimum_width(&self) -> Length {
        self.min_width
    }

    pub fn minimum_height(&self) -> Length {
        self.min_height
    }

    pub fn maximum_width(&self) -> Length {
        self.max_width
    }

    pub fn maximum_height(&self) -> Length {
        self.max_height
    }

    /// Layout installed on this container.
    pub fn layout(&self) -> Option<LayoutId> {
        self.layout
    }

    /// Layout this widget is an item of.
    pub fn in_layout(&self) -> Option<LayoutId> {
        self.in_layout
    }

    /// Whether the next pass has anything to emit for this widget itself.
    pub fn has_pending_output(&self) -> bool {
        !self.rendered || self.full_rerender || self.state.is_dirty()
    }
}
