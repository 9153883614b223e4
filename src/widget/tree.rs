//! The widget arena: insert, attach, remove, walk, and change tracking.

use slotmap::{SecondaryMap, SlotMap};

use super::dirty::DirtyFlags;
use super::kind::WidgetKind;
use super::lifecycle::RepaintQueue;
use super::node::{WidgetId, WidgetNode};
use crate::dom::RenderBatch;
use crate::geometry::Length;
use crate::layout::{Layout, LayoutId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[WidgetId] = &[];

/// Default contents margin of a top-level layout, in pixels.
pub const DEFAULT_CONTENTS_MARGIN: i32 = 9;

// ---------------------------------------------------------------------------
// TreeError
// ---------------------------------------------------------------------------

/// Structural errors raised by widget tree operations.
///
/// These indicate a caller bug; the operation that raised one has not
/// changed the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("unknown widget {0:?}")]
    UnknownWidget(WidgetId),
    #[error("widget {child:?} is already attached to a parent")]
    AlreadyAttached { child: WidgetId },
    #[error("widget {child:?} is not a child of {parent:?}")]
    NotAChild { parent: WidgetId, child: WidgetId },
    #[error("widget {0:?} cannot hold children")]
    NotAContainer(WidgetId),
    #[error("widget {0:?} is not a tree node")]
    NotATreeNode(WidgetId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: WidgetId, child: WidgetId },
    #[error("children of {0:?} are placed by its layout")]
    ManagedByLayout(WidgetId),
    #[error("{kind} widgets do not support {operation}")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },
}

// ---------------------------------------------------------------------------
// InFlight
// ---------------------------------------------------------------------------

/// What the last render pass emitted and has not been acknowledged yet.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    pub widgets: Vec<WidgetId>,
    /// Layouts whose element was created in the pass.
    pub created_layouts: Vec<LayoutId>,
    /// Layouts whose pending changes were drained by the pass.
    pub updated_layouts: Vec<LayoutId>,
    pub removals: Vec<String>,
}

impl InFlight {
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
            && self.created_layouts.is_empty()
            && self.updated_layouts.is_empty()
            && self.removals.is_empty()
    }
}

// ---------------------------------------------------------------------------
// WidgetTree
// ---------------------------------------------------------------------------

/// The retained widget tree, backed by slotmap arenas.
///
/// All widgets and layouts live in arenas owned by the tree. Parent/child
/// relationships are stored in secondary maps so that removal is
/// O(subtree size) and lookup is O(1). Widgets are created detached and
/// become visible to the render pass once they are reachable from the root.
pub struct WidgetTree {
    pub(crate) nodes: SlotMap<WidgetId, WidgetNode>,
    children: SecondaryMap<WidgetId, Vec<WidgetId>>,
    parent: SecondaryMap<WidgetId, WidgetId>,
    root: Option<WidgetId>,
    pub(crate) layouts: SlotMap<LayoutId, Layout>,
    pub(crate) repaint: RepaintQueue,
    pub(crate) in_flight: InFlight,
    next_dom_seq: u64,
    pub(crate) default_contents_margin: i32,
}

impl WidgetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::with_contents_margin(DEFAULT_CONTENTS_MARGIN)
    }

    /// Create an empty tree whose top-level layouts default to `margin`
    /// pixels of contents margin.
    pub fn with_contents_margin(margin: i32) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
            layouts: SlotMap::with_key(),
            repaint: RepaintQueue::new(),
            in_flight: InFlight::default(),
            next_dom_seq: 0,
            default_contents_margin: margin,
        }
    }

    pub(crate) fn next_dom_id(&mut self, prefix: char) -> String {
        self.next_dom_seq += 1;
        format!("{prefix}{}", self.next_dom_seq)
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Create a detached widget.
    pub fn create(&mut self, kind: impl Into<WidgetKind>) -> WidgetId {
        let dom_id = self.next_dom_id('w');
        let id = self.nodes.insert(WidgetNode::new(kind.into(), dom_id));
        self.children.insert(id, Vec::new());
        id
    }

    /// Make a detached widget the root of the tree.
    pub fn set_root(&mut self, id: WidgetId) -> Result<(), TreeError> {
        self.node(id)?;
        if self.parent.contains_key(id) {
            return Err(TreeError::AlreadyAttached { child: id });
        }
        self.root = Some(id);
        self.schedule(id);
        Ok(())
    }

    /// Append `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<(), TreeError> {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child)
    }

    /// Insert `child` at `index` among `parent`'s children (clamped to the
    /// end).
    pub fn insert_child(
        &mut self,
        parent: WidgetId,
        index: usize,
        child: WidgetId,
    ) -> Result<(), TreeError> {
        let parent_node = self.node(parent)?;
        if !parent_node.kind.accepts_children() {
            return Err(TreeError::NotAContainer(parent));
        }
        if parent_node.layout.is_some() {
            return Err(TreeError::ManagedByLayout(parent));
        }
        if self.node(child)?.in_layout.is_some() {
            return Err(TreeError::AlreadyAttached { child });
        }
        self.attach(parent, index, child)
    }

    /// Link `child` under `parent` without kind or layout checks.
    pub(crate) fn attach(
        &mut self,
        parent: WidgetId,
        index: usize,
        child: WidgetId,
    ) -> Result<(), TreeError> {
        self.node(parent)?;
        self.node(child)?;
        if self.parent.contains_key(child) || self.root == Some(child) {
            return Err(TreeError::AlreadyAttached { child });
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(TreeError::CycleDetected { parent, child });
        }
        self.parent.insert(child, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            let index = index.min(siblings.len());
            siblings.insert(index, child);
        }
        self.schedule(child);
        Ok(())
    }

    /// Take `child` out of its parent's children without destroying it.
    pub(crate) fn unlink(&mut self, child: WidgetId) {
        if let Some(parent_id) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&c| c != child);
            }
        }
    }

    /// Forget that the client ever saw `id` or its subtree; everything will
    /// be created afresh when attached again.
    pub(crate) fn forget_rendered(&mut self, id: WidgetId) {
        for current in self.walk_depth_first(id) {
            if let Some(node) = self.nodes.get_mut(current) {
                node.rendered = false;
                node.full_rerender = false;
                node.state = super::RenderState::Dirty(DirtyFlags::all());
            }
            self.in_flight.widgets.retain(|&w| w != current);
            self.repaint.forget(current);
        }
    }

    /// Destroy a widget and its subtree.
    ///
    /// A widget the client never saw leaves no trace in the next batch. A
    /// rendered widget is removed from the client by id, either directly or,
    /// when it is placed in a layout, by that layout's next update.
    pub fn remove(&mut self, id: WidgetId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        let on_client = node.rendered || node.state.is_rendering();
        let dom_id = node.dom_id.clone();
        let in_layout = node.in_layout.is_some();

        if in_layout {
            self.detach_from_layout(id);
        } else if on_client {
            self.repaint.queue_removal(dom_id.clone());
        }
        self.forget_tree_child(id);
        self.unlink(id);
        if self.root == Some(id) {
            self.root = None;
        }

        for current in self.walk_depth_first(id) {
            if let Some(layout) = self.nodes.get(current).and_then(|n| n.layout) {
                self.destroy_layout(layout);
            }
            self.children.remove(current);
            self.parent.remove(current);
            self.repaint.forget(current);
            self.in_flight.widgets.retain(|&w| w != current);
            self.nodes.remove(current);
        }
        tracing::trace!(widget = %dom_id, on_client, "removed widget");
        Ok(())
    }

    /// Get the parent of a widget, if it has one.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a widget. Returns an empty slice if the widget has
    /// no children or does not exist.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the topmost ancestor.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: WidgetId) -> bool {
        match self.root {
            Some(root) => id == root || self.ancestors(id).last() == Some(&root),
            None => false,
        }
    }

    /// Immutable access to a widget.
    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(id)
    }

    /// Mutable access to a widget. Changes made through this reference are
    /// not tracked; use the setters or [`with_kind_mut`](Self::with_kind_mut).
    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn node(&self, id: WidgetId) -> Result<&WidgetNode, TreeError> {
        self.nodes.get(id).ok_or(TreeError::UnknownWidget(id))
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> Result<&mut WidgetNode, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::UnknownWidget(id))
    }

    /// The current root, if set.
    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    /// Number of widgets in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Find a widget by its DOM id.
    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<WidgetId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.dom_id == dom_id)
            .map(|(id, _)| id)
    }

    // ── Change tracking ──────────────────────────────────────────────

    /// Record that `flags` changed on `id` and request a render pass.
    pub(crate) fn mark(&mut self, id: WidgetId, flags: DirtyFlags) {
        if flags.is_empty() {
            return;
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.state.mark(flags);
            self.repaint.schedule(id);
        }
    }

    /// Request a render pass without marking anything dirty.
    pub(crate) fn schedule(&mut self, id: WidgetId) {
        self.repaint.schedule(id);
    }

    /// Whether a render pass has anything to do.
    pub fn needs_render(&self) -> bool {
        !self.repaint.is_empty()
    }

    /// The repaint queue, for inspection.
    pub fn repaint_queue(&self) -> &RepaintQueue {
        &self.repaint
    }

    /// Re-create `id` and its subtree on the next pass.
    pub fn mark_full_rerender(&mut self, id: WidgetId) -> Result<(), TreeError> {
        self.node_mut(id)?.full_rerender = true;
        self.schedule(id);
        Ok(())
    }

    /// Apply a size-affecting change: layouts holding the widget get to
    /// re-measure it.
    fn size_affected(&mut self, id: WidgetId) {
        if let Some(layout) = self.nodes.get(id).and_then(|n| n.in_layout) {
            self.item_resized(layout, crate::layout::LayoutItem::Widget(id));
        }
    }

    // ── Setters ──────────────────────────────────────────────────────

    /// Replace the primary text (label, title, value) of a widget.
    pub fn set_text(&mut self, id: WidgetId, text: &str) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        let kind = node.kind.name();
        let flags = node.kind.set_text(text).ok_or(TreeError::Unsupported {
            kind,
            operation: "text",
        })?;
        self.mark(id, flags);
        if !flags.is_empty() {
            self.size_affected(id);
        }
        Ok(())
    }

    /// Mutate kind-specific state. The closure returns the flags its change
    /// implies.
    pub fn with_kind_mut(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut WidgetKind) -> DirtyFlags,
    ) -> Result<DirtyFlags, TreeError> {
        let flags = f(&mut self.node_mut(id)?.kind);
        self.mark(id, flags);
        if flags.intersects(DirtyFlags::CONTENT | DirtyFlags::ATTRIBUTES) {
            self.size_affected(id);
        }
        Ok(flags)
    }

    pub fn set_hidden(&mut self, id: WidgetId, hidden: bool) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.hidden == hidden {
            return Ok(());
        }
        node.hidden = hidden;
        self.mark(id, DirtyFlags::VISIBILITY);
        self.size_affected(id);
        Ok(())
    }

    pub fn set_style_class(&mut self, id: WidgetId, class: &str) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.style_class == class {
            return Ok(());
        }
        node.style_class = class.to_owned();
        self.mark(id, DirtyFlags::STYLE);
        self.size_affected(id);
        Ok(())
    }

    /// Set an HTML attribute on the widget's element.
    pub fn set_attribute_value(
        &mut self,
        id: WidgetId,
        name: &str,
        value: &str,
    ) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.attributes.get(name).map(String::as_str) == Some(value) {
            return Ok(());
        }
        node.attributes.insert(name.to_owned(), value.to_owned());
        self.mark(id, DirtyFlags::ATTRIBUTES);
        Ok(())
    }

    /// Declare the widget's width and height.
    pub fn resize(&mut self, id: WidgetId, width: Length, height: Length) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.width == width && node.height == height {
            return Ok(());
        }
        node.width = width;
        node.height = height;
        self.mark(id, DirtyFlags::STYLE);
        self.size_affected(id);
        Ok(())
    }

    pub fn set_minimum_size(
        &mut self,
        id: WidgetId,
        width: Length,
        height: Length,
    ) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.min_width == width && node.min_height == height {
            return Ok(());
        }
        node.min_width = width;
        node.min_height = height;
        self.mark(id, DirtyFlags::STYLE);
        self.size_affected(id);
        Ok(())
    }

    pub fn set_maximum_size(
        &mut self,
        id: WidgetId,
        width: Length,
        height: Length,
    ) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.max_width == width && node.max_height == height {
            return Ok(());
        }
        node.max_width = width;
        node.max_height = height;
        if let Some(layout) = node.layout {
            // The layout's client configuration carries the maximum size.
            self.mark_full_rerender(id)?;
            tracing::debug!(?layout, "maximum size changed on layout container");
        } else {
            self.mark(id, DirtyFlags::STYLE);
        }
        Ok(())
    }

    // ── Acknowledgment ───────────────────────────────────────────────

    /// The batch produced by the last pass was delivered: everything it
    /// carried is now clean.
    pub fn propagate_render_ok(&mut self, batch: &RenderBatch) {
        let in_flight = std::mem::take(&mut self.in_flight);
        for id in in_flight.widgets {
            if let Some(node) = self.nodes.get_mut(id) {
                node.state.acknowledge();
                node.rendered = true;
                node.full_rerender = false;
            }
        }
        for id in in_flight.created_layouts {
            if let Some(layout) = self.layouts.get_mut(id) {
                layout.renderer.rendered = true;
            }
        }
        tracing::debug!(instructions = batch.len(), "render acknowledged");
    }

    /// The batch produced by the last pass was lost: restore everything it
    /// carried so the next pass sends it again.
    pub fn render_failed(&mut self) {
        let in_flight = std::mem::take(&mut self.in_flight);
        for &id in &in_flight.widgets {
            if let Some(node) = self.nodes.get_mut(id) {
                node.state.roll_back();
                self.repaint.schedule(id);
            }
        }
        for id in in_flight.updated_layouts {
            // Drained pending lists cannot be replayed; re-create the layout.
            if let Some(container) = self.layouts.get(id).and_then(|l| l.container) {
                if let Some(node) = self.nodes.get_mut(container) {
                    node.full_rerender = true;
                    self.repaint.schedule(container);
                }
            }
        }
        self.repaint.restore_removals(in_flight.removals);
        tracing::warn!(widgets = in_flight.widgets.len(), "render failed, changes rolled back");
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("widgets", &self.nodes.len())
            .field("layouts", &self.layouts.len())
            .field("root", &self.root)
            .finish()
    }
}
