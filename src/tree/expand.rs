//! Tree node operations on the widget arena: building the node hierarchy,
//! loading children according to the load policy, and expand/collapse.

use crate::widget::{DirtyFlags, TreeError, WidgetId, WidgetTree};
use crate::widgets::{Container, Text};

use super::node::{ChildCountPolicy, LoadPolicy, PopulateFn, TreeNodeState};

impl WidgetTree {
    // ── Access ───────────────────────────────────────────────────────

    /// Tree node state of `id`.
    pub fn tree_node(&self, id: WidgetId) -> Result<&TreeNodeState, TreeError> {
        self.node(id)?
            .kind
            .as_tree_node()
            .ok_or(TreeError::NotATreeNode(id))
    }

    fn tree_node_mut(&mut self, id: WidgetId) -> Result<&mut TreeNodeState, TreeError> {
        self.node_mut(id)?
            .kind
            .as_tree_node_mut()
            .ok_or(TreeError::NotATreeNode(id))
    }

    pub fn child_nodes(&self, id: WidgetId) -> Result<&[WidgetId], TreeError> {
        Ok(self.tree_node(id)?.child_nodes())
    }

    /// The tree node `id` is a child of.
    pub fn parent_node(&self, id: WidgetId) -> Option<WidgetId> {
        self.tree_node(id).ok().and_then(TreeNodeState::parent_node)
    }

    pub fn is_expanded(&self, id: WidgetId) -> Result<bool, TreeError> {
        Ok(self.tree_node(id)?.expanded)
    }

    pub fn is_populated(&self, id: WidgetId) -> Result<bool, TreeError> {
        Ok(self.tree_node(id)?.populated)
    }

    pub fn is_expandable(&self, id: WidgetId) -> Result<bool, TreeError> {
        Ok(self.tree_node(id)?.is_expandable())
    }

    /// Number of children shown in the node's count.
    pub fn displayed_child_count(&self, id: WidgetId) -> Result<usize, TreeError> {
        Ok(self.tree_node(id)?.child_nodes.len())
    }

    fn parent_expanded(&self, id: WidgetId) -> bool {
        self.parent_node(id)
            .and_then(|p| self.tree_node(p).ok())
            .is_some_and(|p| p.expanded)
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Create a detached, collapsed tree node labelled `label`.
    ///
    /// `populate` runs once, when the load policy first needs the node's
    /// children.
    pub fn create_tree_node(
        &mut self,
        label: &str,
        populate: Option<PopulateFn>,
    ) -> Result<WidgetId, TreeError> {
        let label_id = self.create(Text::new(label));
        self.set_style_class(label_id, "Wt-label")?;
        let children_box = self.create(Container::list());
        self.set_hidden(children_box, true)?;

        let id = self.create(TreeNodeState::new(label_id, children_box, populate));
        self.attach(id, 0, label_id)?;
        self.attach(id, 1, children_box)?;
        self.set_style_class(id, "Wt-tree")?;
        Ok(id)
    }

    /// Append `child` to the child nodes of `parent`.
    ///
    /// The child inherits the parent's load and child count policies.
    pub fn add_child_node(&mut self, parent: WidgetId, child: WidgetId) -> Result<(), TreeError> {
        let children_box = self.tree_node(parent)?.children_box;
        let incoming = self.tree_node(child)?;
        if incoming.parent_node.is_some() {
            return Err(TreeError::AlreadyAttached { child });
        }
        let (child_load, child_count) = (incoming.load_policy, incoming.child_count_policy);
        self.attach(children_box, usize::MAX, child)?;

        let state = self.tree_node_mut(parent)?;
        state.child_nodes.push(child);
        let (load_policy, count_policy) = (state.load_policy, state.child_count_policy);
        let previous_last = state.child_nodes.len().checked_sub(2).map(|i| state.child_nodes[i]);
        self.tree_node_mut(child)?.parent_node = Some(parent);
        tracing::trace!(?parent, ?child, "tree node added");

        if child_load != load_policy {
            self.set_load_policy(child, load_policy)?;
        }
        if child_count != count_policy {
            self.set_child_count_policy(child, count_policy)?;
        }
        if let Some(previous) = previous_last {
            self.update_tree_node(previous)?;
        }
        self.update_tree_node(child)?;
        self.update_tree_node(parent)?;
        self.reset_learned_slots(parent)
    }

    /// Take `child` out of `parent`'s child nodes without destroying it.
    pub fn remove_child_node(&mut self, parent: WidgetId, child: WidgetId) -> Result<(), TreeError> {
        let state = self.tree_node_mut(parent)?;
        let Some(index) = state.child_nodes.iter().position(|&c| c == child) else {
            return Err(TreeError::NotAChild { parent, child });
        };
        state.child_nodes.remove(index);
        self.tree_node_mut(child)?.parent_node = None;

        let node = self.node(child)?;
        if node.rendered || node.state.is_rendering() {
            let dom_id = node.dom_id.clone();
            self.repaint.queue_removal(dom_id);
        }
        self.unlink(child);
        self.forget_rendered(child);
        self.update_children(parent)
    }

    /// Drop a destroyed node from its parent's bookkeeping.
    pub(crate) fn forget_tree_child(&mut self, id: WidgetId) {
        let Some(parent) = self.parent_node(id) else { return };
        if let Ok(state) = self.tree_node_mut(parent) {
            state.child_nodes.retain(|&c| c != id);
        }
        if let Err(err) = self.update_children(parent) {
            tracing::warn!(?parent, "cannot refresh tree node after removal: {err}");
        }
    }

    /// Whether rendering `parent` must leave `child` out for now: the child
    /// list of a tree node stays off the client until it is loaded.
    pub(crate) fn defers_child(&self, parent: WidgetId, child: WidgetId) -> bool {
        self.nodes
            .get(parent)
            .and_then(|n| n.kind.as_tree_node())
            .is_some_and(|state| state.children_box == child && !state.children_loaded)
    }

    // ── Policies ─────────────────────────────────────────────────────

    /// Set the load policy of `id` and, recursively, of every existing
    /// child node.
    pub fn set_load_policy(&mut self, id: WidgetId, policy: LoadPolicy) -> Result<(), TreeError> {
        let state = self.tree_node_mut(id)?;
        state.load_policy = policy;
        let (expanded, count_policy) = (state.expanded, state.child_count_policy);

        match policy {
            LoadPolicy::PreLoading => self.load_children(id)?,
            LoadPolicy::NextLevelLoading => {
                if expanded {
                    self.load_children(id)?;
                    self.load_grand_children(id)?;
                } else if self.parent_expanded(id) {
                    self.load_children(id)?;
                }
            }
            LoadPolicy::LazyLoading => {
                if expanded {
                    self.load_children(id)?;
                } else if count_policy == ChildCountPolicy::Enabled && self.parent_expanded(id) {
                    self.populate_once(id)?;
                }
            }
        }

        for child in self.tree_node(id)?.child_nodes.clone() {
            self.set_load_policy(child, policy)?;
        }
        Ok(())
    }

    /// Set how `id` and its descendants display their child count.
    pub fn set_child_count_policy(
        &mut self,
        id: WidgetId,
        policy: ChildCountPolicy,
    ) -> Result<(), TreeError> {
        self.tree_node_mut(id)?.child_count_policy = policy;
        if policy != ChildCountPolicy::Disabled {
            for child in self.tree_node(id)?.child_nodes.clone() {
                self.set_child_count_policy(child, policy)?;
            }
        }
        self.update_tree_node(id)
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Run the populate hook unless it already ran. Returns whether it ran.
    fn populate_once(&mut self, id: WidgetId) -> Result<bool, TreeError> {
        let state = self.tree_node_mut(id)?;
        if state.populated {
            return Ok(false);
        }
        state.populated = true;
        if let Some(mut populate) = state.populate.take() {
            tracing::debug!(node = ?id, "populating tree node");
            populate(self, id)?;
        }
        Ok(true)
    }

    /// Populate `id` and put its child list on the client.
    fn load_children(&mut self, id: WidgetId) -> Result<(), TreeError> {
        if self.tree_node(id)?.children_loaded {
            return Ok(());
        }
        self.populate_once(id)?;
        let state = self.tree_node_mut(id)?;
        state.children_loaded = true;
        let children_box = state.children_box;
        self.schedule(children_box);
        self.reset_learned_slots(id)
    }

    fn load_grand_children(&mut self, id: WidgetId) -> Result<(), TreeError> {
        for child in self.tree_node(id)?.child_nodes.clone() {
            self.load_children(child)?;
        }
        Ok(())
    }

    // ── Expand / collapse ────────────────────────────────────────────

    /// Expand `id`, loading its children first if needed.
    ///
    /// A node that turns out to have no children stays collapsed; its
    /// parent's learned toggle behavior is reset instead. Expanding
    /// collapses every tree node below `id`.
    pub fn expand(&mut self, id: WidgetId) -> Result<(), TreeError> {
        if self.tree_node(id)?.expanded {
            return Ok(());
        }
        self.load_children(id)?;
        let state = self.tree_node(id)?;
        let (parent, empty, policy) = (state.parent_node, state.child_nodes.is_empty(), state.load_policy);
        if let (Some(parent), true) = (parent, empty) {
            self.reset_learned_slots(parent)?;
            return self.update_tree_node(id);
        }
        if policy == LoadPolicy::NextLevelLoading {
            self.load_grand_children(id)?;
        }
        self.show_expanded(id)?;
        self.update_children(id)
    }

    /// Collapse `id`. No-op when already collapsed.
    pub fn collapse(&mut self, id: WidgetId) -> Result<(), TreeError> {
        if self.tree_node(id)?.expanded {
            self.show_collapsed(id)?;
        }
        Ok(())
    }

    fn show_expanded(&mut self, id: WidgetId) -> Result<(), TreeError> {
        let state = self.tree_node_mut(id)?;
        state.expanded = true;
        let children_box = state.children_box;
        let children = state.child_nodes.clone();
        if !children.is_empty() {
            self.set_hidden(children_box, false)?;
        }
        self.mark(id, DirtyFlags::ATTRIBUTES);
        for child in children {
            self.collapse_subtree(child)?;
        }
        Ok(())
    }

    /// Collapse `id` and every tree node below it.
    fn collapse_subtree(&mut self, id: WidgetId) -> Result<(), TreeError> {
        self.show_collapsed(id)?;
        for child in self.tree_node(id)?.child_nodes.clone() {
            self.collapse_subtree(child)?;
        }
        Ok(())
    }

    fn show_collapsed(&mut self, id: WidgetId) -> Result<(), TreeError> {
        let state = self.tree_node_mut(id)?;
        let changed = state.expanded;
        state.expanded = false;
        let children_box = state.children_box;
        self.set_hidden(children_box, true)?;
        if changed {
            self.mark(id, DirtyFlags::ATTRIBUTES);
        }
        Ok(())
    }

    /// Mark the toggle behavior the client learned for `id` as stale, so
    /// the next pass resends it.
    pub fn reset_learned_slots(&mut self, id: WidgetId) -> Result<(), TreeError> {
        let state = self.tree_node_mut(id)?;
        state.slot_generation = state.slot_generation.wrapping_add(1);
        self.mark(id, DirtyFlags::ATTRIBUTES);
        Ok(())
    }

    // ── Presentation refresh ─────────────────────────────────────────

    fn update_children(&mut self, id: WidgetId) -> Result<(), TreeError> {
        for child in self.tree_node(id)?.child_nodes.clone() {
            self.update_tree_node(child)?;
        }
        self.update_tree_node(id)?;
        self.reset_learned_slots(id)
    }

    /// Recompute what the node displays: trunk end marker, affordance and
    /// child count.
    fn update_tree_node(&mut self, id: WidgetId) -> Result<(), TreeError> {
        let parent = self.parent_node(id);
        let is_last = match parent {
            Some(p) => self.tree_node(p)?.child_nodes.last() == Some(&id),
            None => true,
        };
        let state = self.tree_node(id)?;
        let visible = parent.is_none() || self.parent_expanded(id);
        if visible && state.child_count_policy == ChildCountPolicy::Enabled && !state.populated {
            self.populate_once(id)?;
        }

        let state = self.tree_node_mut(id)?;
        let before = (state.is_last, state.displayed_count, state.is_expandable());
        state.is_last = is_last;
        if state.child_count_policy != ChildCountPolicy::Disabled && state.populated {
            state.displayed_count = Some(state.child_nodes.len());
        }
        let after = (state.is_last, state.displayed_count, state.is_expandable());
        let hide_children = !state.expanded;
        let children_box = state.children_box;
        self.set_hidden(children_box, hide_children)?;
        if before != after {
            self.mark(id, DirtyFlags::ATTRIBUTES);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderContext, Renderer};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn leaf(tree: &mut WidgetTree, label: &str) -> WidgetId {
        tree.create_tree_node(label, None).unwrap()
    }

    /// A hook that adds `n` leaves and counts its invocations.
    fn adding(n: usize, calls: Arc<AtomicUsize>) -> PopulateFn {
        Box::new(move |tree, id| {
            calls.fetch_add(1, Ordering::SeqCst);
            for i in 0..n {
                let child = tree.create_tree_node(&format!("c{i}"), None)?;
                tree.add_child_node(id, child)?;
            }
            Ok(())
        })
    }

    #[test]
    fn tree_node_is_built_from_label_and_list() {
        let mut tree = WidgetTree::new();
        let node = leaf(&mut tree, "root");
        let state = tree.tree_node(node).unwrap();
        assert_eq!(tree.children(node), &[state.label(), state.children_box()]);
        assert_eq!(tree.get(state.label()).unwrap().kind.text(), Some("root"));
        assert!(tree.get(state.children_box()).unwrap().is_hidden());
        assert_eq!(tree.get(node).unwrap().style_class(), "Wt-tree");
    }

    #[test]
    fn add_child_node_links_both_ways() {
        let mut tree = WidgetTree::new();
        let root = leaf(&mut tree, "root");
        let a = leaf(&mut tree, "a");
        let b = leaf(&mut tree, "b");
        tree.add_child_node(root, a).unwrap();
        tree.add_child_node(root, b).unwrap();
        assert_eq!(tree.child_nodes(root).unwrap(), &[a, b]);
        assert_eq!(tree.parent_node(a), Some(root));
        assert!(!tree.tree_node(a).unwrap().is_last);
        assert!(tree.tree_node(b).unwrap().is_last);
        assert_eq!(tree.add_child_node(root, a), Err(TreeError::AlreadyAttached { child: a }));
    }

    #[test]
    fn adding_a_plain_widget_is_rejected() {
        let mut tree = WidgetTree::new();
        let root = leaf(&mut tree, "root");
        let text = tree.create(Text::new("x"));
        assert_eq!(tree.add_child_node(root, text), Err(TreeError::NotATreeNode(text)));
    }

    #[test]
    fn expanding_collapses_children() {
        let mut tree = WidgetTree::new();
        let root = leaf(&mut tree, "root");
        let a = leaf(&mut tree, "a");
        let grandchild = leaf(&mut tree, "g");
        let great_grandchild = leaf(&mut tree, "gg");
        tree.add_child_node(root, a).unwrap();
        tree.add_child_node(a, grandchild).unwrap();
        tree.add_child_node(grandchild, great_grandchild).unwrap();
        tree.expand(root).unwrap();
        tree.expand(a).unwrap();
        tree.expand(grandchild).unwrap();
        assert!(tree.is_expanded(a).unwrap());
        assert!(tree.is_expanded(grandchild).unwrap());

        tree.collapse(root).unwrap();
        tree.expand(root).unwrap();
        assert!(tree.is_expanded(root).unwrap());
        assert!(!tree.is_expanded(a).unwrap());
        assert!(!tree.is_expanded(grandchild).unwrap());
        assert!(tree.get(tree.tree_node(grandchild).unwrap().children_box()).unwrap().is_hidden());
    }

    #[test]
    fn expand_with_no_children_stays_collapsed() {
        let mut tree = WidgetTree::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let root = leaf(&mut tree, "root");
        let empty = tree.create_tree_node("empty", Some(adding(0, calls.clone()))).unwrap();
        tree.add_child_node(root, empty).unwrap();
        let generation = tree.tree_node(root).unwrap().slot_generation;

        tree.expand(empty).unwrap();
        assert!(!tree.is_expanded(empty).unwrap());
        assert!(tree.is_populated(empty).unwrap());
        assert!(!tree.is_expandable(empty).unwrap());
        assert!(tree.tree_node(root).unwrap().slot_generation > generation);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn populate_runs_exactly_once() {
        let mut tree = WidgetTree::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let root = tree.create_tree_node("root", Some(adding(2, calls.clone()))).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tree.expand(root).unwrap();
        tree.collapse(root).unwrap();
        tree.expand(root).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(tree.displayed_child_count(root).unwrap(), 2);
    }

    #[test]
    fn load_policy_propagates_to_existing_descendants() {
        let mut tree = WidgetTree::new();
        let root = leaf(&mut tree, "root");
        let a = leaf(&mut tree, "a");
        let b = leaf(&mut tree, "b");
        let a1 = leaf(&mut tree, "a1");
        tree.add_child_node(root, a).unwrap();
        tree.add_child_node(root, b).unwrap();
        tree.add_child_node(a, a1).unwrap();

        tree.set_load_policy(root, LoadPolicy::NextLevelLoading).unwrap();
        for id in [root, a, b, a1] {
            assert_eq!(tree.tree_node(id).unwrap().load_policy(), LoadPolicy::NextLevelLoading);
        }
    }

    #[test]
    fn new_children_inherit_policies() {
        let mut tree = WidgetTree::new();
        let root = leaf(&mut tree, "root");
        tree.set_load_policy(root, LoadPolicy::PreLoading).unwrap();
        tree.set_child_count_policy(root, ChildCountPolicy::Lazy).unwrap();
        let a = leaf(&mut tree, "a");
        tree.add_child_node(root, a).unwrap();
        let state = tree.tree_node(a).unwrap();
        assert_eq!(state.load_policy(), LoadPolicy::PreLoading);
        assert_eq!(state.child_count_policy(), ChildCountPolicy::Lazy);
        assert!(state.children_loaded());
    }

    #[test]
    fn next_level_loading_loads_grandchildren_on_expand() {
        let mut tree = WidgetTree::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let root = leaf(&mut tree, "root");
        let a = tree.create_tree_node("a", Some(adding(1, calls.clone()))).unwrap();
        tree.add_child_node(root, a).unwrap();
        tree.set_load_policy(root, LoadPolicy::NextLevelLoading).unwrap();

        tree.expand(root).unwrap();
        assert!(tree.tree_node(a).unwrap().children_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(tree.can_toggle_optimistically(a).unwrap());
    }

    #[test]
    fn enabled_child_count_populates_visible_nodes() {
        let mut tree = WidgetTree::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let root = leaf(&mut tree, "root");
        let a = tree.create_tree_node("a", Some(adding(3, calls.clone()))).unwrap();
        tree.add_child_node(root, a).unwrap();
        tree.expand(root).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tree.set_child_count_policy(root, ChildCountPolicy::Enabled).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(tree.tree_node(a).unwrap().displayed_count, Some(3));
    }

    #[test]
    fn remove_child_node_detaches_without_destroying() {
        let mut tree = WidgetTree::new();
        let root = leaf(&mut tree, "root");
        let a = leaf(&mut tree, "a");
        tree.add_child_node(root, a).unwrap();
        tree.remove_child_node(root, a).unwrap();
        assert!(tree.contains(a));
        assert_eq!(tree.parent(a), None);
        assert!(tree.child_nodes(root).unwrap().is_empty());
        assert_eq!(
            tree.remove_child_node(root, a),
            Err(TreeError::NotAChild { parent: root, child: a })
        );
    }

    #[test]
    fn destroying_a_child_updates_its_parent() {
        let mut tree = WidgetTree::new();
        let root = leaf(&mut tree, "root");
        let a = leaf(&mut tree, "a");
        let b = leaf(&mut tree, "b");
        tree.add_child_node(root, a).unwrap();
        tree.add_child_node(root, b).unwrap();
        tree.remove(b).unwrap();
        assert_eq!(tree.child_nodes(root).unwrap(), &[a]);
        assert!(tree.tree_node(a).unwrap().is_last);
    }

    #[test]
    fn unloaded_children_stay_off_the_client() {
        let mut tree = WidgetTree::new();
        let mut renderer = Renderer::new();
        let ctx = RenderContext::default();
        let root = leaf(&mut tree, "root");
        let a = leaf(&mut tree, "a");
        tree.add_child_node(root, a).unwrap();
        tree.set_root(root).unwrap();

        let batch = renderer.render(&mut tree, &ctx);
        let html = batch_html(&batch);
        let a_dom = tree.get(a).unwrap().dom_id().to_owned();
        assert!(!html.contains(&a_dom));
        tree.propagate_render_ok(&batch);

        tree.expand(root).unwrap();
        let batch = renderer.render(&mut tree, &ctx);
        assert!(batch_html(&batch).contains(&a_dom));
    }

    fn batch_html(batch: &crate::dom::RenderBatch) -> String {
        batch
            .instructions
            .iter()
            .filter_map(|i| match i {
                crate::dom::Instruction::Create { element, .. } => Some(element.to_html()),
                _ => None,
            })
            .collect()
    }
}
