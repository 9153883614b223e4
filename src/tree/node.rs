//! Tree node state: expansion, load policy, and population bookkeeping.

use crate::dom::{DomElement, DomElementType};
use crate::widget::{DirtyFlags, TreeError, WidgetId, WidgetTree};

/// Hook that adds child nodes to a tree node the first time it is loaded.
///
/// Receives the tree and the node being populated. It runs at most once per
/// node and must add children synchronously before returning.
pub type PopulateFn = Box<dyn FnMut(&mut WidgetTree, WidgetId) -> Result<(), TreeError> + Send>;

/// When the children of a tree node are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Children are loaded the first time the node is expanded.
    #[default]
    LazyLoading,
    /// The whole subtree is loaded up front.
    PreLoading,
    /// Expanding a node also loads its children's children, so the next
    /// level expands without a round trip.
    NextLevelLoading,
}

/// Whether a node shows how many children it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildCountPolicy {
    #[default]
    Disabled,
    /// Nodes whose parent is expanded are populated so their count can be
    /// shown.
    Enabled,
    /// The count is shown once a node happens to be populated.
    Lazy,
}

/// Kind-specific state of a tree node widget.
///
/// A tree node renders as a list item holding its label and a list of
/// child nodes. The list stays off the client until the children are
/// loaded.
pub struct TreeNodeState {
    pub(crate) label: WidgetId,
    pub(crate) children_box: WidgetId,
    pub(crate) child_nodes: Vec<WidgetId>,
    pub(crate) parent_node: Option<WidgetId>,
    pub(crate) expanded: bool,
    pub(crate) load_policy: LoadPolicy,
    pub(crate) child_count_policy: ChildCountPolicy,
    pub(crate) children_loaded: bool,
    pub(crate) populated: bool,
    pub(crate) populate: Option<PopulateFn>,
    pub(crate) is_last: bool,
    pub(crate) displayed_count: Option<usize>,
    /// Bumped whenever toggle behavior the client learned is stale.
    pub(crate) slot_generation: u32,
}

impl TreeNodeState {
    pub(crate) const DOM_TYPE: DomElementType = DomElementType::Li;

    pub(crate) fn new(label: WidgetId, children_box: WidgetId, populate: Option<PopulateFn>) -> Self {
        Self {
            label,
            children_box,
            child_nodes: Vec::new(),
            parent_node: None,
            expanded: false,
            load_policy: LoadPolicy::default(),
            child_count_policy: ChildCountPolicy::default(),
            children_loaded: false,
            // A node without a hook has nothing to populate.
            populated: populate.is_none(),
            populate,
            is_last: true,
            displayed_count: None,
            slot_generation: 0,
        }
    }

    /// The label widget.
    pub fn label(&self) -> WidgetId {
        self.label
    }

    /// The list widget child nodes are placed in.
    pub fn children_box(&self) -> WidgetId {
        self.children_box
    }

    pub fn child_nodes(&self) -> &[WidgetId] {
        &self.child_nodes
    }

    pub fn parent_node(&self) -> Option<WidgetId> {
        self.parent_node
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.load_policy
    }

    pub fn child_count_policy(&self) -> ChildCountPolicy {
        self.child_count_policy
    }

    pub fn children_loaded(&self) -> bool {
        self.children_loaded
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Whether the node offers an expand affordance. An unpopulated node
    /// with a hook is assumed to have children until loading proves
    /// otherwise.
    pub fn is_expandable(&self) -> bool {
        if self.populated {
            !self.child_nodes.is_empty()
        } else {
            self.populate.is_some()
        }
    }

    /// Whether the client may flip this node on its own and let the server
    /// confirm afterwards.
    pub fn is_optimistic(&self) -> bool {
        self.children_loaded && !self.child_nodes.is_empty()
    }

    pub(crate) fn update_dom(&self, element: &mut DomElement, flags: DirtyFlags, all: bool) {
        if !(all || flags.contains(DirtyFlags::ATTRIBUTES)) {
            return;
        }
        element.set_attribute("data-expanded", bool_text(self.expanded));
        element.set_attribute("data-expandable", bool_text(self.is_expandable()));
        element.set_attribute("data-last", bool_text(self.is_last));
        element.set_attribute("data-optimistic", if self.is_optimistic() { "1" } else { "0" });
        element.set_attribute("data-slots", self.slot_generation.to_string());
        if self.child_count_policy != ChildCountPolicy::Disabled {
            let count = match self.displayed_count {
                Some(n) if n > 0 => format!("({n})"),
                _ => String::new(),
            };
            element.set_attribute("data-count", count);
        }
    }
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl std::fmt::Debug for TreeNodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeNodeState")
            .field("child_nodes", &self.child_nodes.len())
            .field("expanded", &self.expanded)
            .field("load_policy", &self.load_policy)
            .field("children_loaded", &self.children_loaded)
            .field("populated", &self.populated)
            .finish_non_exhaustive()
    }
}
