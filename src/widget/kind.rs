//! Widget kinds: the closed set of widget variants and their dispatch.

use crate::dom::{DomElement, DomElementType};
use crate::tree::TreeNodeState;
use crate::widgets::{Anchor, Button, Container, GroupBox, Text, TextArea};

use super::dirty::DirtyFlags;

/// The kind of a widget, carrying its kind-specific state.
#[derive(Debug)]
pub enum WidgetKind {
    Container(Container),
    Text(Text),
    Button(Button),
    TextArea(TextArea),
    Anchor(Anchor),
    GroupBox(GroupBox),
    TreeNode(TreeNodeState),
}

impl WidgetKind {
    /// Short type name, used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Container(_) => "Container",
            WidgetKind::Text(_) => "Text",
            WidgetKind::Button(_) => "Button",
            WidgetKind::TextArea(_) => "TextArea",
            WidgetKind::Anchor(_) => "Anchor",
            WidgetKind::GroupBox(_) => "GroupBox",
            WidgetKind::TreeNode(_) => "TreeNode",
        }
    }

    /// The element this kind renders to.
    pub fn dom_type(&self) -> DomElementType {
        match self {
            WidgetKind::Container(c) => c.dom_type(),
            WidgetKind::Text(t) => t.dom_type(),
            WidgetKind::Button(_) => Button::DOM_TYPE,
            WidgetKind::TextArea(_) => TextArea::DOM_TYPE,
            WidgetKind::Anchor(_) => Anchor::DOM_TYPE,
            WidgetKind::GroupBox(_) => GroupBox::DOM_TYPE,
            WidgetKind::TreeNode(_) => TreeNodeState::DOM_TYPE,
        }
    }

    /// Whether widgets of this kind hold child widgets.
    pub fn accepts_children(&self) -> bool {
        matches!(
            self,
            WidgetKind::Container(_) | WidgetKind::GroupBox(_) | WidgetKind::TreeNode(_)
        )
    }

    /// Write the kind-specific part of an element. With `all` set every
    /// field is written (creation); otherwise only what `flags` names.
    pub fn update_dom(&self, element: &mut DomElement, flags: DirtyFlags, all: bool) {
        match self {
            WidgetKind::Container(c) => c.update_dom(element, flags, all),
            WidgetKind::Text(t) => t.update_dom(element, flags, all),
            WidgetKind::Button(b) => b.update_dom(element, flags, all),
            WidgetKind::TextArea(t) => t.update_dom(element, flags, all),
            WidgetKind::Anchor(a) => a.update_dom(element, flags, all),
            WidgetKind::GroupBox(g) => g.update_dom(element, flags, all),
            WidgetKind::TreeNode(n) => n.update_dom(element, flags, all),
        }
    }

    /// Replace the primary text of kinds that have one. Returns `None` for
    /// kinds without text.
    pub fn set_text(&mut self, text: &str) -> Option<DirtyFlags> {
        match self {
            WidgetKind::Text(t) => Some(t.set_text(text)),
            WidgetKind::Button(b) => Some(b.set_label(text)),
            WidgetKind::TextArea(t) => Some(t.set_text(text)),
            WidgetKind::Anchor(a) => Some(a.set_text(text)),
            WidgetKind::GroupBox(g) => Some(g.set_title(text)),
            WidgetKind::Container(_) | WidgetKind::TreeNode(_) => None,
        }
    }

    /// The primary text, if this kind has one.
    pub fn text(&self) -> Option<&str> {
        match self {
            WidgetKind::Text(t) => Some(t.text()),
            WidgetKind::Button(b) => Some(b.label()),
            WidgetKind::TextArea(t) => Some(t.text()),
            WidgetKind::Anchor(a) => Some(a.text()),
            WidgetKind::GroupBox(g) => Some(g.title()),
            WidgetKind::Container(_) | WidgetKind::TreeNode(_) => None,
        }
    }

    pub fn as_tree_node(&self) -> Option<&TreeNodeState> {
        match self {
            WidgetKind::TreeNode(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_tree_node_mut(&mut self) -> Option<&mut TreeNodeState> {
        match self {
            WidgetKind::TreeNode(n) => Some(n),
            _ => None,
        }
    }
}

impl From<Container> for WidgetKind {
    fn from(c: Container) -> Self {
        WidgetKind::Container(c)
    }
}

impl From<Text> for WidgetKind {
    fn from(t: Text) -> Self {
        WidgetKind::Text(t)
    }
}

impl From<Button> for WidgetKind {
    fn from(b: Button) -> Self {
        WidgetKind::Button(b)
    }
}

impl From<TextArea> for WidgetKind {
    fn from(t: TextArea) -> Self {
        WidgetKind::TextArea(t)
    }
}

impl From<Anchor> for WidgetKind {
    fn from(a: Anchor) -> Self {
        WidgetKind::Anchor(a)
    }
}

impl From<GroupBox> for WidgetKind {
    fn from(g: GroupBox) -> Self {
        WidgetKind::GroupBox(g)
    }
}

impl From<TreeNodeState> for WidgetKind {
    fn from(n: TreeNodeState) -> Self {
        WidgetKind::TreeNode(n)
    }
}
