//! Container widget: a plain block that holds child widgets or a layout.

use crate::dom::{DomElement, DomElementType};
use crate::widget::DirtyFlags;

/// The element a container renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerTag {
    #[default]
    Div,
    /// An unordered list; children are expected to render as list items.
    List,
}

/// A generic container. Children are rendered in order inside it, unless a
/// layout is installed, in which case the layout decides their placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    tag: ContainerTag,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// A container rendering to `ul`.
    pub fn list() -> Self {
        Self {
            tag: ContainerTag::List,
        }
    }

    pub fn tag(&self) -> ContainerTag {
        self.tag
    }

    pub(crate) fn dom_type(&self) -> DomElementType {
        match self.tag {
            ContainerTag::Div => DomElementType::Div,
            ContainerTag::List => DomElementType::Ul,
        }
    }

    pub(crate) fn update_dom(&self, _element: &mut DomElement, _flags: DirtyFlags, _all: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_div() {
        assert_eq!(Container::new().dom_type(), DomElementType::Div);
        assert_eq!(Container::list().dom_type(), DomElementType::Ul);
    }
}
