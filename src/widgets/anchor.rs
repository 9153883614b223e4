//! Anchor widget: a hyperlink.

use crate::dom::escape::escape_text;
use crate::dom::{DomElement, DomElementType, Property};
use crate::widget::DirtyFlags;

/// Where an anchor opens its link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorTarget {
    #[default]
    SelfWindow,
    NewWindow,
}

/// A hyperlink with a text label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    link: String,
    text: String,
    target: AnchorTarget,
}

impl Anchor {
    pub fn new(link: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            text: text.into(),
            target: AnchorTarget::SelfWindow,
        }
    }

    /// Open the link in a new window (builder).
    pub fn with_target(mut self, target: AnchorTarget) -> Self {
        self.target = target;
        self
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target(&self) -> AnchorTarget {
        self.target
    }

    pub fn set_link(&mut self, link: impl Into<String>) -> DirtyFlags {
        let link = link.into();
        if link == self.link {
            return DirtyFlags::empty();
        }
        self.link = link;
        DirtyFlags::ATTRIBUTES
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> DirtyFlags {
        let text = text.into();
        if text == self.text {
            return DirtyFlags::empty();
        }
        self.text = text;
        DirtyFlags::CONTENT
    }

    pub fn set_target(&mut self, target: AnchorTarget) -> DirtyFlags {
        if target == self.target {
            return DirtyFlags::empty();
        }
        self.target = target;
        DirtyFlags::ATTRIBUTES
    }

    pub(crate) const DOM_TYPE: DomElementType = DomElementType::A;

    pub(crate) fn update_dom(&self, element: &mut DomElement, flags: DirtyFlags, all: bool) {
        if all || flags.contains(DirtyFlags::ATTRIBUTES) {
            element.set_attribute("href", self.link.clone());
            match self.target {
                AnchorTarget::NewWindow => element.set_attribute("target", "_blank"),
                AnchorTarget::SelfWindow if !all => element.set_attribute("target", "_self"),
                AnchorTarget::SelfWindow => {}
            }
        }
        if all || flags.contains(DirtyFlags::CONTENT) {
            element.set_property(Property::InnerHtml, escape_text(&self.text));
        }
    }
}
