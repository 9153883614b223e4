//! Text widget: a run of escaped plain text.

use crate::dom::escape::escape_text;
use crate::dom::{DomElement, DomElementType, Property};
use crate::widget::DirtyFlags;

/// Plain text, rendered inline (`span`) or as a block (`div`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    text: String,
    inline: bool,
}

impl Text {
    /// Inline text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            inline: true,
        }
    }

    /// Render as a block element instead of inline (builder).
    pub fn block(mut self) -> Self {
        self.inline = false;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> DirtyFlags {
        let text = text.into();
        if text == self.text {
            return DirtyFlags::empty();
        }
        self.text = text;
        DirtyFlags::CONTENT
    }

    pub(crate) fn dom_type(&self) -> DomElementType {
        if self.inline {
            DomElementType::Span
        } else {
            DomElementType::Div
        }
    }

    pub(crate) fn update_dom(&self, element: &mut DomElement, flags: DirtyFlags, all: bool) {
        if all || flags.contains(DirtyFlags::CONTENT) {
            element.set_property(Property::InnerHtml, escape_text(&self.text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_by_default() {
        assert_eq!(Text::new("a").dom_type(), DomElementType::Span);
        assert_eq!(Text::new("a").block().dom_type(), DomElementType::Div);
    }

    #[test]
    fn content_is_escaped() {
        let t = Text::new("a & b");
        let mut el = DomElement::create_new(t.dom_type());
        t.update_dom(&mut el, DirtyFlags::empty(), true);
        assert_eq!(el.property(Property::InnerHtml), "a &amp; b");
    }

    #[test]
    fn unchanged_text_is_not_dirty() {
        let mut t = Text::new("same");
        assert!(t.set_text("same").is_empty());
        assert_eq!(t.set_text("other"), DirtyFlags::CONTENT);
    }
}
