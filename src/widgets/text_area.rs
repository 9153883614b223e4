//! Multi-line text input.

use crate::dom::escape::escape_text;
use crate::dom::{DomElement, DomElementType, ElementMode, Property};
use crate::widget::DirtyFlags;

/// A multi-line text editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArea {
    text: String,
    rows: u32,
    columns: u32,
}

impl TextArea {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rows: 5,
            columns: 20,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> DirtyFlags {
        let text = text.into();
        if text == self.text {
            return DirtyFlags::empty();
        }
        self.text = text;
        DirtyFlags::CONTENT
    }

    /// Visible size in character cells.
    pub fn set_size(&mut self, rows: u32, columns: u32) -> DirtyFlags {
        if rows == self.rows && columns == self.columns {
            return DirtyFlags::empty();
        }
        self.rows = rows;
        self.columns = columns;
        DirtyFlags::ATTRIBUTES
    }

    pub(crate) const DOM_TYPE: DomElementType = DomElementType::Textarea;

    pub(crate) fn update_dom(&self, element: &mut DomElement, flags: DirtyFlags, all: bool) {
        if all || flags.contains(DirtyFlags::ATTRIBUTES) {
            element.set_attribute("rows", self.rows.to_string());
            element.set_attribute("cols", self.columns.to_string());
        }
        if all || flags.contains(DirtyFlags::CONTENT) {
            if element.mode == ElementMode::Create {
                element.set_property(Property::InnerHtml, escape_text(&self.text));
            } else {
                element.set_property(Property::Value, self.text.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_writes_body_and_size() {
        let t = TextArea::new("x<y");
        let mut el = DomElement::create_new(TextArea::DOM_TYPE);
        t.update_dom(&mut el, DirtyFlags::all(), true);
        assert_eq!(el.to_html(), r#"<textarea cols="20" rows="5">x&lt;y</textarea>"#);
    }

    #[test]
    fn update_sets_value_property() {
        let mut t = TextArea::new("");
        assert_eq!(t.set_text("typed"), DirtyFlags::CONTENT);
        let mut el = DomElement::get_for_update("w3", TextArea::DOM_TYPE);
        t.update_dom(&mut el, DirtyFlags::CONTENT, false);
        assert_eq!(el.property(Property::Value), "typed");
        assert!(el.attribute("rows").is_none());
    }

    #[test]
    fn resize_marks_attributes() {
        let mut t = TextArea::new("");
        assert_eq!(t.set_size(5, 20), DirtyFlags::empty());
        assert_eq!(t.set_size(10, 40), DirtyFlags::ATTRIBUTES);
    }
}
