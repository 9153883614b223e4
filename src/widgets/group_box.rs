//! Group box: a titled frame around child widgets.

use crate::dom::escape::{escape_js_single, escape_text};
use crate::dom::{DomElement, DomElementType, ElementMode, Property};
use crate::widget::DirtyFlags;

/// A `fieldset` with a `legend` title. Children render inside the frame,
/// after the legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBox {
    title: String,
}

impl GroupBox {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> DirtyFlags {
        let title = title.into();
        if title == self.title {
            return DirtyFlags::empty();
        }
        self.title = title;
        DirtyFlags::CONTENT
    }

    pub(crate) const DOM_TYPE: DomElementType = DomElementType::Fieldset;

    /// Id of the legend element inside the frame.
    fn legend_id(element: &DomElement) -> String {
        format!("{}l", element.id.as_deref().unwrap_or_default())
    }

    pub(crate) fn update_dom(&self, element: &mut DomElement, flags: DirtyFlags, all: bool) {
        if !(all || flags.contains(DirtyFlags::CONTENT)) {
            return;
        }
        let title = escape_text(&self.title);
        match element.mode {
            ElementMode::Create => {
                let mut legend =
                    DomElement::create_new(DomElementType::Legend).with_id(Self::legend_id(element));
                legend.set_property(Property::InnerHtml, title);
                element.add_child(legend);
            }
            ElementMode::Update => {
                let js = format!(
                    "document.getElementById('{}').innerHTML='{}';",
                    Self::legend_id(element),
                    escape_js_single(&title)
                );
                element.call_javascript(&js);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_adds_legend_first() {
        let g = GroupBox::new("Options");
        let mut el = DomElement::create_new(GroupBox::DOM_TYPE).with_id("w2");
        g.update_dom(&mut el, DirtyFlags::all(), true);
        assert_eq!(
            el.to_html(),
            r#"<fieldset id="w2"><legend id="w2l">Options</legend></fieldset>"#
        );
    }

    #[test]
    fn title_update_goes_through_script() {
        let mut g = GroupBox::new("a");
        g.set_title("it's");
        let mut el = DomElement::get_for_update("w2", GroupBox::DOM_TYPE);
        g.update_dom(&mut el, DirtyFlags::CONTENT, false);
        assert_eq!(
            el.javascript,
            "document.getElementById('w2l').innerHTML='it\\'s';"
        );
    }
}
