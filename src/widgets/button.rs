//! Button widget: a push button with a text label.

use crate::dom::escape::escape_text;
use crate::dom::{DomElement, DomElementType, ElementMode, Property};
use crate::widget::DirtyFlags;

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A push button with a plain-text label.
///
/// # Examples
///
/// ```ignore
/// let ok = Button::new("OK");
/// let locked = Button::new("Locked").disabled(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    label: String,
    disabled: bool,
}

impl Button {
    /// Create a new button with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
        }
    }

    /// Set whether the button is disabled (builder pattern).
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Change the label. Returns the flags the change implies.
    pub fn set_label(&mut self, label: impl Into<String>) -> DirtyFlags {
        let label = label.into();
        if label == self.label {
            return DirtyFlags::empty();
        }
        self.label = label;
        DirtyFlags::CONTENT
    }

    pub fn set_disabled(&mut self, disabled: bool) -> DirtyFlags {
        if disabled == self.disabled {
            return DirtyFlags::empty();
        }
        self.disabled = disabled;
        DirtyFlags::ATTRIBUTES
    }

    pub(crate) fn update_dom(&self, element: &mut DomElement, flags: DirtyFlags, all: bool) {
        if all || flags.contains(DirtyFlags::CONTENT) {
            element.set_property(Property::InnerHtml, escape_text(&self.label));
        }
        if all || flags.contains(DirtyFlags::ATTRIBUTES) {
            // A fresh element is enabled unless told otherwise.
            if self.disabled || element.mode == ElementMode::Update {
                element.set_property(Property::Disabled, self.disabled.to_string());
            }
        }
    }

    pub(crate) const DOM_TYPE: DomElementType = DomElementType::Button;
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_accessor() {
        let b = Button::new("Submit");
        assert_eq!(b.label(), "Submit");
        assert!(!b.is_disabled());
    }

    #[test]
    fn set_label_reports_content() {
        let mut b = Button::new("OK");
        assert_eq!(b.set_label("OK"), DirtyFlags::empty());
        assert_eq!(b.set_label("Cancel"), DirtyFlags::CONTENT);
        assert_eq!(b.label(), "Cancel");
    }

    #[test]
    fn set_disabled_reports_attributes() {
        let mut b = Button::new("OK");
        assert_eq!(b.set_disabled(true), DirtyFlags::ATTRIBUTES);
        assert_eq!(b.set_disabled(true), DirtyFlags::empty());
    }

    #[test]
    fn create_escapes_label_and_omits_enabled_flag() {
        let b = Button::new("<b>");
        let mut el = DomElement::create_new(Button::DOM_TYPE);
        b.update_dom(&mut el, DirtyFlags::all(), true);
        assert_eq!(el.property(Property::InnerHtml), "&lt;b>");
        assert!(!el.has_property(Property::Disabled));
    }

    #[test]
    fn update_only_touches_flagged_fields() {
        let b = Button::new("OK");
        let mut el = DomElement::get_for_update("w1", Button::DOM_TYPE);
        b.update_dom(&mut el, DirtyFlags::ATTRIBUTES, false);
        assert_eq!(el.property(Property::Disabled), "false");
        assert!(!el.has_property(Property::InnerHtml));
    }
}
