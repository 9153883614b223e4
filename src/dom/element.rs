//! DOM update elements: the unit of output sent to the presentation layer.
//!
//! A [`DomElement`] either describes a node to create (tag, attributes,
//! properties, nested children) or a set of changes to apply to a node that
//! already exists on the client, addressed by its id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::escape::{EscapeOStream, RuleSet};

// ---------------------------------------------------------------------------
// DomElementType
// ---------------------------------------------------------------------------

/// The HTML tags the renderer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomElementType {
    A,
    Br,
    Button,
    Col,
    Div,
    Fieldset,
    Form,
    Img,
    Input,
    Label,
    Legend,
    Li,
    Ul,
    Span,
    Table,
    Tbody,
    Td,
    Tr,
    Textarea,
    P,
}

impl DomElementType {
    /// Lowercase HTML tag name.
    pub fn tag_name(self) -> &'static str {
        match self {
            DomElementType::A => "a",
            DomElementType::Br => "br",
            DomElementType::Button => "button",
            DomElementType::Col => "col",
            DomElementType::Div => "div",
            DomElementType::Fieldset => "fieldset",
            DomElementType::Form => "form",
            DomElementType::Img => "img",
            DomElementType::Input => "input",
            DomElementType::Label => "label",
            DomElementType::Legend => "legend",
            DomElementType::Li => "li",
            DomElementType::Ul => "ul",
            DomElementType::Span => "span",
            DomElementType::Table => "table",
            DomElementType::Tbody => "tbody",
            DomElementType::Td => "td",
            DomElementType::Tr => "tr",
            DomElementType::Textarea => "textarea",
            DomElementType::P => "p",
        }
    }

    /// Whether browsers lay this element out inline by default.
    pub fn is_default_inline(self) -> bool {
        matches!(
            self,
            DomElementType::A
                | DomElementType::Br
                | DomElementType::Button
                | DomElementType::Img
                | DomElementType::Input
                | DomElementType::Label
                | DomElementType::Span
                | DomElementType::Textarea
        )
    }

    /// Void elements have no closing tag.
    pub fn is_void(self) -> bool {
        matches!(
            self,
            DomElementType::Br | DomElementType::Col | DomElementType::Img | DomElementType::Input
        )
    }
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// DOM properties, as opposed to free-form HTML attributes.
///
/// Style properties are folded into a single `style` attribute when an
/// element is serialized as markup; the client applies them individually on
/// update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    InnerHtml,
    Value,
    Class,
    Disabled,
    RowSpan,
    ColSpan,
    /// Raw style text, emitted before the individual style properties.
    Style,
    StylePosition,
    StyleDisplay,
    StyleVisibility,
    StyleWidth,
    StyleHeight,
    StyleMinWidth,
    StyleMinHeight,
    StyleFloat,
    StyleTextAlign,
    StyleBoxSizing,
}

impl Property {
    /// The CSS property name for style properties.
    pub fn css_name(self) -> Option<&'static str> {
        match self {
            Property::StylePosition => Some("position"),
            Property::StyleDisplay => Some("display"),
            Property::StyleVisibility => Some("visibility"),
            Property::StyleWidth => Some("width"),
            Property::StyleHeight => Some("height"),
            Property::StyleMinWidth => Some("min-width"),
            Property::StyleMinHeight => Some("min-height"),
            Property::StyleFloat => Some("float"),
            Property::StyleTextAlign => Some("text-align"),
            Property::StyleBoxSizing => Some("box-sizing"),
            _ => None,
        }
    }

    /// The HTML attribute name for non-style properties that map to one.
    fn attribute_name(self) -> Option<&'static str> {
        match self {
            Property::Value => Some("value"),
            Property::Class => Some("class"),
            Property::Disabled => Some("disabled"),
            Property::RowSpan => Some("rowspan"),
            Property::ColSpan => Some("colspan"),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DomElement
// ---------------------------------------------------------------------------

/// Whether an element describes a new node or a change to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementMode {
    Create,
    Update,
}

/// One node's creation or incremental mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomElement {
    pub mode: ElementMode,
    pub tag: DomElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<Property, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DomElement>,
    /// Script to run once the element is attached (or updated).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub javascript: String,
}

impl DomElement {
    /// A new element to be created on the client.
    pub fn create_new(tag: DomElementType) -> Self {
        Self {
            mode: ElementMode::Create,
            tag,
            id: None,
            attributes: BTreeMap::new(),
            properties: BTreeMap::new(),
            children: Vec::new(),
            javascript: String::new(),
        }
    }

    /// An update targeting the existing element `id`.
    pub fn get_for_update(id: impl Into<String>, tag: DomElementType) -> Self {
        Self {
            mode: ElementMode::Update,
            id: Some(id.into()),
            ..Self::create_new(tag)
        }
    }

    /// Set the element id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the element id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Set an HTML attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// The value of an HTML attribute, if set.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set a DOM property.
    pub fn set_property(&mut self, property: Property, value: impl Into<String>) {
        self.properties.insert(property, value.into());
    }

    /// The value of a DOM property, or `""` when unset.
    pub fn property(&self, property: Property) -> &str {
        self.properties
            .get(&property)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Whether a DOM property has been set.
    pub fn has_property(&self, property: Property) -> bool {
        self.properties.contains_key(&property)
    }

    /// Append a child element. Only creation elements carry children.
    pub fn add_child(&mut self, child: DomElement) {
        debug_assert!(
            self.mode == ElementMode::Create,
            "update elements cannot carry children"
        );
        if self.mode == ElementMode::Create {
            self.children.push(child);
        }
    }

    /// Queue script to run after the element is attached.
    pub fn call_javascript(&mut self, js: &str) {
        self.javascript.push_str(js);
    }

    /// Whether this update changes nothing.
    pub fn is_empty_update(&self) -> bool {
        self.mode == ElementMode::Update
            && self.attributes.is_empty()
            && self.properties.is_empty()
            && self.javascript.is_empty()
    }

    /// Whether this element (or its tag) renders inline.
    pub fn is_default_inline(&self) -> bool {
        self.tag.is_default_inline()
    }

    /// Combined style text from the raw `Style` property and the individual
    /// style properties.
    pub fn style_text(&self) -> String {
        let mut style = self.property(Property::Style).to_owned();
        for (property, value) in &self.properties {
            if let Some(name) = property.css_name() {
                style.push_str(name);
                style.push(':');
                style.push_str(value);
                style.push(';');
            }
        }
        style
    }

    /// Serialize a creation element (and its subtree) as HTML markup.
    ///
    /// Attribute values and inner HTML pass through the stream's escaping
    /// rules; inner HTML is expected to be escaped already by the widget that
    /// produced it and is written raw.
    pub fn as_html<W: fmt::Write>(&self, out: &mut EscapeOStream<W>) -> fmt::Result {
        out.append_raw("<")?;
        out.append_raw(self.tag.tag_name())?;
        if let Some(id) = &self.id {
            write_attribute(out, "id", id)?;
        }
        for (property, value) in &self.properties {
            if let Some(name) = property.attribute_name() {
                write_attribute(out, name, value)?;
            }
        }
        for (name, value) in &self.attributes {
            write_attribute(out, name, value)?;
        }
        let style = self.style_text();
        if !style.is_empty() {
            write_attribute(out, "style", &style)?;
        }
        out.append_raw(">")?;
        if self.tag.is_void() {
            return Ok(());
        }
        out.append_raw(self.property(Property::InnerHtml))?;
        for child in &self.children {
            child.as_html(out)?;
        }
        out.append_raw("</")?;
        out.append_raw(self.tag.tag_name())?;
        out.append_raw(">")
    }

    /// HTML markup for this element as a `String`.
    pub fn to_html(&self) -> String {
        let mut out = EscapeOStream::new();
        // Writing into a String cannot fail.
        let _ = self.as_html(&mut out);
        out.into_inner()
    }

    /// Depth-first search for a descendant (or self) with the given id.
    pub fn find(&self, id: &str) -> Option<&DomElement> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

fn write_attribute<W: fmt::Write>(
    out: &mut EscapeOStream<W>,
    name: &str,
    value: &str,
) -> fmt::Result {
    out.append_raw(" ")?;
    out.append_raw(name)?;
    out.append_raw("=\"")?;
    {
        let mut scoped = out.scoped(RuleSet::HtmlAttribute);
        scoped.append(value)?;
    }
    out.append_raw("\"")
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_new_defaults() {
        let e = DomElement::create_new(DomElementType::Div);
        assert_eq!(e.mode, ElementMode::Create);
        assert!(e.id.is_none());
        assert!(e.children.is_empty());
        assert_eq!(e.property(Property::Class), "");
    }

    #[test]
    fn get_for_update_targets_id() {
        let e = DomElement::get_for_update("w3", DomElementType::Span);
        assert_eq!(e.mode, ElementMode::Update);
        assert_eq!(e.id.as_deref(), Some("w3"));
        assert!(e.is_empty_update());
    }

    #[test]
    fn properties_and_attributes_are_distinct() {
        let mut e = DomElement::create_new(DomElementType::Textarea);
        e.set_property(Property::Value, "x");
        e.set_attribute("value", "y");
        assert_eq!(e.property(Property::Value), "x");
        assert_eq!(e.attribute("value"), Some("y"));
    }

    #[test]
    fn html_serialization_escapes_attributes() {
        let mut e = DomElement::create_new(DomElementType::A).with_id("w1");
        e.set_attribute("href", "/a?x=1&y=\"2\"");
        e.set_property(Property::InnerHtml, "link");
        assert_eq!(
            e.to_html(),
            "<a id=\"w1\" href=\"/a?x=1&amp;y=&#34;2&#34;\">link</a>"
        );
    }

    #[test]
    fn html_serialization_folds_style() {
        let mut e = DomElement::create_new(DomElementType::Div);
        e.set_property(Property::Style, "width: 100%;");
        e.set_property(Property::StylePosition, "relative");
        e.set_property(Property::StyleVisibility, "hidden");
        assert_eq!(
            e.to_html(),
            "<div style=\"width: 100%;position:relative;visibility:hidden;\"></div>"
        );
    }

    #[test]
    fn html_serialization_nests_children_and_void_tags() {
        let mut table = DomElement::create_new(DomElementType::Table);
        table.add_child(DomElement::create_new(DomElementType::Col));
        let mut tbody = DomElement::create_new(DomElementType::Tbody);
        let mut tr = DomElement::create_new(DomElementType::Tr);
        let mut td = DomElement::create_new(DomElementType::Td);
        td.set_property(Property::ColSpan, "2");
        tr.add_child(td);
        tbody.add_child(tr);
        table.add_child(tbody);
        assert_eq!(
            table.to_html(),
            "<table><col><tbody><tr><td colspan=\"2\"></td></tr></tbody></table>"
        );
    }

    #[test]
    fn find_descends_into_children() {
        let mut outer = DomElement::create_new(DomElementType::Div).with_id("a");
        let mut inner = DomElement::create_new(DomElementType::Div).with_id("b");
        inner.add_child(DomElement::create_new(DomElementType::Span).with_id("c"));
        outer.add_child(inner);
        assert!(outer.find("c").is_some());
        assert!(outer.find("zz").is_none());
    }

    #[test]
    fn inline_tags() {
        assert!(DomElementType::Span.is_default_inline());
        assert!(DomElementType::Button.is_default_inline());
        assert!(!DomElementType::Div.is_default_inline());
        assert!(!DomElementType::Table.is_default_inline());
    }

    #[test]
    fn serde_round_trip_preserves_mode() {
        let mut e = DomElement::get_for_update("w9", DomElementType::Div);
        e.set_property(Property::StyleDisplay, "none");
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"mode\":\"update\""));
        assert!(json.contains("\"style-display\":\"none\""));
        let back: DomElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
