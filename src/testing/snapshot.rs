//! Snapshot rendering helpers.
//!
//! Functions for turning render batches and elements into plain-text strings
//! suitable for inline snapshots and assertions.

use crate::dom::{DomElement, Instruction, RenderBatch};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render a batch as one line per instruction.
///
/// Creations and replacements show the element's HTML, updates list the
/// changed properties and attributes, layout commands show their JSON.
///
/// # Examples
///
/// ```ignore
/// use trellis::testing::batch_to_string;
///
/// let text = batch_to_string(&batch);
/// assert_eq!(text, "create in body: <div id=\"w1\"></div>");
/// ```
pub fn batch_to_string(batch: &RenderBatch) -> String {
    let mut lines: Vec<String> = batch.instructions.iter().map(instruction_to_string).collect();
    if !batch.script.is_empty() {
        lines.push(format!("script {}", batch.script));
    }
    lines.join("\n")
}

/// Render a single instruction.
pub fn instruction_to_string(instruction: &Instruction) -> String {
    match instruction {
        Instruction::Remove { id } => format!("remove {id}"),
        Instruction::Create { parent, before: Some(before), element } => {
            format!("create in {parent} before {before}: {}", element.to_html())
        }
        Instruction::Create { parent, before: None, element } => {
            format!("create in {parent}: {}", element.to_html())
        }
        Instruction::Replace { id, element } => format!("replace {id}: {}", element.to_html()),
        Instruction::Update { element } => update_to_string(element),
        Instruction::Layout { command } => match serde_json::to_string(command) {
            Ok(json) => format!("layout {json}"),
            Err(err) => format!("layout <{err}>"),
        },
        Instruction::Script { code } => format!("script {code}"),
    }
}

/// Render an update element as `update <id> key=value ...`.
pub fn update_to_string(element: &DomElement) -> String {
    let mut out = format!("update {}", element.id.as_deref().unwrap_or("?"));
    for (property, value) in &element.properties {
        out.push_str(&format!(" {property:?}={value:?}"));
    }
    for (name, value) in &element.attributes {
        out.push_str(&format!(" @{name}={value:?}"));
    }
    if !element.javascript.is_empty() {
        out.push_str(&format!(" js={:?}", element.javascript));
    }
    out
}

/// The HTML of every element created in a batch, concatenated.
pub fn created_html(batch: &RenderBatch) -> String {
    batch
        .instructions
        .iter()
        .filter_map(|instruction| match instruction {
            Instruction::Create { element, .. } | Instruction::Replace { element, .. } => {
                Some(element.to_html())
            }
            _ => None,
        })
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DomElementType, Property};

    #[test]
    fn removal_line() {
        let mut batch = RenderBatch::new();
        batch.push(Instruction::Remove { id: "w3".into() });
        assert_eq!(batch_to_string(&batch), "remove w3");
    }

    #[test]
    fn update_lists_changed_fields() {
        let mut element = DomElement::get_for_update("w2", DomElementType::Span);
        element.set_property(Property::InnerHtml, "hi");
        element.set_attribute("title", "t");
        assert_eq!(update_to_string(&element), "update w2 InnerHtml=\"hi\" @title=\"t\"");
    }

    #[test]
    fn create_shows_before_sibling() {
        let element = DomElement::create_new(DomElementType::Div).with_id("w5");
        let instruction = Instruction::Create {
            parent: "w1".into(),
            before: Some("w4".into()),
            element,
        };
        assert_eq!(
            instruction_to_string(&instruction),
            "create in w1 before w4: <div id=\"w5\"></div>"
        );
    }

    #[test]
    fn trailing_script_is_last() {
        let mut batch = RenderBatch::new();
        batch.do_javascript("go();");
        batch.push(Instruction::Script { code: "a();".into() });
        assert_eq!(batch_to_string(&batch), "script a();\nscript go();");
    }
}
