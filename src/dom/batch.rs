//! Render batches: the ordered instruction stream handed to a render sink.

use serde::{Deserialize, Serialize};

use super::element::DomElement;
use super::escape::{EscapeOStream, RuleSet};
use crate::layout::config::LayoutCommand;

/// Version of the batch wire format understood by the client runtime.
pub const PROTOCOL_VERSION: u32 = 2;

// ---------------------------------------------------------------------------
// Instruction
// ---------------------------------------------------------------------------

/// One step the presentation layer must apply, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Instruction {
    /// Remove the node with this id. A missing node is not an error.
    Remove { id: String },
    /// Create `element` under `parent`, before the sibling `before` when
    /// given, otherwise as the last child.
    Create {
        parent: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        before: Option<String>,
        element: DomElement,
    },
    /// Replace the node `id` wholesale with `element`.
    Replace { id: String, element: DomElement },
    /// Apply an incremental update to an existing node.
    Update { element: DomElement },
    /// A command for the client-side layout algorithm.
    Layout { command: LayoutCommand },
    /// Free-form script to evaluate.
    Script { code: String },
}

impl Instruction {
    /// The DOM id this instruction addresses, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Instruction::Remove { id } | Instruction::Replace { id, .. } => Some(id),
            Instruction::Create { element, .. } | Instruction::Update { element } => {
                element.id.as_deref()
            }
            Instruction::Layout { command } => Some(command.layout_id()),
            Instruction::Script { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RenderBatch
// ---------------------------------------------------------------------------

/// Everything one render pass produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderBatch {
    pub version: u32,
    pub instructions: Vec<Instruction>,
    /// Trailing script, evaluated after every instruction has been applied.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub script: String,
}

impl Default for RenderBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBatch {
    /// An empty batch.
    pub fn new() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            instructions: Vec::new(),
            script: String::new(),
        }
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Append to the trailing script.
    pub fn do_javascript(&mut self, js: &str) {
        self.script.push_str(js);
    }

    /// Whether the batch carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty() && self.script.is_empty()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Iterate over the layout commands in order.
    pub fn layout_commands(&self) -> impl Iterator<Item = &LayoutCommand> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Layout { command } => Some(command),
            _ => None,
        })
    }

    /// Flatten the batch into script for clients that only evaluate code.
    ///
    /// Each instruction becomes `<class>.apply('<json>');` with the JSON
    /// escaped for a single-quoted string literal; the trailing script
    /// follows verbatim.
    pub fn to_script(&self, javascript_class: &str) -> String {
        let mut out = EscapeOStream::new();
        for instruction in &self.instructions {
            let json = match serde_json::to_string(instruction) {
                Ok(json) => json,
                Err(err) => {
                    tracing::error!("cannot serialize instruction: {err}");
                    continue;
                }
            };
            let _ = out.append_raw(javascript_class);
            let _ = out.append_raw(".apply('");
            {
                let mut quoted = out.scoped(RuleSet::JsStringLiteralSQuote);
                let _ = quoted.append(&json);
            }
            let _ = out.append_raw("');");
        }
        let _ = out.append_raw(&self.script);
        out.into_inner()
    }
}

// ---------------------------------------------------------------------------
// RenderSink
// ---------------------------------------------------------------------------

/// Errors reported by a render sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("render sink rejected the batch: {0}")]
    Rejected(String),
    #[error("render sink is closed")]
    Closed,
}

/// The presentation-layer side of a render pass.
///
/// Implementations apply instructions strictly in order. Removal of an id
/// that no longer exists must be a no-op.
pub trait RenderSink {
    fn apply(&mut self, batch: &RenderBatch) -> Result<(), SinkError>;
}

impl RenderSink for Vec<RenderBatch> {
    fn apply(&mut self, batch: &RenderBatch) -> Result<(), SinkError> {
        self.push(batch.clone());
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
