//! Optimistic expand/collapse.
//!
//! A client that knows a node's children are already on the page flips the
//! node locally and reports the toggle. The server applies it and answers
//! with the authoritative state; a rejected reply tells the client to roll
//! its local change back.

use crate::widget::{TreeError, WidgetId, WidgetTree};

/// A toggle reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleRequest {
    Expand(WidgetId),
    Collapse(WidgetId),
}

impl ToggleRequest {
    pub fn node(self) -> WidgetId {
        match self {
            ToggleRequest::Expand(id) | ToggleRequest::Collapse(id) => id,
        }
    }

    /// The state the client assumed after toggling.
    pub fn wants_expanded(self) -> bool {
        matches!(self, ToggleRequest::Expand(_))
    }
}

/// The server's answer to a [`ToggleRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleReply {
    /// The node ended up in the state the client assumed.
    Confirmed { node: WidgetId, expanded: bool },
    /// The node ended up elsewhere; the client restores `expanded`.
    Rejected { node: WidgetId, expanded: bool },
}

impl ToggleReply {
    pub fn node(self) -> WidgetId {
        match self {
            ToggleReply::Confirmed { node, .. } | ToggleReply::Rejected { node, .. } => node,
        }
    }

    /// Expansion state after the toggle was applied.
    pub fn expanded(self) -> bool {
        match self {
            ToggleReply::Confirmed { expanded, .. } | ToggleReply::Rejected { expanded, .. } => {
                expanded
            }
        }
    }

    pub fn is_confirmed(self) -> bool {
        matches!(self, ToggleReply::Confirmed { .. })
    }
}

impl WidgetTree {
    /// Whether the client may toggle `id` without waiting for the server:
    /// its children are loaded and there is at least one.
    pub fn can_toggle_optimistically(&self, id: WidgetId) -> Result<bool, TreeError> {
        Ok(self.tree_node(id)?.is_optimistic())
    }

    /// Apply a toggle and report whether the client's assumption held.
    pub fn handle_toggle(&mut self, request: ToggleRequest) -> Result<ToggleReply, TreeError> {
        let node = request.node();
        match request {
            ToggleRequest::Expand(_) => self.expand(node)?,
            ToggleRequest::Collapse(_) => self.collapse(node)?,
        }
        let expanded = self.is_expanded(node)?;
        let reply = if expanded == request.wants_expanded() {
            ToggleReply::Confirmed { node, expanded }
        } else {
            ToggleReply::Rejected { node, expanded }
        };
        tracing::debug!(?node, expanded, confirmed = reply.is_confirmed(), "toggle handled");
        Ok(reply)
    }
}
