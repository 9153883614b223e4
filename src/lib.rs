//! # trellis
//!
//! A server-side widget tree that renders itself incrementally into DOM
//! update instructions for a browser client.
//!
//! Application code mutates a retained tree of widgets; every mutation marks
//! what changed. A render pass turns the pending changes into one ordered
//! [`RenderBatch`](dom::RenderBatch): whole elements for widgets the client
//! has never seen, targeted updates for the rest, removals by id. Grid and
//! box layouts hand the client a configuration it uses to size cells, and
//! afterwards send only what changed.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: escaping stream, update elements, render batches and sinks
//! - **[`widget`]**: slotmap-backed widget tree, dirty flags, repaint queue
//! - **[`widgets`]**: leaf widgets (Container, Text, Button, TextArea, Anchor, GroupBox)
//! - **[`layout`]**: grid model, grid and box layouts, the client layout protocol
//! - **[`render`]**: the render pass and its per-session context
//! - **[`tree`]**: expandable tree nodes with load policies and optimistic toggles
//! - **[`app`]**: application config, flush cycle, serialised sessions
//! - **[`geometry`]**: lengths, sides, spacing
//! - **[`testing`]**: headless pilot, recording sink, snapshot helpers

// Foundation
pub mod geometry;

// Core systems
pub mod dom;
pub mod layout;

// Widget system
pub mod tree;
pub mod widget;
pub mod widgets;

// Rendering
pub mod render;

// Application
pub mod app;
pub mod testing;

pub use app::{AppConfig, Application, Session, SessionError};
pub use dom::{Instruction, RenderBatch, RenderSink};
pub use widget::{TreeError, WidgetId, WidgetTree};
