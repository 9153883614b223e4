//! DOM output model: escaping stream, update elements, render batches.

pub mod escape;
pub mod element;
pub mod batch;

pub use escape::{EscapeOStream, RuleSet};
pub use element::{DomElement, DomElementType, ElementMode, Property};
pub use batch::{Instruction, RenderBatch, RenderSink, SinkError, PROTOCOL_VERSION};
