//! Rendering pipeline: per-session context and the render pass.

pub mod context;
pub mod pass;

pub use context::{Environment, LayoutDirection, RenderContext};
pub use pass::{Renderer, ROOT_PARENT};
