//! Widget system: arena tree, change tracking, repaint scheduling.

pub mod dirty;
pub mod kind;
pub mod lifecycle;
pub mod node;
pub mod tree;

pub use dirty::{DirtyFlags, RenderState};
pub use kind::WidgetKind;
pub use lifecycle::RepaintQueue;
pub use node::{WidgetId, WidgetNode};
pub use tree::{TreeError, WidgetTree, DEFAULT_CONTENTS_MARGIN};
