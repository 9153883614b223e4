//! Tree nodes: expandable nodes whose children load on demand, with an
//! optimistic client-side toggle confirmed by the server.

pub mod expand;
pub mod node;
pub mod toggle;

pub use node::{ChildCountPolicy, LoadPolicy, PopulateFn, TreeNodeState};
pub use toggle::{ToggleReply, ToggleRequest};
