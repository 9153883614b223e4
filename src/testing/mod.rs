//! Headless testing framework: Pilot, recording sink, snapshot helpers.
//!
//! Use the [`Pilot`] to drive an [`Application`](crate::app::Application)
//! through handler/flush cycles without a client. Use [`batch_to_string`]
//! and related helpers to capture batches as plain text for snapshot-style
//! assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::{Pilot, RecordingSink};
pub use snapshot::{batch_to_string, created_html, instruction_to_string, update_to_string};
