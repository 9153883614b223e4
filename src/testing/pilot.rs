//! Pilot: programmatic interaction with a headless Application.
//!
//! The `Pilot` owns an [`Application`] and a [`RecordingSink`]. Each step
//! runs an event handler, flushes the resulting batch into the sink, and
//! acknowledges it, the same cycle a session runs for a real client.

use crate::app::{AppConfig, Application, SessionError};
use crate::dom::{RenderBatch, RenderSink, SinkError};
use crate::widget::WidgetTree;

use super::snapshot::batch_to_string;

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// An in-memory render sink that keeps every batch it accepts.
#[derive(Debug, Default)]
pub struct RecordingSink {
    batches: Vec<RenderBatch>,
    failing: bool,
    attempts: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every batch, like a dropped connection.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Batches accepted so far, oldest first.
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    pub fn last(&self) -> Option<&RenderBatch> {
        self.batches.last()
    }

    /// Number of `apply` calls, accepted or not.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl RenderSink for RecordingSink {
    fn apply(&mut self, batch: &RenderBatch) -> Result<(), SinkError> {
        self.attempts += 1;
        if self.failing {
            return Err(SinkError::Rejected("simulated transport failure".to_owned()));
        }
        self.batches.push(batch.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless application driver for testing.
///
/// # Examples
///
/// ```ignore
/// use trellis::testing::Pilot;
/// use trellis::widgets::Container;
///
/// let mut pilot = Pilot::new();
/// pilot.step(|tree| {
///     let root = tree.create(Container::new());
///     tree.set_root(root)
/// })?;
/// assert_eq!(pilot.snapshot(), "create in body: <div id=\"w1\"></div>");
/// ```
pub struct Pilot {
    app: Application,
    sink: RecordingSink,
}

impl Pilot {
    /// A pilot over an application with the default config.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            app: Application::new(config),
            sink: RecordingSink::new(),
        }
    }

    // ── Driving ──────────────────────────────────────────────────────

    /// Run `handler`, then flush. Returns the handler's value.
    pub fn step<R, E>(
        &mut self,
        handler: impl FnOnce(&mut WidgetTree) -> Result<R, E>,
    ) -> Result<R, SessionError>
    where
        SessionError: From<E>,
    {
        let value = self.app.handle(handler)?;
        self.app.flush(&mut self.sink)?;
        Ok(value)
    }

    /// Flush pending changes without running a handler.
    pub fn flush(&mut self) -> Result<RenderBatch, SessionError> {
        self.app.flush(&mut self.sink)
    }

    /// Make the sink reject (or accept again) subsequent batches.
    pub fn disconnect(&mut self, disconnected: bool) {
        self.sink.set_failing(disconnected);
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn app(&self) -> &Application {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut Application {
        &mut self.app
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.app.tree
    }

    pub fn sink(&self) -> &RecordingSink {
        &self.sink
    }

    /// The last delivered batch as text, or an empty string.
    pub fn snapshot(&self) -> String {
        self.sink.last().map(batch_to_string).unwrap_or_default()
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::TreeError;
    use crate::widgets::{Container, Text};

    fn pilot_with_label() -> (Pilot, crate::widget::WidgetId) {
        let mut pilot = Pilot::new();
        let label = pilot
            .step(|tree| {
                let root = tree.create(Container::new());
                let label = tree.create(Text::new("hi"));
                tree.set_root(root)?;
                tree.add_child(root, label)?;
                Ok::<_, TreeError>(label)
            })
            .unwrap();
        (pilot, label)
    }

    #[test]
    fn step_delivers_one_batch() {
        let (pilot, _) = pilot_with_label();
        assert_eq!(pilot.sink().batches().len(), 1);
        assert_eq!(
            pilot.snapshot(),
            "create in body: <div id=\"w1\"><span id=\"w2\">hi</span></div>"
        );
    }

    #[test]
    fn empty_flush_delivers_nothing() {
        let (mut pilot, _) = pilot_with_label();
        assert!(pilot.flush().unwrap().is_empty());
        assert_eq!(pilot.sink().attempts(), 1);
    }

    #[test]
    fn disconnected_sink_keeps_changes_pending() {
        let (mut pilot, label) = pilot_with_label();
        pilot.disconnect(true);
        assert!(pilot.step(|tree| tree.set_text(label, "bye")).is_err());
        assert_eq!(pilot.sink().batches().len(), 1);

        pilot.disconnect(false);
        pilot.flush().unwrap();
        assert_eq!(pilot.snapshot(), "update w2 InnerHtml=\"bye\"");
    }

    #[test]
    fn failing_sink_counts_attempts() {
        let mut sink = RecordingSink::failing();
        assert!(sink.apply(&RenderBatch::new()).is_err());
        assert_eq!(sink.attempts(), 1);
        assert!(sink.batches().is_empty());
    }
}
