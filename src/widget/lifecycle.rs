//! Repaint scheduling: which widgets asked for a render pass.
//!
//! The `RepaintQueue` records, without duplicates, the widgets that changed
//! since the last pass together with the DOM ids of rendered widgets that
//! were destroyed. The render pass drains it exactly once; a second drain
//! before new mutations observes an empty queue. Scheduled widgets gate
//! whether a pass runs; the pass itself finds dirty widgets by walking the
//! tree.

use std::collections::HashSet;

use super::node::WidgetId;

// ---------------------------------------------------------------------------
// RepaintQueue
// ---------------------------------------------------------------------------

/// De-duplicated record of pending repaint requests and removals.
#[derive(Debug, Default)]
pub struct RepaintQueue {
    /// Set of scheduled widgets, for de-duplication.
    scheduled: HashSet<WidgetId>,
    /// Scheduled widgets in request order.
    order: Vec<WidgetId>,
    /// DOM ids of destroyed widgets the client still shows.
    removals: Vec<String>,
}

/// Everything a render pass takes out of the queue.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Drained {
    pub scheduled: Vec<WidgetId>,
    pub removals: Vec<String>,
}

impl RepaintQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a render pass on behalf of `id`.
    ///
    /// Returns `false` if the widget was already scheduled (no duplicate
    /// entry).
    pub fn schedule(&mut self, id: WidgetId) -> bool {
        if self.scheduled.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Record that the element `dom_id` must be removed from the client.
    pub fn queue_removal(&mut self, dom_id: impl Into<String>) {
        let dom_id = dom_id.into();
        if !self.removals.contains(&dom_id) {
            self.removals.push(dom_id);
        }
    }

    /// Whether `id` is waiting for a pass.
    pub fn is_scheduled(&self, id: WidgetId) -> bool {
        self.scheduled.contains(&id)
    }

    /// Number of scheduled widgets.
    pub fn scheduled_count(&self) -> usize {
        self.order.len()
    }

    /// DOM ids queued for removal, in order.
    pub fn removals(&self) -> &[String] {
        &self.removals
    }

    /// Whether a render pass has anything to do.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty() && self.removals.is_empty()
    }

    /// Take every pending request.
    ///
    /// After calling this, the queue is empty.
    pub fn drain(&mut self) -> Drained {
        self.scheduled.clear();
        Drained {
            scheduled: std::mem::take(&mut self.order),
            removals: std::mem::take(&mut self.removals),
        }
    }

    /// Put removals from a lost batch back in front of any new ones.
    pub fn restore_removals(&mut self, mut removals: Vec<String>) {
        removals.retain(|id| !self.removals.contains(id));
        removals.append(&mut self.removals);
        self.removals = removals;
    }

    /// Forget a destroyed widget.
    pub fn forget(&mut self, id: WidgetId) {
        if self.scheduled.remove(&id) {
            self.order.retain(|&other| other != id);
        }
    }

    /// Clear all pending state.
    pub fn clear(&mut self) {
        self.scheduled.clear();
        self.order.clear();
        self.removals.clear();
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    /// Helper to create a fresh WidgetId from a slotmap.
    fn make_id(sm: &mut SlotMap<WidgetId, ()>) -> WidgetId {
        sm.insert(())
    }

    #[test]
    fn new_queue_is_empty() {
        let queue = RepaintQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.scheduled_count(), 0);
    }

    #[test]
    fn schedule_deduplicates() {
        let mut sm = SlotMap::with_key();
        let id = make_id(&mut sm);
        let mut queue = RepaintQueue::new();

        assert!(queue.schedule(id));
        assert!(!queue.schedule(id));
        assert_eq!(queue.scheduled_count(), 1);
        assert!(queue.is_scheduled(id));
    }

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut sm = SlotMap::with_key();
        let a = make_id(&mut sm);
        let b = make_id(&mut sm);
        let mut queue = RepaintQueue::new();
        queue.schedule(b);
        queue.schedule(a);
        queue.queue_removal("w9");

        let drained = queue.drain();
        assert_eq!(drained.scheduled, vec![b, a]);
        assert_eq!(drained.removals, vec!["w9".to_string()]);
        assert!(queue.is_empty());
        assert_eq!(queue.drain(), Drained::default());
    }

    #[test]
    fn removals_are_deduplicated() {
        let mut queue = RepaintQueue::new();
        queue.queue_removal("w1");
        queue.queue_removal("w1");
        assert_eq!(queue.removals(), &["w1".to_string()]);
    }

    #[test]
    fn restore_puts_lost_removals_first() {
        let mut queue = RepaintQueue::new();
        queue.queue_removal("w3");
        queue.restore_removals(vec!["w1".into(), "w3".into()]);
        assert_eq!(queue.removals(), &["w1".to_string(), "w3".to_string()]);
    }

    #[test]
    fn forget_drops_schedule() {
        let mut sm = SlotMap::with_key();
        let id = make_id(&mut sm);
        let mut queue = RepaintQueue::new();
        queue.schedule(id);
        queue.forget(id);
        assert!(queue.is_empty());
        assert!(!queue.is_scheduled(id));
    }
}
