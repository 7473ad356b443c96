//! Delivery of rank events to whoever displays them.

use std::sync::Mutex;

use crate::events::RankEvent;

/// Receives level-up, tier-up, decay-warning and demotion events.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: &RankEvent);
}

/// Writes events to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, event: &RankEvent) {
        if event.is_promotion() {
            tracing::info!(?event, "{event}");
        } else {
            tracing::warn!(?event, "{event}");
        }
    }
}

/// Buffers events until drained.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<RankEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every event received so far.
    pub fn drain(&self) -> Vec<RankEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, event: &RankEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(*event);
    }
}
