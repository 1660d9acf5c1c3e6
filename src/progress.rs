//! Progress events for long-running chunked operations.
//!
//! Large imports and upserts process their input in bounded chunks and
//! report between chunks, so a host event loop can repaint while the work
//! runs. Delivery is best-effort: a subscriber that cannot keep up is
//! pruned rather than allowed to block the operation.

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Which long-running operation a progress event belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    Upsert,
    Import,
}

/// A progress report emitted between processing chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub stage: ProgressStage,
    /// Items processed so far.
    pub processed: usize,
    /// Total items in the batch.
    pub total: usize,
    /// Rounded percentage of `processed / total`.
    pub percent: u8,
}

impl ProgressEvent {
    pub(crate) fn new(stage: ProgressStage, processed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            ((processed as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            stage,
            processed,
            total,
            percent,
        }
    }
}

/// Broadcasts progress events to any number of subscribers.
pub struct ProgressHub {
    senders: RwLock<Vec<Sender<ProgressEvent>>>,
}

impl ProgressHub {
    pub fn new() -> Self {
        Self {
            senders: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe with a bounded buffer. A subscriber whose buffer fills or
    /// whose receiver is dropped is pruned on the next emit.
    pub fn subscribe(&self, buffer: usize) -> Receiver<ProgressEvent> {
        let (sender, receiver) = bounded(buffer.max(1));
        self.senders.write().push(sender);
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.read().len()
    }

    pub(crate) fn emit(&self, event: ProgressEvent) {
        // Fast path: nothing subscribed, skip the write lock.
        if self.senders.read().is_empty() {
            return;
        }
        self.senders
            .write()
            .retain(|sender| sender.try_send(event).is_ok());
    }
}

impl Default for ProgressHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Control surface handed to chunked operations: progress emission plus a
/// cooperative abort flag, both consulted only at chunk boundaries.
pub(crate) struct ChunkControl<'a> {
    hub: &'a ProgressHub,
    abort: &'a AtomicBool,
    stage: ProgressStage,
    /// Only batches above the large-batch threshold report progress.
    enabled: bool,
}

impl<'a> ChunkControl<'a> {
    pub fn new(
        hub: &'a ProgressHub,
        abort: &'a AtomicBool,
        stage: ProgressStage,
        enabled: bool,
    ) -> Self {
        Self {
            hub,
            abort,
            stage,
            enabled,
        }
    }

    pub fn emit(&self, processed: usize, total: usize) {
        if self.enabled {
            self.hub.emit(ProgressEvent::new(self.stage, processed, total));
        }
    }

    pub fn aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        let event = ProgressEvent::new(ProgressStage::Upsert, 1, 3);
        assert_eq!(event.percent, 33);
        let event = ProgressEvent::new(ProgressStage::Upsert, 2, 3);
        assert_eq!(event.percent, 67);
        let event = ProgressEvent::new(ProgressStage::Upsert, 3, 3);
        assert_eq!(event.percent, 100);
    }

    #[test]
    fn test_emit_reaches_subscriber() {
        let hub = ProgressHub::new();
        let rx = hub.subscribe(8);

        hub.emit(ProgressEvent::new(ProgressStage::Import, 50, 100));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.percent, 50);
        assert_eq!(event.stage, ProgressStage::Import);
    }

    #[test]
    fn test_full_subscriber_is_pruned() {
        let hub = ProgressHub::new();
        let _rx = hub.subscribe(1);

        hub.emit(ProgressEvent::new(ProgressStage::Upsert, 1, 10));
        assert_eq!(hub.subscriber_count(), 1);

        // Second emit finds the buffer full and drops the subscriber.
        hub.emit(ProgressEvent::new(ProgressStage::Upsert, 2, 10));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let hub = ProgressHub::new();
        drop(hub.subscribe(8));

        hub.emit(ProgressEvent::new(ProgressStage::Upsert, 1, 10));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_disabled_control_emits_nothing() {
        let hub = ProgressHub::new();
        let rx = hub.subscribe(8);
        let abort = AtomicBool::new(false);

        let ctrl = ChunkControl::new(&hub, &abort, ProgressStage::Upsert, false);
        ctrl.emit(1, 10);
        assert!(rx.try_recv().is_err());
    }
}
