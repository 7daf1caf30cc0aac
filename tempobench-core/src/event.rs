//! Progress and Completion Notifications
//!
//! The harness emits one `progress` notification per measurement trial and
//! one `complete` notification per successful run, synchronously and in
//! order. Consumers attach either an [`Observer`] implementation or drain a
//! channel of [`HarnessEvent`]s; there is no global event bus.

use std::sync::mpsc;

use crate::result::BenchmarkResult;

/// Payload of a per-trial progress notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Benchmark name being run
    pub name: String,
    /// Trial that just finished, 1-based
    pub trial: usize,
    /// Total measurement trials in this run
    pub total_trials: usize,
    /// The finished trial's time in milliseconds
    pub trial_time_ms: f64,
}

/// Notification stream item for channel-based consumers.
#[derive(Debug, Clone)]
pub enum HarnessEvent {
    /// A measurement trial finished
    Progress(ProgressUpdate),
    /// A run finished and its result was stored
    Complete(BenchmarkResult),
}

/// Receiver of run notifications.
///
/// Callbacks run synchronously on the harness's thread of control, between
/// trials; they must not re-enter the harness.
pub trait Observer: Send {
    /// Called once per measurement trial, before the next trial starts.
    fn on_progress(&mut self, update: &ProgressUpdate) {
        let _ = update;
    }

    /// Called exactly once at the end of a successful run, after the result
    /// is stored.
    fn on_complete(&mut self, result: &BenchmarkResult) {
        let _ = result;
    }
}

/// Observer that discards every notification (the default).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {}

/// Observer that forwards notifications over an unbounded channel.
///
/// Sends never block, so emission cannot delay the next trial; events for a
/// dropped receiver are silently discarded.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: mpsc::Sender<HarnessEvent>,
}

impl ChannelObserver {
    /// Create an observer together with the receiver to drain.
    pub fn channel() -> (Self, mpsc::Receiver<HarnessEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl Observer for ChannelObserver {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        let _ = self.tx.send(HarnessEvent::Progress(update.clone()));
    }

    fn on_complete(&mut self, result: &BenchmarkResult) {
        let _ = self.tx.send(HarnessEvent::Complete(result.clone()));
    }
}
