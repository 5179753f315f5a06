//! Destinations for human-readable progress lines
//!
//! The crawl engine reports progress through a single capability, "accept a
//! log line". Implementations must never block the caller.

use std::fmt;
use tokio::sync::mpsc;

/// Receives progress lines emitted during a crawl
pub trait LogSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Forwards lines to `tracing` at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, line: &str) {
        tracing::info!(target: "sumi_harvest::progress", "{}", line);
    }
}

/// Calls a closure for every line
pub struct CallbackSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> LogSink for CallbackSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn emit(&self, line: &str) {
        (self.callback)(line);
    }
}

impl<F> fmt::Debug for CallbackSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSink").finish_non_exhaustive()
    }
}

/// Sends lines over a bounded channel
///
/// When the receiver lags behind and the buffer is full, or the receiver is
/// gone, lines are dropped rather than stalling a worker.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<String>,
}

impl ChannelSink {
    /// Creates a sink and the receiving half of its channel
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl LogSink for ChannelSink {
    fn emit(&self, line: &str) {
        if let Err(e) = self.sender.try_send(line.to_string()) {
            tracing::trace!("Dropped progress line: {}", e);
        }
    }
}
