//! Fire-and-forget analytics.
//!
//! Sinks accept an event name and a JSON payload and return nothing. A sink
//! that cannot deliver an event logs the failure and drops it.
use chrono::Utc;
use serde::Serialize;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::feed::FeedDescriptor;
use crate::pager::DisplayReason;

/// Emitted whenever a feed becomes the visible page.
pub const FEED_DISPLAYED: &str = "home:feedDisplayed";

/// Payload of [`FEED_DISPLAYED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedDisplayed {
    pub index: usize,
    pub feed_type: String,
    pub feed_url: String,
    pub reason: DisplayReason,
}

impl FeedDisplayed {
    pub fn new(index: usize, feed: &FeedDescriptor, reason: DisplayReason) -> Self {
        Self {
            index,
            feed_type: feed.feed_type().to_string(),
            feed_url: feed.to_string(),
            reason,
        }
    }
}

pub trait AnalyticsSink: Send + Sync {
    fn log_event(&self, name: &str, payload: &serde_json::Value);
}

/// Serialize `payload` and hand it to `sink`.
pub fn log_event<T: Serialize>(sink: &dyn AnalyticsSink, name: &str, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => sink.log_event(name, &value),
        Err(e) => tracing::warn!(event = name, error = %e, "Failed to serialize analytics payload"),
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Writes each event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn log_event(&self, name: &str, payload: &serde_json::Value) {
        tracing::info!(target: "analytics", event = name, payload = %payload, "Analytics event");
    }
}

/// A recorded event.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub name: String,
    pub payload: serde_json::Value,
}

/// Keeps the most recent events in memory.
#[derive(Debug)]
pub struct MemorySink {
    capacity: usize,
    events: Mutex<VecDeque<RecordedEvent>>,
}

impl MemorySink {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Snapshot of the retained events, oldest first.
    pub fn events(&self) -> Vec<RecordedEvent> {
        match self.events.lock() {
            Ok(events) => events.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn last(&self) -> Option<RecordedEvent> {
        match self.events.lock() {
            Ok(events) => events.back().cloned(),
            Err(poisoned) => poisoned.into_inner().back().cloned(),
        }
    }

    pub fn len(&self) -> usize {
        match self.events.lock() {
            Ok(events) => events.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl AnalyticsSink for MemorySink {
    fn log_event(&self, name: &str, payload: &serde_json::Value) {
        let Ok(mut events) = self.events.lock() else {
            return;
        };
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(RecordedEvent {
            name: name.to_string(),
            payload: payload.clone(),
        });
    }
}

/// Appends one JSON object per line: `{"ts", "event", "payload"}`.
///
/// Lines are handed to a blocking writer task, so logging never waits on disk.
/// The task ends once the sink is dropped.
#[derive(Debug)]
pub struct JsonLinesSink {
    tx: mpsc::UnboundedSender<String>,
}

impl JsonLinesSink {
    /// Open `path` for appending and start the writer. Must be called from
    /// within a tokio runtime.
    pub fn open(path: &Path) -> std::io::Result<(Self, JoinHandle<()>)> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::task::spawn_blocking(move || write_lines(file, rx));
        Ok((Self { tx }, writer))
    }
}

fn write_lines(file: File, mut rx: mpsc::UnboundedReceiver<String>) {
    let mut out = BufWriter::new(file);
    while let Some(line) = rx.blocking_recv() {
        if let Err(e) = writeln!(out, "{}", line) {
            tracing::warn!(error = %e, "Dropped analytics event");
            continue;
        }
        if rx.is_empty() {
            if let Err(e) = out.flush() {
                tracing::warn!(error = %e, "Failed to flush analytics log");
            }
        }
    }
    if let Err(e) = out.flush() {
        tracing::warn!(error = %e, "Failed to flush analytics log");
    }
}

impl AnalyticsSink for JsonLinesSink {
    fn log_event(&self, name: &str, payload: &serde_json::Value) {
        let line = serde_json::json!({
            "ts": Utc::now().to_rfc3339(),
            "event": name,
            "payload": payload,
        });
        if self.tx.send(line.to_string()).is_err() {
            tracing::warn!(event = name, "Analytics writer stopped, dropping event");
        }
    }
}

/// Forwards every event to each inner sink.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn AnalyticsSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl AnalyticsSink for FanoutSink {
    fn log_event(&self, name: &str, payload: &serde_json::Value) {
        for sink in &self.sinks {
            sink.log_event(name, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_feed_displayed_payload_shape() {
        let feed = FeedDescriptor::List("at://x/app.bsky.graph.list/1".into());
        let payload = FeedDisplayed::new(2, &feed, DisplayReason::Swipe);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "index": 2,
                "feedType": "list",
                "feedUrl": "list|at://x/app.bsky.graph.list/1",
                "reason": "swipe",
            })
        );
    }

    #[test]
    fn test_memory_sink_bounded() {
        let sink = MemorySink::new(2);
        for i in 0..3 {
            sink.log_event("e", &serde_json::json!(i));
        }
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].payload, serde_json::json!(1));
        assert_eq!(sink.last().unwrap().payload, serde_json::json!(2));
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let a = Arc::new(MemorySink::default());
        let b = Arc::new(MemorySink::default());
        let fanout = FanoutSink::new().with(a.clone()).with(b.clone());

        log_event(&fanout, FEED_DISPLAYED, &serde_json::json!({"index": 0}));
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(a.last().unwrap().name, FEED_DISPLAYED);
    }

    #[tokio::test]
    async fn test_json_lines_sink_appends() {
        let dir = std::env::temp_dir().join("feedpager_analytics_test_jsonl");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("events.jsonl");
        std::fs::remove_file(&path).ok();

        let (sink, writer) = JsonLinesSink::open(&path).unwrap();
        sink.log_event(FEED_DISPLAYED, &serde_json::json!({"index": 1}));
        sink.log_event(FEED_DISPLAYED, &serde_json::json!({"index": 2}));
        drop(sink);
        writer.await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["event"], FEED_DISPLAYED);
        assert_eq!(lines[1]["payload"]["index"], 2);
        assert!(lines[0]["ts"].as_str().is_some());

        std::fs::remove_dir_all(&dir).ok();
    }
}
