//! Bounded log of bridge exchanges, kept for diagnostics.

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Direction of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    Send,
    Receive,
}

/// One request or reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub msg_type: MessageType,
    /// Operation name, e.g. `register` or `setState`
    pub operation: String,
    pub message: Value,
    /// Seconds since the history was created
    pub timestamp: f64,
}

/// Exchanges with the bridge and the discovery service, oldest first.
///
/// Entries name the operation rather than the URL: authenticated paths
/// contain the access token, and the history is meant to be shown.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
    last_error: Option<String>,
    start_time: Instant,
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::with_max_entries(Self::DEFAULT_MAX_ENTRIES)
    }
}

impl MessageHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
            last_error: None,
            start_time: Instant::now(),
        }
    }

    pub fn record(&mut self, msg_type: MessageType, operation: &str, message: &Value) {
        if self.max_entries == 0 {
            return;
        }
        while self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            msg_type,
            operation: operation.to_string(),
            message: message.clone(),
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });
    }

    pub fn record_error(&mut self, error: &str) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_error = None;
    }

    pub fn summary(&self) -> HistorySummary {
        let mut summary = HistorySummary {
            total_entries: self.entries.len(),
            last_error: self.last_error.clone(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.msg_type {
                MessageType::Send => {
                    summary.send_count += 1;
                    *summary.requests.entry(entry.operation.clone()).or_default() += 1;
                }
                MessageType::Receive => summary.receive_count += 1,
            }
        }
        summary
    }
}

/// Counts over the retained history, for diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistorySummary {
    pub send_count: usize,
    pub receive_count: usize,
    pub total_entries: usize,
    /// Requests sent per operation
    pub requests: BTreeMap<String, usize>,
    pub last_error: Option<String>,
}
