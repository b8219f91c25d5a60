//! Bounded display feed implementation
//!
//! Maintains a capacity-limited, newest-first buffer of display records for
//! the activity feed and the alert sidebar. Overflow is trimmed in batches so
//! a saturated feed does not pay an eviction per insert.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a display record, used by renderers for coloring/filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
    Debug,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Debug => "debug",
        };
        f.write_str(s)
    }
}

/// One displayable entry in a feed.
///
/// Records are created by the monitor, never mutated afterwards, and die only
/// by eviction from a [`BoundedFeed`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    /// Free-form structured fields attached to the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    /// External key (wallet address, transaction hash) used to route the
    /// record to an existing row outside the core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl DisplayRecord {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp: Utc::now(),
            detail: None,
            correlation_id: None,
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_correlation(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }
}

/// Fraction of capacity kept when an overflowing feed is trimmed.
const TRIM_NUMERATOR: usize = 4;
const TRIM_DENOMINATOR: usize = 5;

/// Ordered, capacity-limited record store with insert-at-front semantics.
///
/// The newest record is always at index 0. When an insert would exceed the
/// capacity, the oldest records are evicted in one batch down to 80% of
/// capacity. Interior locking keeps `snapshot` available from any thread
/// while the monitor remains the only writer.
pub struct BoundedFeed {
    records: RwLock<VecDeque<DisplayRecord>>,
    capacity: usize,
}

impl BoundedFeed {
    /// Creates an empty feed holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Prepends a record, batch-evicting the oldest entries on overflow.
    ///
    /// The just-pushed record is never part of the evicted batch.
    pub fn push(&self, record: DisplayRecord) {
        let mut records = self.records.write().unwrap();
        records.push_front(record);
        if records.len() > self.capacity {
            let keep = std::cmp::max(1, self.capacity * TRIM_NUMERATOR / TRIM_DENOMINATOR);
            records.truncate(keep);
        }
    }

    /// Empties the feed, independent of any connection state.
    pub fn clear(&self) {
        self.records.write().unwrap().clear();
    }

    /// Returns all records, newest first.
    pub fn snapshot(&self) -> Vec<DisplayRecord> {
        self.records.read().unwrap().iter().cloned().collect()
    }

    /// Returns the number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Returns true if the feed is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
