//! Display feed capacities

use serde::{Deserialize, Serialize};

/// Capacities for the two bounded feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Activity feed: all classified events.
    pub activity_capacity: usize,
    /// Alert sidebar: alert events only.
    pub alert_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            activity_capacity: 100,
            alert_capacity: 50,
        }
    }
}
