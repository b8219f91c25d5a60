//! Reconnection policy
//!
//! Pure retry decisions: whether another attempt is allowed and how long to
//! wait before it. Scheduling the delay and reopening the connection are the
//! monitor's job; nothing here has side effects.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reconnection settings, a `[reconnect]` section in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Consecutive transport failures tolerated before giving up.
    pub max_attempts: u32,
    /// First retry delay; attempt N waits N times this.
    pub base_delay_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 2000,
        }
    }
}

impl ReconnectConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// Per-session failure counter.
///
/// Reset whenever a connection reaches Open and on every fresh `start()`;
/// incremented once per transport failure, before the retry decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconnectState {
    attempt: u32,
}

impl ReconnectState {
    /// Records one more failure and returns the new attempt number.
    pub fn record_failure(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

/// True while another reconnection attempt is within the budget.
pub fn should_retry(attempt: u32, max_attempts: u32) -> bool {
    attempt < max_attempts
}

/// Linear backoff: attempt N waits N * `base_delay`, counted from 1.
pub fn delay_for(attempt: u32, base_delay: Duration) -> Duration {
    base_delay.saturating_mul(attempt.max(1))
}
