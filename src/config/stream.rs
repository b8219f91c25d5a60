//! Stream endpoint configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Target blockchain network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    #[default]
    Base,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Ethereum => f.write_str("ethereum"),
            Network::Base => f.write_str("base"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ethereum" => Ok(Network::Ethereum),
            "base" => Ok(Network::Base),
            _ => Err(format!("unsupported network: {}", s)),
        }
    }
}

/// Analysis direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => f.write_str("buy"),
            Direction::Sell => f.write_str("sell"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Direction::Buy),
            "sell" => Ok(Direction::Sell),
            _ => Err(format!("unsupported direction: {}", s)),
        }
    }
}

/// Stream endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Base URL of the wallet analysis API.
    pub base_url: String,
    pub network: Network,
    pub direction: Direction,
    /// Number of tracked wallets the analysis should cover.
    pub wallets: u32,
    /// Time window for the analysis, in days.
    pub days_back: f64,
    pub connect_timeout_seconds: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            network: Network::Base,
            direction: Direction::Buy,
            wallets: 50,
            days_back: 1.0,
            connect_timeout_seconds: 10,
        }
    }
}

impl StreamConfig {
    /// Full URL of the analysis stream subscription.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/api/{}/{}/stream?wallets={}&days_back={}",
            self.base_url.trim_end_matches('/'),
            self.network,
            self.direction,
            self.wallets,
            self.days_back
        )
    }

    /// URL of the API status endpoint.
    pub fn status_url(&self) -> String {
        format!("{}/api/status", self.base_url.trim_end_matches('/'))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}
