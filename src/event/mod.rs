//! Stream event types
//!
//! Typed representations of the frames produced by the wallet analysis
//! backend. Each frame is a JSON object with a `type` discriminant; the
//! variants here mirror the wire taxonomy, with an explicit `Unknown`
//! fallback that preserves the payload instead of dropping it.

pub mod classifier;

pub use classifier::{classify, ParseFailure};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A classified stream event, in arrival order, immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Incremental status of a running analysis.
    Progress(ProgressPayload),
    /// Terminal payload containing the full analysis result.
    Results(ResultsPayload),
    /// Explicit success terminator.
    Complete,
    /// Explicit failure terminator reported by the server.
    Error(ErrorPayload),
    /// A new on-chain event for a monitored wallet.
    Transaction(TransactionPayload),
    /// An actionable notification.
    Alert(AlertPayload),
    /// A periodic balance/state refresh.
    WalletUpdate(WalletUpdatePayload),
    /// Informational, system-level notice.
    System(SystemPayload),
    /// Unrecognized discriminant; payload preserved verbatim for diagnostics.
    Unknown { kind: String, payload: Value },
}

impl StreamEvent {
    /// Wire name of the event kind, for logging.
    pub fn kind(&self) -> &str {
        match self {
            StreamEvent::Progress(_) => "progress",
            StreamEvent::Results(_) => "results",
            StreamEvent::Complete => "complete",
            StreamEvent::Error(_) => "error",
            StreamEvent::Transaction(_) => "transaction",
            StreamEvent::Alert(_) => "alert",
            StreamEvent::WalletUpdate(_) => "wallet_update",
            StreamEvent::System(_) => "system",
            StreamEvent::Unknown { kind, .. } => kind,
        }
    }

    /// True for events that logically end the current analysis run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Complete | StreamEvent::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayload {
    pub processed: u64,
    pub total: u64,
    pub percentage: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchases_found: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsPayload {
    pub data: AnalysisResults,
}

/// The full analysis result carried by a `results` frame.
///
/// Only the fields the monitor renders are typed; the remaining totals vary
/// by analysis kind and are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub status: String,
    pub network: String,
    pub analysis_type: String,
    #[serde(default)]
    pub top_tokens: Vec<TokenSummary>,
    #[serde(flatten)]
    pub totals: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_eth_spent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub wallet: String,
    pub transaction: TransactionInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub alert: AlertInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertInfo {
    pub priority: AlertPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletUpdatePayload {
    pub wallet: WalletState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletState {
    pub address: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemPayload {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names() {
        assert_eq!(StreamEvent::Complete.kind(), "complete");
        assert_eq!(
            StreamEvent::Unknown {
                kind: "heartbeat".to_string(),
                payload: Value::Null,
            }
            .kind(),
            "heartbeat"
        );
    }

    #[test]
    fn test_terminal_events() {
        assert!(StreamEvent::Complete.is_terminal());
        assert!(StreamEvent::Error(ErrorPayload {
            error: "boom".to_string(),
        })
        .is_terminal());
        assert!(!StreamEvent::System(SystemPayload {
            message: "hi".to_string(),
        })
        .is_terminal());
    }

    #[test]
    fn test_alert_priority_deserializes_lowercase() {
        let p: AlertPriority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(p, AlertPriority::High);
        assert!(serde_json::from_str::<AlertPriority>("\"critical\"").is_err());
    }

    #[test]
    fn test_analysis_results_keeps_extra_totals() {
        let json = serde_json::json!({
            "status": "success",
            "network": "base",
            "analysis_type": "buy",
            "total_wallets": 50,
            "top_tokens": [{"symbol": "PEPE", "wallet_count": 4}],
        });
        let results: AnalysisResults = serde_json::from_value(json).unwrap();
        assert_eq!(results.top_tokens.len(), 1);
        assert_eq!(results.top_tokens[0].symbol.as_deref(), Some("PEPE"));
        assert_eq!(results.totals["total_wallets"], 50);
    }
}
