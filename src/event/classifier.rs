//! Frame classification
//!
//! Turns one raw stream frame into a typed [`StreamEvent`], or a
//! [`ParseFailure`] the caller can log without tearing the stream down.

use serde_json::Value;
use thiserror::Error;

use super::{
    AlertPayload, ErrorPayload, ProgressPayload, ResultsPayload, StreamEvent, SystemPayload,
    TransactionPayload, WalletUpdatePayload,
};

/// A frame that could not be decoded into any event variant.
///
/// Carries the original text so diagnostics never lose the payload. Parse
/// failures are local to the offending frame; the stream stays open.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unparseable stream frame: {reason}")]
pub struct ParseFailure {
    pub raw: String,
    pub reason: String,
}

impl ParseFailure {
    fn new(raw: &str, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

/// Classifies a raw frame into a tagged event.
///
/// Recognized discriminants with malformed payloads and frames without a
/// `type` field are parse failures. Unrecognized discriminants are preserved
/// as [`StreamEvent::Unknown`], not dropped.
pub fn classify(raw: &str) -> Result<StreamEvent, ParseFailure> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ParseFailure::new(raw, e.to_string()))?;

    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        return Err(ParseFailure::new(raw, "missing 'type' discriminant"));
    };

    match kind {
        "progress" => decode::<ProgressPayload>(raw, &value).map(StreamEvent::Progress),
        "results" => decode::<ResultsPayload>(raw, &value).map(StreamEvent::Results),
        "complete" => Ok(StreamEvent::Complete),
        "error" => decode::<ErrorPayload>(raw, &value).map(StreamEvent::Error),
        "transaction" => decode::<TransactionPayload>(raw, &value).map(StreamEvent::Transaction),
        "alert" => decode::<AlertPayload>(raw, &value).map(StreamEvent::Alert),
        "wallet_update" => decode::<WalletUpdatePayload>(raw, &value).map(StreamEvent::WalletUpdate),
        "system" => decode::<SystemPayload>(raw, &value).map(StreamEvent::System),
        other => Ok(StreamEvent::Unknown {
            kind: other.to_string(),
            payload: value,
        }),
    }
}

fn decode<T: serde::de::DeserializeOwned>(raw: &str, value: &Value) -> Result<T, ParseFailure> {
    serde_json::from_value(value.clone()).map_err(|e| ParseFailure::new(raw, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AlertPriority;

    #[test]
    fn test_classify_progress() {
        let event =
            classify(r#"{"type":"progress","processed":3,"total":10,"percentage":30}"#).unwrap();
        match event {
            StreamEvent::Progress(p) => {
                assert_eq!(p.processed, 3);
                assert_eq!(p.total, 10);
                assert_eq!(p.percentage, 30);
                assert!(p.message.is_none());
            }
            other => panic!("expected progress, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_progress_with_optional_fields() {
        let event = classify(
            r#"{"type":"progress","processed":7,"total":50,"percentage":14,
                "message":"Analyzing wallet","wallet_address":"0xabc","purchases_found":2}"#,
        )
        .unwrap();
        match event {
            StreamEvent::Progress(p) => {
                assert_eq!(p.wallet_address.as_deref(), Some("0xabc"));
                assert_eq!(p.purchases_found, Some(2));
            }
            other => panic!("expected progress, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_progress_missing_required_field_fails() {
        let err = classify(r#"{"type":"progress","processed":3}"#).unwrap_err();
        assert!(err.reason.contains("total"), "reason: {}", err.reason);
        assert!(err.raw.contains("progress"));
    }

    #[test]
    fn test_classify_results() {
        let event = classify(
            r#"{"type":"results","data":{"status":"success","network":"base",
                "analysis_type":"buy","top_tokens":[{"symbol":"WETH"}]}}"#,
        )
        .unwrap();
        match event {
            StreamEvent::Results(r) => {
                assert_eq!(r.data.network, "base");
                assert_eq!(r.data.top_tokens.len(), 1);
            }
            other => panic!("expected results, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_complete_and_error() {
        assert_eq!(classify(r#"{"type":"complete"}"#).unwrap(), StreamEvent::Complete);

        let event = classify(r#"{"type":"error","error":"Analysis failed: timeout"}"#).unwrap();
        match event {
            StreamEvent::Error(e) => assert!(e.error.contains("timeout")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_transaction() {
        let event = classify(
            r#"{"type":"transaction","wallet":"0xfeed",
                "transaction":{"value":1.25,"type":"buy","hash":"0xdead"}}"#,
        )
        .unwrap();
        match event {
            StreamEvent::Transaction(t) => {
                assert_eq!(t.wallet, "0xfeed");
                assert_eq!(t.transaction.kind, "buy");
                assert_eq!(t.transaction.hash, "0xdead");
            }
            other => panic!("expected transaction, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_alert() {
        let event = classify(
            r#"{"type":"alert","alert":{"priority":"high","message":"Large buy detected"}}"#,
        )
        .unwrap();
        match event {
            StreamEvent::Alert(a) => {
                assert_eq!(a.alert.priority, AlertPriority::High);
                assert_eq!(a.alert.message, "Large buy detected");
                assert!(a.alert.title.is_none());
            }
            other => panic!("expected alert, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_wallet_update() {
        let event = classify(
            r#"{"type":"wallet_update","wallet":{"address":"0xcafe","balance":4.2},"alert_count":3}"#,
        )
        .unwrap();
        match event {
            StreamEvent::WalletUpdate(w) => {
                assert_eq!(w.wallet.address, "0xcafe");
                assert_eq!(w.alert_count, Some(3));
            }
            other => panic!("expected wallet_update, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_system() {
        let event = classify(r#"{"type":"system","message":"Monitoring 12 wallets"}"#).unwrap();
        match event {
            StreamEvent::System(s) => assert_eq!(s.message, "Monitoring 12 wallets"),
            other => panic!("expected system, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_preserves_payload() {
        let raw = r#"{"type":"heartbeat","uptime":120}"#;
        let event = classify(raw).unwrap();
        match event {
            StreamEvent::Unknown { kind, payload } => {
                assert_eq!(kind, "heartbeat");
                assert_eq!(payload["uptime"], 120);
            }
            other => panic!("expected unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_not_json_is_parse_failure() {
        let err = classify("not json").unwrap_err();
        assert_eq!(err.raw, "not json");
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn test_json_without_type_is_parse_failure() {
        let err = classify(r#"{"message":"no discriminant"}"#).unwrap_err();
        assert!(err.reason.contains("type"));
    }

    #[test]
    fn test_non_object_json_is_parse_failure() {
        assert!(classify("42").is_err());
        assert!(classify("\"progress\"").is_err());
    }
}
