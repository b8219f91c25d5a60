//! Event-to-record rendering
//!
//! Maps classified stream events onto displayable records and collaborator
//! row updates. Shared by the live monitor and the offline `replay` command
//! so both surfaces describe events identically.

use serde_json::{json, Value};

use crate::event::{AlertPriority, ParseFailure, StreamEvent};
use crate::feed::{DisplayRecord, Severity};

/// Builds the display record for a classified event.
pub fn record_for(event: &StreamEvent) -> DisplayRecord {
    match event {
        StreamEvent::Progress(p) => {
            let message = match &p.message {
                Some(m) => format!("{} [{}/{} ({}%)]", m, p.processed, p.total, p.percentage),
                None => format!(
                    "Analyzed {}/{} wallets ({}%)",
                    p.processed, p.total, p.percentage
                ),
            };
            let mut record = DisplayRecord::new(Severity::Info, message);
            if p.wallet_address.is_some() || p.purchases_found.is_some() {
                record = record.with_detail(json!({
                    "wallet_address": p.wallet_address,
                    "purchases_found": p.purchases_found,
                }));
            }
            if let Some(address) = &p.wallet_address {
                record = record.with_correlation(address.clone());
            }
            record
        }
        StreamEvent::Results(r) => DisplayRecord::new(
            Severity::Success,
            format!(
                "{} {} analysis finished with {} top tokens",
                r.data.network,
                r.data.analysis_type,
                r.data.top_tokens.len()
            ),
        )
        .with_detail(serde_json::to_value(&r.data).unwrap_or(Value::Null)),
        StreamEvent::Complete => DisplayRecord::new(Severity::Success, "Analysis complete"),
        StreamEvent::Error(e) => {
            DisplayRecord::new(Severity::Error, format!("Analysis failed: {}", e.error))
        }
        StreamEvent::Transaction(t) => DisplayRecord::new(
            Severity::Info,
            format!(
                "New {} transaction for {}: {} ETH",
                t.transaction.kind,
                short_address(&t.wallet),
                t.transaction.value
            ),
        )
        .with_detail(serde_json::to_value(&t.transaction).unwrap_or(Value::Null))
        .with_correlation(t.wallet.clone()),
        StreamEvent::Alert(a) => {
            let severity = match a.alert.priority {
                AlertPriority::High => Severity::Warning,
                AlertPriority::Medium | AlertPriority::Low => Severity::Info,
            };
            let message = match &a.alert.title {
                Some(title) => format!("{}: {}", title, a.alert.message),
                None => a.alert.message.clone(),
            };
            let mut record = DisplayRecord::new(severity, message).with_detail(json!({
                "priority": a.alert.priority,
                "wallet": a.alert.wallet,
                "details": a.alert.details,
            }));
            if let Some(wallet) = &a.alert.wallet {
                record = record.with_correlation(wallet.clone());
            }
            record
        }
        StreamEvent::WalletUpdate(w) => DisplayRecord::new(
            Severity::Info,
            format!(
                "Wallet {} balance: {} ETH",
                short_address(&w.wallet.address),
                w.wallet.balance
            ),
        )
        .with_detail(json!({
            "balance": w.wallet.balance,
            "alert_count": w.alert_count,
        }))
        .with_correlation(w.wallet.address.clone()),
        StreamEvent::System(s) => DisplayRecord::new(Severity::Info, s.message.clone()),
        StreamEvent::Unknown { kind, payload } => {
            DisplayRecord::new(Severity::Debug, format!("Unhandled event type '{}'", kind))
                .with_detail(payload.clone())
        }
    }
}

/// Builds the debug record describing a frame that failed classification.
pub fn parse_failure_record(failure: &ParseFailure) -> DisplayRecord {
    DisplayRecord::new(
        Severity::Debug,
        format!("Unparseable stream frame: {}", failure.reason),
    )
    .with_detail(json!({ "raw": failure.raw }))
}

/// Extracts the collaborator row update carried by an event, if any.
///
/// Only `transaction` and `wallet_update` events address existing UI rows;
/// the correlation id is the wallet address.
pub fn row_update_for(event: &StreamEvent) -> Option<(String, Value)> {
    match event {
        StreamEvent::Transaction(t) => Some((
            t.wallet.clone(),
            json!({
                "transaction": serde_json::to_value(&t.transaction).unwrap_or(Value::Null),
            }),
        )),
        StreamEvent::WalletUpdate(w) => Some((
            w.wallet.address.clone(),
            json!({
                "balance": w.wallet.balance,
                "alert_count": w.alert_count,
            }),
        )),
        _ => None,
    }
}

/// Shortens a hex address for display: 0x1234abcd -> 0x1234..abcd.
fn short_address(address: &str) -> String {
    if address.len() > 12 && address.is_ascii() {
        format!("{}..{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}
