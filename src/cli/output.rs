//! Output formatting helpers for CLI commands

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::feed::{DisplayRecord, Severity};

/// View model for a live wallet row, maintained from row-update callbacks.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct WalletRowView {
    pub address: String,
    pub balance: Option<f64>,
    pub alert_count: Option<u64>,
    pub last_transaction: Option<String>,
}

impl WalletRowView {
    /// Merge the fields of one row update into the view.
    pub fn apply_fields(&mut self, fields: &serde_json::Value) {
        if let Some(balance) = fields.get("balance").and_then(|v| v.as_f64()) {
            self.balance = Some(balance);
        }
        if let Some(count) = fields.get("alert_count").and_then(|v| v.as_u64()) {
            self.alert_count = Some(count);
        }
        if let Some(tx) = fields.get("transaction") {
            let kind = tx.get("type").and_then(|v| v.as_str()).unwrap_or("?");
            let value = tx.get("value").and_then(|v| v.as_f64()).unwrap_or(0.0);
            self.last_transaction = Some(format!("{} {} ETH", kind, value));
        }
    }
}

/// Format one display record as a colored terminal line.
pub fn format_record_line(record: &DisplayRecord) -> String {
    let timestamp = record
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S");
    let message = match record.severity {
        Severity::Info => record.message.normal(),
        Severity::Success => record.message.green(),
        Severity::Warning => record.message.yellow(),
        Severity::Error => record.message.red(),
        Severity::Debug => record.message.dimmed(),
    };
    format!("[{}] {}", timestamp.to_string().dimmed(), message)
}

/// Format wallet rows as a table
pub fn format_wallet_table(rows: &[WalletRowView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Wallet", "Balance (ETH)", "Alerts", "Last transaction"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.address),
            Cell::new(
                row.balance
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(
                row.alert_count
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(row.last_transaction.as_deref().unwrap_or("-")),
        ]);
    }

    table.to_string()
}

/// Format the alert feed snapshot as a table
pub fn format_alert_table(records: &[DisplayRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Severity", "Alert"]);

    for record in records {
        table.add_row(vec![
            Cell::new(
                record
                    .timestamp
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S"),
            ),
            Cell::new(record.severity),
            Cell::new(&record.message),
        ]);
    }

    table.to_string()
}
