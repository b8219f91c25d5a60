//! Watch command implementation
//!
//! Wires a [`StreamMonitor`] to the terminal: records are printed as they
//! arrive, row updates maintain a live wallet table, and the run ends when
//! the analysis completes, the retry budget is exhausted, or Ctrl-C fires.

use std::sync::Arc;

use anyhow::Context;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use crate::cli::output::{self, WalletRowView};
use crate::cli::WatchArgs;
use crate::config::WatchConfig;
use crate::logging::init_tracing;
use crate::monitor::{ConnectionState, MonitorCallbacks, StreamMonitor};
use crate::stream::SseTransport;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(args: &WatchArgs) -> anyhow::Result<WatchConfig> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        WatchConfig::load(Some(&args.config))?
    } else {
        WatchConfig::default()
    };

    // Apply environment variable overrides
    config = config.with_env_overrides();

    // Apply CLI overrides (highest priority)
    if let Some(ref network) = args.network {
        config.stream.network = network
            .parse()
            .map_err(|e: String| anyhow::anyhow!("invalid --network: {}", e))?;
    }
    if let Some(ref direction) = args.direction {
        config.stream.direction = direction
            .parse()
            .map_err(|e: String| anyhow::anyhow!("invalid --direction: {}", e))?;
    }
    if let Some(wallets) = args.wallets {
        config.stream.wallets = wallets;
    }
    if let Some(days_back) = args.days_back {
        config.stream.days_back = days_back;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if let Some(ref log_format) = args.log_format {
        config.logging.format = log_format
            .parse()
            .map_err(|e: String| anyhow::anyhow!("invalid --log-format: {}", e))?;
    }

    Ok(config)
}

/// Handle `walletwatch watch`
pub async fn run_watch(args: &WatchArgs) -> anyhow::Result<()> {
    let config = load_config_with_overrides(args)?;
    config.validate()?;
    init_tracing(&config.logging)?;

    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| config.stream.endpoint_url());

    if !args.no_preflight {
        preflight(&config).await;
    }

    let rows: Arc<DashMap<String, WalletRowView>> = Arc::new(DashMap::new());
    let row_sink = Arc::clone(&rows);

    let callbacks = MonitorCallbacks {
        on_activity: Some(Box::new(|snapshot| {
            if let Some(newest) = snapshot.first() {
                println!("{}", output::format_record_line(newest));
            }
        })),
        on_alert: None,
        on_row_update: Some(Box::new(move |address, fields| {
            row_sink
                .entry(address.to_string())
                .or_insert_with(|| WalletRowView {
                    address: address.to_string(),
                    ..Default::default()
                })
                .apply_fields(fields);
        })),
    };

    let transport = Arc::new(
        SseTransport::new(config.stream.connect_timeout())
            .context("failed to build stream transport")?,
    );
    let cancel = CancellationToken::new();
    let handle = StreamMonitor::spawn(
        transport,
        config.reconnect.clone(),
        config.feeds.clone(),
        callbacks,
        cancel.clone(),
    );

    handle.start(&endpoint);
    let mut state_watch = handle.state_watch();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                handle.stop();
                break;
            }
            changed = state_watch.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *state_watch.borrow_and_update();
                if matches!(state, ConnectionState::Idle | ConnectionState::Failed) {
                    break;
                }
            }
        }
    }

    print_session_summary(&handle, &rows);
    cancel.cancel();
    Ok(())
}

/// Best-effort probe of the API before subscribing; failures only warn.
async fn preflight(config: &WatchConfig) {
    let url = config.stream.status_url();
    let client = match reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(3))
        .build()
    {
        Ok(client) => client,
        Err(_) => return,
    };
    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::debug!(url = %url, "API status preflight ok");
        }
        Ok(response) => {
            tracing::warn!(
                url = %url,
                status = response.status().as_u16(),
                "API status preflight returned an error status"
            );
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "API unreachable; subscribing anyway");
        }
    }
}

fn print_session_summary(
    handle: &crate::monitor::MonitorHandle,
    rows: &DashMap<String, WalletRowView>,
) {
    if !rows.is_empty() {
        let mut views: Vec<WalletRowView> = rows.iter().map(|r| r.value().clone()).collect();
        views.sort_by(|a, b| a.address.cmp(&b.address));
        println!("\nTracked wallets:");
        println!("{}", output::format_wallet_table(&views));
    }

    let alerts = handle.alert_snapshot();
    if !alerts.is_empty() {
        println!("\nAlerts ({}):", alerts.len());
        println!("{}", output::format_alert_table(&alerts));
    }
}
