//! Status command implementation
//!
//! Probes the analysis API's status endpoint and renders the result.

use anyhow::Context;
use colored::Colorize;
use serde::Deserialize;

use crate::cli::StatusArgs;
use crate::config::WatchConfig;

/// Subset of the API status payload the CLI renders; unknown fields are
/// ignored so the command keeps working across server versions.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct ApiStatus {
    pub status: String,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub config: Option<ApiStatusConfig>,
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct ApiStatusConfig {
    #[serde(default)]
    pub supported_networks: Vec<String>,
    #[serde(default)]
    pub max_wallets: Option<u32>,
}

/// Handle `walletwatch status`
pub async fn run_status(args: &StatusArgs) -> anyhow::Result<()> {
    let mut config = if args.config.exists() {
        WatchConfig::load(Some(&args.config))?
    } else {
        WatchConfig::default()
    };
    config = config.with_env_overrides();
    if let Some(ref base_url) = args.base_url {
        config.stream.base_url = base_url.clone();
    }

    let url = config.stream.status_url();
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .context("failed to build HTTP client")?;

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("{} returned HTTP {}", url, response.status().as_u16());
    }

    let status: ApiStatus = response
        .json()
        .await
        .context("failed to decode status payload")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", format_status_pretty(&status));
    }
    Ok(())
}

fn format_status_pretty(status: &ApiStatus) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    let status_display = if status.status == "online" {
        status.status.green()
    } else {
        status.status.yellow()
    };
    writeln!(output, "Status: {}", status_display).unwrap();
    if let Some(version) = &status.version {
        writeln!(output, "Version: {}", version).unwrap();
    }
    if let Some(environment) = &status.environment {
        writeln!(output, "Environment: {}", environment).unwrap();
    }
    if let Some(timestamp) = &status.timestamp {
        writeln!(output, "Reported at: {}", timestamp).unwrap();
    }
    if let Some(config) = &status.config {
        if !config.supported_networks.is_empty() {
            writeln!(
                output,
                "Networks: {}",
                config.supported_networks.join(", ")
            )
            .unwrap();
        }
        if let Some(max_wallets) = config.max_wallets {
            writeln!(output, "Max wallets: {}", max_wallets).unwrap();
        }
    }
    output
}
