//! Replay command implementation
//!
//! Classifies recorded stream frames offline and prints the records the
//! monitor would have produced, using the same renderer as the live watch.
//! Useful for debugging a capture of a misbehaving stream.

use std::io::Read;

use anyhow::Context;

use crate::cli::output::format_record_line;
use crate::cli::ReplayArgs;
use crate::event::classify;
use crate::monitor::records;

/// Handle `walletwatch replay`
pub fn run_replay(args: &ReplayArgs) -> anyhow::Result<()> {
    let input = if args.input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?
    };

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // Captures may still carry the SSE field prefix; strip it.
        let frame = line.strip_prefix("data:").map(str::trim_start).unwrap_or(line);

        let record = match classify(frame) {
            Ok(event) => records::record_for(&event),
            Err(failure) => records::parse_failure_record(&failure),
        };

        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", format_record_line(&record));
        }
    }
    Ok(())
}
