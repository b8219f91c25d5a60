//! End-to-end monitor tests over scripted transports.
//!
//! These exercise the full spawned pipeline: reader task, signal channel,
//! classification, feeds, and the reconnect loop with real (short) timers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use walletwatch::config::FeedConfig;
use walletwatch::monitor::{ConnectionState, MonitorCallbacks, MonitorHandle, StreamMonitor};
use walletwatch::stream::{FrameStream, ReconnectConfig, StreamError, StreamTransport};

/// Replays one scripted frame list per connect; later connects see later
/// scripts, and an exhausted script list refuses the connection.
struct ScriptedTransport {
    connects: Mutex<VecDeque<Result<Vec<String>, StreamError>>>,
}

impl ScriptedTransport {
    fn new(connects: Vec<Result<Vec<String>, StreamError>>) -> Self {
        Self {
            connects: Mutex::new(connects.into()),
        }
    }
}

#[async_trait]
impl StreamTransport for ScriptedTransport {
    async fn connect(&self, _url: &str) -> Result<FrameStream, StreamError> {
        let script = self
            .connects
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(StreamError::Network("script exhausted".to_string())));
        let frames = script?;
        let items: Vec<Result<String, StreamError>> = frames.into_iter().map(Ok).collect();
        // The script ends without a disconnect so the reader parks until the
        // monitor tears it down; terminator events close the run first.
        Ok(Box::pin(
            futures::stream::iter(items).chain(futures::stream::pending()),
        ))
    }
}

fn spawn_monitor(
    transport: Arc<dyn StreamTransport>,
    reconnect: ReconnectConfig,
) -> (MonitorHandle, CancellationToken) {
    let cancel = CancellationToken::new();
    let handle = StreamMonitor::spawn(
        transport,
        reconnect,
        FeedConfig::default(),
        MonitorCallbacks::default(),
        cancel.clone(),
    );
    (handle, cancel)
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached within timeout");
}

#[tokio::test]
async fn test_full_run_classifies_and_terminates_cleanly() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(vec![
        r#"{"type":"progress","processed":3,"total":10,"percentage":30}"#.to_string(),
        r#"{"type":"alert","alert":{"priority":"high","message":"Large buy detected"}}"#
            .to_string(),
        "not json".to_string(),
        r#"{"type":"complete"}"#.to_string(),
    ])]));
    let (handle, cancel) = spawn_monitor(transport, ReconnectConfig::default());

    handle.start("http://localhost:8000/api/base/buy/stream");
    wait_until(|| handle.state() == ConnectionState::Idle && !handle.activity_snapshot().is_empty())
        .await;

    let activity = handle.activity_snapshot();
    let messages: Vec<&str> = activity.iter().map(|r| r.message.as_str()).collect();

    // Newest first: disconnect, complete, parse failure, alert, progress, connect.
    assert_eq!(activity.len(), 6);
    assert!(messages[0].contains("Disconnected"));
    assert!(messages[1].contains("Analysis complete"));
    assert!(messages[2].contains("Unparseable"));
    assert!(messages[3].contains("Large buy detected"));
    assert!(messages[4].contains("3/10 (30%)"));
    assert!(messages[5].contains("Connected"));

    let alerts = handle.alert_snapshot();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.contains("Large buy detected"));

    cancel.cancel();
}

#[tokio::test]
async fn test_transport_failure_reconnects_and_resumes() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(StreamError::Network("refused".to_string())),
        Ok(vec![r#"{"type":"complete"}"#.to_string()]),
    ]));
    let reconnect = ReconnectConfig {
        max_attempts: 5,
        base_delay_ms: 10,
    };
    let (handle, cancel) = spawn_monitor(transport, reconnect);

    handle.start("http://localhost:8000/api/base/buy/stream");
    wait_until(|| handle.state() == ConnectionState::Idle && !handle.activity_snapshot().is_empty())
        .await;

    let activity = handle.activity_snapshot();
    let warnings: Vec<_> = activity
        .iter()
        .filter(|r| r.message.contains("Reconnecting in"))
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(activity.iter().any(|r| r.message.contains("Connected")));
    assert!(activity
        .iter()
        .any(|r| r.message.contains("Analysis complete")));

    cancel.cancel();
}

#[tokio::test]
async fn test_exhausted_retries_end_in_failed_state() {
    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let reconnect = ReconnectConfig {
        max_attempts: 2,
        base_delay_ms: 5,
    };
    let (handle, cancel) = spawn_monitor(transport, reconnect);

    handle.start("http://localhost:8000/api/base/buy/stream");
    wait_until(|| handle.state() == ConnectionState::Failed).await;

    let activity = handle.activity_snapshot();
    assert!(activity[0]
        .message
        .contains("Maximum reconnection attempts (2) reached"));
    // One warning for the single in-budget retry, then the terminal error.
    assert_eq!(
        activity
            .iter()
            .filter(|r| r.message.contains("Reconnecting in"))
            .count(),
        1
    );

    // Failed is terminal until a manual start; the state must not move on
    // its own.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(handle.state(), ConnectionState::Failed);

    cancel.cancel();
}

#[tokio::test]
async fn test_stop_via_handle_records_disconnect() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(vec![])]));
    let (handle, cancel) = spawn_monitor(transport, ReconnectConfig::default());

    handle.start("http://localhost:8000/api/base/buy/stream");
    wait_until(|| handle.state() == ConnectionState::Open).await;

    handle.stop();
    wait_until(|| handle.state() == ConnectionState::Idle).await;

    let activity = handle.activity_snapshot();
    assert!(activity[0].message.contains("Disconnected"));

    // stop() is idempotent through the handle as well.
    handle.stop();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(handle.activity_snapshot().len(), activity.len());

    cancel.cancel();
}

#[tokio::test]
async fn test_clear_empties_feeds_mid_session() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(vec![
        r#"{"type":"system","message":"warmup"}"#.to_string(),
    ])]));
    let (handle, cancel) = spawn_monitor(transport, ReconnectConfig::default());

    handle.start("http://localhost:8000/api/base/buy/stream");
    wait_until(|| handle.activity_snapshot().len() >= 2).await;

    handle.clear();
    wait_until(|| handle.activity_snapshot().is_empty()).await;
    assert_eq!(handle.state(), ConnectionState::Open);

    cancel.cancel();
}
