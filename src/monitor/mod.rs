//! Stream monitor orchestration
//!
//! [`StreamMonitor`] composes the connection, the reconnect policy, the
//! classifier, and two bounded feeds into the full
//! subscribe/classify/display/recover loop. One monitor task owns all
//! mutable state; the surrounding application talks to it through a
//! [`MonitorHandle`] and read-only feed snapshots.
//!
//! Every transport signal and scheduled retry carries the session counter
//! that created it. `start()`, `stop()`, and each reconnection bump the
//! counter, so signals from a superseded connection are discarded at
//! delivery time instead of racing the new one.

pub mod records;


use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::FeedConfig;
use crate::event::{classify, StreamEvent};
use crate::feed::{BoundedFeed, DisplayRecord, Severity};
use crate::stream::{
    reconnect, ConnectionSignal, ReconnectConfig, ReconnectState, SignalEnvelope,
    StreamConnection, StreamError, StreamTransport,
};

/// Connection lifecycle state, owned by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Idle,
    Connecting,
    Open,
    Reconnecting,
    /// Retry budget exhausted; requires an explicit `start()` to recover.
    Failed,
}

/// Commands accepted by the monitor task.
#[derive(Debug)]
enum Command {
    Start(String),
    Stop,
    Clear,
}

pub type FeedCallback = Box<dyn Fn(&[DisplayRecord]) + Send + Sync>;
pub type RowUpdateCallback = Box<dyn Fn(&str, &serde_json::Value) + Send + Sync>;

/// Callbacks into the surrounding UI layer.
///
/// Feed callbacks receive a fresh newest-first snapshot after every change;
/// the row-update callback receives the wallet address and the changed
/// fields for `transaction` and `wallet_update` events.
#[derive(Default)]
pub struct MonitorCallbacks {
    pub on_activity: Option<FeedCallback>,
    pub on_alert: Option<FeedCallback>,
    pub on_row_update: Option<RowUpdateCallback>,
}

/// Receiver halves of the monitor's internal channels.
///
/// Created by [`StreamMonitor::new`] and consumed by [`StreamMonitor::run`];
/// kept separate so the select loop can poll them without aliasing the
/// monitor state.
pub struct MonitorChannels {
    signals: mpsc::UnboundedReceiver<SignalEnvelope>,
    retries: mpsc::UnboundedReceiver<u64>,
}

/// Cloneable handle used by the UI layer to drive a spawned monitor.
#[derive(Clone)]
pub struct MonitorHandle {
    commands: mpsc::UnboundedSender<Command>,
    activity: Arc<BoundedFeed>,
    alerts: Arc<BoundedFeed>,
    state: watch::Receiver<ConnectionState>,
}

impl MonitorHandle {
    /// Begins a monitor session against `endpoint`.
    ///
    /// If a session is already live it is stopped first; two live sessions
    /// never coexist.
    pub fn start(&self, endpoint: impl Into<String>) {
        let _ = self.commands.send(Command::Start(endpoint.into()));
    }

    /// Ends the current session. Idempotent, always succeeds.
    pub fn stop(&self) {
        let _ = self.commands.send(Command::Stop);
    }

    /// Empties both feeds, independent of connection state.
    pub fn clear(&self) {
        let _ = self.commands.send(Command::Clear);
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Watch channel for state transitions, for callers that need to await
    /// the end of a run.
    pub fn state_watch(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn activity_snapshot(&self) -> Vec<DisplayRecord> {
        self.activity.snapshot()
    }

    pub fn alert_snapshot(&self) -> Vec<DisplayRecord> {
        self.alerts.snapshot()
    }
}

/// The orchestrator. See the module docs for the ownership model.
pub struct StreamMonitor {
    reconnect_config: ReconnectConfig,
    connection: StreamConnection,
    state: ConnectionState,
    state_tx: watch::Sender<ConnectionState>,
    reconnect: ReconnectState,
    session: u64,
    endpoint: Option<String>,
    activity: Arc<BoundedFeed>,
    alerts: Arc<BoundedFeed>,
    callbacks: MonitorCallbacks,
    retry_tx: mpsc::UnboundedSender<u64>,
    retry_timer: Option<JoinHandle<()>>,
}

impl StreamMonitor {
    pub fn new(
        transport: Arc<dyn StreamTransport>,
        reconnect_config: ReconnectConfig,
        feeds: FeedConfig,
        callbacks: MonitorCallbacks,
    ) -> (Self, MonitorChannels) {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (retry_tx, retry_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(ConnectionState::Idle);

        let monitor = Self {
            reconnect_config,
            connection: StreamConnection::new(transport, signal_tx),
            state: ConnectionState::Idle,
            state_tx,
            reconnect: ReconnectState::default(),
            session: 0,
            endpoint: None,
            activity: Arc::new(BoundedFeed::new(feeds.activity_capacity)),
            alerts: Arc::new(BoundedFeed::new(feeds.alert_capacity)),
            callbacks,
            retry_tx,
            retry_timer: None,
        };
        let channels = MonitorChannels {
            signals: signal_rx,
            retries: retry_rx,
        };
        (monitor, channels)
    }

    /// Spawns the monitor task and returns the handle the UI drives it with.
    ///
    /// The task ends when `cancel` fires or every handle clone is dropped.
    pub fn spawn(
        transport: Arc<dyn StreamTransport>,
        reconnect_config: ReconnectConfig,
        feeds: FeedConfig,
        callbacks: MonitorCallbacks,
        cancel: CancellationToken,
    ) -> MonitorHandle {
        let (monitor, channels) = Self::new(transport, reconnect_config, feeds, callbacks);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let handle = MonitorHandle {
            commands: command_tx,
            activity: Arc::clone(&monitor.activity),
            alerts: Arc::clone(&monitor.alerts),
            state: monitor.state_tx.subscribe(),
        };
        tokio::spawn(monitor.run(channels, command_rx, cancel));
        handle
    }

    /// The monitor event loop: strictly serialized processing of commands,
    /// transport signals, and retry timers.
    pub async fn run(
        mut self,
        mut channels: MonitorChannels,
        mut commands: mpsc::UnboundedReceiver<Command>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.stop();
                    break;
                }
                command = commands.recv() => match command {
                    Some(Command::Start(endpoint)) => self.start(&endpoint),
                    Some(Command::Stop) => self.stop(),
                    Some(Command::Clear) => self.clear_feeds(),
                    None => {
                        self.stop();
                        break;
                    }
                },
                Some(envelope) = channels.signals.recv() => self.handle_signal(envelope),
                Some(session) = channels.retries.recv() => self.handle_retry_due(session),
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Read-only view of the activity feed.
    pub fn activity(&self) -> &Arc<BoundedFeed> {
        &self.activity
    }

    /// Read-only view of the alert feed.
    pub fn alerts(&self) -> &Arc<BoundedFeed> {
        &self.alerts
    }

    pub(crate) fn session(&self) -> u64 {
        self.session
    }

    /// Begins a session. Any live session is stopped first.
    pub fn start(&mut self, endpoint: &str) {
        if self.state != ConnectionState::Idle {
            self.stop();
        }
        self.session += 1;
        self.reconnect.reset();
        self.endpoint = Some(endpoint.to_string());
        self.set_state(ConnectionState::Connecting);
        tracing::info!(endpoint, session = self.session, "Starting stream monitor session");
        self.connection.open(self.session, endpoint.to_string());
    }

    /// Ends the session: closes the transport, cancels any pending retry,
    /// and records the disconnect. A no-op when already Idle.
    pub fn stop(&mut self) {
        if self.state == ConnectionState::Idle {
            return;
        }
        self.session += 1;
        self.connection.close();
        self.cancel_retry_timer();
        self.endpoint = None;
        self.reconnect.reset();
        self.push_activity(DisplayRecord::new(
            Severity::Info,
            "Disconnected from analysis stream",
        ));
        self.set_state(ConnectionState::Idle);
        tracing::info!("Stream monitor session stopped");
    }

    /// Empties both feeds on user request.
    pub fn clear_feeds(&mut self) {
        self.activity.clear();
        self.alerts.clear();
        self.notify_activity();
        self.notify_alerts();
    }

    pub(crate) fn handle_signal(&mut self, envelope: SignalEnvelope) {
        if envelope.session != self.session {
            tracing::trace!(
                stale = envelope.session,
                current = self.session,
                "Discarding signal from superseded connection"
            );
            return;
        }
        match envelope.signal {
            ConnectionSignal::Opened => self.on_open(),
            ConnectionSignal::Message(raw) => self.on_message(&raw),
            ConnectionSignal::Closed(err) => self.on_transport_error(err),
        }
    }

    fn on_open(&mut self) {
        if self.state != ConnectionState::Connecting {
            return;
        }
        self.reconnect.reset();
        self.set_state(ConnectionState::Open);
        self.push_activity(DisplayRecord::new(
            Severity::Success,
            "Connected to analysis stream",
        ));
    }

    fn on_message(&mut self, raw: &str) {
        if self.state != ConnectionState::Open {
            return;
        }
        match classify(raw) {
            Ok(event) => {
                tracing::debug!(kind = event.kind(), "Stream event");
                self.apply_event(event);
            }
            Err(failure) => {
                tracing::debug!(reason = %failure.reason, "Dropping unparseable frame");
                self.push_activity(records::parse_failure_record(&failure));
            }
        }
    }

    fn apply_event(&mut self, event: StreamEvent) {
        if let Some((correlation_id, fields)) = records::row_update_for(&event) {
            if let Some(callback) = &self.callbacks.on_row_update {
                callback(&correlation_id, &fields);
            }
        }

        let record = records::record_for(&event);
        if matches!(event, StreamEvent::Alert(_)) {
            self.push_alert(record.clone());
        }
        self.push_activity(record);

        // A server-side terminator ends the run cleanly; this is a logical
        // close, not a transport failure, so the retry policy never sees it.
        if event.is_terminal() {
            self.stop();
        }
    }

    fn on_transport_error(&mut self, err: StreamError) {
        if !matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Open
        ) {
            return;
        }
        self.connection.close();
        self.session += 1;

        let attempt = self.reconnect.record_failure();
        let max_attempts = self.reconnect_config.max_attempts;
        if reconnect::should_retry(attempt, max_attempts) {
            let delay = reconnect::delay_for(attempt, self.reconnect_config.base_delay());
            self.set_state(ConnectionState::Reconnecting);
            tracing::warn!(%err, attempt, max_attempts, delay_ms = delay.as_millis() as u64, "Connection lost, scheduling reconnect");
            self.push_activity(DisplayRecord::new(
                Severity::Warning,
                format!(
                    "Connection lost: {}. Reconnecting in {}ms (attempt {}/{})",
                    err,
                    delay.as_millis(),
                    attempt,
                    max_attempts
                ),
            ));
            self.schedule_retry(delay);
        } else {
            self.set_state(ConnectionState::Failed);
            tracing::error!(%err, max_attempts, "Giving up on stream after exhausting retries");
            self.push_activity(DisplayRecord::new(
                Severity::Error,
                format!(
                    "Connection lost: {}. Maximum reconnection attempts ({}) reached",
                    err, max_attempts
                ),
            ));
        }
    }

    fn schedule_retry(&mut self, delay: std::time::Duration) {
        self.cancel_retry_timer();
        let retry_tx = self.retry_tx.clone();
        let session = self.session;
        self.retry_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = retry_tx.send(session);
        }));
    }

    fn cancel_retry_timer(&mut self) {
        if let Some(timer) = self.retry_timer.take() {
            timer.abort();
        }
    }

    pub(crate) fn handle_retry_due(&mut self, session: u64) {
        if session != self.session || self.state != ConnectionState::Reconnecting {
            return;
        }
        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };
        self.session += 1;
        self.set_state(ConnectionState::Connecting);
        tracing::info!(
            attempt = self.reconnect.attempt(),
            "Attempting to reconnect to analysis stream"
        );
        self.connection.open(self.session, endpoint);
    }

    fn set_state(&mut self, next: ConnectionState) {
        if self.state == next {
            return;
        }
        tracing::debug!(from = ?self.state, to = ?next, "Connection state transition");
        self.state = next;
        let _ = self.state_tx.send(next);
    }

    fn push_activity(&self, record: DisplayRecord) {
        self.activity.push(record);
        self.notify_activity();
    }

    fn push_alert(&self, record: DisplayRecord) {
        self.alerts.push(record);
        self.notify_alerts();
    }

    fn notify_activity(&self) {
        if let Some(callback) = &self.callbacks.on_activity {
            callback(&self.activity.snapshot());
        }
    }

    fn notify_alerts(&self) {
        if let Some(callback) = &self.callbacks.on_alert {
            callback(&self.alerts.snapshot());
        }
    }
}
