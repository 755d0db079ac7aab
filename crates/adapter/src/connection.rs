//! Connection manager - one WebSocket link to the game server
//!
//! [`Connection::open`] spawns a transport task on the current tokio runtime
//! and hands back a handle plus a bounded receiver of [`ConnectionEvent`]s.
//! Inbound frames are demultiplexed by `type`:
//!
//! | type     | event                               |
//! |----------|-------------------------------------|
//! | `error`  | `Notice` with [`NoticeKind::Error`] |
//! | `okay`   | `Notice` with [`NoticeKind::Okay`]  |
//! | `update` | `Update`                            |
//!
//! Unknown or malformed frames are logged and dropped. Events are delivered
//! in arrival order. There is no reconnection; after `Closed` the handle is
//! spent.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::core::{Command, CommandSink, Notice, NoticeKind, ServerUpdate};
use crate::protocol::{encode_command, parse_message, ServerMessage};
use crate::types::DEFAULT_SERVER_URL;

pub const DEFAULT_EVENT_CAPACITY: usize = 64;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

/// Connection configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub url: String,
    /// Bound of the event channel; the reader waits when it is full.
    pub event_capacity: usize,
    pub connect_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl ConnectionConfig {
    /// Load from `CHESS_SERVER_URL`, `CHESS_EVENT_CAPACITY` and
    /// `CHESS_CONNECT_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let url = env::var("CHESS_SERVER_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.url);

        let event_capacity = env::var("CHESS_EVENT_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.event_capacity);

        let connect_timeout = env::var("CHESS_CONNECT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.connect_timeout);

        Self {
            url,
            event_capacity,
            connect_timeout,
            shutdown_timeout: defaults.shutdown_timeout,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("timed out connecting to {url}")]
    ConnectTimeout { url: String },

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Lifecycle of the socket. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ReadyState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            2 => ReadyState::Closing,
            _ => ReadyState::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadyState::Connecting => "connecting",
            ReadyState::Open => "open",
            ReadyState::Closing => "closing",
            ReadyState::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Opened,
    Notice(Notice),
    Update(ServerUpdate),
    /// Terminal. `reason` is set when the link failed rather than closed.
    Closed { reason: Option<String> },
}

enum Outbound {
    Text(String),
    Close,
}

/// Handle to a running connection.
pub struct Connection {
    state: Arc<AtomicU8>,
    out_tx: mpsc::UnboundedSender<Outbound>,
    task: Option<JoinHandle<()>>,
    shutdown_timeout: Duration,
}

impl Connection {
    /// Start connecting. Must be called from within a tokio runtime.
    pub fn open(config: ConnectionConfig) -> (Self, mpsc::Receiver<ConnectionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity.max(1));
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let state = Arc::new(AtomicU8::new(ReadyState::Connecting as u8));
        let shutdown_timeout = config.shutdown_timeout;

        info!(url = %config.url, "opening connection");
        let task = tokio::spawn(transport_task(config, Arc::clone(&state), out_rx, event_tx));

        (
            Self {
                state,
                out_tx,
                task: Some(task),
                shutdown_timeout,
            },
            event_rx,
        )
    }

    pub fn ready_state(&self) -> ReadyState {
        ReadyState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_open(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    /// Queue a command. Returns false, without sending, unless the link is open.
    pub fn send(&self, command: &Command) -> bool {
        if !self.is_open() {
            debug!(state = self.ready_state().as_str(), "not open, dropping outbound message");
            return false;
        }
        match encode_command(command) {
            Ok(text) => self.out_tx.send(Outbound::Text(text)).is_ok(),
            Err(err) => {
                warn!(%err, "failed to encode outbound message");
                false
            }
        }
    }

    /// Begin an orderly close. Idempotent.
    pub fn close(&mut self) {
        let current = self.ready_state();
        if matches!(current, ReadyState::Closing | ReadyState::Closed) {
            return;
        }
        // Only move forward; the transport may have already finished.
        let _ = self.state.compare_exchange(
            current as u8,
            ReadyState::Closing as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        let _ = self.out_tx.send(Outbound::Close);
    }

    /// Close and wait for the transport task, aborting it after the
    /// configured timeout.
    pub async fn shutdown(mut self) {
        self.close();
        if let Some(task) = self.task.take() {
            let abort = task.abort_handle();
            if tokio::time::timeout(self.shutdown_timeout, task).await.is_err() {
                warn!("transport did not finish in time, aborting");
                abort.abort();
                self.state.store(ReadyState::Closed as u8, Ordering::SeqCst);
            }
        }
    }
}

impl CommandSink for Connection {
    fn dispatch(&mut self, command: Command) {
        if !self.send(&command) {
            warn!(command = command.name(), "command not sent");
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Turn one inbound text frame into an event, or drop it.
pub fn on_message(raw: &str) -> Option<ConnectionEvent> {
    match parse_message(raw) {
        Ok(ServerMessage::Error(msg)) => {
            warn!(message = %msg.message, "server error");
            Some(ConnectionEvent::Notice(msg.into_notice(NoticeKind::Error)))
        }
        Ok(ServerMessage::Okay(msg)) => {
            debug!(message = %msg.message, "server okay");
            Some(ConnectionEvent::Notice(msg.into_notice(NoticeKind::Okay)))
        }
        Ok(ServerMessage::Update(msg)) => Some(ConnectionEvent::Update(msg.into())),
        Err(err) => {
            warn!(%err, "dropping inbound frame");
            None
        }
    }
}

async fn transport_task(
    config: ConnectionConfig,
    state: Arc<AtomicU8>,
    mut out_rx: mpsc::UnboundedReceiver<Outbound>,
    event_tx: mpsc::Sender<ConnectionEvent>,
) {
    let reason = match run_transport(&config, &state, &mut out_rx, &event_tx).await {
        Ok(()) => None,
        Err(err) => {
            error!(%err, url = %config.url, "connection failed");
            Some(err.to_string())
        }
    };
    state.store(ReadyState::Closed as u8, Ordering::SeqCst);
    info!(url = %config.url, "connection closed");
    let _ = event_tx.send(ConnectionEvent::Closed { reason }).await;
}

async fn run_transport(
    config: &ConnectionConfig,
    state: &AtomicU8,
    out_rx: &mut mpsc::UnboundedReceiver<Outbound>,
    event_tx: &mpsc::Sender<ConnectionEvent>,
) -> Result<(), ConnectionError> {
    let connect = tokio_tungstenite::connect_async(config.url.as_str());
    let (ws, _response) = tokio::time::timeout(config.connect_timeout, connect)
        .await
        .map_err(|_| ConnectionError::ConnectTimeout {
            url: config.url.clone(),
        })??;
    let (mut sink, mut stream) = ws.split();

    if state
        .compare_exchange(
            ReadyState::Connecting as u8,
            ReadyState::Open as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        )
        .is_err()
    {
        debug!("closed while connecting");
        let _ = sink.close().await;
        return Ok(());
    }
    info!(url = %config.url, "connected");
    if event_tx.send(ConnectionEvent::Opened).await.is_err() {
        let _ = sink.close().await;
        return Ok(());
    }

    loop {
        tokio::select! {
            out = out_rx.recv() => match out {
                Some(Outbound::Text(text)) => {
                    debug!(%text, "send");
                    sink.send(Message::Text(text)).await?;
                }
                Some(Outbound::Close) | None => {
                    let _ = sink.close().await;
                    return Ok(());
                }
            },
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(event) = on_message(&text) {
                        if event_tx.send(event).await.is_err() {
                            debug!("event receiver dropped");
                            let _ = sink.close().await;
                            return Ok(());
                        }
                    }
                }
                Some(Ok(Message::Binary(bytes))) => {
                    warn!(len = bytes.len(), "dropping binary frame");
                }
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "server closed connection");
                    state.store(ReadyState::Closing as u8, Ordering::SeqCst);
                    // Flush the queued close reply to finish the handshake.
                    let _ = sink.close().await;
                    return Ok(());
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(()),
            },
        }
    }
}
