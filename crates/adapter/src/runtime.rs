//! Adapter runtime integration.
//!
//! Bridges the sync UI loop with the async WebSocket transport.

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::connection::{Connection, ConnectionConfig, ConnectionEvent, ReadyState};
use crate::core::{Command, CommandSink};

/// Running link to the game server.
pub struct ChessLink {
    rt: Runtime,
    connection: Option<Connection>,
    events: mpsc::Receiver<ConnectionEvent>,
}

impl ChessLink {
    /// Start a runtime and begin connecting with `config`.
    pub fn start(config: ConnectionConfig) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("chess-link")
            .enable_all()
            .build()
            .context("failed to create tokio runtime")?;

        let (connection, events) = {
            let _guard = rt.enter();
            Connection::open(config)
        };

        Ok(Self {
            rt,
            connection: Some(connection),
            events,
        })
    }

    pub fn try_recv(&mut self) -> Option<ConnectionEvent> {
        self.events.try_recv().ok()
    }

    pub fn ready_state(&self) -> ReadyState {
        self.connection
            .as_ref()
            .map(Connection::ready_state)
            .unwrap_or(ReadyState::Closed)
    }

    /// Returns false when the link is not open.
    pub fn send(&self, command: &Command) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|c| c.send(command))
    }

    pub fn close(&mut self) {
        if let Some(connection) = self.connection.as_mut() {
            connection.close();
        }
    }

    /// Close the link and wait (bounded) for the transport to finish.
    pub fn shutdown(mut self) {
        if let Some(connection) = self.connection.take() {
            self.rt.block_on(connection.shutdown());
        }
        debug!("link shut down");
    }
}

impl CommandSink for ChessLink {
    fn dispatch(&mut self, command: Command) {
        if !self.send(&command) {
            warn!(command = command.name(), state = self.ready_state().as_str(), "command not sent");
        }
    }
}
