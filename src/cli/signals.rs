//! Daemon requests and OS signal handling

use std::str::FromStr;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use crate::domain::action::HotkeyAction;

/// Something the daemon loop is asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonCommand {
    /// Recording intent from a trigger
    Action(HotkeyAction),
    /// Report the session phase
    Status,
    /// Copy the last recognized text
    Copy,
    /// Shutdown daemon (SIGINT/SIGTERM)
    Shutdown,
}

impl FromStr for DaemonCommand {
    type Err = String;

    /// Parse an IPC command word. Shutdown is only reachable through signals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "status" => Ok(Self::Status),
            "copy" => Ok(Self::Copy),
            other => other.parse().map(Self::Action),
        }
    }
}

/// A command plus the channel its answer goes back on
#[derive(Debug)]
pub struct DaemonRequest {
    pub command: DaemonCommand,
    pub reply: Option<oneshot::Sender<String>>,
}

impl DaemonRequest {
    pub fn new(command: DaemonCommand) -> (Self, oneshot::Receiver<String>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                command,
                reply: Some(tx),
            },
            rx,
        )
    }

    /// Answer the requester, if it is still waiting
    pub fn respond(self, response: impl Into<String>) {
        if let Some(reply) = self.reply {
            let _ = reply.send(response.into());
        }
    }
}

/// Daemon signal handler
///
/// Turns SIGINT/SIGTERM into shutdown requests and hands out a sender other
/// sources (the socket server) use to reach the daemon loop.
pub struct DaemonSignalHandler {
    receiver: mpsc::Receiver<DaemonRequest>,
}

impl DaemonSignalHandler {
    pub async fn new() -> Result<(Self, mpsc::Sender<DaemonRequest>), std::io::Error> {
        let (tx, rx) = mpsc::channel(32);

        for (kind, name) in [
            (SignalKind::interrupt(), "SIGINT"),
            (SignalKind::terminate(), "SIGTERM"),
        ] {
            let tx = tx.clone();
            let mut stream = signal(kind)?;
            tokio::spawn(async move {
                stream.recv().await;
                info!(signal = name, "Received shutdown signal");
                let _ = tx
                    .send(DaemonRequest {
                        command: DaemonCommand::Shutdown,
                        reply: None,
                    })
                    .await;
            });
        }

        Ok((Self { receiver: rx }, tx))
    }

    /// Wait for the next request
    pub async fn recv(&mut self) -> Option<DaemonRequest> {
        self.receiver.recv().await
    }
}
