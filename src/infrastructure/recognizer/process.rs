//! Recognizer adapter that drives an external recognizer process
//!
//! The recognizer is spawned once per session. It reads `stop` from stdin and
//! writes one JSON event per line on stdout, either a bare payload
//! (`{"PartialResult": "hel"}`) or an envelope
//! (`{"sessionId": 3, "event": "Finished"}`). Credentials travel in the
//! environment so they never show up in the process list.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::application::bus::EventBus;
use crate::application::ports::{Recognizer, RecognizerError};
use crate::domain::config::Credentials;
use crate::domain::event::{EventEnvelope, RecognizerEvent};
use crate::domain::session::Generation;

pub const APP_ID_ENV: &str = "SAYBLE_APP_ID";
pub const ACCESS_KEY_ENV: &str = "SAYBLE_ACCESS_KEY";

struct RunningRecognizer {
    child: Child,
    stdin: Option<ChildStdin>,
    generation: Generation,
}

/// Recognizer backed by a child process
pub struct ProcessRecognizer {
    program: String,
    leading_args: Vec<String>,
    events: EventBus,
    running: Arc<Mutex<Option<RunningRecognizer>>>,
}

impl ProcessRecognizer {
    /// `command` is split on whitespace into a program and leading arguments.
    pub fn new(command: &str, events: EventBus) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            leading_args: parts.collect(),
            events,
            running: Arc::new(Mutex::new(None)),
        }
    }

    /// Session arguments passed after the leading ones
    fn build_args(credentials: &Credentials, device: Option<&str>, generation: Generation) -> Vec<String> {
        let mut args = vec!["--generation".to_string(), generation.to_string()];
        if let Some(device) = device {
            args.push("--device".to_string());
            args.push(device.to_string());
        }
        args.push("--language".to_string());
        args.push(credentials.language.clone());
        if credentials.auto_punctuation {
            args.push("--punctuation".to_string());
        }
        args
    }

    fn spawn(&self, args: Vec<String>, credentials: &Credentials) -> Result<Child, RecognizerError> {
        if self.program.is_empty() {
            return Err(RecognizerError::NotFound("no recognizer command configured".to_string()));
        }
        Command::new(&self.program)
            .args(&self.leading_args)
            .args(&args)
            .env(APP_ID_ENV, &credentials.app_id)
            .env(ACCESS_KEY_ENV, &credentials.access_key)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecognizerError::NotFound(self.program.clone())
                } else {
                    RecognizerError::StartFailed(e.to_string())
                }
            })
    }

    /// Publish every stdout line until EOF.
    ///
    /// A recognizer that exits before settling the session gets a synthesized
    /// `Disconnected`, and one that exits without `Finished` gets that too, so
    /// listeners always see the session end.
    async fn pump_events(stdout: ChildStdout, generation: Generation, events: EventBus) {
        let mut lines = BufReader::new(stdout).lines();
        let mut settled = false;
        let mut saw_finished = false;

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(%generation, error = %e, "Failed to read recognizer output");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let Some(envelope) = EventEnvelope::from_line(&line, generation) else {
                debug!(%generation, line = %line, "Ignoring unparseable recognizer output");
                continue;
            };
            if envelope.generation == generation {
                settled |= envelope.event.settles_session();
                saw_finished |= envelope.event == RecognizerEvent::Finished;
            }
            debug!(generation = %envelope.generation, kind = envelope.event.kind(), "Recognizer event");
            events.publish(envelope);
        }

        if !settled {
            events.publish(EventEnvelope::new(generation, RecognizerEvent::Disconnected));
        }
        if !saw_finished {
            events.publish(EventEnvelope::new(generation, RecognizerEvent::Finished));
        }
        debug!(%generation, "Recognizer output closed");
    }

    async fn pump_stderr(stderr: tokio::process::ChildStderr, generation: Generation) {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(%generation, "recognizer: {}", line);
        }
    }

    /// Kill the recognizer of the previous session if it is still running
    async fn reap(running: &mut Option<RunningRecognizer>) {
        let Some(mut previous) = running.take() else {
            return;
        };
        match previous.child.try_wait() {
            Ok(Some(status)) => {
                debug!(generation = %previous.generation, %status, "Previous recognizer already exited");
            }
            _ => {
                warn!(generation = %previous.generation, "Killing previous recognizer");
                if let Err(e) = previous.child.kill().await {
                    warn!(error = %e, "Failed to kill previous recognizer");
                }
            }
        }
    }

    /// Kill the running recognizer, if any
    pub async fn shutdown(&self) {
        Self::reap(&mut *self.running.lock().await).await;
    }
}

#[async_trait]
impl Recognizer for ProcessRecognizer {
    async fn start_recording(
        &self,
        credentials: &Credentials,
        device: Option<&str>,
        generation: Generation,
    ) -> Result<(), RecognizerError> {
        let mut running = self.running.lock().await;
        Self::reap(&mut running).await;

        let args = Self::build_args(credentials, device, generation);
        let mut child = self.spawn(args, credentials)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RecognizerError::StartFailed("recognizer stdout unavailable".to_string()))?;
        tokio::spawn(Self::pump_events(stdout, generation, self.events.clone()));
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(Self::pump_stderr(stderr, generation));
        }

        info!(%generation, program = %self.program, "Recognizer started");
        *running = Some(RunningRecognizer {
            stdin: child.stdin.take(),
            child,
            generation,
        });
        Ok(())
    }

    async fn stop_recording(&self) -> Result<(), RecognizerError> {
        let mut running = self.running.lock().await;
        let Some(current) = running.as_mut() else {
            return Ok(());
        };
        let Some(mut stdin) = current.stdin.take() else {
            debug!(generation = %current.generation, "Recognizer already asked to stop");
            return Ok(());
        };

        debug!(generation = %current.generation, "Stopping recognizer");
        stdin
            .write_all(b"stop\n")
            .await
            .map_err(|e| RecognizerError::StopFailed(e.to_string()))?;
        stdin
            .shutdown()
            .await
            .map_err(|e| RecognizerError::StopFailed(e.to_string()))
    }
}
