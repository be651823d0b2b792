//! Daemon app runner

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tracing::{debug, error, info, warn};

use crate::domain::action::HotkeyAction;
use crate::domain::config::AppConfig;

use super::app::{AppController, Services, EXIT_ERROR, EXIT_SUCCESS};
use super::ipc::create_ipc_server;
use super::pid_file::{PidFile, PidFileError};
use super::presenter::Presenter;
use super::signals::{DaemonCommand, DaemonRequest, DaemonSignalHandler};

/// How often an active recording is checked against the safety limit
const MAX_DURATION_POLL: StdDuration = StdDuration::from_millis(250);

/// Run daemon mode
pub async fn run_daemon(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let pid_file = PidFile::new();
    if let Err(e) = pid_file.acquire() {
        match e {
            PidFileError::AlreadyRunning(pid) => {
                presenter.error(&format!("Another daemon is already running (PID: {})", pid));
            }
            _ => {
                presenter.error(&e.to_string());
            }
        }
        return ExitCode::from(EXIT_ERROR);
    }

    // Missing credentials are reported per start, so the daemon can be
    // launched before the user has configured them.
    let credentials = match config.credentials() {
        Ok(credentials) => Some(credentials),
        Err(e) => {
            presenter.warn(&e.to_string());
            None
        }
    };

    let services = Services::build(&config, credentials);

    let (mut signals, request_tx) = match DaemonSignalHandler::new().await {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut server = create_ipc_server();
    if let Err(e) = server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    let socket_path = server.path();

    let server_task = tokio::spawn(async move {
        if let Err(e) = server.run(request_tx).await {
            error!(error = %e, "IPC server stopped");
        }
    });
    let controller_task = services.spawn_controller();
    let display_task = services.spawn_display();

    presenter.daemon_status("Started, waiting for commands...");
    presenter.info(&format!(
        "PID: {} | Socket: {} | SIGINT: exit",
        std::process::id(),
        socket_path
    ));
    info!(
        output_mode = %config.output_mode_or_default(),
        auto_output = config.auto_output_or_default(),
        display = services.display.is_some(),
        "Daemon ready"
    );

    let clean = daemon_loop(&services.controller, &mut signals, &presenter).await;

    server_task.abort();
    controller_task.abort();
    services.shutdown(display_task).await;
    let _ = pid_file.release();

    if clean {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Serve requests until shutdown. Returns false if the request channel closed
/// unexpectedly.
async fn daemon_loop(
    controller: &Arc<AppController>,
    signals: &mut DaemonSignalHandler,
    presenter: &Presenter,
) -> bool {
    let mut ticker = tokio::time::interval(MAX_DURATION_POLL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            request = signals.recv() => {
                let Some(request) = request else {
                    return false;
                };
                if !handle_request(controller, request, presenter).await {
                    return true;
                }
            }
            _ = ticker.tick() => {
                if controller.exceeds_max_duration().await {
                    presenter.warn("Max duration reached, auto-stopping");
                    dispatch_action(controller, HotkeyAction::StopRecording);
                }
            }
        }
    }
}

/// Returns false when the daemon should exit
async fn handle_request(
    controller: &Arc<AppController>,
    request: DaemonRequest,
    presenter: &Presenter,
) -> bool {
    match request.command {
        DaemonCommand::Action(action) => {
            debug!(%action, "Trigger received");
            dispatch_action(controller, action);
            request.respond("ok");
        }
        DaemonCommand::Status => {
            let phase = controller.phase().await;
            request.respond(phase.as_str());
        }
        DaemonCommand::Copy => match controller.copy_last().await {
            Ok(text) => {
                presenter.info(&format!("Copied {} characters", text.chars().count()));
                request.respond("ok");
            }
            Err(e) => request.respond(format!("error: {}", e)),
        },
        DaemonCommand::Shutdown => {
            presenter.daemon_status("Shutting down...");
            if controller.phase().await.is_active() {
                if let Err(e) = controller.cancel().await {
                    warn!(error = %e, "Failed to cancel active session on shutdown");
                }
            }
            request.respond("ok");
            return false;
        }
    }
    true
}

/// Run an intent in the background so a delayed stop never blocks the loop.
///
/// Triggers are not deduplicated; the controller sorts them out.
fn dispatch_action(controller: &Arc<AppController>, action: HotkeyAction) {
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        if let Err(e) = controller.handle_action(action).await {
            error!(%action, error = %e, "Action failed");
        }
    });
}
