//! App wiring and the one-shot runner

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::application::ports::{ConfigStore, Keystroke, Notifier};
use crate::application::{
    ControlBus, ControllerConfig, DisplayTiming, EventBus, EventOutcome, FloatingDisplay,
    RecordingController,
};
use crate::domain::config::{AppConfig, Credentials};
use crate::domain::session::SessionPhase;
use crate::infrastructure::recognizer::{ACCESS_KEY_ENV, APP_ID_ENV};
use crate::infrastructure::{
    create_keystroke, create_notifier, ArboardClipboard, ProcessRecognizer, SystemOutputSink,
    TerminalSurface, XdgConfigStore,
};

use super::args::Cli;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// How long a one-shot run waits for the result after stopping
const RESULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Controller with the production adapters
pub type AppController = RecordingController<
    Arc<ProcessRecognizer>,
    SystemOutputSink<ArboardClipboard, Box<dyn Keystroke>>,
    Box<dyn Notifier>,
>;

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "sayble=info",
        1 => "sayble=debug",
        _ => "sayble=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Config overrides given on the command line
pub fn cli_config(cli: &Cli) -> AppConfig {
    AppConfig {
        device: cli.device.clone(),
        recognizer_command: cli.recognizer.clone(),
        output_mode: cli
            .output_mode
            .map(|mode| crate::domain::output::OutputMode::from(mode).as_str().to_string()),
        auto_output: cli.no_auto_output.then_some(false),
        notify: cli.notify.then_some(true),
        max_duration: cli.max_duration.clone(),
        display: cli.no_display.then(|| crate::domain::config::DisplayConfig {
            enabled: Some(false),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Credentials from the environment
pub fn env_config() -> AppConfig {
    AppConfig {
        app_id: env::var(APP_ID_ENV).ok().filter(|s| !s.is_empty()),
        access_key: env::var(ACCESS_KEY_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

/// Merged config from the default XDG store
pub async fn load_config(cli_config: AppConfig) -> AppConfig {
    load_merged_config(&XdgConfigStore::new(), cli_config).await
}

/// Everything a session needs, wired from config
pub struct Services {
    pub events: EventBus,
    pub control: ControlBus,
    pub recognizer: Arc<ProcessRecognizer>,
    pub controller: Arc<AppController>,
    pub display: Option<FloatingDisplay<TerminalSurface>>,
}

impl Services {
    pub fn build(config: &AppConfig, credentials: Option<Credentials>) -> Self {
        let events = EventBus::default();
        let control = ControlBus::default();
        let policy = config.output_policy();

        let recognizer = Arc::new(ProcessRecognizer::new(
            config.recognizer_command_or_default(),
            events.clone(),
        ));
        let sink = SystemOutputSink::new(
            ArboardClipboard::new(),
            create_keystroke(policy.auto_output),
        );
        let controller = RecordingController::new(
            Arc::clone(&recognizer),
            sink,
            create_notifier(config.notify_or_default()),
            control.clone(),
            ControllerConfig {
                credentials,
                device: config.device().map(str::to_string),
                min_recording: config.min_recording_or_default(),
                max_duration: config.max_duration_or_default(),
                output: policy,
                enable_notify: config.notify_or_default(),
            },
        );

        let display = config.display_enabled_or_default().then(|| {
            FloatingDisplay::new(
                TerminalSurface::new(),
                DisplayTiming::new(
                    config.hide_delay_or_default(),
                    config.error_hide_delay_or_default(),
                ),
            )
        });

        Self {
            events,
            control,
            recognizer,
            controller: Arc::new(controller),
            display,
        }
    }

    /// Run the display against both buses, if it is enabled
    pub fn spawn_display(&self) -> Option<JoinHandle<()>> {
        let display = self.display.clone()?;
        let events = self.events.subscribe();
        let control = self.control.subscribe();
        Some(tokio::spawn(async move { display.run(events, control).await }))
    }

    /// Feed recognizer events to the controller
    pub fn spawn_controller(&self) -> JoinHandle<()> {
        let controller = Arc::clone(&self.controller);
        let events = self.events.subscribe();
        tokio::spawn(async move { controller.run(events).await })
    }

    /// Hide the display and kill a recognizer that is still running
    pub async fn shutdown(&self, display_task: Option<JoinHandle<()>>) {
        if let Some(task) = display_task {
            task.abort();
        }
        if let Some(display) = &self.display {
            display.hide().await;
        }
        self.recognizer.shutdown().await;
    }
}

/// Record one utterance: Enter stops, Ctrl+C cancels. The recognized text is
/// written to stdout as well as to the configured output.
pub async fn run_oneshot(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let credentials = match config.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let services = Services::build(&config, Some(credentials.clone()));
    let display_task = services.spawn_display();
    let mut events = services.events.subscribe();
    let controller = Arc::clone(&services.controller);

    let generation = match controller.start(Some(&credentials)).await {
        Ok(generation) => generation,
        Err(e) => {
            presenter.error(&e.to_string());
            services.shutdown(display_task).await;
            return ExitCode::from(EXIT_ERROR);
        }
    };
    presenter.info("Recording... press Enter to stop, Ctrl+C to cancel");

    let (ended_tx, mut ended_rx) = oneshot::channel::<()>();
    let pump = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            while let Some(envelope) = events.recv().await {
                let outcome = controller.handle_event(&envelope).await;
                if outcome == EventOutcome::SessionEnded && envelope.generation == generation {
                    let _ = ended_tx.send(());
                    break;
                }
            }
        })
    };

    let max_duration = config.max_duration_or_default().as_std();
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut line = String::new();
    let mut ended = false;
    let cancelled = tokio::select! {
        _ = stdin.read_line(&mut line) => false,
        _ = tokio::signal::ctrl_c() => true,
        _ = &mut ended_rx => {
            ended = true;
            false
        }
        _ = tokio::time::sleep(max_duration) => {
            presenter.warn("Max duration reached, stopping");
            false
        }
    };

    if cancelled {
        pump.abort();
        if let Err(e) = controller.cancel().await {
            debug!(error = %e, "Cancel had no effect");
        }
        presenter.warn("Recording cancelled");
        services.shutdown(display_task).await;
        return ExitCode::from(EXIT_ERROR);
    }

    if !ended {
        if let Err(e) = controller.stop().await {
            debug!(error = %e, "Stop had no effect");
        }
        if tokio::time::timeout(RESULT_TIMEOUT, ended_rx).await.is_err() {
            pump.abort();
            presenter.error("Timed out waiting for the recognizer");
            services.shutdown(display_task).await;
            return ExitCode::from(EXIT_ERROR);
        }
    }

    // Give the display its grace period before tearing it down
    if let Some(display) = &services.display {
        let linger = config.hide_delay_or_default().as_std();
        if display.is_visible().await {
            tokio::time::sleep(linger).await;
        }
    }

    let session = controller.session().await;
    let code = match (session.phase(), controller.last_text().await) {
        (SessionPhase::Error, _) => {
            presenter.error(&format!(
                "Recognition failed: {}",
                session.error().unwrap_or("unknown error")
            ));
            EXIT_ERROR
        }
        (_, Some(text)) => {
            presenter.output(&text);
            EXIT_SUCCESS
        }
        (_, None) => {
            presenter.warn("Nothing was recognized");
            EXIT_SUCCESS
        }
    };

    services.shutdown(display_task).await;
    ExitCode::from(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::output::OutputMode;
    use clap::Parser;

    #[test]
    fn cli_flags_become_overrides() {
        let cli = Cli::parse_from([
            "sayble",
            "--output-mode",
            "keyboard",
            "--no-auto-output",
            "--no-display",
            "--recognizer",
            "my-recognizer --verbose",
        ]);
        let config = cli_config(&cli);

        assert_eq!(config.output_mode_or_default(), OutputMode::SimulateKeyboard);
        assert_eq!(config.auto_output, Some(false));
        assert!(!config.display_enabled_or_default());
        assert_eq!(config.recognizer_command_or_default(), "my-recognizer --verbose");
        assert!(config.notify.is_none());
    }

    #[test]
    fn absent_flags_do_not_override() {
        let config = cli_config(&Cli::parse_from(["sayble"]));
        assert_eq!(config, AppConfig::empty());
    }

    #[tokio::test]
    async fn cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        store
            .save(&AppConfig {
                language: Some("en".to_string()),
                output_mode: Some("clipboard".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let config = load_merged_config(
            &store,
            AppConfig {
                output_mode: Some("keyboard".to_string()),
                ..Default::default()
            },
        )
        .await;

        assert_eq!(config.language_or_default(), "en");
        assert_eq!(config.output_mode_or_default(), OutputMode::SimulateKeyboard);
        assert_eq!(config.min_recording_or_default().as_millis(), 800);
    }

    #[tokio::test]
    async fn unreadable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let config = load_merged_config(&XdgConfigStore::with_path(path), AppConfig::empty()).await;
        assert_eq!(config.language_or_default(), "zh");
    }
}
