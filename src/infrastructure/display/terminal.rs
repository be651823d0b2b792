//! Display surface drawn as a spinner line on the terminal

use std::sync::Mutex;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::{DisplayError, DisplaySurface};
use crate::domain::display::{DisplayStatus, DisplayView, LogicalPosition, MonitorGeometry};

/// Terminal stand-in for the floating window.
///
/// Position is meaningless on a terminal, so `monitor` reports nothing and
/// the spinner just appears on stderr.
pub struct TerminalSurface {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<ProgressBar>>, DisplayError> {
        self.spinner
            .lock()
            .map_err(|_| DisplayError::UpdateFailed("spinner lock poisoned".to_string()))
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line rendering of a view
pub fn format_view(view: &DisplayView) -> String {
    let label = match view.status {
        DisplayStatus::Recording => view.label.red().bold(),
        DisplayStatus::Done => view.label.green().bold(),
        status if status.is_failure() => view.label.yellow().bold(),
        _ => view.label.cyan().bold(),
    };
    let mut line = label.to_string();
    if let Some(elapsed) = &view.elapsed {
        line.push(' ');
        line.push_str(&elapsed.dimmed().to_string());
    }
    if !view.text.is_empty() {
        line.push_str("  ");
        line.push_str(&view.text);
    }
    if view.cancellable {
        line.push_str(&"  [cancel: sayble daemon cancel]".dimmed().to_string());
    }
    line
}

impl DisplaySurface for TerminalSurface {
    fn monitor(&self) -> Option<MonitorGeometry> {
        None
    }

    fn show_at(&self, _position: Option<LogicalPosition>) -> Result<(), DisplayError> {
        let mut spinner = self.lock()?;
        if spinner.is_none() {
            let bar = ProgressBar::new_spinner();
            bar.set_style(Self::style());
            bar.enable_steady_tick(Duration::from_millis(80));
            *spinner = Some(bar);
        }
        Ok(())
    }

    fn hide(&self) -> Result<(), DisplayError> {
        if let Some(bar) = self.lock()?.take() {
            bar.finish_and_clear();
        }
        Ok(())
    }

    fn render(&self, view: &DisplayView) -> Result<(), DisplayError> {
        if let Some(bar) = self.lock()?.as_ref() {
            bar.set_message(format_view(view));
        }
        Ok(())
    }
}
