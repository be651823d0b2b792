//! Renderable snapshot of the floating indicator

use super::status::DisplayStatus;

pub const LISTENING_PLACEHOLDER: &str = "Listening…";
pub const RECOGNIZING_PLACEHOLDER: &str = "Recognizing…";
pub const POLISHING_PLACEHOLDER: &str = "Polishing…";
pub const CONNECTION_FAILED: &str = "Connection failed";

/// What the surface draws
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayView {
    pub status: DisplayStatus,
    pub label: &'static str,
    pub text: String,
    /// `mm:ss`, only while recording
    pub elapsed: Option<String>,
    pub cancellable: bool,
}

impl DisplayView {
    pub fn compose(
        status: DisplayStatus,
        partial_text: &str,
        final_text: &str,
        error: Option<&str>,
        elapsed_secs: u64,
    ) -> Self {
        let text = match status {
            DisplayStatus::Idle => String::new(),
            DisplayStatus::Recording => or_placeholder(partial_text, LISTENING_PLACEHOLDER),
            DisplayStatus::Recognizing => or_placeholder(partial_text, RECOGNIZING_PLACEHOLDER),
            DisplayStatus::Polishing => or_placeholder(final_text, POLISHING_PLACEHOLDER),
            DisplayStatus::Done | DisplayStatus::PolishError => final_text.to_string(),
            DisplayStatus::Error => or_placeholder(error.unwrap_or_default(), CONNECTION_FAILED),
        };

        Self {
            status,
            label: status.label(),
            text,
            elapsed: (status == DisplayStatus::Recording).then(|| format_elapsed(elapsed_secs)),
            cancellable: status.is_cancellable(),
        }
    }
}

/// Format whole seconds as `mm:ss`; minutes grow past two digits when needed
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn or_placeholder(text: &str, placeholder: &str) -> String {
    if text.is_empty() {
        placeholder.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_shows_placeholder_then_partial() {
        let view = DisplayView::compose(DisplayStatus::Recording, "", "", None, 0);
        assert_eq!(view.text, "Listening…");
        assert_eq!(view.elapsed.as_deref(), Some("00:00"));
        assert!(view.cancellable);

        let view = DisplayView::compose(DisplayStatus::Recording, "hello", "", None, 65);
        assert_eq!(view.text, "hello");
        assert_eq!(view.elapsed.as_deref(), Some("01:05"));
    }

    #[test]
    fn recognizing_has_no_timer() {
        let view = DisplayView::compose(DisplayStatus::Recognizing, "", "", None, 12);
        assert_eq!(view.text, "Recognizing…");
        assert!(view.elapsed.is_none());
    }

    #[test]
    fn done_shows_final_text() {
        let view = DisplayView::compose(DisplayStatus::Done, "hel", "hello", None, 3);
        assert_eq!(view.text, "hello");
        assert_eq!(view.label, "Done");
        assert!(!view.cancellable);
    }

    #[test]
    fn error_falls_back_to_generic_message() {
        let view = DisplayView::compose(DisplayStatus::Error, "", "", None, 0);
        assert_eq!(view.text, "Connection failed");
        let view = DisplayView::compose(DisplayStatus::Error, "", "", Some("quota exceeded"), 0);
        assert_eq!(view.text, "quota exceeded");
    }

    #[test]
    fn polishing_prefers_final_text() {
        let view = DisplayView::compose(DisplayStatus::Polishing, "", "", None, 0);
        assert_eq!(view.text, "Polishing…");
        let view = DisplayView::compose(DisplayStatus::PolishError, "", "raw text", None, 0);
        assert_eq!(view.text, "raw text");
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(600), "10:00");
        assert_eq!(format_elapsed(6000), "100:00");
    }
}
