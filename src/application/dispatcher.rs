//! Output dispatcher: at most one write per session

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::ports::{OutputError, OutputSink};
use crate::domain::output::OutputPolicy;
use crate::domain::session::Generation;

/// What `commit` did with the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Written to the sink
    Written,
    /// Auto-output is off; kept for a manual copy
    Held,
    /// The session was cancelled
    SkippedCancelled,
    /// This session already committed
    SkippedDuplicate,
    /// Nothing to write
    Empty,
    /// The sink failed; the commitment stands
    Failed,
}

#[derive(Debug, Default)]
struct Ledger {
    cancelled: Option<Generation>,
    committed: Option<Generation>,
    last_text: Option<String>,
}

/// Writes recognized text to the sink, once per generation.
///
/// The commitment is recorded before the sink is touched and never rolled
/// back, so a failing sink cannot cause a second write.
pub struct OutputDispatcher<S: OutputSink> {
    sink: S,
    policy: OutputPolicy,
    ledger: Mutex<Ledger>,
}

impl<S: OutputSink> OutputDispatcher<S> {
    pub fn new(sink: S, policy: OutputPolicy) -> Self {
        Self {
            sink,
            policy,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    pub fn policy(&self) -> OutputPolicy {
        self.policy
    }

    /// No text of `generation` may reach the sink after this
    pub async fn mark_cancelled(&self, generation: Generation) {
        self.ledger.lock().await.cancelled = Some(generation);
    }

    pub async fn commit(&self, generation: Generation, text: &str) -> CommitOutcome {
        {
            let mut ledger = self.ledger.lock().await;
            if ledger.cancelled == Some(generation) {
                debug!(%generation, "Skipping output of cancelled session");
                return CommitOutcome::SkippedCancelled;
            }
            if ledger.committed.is_some_and(|committed| committed >= generation) {
                debug!(%generation, "Output already committed");
                return CommitOutcome::SkippedDuplicate;
            }
            if text.is_empty() {
                debug!(%generation, "Recognized text is empty, nothing to output");
                return CommitOutcome::Empty;
            }
            ledger.committed = Some(generation);
            ledger.last_text = Some(text.to_string());
        }

        if !self.policy.auto_output {
            info!(%generation, chars = text.chars().count(), "Auto-output off, text held for copy");
            return CommitOutcome::Held;
        }

        match self.sink.commit_text(text, self.policy.mode).await {
            Ok(()) => {
                info!(%generation, mode = %self.policy.mode, chars = text.chars().count(), "Text committed");
                CommitOutcome::Written
            }
            Err(e) => {
                error!(%generation, error = %e, "Failed to output text");
                CommitOutcome::Failed
            }
        }
    }

    /// Most recently committed or held text
    pub async fn last_text(&self) -> Option<String> {
        self.ledger.lock().await.last_text.clone()
    }

    /// Copy the most recent text to the clipboard on demand
    pub async fn copy_available(&self) -> Result<String, OutputError> {
        let text = self.last_text().await.ok_or(OutputError::NothingToCopy)?;
        self.sink.copy_text(&text).await?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ClipboardError;
    use crate::domain::output::OutputMode;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Clone, Default)]
    struct RecordingSink {
        writes: Arc<StdMutex<Vec<(String, OutputMode)>>>,
        copies: Arc<StdMutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl OutputSink for RecordingSink {
        async fn commit_text(&self, text: &str, mode: OutputMode) -> Result<(), OutputError> {
            self.writes.lock().unwrap().push((text.to_string(), mode));
            if self.fail {
                return Err(ClipboardError::CopyFailed("no display".to_string()).into());
            }
            Ok(())
        }

        async fn copy_text(&self, text: &str) -> Result<(), OutputError> {
            self.copies.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn dispatcher(sink: RecordingSink, auto_output: bool) -> OutputDispatcher<RecordingSink> {
        OutputDispatcher::new(
            sink,
            OutputPolicy {
                mode: OutputMode::Clipboard,
                auto_output,
            },
        )
    }

    #[tokio::test]
    async fn writes_once_per_generation() {
        let sink = RecordingSink::default();
        let dispatcher = dispatcher(sink.clone(), true);
        let g = Generation::new(1);

        assert_eq!(dispatcher.commit(g, "hello").await, CommitOutcome::Written);
        assert_eq!(dispatcher.commit(g, "hello again").await, CommitOutcome::SkippedDuplicate);
        assert_eq!(sink.writes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn older_generation_cannot_write_after_newer() {
        let sink = RecordingSink::default();
        let dispatcher = dispatcher(sink.clone(), true);

        dispatcher.commit(Generation::new(3), "new").await;
        assert_eq!(
            dispatcher.commit(Generation::new(2), "old").await,
            CommitOutcome::SkippedDuplicate
        );
        assert_eq!(sink.writes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_generation_never_writes() {
        let sink = RecordingSink::default();
        let dispatcher = dispatcher(sink.clone(), true);
        let g = Generation::new(1);

        dispatcher.mark_cancelled(g).await;
        assert_eq!(dispatcher.commit(g, "hello").await, CommitOutcome::SkippedCancelled);
        assert!(sink.writes.lock().unwrap().is_empty());

        assert_eq!(
            dispatcher.commit(Generation::new(2), "next").await,
            CommitOutcome::Written
        );
    }

    #[tokio::test]
    async fn failed_write_is_not_retried() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let dispatcher = dispatcher(sink.clone(), true);
        let g = Generation::new(1);

        assert_eq!(dispatcher.commit(g, "hello").await, CommitOutcome::Failed);
        assert_eq!(dispatcher.commit(g, "hello").await, CommitOutcome::SkippedDuplicate);
        assert_eq!(sink.writes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_text_is_not_committed() {
        let sink = RecordingSink::default();
        let dispatcher = dispatcher(sink.clone(), true);
        let g = Generation::new(1);

        assert_eq!(dispatcher.commit(g, "").await, CommitOutcome::Empty);
        assert_eq!(dispatcher.commit(g, "late").await, CommitOutcome::Written);
    }

    #[tokio::test]
    async fn auto_output_off_holds_text_for_copy() {
        let sink = RecordingSink::default();
        let dispatcher = dispatcher(sink.clone(), false);

        assert_eq!(
            dispatcher.commit(Generation::new(1), "held").await,
            CommitOutcome::Held
        );
        assert!(sink.writes.lock().unwrap().is_empty());

        assert_eq!(dispatcher.copy_available().await.unwrap(), "held");
        assert_eq!(*sink.copies.lock().unwrap(), vec!["held".to_string()]);
    }

    #[tokio::test]
    async fn copy_without_text_fails() {
        let dispatcher = dispatcher(RecordingSink::default(), false);
        assert!(matches!(
            dispatcher.copy_available().await,
            Err(OutputError::NothingToCopy)
        ));
    }
}
