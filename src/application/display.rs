//! Floating display state machine
//!
//! Mirrors the session on a small always-on-top surface. It runs beside the
//! controller rather than under it: it reads the same recognizer events,
//! applies its own generation filter, and takes explicit start/stop/cancel
//! instructions over the control bus.
//!
//! Showing is immediate. Hiding after a result is scheduled with a grace
//! delay and stamped with a token; anything that shows the window again bumps
//! the token, so a stale hide never fires on a window that should be visible.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::bus::Subscription;
use super::controller::EventOutcome;
use super::ports::DisplaySurface;
use crate::domain::action::{ControlAction, ControlMessage};
use crate::domain::display::{bottom_center, DisplayStatus, DisplayView};
use crate::domain::event::{EventEnvelope, RecognizerEvent};
use crate::domain::output::{OutputMode, OutputPolicy};
use crate::domain::recording::Duration;
use crate::domain::session::{Admission, Generation, SessionRegistry};

/// Display timing
#[derive(Debug, Clone, Copy)]
pub struct DisplayTiming {
    /// Grace period after a result
    pub hide_delay: StdDuration,
    /// Grace period after a failure
    pub error_hide_delay: StdDuration,
    /// Elapsed-time ticker period while recording
    pub tick: StdDuration,
}

impl DisplayTiming {
    pub fn new(hide_delay: Duration, error_hide_delay: Duration) -> Self {
        Self {
            hide_delay: hide_delay.as_std(),
            error_hide_delay: error_hide_delay.as_std(),
            ..Self::default()
        }
    }
}

impl Default for DisplayTiming {
    fn default() -> Self {
        Self {
            hide_delay: Duration::default_hide_delay().as_std(),
            error_hide_delay: Duration::default_error_hide_delay().as_std(),
            tick: StdDuration::from_secs(1),
        }
    }
}

#[derive(Debug, Default)]
struct DisplayState {
    registry: SessionRegistry,
    status: DisplayStatus,
    partial_text: String,
    final_text: String,
    error: Option<String>,
    elapsed: StdDuration,
    policy: OutputPolicy,
    visible: bool,
    hide_token: u64,
    ticker_token: u64,
    ticking: bool,
}

impl DisplayState {
    fn reset(&mut self) {
        self.partial_text.clear();
        self.final_text.clear();
        self.error = None;
        self.elapsed = StdDuration::ZERO;
    }

    fn view(&self) -> DisplayView {
        DisplayView::compose(
            self.status,
            &self.partial_text,
            &self.final_text,
            self.error.as_deref(),
            self.elapsed.as_secs(),
        )
    }
}

/// Floating indicator driven by recognizer events and control messages
pub struct FloatingDisplay<D: DisplaySurface> {
    state: Arc<Mutex<DisplayState>>,
    surface: Arc<D>,
    timing: DisplayTiming,
}

impl<D: DisplaySurface> Clone for FloatingDisplay<D> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            surface: Arc::clone(&self.surface),
            timing: self.timing,
        }
    }
}

impl<D: DisplaySurface> FloatingDisplay<D> {
    pub fn new(surface: D, timing: DisplayTiming) -> Self {
        Self {
            state: Arc::new(Mutex::new(DisplayState::default())),
            surface: Arc::new(surface),
            timing,
        }
    }

    pub async fn status(&self) -> DisplayStatus {
        self.state.lock().await.status
    }

    pub async fn view(&self) -> DisplayView {
        self.state.lock().await.view()
    }

    pub async fn is_visible(&self) -> bool {
        self.state.lock().await.visible
    }

    /// Output hints received with the last start instruction
    pub async fn output_hints(&self) -> (OutputMode, bool) {
        let state = self.state.lock().await;
        (state.policy.mode, state.policy.auto_output)
    }

    pub async fn elapsed(&self) -> StdDuration {
        self.state.lock().await.elapsed
    }

    /// Session the display currently tracks
    pub async fn generation(&self) -> Generation {
        self.state.lock().await.registry.current()
    }

    /// Apply an instruction from the controller
    pub async fn handle_control(&self, message: &ControlMessage) {
        let mut state = self.state.lock().await;
        match message.action {
            ControlAction::Start => {
                let reset = match message.generation {
                    Some(generation) => match state.registry.accept(generation) {
                        Admission::Stale | Admission::Cancelled => {
                            debug!(%generation, "Ignoring start for an inactive session");
                            return;
                        }
                        Admission::Opened => true,
                        Admission::Current => state.status.is_settling(),
                    },
                    None => true,
                };
                if let Some(mode) = message.output_mode {
                    state.policy.mode = mode;
                }
                if let Some(auto_output) = message.auto_output {
                    state.policy.auto_output = auto_output;
                }
                if reset {
                    state.reset();
                }
                state.status = DisplayStatus::Recording;
                self.show(&mut state);
                self.start_ticker(&mut state);
            }
            ControlAction::Stop => {
                if let Some(generation) = message.generation {
                    if !state.registry.is_live(generation) {
                        debug!(%generation, "Ignoring stop for an inactive session");
                        return;
                    }
                }
                Self::stop_ticker(&mut state);
                if state.status == DisplayStatus::Recording {
                    state.status = DisplayStatus::Recognizing;
                }
            }
            ControlAction::Cancel => {
                if let Some(generation) = message.generation {
                    if generation < state.registry.current() {
                        debug!(%generation, "Ignoring cancel for a superseded session");
                        return;
                    }
                    state.registry.accept(generation);
                }
                let cancelled = state.registry.cancel();
                debug!(generation = %cancelled, "Display session cancelled");
                state.status = DisplayStatus::Idle;
                self.hide_now(&mut state);
            }
        }
        self.render(&state);
    }

    /// Apply one recognizer event
    pub async fn handle_event(&self, envelope: &EventEnvelope) -> EventOutcome {
        let generation = envelope.generation;
        let mut state = self.state.lock().await;
        match state.registry.accept(generation) {
            Admission::Stale | Admission::Cancelled => return EventOutcome::Ignored,
            Admission::Opened => state.reset(),
            Admission::Current => {}
        }

        let outcome = match &envelope.event {
            RecognizerEvent::Connected => {
                if matches!(state.status, DisplayStatus::Idle | DisplayStatus::Recording) {
                    self.begin_recording(&mut state);
                    EventOutcome::Applied
                } else {
                    EventOutcome::Ignored
                }
            }
            RecognizerEvent::PartialResult(text) => {
                state.partial_text.clone_from(text);
                if state.status == DisplayStatus::Idle {
                    self.begin_recording(&mut state);
                }
                EventOutcome::Applied
            }
            RecognizerEvent::FinalResult(text) => {
                state.final_text.clone_from(text);
                state.status = DisplayStatus::Done;
                self.settle(&mut state);
                EventOutcome::Applied
            }
            RecognizerEvent::Disconnected => {
                if state.status.is_cancellable() {
                    state.final_text = state.partial_text.clone();
                    state.status = DisplayStatus::Done;
                    self.settle(&mut state);
                    EventOutcome::Applied
                } else {
                    EventOutcome::Ignored
                }
            }
            RecognizerEvent::Error(detail) => {
                state.error = Some(detail.clone()).filter(|d| !d.is_empty());
                state.status = DisplayStatus::Error;
                self.show(&mut state);
                self.settle(&mut state);
                EventOutcome::Applied
            }
            RecognizerEvent::Finished => {
                Self::stop_ticker(&mut state);
                if !state.status.is_settling() && state.status != DisplayStatus::Polishing {
                    state.status = DisplayStatus::Idle;
                    self.hide_now(&mut state);
                }
                EventOutcome::Applied
            }
            RecognizerEvent::Polishing(text) => {
                state.final_text.clone_from(text);
                state.status = DisplayStatus::Polishing;
                self.show(&mut state);
                EventOutcome::Applied
            }
            RecognizerEvent::PolishResult(text) => {
                state.final_text.clone_from(text);
                state.status = DisplayStatus::Done;
                self.settle(&mut state);
                EventOutcome::Applied
            }
            RecognizerEvent::PolishError => {
                state.status = DisplayStatus::PolishError;
                self.settle(&mut state);
                EventOutcome::Applied
            }
            RecognizerEvent::Ignored => EventOutcome::Ignored,
        };

        self.render(&state);
        if envelope.event.ends_session() {
            EventOutcome::SessionEnded
        } else {
            outcome
        }
    }

    /// Hide right away. Hiding a hidden window does nothing.
    pub async fn hide(&self) -> bool {
        let mut state = self.state.lock().await;
        state.status = DisplayStatus::Idle;
        self.hide_now(&mut state)
    }

    /// Consume control messages and recognizer events until both
    /// subscriptions end. The event subscription is renewed after every
    /// session.
    pub async fn run(
        &self,
        mut events: Subscription<EventEnvelope>,
        mut control: Subscription<ControlMessage>,
    ) {
        loop {
            tokio::select! {
                Some(message) = control.recv() => self.handle_control(&message).await,
                Some(envelope) = events.recv() => {
                    if self.handle_event(&envelope).await == EventOutcome::SessionEnded {
                        let ended = self.generation().await;
                        events.renew_keeping(|queued| queued.generation > ended);
                    }
                }
                else => break,
            }
        }
        events.unsubscribe();
        control.unsubscribe();
        self.hide().await;
    }

    fn begin_recording(&self, state: &mut DisplayState) {
        state.status = DisplayStatus::Recording;
        self.show(state);
        if !state.ticking {
            self.start_ticker(state);
        }
    }

    /// Enter a terminal state: stop the clock and schedule the grace hide
    fn settle(&self, state: &mut DisplayState) {
        Self::stop_ticker(state);
        let delay = if state.status.is_failure() {
            self.timing.error_hide_delay
        } else {
            self.timing.hide_delay
        };
        self.schedule_hide(state, delay);
    }

    fn show(&self, state: &mut DisplayState) {
        state.hide_token = state.hide_token.wrapping_add(1);
        if state.visible {
            return;
        }
        let position = self.surface.monitor().map(|monitor| bottom_center(&monitor));
        match self.surface.show_at(position) {
            Ok(()) => state.visible = true,
            Err(e) => warn!(error = %e, "Failed to show floating display"),
        }
    }

    fn hide_now(&self, state: &mut DisplayState) -> bool {
        state.hide_token = state.hide_token.wrapping_add(1);
        Self::stop_ticker(state);
        if !state.visible {
            return false;
        }
        state.visible = false;
        if let Err(e) = self.surface.hide() {
            warn!(error = %e, "Failed to hide floating display");
        }
        true
    }

    fn schedule_hide(&self, state: &mut DisplayState, delay: StdDuration) {
        state.hide_token = state.hide_token.wrapping_add(1);
        let token = state.hide_token;
        let display = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = display.state.lock().await;
            if state.hide_token != token {
                return;
            }
            state.status = DisplayStatus::Idle;
            display.hide_now(&mut state);
        });
    }

    fn start_ticker(&self, state: &mut DisplayState) {
        state.ticker_token = state.ticker_token.wrapping_add(1);
        state.ticking = true;
        state.elapsed = StdDuration::ZERO;
        let token = state.ticker_token;
        let tick = self.timing.tick;
        let display = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tick).await;
                let mut state = display.state.lock().await;
                if state.ticker_token != token || state.status != DisplayStatus::Recording {
                    return;
                }
                state.elapsed += tick;
                display.render(&state);
            }
        });
    }

    fn stop_ticker(state: &mut DisplayState) {
        state.ticker_token = state.ticker_token.wrapping_add(1);
        state.ticking = false;
    }

    fn render(&self, state: &DisplayState) {
        if !state.visible {
            return;
        }
        if let Err(e) = self.surface.render(&state.view()) {
            warn!(error = %e, "Failed to render floating display");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::bus::{ControlBus, EventBus};
    use crate::application::ports::DisplayError;
    use crate::domain::display::{LogicalPosition, MonitorGeometry};
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct SurfaceLog {
        shows: Vec<Option<LogicalPosition>>,
        hides: usize,
        views: Vec<DisplayView>,
    }

    #[derive(Clone, Default)]
    struct MockSurface {
        log: Arc<StdMutex<SurfaceLog>>,
        monitor: Option<MonitorGeometry>,
    }

    impl MockSurface {
        fn shows(&self) -> usize {
            self.log.lock().unwrap().shows.len()
        }

        fn hides(&self) -> usize {
            self.log.lock().unwrap().hides
        }

        fn last_view(&self) -> Option<DisplayView> {
            self.log.lock().unwrap().views.last().cloned()
        }
    }

    impl DisplaySurface for MockSurface {
        fn monitor(&self) -> Option<MonitorGeometry> {
            self.monitor
        }

        fn show_at(&self, position: Option<LogicalPosition>) -> Result<(), DisplayError> {
            self.log.lock().unwrap().shows.push(position);
            Ok(())
        }

        fn hide(&self) -> Result<(), DisplayError> {
            self.log.lock().unwrap().hides += 1;
            Ok(())
        }

        fn render(&self, view: &DisplayView) -> Result<(), DisplayError> {
            self.log.lock().unwrap().views.push(view.clone());
            Ok(())
        }
    }

    const HIDE_MS: u64 = 60;
    const ERROR_HIDE_MS: u64 = 240;

    fn timing() -> DisplayTiming {
        DisplayTiming {
            hide_delay: StdDuration::from_millis(HIDE_MS),
            error_hide_delay: StdDuration::from_millis(ERROR_HIDE_MS),
            tick: StdDuration::from_millis(20),
        }
    }

    fn display() -> (FloatingDisplay<MockSurface>, MockSurface) {
        let surface = MockSurface::default();
        (FloatingDisplay::new(surface.clone(), timing()), surface)
    }

    fn start(generation: u64) -> ControlMessage {
        ControlMessage::start(Generation::new(generation), OutputMode::Clipboard, true)
    }

    fn event(generation: u64, event: RecognizerEvent) -> EventEnvelope {
        EventEnvelope::new(Generation::new(generation), event)
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(StdDuration::from_millis(ms)).await;
    }

    #[tokio::test]
    async fn start_shows_at_bottom_center() {
        let surface = MockSurface {
            monitor: Some(MonitorGeometry::new(1920, 1080, 1.0)),
            ..Default::default()
        };
        let display = FloatingDisplay::new(surface.clone(), timing());

        display
            .handle_control(&ControlMessage::start(
                Generation::new(1),
                OutputMode::SimulateKeyboard,
                false,
            ))
            .await;

        assert_eq!(display.status().await, DisplayStatus::Recording);
        assert_eq!(
            surface.log.lock().unwrap().shows,
            vec![Some(LogicalPosition { x: 810, y: 968 })]
        );
        assert_eq!(surface.last_view().unwrap().text, "Listening…");
        assert_eq!(
            display.output_hints().await,
            (OutputMode::SimulateKeyboard, false)
        );
    }

    #[tokio::test]
    async fn result_hides_after_grace_delay() {
        let (display, surface) = display();
        display.handle_control(&start(1)).await;
        display.handle_control(&ControlMessage::stop(Generation::new(1))).await;
        assert_eq!(display.status().await, DisplayStatus::Recognizing);

        display
            .handle_event(&event(1, RecognizerEvent::FinalResult("hello".into())))
            .await;
        assert_eq!(display.status().await, DisplayStatus::Done);
        assert_eq!(display.view().await.text, "hello");
        assert!(display.is_visible().await);

        sleep_ms(HIDE_MS * 3).await;
        assert!(!display.is_visible().await);
        assert_eq!(display.status().await, DisplayStatus::Idle);
        assert_eq!(surface.hides(), 1);
    }

    #[tokio::test]
    async fn finished_keeps_grace_window() {
        let (display, surface) = display();
        display.handle_control(&start(1)).await;
        display
            .handle_event(&event(1, RecognizerEvent::FinalResult("hello".into())))
            .await;
        let outcome = display.handle_event(&event(1, RecognizerEvent::Finished)).await;

        assert_eq!(outcome, EventOutcome::SessionEnded);
        assert!(display.is_visible().await);
        sleep_ms(HIDE_MS * 3).await;
        assert_eq!(surface.hides(), 1);
    }

    #[tokio::test]
    async fn finished_without_result_hides_at_once() {
        let (display, surface) = display();
        display.handle_control(&start(1)).await;
        display.handle_event(&event(1, RecognizerEvent::Finished)).await;

        assert!(!display.is_visible().await);
        assert_eq!(surface.hides(), 1);
    }

    #[tokio::test]
    async fn restart_during_grace_delay_keeps_window() {
        let (display, surface) = display();
        display.handle_control(&start(1)).await;
        display
            .handle_event(&event(1, RecognizerEvent::FinalResult("first".into())))
            .await;

        sleep_ms(HIDE_MS / 3).await;
        display.handle_control(&start(2)).await;
        sleep_ms(HIDE_MS * 3).await;

        assert!(display.is_visible().await);
        assert_eq!(display.status().await, DisplayStatus::Recording);
        assert_eq!(display.view().await.text, "Listening…");
        assert_eq!(surface.hides(), 0);
        assert_eq!(surface.shows(), 1);
    }

    #[tokio::test]
    async fn error_stays_longer_than_result() {
        let (display, _surface) = display();
        display.handle_control(&start(1)).await;
        display
            .handle_event(&event(1, RecognizerEvent::Error(String::new())))
            .await;
        assert_eq!(display.view().await.text, "Connection failed");

        sleep_ms(HIDE_MS * 2).await;
        assert!(display.is_visible().await);
        assert_eq!(display.status().await, DisplayStatus::Error);

        sleep_ms(ERROR_HIDE_MS * 2).await;
        assert!(!display.is_visible().await);
    }

    #[tokio::test]
    async fn cancel_hides_and_drops_later_events() {
        let (display, surface) = display();
        display.handle_control(&start(1)).await;
        display
            .handle_control(&ControlMessage::cancel(Generation::new(1)))
            .await;

        assert!(!display.is_visible().await);
        assert_eq!(surface.hides(), 1);

        let outcome = display
            .handle_event(&event(1, RecognizerEvent::FinalResult("late".into())))
            .await;
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(display.status().await, DisplayStatus::Idle);
        assert_eq!(surface.shows(), 1);
    }

    #[tokio::test]
    async fn stale_cancel_does_not_hide_newer_session() {
        let (display, _surface) = display();
        display.handle_control(&start(1)).await;
        display.handle_control(&start(2)).await;
        display
            .handle_control(&ControlMessage::cancel(Generation::new(1)))
            .await;

        assert!(display.is_visible().await);
        assert_eq!(display.status().await, DisplayStatus::Recording);
    }

    #[tokio::test]
    async fn hide_is_idempotent() {
        let (display, surface) = display();
        display.handle_control(&start(1)).await;

        assert!(display.hide().await);
        assert!(!display.hide().await);
        assert_eq!(surface.hides(), 1);
    }

    #[tokio::test]
    async fn disconnect_promotes_partial_text() {
        let (display, _surface) = display();
        display.handle_control(&start(1)).await;
        display
            .handle_event(&event(1, RecognizerEvent::PartialResult("hello".into())))
            .await;
        display.handle_event(&event(1, RecognizerEvent::Disconnected)).await;

        assert_eq!(display.status().await, DisplayStatus::Done);
        assert_eq!(display.view().await.text, "hello");
    }

    #[tokio::test]
    async fn events_of_older_session_are_ignored() {
        let (display, _surface) = display();
        display.handle_control(&start(2)).await;

        let outcome = display
            .handle_event(&event(1, RecognizerEvent::PartialResult("old".into())))
            .await;

        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(display.view().await.text, "Listening…");
    }

    #[tokio::test]
    async fn events_alone_open_a_session() {
        let (display, surface) = display();
        display.handle_event(&event(4, RecognizerEvent::Connected)).await;

        assert_eq!(display.generation().await, Generation::new(4));
        assert_eq!(display.status().await, DisplayStatus::Recording);
        assert_eq!(surface.shows(), 1);
    }

    #[tokio::test]
    async fn ticker_runs_only_while_recording() {
        let (display, _surface) = display();
        display.handle_control(&start(1)).await;
        sleep_ms(110).await;
        let recorded = display.elapsed().await;
        assert!(recorded >= StdDuration::from_millis(40));

        display.handle_control(&ControlMessage::stop(Generation::new(1))).await;
        sleep_ms(80).await;
        assert_eq!(display.elapsed().await, recorded);
    }

    #[tokio::test]
    async fn polishing_holds_the_window_open() {
        let (display, _surface) = display();
        display.handle_control(&start(1)).await;
        display
            .handle_event(&event(1, RecognizerEvent::FinalResult("raw".into())))
            .await;
        display
            .handle_event(&event(1, RecognizerEvent::Polishing("raw".into())))
            .await;
        display.handle_event(&event(1, RecognizerEvent::Finished)).await;

        sleep_ms(HIDE_MS * 3).await;
        assert_eq!(display.status().await, DisplayStatus::Polishing);
        assert!(display.is_visible().await);

        display
            .handle_event(&event(1, RecognizerEvent::PolishResult("Polished.".into())))
            .await;
        assert_eq!(display.view().await.text, "Polished.");
        sleep_ms(HIDE_MS * 3).await;
        assert!(!display.is_visible().await);
    }

    #[tokio::test]
    async fn polish_error_keeps_unpolished_text() {
        let (display, _surface) = display();
        display.handle_control(&start(1)).await;
        display
            .handle_event(&event(1, RecognizerEvent::Polishing("raw".into())))
            .await;
        display.handle_event(&event(1, RecognizerEvent::PolishError)).await;

        assert_eq!(display.status().await, DisplayStatus::PolishError);
        assert_eq!(display.view().await.text, "raw");
    }

    #[tokio::test]
    async fn run_follows_both_buses() {
        let (display, surface) = display();
        let events = EventBus::default();
        let control = ControlBus::default();
        let runner = {
            let display = display.clone();
            let events = events.subscribe();
            let control = control.subscribe();
            tokio::spawn(async move { display.run(events, control).await })
        };

        control.publish(start(1));
        sleep_ms(20).await;
        events.publish(event(1, RecognizerEvent::PartialResult("hi".into())));
        sleep_ms(20).await;

        assert_eq!(display.view().await.text, "hi");
        assert_eq!(surface.shows(), 1);
        runner.abort();
    }

    #[tokio::test]
    async fn run_keeps_events_of_next_session_queued_behind_finish() {
        let (display, _surface) = display();
        let events = EventBus::default();
        let control = ControlBus::default();
        let runner = {
            let display = display.clone();
            let events = events.subscribe();
            let control = control.subscribe();
            tokio::spawn(async move { display.run(events, control).await })
        };

        control.publish(start(1));
        sleep_ms(20).await;
        events.publish(event(1, RecognizerEvent::Finished));
        events.publish(event(2, RecognizerEvent::PartialResult("next".into())));
        sleep_ms(20).await;

        assert_eq!(display.generation().await, Generation::new(2));
        assert_eq!(display.view().await.text, "next");
        runner.abort();
    }
}
