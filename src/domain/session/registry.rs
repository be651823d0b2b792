//! Session registry: the generation space and the cancellation marker
//!
//! Every recognizer event carries the generation of the session that produced
//! it. The registry decides whether such an event still matters:
//!
//! - `generation < current` is stale and dropped
//! - `generation == cancelled` is dropped
//! - `generation > current` opens a new session; the caller resets its local state
//!
//! Generations are issued by [`SessionRegistry::begin_local`] on the component
//! that starts sessions and handed to the recognizer, which echoes them back on
//! every event. Components that only observe the stream (the floating display)
//! learn new generations through [`SessionRegistry::accept`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic identifier of one recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// The generation before any session
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The generation directly after this one
    pub const fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Verdict for an incoming event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Belongs to the session in progress
    Current,
    /// First event of a newer session; local state must be reset first
    Opened,
    /// Belongs to a superseded session
    Stale,
    /// Belongs to a cancelled session
    Cancelled,
}

impl Admission {
    /// Whether the event should be processed
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Current | Self::Opened)
    }
}

/// Generation bookkeeping for one component
#[derive(Debug, Default, Clone)]
pub struct SessionRegistry {
    current: Generation,
    cancelled: Option<Generation>,
}

impl SessionRegistry {
    /// Create a registry that has seen no session yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest generation seen or issued
    pub fn current(&self) -> Generation {
        self.current
    }

    /// Last generation explicitly cancelled
    pub fn cancelled(&self) -> Option<Generation> {
        self.cancelled
    }

    /// Whether `generation` was cancelled
    pub fn is_cancelled(&self, generation: Generation) -> bool {
        self.cancelled == Some(generation)
    }

    /// Whether `generation` is still the live, uncancelled session
    pub fn is_live(&self, generation: Generation) -> bool {
        generation == self.current && !self.is_cancelled(generation)
    }

    /// Allocate the generation for a session started on this side.
    ///
    /// Everything issued before becomes stale immediately, so late events from
    /// a previous session can no longer reach the new one.
    pub fn begin_local(&mut self) -> Generation {
        self.current = self.current.next();
        self.current
    }

    /// Decide whether an event tagged with `generation` is processed
    pub fn accept(&mut self, generation: Generation) -> Admission {
        if generation < self.current {
            return Admission::Stale;
        }
        if self.is_cancelled(generation) {
            return Admission::Cancelled;
        }
        if generation > self.current {
            self.current = generation;
            return Admission::Opened;
        }
        Admission::Current
    }

    /// Mark the current generation cancelled; its later events become inert
    pub fn cancel(&mut self) -> Generation {
        self.cancelled = Some(self.current);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_starts_at_zero() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.current(), Generation::ZERO);
        assert!(registry.cancelled().is_none());
    }

    #[test]
    fn begin_local_is_monotonic() {
        let mut registry = SessionRegistry::new();
        let first = registry.begin_local();
        let second = registry.begin_local();
        assert!(second > first);
        assert_eq!(registry.current(), second);
    }

    #[test]
    fn accept_current_generation() {
        let mut registry = SessionRegistry::new();
        let g = registry.begin_local();
        assert_eq!(registry.accept(g), Admission::Current);
    }

    #[test]
    fn older_generation_is_stale() {
        let mut registry = SessionRegistry::new();
        let old = registry.begin_local();
        registry.begin_local();
        assert_eq!(registry.accept(old), Admission::Stale);
        assert!(!registry.accept(old).is_accepted());
    }

    #[test]
    fn newer_generation_opens_session() {
        let mut registry = SessionRegistry::new();
        registry.begin_local();
        assert_eq!(registry.accept(Generation::new(7)), Admission::Opened);
        assert_eq!(registry.current(), Generation::new(7));
        assert_eq!(registry.accept(Generation::new(7)), Admission::Current);
    }

    #[test]
    fn cancelled_generation_is_dropped() {
        let mut registry = SessionRegistry::new();
        let g = registry.begin_local();
        assert_eq!(registry.cancel(), g);
        assert_eq!(registry.accept(g), Admission::Cancelled);
        assert!(!registry.is_live(g));
    }

    #[test]
    fn cancel_does_not_affect_next_session() {
        let mut registry = SessionRegistry::new();
        registry.begin_local();
        registry.cancel();
        let next = registry.begin_local();
        assert_eq!(registry.accept(next), Admission::Current);
        assert!(registry.is_live(next));
    }

    #[test]
    fn observer_learns_generations_from_events() {
        let mut registry = SessionRegistry::new();
        assert_eq!(registry.accept(Generation::new(3)), Admission::Opened);
        registry.cancel();
        assert_eq!(registry.accept(Generation::new(3)), Admission::Cancelled);
        assert_eq!(registry.accept(Generation::new(2)), Admission::Stale);
        assert_eq!(registry.accept(Generation::new(4)), Admission::Opened);
    }
}
