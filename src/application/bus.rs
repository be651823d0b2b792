//! In-process broadcast bus with owned, renewable subscriptions
//!
//! One bus carries recognizer events, another carries display control
//! messages. Every consumer holds its own [`Subscription`]; dropping or
//! unsubscribing it never affects the others.

use std::collections::VecDeque;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::warn;

use crate::domain::action::ControlMessage;
use crate::domain::event::EventEnvelope;

/// Default number of buffered messages per subscriber
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Recognizer event bus
pub type EventBus = Bus<EventEnvelope>;

/// Display control bus
pub type ControlBus = Bus<ControlMessage>;

/// Broadcast bus
#[derive(Debug, Clone)]
pub struct Bus<T: Clone> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone> Bus<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Deliver `message` to every live subscription. Returns how many received it.
    pub fn publish(&self, message: T) -> usize {
        self.sender.send(message).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            sender: self.sender.clone(),
            receiver: Some(self.sender.subscribe()),
            pending: VecDeque::new(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone> Default for Bus<T> {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

/// A consumer's handle on a bus
#[derive(Debug)]
pub struct Subscription<T: Clone> {
    sender: broadcast::Sender<T>,
    receiver: Option<broadcast::Receiver<T>>,
    /// Backlog kept across a renew, served before the receiver
    pending: VecDeque<T>,
}

impl<T: Clone> Subscription<T> {
    /// Next message, or None once unsubscribed.
    ///
    /// A subscriber that falls behind skips the messages it missed.
    pub async fn recv(&mut self) -> Option<T> {
        let receiver = self.receiver.as_mut()?;
        if let Some(message) = self.pending.pop_front() {
            return Some(message);
        }
        loop {
            match receiver.recv().await {
                Ok(message) => return Some(message),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Subscriber lagged behind the bus");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }

    /// Stop receiving. Returns false when already unsubscribed.
    pub fn unsubscribe(&mut self) -> bool {
        self.pending.clear();
        self.receiver.take().is_some()
    }

    /// Drop whatever is buffered and listen from now on
    pub fn renew(&mut self) {
        self.renew_keeping(|_| false);
    }

    /// Drop the buffered messages `keep` rejects and listen from now on.
    /// Kept messages are delivered first, in order.
    pub fn renew_keeping(&mut self, keep: impl Fn(&T) -> bool) {
        let mut kept: VecDeque<T> = self.pending.drain(..).filter(|m| keep(m)).collect();
        match self.receiver.as_mut() {
            Some(receiver) => loop {
                match receiver.try_recv() {
                    Ok(message) => {
                        if keep(&message) {
                            kept.push_back(message);
                        }
                    }
                    Err(TryRecvError::Lagged(skipped)) => {
                        warn!(skipped, "Subscriber lagged behind the bus");
                    }
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                }
            },
            None => self.receiver = Some(self.sender.subscribe()),
        }
        self.pending = kept;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_receives() {
        let bus: Bus<u32> = Bus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(7), 2);
        assert_eq!(a.recv().await, Some(7));
        assert_eq!(b.recv().await, Some(7));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_harmless() {
        let bus: Bus<u32> = Bus::new(8);
        assert_eq!(bus.publish(1), 0);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let bus: Bus<u32> = Bus::new(8);
        let mut subscription = bus.subscribe();

        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        assert!(!subscription.is_active());
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(subscription.recv().await, None);
    }

    #[tokio::test]
    async fn renew_discards_backlog() {
        let bus: Bus<u32> = Bus::new(8);
        let mut subscription = bus.subscribe();
        bus.publish(1);
        bus.publish(2);

        subscription.renew();
        bus.publish(3);

        assert_eq!(subscription.recv().await, Some(3));
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn renew_keeping_retains_selected_backlog() {
        let bus: Bus<u32> = Bus::new(8);
        let mut subscription = bus.subscribe();
        for n in [1, 5, 2, 6] {
            bus.publish(n);
        }

        subscription.renew_keeping(|n| *n > 4);
        bus.publish(7);

        assert_eq!(subscription.recv().await, Some(5));
        assert_eq!(subscription.recv().await, Some(6));
        assert_eq!(subscription.recv().await, Some(7));
    }

    #[tokio::test]
    async fn renew_after_unsubscribe_reactivates() {
        let bus: Bus<u32> = Bus::new(8);
        let mut subscription = bus.subscribe();
        subscription.unsubscribe();
        subscription.renew();
        bus.publish(4);
        assert_eq!(subscription.recv().await, Some(4));
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_ahead() {
        let bus: Bus<u32> = Bus::new(2);
        let mut subscription = bus.subscribe();
        for n in 0..5 {
            bus.publish(n);
        }
        assert_eq!(subscription.recv().await, Some(3));
        assert_eq!(subscription.recv().await, Some(4));
    }
}
