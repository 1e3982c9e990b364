//! Multicast value streams.
//!
//! A [`Subject`] fans every emitted value out to all live subscribers, in
//! emission order. Subscribers hold a [`Subscription`]; dropping it ends the
//! subscription and the subject forgets the subscriber on its next emission.

use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

#[derive(Debug)]
pub struct Subject<T> {
    inner: Mutex<Inner<T>>,
}

#[derive(Debug)]
struct Inner<T> {
    subscribers: Vec<UnboundedSender<T>>,
    /// Latest value, replayed to new subscribers. `None` for hot subjects.
    latest: Option<T>,
    replay: bool,
}

impl<T: Clone> Subject<T> {
    /// A hot subject: subscribers only see values emitted after subscribing.
    pub fn publish() -> Self {
        Self { inner: Mutex::new(Inner { subscribers: Vec::new(), latest: None, replay: false }) }
    }

    /// A subject that replays its latest value to each new subscriber.
    pub fn behavior(initial: T) -> Self {
        Self {
            inner: Mutex::new(Inner { subscribers: Vec::new(), latest: Some(initial), replay: true }),
        }
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        if let Some(latest) = &inner.latest {
            // Receiver is alive, send cannot fail.
            let _ = tx.send(latest.clone());
        }
        inner.subscribers.push(tx);
        Subscription { rx }
    }

    pub fn emit(&self, value: T) {
        let mut inner = self.lock();
        inner.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
        if inner.replay {
            inner.latest = Some(value);
        }
    }

    /// Latest value of a behavior subject
    pub fn value(&self) -> Option<T> {
        self.lock().latest.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.lock();
        inner.subscribers.retain(|tx| !tx.is_closed());
        inner.subscribers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Receiving end of a [`Subject`]
#[derive(Debug)]
pub struct Subscription<T> {
    rx: UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Wait for the next value. Returns `None` once the subject is dropped.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Next value if one is already queued
    pub fn try_next(&mut self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// All queued values, oldest first
    pub fn drain(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_does_not_replay() {
        let subject = Subject::publish();
        subject.emit(1);
        let mut sub = subject.subscribe();
        subject.emit(2);
        assert_eq!(sub.drain(), vec![2]);
    }

    #[test]
    fn test_behavior_replays_latest() {
        let subject = Subject::behavior(0);
        subject.emit(1);
        let mut sub = subject.subscribe();
        subject.emit(2);
        assert_eq!(sub.drain(), vec![1, 2]);
        assert_eq!(subject.value(), Some(2));
    }

    #[test]
    fn test_all_subscribers_see_same_order() {
        let subject = Subject::publish();
        let mut a = subject.subscribe();
        let mut b = subject.subscribe();
        for i in 0..5 {
            subject.emit(i);
        }
        assert_eq!(a.drain(), vec![0, 1, 2, 3, 4]);
        assert_eq!(b.drain(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let subject = Subject::publish();
        let sub = subject.subscribe();
        let _other = subject.subscribe();
        assert_eq!(subject.subscriber_count(), 2);

        drop(sub);
        subject.emit("x");
        assert_eq!(subject.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_next_ends_when_subject_dropped() {
        let subject = Subject::publish();
        let mut sub = subject.subscribe();
        subject.emit(7);
        drop(subject);
        assert_eq!(sub.next().await, Some(7));
        assert_eq!(sub.next().await, None);
    }
}
