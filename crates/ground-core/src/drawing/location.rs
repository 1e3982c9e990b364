//! Location lock: follows the device position until the user drags the map.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::ports::{BooleanOrError, LocationManager};

/// Tint of the location lock button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconTint {
    MapBlue,
    Grey800,
}

impl From<&BooleanOrError> for IconTint {
    fn from(state: &BooleanOrError) -> Self {
        if state.is_true() {
            IconTint::MapBlue
        } else {
            IconTint::Grey800
        }
    }
}

/// Handle to a background task that forwards lock intents to a
/// [`LocationManager`].
///
/// Only the most recent intent matters: a different request supersedes one
/// that is still in flight, while a repeated one is absorbed by it.
#[derive(Debug, Clone)]
pub struct LocationLock {
    requests: mpsc::UnboundedSender<bool>,
    state: watch::Receiver<BooleanOrError>,
}

impl LocationLock {
    /// Spawn the lock task on the current tokio runtime
    pub fn spawn(manager: Arc<dyn LocationManager>) -> Self {
        let (requests, rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(BooleanOrError::false_value());
        tokio::spawn(run(manager, rx, state_tx));
        Self { requests, state }
    }

    /// Ask for the lock to be enabled or disabled
    pub fn request(&self, enabled: bool) {
        if self.requests.send(enabled).is_err() {
            debug!("Location lock task has stopped; dropping request");
        }
    }

    pub fn state(&self) -> BooleanOrError {
        self.state.borrow().clone()
    }

    pub fn is_locked(&self) -> bool {
        self.state.borrow().is_true()
    }

    pub fn icon_tint(&self) -> IconTint {
        IconTint::from(&*self.state.borrow())
    }

    /// Receiver notified on every lock state change
    pub fn watch(&self) -> watch::Receiver<BooleanOrError> {
        self.state.clone()
    }
}

async fn run(
    manager: Arc<dyn LocationManager>,
    mut requests: mpsc::UnboundedReceiver<bool>,
    state: watch::Sender<BooleanOrError>,
) {
    let Some(mut enabled) = requests.recv().await else {
        return;
    };

    loop {
        let target = enabled;
        let manager = Arc::clone(&manager);
        let call = async move {
            if target {
                manager.enable_location_updates().await
            } else {
                manager.disable_location_updates().await
            }
        };
        tokio::pin!(call);

        // A repeat of the in-flight intent leaves the call running.
        let result = loop {
            tokio::select! {
                result = &mut call => break Some(result),
                next = requests.recv() => match next {
                    Some(value) if value == target => continue,
                    Some(value) => {
                        enabled = value;
                        break None;
                    }
                    None => return,
                },
            }
        };

        if let Some(result) = result {
            debug!(enabled = target, ?result, "Location lock updated");
            if state.send(result).is_err() {
                return;
            }
            match requests.recv().await {
                Some(value) => enabled = value,
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct FakeLocationManager {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LocationManager for FakeLocationManager {
        async fn enable_location_updates(&self) -> BooleanOrError {
            self.calls.fetch_add(1, Ordering::SeqCst);
            BooleanOrError::Value(true)
        }

        async fn disable_location_updates(&self) -> BooleanOrError {
            self.calls.fetch_add(1, Ordering::SeqCst);
            BooleanOrError::Value(false)
        }
    }

    #[tokio::test]
    async fn test_starts_unlocked() {
        let lock = LocationLock::spawn(Arc::new(FakeLocationManager::default()));
        assert!(!lock.is_locked());
        assert_eq!(lock.icon_tint(), IconTint::Grey800);
    }

    #[tokio::test]
    async fn test_enable_then_disable() {
        let lock = LocationLock::spawn(Arc::new(FakeLocationManager::default()));
        let mut watch = lock.watch();

        lock.request(true);
        watch.changed().await.unwrap();
        assert!(lock.is_locked());
        assert_eq!(lock.icon_tint(), IconTint::MapBlue);

        lock.request(false);
        watch.changed().await.unwrap();
        assert!(!lock.is_locked());
    }

    #[derive(Default)]
    struct SlowLocationManager {
        disables_started: AtomicUsize,
    }

    #[async_trait]
    impl LocationManager for SlowLocationManager {
        async fn enable_location_updates(&self) -> BooleanOrError {
            BooleanOrError::Value(true)
        }

        async fn disable_location_updates(&self) -> BooleanOrError {
            self.disables_started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            BooleanOrError::Value(false)
        }
    }

    #[tokio::test]
    async fn test_repeated_disable_does_not_restart_call() {
        let manager = Arc::new(SlowLocationManager::default());
        let lock = LocationLock::spawn(manager.clone());
        let mut watch = lock.watch();

        lock.request(true);
        watch.changed().await.unwrap();
        assert!(lock.is_locked());

        // A continuous drag keeps asking while the disable is in flight
        for _ in 0..5 {
            lock.request(false);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        watch.changed().await.unwrap();
        assert!(!lock.is_locked());
        assert_eq!(manager.disables_started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_state_is_not_locked() {
        struct Denied;

        #[async_trait]
        impl LocationManager for Denied {
            async fn enable_location_updates(&self) -> BooleanOrError {
                BooleanOrError::Error("permission denied".to_string())
            }

            async fn disable_location_updates(&self) -> BooleanOrError {
                BooleanOrError::Value(false)
            }
        }

        let lock = LocationLock::spawn(Arc::new(Denied));
        let mut watch = lock.watch();
        lock.request(true);
        watch.changed().await.unwrap();

        assert_eq!(lock.state(), BooleanOrError::Error("permission denied".to_string()));
        assert_eq!(lock.icon_tint(), IconTint::Grey800);
    }
}
