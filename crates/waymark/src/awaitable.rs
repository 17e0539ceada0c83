//! A state cell whose setter resolves only once the new value is
//! observably in effect.
//!
//! The engine uses this to serialize visibility transitions with
//! externally-driven layout effects: "intent to show" and "fully
//! rendered" are different moments, and callers awaiting `start()` must
//! get the latter.
//!
//! Built on a pair of `tokio::sync::watch` channels: one carries the
//! desired value from the engine to the renderer, the other carries the
//! observed value back. `set(v).await` publishes on the first and
//! suspends until the second reports `v`.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::watch;

/// A state cell with convergence-awaiting writes.
pub struct AwaitableState<T> {
    desired_tx: watch::Sender<T>,
    observed_tx: Arc<watch::Sender<T>>,
    observed: AtomicBool,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> AwaitableState<T> {
    pub fn new(initial: T) -> Self {
        let (desired_tx, _) = watch::channel(initial.clone());
        let (observed_tx, _) = watch::channel(initial);
        Self {
            desired_tx,
            observed_tx: Arc::new(observed_tx),
            observed: AtomicBool::new(false),
        }
    }

    /// The most recently requested value.
    pub fn desired(&self) -> T {
        self.desired_tx.borrow().clone()
    }

    /// The value the observer last acknowledged.
    pub fn converged(&self) -> T {
        self.observed_tx.borrow().clone()
    }

    /// Requests `value` and suspends until the observer acknowledges it.
    ///
    /// When no [`StateObserver`] has been taken, the cell acknowledges
    /// itself so a renderer-less engine (headless use, tests without a
    /// visual layer) never deadlocks.
    pub async fn set(&self, value: T) {
        self.desired_tx.send_replace(value.clone());

        if !self.observed.load(Ordering::Acquire) {
            self.observed_tx.send_replace(value);
            return;
        }

        let mut observed_rx = self.observed_tx.subscribe();
        // Cannot fail: this cell owns the observed sender.
        observed_rx
            .wait_for(|observed| *observed == value)
            .await
            .ok();
    }

    /// Hands out the observer end, held by the rendering collaborator.
    ///
    /// From this point on, [`set`](Self::set) blocks until the observer
    /// acknowledges each requested value.
    pub fn observer(&self) -> StateObserver<T> {
        self.observed.store(true, Ordering::Release);
        StateObserver {
            desired_rx: self.desired_tx.subscribe(),
            observed_tx: Arc::clone(&self.observed_tx),
        }
    }
}

/// The renderer-side handle of an [`AwaitableState`].
///
/// The collaborator waits for desired-value changes, applies them to the
/// actual UI, and acknowledges once the result is observable.
pub struct StateObserver<T> {
    desired_rx: watch::Receiver<T>,
    observed_tx: Arc<watch::Sender<T>>,
}

impl<T: Clone + PartialEq> StateObserver<T> {
    /// The currently requested value.
    pub fn desired(&self) -> T {
        self.desired_rx.borrow().clone()
    }

    /// Suspends until the desired value changes, returning the new value.
    ///
    /// Returns `None` once the owning [`AwaitableState`] is dropped.
    pub async fn changed(&mut self) -> Option<T> {
        match self.desired_rx.changed().await {
            Ok(()) => Some(self.desired_rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// Reports that the underlying state has converged to `value`.
    pub fn acknowledge(&self, value: T) {
        self.observed_tx.send_replace(value);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_set_without_observer_resolves_immediately() {
        let state = AwaitableState::new(false);
        state.set(true).await;
        assert!(state.desired());
        assert!(state.converged());
    }

    #[tokio::test]
    async fn test_set_waits_for_acknowledgement() {
        let state = Arc::new(AwaitableState::new(false));
        let mut observer = state.observer();

        let renderer = tokio::spawn(async move {
            // Simulate the render pass taking a little while.
            let desired = observer.changed().await.unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
            observer.acknowledge(desired);
        });

        state.set(true).await;
        assert!(state.converged(), "set() must not resolve before the ack");
        renderer.await.unwrap();
    }

    #[tokio::test]
    async fn test_set_with_stalled_observer_does_not_resolve() {
        let state = Arc::new(AwaitableState::new(false));
        let _observer = state.observer();

        let result =
            tokio::time::timeout(Duration::from_millis(20), state.set(true)).await;
        assert!(result.is_err(), "no ack means set() stays pending");
        assert!(state.desired());
        assert!(!state.converged());
    }

    #[tokio::test]
    async fn test_ack_before_wait_is_not_missed() {
        let state = AwaitableState::new(0u32);
        let observer = state.observer();

        // Acknowledge ahead of the set call; wait_for checks the current
        // value first, so this must not deadlock.
        observer.acknowledge(7);
        state.set(7).await;
        assert_eq!(state.converged(), 7);
    }
}
