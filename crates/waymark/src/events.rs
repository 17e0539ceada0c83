//! Typed publish/subscribe channel for tour lifecycle events.
//!
//! Consumers of the event stream (persistence, analytics, narration) hang
//! off this bus; the engine itself never depends on any listener running.

use std::{
    error::Error,
    sync::{Arc, Mutex, PoisonError},
};

use log::error;

use crate::registry::Step;

/// A tour lifecycle event.
#[derive(Debug, Clone)]
pub enum TourEvent {
    /// A tour became active.
    Start { tour: String },
    /// The active tour ended. `completed` is true when the step being
    /// left was the last one in order.
    Stop { tour: String, completed: bool },
    /// Navigation moved to another step. `step_number` is 1-indexed.
    StepChange {
        tour: String,
        step: Step,
        step_number: usize,
    },
}

/// Result type for event listeners. A listener returning `Err` is logged
/// and does not interrupt delivery to the remaining listeners.
pub type ListenerResult = Result<(), Box<dyn Error>>;

type Listener = Arc<dyn Fn(&TourEvent) -> ListenerResult + Send + Sync>;

/// Token identifying a subscription, returned by [`EventBus::on`].
///
/// Closures are not comparable in Rust, so unsubscription takes this
/// token rather than the callback itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Publish/subscribe bus for [`TourEvent`]s.
///
/// Emission snapshots the listener list first, so a listener that
/// unsubscribes itself (or subscribes others) during delivery cannot
/// corrupt the iteration.
#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_id: Mutex<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `listener` to all tour events.
    pub fn on<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&TourEvent) -> ListenerResult + Send + Sync + 'static,
    {
        let id = {
            let mut next = lock_ignore_poison(&self.next_id);
            *next += 1;
            ListenerId(*next)
        };
        lock_ignore_poison(&self.listeners).push((id, Arc::new(listener)));
        id
    }

    /// Removes the subscription identified by `id`.
    ///
    /// Returns true if a listener was removed, false if the id was
    /// unknown (already removed, or never issued by this bus).
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = lock_ignore_poison(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        lock_ignore_poison(&self.listeners).len()
    }

    /// Delivers `event` to every listener registered at call time.
    pub fn emit(&self, event: &TourEvent) {
        let snapshot: Vec<(ListenerId, Listener)> = lock_ignore_poison(&self.listeners)
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if let Err(err) = listener(event) {
                error!(listener_id = id.0, err = err.to_string(); "Tour event listener failed");
            }
        }
    }
}

fn lock_ignore_poison<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn start_event() -> TourEvent {
        TourEvent::Start {
            tour: "main".to_owned(),
        }
    }

    #[test]
    fn test_emit_reaches_all_listeners() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            bus.on(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        bus.emit(&start_event());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_off_removes_listener() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        let id = bus.on(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert!(bus.off(id));
        assert!(!bus.off(id), "second removal reports false");

        bus.emit(&start_event());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failing_listener_does_not_block_the_rest() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        bus.on(|_| Err("listener exploded".into()));
        let hits_clone = Arc::clone(&hits);
        bus.on(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.emit(&start_event());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_during_emission_is_safe() {
        let bus = Arc::new(EventBus::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let id_cell = Arc::new(Mutex::new(None::<ListenerId>));
        let bus_clone = Arc::clone(&bus);
        let id_cell_clone = Arc::clone(&id_cell);
        let hits_clone = Arc::clone(&hits);
        let id = bus.on(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            // Remove ourselves mid-delivery.
            if let Some(id) = *id_cell_clone.lock().unwrap() {
                bus_clone.off(id);
            }
            Ok(())
        });
        *id_cell.lock().unwrap() = Some(id);

        let tail_hits = Arc::new(AtomicUsize::new(0));
        let tail_hits_clone = Arc::clone(&tail_hits);
        bus.on(move |_| {
            tail_hits_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.emit(&start_event());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(tail_hits.load(Ordering::SeqCst), 1);

        // The self-removal took effect for subsequent emissions.
        bus.emit(&start_event());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(tail_hits.load(Ordering::SeqCst), 2);
    }
}
