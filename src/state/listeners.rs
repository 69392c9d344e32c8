//! Listener lists with real removal and per-listener panic isolation.
//!
//! Listeners are kept in registration order behind a mutex. Dispatch works
//! on a snapshot, so a listener may add or remove listeners (itself
//! included) without disturbing the round in progress. A listener that
//! panics is logged and skipped; the rest still run.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

// Shared by every list, so an id never matches a listener in another list
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(0);

/// Handle returned on registration, used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

pub struct ListenerList<F: ?Sized> {
    entries: Mutex<Vec<(ListenerId, Arc<F>)>>,
}

impl<F: ?Sized> Default for ListenerList<F> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl<F: ?Sized> ListenerList<F> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ListenerId, Arc<F>)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, listener: Arc<F>) -> ListenerId {
        let id = ListenerId::next();
        self.lock().push((id, listener));
        id
    }

    /// Returns false if `id` was not registered here (or already removed).
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current listeners, in registration order.
    pub fn snapshot(&self) -> Vec<Arc<F>> {
        self.lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }
}

/// Run one callback, turning a panic into `None` and a log line.
pub(crate) fn isolate<R>(what: &'static str, call: impl FnOnce() -> R) -> Option<R> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(value) => Some(value),
        Err(payload) => {
            warn!(callback = what, message = panic_message(payload.as_ref()), "callback panicked");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Callback = dyn Fn() + Send + Sync;

    #[test]
    fn test_add_remove() {
        let list: ListenerList<Callback> = ListenerList::new();
        let a = list.add(Arc::new(|| {}));
        let b = list.add(Arc::new(|| {}));
        assert_eq!(list.len(), 2);

        assert!(list.remove(a));
        assert!(!list.remove(a));
        assert_eq!(list.len(), 1);
        assert!(list.remove(b));
        assert!(list.is_empty());
    }

    #[test]
    fn test_snapshot_survives_removal_during_dispatch() {
        let list: Arc<ListenerList<Callback>> = Arc::new(ListenerList::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let second_id = Arc::new(Mutex::new(None));
        let handle = Arc::clone(&list);
        let target = Arc::clone(&second_id);
        let counter = Arc::clone(&calls);
        list.add(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *target.lock().unwrap() {
                handle.remove(id);
            }
        }));
        let counter = Arc::clone(&calls);
        let id = list.add(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        *second_id.lock().unwrap() = Some(id);

        for listener in list.snapshot() {
            listener();
        }
        // Both ran this round, the second is gone for the next one
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_ids_do_not_collide_across_lists() {
        let first: ListenerList<Callback> = ListenerList::new();
        let second: ListenerList<Callback> = ListenerList::new();
        let a = first.add(Arc::new(|| {}));
        let b = second.add(Arc::new(|| {}));
        assert_ne!(a, b);

        assert!(!second.remove(a));
        assert_eq!(second.len(), 1);
        assert!(first.remove(a));
    }

    #[test]
    fn test_isolate_catches_panics() {
        assert_eq!(isolate("ok", || 5), Some(5));
        assert_eq!(isolate("boom", || -> i32 { panic!("boom") }), None);
    }
}
