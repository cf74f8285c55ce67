use crate::broker::value::CookieValue;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub(crate) type Callback = Arc<dyn Fn(&CookieValue, &CookieValue) + Send + Sync>;

struct Listener {
    id: u64,
    callback: Callback,
}

/// Per-name subscriber lists.
///
/// Lists keep insertion order and allow duplicate callbacks; removal is by
/// the id handed out at registration, and removing an unknown id is a no-op.
/// Entries are created lazily on first subscribe and live as long as the
/// registry does.
pub(crate) struct Registry {
    listeners: DashMap<String, Vec<Listener>>,
    next_id: AtomicU64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            listeners: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    pub(crate) fn add(&self, name: &str, callback: Callback) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .entry(name.to_string())
            .or_default()
            .push(Listener { id, callback });
        id
    }

    pub(crate) fn remove(&self, name: &str, id: u64) {
        if let Some(mut entry) = self.listeners.get_mut(name) {
            entry.retain(|listener| listener.id != id);
        }
    }

    /// Invoke every callback registered for `name`, in registration order.
    /// Fires on every write; no diffing of old against new.
    pub(crate) fn notify(&self, name: &str, new: &CookieValue, old: &CookieValue) {
        // Snapshot outside the map lock so callbacks may subscribe or
        // unsubscribe reentrantly.
        let snapshot: Vec<Callback> = match self.listeners.get(name) {
            Some(entry) => entry.iter().map(|l| Arc::clone(&l.callback)).collect(),
            None => return,
        };
        for callback in snapshot {
            callback(new, old);
        }
    }
}
