use crate::accessor::{CookieAccessor, RawCookieAccess, WriteHook};
use cookie::Cookie;
use std::sync::{Mutex, PoisonError};
use time::{Duration, OffsetDateTime};

/// In-process cookie store with `document.cookie` semantics: writes are
/// serialized cookie strings, reads return `name=value` pairs joined by
/// `; `, and a write whose expiry is already in the past deletes the entry.
///
/// Pairs are kept in insertion order and keyed by name only.
pub struct MemoryAccessor {
    enabled: bool,
    jar: Mutex<Vec<(String, String)>>,
    hook: Mutex<Option<WriteHook>>,
}

impl Default for MemoryAccessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAccessor {
    pub fn new() -> Self {
        Self {
            enabled: true,
            jar: Mutex::new(Vec::new()),
            hook: Mutex::new(None),
        }
    }

    /// An accessor that reports cookies as disabled. Storage still functions,
    /// but the write path refuses hooks, so no write is ever observed.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }
}

impl CookieAccessor for MemoryAccessor {
    fn cookies_enabled(&self) -> bool {
        self.enabled
    }

    fn read(&self) -> String {
        render(&self.jar)
    }

    fn write(&self, serialized: &str) {
        // Clone the hook out of the slot so a subscriber callback may write
        // cookies reentrantly without deadlocking on the hook lock.
        let hook = self
            .hook
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match hook {
            Some(hook) => hook(serialized, &Original { jar: &self.jar }),
            None => apply(&self.jar, serialized),
        }
    }

    fn try_hook_writes(&self, hook: WriteHook) -> bool {
        if !self.enabled {
            return false;
        }
        let mut slot = self.hook.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            // Already claimed; the property is no longer configurable.
            return false;
        }
        *slot = Some(hook);
        true
    }
}

/// The captured original getter/setter pair of a [`MemoryAccessor`].
struct Original<'a> {
    jar: &'a Mutex<Vec<(String, String)>>,
}

impl RawCookieAccess for Original<'_> {
    fn read_raw(&self) -> String {
        render(self.jar)
    }

    fn write_raw(&self, serialized: &str) {
        apply(self.jar, serialized);
    }
}

fn render(jar: &Mutex<Vec<(String, String)>>) -> String {
    jar.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The original setter: parse the `name=value` head of the serialized
/// cookie, then insert, replace, or (for an expired write) delete it.
fn apply(jar: &Mutex<Vec<(String, String)>>, serialized: &str) {
    let pair = serialized.split(';').next().unwrap_or_default();
    let Some(split) = pair.find('=') else {
        // Not cookie-shaped; a real store drops it on the floor.
        return;
    };
    let name = pair[..split].trim().to_string();
    let value = pair[split + 1..].trim().to_string();

    let mut jar = jar.lock().unwrap_or_else(PoisonError::into_inner);
    if is_removal(serialized) {
        jar.retain(|(n, _)| *n != name);
        return;
    }
    match jar.iter_mut().find(|(n, _)| *n == name) {
        Some(slot) => slot.1 = value,
        None => jar.push((name, value)),
    }
}

fn is_removal(serialized: &str) -> bool {
    match Cookie::parse_encoded(serialized) {
        Ok(cookie) => {
            cookie.max_age() == Some(Duration::ZERO)
                || cookie
                    .expires_datetime()
                    .is_some_and(|at| at <= OffsetDateTime::now_utc())
        }
        Err(_) => false,
    }
}
