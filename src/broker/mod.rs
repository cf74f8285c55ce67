//! The cookie broker service.
//!
//! [`CookieBroker`] owns the subscriber registry and the interception state
//! for one accessor. It is an explicitly constructed service object: build
//! one, share it behind an `Arc`, and inject it wherever cookies are
//! consumed. The write interceptor is installed lazily on the first
//! subscribe and at most once per broker.
//!
//! Degradation: when the accessor reports cookies disabled, or its write
//! path is already claimed, installation is skipped with a log line and the
//! broker keeps serving `get`/`set` without notifications.

mod intercept;
mod registry;
pub mod value;

pub use value::CookieValue;

use crate::accessor::{CookieAccessor, MemoryAccessor};
use crate::base::error::CookieError;
use crate::codec::{self, CookieOptions};
use registry::Registry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct CookieBroker {
    accessor: Arc<dyn CookieAccessor>,
    registry: Arc<Registry>,
    intercepted: AtomicBool,
    debug: Arc<AtomicBool>,
}

impl CookieBroker {
    pub fn new(accessor: Arc<dyn CookieAccessor>) -> Self {
        Self {
            accessor,
            registry: Arc::new(Registry::new()),
            intercepted: AtomicBool::new(false),
            debug: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A broker over a fresh in-memory accessor.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryAccessor::new()))
    }

    /// The accessor this broker reads and writes through. External writers
    /// that go straight to the accessor are still observed by subscribers,
    /// since the interceptor sits on the accessor's write path.
    pub fn accessor(&self) -> &Arc<dyn CookieAccessor> {
        &self.accessor
    }

    /// Read the value stored under `name`. Returns `default` unchanged when
    /// the cookie is absent. A corrupt structured value is an error, never
    /// silently defaulted.
    pub fn get(&self, name: &str, default: CookieValue) -> Result<CookieValue, CookieError> {
        match codec::get(self.accessor.as_ref(), name) {
            None => Ok(default),
            Some(raw) => CookieValue::decode(name, &raw),
        }
    }

    /// Typed read: a `json:`-prefixed value deserializes into `T`, a bare
    /// string deserializes as a JSON string (so `T = String` gets it
    /// verbatim, anything else is a shape error).
    pub fn get_as<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T, CookieError> {
        match codec::get(self.accessor.as_ref(), name) {
            None => Ok(default),
            Some(raw) => match raw.strip_prefix(value::JSON_PREFIX) {
                Some(json) => serde_json::from_str(json).map_err(|e| CookieError::corrupt(name, e)),
                None => serde_json::from_value(Value::String(raw))
                    .map_err(|e| CookieError::decode(name, e)),
            },
        }
    }

    /// Write `value` under `name`. `Absent` deletes the cookie (honoring
    /// `options` for path/domain scope), `Text` is written verbatim,
    /// `Structured` is written with the `json:` prefix. Every branch travels
    /// the accessor's standard write path, so a `set` is observed by
    /// subscribers like any other write.
    pub fn set(
        &self,
        name: &str,
        value: CookieValue,
        options: &CookieOptions,
    ) -> Result<(), CookieError> {
        match value.encode()? {
            None => codec::remove(self.accessor.as_ref(), name, options),
            Some(stored) => codec::set(self.accessor.as_ref(), name, &stored, options),
        }
        Ok(())
    }

    /// Typed write, see [`CookieValue::json`] for the string/structured
    /// split.
    pub fn set_as<T: Serialize>(
        &self,
        name: &str,
        value: &T,
        options: &CookieOptions,
    ) -> Result<(), CookieError> {
        self.set(name, CookieValue::json(value)?, options)
    }

    /// Delete the cookie. Equivalent to writing [`CookieValue::Absent`].
    pub fn remove(&self, name: &str, options: &CookieOptions) -> Result<(), CookieError> {
        self.set(name, CookieValue::Absent, options)
    }

    /// The stored (decoded) string for `name`, prefix and all. Diagnostic
    /// surface; `get` is the real read path.
    pub fn raw(&self, name: &str) -> Option<String> {
        codec::get(self.accessor.as_ref(), name)
    }

    /// Register `callback` for writes to `name`. Installs the write
    /// interceptor on first use. The callback receives the new and old value
    /// for every write to that name, in registration order relative to other
    /// subscribers, with no diffing.
    ///
    /// Writes are dispatched under the name as it appears on the wire, the
    /// raw substring before the first `=` of the serialized write. A name
    /// that needs percent-encoding therefore notifies under its encoded
    /// spelling; stick to names that encode to themselves.
    ///
    /// The returned [`Subscription`] removes exactly this registration when
    /// cancelled or dropped.
    pub fn subscribe<F>(&self, name: &str, callback: F) -> Subscription
    where
        F: Fn(&CookieValue, &CookieValue) + Send + Sync + 'static,
    {
        self.ensure_intercepted();
        let id = self.registry.add(name, Arc::new(callback));
        Subscription {
            registry: Arc::clone(&self.registry),
            name: name.to_string(),
            id,
            active: true,
        }
    }

    /// Toggle diagnostic logging of every intercepted write (name, old
    /// value, new value).
    pub fn set_debug_logging(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    /// Install the write interceptor if it is not installed yet.
    ///
    /// The flag is only set on success, so a refused install leaves later
    /// subscribes free to retry; with an accessor whose write path stays
    /// claimed the retry just fails again, which is harmless.
    fn ensure_intercepted(&self) {
        if self.intercepted.load(Ordering::Acquire) {
            return;
        }
        if !self.accessor.cookies_enabled() {
            tracing::debug!("cookies disabled; change notifications unavailable");
            return;
        }
        let hook = intercept::write_hook(Arc::clone(&self.registry), Arc::clone(&self.debug));
        if !self.accessor.try_hook_writes(hook) {
            tracing::warn!("cookie write path already claimed; change notifications unavailable");
            return;
        }
        self.intercepted.store(true, Ordering::Release);
    }
}

/// Handle to one registration in the registry.
///
/// Dropping it (or calling [`cancel`](Subscription::cancel)) removes exactly
/// the callback it was returned for; nothing else. Removal is idempotent.
pub struct Subscription {
    registry: Arc<Registry>,
    name: String,
    id: u64,
    active: bool,
}

impl Subscription {
    pub fn cancel(self) {
        // Drop does the work.
    }

    /// Keep the registration alive for the broker's lifetime.
    pub fn detach(mut self) {
        self.active = false;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            self.registry.remove(&self.name, self.id);
        }
    }
}
