//! State binding on top of the broker.
//!
//! [`CookieBinding`] is the glue a UI layer needs to tie one piece of local
//! state to one cookie name: it initializes from the current cookie value,
//! tracks every write to that name (its own, another binding's on the same
//! name, or unrelated code writing through the accessor), and exposes a
//! setter that writes through the broker. When the caller's default value
//! changes, drop the binding and bind again.

use crate::base::error::CookieError;
use crate::broker::{CookieBroker, CookieValue, Subscription};
use crate::codec::CookieOptions;
use std::sync::{Arc, Mutex, PoisonError};

pub struct CookieBinding {
    broker: Arc<CookieBroker>,
    name: String,
    options: CookieOptions,
    state: Arc<Mutex<CookieValue>>,
    _subscription: Subscription,
}

impl CookieBinding {
    /// Read the current value (falling back to `default`) and subscribe to
    /// the name. The subscription is released when the binding is dropped.
    pub fn bind(
        broker: Arc<CookieBroker>,
        name: &str,
        default: CookieValue,
        options: CookieOptions,
    ) -> Result<Self, CookieError> {
        let state = Arc::new(Mutex::new(broker.get(name, default)?));
        let shared = Arc::clone(&state);
        let subscription = broker.subscribe(name, move |new, _old| {
            *shared.lock().unwrap_or_else(PoisonError::into_inner) = new.clone();
        });
        Ok(Self {
            broker,
            name: name.to_string(),
            options,
            state,
            _subscription: subscription,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound state as of the last notification (or the initial read).
    pub fn value(&self) -> CookieValue {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write through the broker. Local state is not updated optimistically;
    /// the update arrives through the notification round-trip, the same way
    /// a write from anyone else would.
    pub fn set(&self, value: CookieValue) -> Result<(), CookieError> {
        self.broker.set(&self.name, value, &self.options)
    }

    /// Delete the bound cookie.
    pub fn remove(&self) -> Result<(), CookieError> {
        self.set(CookieValue::Absent)
    }
}
