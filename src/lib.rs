//! # cookiebus
//!
//! A reactive cookie store: a broker that intercepts every write to the
//! underlying cookie store and notifies per-name subscribers with the old and
//! new value, plus a thin binding that ties a piece of local state to one
//! cookie name.
//!
//! Interception works for writes from any origin, including ad-hoc code
//! writing straight through the accessor, because every write travels the
//! same write path.
//! When interception is unavailable (cookies disabled, or the write path
//! already claimed by another party) the broker degrades gracefully: reads
//! and writes keep working, notifications never fire.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cookiebus::broker::{CookieBroker, CookieValue};
//! use cookiebus::codec::CookieOptions;
//!
//! let broker = Arc::new(CookieBroker::in_memory());
//!
//! let sub = broker.subscribe("theme", |new, old| {
//!     println!("theme changed: {:?} -> {:?}", old, new);
//! });
//!
//! broker.set("theme", CookieValue::text("dark"), &CookieOptions::default())?;
//! drop(sub);
//! # Ok::<(), cookiebus::base::error::CookieError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types
//! - [`accessor`] - The platform cookie accessor port and the in-memory store
//! - [`codec`] - RFC 6265 attribute serialization and header lookup
//! - [`broker`] - The broker service: get/set/subscribe, interception, values
//! - [`binding`] - State binding built on top of the broker
//!
//! ## Value encoding
//!
//! A stored value is either a bare string (written verbatim) or a string
//! starting with the literal prefix `json:` followed by a JSON encoding of a
//! structured value. A plain string that legitimately starts with `json:`
//! will read back as structured; this ambiguity is accepted rather than
//! papered over with an escaping scheme.

pub mod accessor;
pub mod base;
pub mod binding;
pub mod broker;
pub mod codec;
