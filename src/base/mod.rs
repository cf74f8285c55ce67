//! Base types and error handling.
//!
//! - [`CookieError`](error::CookieError): data-integrity errors surfaced to
//!   callers. Environment-capability failures (cookies disabled, write path
//!   claimed) are never errors; they degrade to "no notifications" and are
//!   only logged.

pub mod error;

pub use error::CookieError;
