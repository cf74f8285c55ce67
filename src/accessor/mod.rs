//! The platform cookie accessor port.
//!
//! All cookie string access flows through a single read/write property. The
//! broker's only integration point is claiming the write side of that
//! property: an installed [`WriteHook`] sees every write before it happens
//! and receives the original getter/setter pair ([`RawCookieAccess`]) so it
//! can delegate the unaltered write and read the store around it. Reads are
//! never intercepted.
//!
//! [`MemoryAccessor`] is the in-process implementation used as the default
//! backend and in tests.

mod memory;

pub use memory::MemoryAccessor;

use std::sync::Arc;

/// The original getter/setter pair of an accessor, captured before the write
/// side was replaced. Handed to an installed [`WriteHook`] so it can perform
/// the real write and read the store without re-entering the hook.
pub trait RawCookieAccess {
    /// Read the raw cookie header string, `name=value` pairs joined by `; `.
    fn read_raw(&self) -> String;

    /// Apply a serialized cookie write directly, bypassing any hook.
    fn write_raw(&self, serialized: &str);
}

/// A write interceptor. Called with the serialized cookie string and the
/// original accessor pair; responsible for delegating the write itself.
pub type WriteHook = Arc<dyn Fn(&str, &dyn RawCookieAccess) + Send + Sync>;

/// A single read/write cookie property, plus a one-shot claim on its write
/// side.
pub trait CookieAccessor: Send + Sync {
    /// Whether the platform has cookies enabled at all. When false, callers
    /// should not bother claiming the write path.
    fn cookies_enabled(&self) -> bool;

    /// Read the raw cookie header string.
    fn read(&self) -> String;

    /// Write one serialized cookie. Routes through the installed hook when
    /// one is present.
    fn write(&self, serialized: &str);

    /// Claim the write side of the property. Returns false when the write
    /// path cannot be replaced, e.g. another party already claimed it.
    fn try_hook_writes(&self, hook: WriteHook) -> bool;
}
