use crate::accessor::{RawCookieAccess, WriteHook};
use crate::broker::registry::Registry;
use crate::broker::value::CookieValue;
use crate::codec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Build the write hook installed on the accessor's write path.
///
/// For each write the hook reads the old value, delegates the unaltered
/// write to the original setter, reads the new value, then notifies the
/// registered subscribers for that name. Writes that are not cookie-shaped
/// (no `=`) pass through unexamined.
pub(crate) fn write_hook(registry: Arc<Registry>, debug: Arc<AtomicBool>) -> WriteHook {
    Arc::new(move |serialized, original| {
        let Some(split) = serialized.find('=') else {
            original.write_raw(serialized);
            return;
        };
        let name = &serialized[..split];

        let old = stored_value(original, name);
        original.write_raw(serialized);
        let new = stored_value(original, name);

        if debug.load(Ordering::Relaxed) {
            tracing::debug!(name = %name, old = ?old, new = ?new, "intercepted cookie write");
        }
        registry.notify(name, &new, &old);
    })
}

/// Read and decode the current value for `name` through the original getter.
///
/// There is no caller here to hand an error to, so a corrupt `json:` payload
/// is logged and delivered as plain text instead of aborting someone else's
/// write.
fn stored_value(original: &dyn RawCookieAccess, name: &str) -> CookieValue {
    match codec::lookup(&original.read_raw(), name) {
        None => CookieValue::Absent,
        Some(raw) => match CookieValue::decode(name, &raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(name = %name, error = %error, "corrupt structured cookie value in notification path");
                CookieValue::Text(raw)
            }
        },
    }
}
