//! The cookie-codec collaborator: RFC 6265 attribute serialization and
//! header lookup, built on the `cookie` crate with percent-encoding.
//!
//! The broker treats this module as opaque string storage: it hands over a
//! name, an already-encoded value, and a [`CookieOptions`], and gets back a
//! serialized cookie string that travels the accessor's write path.

mod options;

pub use options::{CookieOptions, Expiry, SameSite};

use crate::accessor::CookieAccessor;
use cookie::Cookie;
use time::{Duration, OffsetDateTime};

/// Default `Path` attribute applied when the caller does not set one, so a
/// later removal with default options matches the original write's scope.
const DEFAULT_PATH: &str = "/";

/// Read the stored (percent-decoded) string for `name`, or `None` when the
/// cookie is absent.
pub fn get(accessor: &dyn CookieAccessor, name: &str) -> Option<String> {
    lookup(&accessor.read(), name)
}

/// Write `value` verbatim under `name` with the given attributes.
pub fn set(accessor: &dyn CookieAccessor, name: &str, value: &str, options: &CookieOptions) {
    accessor.write(&serialize(name, value, options));
}

/// Delete the cookie, honoring `options` for path/domain scoping so the
/// removal matches the original write's scope.
pub fn remove(accessor: &dyn CookieAccessor, name: &str, options: &CookieOptions) {
    accessor.write(&removal(name, options));
}

/// Serialize one cookie with its attribute string.
pub fn serialize(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut builder = Cookie::build((name, value))
        .path(options.path.clone().unwrap_or_else(|| DEFAULT_PATH.into()));
    if let Some(domain) = &options.domain {
        builder = builder.domain(domain.clone());
    }
    if options.secure {
        builder = builder.secure(true);
    }
    if let Some(same_site) = options.same_site {
        builder = builder.same_site(same_site.into());
    }
    if let Some(expiry) = options.expires {
        builder = builder.expires(expiry.at(OffsetDateTime::now_utc()));
    }
    finish(builder, options)
}

/// Serialize a removal for `name`: empty value, `Max-Age=0`, epoch expiry.
pub fn removal(name: &str, options: &CookieOptions) -> String {
    let mut builder = Cookie::build((name, ""))
        .path(options.path.clone().unwrap_or_else(|| DEFAULT_PATH.into()))
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH);
    if let Some(domain) = &options.domain {
        builder = builder.domain(domain.clone());
    }
    finish(builder, options)
}

fn finish(builder: cookie::CookieBuilder<'_>, options: &CookieOptions) -> String {
    let mut out = builder.build().encoded().to_string();
    for (key, value) in &options.extra {
        if value.is_empty() {
            out.push_str(&format!("; {key}"));
        } else {
            out.push_str(&format!("; {key}={value}"));
        }
    }
    out
}

/// Find `name` inside a raw cookie header string (`a=1; b=2`), returning its
/// percent-decoded value.
pub fn lookup(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| Cookie::parse_encoded(pair).ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}
