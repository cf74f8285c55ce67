use crate::base::error::CookieError;
use serde::Serialize;
use serde_json::Value;

/// Prefix marking a stored string as a JSON-encoded structured value.
pub(crate) const JSON_PREFIX: &str = "json:";

/// A cookie value as the broker sees it.
///
/// `Text` is stored verbatim; `Structured` is stored as `json:` followed by
/// its JSON encoding, so the two can be told apart on read. `Absent` means
/// "no value": writing it deletes the cookie, and reads of a missing cookie
/// report it (unless the caller supplied a different default).
///
/// The prefix is reserved: a `Text` value that itself starts with `json:`
/// will read back as `Structured`. Accepted limitation, kept for
/// compatibility with stores written before this crate existed.
#[derive(Debug, Clone, PartialEq)]
pub enum CookieValue {
    Absent,
    Text(String),
    Structured(Value),
}

impl CookieValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Encode any serializable value. A value that serializes to a plain
    /// JSON string becomes `Text` (stored verbatim, no prefix); everything
    /// else becomes `Structured`.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, CookieError> {
        match serde_json::to_value(value).map_err(CookieError::encode)? {
            Value::String(text) => Ok(Self::Text(text)),
            structured => Ok(Self::Structured(structured)),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            _ => None,
        }
    }

    /// Decode a stored string: `json:`-prefixed means structured, anything
    /// else is plain text. A prefixed value that fails to parse is corrupt
    /// and surfaces as an error rather than being defaulted away.
    pub(crate) fn decode(name: &str, raw: &str) -> Result<Self, CookieError> {
        match raw.strip_prefix(JSON_PREFIX) {
            Some(json) => serde_json::from_str(json)
                .map(Self::Structured)
                .map_err(|e| CookieError::corrupt(name, e)),
            None => Ok(Self::Text(raw.to_string())),
        }
    }

    /// Encode for storage. `None` means "delete the cookie".
    pub(crate) fn encode(&self) -> Result<Option<String>, CookieError> {
        match self {
            Self::Absent => Ok(None),
            Self::Text(text) => Ok(Some(text.clone())),
            Self::Structured(value) => {
                let json = serde_json::to_string(value).map_err(CookieError::encode)?;
                Ok(Some(format!("{JSON_PREFIX}{json}")))
            }
        }
    }
}

impl From<&str> for CookieValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CookieValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
