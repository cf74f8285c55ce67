use thiserror::Error;

/// Errors surfaced by the broker.
///
/// All variants are about data integrity. A corrupt stored value is returned
/// to the caller rather than silently replaced with a default, since masking
/// it would hide external tampering or corruption.
#[derive(Debug, Error)]
pub enum CookieError {
    /// A stored value carried the `json:` prefix but the remainder is not
    /// valid JSON.
    #[error("corrupt structured value for cookie `{name}`: {source}")]
    Corrupt {
        name: String,
        source: serde_json::Error,
    },

    /// A structured value could not be encoded as JSON for storage.
    #[error("cookie value could not be encoded as JSON: {source}")]
    Encode { source: serde_json::Error },

    /// A stored value parsed fine but does not deserialize into the type the
    /// caller asked for.
    #[error("cookie `{name}` does not hold a value of the requested type: {source}")]
    Decode {
        name: String,
        source: serde_json::Error,
    },
}

impl CookieError {
    pub fn corrupt(name: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            name: name.into(),
            source,
        }
    }

    pub fn encode(source: serde_json::Error) -> Self {
        Self::Encode { source }
    }

    pub fn decode(name: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            name: name.into(),
            source,
        }
    }
}
