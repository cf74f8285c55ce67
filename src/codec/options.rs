use time::{Duration, OffsetDateTime};

/// Attributes attached to a cookie write.
///
/// Recognized attributes get typed fields; anything else goes into `extra`
/// and is appended to the attribute string verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieOptions {
    pub expires: Option<Expiry>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: Option<SameSite>,
    pub extra: Vec<(String, String)>,
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire after a relative number of days (fractions allowed).
    pub fn expires_in_days(mut self, days: f64) -> Self {
        self.expires = Some(Expiry::Days(days));
        self
    }

    /// Expire at an absolute point in time.
    pub fn expires_at(mut self, at: OffsetDateTime) -> Self {
        self.expires = Some(Expiry::At(at));
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Set the SameSite attribute from its string form, case-insensitively.
    /// An unrecognized value leaves the attribute as it was.
    pub fn same_site_str(mut self, value: &str) -> Self {
        if let Some(same_site) = SameSite::parse(value) {
            self.same_site = Some(same_site);
        }
        self
    }

    /// Append an attribute passed through verbatim; use an empty value for
    /// flag attributes such as `Partitioned`.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }
}

/// Cookie expiry, either relative to the time of the write or absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expiry {
    /// Day count relative to now; fractional values are fine.
    Days(f64),
    At(OffsetDateTime),
}

impl Expiry {
    /// Resolve to an absolute point in time, relative values counted from
    /// `now`.
    pub fn at(self, now: OffsetDateTime) -> OffsetDateTime {
        match self {
            Expiry::Days(days) => now + Duration::seconds_f64(days * 86_400.0),
            Expiry::At(at) => at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    /// Parse an attribute value, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("strict") {
            Some(Self::Strict)
        } else if value.eq_ignore_ascii_case("lax") {
            Some(Self::Lax)
        } else if value.eq_ignore_ascii_case("none") {
            Some(Self::None)
        } else {
            Option::None
        }
    }
}

impl From<SameSite> for cookie::SameSite {
    fn from(same_site: SameSite) -> Self {
        match same_site {
            SameSite::Strict => cookie::SameSite::Strict,
            SameSite::Lax => cookie::SameSite::Lax,
            SameSite::None => cookie::SameSite::None,
        }
    }
}
