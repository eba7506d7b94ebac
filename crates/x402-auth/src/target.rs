//! The host and path a bearer token is scoped to.

/// Scheme prefix removed from hosts before signing.
pub const HTTPS_SCHEME_PREFIX: &str = "https://";

/// Remove one leading `https://` from `host`.
///
/// The match is case-sensitive and only a single occurrence is removed, so
/// `https://https://x.com` becomes `https://x.com`. Other schemes are kept.
///
/// # Examples
///
/// ```
/// use x402_auth::target::strip_https_scheme;
///
/// assert_eq!(strip_https_scheme("https://x402.org/facilitator"), "x402.org/facilitator");
/// assert_eq!(strip_https_scheme("http://x402.org"), "http://x402.org");
/// ```
#[must_use]
pub fn strip_https_scheme(host: &str) -> &str {
    host.strip_prefix(HTTPS_SCHEME_PREFIX).unwrap_or(host)
}

/// A request host and path. The host never carries a leading `https://`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTarget {
    host: String,
    path: String,
}

impl RequestTarget {
    /// Create a target, stripping a single leading `https://` from `host`.
    /// `path` is kept verbatim.
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            host: strip_https_scheme(&host).to_owned(),
            path: path.into(),
        }
    }

    /// The bare host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}
