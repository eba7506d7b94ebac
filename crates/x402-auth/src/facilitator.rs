//! Authorization header sets for x402 facilitator endpoints.
//!
//! A facilitator exposes `verify` and `settle` under a common base URL.
//! Each endpoint gets its own token because the token is scoped to
//! the exact host and path it is sent to.

use std::collections::BTreeMap;
use std::fmt;

use http::HeaderMap;
use http::header::AUTHORIZATION;

use crate::builder::AuthHeaderBuilder;
use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::signer::JwtSigner;
use crate::target::RequestTarget;

/// Public x402 facilitator.
pub const DEFAULT_FACILITATOR_URL: &str = "https://x402.org/facilitator";
/// Coinbase Developer Platform facilitator.
pub const CDP_FACILITATOR_URL: &str = "https://api.cdp.coinbase.com/platform/v2/x402";
/// Environment variable overriding the facilitator URL.
pub const ENV_FACILITATOR_URL: &str = "FACILITATOR_URL";

/// A facilitator endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacilitatorEndpoint {
    /// `POST /verify`
    Verify,
    /// `POST /settle`
    Settle,
}

impl FacilitatorEndpoint {
    /// All endpoints, in request order.
    pub const ALL: [Self; 2] = [Self::Verify, Self::Settle];

    /// Endpoint name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::Settle => "settle",
        }
    }

    /// Path relative to the facilitator URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Verify => "/verify",
            Self::Settle => "/settle",
        }
    }
}

impl fmt::Display for FacilitatorEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated facilitator base URL.
///
/// # Examples
///
/// ```
/// use x402_auth::facilitator::{FacilitatorConfig, FacilitatorEndpoint};
///
/// let config = FacilitatorConfig::new("https://api.cdp.coinbase.com/platform/v2/x402/").unwrap();
/// assert_eq!(config.url(), "https://api.cdp.coinbase.com/platform/v2/x402");
/// assert_eq!(config.host(), "api.cdp.coinbase.com");
/// assert_eq!(config.route(), "/platform/v2/x402");
/// assert_eq!(
///     config.endpoint_url(FacilitatorEndpoint::Verify),
///     "https://api.cdp.coinbase.com/platform/v2/x402/verify"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilitatorConfig {
    url: String,
}

impl FacilitatorConfig {
    /// Validate `url` and drop one trailing `/`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidFacilitatorUrl`] unless `url` starts with
    /// `http://` or `https://` followed by a non-empty host.
    pub fn new(url: impl Into<String>) -> AuthResult<Self> {
        let mut url = url.into();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));
        if rest.is_none_or(|rest| rest.is_empty() || rest.starts_with('/')) {
            return Err(AuthError::InvalidFacilitatorUrl(url));
        }
        if url.ends_with('/') {
            url.pop();
        }
        Ok(Self { url })
    }

    /// The Coinbase Developer Platform facilitator.
    #[must_use]
    pub fn cdp() -> Self {
        Self {
            url: CDP_FACILITATOR_URL.to_owned(),
        }
    }

    /// Load from `FACILITATOR_URL`, falling back to the public facilitator.
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(ENV_FACILITATOR_URL).map_or_else(|| Ok(Self::default()), Self::new)
    }

    /// The base URL without a trailing slash.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The bare host, e.g. `x402.org`.
    #[must_use]
    pub fn host(&self) -> &str {
        let rest = self.without_scheme();
        rest.split_once('/').map_or(rest, |(host, _)| host)
    }

    /// The path prefix after the host, e.g. `/facilitator`. Empty if none.
    #[must_use]
    pub fn route(&self) -> &str {
        let rest = self.without_scheme();
        rest.find('/').map_or("", |idx| &rest[idx..])
    }

    /// Full URL of `endpoint`.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: FacilitatorEndpoint) -> String {
        format!("{}{}", self.url, endpoint.path())
    }

    /// The request target a token for `endpoint` must be scoped to.
    #[must_use]
    pub fn target(&self, endpoint: FacilitatorEndpoint) -> RequestTarget {
        self.target_for_path(endpoint.path())
    }

    /// The request target for an arbitrary `path` under this facilitator.
    #[must_use]
    pub fn target_for_path(&self, path: &str) -> RequestTarget {
        RequestTarget::new(self.host(), format!("{}{path}", self.route()))
    }

    fn without_scheme(&self) -> &str {
        self.url
            .strip_prefix("https://")
            .or_else(|| self.url.strip_prefix("http://"))
            .unwrap_or(&self.url)
    }
}

impl Default for FacilitatorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FACILITATOR_URL.to_owned(),
        }
    }
}

/// Per-endpoint header maps, each carrying a sensitive `Authorization` value.
#[derive(Debug, Clone, Default)]
pub struct FacilitatorHeaders {
    headers: BTreeMap<FacilitatorEndpoint, HeaderMap>,
}

impl FacilitatorHeaders {
    /// Headers for `endpoint`.
    #[must_use]
    pub fn get(&self, endpoint: FacilitatorEndpoint) -> Option<&HeaderMap> {
        self.headers.get(&endpoint)
    }

    /// Iterate over endpoints and their headers in endpoint order.
    pub fn iter(&self) -> impl Iterator<Item = (FacilitatorEndpoint, &HeaderMap)> {
        self.headers.iter().map(|(endpoint, headers)| (*endpoint, headers))
    }

    /// Number of endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Whether no endpoint has headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl<S: JwtSigner> AuthHeaderBuilder<S> {
    /// Build authorization headers for every facilitator endpoint.
    ///
    /// # Errors
    ///
    /// The first signing failure aborts the whole set.
    pub fn facilitator_headers(
        &self,
        credentials: &Credentials,
        config: &FacilitatorConfig,
    ) -> AuthResult<FacilitatorHeaders> {
        let mut headers = BTreeMap::new();
        for endpoint in FacilitatorEndpoint::ALL {
            let value = self.build_header_value(credentials, &config.target(endpoint))?;
            let mut map = HeaderMap::new();
            map.insert(AUTHORIZATION, value);
            headers.insert(endpoint, map);
        }
        Ok(FacilitatorHeaders { headers })
    }
}
