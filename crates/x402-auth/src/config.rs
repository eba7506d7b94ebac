//! Configuration for bearer header generation.
//!
//! All configuration is driven by environment variables. Lookups go through
//! [`AuthConfig::from_lookup`] so callers can supply their own source.

use crate::error::{AuthError, AuthResult};

/// Enables redacted diagnostic logging when set to `1` or `true`.
pub const ENV_VERBOSE: &str = "X402_AUTH_VERBOSE";
/// Token lifetime in seconds.
pub const ENV_EXPIRES_IN: &str = "X402_JWT_EXPIRES_IN";

/// Default token lifetime in seconds.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 120;

/// Logging and token policy for [`AuthHeaderBuilder`](crate::AuthHeaderBuilder).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    /// Emit diagnostic events for each signed request. Secrets are never logged.
    pub verbose: bool,
    /// Lifetime of generated tokens in seconds.
    pub expires_in_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            expires_in_secs: DEFAULT_EXPIRES_IN_SECS,
        }
    }
}

impl AuthConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_VERBOSE) {
            config.verbose = parse_flag(&v);
        }
        if let Some(v) = lookup(ENV_EXPIRES_IN) {
            config.expires_in_secs = v.trim().parse().map_err(|_| AuthError::InvalidConfig {
                name: ENV_EXPIRES_IN,
                value: v.clone(),
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}
