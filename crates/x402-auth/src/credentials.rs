//! API key credentials.
//!
//! The key secret is held in a [`SecretString`] so that it is redacted from
//! `Debug` output and zeroized on drop. Nothing here validates the key; a bad
//! key surfaces later as a signing error.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{AuthError, AuthResult};

/// Environment variable holding the API key id.
pub const ENV_KEY_ID: &str = "CDP_API_KEY_ID";
/// Environment variable holding the API key secret.
pub const ENV_KEY_SECRET: &str = "CDP_API_KEY_SECRET";

/// An API key id and its secret.
///
/// # Examples
///
/// ```
/// use x402_auth::Credentials;
///
/// let credentials = Credentials::new("key-id", "key-secret");
/// assert_eq!(credentials.key_id(), "key-id");
/// assert!(!format!("{credentials:?}").contains("key-secret"));
/// ```
#[derive(Debug)]
pub struct Credentials {
    key_id: String,
    key_secret: SecretString,
}

impl Credentials {
    /// Create credentials from a key id and secret.
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: SecretString::from(key_secret.into()),
        }
    }

    /// Load credentials from `CDP_API_KEY_ID` and `CDP_API_KEY_SECRET`.
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_id = lookup(ENV_KEY_ID).ok_or(AuthError::MissingEnv(ENV_KEY_ID))?;
        let key_secret = lookup(ENV_KEY_SECRET).ok_or(AuthError::MissingEnv(ENV_KEY_SECRET))?;
        Ok(Self::new(key_id, key_secret))
    }

    /// The API key id.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// The API key secret. Callers must not log the returned value.
    #[must_use]
    pub fn expose_key_secret(&self) -> &str {
        self.key_secret.expose_secret()
    }
}
