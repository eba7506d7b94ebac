//! Bearer authorization header construction.
//!
//! [`AuthHeaderBuilder`] strips the `https://` scheme from the target host,
//! asks its [`JwtSigner`] for a `POST`-scoped token and returns
//! `"Bearer <token>"`. Signer errors are returned unchanged.
//!
//! Diagnostic events are only emitted when [`AuthConfig::verbose`] is set, and
//! even then carry no secret material: the key id, host, path, method and the
//! token length are logged, never the key secret, the token or the header.

use http::HeaderValue;
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::jwt::CdpJwtSigner;
use crate::signer::{JwtSigner, SIGNING_METHOD, SignRequest};
use crate::target::RequestTarget;

/// Prefix of every authorization value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Builds `Authorization: Bearer <jwt>` values for facilitator requests.
///
/// # Examples
///
/// ```
/// use x402_auth::{AuthConfig, AuthHeaderBuilder, AuthResult, Credentials, RequestTarget};
/// use x402_auth::signer::{JwtSigner, SignRequest};
///
/// struct FixedSigner;
///
/// impl JwtSigner for FixedSigner {
///     fn sign(&self, _request: &SignRequest<'_>) -> AuthResult<String> {
///         Ok("xyz.123".to_owned())
///     }
/// }
///
/// let builder = AuthHeaderBuilder::with_signer(FixedSigner, AuthConfig::default());
/// let header = builder
///     .build(
///         &Credentials::new("abc", "s3cr3t"),
///         &RequestTarget::new("https://x402.org/facilitator", "/verify"),
///     )
///     .unwrap();
/// assert_eq!(header, "Bearer xyz.123");
/// ```
#[derive(Debug, Clone)]
pub struct AuthHeaderBuilder<S = CdpJwtSigner> {
    signer: S,
    config: AuthConfig,
}

impl AuthHeaderBuilder<CdpJwtSigner> {
    /// Create a builder backed by [`CdpJwtSigner`].
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let signer = CdpJwtSigner::new().with_expires_in(config.expires_in_secs);
        Self { signer, config }
    }
}

impl Default for AuthHeaderBuilder<CdpJwtSigner> {
    fn default() -> Self {
        Self::new(AuthConfig::default())
    }
}

impl<S: JwtSigner> AuthHeaderBuilder<S> {
    /// Create a builder backed by a custom signer.
    ///
    /// Only [`AuthConfig::verbose`] is honored here.
    /// [`AuthConfig::expires_in_secs`] configures the default [`CdpJwtSigner`]
    /// in [`new`](AuthHeaderBuilder::new); a custom signer controls its own
    /// token lifetime and never sees that value.
    pub fn with_signer(signer: S, config: AuthConfig) -> Self {
        Self { signer, config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// The underlying signer.
    #[must_use]
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Build the authorization value for `target`.
    ///
    /// # Errors
    ///
    /// Returns the signer's error unchanged, or [`AuthError::EmptyToken`] if
    /// the signer produced an empty token.
    pub fn build(&self, credentials: &Credentials, target: &RequestTarget) -> AuthResult<String> {
        let request = SignRequest {
            key_id: credentials.key_id(),
            key_secret: credentials.expose_key_secret(),
            method: SIGNING_METHOD,
            host: target.host(),
            path: target.path(),
        };

        if self.config.verbose {
            debug!(
                key_id = %request.key_id,
                method = %request.method,
                host = %request.host,
                path = %request.path,
                "Generating facilitator JWT"
            );
        }

        let token = self.signer.sign(&request).inspect_err(|e| {
            if self.config.verbose {
                warn!(key_id = %request.key_id, error = %e, "JWT generation failed");
            }
        })?;

        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        if self.config.verbose {
            debug!(token_len = token.len(), "Generated bearer token");
        }

        Ok(format!("{BEARER_PREFIX}{token}"))
    }

    /// Build the authorization value as an [`http::HeaderValue`] marked sensitive.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build), plus [`AuthError::InvalidHeaderValue`]
    /// if the token contains bytes not allowed in a header.
    pub fn build_header_value(
        &self,
        credentials: &Credentials,
        target: &RequestTarget,
    ) -> AuthResult<HeaderValue> {
        let header = self.build(credentials, target)?;
        let mut value = HeaderValue::try_from(header).map_err(|_| AuthError::InvalidHeaderValue)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Build `"Bearer <jwt>"` for a `POST` to `host` + `path` with the default
/// [`CdpJwtSigner`] and quiet logging.
///
/// A single leading `https://` is removed from `host`; `path` is used verbatim.
pub fn build_auth_header(
    key_id: &str,
    key_secret: &str,
    host: &str,
    path: &str,
) -> AuthResult<String> {
    AuthHeaderBuilder::new(AuthConfig::default()).build(
        &Credentials::new(key_id, key_secret),
        &RequestTarget::new(host, path),
    )
}
