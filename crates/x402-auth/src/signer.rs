//! The signing seam between header construction and JWT generation.
//!
//! [`AuthHeaderBuilder`](crate::AuthHeaderBuilder) only talks to a
//! [`JwtSigner`]. The crate ships [`CdpJwtSigner`](crate::jwt::CdpJwtSigner);
//! tests and alternative key stores implement the trait themselves.

use std::fmt;

use crate::error::AuthResult;

/// The only request method tokens are signed for.
pub const SIGNING_METHOD: &str = "POST";

/// Everything a signer needs to mint one token.
#[derive(Clone, Copy)]
pub struct SignRequest<'a> {
    /// The API key id.
    pub key_id: &'a str,
    /// The API key secret.
    pub key_secret: &'a str,
    /// The HTTP method the token is scoped to.
    pub method: &'a str,
    /// The bare request host.
    pub host: &'a str,
    /// The request path.
    pub path: &'a str,
}

impl SignRequest<'_> {
    /// The `"<METHOD> <host><path>"` string the token is scoped to.
    ///
    /// # Examples
    ///
    /// ```
    /// use x402_auth::signer::SignRequest;
    ///
    /// let request = SignRequest {
    ///     key_id: "abc",
    ///     key_secret: "s3cr3t",
    ///     method: "POST",
    ///     host: "x402.org/facilitator",
    ///     path: "/verify",
    /// };
    /// assert_eq!(request.uri(), "POST x402.org/facilitator/verify");
    /// ```
    #[must_use]
    pub fn uri(&self) -> String {
        format!("{} {}{}", self.method, self.host, self.path)
    }
}

impl fmt::Debug for SignRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignRequest")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .field("method", &self.method)
            .field("host", &self.host)
            .field("path", &self.path)
            .finish()
    }
}

/// Produces a signed token for a [`SignRequest`].
///
/// Implementations must be safe to call concurrently and must not log the key
/// secret or the token they return.
pub trait JwtSigner: Send + Sync {
    /// Sign `request` and return the compact token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`](crate::AuthError) when the key is missing or
    /// malformed, or when the token cannot be encoded.
    fn sign(&self, request: &SignRequest<'_>) -> AuthResult<String>;
}

impl<T: JwtSigner + ?Sized> JwtSigner for &T {
    fn sign(&self, request: &SignRequest<'_>) -> AuthResult<String> {
        (**self).sign(request)
    }
}

impl<T: JwtSigner + ?Sized> JwtSigner for std::sync::Arc<T> {
    fn sign(&self, request: &SignRequest<'_>) -> AuthResult<String> {
        (**self).sign(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_redact_secret_in_debug_output() {
        let request = SignRequest {
            key_id: "abc",
            key_secret: "s3cr3t",
            method: SIGNING_METHOD,
            host: "x.com",
            path: "/verify",
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("abc"));
        assert!(!debug.contains("s3cr3t"));
    }
}
