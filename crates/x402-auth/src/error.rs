//! Error types for facilitator authentication.
//!
//! Every failure to produce a bearer header is an [`AuthError`]. Variants never
//! carry the key secret or a generated token, so they are safe to log.

/// Errors that can occur while building facilitator authorization headers.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The API key id is empty.
    #[error("API key id is required")]
    MissingKeyId,

    /// The API key secret is empty.
    #[error("API key secret is required")]
    MissingKeySecret,

    /// The key secret is neither a PEM EC key nor a base64 Ed25519 key pair.
    #[error("invalid key format: must be either a PEM EC key or a base64 Ed25519 key")]
    InvalidKeyFormat,

    /// The key secret looked like a PEM EC key but could not be parsed.
    #[error("invalid EC private key: {0}")]
    InvalidEcKey(String),

    /// The key secret decoded to 64 bytes that do not form an Ed25519 key pair.
    #[error("invalid Ed25519 key: {0}")]
    InvalidEd25519Key(String),

    /// A JWT segment could not be serialized.
    #[error("failed to encode JWT segment: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The signer returned an empty token.
    #[error("signer returned an empty token")]
    EmptyToken,

    /// The signed token contains bytes that are not valid in an HTTP header value.
    #[error("bearer token is not a valid header value")]
    InvalidHeaderValue,

    /// The facilitator URL does not use an `http` or `https` scheme.
    #[error("invalid facilitator URL {0}: must start with http:// or https://")]
    InvalidFacilitatorUrl(String),

    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),

    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidConfig {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Convenience result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
