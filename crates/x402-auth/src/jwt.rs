//! CDP-style JWT generation.
//!
//! [`CdpJwtSigner`] mints short-lived compact JWS tokens scoped to a single
//! request:
//!
//! ```text
//! header : {"alg":"ES256"|"EdDSA","kid":<key id>,"typ":"JWT","nonce":<32 hex>}
//! claims : {"sub":<key id>,"iss":"cdp","nbf":now,"iat":now,"exp":now+ttl,
//!           "uris":["POST <host><path>"]}
//! token  : b64url(header) "." b64url(claims) "." b64url(signature)
//! ```
//!
//! The key secret selects the algorithm: a PEM P-256 private key (SEC1 or
//! PKCS#8) signs with ES256, and the base64 encoding of a 64-byte Ed25519 key
//! pair (`seed || public`) signs with EdDSA.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use ed25519_dalek::Signer as _;
use p256::ecdsa::signature::Signer as _;
use p256::pkcs8::DecodePrivateKey;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_EXPIRES_IN_SECS;
use crate::error::{AuthError, AuthResult};
use crate::signer::{JwtSigner, SignRequest};

/// Issuer claim of every token.
pub const ISSUER: &str = "cdp";
/// Type header of every token.
pub const TOKEN_TYPE: &str = "JWT";

const PEM_BEGIN: &str = "-----BEGIN";
const SEC1_LABEL: &str = "BEGIN EC PRIVATE KEY";
const ED25519_KEYPAIR_LEN: usize = 64;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// JOSE header of a generated token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoseHeader {
    /// Signing algorithm, `ES256` or `EdDSA`.
    pub alg: String,
    /// The API key id.
    pub kid: String,
    /// Always `JWT`.
    pub typ: String,
    /// Random per-token nonce.
    pub nonce: String,
}

/// Claims of a generated token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdpClaims {
    /// The API key id.
    pub sub: String,
    /// Always `cdp`.
    pub iss: String,
    /// Not-before, seconds since the epoch.
    pub nbf: i64,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Requests the token is valid for, as `"<METHOD> <host><path>"`.
    pub uris: Vec<String>,
}

/// A parsed signing key.
enum ParsedKey {
    Es256(p256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl ParsedKey {
    fn parse(secret: &str) -> AuthResult<Self> {
        let secret = secret.trim();
        if secret.starts_with(PEM_BEGIN) {
            return parse_ec_pem(secret);
        }

        let bytes = STANDARD
            .decode(secret)
            .map_err(|_| AuthError::InvalidKeyFormat)?;
        let keypair: [u8; ED25519_KEYPAIR_LEN] = bytes
            .try_into()
            .map_err(|_| AuthError::InvalidKeyFormat)?;
        let key = ed25519_dalek::SigningKey::from_keypair_bytes(&keypair)
            .map_err(|e| AuthError::InvalidEd25519Key(e.to_string()))?;
        Ok(Self::Ed25519(key))
    }

    fn algorithm(&self) -> &'static str {
        match self {
            Self::Es256(_) => "ES256",
            Self::Ed25519(_) => "EdDSA",
        }
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            Self::Es256(key) => {
                let signature: p256::ecdsa::Signature = key.sign(message);
                signature.to_bytes().to_vec()
            }
            Self::Ed25519(key) => key.sign(message).to_bytes().to_vec(),
        }
    }
}

impl fmt::Debug for ParsedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParsedKey").field(&self.algorithm()).finish()
    }
}

/// Parse a P-256 private key from SEC1 or PKCS#8 PEM.
///
/// Keys copied out of environment variables often carry literal `\n` or
/// `\r\n` sequences instead of line breaks; those are restored first and
/// line endings are normalized to LF.
fn parse_ec_pem(pem: &str) -> AuthResult<ParsedKey> {
    let mut pem = pem
        .replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .replace('\r', "");
    if !pem.ends_with('\n') {
        pem.push('\n');
    }
    let secret = if pem.contains(SEC1_LABEL) {
        p256::SecretKey::from_sec1_pem(&pem).map_err(|e| AuthError::InvalidEcKey(e.to_string()))?
    } else {
        p256::SecretKey::from_pkcs8_pem(&pem)
            .map_err(|e| AuthError::InvalidEcKey(e.to_string()))?
    };
    Ok(ParsedKey::Es256(p256::ecdsa::SigningKey::from(secret)))
}

/// The default [`JwtSigner`]: CDP-compatible ES256 / EdDSA tokens.
#[derive(Clone)]
pub struct CdpJwtSigner {
    expires_in_secs: i64,
    clock: Clock,
}

impl CdpJwtSigner {
    /// Create a signer with the default 120 second token lifetime.
    #[must_use]
    pub fn new() -> Self {
        Self {
            expires_in_secs: i64::try_from(DEFAULT_EXPIRES_IN_SECS).unwrap_or(i64::MAX),
            clock: Arc::new(Utc::now),
        }
    }

    /// Set the token lifetime in seconds.
    #[must_use]
    pub fn with_expires_in(mut self, secs: u64) -> Self {
        self.expires_in_secs = i64::try_from(secs).unwrap_or(i64::MAX);
        self
    }

    /// Replace the clock used for `nbf`, `iat` and `exp`.
    #[must_use]
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }
}

impl Default for CdpJwtSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CdpJwtSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CdpJwtSigner")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish_non_exhaustive()
    }
}

impl JwtSigner for CdpJwtSigner {
    fn sign(&self, request: &SignRequest<'_>) -> AuthResult<String> {
        if request.key_id.is_empty() {
            return Err(AuthError::MissingKeyId);
        }
        if request.key_secret.is_empty() {
            return Err(AuthError::MissingKeySecret);
        }

        let key = ParsedKey::parse(request.key_secret)?;
        let now = (self.clock)().timestamp();

        let header = JoseHeader {
            alg: key.algorithm().to_owned(),
            kid: request.key_id.to_owned(),
            typ: TOKEN_TYPE.to_owned(),
            nonce: new_nonce(),
        };
        let claims = CdpClaims {
            sub: request.key_id.to_owned(),
            iss: ISSUER.to_owned(),
            nbf: now,
            iat: now,
            exp: now.saturating_add(self.expires_in_secs),
            uris: vec![request.uri()],
        };

        let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(&claims)?);
        let signature = URL_SAFE_NO_PAD.encode(key.sign(signing_input.as_bytes()));

        Ok(format!("{signing_input}.{signature}"))
    }
}

fn encode_segment<T: Serialize>(value: &T) -> AuthResult<String> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(value)?))
}

/// Per-token nonce: a v4 UUID as 32 hex digits.
fn new_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
