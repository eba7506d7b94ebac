//! Bearer JWT authorization headers for x402 payment facilitators.
//!
//! Facilitators such as the Coinbase Developer Platform expect every `POST`
//! to carry `Authorization: Bearer <jwt>`, where the JWT is signed with the
//! caller's API key and scoped to the exact host and path being called.
//!
//! # Usage
//!
//! ```rust,no_run
//! use x402_auth::build_auth_header;
//!
//! let key_secret = std::env::var("CDP_API_KEY_SECRET").unwrap();
//! let header = build_auth_header(
//!     "organizations/org/apiKeys/key",
//!     &key_secret,
//!     "https://api.cdp.coinbase.com",
//!     "/platform/v2/x402/verify",
//! )?;
//! assert!(header.starts_with("Bearer "));
//! # Ok::<(), x402_auth::AuthError>(())
//! ```
//!
//! # Modules
//!
//! - [`builder`] - `AuthHeaderBuilder` and the `build_auth_header` shortcut
//! - [`config`] - Logging and token lifetime configuration
//! - [`credentials`] - API key id and redacted secret
//! - [`error`] - Authentication error types
//! - [`facilitator`] - Facilitator URLs and per-endpoint header sets
//! - [`jwt`] - CDP-style ES256 / EdDSA JWT generation
//! - [`signer`] - The `JwtSigner` trait
//! - [`target`] - Request host/path and scheme stripping

pub mod builder;
pub mod config;
pub mod credentials;
pub mod error;
pub mod facilitator;
pub mod jwt;
pub mod signer;
pub mod target;

pub use builder::{AuthHeaderBuilder, BEARER_PREFIX, build_auth_header};
pub use config::AuthConfig;
pub use credentials::Credentials;
pub use error::{AuthError, AuthResult};
pub use facilitator::{FacilitatorConfig, FacilitatorEndpoint, FacilitatorHeaders};
pub use jwt::CdpJwtSigner;
pub use signer::{JwtSigner, SignRequest};
pub use target::RequestTarget;
