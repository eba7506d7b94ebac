//! x402-auth-header - print facilitator bearer authorization headers.
//!
//! With a path argument, prints one `Bearer <jwt>` value scoped to
//! `POST <facilitator host><facilitator route><path>`. Without one, prints a
//! `<endpoint>: Bearer <jwt>` line for `verify` and `settle`.
//!
//! Headers go to stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! CDP_API_KEY_ID=... CDP_API_KEY_SECRET=... x402-auth-header /verify
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CDP_API_KEY_ID` | *(required)* | API key id |
//! | `CDP_API_KEY_SECRET` | *(required)* | PEM EC key or base64 Ed25519 key pair |
//! | `FACILITATOR_URL` | `https://x402.org/facilitator` | Facilitator base URL |
//! | `X402_AUTH_VERBOSE` | `false` | Log redacted signing diagnostics |
//! | `X402_JWT_EXPIRES_IN` | `120` | Token lifetime in seconds |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;
use x402_auth::{AuthConfig, AuthHeaderBuilder, Credentials, FacilitatorConfig};

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());
    init_tracing(&log_level)?;

    let config = AuthConfig::from_env().context("failed to load auth configuration")?;
    let credentials = Credentials::from_env().context("CDP API credentials are not configured")?;
    let facilitator = FacilitatorConfig::from_env().context("invalid facilitator URL")?;

    info!(
        key_id = %credentials.key_id(),
        facilitator = %facilitator.url(),
        verbose = config.verbose,
        "building facilitator authorization"
    );

    let builder = AuthHeaderBuilder::new(config);

    if let Some(path) = std::env::args().nth(1) {
        let target = facilitator.target_for_path(&path);
        let header = builder
            .build(&credentials, &target)
            .with_context(|| format!("failed to sign request for {path}"))?;
        println!("{header}");
        return Ok(());
    }

    let headers = builder
        .facilitator_headers(&credentials, &facilitator)
        .context("failed to sign facilitator endpoints")?;
    for (endpoint, map) in headers.iter() {
        let value = map
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .with_context(|| format!("missing authorization header for {endpoint}"))?;
        println!("{endpoint}: {value}");
    }

    Ok(())
}
