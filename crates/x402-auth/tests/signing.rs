//! End-to-end tests: real keys, real signatures, captured logs.

use std::io;
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use ed25519_dalek::Verifier as _;
use p256::ecdsa::signature::Verifier as _;
use p256::pkcs8::LineEnding;
use tracing_subscriber::fmt::MakeWriter;
use x402_auth::{
    AuthConfig, AuthError, AuthHeaderBuilder, Credentials, FacilitatorConfig, FacilitatorEndpoint,
    RequestTarget, build_auth_header,
};

const KEY_ID: &str = "organizations/test-org/apiKeys/test-key";

fn ec_key() -> (p256::ecdsa::SigningKey, String) {
    let secret = p256::SecretKey::from_slice(&[0x24; 32]).unwrap();
    let pem = secret.to_sec1_pem(LineEnding::LF).unwrap().to_string();
    (p256::ecdsa::SigningKey::from(secret), pem)
}

fn ed25519_key() -> (ed25519_dalek::SigningKey, String) {
    let key = ed25519_dalek::SigningKey::from_bytes(&[9; 32]);
    let secret = STANDARD.encode(key.to_keypair_bytes());
    (key, secret)
}

/// Split `Bearer <h>.<c>.<s>` into signing input, claims JSON and signature bytes.
fn split_header(header: &str) -> (String, serde_json::Value, Vec<u8>) {
    let token = header.strip_prefix("Bearer ").expect("bearer prefix");
    let (signing_input, signature) = token.rsplit_once('.').unwrap();
    let claims = signing_input.split('.').nth(1).unwrap();
    let claims = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(claims).unwrap()).unwrap();
    (
        signing_input.to_owned(),
        claims,
        URL_SAFE_NO_PAD.decode(signature).unwrap(),
    )
}

#[test]
fn test_should_produce_verifiable_es256_header() {
    let (signing_key, pem) = ec_key();
    let header =
        build_auth_header(KEY_ID, &pem, "https://x402.org/facilitator", "/verify").unwrap();

    let (signing_input, claims, signature) = split_header(&header);
    assert_eq!(claims["uris"][0], "POST x402.org/facilitator/verify");
    assert_eq!(claims["sub"], KEY_ID);

    let signature = p256::ecdsa::Signature::from_slice(&signature).unwrap();
    signing_key
        .verifying_key()
        .verify(signing_input.as_bytes(), &signature)
        .unwrap();
}

#[test]
fn test_should_produce_verifiable_eddsa_header() {
    let (signing_key, secret) = ed25519_key();
    let header = build_auth_header(KEY_ID, &secret, "api.example.com", "/settle").unwrap();

    let (signing_input, claims, signature) = split_header(&header);
    assert_eq!(claims["uris"][0], "POST api.example.com/settle");

    let signature = ed25519_dalek::Signature::from_slice(&signature).unwrap();
    signing_key
        .verifying_key()
        .verify(signing_input.as_bytes(), &signature)
        .unwrap();
}

#[test]
fn test_should_return_error_without_header_for_bad_key() {
    let result = build_auth_header("abc", "s3cr3t", "https://x402.org/facilitator", "/verify");
    assert!(matches!(result, Err(AuthError::InvalidKeyFormat)));
}

#[test]
fn test_should_sign_each_facilitator_endpoint_separately() {
    let (_, pem) = ec_key();
    let builder = AuthHeaderBuilder::new(AuthConfig::default());
    let headers = builder
        .facilitator_headers(&Credentials::new(KEY_ID, pem), &FacilitatorConfig::cdp())
        .unwrap();

    for endpoint in FacilitatorEndpoint::ALL {
        let value = headers
            .get(endpoint)
            .and_then(|h| h.get(http::header::AUTHORIZATION))
            .unwrap();
        let (_, claims, _) = split_header(value.to_str().unwrap());
        assert_eq!(
            claims["uris"][0],
            format!("POST api.cdp.coinbase.com/platform/v2/x402{}", endpoint.path())
        );
    }
}

#[test]
fn test_should_scope_custom_path_under_facilitator_route() {
    let (_, pem) = ec_key();
    let facilitator = FacilitatorConfig::new("https://x402.org/facilitator/").unwrap();
    let header = AuthHeaderBuilder::new(AuthConfig::default())
        .build(
            &Credentials::new(KEY_ID, pem),
            &facilitator.target_for_path("/verify"),
        )
        .unwrap();

    let (_, claims, _) = split_header(&header);
    assert_eq!(claims["uris"][0], "POST x402.org/facilitator/verify");
}

#[test]
fn test_should_be_callable_from_many_threads() {
    let (_, pem) = ec_key();
    let builder = Arc::new(AuthHeaderBuilder::new(AuthConfig::default()));
    let credentials = Arc::new(Credentials::new(KEY_ID, pem));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let builder = Arc::clone(&builder);
            let credentials = Arc::clone(&credentials);
            std::thread::spawn(move || {
                builder.build(&credentials, &RequestTarget::new("x.com", format!("/p{i}")))
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let header = handle.join().unwrap().unwrap();
        let (_, claims, _) = split_header(&header);
        assert_eq!(claims["uris"][0], format!("POST x.com/p{i}"));
    }
}

/// In-memory log sink for a scoped `tracing` subscriber.
#[derive(Debug, Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with every `tracing` event at TRACE and above captured.
fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.contents())
}

fn assert_no_secrets(logs: &str, pem: &str, header: &str) {
    let token = header.strip_prefix("Bearer ").unwrap();
    for line in pem.lines().filter(|l| !l.starts_with("-----")) {
        assert!(!logs.contains(line), "key material leaked into logs");
    }
    for segment in token.split('.') {
        assert!(!logs.contains(segment), "token leaked into logs");
    }
}

#[test]
fn test_should_log_nothing_by_default() {
    let (_, pem) = ec_key();
    let (header, logs) = capture_logs(|| {
        AuthHeaderBuilder::new(AuthConfig::default())
            .build(
                &Credentials::new(KEY_ID, pem.clone()),
                &RequestTarget::new("https://x402.org/facilitator", "/verify"),
            )
            .unwrap()
    });

    assert!(logs.is_empty(), "unexpected log output: {logs}");
    assert_no_secrets(&logs, &pem, &header);
}

#[test]
fn test_should_log_redacted_fields_when_verbose() {
    let (_, pem) = ec_key();
    let config = AuthConfig {
        verbose: true,
        ..AuthConfig::default()
    };
    let (header, logs) = capture_logs(|| {
        AuthHeaderBuilder::new(config)
            .build(
                &Credentials::new(KEY_ID, pem.clone()),
                &RequestTarget::new("https://x402.org/facilitator", "/verify"),
            )
            .unwrap()
    });

    assert!(logs.contains(KEY_ID));
    assert!(logs.contains("x402.org/facilitator"));
    assert!(logs.contains("token_len"));
    assert!(!logs.contains("Bearer"));
    assert_no_secrets(&logs, &pem, &header);
}

#[test]
fn test_should_log_failure_without_secret_when_verbose() {
    let config = AuthConfig {
        verbose: true,
        ..AuthConfig::default()
    };
    let (result, logs) = capture_logs(|| {
        AuthHeaderBuilder::new(config).build(
            &Credentials::new("abc", "s3cr3t"),
            &RequestTarget::new("x.com", "/verify"),
        )
    });

    assert!(result.is_err());
    assert!(logs.contains("JWT generation failed"));
    assert!(!logs.contains("s3cr3t"));
}
