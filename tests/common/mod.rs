//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

/// Initialize the tracing subscriber once per test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "create_test_server=debug".into()),
            )
            .try_init();
    });
}

/// Plain HTTP client with a short timeout, so requests against a closed
/// listener fail quickly instead of hanging the test.
pub fn quick_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("client should build")
}

/// HTTPS client that trusts the given CA certificate.
pub fn trusting_client(ca_pem: &str) -> reqwest::Client {
    reqwest::Client::builder()
        .add_root_certificate(
            reqwest::Certificate::from_pem(ca_pem.as_bytes()).expect("CA PEM should parse"),
        )
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client should build")
}
