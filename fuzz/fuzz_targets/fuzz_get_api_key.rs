//! Fuzz target for `Authorization` header extraction.
//!
//! Feeds arbitrary bytes in as the header value and checks that
//! `get_api_key`:
//!
//! - Never panics
//! - Only succeeds with a non-empty token free of whitespace
//! - Only succeeds when the value starts with the `ApiKey` scheme
//!
//! # Running the Fuzz Tests
//!
//! ```bash
//! cargo +nightly install cargo-fuzz
//! cargo +nightly fuzz run fuzz_get_api_key -- -max_total_time=60
//! ```

#![no_main]

use apikey_gate::auth::API_KEY_SCHEME;
use apikey_gate::get_api_key;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Bytes that cannot form a header value never reach the extractor
    let Ok(value) = HeaderValue::from_bytes(data) else {
        return;
    };

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);

    if let Ok(token) = get_api_key(&headers) {
        assert!(!token.is_empty());
        assert!(!token.chars().any(char::is_whitespace));

        let raw = std::str::from_utf8(data).unwrap_or_default();
        assert!(raw.trim_start().starts_with(API_KEY_SCHEME));
    }
});
