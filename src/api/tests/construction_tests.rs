//! Tests for ScannerApi construction.

use crate::api::ScannerApi;
use crate::config::Config;

#[test]
fn creates_api_with_normalized_url() {
    let api = ScannerApi::new("http://0.0.0.0:8000/");
    assert_eq!(api.base_url, "http://127.0.0.1:8000");
}

#[test]
fn url_joins_paths() {
    let api = ScannerApi::new("https://scanner.example.com");
    assert_eq!(api.url("/leaderboard/"), "https://scanner.example.com/leaderboard/");
}

#[test]
fn from_config_uses_configured_url() {
    let config = Config {
        api_url: "http://scanner.local:9000".to_string(),
        ..Config::default()
    };
    let api = ScannerApi::from_config(&config).unwrap();
    assert_eq!(api.base_url(), "http://scanner.local:9000");
}
