//! Unit tests for the scanner API client.

mod construction_tests;
mod scan_tests;

use crate::api::ScannerApi;

pub(crate) const USER_ID: &str = "6f1c2a9e-3b1d-4c7a-9f2e-0a1b2c3d4e5f";

pub(crate) fn api_with_mock(mock_uri: &str) -> ScannerApi {
    let mut api = ScannerApi::new(mock_uri);
    api.base_url = mock_uri.to_string();
    api
}
