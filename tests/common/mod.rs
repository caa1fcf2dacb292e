#![allow(dead_code)]

use httpmock::{Method::GET, Mock, MockServer};
use std::{fs, path::Path};
use tiingo_rs::TiingoClient;
use url::Url;

pub const API_KEY: &str = "test-key";
/// Never set, so tests do not pick up a developer's real key.
pub const UNSET_ENV: &str = "TIINGO_RS_TEST_UNSET_VARIABLE";

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn client(server: &MockServer) -> TiingoClient {
    TiingoClient::builder()
        .api_key(API_KEY)
        .api_key_env(UNSET_ENV)
        .base_url(Url::parse(&format!("{}/", server.base_url())).unwrap())
        .build()
        .unwrap()
}

pub fn fixture(endpoint: &str, symbol: &str, ext: &str) -> String {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let path = dir.join(format!("{endpoint}_{symbol}.{ext}"));
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

/// Weekly EOD prices for `symbol` served as JSON or CSV, depending on `ext`.
pub fn mock_weekly_prices<'a>(server: &'a MockServer, symbol: &'a str, ext: &'a str) -> Mock<'a> {
    let content_type = if ext == "csv" { "text/csv" } else { "application/json" };
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/tiingo/daily/{symbol}/prices"))
            .query_param("format", ext)
            .query_param("resampleFreq", "weekly")
            .query_param("startDate", "2018-01-05")
            .query_param("endDate", "2018-01-19");
        then.status(200)
            .header("content-type", content_type)
            .body(fixture("prices_weekly", symbol, ext));
    })
}
