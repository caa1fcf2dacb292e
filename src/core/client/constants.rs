//! Centralized constants for default endpoints, headers and the credential variable.

/// Identifying client string sent as the User-Agent on every REST call.
pub(crate) const USER_AGENT: &str = concat!("tiingo-rs ", env!("CARGO_PKG_VERSION"));

/// Tiingo REST API base (relative endpoint paths are joined onto it).
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.tiingo.com/";

/// Zipped CSV listing every supported ticker with its asset type and date range.
pub(crate) const DEFAULT_LISTING_URL: &str =
    "https://apimedia.tiingo.com/docs/tiingo/daily/supported_tickers.zip";

/// Tiingo websocket base (the channel name is appended as the path).
pub(crate) const DEFAULT_STREAM_URL: &str = "wss://api.tiingo.com";

/// Environment variable consulted when no API key is configured explicitly.
pub const API_KEY_ENV: &str = "TIINGO_API_KEY";
