//! Public client surface + builder.
//! Internals are split into `auth` (API key resolution) and `constants` (UA + defaults).

pub(crate) mod auth;
pub(crate) mod constants;

use crate::core::TiingoError;
use constants::{API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_LISTING_URL, USER_AGENT};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Asynchronous client for the Tiingo REST API.
///
/// The API key, base address and fixed headers are set once in [`TiingoClientBuilder::build`]
/// and never change afterwards, so clones can be used from independent tasks.
#[derive(Debug, Clone)]
pub struct TiingoClient {
    http: Client,
    // No API headers: used for resources hosted outside the API.
    plain_http: Client,
    base_url: Url,
    listing_url: Url,
}

impl TiingoClient {
    /// Create a new builder.
    pub fn builder() -> TiingoClientBuilder {
        TiingoClientBuilder::default()
    }

    /// Build a client with default settings, reading the key from `TIINGO_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Configuration`] if no API key is available.
    pub fn from_env() -> Result<Self, TiingoError> {
        Self::builder().build()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
    pub(crate) fn plain_http(&self) -> &Client {
        &self.plain_http
    }
    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }
    pub(crate) fn listing_url(&self) -> &Url {
        &self.listing_url
    }
}

impl fmt::Display for TiingoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<TiingoClient(url=\"{}\")>",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

/* ----------------------- Builder ----------------------- */

/// Builder for [`TiingoClient`].
#[derive(Default)]
pub struct TiingoClientBuilder {
    api_key: Option<String>,
    api_key_env: Option<String>,
    user_agent: Option<String>,
    base_url: Option<Url>,
    listing_url: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    session: bool,
}

impl TiingoClientBuilder {
    /// Use this API key instead of the environment.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Read the API key from this environment variable (default `TIINGO_API_KEY`).
    #[must_use]
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = Some(name.into());
        self
    }

    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the REST base (e.g., `https://api.tiingo.com/`).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Override the supported-tickers archive URL.
    #[must_use]
    pub fn listing_url(mut self, url: Url) -> Self {
        self.listing_url = Some(url);
        self
    }

    /// Set a global request timeout (overall). Default: none.
    #[must_use]
    pub const fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    #[must_use]
    pub const fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Keep idle connections alive and reuse them across calls.
    ///
    /// Off by default: every call opens a fresh connection.
    #[must_use]
    pub const fn session(mut self, yes: bool) -> Self {
        self.session = yes;
        self
    }

    /// Resolve the API key and build the client.
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Configuration`] if no key is configured or found in the
    /// environment, or an HTTP/URL error if the underlying client cannot be built.
    pub fn build(self) -> Result<TiingoClient, TiingoError> {
        let env_var = self.api_key_env.as_deref().unwrap_or(API_KEY_ENV);
        let api_key = auth::resolve_api_key(self.api_key.as_deref(), env_var)?;

        let mut auth = HeaderValue::from_str(&format!("Token {api_key}"))
            .map_err(|_| TiingoError::Configuration("API key contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = self.http_builder().default_headers(headers).build()?;
        let plain_http = self.http_builder().build()?;

        let base_url = match self.base_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        let listing_url = match self.listing_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_LISTING_URL)?,
        };

        Ok(TiingoClient {
            http,
            plain_http,
            base_url: ensure_trailing_slash(base_url),
            listing_url,
        })
    }
}

impl TiingoClientBuilder {
    fn http_builder(&self) -> reqwest::ClientBuilder {
        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));

        if !self.session {
            httpb = httpb.pool_max_idle_per_host(0);
        }
        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }
        httpb
    }
}

/// `Url::join` replaces the last segment unless the base ends with `/`.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
