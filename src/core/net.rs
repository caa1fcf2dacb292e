//! Transport: one HTTP exchange against the configured base address.

use bytes::Bytes;
use reqwest::{Client, Method};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

use crate::core::{TiingoClient, TiingoError};

/// Query parameters for one endpoint request, in insertion order.
///
/// Values are passed to the server exactly as stored. List-valued parameters are
/// serialized here, on the caller side, before the request reaches the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// An empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a scalar parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Append a scalar parameter in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Append the parameter only when a value is present.
    pub fn push_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(v) = value {
            self.push(key, v);
        }
    }

    /// Append a list as one comma-joined value; empty lists are skipped.
    pub fn push_list<S: AsRef<str>>(&mut self, key: impl Into<String>, values: &[S]) {
        if values.is_empty() {
            return;
        }
        let joined = values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        self.push(key, joined);
    }

    /// Iterate over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// `true` if no parameters were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// The raw response of one successful call: status, headers and body bytes.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    status: u16,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
}

impl ResponseEnvelope {
    pub(crate) const fn from_parts(status: u16, url: Url, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            url,
            headers,
            body,
        }
    }

    /// The HTTP status code (always 2xx for envelopes returned by the transport).
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// The final request URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Data`] if the body is not valid UTF-8.
    pub fn text(&self) -> Result<&str, TiingoError> {
        std::str::from_utf8(&self.body)
            .map_err(|e| TiingoError::Data(format!("response body is not UTF-8: {e}")))
    }

    /// Body parsed as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Json`] if the body does not parse as `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TiingoError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Consume the envelope and keep only the body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

impl TiingoClient {
    /// Issue `method` against `path` (relative to the base address) with `params`.
    ///
    /// Fixed headers (API token, content type, user agent) are attached by the
    /// underlying client. No retries, no caching.
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Status`] for non-2xx responses and [`TiingoError::Http`]
    /// for connection-level failures.
    #[tracing::instrument(skip(self, params), err)]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: &QueryParams,
    ) -> Result<ResponseEnvelope, TiingoError> {
        let url = self.base_url().join(path.trim_start_matches('/'))?;
        send(self.http(), method, url, params).await
    }

    /// GET shortcut for [`TiingoClient::request`].
    ///
    /// # Errors
    ///
    /// See [`TiingoClient::request`].
    pub async fn get(&self, path: &str, params: &QueryParams) -> Result<ResponseEnvelope, TiingoError> {
        self.request(Method::GET, path, params).await
    }
}

/// Send to an absolute URL; used for resources hosted outside the API base.
pub(crate) async fn send(
    http: &Client,
    method: Method,
    url: Url,
    params: &QueryParams,
) -> Result<ResponseEnvelope, TiingoError> {
    tracing::debug!(%method, %url, "sending request");

    let mut req = http.request(method, url);
    if !params.is_empty() {
        let pairs: Vec<(&str, &str)> = params.iter().collect();
        req = req.query(&pairs);
    }

    let resp = req.send().await?;
    let status = resp.status();
    let final_url = resp.url().clone();
    let headers = resp.headers().clone();

    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        tracing::error!(status = status.as_u16(), url = %final_url, body = %message, "request failed");
        return Err(TiingoError::Status {
            status: status.as_u16(),
            url: final_url.to_string(),
            message,
        });
    }

    let body = resp.bytes().await?;
    Ok(ResponseEnvelope::from_parts(status.as_u16(), final_url, headers, body))
}
