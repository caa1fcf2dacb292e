//! Real-time quote push over a websocket.
//!
//! A [`StreamBuilder`] validates the subscription up front and produces a
//! [`StreamSession`], which connects, sends the subscription config as its first
//! frame and hands every inbound message to the caller's handler until the
//! connection closes.
//!
//! ```no_run
//! # async fn demo() -> Result<(), tiingo_rs::TiingoError> {
//! use serde_json::json;
//! use tiingo_rs::StreamBuilder;
//!
//! let session = StreamBuilder::new()
//!     .config(json!({ "eventName": "subscribe", "eventData": { "thresholdLevel": 5 } }))
//!     .channel("iex")
//!     .on_message(|msg| println!("{msg}"))
//!     .build()?;
//! session.run().await
//! # }
//! ```

mod channel;

pub use channel::StreamChannel;

use std::future::Future;
use std::pin::Pin;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Map, Value};
use tokio::{
    select,
    sync::{oneshot, watch},
    task::JoinHandle,
};
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::core::TiingoError;
use crate::core::client::auth::resolve_with;
use crate::core::client::constants::{API_KEY_ENV, DEFAULT_STREAM_URL};

const AUTHORIZATION: &str = "authorization";

type Handler = Box<dyn FnMut(String) + Send + 'static>;

/// Observable lifecycle of a [`StreamSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Built, connection not yet open.
    Connecting,
    /// Connected and the subscription config has been sent.
    Subscribed,
    /// At least one message has been delivered to the handler.
    Running,
    /// The session has ended, by peer close, error or shutdown.
    Closed,
}

/// Builder for a single streaming session.
pub struct StreamBuilder {
    config: Value,
    channel: Option<String>,
    handler: Option<Handler>,
    api_key_env: String,
    base_url: Option<Url>,
}

impl Default for StreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Value::Object(Map::new()),
            channel: None,
            handler: None,
            api_key_env: API_KEY_ENV.to_string(),
            base_url: None,
        }
    }

    /// The subscription payload, a JSON object sent verbatim as the first frame.
    ///
    /// If it has no `authorization` field the API key from the environment is inserted.
    #[must_use]
    pub fn config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// One of `iex`, `fx` or `crypto`.
    #[must_use]
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Called once per inbound message, in arrival order, on the session's task.
    ///
    /// A handler that blocks stalls delivery and the keep-alive replies.
    #[must_use]
    pub fn on_message<F>(mut self, handler: F) -> Self
    where
        F: FnMut(String) + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Name of the environment variable holding the API key (default `TIINGO_API_KEY`).
    #[must_use]
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = name.into();
        self
    }

    /// Override the websocket base address (default `wss://api.tiingo.com`).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Validate the credential, channel and handler, in that order.
    ///
    /// No connection is attempted here.
    ///
    /// # Errors
    ///
    /// [`TiingoError::Configuration`] if the config is not an object or no API key is
    /// available, [`TiingoError::InvalidChannel`] for an unknown channel and
    /// [`TiingoError::MissingParameter`] if no handler was set.
    pub fn build(self) -> Result<StreamSession, TiingoError> {
        self.build_with(|name| std::env::var(name).ok())
    }

    fn build_with<F>(self, lookup: F) -> Result<StreamSession, TiingoError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let mut config = match self.config {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(TiingoError::Configuration(format!(
                    "subscription config must be a JSON object, got {other}"
                )));
            }
        };

        // only a non-empty string counts as a caller-supplied key
        let explicit = config.get(AUTHORIZATION).and_then(Value::as_str).map(str::to_owned);
        let key = resolve_with(explicit.as_deref(), &self.api_key_env, lookup)?;
        config.insert(AUTHORIZATION.to_string(), Value::String(key));

        let channel: StreamChannel = self.channel.as_deref().unwrap_or_default().parse()?;

        let handler = self.handler.ok_or_else(|| {
            TiingoError::MissingParameter("a message handler must be supplied".into())
        })?;

        let base = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_STREAM_URL)?,
        };
        let url = Url::parse(&format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            channel.as_str()
        ))?;

        let (state, _) = watch::channel(StreamState::Connecting);
        Ok(StreamSession {
            url,
            channel,
            config,
            handler,
            state,
        })
    }
}

/// A validated, not yet connected streaming session.
pub struct StreamSession {
    url: Url,
    channel: StreamChannel,
    config: Map<String, Value>,
    handler: Handler,
    state: watch::Sender<StreamState>,
}

impl std::fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession")
            .field("url", &self.url.as_str())
            .field("channel", &self.channel)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl StreamSession {
    /// The full websocket address, base plus channel.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn channel(&self) -> StreamChannel {
        self.channel
    }

    /// Watch the session's lifecycle.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<StreamState> {
        self.state.subscribe()
    }

    /// Connect and deliver messages until the peer closes the connection.
    ///
    /// # Errors
    ///
    /// Connection, handshake and protocol errors end the session; they are logged
    /// and returned. There is no reconnect.
    pub async fn run(self) -> Result<(), TiingoError> {
        self.run_until(std::future::pending()).await
    }

    /// Like [`StreamSession::run`], but also stops when `shutdown` completes,
    /// sending a close frame first.
    ///
    /// # Errors
    ///
    /// See [`StreamSession::run`].
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<(), TiingoError>
    where
        F: Future<Output = ()>,
    {
        let shutdown = std::pin::pin!(shutdown);
        let result = self.drive(shutdown).await;
        if let Err(e) = &result {
            tracing::error!(url = %self.url, error = %e, "stream connection failed");
        }
        self.transition(StreamState::Closed);
        result
    }

    /// Run on a new task; the returned handle stops or aborts it.
    ///
    /// Dropping the handle also asks the session to stop.
    #[must_use]
    pub fn spawn(self) -> StreamHandle {
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let join = tokio::spawn(self.run_until(async move {
            let _ = stop_rx.await;
        }));
        StreamHandle {
            join,
            stop_tx: Some(stop_tx),
        }
    }

    fn transition(&self, next: StreamState) {
        let prev = self.state.send_replace(next);
        if prev != next {
            tracing::debug!(channel = %self.channel, from = ?prev, to = ?next, "stream state");
        }
    }

    async fn drive<F>(&mut self, mut shutdown: Pin<&mut F>) -> Result<(), TiingoError>
    where
        F: Future<Output = ()>,
    {
        self.transition(StreamState::Connecting);
        tracing::info!(url = %self.url, "connecting to stream");
        let (ws, _response) = tokio_tungstenite::connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = ws.split();

        let subscribe = serde_json::to_string(&self.config)?;
        write.send(Message::Text(subscribe.into())).await?;
        self.transition(StreamState::Subscribed);
        tracing::info!(channel = %self.channel, "subscription sent");

        loop {
            select! {
                () = shutdown.as_mut() => {
                    tracing::info!(channel = %self.channel, "closing stream on request");
                    if let Err(e) = write.send(Message::Close(None)).await {
                        tracing::warn!(error = %e, "failed to send close frame");
                    }
                    return Ok(());
                }
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => self.deliver(text.as_str().to_owned()),
                        Some(Ok(Message::Binary(data))) => match String::from_utf8(data.to_vec()) {
                            Ok(text) => self.deliver(text),
                            Err(_) => tracing::warn!(len = data.len(), "dropping non-UTF-8 binary frame"),
                        },
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            tracing::info!(?frame, "server closed stream");
                            // polling flushes the queued close reply; ends once the peer drops
                            while let Some(Ok(_)) = read.next().await {}
                            return Ok(());
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                        None => {
                            tracing::info!("stream ended");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    fn deliver(&mut self, text: String) {
        if *self.state.borrow() != StreamState::Running {
            self.transition(StreamState::Running);
        }
        (self.handler)(text);
    }
}

/// A handle for a session running on its own task.
pub struct StreamHandle {
    join: JoinHandle<Result<(), TiingoError>>,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl StreamHandle {
    /// Ask the session to close and wait for it to finish.
    ///
    /// # Errors
    ///
    /// The session's own error, or [`TiingoError::Data`] if its task panicked.
    pub async fn stop(mut self) -> Result<(), TiingoError> {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        self.wait_inner().await
    }

    /// Wait for the session to end on its own (peer close or error).
    ///
    /// # Errors
    ///
    /// See [`StreamHandle::stop`].
    pub async fn wait(mut self) -> Result<(), TiingoError> {
        // keep the stop sender alive so waiting does not trigger shutdown
        let _stop = self.stop_tx.take();
        self.wait_inner().await
    }

    /// Immediately abort the task without a close frame.
    pub fn abort(self) {
        self.join.abort();
    }

    async fn wait_inner(self) -> Result<(), TiingoError> {
        self.join
            .await
            .map_err(|e| TiingoError::Data(format!("stream task failed: {e}")))?
    }
}
