use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum TiingoError {
    /// A required setup value (credential, object name, message handler) was not supplied.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An error occurred during an HTTP request (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx HTTP status code.
    #[error("unexpected response status: {status} at {url}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
        /// The response body, as returned by the server.
        message: String,
    },

    /// An error occurred with the WebSocket connection.
    #[error("WebSocket error: {0}")]
    Websocket(Box<tokio_tungstenite::tungstenite::Error>),

    /// A provided URL could not be parsed or joined.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A JSON body could not be parsed or serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV body could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),

    /// The supported-tickers archive could not be read.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Local I/O failed while reading a downloaded payload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data received from the API was in an unexpected format or was missing a required field.
    #[error("data format unexpected or missing field: {0}")]
    Data(String),

    /// A frequency string matched neither the end-of-day set nor the intraday pattern.
    #[error(
        "{0} is an invalid frequency; expected one of daily, weekly, monthly, annually \
         or an intraday value such as 5min or 1hour"
    )]
    InvalidFrequency(String),

    /// A requested metric is not one of the recognized price/volume/adjustment fields.
    #[error("invalid column {column:?}; valid data items are: {}", valid.join(", "))]
    InvalidColumn {
        /// The offending column name.
        column: String,
        /// The recognized column names.
        valid: Vec<&'static str>,
    },

    /// A parameter that is required in combination with others was not supplied.
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    /// A streaming channel identifier is outside the recognized set.
    #[error("invalid stream channel {0:?}; channel must be one of iex, fx, crypto")]
    InvalidChannel(String),

    /// An output format outside the recognized set.
    #[error("invalid format {0:?}; format must be one of json, csv, object, raw")]
    InvalidFormat(String),
}

impl TiingoError {
    /// Returns `true` for network-level failures and non-2xx responses.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Websocket(_))
    }

    /// The HTTP status code carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TiingoError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Websocket(Box::new(e))
    }
}
