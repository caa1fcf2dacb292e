//! End-of-day and intraday ticker prices, ticker metadata and the supported-tickers listing.

mod frequency;
mod listing;

pub use frequency::{Frequency, is_valid_frequency};
pub use listing::TickerListing;

use crate::core::{
    Format, FormattedResult, QueryParams, ResponseEnvelope, TiingoClient, TiingoError,
    format_response,
};

/// Price-history parameters shared by [`PriceBuilder`] and the frame projector.
#[derive(Debug, Clone, Default)]
pub(crate) struct PriceQuery {
    pub(crate) start: Option<String>,
    pub(crate) end: Option<String>,
    pub(crate) columns: Vec<String>,
    pub(crate) frequency: Frequency,
}

impl PriceQuery {
    /// Fetch one ticker's series; `fmt` only decides the wire `format` parameter.
    pub(crate) async fn fetch(
        &self,
        client: &TiingoClient,
        ticker: &str,
        fmt: Format,
    ) -> Result<ResponseEnvelope, TiingoError> {
        let mut params = QueryParams::new()
            .with("format", fmt.wire_param())
            .with("resampleFreq", self.frequency.as_str());
        params.push_opt("startDate", self.start.as_deref());
        params.push_opt("endDate", self.end.as_deref());
        params.push_list("columns", &self.columns);

        client
            .get(&self.frequency.prices_path(ticker), &params)
            .await
    }
}

/// A builder for fetching the price history of one ticker.
///
/// By default this returns the latest end-of-day price as JSON.
pub struct PriceBuilder {
    client: TiingoClient,
    ticker: String,
    query: PriceQuery,
    frequency: String,
    format: Format,
}

impl PriceBuilder {
    /// Creates a new `PriceBuilder` for a given ticker.
    pub fn new(client: &TiingoClient, ticker: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            ticker: ticker.into(),
            query: PriceQuery::default(),
            frequency: "daily".into(),
            format: Format::Json,
        }
    }

    /// Start of the range, `YYYY-MM-DD`.
    #[must_use]
    pub fn start(mut self, date: impl Into<String>) -> Self {
        self.query.start = Some(date.into());
        self
    }

    /// End of the range, `YYYY-MM-DD`.
    #[must_use]
    pub fn end(mut self, date: impl Into<String>) -> Self {
        self.query.end = Some(date.into());
        self
    }

    /// Restrict the returned columns (e.g. `open`, `close`, `volume`).
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Resample frequency: `daily`, `weekly`, `monthly`, `annually`, or `<n>min` / `<n>hour`.
    #[must_use]
    pub fn frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = frequency.into();
        self
    }

    /// Output format (default JSON).
    #[must_use]
    pub const fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Executes the request.
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::InvalidFrequency`] before any network call if the frequency
    /// is not recognized, otherwise transport or formatting errors.
    #[tracing::instrument(skip(self), err, fields(ticker = %self.ticker))]
    pub async fn fetch(mut self) -> Result<FormattedResult, TiingoError> {
        self.query.frequency = self.frequency.parse()?;
        let envelope = self.query.fetch(&self.client, &self.ticker, self.format).await?;
        format_response(envelope, self.format, Some("TickerPrice"))
    }
}

impl TiingoClient {
    /// Returns a [`PriceBuilder`] for `ticker`.
    #[must_use]
    pub fn prices(&self, ticker: impl Into<String>) -> PriceBuilder {
        PriceBuilder::new(self, ticker)
    }

    /// Metadata for one ticker (name, exchange, description, date range).
    ///
    /// # Errors
    ///
    /// Transport or formatting errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn ticker_metadata(
        &self,
        ticker: &str,
        format: Format,
    ) -> Result<FormattedResult, TiingoError> {
        let envelope = self
            .get(&format!("tiingo/daily/{ticker}"), &QueryParams::new())
            .await?;
        format_response(envelope, format, Some("Ticker"))
    }

    /// Every supported ticker whose asset type is in `asset_types`; all of them if empty.
    ///
    /// Downloads and unpacks the zipped CSV listing.
    ///
    /// # Errors
    ///
    /// Transport, archive or CSV errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn list_tickers(&self, asset_types: &[&str]) -> Result<Vec<TickerListing>, TiingoError> {
        listing::fetch_listing(self, asset_types).await
    }

    /// Supported stock tickers.
    ///
    /// # Errors
    ///
    /// See [`TiingoClient::list_tickers`].
    pub async fn list_stock_tickers(&self) -> Result<Vec<TickerListing>, TiingoError> {
        self.list_tickers(&["Stock"]).await
    }

    /// Supported ETF tickers.
    ///
    /// # Errors
    ///
    /// See [`TiingoClient::list_tickers`].
    pub async fn list_etf_tickers(&self) -> Result<Vec<TickerListing>, TiingoError> {
        self.list_tickers(&["ETF"]).await
    }

    /// Supported mutual fund tickers.
    ///
    /// # Errors
    ///
    /// See [`TiingoClient::list_tickers`].
    pub async fn list_fund_tickers(&self) -> Result<Vec<TickerListing>, TiingoError> {
        self.list_tickers(&["Mutual Fund"]).await
    }
}
