//! Crypto top-of-book quotes, price history and metadata.
//!
//! The quote and price endpoints only speak JSON, so these return a plain
//! [`serde_json::Value`] rather than a [`FormattedResult`].

use serde_json::Value;

use crate::core::{Format, FormattedResult, QueryParams, TiingoClient, TiingoError, format_response};

fn collect<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// A builder for top-of-book quotes of crypto pairs (e.g. `btcusd`).
pub struct CryptoTopBuilder {
    client: TiingoClient,
    tickers: Vec<String>,
    exchanges: Vec<String>,
    include_raw_exchange_data: bool,
    convert_currency: Option<String>,
}

impl CryptoTopBuilder {
    /// Creates a new `CryptoTopBuilder` for the given pairs.
    pub fn new<I, S>(client: &TiingoClient, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            client: client.clone(),
            tickers: collect(tickers),
            exchanges: Vec::new(),
            include_raw_exchange_data: false,
            convert_currency: None,
        }
    }

    /// Only consider quotes from these exchanges.
    #[must_use]
    pub fn exchanges<I, S>(mut self, exchanges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exchanges = collect(exchanges);
        self
    }

    /// Include per-exchange quotes alongside the aggregate.
    #[must_use]
    pub const fn include_raw_exchange_data(mut self, yes: bool) -> Self {
        self.include_raw_exchange_data = yes;
        self
    }

    /// Convert quotes into this currency.
    #[must_use]
    pub fn convert_currency(mut self, currency: impl Into<String>) -> Self {
        self.convert_currency = Some(currency.into());
        self
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_list("tickers", &self.tickers);
        params.push_list("exchanges", &self.exchanges);
        if self.include_raw_exchange_data {
            params.push("includeRawExchangeData", true);
        }
        params.push_opt("convertCurrency", self.convert_currency.as_deref());
        params
    }

    /// Executes the request.
    ///
    /// # Errors
    ///
    /// Transport or JSON errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn fetch(self) -> Result<Value, TiingoError> {
        self.client
            .get("tiingo/crypto/top", &self.params())
            .await?
            .json()
    }
}

/// A builder for crypto price history.
pub struct CryptoPricesBuilder {
    client: TiingoClient,
    tickers: Vec<String>,
    base_currency: Option<String>,
    start: Option<String>,
    end: Option<String>,
    exchanges: Vec<String>,
    consolidate_base_currency: bool,
    include_raw_exchange_data: bool,
    frequency: Option<String>,
    convert_currency: Option<String>,
}

impl CryptoPricesBuilder {
    /// Creates a new `CryptoPricesBuilder` for the given pairs.
    pub fn new<I, S>(client: &TiingoClient, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            client: client.clone(),
            tickers: collect(tickers),
            base_currency: None,
            start: None,
            end: None,
            exchanges: Vec::new(),
            consolidate_base_currency: false,
            include_raw_exchange_data: false,
            frequency: None,
            convert_currency: None,
        }
    }

    /// Return every pair quoted in this base currency.
    #[must_use]
    pub fn base_currency(mut self, currency: impl Into<String>) -> Self {
        self.base_currency = Some(currency.into());
        self
    }

    /// Start of the range, `YYYY-MM-DD`.
    #[must_use]
    pub fn start(mut self, date: impl Into<String>) -> Self {
        self.start = Some(date.into());
        self
    }

    /// End of the range, `YYYY-MM-DD`.
    #[must_use]
    pub fn end(mut self, date: impl Into<String>) -> Self {
        self.end = Some(date.into());
        self
    }

    /// Only consider these exchanges.
    #[must_use]
    pub fn exchanges<I, S>(mut self, exchanges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exchanges = collect(exchanges);
        self
    }

    /// Merge pairs sharing a base currency into one series.
    #[must_use]
    pub const fn consolidate_base_currency(mut self, yes: bool) -> Self {
        self.consolidate_base_currency = yes;
        self
    }

    /// Include per-exchange bars.
    #[must_use]
    pub const fn include_raw_exchange_data(mut self, yes: bool) -> Self {
        self.include_raw_exchange_data = yes;
        self
    }

    /// Bar size such as `1min`, `4hour` or `1day`; passed through unchecked.
    #[must_use]
    pub fn frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }

    /// Convert prices into this currency.
    #[must_use]
    pub fn convert_currency(mut self, currency: impl Into<String>) -> Self {
        self.convert_currency = Some(currency.into());
        self
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_list("tickers", &self.tickers);
        params.push_opt("baseCurrency", self.base_currency.as_deref());
        params.push_opt("startDate", self.start.as_deref());
        params.push_opt("endDate", self.end.as_deref());
        params.push_list("exchanges", &self.exchanges);
        if self.consolidate_base_currency {
            params.push("consolidateBaseCurrency", true);
        }
        if self.include_raw_exchange_data {
            params.push("includeRawExchangeData", true);
        }
        params.push_opt("resampleFreq", self.frequency.as_deref());
        params.push_opt("convertCurrency", self.convert_currency.as_deref());
        params
    }

    /// Executes the request.
    ///
    /// # Errors
    ///
    /// Transport or JSON errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn fetch(self) -> Result<Value, TiingoError> {
        self.client
            .get("tiingo/crypto/prices", &self.params())
            .await?
            .json()
    }
}

impl TiingoClient {
    /// Returns a [`CryptoTopBuilder`] for the given pairs.
    #[must_use]
    pub fn crypto_top<I, S>(&self, tickers: I) -> CryptoTopBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CryptoTopBuilder::new(self, tickers)
    }

    /// Returns a [`CryptoPricesBuilder`] for the given pairs.
    #[must_use]
    pub fn crypto_prices<I, S>(&self, tickers: I) -> CryptoPricesBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CryptoPricesBuilder::new(self, tickers)
    }

    /// Metadata for crypto pairs; every pair when `tickers` is empty.
    ///
    /// # Errors
    ///
    /// Transport or formatting errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn crypto_metadata(
        &self,
        tickers: &[&str],
        format: Format,
    ) -> Result<FormattedResult, TiingoError> {
        let mut params = QueryParams::new().with("format", format.wire_param());
        params.push_list("tickers", tickers);
        let envelope = self.get("tiingo/crypto", &params).await?;
        format_response(envelope, format, Some("CryptoMetadata"))
    }
}
