//! Time-indexed price tables for one or more tickers.

mod parse;
mod table;

pub use table::PriceFrame;

use futures::future::try_join_all;

use crate::core::{Format, TiingoClient, TiingoError};
use crate::prices::{Frequency, PriceQuery};

/// Price, volume and adjustment fields a metric may name.
pub const VALID_METRICS: [&str; 12] = [
    "open",
    "high",
    "low",
    "close",
    "volume",
    "adjOpen",
    "adjHigh",
    "adjLow",
    "adjClose",
    "adjVolume",
    "divCash",
    "splitFactor",
];

/// One ticker, or a collection of tickers to merge on a single metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tickers {
    One(String),
    Many(Vec<String>),
}

impl Tickers {
    fn symbols(&self) -> &[String] {
        match self {
            Self::One(t) => std::slice::from_ref(t),
            Self::Many(ts) => ts,
        }
    }
}

impl From<&str> for Tickers {
    fn from(t: &str) -> Self {
        Self::One(t.to_string())
    }
}

impl From<String> for Tickers {
    fn from(t: String) -> Self {
        Self::One(t)
    }
}

impl<S: Into<String>> From<Vec<S>> for Tickers {
    fn from(ts: Vec<S>) -> Self {
        Self::Many(ts.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Tickers {
    fn from(ts: [S; N]) -> Self {
        Self::Many(ts.into_iter().map(Into::into).collect())
    }
}

/// A builder for assembling price history into a [`PriceFrame`].
///
/// For a single ticker the frame holds every returned metric (or only `metric`).
/// For a collection, `metric` is required and the frame holds one column per ticker,
/// outer-joined on time.
pub struct FrameBuilder {
    client: TiingoClient,
    tickers: Tickers,
    query: PriceQuery,
    metric: Option<String>,
    frequency: String,
    format: Format,
}

impl FrameBuilder {
    /// Creates a new `FrameBuilder`.
    pub fn new(client: &TiingoClient, tickers: impl Into<Tickers>) -> Self {
        Self {
            client: client.clone(),
            tickers: tickers.into(),
            query: PriceQuery::default(),
            metric: None,
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

    /// Project a single metric (one of [`VALID_METRICS`]).
    #[must_use]
    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    /// Columns requested from the server.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Resample frequency (default `daily`).
    #[must_use]
    pub fn frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = frequency.into();
        self
    }

    /// Source format: [`Format::Csv`] parses delimited text, anything else JSON.
    #[must_use]
    pub const fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    fn validate(&self) -> Result<Frequency, TiingoError> {
        if let Some(m) = self.metric.as_deref()
            && !VALID_METRICS.contains(&m)
        {
            return Err(TiingoError::InvalidColumn {
                column: m.to_string(),
                valid: VALID_METRICS.to_vec(),
            });
        }
        if let Tickers::Many(ts) = &self.tickers {
            if ts.is_empty() {
                return Err(TiingoError::MissingParameter(
                    "at least one ticker is required".into(),
                ));
            }
            if ts.len() > 1 && self.metric.is_none() {
                return Err(TiingoError::MissingParameter(
                    "metric is required when several tickers are requested; \
                     provide a metric or request one ticker at a time"
                        .into(),
                ));
            }
        }
        self.frequency.parse()
    }

    /// Validate, fetch every ticker, and assemble the frame.
    ///
    /// All validation happens before any network call.
    ///
    /// # Errors
    ///
    /// [`TiingoError::InvalidColumn`], [`TiingoError::MissingParameter`] or
    /// [`TiingoError::InvalidFrequency`] for bad input; transport and parse errors otherwise.
    #[tracing::instrument(skip(self), err, fields(tickers = ?self.tickers.symbols()))]
    pub async fn fetch(mut self) -> Result<PriceFrame, TiingoError> {
        self.query.frequency = self.validate()?;

        let futures = self
            .tickers
            .symbols()
            .iter()
            .map(|t| fetch_series(&self.client, &self.query, t, self.format));
        let fetched = try_join_all(futures).await?;

        let named = match (&self.tickers, self.metric.as_deref()) {
            // validation guarantees exactly one series here
            (_, None) => {
                let series = fetched.into_iter().next().unwrap_or_default();
                series
                    .columns
                    .iter()
                    .filter_map(|c| series.column(c).map(|col| (c.clone(), col)))
                    .collect()
            }
            (tickers, Some(metric)) => {
                let rename = matches!(tickers, Tickers::Many(_));
                tickers
                    .symbols()
                    .iter()
                    .zip(&fetched)
                    .map(|(ticker, series)| {
                        let col = project_metric(ticker, series, metric)?;
                        let name = if rename { ticker.clone() } else { metric.to_string() };
                        Ok((name, col))
                    })
                    .collect::<Result<Vec<_>, TiingoError>>()?
            }
        };

        Ok(PriceFrame::outer_join(named))
    }
}

type Column = std::collections::BTreeMap<chrono::DateTime<chrono::Utc>, Option<f64>>;

fn project_metric(ticker: &str, series: &parse::Series, metric: &str) -> Result<Column, TiingoError> {
    if series.rows.is_empty() {
        return Ok(Column::new());
    }
    series.column(metric).ok_or_else(|| {
        TiingoError::Data(format!("response for {ticker} has no {metric} column"))
    })
}

async fn fetch_series(
    client: &TiingoClient,
    query: &PriceQuery,
    ticker: &str,
    format: Format,
) -> Result<parse::Series, TiingoError> {
    let envelope = query.fetch(client, ticker, format).await?;
    match format {
        Format::Csv => parse::from_csv(envelope.body()).await,
        Format::Json | Format::Object | Format::Raw => parse::from_json(envelope.body()),
    }
}

impl TiingoClient {
    /// Returns a [`FrameBuilder`] for one ticker or a collection of tickers.
    #[must_use]
    pub fn frame(&self, tickers: impl Into<Tickers>) -> FrameBuilder {
        FrameBuilder::new(self, tickers)
    }
}
