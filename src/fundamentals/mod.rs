//! Fundamentals: metric definitions, daily-updated metrics and statement data.

use crate::core::{Format, FormattedResult, QueryParams, TiingoClient, TiingoError, format_response};

fn range_params(format: Format, start: Option<&str>, end: Option<&str>) -> QueryParams {
    let mut params = QueryParams::new();
    params.push_opt("startDate", start);
    params.push_opt("endDate", end);
    params.push("format", format.wire_param());
    params
}

impl TiingoClient {
    /// Definitions of the fundamental fields available for `tickers` (all fields if empty).
    ///
    /// # Errors
    ///
    /// Transport or formatting errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn fundamentals_definitions(
        &self,
        tickers: &[&str],
        format: Format,
    ) -> Result<FormattedResult, TiingoError> {
        let mut params = QueryParams::new();
        params.push_list("tickers", tickers);
        params.push("format", format.wire_param());
        let envelope = self.get("tiingo/fundamentals/definitions", &params).await?;
        format_response(envelope, format, Some("FundamentalDefinition"))
    }

    /// Metrics that move with the daily price, such as market cap and P/E.
    ///
    /// # Errors
    ///
    /// Transport or formatting errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn fundamentals_daily(
        &self,
        ticker: &str,
        start: Option<&str>,
        end: Option<&str>,
        format: Format,
    ) -> Result<FormattedResult, TiingoError> {
        let params = range_params(format, start, end);
        let envelope = self
            .get(&format!("tiingo/fundamentals/{ticker}/daily"), &params)
            .await?;
        format_response(envelope, format, Some("FundamentalDaily"))
    }

    /// Quarterly and annual statement data.
    ///
    /// With `as_reported` the values are those published on the release date
    /// rather than the latest restated ones.
    ///
    /// # Errors
    ///
    /// Transport or formatting errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn fundamentals_statements(
        &self,
        ticker: &str,
        as_reported: bool,
        start: Option<&str>,
        end: Option<&str>,
        format: Format,
    ) -> Result<FormattedResult, TiingoError> {
        let mut params = range_params(format, start, end);
        params.push("asReported", as_reported);
        let envelope = self
            .get(&format!("tiingo/fundamentals/{ticker}/statements"), &params)
            .await?;
        format_response(envelope, format, Some("FundamentalStatement"))
    }
}
