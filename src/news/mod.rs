//! Curated news articles and institutional bulk-download files.

use crate::core::{Format, FormattedResult, QueryParams, TiingoClient, TiingoError, format_response};

/// A builder for searching news articles.
///
/// Defaults match the server's: 100 results from offset 0, newest `publishedDate` first.
pub struct NewsBuilder {
    client: TiingoClient,
    tickers: Vec<String>,
    tags: Vec<String>,
    sources: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    limit: u32,
    offset: u32,
    sort_by: String,
    only_with_tickers: bool,
    format: Format,
}

impl NewsBuilder {
    /// Creates a new `NewsBuilder`.
    pub fn new(client: &TiingoClient) -> Self {
        Self {
            client: client.clone(),
            tickers: Vec::new(),
            tags: Vec::new(),
            sources: Vec::new(),
            start: None,
            end: None,
            limit: 100,
            offset: 0,
            sort_by: "publishedDate".into(),
            only_with_tickers: false,
            format: Format::Json,
        }
    }

    /// Restrict to articles tagged with any of these tickers.
    #[must_use]
    pub fn tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tickers = tickers.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to articles carrying any of these topic tags.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to these source domains (e.g. `bloomberg.com`).
    #[must_use]
    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Earliest publication date, `YYYY-MM-DD`.
    #[must_use]
    pub fn start(mut self, date: impl Into<String>) -> Self {
        self.start = Some(date.into());
        self
    }

    /// Latest publication date, `YYYY-MM-DD`.
    #[must_use]
    pub fn end(mut self, date: impl Into<String>) -> Self {
        self.end = Some(date.into());
        self
    }

    /// Maximum number of articles (server caps this at 1000).
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Pagination offset.
    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Sort key, `publishedDate` or `crawlDate`; always descending.
    #[must_use]
    pub fn sort_by(mut self, key: impl Into<String>) -> Self {
        self.sort_by = key.into();
        self
    }

    /// Only return articles that have at least one tagged ticker.
    #[must_use]
    pub const fn only_with_tickers(mut self, yes: bool) -> Self {
        self.only_with_tickers = yes;
        self
    }

    /// Output format (default JSON).
    #[must_use]
    pub const fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with("limit", self.limit)
            .with("offset", self.offset)
            .with("sortBy", &self.sort_by)
            .with("onlyWithTickers", self.only_with_tickers);
        params.push_list("tickers", &self.tickers);
        params.push_list("source", &self.sources);
        params.push_list("tags", &self.tags);
        params.push_opt("startDate", self.start.as_deref());
        params.push_opt("endDate", self.end.as_deref());
        if self.format == Format::Csv {
            params.push("format", "csv");
        }
        params
    }

    /// Executes the search.
    ///
    /// # Errors
    ///
    /// Transport or formatting errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn fetch(self) -> Result<FormattedResult, TiingoError> {
        let envelope = self.client.get("tiingo/news", &self.params()).await?;
        format_response(envelope, self.format, Some("NewsArticle"))
    }
}

impl TiingoClient {
    /// Returns a [`NewsBuilder`].
    #[must_use]
    pub fn news(&self) -> NewsBuilder {
        NewsBuilder::new(self)
    }

    /// Lists available bulk-download files, or describes one when `file_id` is given.
    ///
    /// Only available on institutional plans.
    ///
    /// # Errors
    ///
    /// Transport or formatting errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn bulk_news(
        &self,
        file_id: Option<&str>,
        format: Format,
    ) -> Result<FormattedResult, TiingoError> {
        let path = match file_id {
            Some(id) if !id.is_empty() => format!("tiingo/news/bulk_download/{id}"),
            _ => "tiingo/news/bulk_download".to_string(),
        };
        let envelope = self.get(&path, &QueryParams::new()).await?;
        format_response(envelope, format, Some("BulkNews"))
    }
}
