use std::io::{Cursor, Read};

use futures::StreamExt;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::core::{QueryParams, TiingoClient, TiingoError, net};

const LISTING_FILE: &str = "supported_tickers.csv";

/// One row of the supported-tickers listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerListing {
    pub ticker: String,
    pub exchange: Option<String>,
    /// `Stock`, `ETF`, `Mutual Fund`, ...
    pub asset_type: Option<String>,
    pub price_currency: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub(super) async fn fetch_listing(
    client: &TiingoClient,
    asset_types: &[&str],
) -> Result<Vec<TickerListing>, TiingoError> {
    let envelope = net::send(
        client.plain_http(),
        Method::GET,
        client.listing_url().clone(),
        &QueryParams::new(),
    )
    .await?;

    let csv = unzip_listing(envelope.body())?;
    let rows = parse_listing(&csv).await?;

    if asset_types.is_empty() {
        return Ok(rows);
    }
    Ok(rows
        .into_iter()
        .filter(|r| {
            r.asset_type
                .as_deref()
                .is_some_and(|t| asset_types.contains(&t))
        })
        .collect())
}

fn unzip_listing(bytes: &[u8]) -> Result<Vec<u8>, TiingoError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut file = archive.by_name(LISTING_FILE)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

async fn parse_listing(csv: &[u8]) -> Result<Vec<TickerListing>, TiingoError> {
    let mut reader = csv_async::AsyncReader::from_reader(csv);
    let headers = reader.headers().await?.clone();
    let col = |name: &str| headers.iter().position(|h| h == name);
    let (ticker, exchange, asset_type, currency, start, end) = (
        col("ticker").ok_or_else(|| TiingoError::Data("listing has no ticker column".into()))?,
        col("exchange"),
        col("assetType"),
        col("priceCurrency"),
        col("startDate"),
        col("endDate"),
    );

    let mut rows = Vec::new();
    let mut records = reader.records();
    while let Some(record) = records.next().await {
        let record = record?;
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        rows.push(TickerListing {
            ticker: record.get(ticker).unwrap_or_default().to_string(),
            exchange: field(exchange),
            asset_type: field(asset_type),
            price_currency: field(currency),
            start_date: field(start),
            end_date: field(end),
        });
    }
    Ok(rows)
}
