use std::io::{Cursor, Write};

use httpmock::Method::GET;
use url::Url;
use zip::write::SimpleFileOptions;

use crate::common;
use tiingo_rs::{TiingoClient, TiingoError};

const LISTING: &str = "ticker,exchange,assetType,priceCurrency,startDate,endDate\n\
AAPL,NASDAQ,Stock,USD,1980-12-12,2018-01-19\n\
GOOGL,NASDAQ,Stock,USD,2004-08-19,2018-01-19\n\
SPY,NYSE ARCA,ETF,USD,1993-01-29,2018-01-19\n\
VFIAX,NMFQS,Mutual Fund,USD,2000-11-13,\n";

fn archive(name: &str, content: &str) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file(name, SimpleFileOptions::default()).unwrap();
    zip.write_all(content.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

fn client_with_listing(server: &httpmock::MockServer) -> TiingoClient {
    TiingoClient::builder()
        .api_key(common::API_KEY)
        .api_key_env(common::UNSET_ENV)
        .base_url(Url::parse(&server.base_url()).unwrap())
        .listing_url(Url::parse(&server.url("/docs/supported_tickers.zip")).unwrap())
        .build()
        .unwrap()
}

#[tokio::test]
async fn listing_is_unzipped_and_filtered_by_asset_type() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/docs/supported_tickers.zip");
        then.status(200)
            .header("content-type", "application/zip")
            .body(archive("supported_tickers.csv", LISTING));
    });
    let client = client_with_listing(&server);

    let stocks = client.list_stock_tickers().await.unwrap();
    assert_eq!(
        stocks.iter().map(|t| t.ticker.as_str()).collect::<Vec<_>>(),
        ["AAPL", "GOOGL"]
    );

    let etfs = client.list_etf_tickers().await.unwrap();
    assert_eq!(etfs.len(), 1);
    assert_eq!(etfs[0].exchange.as_deref(), Some("NYSE ARCA"));

    let funds = client.list_fund_tickers().await.unwrap();
    assert_eq!(funds[0].ticker, "VFIAX");
    assert_eq!(funds[0].end_date, None);

    let everything = client.list_tickers(&[]).await.unwrap();
    assert_eq!(everything.len(), 4);

    let mixed = client.list_tickers(&["ETF", "Mutual Fund"]).await.unwrap();
    assert_eq!(mixed.len(), 2);

    mock.assert_hits(5);
}

#[tokio::test]
async fn listing_download_does_not_carry_the_api_token() {
    let server = common::setup_server();
    let with_token = server.mock(|when, then| {
        when.method(GET)
            .path("/docs/supported_tickers.zip")
            .header_exists("authorization");
        then.status(500);
    });
    let without = server.mock(|when, then| {
        when.method(GET).path("/docs/supported_tickers.zip");
        then.status(200)
            .body(archive("supported_tickers.csv", LISTING));
    });
    let client = client_with_listing(&server);

    client.list_tickers(&[]).await.unwrap();
    assert_eq!(with_token.hits(), 0);
    without.assert();
}

#[tokio::test]
async fn archive_without_listing_file_is_an_archive_error() {
    let server = common::setup_server();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/docs/supported_tickers.zip");
        then.status(200).body(archive("other.csv", LISTING));
    });
    let client = client_with_listing(&server);

    let err = client.list_tickers(&[]).await.unwrap_err();
    assert!(matches!(err, TiingoError::Archive(_)), "{err}");
}
