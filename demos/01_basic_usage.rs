use std::time::Duration;

use tiingo_rs::{Format, TiingoClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Build a client; the API key comes from TIINGO_API_KEY.
    let client = TiingoClient::builder()
        .timeout(Duration::from_secs(10))
        .session(true)
        .build()?;
    println!("{client}");

    // 2. Ticker metadata as attribute-style records.
    let meta = client
        .ticker_metadata("GOOGL", Format::Object)
        .await?
        .into_object()?;
    if let Some(rec) = meta.as_one() {
        println!("--- {} ---", rec.attr("ticker")?);
        println!("Name: {}", rec["name"]);
        println!("Exchange: {}", rec["exchangeCode"]);
        println!("History: {} to {}", rec["startDate"], rec["endDate"]);
    }
    println!();

    // 3. Weekly prices as JSON, then the same query as CSV text.
    let prices = client
        .prices("GOOGL")
        .start("2018-01-05")
        .end("2018-01-19")
        .frequency("weekly")
        .fetch()
        .await?
        .into_json()?;
    println!("--- Weekly GOOGL (json) ---");
    for row in prices.as_array().into_iter().flatten() {
        println!("  {} close={}", row["date"], row["close"]);
    }

    let csv = client
        .prices("GOOGL")
        .start("2018-01-05")
        .end("2018-01-19")
        .frequency("weekly")
        .columns(["open", "close"])
        .format(Format::Csv)
        .fetch()
        .await?
        .into_csv()?;
    println!("--- Weekly GOOGL (csv) ---\n{csv}");

    // 4. Latest news for a couple of tickers.
    let news = client
        .news()
        .tickers(["aapl", "googl"])
        .limit(5)
        .format(Format::Object)
        .fetch()
        .await?
        .into_object()?;
    println!("--- News ---");
    for article in news.records() {
        println!("  {} ({})", article["title"], article["source"]);
    }
    println!();

    // 5. Crypto top-of-book.
    let top = client.crypto_top(["btcusd"]).fetch().await?;
    println!("--- BTCUSD top of book ---\n{top:#}");

    // 6. Supported ETFs.
    let etfs = client.list_etf_tickers().await?;
    println!("{} supported ETFs", etfs.len());

    Ok(())
}
