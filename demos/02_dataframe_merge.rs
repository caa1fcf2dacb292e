use tiingo_rs::{Format, TiingoClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = TiingoClient::from_env()?;

    // One column per ticker, outer-joined on date.
    let frame = client
        .frame(["GOOGL", "AAPL", "MSFT"])
        .metric("adjClose")
        .start("2018-01-01")
        .end("2018-03-31")
        .frequency("weekly")
        .format(Format::Csv)
        .fetch()
        .await?;

    println!("date        {}", frame.columns().join("  "));
    for (ts, row) in frame.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|v| v.map_or_else(|| "NaN".to_string(), |v| format!("{v:.2}")))
            .collect();
        println!("{}  {}", ts.format("%Y-%m-%d"), cells.join("  "));
    }

    // Every metric for a single ticker.
    let googl = client
        .frame("GOOGL")
        .start("2018-01-01")
        .end("2018-01-31")
        .fetch()
        .await?;
    println!("\nGOOGL: {} rows x {} columns", googl.len(), googl.width());

    #[cfg(feature = "dataframe")]
    {
        use tiingo_rs::ToDataFrame;
        println!("{}", frame.to_dataframe()?);
    }

    Ok(())
}
