//! tiingo-rs: async client for the Tiingo REST and websocket APIs.
//!
//! REST calls go through one [`TiingoClient`]; each endpoint returns its body shaped
//! as JSON, CSV text, attribute-style [`Record`]s or the raw [`ResponseEnvelope`]
//! (see [`Format`]). Price history for several tickers can be merged into a
//! time-indexed [`PriceFrame`]. Real-time quotes are pushed through a
//! [`StreamSession`].
//!
//! ```no_run
//! # async fn demo() -> Result<(), tiingo_rs::TiingoError> {
//! use tiingo_rs::{Format, TiingoClient};
//!
//! let client = TiingoClient::from_env()?;
//! let meta = client.ticker_metadata("GOOGL", Format::Object).await?.into_object()?;
//! println!("{}", meta.as_one().map_or("?", |r| r["name"].as_str().unwrap_or("?")));
//!
//! let frame = client
//!     .frame(["GOOGL", "AAPL"])
//!     .metric("adjClose")
//!     .start("2018-01-05")
//!     .end("2018-01-19")
//!     .frequency("weekly")
//!     .fetch()
//!     .await?;
//! for (ts, row) in frame.rows() {
//!     println!("{ts} {row:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod crypto;
pub mod frame;
pub mod fundamentals;
pub mod news;
pub mod prices;
pub mod stream;

pub use core::{
    API_KEY_ENV, Format, FormattedResult, ObjectView, QueryParams, Record, ResponseEnvelope,
    TiingoClient, TiingoClientBuilder, TiingoError, format_response, format_response_str,
};
#[cfg(feature = "dataframe")]
pub use core::dataframe::ToDataFrame;
pub use crypto::{CryptoPricesBuilder, CryptoTopBuilder};
pub use frame::{FrameBuilder, PriceFrame, Tickers, VALID_METRICS};
pub use news::NewsBuilder;
pub use prices::{Frequency, PriceBuilder, TickerListing, is_valid_frequency};
pub use stream::{StreamBuilder, StreamChannel, StreamHandle, StreamSession, StreamState};
