//! Core components of the `tiingo-rs` client.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`TiingoClient`] and its builder.
//! - The primary [`TiingoError`] type.
//! - The transport ([`TiingoClient::request`]) and its [`ResponseEnvelope`].
//! - Response shaping ([`Format`], [`FormattedResult`]) and object-view [`Record`]s.

/// The main client (`TiingoClient`), builder, and configuration.
pub mod client;
/// The primary error type (`TiingoError`) for the crate.
pub mod error;
/// Output formats and response shaping.
pub mod format;
/// Transport: query parameters, response envelopes and the request call.
pub mod net;
/// Attribute-accessible records.
pub mod object;

#[cfg(feature = "dataframe")]
pub mod dataframe;

// convenient re-exports so most code can just `use crate::core::TiingoClient`
pub use client::constants::API_KEY_ENV;
pub use client::{TiingoClient, TiingoClientBuilder};
pub use error::TiingoError;
pub use format::{Format, FormattedResult, format_response, format_response_str};
pub use net::{QueryParams, ResponseEnvelope};
pub use object::{ObjectView, Record};
