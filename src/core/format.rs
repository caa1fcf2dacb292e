//! Response shaping: JSON, CSV text, object view or the raw envelope.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::core::{ObjectView, ResponseEnvelope, TiingoError};

/// Requested output format for an endpoint call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Parsed JSON, returned unchanged.
    #[default]
    Json,
    /// Body as UTF-8 text, unparsed.
    Csv,
    /// JSON wrapped into attribute-accessible records.
    Object,
    /// The response envelope itself.
    Raw,
}

impl Format {
    /// All recognized formats.
    pub const ALL: [Self; 4] = [Self::Json, Self::Csv, Self::Object, Self::Raw];

    /// The wire name of this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Object => "object",
            Self::Raw => "raw",
        }
    }

    /// The value sent as the `format` query parameter; the server only knows json and csv.
    #[must_use]
    pub(crate) const fn wire_param(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::Object | Self::Raw => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = TiingoError;

    /// Case-sensitive: only the four lowercase names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| TiingoError::InvalidFormat(s.to_string()))
    }
}

/// A shaped response. Immutable once produced.
#[derive(Debug, Clone)]
pub enum FormattedResult {
    /// A parsed mapping or list of mappings.
    Json(Value),
    /// Delimited text for the caller to parse.
    Csv(String),
    /// Attribute-accessible records.
    Object(ObjectView),
    /// The uninterpreted envelope.
    Raw(ResponseEnvelope),
}

impl FormattedResult {
    /// The JSON value, if this is a [`FormattedResult::Json`].
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Data`] for any other variant.
    pub fn into_json(self) -> Result<Value, TiingoError> {
        match self {
            Self::Json(v) => Ok(v),
            other => Err(other.mismatch(Format::Json)),
        }
    }

    /// The CSV text, if this is a [`FormattedResult::Csv`].
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Data`] for any other variant.
    pub fn into_csv(self) -> Result<String, TiingoError> {
        match self {
            Self::Csv(s) => Ok(s),
            other => Err(other.mismatch(Format::Csv)),
        }
    }

    /// The object view, if this is a [`FormattedResult::Object`].
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Data`] for any other variant.
    pub fn into_object(self) -> Result<ObjectView, TiingoError> {
        match self {
            Self::Object(o) => Ok(o),
            other => Err(other.mismatch(Format::Object)),
        }
    }

    /// The envelope, if this is a [`FormattedResult::Raw`].
    ///
    /// # Errors
    ///
    /// Returns [`TiingoError::Data`] for any other variant.
    pub fn into_raw(self) -> Result<ResponseEnvelope, TiingoError> {
        match self {
            Self::Raw(r) => Ok(r),
            other => Err(other.mismatch(Format::Raw)),
        }
    }

    /// The format this result was produced for.
    #[must_use]
    pub const fn format(&self) -> Format {
        match self {
            Self::Json(_) => Format::Json,
            Self::Csv(_) => Format::Csv,
            Self::Object(_) => Format::Object,
            Self::Raw(_) => Format::Raw,
        }
    }

    fn mismatch(&self, wanted: Format) -> TiingoError {
        TiingoError::Data(format!("expected a {wanted} result, got {}", self.format()))
    }
}

/// Shape `envelope` according to `fmt`.
///
/// `object_name` names the records built for [`Format::Object`] and is required for it;
/// its absence is reported before the body is touched.
///
/// # Errors
///
/// [`TiingoError::Configuration`] for a missing object name, [`TiingoError::Json`] or
/// [`TiingoError::Data`] if the body does not match the requested shape.
pub fn format_response(
    envelope: ResponseEnvelope,
    fmt: Format,
    object_name: Option<&str>,
) -> Result<FormattedResult, TiingoError> {
    match fmt {
        Format::Json => Ok(FormattedResult::Json(envelope.json()?)),
        Format::Csv => Ok(FormattedResult::Csv(envelope.text()?.to_owned())),
        Format::Object => {
            let name = object_name.ok_or_else(|| {
                TiingoError::Configuration("object format requires an object name".into())
            })?;
            let value: Value = envelope.json()?;
            Ok(FormattedResult::Object(ObjectView::from_value(value, name)?))
        }
        Format::Raw => Ok(FormattedResult::Raw(envelope)),
    }
}

/// String-typed entry point: parse `fmt` first, then shape.
///
/// # Errors
///
/// [`TiingoError::InvalidFormat`] for an unknown format, otherwise as [`format_response`].
pub fn format_response_str(
    envelope: ResponseEnvelope,
    fmt: &str,
    object_name: Option<&str>,
) -> Result<FormattedResult, TiingoError> {
    format_response(envelope, fmt.parse()?, object_name)
}
