//! Turn JSON- or CSV-sourced price bodies into one per-ticker series.
//!
//! Both sources must yield identical series for the same query, so numbers are
//! read as `f64` from either and timestamps are normalized to UTC.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use futures::StreamExt;
use serde_json::Value;

use crate::core::TiingoError;

const DATE_FIELD: &str = "date";

const ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// One ticker's rows keyed by time, with columns in source order (date excluded).
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Series {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: BTreeMap<DateTime<Utc>, Vec<Option<f64>>>,
}

impl Series {
    fn column_index(&mut self, name: &str) -> usize {
        if let Some(i) = self.columns.iter().position(|c| c == name) {
            return i;
        }
        self.columns.push(name.to_string());
        self.columns.len() - 1
    }

    /// A single column as its own time-keyed map.
    pub(crate) fn column(&self, name: &str) -> Option<BTreeMap<DateTime<Utc>, Option<f64>>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|(ts, vals)| (*ts, vals.get(idx).copied().flatten()))
                .collect(),
        )
    }
}

/// Parse a timestamp, treating values without zone information as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TiingoError> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| TiingoError::Data(format!("unrecognized date value {raw:?}")))
}

fn json_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() { None } else { t.parse().ok() }
}

/// Parse a JSON body: a list of row mappings (or a single mapping).
pub(crate) fn from_json(body: &[u8]) -> Result<Series, TiingoError> {
    let value: Value = serde_json::from_slice(body)?;
    let items = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => {
            return Err(TiingoError::Data(format!(
                "expected a list of price rows, got {other}"
            )));
        }
    };

    let mut series = Series::default();
    for item in items {
        let map = match item {
            Value::Object(map) => map,
            other => {
                return Err(TiingoError::Data(format!("price row is not a mapping: {other}")));
            }
        };
        let ts = match map.get(DATE_FIELD) {
            Some(Value::String(s)) => parse_timestamp(s)?,
            _ => return Err(TiingoError::Data("price row has no date".into())),
        };
        let mut row = vec![None; series.columns.len()];
        for (key, v) in &map {
            if key == DATE_FIELD {
                continue;
            }
            let idx = series.column_index(key);
            if idx >= row.len() {
                row.resize(idx + 1, None);
            }
            row[idx] = json_number(v);
        }
        series.rows.insert(ts, row);
    }
    pad_rows(&mut series);
    Ok(series)
}

/// Parse a CSV body whose header contains a `date` column.
pub(crate) async fn from_csv(body: &[u8]) -> Result<Series, TiingoError> {
    let mut reader = csv_async::AsyncReader::from_reader(body);
    let headers = reader.headers().await?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h == DATE_FIELD)
        .ok_or_else(|| TiingoError::Data("CSV body has no date column".into()))?;

    let mut series = Series {
        columns: headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(_, h)| h.to_string())
            .collect(),
        rows: BTreeMap::new(),
    };

    let mut records = reader.records();
    while let Some(record) = records.next().await {
        let record = record?;
        let ts = parse_timestamp(record.get(date_idx).unwrap_or_default())?;
        let row = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(_, v)| text_number(v))
            .collect();
        series.rows.insert(ts, row);
    }
    pad_rows(&mut series);
    Ok(series)
}

// Rows seen before a late column appeared are shorter than the header.
fn pad_rows(series: &mut Series) {
    let width = series.columns.len();
    for row in series.rows.values_mut() {
        row.resize(width, None);
    }
}
