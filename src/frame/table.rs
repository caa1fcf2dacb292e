use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

/// A time-indexed table of prices.
///
/// Rows are ordered by ascending timestamp. Columns are metric names for a
/// single ticker, or ticker symbols when several tickers were merged on one metric.
/// A `None` cell is a hole: that column has no value at that time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceFrame {
    index: Vec<DateTime<Utc>>,
    columns: Vec<String>,
    // column-major: data[col][row]
    data: Vec<Vec<Option<f64>>>,
}

impl PriceFrame {
    /// Outer-join named columns on their time keys; column order is preserved.
    pub(crate) fn outer_join(named: Vec<(String, BTreeMap<DateTime<Utc>, Option<f64>>)>) -> Self {
        let index: Vec<DateTime<Utc>> = named
            .iter()
            .flat_map(|(_, col)| col.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let (columns, data): (Vec<String>, Vec<Vec<Option<f64>>>) = named
            .into_iter()
            .map(|(name, col)| {
                let values: Vec<Option<f64>> = index
                    .iter()
                    .map(|ts| col.get(ts).copied().flatten())
                    .collect();
                (name, values)
            })
            .unzip();

        Self {
            index,
            columns,
            data,
        }
    }

    /// Row timestamps, ascending.
    #[must_use]
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All values of one column, aligned with [`PriceFrame::index`].
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        let i = self.columns.iter().position(|c| c == name)?;
        Some(&self.data[i])
    }

    /// The cell at (`ts`, `column`); `None` for an unknown row/column or a hole.
    #[must_use]
    pub fn value(&self, ts: DateTime<Utc>, column: &str) -> Option<f64> {
        let row = self.index.binary_search(&ts).ok()?;
        self.column(column)?.get(row).copied().flatten()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Iterate rows as `(timestamp, values in column order)`.
    pub fn rows(&self) -> impl Iterator<Item = (DateTime<Utc>, Vec<Option<f64>>)> + '_ {
        self.index
            .iter()
            .enumerate()
            .map(|(r, ts)| (*ts, self.data.iter().map(|col| col[r]).collect()))
    }
}

#[cfg(feature = "dataframe")]
impl crate::core::dataframe::ToDataFrame for PriceFrame {
    /// A `date` column of UTC epoch milliseconds followed by one `f64` column per frame column.
    fn to_dataframe(&self) -> polars::prelude::PolarsResult<polars::prelude::DataFrame> {
        use polars::prelude::{Column, DataFrame};

        let millis: Vec<i64> = self.index.iter().map(DateTime::timestamp_millis).collect();
        let mut cols = Vec::with_capacity(self.columns.len() + 1);
        cols.push(Column::new("date".into(), millis));
        for (name, values) in self.columns.iter().zip(&self.data) {
            cols.push(Column::new(name.as_str().into(), values.clone()));
        }
        DataFrame::new(cols)
    }
}
