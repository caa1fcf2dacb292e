use polars::prelude::*;

/// Trait for converting tabular results into Polars DataFrames.
///
/// Enabled by the `dataframe` feature.
pub trait ToDataFrame {
    /// Converts the object into a Polars DataFrame.
    ///
    /// # Errors
    ///
    /// Returns a `PolarsError` if the columns cannot be assembled.
    fn to_dataframe(&self) -> PolarsResult<DataFrame>;
}
