use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::TiingoError;

static INTRADAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[0-9]+(min|hour)$").expect("intraday pattern compiles"));

/// Resample frequency for price history.
///
/// End-of-day values are served by the daily endpoint; intraday values
/// (`<n>min`, `<n>hour`) by the IEX endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Annually,
    /// Lowercased intraday value such as `5min` or `1hour`.
    Intraday(String),
}

impl Frequency {
    /// `true` for daily, weekly, monthly and annually.
    #[must_use]
    pub const fn is_eod(&self) -> bool {
        !matches!(self, Self::Intraday(_))
    }

    /// The value sent as `resampleFreq`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Annually => "annually",
            Self::Intraday(s) => s,
        }
    }

    /// Relative path of the price endpoint serving `ticker` at this frequency.
    pub(crate) fn prices_path(&self, ticker: &str) -> String {
        if self.is_eod() {
            format!("tiingo/daily/{ticker}/prices")
        } else {
            format!("iex/{ticker}/prices")
        }
    }
}

impl FromStr for Frequency {
    type Err = TiingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "annually" => Ok(Self::Annually),
            _ if INTRADAY.is_match(s) => Ok(Self::Intraday(lower)),
            _ => Err(TiingoError::InvalidFrequency(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `true` iff `frequency` is an end-of-day name or matches `<digits>(min|hour)`, ignoring case.
#[must_use]
pub fn is_valid_frequency(frequency: &str) -> bool {
    frequency.parse::<Frequency>().is_ok()
}
