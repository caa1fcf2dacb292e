use std::fmt;
use std::str::FromStr;

use crate::core::TiingoError;

/// A real-time feed, appended to the streaming address as its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamChannel {
    /// IEX equities top-of-book and trades.
    Iex,
    /// Forex quotes.
    Fx,
    /// Crypto quotes and trades.
    Crypto,
}

impl StreamChannel {
    pub const ALL: [Self; 3] = [Self::Iex, Self::Fx, Self::Crypto];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Iex => "iex",
            Self::Fx => "fx",
            Self::Crypto => "crypto",
        }
    }
}

impl FromStr for StreamChannel {
    type Err = TiingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TiingoError::InvalidChannel(s.to_string()))
    }
}

impl fmt::Display for StreamChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
