use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The side a trade was opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Buy, Direction::Sell];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Direction::Buy),
            "SELL" => Ok(Direction::Sell),
            _ => Err(CoreError::InvalidInput("direction", s.to_string())),
        }
    }
}

/// The journaled result of a trade. This is the ground truth for win/loss
/// classification; P&L figures only contribute magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Win,
    Loss,
    Breakeven,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Loss => "LOSS",
            Outcome::Breakeven => "BREAKEVEN",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WIN" => Ok(Outcome::Win),
            "LOSS" => Ok(Outcome::Loss),
            "BREAKEVEN" | "BE" => Ok(Outcome::Breakeven),
            _ => Err(CoreError::InvalidInput("outcome", s.to_string())),
        }
    }
}

/// Trading region bucket derived from the UTC hour a trade was opened in.
///
/// The 24 UTC hours are split into four disjoint, exhaustive ranges:
///
/// | Session   | UTC hours         |
/// |-----------|-------------------|
/// | Asia      | 21..=23, 0..=6    |
/// | London    | 7..=11            |
/// | Overlap   | 12..=15           |
/// | New York  | 16..=20           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Session {
    Asia,
    London,
    Overlap,
    NewYork,
}

impl Session {
    pub const ALL: [Session; 4] = [
        Session::Asia,
        Session::London,
        Session::Overlap,
        Session::NewYork,
    ];

    /// Classifies a UTC hour (0-23). Hours outside that range fall through to New York.
    pub fn from_utc_hour(hour: u32) -> Self {
        match hour {
            h if h >= 21 || h <= 6 => Session::Asia,
            7..=11 => Session::London,
            12..=15 => Session::Overlap,
            _ => Session::NewYork,
        }
    }

    /// Display label used by the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            Session::Asia => "Asia",
            Session::London => "London",
            Session::Overlap => "London–NY Overlap",
            Session::NewYork => "New York",
        }
    }

    /// Position of the session inside [`Session::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Session::Asia => 0,
            Session::London => 1,
            Session::Overlap => 2,
            Session::NewYork => 3,
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which denominator turns a day's net P&L into a daily return for the Sharpe ratio.
///
/// Both conventions use the starting balance when one is configured and positive.
/// They only differ in the fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SharpeConvention {
    /// Multi-account analytics view: fall back to a denominator of 1.
    #[default]
    FixedBalance,
    /// Monthly report view: fall back to the previous day's running equity.
    PriorEquity,
}
