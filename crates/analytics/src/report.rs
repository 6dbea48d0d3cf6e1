use crate::streaks::StreakSummary;
use crate::tally::Tally;
use crate::temporal::MonthKey;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{Direction, Session};
use serde::{Deserialize, Serialize};

/// The complete, final output of the `AnalyticsEngine`.
///
/// Every field is derived from (filtered trades, starting balance, timezone);
/// consumers display these numbers without further aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub summary: SummaryStats,
    pub streaks: StreakSummary,
    /// One point per local calendar day with trades, ascending.
    pub equity_curve: Vec<DailyPoint>,
    /// One row per calendar month with trades, ascending.
    pub monthly: Vec<MonthlySummary>,
    pub sessions: [SessionPerformance; 4],
    pub directions: [DirectionPerformance; 2],
    /// Sunday first.
    pub weekdays: [TimeBucket; 7],
    /// Local wall-clock hours 0-23.
    pub hours: [TimeBucket; 24],
    /// All symbols, best net P&L first.
    pub symbols: Vec<SymbolPerformance>,
    pub top_symbols: Vec<SymbolPerformance>,
    /// Worst performer first.
    pub bottom_symbols: Vec<SymbolPerformance>,
    pub best_trade: Option<TradeExtreme>,
    pub worst_trade: Option<TradeExtreme>,
    pub best_day: Option<DailyPoint>,
    pub worst_day: Option<DailyPoint>,
}

/// Scalar statistics over the whole filtered trade set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    // I. Counts and shares
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub win_rate_pct: f64,
    pub loss_rate_pct: f64,
    pub breakeven_rate_pct: f64,

    // II. Profitability
    pub net_pnl: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    #[serde(with = "ratio")]
    pub profit_factor: f64,
    pub average_win: f64,
    pub average_loss: f64,
    #[serde(with = "ratio")]
    pub reward_risk: f64,
    pub expectancy: f64,

    // III. Time
    pub average_duration_minutes: f64,

    // IV. Risk
    pub starting_balance: Option<f64>,
    pub max_drawdown: f64,
    /// Maximum drawdown as a fraction of the peak it was measured from.
    pub max_drawdown_fraction: f64,
    pub sharpe_ratio: Option<f64>, // None for fewer than two days or no variance
}

/// Net P&L of one local calendar day and the running totals after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Serialized as the `YYYY-MM-DD` day key.
    pub date: NaiveDate,
    pub trades: usize,
    pub day_net: f64,
    pub cumulative_net: f64,
    /// `starting_balance + cumulative_net`, or `cumulative_net` without a balance.
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub trades: usize,
    pub net_pnl: f64,
    pub win_rate_pct: f64,
    #[serde(with = "ratio")]
    pub reward_risk: f64,
    pub expectancy: f64,
    pub average_duration_minutes: f64,
    /// Distinct local calendar days with at least one trade.
    pub active_days: usize,
}

/// Outcome counts and net P&L of one group of trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub net_pnl: f64,
    pub win_rate_pct: f64,
}

impl From<&Tally> for BucketStats {
    fn from(tally: &Tally) -> Self {
        Self {
            trades: tally.trades,
            wins: tally.wins,
            losses: tally.losses,
            breakevens: tally.breakevens,
            net_pnl: tally.net_pnl,
            win_rate_pct: tally.win_rate_pct(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPerformance {
    pub session: Session,
    pub label: String,
    #[serde(flatten)]
    pub stats: BucketStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionPerformance {
    pub direction: Direction,
    #[serde(flatten)]
    pub stats: BucketStats,
}

/// A day-of-week or hour-of-day bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub index: u32,
    pub label: String,
    #[serde(flatten)]
    pub stats: BucketStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPerformance {
    pub symbol: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub net_pnl: f64,
    pub win_rate_pct: f64,
}

/// The best or worst single trade by net P&L.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeExtreme {
    pub id: String,
    pub symbol: String,
    pub opened_at: DateTime<Utc>,
    pub net_pnl: f64,
}

/// JSON has no infinity, so unbounded ratios travel as the string `"Infinity"`.
mod ratio {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if *value == f64::INFINITY {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) if s == "Infinity" => Ok(f64::INFINITY),
            Repr::Text(s) => Err(serde::de::Error::custom(format!("invalid ratio '{s}'"))),
        }
    }
}
