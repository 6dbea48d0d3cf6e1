use crate::temporal::{ReportZone, session_of};
use chrono::NaiveDate;
use core_types::{Direction, Outcome, Session, Trade};
use serde::{Deserialize, Serialize};

/// Review-stage criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Reviewed,
    NotReviewed,
}

/// Setup-template criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupFilter {
    /// Only trades without a setup.
    NoSetup,
    /// Only trades journaled against this setup id.
    Setup(String),
}

/// Stateless selection criteria for a single report computation.
///
/// Every criterion is optional; an absent (or blank) criterion lets every trade
/// through. Present criteria are combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeFilter {
    /// First local calendar day included.
    pub from: Option<NaiveDate>,
    /// First local calendar day excluded.
    pub to: Option<NaiveDate>,
    /// Case-insensitive substring of the instrument symbol.
    pub symbol: Option<String>,
    pub direction: Option<Direction>,
    pub outcome: Option<Outcome>,
    pub session: Option<Session>,
    pub review: Option<ReviewState>,
    pub setup: Option<SetupFilter>,
}

impl TradeFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` if `trade` satisfies every criterion. Date bounds are
    /// compared against the trade's local open date in `zone`.
    pub fn matches(&self, trade: &Trade, zone: ReportZone) -> bool {
        if self.from.is_some() || self.to.is_some() {
            let day = zone.local_date(trade.opened_at);
            if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day >= to) {
                return false;
            }
        }

        if let Some(needle) = self.symbol.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if !trade.symbol.to_uppercase().contains(&needle.to_uppercase()) {
                return false;
            }
        }

        if self.direction.is_some_and(|d| d != trade.direction)
            || self.outcome.is_some_and(|o| o != trade.outcome)
            || self.session.is_some_and(|s| s != session_of(trade.opened_at))
        {
            return false;
        }

        let review_ok = match self.review {
            None => true,
            Some(ReviewState::Reviewed) => trade.is_reviewed(),
            Some(ReviewState::NotReviewed) => !trade.is_reviewed(),
        };

        let setup_ok = match &self.setup {
            None => true,
            Some(SetupFilter::NoSetup) => trade.setup_id.is_none(),
            Some(SetupFilter::Setup(id)) => trade.setup_id.as_deref() == Some(id.as_str()),
        };

        review_ok && setup_ok
    }

    /// Selects the matching trades in one pass, preserving input order.
    pub fn apply(&self, trades: &[Trade], zone: ReportZone) -> Vec<Trade> {
        trades
            .iter()
            .filter(|t| self.matches(t, zone))
            .cloned()
            .collect()
    }
}
