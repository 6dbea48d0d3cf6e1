use crate::error::AnalyticsError;
use crate::filter::TradeFilter;
use crate::temporal::ReportZone;
use core_types::SharpeConvention;
use std::hash::{Hash, Hasher};

pub const DEFAULT_RANKING_SIZE: usize = 5;

/// Everything besides the trades that a report depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportParams {
    pub zone: ReportZone,
    /// When set, equity points are offset by this balance.
    pub starting_balance: Option<f64>,
    pub filter: TradeFilter,
    pub sharpe: SharpeConvention,
    /// Length of the top and bottom symbol lists.
    pub ranking_size: usize,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            zone: ReportZone::Utc,
            starting_balance: None,
            filter: TradeFilter::default(),
            sharpe: SharpeConvention::default(),
            ranking_size: DEFAULT_RANKING_SIZE,
        }
    }
}

impl ReportParams {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if let (Some(from), Some(to)) = (self.filter.from, self.filter.to) {
            if from >= to {
                return Err(AnalyticsError::InvalidDateRange { from, to });
            }
        }
        if let Some(balance) = self.starting_balance {
            if !balance.is_finite() {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "starting balance must be finite, got {balance}"
                )));
            }
        }
        if self.ranking_size == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "ranking size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Hash for ReportParams {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.zone.hash(state);
        self.starting_balance.map(f64::to_bits).hash(state);
        self.filter.hash(state);
        self.sharpe.hash(state);
        self.ranking_size.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_params_are_valid() {
        assert_eq!(ReportParams::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_or_empty_date_range() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut params = ReportParams::default();
        params.filter.from = Some(day);
        params.filter.to = Some(day);

        assert_eq!(
            params.validate(),
            Err(AnalyticsError::InvalidDateRange { from: day, to: day })
        );
    }

    #[test]
    fn rejects_non_finite_balance_and_zero_ranking() {
        let params = ReportParams {
            starting_balance: Some(f64::NAN),
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(AnalyticsError::InvalidParameter(_))));

        let params = ReportParams {
            ranking_size: 0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(AnalyticsError::InvalidParameter(_))));
    }
}
