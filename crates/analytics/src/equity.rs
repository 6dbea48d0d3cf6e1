use crate::pnl::net_pnl;
use crate::report::DailyPoint;
use crate::temporal::ReportZone;
use chrono::NaiveDate;
use core_types::{SharpeConvention, Trade};
use std::collections::BTreeMap;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Groups net P&L by local day, then accumulates day by day in date order.
pub fn daily_series(
    trades: &[Trade],
    zone: ReportZone,
    starting_balance: Option<f64>,
) -> Vec<DailyPoint> {
    let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for trade in trades {
        let entry = by_day.entry(zone.local_date(trade.opened_at)).or_insert((0.0, 0));
        entry.0 += net_pnl(trade);
        entry.1 += 1;
    }

    let mut cumulative_net = 0.0;
    by_day
        .into_iter()
        .map(|(date, (day_net, trades))| {
            cumulative_net += day_net;
            DailyPoint {
                date,
                trades,
                day_net,
                cumulative_net,
                equity: starting_balance.map_or(cumulative_net, |b| b + cumulative_net),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Drawdown {
    pub max_drawdown: f64,
    /// `max_drawdown` over the peak it was measured from; 0 when that peak is not positive.
    pub max_drawdown_fraction: f64,
}

/// Largest decline from a running peak. The peak is seeded with `start`, the
/// equity before any trade.
pub fn max_drawdown(start: f64, equity: impl IntoIterator<Item = f64>) -> Drawdown {
    let mut peak = start;
    let mut result = Drawdown::default();

    for value in equity {
        if value > peak {
            peak = value;
        }
        let drawdown = peak - value;
        if drawdown > result.max_drawdown {
            result.max_drawdown = drawdown;
            result.max_drawdown_fraction = if peak > 0.0 { drawdown / peak } else { 0.0 };
        }
    }

    result
}

/// Turns each day's net P&L into a return.
///
/// A positive starting balance is always the denominator. Without one,
/// `FixedBalance` divides by 1 and `PriorEquity` divides by the equity at the
/// end of the previous day (the starting point for the first day). Days whose
/// prior equity is not positive have no meaningful return and are skipped.
pub fn daily_returns(
    series: &[DailyPoint],
    starting_balance: Option<f64>,
    convention: SharpeConvention,
) -> Vec<f64> {
    let fixed = starting_balance.filter(|b| *b > 0.0);
    let mut prior_equity = starting_balance.unwrap_or(0.0);

    series
        .iter()
        .filter_map(|point| {
            let denominator = match (fixed, convention) {
                (Some(balance), _) => Some(balance),
                (None, SharpeConvention::FixedBalance) => Some(1.0),
                (None, SharpeConvention::PriorEquity) => {
                    Some(prior_equity).filter(|equity| *equity > 0.0)
                }
            };
            prior_equity = point.equity;
            denominator.map(|d| point.day_net / d)
        })
        .collect()
}

/// Annualised Sharpe ratio (risk-free rate 0) from daily returns, using the
/// sample standard deviation.
///
/// `None` with fewer than two returns, or when the deviation is zero or not finite.
pub fn sharpe_ratio(returns: &[f64]) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    if !std_dev.is_finite() || std_dev == 0.0 {
        return None;
    }

    let sharpe = mean / std_dev * TRADING_DAYS_PER_YEAR.sqrt();
    sharpe.is_finite().then_some(sharpe)
}
