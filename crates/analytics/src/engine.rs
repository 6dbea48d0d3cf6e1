use crate::equity::{daily_returns, daily_series, max_drawdown, sharpe_ratio};
use crate::error::AnalyticsError;
use crate::grouping::{
    bottom_symbols, by_direction, by_hour, by_month, by_session, by_weekday, rank_symbols,
    symbol_key, top_symbols,
};
use crate::params::ReportParams;
use crate::pnl::net_pnl;
use crate::report::{DailyPoint, PerformanceReport, SummaryStats, TradeExtreme};
use crate::streaks::detect_streaks;
use crate::tally::{Tally, average_duration_minutes};
use core_types::Trade;

/// A stateless calculator for deriving performance metrics from journaled trades.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for building a report.
    ///
    /// # Arguments
    ///
    /// * `trades` - The journal's trades, already scoped to a coarse date range
    ///   by the persistence layer and kept in chronological order.
    /// * `params` - Timezone, starting balance, filters and the Sharpe convention.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PerformanceReport`, or an `AnalyticsError` if
    /// `params` are invalid. The trades themselves never cause an error.
    #[tracing::instrument(
        name = "analytics_calculate",
        skip(self, trades, params),
        fields(trades = trades.len(), zone = %params.zone)
    )]
    pub fn calculate(
        &self,
        trades: &[Trade],
        params: &ReportParams,
    ) -> Result<PerformanceReport, AnalyticsError> {
        params.validate()?;

        let filtered = params.filter.apply(trades, params.zone);
        tracing::debug!(selected = filtered.len(), "Applied trade filter.");

        Ok(self.report(&filtered, params))
    }

    /// Builds the report from an already filtered trade list. Each section only
    /// reads `trades`, so none depends on another having been computed.
    pub fn report(&self, trades: &[Trade], params: &ReportParams) -> PerformanceReport {
        let equity_curve = daily_series(trades, params.zone, params.starting_balance);
        let symbols = rank_symbols(trades);

        let mut chronological: Vec<&Trade> = trades.iter().collect();
        chronological.sort_by_key(|t| t.opened_at);
        let streaks = detect_streaks(chronological.iter().map(|t| t.outcome));

        let report = PerformanceReport {
            summary: self.summarize(trades, &equity_curve, params),
            streaks,
            monthly: by_month(trades, params.zone),
            sessions: by_session(trades),
            directions: by_direction(trades),
            weekdays: by_weekday(trades, params.zone),
            hours: by_hour(trades, params.zone),
            top_symbols: top_symbols(&symbols, params.ranking_size),
            bottom_symbols: bottom_symbols(&symbols, params.ranking_size),
            symbols,
            best_trade: extreme_trade(trades, |candidate, current| candidate > current),
            worst_trade: extreme_trade(trades, |candidate, current| candidate < current),
            best_day: extreme_day(&equity_curve, |candidate, current| candidate > current),
            worst_day: extreme_day(&equity_curve, |candidate, current| candidate < current),
            equity_curve,
        };

        tracing::debug!(
            trades = report.summary.total_trades,
            days = report.equity_curve.len(),
            net_pnl = report.summary.net_pnl,
            "Performance report built."
        );
        report
    }

    /// Calculates the scalar statistics block.
    fn summarize(
        &self,
        trades: &[Trade],
        equity_curve: &[DailyPoint],
        params: &ReportParams,
    ) -> SummaryStats {
        let tally = Tally::of(trades);

        let start = params.starting_balance.unwrap_or(0.0);
        let drawdown = max_drawdown(start, equity_curve.iter().map(|p| p.equity));

        let returns = daily_returns(equity_curve, params.starting_balance, params.sharpe);
        let sharpe = sharpe_ratio(&returns);
        if sharpe.is_none() && returns.len() >= 2 {
            tracing::debug!(
                days = returns.len(),
                convention = ?params.sharpe,
                "Sharpe ratio unreported: no finite deviation."
            );
        }

        SummaryStats {
            total_trades: tally.trades,
            wins: tally.wins,
            losses: tally.losses,
            breakevens: tally.breakevens,
            win_rate_pct: tally.win_rate_pct(),
            loss_rate_pct: tally.loss_rate_pct(),
            breakeven_rate_pct: tally.breakeven_rate_pct(),
            net_pnl: tally.net_pnl,
            gross_profit: tally.gross_profit(),
            gross_loss: tally.gross_loss(),
            profit_factor: tally.profit_factor(),
            average_win: tally.average_win(),
            average_loss: tally.average_loss(),
            reward_risk: tally.reward_risk(),
            expectancy: tally.expectancy(),
            average_duration_minutes: average_duration_minutes(trades),
            starting_balance: params.starting_balance,
            max_drawdown: drawdown.max_drawdown,
            max_drawdown_fraction: drawdown.max_drawdown_fraction,
            sharpe_ratio: sharpe,
        }
    }
}

/// The first trade whose net P&L beats every earlier one under `better`.
fn extreme_trade(trades: &[Trade], better: impl Fn(f64, f64) -> bool) -> Option<TradeExtreme> {
    let mut best: Option<(&Trade, f64)> = None;
    for trade in trades {
        let net = net_pnl(trade);
        if best.is_none_or(|(_, current)| better(net, current)) {
            best = Some((trade, net));
        }
    }

    best.map(|(trade, net_pnl)| TradeExtreme {
        id: trade.id.clone(),
        symbol: symbol_key(&trade.symbol),
        opened_at: trade.opened_at,
        net_pnl,
    })
}

fn extreme_day(series: &[DailyPoint], better: impl Fn(f64, f64) -> bool) -> Option<DailyPoint> {
    series
        .iter()
        .fold(None::<&DailyPoint>, |best, point| match best {
            Some(current) if !better(point.day_net, current.day_net) => Some(current),
            _ => Some(point),
        })
        .cloned()
}
