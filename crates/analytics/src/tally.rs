//! Outcome counters and the ratio policies shared by every view of the report.
//!
//! The overall statistics, the monthly rows and the direction/session/time
//! buckets are all built from a [`Tally`], so their counts and sums reconcile.

use crate::pnl::net_pnl;
use core_types::{Outcome, Trade};

/// `count / total * 100`, or 0 when `total` is 0.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Gross profit over gross loss magnitude.
///
/// Infinite when there is profit and no loss; 0 when neither (or when the
/// only movement is a non-positive "profit").
pub fn profit_factor(gross_profit: f64, gross_loss: f64) -> f64 {
    if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Average win over average loss magnitude, with the same policy as [`profit_factor`].
pub fn reward_risk(average_win: f64, average_loss: f64) -> f64 {
    if average_loss > 0.0 {
        average_win / average_loss
    } else if average_win > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Expected net P&L per trade. `win_rate` is a fraction; everything that is
/// not a win (breakevens included) counts toward the loss rate.
pub fn expectancy(win_rate: f64, average_win: f64, average_loss: f64) -> f64 {
    win_rate * average_win - (1.0 - win_rate) * average_loss
}

/// Mean holding time in minutes over trades with a close timestamp.
/// Negative durations are data errors and are left out; 0 when nothing qualifies.
pub fn average_duration_minutes<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> f64 {
    let (total, count) = trades
        .into_iter()
        .filter_map(|t| t.closed_at.map(|closed| (closed - t.opened_at).num_milliseconds()))
        .map(|ms| ms as f64 / 60_000.0)
        .filter(|minutes| minutes.is_finite() && *minutes >= 0.0)
        .fold((0.0, 0usize), |(sum, n), minutes| (sum + minutes, n + 1));

    if count == 0 { 0.0 } else { total / count as f64 }
}

/// Running outcome counts and net P&L sums for one group of trades.
///
/// Counts and averages follow the outcome label. Gross profit and gross loss
/// follow the sign of net P&L, so `gross_profit - gross_loss == net_pnl`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub net_pnl: f64,
    /// Sum of positive net P&L over every trade.
    pub positive_pnl: f64,
    /// Sum of absolute negative net P&L over every trade.
    pub negative_pnl: f64,
    /// Sum of net P&L over winning trades.
    pub win_pnl: f64,
    /// Sum of absolute net P&L over losing trades.
    pub loss_magnitude: f64,
}

impl Tally {
    pub fn of<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        let mut tally = Self::default();
        for trade in trades {
            tally.add(trade.outcome, net_pnl(trade));
        }
        tally
    }

    pub fn add(&mut self, outcome: Outcome, net: f64) {
        self.trades += 1;
        self.net_pnl += net;
        if net > 0.0 {
            self.positive_pnl += net;
        } else if net < 0.0 {
            self.negative_pnl -= net;
        }
        match outcome {
            Outcome::Win => {
                self.wins += 1;
                self.win_pnl += net;
            }
            Outcome::Loss => {
                self.losses += 1;
                self.loss_magnitude += net.abs();
            }
            Outcome::Breakeven => self.breakevens += 1,
        }
    }

    pub fn win_rate_pct(&self) -> f64 {
        percentage(self.wins, self.trades)
    }

    pub fn loss_rate_pct(&self) -> f64 {
        percentage(self.losses, self.trades)
    }

    pub fn breakeven_rate_pct(&self) -> f64 {
        percentage(self.breakevens, self.trades)
    }

    pub fn gross_profit(&self) -> f64 {
        self.positive_pnl
    }

    pub fn gross_loss(&self) -> f64 {
        self.negative_pnl
    }

    pub fn average_win(&self) -> f64 {
        if self.wins == 0 { 0.0 } else { self.win_pnl / self.wins as f64 }
    }

    pub fn average_loss(&self) -> f64 {
        if self.losses == 0 {
            0.0
        } else {
            self.loss_magnitude / self.losses as f64
        }
    }

    pub fn profit_factor(&self) -> f64 {
        profit_factor(self.gross_profit(), self.gross_loss())
    }

    pub fn reward_risk(&self) -> f64 {
        reward_risk(self.average_win(), self.average_loss())
    }

    pub fn expectancy(&self) -> f64 {
        let win_rate = if self.trades == 0 {
            0.0
        } else {
            self.wins as f64 / self.trades as f64
        };
        expectancy(win_rate, self.average_win(), self.average_loss())
    }
}
