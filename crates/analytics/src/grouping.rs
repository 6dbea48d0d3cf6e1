use crate::pnl::net_pnl;
use crate::report::{
    BucketStats, DirectionPerformance, MonthlySummary, SessionPerformance, SymbolPerformance,
    TimeBucket,
};
use crate::tally::{Tally, average_duration_minutes, percentage};
use crate::temporal::{MonthKey, ReportZone, TradeClock, WEEKDAY_LABELS, session_of};
use chrono::NaiveDate;
use core_types::{Direction, Outcome, Session, Trade};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

/// Grouping key of a symbol: trimmed and uppercased, blank as [`UNKNOWN_SYMBOL`].
pub fn symbol_key(symbol: &str) -> String {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        UNKNOWN_SYMBOL.to_string()
    } else {
        trimmed.to_uppercase()
    }
}

/// Per-symbol totals, highest net P&L first. Symbols with equal net P&L keep
/// the order in which they first appear.
pub fn rank_symbols(trades: &[Trade]) -> Vec<SymbolPerformance> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ranked: Vec<SymbolPerformance> = Vec::new();

    for trade in trades {
        let key = symbol_key(&trade.symbol);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            ranked.push(SymbolPerformance {
                symbol: key,
                trades: 0,
                wins: 0,
                losses: 0,
                net_pnl: 0.0,
                win_rate_pct: 0.0,
            });
            ranked.len() - 1
        });

        let entry = &mut ranked[slot];
        entry.trades += 1;
        entry.net_pnl += net_pnl(trade);
        match trade.outcome {
            Outcome::Win => entry.wins += 1,
            Outcome::Loss => entry.losses += 1,
            Outcome::Breakeven => {}
        }
    }

    for entry in &mut ranked {
        entry.win_rate_pct = percentage(entry.wins, entry.trades);
    }
    ranked.sort_by(|a, b| b.net_pnl.total_cmp(&a.net_pnl));
    ranked
}

/// The first `n` of a ranking.
pub fn top_symbols(ranked: &[SymbolPerformance], n: usize) -> Vec<SymbolPerformance> {
    ranked.iter().take(n).cloned().collect()
}

/// The last `n` of a ranking, worst first.
pub fn bottom_symbols(ranked: &[SymbolPerformance], n: usize) -> Vec<SymbolPerformance> {
    ranked.iter().rev().take(n).cloned().collect()
}

pub fn by_direction(trades: &[Trade]) -> [DirectionPerformance; 2] {
    Direction::ALL.map(|direction| DirectionPerformance {
        direction,
        stats: BucketStats::from(&Tally::of(trades.iter().filter(|t| t.direction == direction))),
    })
}

pub fn by_session(trades: &[Trade]) -> [SessionPerformance; 4] {
    let mut tallies = [Tally::default(); 4];
    for trade in trades {
        tallies[session_of(trade.opened_at).index()].add(trade.outcome, net_pnl(trade));
    }

    Session::ALL.map(|session| SessionPerformance {
        session,
        label: session.label().to_string(),
        stats: BucketStats::from(&tallies[session.index()]),
    })
}

/// Bars for Sunday through Saturday of the local open date.
pub fn by_weekday(trades: &[Trade], zone: ReportZone) -> [TimeBucket; 7] {
    let tallies: [Tally; 7] =
        tally_by(trades, |t| TradeClock::of(t.opened_at, zone).weekday as usize);
    std::array::from_fn(|i| TimeBucket {
        index: i as u32,
        label: WEEKDAY_LABELS[i].to_string(),
        stats: BucketStats::from(&tallies[i]),
    })
}

/// Bars for each local wall-clock hour.
pub fn by_hour(trades: &[Trade], zone: ReportZone) -> [TimeBucket; 24] {
    let tallies: [Tally; 24] = tally_by(trades, |t| zone.local_hour(t.opened_at) as usize);
    std::array::from_fn(|i| TimeBucket {
        index: i as u32,
        label: format!("{i:02}:00"),
        stats: BucketStats::from(&tallies[i]),
    })
}

fn tally_by<const N: usize>(trades: &[Trade], bucket: impl Fn(&Trade) -> usize) -> [Tally; N] {
    let mut tallies = [Tally::default(); N];
    for trade in trades {
        if let Some(tally) = tallies.get_mut(bucket(trade)) {
            tally.add(trade.outcome, net_pnl(trade));
        }
    }
    tallies
}

/// One row per calendar month (of the local open date), ascending.
pub fn by_month(trades: &[Trade], zone: ReportZone) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<MonthKey, (Vec<&Trade>, BTreeSet<NaiveDate>)> = BTreeMap::new();
    for trade in trades {
        let clock = TradeClock::of(trade.opened_at, zone);
        let (members, days) = months.entry(clock.month).or_default();
        members.push(trade);
        days.insert(clock.date);
    }

    months
        .into_iter()
        .map(|(month, (members, days))| {
            let tally = Tally::of(members.iter().copied());
            MonthlySummary {
                month,
                trades: tally.trades,
                net_pnl: tally.net_pnl,
                win_rate_pct: tally.win_rate_pct(),
                reward_risk: tally.reward_risk(),
                expectancy: tally.expectancy(),
                average_duration_minutes: average_duration_minutes(members.iter().copied()),
                active_days: days.len(),
            }
        })
        .collect()
}
