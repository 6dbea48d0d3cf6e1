use analytics::{AnalyticsEngine, ReportParams, ReportZone, ReviewState, TradeFilter};
use core_types::{Direction, Outcome, Trade, TradeRecord};
use serde_json::json;

/// A small journal export the way the persistence layer hands it over:
/// strings for numbers, nulls, a reviewed trade with commission, one broken row.
fn journal() -> Vec<Trade> {
    let records: Vec<TradeRecord> = serde_json::from_value(json!([
        { "id": "1", "opened_at": "2024-01-08T08:15:00Z", "closed_at": "2024-01-08T09:15:00Z",
          "symbol": "eurusd", "direction": "BUY", "outcome": "WIN", "pnl_amount": 120 },
        { "id": "2", "opened_at": "2024-01-08T13:30:00Z", "symbol": "EURUSD",
          "direction": "SELL", "outcome": "LOSS", "pnl_amount": "-60" },
        { "id": "3", "opened_at": "2024-01-09T22:00:00Z", "symbol": "USDJPY",
          "direction": "BUY", "outcome": "WIN", "pnl_amount": 100, "commission": 20,
          "net_pnl": null, "reviewed_at": "2024-01-10T08:00:00Z" },
        { "id": "4", "opened_at": "2024-01-10T17:00:00Z", "symbol": "",
          "direction": "SELL", "outcome": "BE", "pnl_amount": 0 },
        { "id": "5", "opened_at": "2024-02-01T10:00:00Z", "symbol": "gbpusd",
          "direction": "BUY", "outcome": "LOSS", "pnl_amount": -50, "commission": "5",
          "net_pnl": "-55", "reviewed_at": "2024-02-02T10:00:00Z" },
        { "id": "6", "opened_at": "2024-02-02T14:00:00Z", "symbol": "USDJPY",
          "direction": "BUY", "outcome": "WIN", "pnl_amount": 10 },
        { "opened_at": "2024-02-03T14:00:00Z", "direction": "BUY", "outcome": "WIN" }
    ]))
    .unwrap();

    let (trades, rejected) = Trade::from_records(records);
    assert_eq!(rejected.len(), 1);
    trades
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn daily_series_reconciles_with_total() {
    let report = AnalyticsEngine::new()
        .calculate(&journal(), &ReportParams::default())
        .unwrap();

    // 120 - 60 + (100 - 20) + 0 - 55 + 10
    assert!(approx(report.summary.net_pnl, 95.0));

    let daily_total: f64 = report.equity_curve.iter().map(|p| p.day_net).sum();
    assert!(approx(daily_total, report.summary.net_pnl));
    let last = report.equity_curve.last().unwrap();
    assert!(approx(last.cumulative_net, report.summary.net_pnl));

    let monthly_total: f64 = report.monthly.iter().map(|m| m.net_pnl).sum();
    assert!(approx(monthly_total, report.summary.net_pnl));
    let session_total: f64 = report.sessions.iter().map(|s| s.stats.net_pnl).sum();
    assert!(approx(session_total, report.summary.net_pnl));
    let hour_trades: usize = report.hours.iter().map(|h| h.stats.trades).sum();
    assert_eq!(hour_trades, report.summary.total_trades);
    let symbol_trades: usize = report.symbols.iter().map(|s| s.trades).sum();
    assert_eq!(symbol_trades, report.summary.total_trades);
}

#[test]
fn rates_stay_within_percentage_bounds() {
    let report = AnalyticsEngine::new()
        .calculate(&journal(), &ReportParams::default())
        .unwrap();
    let s = &report.summary;

    for rate in [s.win_rate_pct, s.loss_rate_pct, s.breakeven_rate_pct] {
        assert!((0.0..=100.0).contains(&rate));
    }
    assert!(approx(s.win_rate_pct + s.loss_rate_pct + s.breakeven_rate_pct, 100.0));
    let buckets = report
        .sessions
        .iter()
        .map(|b| &b.stats)
        .chain(report.hours.iter().map(|b| &b.stats));
    for bucket in buckets {
        assert!((0.0..=100.0).contains(&bucket.win_rate_pct));
    }
    for month in &report.monthly {
        assert!((0.0..=100.0).contains(&month.win_rate_pct));
    }
}

#[test]
fn reviewed_trades_use_resolved_net_pnl() {
    let report = AnalyticsEngine::new()
        .calculate(&journal(), &ReportParams::default())
        .unwrap();

    let jpy = report.symbols.iter().find(|s| s.symbol == "USDJPY").unwrap();
    assert!(approx(jpy.net_pnl, 90.0));
    let gbp = report.symbols.iter().find(|s| s.symbol == "GBPUSD").unwrap();
    assert!(approx(gbp.net_pnl, -55.0));
}

#[test]
fn rankings_and_blank_symbols() {
    let params = ReportParams {
        ranking_size: 2,
        ..Default::default()
    };
    let report = AnalyticsEngine::new().calculate(&journal(), &params).unwrap();

    let order: Vec<&str> = report.symbols.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(order, ["USDJPY", "EURUSD", "UNKNOWN", "GBPUSD"]);
    assert_eq!(report.top_symbols.len(), 2);
    assert_eq!(report.top_symbols[0].symbol, "USDJPY");
    assert_eq!(report.bottom_symbols[0].symbol, "GBPUSD");
    assert_eq!(report.bottom_symbols[1].symbol, "UNKNOWN");
}

#[test]
fn profit_factor_policy_follows_filtered_losses() {
    let engine = AnalyticsEngine::new();

    let wins_only = ReportParams {
        filter: TradeFilter {
            outcome: Some(Outcome::Win),
            ..Default::default()
        },
        ..Default::default()
    };
    let summary = engine.calculate(&journal(), &wins_only).unwrap().summary;
    assert_eq!(summary.profit_factor, f64::INFINITY);

    let breakevens = ReportParams {
        filter: TradeFilter {
            outcome: Some(Outcome::Breakeven),
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(engine.calculate(&journal(), &breakevens).unwrap().summary.profit_factor, 0.0);

    let all = engine.calculate(&journal(), &ReportParams::default()).unwrap();
    // (120 + 80 + 10) / (60 + 55)
    assert!(approx(all.summary.profit_factor, 210.0 / 115.0));
}

#[test]
fn drawdown_is_never_negative() {
    let engine = AnalyticsEngine::new();

    for balance in [None, Some(0.0), Some(-100.0), Some(10_000.0)] {
        let params = ReportParams {
            starting_balance: balance,
            ..Default::default()
        };
        let summary = engine.calculate(&journal(), &params).unwrap().summary;
        assert!(summary.max_drawdown >= 0.0);
        assert!(summary.max_drawdown_fraction >= 0.0);
    }

    // Without a balance the curve starts at 0 and first dips below it.
    let losers = ReportParams {
        filter: TradeFilter {
            outcome: Some(Outcome::Loss),
            ..Default::default()
        },
        ..Default::default()
    };
    let summary = engine.calculate(&journal(), &losers).unwrap().summary;
    assert!(approx(summary.max_drawdown, 115.0));
    assert_eq!(summary.max_drawdown_fraction, 0.0);
}

#[test]
fn filters_compose_regardless_of_order() {
    let zone = ReportZone::Utc;
    let buy = TradeFilter {
        direction: Some(Direction::Buy),
        ..Default::default()
    };
    let reviewed = TradeFilter {
        review: Some(ReviewState::Reviewed),
        ..Default::default()
    };
    let both = TradeFilter {
        direction: Some(Direction::Buy),
        review: Some(ReviewState::Reviewed),
        ..Default::default()
    };

    let trades = journal();
    let a = reviewed.apply(&buy.apply(&trades, zone), zone);
    let b = buy.apply(&reviewed.apply(&trades, zone), zone);
    let c = both.apply(&trades, zone);

    assert_eq!(a, c);
    assert_eq!(b, c);
    assert_eq!(c.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), ["3", "5"]);
}

#[test]
fn report_serializes_for_the_presentation_layer() {
    let params = ReportParams {
        filter: TradeFilter {
            outcome: Some(Outcome::Win),
            ..Default::default()
        },
        ..Default::default()
    };
    let report = AnalyticsEngine::new().calculate(&journal(), &params).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["summary"]["profit_factor"], "Infinity");
    assert_eq!(json["equity_curve"][0]["date"], "2024-01-08");
    assert_eq!(json["sessions"][3]["label"], "New York");
    assert_eq!(json["weekdays"].as_array().unwrap().len(), 7);
}
