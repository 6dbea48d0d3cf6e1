use analytics::{
    AnalyticsEngine, PerformanceReport, ReportParams, ReportZone, ReviewState, SetupFilter,
    SymbolPerformance, TradeFilter,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use configuration::ReportSettings;
use core_types::numeric::from_decimal;
use core_types::{CoreError, Direction, Outcome, Session, Trade, TradeRecord};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

/// The main entry point for the trading journal.
fn main() -> Result<()> {
    // JOURNAL__* overrides may live in a .env file; it is optional.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = configuration::load_settings(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _guard = configuration::init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Report(args) => handle_report(args, &settings.report),
        Commands::Validate(args) => handle_validate(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance analytics for a personal trading journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file to use instead of ./journal.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a performance report from a JSON export of trades.
    Report(ReportArgs),
    /// Check a JSON export of trades and list the records that would be rejected.
    Validate(ValidateArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// JSON file holding an array of trade records.
    #[arg(long)]
    trades: PathBuf,

    /// First local date to include (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// First local date to exclude (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Only trades on this symbol (case-insensitive).
    #[arg(long)]
    symbol: Option<String>,

    #[arg(long, value_enum)]
    direction: Option<Direction>,

    #[arg(long, value_enum)]
    outcome: Option<Outcome>,

    #[arg(long, value_enum)]
    session: Option<Session>,

    #[arg(long, value_enum)]
    review: Option<ReviewArg>,

    /// Only trades tagged with this setup id.
    #[arg(long, conflicts_with = "no_setup")]
    setup: Option<String>,

    /// Only trades without a setup.
    #[arg(long)]
    no_setup: bool,

    /// "UTC", "local" or an IANA zone name. Overrides report.timezone.
    #[arg(long)]
    timezone: Option<String>,

    /// Overrides report.starting_balance.
    #[arg(long)]
    starting_balance: Option<Decimal>,

    /// Print the report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ValidateArgs {
    /// JSON file holding an array of trade records.
    #[arg(long)]
    trades: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReviewArg {
    Reviewed,
    NotReviewed,
}

impl From<ReviewArg> for ReviewState {
    fn from(arg: ReviewArg) -> Self {
        match arg {
            ReviewArg::Reviewed => ReviewState::Reviewed,
            ReviewArg::NotReviewed => ReviewState::NotReviewed,
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs, settings: &ReportSettings) -> Result<()> {
    let params = report_params(&args, settings)?;
    let (trades, rejected) = load_trades(&args.trades)?;
    if !rejected.is_empty() {
        tracing::warn!(
            rejected = rejected.len(),
            "Some records were skipped; run `journal validate` for details."
        );
    }

    let report = AnalyticsEngine::new()
        .calculate(&trades, &params)
        .context("Failed to build the report")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &params);
    }
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<()> {
    let (trades, rejected) = load_trades(&args.trades)?;
    println!("{} valid, {} rejected", trades.len(), rejected.len());

    if rejected.is_empty() {
        return Ok(());
    }

    let mut table = new_table(vec!["Record", "Problem"]);
    for (index, error) in &rejected {
        table.add_row(vec![index.to_string(), error.to_string()]);
    }
    println!("{table}");
    anyhow::bail!("{} record(s) failed validation", rejected.len())
}

/// Reads a JSON array of trade records and splits it into valid trades and rejections.
fn load_trades(path: &Path) -> Result<(Vec<Trade>, Vec<(usize, CoreError)>)> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<TradeRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of trade records", path.display()))?;

    tracing::debug!(records = records.len(), path = %path.display(), "Trade records loaded.");
    Ok(Trade::from_records(records))
}

/// Merges command-line flags over the configured report defaults.
fn report_params(args: &ReportArgs, settings: &ReportSettings) -> Result<ReportParams> {
    let timezone = args.timezone.as_deref().unwrap_or(&settings.timezone);
    let zone: ReportZone = timezone.parse()?;

    let setup = if args.no_setup {
        Some(SetupFilter::NoSetup)
    } else {
        args.setup.clone().map(SetupFilter::Setup)
    };

    let params = ReportParams {
        zone,
        starting_balance: args
            .starting_balance
            .or(settings.starting_balance)
            .map(from_decimal),
        filter: TradeFilter {
            from: args.from,
            to: args.to,
            symbol: args.symbol.clone(),
            direction: args.direction,
            outcome: args.outcome,
            session: args.session,
            review: args.review.map(ReviewState::from),
            setup,
        },
        sharpe: settings.sharpe_convention,
        ranking_size: settings.ranking_size,
    };
    params.validate()?;
    Ok(params)
}

// ==============================================================================
// Table Rendering
// ==============================================================================

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn ratio(value: f64) -> String {
    if value.is_infinite() {
        "Infinity".to_string()
    } else {
        format!("{value:.2}")
    }
}

fn pct(value: f64) -> String {
    format!("{value:.1}%")
}

fn print_report(report: &PerformanceReport, params: &ReportParams) {
    let s = &report.summary;
    println!("Performance report ({})", params.zone);

    let mut summary = new_table(vec!["Metric", "Value"]);
    let rows = [
        ("Trades", s.total_trades.to_string()),
        (
            "Wins / Losses / Breakeven",
            format!("{} / {} / {}", s.wins, s.losses, s.breakevens),
        ),
        ("Win rate", pct(s.win_rate_pct)),
        ("Net P&L", money(s.net_pnl)),
        ("Gross profit", money(s.gross_profit)),
        ("Gross loss", money(s.gross_loss)),
        ("Profit factor", ratio(s.profit_factor)),
        ("Average win", money(s.average_win)),
        ("Average loss", money(s.average_loss)),
        ("Reward / risk", ratio(s.reward_risk)),
        ("Expectancy", money(s.expectancy)),
        ("Average duration (min)", format!("{:.1}", s.average_duration_minutes)),
        ("Max drawdown", money(s.max_drawdown)),
        ("Max drawdown %", pct(s.max_drawdown_fraction * 100.0)),
        (
            "Sharpe ratio",
            s.sharpe_ratio.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}")),
        ),
        (
            "Longest win / loss streak",
            format!("{} / {}", report.streaks.longest_win, report.streaks.longest_loss),
        ),
    ];
    for (label, value) in rows {
        summary.add_row(vec![label.to_string(), value]);
    }
    println!("{summary}");

    let mut sessions = new_table(vec!["Session", "Trades", "Win rate", "Net P&L"]);
    for bucket in &report.sessions {
        sessions.add_row(vec![
            bucket.label.clone(),
            bucket.stats.trades.to_string(),
            pct(bucket.stats.win_rate_pct),
            money(bucket.stats.net_pnl),
        ]);
    }
    for bucket in &report.directions {
        sessions.add_row(vec![
            bucket.direction.to_string(),
            bucket.stats.trades.to_string(),
            pct(bucket.stats.win_rate_pct),
            money(bucket.stats.net_pnl),
        ]);
    }
    println!("{sessions}");

    let mut monthly = new_table(vec![
        "Month",
        "Trades",
        "Active days",
        "Win rate",
        "Net P&L",
        "Expectancy",
    ]);
    for month in &report.monthly {
        monthly.add_row(vec![
            month.month.to_string(),
            month.trades.to_string(),
            month.active_days.to_string(),
            pct(month.win_rate_pct),
            money(month.net_pnl),
            money(month.expectancy),
        ]);
    }
    println!("{monthly}");

    println!("Top symbols");
    println!("{}", symbol_table(&report.top_symbols));
    println!("Bottom symbols");
    println!("{}", symbol_table(&report.bottom_symbols));
}

fn symbol_table(symbols: &[SymbolPerformance]) -> Table {
    let mut table = new_table(vec!["Symbol", "Trades", "Win rate", "Net P&L"]);
    for symbol in symbols {
        table.add_row(vec![
            symbol.symbol.clone(),
            symbol.trades.to_string(),
            pct(symbol.win_rate_pct),
            money(symbol.net_pnl),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ReportArgs {
        let cli = Cli::parse_from(std::iter::once("journal").chain(args.iter().copied()));
        match cli.command {
            Commands::Report(args) => args,
            Commands::Validate(_) => panic!("expected the report command"),
        }
    }

    #[test]
    fn flags_override_settings() {
        let args = parse(&[
            "report", "--trades", "t.json", "--timezone", "Asia/Tokyo",
            "--starting-balance", "2500.5", "--direction", "sell", "--no-setup",
        ]);
        let settings = ReportSettings {
            starting_balance: Some(Decimal::new(1000, 0)),
            ..Default::default()
        };

        let params = report_params(&args, &settings).unwrap();
        assert_eq!(params.zone.to_string(), "Asia/Tokyo");
        assert_eq!(params.starting_balance, Some(2500.5));
        assert_eq!(params.filter.direction, Some(Direction::Sell));
        assert_eq!(params.filter.setup, Some(SetupFilter::NoSetup));
    }

    #[test]
    fn settings_fill_missing_flags() {
        let args = parse(&["report", "--trades", "t.json", "--review", "not-reviewed"]);
        let settings = ReportSettings {
            timezone: "local".to_string(),
            starting_balance: Some(Decimal::new(1000, 0)),
            ranking_size: 3,
            ..Default::default()
        };

        let params = report_params(&args, &settings).unwrap();
        assert_eq!(params.zone, ReportZone::Local);
        assert_eq!(params.starting_balance, Some(1000.0));
        assert_eq!(params.ranking_size, 3);
        assert_eq!(params.filter.review, Some(ReviewState::NotReviewed));
    }

    #[test]
    fn rejects_bad_zone_and_range() {
        let settings = ReportSettings::default();

        let zone = parse(&["report", "--trades", "t.json", "--timezone", "Mars/Olympus"]);
        assert!(report_params(&zone, &settings).is_err());

        let range = parse(&[
            "report", "--trades", "t.json", "--from", "2024-02-01", "--to", "2024-01-01",
        ]);
        assert!(report_params(&range, &settings).is_err());
    }

    #[test]
    fn setup_flags_conflict() {
        let result = Cli::try_parse_from([
            "journal", "report", "--trades", "t.json", "--setup", "s1", "--no-setup",
        ]);
        assert!(result.is_err());
    }
}
