//! # Journal Analytics Engine
//!
//! This crate turns journaled trades into a performance report: equity curve,
//! drawdown, Sharpe ratio, profit factor, streaks, and session, weekday, hour,
//! month and symbol breakdowns.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of storage,
//!   presentation or the network. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless calculator. The
//!   same trades and parameters always produce the same `PerformanceReport`.
//!   Memoization, when wanted, is an explicit `ReportCache` owned by the caller.
//! - **No data errors:** Empty input, missing optional fields and degenerate
//!   denominators resolve to documented zero / Infinity / `None` values. Only
//!   invalid parameters produce an `AnalyticsError`.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: Filters trades and builds the report.
//! - `ReportParams` / `TradeFilter`: What to report on and how.
//! - `PerformanceReport`: The standardized, serializable output.
//! - `ReportCache`: Optional memoization keyed by trade-set version and parameters.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod cache;
pub mod checklist;
pub mod engine;
pub mod equity;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod params;
pub mod pnl;
pub mod report;
pub mod streaks;
pub mod tally;
pub mod temporal;

// Re-export the key components to create a clean, public-facing API.
pub use cache::ReportCache;
pub use checklist::{ChecklistItem, adherence_pct};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use filter::{ReviewState, SetupFilter, TradeFilter};
pub use params::ReportParams;
pub use pnl::net_pnl;
pub use report::{
    BucketStats, DailyPoint, DirectionPerformance, MonthlySummary, PerformanceReport,
    SessionPerformance, SummaryStats, SymbolPerformance, TimeBucket, TradeExtreme,
};
pub use streaks::{StreakSummary, detect_streaks};
pub use temporal::{MonthKey, ReportZone, TradeClock};
