use chrono::NaiveDate;
use thiserror::Error;

/// Rejections of caller-supplied report parameters.
///
/// Trade data itself never produces an error: degenerate numbers resolve to the
/// zero/Infinity/`None` policy of each metric.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid date range: start {from} is not before end {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Invalid report parameter: {0}")]
    InvalidParameter(String),
}
