use core_types::SharpeConvention;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the journal.
///
/// Every section is optional in `journal.toml`; missing keys take the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub report: ReportSettings,
    pub logging: LoggingSettings,
}

/// Defaults applied to every report unless overridden on the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// "UTC", "local" or an IANA zone name such as "Europe/London".
    pub timezone: String,
    /// Account balance the equity curve starts from.
    pub starting_balance: Option<Decimal>,
    /// Denominator used when turning daily P&L into returns for the Sharpe ratio.
    pub sharpe_convention: SharpeConvention,
    /// How many symbols the top and bottom rankings hold.
    pub ranking_size: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            starting_balance: None,
            sharpe_convention: SharpeConvention::default(),
            ranking_size: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
