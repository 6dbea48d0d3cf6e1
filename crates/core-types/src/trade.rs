use crate::enums::{Direction, Outcome};
use crate::error::CoreError;
use crate::numeric::{coerce, coerce_optional};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A journaled trade, validated once at the persistence boundary.
///
/// Every numeric field is already finite. Optional fields are `None` when the
/// journal has no usable value for them, and the analytics treat `None` as
/// "excluded from this metric" rather than as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub opened_at: DateTime<Utc>,
    /// `None` while the trade is still open or its duration is unknown.
    pub closed_at: Option<DateTime<Utc>>,
    pub symbol: String,
    pub direction: Direction,
    pub outcome: Outcome,
    /// Gross P&L in the reporting currency.
    pub pnl_amount: f64,
    pub pnl_percent: f64,
    pub commission: Option<f64>,
    /// Explicit net figure entered during review. Overrides `pnl_amount - commission`.
    pub net_pnl: Option<f64>,
    pub risk_amount: Option<f64>,
    /// Set once the review stage is complete; only then are commission and net trusted.
    pub reviewed_at: Option<DateTime<Utc>>,
    pub setup_id: Option<String>,
}

impl Trade {
    /// Creates an unreviewed trade with no optional fields set.
    pub fn new(
        id: impl Into<String>,
        opened_at: DateTime<Utc>,
        symbol: impl Into<String>,
        direction: Direction,
        outcome: Outcome,
        pnl_amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            opened_at,
            closed_at: None,
            symbol: symbol.into(),
            direction,
            outcome,
            pnl_amount,
            pnl_percent: 0.0,
            commission: None,
            net_pnl: None,
            risk_amount: None,
            reviewed_at: None,
            setup_id: None,
        }
    }

    pub fn is_reviewed(&self) -> bool {
        self.reviewed_at.is_some()
    }

    /// Validates a batch of records, keeping valid trades in input order and
    /// reporting each rejected record by its position in `records`.
    pub fn from_records(records: Vec<TradeRecord>) -> (Vec<Trade>, Vec<(usize, CoreError)>) {
        let mut trades = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            match Trade::try_from(record) {
                Ok(trade) => trades.push(trade),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Rejected trade record.");
                    rejected.push((index, e));
                }
            }
        }

        (trades, rejected)
    }
}

/// A trade as exported by the persistence layer, before validation.
///
/// All fields are optional and numeric fields may hold numbers, numeric strings
/// or garbage. Use `Trade::try_from` to obtain a [`Trade`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TradeRecord {
    pub id: Option<String>,
    #[serde(alias = "open_time")]
    pub opened_at: Option<String>,
    #[serde(alias = "close_time")]
    pub closed_at: Option<String>,
    #[serde(alias = "instrument")]
    pub symbol: Option<String>,
    pub direction: Option<String>,
    pub outcome: Option<String>,
    pub pnl_amount: Value,
    pub pnl_percent: Value,
    pub commission: Value,
    pub net_pnl: Value,
    pub risk_amount: Value,
    pub reviewed_at: Option<String>,
    pub setup_id: Option<String>,
}

impl TryFrom<TradeRecord> for Trade {
    type Error = CoreError;

    fn try_from(record: TradeRecord) -> Result<Self, Self::Error> {
        let id = required(record.id, "id")?;
        let opened_at = parse_timestamp(&required(record.opened_at, "opened_at")?, "opened_at")?;
        let direction = required(record.direction, "direction")?.parse::<Direction>()?;
        let outcome = required(record.outcome, "outcome")?.parse::<Outcome>()?;

        let closed_at = optional_timestamp(record.closed_at, "closed_at")?;
        let reviewed_at = optional_timestamp(record.reviewed_at, "reviewed_at")?;

        Ok(Self {
            id,
            opened_at,
            closed_at,
            symbol: record.symbol.unwrap_or_default().trim().to_string(),
            direction,
            outcome,
            pnl_amount: coerce(&record.pnl_amount, 0.0),
            pnl_percent: coerce(&record.pnl_percent, 0.0),
            commission: coerce_optional(&record.commission),
            net_pnl: coerce_optional(&record.net_pnl),
            risk_amount: coerce_optional(&record.risk_amount),
            reviewed_at,
            setup_id: non_blank(record.setup_id),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, CoreError> {
    non_blank(value).ok_or(CoreError::MissingField(field))
}

fn parse_timestamp(raw: &str, field: &'static str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| CoreError::InvalidInput(field, raw.to_string()))
}

fn optional_timestamp(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, CoreError> {
    non_blank(value)
        .map(|raw| parse_timestamp(&raw, field))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record() -> TradeRecord {
        serde_json::from_value(json!({
            "id": "t-1",
            "opened_at": "2024-03-04T09:30:00+02:00",
            "closed_at": "2024-03-04T10:00:00Z",
            "symbol": " eurusd ",
            "direction": "BUY",
            "outcome": "WIN",
            "pnl_amount": "125.5",
            "pnl_percent": 1.2,
            "commission": null,
            "net_pnl": "n/a",
            "reviewed_at": null,
            "setup_id": ""
        }))
        .unwrap()
    }

    #[test]
    fn converts_a_well_formed_record() {
        let trade = Trade::try_from(record()).unwrap();

        assert_eq!(trade.id, "t-1");
        assert_eq!(trade.opened_at, Utc.with_ymd_and_hms(2024, 3, 4, 7, 30, 0).unwrap());
        assert_eq!(trade.closed_at, Some(Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap()));
        assert_eq!(trade.symbol, "eurusd");
        assert_eq!(trade.pnl_amount, 125.5);
        assert_eq!(trade.commission, None);
        assert_eq!(trade.net_pnl, None);
        assert_eq!(trade.setup_id, None);
        assert!(!trade.is_reviewed());
    }

    #[test]
    fn rejects_missing_required_fields() {
        let mut missing_outcome = record();
        missing_outcome.outcome = None;
        assert_eq!(
            Trade::try_from(missing_outcome),
            Err(CoreError::MissingField("outcome"))
        );

        let mut blank_id = record();
        blank_id.id = Some("  ".to_string());
        assert_eq!(Trade::try_from(blank_id), Err(CoreError::MissingField("id")));
    }

    #[test]
    fn rejects_malformed_values() {
        let mut bad_time = record();
        bad_time.opened_at = Some("yesterday".to_string());
        assert!(matches!(
            Trade::try_from(bad_time),
            Err(CoreError::InvalidInput("opened_at", _))
        ));

        let mut bad_direction = record();
        bad_direction.direction = Some("LONG".to_string());
        assert!(matches!(
            Trade::try_from(bad_direction),
            Err(CoreError::InvalidInput("direction", _))
        ));
    }

    #[test]
    fn batch_conversion_reports_rejections_by_index() {
        let mut broken = record();
        broken.direction = None;

        let (trades, rejected) = Trade::from_records(vec![record(), broken, record()]);

        assert_eq!(trades.len(), 2);
        assert_eq!(rejected, vec![(1, CoreError::MissingField("direction"))]);
    }
}
