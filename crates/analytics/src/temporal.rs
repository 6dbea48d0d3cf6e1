//! Calendar bucketing of trade timestamps.
//!
//! Day, month, weekday and hour buckets use the wall clock of the report zone.
//! Sessions do not: they are classified from the UTC hour, so the
//! "by session" and "by hour" views can disagree for the same trade.

use crate::error::AnalyticsError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use core_types::Session;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The timezone calendar buckets are rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportZone {
    #[default]
    Utc,
    /// The zone of the machine running the report.
    Local,
    Named(Tz),
}

impl ReportZone {
    /// Wall-clock time of `at` in this zone.
    pub fn wall_clock(&self, at: DateTime<Utc>) -> NaiveDateTime {
        match self {
            ReportZone::Utc => at.naive_utc(),
            ReportZone::Local => at.with_timezone(&chrono::Local).naive_local(),
            ReportZone::Named(tz) => at.with_timezone(tz).naive_local(),
        }
    }

    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        self.wall_clock(at).date()
    }

    pub fn local_hour(&self, at: DateTime<Utc>) -> u32 {
        self.wall_clock(at).hour()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportZone::Utc => "UTC",
            ReportZone::Local => "local",
            ReportZone::Named(tz) => tz.name(),
        }
    }
}

impl Hash for ReportZone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        self.name().hash(state);
    }
}

impl fmt::Display for ReportZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportZone {
    type Err = AnalyticsError;

    /// Accepts `UTC` (also the empty string), `local`, or an IANA name such as `Europe/London`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("utc") {
            return Ok(ReportZone::Utc);
        }
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(ReportZone::Local);
        }
        trimmed
            .parse::<Tz>()
            .map(ReportZone::Named)
            .map_err(|_| AnalyticsError::UnknownTimezone(trimmed.to_string()))
    }
}

/// A calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalyticsError::InvalidParameter(format!("month key '{s}'"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for MonthKey {
    type Error = AnalyticsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Day of week of a local date, 0 = Sunday through 6 = Saturday.
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Session of an instant, by its UTC hour.
pub fn session_of(at: DateTime<Utc>) -> Session {
    Session::from_utc_hour(at.hour())
}

/// Every calendar bucket a trade's open timestamp falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeClock {
    /// Local calendar day; its `Display` is the `YYYY-MM-DD` day key.
    pub date: NaiveDate,
    pub month: MonthKey,
    pub weekday: u32,
    /// Local wall-clock hour.
    pub hour: u32,
    /// UTC-hour session.
    pub session: Session,
}

impl TradeClock {
    pub fn of(opened_at: DateTime<Utc>, zone: ReportZone) -> Self {
        let local = zone.wall_clock(opened_at);
        let date = local.date();
        Self {
            date,
            month: MonthKey::of(date),
            weekday: day_of_week(date),
            hour: local.hour(),
            session: session_of(opened_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_zone_names() {
        assert_eq!("".parse::<ReportZone>().unwrap(), ReportZone::Utc);
        assert_eq!("utc".parse::<ReportZone>().unwrap(), ReportZone::Utc);
        assert_eq!("Local".parse::<ReportZone>().unwrap(), ReportZone::Local);
        assert_eq!(
            "America/New_York".parse::<ReportZone>().unwrap(),
            ReportZone::Named(chrono_tz::America::New_York)
        );
        assert_eq!(
            "Mars/Olympus".parse::<ReportZone>(),
            Err(AnalyticsError::UnknownTimezone("Mars/Olympus".to_string()))
        );
    }

    #[test]
    fn day_key_follows_the_report_zone() {
        // 03:30 UTC on a Tuesday is still Monday evening in New York.
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 3, 30, 0).unwrap();

        let utc = TradeClock::of(at, ReportZone::Utc);
        assert_eq!(utc.date.to_string(), "2024-03-05");
        assert_eq!(utc.weekday, 2);
        assert_eq!(utc.hour, 3);

        let ny = TradeClock::of(at, ReportZone::Named(chrono_tz::America::New_York));
        assert_eq!(ny.date.to_string(), "2024-03-04");
        assert_eq!(ny.weekday, 1);
        assert_eq!(ny.hour, 22);
    }

    #[test]
    fn session_ignores_the_report_zone() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 13, 0, 0).unwrap();
        let tokyo = TradeClock::of(at, ReportZone::Named(chrono_tz::Asia::Tokyo));

        assert_eq!(tokyo.hour, 22);
        assert_eq!(tokyo.session, Session::Overlap);
    }

    #[test]
    fn month_keys_order_and_render() {
        let jan = MonthKey::of(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let dec = MonthKey::of(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());

        assert_eq!(jan.to_string(), "2024-01");
        assert!(dec < jan);
        assert_eq!("2023-12".parse::<MonthKey>().unwrap(), dec);
        assert!("2023-13".parse::<MonthKey>().is_err());
        assert_eq!(serde_json::to_string(&jan).unwrap(), "\"2024-01\"");
    }

    #[test]
    fn weekday_numbering_starts_on_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        assert_eq!(day_of_week(sunday), 0);
        assert_eq!(WEEKDAY_LABELS[day_of_week(sunday) as usize], "Sun");
        assert_eq!(day_of_week(sunday.succ_opt().unwrap()), 1);
    }
}
