//! Calendar-date handling.
//!
//! Every per-day comparison in Vitals ("today", one weight per day, distinct
//! days for calorie averages) is done on [`NaiveDate`] values, never on
//! formatted strings. Records are written with ISO dates (`YYYY-MM-DD`), but
//! older data may carry locale-formatted dates, so reads go through
//! [`parse_calendar_date`], which accepts the common variants.
//!
//! The current time is injected through the [`Clock`] trait so the whole
//! engine can be driven from a fixed date in tests.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Date formats accepted when reading stored records, tried in order.
const ACCEPTED_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d"];

/// Parse a stored calendar date, tolerating locale formats.
///
/// Returns `None` for anything that is not a recognizable date. Surrounding
/// whitespace is ignored.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Current instant in UTC. The default reads [`now`](Clock::now) as UTC.
    fn now_utc(&self) -> DateTime<Utc> {
        self.now().and_utc()
    }
}

/// The system clock, in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// A clock reading noon on the given date.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(12, 0, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Serde adapter for record dates: writes ISO, reads any accepted format.
pub mod lenient {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("unrecognized date: {raw}")))
    }
}
