//! Reconciles stored weight and sleep entries into canonical records.
//!
//! Weight and sleep collections have been written in several shapes over
//! time: a delimited text line (`"3/7/2024 - 71.5 kg"`), a bare number meaning
//! "today", or an object. Each stored element is read into a tagged union
//! ([`RawWeight`], [`RawSleep`]) and reshaped into a [`WeightSample`] or
//! [`SleepRecord`]. Anything that cannot be reshaped is dropped and counted;
//! malformed history never turns into an error.
//!
//! Food entries were once stored as `"<date> - <name> - <kcal> kcal"` lines.
//! [`read_foods`] reads those alongside objects; foods are never rewritten.
//!
//! After reshaping, the collection is deduplicated by date (the entry that
//! appears later in the stored order wins) and sorted ascending by date.
//! Normalizing an already-canonical collection yields the same collection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dates::parse_calendar_date;
use crate::models::{FoodEntry, SleepRecord, WeightSample};

/// Upper bound for a plausible body weight in kilograms.
pub const MAX_WEIGHT_KG: f64 = 300.0;

/// Upper bound for one night of sleep in hours.
pub const MAX_SLEEP_HOURS: f64 = 24.0;

/// Records keyed by calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for WeightSample {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for SleepRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Outcome of a lenient normalization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    /// Canonical records, one per date, ascending.
    pub records: Vec<T>,
    /// Stored elements that could not be reshaped.
    pub dropped: usize,
    /// Whether `records` differs from the stored input.
    pub changed: bool,
}

/// A stored weight entry in any historical shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawWeight {
    Number(f64),
    Text(String),
    Record(Map<String, Value>),
    Unrecognized(Value),
}

/// A stored sleep entry in any historical shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSleep {
    Number(f64),
    Text(String),
    Record(Map<String, Value>),
    Unrecognized(Value),
}

/// A stored food entry: an object or a legacy text line.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawFood {
    Record(FoodEntry),
    Text(String),
    Unrecognized(Value),
}

impl RawFood {
    pub fn into_entry(self) -> Option<FoodEntry> {
        match self {
            RawFood::Record(entry) => Some(entry),
            RawFood::Text(line) => food_line(&line),
            RawFood::Unrecognized(_) => None,
        }
    }
}

impl RawWeight {
    /// Reshape into a canonical sample; bare numbers are dated `today`.
    pub fn into_sample(self, today: NaiveDate) -> Option<WeightSample> {
        let (date, value) = match self {
            RawWeight::Number(value) => (today, value),
            RawWeight::Text(line) => split_line(&line)?,
            RawWeight::Record(fields) => read_fields(&fields, "value")?,
            RawWeight::Unrecognized(_) => return None,
        };
        valid_weight(value).then_some(WeightSample { date, value })
    }
}

impl RawSleep {
    /// Reshape into a canonical record; quality is always re-derived.
    pub fn into_record(self, today: NaiveDate) -> Option<SleepRecord> {
        let (date, hours) = match self {
            RawSleep::Number(hours) => (today, hours),
            RawSleep::Text(line) => split_line(&line)?,
            RawSleep::Record(fields) => read_fields(&fields, "hours")?,
            RawSleep::Unrecognized(_) => return None,
        };
        valid_sleep_hours(hours).then(|| SleepRecord::new(date, hours))
    }
}

/// `0 < kg <= 300`.
pub fn valid_weight(kg: f64) -> bool {
    kg.is_finite() && kg > 0.0 && kg <= MAX_WEIGHT_KG
}

/// `0 < hours <= 24`.
pub fn valid_sleep_hours(hours: f64) -> bool {
    hours.is_finite() && hours > 0.0 && hours <= MAX_SLEEP_HOURS
}

/// Normalize a stored weight collection.
pub fn normalize_weights(raw: &[Value], today: NaiveDate) -> Normalized<WeightSample> {
    normalize_with(raw, |entry: RawWeight| entry.into_sample(today))
}

/// Normalize a stored sleep collection.
pub fn normalize_sleep(raw: &[Value], today: NaiveDate) -> Normalized<SleepRecord> {
    normalize_with(raw, |entry: RawSleep| entry.into_record(today))
}

/// Read a stored food collection in stored order, skipping entries in no
/// known shape.
pub fn read_foods(raw: &[Value]) -> Vec<FoodEntry> {
    raw.iter()
        .filter_map(|value| {
            serde_json::from_value::<RawFood>(value.clone())
                .ok()
                .and_then(RawFood::into_entry)
        })
        .collect()
}

/// Insert `record`, replacing any record on the same date, and keep the
/// collection sorted ascending.
pub fn upsert_by_date<T: Dated>(records: Vec<T>, record: T) -> Vec<T> {
    dedup_by_date(records.into_iter().chain(std::iter::once(record)))
}

/// Keep the last record seen for each date, ascending by date.
pub fn dedup_by_date<T: Dated>(records: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut by_date = BTreeMap::new();
    for record in records {
        by_date.insert(record.date(), record);
    }
    by_date.into_values().collect()
}

fn normalize_with<R, T, F>(raw: &[Value], reshape: F) -> Normalized<T>
where
    R: DeserializeOwned,
    T: Dated + Serialize,
    F: Fn(R) -> Option<T>,
{
    let mut dropped = 0;
    let mut reshaped = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value::<R>(value.clone()).ok().and_then(&reshape) {
            Some(record) => reshaped.push(record),
            None => dropped += 1,
        }
    }

    let records = dedup_by_date(reshaped);
    let changed = records.len() != raw.len()
        || records
            .iter()
            .zip(raw)
            .any(|(record, stored)| serde_json::to_value(record).ok().as_ref() != Some(stored));

    Normalized {
        records,
        dropped,
        changed,
    }
}

/// Read `{"date": ..., "<amount_field>": ...}` from an object entry.
fn read_fields(fields: &Map<String, Value>, amount_field: &str) -> Option<(NaiveDate, f64)> {
    let date = parse_calendar_date(fields.get("date")?.as_str()?)?;
    let amount = fields.get(amount_field)?.as_f64()?;
    Some((date, amount))
}

/// Split `"<date> - <number><unit>"` into its date and number.
fn split_line(line: &str) -> Option<(NaiveDate, f64)> {
    let mut parts = line.split(" - ");
    let date = parse_calendar_date(parts.next()?)?;
    let amount = leading_number(parts.next()?)?;
    Some((date, amount))
}

/// `"<date> - <name> - <kcal> kcal"`; the name may itself contain `" - "`.
fn food_line(line: &str) -> Option<FoodEntry> {
    let (date, rest) = line.split_once(" - ")?;
    let (name, kcal) = rest.rsplit_once(" - ")?;
    let calories = leading_number(kcal)?;
    let name = name.trim();
    if name.is_empty() || !calories.is_finite() || calories < 0.0 {
        return None;
    }
    Some(FoodEntry {
        date: parse_calendar_date(date)?,
        time: String::new(),
        name: name.to_string(),
        calories,
        scanned: false,
    })
}

/// Parse the numeric prefix of `"71.5 kg"`, `"7h"`, `"8 hours"`.
fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
