//! Canonical record shapes stored by Vitals.
//!
//! Every collection in the store holds one of these types, serialized as
//! camelCase JSON. Weight and sleep collections may also contain older,
//! non-canonical shapes; those are reconciled by [`crate::normalize`] before
//! anything else reads them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calories burned per minute for a free-form workout.
pub const WORKOUT_KCAL_PER_MINUTE: f64 = 8.0;

/// Milliliters in one glass of water; the water counter persists glasses.
pub const GLASS_ML: u32 = 250;

/// Daily hydration target in milliliters.
pub const WATER_GOAL_ML: u32 = 2000;

/// Daily calorie goal used when none has been set.
pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;

/// Storage key of the water counter (whole glasses).
pub const WATER_KEY: &str = "waterCount";

/// Storage key of the daily calorie goal.
pub const CALORIE_GOAL_KEY: &str = "calorieGoal";

/// The record collections held by the store, one storage key each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Workouts,
    Foods,
    Weights,
    Sleep,
    Symptoms,
    Bmi,
    BodyComposition,
    AiChats,
}

impl RecordKind {
    pub const ALL: [RecordKind; 8] = [
        RecordKind::Workouts,
        RecordKind::Foods,
        RecordKind::Weights,
        RecordKind::Sleep,
        RecordKind::Symptoms,
        RecordKind::Bmi,
        RecordKind::BodyComposition,
        RecordKind::AiChats,
    ];

    /// The storage key for this collection.
    pub fn key(self) -> &'static str {
        match self {
            RecordKind::Workouts => "workouts",
            RecordKind::Foods => "foods",
            RecordKind::Weights => "weights",
            RecordKind::Sleep => "sleep",
            RecordKind::Symptoms => "symptoms",
            RecordKind::Bmi => "bmi",
            RecordKind::BodyComposition => "bodyComposition",
            RecordKind::AiChats => "aiChats",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A completed workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    #[serde(with = "crate::dates::lenient")]
    pub date: NaiveDate,
    /// Display-only time of day.
    #[serde(default)]
    pub time: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    /// Minutes; fractional values are kept as entered.
    pub duration: f64,
    /// Estimated kcal burned.
    #[serde(default)]
    pub calories: u32,
}

/// A logged meal or snack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    #[serde(with = "crate::dates::lenient")]
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    pub name: String,
    pub calories: f64,
    /// Logged through the meal scanner rather than typed in.
    #[serde(default)]
    pub scanned: bool,
}

/// One body-weight reading; at most one per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    #[serde(with = "crate::dates::lenient")]
    pub date: NaiveDate,
    /// Kilograms.
    pub value: f64,
}

/// Sleep duration band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepQuality {
    Good,
    Fair,
    Poor,
}

impl SleepQuality {
    /// `Good` from 7 hours, `Fair` from 6, otherwise `Poor`.
    pub fn from_hours(hours: f64) -> Self {
        if hours >= 7.0 {
            SleepQuality::Good
        } else if hours >= 6.0 {
            SleepQuality::Fair
        } else {
            SleepQuality::Poor
        }
    }
}

impl fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SleepQuality::Good => write!(f, "Good"),
            SleepQuality::Fair => write!(f, "Fair"),
            SleepQuality::Poor => write!(f, "Poor"),
        }
    }
}

/// One night of sleep; at most one per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    #[serde(with = "crate::dates::lenient")]
    pub date: NaiveDate,
    pub hours: f64,
    pub quality: SleepQuality,
}

impl SleepRecord {
    pub fn new(date: NaiveDate, hours: f64) -> Self {
        Self {
            date,
            hours,
            quality: SleepQuality::from_hours(hours),
        }
    }
}

/// A symptom description and the analysis shown for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomRecord {
    #[serde(with = "crate::dates::lenient")]
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    pub symptoms: String,
    pub analysis: String,
}

/// A body-composition measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyCompositionSample {
    #[serde(with = "crate::dates::lenient")]
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(default)]
    pub body_fat: Option<f64>,
    #[serde(default)]
    pub muscle_mass: Option<f64>,
}

/// BMI band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal Weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::NormalWeight
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmiCategory::Underweight => write!(f, "Underweight"),
            BmiCategory::NormalWeight => write!(f, "Normal Weight"),
            BmiCategory::Overweight => write!(f, "Overweight"),
            BmiCategory::Obese => write!(f, "Obese"),
        }
    }
}

/// One BMI calculation, kept as an audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiRecord {
    #[serde(with = "crate::dates::lenient")]
    pub date: NaiveDate,
    /// Centimeters.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    /// Rounded to two decimals.
    pub bmi: f64,
    pub category: BmiCategory,
}

impl BmiRecord {
    /// Compute BMI from height in centimeters and weight in kilograms.
    ///
    /// The value is rounded to two decimals before banding, so the stored
    /// figure and its category always agree.
    pub fn calculate(date: NaiveDate, height_cm: f64, weight_kg: f64) -> Self {
        let height_m = height_cm / 100.0;
        let bmi = round2(weight_kg / (height_m * height_m));
        Self {
            date,
            height: height_cm,
            weight: weight_kg,
            bmi,
            category: BmiCategory::from_bmi(bmi),
        }
    }
}

/// One assistant exchange. Written by the assistant, stored alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub timestamp: DateTime<Utc>,
    pub user_message: String,
    pub ai_response: String,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
