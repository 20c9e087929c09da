//! Windowed and whole-history statistics over stored records.
//!
//! Every function here is a pure computation over record slices; nothing
//! is cached. Two different "recent" windows coexist on purpose:
//!
//! - **count-based**: the last N records in insertion order
//!   ([`recent_workouts`], [`recent_sleep`]);
//! - **calendar-based**: records dated within the last N calendar days
//!   ([`workouts_in_last_days`], used by the health score).

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::{
    FoodEntry, SleepQuality, SleepRecord, WeightSample, WorkoutEntry, GLASS_ML, WATER_GOAL_ML,
};
use crate::score::HealthScore;

/// Default tail length for the count-based "recent" views.
pub const RECENT_COUNT: usize = 7;

/// Direction of the latest weight readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeightTrend {
    Rising,
    Falling,
    Stable,
}

impl std::fmt::Display for WeightTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightTrend::Rising => write!(f, "Rising"),
            WeightTrend::Falling => write!(f, "Falling"),
            WeightTrend::Stable => write!(f, "Stable"),
        }
    }
}

/// Summary of the most recent sleep records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentSleep {
    pub average_hours: f64,
    pub latest_quality: SleepQuality,
}

/// Every statistic the UI layer shows, computed at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct StatsBundle {
    pub today: NaiveDate,
    pub total_workouts: usize,
    pub calories_burned: u64,
    pub workouts_last_7_days: usize,
    pub recent_workouts: Vec<WorkoutEntry>,
    pub today_calories: f64,
    pub calorie_goal: f64,
    pub calorie_progress_pct: f64,
    pub average_calories: f64,
    pub water_ml: u32,
    pub water_glasses: u32,
    pub hydration_pct: f64,
    pub average_sleep: f64,
    pub recent_sleep: Option<RecentSleep>,
    pub current_weight: Option<f64>,
    pub weight_change: Option<f64>,
    pub weight_trend: Option<WeightTrend>,
    pub health_score: HealthScore,
}

/// Total calories logged on `today`.
pub fn today_calories(foods: &[FoodEntry], today: NaiveDate) -> f64 {
    foods
        .iter()
        .filter(|f| f.date == today)
        .map(|f| f.calories)
        .sum()
}

/// Total calories divided by the number of distinct logged days.
///
/// Several meals on one day count as one day, so logging habits do not
/// drag the average down. Returns 0 with no entries.
pub fn average_calories(foods: &[FoodEntry]) -> f64 {
    if foods.is_empty() {
        return 0.0;
    }
    let total: f64 = foods.iter().map(|f| f.calories).sum();
    let days: HashSet<NaiveDate> = foods.iter().map(|f| f.date).collect();
    total / days.len() as f64
}

/// The last `n` workouts in insertion order.
pub fn recent_workouts(workouts: &[WorkoutEntry], n: usize) -> &[WorkoutEntry] {
    &workouts[workouts.len().saturating_sub(n)..]
}

/// Workouts dated within the `days` calendar days ending on `today`.
pub fn workouts_in_last_days(workouts: &[WorkoutEntry], today: NaiveDate, days: u64) -> usize {
    let start = today
        .checked_sub_days(Days::new(days.saturating_sub(1)))
        .unwrap_or(NaiveDate::MIN);
    workouts
        .iter()
        .filter(|w| w.date >= start && w.date <= today)
        .count()
}

/// Mean hours over the whole sleep history; 0 with no records.
pub fn average_sleep(sleep: &[SleepRecord]) -> f64 {
    if sleep.is_empty() {
        return 0.0;
    }
    sleep.iter().map(|s| s.hours).sum::<f64>() / sleep.len() as f64
}

/// Mean of the last [`RECENT_COUNT`] records and the latest quality.
pub fn recent_sleep(sleep: &[SleepRecord]) -> Option<RecentSleep> {
    let recent = &sleep[sleep.len().saturating_sub(RECENT_COUNT)..];
    let latest = recent.last()?;
    Some(RecentSleep {
        average_hours: average_sleep(recent),
        latest_quality: latest.quality,
    })
}

/// Trend over the last three samples; `None` with fewer than three.
///
/// The average daily rate is `(newest - oldest) / 2`; beyond ±0.1 kg it
/// counts as rising or falling.
pub fn weight_trend(weights: &[WeightSample]) -> Option<WeightTrend> {
    if weights.len() < 3 {
        return None;
    }
    let recent = &weights[weights.len() - 3..];
    let rate = (recent[2].value - recent[0].value) / 2.0;
    Some(if rate > 0.1 {
        WeightTrend::Rising
    } else if rate < -0.1 {
        WeightTrend::Falling
    } else {
        WeightTrend::Stable
    })
}

/// The latest weight sample's value.
pub fn current_weight(weights: &[WeightSample]) -> Option<f64> {
    weights.last().map(|w| w.value)
}

/// Latest minus previous sample; 0 with a single sample.
pub fn weight_change(weights: &[WeightSample]) -> Option<f64> {
    let current = weights.last()?.value;
    let previous = weights
        .len()
        .checked_sub(2)
        .map(|i| weights[i].value)
        .unwrap_or(current);
    Some(current - previous)
}

/// Percent of the daily water goal reached, capped at 100.
pub fn hydration_percentage(water_ml: u32) -> f64 {
    (water_ml as f64 / WATER_GOAL_ML as f64).min(1.0) * 100.0
}

/// Whole glasses represented by `water_ml`.
pub fn water_glasses(water_ml: u32) -> u32 {
    water_ml / GLASS_ML
}

/// Percent of the calorie goal eaten today, capped at 100.
pub fn calorie_progress(today_calories: f64, calorie_goal: f64) -> f64 {
    if calorie_goal <= 0.0 {
        return 0.0;
    }
    (today_calories / calorie_goal).min(1.0) * 100.0
}

/// Sum of estimated kcal burned across all workouts.
pub fn calories_burned(workouts: &[WorkoutEntry]) -> u64 {
    workouts.iter().map(|w| u64::from(w.calories)).sum()
}
