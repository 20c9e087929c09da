//! The 0–100 health score.
//!
//! Four sub-scores, each capped at 25 points:
//!
//! | Component | Input | Points |
//! |-----------|-------|--------|
//! | workouts  | workouts dated in the trailing 7 calendar days | 5 each, max 25 |
//! | nutrition | today's calories / calorie goal | 25 in [0.8, 1.2], 15 in [0.6, 1.4], else 5 |
//! | hydration | percent of the daily water goal | continuous, 0–25 |
//! | sleep     | whole-history mean hours | 25 in [7, 9], 15 in [6, 10], else 5 |
//!
//! The total is the rounded sum.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{FoodEntry, SleepRecord, WorkoutEntry};
use crate::stats;

/// Width of the workout window in calendar days, today included.
pub const WORKOUT_WINDOW_DAYS: u64 = 7;

const COMPONENT_MAX: f64 = 25.0;

/// Score breakdown; `total` is always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthScore {
    pub workouts: f64,
    pub nutrition: f64,
    pub hydration: f64,
    pub sleep: f64,
    pub total: u8,
}

/// Everything the score is computed from.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub workouts: &'a [WorkoutEntry],
    pub foods: &'a [FoodEntry],
    pub sleep: &'a [SleepRecord],
    pub water_ml: u32,
    pub calorie_goal: f64,
    pub today: NaiveDate,
}

impl HealthScore {
    pub fn compute(inputs: &ScoreInputs<'_>) -> Self {
        let recent =
            stats::workouts_in_last_days(inputs.workouts, inputs.today, WORKOUT_WINDOW_DAYS);
        let workouts = workout_points(recent);
        let nutrition = nutrition_points(
            stats::today_calories(inputs.foods, inputs.today),
            inputs.calorie_goal,
        );
        let hydration = hydration_points(inputs.water_ml);
        let sleep = sleep_points(stats::average_sleep(inputs.sleep));

        let sum = workouts + nutrition + hydration + sleep;
        Self {
            workouts,
            nutrition,
            hydration,
            sleep,
            total: sum.round().clamp(0.0, 100.0) as u8,
        }
    }
}

pub fn workout_points(recent_count: usize) -> f64 {
    (recent_count as f64 * 5.0).min(COMPONENT_MAX)
}

pub fn nutrition_points(today_calories: f64, calorie_goal: f64) -> f64 {
    let ratio = if calorie_goal > 0.0 {
        today_calories / calorie_goal
    } else {
        0.0
    };
    if (0.8..=1.2).contains(&ratio) {
        25.0
    } else if (0.6..=1.4).contains(&ratio) {
        15.0
    } else {
        5.0
    }
}

pub fn hydration_points(water_ml: u32) -> f64 {
    stats::hydration_percentage(water_ml) / 100.0 * COMPONENT_MAX
}

pub fn sleep_points(average_hours: f64) -> f64 {
    if (7.0..=9.0).contains(&average_hours) {
        25.0
    } else if (6.0..=10.0).contains(&average_hours) {
        15.0
    } else {
        5.0
    }
}
