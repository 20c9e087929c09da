//! Write commands: every `vitals` subcommand that records something.
//!
//! Each function opens the ledger, performs one operation and prints a
//! one-line confirmation on stdout. Validation failures come back as
//! errors carrying the user-facing message.

use anyhow::Result;
use chrono::NaiveDate;

use vitals_core::dates::parse_calendar_date;
use vitals_core::knowledge::WORKOUT_TEMPLATES;
use vitals_core::models::GLASS_ML;
use vitals_core::stats::water_glasses;
use vitals_core::HealthLedger;

use crate::config::Config;
use crate::sqlite_store::{open_ledger, SqliteStore};

/// A single write against the ledger.
#[derive(Debug, Clone)]
pub enum Entry {
    Workout { workout_type: String, minutes: f64 },
    Template { name: String },
    Food { name: String, calories: f64, scanned: bool },
    Weight { kg: f64, date: Option<NaiveDate> },
    ClearWeights,
    Sleep { hours: f64, date: Option<NaiveDate> },
    Symptom { text: String },
    Body { kg: f64, body_fat: Option<f64>, muscle_mass: Option<f64> },
    Bmi { height_cm: f64, weight_kg: f64 },
    Water { ml: u32 },
    ResetWater,
    CalorieGoal { kcal: f64 },
    Normalize,
}

/// clap value parser for `--date`.
pub fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_calendar_date(raw).ok_or_else(|| format!("unrecognized date '{raw}' (use YYYY-MM-DD)"))
}

/// Only whole glasses are kept between runs, so report the saved total.
fn water_message(added_ml: u32, total_ml: u32) -> String {
    let saved_ml = water_glasses(total_ml) * GLASS_ML;
    let unsaved_ml = total_ml - saved_ml;
    if unsaved_ml == 0 {
        format!("Added {added_ml}ml of water ({saved_ml}ml today)")
    } else {
        format!(
            "Added {added_ml}ml of water ({saved_ml}ml today; partial glass of {unsaved_ml}ml is not saved)"
        )
    }
}

pub async fn run_record(config: &Config, entry: Entry) -> Result<()> {
    let mut ledger = open_ledger(config).await?;
    let message = apply(&mut ledger, entry).await;
    ledger.store().backend().pool().close().await;
    println!("{}", message?);
    Ok(())
}

async fn apply(ledger: &mut HealthLedger<SqliteStore>, entry: Entry) -> Result<String> {
    let message = match entry {
        Entry::Workout {
            workout_type,
            minutes,
        } => {
            let w = ledger.record_workout(&workout_type, minutes).await?;
            format!(
                "Workout logged: {} for {} min (~{} kcal)",
                w.workout_type, w.duration, w.calories
            )
        }
        Entry::Template { name } => match ledger.start_workout(&name).await {
            Ok(w) => format!(
                "Workout completed: {} ({} min, {} kcal)",
                w.workout_type, w.duration, w.calories
            ),
            Err(e) if e.is_validation() => {
                let names: Vec<&str> = WORKOUT_TEMPLATES.iter().map(|t| t.name).collect();
                anyhow::bail!("{e}. Available: {}", names.join(", "));
            }
            Err(e) => return Err(e.into()),
        },
        Entry::Food {
            name,
            calories,
            scanned,
        } => {
            let f = ledger.record_food(&name, calories, scanned).await?;
            format!("Food logged: {} ({} kcal)", f.name, f.calories)
        }
        Entry::Weight { kg, date } => {
            let w = ledger.record_weight(kg, date).await?;
            format!("Weight recorded: {} kg on {}", w.value, w.date.format("%Y-%m-%d"))
        }
        Entry::ClearWeights => {
            ledger.clear_weights().await?;
            "Weight history cleared".to_string()
        }
        Entry::Sleep { hours, date } => {
            let s = ledger.record_sleep(hours, date).await?;
            format!(
                "Sleep logged: {} hours on {} ({})",
                s.hours,
                s.date.format("%Y-%m-%d"),
                s.quality
            )
        }
        Entry::Symptom { text } => ledger.check_symptoms(&text).await?.analysis,
        Entry::Body {
            kg,
            body_fat,
            muscle_mass,
        } => {
            ledger
                .record_body_composition(kg, body_fat, muscle_mass)
                .await?;
            "Body composition recorded".to_string()
        }
        Entry::Bmi {
            height_cm,
            weight_kg,
        } => {
            let b = ledger.record_bmi(height_cm, weight_kg).await?;
            format!("BMI calculated: {:.1} ({})", b.bmi, b.category)
        }
        Entry::Water { ml } => {
            let total = ledger.add_water(ml).await?;
            water_message(ml, total)
        }
        Entry::ResetWater => {
            ledger.reset_water().await?;
            "Daily water count reset".to_string()
        }
        Entry::CalorieGoal { kcal } => {
            ledger.set_calorie_goal(kcal).await?;
            format!("Calorie goal set to {kcal} kcal")
        }
        Entry::Normalize => {
            let report = ledger.renormalize().await?;
            format!(
                "Normalized history: {} weight and {} sleep entries dropped",
                report.weights_dropped, report.sleep_dropped
            )
        }
    };
    Ok(message)
}
