//! The session object: every operation a UI layer calls goes through a
//! [`HealthLedger`].
//!
//! A ledger owns a [`RecordStore`] and an injected [`Clock`]. Writes
//! validate their input first, so a rejected call never mutates anything.
//! Weight and sleep writes reconcile the stored collection through
//! [`crate::normalize`] before the new record is upserted.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vitals_core::dates::SystemClock;
//! use vitals_core::ledger::HealthLedger;
//! use vitals_core::store::InMemoryStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut ledger = HealthLedger::open(InMemoryStore::new(), Arc::new(SystemClock)).await;
//! ledger.record_workout("Run", 30.0).await?;
//! ledger.add_water(500).await?;
//! println!("score: {}", ledger.get_health_score().total);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::Clock;
use crate::error::{LedgerError, LedgerResult};
use crate::knowledge;
use crate::models::{
    BmiRecord, BodyCompositionSample, ChatTurn, FoodEntry, RecordKind, SleepRecord, SymptomRecord,
    WeightSample, WorkoutEntry, DEFAULT_CALORIE_GOAL, GLASS_ML, WORKOUT_KCAL_PER_MINUTE,
};
use crate::normalize::{self, upsert_by_date};
use crate::records::RecordStore;
use crate::report::{Report, ReportSummary};
use crate::score::{HealthScore, ScoreInputs, WORKOUT_WINDOW_DAYS};
use crate::stats::{self, StatsBundle, RECENT_COUNT};
use crate::store::KvStore;

/// Largest amount accepted by a single [`HealthLedger::add_water`] call.
pub const MAX_WATER_ADD_ML: u32 = 2000;

/// Entries dropped by one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub weights_dropped: usize,
    pub sleep_dropped: usize,
}

pub struct HealthLedger<S> {
    store: RecordStore<S>,
    clock: Arc<dyn Clock>,
    default_calorie_goal: f64,
    water_ml: u32,
}

impl<S: KvStore> HealthLedger<S> {
    /// Load every collection and reconcile weight and sleep history.
    ///
    /// Opening never fails: unreadable data reads as empty, and a failure
    /// to persist the normalized collections is logged and left for the
    /// next write to retry.
    pub async fn open(backend: S, clock: Arc<dyn Clock>) -> Self {
        let store = RecordStore::open(backend).await;
        let water_ml = store.water_glasses() * GLASS_ML;
        let mut ledger = Self {
            store,
            clock,
            default_calorie_goal: DEFAULT_CALORIE_GOAL,
            water_ml,
        };
        if let Err(e) = ledger.renormalize().await {
            tracing::warn!(error = %e, "could not persist normalized history");
        }
        ledger
    }

    /// Calorie goal used while the store holds none.
    pub fn with_default_calorie_goal(mut self, kcal: f64) -> Self {
        self.default_calorie_goal = kcal;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    fn time_of_day(&self) -> String {
        self.clock.now().format("%H:%M").to_string()
    }

    // ── writes ──────────────────────────────────────────────────────────

    /// Log a free-form workout; calories are estimated at 8 kcal/min.
    pub async fn record_workout(
        &mut self,
        workout_type: &str,
        duration_min: f64,
    ) -> LedgerResult<WorkoutEntry> {
        let workout_type = workout_type.trim();
        if workout_type.is_empty() || !duration_min.is_finite() || duration_min <= 0.0 {
            return Err(LedgerError::validation("Please enter valid workout details"));
        }
        let calories = (duration_min * WORKOUT_KCAL_PER_MINUTE).round() as u32;
        self.push_workout(workout_type, duration_min, calories).await
    }

    /// Log a completed template workout with its fixed calorie value.
    pub async fn start_workout(&mut self, template: &str) -> LedgerResult<WorkoutEntry> {
        let Some(t) = knowledge::find_template(template) else {
            return Err(LedgerError::validation(format!(
                "Unknown workout template '{}'",
                template.trim()
            )));
        };
        self.push_workout(t.name, t.duration, t.calories).await
    }

    async fn push_workout(
        &mut self,
        workout_type: &str,
        duration: f64,
        calories: u32,
    ) -> LedgerResult<WorkoutEntry> {
        let entry = WorkoutEntry {
            date: self.today(),
            time: self.time_of_day(),
            workout_type: workout_type.to_string(),
            duration,
            calories,
        };
        self.store.append(RecordKind::Workouts, &entry).await?;
        tracing::debug!(workout = %entry.workout_type, calories, "workout recorded");
        Ok(entry)
    }

    pub async fn record_food(
        &mut self,
        name: &str,
        calories: f64,
        scanned: bool,
    ) -> LedgerResult<FoodEntry> {
        let name = name.trim();
        if name.is_empty() || !calories.is_finite() || calories <= 0.0 {
            return Err(LedgerError::validation("Please enter valid food details"));
        }
        let entry = FoodEntry {
            date: self.today(),
            time: self.time_of_day(),
            name: name.to_string(),
            calories,
            scanned,
        };
        self.store.append(RecordKind::Foods, &entry).await?;
        Ok(entry)
    }

    /// Upsert the weight for `date` (default today).
    pub async fn record_weight(
        &mut self,
        value: f64,
        date: Option<NaiveDate>,
    ) -> LedgerResult<WeightSample> {
        if !normalize::valid_weight(value) {
            return Err(LedgerError::validation(
                "Please enter a valid weight (30-300 kg)",
            ));
        }
        let sample = WeightSample {
            date: date.unwrap_or_else(|| self.today()),
            value,
        };
        let current = normalize::normalize_weights(self.store.raw(RecordKind::Weights), self.today());
        let records = upsert_by_date(current.records, sample.clone());
        self.store.put(RecordKind::Weights, &records).await?;
        Ok(sample)
    }

    /// Upsert the sleep record for `date` (default today).
    pub async fn record_sleep(
        &mut self,
        hours: f64,
        date: Option<NaiveDate>,
    ) -> LedgerResult<SleepRecord> {
        if !normalize::valid_sleep_hours(hours) {
            return Err(LedgerError::validation("Please enter valid sleep hours (0-24)"));
        }
        let record = SleepRecord::new(date.unwrap_or_else(|| self.today()), hours);
        let current = normalize::normalize_sleep(self.store.raw(RecordKind::Sleep), self.today());
        let records = upsert_by_date(current.records, record.clone());
        self.store.put(RecordKind::Sleep, &records).await?;
        Ok(record)
    }

    pub async fn record_symptom(
        &mut self,
        symptoms: &str,
        analysis: &str,
    ) -> LedgerResult<SymptomRecord> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            return Err(LedgerError::validation("Please describe your symptoms"));
        }
        let record = SymptomRecord {
            date: self.today(),
            time: self.time_of_day(),
            symptoms: symptoms.to_string(),
            analysis: analysis.to_string(),
        };
        self.store.append(RecordKind::Symptoms, &record).await?;
        Ok(record)
    }

    /// Analyze `symptoms` against the symptom table and record the result.
    pub async fn check_symptoms(&mut self, symptoms: &str) -> LedgerResult<SymptomRecord> {
        if symptoms.trim().is_empty() {
            return Err(LedgerError::validation("Please describe your symptoms"));
        }
        let analysis = knowledge::analyze_symptoms(symptoms);
        self.record_symptom(symptoms, &analysis).await
    }

    /// Append a body-composition sample and upsert today's weight.
    ///
    /// Non-positive body fat or muscle mass readings are stored as absent.
    pub async fn record_body_composition(
        &mut self,
        weight: f64,
        body_fat: Option<f64>,
        muscle_mass: Option<f64>,
    ) -> LedgerResult<BodyCompositionSample> {
        if !normalize::valid_weight(weight) {
            return Err(LedgerError::validation("Please enter a valid weight"));
        }
        let present = |v: Option<f64>| v.filter(|x| x.is_finite() && *x > 0.0);
        let sample = BodyCompositionSample {
            date: self.today(),
            weight,
            body_fat: present(body_fat),
            muscle_mass: present(muscle_mass),
        };
        self.store.append(RecordKind::BodyComposition, &sample).await?;
        self.record_weight(weight, Some(sample.date)).await?;
        Ok(sample)
    }

    pub async fn record_bmi(&mut self, height_cm: f64, weight_kg: f64) -> LedgerResult<BmiRecord> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(height_cm) || !positive(weight_kg) {
            return Err(LedgerError::validation(
                "Please enter valid height and weight values",
            ));
        }
        let record = BmiRecord::calculate(self.today(), height_cm, weight_kg);
        self.store.append(RecordKind::Bmi, &record).await?;
        Ok(record)
    }

    /// Add to today's water; returns the new total in milliliters.
    pub async fn add_water(&mut self, ml: u32) -> LedgerResult<u32> {
        if ml == 0 || ml > MAX_WATER_ADD_ML {
            return Err(LedgerError::validation(
                "Please enter a valid amount (1-2000ml)",
            ));
        }
        self.water_ml = self.water_ml.saturating_add(ml);
        self.store
            .set_water_glasses(stats::water_glasses(self.water_ml))
            .await?;
        Ok(self.water_ml)
    }

    pub async fn reset_water(&mut self) -> LedgerResult<()> {
        self.water_ml = 0;
        self.store.set_water_glasses(0).await
    }

    pub async fn clear_weights(&mut self) -> LedgerResult<()> {
        self.store.clear(RecordKind::Weights).await
    }

    pub async fn set_calorie_goal(&mut self, kcal: f64) -> LedgerResult<()> {
        if !kcal.is_finite() || kcal <= 0.0 {
            return Err(LedgerError::validation("Please enter a valid calorie goal"));
        }
        self.store.set_calorie_goal(kcal).await
    }

    /// Store one assistant exchange, timestamped now.
    pub async fn record_chat_turn(
        &mut self,
        user_message: &str,
        ai_response: &str,
    ) -> LedgerResult<ChatTurn> {
        let turn = ChatTurn {
            timestamp: self.clock.now_utc(),
            user_message: user_message.to_string(),
            ai_response: ai_response.to_string(),
        };
        self.store.append(RecordKind::AiChats, &turn).await?;
        Ok(turn)
    }

    /// Reconcile stored weight and sleep collections, persisting only the
    /// ones that changed.
    ///
    /// Both collections are reshaped in memory before either is written,
    /// and both writes are attempted; the first failure is returned.
    pub async fn renormalize(&mut self) -> LedgerResult<NormalizeReport> {
        let today = self.today();
        let weights = normalize::normalize_weights(self.store.raw(RecordKind::Weights), today);
        let sleep = normalize::normalize_sleep(self.store.raw(RecordKind::Sleep), today);

        if weights.dropped > 0 || sleep.dropped > 0 {
            tracing::info!(
                weights_dropped = weights.dropped,
                sleep_dropped = sleep.dropped,
                "dropped malformed history entries"
            );
        }
        let mut pending = Vec::with_capacity(2);
        if weights.changed {
            self.store.stage(RecordKind::Weights, &weights.records)?;
            pending.push(RecordKind::Weights);
        }
        if sleep.changed {
            self.store.stage(RecordKind::Sleep, &sleep.records)?;
            pending.push(RecordKind::Sleep);
        }

        let mut first_error = None;
        for kind in pending {
            if let Err(e) = self.store.persist(kind).await {
                first_error.get_or_insert(e);
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }
        Ok(NormalizeReport {
            weights_dropped: weights.dropped,
            sleep_dropped: sleep.dropped,
        })
    }

    // ── reads ───────────────────────────────────────────────────────────

    pub fn workouts(&self) -> Vec<WorkoutEntry> {
        self.store.records(RecordKind::Workouts)
    }

    /// Logged foods, including legacy text entries.
    pub fn foods(&self) -> Vec<FoodEntry> {
        normalize::read_foods(self.store.raw(RecordKind::Foods))
    }

    pub fn weights(&self) -> Vec<WeightSample> {
        self.store.records(RecordKind::Weights)
    }

    pub fn sleep(&self) -> Vec<SleepRecord> {
        self.store.records(RecordKind::Sleep)
    }

    pub fn symptoms(&self) -> Vec<SymptomRecord> {
        self.store.records(RecordKind::Symptoms)
    }

    pub fn bmi_history(&self) -> Vec<BmiRecord> {
        self.store.records(RecordKind::Bmi)
    }

    pub fn body_composition(&self) -> Vec<BodyCompositionSample> {
        self.store.records(RecordKind::BodyComposition)
    }

    pub fn chat_turns(&self) -> Vec<ChatTurn> {
        self.store.records(RecordKind::AiChats)
    }

    pub fn water_ml(&self) -> u32 {
        self.water_ml
    }

    /// The stored goal, or the configured default.
    pub fn calorie_goal(&self) -> f64 {
        self.store.calorie_goal().unwrap_or(self.default_calorie_goal)
    }

    pub fn recent_workouts(&self) -> Vec<WorkoutEntry> {
        stats::recent_workouts(&self.workouts(), RECENT_COUNT).to_vec()
    }

    pub fn get_health_score(&self) -> HealthScore {
        let workouts = self.workouts();
        let foods = self.foods();
        let sleep = self.sleep();
        HealthScore::compute(&ScoreInputs {
            workouts: &workouts,
            foods: &foods,
            sleep: &sleep,
            water_ml: self.water_ml,
            calorie_goal: self.calorie_goal(),
            today: self.today(),
        })
    }

    pub fn get_stats(&self) -> StatsBundle {
        let today = self.today();
        let workouts = self.workouts();
        let foods = self.foods();
        let sleep = self.sleep();
        let weights = self.weights();
        let calorie_goal = self.calorie_goal();
        let today_calories = stats::today_calories(&foods, today);

        StatsBundle {
            today,
            total_workouts: workouts.len(),
            calories_burned: stats::calories_burned(&workouts),
            workouts_last_7_days: stats::workouts_in_last_days(&workouts, today, WORKOUT_WINDOW_DAYS),
            recent_workouts: stats::recent_workouts(&workouts, RECENT_COUNT).to_vec(),
            today_calories,
            calorie_goal,
            calorie_progress_pct: stats::calorie_progress(today_calories, calorie_goal),
            average_calories: stats::average_calories(&foods),
            water_ml: self.water_ml,
            water_glasses: stats::water_glasses(self.water_ml),
            hydration_pct: stats::hydration_percentage(self.water_ml),
            average_sleep: stats::average_sleep(&sleep),
            recent_sleep: stats::recent_sleep(&sleep),
            current_weight: stats::current_weight(&weights),
            weight_change: stats::weight_change(&weights),
            weight_trend: stats::weight_trend(&weights),
            health_score: HealthScore::compute(&ScoreInputs {
                workouts: &workouts,
                foods: &foods,
                sleep: &sleep,
                water_ml: self.water_ml,
                calorie_goal,
                today,
            }),
        }
    }

    /// Snapshot the current state into a report labelled `kind`.
    pub fn build_report(&self, kind: &str) -> Report {
        let summary = ReportSummary {
            workouts: self.workouts().len(),
            average_calories: stats::average_calories(&self.foods()).round(),
            water_ml: self.water_ml,
            average_sleep_hours: stats::average_sleep(&self.sleep()),
        };
        Report::new(
            kind,
            self.clock.now(),
            self.get_health_score().total,
            summary,
        )
    }
}
