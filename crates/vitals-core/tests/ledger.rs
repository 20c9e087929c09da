//! End-to-end tests for [`HealthLedger`] over the in-memory backend.
//!
//! Every test pins the clock to 2024-06-10 so calendar windows are
//! deterministic.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use vitals_core::dates::FixedClock;
use vitals_core::models::{BmiCategory, SleepQuality, WeightSample};
use vitals_core::records::{decode_collection, encode_collection};
use vitals_core::stats::WeightTrend;
use vitals_core::store::{InMemoryStore, KvStore};
use vitals_core::{HealthLedger, LedgerError};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::on(day(10)))
}

async fn open(backend: Arc<InMemoryStore>) -> HealthLedger<Arc<InMemoryStore>> {
    HealthLedger::open(backend, clock()).await
}

async fn stored(backend: &InMemoryStore, key: &str) -> Vec<Value> {
    let raw = backend.get(key).await.unwrap().unwrap();
    decode_collection(&raw).unwrap()
}

// ─── Writes ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_workout_calories_and_validation() {
    let backend = Arc::new(InMemoryStore::new());
    let mut ledger = open(backend.clone()).await;

    let entry = ledger.record_workout("Run", 30.0).await.unwrap();
    assert_eq!(entry.calories, 240);
    assert_eq!(entry.date, day(10));
    assert_eq!(entry.time, "12:00");

    let err = ledger.record_workout("Run", 0.0).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "Please enter valid workout details");
    assert!(ledger.record_workout("   ", 20.0).await.is_err());

    assert_eq!(ledger.workouts().len(), 1);
    assert_eq!(stored(&backend, "workouts").await.len(), 1);
}

#[tokio::test]
async fn test_template_workout_uses_fixed_values() {
    let mut ledger = open(Arc::new(InMemoryStore::new())).await;
    let entry = ledger.start_workout("Strength Training").await.unwrap();
    assert_eq!((entry.duration, entry.calories), (45.0, 360));

    let err = ledger.start_workout("Couch Stretch").await.unwrap_err();
    assert!(err.is_validation());
    assert!(ledger.workouts().len() == 1);
}

#[tokio::test]
async fn test_weight_upsert_keeps_one_per_date_sorted() {
    let backend = Arc::new(InMemoryStore::new());
    let mut ledger = open(backend.clone()).await;

    ledger.record_weight(80.0, None).await.unwrap();
    ledger.record_weight(81.0, Some(day(2))).await.unwrap();
    ledger.record_weight(79.4, None).await.unwrap();

    assert_eq!(
        ledger.weights(),
        vec![
            WeightSample { date: day(2), value: 81.0 },
            WeightSample { date: day(10), value: 79.4 },
        ]
    );
    assert_eq!(
        stored(&backend, "weights").await,
        vec![
            json!({"date": "2024-06-02", "value": 81.0}),
            json!({"date": "2024-06-10", "value": 79.4}),
        ]
    );
}

#[tokio::test]
async fn test_weight_out_of_range_rejected_without_write() {
    let backend = Arc::new(InMemoryStore::new());
    let mut ledger = open(backend.clone()).await;

    for bad in [0.0, -3.0, 300.5, f64::NAN] {
        let err = ledger.record_weight(bad, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid weight (30-300 kg)");
    }
    assert!(ledger.record_weight(300.0, None).await.is_ok());
    assert_eq!(ledger.weights().len(), 1);
}

#[tokio::test]
async fn test_sleep_upsert_and_quality() {
    let mut ledger = open(Arc::new(InMemoryStore::new())).await;

    ledger.record_sleep(5.0, None).await.unwrap();
    let record = ledger.record_sleep(7.0, None).await.unwrap();
    assert_eq!(record.quality, SleepQuality::Good);
    ledger.record_sleep(6.0, Some(day(9))).await.unwrap();

    let sleep = ledger.sleep();
    assert_eq!(sleep.len(), 2);
    assert_eq!(sleep[0].quality, SleepQuality::Fair);
    assert_eq!(sleep[1].hours, 7.0);

    assert!(ledger.record_sleep(0.0, None).await.is_err());
    assert!(ledger.record_sleep(24.5, None).await.is_err());
}

#[tokio::test]
async fn test_body_composition_also_records_weight() {
    let mut ledger = open(Arc::new(InMemoryStore::new())).await;

    let sample = ledger
        .record_body_composition(82.3, Some(21.5), Some(0.0))
        .await
        .unwrap();
    assert_eq!(sample.body_fat, Some(21.5));
    assert_eq!(sample.muscle_mass, None);
    assert_eq!(ledger.body_composition().len(), 1);
    assert_eq!(ledger.weights(), vec![WeightSample { date: day(10), value: 82.3 }]);

    let err = ledger.record_body_composition(0.0, None, None).await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter a valid weight");
    assert_eq!(ledger.body_composition().len(), 1);
}

#[tokio::test]
async fn test_bmi_records_are_appended() {
    let mut ledger = open(Arc::new(InMemoryStore::new())).await;
    let normal = ledger.record_bmi(170.0, 70.0).await.unwrap();
    let obese = ledger.record_bmi(160.0, 90.0).await.unwrap();
    assert_eq!((normal.bmi, normal.category), (24.22, BmiCategory::NormalWeight));
    assert_eq!((obese.bmi, obese.category), (35.16, BmiCategory::Obese));
    assert_eq!(ledger.bmi_history().len(), 2);

    let err = ledger.record_bmi(0.0, 70.0).await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter valid height and weight values");
}

#[tokio::test]
async fn test_check_symptoms_stores_analysis() {
    let mut ledger = open(Arc::new(InMemoryStore::new())).await;
    let record = ledger.check_symptoms("constant fatigue").await.unwrap();
    assert!(record.analysis.contains("• Iron deficiency"));
    assert_eq!(ledger.symptoms(), vec![record]);

    let err = ledger.check_symptoms("  ").await.unwrap_err();
    assert_eq!(err.to_string(), "Please describe your symptoms");
}

#[tokio::test]
async fn test_chat_turns_append() {
    let mut ledger = open(Arc::new(InMemoryStore::new())).await;
    ledger.record_chat_turn("how much water?", "2L").await.unwrap();
    let turns = ledger.chat_turns();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].ai_response, "2L");
    assert_eq!(
        turns[0].timestamp,
        day(10).and_hms_opt(12, 0, 0).unwrap().and_utc()
    );
}

// ─── Water and goals ────────────────────────────────────────────────

#[tokio::test]
async fn test_water_persists_whole_glasses() {
    let backend = Arc::new(InMemoryStore::new());
    let mut ledger = open(backend.clone()).await;

    assert_eq!(ledger.add_water(600).await.unwrap(), 600);
    assert_eq!(backend.get("waterCount").await.unwrap().as_deref(), Some("2"));

    let err = ledger.add_water(2500).await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter a valid amount (1-2000ml)");
    assert_eq!(ledger.water_ml(), 600);

    let reopened = open(backend.clone()).await;
    assert_eq!(reopened.water_ml(), 500);

    ledger.reset_water().await.unwrap();
    assert_eq!(backend.get("waterCount").await.unwrap().as_deref(), Some("0"));
}

#[tokio::test]
async fn test_calorie_goal_default_and_override() {
    let backend = Arc::new(InMemoryStore::new());
    let mut ledger = open(backend.clone()).await.with_default_calorie_goal(1800.0);
    assert_eq!(ledger.calorie_goal(), 1800.0);

    ledger.set_calorie_goal(2200.0).await.unwrap();
    assert_eq!(ledger.calorie_goal(), 2200.0);
    assert!(ledger.set_calorie_goal(0.0).await.unwrap_err().is_validation());

    let reopened = open(backend).await;
    assert_eq!(reopened.calorie_goal(), 2200.0);
}

// ─── Normalization ──────────────────────────────────────────────────

#[tokio::test]
async fn test_legacy_history_normalized_on_open() {
    let legacy = vec![
        json!("6/1/2024 - 80.5 kg"),
        json!({"date": "2024-06-03", "value": 80.0}),
        json!("garbage"),
        json!(79.5),
        json!({"date": "6/3/2024", "value": 79.9}),
    ];
    let backend = Arc::new(InMemoryStore::with_values([(
        "weights",
        encode_collection(&legacy),
    )]));
    let mut ledger = open(backend.clone()).await;

    assert_eq!(
        stored(&backend, "weights").await,
        vec![
            json!({"date": "2024-06-01", "value": 80.5}),
            json!({"date": "2024-06-03", "value": 79.9}),
            json!({"date": "2024-06-10", "value": 79.5}),
        ]
    );

    let report = ledger.renormalize().await.unwrap();
    assert_eq!(report.weights_dropped, 0);
    assert_eq!(ledger.weights().len(), 3);
}

#[tokio::test]
async fn test_canonical_history_is_not_rewritten() {
    let canonical = encode_collection(&[json!({"date": "2024-06-01", "value": 80.0})]);
    let backend = Arc::new(InMemoryStore::with_values([("weights", canonical.clone())]));
    let _ledger = open(backend.clone()).await;
    assert_eq!(backend.get("weights").await.unwrap(), Some(canonical));
}

// ─── Reads ──────────────────────────────────────────────────────────

fn workout_on(d: u32) -> Value {
    json!({"date": format!("2024-06-{d:02}"), "time": "07:00", "type": "Run", "duration": 20, "calories": 160})
}

#[tokio::test]
async fn test_score_counts_calendar_week() {
    let workouts: Vec<Value> = [2, 3, 4, 5, 6, 7, 8, 9, 10, 11]
        .into_iter()
        .map(workout_on)
        .collect();
    let backend = Arc::new(InMemoryStore::with_values([(
        "workouts",
        encode_collection(&workouts),
    )]));
    let ledger = open(backend).await;

    let stats = ledger.get_stats();
    // June 4..=10 are in the window; June 11 is in the future.
    assert_eq!(stats.workouts_last_7_days, 7);
    assert_eq!(stats.health_score.workouts, 25.0);
    assert_eq!(stats.recent_workouts.len(), 7);
    assert_eq!(stats.recent_workouts[6].date, day(11));
}

#[tokio::test]
async fn test_fractional_workout_minutes_count() {
    let stored = vec![json!({
        "date": "2024-06-10", "time": "18:15", "type": "Swim", "duration": 22.5, "calories": 180
    })];
    let backend = Arc::new(InMemoryStore::with_values([(
        "workouts",
        encode_collection(&stored),
    )]));
    let mut ledger = open(backend).await;

    assert_eq!(ledger.workouts()[0].duration, 22.5);
    let stats = ledger.get_stats();
    assert_eq!(stats.total_workouts, 1);
    assert_eq!(stats.workouts_last_7_days, 1);
    assert_eq!(stats.health_score.workouts, 5.0);

    let entry = ledger.record_workout("Walk", 12.5).await.unwrap();
    assert_eq!((entry.duration, entry.calories), (12.5, 100));
    assert!(ledger.record_workout("Walk", f64::NAN).await.is_err());
    assert_eq!(ledger.recent_workouts().len(), 2);
}

#[tokio::test]
async fn test_legacy_food_lines_count_toward_calories() {
    let stored = vec![
        json!("6/10/2024 - Pancakes - 450 kcal"),
        json!({"date": "2024-06-10", "time": "13:00", "name": "Soup", "calories": 250}),
    ];
    let backend = Arc::new(InMemoryStore::with_values([(
        "foods",
        encode_collection(&stored),
    )]));
    let ledger = open(backend).await;

    assert_eq!(ledger.foods().len(), 2);
    assert_eq!(ledger.get_stats().today_calories, 700.0);
}

#[tokio::test]
async fn test_clear_weights_removes_key() {
    let backend = Arc::new(InMemoryStore::new());
    let mut ledger = open(backend.clone()).await;
    ledger.record_weight(80.0, None).await.unwrap();

    ledger.clear_weights().await.unwrap();
    assert!(ledger.weights().is_empty());
    assert_eq!(backend.get("weights").await.unwrap(), None);
}

#[tokio::test]
async fn test_stats_bundle_figures() {
    let mut ledger = open(Arc::new(InMemoryStore::new())).await;
    ledger.record_food("Oatmeal", 400.0, false).await.unwrap();
    ledger.record_food("Salmon with Rice", 520.0, true).await.unwrap();
    ledger.add_water(1800).await.unwrap();
    ledger.record_sleep(8.0, None).await.unwrap();
    ledger.record_weight(80.0, Some(day(8))).await.unwrap();
    ledger.record_weight(80.5, Some(day(9))).await.unwrap();
    ledger.record_weight(81.0, None).await.unwrap();

    let stats = ledger.get_stats();
    assert_eq!(stats.today_calories, 920.0);
    assert_eq!(stats.average_calories, 920.0);
    assert_eq!(stats.calorie_progress_pct, 46.0);
    assert_eq!(stats.hydration_pct, 90.0);
    assert_eq!(stats.water_glasses, 7);
    assert_eq!(stats.weight_trend, Some(WeightTrend::Rising));
    assert_eq!(stats.current_weight, Some(81.0));
    assert_eq!(stats.health_score.hydration, 22.5);

    let score = ledger.get_health_score();
    assert_eq!(score, stats.health_score);
    // 0 workouts + nutrition 5 + hydration 22.5 + sleep 25
    assert_eq!(score.total, 53);
}

#[tokio::test]
async fn test_report_on_empty_ledger() {
    let ledger = open(Arc::new(InMemoryStore::new())).await;
    let report = ledger.build_report("weekly");
    assert_eq!(report.summary.workouts, 0);
    assert_eq!(report.recommendations.len(), 4);
    assert_eq!(report.file_name(), "health-report-weekly-2024-06-10.txt");
    assert!(report.render_text().contains("HEALTH SCORE: 10/100"));
}

// ─── Storage failures ───────────────────────────────────────────────

/// Reads succeed, every write fails.
struct ReadOnlyStore(InMemoryStore);

#[async_trait]
impl KvStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.0.get(key).await
    }

    async fn put(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("disk full"))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(anyhow!("disk full"))
    }
}

#[tokio::test]
async fn test_failed_write_keeps_session_state() {
    let mut ledger = HealthLedger::open(ReadOnlyStore(InMemoryStore::new()), clock()).await;

    let err = ledger.record_food("Apple", 95.0, false).await.unwrap_err();
    match err {
        LedgerError::Storage { ref key, .. } => assert_eq!(key, "foods"),
        other => panic!("expected storage error, got {other:?}"),
    }
    assert_eq!(ledger.foods().len(), 1);
    assert_eq!(ledger.get_stats().today_calories, 95.0);
}

#[tokio::test]
async fn test_failed_normalize_still_reshapes_both_collections() {
    let backend = InMemoryStore::with_values([
        ("weights", encode_collection(&[json!("6/1/2024 - 80 kg")])),
        ("sleep", encode_collection(&[json!("6/9/2024 - 8 h"), json!(7.5)])),
    ]);
    let ledger = HealthLedger::open(ReadOnlyStore(backend), clock()).await;

    assert_eq!(ledger.weights().len(), 1);
    assert_eq!(ledger.sleep().len(), 2);
    let stats = ledger.get_stats();
    assert_eq!(stats.average_sleep, 7.75);
    assert_eq!(stats.health_score.sleep, 25.0);
}
