use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn vitals_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vitals"))
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{root}/data/vitals.sqlite"

[goals]
calorie_goal = 2000

[report]
output_dir = "{root}/reports"

[log]
filter = "warn"
"#,
        root = root.display()
    );

    let config_path = config_dir.join("vitals.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_vitals(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = vitals_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run vitals binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn run_ok(config_path: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_vitals(config_path, args);
    assert!(
        success,
        "vitals {:?} failed: stdout={}, stderr={}",
        args, stdout, stderr
    );
    stdout
}

fn stats_json(config_path: &Path) -> serde_json::Value {
    let stdout = run_ok(config_path, &["stats", "--json"]);
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let stdout = run_ok(&config_path, &["init"]);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/vitals.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_vitals(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_vitals(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_vitals(&tmp.path().join("nope.toml"), &["stats"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}

#[test]
fn test_workout_and_food_show_in_stats() {
    let (_tmp, config_path) = setup_test_env();
    run_ok(&config_path, &["init"]);

    let stdout = run_ok(&config_path, &["workout", "add", "Running", "30"]);
    assert!(stdout.contains("240 kcal"), "unexpected output: {}", stdout);
    run_ok(&config_path, &["workout", "start", "Yoga Flow"]);
    run_ok(&config_path, &["food", "add", "Oatmeal", "300"]);
    run_ok(&config_path, &["food", "add", "Salmon with Rice", "520", "--scanned"]);

    let stats = stats_json(&config_path);
    assert_eq!(stats["total_workouts"], 2);
    assert_eq!(stats["calories_burned"], 390);
    assert_eq!(stats["today_calories"], 820.0);
    assert_eq!(stats["average_calories"], 820.0);

    let list = run_ok(&config_path, &["workout", "list"]);
    assert!(list.contains("Running"));
    assert!(list.contains("Yoga Flow"));
}

#[test]
fn test_weight_upsert_by_date() {
    let (_tmp, config_path) = setup_test_env();

    run_ok(&config_path, &["weight", "add", "80", "--date", "2024-06-01"]);
    run_ok(&config_path, &["weight", "add", "79", "--date", "2024-06-03"]);
    run_ok(&config_path, &["weight", "add", "78.5", "--date", "6/3/2024"]);

    let stats = stats_json(&config_path);
    assert_eq!(stats["current_weight"], 78.5);
    assert_eq!(stats["weight_change"], -1.5);

    run_ok(&config_path, &["weight", "clear"]);
    let stats = stats_json(&config_path);
    assert!(stats["current_weight"].is_null());
}

#[test]
fn test_validation_error_exits_non_zero() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_vitals(&config_path, &["weight", "add", "350"]);
    assert!(!success);
    assert!(stderr.contains("Please enter a valid weight (30-300 kg)"));

    let (_, stderr, success) = run_vitals(&config_path, &["sleep", "log", "25"]);
    assert!(!success);
    assert!(stderr.contains("Please enter valid sleep hours (0-24)"));

    let (_, stderr, success) = run_vitals(&config_path, &["water", "add", "5000"]);
    assert!(!success);
    assert!(stderr.contains("1-2000ml"));

    let stats = stats_json(&config_path);
    assert!(stats["current_weight"].is_null());
    assert_eq!(stats["water_ml"], 0);
}

#[test]
fn test_water_survives_restart_as_glasses() {
    let (_tmp, config_path) = setup_test_env();

    run_ok(&config_path, &["water", "add"]);
    let stdout = run_ok(&config_path, &["water", "add", "600"]);
    assert!(stdout.contains("(750ml today; partial glass of 100ml is not saved)"), "got: {}", stdout);

    // 850 ml is persisted as 3 whole glasses.
    let stats = stats_json(&config_path);
    assert_eq!(stats["water_ml"], 750);
    assert_eq!(stats["water_glasses"], 3);

    run_ok(&config_path, &["water", "reset"]);
    assert_eq!(stats_json(&config_path)["water_ml"], 0);
}

#[test]
fn test_score_and_goal() {
    let (_tmp, config_path) = setup_test_env();

    run_ok(&config_path, &["goal", "set", "1000"]);
    run_ok(&config_path, &["food", "add", "Lunch", "1000"]);
    run_ok(&config_path, &["sleep", "log", "8"]);

    let stdout = run_ok(&config_path, &["score"]);
    // nutrition 25 + sleep 25
    assert!(stdout.starts_with("Health score: 50/100"), "got: {}", stdout);
}

#[test]
fn test_symptom_check_prints_analysis() {
    let (_tmp, config_path) = setup_test_env();

    let stdout = run_ok(&config_path, &["symptom", "check", "I have a headache"]);
    assert!(stdout.contains("• Dehydration"));

    let stdout = run_ok(&config_path, &["symptom", "check", "chest pain after running"]);
    assert!(stdout.contains("seeking immediate medical attention"));
}

#[test]
fn test_bmi_and_body_composition() {
    let (_tmp, config_path) = setup_test_env();

    let stdout = run_ok(&config_path, &["bmi", "170", "70"]);
    assert!(stdout.contains("24.2 (Normal Weight)"), "got: {}", stdout);

    run_ok(
        &config_path,
        &["body", "add", "82", "--body-fat", "20.5", "--muscle-mass", "35"],
    );
    let stats = stats_json(&config_path);
    assert_eq!(stats["current_weight"], 82.0);
}

#[test]
fn test_report_written_to_output_dir() {
    let (tmp, config_path) = setup_test_env();

    run_ok(&config_path, &["report", "weekly"]);

    let reports: Vec<_> = fs::read_dir(tmp.path().join("reports"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("health-report-weekly-"));
    assert!(reports[0].ends_with(".txt"));

    let text = fs::read_to_string(tmp.path().join("reports").join(&reports[0])).unwrap();
    assert!(text.contains("WEEKLY HEALTH REPORT"));
    assert!(text.contains("HEALTH SCORE: 10/100"));
}

#[test]
fn test_report_json_to_file_and_stdout() {
    let (tmp, config_path) = setup_test_env();
    let out = tmp.path().join("out/monthly.json");

    run_ok(
        &config_path,
        &["report", "monthly", "--format", "json", "--output", out.to_str().unwrap()],
    );
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["kind"], "monthly");

    let stdout = run_ok(&config_path, &["report", "daily", "--stdout"]);
    assert!(stdout.contains("DAILY HEALTH REPORT"));
}

#[test]
fn test_normalize_reports_counts() {
    let (_tmp, config_path) = setup_test_env();
    run_ok(&config_path, &["sleep", "log", "7", "--date", "2024-06-01"]);

    let stdout = run_ok(&config_path, &["normalize"]);
    assert!(stdout.contains("0 weight and 0 sleep entries dropped"));
}
