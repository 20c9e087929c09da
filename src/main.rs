//! # Vitals CLI (`vitals`)
//!
//! The `vitals` binary is the interface to a local Vitals health log. It
//! records workouts, meals, water, weight, sleep, symptoms, body
//! composition and BMI, and prints statistics, the health score and
//! exportable reports.
//!
//! ## Usage
//!
//! ```bash
//! vitals --config ./config/vitals.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vitals init` | Create the SQLite database and schema |
//! | `vitals workout add\|start\|list` | Log or list workouts |
//! | `vitals food add` | Log a meal |
//! | `vitals weight add\|clear` | Record or clear weight history |
//! | `vitals sleep log` | Record a night of sleep |
//! | `vitals symptom check` | Analyze and record symptoms |
//! | `vitals body add` | Record body composition |
//! | `vitals bmi` | Calculate and record BMI |
//! | `vitals water add\|reset` | Track today's water |
//! | `vitals goal set` | Set the daily calorie goal |
//! | `vitals stats` | Print the dashboard |
//! | `vitals score` | Print the health score breakdown |
//! | `vitals report <kind>` | Export a health report |
//! | `vitals normalize` | Reconcile weight and sleep history |
//!
//! ## Examples
//!
//! ```bash
//! vitals workout add "Morning run" 30
//! vitals workout start "Yoga Flow"
//! vitals weight add 72.4 --date 2024-06-01
//! vitals water add 500
//! vitals report weekly --format json --output ./weekly.json
//! ```

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vitals::config;
use vitals::export::{self, ReportFormat, ReportTarget};
use vitals::migrate;
use vitals::record::{self, parse_date_arg, Entry};
use vitals::stats;

/// Vitals CLI: a local personal health tracker.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/vitals.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "vitals",
    about = "Vitals: a local personal health tracker",
    version,
    long_about = "Vitals records workouts, meals, water, weight, sleep, symptoms, body \
    composition and BMI in a local SQLite database, and derives statistics, a 0-100 health \
    score and exportable reports from them."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/vitals.toml`.
    #[arg(long, global = true, default_value = "./config/vitals.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the records table. Running it
    /// more than once is safe.
    Init,

    /// Log, start or list workouts.
    Workout {
        #[command(subcommand)]
        action: WorkoutAction,
    },

    /// Log meals.
    Food {
        #[command(subcommand)]
        action: FoodAction,
    },

    /// Record or clear body weight.
    Weight {
        #[command(subcommand)]
        action: WeightAction,
    },

    /// Record sleep.
    Sleep {
        #[command(subcommand)]
        action: SleepAction,
    },

    /// Analyze symptoms against the built-in table and record them.
    ///
    /// This is general information only, not a diagnosis.
    Symptom {
        #[command(subcommand)]
        action: SymptomAction,
    },

    /// Record body composition. Also records today's weight.
    Body {
        #[command(subcommand)]
        action: BodyAction,
    },

    /// Calculate BMI and keep the result.
    Bmi {
        /// Height in centimeters.
        height_cm: f64,
        /// Weight in kilograms.
        weight_kg: f64,
    },

    /// Track today's water intake.
    Water {
        #[command(subcommand)]
        action: WaterAction,
    },

    /// Manage goals.
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Show the dashboard: calories, water, sleep, weight and the score.
    Stats {
        /// Print the full statistics bundle as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the health score and its four components.
    Score,

    /// Export a health report.
    ///
    /// Without `--output` or `--stdout` the report is written to
    /// `report.output_dir` as `health-report-<kind>-<YYYY-MM-DD>.txt`
    /// (`.json` for JSON).
    Report {
        /// Report label, e.g. `weekly` or `monthly`.
        kind: String,

        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Write the report to this file.
        #[arg(long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the report instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Reconcile stored weight and sleep history and report dropped entries.
    Normalize,
}

#[derive(Subcommand)]
enum WorkoutAction {
    /// Log a free-form workout; calories are estimated at 8 kcal/min.
    Add {
        /// Workout type, e.g. `Running`.
        workout_type: String,
        /// Duration in minutes.
        minutes: f64,
    },
    /// Complete a preset workout: `Beginner HIIT`, `Strength Training` or `Yoga Flow`.
    Start {
        template: String,
    },
    /// List the last seven workouts.
    List,
}

#[derive(Subcommand)]
enum FoodAction {
    /// Log a meal for today.
    Add {
        name: String,
        /// Calories (kcal).
        calories: f64,
        /// Mark the entry as coming from the meal scanner.
        #[arg(long)]
        scanned: bool,
    },
}

#[derive(Subcommand)]
enum WeightAction {
    /// Record a weight in kilograms, replacing any entry on the same date.
    Add {
        kg: f64,
        /// Date of the reading (default today).
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Delete the whole weight history.
    Clear,
}

#[derive(Subcommand)]
enum SleepAction {
    /// Record hours slept, replacing any entry on the same date.
    Log {
        hours: f64,
        /// Date of the night (default today).
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum SymptomAction {
    /// Describe symptoms in plain words.
    Check { text: String },
}

#[derive(Subcommand)]
enum BodyAction {
    /// Record weight plus optional body fat and muscle mass.
    Add {
        kg: f64,
        /// Body fat percentage.
        #[arg(long)]
        body_fat: Option<f64>,
        /// Muscle mass in kilograms.
        #[arg(long)]
        muscle_mass: Option<f64>,
    },
}

#[derive(Subcommand)]
enum WaterAction {
    /// Add water in milliliters (1-2000, default one 250 ml glass).
    Add {
        #[arg(default_value_t = 250)]
        ml: u32,
    },
    /// Reset today's count to zero.
    Reset,
}

#[derive(Subcommand)]
enum GoalAction {
    /// Set the daily calorie goal.
    Set { kcal: f64 },
}

fn init_logging(filter: &str) {
    let log_env = std::env::var("RUST_LOG").unwrap_or_else(|_| filter.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::debug!(%log_env, "log filter");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config)?;
    init_logging(&cfg.log.filter);

    let entry = match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
            return Ok(());
        }
        Commands::Stats { json } => return stats::run_stats(&cfg, json).await,
        Commands::Score => return stats::run_score(&cfg).await,
        Commands::Report {
            kind,
            format,
            output,
            stdout,
        } => {
            let target = match (output, stdout) {
                (Some(path), _) => ReportTarget::File(path),
                (None, true) => ReportTarget::Stdout,
                (None, false) => ReportTarget::OutputDir,
            };
            return export::run_report(&cfg, &kind, format, target).await;
        }

        Commands::Workout { action } => match action {
            WorkoutAction::Add {
                workout_type,
                minutes,
            } => Entry::Workout {
                workout_type,
                minutes,
            },
            WorkoutAction::Start { template } => Entry::Template { name: template },
            WorkoutAction::List => return stats::run_workout_list(&cfg).await,
        },
        Commands::Food {
            action:
                FoodAction::Add {
                    name,
                    calories,
                    scanned,
                },
        } => Entry::Food {
            name,
            calories,
            scanned,
        },
        Commands::Weight { action } => match action {
            WeightAction::Add { kg, date } => Entry::Weight { kg, date },
            WeightAction::Clear => Entry::ClearWeights,
        },
        Commands::Sleep {
            action: SleepAction::Log { hours, date },
        } => Entry::Sleep { hours, date },
        Commands::Symptom {
            action: SymptomAction::Check { text },
        } => Entry::Symptom { text },
        Commands::Body {
            action:
                BodyAction::Add {
                    kg,
                    body_fat,
                    muscle_mass,
                },
        } => Entry::Body {
            kg,
            body_fat,
            muscle_mass,
        },
        Commands::Bmi {
            height_cm,
            weight_kg,
        } => Entry::Bmi {
            height_cm,
            weight_kg,
        },
        Commands::Water { action } => match action {
            WaterAction::Add { ml } => Entry::Water { ml },
            WaterAction::Reset => Entry::ResetWater,
        },
        Commands::Goal {
            action: GoalAction::Set { kcal },
        } => Entry::CalorieGoal { kcal },
        Commands::Normalize => Entry::Normalize,
    };

    record::run_record(&cfg, entry).await
}
