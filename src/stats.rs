//! Dashboard figures and the health score.
//!
//! Everything printed here is computed fresh from the stored records by
//! [`vitals_core::stats`] and [`vitals_core::score`]. Used by `vitals stats`,
//! `vitals score` and `vitals workout list`.

use anyhow::Result;

use vitals_core::score::HealthScore;
use vitals_core::stats::StatsBundle;

use crate::config::Config;
use crate::sqlite_store::open_ledger;

/// Run the stats command: print the dashboard, or the bundle as JSON.
pub async fn run_stats(config: &Config, json: bool) -> Result<()> {
    let ledger = open_ledger(config).await?;
    let stats = ledger.get_stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", format_stats(&stats));
    }

    ledger.store().backend().pool().close().await;
    Ok(())
}

/// Run the score command: print the total and its four components.
pub async fn run_score(config: &Config) -> Result<()> {
    let ledger = open_ledger(config).await?;
    print!("{}", format_score(&ledger.get_health_score()));
    ledger.store().backend().pool().close().await;
    Ok(())
}

/// Print the most recent workouts, oldest first.
pub async fn run_workout_list(config: &Config) -> Result<()> {
    let ledger = open_ledger(config).await?;
    let recent = ledger.recent_workouts();

    if recent.is_empty() {
        println!("No workouts logged yet.");
    } else {
        println!(
            "  {:<10} {:<6} {:<24} {:>6} {:>6}",
            "DATE", "TIME", "TYPE", "MIN", "KCAL"
        );
        println!("  {}", "-".repeat(56));
        for w in &recent {
            println!(
                "  {:<10} {:<6} {:<24} {:>6} {:>6}",
                w.date.format("%Y-%m-%d"),
                w.time,
                w.workout_type,
                w.duration,
                w.calories
            );
        }
    }

    ledger.store().backend().pool().close().await;
    Ok(())
}

fn format_stats(s: &StatsBundle) -> String {
    let mut out = String::new();
    out.push_str(&format!("Vitals: {}\n", s.today.format("%Y-%m-%d")));
    out.push_str("==================\n\n");

    out.push_str(&format!("  Health score:   {}/100\n\n", s.health_score.total));

    out.push_str(&format!(
        "  Workouts:       {} total, {} in the last 7 days, {} kcal burned\n",
        s.total_workouts, s.workouts_last_7_days, s.calories_burned
    ));
    out.push_str(&format!(
        "  Calories today: {:.0} / {:.0} kcal ({:.0}%)\n",
        s.today_calories, s.calorie_goal, s.calorie_progress_pct
    ));
    out.push_str(&format!(
        "  Daily average:  {:.0} kcal\n",
        s.average_calories
    ));
    out.push_str(&format!(
        "  Water:          {} ml, {} glasses ({:.0}%)\n",
        s.water_ml, s.water_glasses, s.hydration_pct
    ));

    match &s.recent_sleep {
        Some(recent) => out.push_str(&format!(
            "  Sleep:          {:.1} h average, last 7 nights {:.1} h, latest {}\n",
            s.average_sleep, recent.average_hours, recent.latest_quality
        )),
        None => out.push_str("  Sleep:          --\n"),
    }

    match s.current_weight {
        Some(current) => {
            let change = s.weight_change.unwrap_or(0.0);
            let trend = s
                .weight_trend
                .map(|t| t.to_string())
                .unwrap_or_else(|| "--".to_string());
            out.push_str(&format!(
                "  Weight:         {current} kg ({}), trend {trend}\n",
                format_change(change)
            ));
        }
        None => out.push_str("  Weight:         --\n"),
    }
    out
}

fn format_score(score: &HealthScore) -> String {
    format!(
        "Health score: {}/100\n\n  Workouts:   {:>5.1} / 25\n  Nutrition:  {:>5.1} / 25\n  Hydration:  {:>5.1} / 25\n  Sleep:      {:>5.1} / 25\n",
        score.total, score.workouts, score.nutrition, score.hydration, score.sleep
    )
}

/// `+0.5 kg`, `-1.2 kg`, `0.0 kg`.
fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{change:.1} kg")
    } else if change < 0.0 {
        format!("{change:.1} kg")
    } else {
        "0.0 kg".to_string()
    }
}
