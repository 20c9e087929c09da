//! Point-in-time health reports.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Application name printed in report headers.
pub const APP_NAME: &str = "Vitals";

const RECOMMEND_MORE_WORKOUTS: &str =
    "Increase workout frequency to 3-4 times per week for optimal health benefits";
const RECOMMEND_MORE_CALORIES: &str = "Consider increasing caloric intake with nutrient-dense foods";
const RECOMMEND_FEWER_CALORIES: &str = "Monitor portion sizes and focus on balanced meals";
const RECOMMEND_MORE_WATER: &str =
    "Increase daily water intake to at least 2L for better hydration";
const RECOMMEND_MORE_SLEEP: &str = "Aim for 7-9 hours of sleep per night for optimal recovery";
const ON_TRACK: &str = "Keep up the excellent work! Your health habits are on track";

/// Headline figures of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub workouts: usize,
    /// Rounded to whole kcal.
    pub average_calories: f64,
    pub water_ml: u32,
    pub average_sleep_hours: f64,
}

/// A generated report. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Free-form label such as `weekly` or `monthly`.
    pub kind: String,
    pub generated_at: NaiveDateTime,
    pub score: u8,
    pub summary: ReportSummary,
    pub recommendations: Vec<String>,
}

/// Every rule that matches fires, in order; the on-track message appears
/// only when none did.
pub fn recommendations(summary: &ReportSummary) -> Vec<String> {
    let mut out = Vec::new();
    if summary.workouts < 3 {
        out.push(RECOMMEND_MORE_WORKOUTS);
    }
    if summary.average_calories < 1500.0 {
        out.push(RECOMMEND_MORE_CALORIES);
    } else if summary.average_calories > 2500.0 {
        out.push(RECOMMEND_FEWER_CALORIES);
    }
    if summary.water_ml < 1500 {
        out.push(RECOMMEND_MORE_WATER);
    }
    if summary.average_sleep_hours < 7.0 {
        out.push(RECOMMEND_MORE_SLEEP);
    }
    if out.is_empty() {
        out.push(ON_TRACK);
    }
    out.into_iter().map(String::from).collect()
}

impl Report {
    pub fn new(
        kind: impl Into<String>,
        generated_at: NaiveDateTime,
        score: u8,
        summary: ReportSummary,
    ) -> Self {
        let recommendations = recommendations(&summary);
        Self {
            kind: kind.into(),
            generated_at,
            score,
            summary,
            recommendations,
        }
    }

    /// `health-report-<kind>-<YYYY-MM-DD>.txt`
    pub fn file_name(&self) -> String {
        format!(
            "health-report-{}-{}.txt",
            self.kind,
            self.generated_at.format("%Y-%m-%d")
        )
    }

    /// The plain-text rendering written by `vitals report`.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{APP_NAME} - {} HEALTH REPORT\n",
            self.kind.to_uppercase()
        ));
        out.push_str(&format!(
            "Generated: {}\n\n",
            self.generated_at.format("%Y-%m-%d")
        ));
        out.push_str(&format!("HEALTH SCORE: {}/100\n\n", self.score));

        out.push_str("SUMMARY:\n");
        out.push_str(&format!("- Total Workouts: {}\n", self.summary.workouts));
        out.push_str(&format!(
            "- Average Daily Calories: {:.0}\n",
            self.summary.average_calories
        ));
        out.push_str(&format!("- Water Intake: {}ml\n", self.summary.water_ml));
        out.push_str(&format!(
            "- Average Sleep: {:.1} hours\n\n",
            self.summary.average_sleep_hours
        ));

        out.push_str("PERSONALIZED RECOMMENDATIONS:\n");
        for rec in &self.recommendations {
            out.push_str(&format!("• {rec}\n"));
        }
        out.push_str(&format!("\nGenerated by {APP_NAME}\n"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn summary(workouts: usize, calories: f64, water_ml: u32, sleep: f64) -> ReportSummary {
        ReportSummary {
            workouts,
            average_calories: calories,
            water_ml,
            average_sleep_hours: sleep,
        }
    }

    #[test]
    fn test_empty_history_fires_every_rule() {
        let recs = recommendations(&summary(0, 0.0, 0, 0.0));
        assert_eq!(
            recs,
            vec![
                RECOMMEND_MORE_WORKOUTS,
                RECOMMEND_MORE_CALORIES,
                RECOMMEND_MORE_WATER,
                RECOMMEND_MORE_SLEEP,
            ]
        );
    }

    #[test]
    fn test_high_calories_rule() {
        let recs = recommendations(&summary(5, 2600.0, 2000, 8.0));
        assert_eq!(recs, vec![RECOMMEND_FEWER_CALORIES]);
    }

    #[test]
    fn test_on_track_only_when_nothing_fired() {
        let recs = recommendations(&summary(3, 2000.0, 1500, 7.0));
        assert_eq!(recs, vec![ON_TRACK]);
    }

    #[test]
    fn test_render_text_and_file_name() {
        let report = Report::new("weekly", at(), 72, summary(4, 1987.4, 1750, 7.5));
        assert_eq!(report.file_name(), "health-report-weekly-2024-06-10.txt");
        let text = report.render_text();
        assert!(text.starts_with("Vitals - WEEKLY HEALTH REPORT\n"));
        assert!(text.contains("HEALTH SCORE: 72/100"));
        assert!(text.contains("- Average Daily Calories: 1987\n"));
        assert!(text.contains("- Water Intake: 1750ml\n"));
        assert!(text.contains("- Average Sleep: 7.5 hours\n"));
        assert!(text.contains(&format!("• {ON_TRACK}")));
    }
}
