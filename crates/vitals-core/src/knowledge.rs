//! Constant lookup tables: the symptom table and the workout templates.
//!
//! Symptom analysis is plain keyword containment, checked in table order;
//! the first matching entry decides the response.

use serde::Serialize;

/// How urgently a matched symptom should be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Mild,
    Severe,
}

/// One row of the symptom table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SymptomInfo {
    pub keyword: &'static str,
    pub causes: &'static [&'static str],
    pub recommendations: &'static [&'static str],
    pub severity: Severity,
}

pub const SYMPTOMS: &[SymptomInfo] = &[
    SymptomInfo {
        keyword: "headache",
        causes: &["Stress", "Dehydration", "Poor sleep", "Eye strain"],
        recommendations: &[
            "Drink more water",
            "Get adequate sleep",
            "Manage stress",
            "Take breaks from screens",
        ],
        severity: Severity::Mild,
    },
    SymptomInfo {
        keyword: "fatigue",
        causes: &["Poor sleep", "Iron deficiency", "Stress", "Poor nutrition"],
        recommendations: &[
            "Improve sleep schedule",
            "Eat iron-rich foods",
            "Exercise regularly",
            "Manage stress",
        ],
        severity: Severity::Mild,
    },
    SymptomInfo {
        keyword: "chest pain",
        causes: &["Serious medical condition"],
        recommendations: &["Seek immediate medical attention"],
        severity: Severity::Severe,
    },
    SymptomInfo {
        keyword: "shortness of breath",
        causes: &["Serious medical condition"],
        recommendations: &["Seek immediate medical attention"],
        severity: Severity::Severe,
    },
];

const NO_MATCH_RESPONSE: &str = "I understand you're experiencing symptoms. For a proper \
diagnosis, I recommend consulting with a healthcare professional. In the meantime, ensure \
you're getting adequate rest, staying hydrated, and eating nutritious foods.";

const SEVERE_RESPONSE: &str = "Based on your symptoms, I strongly recommend seeking immediate \
medical attention. Please contact a healthcare provider or emergency services if this is urgent.";

const DISCLAIMER: &str = "Important: This is general information only. If symptoms persist or \
worsen, please consult a healthcare professional.";

/// First table entry whose keyword occurs in `text`, case-insensitively.
pub fn match_symptom(text: &str) -> Option<&'static SymptomInfo> {
    let lower = text.to_lowercase();
    SYMPTOMS.iter().find(|info| lower.contains(info.keyword))
}

/// The analysis text stored with a symptom record.
pub fn analyze_symptoms(text: &str) -> String {
    let Some(info) = match_symptom(text) else {
        return NO_MATCH_RESPONSE.to_string();
    };
    if info.severity == Severity::Severe {
        return SEVERE_RESPONSE.to_string();
    }

    let mut out =
        String::from("Based on your symptoms, here are some potential causes and recommendations:\n\n");
    out.push_str("Possible Causes:\n");
    for cause in info.causes {
        out.push_str(&format!("• {cause}\n"));
    }
    out.push_str("\nRecommendations:\n");
    for rec in info.recommendations {
        out.push_str(&format!("• {rec}\n"));
    }
    out.push('\n');
    out.push_str(DISCLAIMER);
    out
}

/// A preset workout with a fixed duration and calorie value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkoutTemplate {
    pub name: &'static str,
    pub duration: f64,
    pub calories: u32,
}

pub const WORKOUT_TEMPLATES: &[WorkoutTemplate] = &[
    WorkoutTemplate {
        name: "Beginner HIIT",
        duration: 15.0,
        calories: 120,
    },
    WorkoutTemplate {
        name: "Strength Training",
        duration: 45.0,
        calories: 360,
    },
    WorkoutTemplate {
        name: "Yoga Flow",
        duration: 30.0,
        calories: 150,
    },
];

/// Look a template up by name, ignoring case.
pub fn find_template(name: &str) -> Option<&'static WorkoutTemplate> {
    WORKOUT_TEMPLATES
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
}
