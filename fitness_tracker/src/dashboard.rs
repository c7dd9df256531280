//! Content of the dashboard panes, independent of how they're drawn.

use fitness_store::{UserRecord, WorkoutEntry, WorkoutType};

pub const NO_HISTORY: &str = "No workout history found.";

#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

/// The four overview tiles, from whatever the session has learned about the user.
pub fn overview(user: &UserRecord) -> Vec<Stat> {
    let weight = match user.weight {
        Some(weight) => format!("{:?} kg", weight),
        None => String::from("0 kg"),
    };
    let goal = user
        .fitness_goal
        .map(|g| g.to_string())
        .unwrap_or_else(|| String::from("Not set"));
    let areas: Vec<&str> = user.focus_areas.iter().map(|a| a.as_str()).collect();

    vec![
        Stat { label: "Current Weight", value: weight },
        Stat { label: "BMI", value: format!("{:.1}", user.bmi.unwrap_or(0.0)) },
        Stat { label: "Fitness Goal", value: goal },
        Stat { label: "Focus Areas", value: areas.join(", ") },
    ]
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Progress {
    /// Weight of every saved measurement, oldest first.
    pub weights: Vec<f64>,
    /// Logged minutes per workout type, in catalog order, zero totals left out.
    pub minutes_by_type: Vec<(WorkoutType, u32)>,
}

impl Progress {
    pub fn weight_change(&self) -> Option<f64> {
        match (self.weights.first(), self.weights.last()) {
            (Some(first), Some(last)) if self.weights.len() > 1 => Some(last - first),
            _ => None,
        }
    }
}

pub fn progress(measurements: &[UserRecord], workouts: &[WorkoutEntry]) -> Progress {
    let weights = measurements.iter().filter_map(|m| m.weight).collect();
    let minutes_by_type = WorkoutType::ALL
        .iter()
        .map(|kind| {
            let total = workouts
                .iter()
                .filter(|w| w.workout_type == *kind)
                .map(|w| w.duration_minutes)
                .sum::<u32>();
            (*kind, total)
        })
        .filter(|(_, total)| *total > 0)
        .collect();
    Progress { weights, minutes_by_type }
}

/// The history pane shows the raw history file, or a placeholder when there is none.
pub fn history_text(raw: Option<String>) -> String {
    match raw {
        Some(text) if !text.trim().is_empty() => text,
        _ => String::from(NO_HISTORY),
    }
}
