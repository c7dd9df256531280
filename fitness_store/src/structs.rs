use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a persisted label doesn't name any known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

// every enum below is persisted as its display label, so both directions
// share one table.
macro_rules! labelled_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownVariant { kind: $kind, value: other.to_string() }),
                }
            }
        }
    };
}

labelled_enum!(FitnessGoal, "fitness goal", {
    WeightLoss => "Weight Loss",
    MuscleGain => "Muscle Gain",
    BodyShape => "Body Shape",
    Cardio => "Cardio",
});

labelled_enum!(FocusArea, "focus area", {
    Legs => "Legs",
    Back => "Back",
    Shoulders => "Shoulders",
    Arms => "Arms",
    Abs => "Abs",
    Butt => "Butt",
    Chest => "Chest",
    FullBody => "Full Body",
});

labelled_enum!(Gender, "gender", {
    Male => "Male",
    Female => "Female",
});

labelled_enum!(BmiCategory, "BMI category", {
    Underweight => "Underweight",
    Normal => "Normal weight",
    Overweight => "Overweight",
    Obesity => "Obesity",
});

labelled_enum!(WorkoutType, "workout type", {
    Cardio => "Cardio",
    Strength => "Strength",
    Flexibility => "Flexibility",
    Hiit => "HIIT",
});

impl BmiCategory {
    /// Fixed bands: <18.5, [18.5, 25), [25, 30), >=30.
    pub fn from_bmi(bmi: f64) -> BmiCategory {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obesity
        }
    }
}

/// One user as far as a single record line (or the running session) knows it.
///
/// Lookups never merge fragments, so anything a given line didn't carry
/// stays `None` / empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
    pub fitness_goal: Option<FitnessGoal>,
    pub focus_areas: Vec<FocusArea>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub bmi: Option<f64>,
    pub bmi_category: Option<BmiCategory>,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
}

impl UserRecord {
    pub fn new(name: &str, email: &str) -> UserRecord {
        UserRecord {
            name: Some(String::from(name)),
            email: String::from(email),
            ..Default::default()
        }
    }
}

/// Body measurements as saved by the measurements screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
    pub category: BmiCategory,
    pub gender: Gender,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutEntry {
    pub date: String,
    pub workout_type: WorkoutType,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    pub const ALL: &'static [Theme] = &[Theme::Light, Theme::Dark, Theme::System];
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("Light"),
            Theme::Dark => f.write_str("Dark"),
            Theme::System => f.write_str("System"),
        }
    }
}

impl FromStr for Theme {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(UnknownVariant { kind: "theme", value: s.to_string() }),
        }
    }
}

/// Per-user entry in the settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "enabled")]
    pub notifications: bool,
    #[serde(default = "enabled")]
    pub reminders: bool,
}

fn enabled() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            theme: Theme::Light,
            notifications: true,
            reminders: true,
        }
    }
}
