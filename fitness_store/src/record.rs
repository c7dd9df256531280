//! Line codec for the record and workout-history files.
//!
//! Record lines are `, `-separated `Key: value` pairs. Parsing is driven by
//! the keys, so goal and measurement fragments can share one file with the
//! registration lines.

use log::warn;
use std::str::FromStr;

use crate::structs::{FitnessGoal, FocusArea, Measurements, UserRecord, WorkoutEntry, WorkoutType};

pub const KEY_FULL_NAME: &str = "Full Name";
pub const KEY_EMAIL: &str = "Email";
pub const KEY_PASSWORD: &str = "Password";
pub const KEY_FITNESS_GOAL: &str = "Fitness Goal";
pub const KEY_FOCUS_AREAS: &str = "Focus Areas";
pub const KEY_WEIGHT: &str = "Weight";
pub const KEY_HEIGHT: &str = "Height";
pub const KEY_BMI: &str = "BMI";
pub const KEY_CATEGORY: &str = "Category";
pub const KEY_GENDER: &str = "Gender";
pub const KEY_AGE: &str = "Age";

const FIELD_SEPARATOR: &str = ", ";
const KEY_SEPARATOR: &str = ": ";
const MEASUREMENT_TERMINATOR: &str = " |";

/// True when `value` can sit inside a record line without starting a new
/// field or a new line. `, ` on its own is fine, it comes back as a
/// continuation of the same value.
pub fn is_storable_value(value: &str) -> bool {
    !value.contains(KEY_SEPARATOR) && !value.contains(['\n', '\r'])
}

pub fn format_registration(name: &str, email: &str, password_hash: &str) -> String {
    format!("{KEY_FULL_NAME}: {name}, {KEY_EMAIL}: {email}, {KEY_PASSWORD}: {password_hash}")
}

pub fn format_goals(email: &str, goal: FitnessGoal, focus_areas: &[FocusArea]) -> String {
    let areas: Vec<&str> = focus_areas.iter().map(|a| a.as_str()).collect();
    format!(
        "{KEY_EMAIL}: {email}, {KEY_FITNESS_GOAL}: {goal}, {KEY_FOCUS_AREAS}: {}",
        areas.join(FIELD_SEPARATOR)
    )
}

/// Weight and height always keep their decimal point (`70.0 kg`), BMI is
/// rounded to two places.
pub fn format_measurements(email: &str, m: &Measurements) -> String {
    format!(
        "{KEY_EMAIL}: {email}, {KEY_WEIGHT}: {:?} kg, {KEY_HEIGHT}: {:?} m, \
         {KEY_BMI}: {:.2}, {KEY_CATEGORY}: {}, {KEY_GENDER}: {}, {KEY_AGE}: {}{MEASUREMENT_TERMINATOR}",
        m.weight, m.height, m.bmi, m.category, m.gender, m.age
    )
}

/// Splits a record line into its `(key, value)` pairs, in line order.
///
/// A segment without a `: ` separator belongs to the previous value, which is
/// how multi-valued fields like `Focus Areas: Legs, Back` come back whole.
pub fn parse_line(line: &str) -> Vec<(String, String)> {
    let line = line.trim_end();
    let line = line.strip_suffix(MEASUREMENT_TERMINATOR).unwrap_or(line);

    let mut fields: Vec<(String, String)> = Vec::new();
    if line.is_empty() {
        return fields;
    }
    for segment in line.split(FIELD_SEPARATOR) {
        match segment.split_once(KEY_SEPARATOR) {
            Some((key, value)) => fields.push((key.to_string(), value.to_string())),
            None => {
                if let Some((_, value)) = fields.last_mut() {
                    value.push_str(FIELD_SEPARATOR);
                    value.push_str(segment);
                }
            }
        }
    }
    fields
}

pub fn field<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_or_warn<T: FromStr>(key: &str, raw: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring unreadable '{}' value '{}': {}", key, raw, e);
            None
        }
    }
}

/// Decodes the user fields carried by a single line. Lines without an email
/// are not user fragments and decode to `None`.
pub fn decode_fragment(line: &str) -> Option<UserRecord> {
    let fields = parse_line(line);
    let email = field(&fields, KEY_EMAIL)?.trim();
    if email.is_empty() {
        return None;
    }

    let mut record = UserRecord {
        email: email.to_string(),
        ..Default::default()
    };

    for (key, value) in &fields {
        match key.as_str() {
            KEY_FULL_NAME => record.name = Some(value.clone()),
            KEY_PASSWORD => record.password_hash = Some(value.trim().to_string()),
            KEY_FITNESS_GOAL => record.fitness_goal = parse_or_warn(key, value),
            KEY_FOCUS_AREAS => {
                record.focus_areas = value
                    .split(FIELD_SEPARATOR)
                    .filter_map(|area| parse_or_warn::<FocusArea>(key, area))
                    .collect();
            }
            KEY_WEIGHT => {
                record.weight = parse_or_warn(key, value.trim_end_matches(" kg"));
            }
            KEY_HEIGHT => {
                record.height = parse_or_warn(key, value.trim_end_matches(" m"));
            }
            KEY_BMI => record.bmi = parse_or_warn(key, value),
            KEY_CATEGORY => record.bmi_category = parse_or_warn(key, value),
            KEY_GENDER => record.gender = parse_or_warn(key, value),
            KEY_AGE => record.age = parse_or_warn(key, value),
            _ => {}
        }
    }
    Some(record)
}

/// True when the line's `Email` field is exactly `email`.
pub fn line_has_email(fields: &[(String, String)], email: &str) -> bool {
    field(fields, KEY_EMAIL).map(str::trim) == Some(email)
}

pub fn format_workout(entry: &WorkoutEntry) -> String {
    format!(
        "{}: {} - {} minutes",
        entry.date, entry.workout_type, entry.duration_minutes
    )
}

/// Inverse of `format_workout`; `None` for anything that doesn't fit the shape.
pub fn parse_workout(line: &str) -> Option<WorkoutEntry> {
    let line = line.trim_end();
    let (head, minutes) = line.rsplit_once(" - ")?;
    let duration_minutes = minutes.strip_suffix(" minutes")?.trim().parse::<u32>().ok()?;
    let (date, workout_type) = head.rsplit_once(KEY_SEPARATOR)?;
    Some(WorkoutEntry {
        date: date.to_string(),
        workout_type: workout_type.parse::<WorkoutType>().ok()?,
        duration_minutes,
    })
}
