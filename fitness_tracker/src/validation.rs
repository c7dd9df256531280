use chrono::NaiveDate;
use log::error;
use regex::Regex;
use std::sync::OnceLock;

use fitness_store::record::is_storable_value;
use fitness_store::FocusArea;

use crate::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 8;

const EMAIL_PATTERN: &str = r"^[\w\.-]+@[\w\.-]+\.\w+$";
const PUNCTUATION: &str = r#"!@#$%^&*(),.?":{}|<>"#;

/// Everything the registration form collects.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub terms_accepted: bool,
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    match EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN)) {
        Ok(re) => Some(re),
        Err(e) => {
            error!("Email pattern failed to compile: {}", e);
            None
        }
    }
}

/// Simple `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().map_or(false, |re| re.is_match(email))
}

/// Checks run in form order; the first failure is the one reported.
pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationError> {
    if form.full_name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if !is_storable_value(&form.full_name) {
        return Err(ValidationError::InvalidName);
    }
    if !is_valid_email(&form.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if !form.terms_accepted {
        return Err(ValidationError::TermsNotAccepted);
    }
    Ok(())
}

/// Advisory score in `[0, 1]`: a quarter for each of lowercase, uppercase,
/// digit and punctuation. Never blocks registration.
pub fn password_strength(password: &str) -> f32 {
    let classes = [
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| PUNCTUATION.contains(c)),
    ];
    let score = classes.iter().filter(|present| **present).count() as f32 * 0.25;
    score.min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLevel {
    Empty,
    Weak,
    Fair,
    Strong,
}

impl StrengthLevel {
    pub fn of(password: &str) -> StrengthLevel {
        if password.is_empty() {
            return StrengthLevel::Empty;
        }
        let score = password_strength(password);
        if score < 0.5 {
            StrengthLevel::Weak
        } else if score < 0.75 {
            StrengthLevel::Fair
        } else {
            StrengthLevel::Strong
        }
    }

    /// Indicator colour.
    pub fn color(&self) -> &'static str {
        match self {
            StrengthLevel::Empty => "white",
            StrengthLevel::Weak => "red",
            StrengthLevel::Fair => "yellow",
            StrengthLevel::Strong => "green",
        }
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, ValidationError> {
    raw.trim().parse::<T>().map_err(|_| ValidationError::NotANumber {
        field,
        value: String::from(raw),
    })
}

/// Parsed weight (kg), height (m) and age from the measurements form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyInput {
    pub weight: f64,
    pub height: f64,
    pub age: u32,
}

pub fn parse_body_input(weight: &str, height: &str, age: &str) -> Result<BodyInput, ValidationError> {
    let weight: f64 = parse_number("Weight", weight)?;
    let height: f64 = parse_number("Height", height)?;
    let age: u32 = parse_number("Age", age)?;

    if height <= 0.0 || !height.is_finite() {
        return Err(ValidationError::NotPositive("Height"));
    }
    if weight <= 0.0 || !weight.is_finite() {
        return Err(ValidationError::NotPositive("Weight"));
    }
    if age == 0 {
        return Err(ValidationError::NotPositive("Age"));
    }
    Ok(BodyInput { weight, height, age })
}

pub fn parse_duration(duration: &str) -> Result<u32, ValidationError> {
    match duration.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(ValidationError::InvalidDuration),
    }
}

pub fn parse_workout_date(date: &str, format: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date.trim(), format).map_err(|_| ValidationError::InvalidDate {
        format: String::from(format),
    })
}

pub fn require_focus_areas(focus_areas: &[FocusArea]) -> Result<(), ValidationError> {
    if focus_areas.is_empty() {
        Err(ValidationError::NoFocusArea)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> RegistrationForm {
        RegistrationForm {
            full_name: String::from("Jane Doe"),
            email: String::from("jane@x.com"),
            password: String::from("Abcdef12"),
            confirm_password: String::from("Abcdef12"),
            terms_accepted: true,
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert_eq!(validate_registration(&jane()), Ok(()));
    }

    #[test]
    fn first_failure_wins() {
        let form = RegistrationForm {
            full_name: String::new(),
            email: String::from("not-an-email"),
            password: String::from("short"),
            ..jane()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::MissingName));

        let form = RegistrationForm {
            email: String::from("not-an-email"),
            password: String::from("short"),
            ..jane()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::InvalidEmail));

        let form = RegistrationForm {
            password: String::from("short"),
            confirm_password: String::from("other"),
            ..jane()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::PasswordTooShort(8)));

        let form = RegistrationForm {
            confirm_password: String::from("Abcdef13"),
            terms_accepted: false,
            ..jane()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::PasswordMismatch));

        let form = RegistrationForm {
            terms_accepted: false,
            ..jane()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::TermsNotAccepted));
    }

    #[test]
    fn name_cannot_carry_extra_fields() {
        let form = RegistrationForm {
            full_name: String::from("Mallory, Email: victim@x.com"),
            email: String::from("mallory@x.com"),
            ..jane()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::InvalidName));
        assert_eq!(
            ValidationError::InvalidName.to_string(),
            "Full name cannot contain ': ' or line breaks"
        );

        let form = RegistrationForm {
            full_name: String::from("Jane\nDoe"),
            ..jane()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::InvalidName));

        let form = RegistrationForm {
            full_name: String::from("Doe, Jane"),
            ..jane()
        };
        assert_eq!(validate_registration(&form), Ok(()));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("jane.doe-1@mail.example.org"));
        assert!(!is_valid_email("jane@x"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("jane x@x.com"));
    }

    #[test]
    fn strength_quarters() {
        assert_eq!(password_strength(""), 0.0);
        assert_eq!(password_strength("abc"), 0.25);
        assert_eq!(password_strength("abcDEF"), 0.5);
        assert_eq!(password_strength("Abcdef12"), 0.75);
        assert_eq!(password_strength("Abcdef12!"), 1.0);
        assert_eq!(StrengthLevel::of(""), StrengthLevel::Empty);
        assert_eq!(StrengthLevel::of("abc"), StrengthLevel::Weak);
        assert_eq!(StrengthLevel::of("abcDEF"), StrengthLevel::Fair);
        assert_eq!(StrengthLevel::of("Abcdef12"), StrengthLevel::Strong);
    }

    #[test]
    fn weak_password_still_registers() {
        let form = RegistrationForm {
            password: String::from("aaaaaaaa"),
            confirm_password: String::from("aaaaaaaa"),
            ..jane()
        };
        assert_eq!(StrengthLevel::of(&form.password), StrengthLevel::Weak);
        assert_eq!(validate_registration(&form), Ok(()));
    }

    #[test]
    fn body_input_rules() {
        assert_eq!(
            parse_body_input("70", " 1.75 ", "30"),
            Ok(BodyInput { weight: 70.0, height: 1.75, age: 30 })
        );
        assert_eq!(parse_body_input("70", "0", "30"), Err(ValidationError::NotPositive("Height")));
        assert_eq!(parse_body_input("70", "-1.8", "30"), Err(ValidationError::NotPositive("Height")));
        assert_eq!(parse_body_input("0", "1.8", "30"), Err(ValidationError::NotPositive("Weight")));
        assert_eq!(parse_body_input("70", "1.8", "0"), Err(ValidationError::NotPositive("Age")));
        assert!(matches!(
            parse_body_input("seventy", "1.8", "30"),
            Err(ValidationError::NotANumber { field: "Weight", .. })
        ));
        assert!(matches!(
            parse_body_input("70", "1.8", "30.5"),
            Err(ValidationError::NotANumber { field: "Age", .. })
        ));
    }

    #[test]
    fn durations_and_dates() {
        assert_eq!(parse_duration("45"), Ok(45));
        assert_eq!(parse_duration("0"), Err(ValidationError::InvalidDuration));
        assert_eq!(parse_duration("forty"), Err(ValidationError::InvalidDuration));
        assert!(parse_workout_date("2026-10-17", "%Y-%m-%d").is_ok());
        assert!(parse_workout_date("17/10/2026", "%Y-%m-%d").is_err());
    }

    #[test]
    fn focus_areas_required() {
        assert_eq!(require_focus_areas(&[]), Err(ValidationError::NoFocusArea));
        assert_eq!(require_focus_areas(&[FocusArea::Abs]), Ok(()));
    }
}
