use fitness_store::{BmiCategory, Gender, Measurements};

use crate::validation::BodyInput;

/// weight (kg) / height (m) squared. Callers guarantee a positive height.
pub fn compute_bmi(weight: f64, height: f64) -> f64 {
    weight / (height * height)
}

pub fn classify(bmi: f64) -> BmiCategory {
    BmiCategory::from_bmi(bmi)
}

/// Turns validated form input into the record the store persists.
pub fn measure(input: &BodyInput, gender: Gender) -> Measurements {
    let bmi = compute_bmi(input.weight, input.height);
    Measurements {
        weight: input.weight,
        height: input.height,
        bmi,
        category: classify(bmi),
        gender,
        age: input.age,
    }
}

pub fn result_message(measurements: &Measurements) -> String {
    format!("Your BMI is {:.2} ({})", measurements.bmi, measurements.category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula() {
        for (weight, height) in [(70.0, 1.75), (55.5, 1.62), (120.0, 1.9)] {
            assert_eq!(compute_bmi(weight, height), weight / (height * height));
        }
    }

    #[test]
    fn reference_person() {
        let input = BodyInput { weight: 70.0, height: 1.75, age: 30 };
        let m = measure(&input, Gender::Male);
        assert!((m.bmi - 22.857).abs() < 0.001);
        assert_eq!(m.category, BmiCategory::Normal);
        assert_eq!(result_message(&m), "Your BMI is 22.86 (Normal weight)");
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify(17.49), BmiCategory::Underweight);
        assert_eq!(classify(18.5), BmiCategory::Normal);
        assert_eq!(classify(24.99), BmiCategory::Normal);
        assert_eq!(classify(25.0), BmiCategory::Overweight);
        assert_eq!(classify(29.99), BmiCategory::Overweight);
        assert_eq!(classify(30.0), BmiCategory::Obesity);
    }
}
