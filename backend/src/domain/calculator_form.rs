//! Calculator form logic.
//!
//! Parsing and validation for the text fields the UI collects before it calls
//! into the calculator. Numeric fields are parsed leniently: the longest
//! leading decimal number wins and anything unparsable counts as zero.

use shared::{CalculatorConfig, CatStatus, WeightValidation};

/// Reasons a weight input cannot be used for a calculation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightValidationError {
    #[error("Weight is required")]
    Empty,
    #[error("Weight must be greater than 0 kg")]
    NotPositive,
    #[error("Weight cannot exceed {0} kg")]
    TooHeavy(f64),
}

#[derive(Debug, Clone)]
pub struct CalculatorFormService {
    config: CalculatorConfig,
}

impl Default for CalculatorFormService {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorFormService {
    pub fn new() -> Self {
        Self {
            config: CalculatorConfig::default(),
        }
    }

    pub fn with_config(config: CalculatorConfig) -> Self {
        Self { config }
    }

    /// Parse a numeric text field.
    ///
    /// "4.5" -> 4.5, " 4.5kg" -> 4.5, ".5" -> 0.5, "abc" -> 0, "" -> 0
    pub fn parse_numeric_input(&self, input: &str) -> f64 {
        let trimmed = input.trim();
        let prefix = &trimmed[..numeric_prefix_len(trimmed)];

        match prefix.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => 0.0,
        }
    }

    /// Check a weight field against `0 < weight <= max_weight_kg`
    pub fn check_weight(&self, input: &str) -> Result<f64, WeightValidationError> {
        if input.trim().is_empty() {
            return Err(WeightValidationError::Empty);
        }

        let weight = self.parse_numeric_input(input);
        if weight <= 0.0 {
            Err(WeightValidationError::NotPositive)
        } else if weight > self.config.max_weight_kg {
            Err(WeightValidationError::TooHeavy(self.config.max_weight_kg))
        } else {
            Ok(weight)
        }
    }

    /// Validate the weight field and pick the hint shown next to the cat
    pub fn validate_weight(&self, input: &str, status: &CatStatus) -> WeightValidation {
        match self.check_weight(input) {
            Ok(weight) => {
                let hint = if *status == CatStatus::Inactive {
                    "Let's get healthy together!"
                } else {
                    "Looking good! Ready to calculate!"
                };

                WeightValidation {
                    is_valid: true,
                    weight,
                    error_message: None,
                    hint: hint.to_string(),
                }
            }
            Err(error) => {
                let hint = match error {
                    WeightValidationError::Empty => "MEOW! Enter my weight!",
                    _ => "Hmm... that weight seems off!",
                };

                WeightValidation {
                    is_valid: false,
                    weight: self.parse_numeric_input(input),
                    error_message: Some(error.to_string()),
                    hint: hint.to_string(),
                }
            }
        }
    }
}

/// Length of the longest prefix that looks like a decimal number
/// (optional sign, digits, optional fraction, optional exponent)
fn numeric_prefix_len(input: &str) -> usize {
    let bytes = input.as_bytes();
    let mut end = 0;
    let mut pos = 0;

    if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut has_digits = pos > int_start;
    if has_digits {
        end = pos;
    }

    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos > frac_start {
            has_digits = true;
        }
        if has_digits {
            end = pos;
        }
    }

    if has_digits && pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            end = exp;
        }
    }

    end
}
