//! Input range checks applied before a sample reaches the scoring engine
//!
//! The engine trusts its inputs; callers run [`SampleValidator::validate`]
//! first and reject the request if anything is out of range.

use std::fmt;
use std::ops::RangeInclusive;

use crate::models::WorkoutSample;

/// A single rejected field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every out-of-range field of one sample
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{} {}", v.field, v.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

const AVG_HR_RANGE: RangeInclusive<u16> = 30..=220;
const MAX_HR_RANGE: RangeInclusive<u16> = 100..=230;
const RPE_RANGE: RangeInclusive<f64> = 0.0..=10.0;
const SLEEP_RANGE: RangeInclusive<f64> = 0.0..=14.0;
const SLEEP_QUALITY_RANGE: RangeInclusive<u8> = 1..=5;
const HUMIDITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// Validates workout samples against plausible physiological ranges
pub struct SampleValidator;

impl SampleValidator {
    /// Collect every violation; `Ok` only when the sample is fully in range
    pub fn validate(sample: &WorkoutSample) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        let mut reject = |field: &str, message: String| {
            violations.push(FieldViolation {
                field: field.to_string(),
                message,
            })
        };

        Self::check_non_negative("duration_min", sample.duration_min, &mut reject);
        Self::check_non_negative("last7_load", sample.last7_load, &mut reject);
        Self::check_non_negative("last28_load", sample.last28_load, &mut reject);
        Self::check_range("sleep_hours", sample.sleep_hours, &SLEEP_RANGE, &mut reject);

        if let Some(avg) = sample.avg_hr {
            if !AVG_HR_RANGE.contains(&avg) {
                reject("avg_hr", format!("must be within 30-220 bpm, got {}", avg));
            }
        }
        if let Some(max) = sample.max_hr {
            if !MAX_HR_RANGE.contains(&max) {
                reject("max_hr", format!("must be within 100-230 bpm, got {}", max));
            }
        }
        if let Some(rpe) = sample.rpe {
            Self::check_range("rpe", rpe, &RPE_RANGE, &mut reject);
        }
        if let Some(quality) = sample.sleep_quality {
            if !SLEEP_QUALITY_RANGE.contains(&quality) {
                reject("sleep_quality", format!("must be within 1-5, got {}", quality));
            }
        }
        if let Some(humidity) = sample.humidity {
            Self::check_range("humidity", humidity, &HUMIDITY_RANGE, &mut reject);
        }
        if let Some(temp) = sample.temp_c {
            if !temp.is_finite() {
                reject("temp_c", "must be a finite number".to_string());
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }

    /// Validate a run of samples, prefixing field names with the day index
    pub fn validate_all(samples: &[WorkoutSample]) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        for (index, sample) in samples.iter().enumerate() {
            if let Err(err) = Self::validate(sample) {
                violations.extend(err.violations.into_iter().map(|v| FieldViolation {
                    field: format!("D{}.{}", index + 1, v.field),
                    message: v.message,
                }));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }

    fn check_non_negative(field: &str, value: f64, reject: &mut impl FnMut(&str, String)) {
        if !value.is_finite() || value < 0.0 {
            reject(field, format!("must be a non-negative number, got {}", value));
        }
    }

    fn check_range(
        field: &str,
        value: f64,
        range: &RangeInclusive<f64>,
        reject: &mut impl FnMut(&str, String),
    ) {
        if !range.contains(&value) {
            reject(
                field,
                format!("must be within {}-{}, got {}", range.start(), range.end(), value),
            );
        }
    }
}
