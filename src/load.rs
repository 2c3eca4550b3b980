//! Per-session training load
//!
//! A TRIMP-style exponential curve: `duration × 0.64 × e^(1.92 × ratio)`,
//! where the ratio is relative heart rate when both average and maximum are
//! known, and perceived exertion / 10 otherwise.

use crate::constants::ScoringConstants;
use crate::models::WorkoutSample;

/// Where the intensity ratio of a session came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensitySource {
    HeartRate,
    Rpe,
    /// No heart rate and no RPE; moderate effort assumed
    Assumed,
}

/// Intensity ratio in [0, 1] plus the data it was derived from.
///
/// An RPE of 0 counts as unreported, the same way a zero heart rate does.
pub fn intensity_ratio(sample: &WorkoutSample, constants: &ScoringConstants) -> (f64, IntensitySource) {
    match (sample.avg_hr, sample.max_hr) {
        (Some(avg), Some(max)) if avg > 0 && max > 0 => {
            let ratio = (f64::from(avg) / f64::from(max)).clamp(0.0, 1.0);
            (ratio, IntensitySource::HeartRate)
        }
        _ => match sample.rpe {
            Some(rpe) if rpe > 0.0 => (rpe / 10.0, IntensitySource::Rpe),
            _ => (constants.default_exertion / 10.0, IntensitySource::Assumed),
        },
    }
}

/// Unitless training load of a single session
pub fn session_load(sample: &WorkoutSample, constants: &ScoringConstants) -> f64 {
    let (ratio, _) = intensity_ratio(sample, constants);
    let load = sample.duration_min * constants.load_coefficient * (constants.load_exponent * ratio).exp();
    load.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hr_sample(duration: f64, avg: u16, max: u16) -> WorkoutSample {
        WorkoutSample {
            duration_min: duration,
            avg_hr: Some(avg),
            max_hr: Some(max),
            sleep_hours: 8.0,
            ..WorkoutSample::default()
        }
    }

    #[test]
    fn test_heart_rate_load() {
        let constants = ScoringConstants::default();
        let load = session_load(&hr_sample(60.0, 150, 190), &constants);
        // 60 × 0.64 × e^(1.92 × 0.789)
        assert!((load - 174.84).abs() < 0.05, "load was {load}");
    }

    #[test]
    fn test_rpe_fallback() {
        let constants = ScoringConstants::default();
        let sample = WorkoutSample {
            duration_min: 30.0,
            avg_hr: Some(140),
            rpe: Some(8.0),
            ..WorkoutSample::default()
        };
        let (ratio, source) = intensity_ratio(&sample, &constants);
        assert_eq!(source, IntensitySource::Rpe);
        assert!((ratio - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_assumed_moderate_effort() {
        let constants = ScoringConstants::default();
        let (ratio, source) = intensity_ratio(&WorkoutSample::default(), &constants);
        assert_eq!(source, IntensitySource::Assumed);
        assert_eq!(ratio, 0.5);
    }

    #[test]
    fn test_zero_rpe_is_treated_as_unreported() {
        let constants = ScoringConstants::default();
        let sample = WorkoutSample {
            duration_min: 60.0,
            rpe: Some(0.0),
            ..WorkoutSample::default()
        };
        let (ratio, source) = intensity_ratio(&sample, &constants);
        assert_eq!(source, IntensitySource::Assumed);
        assert_eq!(ratio, 0.5);
        assert!((session_load(&sample, &constants) - 100.289).abs() < 0.001);
    }

    #[test]
    fn test_ratio_clamped_when_avg_exceeds_max() {
        let constants = ScoringConstants::default();
        let (ratio, _) = intensity_ratio(&hr_sample(10.0, 200, 180), &constants);
        assert_eq!(ratio, 1.0);
    }

    #[test]
    fn test_zero_duration_is_zero_load() {
        let constants = ScoringConstants::default();
        assert_eq!(session_load(&hr_sample(0.0, 150, 190), &constants), 0.0);
    }

    #[test]
    fn test_harder_session_has_more_load() {
        let constants = ScoringConstants::default();
        let easy = session_load(&hr_sample(60.0, 120, 190), &constants);
        let hard = session_load(&hr_sample(60.0, 170, 190), &constants);
        assert!(hard > easy);
    }
}
