//! Tunable numbers of the scoring pipeline
//!
//! Every coefficient, threshold and cap used by the load, fatigue, risk, ROI
//! and report calculations lives in [`ScoringConstants`]. The defaults are the
//! calibrated values the service has always shipped with; changing them changes
//! every score, so existing callers should only override them deliberately.

use serde::{Deserialize, Serialize};

/// Scoring pipeline configuration
///
/// Deserializes from the `[scoring]` table of the TOML config. Keys left out of
/// the file keep their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConstants {
    /// Multiplier in front of the exponential load curve
    pub load_coefficient: f64,

    /// Exponent weight applied to the intensity ratio
    pub load_exponent: f64,

    /// Perceived exertion assumed when neither heart rate nor RPE is known
    pub default_exertion: f64,

    /// Lower bound of the chronic load baseline
    pub chronic_floor: f64,

    /// Number of weeks in the chronic window (28 days)
    pub chronic_weeks: f64,

    /// Nightly sleep target in hours; shortfall is sleep debt
    pub sleep_target_hours: f64,

    /// Weight of the acute:chronic deviation from 1.0
    pub acwr_weight: f64,

    /// Fatigue points per hour of sleep debt
    pub sleep_debt_weight: f64,

    /// Temperature (°C) above which heat adds a penalty.
    ///
    /// Calibration constant, not physiologically validated.
    pub heat_threshold_c: f64,

    /// Humidity multiplier base. Calibration constant.
    pub humidity_base: f64,

    /// Humidity divisor. Calibration constant.
    pub humidity_divisor: f64,

    /// Cap on the environmental penalty. Calibration constant.
    pub env_penalty_cap: f64,

    /// Penalty per consecutive high-intensity day. Calibration constant.
    pub streak_step: f64,

    /// Cap on the streak penalty. Calibration constant.
    pub streak_penalty_cap: f64,

    /// Score at which a neutral raw value lands
    pub score_offset: f64,

    /// Raw value compression before clamping
    pub score_divisor: f64,

    pub red_fatigue: u8,
    pub red_sleep_debt: f64,
    pub red_streak: u32,
    pub yellow_fatigue: u8,
    pub yellow_sleep_debt: f64,
    pub yellow_streak: u32,

    /// Minutes of rest after which ~63% of the rest benefit has accrued
    pub rest_time_constant_min: f64,

    /// ROI percent available even at zero fatigue
    pub roi_base: f64,

    /// Extra ROI percent available at fatigue 100
    pub roi_fatigue_gain: f64,

    /// Share of ROI kept when sleep is zero
    pub roi_sleep_floor: f64,

    /// Upper clamp of the ROI percentage
    pub roi_cap: u8,

    pub immediate_window_min: u32,
    pub short_term_window_min: u32,
    pub overnight_window_min: u32,

    /// Recommended-duration scale when risk is red
    pub red_window_multiplier: f64,

    /// Recommended-duration scale when risk is yellow
    pub yellow_window_multiplier: f64,

    /// Sleep hours that count as baseline, not recovery
    pub recovery_sleep_floor_hours: f64,

    /// Recovery load per hour of sleep beyond the floor
    pub recovery_per_hour: f64,

    /// Added to denominators to avoid division by zero
    pub ratio_epsilon: f64,

    pub efficiency_center: f64,
    pub efficiency_target_ratio: f64,
    pub efficiency_scale: f64,
    pub gold_threshold: u8,
    pub silver_threshold: u8,

    /// Rest assumed before the next session in the weekly report
    pub next_rest_minutes: u32,

    /// Reference fatigue score used when no baseline is available
    pub fallback_baseline: i32,
}

impl Default for ScoringConstants {
    fn default() -> Self {
        Self {
            load_coefficient: 0.64,
            load_exponent: 1.92,
            default_exertion: 5.0,
            chronic_floor: 1.0,
            chronic_weeks: 4.0,
            sleep_target_hours: 8.0,
            acwr_weight: 50.0,
            sleep_debt_weight: 5.0,
            heat_threshold_c: 20.0,
            humidity_base: 0.5,
            humidity_divisor: 200.0,
            env_penalty_cap: 20.0,
            streak_step: 3.0,
            streak_penalty_cap: 20.0,
            score_offset: 40.0,
            score_divisor: 2.0,
            red_fatigue: 80,
            red_sleep_debt: 2.0,
            red_streak: 2,
            yellow_fatigue: 65,
            yellow_sleep_debt: 1.5,
            yellow_streak: 2,
            rest_time_constant_min: 60.0,
            roi_base: 10.0,
            roi_fatigue_gain: 30.0,
            roi_sleep_floor: 0.6,
            roi_cap: 50,
            immediate_window_min: 20,
            short_term_window_min: 120,
            overnight_window_min: 480,
            red_window_multiplier: 1.2,
            yellow_window_multiplier: 1.1,
            recovery_sleep_floor_hours: 6.0,
            recovery_per_hour: 10.0,
            ratio_epsilon: 1e-6,
            efficiency_center: 60.0,
            efficiency_target_ratio: 0.2,
            efficiency_scale: 100.0,
            gold_threshold: 75,
            silver_threshold: 65,
            next_rest_minutes: 180,
            fallback_baseline: 60,
        }
    }
}

impl ScoringConstants {
    /// Sleep shortfall below the nightly target, never negative
    pub fn sleep_debt(&self, sleep_hours: f64) -> f64 {
        (self.sleep_target_hours - sleep_hours).max(0.0)
    }
}

/// Round half to even, matching how the scores were always rounded
pub(crate) fn round_score(value: f64) -> f64 {
    value.round_ties_even()
}

/// Round to a fixed number of decimal places for presentation
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let constants: ScoringConstants = toml::from_str("red_fatigue = 85").unwrap();
        assert_eq!(constants.red_fatigue, 85);
        assert_eq!(constants.load_exponent, 1.92);
        assert_eq!(constants.overnight_window_min, 480);
    }

    #[test]
    fn test_sleep_debt() {
        let constants = ScoringConstants::default();
        assert_eq!(constants.sleep_debt(7.0), 1.0);
        assert_eq!(constants.sleep_debt(9.5), 0.0);
    }

    #[test]
    fn test_round_score_ties_to_even() {
        assert_eq!(round_score(17.5), 18.0);
        assert_eq!(round_score(16.5), 16.0);
        assert_eq!(round_score(-0.4), -0.0);
        assert_eq!(round_to(178.8456, 1), 178.8);
    }
}
