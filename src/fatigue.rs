//! Fatigue scoring
//!
//! Combines the acute:chronic workload ratio, sleep debt, heat stress and the
//! streak of hard days into a single score clamped to [0, 100].
//!
//! ```text
//! raw   = 50 × (acute/chronic − 1) + 5 × sleep_debt + env_penalty + streak_penalty
//! score = clamp(round(40 + raw / 2), 0, 100)
//! ```
//!
//! The environmental and streak penalties are each capped at 20. The final
//! clamp also covers ratios far above 10, as for an athlete with no history.

use serde::{Deserialize, Serialize};

use crate::constants::{round_score, ScoringConstants};
use crate::load::session_load;
use crate::models::WorkoutSample;

/// Intermediate terms of a fatigue score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueBreakdown {
    pub session_load: f64,
    pub acute: f64,
    pub chronic: f64,
    pub acwr: f64,
    pub sleep_debt: f64,
    pub env_penalty: f64,
    pub streak_penalty: f64,
    pub raw: f64,
    pub score: u8,
}

/// Heat/humidity penalty; zero unless both readings are present
pub fn environmental_penalty(
    temp_c: Option<f64>,
    humidity: Option<f64>,
    constants: &ScoringConstants,
) -> f64 {
    match (temp_c, humidity) {
        (Some(temp), Some(humidity)) => {
            let heat = (temp - constants.heat_threshold_c).max(0.0);
            let amplifier = constants.humidity_base + humidity / constants.humidity_divisor;
            (heat * amplifier).max(0.0).min(constants.env_penalty_cap)
        }
        _ => 0.0,
    }
}

/// Penalty for consecutive high-intensity days
pub fn streak_penalty(hi_streak_days: u32, constants: &ScoringConstants) -> f64 {
    (f64::from(hi_streak_days) * constants.streak_step).min(constants.streak_penalty_cap)
}

/// Score a sample and keep every intermediate term
pub fn fatigue_breakdown(sample: &WorkoutSample, constants: &ScoringConstants) -> FatigueBreakdown {
    let load = session_load(sample, constants);
    let acute = sample.last7_load + load;
    let chronic = (sample.last28_load / constants.chronic_weeks).max(constants.chronic_floor);
    let acwr = acute / chronic;

    let sleep_debt = constants.sleep_debt(sample.sleep_hours);
    let env_penalty = environmental_penalty(sample.temp_c, sample.humidity, constants);
    let streak_penalty = streak_penalty(sample.hi_streak_days, constants);

    let raw = constants.acwr_weight * (acwr - 1.0)
        + sleep_debt * constants.sleep_debt_weight
        + env_penalty
        + streak_penalty;
    let score = clamp_score(constants.score_offset + raw / constants.score_divisor);

    tracing::debug!(
        session_load = load,
        acute,
        chronic,
        acwr,
        sleep_debt,
        env_penalty,
        streak_penalty,
        score,
        "Fatigue scored"
    );

    FatigueBreakdown {
        session_load: load,
        acute,
        chronic,
        acwr,
        sleep_debt,
        env_penalty,
        streak_penalty,
        raw,
        score,
    }
}

/// Fatigue score in [0, 100]
pub fn fatigue_score(sample: &WorkoutSample, constants: &ScoringConstants) -> u8 {
    fatigue_breakdown(sample, constants).score
}

fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    round_score(value).clamp(0.0, 100.0) as u8
}
