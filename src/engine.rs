use crate::baseline::{fatigue_delta, Baseline, FatigueDelta};
use crate::constants::ScoringConstants;
use crate::fatigue::{fatigue_breakdown, FatigueBreakdown};
use crate::load::session_load;
use crate::models::{FatigueResult, Prediction, RecoveryWindow, RiskLevel, WeeklyReport, WorkoutSample};
use crate::report::weekly_report;
use crate::risk::classify_risk;
use crate::roi::{recovery_windows, roi_for_rest};

/// Stateless scoring service
///
/// Holds only its constants, so one engine can be shared freely and every call
/// is a pure function of its arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringEngine {
    constants: ScoringConstants,
}

impl ScoringEngine {
    /// Create an engine with the default calibration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom constants
    pub fn with_constants(constants: ScoringConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &ScoringConstants {
        &self.constants
    }

    pub fn session_load(&self, sample: &WorkoutSample) -> f64 {
        session_load(sample, &self.constants)
    }

    pub fn fatigue_score(&self, sample: &WorkoutSample) -> u8 {
        self.fatigue_breakdown(sample).score
    }

    pub fn fatigue_breakdown(&self, sample: &WorkoutSample) -> FatigueBreakdown {
        fatigue_breakdown(sample, &self.constants)
    }

    /// Fatigue score together with its risk label
    pub fn fatigue(&self, sample: &WorkoutSample) -> FatigueResult {
        let score = self.fatigue_score(sample);
        let sleep_debt = self.constants.sleep_debt(sample.sleep_hours);
        FatigueResult {
            score,
            risk: self.classify_risk(score, sleep_debt, sample.hi_streak_days),
        }
    }

    pub fn classify_risk(&self, fatigue: u8, sleep_debt: f64, hi_streak_days: u32) -> RiskLevel {
        classify_risk(fatigue, sleep_debt, hi_streak_days, &self.constants)
    }

    pub fn roi_for_rest(&self, fatigue: u8, minutes: u32, sleep_hours: f64) -> u8 {
        roi_for_rest(fatigue, minutes, sleep_hours, &self.constants)
    }

    pub fn recovery_windows(&self, fatigue: u8, sleep_hours: f64, risk: RiskLevel) -> [RecoveryWindow; 3] {
        recovery_windows(fatigue, sleep_hours, risk, &self.constants)
    }

    /// Score one workout: fatigue, risk and the three recovery windows
    pub fn predict(&self, sample: &WorkoutSample) -> Prediction {
        let breakdown = self.fatigue_breakdown(sample);
        let risk = self.classify_risk(breakdown.score, breakdown.sleep_debt, sample.hi_streak_days);
        let windows = self.recovery_windows(breakdown.score, sample.sleep_hours, risk);

        tracing::info!(
            fatigue = breakdown.score,
            risk = %risk,
            session_load = breakdown.session_load,
            "Prediction computed"
        );

        Prediction {
            fatigue_score: breakdown.score,
            risk,
            sleep_debt: breakdown.sleep_debt,
            session_load: breakdown.session_load,
            windows,
        }
    }

    pub fn weekly_report(&self, sessions: &[WorkoutSample]) -> WeeklyReport {
        weekly_report(sessions, &self.constants)
    }

    /// Fatigue relative to a reference baseline, or to the fallback when absent
    pub fn fatigue_delta(&self, fatigue: u8, baseline: Option<Baseline>) -> FatigueDelta {
        fatigue_delta(fatigue, baseline, self.constants.fallback_baseline)
    }
}
