//! Weekly recovery report
//!
//! Folds a run of daily samples into per-day load/recovery ratios, an overall
//! recovery efficiency score with its badge, and the expected performance
//! change after a standard rest before the next session.

use crate::constants::{round_score, round_to, ScoringConstants};
use crate::fatigue::fatigue_score;
use crate::load::session_load;
use crate::models::{Badge, DayRatio, WeeklyReport, WorkoutSample};
use crate::roi::roi_for_rest;

/// Recovery credited for a night of sleep; only hours past the floor count
pub fn recovery_load(sleep_hours: f64, constants: &ScoringConstants) -> f64 {
    (sleep_hours - constants.recovery_sleep_floor_hours).max(0.0) * constants.recovery_per_hour
}

/// Efficiency score in [0, 100]; 60 when recovery is 20% of load.
///
/// A run with no training load has nothing to recover from and scores as a
/// zero ratio.
pub fn efficiency_score(total_load: f64, total_recovery: f64, constants: &ScoringConstants) -> u8 {
    let ratio = if total_load > 0.0 {
        total_recovery / (total_load + constants.ratio_epsilon)
    } else {
        0.0
    };
    let score = round_score(
        constants.efficiency_center + (ratio - constants.efficiency_target_ratio) * constants.efficiency_scale,
    );
    if score.is_nan() {
        return 0;
    }
    score.clamp(0.0, 100.0) as u8
}

pub fn badge_for(efficiency: u8, constants: &ScoringConstants) -> Badge {
    if efficiency >= constants.gold_threshold {
        Badge::Gold
    } else if efficiency >= constants.silver_threshold {
        Badge::Silver
    } else {
        Badge::Bronze
    }
}

/// Build the report for an ordered run of sessions, one per day.
///
/// An empty run is valid: efficiency falls to its floor and the outlook is
/// computed from [`WorkoutSample::report_default`].
pub fn weekly_report(sessions: &[WorkoutSample], constants: &ScoringConstants) -> WeeklyReport {
    let mut days = Vec::with_capacity(sessions.len());
    let mut total_load = 0.0;
    let mut total_recovery = 0.0;

    for (index, session) in sessions.iter().enumerate() {
        let load = session_load(session, constants);
        let recovery = recovery_load(session.sleep_hours, constants);
        total_load += load;
        total_recovery += recovery;

        days.push(DayRatio {
            day: format!("D{}", index + 1),
            workout_load: round_to(load, 1),
            recovery_load: round_to(recovery, 1),
            ratio: round_to(recovery / (load + constants.ratio_epsilon), 2),
        });
    }

    let efficiency = efficiency_score(total_load, total_recovery, constants);

    let default_sample;
    let last = match sessions.last() {
        Some(session) => session,
        None => {
            default_sample = WorkoutSample::report_default();
            &default_sample
        }
    };
    let fatigue = fatigue_score(last, constants);
    let next_change = roi_for_rest(fatigue, constants.next_rest_minutes, last.sleep_hours, constants);

    tracing::debug!(
        sessions = sessions.len(),
        total_load,
        total_recovery,
        efficiency,
        last_fatigue = fatigue,
        "Weekly report aggregated"
    );

    WeeklyReport {
        efficiency_score: efficiency,
        days,
        expected_next_performance_change_pct: next_change,
        badge: badge_for(efficiency, constants),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(duration: f64, rpe: f64, sleep: f64) -> WorkoutSample {
        WorkoutSample {
            duration_min: duration,
            rpe: Some(rpe),
            sleep_hours: sleep,
            ..WorkoutSample::default()
        }
    }

    #[test]
    fn test_empty_report_uses_default_sample() {
        let c = ScoringConstants::default();
        let report = weekly_report(&[], &c);

        assert!(report.days.is_empty());
        assert_eq!(report.efficiency_score, 40);
        assert_eq!(report.badge, Badge::Bronze);
        // default sample scores 18 fatigue; 180 minutes rest at 7h sleep
        assert_eq!(report.expected_next_performance_change_pct, 14);
    }

    #[test]
    fn test_day_labels_and_ratios() {
        let c = ScoringConstants::default();
        let sessions = vec![day(30.0, 4.0, 8.0), day(0.0, 5.0, 5.0), day(45.0, 6.0, 7.5)];
        let report = weekly_report(&sessions, &c);

        let labels: Vec<&str> = report.days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(labels, vec!["D1", "D2", "D3"]);
        assert_eq!(report.days[0].recovery_load, 20.0);
        assert_eq!(report.days[1].recovery_load, 0.0);
        assert_eq!(report.days[1].workout_load, 0.0);
        assert_eq!(report.days[1].ratio, 0.0);
        assert_eq!(report.days[2].recovery_load, 15.0);
    }

    #[test]
    fn test_recovery_load() {
        let c = ScoringConstants::default();
        assert_eq!(recovery_load(5.0, &c), 0.0);
        assert_eq!(recovery_load(6.0, &c), 0.0);
        assert_eq!(recovery_load(8.5, &c), 25.0);
    }

    #[test]
    fn test_efficiency_and_badges() {
        let c = ScoringConstants::default();
        assert_eq!(efficiency_score(100.0, 20.0, &c), 60);
        assert_eq!(efficiency_score(100.0, 35.0, &c), 75);
        assert_eq!(efficiency_score(100.0, 500.0, &c), 100);
        assert_eq!(efficiency_score(1000.0, 0.0, &c), 40);
        assert_eq!(efficiency_score(0.0, 140.0, &c), 40);

        assert_eq!(badge_for(75, &c), Badge::Gold);
        assert_eq!(badge_for(74, &c), Badge::Silver);
        assert_eq!(badge_for(65, &c), Badge::Silver);
        assert_eq!(badge_for(64, &c), Badge::Bronze);
    }

    #[test]
    fn test_light_week_with_good_sleep_earns_gold() {
        let c = ScoringConstants::default();
        let sessions: Vec<WorkoutSample> = (0..7).map(|_| day(10.0, 2.0, 9.0)).collect();
        let report = weekly_report(&sessions, &c);
        assert_eq!(report.efficiency_score, 100);
        assert_eq!(report.badge, Badge::Gold);
    }

    #[test]
    fn test_rest_only_week_is_bronze() {
        let c = ScoringConstants::default();
        let sessions: Vec<WorkoutSample> = (0..7).map(|_| day(0.0, 5.0, 8.0)).collect();
        let report = weekly_report(&sessions, &c);

        // per-day ratios still divide by epsilon
        assert_eq!(report.days[0].ratio, 20000000.0);
        assert_eq!(report.efficiency_score, 40);
        assert_eq!(report.badge, Badge::Bronze);
    }

    #[test]
    fn test_outlook_uses_last_session() {
        let c = ScoringConstants::default();
        let sessions = vec![day(30.0, 4.0, 8.0), day(90.0, 9.0, 4.0)];
        let report = weekly_report(&sessions, &c);

        let last = &sessions[1];
        let expected = roi_for_rest(fatigue_score(last, &c), 180, last.sleep_hours, &c);
        assert_eq!(report.expected_next_performance_change_pct, expected);
    }
}
