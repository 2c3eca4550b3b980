use crate::constants::ScoringConstants;
use crate::models::RiskLevel;

/// Bucket overtraining risk from fatigue, sleep debt and hard-day streak.
///
/// Rules are checked red first, then yellow; the first match wins.
pub fn classify_risk(
    fatigue: u8,
    sleep_debt: f64,
    hi_streak_days: u32,
    constants: &ScoringConstants,
) -> RiskLevel {
    if fatigue >= constants.red_fatigue
        || (sleep_debt >= constants.red_sleep_debt && hi_streak_days >= constants.red_streak)
    {
        return RiskLevel::Red;
    }

    if fatigue >= constants.yellow_fatigue
        || sleep_debt >= constants.yellow_sleep_debt
        || hi_streak_days >= constants.yellow_streak
    {
        return RiskLevel::Yellow;
    }

    RiskLevel::None
}
