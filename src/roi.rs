//! Return on investment of rest
//!
//! Rest benefit follows a saturating curve `1 − e^(−minutes/60)`: most of the
//! gain arrives in the first hour. Higher fatigue leaves more to recover, and
//! short sleep scales the benefit down to no less than 60%.

use crate::constants::{round_score, ScoringConstants};
use crate::models::{RecoveryWindow, RiskLevel, WindowKind};

/// Expected recovery benefit in percent, clamped to [0, 50]
pub fn roi_for_rest(fatigue: u8, minutes: u32, sleep_hours: f64, constants: &ScoringConstants) -> u8 {
    let rest_factor = 1.0 - (-f64::from(minutes) / constants.rest_time_constant_min).exp();
    let sleep_factor = (sleep_hours / constants.sleep_target_hours).min(1.0);
    let fatigue_gain = f64::from(fatigue) / 100.0 * constants.roi_fatigue_gain;
    let sleep_scale = constants.roi_sleep_floor + (1.0 - constants.roi_sleep_floor) * sleep_factor;

    let roi = round_score((constants.roi_base + fatigue_gain) * rest_factor * sleep_scale);
    if roi.is_nan() {
        return 0;
    }
    roi.clamp(0.0, f64::from(constants.roi_cap)) as u8
}

/// Base rest minutes of a window before any risk scaling
pub fn base_minutes(kind: WindowKind, constants: &ScoringConstants) -> u32 {
    match kind {
        WindowKind::Immediate => constants.immediate_window_min,
        WindowKind::ShortTerm => constants.short_term_window_min,
        WindowKind::Overnight => constants.overnight_window_min,
    }
}

/// Scale a recommended duration for elevated risk, truncating toward zero
pub fn scale_for_risk(minutes: u32, risk: RiskLevel, constants: &ScoringConstants) -> u32 {
    let multiplier = match risk {
        RiskLevel::Red => constants.red_window_multiplier,
        RiskLevel::Yellow => constants.yellow_window_multiplier,
        RiskLevel::None => return minutes,
    };
    // 1e-9 absorbs float noise such as 20 × 1.1 = 22.000000000000004 or 21.999...
    (f64::from(minutes) * multiplier + 1e-9).floor().max(0.0) as u32
}

/// The immediate, short-term and overnight windows, in that order.
///
/// ROI is computed on the base duration; only the recommendation is lengthened
/// when risk is elevated.
pub fn recovery_windows(
    fatigue: u8,
    sleep_hours: f64,
    risk: RiskLevel,
    constants: &ScoringConstants,
) -> [RecoveryWindow; 3] {
    WindowKind::ALL.map(|kind| {
        let minutes = base_minutes(kind, constants);
        RecoveryWindow {
            kind,
            label: kind.label().to_string(),
            recommend_min: scale_for_risk(minutes, risk, constants),
            expected_roi_pct: roi_for_rest(fatigue, minutes, sleep_hours, constants),
            note: Some(kind.note().to_string()),
        }
    })
}
