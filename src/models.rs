use serde::{Deserialize, Serialize};
use std::fmt;

/// One workout plus the sleep, environment and load history around it.
///
/// History fields (`last7_load`, `last28_load`, `hi_streak_days`) are supplied
/// by the caller; scoring never looks anything up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSample {
    /// Session duration in minutes
    pub duration_min: f64,

    /// Average heart rate in bpm
    #[serde(default)]
    pub avg_hr: Option<u16>,

    /// Maximum heart rate in bpm
    #[serde(default)]
    pub max_hr: Option<u16>,

    /// Rate of perceived exertion (0-10)
    #[serde(default)]
    pub rpe: Option<f64>,

    /// Hours slept the night before
    pub sleep_hours: f64,

    /// Subjective sleep quality (1-5)
    #[serde(default = "default_sleep_quality")]
    pub sleep_quality: Option<u8>,

    /// Ambient temperature in °C
    #[serde(default)]
    pub temp_c: Option<f64>,

    /// Relative humidity in percent
    #[serde(default)]
    pub humidity: Option<f64>,

    /// Cumulative load over the trailing 7 days
    #[serde(default)]
    pub last7_load: f64,

    /// Cumulative load over the trailing 28 days
    #[serde(default)]
    pub last28_load: f64,

    /// Consecutive high-intensity days
    #[serde(default)]
    pub hi_streak_days: u32,
}

fn default_sleep_quality() -> Option<u8> {
    Some(3)
}

impl Default for WorkoutSample {
    fn default() -> Self {
        Self {
            duration_min: 0.0,
            avg_hr: None,
            max_hr: None,
            rpe: None,
            sleep_hours: 0.0,
            sleep_quality: default_sleep_quality(),
            temp_c: None,
            humidity: None,
            last7_load: 0.0,
            last28_load: 0.0,
            hi_streak_days: 0,
        }
    }
}

impl WorkoutSample {
    /// Sample assumed for the next-session outlook when a report has no sessions
    pub fn report_default() -> Self {
        Self {
            duration_min: 0.0,
            avg_hr: Some(120),
            max_hr: Some(190),
            rpe: Some(3.0),
            sleep_hours: 7.0,
            temp_c: Some(22.0),
            humidity: Some(40.0),
            ..Self::default()
        }
    }
}

/// Overtraining risk bucket, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[serde(alias = "green")]
    None,
    Yellow,
    Red,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::None => write!(f, "none"),
            RiskLevel::Yellow => write!(f, "yellow"),
            RiskLevel::Red => write!(f, "red"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "green" => Ok(RiskLevel::None),
            "yellow" => Ok(RiskLevel::Yellow),
            "red" => Ok(RiskLevel::Red),
            _ => Err(format!("Invalid risk level: {}", s)),
        }
    }
}

/// Fatigue score with its risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatigueResult {
    /// Fatigue score in [0, 100]
    pub score: u8,
    pub risk: RiskLevel,
}

/// The three canonical recovery opportunities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Immediate,
    ShortTerm,
    Overnight,
}

impl WindowKind {
    /// All kinds in recommendation order
    pub const ALL: [WindowKind; 3] = [
        WindowKind::Immediate,
        WindowKind::ShortTerm,
        WindowKind::Overnight,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WindowKind::Immediate => "immediate",
            WindowKind::ShortTerm => "short-term",
            WindowKind::Overnight => "overnight",
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            WindowKind::Immediate => "Short breathing + stretching",
            WindowKind::ShortTerm => "20-minute nap or contrast shower",
            WindowKind::Overnight => "7-9 hours of sleep",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A recommended rest block and the benefit expected from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryWindow {
    pub kind: WindowKind,
    pub label: String,

    /// Recommended rest in minutes, already scaled for risk
    pub recommend_min: u32,

    /// Expected recovery benefit in percent, in [0, 50]
    pub expected_roi_pct: u8,

    pub note: Option<String>,
}

/// Full scoring outcome for a single workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub fatigue_score: u8,

    #[serde(rename = "overtraining_risk")]
    pub risk: RiskLevel,

    pub sleep_debt: f64,

    /// Load of the scored session itself
    pub session_load: f64,

    #[serde(rename = "recovery_windows")]
    pub windows: [RecoveryWindow; 3],
}

impl Prediction {
    pub fn fatigue(&self) -> FatigueResult {
        FatigueResult {
            score: self.fatigue_score,
            risk: self.risk,
        }
    }
}

/// Per-day load versus recovery in a weekly report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRatio {
    /// 1-indexed day label ("D1", "D2", ...)
    pub day: String,
    pub workout_load: f64,
    pub recovery_load: f64,
    pub ratio: f64,
}

/// Rest accrual tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::Bronze => write!(f, "Bronze"),
            Badge::Silver => write!(f, "Silver"),
            Badge::Gold => write!(f, "Gold"),
        }
    }
}

/// Recovery efficiency over a reporting window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    #[serde(rename = "recovery_efficiency_score")]
    pub efficiency_score: u8,

    #[serde(rename = "weekly_recovery_ratio")]
    pub days: Vec<DayRatio>,

    pub expected_next_performance_change_pct: u8,

    #[serde(rename = "rest_accrual_badge")]
    pub badge: Badge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_defaults_from_json() {
        let sample: WorkoutSample =
            serde_json::from_str(r#"{"duration_min": 45, "sleep_hours": 7.5}"#).unwrap();
        assert_eq!(sample.duration_min, 45.0);
        assert_eq!(sample.sleep_quality, Some(3));
        assert_eq!(sample.last28_load, 0.0);
        assert_eq!(sample.hi_streak_days, 0);
        assert!(sample.avg_hr.is_none());
    }

    #[test]
    fn test_risk_ordering() {
        assert!(RiskLevel::Red > RiskLevel::Yellow);
        assert!(RiskLevel::Yellow > RiskLevel::None);
        assert_eq!("green".parse::<RiskLevel>().unwrap(), RiskLevel::None);
        assert_eq!(serde_json::to_string(&RiskLevel::Red).unwrap(), "\"red\"");
    }

    #[test]
    fn test_report_default_sample() {
        let sample = WorkoutSample::report_default();
        assert_eq!(sample.max_hr, Some(190));
        assert_eq!(sample.humidity, Some(40.0));
        assert_eq!(sample.last7_load, 0.0);
    }
}
