//! Two-week overtraining guard calendar
//!
//! Flags the habitually heavy days of the week: Wednesdays and Saturdays are
//! yellow, and Saturdays in the first eight days are red.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize, Serializer};

use crate::models::RiskLevel;

/// Number of days covered by the calendar
pub const GUARD_DAYS: i64 = 14;

/// Saturdays at or before this offset from the start are red
const RED_SATURDAY_HORIZON: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardDay {
    pub date: NaiveDate,

    /// Serialized as green/yellow/red
    #[serde(serialize_with = "serialize_guard_risk")]
    pub risk: RiskLevel,
}

/// Calendar color of a guard day; a day without risk is green
pub fn guard_label(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::None => "green",
        RiskLevel::Yellow => "yellow",
        RiskLevel::Red => "red",
    }
}

fn serialize_guard_risk<S: Serializer>(risk: &RiskLevel, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(guard_label(*risk))
}

/// Guard calendar for the 14 days starting at `start`
pub fn guard_calendar(start: NaiveDate) -> Vec<GuardDay> {
    (0..GUARD_DAYS)
        .map(|offset| {
            let date = start + Duration::days(offset);
            GuardDay {
                date,
                risk: risk_for_day(date.weekday(), offset),
            }
        })
        .collect()
}

fn risk_for_day(weekday: Weekday, offset: i64) -> RiskLevel {
    match weekday {
        Weekday::Sat if offset <= RED_SATURDAY_HORIZON => RiskLevel::Red,
        Weekday::Wed | Weekday::Sat => RiskLevel::Yellow,
        _ => RiskLevel::None,
    }
}
