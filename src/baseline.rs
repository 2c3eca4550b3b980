//! Reference fatigue baselines
//!
//! A baseline is the typical fatigue score for a population band (age and
//! gender). Subtracting it from a computed score yields a relative delta. When
//! no baseline is known, a fixed fallback of 60 is used.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source label attached to the fallback baseline
pub const FALLBACK_SOURCE: &str = "fallback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f" | "female" => Ok(Gender::Female),
            "m" | "male" => Ok(Gender::Male),
            "other" | "x" => Ok(Gender::Other),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "female"),
            Gender::Male => write!(f, "male"),
            Gender::Other => write!(f, "other"),
        }
    }
}

/// Who a baseline is being looked up for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaselineProfile {
    pub age: Option<u8>,
    pub gender: Option<Gender>,
}

/// A reference score and where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub score: i32,
    pub source: String,
}

/// Fatigue relative to a reference baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueDelta {
    pub fatigue: u8,
    pub baseline: i32,
    pub source: String,
    pub delta: i32,
}

/// Compute `fatigue − baseline`, falling back to `fallback_score` when absent
pub fn fatigue_delta(fatigue: u8, baseline: Option<Baseline>, fallback_score: i32) -> FatigueDelta {
    let baseline = baseline.unwrap_or_else(|| Baseline {
        score: fallback_score,
        source: FALLBACK_SOURCE.to_string(),
    });

    FatigueDelta {
        fatigue,
        baseline: baseline.score,
        delta: i32::from(fatigue) - baseline.score,
        source: baseline.source,
    }
}

/// Anything that can answer "what is a typical fatigue score for this person"
pub trait BaselineProvider {
    /// `None` when the provider has nothing for this profile or is unreachable
    fn baseline_for(&self, profile: &BaselineProfile) -> Option<Baseline>;
}

/// One row of a banded reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineBand {
    pub min_age: u8,
    pub max_age: u8,

    /// `None` matches every gender
    #[serde(default)]
    pub gender: Option<Gender>,

    pub score: i32,
}

impl BaselineBand {
    fn matches(&self, age: u8, gender: Option<Gender>) -> bool {
        let age_ok = (self.min_age..=self.max_age).contains(&age);
        let gender_ok = match self.gender {
            None => true,
            Some(band_gender) => gender == Some(band_gender),
        };
        age_ok && gender_ok
    }
}

/// Baseline provider backed by an in-memory table of age/gender bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineTable {
    pub source: String,
    pub bands: Vec<BaselineBand>,
}

impl BaselineTable {
    pub fn new(source: impl Into<String>, bands: Vec<BaselineBand>) -> Self {
        Self {
            source: source.into(),
            bands,
        }
    }
}

/// Label of the built-in bands
pub const PLACEHOLDER_SOURCE: &str = "placeholder-table";

/// Built-in bands used until real ones are configured.
///
/// The scores are placeholder calibration values, not survey data; results
/// from them are labeled [`PLACEHOLDER_SOURCE`].
impl Default for BaselineTable {
    fn default() -> Self {
        let band = |min_age, max_age, gender, score| BaselineBand {
            min_age,
            max_age,
            gender,
            score,
        };
        Self::new(
            PLACEHOLDER_SOURCE,
            vec![
                band(10, 19, Some(Gender::Male), 52),
                band(10, 19, Some(Gender::Female), 55),
                band(20, 39, Some(Gender::Male), 56),
                band(20, 39, Some(Gender::Female), 58),
                band(40, 59, Some(Gender::Male), 61),
                band(40, 59, Some(Gender::Female), 63),
                band(60, 99, None, 66),
            ],
        )
    }
}

impl BaselineProvider for BaselineTable {
    fn baseline_for(&self, profile: &BaselineProfile) -> Option<Baseline> {
        let age = profile.age?;

        // Gender-specific bands win over catch-all ones
        let specific = self
            .bands
            .iter()
            .find(|band| band.gender.is_some() && band.matches(age, profile.gender));
        let band = specific.or_else(|| {
            self.bands
                .iter()
                .find(|band| band.gender.is_none() && band.matches(age, profile.gender))
        })?;

        Some(Baseline {
            score: band.score,
            source: self.source.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_when_absent() {
        let delta = fatigue_delta(75, None, 60);
        assert_eq!(delta.baseline, 60);
        assert_eq!(delta.delta, 15);
        assert_eq!(delta.source, FALLBACK_SOURCE);
    }

    #[test]
    fn test_supplied_baseline() {
        let baseline = Baseline {
            score: 80,
            source: "survey-2023".to_string(),
        };
        let delta = fatigue_delta(70, Some(baseline), 60);
        assert_eq!(delta.delta, -10);
        assert_eq!(delta.source, "survey-2023");
    }

    #[test]
    fn test_table_lookup() {
        let table = BaselineTable::default();
        let profile = BaselineProfile {
            age: Some(34),
            gender: Some(Gender::Female),
        };
        let baseline = table.baseline_for(&profile).unwrap();
        assert_eq!(baseline.score, 58);
        assert_eq!(baseline.source, PLACEHOLDER_SOURCE);

        let senior = BaselineProfile {
            age: Some(70),
            gender: Some(Gender::Male),
        };
        assert_eq!(table.baseline_for(&senior).unwrap().score, 66);
    }

    #[test]
    fn test_table_misses() {
        let table = BaselineTable::default();
        assert!(table.baseline_for(&BaselineProfile::default()).is_none());

        let unbanded = BaselineProfile {
            age: Some(30),
            gender: Some(Gender::Other),
        };
        assert!(table.baseline_for(&unbanded).is_none());

        let child = BaselineProfile {
            age: Some(5),
            gender: Some(Gender::Male),
        };
        assert!(table.baseline_for(&child).is_none());
    }
}
