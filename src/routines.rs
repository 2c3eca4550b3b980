//! Short recovery routines
//!
//! A fixed catalog of breathing, stretching, contrast and nap routines, filtered
//! by the kind of fatigue being addressed. Windy weather adds a walk.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wind speed (m/s) from which an outdoor walk is suggested
pub const WALK_WIND_THRESHOLD: f64 = 5.0;

/// Maximum number of routines returned
pub const MAX_ROUTINES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineKind {
    Breathing,
    Stretch,
    Contrast,
    Nap,
    Walk,
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoutineKind::Breathing => "breathing",
            RoutineKind::Stretch => "stretch",
            RoutineKind::Contrast => "contrast",
            RoutineKind::Nap => "nap",
            RoutineKind::Walk => "walk",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for RoutineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breathing" => Ok(RoutineKind::Breathing),
            "stretch" => Ok(RoutineKind::Stretch),
            "contrast" => Ok(RoutineKind::Contrast),
            "nap" => Ok(RoutineKind::Nap),
            "walk" => Ok(RoutineKind::Walk),
            _ => Err(format!("Invalid routine kind: {}", s)),
        }
    }
}

/// Which system the recovery should target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatigueFocus {
    /// Local muscular fatigue
    Muscle,
    /// Central nervous system fatigue
    Central,
    /// Heat strain
    Heat,
}

impl std::str::FromStr for FatigueFocus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "muscle" => Ok(FatigueFocus::Muscle),
            "central" => Ok(FatigueFocus::Central),
            "heat" => Ok(FatigueFocus::Heat),
            _ => Err(format!("Invalid fatigue focus: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub title: String,
    pub minutes: u32,
    #[serde(rename = "type")]
    pub kind: RoutineKind,
    pub steps: Vec<String>,
}

impl Routine {
    fn new(title: &str, minutes: u32, kind: RoutineKind, steps: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            minutes,
            kind,
            steps: steps.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The base catalog, in presentation order
pub fn catalog() -> Vec<Routine> {
    vec![
        Routine::new(
            "4-7-8 breathing",
            3,
            RoutineKind::Breathing,
            &["Inhale for 4 seconds", "Hold for 7 seconds", "Exhale for 8 seconds", "Repeat 5 times"],
        ),
        Routine::new(
            "Lower-body stretch",
            5,
            RoutineKind::Stretch,
            &["Hamstrings 60 seconds", "Calves 60 seconds", "Glutes 60 seconds", "3 sets"],
        ),
        Routine::new(
            "Contrast hot/cold",
            6,
            RoutineKind::Contrast,
            &["Cold for 1 minute", "Warm for 2 minutes", "3 sets"],
        ),
        Routine::new(
            "Power nap",
            10,
            RoutineKind::Nap,
            &["Dim the lights", "Set a 20-minute timer", "Walk lightly after waking"],
        ),
    ]
}

fn walk() -> Routine {
    Routine::new("10-minute walk", 10, RoutineKind::Walk, &["Walk easily into the wind"])
}

/// Routines for a fatigue focus, with a walk added when it is windy
pub fn recommend_routines(focus: Option<FatigueFocus>, wind_speed: Option<f64>) -> Vec<Routine> {
    let base = catalog();
    let of_kinds = |kinds: &[RoutineKind]| -> Vec<Routine> {
        base.iter().filter(|r| kinds.contains(&r.kind)).cloned().collect()
    };

    let mut routines = match focus {
        None => base.clone(),
        Some(FatigueFocus::Muscle) => {
            let mut out = of_kinds(&[RoutineKind::Stretch, RoutineKind::Contrast]);
            out.push(base[0].clone());
            out
        }
        Some(FatigueFocus::Central) => of_kinds(&[RoutineKind::Breathing, RoutineKind::Nap]),
        Some(FatigueFocus::Heat) => of_kinds(&[RoutineKind::Contrast, RoutineKind::Breathing]),
    };

    if wind_speed.is_some_and(|wind| wind >= WALK_WIND_THRESHOLD) {
        routines.push(walk());
    }

    routines.truncate(MAX_ROUTINES);
    routines
}
