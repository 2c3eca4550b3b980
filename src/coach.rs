use serde::{Deserialize, Serialize};

/// Coaching alerts shown alongside the daily recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachInsights {
    pub alerts: Vec<String>,
}

pub fn coach_insights() -> CoachInsights {
    CoachInsights {
        alerts: vec![
            "Muscle fatigue at 75% -> lower-body recovery routine recommended".to_string(),
            "Incline run planned tomorrow -> focus on lower-body recovery today".to_string(),
            "Sleep debt of 1.5 hours -> try a 20-minute power nap".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_alerts() {
        let insights = coach_insights();
        assert_eq!(insights.alerts.len(), 3);
        assert!(insights.alerts[2].contains("power nap"));
    }
}
