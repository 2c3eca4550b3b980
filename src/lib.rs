// Library interface for recoverrs
// The CLI and the integration tests both go through this crate root

pub mod baseline;
pub mod coach;
pub mod config;
pub mod constants;
pub mod database;
pub mod engine;
pub mod error;
pub mod export;
pub mod fatigue;
pub mod guard;
pub mod load;
pub mod logging;
pub mod models;
pub mod report;
pub mod risk;
pub mod roi;
pub mod routines;
pub mod validation;

// Re-export commonly used types for convenience
pub use models::*;
pub use baseline::{Baseline, BaselineProfile, BaselineProvider, BaselineTable, FatigueDelta, Gender};
pub use config::AppConfig;
pub use constants::ScoringConstants;
pub use database::Database;
pub use engine::ScoringEngine;
pub use error::{DatabaseError, RecoverError, Result};
pub use fatigue::FatigueBreakdown;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use validation::{SampleValidator, ValidationError};
