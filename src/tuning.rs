//! Data-driven game balance
//!
//! Every timing and scoring constant lives here so a round can be
//! re-balanced from a JSON file without touching the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Longest allowed round (seconds)
pub const MAX_ROUND_SECS: i32 = 3600;
/// Longest allowed timer interval or delay (ms)
pub const MAX_DURATION_MS: u64 = 3_600_000;

/// Balance constants for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Countdown ===
    /// Time budget at round start (seconds)
    pub round_secs: i32,
    /// Normal countdown cadence (ms)
    pub tick_ms: u64,
    /// Seconds removed per normal tick
    pub tick_decrement: i32,

    // === Rush ===
    /// Probability that a round opens with a rush (0.0 - 1.0)
    pub rush_chance: f64,
    /// Rush countdown cadence (ms)
    pub rush_tick_ms: u64,
    /// Seconds removed per rush tick
    pub rush_decrement: i32,
    /// How long a rush lasts (ms)
    pub rush_duration_ms: u64,

    // === Pairs ===
    /// Delay before an evaluated pair is hidden again (ms)
    pub resolve_delay_ms: u64,
    /// Points for a recyclable match
    pub match_points: i32,
    /// Points lost when a contaminant is part of a pair
    pub contaminant_penalty: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            round_secs: 60,
            tick_ms: 1000,
            tick_decrement: 1,

            rush_chance: 0.3,
            rush_tick_ms: 500,
            rush_decrement: 2,
            rush_duration_ms: 5000,

            resolve_delay_ms: 1000,
            match_points: 10,
            contaminant_penalty: 5,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document. Missing fields use defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(0.0..=1.0).contains(&self.rush_chance) {
            return Err(TuningError::Invalid(format!(
                "rush_chance must be within [0, 1], got {}",
                self.rush_chance
            )));
        }
        if self.round_secs <= 0 || self.round_secs > MAX_ROUND_SECS {
            return Err(TuningError::Invalid(format!(
                "round_secs must be within 1..={}, got {}",
                MAX_ROUND_SECS, self.round_secs
            )));
        }
        if self.tick_decrement <= 0 || self.rush_decrement <= 0 {
            return Err(TuningError::Invalid(format!(
                "countdown decrements must be positive, got {} and {}",
                self.tick_decrement, self.rush_decrement
            )));
        }
        let intervals = [
            ("tick_ms", self.tick_ms),
            ("rush_tick_ms", self.rush_tick_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(TuningError::Invalid(format!("{} must be non-zero", name)));
            }
        }
        let durations = [
            ("tick_ms", self.tick_ms),
            ("rush_tick_ms", self.rush_tick_ms),
            ("rush_duration_ms", self.rush_duration_ms),
            ("resolve_delay_ms", self.resolve_delay_ms),
        ];
        for (name, value) in durations {
            if value > MAX_DURATION_MS {
                return Err(TuningError::Invalid(format!(
                    "{} must be at most {}ms, got {}",
                    name, MAX_DURATION_MS, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.round_secs, 60);
        assert_eq!(tuning.rush_decrement, 2);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "round_secs": 90, "rush_chance": 1.0 }"#).unwrap();
        assert_eq!(tuning.round_secs, 90);
        assert_eq!(tuning.rush_chance, 1.0);
        assert_eq!(tuning.tick_ms, 1000);
        assert_eq!(tuning.match_points, 10);
    }

    #[test]
    fn test_round_trips_through_json() {
        let tuning = Tuning {
            contaminant_penalty: 7,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "rush_chance": 1.5 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "tick_ms": 0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "rush_tick_ms": 0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "round_secs": 0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "round_secs": 3601 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "tick_decrement": 0, "rush_chance": 0.0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "rush_decrement": -2 }"#),
            Err(TuningError::Invalid(_))
        ));
        for field in ["tick_ms", "rush_tick_ms", "rush_duration_ms", "resolve_delay_ms"] {
            let json = format!(r#"{{ "{}": 18446744073709551615 }}"#, field);
            assert!(
                matches!(Tuning::from_json(&json), Err(TuningError::Invalid(_))),
                "{} should be bounded",
                field
            );
        }
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
        assert!(matches!(
            Tuning::load("/nonexistent/recycle-rush.json"),
            Err(TuningError::Io(_))
        ));
    }
}
