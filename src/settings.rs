//! Simulation settings
//!
//! Loaded from JSON; any missing field falls back to the defaults in
//! [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// What a disk does when it reaches the viewport edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Bounce off all four edges; launch in any diagonal direction
    BounceBoth,
    /// Bounce off the sides, drift upward, reappear at the bottom after
    /// leaving through the top
    #[default]
    UpwardRespawn,
}

impl EdgePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgePolicy::BounceBoth => "bounce_both",
            EdgePolicy::UpwardRespawn => "upward_respawn",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bounce_both" | "bounce" | "both" => Some(EdgePolicy::BounceBoth),
            "upward_respawn" | "upward" | "respawn" => Some(EdgePolicy::UpwardRespawn),
            _ => None,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Disks spawned at startup
    pub disk_count: usize,

    // === Spawn ranges (min inclusive, max exclusive) ===
    pub radius_min: f32,
    pub radius_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,

    // === Behavior ===
    pub edge_policy: EdgePolicy,
    /// Flash duration after a collision
    pub flash_ms: u64,
    /// Clicking a disk removes it
    pub click_removal: bool,

    /// RNG seed; a fresh one is picked by the host when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            disk_count: DISK_COUNT,
            radius_min: RADIUS_MIN,
            radius_max: RADIUS_MAX,
            speed_min: SPEED_MIN,
            speed_max: SPEED_MAX,
            edge_policy: EdgePolicy::default(),
            flash_ms: FLASH_MS,
            click_removal: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Defaults with a different edge policy
    pub fn with_policy(policy: EdgePolicy) -> Self {
        Self {
            edge_policy: policy,
            ..Self::default()
        }
    }

    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a JSON settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every range is usable
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.radius_min > 0.0) {
            return Err(SimError::invalid("radius_min", "must be positive"));
        }
        if !(self.radius_max > self.radius_min) {
            return Err(SimError::invalid("radius_max", "must exceed radius_min"));
        }
        if !(self.speed_min > 0.0) {
            return Err(SimError::invalid("speed_min", "must be positive"));
        }
        if !(self.speed_max > self.speed_min) {
            return Err(SimError::invalid("speed_max", "must exceed speed_min"));
        }
        if !self.radius_max.is_finite() || !self.speed_max.is_finite() {
            return Err(SimError::invalid("radius_max/speed_max", "must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.disk_count, 10);
        assert_eq!((s.radius_min, s.radius_max), (20.0, 50.0));
        assert_eq!((s.speed_min, s.speed_max), (1.0, 5.0));
        assert_eq!(s.flash_ms, 100);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let s = Settings::from_json(r#"{ "edge_policy": "bounce_both", "seed": 42 }"#).unwrap();
        assert_eq!(s.edge_policy, EdgePolicy::BounceBoth);
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.disk_count, DISK_COUNT);
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings::with_policy(EdgePolicy::BounceBoth);
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        let err = Settings::from_json(r#"{ "radius_min": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidSetting { field: "radius_min", .. }));

        let err = Settings::from_json(r#"{ "speed_min": 6 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidSetting { field: "speed_max", .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SimError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SimError::Io { .. }));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(EdgePolicy::from_str("Bounce"), Some(EdgePolicy::BounceBoth));
        assert_eq!(EdgePolicy::from_str("upward"), Some(EdgePolicy::UpwardRespawn));
        assert_eq!(EdgePolicy::from_str("sideways"), None);
        assert_eq!(
            EdgePolicy::from_str(EdgePolicy::BounceBoth.as_str()),
            Some(EdgePolicy::BounceBoth)
        );
    }
}
