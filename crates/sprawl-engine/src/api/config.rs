use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;
use crate::assets::catalog::TileCatalog;
use crate::extensions::transition::TransitionLaw;

/// Everything a growth session needs, loadable from one JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Seed for every random stream in the session.
    pub seed: u64,
    /// Weighted tile templates (and optional seed tiles).
    pub catalog: TileCatalog,
    /// When and where growth happens.
    pub trigger: TriggerConfig,
    /// How newly attached tiles animate into place.
    pub transition: TransitionConfig,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            catalog: TileCatalog::default(),
            trigger: TriggerConfig::default(),
            transition: TransitionConfig::default(),
        }
    }
}

impl GrowthConfig {
    /// Parse a configuration from a JSON string. Does not validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every section; the first problem wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog.validate()?;
        self.trigger.validate()?;
        self.transition.validate()
    }
}

/// Trigger policy selection and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerConfig {
    /// Fixed cadence: one bounded search every `interval` seconds.
    Timed {
        #[serde(default = "default_interval")]
        interval: f32,
    },
    /// Grow every free connector within `radius` of an anchor.
    Proximity {
        #[serde(default = "default_radius")]
        radius: f32,
    },
}

impl Default for TriggerConfig {
    fn default() -> Self {
        TriggerConfig::Timed { interval: default_interval() }
    }
}

impl TriggerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            TriggerConfig::Timed { interval } if !(interval.is_finite() && interval >= 0.0) => Err(
                ConfigError::InvalidTrigger(format!("interval must be finite and >= 0, got {interval}")),
            ),
            TriggerConfig::Proximity { radius } if !(radius.is_finite() && radius > 0.0) => Err(
                ConfigError::InvalidTrigger(format!("radius must be finite and > 0, got {radius}")),
            ),
            _ => Ok(()),
        }
    }
}

/// Transition rate and easing law for attached tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Progress per second; 1.0 means a one-second transition.
    #[serde(default = "default_rate")]
    pub rate: f32,
    #[serde(default)]
    pub law: TransitionLaw,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            law: TransitionLaw::default(),
        }
    }
}

impl TransitionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate.is_finite() && self.rate > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidTransition(format!(
                "rate must be finite and > 0, got {}",
                self.rate
            )))
        }
    }
}

fn default_interval() -> f32 {
    1.0
}

fn default_radius() -> f32 {
    4.0
}

fn default_rate() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_proximity_config() {
        let json = r#"{
            "seed": 7,
            "trigger": { "kind": "proximity", "radius": 5.0 },
            "transition": { "rate": 2.0, "law": { "kind": "linear_slide", "offset": [0.0, -10.0, 0.0] } }
        }"#;
        let config = GrowthConfig::from_json(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.trigger, TriggerConfig::Proximity { radius: 5.0 });
        assert_eq!(config.transition.rate, 2.0);
        assert!(matches!(config.transition.law, TransitionLaw::LinearSlide { .. }));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = GrowthConfig::from_json("{}").unwrap();
        assert_eq!(config.seed, 1);
        assert_eq!(config.trigger, TriggerConfig::Timed { interval: 1.0 });
        assert_eq!(config.transition.rate, 1.0);
    }

    #[test]
    fn timed_interval_defaults_when_omitted() {
        let config = GrowthConfig::from_json(r#"{ "trigger": { "kind": "timed" } }"#).unwrap();
        assert_eq!(config.trigger, TriggerConfig::Timed { interval: 1.0 });
    }

    #[test]
    fn rejects_bad_trigger_parameters() {
        assert!(TriggerConfig::Timed { interval: -1.0 }.validate().is_err());
        assert!(TriggerConfig::Timed { interval: 0.0 }.validate().is_ok());
        assert!(TriggerConfig::Proximity { radius: 0.0 }.validate().is_err());
        assert!(TriggerConfig::Proximity { radius: f32::NAN }.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_rate() {
        let transition = TransitionConfig { rate: 0.0, ..TransitionConfig::default() };
        assert!(matches!(transition.validate(), Err(ConfigError::InvalidTransition(_))));
    }

    #[test]
    fn default_config_fails_on_empty_catalog() {
        assert!(matches!(GrowthConfig::default().validate(), Err(ConfigError::EmptyCatalog)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(GrowthConfig::from_json("{ seed: }"), Err(ConfigError::Parse(_))));
    }
}
