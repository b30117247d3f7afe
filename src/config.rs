use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// When the first countdown begins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockStart {
    /// Nobody's time runs until the first move is made; then the opponent's starts.
    #[default]
    AfterFirstMove,
    /// The side to move is on the clock from the start of the game.
    Immediately,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seconds_per_side: u32,
    pub clock_start: ClockStart,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            seconds_per_side: 30 * 60,
            clock_start: ClockStart::AfterFirstMove,
        }
    }
}

impl GameConfig {
    pub fn with_seconds(seconds_per_side: u32) -> Self {
        GameConfig {
            seconds_per_side,
            ..Self::default()
        }
    }

    /// Parse a JSON config; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seconds_per_side == 0 {
            return Err(ConfigError::ZeroTimeControl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_thirty_minutes() {
        let config = GameConfig::default();
        assert_eq!(config.seconds_per_side, 1800);
        assert_eq!(config.clock_start, ClockStart::AfterFirstMove);
    }

    #[test]
    fn parses_partial_json() {
        let config = GameConfig::from_json(r#"{ "clock_start": "immediately" }"#).unwrap();
        assert_eq!(config.seconds_per_side, 1800);
        assert_eq!(config.clock_start, ClockStart::Immediately);

        let config = GameConfig::from_json(r#"{ "seconds_per_side": 300 }"#).unwrap();
        assert_eq!(config.seconds_per_side, 300);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "seconds_per_side": 0 }"#),
            Err(ConfigError::ZeroTimeControl)
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "seconds_per_side": "soon" }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
