//! Game settings and difficulty presets
//!
//! Everything here is tunable balance, not load-bearing: the simulation reads
//! these values instead of the `consts` defaults so a JSON file can override
//! any of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// Difficulty levels offered on the title screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Gameplay tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Session ===
    /// Fixed simulation step (ms)
    pub frame_ms: u64,
    pub starting_lives: u32,
    pub player_speed: f32,

    // === Webs ===
    pub max_webs: usize,
    pub min_web_lifespan_ms: u64,
    pub max_web_lifespan_ms: u64,
    pub large_area: f32,

    // === Glass ===
    pub glass_follow_speed: f32,

    // === Spawning ===
    pub coin_interval_ms: u64,
    pub max_coins: usize,
    pub spray_interval_ms: u64,
    pub max_sprays: usize,
    pub max_gas: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,

            frame_ms: FRAME_MS,
            starting_lives: STARTING_LIVES,
            player_speed: PLAYER_SPEED,

            max_webs: MAX_WEBS,
            min_web_lifespan_ms: MIN_WEB_LIFESPAN_MS,
            max_web_lifespan_ms: MAX_WEB_LIFESPAN_MS,
            large_area: LARGE_AREA,

            glass_follow_speed: GLASS_FOLLOW_SPEED,

            coin_interval_ms: COIN_INTERVAL_MS,
            max_coins: MAX_COINS,
            spray_interval_ms: SPRAY_INTERVAL_MS,
            max_sprays: MAX_SPRAYS,
            max_gas: MAX_GAS,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_difficulty(difficulty);
        settings
    }

    /// Apply a difficulty preset (updates difficulty-dependent settings)
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;

        // Hard mode: fewer, shorter webs and a faster, more frequent threat
        if difficulty == Difficulty::Hard {
            self.starting_lives = 1;
            self.max_webs = 3;
            self.max_web_lifespan_ms = 6000;
            self.glass_follow_speed = 1.5;
            self.spray_interval_ms = 8000;
            self.max_sprays = 3;
        }
    }

    /// Parse settings from JSON.
    ///
    /// Missing fields come from the preset for the file's `difficulty`
    /// (Easy when absent); fields present in the file override the preset.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(fields) = overrides else {
            return Err(SimError::Config("settings must be a JSON object".into()));
        };
        let difficulty = match fields.get("difficulty") {
            Some(value) => Difficulty::deserialize(value)?,
            None => Difficulty::default(),
        };

        let mut merged = serde_json::to_value(Self::for_difficulty(difficulty))?;
        if let Some(base) = merged.as_object_mut() {
            base.extend(fields);
        }
        let settings: Settings = serde_json::from_value(merged)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<()> {
        if self.frame_ms == 0 {
            return Err(SimError::Config("frame_ms must be non-zero".into()));
        }
        if self.starting_lives == 0 {
            return Err(SimError::Config("starting_lives must be non-zero".into()));
        }
        if self.max_webs == 0 || self.max_coins == 0 || self.max_sprays == 0 || self.max_gas == 0
        {
            return Err(SimError::Config("population caps must be non-zero".into()));
        }
        if self.min_web_lifespan_ms > self.max_web_lifespan_ms {
            return Err(SimError::Config(format!(
                "min_web_lifespan_ms {} exceeds max_web_lifespan_ms {}",
                self.min_web_lifespan_ms, self.max_web_lifespan_ms
            )));
        }
        if self.large_area <= 0.0 {
            return Err(SimError::Config("large_area must be positive".into()));
        }
        if self.player_speed <= 0.0 || self.glass_follow_speed <= 0.0 {
            return Err(SimError::Config("speeds must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Settings::default().validate().is_ok());
        assert!(Settings::for_difficulty(Difficulty::Hard).validate().is_ok());
    }

    #[test]
    fn test_hard_is_harder() {
        let easy = Settings::for_difficulty(Difficulty::Easy);
        let hard = Settings::for_difficulty(Difficulty::Hard);
        assert!(hard.starting_lives < easy.starting_lives);
        assert!(hard.max_webs < easy.max_webs);
        assert!(hard.spray_interval_ms < easy.spray_interval_ms);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json_str(r#"{ "max_webs": 2, "difficulty": "Hard" }"#)
            .expect("valid json");
        assert_eq!(settings.max_webs, 2);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.frame_ms, FRAME_MS);
    }

    #[test]
    fn test_hard_in_json_applies_preset() {
        let settings = Settings::from_json_str(r#"{ "difficulty": "Hard" }"#).expect("valid json");
        assert_eq!(settings, Settings::for_difficulty(Difficulty::Hard));
        assert_eq!(settings.starting_lives, 1);
        assert_eq!(settings.max_webs, 3);
    }

    #[test]
    fn test_fields_override_preset() {
        let settings =
            Settings::from_json_str(r#"{ "difficulty": "Hard", "starting_lives": 2 }"#)
                .expect("valid json");
        assert_eq!(settings.starting_lives, 2);
        assert_eq!(settings.max_sprays, 3);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = Settings::for_difficulty(Difficulty::Hard);
        settings.coin_interval_ms = 1234;
        settings.player_speed = 2.5;
        let json = settings.to_json().expect("serializable");
        let loaded = Settings::from_json_str(&json).expect("valid json");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_rejects_non_object() {
        let err = Settings::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_rejects_inverted_lifespans() {
        let err = Settings::from_json_str(
            r#"{ "min_web_lifespan_ms": 9000, "max_web_lifespan_ms": 1000 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("nightmare"), None);
    }
}
