//! Run settings for line planning.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Settings that shape how lines are planned for synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minimum classifier confidence for a line to count as a vocalization.
    pub min_vocalization_confidence: f32,
    /// Speakers whose lines get keyword-based emotion inference.
    pub auto_emotion_speakers: Vec<String>,
    /// Skip lines that already have a professional recording.
    pub skip_prevoiced: bool,
    /// Voice used when a speaker's entry names none.
    pub default_voice: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_vocalization_confidence: 0.6,
            auto_emotion_speakers: vec!["ilyich".to_string()],
            skip_prevoiced: true,
            default_voice: "narrator".to_string(),
        }
    }
}

impl Settings {
    pub fn load_from_ron(path: &Path) -> Result<Settings, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = ron::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_vocalization_confidence) {
            return Err(ConfigError::Invalid(format!(
                "min_vocalization_confidence must be within 0.0..=1.0, got {}",
                self.min_vocalization_confidence
            )));
        }
        if self.default_voice.trim().is_empty() {
            return Err(ConfigError::Invalid("default_voice must not be empty".to_string()));
        }
        Ok(())
    }

    /// Whether `speaker` gets automatic emotion inference (case-insensitive).
    pub fn auto_emotion_for(&self, speaker: &str) -> bool {
        self.auto_emotion_speakers
            .iter()
            .any(|s| s.eq_ignore_ascii_case(speaker.trim()))
    }
}
