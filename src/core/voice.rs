//! Voice table: per-speaker synthesis configuration.
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::schema::emotion::EmotionPreset;
use crate::schema::vocalization::VocalizationCategory;

/// Reserved key for the configuration used by unlisted speakers.
pub const DEFAULT_ENTRY: &str = "_default_";
/// Reserved key for the global per-category emotion presets.
pub const GENERIC_EMOTIONS_ENTRY: &str = "_generic_emotions_";

/// Synthesis settings for one speaker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfiguration {
    /// Reference recording; preferred over `voice` when both are set.
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    /// Named engine voice.
    #[serde(default)]
    pub voice: Option<String>,
    /// Presets keyed by vocalization category; the `generic` key is the
    /// character-wide fallback.
    #[serde(default)]
    pub emotion_presets: FxHashMap<String, EmotionPreset>,
    #[serde(default)]
    pub speed: Option<f32>,
    /// Semitone shift applied after synthesis.
    #[serde(default, alias = "pitch")]
    pub pitch_shift: Option<f32>,
    #[serde(default)]
    pub emo_alpha: Option<f32>,
}

impl VoiceConfiguration {
    /// A configuration that only names an engine voice.
    pub fn named(voice: impl Into<String>) -> Self {
        Self {
            voice: Some(voice.into()),
            ..Self::default()
        }
    }

    /// The base voice reference, if the entry names one.
    pub fn base_voice(&self) -> Option<&str> {
        fn named(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.trim().is_empty())
        }
        named(&self.reference).or_else(|| named(&self.voice))
    }

    /// This speaker's preset for exactly `category`.
    pub fn preset_for(&self, category: VocalizationCategory) -> Option<&EmotionPreset> {
        self.emotion_presets.get(category.key())
    }

    /// This speaker's catch-all preset.
    pub fn generic_preset(&self) -> Option<&EmotionPreset> {
        self.preset_for(VocalizationCategory::Generic)
    }
}

static EMPTY_CONFIGURATION: Lazy<VoiceConfiguration> = Lazy::new(VoiceConfiguration::default);

/// Speaker name to configuration, plus the shared default and global presets.
#[derive(Debug, Clone, Default)]
pub struct VoiceTable {
    speakers: FxHashMap<String, VoiceConfiguration>,
    default: Option<VoiceConfiguration>,
    generic_emotions: FxHashMap<String, EmotionPreset>,
}

/// Native RON layout of a voice table file.
#[derive(Debug, Default, Deserialize)]
struct RonVoiceFile {
    #[serde(default)]
    default: Option<VoiceConfiguration>,
    #[serde(default)]
    generic_emotions: FxHashMap<String, EmotionPreset>,
    #[serde(default)]
    speakers: FxHashMap<String, VoiceConfiguration>,
}

impl VoiceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, speaker: impl Into<String>, config: VoiceConfiguration) {
        self.speakers.insert(speaker.into(), config);
    }

    pub fn set_default(&mut self, config: VoiceConfiguration) {
        self.default = Some(config);
    }

    pub fn set_generic_emotion(&mut self, category: VocalizationCategory, preset: EmotionPreset) {
        self.generic_emotions.insert(category.key().to_string(), preset);
    }

    /// The configuration registered under exactly this speaker name.
    pub fn get(&self, speaker: &str) -> Option<&VoiceConfiguration> {
        self.speakers.get(speaker)
    }

    /// Resolve a speaker's configuration: exact name, then a case-insensitive
    /// match, then the `_default_` entry, then an empty configuration.
    pub fn lookup(&self, speaker: &str) -> &VoiceConfiguration {
        if let Some(config) = self.speakers.get(speaker) {
            return config;
        }
        self.speakers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(speaker))
            .map(|(_, config)| config)
            .or(self.default.as_ref())
            .unwrap_or(&*EMPTY_CONFIGURATION)
    }

    /// The global preset for a category, shared by every speaker.
    pub fn generic_emotion(&self, category: VocalizationCategory) -> Option<&EmotionPreset> {
        self.generic_emotions.get(category.key())
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    pub fn speakers(&self) -> impl Iterator<Item = &str> {
        self.speakers.keys().map(String::as_str)
    }

    /// Load a voice table, choosing the format from the file extension
    /// (`.json` for the legacy speaker map, anything else as RON).
    pub fn load(path: &Path) -> Result<VoiceTable, VoiceError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::load_from_json(path),
            _ => Self::load_from_ron(path),
        }
    }

    pub fn load_from_ron(path: &Path) -> Result<VoiceTable, VoiceError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<VoiceTable, VoiceError> {
        let file: RonVoiceFile = ron::from_str(input)?;
        Ok(VoiceTable {
            speakers: file.speakers,
            default: file.default,
            generic_emotions: file.generic_emotions,
        })
    }

    pub fn load_from_json(path: &Path) -> Result<VoiceTable, VoiceError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_json(&contents)
    }

    /// Parse the legacy JSON speaker map. Values are either a bare voice name
    /// or a configuration object; `_default_` and `_generic_emotions_` are
    /// reserved keys.
    pub fn parse_json(input: &str) -> Result<VoiceTable, VoiceError> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(input)?;
        let mut table = VoiceTable::new();

        for (name, value) in raw {
            match name.as_str() {
                GENERIC_EMOTIONS_ENTRY => {
                    table.generic_emotions = serde_json::from_value(value)?;
                }
                DEFAULT_ENTRY => {
                    table.default = Some(entry_from_json(&name, value)?);
                }
                _ => {
                    let config = entry_from_json(&name, value)?;
                    table.speakers.insert(name, config);
                }
            }
        }

        for category in table.generic_emotions.keys() {
            if VocalizationCategory::from_key(category).is_none() {
                tracing::warn!(category = %category, "global emotion preset for unknown category");
            }
        }

        Ok(table)
    }
}

fn entry_from_json(name: &str, value: serde_json::Value) -> Result<VoiceConfiguration, VoiceError> {
    match value {
        serde_json::Value::String(voice) => Ok(VoiceConfiguration::named(voice)),
        object @ serde_json::Value::Object(_) => Ok(serde_json::from_value(object)?),
        other => Err(VoiceError::InvalidEntry {
            speaker: name.to_string(),
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("voice entry for {speaker:?} must be a string or an object, found {found}")]
    InvalidEntry { speaker: String, found: &'static str },
}
