use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of affect dimensions the synthesis engine accepts.
pub const EMOTION_DIMENSIONS: usize = 8;

/// Upper bound on any single component; larger values sound theatrical.
pub const MAX_COMPONENT: f32 = 0.3;

/// An 8-dimensional affect control signal, ordered
/// happy, angry, sad, afraid, disgusted, melancholic, surprised, calm.
///
/// Components are clamped into `0.0..=MAX_COMPONENT` on construction, so a
/// vector read from a configuration file can never exceed the cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; EMOTION_DIMENSIONS]", into = "[f32; EMOTION_DIMENSIONS]")]
pub struct EmotionVector([f32; EMOTION_DIMENSIONS]);

impl EmotionVector {
    pub fn new(components: [f32; EMOTION_DIMENSIONS]) -> Self {
        let mut capped = components;
        for value in capped.iter_mut() {
            *value = if value.is_nan() {
                0.0
            } else {
                value.clamp(0.0, MAX_COMPONENT)
            };
        }
        Self(capped)
    }

    pub fn components(&self) -> &[f32; EMOTION_DIMENSIONS] {
        &self.0
    }

    pub fn happy(&self) -> f32 {
        self.0[0]
    }

    pub fn angry(&self) -> f32 {
        self.0[1]
    }

    pub fn sad(&self) -> f32 {
        self.0[2]
    }

    pub fn afraid(&self) -> f32 {
        self.0[3]
    }

    pub fn calm(&self) -> f32 {
        self.0[7]
    }
}

impl From<[f32; EMOTION_DIMENSIONS]> for EmotionVector {
    fn from(components: [f32; EMOTION_DIMENSIONS]) -> Self {
        Self::new(components)
    }
}

impl From<EmotionVector> for [f32; EMOTION_DIMENSIONS] {
    fn from(vector: EmotionVector) -> Self {
        vector.0
    }
}

/// Named emotions that can be attached to a line by hand or inferred from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    Angry,
    Sad,
    Happy,
    Fear,
    Urgent,
    Hesitant,
    Neutral,
    /// The speaker borrows another companion's voice; pitch and speed do the
    /// work and no vector is sent.
    BorrowedVoice,
}

impl EmotionLabel {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Angry => "angry",
            Self::Sad => "sad",
            Self::Happy => "happy",
            Self::Fear => "fear",
            Self::Urgent => "urgent",
            Self::Hesitant => "hesitant",
            Self::Neutral => "neutral",
            Self::BorrowedVoice => "borrowed_voice",
        }
    }

    /// Parse a label as written in line sheets. Case and surrounding
    /// whitespace are ignored.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "angry" => Some(Self::Angry),
            "sad" => Some(Self::Sad),
            "happy" => Some(Self::Happy),
            "fear" => Some(Self::Fear),
            "urgent" => Some(Self::Urgent),
            "hesitant" => Some(Self::Hesitant),
            "neutral" => Some(Self::Neutral),
            "borrowed_voice" => Some(Self::BorrowedVoice),
            _ => None,
        }
    }

    /// The fixed synthesis setting for this label.
    pub fn setting(&self) -> EmotionSetting {
        let components = match self {
            Self::Angry => [0.0, 0.3, 0.0, 0.0, 0.15, 0.0, 0.0, 0.0],
            Self::Sad => [0.0, 0.0, 0.3, 0.0, 0.0, 0.2, 0.0, 0.0],
            Self::Happy => [0.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.15, 0.0],
            Self::Fear => [0.0, 0.0, 0.0, 0.3, 0.0, 0.0, 0.15, 0.0],
            Self::Urgent => [0.0, 0.25, 0.0, 0.15, 0.0, 0.0, 0.0, 0.0],
            Self::Hesitant => [0.0, 0.0, 0.2, 0.2, 0.0, 0.0, 0.0, 0.0],
            Self::Neutral => [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.3],
            Self::BorrowedVoice => return EmotionSetting::PitchSpeedOnly,
        };
        EmotionSetting::Vector(EmotionVector::new(components))
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// What the synthesis engine receives for a line's affect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionSetting {
    Vector(EmotionVector),
    /// No vector; the engine takes the emotion from the preset's reference
    /// clip or text description.
    Prompted,
    /// No vector; only the speaker's pitch/speed adjustment applies.
    PitchSpeedOnly,
}

impl EmotionSetting {
    pub fn vector(&self) -> Option<&EmotionVector> {
        match self {
            Self::Vector(v) => Some(v),
            Self::Prompted | Self::PitchSpeedOnly => None,
        }
    }
}

/// A per-category emotion preset from a voice configuration.
///
/// Written either as a bare label (`"angry"`) or as an explicit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmotionPreset {
    Label(EmotionLabel),
    Explicit(ExplicitPreset),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExplicitPreset {
    #[serde(default)]
    pub emo_vector: Option<EmotionVector>,
    #[serde(default)]
    pub emo_alpha: Option<f32>,
    /// Reference clip whose delivery the engine imitates.
    #[serde(default)]
    pub emo_audio_prompt: Option<String>,
    /// Free-text description of the delivery.
    #[serde(default)]
    pub emo_text: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl EmotionPreset {
    pub fn setting(&self) -> EmotionSetting {
        match self {
            Self::Label(label) => label.setting(),
            Self::Explicit(preset) => match preset.emo_vector {
                Some(vector) => EmotionSetting::Vector(vector),
                None if self.audio_prompt().is_some() || self.emotion_text().is_some() => {
                    EmotionSetting::Prompted
                }
                None => EmotionSetting::PitchSpeedOnly,
            },
        }
    }

    pub fn audio_prompt(&self) -> Option<&str> {
        match self {
            Self::Label(_) => None,
            Self::Explicit(preset) => non_blank(&preset.emo_audio_prompt),
        }
    }

    pub fn emotion_text(&self) -> Option<&str> {
        match self {
            Self::Label(_) => None,
            Self::Explicit(preset) => non_blank(&preset.emo_text),
        }
    }

    pub fn alpha(&self) -> Option<f32> {
        match self {
            Self::Label(_) => None,
            Self::Explicit(preset) => preset.emo_alpha,
        }
    }
}
