//! Emotion selection for a line: manual labels, vocalization presets and
//! keyword-based inference, tried in that order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::Settings;
use crate::core::voice::{VoiceConfiguration, VoiceTable};
use crate::schema::emotion::{EmotionLabel, EmotionPreset, EmotionSetting};
use crate::schema::vocalization::ClassificationResult;

const ANGRY_KEYWORDS: &[&str] = &[
    "rip", "tear", "kill", "die", "death", "blood", "fool", "idiot", "damn", "curse", "enough!",
    "silence!", "attack", "fight", "battle", "rage", "fury", "hate", "destroy", "crush",
];

const SAD_KEYWORDS: &[&str] = &[
    "khalid", "dead", "lost", "gone", "mourn", "grief", "sorrow", "miss", "alone", "tears", "cry",
    "weep", "pain", "suffer", "goodbye", "farewell", "never again",
];

const HAPPY_KEYWORDS: &[&str] = &[
    "wonderful", "excellent", "perfect", "good", "great", "joy", "delight", "pleased", "glad",
    "happy", "smile", "laugh", "celebrate", "success", "victory", "triumph",
];

const FEAR_KEYWORDS: &[&str] = &[
    "afraid", "fear", "scared", "worry", "danger", "trap", "help!", "run!", "flee", "escape",
    "hide", "careful", "watch out", "beware", "threat", "peril",
];

const URGENT_KEYWORDS: &[&str] = &[
    "hurry", "quick", "fast", "now!", "must", "immediately", "urgent", "rush", "time", "before",
    "after", "soon", "wait",
];

const QUESTION_WORDS: &[&str] = &["what", "where", "who", "how", "why"];
const CONCERN_WORDS: &[&str] = &["happen", "wrong", "matter", "is it"];

/// Keyword groups in priority order.
const KEYWORD_GROUPS: &[(EmotionLabel, &[&str])] = &[
    (EmotionLabel::Angry, ANGRY_KEYWORDS),
    (EmotionLabel::Sad, SAD_KEYWORDS),
    (EmotionLabel::Fear, FEAR_KEYWORDS),
    (EmotionLabel::Happy, HAPPY_KEYWORDS),
    (EmotionLabel::Urgent, URGENT_KEYWORDS),
];

static SHOUTED_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{3,}\b").expect("valid regex"));

/// Infer an emotion from punctuation and keywords.
///
/// Keywords are matched as lowercase substrings, so "time" also fires on
/// "sometimes"; the lists are tuned for that.
pub fn detect_emotion(text: &str) -> EmotionLabel {
    let lowered = text.to_lowercase();

    if text.matches('!').count() >= 2 {
        return EmotionLabel::Angry;
    }
    if text.matches("...").count() >= 2 {
        return EmotionLabel::Sad;
    }

    if let Some((label, _)) = KEYWORD_GROUPS.iter().find(|(_, words)| contains_any(&lowered, words)) {
        return *label;
    }

    if text.contains('?')
        && contains_any(&lowered, QUESTION_WORDS)
        && contains_any(&lowered, CONCERN_WORDS)
    {
        return EmotionLabel::Fear;
    }

    if SHOUTED_WORD_RE.is_match(text) {
        return EmotionLabel::Angry;
    }

    EmotionLabel::Neutral
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

/// Which step of the fallback chain produced an emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionSource {
    Manual,
    CharacterPreset,
    CharacterGeneric,
    GlobalPreset,
    AutoDetected,
}

/// A concrete emotion setting for one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEmotion {
    /// Label or category name the setting came from, for logs and reports.
    pub label: String,
    pub setting: EmotionSetting,
    pub alpha: Option<f32>,
    /// Reference clip passed to the engine alongside the setting.
    pub audio_prompt: Option<String>,
    /// Text description passed to the engine alongside the setting.
    pub emotion_text: Option<String>,
    pub source: EmotionSource,
}

impl ResolvedEmotion {
    fn from_label(label: EmotionLabel, config: &VoiceConfiguration, source: EmotionSource) -> Self {
        Self {
            label: label.key().to_string(),
            setting: label.setting(),
            alpha: config.emo_alpha,
            audio_prompt: None,
            emotion_text: None,
            source,
        }
    }
}

/// Everything about a line the resolver looks at.
#[derive(Debug, Clone, Copy)]
pub struct EmotionRequest<'a> {
    pub speaker: &'a str,
    pub manual_label: Option<&'a str>,
    pub vocalization: Option<&'a ClassificationResult>,
    pub sanitized_text: &'a str,
}

/// Resolves a line's emotion against the voice table and run settings.
pub struct EmotionResolver<'a> {
    voices: &'a VoiceTable,
    settings: &'a Settings,
}

impl<'a> EmotionResolver<'a> {
    pub fn new(voices: &'a VoiceTable, settings: &'a Settings) -> Self {
        Self { voices, settings }
    }

    /// Walk the fallback chain; the first step with an answer wins.
    pub fn resolve(
        &self,
        config: &VoiceConfiguration,
        request: &EmotionRequest<'_>,
    ) -> Option<ResolvedEmotion> {
        self.from_manual_label(config, request)
            .or_else(|| self.from_vocalization(config, request))
            .or_else(|| self.from_auto_detection(config, request))
    }

    /// Step 1: a hand-set label maps straight to its fixed vector. Labels
    /// outside the table are treated as neutral.
    pub fn from_manual_label(
        &self,
        config: &VoiceConfiguration,
        request: &EmotionRequest<'_>,
    ) -> Option<ResolvedEmotion> {
        let raw = request.manual_label.map(str::trim).filter(|l| !l.is_empty())?;
        let label = EmotionLabel::parse(raw).unwrap_or_else(|| {
            tracing::warn!(speaker = request.speaker, label = raw, "unknown manual emotion, using neutral");
            EmotionLabel::Neutral
        });
        Some(ResolvedEmotion::from_label(label, config, EmotionSource::Manual))
    }

    /// Step 2: pure vocalizations use the speaker's preset for the category,
    /// then the speaker's generic preset, then the global preset.
    pub fn from_vocalization(
        &self,
        config: &VoiceConfiguration,
        request: &EmotionRequest<'_>,
    ) -> Option<ResolvedEmotion> {
        let vocalization = request.vocalization.filter(|v| v.is_pure)?;
        let category = vocalization.category;

        let (preset, source) = config
            .preset_for(category)
            .map(|p| (p, EmotionSource::CharacterPreset))
            .or_else(|| config.generic_preset().map(|p| (p, EmotionSource::CharacterGeneric)))
            .or_else(|| {
                self.voices
                    .generic_emotion(category)
                    .map(|p| (p, EmotionSource::GlobalPreset))
            })?;

        Some(from_preset(category.key(), preset, config, source))
    }

    /// Step 3: keyword inference, only for speakers configured for it.
    pub fn from_auto_detection(
        &self,
        config: &VoiceConfiguration,
        request: &EmotionRequest<'_>,
    ) -> Option<ResolvedEmotion> {
        if !self.settings.auto_emotion_for(request.speaker) {
            return None;
        }
        let label = detect_emotion(request.sanitized_text);
        Some(ResolvedEmotion::from_label(label, config, EmotionSource::AutoDetected))
    }
}

fn from_preset(
    category: &str,
    preset: &EmotionPreset,
    config: &VoiceConfiguration,
    source: EmotionSource,
) -> ResolvedEmotion {
    ResolvedEmotion {
        label: category.to_string(),
        setting: preset.setting(),
        alpha: preset.alpha().or(config.emo_alpha),
        audio_prompt: preset.audio_prompt().map(str::to_string),
        emotion_text: preset.emotion_text().map(str::to_string),
        source,
    }
}
