//! Line planning: DialogueLine → what to send to the synthesis engine.
//!
//! Wires together sanitization, vocalization classification and rewriting,
//! voice lookup and emotion resolution. Planning is pure; running the engine
//! and writing audio is left to the caller.

use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use crate::config::{ConfigError, Settings};
use crate::core::classify::classify;
use crate::core::emotion::{EmotionRequest, EmotionResolver, ResolvedEmotion};
use crate::core::sanitize::sanitize;
use crate::core::transform::transform;
use crate::core::voice::{VoiceError, VoiceTable};
use crate::schema::line::{DialogueLine, LineError};
use crate::schema::vocalization::ClassificationResult;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("voice error: {0}")]
    Voice(#[from] VoiceError),
    #[error("line error: {0}")]
    Line(#[from] LineError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Why a line will not be synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The id or speaker is blank, or the text is empty.
    MissingFields,
    /// The line already has a professional recording.
    PreVoiced,
    /// Nothing speakable is left after sanitization.
    EmptyText,
}

/// Everything the synthesis engine needs for one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisPlan {
    pub id: String,
    pub speaker: String,
    pub voice: String,
    /// Sanitized text, respelled when the whole line is a vocalization.
    pub text: String,
    pub vocalization: Option<ClassificationResult>,
    pub emotion: Option<ResolvedEmotion>,
    pub speed: Option<f32>,
    pub pitch_shift: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LinePlan {
    Synthesize(SynthesisPlan),
    Skip { id: String, reason: SkipReason },
}

impl LinePlan {
    pub fn synthesis(&self) -> Option<&SynthesisPlan> {
        match self {
            Self::Synthesize(plan) => Some(plan),
            Self::Skip { .. } => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Synthesize(_) => None,
            Self::Skip { reason, .. } => Some(*reason),
        }
    }
}

/// Counts from planning a batch of lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub planned: usize,
    pub vocalizations: usize,
    pub with_emotion: usize,
    pub skipped_missing: usize,
    pub skipped_prevoiced: usize,
    pub skipped_empty: usize,
}

impl PlanSummary {
    pub fn skipped(&self) -> usize {
        self.skipped_missing + self.skipped_prevoiced + self.skipped_empty
    }

    fn record(&mut self, plan: &LinePlan) {
        match plan {
            LinePlan::Synthesize(p) => {
                self.planned += 1;
                if p.vocalization.is_some() {
                    self.vocalizations += 1;
                }
                if p.emotion.is_some() {
                    self.with_emotion += 1;
                }
            }
            LinePlan::Skip { reason, .. } => match reason {
                SkipReason::MissingFields => self.skipped_missing += 1,
                SkipReason::PreVoiced => self.skipped_prevoiced += 1,
                SkipReason::EmptyText => self.skipped_empty += 1,
            },
        }
    }
}

/// Plans synthesis for dialogue lines. Built via `LinePlanner::builder()`.
pub struct LinePlanner {
    voices: VoiceTable,
    settings: Settings,
}

/// Builder for constructing a `LinePlanner`.
pub struct LinePlannerBuilder {
    voices_path: Option<String>,
    settings_path: Option<String>,
    /// Directly provided voices (for testing without files).
    voices: Option<VoiceTable>,
    /// Directly provided settings (for testing without files).
    settings: Option<Settings>,
}

impl LinePlanner {
    pub fn builder() -> LinePlannerBuilder {
        LinePlannerBuilder {
            voices_path: None,
            settings_path: None,
            voices: None,
            settings: None,
        }
    }

    pub fn voices(&self) -> &VoiceTable {
        &self.voices
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Plan a single line.
    pub fn plan(&self, line: &DialogueLine) -> LinePlan {
        let skip = |reason| LinePlan::Skip {
            id: line.id.clone(),
            reason,
        };

        if line.id.trim().is_empty() || line.speaker.trim().is_empty() || line.text.is_empty() {
            return skip(SkipReason::MissingFields);
        }
        if self.settings.skip_prevoiced && line.is_prevoiced() {
            return skip(SkipReason::PreVoiced);
        }

        let sanitized = sanitize(&line.text);
        if sanitized.is_empty() {
            return skip(SkipReason::EmptyText);
        }

        let speaker = line.speaker.trim();
        let config = self.voices.lookup(speaker);
        let vocalization = classify(&sanitized, self.settings.min_vocalization_confidence);

        let resolver = EmotionResolver::new(&self.voices, &self.settings);
        let emotion = resolver.resolve(
            config,
            &EmotionRequest {
                speaker,
                manual_label: line.manual_emotion(),
                vocalization: vocalization.as_ref(),
                sanitized_text: &sanitized,
            },
        );

        let text = match &vocalization {
            Some(v) if v.is_pure => transform(&sanitized, v.category),
            _ => sanitized,
        };

        let voice = config
            .base_voice()
            .unwrap_or(self.settings.default_voice.as_str())
            .to_string();

        tracing::debug!(
            id = %line.id,
            speaker,
            voice = %voice,
            vocalization = ?vocalization.as_ref().map(|v| v.category),
            emotion = ?emotion.as_ref().map(|e| e.label.as_str()),
            "planned line"
        );

        LinePlan::Synthesize(SynthesisPlan {
            id: line.id.clone(),
            speaker: speaker.to_string(),
            voice,
            text,
            vocalization,
            emotion,
            speed: config.speed,
            pitch_shift: config.pitch_shift,
        })
    }

    /// Plan every line, in order, and tally the outcome.
    pub fn plan_all<'l>(
        &self,
        lines: impl IntoIterator<Item = &'l DialogueLine>,
    ) -> (Vec<LinePlan>, PlanSummary) {
        let mut summary = PlanSummary::default();
        let plans: Vec<LinePlan> = lines
            .into_iter()
            .map(|line| {
                let plan = self.plan(line);
                summary.record(&plan);
                plan
            })
            .collect();

        tracing::info!(
            planned = summary.planned,
            skipped = summary.skipped(),
            vocalizations = summary.vocalizations,
            "planned batch"
        );
        (plans, summary)
    }
}

impl LinePlannerBuilder {
    /// Load the voice table from a file (`.json` legacy map or RON).
    pub fn voices_file(mut self, path: &str) -> Self {
        self.voices_path = Some(path.to_string());
        self
    }

    pub fn settings_file(mut self, path: &str) -> Self {
        self.settings_path = Some(path.to_string());
        self
    }

    pub fn with_voices(mut self, voices: VoiceTable) -> Self {
        self.voices = Some(voices);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn build(self) -> Result<LinePlanner, PipelineError> {
        let voices = match (self.voices, self.voices_path) {
            (Some(voices), _) => voices,
            (None, Some(path)) => VoiceTable::load(Path::new(&path))?,
            (None, None) => VoiceTable::new(),
        };

        let settings = match (self.settings, self.settings_path) {
            (Some(settings), _) => {
                settings.validate()?;
                settings
            }
            (None, Some(path)) => Settings::load_from_ron(Path::new(&path))?,
            (None, None) => Settings::default(),
        };

        tracing::debug!(speakers = voices.len(), "line planner ready");
        Ok(LinePlanner { voices, settings })
    }
}
