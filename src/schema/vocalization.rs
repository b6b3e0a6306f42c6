use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of non-verbal sounds the classifier recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocalizationCategory {
    /// Grunts, groans, "ugh" sounds.
    Grunt,
    /// Screams, shrieks, piercing cries.
    Scream,
    /// Moans, whimpers, pained sounds.
    Moan,
    /// Yells, shouts, battle cries.
    Yell,
    /// Sudden intakes of breath.
    Gasp,
    /// Laughter, chuckles, giggles.
    Laugh,
    /// Crying, sobbing, weeping.
    Cry,
    /// Coughing, clearing the throat.
    Cough,
    /// Sighs and long exhales.
    Sigh,
    /// Any other non-word sound.
    Generic,
}

impl VocalizationCategory {
    pub const ALL: [VocalizationCategory; 10] = [
        Self::Grunt,
        Self::Scream,
        Self::Moan,
        Self::Yell,
        Self::Gasp,
        Self::Laugh,
        Self::Cry,
        Self::Cough,
        Self::Sigh,
        Self::Generic,
    ];

    /// Lowercase key used in voice configuration files (e.g. "grunt").
    pub fn key(&self) -> &'static str {
        match self {
            Self::Grunt => "grunt",
            Self::Scream => "scream",
            Self::Moan => "moan",
            Self::Yell => "yell",
            Self::Gasp => "gasp",
            Self::Laugh => "laugh",
            Self::Cry => "cry",
            Self::Cough => "cough",
            Self::Sigh => "sigh",
            Self::Generic => "generic",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for VocalizationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Outcome of classifying a line as a vocalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: VocalizationCategory,
    /// Base confidence of the matching rule, in 0.0..=1.0.
    pub confidence: f32,
    /// Human-readable description of the rule that matched.
    pub description: &'static str,
    /// The text the rule matched against (a word, a marker, or the whole line).
    pub matched: String,
    /// True when the whole line is the vocalization rather than an
    /// interjection inside ordinary dialogue.
    pub is_pure: bool,
}
