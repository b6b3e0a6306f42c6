use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single line of dialogue as exported from the game's string table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Stable string reference number; also names the output audio file.
    #[serde(alias = "strref")]
    pub id: String,
    pub speaker: String,
    pub text: String,
    /// Emotion label set by hand in the line sheet.
    #[serde(default)]
    pub emotion: Option<String>,
    /// Path of an existing professional recording, if the line has one.
    #[serde(default)]
    pub original_vo: Option<String>,
}

impl DialogueLine {
    pub fn new(id: impl Into<String>, speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            speaker: speaker.into(),
            text: text.into(),
            emotion: None,
            original_vo: None,
        }
    }

    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    /// The manual emotion label, if one is set and not blank.
    pub fn manual_emotion(&self) -> Option<&str> {
        self.emotion
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// True when a non-blank original recording path is present.
    pub fn is_prevoiced(&self) -> bool {
        self.original_vo
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }
}

/// An ordered collection of dialogue lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineSet {
    pub lines: Vec<DialogueLine>,
}

impl LineSet {
    pub fn new(lines: Vec<DialogueLine>) -> Self {
        Self { lines }
    }

    /// Load a RON list of line records.
    pub fn load_from_ron(path: &Path) -> Result<LineSet, LineError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<LineSet, LineError> {
        let lines: Vec<DialogueLine> = ron::from_str(input)?;
        Ok(LineSet { lines })
    }

    /// Keep only lines whose speaker is in `speakers` (case-insensitive).
    /// An empty filter keeps everything.
    pub fn filter_speakers(&self, speakers: &[String]) -> LineSet {
        if speakers.is_empty() {
            return self.clone();
        }
        let wanted: Vec<String> = speakers.iter().map(|s| s.to_lowercase()).collect();
        let lines = self
            .lines
            .iter()
            .filter(|line| wanted.contains(&line.speaker.to_lowercase()))
            .cloned()
            .collect();
        LineSet { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DialogueLine> {
        self.lines.iter()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}
