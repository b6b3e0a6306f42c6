//! Corpus reports for sanity-checking a line set before a synthesis run.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::core::classify::classify;
use crate::core::emotion::detect_emotion;
use crate::core::sanitize::sanitize;
use crate::schema::emotion::EmotionLabel;
use crate::schema::line::DialogueLine;
use crate::schema::vocalization::{ClassificationResult, VocalizationCategory};

/// Number of lines per speaker.
pub fn speaker_counts<'l>(lines: impl IntoIterator<Item = &'l DialogueLine>) -> FxHashMap<String, usize> {
    let mut counts = FxHashMap::default();
    for line in lines {
        *counts.entry(line.speaker.clone()).or_insert(0) += 1;
    }
    counts
}

/// How the keyword detector would label each line, tallied.
///
/// Runs over sanitized text regardless of speaker, so it shows what
/// auto-detection would do if it were enabled everywhere.
pub fn emotion_distribution<'l>(
    lines: impl IntoIterator<Item = &'l DialogueLine>,
) -> FxHashMap<EmotionLabel, usize> {
    let mut counts = FxHashMap::default();
    for line in lines {
        let label = detect_emotion(&sanitize(&line.text));
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

/// One line the classifier flagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocalizationEntry {
    pub id: String,
    pub speaker: String,
    pub text: String,
    pub result: ClassificationResult,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VocalizationReport {
    pub entries: Vec<VocalizationEntry>,
    pub by_category: FxHashMap<VocalizationCategory, usize>,
    pub pure: usize,
}

impl VocalizationReport {
    /// Categories with their counts, most frequent first, ties by category order.
    pub fn ranked_categories(&self) -> Vec<(VocalizationCategory, usize)> {
        let mut ranked: Vec<_> = self.by_category.iter().map(|(c, n)| (*c, *n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

/// Classify every line's sanitized text and collect those at or above
/// `min_confidence`.
pub fn vocalization_report<'l>(
    lines: impl IntoIterator<Item = &'l DialogueLine>,
    min_confidence: f32,
) -> VocalizationReport {
    let mut report = VocalizationReport::default();
    for line in lines {
        let text = sanitize(&line.text);
        let Some(result) = classify(&text, min_confidence) else {
            continue;
        };
        *report.by_category.entry(result.category).or_insert(0) += 1;
        if result.is_pure {
            report.pure += 1;
        }
        report.entries.push(VocalizationEntry {
            id: line.id.clone(),
            speaker: line.speaker.clone(),
            text,
            result,
        });
    }
    report
}
