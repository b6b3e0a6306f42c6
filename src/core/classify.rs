//! Rule-based vocalization classifier.
//!
//! Decides whether a line (or a word inside it) is a non-verbal sound such as
//! a grunt or scream rather than speech. Rules are tried top to bottom, most
//! specific first; the first rule that matches a word wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::vocalization::{ClassificationResult, VocalizationCategory};

/// Threshold used when the caller has no opinion.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// Common short words that are never vocalizations.
const STOPLIST: &[&str] = &["i", "a", "the", "is", "it", "to", "in", "of", "and", "or"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    /// Starred stage direction such as `*cough*`; may appear anywhere in a line.
    Marker,
    /// Spelling pattern; only ever matched against a whole word.
    Phonetic,
}

struct VocalizationRule {
    category: VocalizationCategory,
    kind: RuleKind,
    confidence: f32,
    description: &'static str,
    /// Matches from the start of a word or line.
    anchored: Regex,
    /// Matches anywhere; used to find embedded markers.
    unanchored: Regex,
}

impl VocalizationRule {
    fn new(
        category: VocalizationCategory,
        kind: RuleKind,
        pattern: &str,
        confidence: f32,
        description: &'static str,
    ) -> Self {
        Self {
            category,
            kind,
            confidence,
            description,
            anchored: Regex::new(&format!("(?i)^(?:{})", pattern)).expect("valid regex"),
            unanchored: Regex::new(&format!("(?i){}", pattern)).expect("valid regex"),
        }
    }
}

static RULES: Lazy<Vec<VocalizationRule>> = Lazy::new(|| {
    use RuleKind::{Marker, Phonetic};
    use VocalizationCategory as V;

    vec![
        // Explicit stage directions
        VocalizationRule::new(V::Cough, Marker, r"\*\s*cough\s*\*", 1.0, "Explicit cough marker"),
        VocalizationRule::new(V::Cry, Marker, r"\*\s*sob\s*\*", 1.0, "Explicit sob marker"),
        VocalizationRule::new(V::Gasp, Marker, r"\*\s*gasp\s*\*", 1.0, "Explicit gasp marker"),
        VocalizationRule::new(V::Sigh, Marker, r"\*\s*sigh\s*\*", 1.0, "Explicit sigh marker"),
        VocalizationRule::new(
            V::Laugh,
            Marker,
            r"\*\s*(laugh|chuckle|giggle|snicker|heh)\s*\*",
            1.0,
            "Explicit laugh marker",
        ),
        // High-confidence spellings
        VocalizationRule::new(
            V::Scream,
            Phonetic,
            r"^[aei]{3,}[aeiou]*[gh]*!+$",
            0.95,
            "Scream pattern (aaah!, eeeek!)",
        ),
        VocalizationRule::new(
            V::Grunt,
            Phonetic,
            r"^[ug]+[rl]*[gh]+[!.]*$",
            0.9,
            "Grunt pattern (ugh, grrr, urgh)",
        ),
        VocalizationRule::new(V::Grunt, Phonetic, r"^g+l+[gh]+[!.]*$", 0.9, "Grunt pattern (gllgghh)"),
        VocalizationRule::new(
            V::Yell,
            Phonetic,
            r"^[rae]+[gh]*!+$",
            0.85,
            "Yell pattern (raaagh!, yaah!)",
        ),
        VocalizationRule::new(
            V::Moan,
            Phonetic,
            r"^[uo]+[wh]*[!.]*$",
            0.85,
            "Moan pattern (ooh, uhhh, oww)",
        ),
        VocalizationRule::new(V::Gasp, Phonetic, r"^[ha]+[sp]*h*[!.]*$", 0.8, "Gasp pattern (hasp, hah)"),
        VocalizationRule::new(V::Laugh, Phonetic, r"^he+h*[!.]*$", 0.8, "Laugh pattern (heh, hehe)"),
        VocalizationRule::new(V::Sigh, Phonetic, r"^[ha]+[ah]*\.+$", 0.75, "Sigh pattern (haa..., ahh...)"),
        // Medium confidence
        VocalizationRule::new(V::Yell, Phonetic, r"^no+!+$", 0.7, "Emphatic no"),
        VocalizationRule::new(V::Cry, Phonetic, r"^[nw]+o+[!.]+$", 0.7, "Cry pattern (nooo, woo)"),
        // Catch-alls
        VocalizationRule::new(
            V::Generic,
            Phonetic,
            r"^[aeiou]{2,}[bcdfghjklmnpqrstvwxyz]*[!.]+$",
            0.5,
            "Generic vocalization",
        ),
        VocalizationRule::new(
            V::Generic,
            Phonetic,
            r"^[bcdfghjklmnpqrstvwxyz]{3,}[!.]*$",
            0.4,
            "Consonant-heavy non-word",
        ),
    ]
});

static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*[^*]+\*").expect("valid regex"));

/// Classify a single word (or a marker-led string) against the rule table.
///
/// The result is never pure; callers decide purity from context.
pub fn classify_word(word: &str) -> Option<ClassificationResult> {
    let normalized = word.trim().to_lowercase();
    if normalized.chars().count() < 2 || STOPLIST.contains(&normalized.as_str()) {
        return None;
    }

    RULES
        .iter()
        .find(|rule| rule.anchored.is_match(&normalized))
        .map(|rule| ClassificationResult {
            category: rule.category,
            confidence: rule.confidence,
            description: rule.description,
            matched: word.to_string(),
            is_pure: false,
        })
}

/// Classify a line of dialogue.
///
/// A line that is exactly one word once `*markers*` are removed is matched as
/// a whole and reported as pure. Otherwise (including marker-only lines) every
/// embedded marker and every word is considered and the highest-confidence
/// match is returned, not pure. On equal confidence the earliest candidate
/// wins: markers before words, markers in rule order then text order, words
/// in text order.
pub fn classify(text: &str, min_confidence: f32) -> Option<ClassificationResult> {
    if text.trim().is_empty() {
        return None;
    }

    let without_markers = MARKER_RE.replace_all(text, "");
    let words: Vec<&str> = without_markers.split_whitespace().collect();

    if words.len() == 1 {
        if let Some(mut result) = classify_word(text) {
            if result.confidence >= min_confidence {
                result.is_pure = true;
                return Some(result);
            }
        }
    }

    let markers = RULES
        .iter()
        .filter(|rule| rule.kind == RuleKind::Marker && rule.confidence >= min_confidence)
        .flat_map(|rule| {
            rule.unanchored
                .find_iter(text)
                .map(move |m| ClassificationResult {
                    category: rule.category,
                    confidence: rule.confidence,
                    description: rule.description,
                    matched: m.as_str().to_string(),
                    is_pure: false,
                })
        });

    let embedded = words
        .iter()
        .filter_map(|word| classify_word(word))
        .filter(|result| result.confidence >= min_confidence);

    markers.chain(embedded).fold(None, |best: Option<ClassificationResult>, candidate| {
        match best {
            Some(current) if current.confidence >= candidate.confidence => Some(current),
            _ => Some(candidate),
        }
    })
}

/// True when `text` contains a vocalization at or above `min_confidence`.
pub fn is_vocalization(text: &str, min_confidence: f32) -> bool {
    classify(text, min_confidence).is_some()
}

/// The category of the strongest vocalization in `text`, if any.
pub fn vocalization_category(text: &str, min_confidence: f32) -> Option<VocalizationCategory> {
    classify(text, min_confidence).map(|r| r.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::vocalization::VocalizationCategory as V;

    fn pure(text: &str) -> ClassificationResult {
        let result = classify(text, DEFAULT_MIN_CONFIDENCE)
            .unwrap_or_else(|| panic!("expected a vocalization for {:?}", text));
        assert!(result.is_pure, "expected pure for {:?}", text);
        result
    }

    #[test]
    fn jaheira_grunt_is_pure_grunt() {
        let result = pure("Gllgghh!");
        assert_eq!(result.category, V::Grunt);
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.matched, "Gllgghh!");
    }

    #[test]
    fn phonetic_spellings() {
        assert_eq!(pure("Aaaaaah!").category, V::Scream);
        assert_eq!(pure("Ugh.").category, V::Grunt);
        assert_eq!(pure("Raaagh!").category, V::Yell);
        assert_eq!(pure("Heh...").category, V::Laugh);
        assert_eq!(pure("Oww!").category, V::Moan);
        assert_eq!(pure("Hah!").category, V::Gasp);
    }

    #[test]
    fn emphatic_no_is_yell_not_grunt() {
        let result = pure("No!");
        assert_eq!(result.category, V::Yell);
        assert_eq!(result.confidence, 0.7);
        assert_eq!(result.description, "Emphatic no");
    }

    #[test]
    fn drawn_out_no_with_period_is_cry() {
        assert_eq!(pure("Nooo...").category, V::Cry);
    }

    #[test]
    fn catch_all_patterns() {
        let result = classify("Hmmph.", 0.0).unwrap();
        assert_eq!(result.category, V::Generic);
        assert_eq!(result.confidence, 0.4);
        assert!(classify("Hmmph.", DEFAULT_MIN_CONFIDENCE).is_none());
    }

    #[test]
    fn single_word_led_by_marker_matches_marker_rule() {
        let result = pure("*sigh* Ugh.");
        assert_eq!(result.category, V::Sigh);
    }

    #[test]
    fn marker_only_line_is_not_pure() {
        let result = classify("*cough*", DEFAULT_MIN_CONFIDENCE).unwrap();
        assert_eq!(result.category, V::Cough);
        assert_eq!(result.confidence, 1.0);
        assert!(!result.is_pure);
        assert_eq!(result.matched, "*cough*");

        let result = classify("* chuckle *", DEFAULT_MIN_CONFIDENCE).unwrap();
        assert_eq!(result.category, V::Laugh);
        assert!(!result.is_pure);
    }

    #[test]
    fn repeated_markers_match_one_marker() {
        let result = classify("*cough* *cough*", 0.6).unwrap();
        assert_eq!(result.category, V::Cough);
        assert_eq!(result.matched, "*cough*");
        assert!(!result.is_pure);
    }

    #[test]
    fn embedded_cough_is_not_pure() {
        let result = classify("I... *cough* *cough*... I am not here", DEFAULT_MIN_CONFIDENCE).unwrap();
        assert_eq!(result.category, V::Cough);
        assert_eq!(result.confidence, 1.0);
        assert!(!result.is_pure);
        assert_eq!(result.matched, "*cough*");
    }

    #[test]
    fn embedded_word_match_is_not_pure() {
        let result = classify("Ugh, the smell of this place.", DEFAULT_MIN_CONFIDENCE);
        // "Ugh," carries a comma and fails the grunt spelling.
        assert!(result.is_none());

        let result = classify("Aaaah! They're coming!", DEFAULT_MIN_CONFIDENCE).unwrap();
        assert_eq!(result.category, V::Scream);
        assert!(!result.is_pure);
    }

    #[test]
    fn normal_speech_is_not_a_vocalization() {
        assert!(classify("This is normal speech", DEFAULT_MIN_CONFIDENCE).is_none());
        assert!(classify("", 0.0).is_none());
        assert!(classify("   ", 0.0).is_none());
    }

    #[test]
    fn stoplist_words_never_match() {
        for word in ["the", "it", "I", "a", "of"] {
            assert!(classify(word, 0.0).is_none(), "{:?}", word);
        }
        assert!(classify_word("x").is_none());
    }

    #[test]
    fn threshold_filters_matches() {
        assert!(classify("No!", 0.8).is_none());
        assert!(classify("No!", 0.7).is_some());
        assert!(classify("Gllgghh!", 1.0).is_none());
    }

    #[test]
    fn equal_confidence_prefers_marker_then_word_order() {
        let result = classify("*sigh* Hmm, very well. *cough*", 0.5).unwrap();
        // Both markers score 1.0; cough precedes sigh in rule order.
        assert_eq!(result.category, V::Cough);

        let result = classify("Ugh. Urgh. Fine.", 0.5).unwrap();
        assert_eq!(result.matched, "Ugh.");
    }

    #[test]
    fn classification_is_deterministic() {
        for text in ["Gllgghh!", "I... *cough* *cough*... I am not here", "No!", "Oh. Ah."] {
            assert_eq!(classify(text, 0.5), classify(text, 0.5));
        }
    }

    #[test]
    fn convenience_predicates() {
        assert!(is_vocalization("Raaagh!", 0.6));
        assert!(!is_vocalization("Well met.", 0.6));
        assert_eq!(vocalization_category("*sob*", 0.6), Some(V::Cry));
    }

    #[test]
    fn confidences_are_in_unit_range() {
        assert!(RULES.iter().all(|r| (0.0..=1.0).contains(&r.confidence)));
    }
}
