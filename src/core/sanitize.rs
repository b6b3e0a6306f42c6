//! Placeholder-token sanitizer: turns templated dialogue into speakable text.
//!
//! Game strings carry engine tokens such as `<CHARNAME>` or `<PRO_HESHE>`
//! that the engine fills in at runtime. Synthesis needs plain prose, so each
//! token is swapped for a neutral word, direct address to the player is
//! dropped, and the punctuation and verb agreement left behind are repaired.
//! Agreement repair keeps the case of the pronoun's first letter, so a
//! sentence-initial "You has" becomes "You have" rather than "you have".

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Fixed token substitutions. `CHARNAME` is handled separately.
pub const TOKEN_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("PRO_HESHE", "they"),
    ("PRO_HIMHER", "them"),
    ("PRO_HISHER", "their"),
    ("PRO_MANWOMAN", "person"),
    ("PRO_LADYLORD", "my friend"),
    ("LADYLORD", "friend"),
    ("PRO_RACE", "traveler"),
    ("RACE", "traveler"),
    ("PRO_SIRMAAM", "friend"),
    ("SIRMAAM", "friend"),
    ("MALEFEMALE", "person"),
    ("PRO_MALEFEMALE", "person"),
    ("MANWOMAN", "person"),
    ("PRO_BROTHERSISTER", "friend"),
    ("BROTHERSISTER", "friend"),
    ("PRO_GIRLBOY", "child"),
    ("GIRLBOY", "child"),
    ("GABBER", "friend"),
    ("DAYNIGHTALL", "day"),
];

/// The player-name token.
pub const DIRECT_ADDRESS_TOKEN: &str = "CHARNAME";

/// Internal stand-in for `<CHARNAME>` while direct address is being removed.
const NAME_MARK: &str = "__CHARNAME__";

/// Upper bound on tidy passes; each pass strictly shortens or leaves the text.
const MAX_TIDY_PASSES: usize = 8;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([^>]+)>").expect("valid regex"));

/// Direct-address removal, applied in order.
static DIRECT_ADDRESS_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // "<CHARNAME>, listen" at a sentence start
        (r"(^|[.!?]\s*)__CHARNAME__,\s*", "${1}"),
        // "<CHARNAME>! Run!" at a sentence start
        (r"(^|[.!?]\s*)__CHARNAME__\s*[!?]+\s*", "${1}"),
        // "Well, <CHARNAME>, I think"
        (r",\s*__CHARNAME__\s*,", ", "),
        // "Farewell, <CHARNAME>."
        (r",\s*__CHARNAME__([.!?])", "${1}"),
        (r",\s*__CHARNAME__", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
    .collect()
});

static LEADING_BARE_YOU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[Yy]ou[!?]+\s+)+").expect("valid regex"));
static LEADING_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s\-\x{2014}]*[,.;:!?]+\s*").expect("valid regex"));
static COMMA_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",(?:\s*,)+").expect("valid regex"));
static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));
static SPACE_BEFORE_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([,.!?;:])").expect("valid regex"));
static DOT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.+").expect("valid regex"));
static REPEATED_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[!?;:]{2,}").expect("valid regex"));
static COMMA_BEFORE_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",([!?;:])").expect("valid regex"));

/// Subject-verb agreement repairs for the substituted pronouns.
static AGREEMENT_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\b([Yy])ou has\b", "ou have"),
        (r"\b([Yy])ou is\b", "ou are"),
        (r"\b([Yy])ou was\b", "ou were"),
        (r"\b([Yy])ou's\b", "our"),
        (r"\b([Tt])hey has\b", "hey have"),
        (r"\b([Tt])hey is\b", "hey are"),
        (r"\b([Tt])hey was\b", "hey were"),
        (r"\b([Tt])hey decides\b", "hey decide"),
    ]
    .into_iter()
    .map(|(pattern, tail)| (Regex::new(pattern).expect("valid regex"), tail))
    .collect()
});

/// Look up the natural-language substitute for a placeholder token name.
///
/// Returns `None` for the direct-address token and for unknown tokens.
pub fn substitute_token(token: &str) -> Option<&'static str> {
    TOKEN_SUBSTITUTIONS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, replacement)| *replacement)
}

/// Sanitize a line of dialogue for synthesis.
///
/// Never fails. An empty result means the line has nothing to say and
/// should not be synthesized.
pub fn sanitize(text: &str) -> String {
    let substituted = TOKEN_RE.replace_all(text, |caps: &Captures| {
        let token = &caps[1];
        if token == DIRECT_ADDRESS_TOKEN {
            NAME_MARK.to_string()
        } else {
            substitute_token(token).unwrap_or_default().to_string()
        }
    });

    let cleaned = substituted.replace('~', "").replace('\u{a0}', " ");
    let cleaned = normalize_dashes(&cleaned);
    let fallback = cleaned.replace(NAME_MARK, "you");

    let mut cleaned = cleaned;
    for (re, replacement) in DIRECT_ADDRESS_RULES.iter() {
        cleaned = re.replace_all(&cleaned, *replacement).into_owned();
    }
    cleaned = cleaned.replace(NAME_MARK, "you");

    let mut cleaned = tidy(&cleaned);
    if cleaned.is_empty() {
        cleaned = tidy(&fallback);
    }
    capitalize_first(&cleaned)
}

/// Map mis-decoded and typographic dashes to a plain hyphen.
fn normalize_dashes(text: &str) -> String {
    text.replace("\u{e2}\u{20ac}\u{201d}", "-")
        .replace("\u{e2}\u{20ac}\u{201c}", "-")
        .replace(['\u{2014}', '\u{2013}'], "-")
}

/// Punctuation, whitespace and agreement cleanup, repeated until stable.
fn tidy(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_TIDY_PASSES {
        let next = tidy_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn tidy_pass(text: &str) -> String {
    let s = LEADING_BARE_YOU_RE.replace(text, "");
    let s = LEADING_PUNCT_RE.replace(&s, "");
    let s = s.trim_start_matches('"');
    let s = COMMA_RUN_RE.replace_all(s, ", ");
    let s = MULTI_SPACE_RE.replace_all(&s, " ");
    let s = SPACE_BEFORE_PUNCT_RE.replace_all(&s, "${1}");
    // Exactly two dots is a typo; one dot or a full ellipsis is intentional.
    let s = DOT_RUN_RE.replace_all(&s, |caps: &Captures| {
        let run = &caps[0];
        if run.len() == 2 {
            ".".to_string()
        } else {
            run.to_string()
        }
    });
    let s = REPEATED_PUNCT_RE.replace_all(&s, |caps: &Captures| caps[0][..1].to_string());
    let mut s = COMMA_BEFORE_PUNCT_RE.replace_all(&s, "${1}").into_owned();

    for (re, tail) in AGREEMENT_RULES.iter() {
        s = re
            .replace_all(&s, |caps: &Captures| format!("{}{}", &caps[1], tail))
            .into_owned();
    }

    s.trim().to_string()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}
