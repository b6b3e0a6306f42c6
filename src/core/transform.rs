//! Respelling of pure vocalizations into forms a TTS engine pronounces well.
//!
//! Script spellings like "Gllgghh!" come out as mumbled letters. Each category
//! has a short ordered table of start-anchored patterns mapping a family of
//! spellings onto one canonical form; the first match wins and anything
//! unmatched passes through.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::vocalization::VocalizationCategory;

struct Respelling {
    pattern: Regex,
    replacement: &'static str,
}

fn table(entries: &[(&str, &'static str)]) -> Vec<Respelling> {
    entries
        .iter()
        .map(|&(pattern, replacement)| Respelling {
            pattern: Regex::new(&format!("^(?:{})", pattern)).expect("valid regex"),
            replacement,
        })
        .collect()
}

static GRUNT: Lazy<Vec<Respelling>> = Lazy::new(|| {
    table(&[
        (r"g+l+[gh]+", "aarrgh"),
        (r"u+g+h*", "urgh"),
        (r"g+r+h*", "grrr"),
        (r"u+h+", "uhh"),
    ])
});
static YELL: Lazy<Vec<Respelling>> =
    Lazy::new(|| table(&[(r"n+o+", "nooo"), (r"[ra]+[gh]*", "raaagh"), (r"a+h*", "aaah")]));
static SCREAM: Lazy<Vec<Respelling>> = Lazy::new(|| table(&[(r"a+h*", "aaaah"), (r"e+k*", "eeeek")]));
static MOAN: Lazy<Vec<Respelling>> = Lazy::new(|| table(&[(r"o+[hw]*", "ohhh"), (r"u+h+", "uhhh")]));
static GASP: Lazy<Vec<Respelling>> = Lazy::new(|| table(&[(r"[ha]+[sp]*", "hasp")]));
static LAUGH: Lazy<Vec<Respelling>> = Lazy::new(|| table(&[(r"he+h*", "hehe"), (r"ha+h*", "haha")]));
static CRY: Lazy<Vec<Respelling>> = Lazy::new(|| table(&[(r"[nw]+o+", "wooo")]));
static COUGH: Lazy<Vec<Respelling>> =
    Lazy::new(|| table(&[(r"c+o+u*g*h*", "cough"), (r"\*\s*cough\s*\*", "cough")]));
static SIGH: Lazy<Vec<Respelling>> =
    Lazy::new(|| table(&[(r"[ha]+h*", "ahhh"), (r"\*\s*sigh\s*\*", "sigh")]));

static PUNCT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[!.]{2,}").expect("valid regex"));

fn respellings(category: VocalizationCategory) -> &'static [Respelling] {
    match category {
        VocalizationCategory::Grunt => GRUNT.as_slice(),
        VocalizationCategory::Yell => YELL.as_slice(),
        VocalizationCategory::Scream => SCREAM.as_slice(),
        VocalizationCategory::Moan => MOAN.as_slice(),
        VocalizationCategory::Gasp => GASP.as_slice(),
        VocalizationCategory::Laugh => LAUGH.as_slice(),
        VocalizationCategory::Cry => CRY.as_slice(),
        VocalizationCategory::Cough => COUGH.as_slice(),
        VocalizationCategory::Sigh => SIGH.as_slice(),
        VocalizationCategory::Generic => &[],
    }
}

/// Rewrite a pure vocalization into its canonical spelling.
///
/// The result is lowercase. A `!` anywhere in the input yields a trailing
/// `!`; otherwise a `.` yields a trailing `...`.
pub fn transform(text: &str, category: VocalizationCategory) -> String {
    let lowered = text.trim().to_lowercase();
    let has_exclaim = text.contains('!');
    let has_period = text.contains('.');

    let stripped = PUNCT_RUN_RE.replace_all(&lowered, "");
    let stripped = stripped.trim_end_matches(['!', '.']);

    let mut out = respellings(category)
        .iter()
        .find(|r| r.pattern.is_match(stripped))
        .map(|r| r.replacement.to_string())
        .unwrap_or_else(|| stripped.to_string());

    if has_exclaim {
        out.push('!');
    } else if has_period {
        out.push_str("...");
    }
    out
}
