//! Query-side text normalization for titles and artist names.
//!
//! Lyrics sources are picky about their query strings: a track titled
//! "Evidências (Ao Vivo)" credited to "Chitãozinho & Xororó" has to become
//! "Evidências" by "Chitãozinho" before most of them return anything useful.
//! Everything in here is a pure function; bad input degrades to an empty
//! string, which callers treat as "cannot query this source".

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Anything that introduces a secondary contributor. The text before the
    /// first match is the primary artist. "com" is the Portuguese "with" and
    /// shows up constantly in regional catalog credits.
    static ref ARTIST_SEPARATOR: Regex =
        Regex::new(r"(?i),|&|\bfeat\.?\b|\bft\.?\b|\bfeaturing\b|\bwith\b|\bcom\b").unwrap();

    /// Parenthetical or bracketed annotations: "(Live)", "[Remix]", etc.
    static ref ANNOTATION: Regex = Regex::new(r"[(\[][^)\]]*[)\]]").unwrap();

    /// Trailing version qualifiers left over once annotations are gone.
    static ref TRAILING_QUALIFIER: Regex =
        Regex::new(r"(?i)[\s\-]+(remix|version|edit)\s*$").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Reduces a raw artist credit to the primary artist name.
pub fn normalize_artist(raw: &str) -> String {
    let primary = match ARTIST_SEPARATOR.find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    };
    let stripped = ANNOTATION.replace_all(primary, " ");
    collapse_whitespace(&stripped)
}

/// Reduces a raw track title to its queryable core.
pub fn normalize_title(raw: &str) -> String {
    let stripped = ANNOTATION.replace_all(raw, " ");
    let mut title = collapse_whitespace(&stripped);
    loop {
        let trimmed = TRAILING_QUALIFIER.replace(&title, "").to_string();
        if trimmed == title {
            break;
        }
        title = trimmed;
    }
    title.trim().to_string()
}

/// Turns arbitrary text into a lowercase hyphenated token safe to embed in
/// a scrape URL path. Diacritics are decomposed and dropped, everything
/// outside alphanumerics/whitespace/hyphen is removed, and runs of
/// whitespace become single hyphens.
pub fn slugify(text: &str) -> String {
    let decomposed: String = text
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect();
    let kept: String = decomposed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    WHITESPACE
        .replace_all(kept.trim(), "-")
        .to_lowercase()
        .trim_matches('-')
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").trim().to_string()
}
