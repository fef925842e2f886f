//! Heuristic quality floor for fetched lyrics.
//!
//! Sources routinely hand back snippets, empty shells or an error page
//! dressed as a 200. Anything below the floor is treated as "not found"
//! rather than surfaced to the moderation step.

/// Minimum trimmed length for a candidate to count as lyrics at all.
pub const MIN_CHARS: usize = 100;

/// Minimum number of non-empty lines for a candidate to count as lyrics.
pub const MIN_LINES: usize = 3;

/// Length above which a trusted-tier result short-circuits the fallback
/// chain.
pub const EARLY_EXIT_CHARS: usize = 300;

/// Line count above which a trusted-tier result short-circuits the
/// fallback chain.
pub const EARLY_EXIT_LINES: usize = 8;

/// Why a candidate was rejected by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TooShort,
    TooFewLines,
    ErrorPage,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TooShort => "too short",
            RejectReason::TooFewLines => "too few lines",
            RejectReason::ErrorPage => "error page",
        }
    }
}

/// Phrase-sniffing predicate for "this 200 is actually an error or search
/// page". The marker list is data, not code, so it can be unit-tested and
/// extended without touching adapter logic.
#[derive(Debug, Clone)]
pub struct ErrorPageDetector {
    markers: Vec<String>,
}

impl Default for ErrorPageDetector {
    fn default() -> Self {
        Self::new(&[
            "page not found",
            "página não encontrada",
            "no results",
            "search results",
            "did you mean",
        ])
    }
}

impl ErrorPageDetector {
    pub fn new(markers: &[&str]) -> Self {
        Self {
            markers: markers.iter().map(|m| m.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.markers.iter().any(|m| lowered.contains(m))
    }
}

pub fn non_empty_lines(text: &str) -> usize {
    text.lines().filter(|l| !l.trim().is_empty()).count()
}

/// Applies the quality floor to a fetched candidate.
pub fn validate(text: &str, detector: &ErrorPageDetector) -> Result<(), RejectReason> {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_CHARS {
        return Err(RejectReason::TooShort);
    }
    if non_empty_lines(trimmed) < MIN_LINES {
        return Err(RejectReason::TooFewLines);
    }
    if detector.matches(trimmed) {
        return Err(RejectReason::ErrorPage);
    }
    Ok(())
}

/// Whether a validated candidate from a trusted source is strong enough to
/// stop the fallback chain.
pub fn qualifies_for_early_exit(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.chars().count() > EARLY_EXIT_CHARS && non_empty_lines(trimmed) > EARLY_EXIT_LINES
}
