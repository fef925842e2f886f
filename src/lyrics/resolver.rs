//! Cache-first lyrics resolution across the ordered adapter chain.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::quality::{self, ErrorPageDetector};
use super::{LyricsResult, LyricsSource, ReliabilityTier, SourceTag};
use crate::catalog::Track;
use crate::lyrics_cache::{CacheEntry, LyricsCache};

/// Outcome of one resolution attempt. `result` is `None` when no source
/// produced text above the quality floor; `diagnostic` then summarizes what
/// each adapter did, for operator display only; it is never fed to the
/// moderation judge.
#[derive(Debug)]
pub struct Resolution {
    pub result: Option<LyricsResult>,
    pub diagnostic: String,
}

pub struct LyricsResolver {
    cache: Arc<dyn LyricsCache>,
    sources: Vec<Arc<dyn LyricsSource>>,
    detector: ErrorPageDetector,
}

struct Candidate {
    text: String,
    source: SourceTag,
    chars: usize,
    lines: usize,
}

impl LyricsResolver {
    /// `sources` must already be in priority order, most reliable first.
    pub fn new(cache: Arc<dyn LyricsCache>, sources: Vec<Arc<dyn LyricsSource>>) -> Self {
        Self {
            cache,
            sources,
            detector: ErrorPageDetector::default(),
        }
    }

    pub fn with_detector(mut self, detector: ErrorPageDetector) -> Self {
        self.detector = detector;
        self
    }

    pub async fn resolve(&self, track: &Track, force_refresh: bool) -> Resolution {
        let title = &track.title;
        let artist = track.primary_artist();

        if !force_refresh {
            match self.cache.lookup(&track.id) {
                Ok(Some(entry)) => {
                    debug!(track_id = %track.id, "Lyrics served from cache");
                    return Resolution {
                        result: Some(LyricsResult {
                            text: entry.lyrics,
                            source: SourceTag::Cache,
                            fetched_at: entry.created_at,
                        }),
                        diagnostic: "cache hit".to_string(),
                    };
                }
                Ok(None) => {}
                Err(err) => {
                    // a broken cache must not take lyrics resolution down
                    warn!(track_id = %track.id, error = %err, "Lyrics cache lookup failed");
                }
            }
        }

        let mut outcomes: Vec<String> = Vec::new();
        let mut candidates: Vec<Candidate> = Vec::new();

        for source in &self.sources {
            let tag = source.tag();
            if !source.is_available() {
                outcomes.push(format!("{}: skipped", tag));
                continue;
            }

            let fetched = match source.fetch(title, artist).await {
                Ok(Some(text)) => text,
                Ok(None) => {
                    outcomes.push(format!("{}: no match", tag));
                    continue;
                }
                Err(err) => {
                    debug!(source = %tag, error = %err, "Lyrics source failed");
                    outcomes.push(format!("{}: error ({})", tag, err));
                    continue;
                }
            };

            match quality::validate(&fetched, &self.detector) {
                Ok(()) => {}
                Err(reason) => {
                    outcomes.push(format!("{}: {}", tag, reason.as_str()));
                    continue;
                }
            }

            let trimmed = fetched.trim().to_string();
            let candidate = Candidate {
                chars: trimmed.chars().count(),
                lines: quality::non_empty_lines(&trimmed),
                text: trimmed,
                source: tag,
            };
            outcomes.push(format!("{}: ok ({} chars)", tag, candidate.chars));

            if source.tier() == ReliabilityTier::Trusted
                && quality::qualifies_for_early_exit(&candidate.text)
            {
                info!(track_id = %track.id, source = %tag, "Accepting trusted lyrics early");
                return self.accept(track, candidate, outcomes);
            }

            candidates.push(candidate);
        }

        // longest wins; equal lengths fall back to the denser text
        candidates.sort_by(|a, b| a.chars.cmp(&b.chars).then(a.lines.cmp(&b.lines)));
        match candidates.pop() {
            Some(best) => self.accept(track, best, outcomes),
            None => {
                let diagnostic = outcomes.join("; ");
                info!(track_id = %track.id, %diagnostic, "No usable lyrics found");
                Resolution {
                    result: None,
                    diagnostic,
                }
            }
        }
    }

    fn accept(&self, track: &Track, candidate: Candidate, outcomes: Vec<String>) -> Resolution {
        let entry = CacheEntry::new(
            &track.id,
            &track.title,
            track.primary_artist(),
            &candidate.text,
            candidate.source,
        );
        if let Err(err) = self.cache.upsert(&entry) {
            warn!(track_id = %track.id, error = %err, "Failed to persist lyrics to cache");
        }

        Resolution {
            result: Some(LyricsResult {
                text: candidate.text,
                source: candidate.source,
                fetched_at: Utc::now(),
            }),
            diagnostic: outcomes.join("; "),
        }
    }
}
