//! School-appropriateness moderation of a resolved track.

pub mod judge;
pub mod llm;

pub use judge::{ModerationJudge, MISSING_LYRICS_SENTINEL};
pub use llm::{GeminiClient, GenerationError, TextGenerator};

use serde::{Deserialize, Serialize};

/// The judge's verdict. Always fully populated: any failure on the way to
/// a verdict is folded into `approved = false` with a synthetic reason, so
/// callers never see a missing or partial decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationDecision {
    pub approved: bool,
    pub reason: String,
}

impl ModerationDecision {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            reason: reason.into(),
        }
    }
}
