use serde::{Deserialize, Serialize};

use crate::score::Score;

/// Score assigned when the model reply cannot be parsed.
pub const FALLBACK_SCORE: u8 = 70;

/// Explanation recorded when the model reply cannot be parsed.
pub const FALLBACK_EXPLANATION: &str = "Auto-generated";

/// Output of one optimization round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// The rewritten prompt.
    pub optimized: String,
    /// Quality score, `None` when the model declined to score.
    #[serde(default)]
    pub score: Option<Score>,
    /// Why the rewrite is better.
    #[serde(default)]
    pub explanation: String,
    /// Suggested follow-up prompts.
    #[serde(default)]
    pub related: Vec<String>,
}

impl OptimizationResult {
    /// Result used when the model reply is not the expected JSON object: the
    /// raw reply becomes the optimized text.
    pub fn fallback(raw: impl Into<String>) -> Self {
        Self {
            optimized: raw.into(),
            score: Some(Score::clamped(i64::from(FALLBACK_SCORE))),
            explanation: FALLBACK_EXPLANATION.to_string(),
            related: Vec::new(),
        }
    }
}
