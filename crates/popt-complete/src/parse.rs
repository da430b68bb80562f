//! Parsing model replies into optimization results.
//!
//! The model is asked for a JSON object with `optimized`, `score`,
//! `explanation` and `related`. Replies are accepted when they contain such
//! an object, optionally wrapped in a Markdown code fence. Anything else
//! becomes [`OptimizationResult::fallback`] with the raw reply as the
//! optimized text.

use popt_types::{OptimizationResult, Score};
use serde_json::Value;
use tracing::debug;

/// Parse a model reply, falling back when it is not the expected object.
pub fn parse_reply(raw: &str) -> OptimizationResult {
    match parse_object(raw) {
        Some(result) => result,
        None => {
            debug!(len = raw.len(), "reply is not a result object; using fallback");
            OptimizationResult::fallback(raw)
        }
    }
}

fn parse_object(raw: &str) -> Option<OptimizationResult> {
    let body = strip_code_fence(raw.trim());
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;
    let optimized = obj.get("optimized")?.as_str()?.to_string();
    Some(OptimizationResult {
        optimized,
        score: obj.get("score").and_then(Score::from_json),
        explanation: obj
            .get("explanation")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        related: obj
            .get("related")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    })
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return text;
    };
    match rest.find('\n') {
        Some(newline) => rest[newline + 1..].trim(),
        None => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_reply() {
        let raw = r#"{"optimized":"Write a 300-word poem","score":82,"explanation":"More specific","related":["Write a haiku","Write a limerick"]}"#;
        let r = parse_reply(raw);
        assert_eq!(r.optimized, "Write a 300-word poem");
        assert_eq!(r.score.map(Score::value), Some(82));
        assert_eq!(r.explanation, "More specific");
        assert_eq!(r.related, vec!["Write a haiku", "Write a limerick"]);
    }

    #[test]
    fn null_score_is_unscored() {
        let r = parse_reply(r#"{"optimized":"x","score":null,"explanation":"e","related":[]}"#);
        assert!(r.score.is_none());
    }

    #[test]
    fn plain_text_uses_fallback() {
        let raw = "Here is a better prompt: write clearly.";
        let r = parse_reply(raw);
        assert_eq!(r, OptimizationResult::fallback(raw));
        assert_eq!(r.score.map(Score::value), Some(70));
        assert_eq!(r.explanation, "Auto-generated");
    }

    #[test]
    fn json_without_optimized_uses_fallback() {
        let raw = r#"{"score": 90}"#;
        assert_eq!(parse_reply(raw).optimized, raw);
        let raw = "[1, 2, 3]";
        assert_eq!(parse_reply(raw).optimized, raw);
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let raw = "```json\n{\"optimized\":\"fenced\",\"score\":60}\n```";
        let r = parse_reply(raw);
        assert_eq!(r.optimized, "fenced");
        assert_eq!(r.score.map(Score::value), Some(60));

        let raw = "```\n{\"optimized\":\"bare fence\"}\n```";
        assert_eq!(parse_reply(raw).optimized, "bare fence");
    }

    #[test]
    fn out_of_range_and_string_scores_are_normalized() {
        assert_eq!(parse_reply(r#"{"optimized":"x","score":140}"#).score.map(Score::value), Some(100));
        assert_eq!(parse_reply(r#"{"optimized":"x","score":-5}"#).score.map(Score::value), Some(0));
        assert_eq!(parse_reply(r#"{"optimized":"x","score":"77"}"#).score.map(Score::value), Some(77));
        assert_eq!(parse_reply(r#"{"optimized":"x","score":84.6}"#).score.map(Score::value), Some(85));
        assert!(parse_reply(r#"{"optimized":"x","score":"high"}"#).score.is_none());
    }

    #[test]
    fn missing_optional_fields_default() {
        let r = parse_reply(r#"{"optimized":"x","related":["ok", 3, null]}"#);
        assert!(r.explanation.is_empty());
        assert_eq!(r.related, vec!["ok"]);
    }
}
