//! Word-level text diff.
//!
//! Uses the `similar` crate (Myers diff over word tokens). Adjacent tokens
//! with the same change tag are merged into one [`Segment`], so whitespace
//! between changed words stays inside the segment.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// A run of text that is unchanged, added, or removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment {
    Equal(String),
    Added(String),
    Removed(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Equal(t) | Segment::Added(t) | Segment::Removed(t) => t,
        }
    }
}

/// The result of diffing two texts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WordDiff {
    pub segments: Vec<Segment>,
}

impl WordDiff {
    /// Returns `true` if the two texts are identical.
    pub fn is_unchanged(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Equal(_)))
    }

    /// Number of added words.
    pub fn additions(&self) -> usize {
        self.count_words(|s| matches!(s, Segment::Added(_)))
    }

    /// Number of removed words.
    pub fn deletions(&self) -> usize {
        self.count_words(|s| matches!(s, Segment::Removed(_)))
    }

    /// Inline rendering with `[-removed-]` and `{+added+}` markers.
    pub fn render_inline(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Equal(t) => out.push_str(t),
                Segment::Removed(t) => {
                    out.push_str("[-");
                    out.push_str(t);
                    out.push_str("-]");
                }
                Segment::Added(t) => {
                    out.push_str("{+");
                    out.push_str(t);
                    out.push_str("+}");
                }
            }
        }
        out
    }

    fn count_words(&self, pred: impl Fn(&Segment) -> bool) -> usize {
        self.segments
            .iter()
            .filter(|s| pred(s))
            .map(|s| s.text().split_whitespace().count())
            .sum()
    }
}

/// Compute a word-level diff between `old` and `new`.
pub fn diff_words(old: &str, new: &str) -> WordDiff {
    if old == new {
        let segments = if old.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Equal(old.to_string())]
        };
        return WordDiff { segments };
    }

    let text_diff = TextDiff::from_words(old, new);
    let mut segments: Vec<Segment> = Vec::new();

    for change in text_diff.iter_all_changes() {
        let value = change.value();
        let tag = change.tag();
        match (segments.last_mut(), tag) {
            (Some(Segment::Equal(t)), ChangeTag::Equal)
            | (Some(Segment::Added(t)), ChangeTag::Insert)
            | (Some(Segment::Removed(t)), ChangeTag::Delete) => t.push_str(value),
            _ => segments.push(match tag {
                ChangeTag::Equal => Segment::Equal(value.to_string()),
                ChangeTag::Insert => Segment::Added(value.to_string()),
                ChangeTag::Delete => Segment::Removed(value.to_string()),
            }),
        }
    }

    WordDiff { segments }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebuild(diff: &WordDiff, keep: fn(&Segment) -> bool) -> String {
        diff.segments
            .iter()
            .filter(|s| keep(s))
            .map(Segment::text)
            .collect()
    }

    #[test]
    fn identical_texts_have_no_changes() {
        let diff = diff_words("same words here", "same words here");
        assert!(diff.is_unchanged());
        assert_eq!(diff.additions(), 0);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn empty_texts() {
        assert!(diff_words("", "").segments.is_empty());
        let diff = diff_words("", "new text");
        assert_eq!(diff.additions(), 2);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn single_word_replacement() {
        let diff = diff_words("write a short poem", "write a long poem");
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
        assert_eq!(diff.render_inline(), "write a [-short-]{+long+} poem");
    }

    #[test]
    fn appended_words() {
        let diff = diff_words("summarize the report", "summarize the report in three bullets");
        assert_eq!(diff.deletions(), 0);
        assert_eq!(diff.additions(), 3);
    }

    #[test]
    fn sides_reassemble_original_texts() {
        let old = "Explain recursion to a child";
        let new = "Explain recursion simply to a curious child, with an example";
        let diff = diff_words(old, new);
        let old_side = rebuild(&diff, |s| !matches!(s, Segment::Added(_)));
        let new_side = rebuild(&diff, |s| !matches!(s, Segment::Removed(_)));
        assert_eq!(old_side, old);
        assert_eq!(new_side, new);
    }

    #[test]
    fn segments_serialize_tagged() {
        let diff = diff_words("a", "b");
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(json["segments"][0]["kind"], "removed");
        assert_eq!(json["segments"][1]["kind"], "added");
    }
}
