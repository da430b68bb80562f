//! Case-insensitive substring search over history entries.

use popt_types::Entry;

/// A parsed search query.
///
/// A blank query matches everything. Otherwise an entry matches when the
/// lowercased query occurs in its original prompt, its optimized prompt, any
/// tag, or any related prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    needle: Option<String>,
}

impl SearchQuery {
    pub fn new(query: &str) -> Self {
        let needle = if query.trim().is_empty() {
            None
        } else {
            Some(query.to_lowercase())
        };
        Self { needle }
    }

    /// Returns `true` if the query matches every entry.
    pub fn is_blank(&self) -> bool {
        self.needle.is_none()
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        let hit = |text: &str| text.to_lowercase().contains(needle.as_str());
        hit(&entry.original)
            || hit(&entry.optimized)
            || entry.tags.iter().any(|t| hit(t))
            || entry.related.iter().any(|r| hit(r))
    }
}

/// Entries matching `query`, in their existing order.
pub fn search(query: &str, entries: &[Entry]) -> Vec<Entry> {
    let query = SearchQuery::new(query);
    entries
        .iter()
        .filter(|e| query.matches(e))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use popt_types::{OptimizationResult, Timestamp};
    use proptest::prelude::*;

    fn entry(id: &str, original: &str, optimized: &str, tags: &[&str], related: &[&str]) -> Entry {
        let mut e = Entry::new(
            original,
            OptimizationResult {
                optimized: optimized.into(),
                score: None,
                explanation: "hidden explanation".into(),
                related: related.iter().map(|s| s.to_string()).collect(),
            },
            tags.iter().map(|s| s.to_string()).collect(),
            vec![],
            Timestamp::from("t"),
        );
        e.id = id.into();
        e
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("1", "Write a Poem", "x", &[], &[]),
            entry("2", "a", "Summarize the REPORT", &[], &[]),
            entry("3", "a", "b", &["Marketing"], &[]),
            entry("4", "a", "b", &[], &["draft a poem about rain"]),
            entry("5", "nothing here", "nor here", &["misc"], &["other"]),
        ]
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn blank_query_returns_everything_in_order() {
        let all = sample();
        assert_eq!(search("", &all), all);
        assert_eq!(search("   \t", &all), all);
        assert!(SearchQuery::new(" ").is_blank());
    }

    #[test]
    fn matches_each_field_case_insensitively() {
        let all = sample();
        assert_eq!(ids(&search("POEM", &all)), vec!["1", "4"]);
        assert_eq!(ids(&search("report", &all)), vec!["2"]);
        assert_eq!(ids(&search("market", &all)), vec!["3"]);
        assert_eq!(ids(&search("rain", &all)), vec!["4"]);
    }

    #[test]
    fn explanation_is_not_searched() {
        assert!(search("hidden", &sample()).is_empty());
    }

    #[test]
    fn query_is_not_trimmed_when_non_blank() {
        let all = sample();
        assert_eq!(ids(&search("poem ", &all)), vec!["4"]);
    }

    proptest! {
        #[test]
        fn result_is_ordered_subset(query in "[a-z ]{0,4}") {
            let all = sample();
            let found = search(&query, &all);
            let needle = query.to_lowercase();
            let contains = |e: &Entry| {
                query.trim().is_empty()
                    || e.original.to_lowercase().contains(&needle)
                    || e.optimized.to_lowercase().contains(&needle)
                    || e.tags.iter().chain(e.related.iter()).any(|s| s.to_lowercase().contains(&needle))
            };
            let expected: Vec<&str> = all.iter().filter(|e| contains(e)).map(|e| e.id.as_str()).collect();
            prop_assert_eq!(ids(&found), expected);
        }
    }
}
