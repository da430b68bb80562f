//! Version chains.
//!
//! An entry's `versions` list holds the results it has superseded, oldest
//! first. Re-optimizing an entry snapshots the current top-level result into
//! the chain and then overwrites the top-level fields, so the last version
//! is always the state immediately before the current one.

use popt_types::{Entry, OptimizationResult, Score, Timestamp, Version};

/// Record `result` as the entry's new current result.
///
/// The superseded result is appended to `versions` with `created_at = now`;
/// `optimized`, `score`, `explanation`, `related` and `updated_at` are then
/// replaced. Other fields are untouched.
pub fn append_version(mut entry: Entry, result: OptimizationResult, now: Timestamp) -> Entry {
    entry.versions.push(Version::snapshot_of(&entry, now.clone()));
    entry.optimized = result.optimized;
    entry.score = result.score;
    entry.explanation = result.explanation;
    entry.related = result.related;
    entry.updated_at = Some(now);
    entry
}

/// One comparable state of an entry: a stored version or the current result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot<'a> {
    /// Position in the chain; `entry.versions.len()` for the current result.
    pub index: usize,
    pub optimized: &'a str,
    pub score: Option<Score>,
    pub explanation: &'a str,
    pub created_at: &'a Timestamp,
    pub is_current: bool,
}

/// Every state of `entry`, oldest first, ending with the current result.
pub fn snapshots(entry: &Entry) -> Vec<Snapshot<'_>> {
    let mut out: Vec<Snapshot<'_>> = entry
        .versions
        .iter()
        .enumerate()
        .map(|(index, v)| Snapshot {
            index,
            optimized: &v.optimized,
            score: v.score,
            explanation: &v.explanation,
            created_at: &v.created_at,
            is_current: false,
        })
        .collect();
    out.push(Snapshot {
        index: entry.versions.len(),
        optimized: &entry.optimized,
        score: entry.score,
        explanation: &entry.explanation,
        created_at: entry.last_modified(),
        is_current: true,
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn result(text: &str, score: Option<u8>) -> OptimizationResult {
        OptimizationResult {
            optimized: text.to_string(),
            score: score.map(|s| Score::new(s).unwrap()),
            explanation: format!("why {text}"),
            related: vec![format!("related to {text}")],
        }
    }

    fn fresh() -> Entry {
        Entry::new(
            "draft an email",
            result("r0", Some(50)),
            vec!["mail".into()],
            vec!["default-email".into()],
            Timestamp::from("t0"),
        )
    }

    #[test]
    fn fresh_entry_has_no_versions() {
        assert!(fresh().versions.is_empty());
    }

    #[test]
    fn append_snapshots_superseded_result() {
        let entry = fresh();
        let created = entry.created_at.clone();
        let updated = append_version(entry, result("r1", Some(80)), Timestamp::from("t1"));

        assert_eq!(updated.versions.len(), 1);
        let v = &updated.versions[0];
        assert_eq!(v.optimized, "r0");
        assert_eq!(v.score.map(Score::value), Some(50));
        assert_eq!(v.explanation, "why r0");
        assert_eq!(v.created_at, Timestamp::from("t1"));

        assert_eq!(updated.optimized, "r1");
        assert_eq!(updated.score.map(Score::value), Some(80));
        assert_eq!(updated.related, vec!["related to r1"]);
        assert_eq!(updated.updated_at, Some(Timestamp::from("t1")));
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.tags, vec!["mail"]);
        assert_eq!(updated.templates_used, vec!["default-email"]);
    }

    #[test]
    fn unscored_result_stays_unscored_in_chain() {
        let mut entry = fresh();
        entry = append_version(entry, result("r1", None), Timestamp::from("t1"));
        entry = append_version(entry, result("r2", Some(0)), Timestamp::from("t2"));
        assert!(entry.versions[1].score.is_none());
        assert_eq!(entry.score.map(Score::value), Some(0));
    }

    #[test]
    fn snapshots_end_with_current() {
        let mut entry = fresh();
        entry = append_version(entry, result("r1", Some(60)), Timestamp::from("t1"));
        let snaps = snapshots(&entry);
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].optimized, "r0");
        assert!(!snaps[0].is_current);
        assert_eq!(snaps[1].optimized, "r1");
        assert_eq!(snaps[1].index, 1);
        assert!(snaps[1].is_current);
    }

    proptest! {
        #[test]
        fn chain_length_and_contents_track_saves(n in 1usize..20) {
            let mut entry = Entry::new("p", result("r0", None), vec![], vec![], Timestamp::from("t"));
            let mut current_before_save = Vec::new();
            for k in 1..n {
                current_before_save.push(entry.optimized.clone());
                entry = append_version(entry, result(&format!("r{k}"), Some(50)), Timestamp::from("t"));
            }
            prop_assert_eq!(entry.versions.len(), n - 1);
            for (k, v) in entry.versions.iter().enumerate() {
                prop_assert_eq!(&v.optimized, &current_before_save[k]);
            }
        }
    }
}
