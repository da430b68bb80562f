//! Comparing two states of an entry.
//!
//! States are addressed by their position in the version chain, oldest
//! first; index `entry.versions.len()` is the current result.

use popt_history::snapshots;
use popt_types::{Entry, Score, Timestamp};
use serde::Serialize;

use crate::error::{DiffError, DiffResult};
use crate::word_diff::{diff_words, WordDiff};

/// Side-by-side metadata and word diff for two states of an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VersionComparison {
    pub from_index: usize,
    pub to_index: usize,
    pub from_created_at: Timestamp,
    pub to_created_at: Timestamp,
    pub from_score: Option<Score>,
    pub to_score: Option<Score>,
    /// `to_score - from_score`, when both sides are scored.
    pub score_delta: Option<i16>,
    pub diff: WordDiff,
}

/// Compare state `from` with state `to`.
pub fn compare_versions(entry: &Entry, from: usize, to: usize) -> DiffResult<VersionComparison> {
    let states = snapshots(entry);
    let available = states.len();
    if available < 2 {
        return Err(DiffError::NotEnoughVersions { available });
    }
    let pick = |index: usize| {
        states
            .get(index)
            .ok_or(DiffError::IndexOutOfRange { index, available })
    };
    let a = pick(from)?;
    let b = pick(to)?;

    let score_delta = match (a.score, b.score) {
        (Some(x), Some(y)) => Some(i16::from(y.value()) - i16::from(x.value())),
        _ => None,
    };

    Ok(VersionComparison {
        from_index: from,
        to_index: to,
        from_created_at: a.created_at.clone(),
        to_created_at: b.created_at.clone(),
        from_score: a.score,
        to_score: b.score,
        score_delta,
        diff: diff_words(a.optimized, b.optimized),
    })
}

/// Compare the most recent stored version with the current result.
pub fn compare_latest(entry: &Entry) -> DiffResult<VersionComparison> {
    let current = entry.versions.len();
    if current == 0 {
        return Err(DiffError::NotEnoughVersions { available: 1 });
    }
    compare_versions(entry, current - 1, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use popt_history::append_version;
    use popt_types::OptimizationResult;

    fn result(text: &str, score: Option<u8>) -> OptimizationResult {
        OptimizationResult {
            optimized: text.into(),
            score: score.map(|s| Score::new(s).unwrap()),
            explanation: String::new(),
            related: vec![],
        }
    }

    fn entry_with_rounds(rounds: &[(&str, Option<u8>)]) -> Entry {
        let (first, score) = rounds[0];
        let mut entry = Entry::new("p", result(first, score), vec![], vec![], Timestamp::from("t0"));
        for (i, (text, score)) in rounds.iter().enumerate().skip(1) {
            entry = append_version(entry, result(text, *score), Timestamp::from(format!("t{i}")));
        }
        entry
    }

    #[test]
    fn single_state_cannot_be_compared() {
        let entry = entry_with_rounds(&[("only", Some(10))]);
        assert_eq!(
            compare_latest(&entry),
            Err(DiffError::NotEnoughVersions { available: 1 })
        );
        assert_eq!(
            compare_versions(&entry, 0, 0),
            Err(DiffError::NotEnoughVersions { available: 1 })
        );
    }

    #[test]
    fn latest_compares_last_version_with_current() {
        let entry = entry_with_rounds(&[("a b", Some(40)), ("a c", Some(65))]);
        let cmp = compare_latest(&entry).unwrap();
        assert_eq!((cmp.from_index, cmp.to_index), (0, 1));
        assert_eq!(cmp.score_delta, Some(25));
        assert_eq!(cmp.diff.render_inline(), "a [-b-]{+c+}");
    }

    #[test]
    fn arbitrary_pair_and_unscored_delta() {
        let entry = entry_with_rounds(&[("one", None), ("two", Some(50)), ("three", Some(70))]);
        let cmp = compare_versions(&entry, 0, 2).unwrap();
        assert_eq!(cmp.score_delta, None);
        assert_eq!(cmp.to_score.map(Score::value), Some(70));
        assert_eq!(cmp.diff.additions(), 1);
    }

    #[test]
    fn out_of_range_index() {
        let entry = entry_with_rounds(&[("one", None), ("two", None)]);
        assert_eq!(
            compare_versions(&entry, 0, 5),
            Err(DiffError::IndexOutOfRange { index: 5, available: 2 })
        );
    }
}
