//! Word-level comparison of optimization results.
//!
//! Two states of an entry (any stored version or the current result) can be
//! compared. The optimized texts are diffed word by word and the score
//! change is reported alongside.
//!
//! # Key Types
//!
//! - [`WordDiff`] / [`Segment`] -- word-level diff of two texts
//! - [`VersionComparison`] -- diff plus metadata for two states of an entry

pub mod compare;
pub mod error;
pub mod word_diff;

pub use compare::{compare_versions, compare_latest, VersionComparison};
pub use error::{DiffError, DiffResult};
pub use word_diff::{diff_words, Segment, WordDiff};
