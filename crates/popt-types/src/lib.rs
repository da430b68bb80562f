//! Foundation types for the prompt optimizer.
//!
//! This crate provides the record types shared by every other `popt` crate:
//! the history [`Entry`] with its [`Version`] chain, reusable [`Template`]s,
//! the [`Score`] newtype, and the [`OptimizationResult`] returned by a
//! completion round.
//!
//! # Key Types
//!
//! - [`Entry`] -- one tracked prompt and its latest optimization
//! - [`Version`] -- immutable snapshot of a superseded result
//! - [`Template`] -- reusable seed text for new prompts
//! - [`Score`] -- quality score in `0..=100`; "unscored" is `Option::None`
//! - [`Timestamp`] -- ISO-8601 timestamp string
//! - [`OptimizationResult`] -- parsed output of one optimization round

pub mod entry;
pub mod error;
pub mod id;
pub mod result;
pub mod score;
pub mod template;
pub mod temporal;

pub use entry::{Entry, Version, REQUIRED_ENTRY_FIELDS};
pub use error::TypeError;
pub use id::{new_id, short_id};
pub use result::{OptimizationResult, FALLBACK_EXPLANATION, FALLBACK_SCORE};
pub use score::{Score, ScoreBand};
pub use template::{Template, DEFAULT_TEMPLATE_IDS};
pub use temporal::Timestamp;
