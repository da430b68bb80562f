//! Completion client for the prompt optimizer.
//!
//! The remote language model is reached through the [`Completer`] trait:
//! given a system instruction and the user's prompt it returns raw text.
//! [`parse_reply`] turns that text into an [`OptimizationResult`], falling
//! back to treating the whole reply as the optimized prompt when it is not
//! the expected JSON object.
//!
//! # Implementations
//!
//! - [`ChatCompleter`] -- OpenAI-compatible chat completions over HTTP
//! - [`ScriptedCompleter`] -- canned replies for tests and offline use
//!
//! [`OptimizationResult`]: popt_types::OptimizationResult

pub mod chat;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod scripted;
pub mod traits;

pub use chat::{ChatCompleter, ChatConfig};
pub use error::{CompletionError, CompletionResult};
pub use parse::parse_reply;
pub use prompt::SYSTEM_PROMPT;
pub use scripted::ScriptedCompleter;
pub use traits::Completer;
