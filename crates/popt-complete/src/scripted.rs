use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{CompletionError, CompletionResult};
use crate::traits::Completer;

/// Completer that returns queued replies in order.
///
/// Intended for tests and offline demos. Each call pops the next reply; an
/// exhausted queue yields [`CompletionError::Network`]. Every request is
/// recorded so callers can assert on what was sent.
#[derive(Debug, Default)]
pub struct ScriptedCompleter {
    replies: Mutex<VecDeque<CompletionResult<String>>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: CompletionError) -> Self {
        self.push(Err(error));
        self
    }

    /// `(system, user)` pairs received so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn push(&self, reply: CompletionResult<String>) {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(reply);
        }
    }
}

#[async_trait]
impl Completer for ScriptedCompleter {
    async fn complete(&self, system: &str, user: &str) -> CompletionResult<String> {
        if let Ok(mut r) = self.requests.lock() {
            r.push((system.to_string(), user.to_string()));
        }
        let next = self
            .replies
            .lock()
            .map_err(|e| CompletionError::Network(format!("lock poisoned: {e}")))?
            .pop_front();
        next.unwrap_or_else(|| Err(CompletionError::Network("no scripted reply left".into())))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_in_order_then_errors() {
        let c = ScriptedCompleter::new()
            .with_reply("first")
            .with_error(CompletionError::Http { status: 500, reason: "Internal Server Error".into() });
        assert_eq!(c.complete("sys", "a").await.unwrap(), "first");
        assert!(matches!(c.complete("sys", "b").await, Err(CompletionError::Http { status: 500, .. })));
        assert!(matches!(c.complete("sys", "c").await, Err(CompletionError::Network(_))));
        assert_eq!(c.requests().len(), 3);
        assert_eq!(c.requests()[0].1, "a");
    }
}
