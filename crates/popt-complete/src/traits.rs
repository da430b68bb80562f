use async_trait::async_trait;

use crate::error::CompletionResult;

/// A remote text-completion service.
///
/// Implementations send `system` as the instruction and `user` as the user
/// message, and return the model's raw reply text.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> CompletionResult<String>;

    /// Short provider name for logs.
    fn provider_name(&self) -> &str;
}
