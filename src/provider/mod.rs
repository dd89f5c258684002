// src/provider/mod.rs — Completion service layer

pub mod anthropic;

use async_trait::async_trait;

use crate::infra::errors::ProfessorError;
use crate::session::Message;

/// A remote language model that answers one transcript with one reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    fn id(&self) -> &str;

    /// Given the full history (oldest first, ending with the new user turn)
    /// and the system prompt, return exactly one assistant message.
    /// Failures are `ProfessorError::Completion` and are never retried here.
    async fn complete(
        &self,
        history: &[Message],
        system_prompt: &str,
    ) -> Result<Message, ProfessorError>;
}
