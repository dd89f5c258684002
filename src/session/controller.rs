// src/session/controller.rs — One user turn against the store and the model

use super::{Message, Role, SessionStore};
use crate::infra::errors::ProfessorError;
use crate::provider::CompletionService;

/// Sequences turns. Holds only the service handle and the system prompt,
/// both constructed once at startup.
pub struct SessionController<'a> {
    service: &'a dyn CompletionService,
    system_prompt: &'a str,
}

impl<'a> SessionController<'a> {
    pub fn new(service: &'a dyn CompletionService, system_prompt: &'a str) -> Self {
        Self {
            service,
            system_prompt,
        }
    }

    /// Send `input` with the selected transcript, then record the exchange.
    ///
    /// The store is untouched unless the completion succeeds, so a
    /// `Completion` error can be retried with the same input. A `Persist`
    /// error means the reply is in memory but not yet on disk.
    pub async fn turn(
        &self,
        store: &mut SessionStore,
        input: &str,
    ) -> Result<Message, ProfessorError> {
        if store.selected().is_none() {
            return Err(ProfessorError::NoSelection);
        }
        let user = Message::user(input)?;

        let mut history = Vec::with_capacity(store.selected_messages().len() + 1);
        history.extend_from_slice(store.selected_messages());
        history.push(user);

        let reply = self.service.complete(&history, self.system_prompt).await?;
        if reply.role() != Role::Assistant {
            return Err(ProfessorError::completion(
                self.service.id(),
                format!("expected an assistant reply, got {}", reply.role()),
            ));
        }

        store.append_exchange(input, reply.content())?;
        Ok(reply)
    }
}
