//! Messages triage
//!
//! Cards are updated in place after a successful action; nothing is
//! re-fetched.

use std::sync::Mutex;

use crate::backend::Backend;
use crate::db::repositories::MessageRepository;
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::MessageStatus;
use crate::views::{ListState, MessageAction, MessageCard};

use super::in_flight::{InFlight, OperationKey};
use super::prompt::DynPrompt;

const EMPTY_TEXT: &str = "No messages have been received yet.";

pub struct MessagesTriage {
    repo: MessageRepository,
    prompt: DynPrompt,
    in_flight: InFlight,
    cards: Mutex<ListState<MessageCard>>,
}

impl MessagesTriage {
    pub fn new(backend: &Backend, prompt: DynPrompt) -> Self {
        Self {
            repo: MessageRepository::new(backend.store.clone()),
            prompt,
            in_flight: InFlight::new(),
            cards: Mutex::new(ListState::Loading("Loading messages...".to_string())),
        }
    }

    /// Fetch all messages, newest first, collapsed
    pub async fn list(&self) -> ConsoleResult<()> {
        *self.cards() = ListState::Loading("Loading messages...".to_string());

        let result = self.repo.list().await;

        let mut cards = self.cards();
        match result {
            Ok(messages) => {
                *cards = ListState::from_items(messages.iter().map(MessageCard::from).collect(), EMPTY_TEXT);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error loading messages: {}", e);
                *cards = ListState::Error(format!("Error loading messages: {}", e.message));
                Err(ConsoleError::query(e))
            }
        }
    }

    /// Mark a New message Read. Already-Read messages are left alone.
    pub async fn mark_read(&self, id: i64) -> ConsoleResult<()> {
        let status = self.with_card(id, |card| card.status)?;
        if status == MessageStatus::Read {
            return Ok(());
        }

        let _token = self.in_flight.acquire(OperationKey::new("messages", "mark_read").on(id))?;

        if let Err(e) = self.repo.mark_read(id).await {
            tracing::error!("Failed to mark message {} read: {}", id, e);
            self.prompt.alert(&format!("Failed to update status: {}", e.message));
            return Err(ConsoleError::query(e));
        }

        // the card may have been deleted meanwhile
        let _ = self.with_card(id, |card| card.status = MessageStatus::Read);
        Ok(())
    }

    /// Delete after confirmation. Returns `false` if declined.
    pub async fn delete(&self, id: i64) -> ConsoleResult<bool> {
        let _token = self.in_flight.acquire(OperationKey::new("messages", "delete").on(id))?;

        self.with_card(id, |_| ())?;
        if !self.prompt.confirm("Are you sure you want to delete this message?") {
            return Ok(false);
        }

        if let Err(e) = self.repo.delete(id).await {
            tracing::error!("Failed to delete message {}: {}", id, e);
            self.prompt.alert(&format!("Failed to delete message: {}", e.message));
            return Err(ConsoleError::query(e));
        }

        tracing::info!("Message {} deleted", id);
        if let Some(cards) = self.cards().items_mut() {
            cards.retain(|card| card.id != id);
        }
        Ok(true)
    }

    /// Show or hide the message body
    pub fn toggle_body(&self, id: i64) -> ConsoleResult<()> {
        self.with_card(id, |card| card.expanded = !card.expanded)
    }

    pub async fn dispatch(&self, action: MessageAction) -> ConsoleResult<()> {
        match action {
            MessageAction::ToggleBody(id) => self.toggle_body(id),
            MessageAction::MarkRead(id) => self.mark_read(id).await,
            MessageAction::Delete(id) => self.delete(id).await.map(|_| ()),
        }
    }

    pub fn view(&self) -> ListState<MessageCard> {
        self.cards().clone()
    }

    fn with_card<T>(&self, id: i64, f: impl FnOnce(&mut MessageCard) -> T) -> ConsoleResult<T> {
        let mut cards = self.cards();
        cards
            .items_mut()
            .and_then(|cards| cards.iter_mut().find(|card| card.id == id))
            .map(f)
            .ok_or_else(|| ConsoleError::NotFound(format!("Message {} is not listed.", id)))
    }

    fn cards(&self) -> std::sync::MutexGuard<'_, ListState<MessageCard>> {
        self.cards.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{tables, Operation};
    use crate::testing::{MemoryBackend, ScriptedPrompt};
    use crate::views::{NEW_ACCENT, READ_ACCENT};
    use std::sync::Arc;

    fn seeded() -> MemoryBackend {
        let mem = MemoryBackend::signed_in("u1");
        mem.seed_message(1, "Ana", "New");
        mem.seed_message(2, "Ben", "Read");
        mem
    }

    fn card(triage: &MessagesTriage, id: i64) -> MessageCard {
        triage
            .view()
            .items()
            .iter()
            .find(|card| card.id == id)
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_cards_with_accents() {
        let mem = seeded();
        let triage = MessagesTriage::new(&mem.backend(), Arc::new(ScriptedPrompt::accepting()));
        triage.list().await.unwrap();

        let view = triage.view();
        assert_eq!(view.items()[0].name, "Ben");
        assert_eq!(card(&triage, 1).accent(), NEW_ACCENT);
        assert_eq!(card(&triage, 2).accent(), READ_ACCENT);
        assert!(view.items().iter().all(|c| !c.expanded));
        assert_eq!(card(&triage, 1).reply_href(), "mailto:ana@example.com");
    }

    #[tokio::test]
    async fn test_mark_read_updates_in_place_and_is_idempotent() {
        let mem = seeded();
        let triage = MessagesTriage::new(&mem.backend(), Arc::new(ScriptedPrompt::accepting()));
        triage.list().await.unwrap();
        let before = mem.store.call_count();

        triage.dispatch(MessageAction::MarkRead(1)).await.unwrap();
        assert_eq!(mem.store.call_count(), before + 1);

        let ana = card(&triage, 1);
        assert_eq!(ana.status, MessageStatus::Read);
        assert_eq!(ana.accent(), READ_ACCENT);
        assert_eq!(ana.actions(), vec![MessageAction::Delete(1)]);

        triage.mark_read(1).await.unwrap();
        assert_eq!(mem.store.call_count(), before + 1);
        assert_eq!(card(&triage, 1).actions(), vec![MessageAction::Delete(1)]);
        assert_eq!(mem.store.rows(tables::CONTACT_MESSAGES)[0]["status"], "Read");
    }

    #[tokio::test]
    async fn test_mark_read_failure_leaves_card() {
        let mem = seeded();
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let triage = MessagesTriage::new(&mem.backend(), prompt.clone());
        triage.list().await.unwrap();
        mem.store.fail_on(Operation::Update, tables::CONTACT_MESSAGES, "permission denied");

        assert!(triage.mark_read(1).await.is_err());
        assert_eq!(card(&triage, 1).status, MessageStatus::New);
        assert_eq!(
            card(&triage, 1).actions(),
            vec![MessageAction::Delete(1), MessageAction::MarkRead(1)]
        );
        assert_eq!(prompt.alerts(), vec!["Failed to update status: permission denied".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_and_failure() {
        let mem = seeded();
        let prompt = Arc::new(ScriptedPrompt::accepting());
        let triage = MessagesTriage::new(&mem.backend(), prompt.clone());
        triage.list().await.unwrap();

        mem.store.fail_on(Operation::Delete, tables::CONTACT_MESSAGES, "timeout");
        assert!(triage.delete(2).await.is_err());
        assert_eq!(triage.view().items().len(), 2);
        assert_eq!(prompt.alerts(), vec!["Failed to delete message: timeout".to_string()]);

        mem.store.clear_failures();
        assert!(triage.delete(2).await.unwrap());
        assert_eq!(triage.view().items().len(), 1);
        assert_eq!(mem.store.rows(tables::CONTACT_MESSAGES).len(), 1);
    }

    #[tokio::test]
    async fn test_each_delete_asks_again() {
        let mem = seeded();
        let prompt = Arc::new(ScriptedPrompt::declining().then_answer(true));
        let triage = MessagesTriage::new(&mem.backend(), prompt.clone());
        triage.list().await.unwrap();

        assert!(triage.delete(1).await.unwrap());
        assert!(!triage.delete(2).await.unwrap());

        assert_eq!(prompt.confirms().len(), 2);
        assert_eq!(triage.view().items().len(), 1);
        assert_eq!(card(&triage, 2).name, "Ben");
        assert_eq!(mem.store.rows(tables::CONTACT_MESSAGES).len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_body_does_not_touch_backend() {
        let mem = seeded();
        let triage = MessagesTriage::new(&mem.backend(), Arc::new(ScriptedPrompt::declining()));
        triage.list().await.unwrap();
        let before = mem.store.call_count();

        triage.dispatch(MessageAction::ToggleBody(1)).await.unwrap();
        assert!(card(&triage, 1).expanded);
        assert!(!card(&triage, 2).expanded);
        triage.toggle_body(1).unwrap();
        assert!(!card(&triage, 1).expanded);

        assert_eq!(mem.store.call_count(), before);
        assert!(matches!(triage.toggle_body(9), Err(ConsoleError::NotFound(_))));
    }
}
