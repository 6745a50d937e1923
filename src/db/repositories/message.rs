//! `contact_messages` repository

use serde_json::json;

use crate::db::{tables, DynDataStore, Filter, Select};
use crate::error::BackendError;
use crate::models::{ContactMessage, ContactSubmission, MessageStatus};

use super::{decode_rows, encode_row};

#[derive(Clone)]
pub struct MessageRepository {
    store: DynDataStore,
}

impl MessageRepository {
    pub fn new(store: DynDataStore) -> Self {
        Self { store }
    }

    /// All messages, newest first
    pub async fn list(&self) -> Result<Vec<ContactMessage>, BackendError> {
        let rows = self
            .store
            .select(&Select::from(tables::CONTACT_MESSAGES).order("created_at", false))
            .await?;
        decode_rows(rows)
    }

    pub async fn submit(&self, submission: &ContactSubmission) -> Result<(), BackendError> {
        self.store
            .insert(tables::CONTACT_MESSAGES, vec![encode_row(submission)?])
            .await
    }

    pub async fn mark_read(&self, id: i64) -> Result<(), BackendError> {
        self.store
            .update(
                tables::CONTACT_MESSAGES,
                json!({ "status": MessageStatus::Read.to_string() }),
                &Filter::eq("id", id),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), BackendError> {
        self.store
            .delete(tables::CONTACT_MESSAGES, &Filter::eq("id", id))
            .await
    }
}
