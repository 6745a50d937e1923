//! `applications` repository

use serde_json::{json, Value};

use crate::db::{tables, DynDataStore, Filter, Select};
use crate::error::BackendError;
use crate::models::{Application, ApplicationStatus, ApplicationSubmission};

use super::decode_rows;

#[derive(Clone)]
pub struct ApplicationRepository {
    store: DynDataStore,
}

impl ApplicationRepository {
    pub fn new(store: DynDataStore) -> Self {
        Self { store }
    }

    /// All applications, newest first
    pub async fn list(&self) -> Result<Vec<Application>, BackendError> {
        let rows = self
            .store
            .select(&Select::from(tables::APPLICATIONS).order("created_at", false))
            .await?;
        decode_rows(rows)
    }

    /// Insert a public submission; empty fields are dropped first
    pub async fn submit(&self, submission: ApplicationSubmission) -> Result<(), BackendError> {
        self.store
            .insert(tables::APPLICATIONS, vec![Value::Object(submission.into_row())])
            .await
    }

    pub async fn update_status(&self, id: i64, status: ApplicationStatus) -> Result<(), BackendError> {
        self.store
            .update(
                tables::APPLICATIONS,
                json!({ "status": status.to_string() }),
                &Filter::eq("id", id),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), BackendError> {
        self.store
            .delete(tables::APPLICATIONS, &Filter::eq("id", id))
            .await
    }
}
