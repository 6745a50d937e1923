//! Applications triage
//!
//! The fetched applications are kept for the lifetime of the page so a
//! detail view never goes back to the network. Deleting drops the row in
//! place instead of re-fetching.

use std::sync::Mutex;

use crate::backend::Backend;
use crate::db::repositories::ApplicationRepository;
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{Application, ApplicationStatus};
use crate::views::{
    ApplicationAction, ApplicationModal, ApplicationRow, ApplicationsView, ListState, ModalClick,
};

use super::in_flight::{InFlight, OperationKey};
use super::prompt::DynPrompt;

const EMPTY_TEXT: &str = "No applications have been submitted yet.";

struct TriageState {
    records: Vec<Application>,
    table: ListState<ApplicationRow>,
    modal: Option<ApplicationModal>,
}

pub struct ApplicationsTriage {
    repo: ApplicationRepository,
    prompt: DynPrompt,
    in_flight: InFlight,
    state: Mutex<TriageState>,
}

impl ApplicationsTriage {
    pub fn new(backend: &Backend, prompt: DynPrompt) -> Self {
        Self {
            repo: ApplicationRepository::new(backend.store.clone()),
            prompt,
            in_flight: InFlight::new(),
            state: Mutex::new(TriageState {
                records: Vec::new(),
                table: ListState::Loading("Loading applications...".to_string()),
                modal: None,
            }),
        }
    }

    /// Fetch all applications, newest first
    pub async fn list(&self) -> ConsoleResult<()> {
        self.state().table = ListState::Loading("Loading applications...".to_string());

        let result = self.repo.list().await;

        let mut state = self.state();
        match result {
            Ok(records) => {
                let rows = records.iter().map(ApplicationRow::from).collect();
                state.table = ListState::from_items(rows, EMPTY_TEXT);
                state.records = records;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error loading applications: {}", e);
                state.records.clear();
                state.table = ListState::Error(format!("Error loading applications: {}", e.message));
                Err(ConsoleError::query(e))
            }
        }
    }

    /// Persist a new status picked in the row's selector
    ///
    /// The selector keeps showing the picked status even when the update
    /// fails; only the alert tells the admin it was not stored.
    pub async fn update_status(&self, id: i64, status: ApplicationStatus) -> ConsoleResult<()> {
        let _token = self.in_flight.acquire(OperationKey::new("applications", "status").on(id))?;

        {
            let mut state = self.state();
            let row = state
                .table
                .items_mut()
                .and_then(|rows| rows.iter_mut().find(|row| row.id == id))
                .ok_or_else(|| not_listed(id))?;
            row.status = status;
        }

        if let Err(e) = self.repo.update_status(id, status).await {
            tracing::error!("Failed to update status of application {}: {}", id, e);
            self.prompt.alert(&format!("Failed to update status: {}", e.message));
            return Err(ConsoleError::query(e));
        }

        tracing::info!("Application {} marked {}", id, status);
        if let Some(record) = self.state().records.iter_mut().find(|r| r.id == id) {
            record.status = status;
        }
        Ok(())
    }

    /// Delete after confirmation. Returns `false` if declined.
    pub async fn delete(&self, id: i64) -> ConsoleResult<bool> {
        let _token = self.in_flight.acquire(OperationKey::new("applications", "delete").on(id))?;

        if !self.state().table.items().iter().any(|row| row.id == id) {
            return Err(not_listed(id));
        }
        if !self
            .prompt
            .confirm("Are you sure you want to delete this application? This action cannot be undone.")
        {
            return Ok(false);
        }

        if let Err(e) = self.repo.delete(id).await {
            tracing::error!("Failed to delete application {}: {}", id, e);
            self.prompt.alert(&format!("Failed to delete application: {}", e.message));
            return Err(ConsoleError::query(e));
        }

        tracing::info!("Application {} deleted", id);
        let mut state = self.state();
        if let Some(rows) = state.table.items_mut() {
            rows.retain(|row| row.id != id);
        }
        state.records.retain(|record| record.id != id);
        Ok(true)
    }

    /// Open the detail modal from the records already fetched
    pub fn view_detail(&self, id: i64) -> ConsoleResult<()> {
        let mut state = self.state();
        let modal = state
            .records
            .iter()
            .find(|record| record.id == id)
            .map(ApplicationModal::from)
            .ok_or_else(|| not_listed(id))?;
        state.modal = Some(modal);
        Ok(())
    }

    pub fn modal_click(&self, click: ModalClick) {
        if click.dismisses() {
            self.state().modal = None;
        }
    }

    pub async fn dispatch(&self, action: ApplicationAction) -> ConsoleResult<()> {
        match action {
            ApplicationAction::View(id) => self.view_detail(id),
            ApplicationAction::Delete(id) => self.delete(id).await.map(|_| ()),
            ApplicationAction::SetStatus(id, status) => self.update_status(id, status).await,
            ApplicationAction::Modal(click) => {
                self.modal_click(click);
                Ok(())
            }
        }
    }

    pub fn view(&self) -> ApplicationsView {
        let state = self.state();
        ApplicationsView {
            table: state.table.clone(),
            modal: state.modal.clone(),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, TriageState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn not_listed(id: i64) -> ConsoleError {
    ConsoleError::NotFound(format!("Application {} is not listed.", id))
}
