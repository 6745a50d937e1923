//! Stats editor
//!
//! Edits the singleton `school_stats` row. Loading fills the form once;
//! saving writes all three fields and keeps the submitted values on screen.

use std::sync::Mutex;

use crate::backend::Backend;
use crate::db::repositories::StatsRepository;
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{StatsInput, StatsRecord};
use crate::views::{Notice, StatsForm};

use super::in_flight::{InFlight, OperationKey};

pub struct StatsEditor {
    repo: StatsRepository,
    in_flight: InFlight,
    form: Mutex<StatsForm>,
}

impl StatsEditor {
    pub fn new(backend: &Backend) -> Self {
        Self {
            repo: StatsRepository::new(backend.store.clone()),
            in_flight: InFlight::new(),
            form: Mutex::new(StatsForm::default()),
        }
    }

    /// Fetch the record into the form; on failure the fields stay blank
    pub async fn load(&self) -> ConsoleResult<StatsRecord> {
        match self.repo.get().await {
            Ok(record) => {
                self.form().fill(&record);
                Ok(record)
            }
            Err(e) => {
                tracing::error!("Error fetching school stats: {}", e);
                let mut form = self.form();
                *form = StatsForm::default();
                form.notice = Some(Notice::error("Error loading stats."));
                Err(ConsoleError::query(e))
            }
        }
    }

    /// Overwrite the record with `input`
    pub async fn save(&self, input: StatsInput) -> ConsoleResult<()> {
        let _token = self.in_flight.acquire(OperationKey::new("stats", "save"))?;

        {
            let mut form = self.form();
            form.fill_input(&input);
            form.notice = Some(Notice::pending("Saving..."));
        }

        let result = self.repo.update(&input).await;

        let mut form = self.form();
        match result {
            Ok(()) => {
                tracing::info!("School stats updated");
                form.notice = Some(Notice::success("Changes saved successfully!"));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error saving school stats: {}", e);
                form.notice = Some(Notice::error(format!("Error: {}", e.message)));
                Err(ConsoleError::query(e))
            }
        }
    }

    /// Current form contents
    pub fn view(&self) -> StatsForm {
        self.form().clone()
    }

    fn form(&self) -> std::sync::MutexGuard<'_, StatsForm> {
        self.form.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{tables, Operation};
    use crate::testing::MemoryBackend;
    use crate::views::Tone;

    fn input(students: i64) -> StatsInput {
        StatsInput {
            students_enrolled: students,
            qualified_teachers: 30,
            grade_level_text: "K-8".to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_fills_form() {
        let mem = MemoryBackend::signed_in("u1");
        mem.seed_stats(450, 32, "Pre-K to Grade 8");
        let editor = StatsEditor::new(&mem.backend());

        editor.load().await.unwrap();

        let form = editor.view();
        assert_eq!(form.students_enrolled, "450");
        assert_eq!(form.qualified_teachers, "32");
        assert_eq!(form.grade_level_text, "Pre-K to Grade 8");
        assert_eq!(form.notice, None);
    }

    #[tokio::test]
    async fn test_load_failure_leaves_fields_blank() {
        let mem = MemoryBackend::signed_in("u1");
        mem.seed_stats(450, 32, "K-8");
        mem.store.fail_on(Operation::Select, tables::SCHOOL_STATS, "relation does not exist");
        let editor = StatsEditor::new(&mem.backend());

        let err = editor.load().await.unwrap_err();
        assert_eq!(err, ConsoleError::Query("relation does not exist".to_string()));

        let form = editor.view();
        assert_eq!(form.students_enrolled, "");
        assert_eq!(form.notice, Some(Notice::error("Error loading stats.")));
    }

    #[tokio::test]
    async fn test_save_updates_singleton_without_refetch() {
        let mem = MemoryBackend::signed_in("u1");
        mem.seed_stats(450, 32, "K-8");
        let editor = StatsEditor::new(&mem.backend());
        editor.load().await.unwrap();

        editor.save(input(500)).await.unwrap();

        let rows = mem.store.rows(tables::SCHOOL_STATS);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["students_enrolled"], 500);
        assert_eq!(rows[0]["qualified_teachers"], 30);

        let selects = mem
            .store
            .calls()
            .iter()
            .filter(|c| c.operation == Operation::Select)
            .count();
        assert_eq!(selects, 1);

        let form = editor.view();
        assert_eq!(form.students_enrolled, "500");
        assert_eq!(form.notice.map(|n| (n.tone, n.text)), Some((Tone::Success, "Changes saved successfully!".to_string())));
    }

    #[tokio::test]
    async fn test_save_failure_shows_backend_text() {
        let mem = MemoryBackend::signed_in("u1");
        mem.seed_stats(450, 32, "K-8");
        mem.store.fail_on(Operation::Update, tables::SCHOOL_STATS, "permission denied");
        let editor = StatsEditor::new(&mem.backend());

        assert!(editor.save(input(1)).await.is_err());
        assert_eq!(editor.view().notice, Some(Notice::error("Error: permission denied")));
        assert_eq!(mem.store.rows(tables::SCHOOL_STATS)[0]["students_enrolled"], 450);
    }
}
