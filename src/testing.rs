//! Shared fixtures for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::auth::MemoryAuth;
use crate::backend::Backend;
use crate::db::{tables, MemoryStore};
use crate::services::UserPrompt;
use crate::storage::MemoryStorage;

pub(crate) const STORAGE_BASE_URL: &str = "https://project.test";
pub(crate) const ADMIN_EMAIL: &str = "admin@school.org";
pub(crate) const ADMIN_PASSWORD: &str = "secret";

/// In-memory collaborators kept alongside the [`Backend`] built from them
pub(crate) struct MemoryBackend {
    pub auth: Arc<MemoryAuth>,
    pub store: Arc<MemoryStore>,
    pub storage: Arc<MemoryStorage>,
}

impl MemoryBackend {
    /// Signed out; one admin account `admin@school.org` / `secret` (user `u1`)
    pub fn new() -> Self {
        Self::with_auth(MemoryAuth::new())
    }

    pub fn signed_in(user_id: &str) -> Self {
        Self::with_auth(MemoryAuth::new().signed_in_as(user_id))
    }

    fn with_auth(auth: MemoryAuth) -> Self {
        let store = MemoryStore::new()
            .with_default(tables::APPLICATIONS, "status", "Pending")
            .with_default(tables::CONTACT_MESSAGES, "status", "New");
        Self {
            auth: Arc::new(auth.with_account(ADMIN_EMAIL, ADMIN_PASSWORD, "u1")),
            store: Arc::new(store),
            storage: Arc::new(MemoryStorage::new(STORAGE_BASE_URL)),
        }
    }

    pub fn backend(&self) -> Backend {
        Backend::new(self.auth.clone(), self.store.clone(), self.storage.clone())
    }

    pub fn seed_stats(&self, students: i64, teachers: i64, grades: &str) {
        self.store.seed(
            tables::SCHOOL_STATS,
            vec![json!({
                "id": 1,
                "students_enrolled": students,
                "qualified_teachers": teachers,
                "grade_level_text": grades,
            })],
        );
    }

    /// A gallery post whose image exists in storage; returns its URL
    pub fn seed_post(&self, id: i64, title: &str, object_path: &str) -> String {
        self.storage.put("gallery-images", object_path, vec![0xFF, 0xD8]);
        let url = format!(
            "{}/storage/v1/object/public/gallery-images/{}",
            STORAGE_BASE_URL, object_path
        );
        self.store.seed(
            tables::GALLERY_POSTS,
            vec![json!({
                "id": id,
                "title": title,
                "description": null,
                "image_url": url,
                "user_id": "u1",
            })],
        );
        url
    }

    pub fn seed_application(&self, id: i64, first: &str, last: &str, status: &str, extra: Value) {
        let mut row = json!({
            "id": id,
            "first_name": first,
            "last_name": last,
            "grade_level": "Grade 3",
            "status": status,
        });
        if let (Some(row), Value::Object(extra)) = (row.as_object_mut(), extra) {
            row.extend(extra);
        }
        self.store.seed(tables::APPLICATIONS, vec![row]);
    }

    pub fn seed_message(&self, id: i64, name: &str, status: &str) {
        self.store.seed(
            tables::CONTACT_MESSAGES,
            vec![json!({
                "id": id,
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "subject": "Question",
                "message": "Hello\nthere",
                "status": status,
            })],
        );
    }
}

/// Answers confirmations from a script and records every prompt
#[derive(Default)]
pub(crate) struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    default_answer: bool,
    confirms: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn accepting() -> Self {
        Self {
            default_answer: true,
            ..Self::default()
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }

    /// Queue answers used before falling back to the default
    pub fn then_answer(self, answer: bool) -> Self {
        self.answers.lock().unwrap().push_back(answer);
        self
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl UserPrompt for ScriptedPrompt {
    fn confirm(&self, question: &str) -> bool {
        self.confirms.lock().unwrap().push(question.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_answer)
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
