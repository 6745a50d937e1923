//! Applications section view state

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::ListState;
use crate::models::{Application, ApplicationStatus};

static WORD_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w").expect("word start pattern is valid"));

/// `parent_email` → `Parent Email`
pub fn humanize_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    WORD_START
        .replace_all(&spaced, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

/// One row of the applications table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationRow {
    pub id: i64,
    pub name: String,
    pub grade_level: String,
    pub submitted_on: String,
    /// What the status selector currently shows
    pub status: ApplicationStatus,
}

impl From<&Application> for ApplicationRow {
    fn from(app: &Application) -> Self {
        Self {
            id: app.id,
            name: app.full_name(),
            grade_level: app.grade_level.clone(),
            submitted_on: app.created_at.format("%Y-%m-%d").to_string(),
            status: app.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub label: String,
    pub value: String,
}

/// Detail modal for one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationModal {
    pub application_id: i64,
    pub heading: String,
    pub fields: Vec<DetailField>,
}

impl From<&Application> for ApplicationModal {
    fn from(app: &Application) -> Self {
        Self {
            application_id: app.id,
            heading: format!("Application for {}", app.full_name()),
            fields: app
                .populated_fields()
                .into_iter()
                .map(|(key, value)| DetailField {
                    label: humanize_label(&key),
                    value,
                })
                .collect(),
        }
    }
}

/// Where a click on the open modal landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    CloseButton,
    /// Outside the modal's content box
    Backdrop,
    Content,
}

impl ModalClick {
    pub fn dismisses(self) -> bool {
        matches!(self, Self::CloseButton | Self::Backdrop)
    }
}

/// Everything the applications section shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationsView {
    pub table: ListState<ApplicationRow>,
    pub modal: Option<ApplicationModal>,
}
