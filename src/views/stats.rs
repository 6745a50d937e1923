//! Stats form view state

use serde::Serialize;

use super::Notice;
use crate::models::{StatsInput, StatsRecord};

/// The three stats inputs as shown, blank until loaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsForm {
    pub students_enrolled: String,
    pub qualified_teachers: String,
    pub grade_level_text: String,
    pub notice: Option<Notice>,
}

impl StatsForm {
    pub fn fill(&mut self, record: &StatsRecord) {
        self.students_enrolled = record.students_enrolled.to_string();
        self.qualified_teachers = record.qualified_teachers.to_string();
        self.grade_level_text = record.grade_level_text.clone();
    }

    pub fn fill_input(&mut self, input: &StatsInput) {
        self.students_enrolled = input.students_enrolled.to_string();
        self.qualified_teachers = input.qualified_teachers.to_string();
        self.grade_level_text = input.grade_level_text.clone();
    }
}
