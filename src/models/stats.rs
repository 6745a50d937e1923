//! School statistics singleton

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Fixed identity of the only `school_stats` row
pub const STATS_ROW_ID: i64 = 1;

/// The `school_stats` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub students_enrolled: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qualified_teachers: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub grade_level_text: String,
}

/// Full-field update of the singleton
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsInput {
    pub students_enrolled: i64,
    pub qualified_teachers: i64,
    pub grade_level_text: String,
}

impl From<&StatsRecord> for StatsInput {
    fn from(record: &StatsRecord) -> Self {
        Self {
            students_enrolled: record.students_enrolled,
            qualified_teachers: record.qualified_teachers,
            grade_level_text: record.grade_level_text.clone(),
        }
    }
}
