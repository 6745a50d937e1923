//! Enrollment application model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::{lenient_text, null_as_default};

/// Application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Selector order
    pub const ALL: [ApplicationStatus; 4] = [
        Self::Pending,
        Self::Reviewed,
        Self::Approved,
        Self::Rejected,
    ];
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Reviewed => write!(f, "Reviewed"),
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Reviewed" => Ok(Self::Reviewed),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(anyhow::anyhow!("Invalid application status: {}", s)),
        }
    }
}

/// An `applications` row
///
/// Besides the fixed columns, a submission may carry any number of extra
/// form fields; they land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub grade_level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Application {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Populated fields in display order, excluding identity, timestamp and status
    pub fn populated_fields(&self) -> Vec<(String, String)> {
        let fixed = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("grade_level", &self.grade_level),
        ];

        let mut fields: Vec<(String, String)> = fixed
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();

        fields.extend(
            self.extra
                .iter()
                .filter(|(_, value)| is_populated(value))
                .map(|(key, value)| (key.clone(), display_value(value))),
        );
        fields
    }
}

/// Null, empty strings, `false` and zero count as unpopulated
fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Public application form, field name → entered value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationSubmission {
    pub fields: BTreeMap<String, String>,
}

impl ApplicationSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Row to insert, with empty fields stripped
    pub fn into_row(self) -> Map<String, Value> {
        self.fields
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key, Value::String(value)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ApplicationSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
