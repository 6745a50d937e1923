//! Query description types

use serde_json::Value;

/// Table names
pub mod tables {
    pub const APPLICATIONS: &str = "applications";
    pub const CONTACT_MESSAGES: &str = "contact_messages";
    pub const GALLERY_POSTS: &str = "gallery_posts";
    pub const SCHOOL_STATS: &str = "school_stats";
}

/// Kind of data-store call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

/// Equality filter, `column = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Value rendered the way a REST filter expects it (`eq.<value>`)
    pub fn value_text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Sort order on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A select against one table
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub single: bool,
}

impl Select {
    /// `select *` from `table`
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            single: false,
        }
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Require exactly one matching row
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    /// Requested column names, `None` for `*`
    pub fn column_list(&self) -> Option<Vec<String>> {
        let columns = self.columns.trim();
        if columns == "*" {
            return None;
        }
        Some(
            columns
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }
}
