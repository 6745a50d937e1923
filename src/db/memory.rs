//! In-process data store
//!
//! Tables are vectors of JSON objects. Inserted rows get an integer `id`
//! and a strictly increasing `created_at` unless they carry their own, and
//! per-table column defaults can be registered to mimic server defaults.
//! Every call is recorded and failures can be injected per table and
//! operation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{single_row_error, DataStore, Filter, Operation, Select};
use crate::error::BackendError;

/// One recorded data-store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub operation: Operation,
    pub table: String,
}

#[derive(Default)]
struct Tables {
    rows: HashMap<String, Vec<Map<String, Value>>>,
    next_id: HashMap<String, i64>,
    defaults: HashMap<String, Map<String, Value>>,
    last_created_at: Option<DateTime<Utc>>,
}

/// In-memory implementation of [`DataStore`]
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failures: Mutex<HashMap<(Operation, String), String>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a server-side default for `column` on `table`
    pub fn with_default(self, table: &str, column: &str, value: impl Into<Value>) -> Self {
        self.lock_tables()
            .defaults
            .entry(table.to_string())
            .or_default()
            .insert(column.to_string(), value.into());
        self
    }

    /// Insert rows directly, bypassing the call log and failure injection
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.lock_tables();
        for row in rows {
            if let Value::Object(object) = row {
                insert_row(&mut tables, table, object);
            }
        }
    }

    /// Current rows of `table`, in insertion order
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock_tables()
            .rows
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// Make every `operation` on `table` fail with `message`
    pub fn fail_on(&self, operation: Operation, table: &str, message: &str) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((operation, table.to_string()), message.to_string());
    }

    pub fn clear_failures(&self) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Calls made so far
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call and return the injected failure, if any
    fn enter(&self, operation: Operation, table: &str) -> Result<(), BackendError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(StoreCall {
                operation,
                table: table.to_string(),
            });

        let failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        match failures.get(&(operation, table.to_string())) {
            Some(message) => Err(BackendError::new(message.clone())),
            None => Ok(()),
        }
    }
}

fn insert_row(tables: &mut Tables, table: &str, mut row: Map<String, Value>) {
    if let Some(defaults) = tables.defaults.get(table) {
        for (column, value) in defaults {
            row.entry(column.clone()).or_insert_with(|| value.clone());
        }
    }

    let next_id = tables.next_id.entry(table.to_string()).or_insert(1);
    match row.get("id").and_then(Value::as_i64) {
        Some(id) => *next_id = (*next_id).max(id + 1),
        None => {
            row.insert("id".to_string(), Value::from(*next_id));
            *next_id += 1;
        }
    }

    if !row.contains_key("created_at") {
        let mut now = Utc::now();
        if let Some(last) = tables.last_created_at {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        tables.last_created_at = Some(now);
        row.insert("created_at".to_string(), Value::String(now.to_rfc3339()));
    }

    tables.rows.entry(table.to_string()).or_default().push(row);
}

fn matches(row: &Map<String, Value>, filter: &Filter) -> bool {
    row.get(&filter.column).map_or(false, |value| value_eq(value, &filter.value))
}

/// Equality that treats `1` and `"1"` alike, as a REST filter would
fn value_eq(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            n.to_string() == *s
        }
        _ => stored == wanted,
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => compare_text(x, y),
        (None, Some(_)) | (Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None) | (Some(_), Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn compare_text(x: &str, y: &str) -> Ordering {
    match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => x.cmp(y),
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, query: &Select) -> Result<Vec<Value>, BackendError> {
        self.enter(Operation::Select, &query.table)?;

        let tables = self.lock_tables();
        let mut rows: Vec<Map<String, Value>> = tables
            .rows
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| matches(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if query.single && rows.len() != 1 {
            return Err(single_row_error(rows.len()));
        }

        let projected = match query.column_list() {
            None => rows.into_iter().map(Value::Object).collect(),
            Some(columns) => rows
                .into_iter()
                .map(|row| {
                    Value::Object(
                        columns
                            .iter()
                            .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
                            .collect(),
                    )
                })
                .collect(),
        };
        Ok(projected)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<(), BackendError> {
        self.enter(Operation::Insert, table)?;

        let mut tables = self.lock_tables();
        for row in rows {
            match row {
                Value::Object(object) => insert_row(&mut tables, table, object),
                other => {
                    return Err(BackendError::new(format!(
                        "Cannot insert non-object row into {}: {}",
                        table, other
                    )))
                }
            }
        }
        Ok(())
    }

    async fn update(&self, table: &str, values: Value, filter: &Filter) -> Result<(), BackendError> {
        self.enter(Operation::Update, table)?;

        let Value::Object(values) = values else {
            return Err(BackendError::new(format!("Update payload for {} must be an object", table)));
        };

        let mut tables = self.lock_tables();
        if let Some(rows) = tables.rows.get_mut(table) {
            for row in rows.iter_mut().filter(|row| matches(row, filter)) {
                for (column, value) in &values {
                    row.insert(column.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), BackendError> {
        self.enter(Operation::Delete, table)?;

        let mut tables = self.lock_tables();
        if let Some(rows) = tables.rows.get_mut(table) {
            rows.retain(|row| !matches(row, filter));
        }
        Ok(())
    }
}
