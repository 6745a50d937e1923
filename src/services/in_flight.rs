//! Per-operation in-flight guard
//!
//! A second invocation of an operation that is still running is refused
//! before it reaches the network. The guard is released when the token is
//! dropped, whichever way the operation ends.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::{ConsoleError, ConsoleResult};

/// Identity of one running operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    section: &'static str,
    operation: &'static str,
    target: Option<i64>,
}

impl OperationKey {
    pub fn new(section: &'static str, operation: &'static str) -> Self {
        Self {
            section,
            operation,
            target: None,
        }
    }

    /// Scope the operation to one record
    pub fn on(mut self, id: i64) -> Self {
        self.target = Some(id);
        self
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.section, self.operation)?;
        if let Some(id) = self.target {
            write!(f, " #{}", id)?;
        }
        Ok(())
    }
}

/// Set of operations currently running
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<OperationKey>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as running, or fail with `Busy` if it already is
    pub fn acquire(&self, key: OperationKey) -> ConsoleResult<InFlightToken> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(key.clone()) {
            tracing::debug!("Rejected overlapping {}", key);
            return Err(ConsoleError::Busy(format!("{} is already in progress.", key)));
        }
        Ok(InFlightToken {
            active: Arc::clone(&self.active),
            key,
        })
    }

    pub fn is_running(&self, key: &OperationKey) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }
}

/// Releases its operation on drop
#[derive(Debug)]
pub struct InFlightToken {
    active: Arc<Mutex<HashSet<OperationKey>>>,
    key: OperationKey,
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}
