//! Table repositories
//!
//! Typed access to each table on top of a [`DataStore`](super::DataStore).
//! Rows are decoded with serde; a row that fails to decode is reported as a
//! backend error like any other query failure.

pub mod application;
pub mod gallery;
pub mod message;
pub mod stats;

pub use application::ApplicationRepository;
pub use gallery::GalleryRepository;
pub use message::MessageRepository;
pub use stats::StatsRepository;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::BackendError;

pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, BackendError> {
    rows.into_iter().map(decode_row).collect()
}

pub(crate) fn decode_row<T: DeserializeOwned>(row: Value) -> Result<T, BackendError> {
    serde_json::from_value(row).map_err(|e| BackendError::new(format!("Unexpected row shape: {}", e)))
}

pub(crate) fn decode_single<T: DeserializeOwned>(rows: Vec<Value>) -> Result<T, BackendError> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), rows.next()) {
        (Some(row), None) => decode_row(row),
        _ => Err(super::single_row_error(count)),
    }
}

pub(crate) fn encode_row<T: Serialize>(value: &T) -> Result<Value, BackendError> {
    serde_json::to_value(value).map_err(|e| BackendError::new(format!("Failed to encode row: {}", e)))
}
