//! Data models
//!
//! Rows of the four tables the site works with, plus the inputs written
//! back to them. The remote store owns every row; these are transient copies.

mod application;
mod gallery;
mod message;
mod stats;

pub use application::{Application, ApplicationStatus, ApplicationSubmission};
pub use gallery::{GalleryPost, GalleryPostInput, ImageFile, PublicGalleryPost};
pub use message::{ContactMessage, ContactSubmission, MessageStatus};
pub use stats::{StatsInput, StatsRecord, STATS_ROW_ID};

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable column into its default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a text-like column that may also hold a number
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}
