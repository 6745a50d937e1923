//! Gallery post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A `gallery_posts` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryPost {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Columns the public gallery reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicGalleryPost {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
}

impl PublicGalleryPost {
    pub const COLUMNS: &'static str = "title, description, image_url";
}

/// Values written on create or edit
///
/// `image_url` is left out of the row entirely when no new image was
/// uploaded, so an edit keeps the stored URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryPostInput {
    pub title: String,
    pub description: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// An image picked in the post form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The declared content type, else one inferred from the file name
    pub fn mime_type(&self) -> String {
        self.content_type
            .clone()
            .unwrap_or_else(|| crate::storage::content_type_for(&self.name).to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
