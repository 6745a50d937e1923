//! Object storage collaborator
//!
//! Gallery images live in a public bucket. Objects are addressed by
//! `<prefix>/<owner>/<millis>-<sanitized name>` and served from a public URL
//! from which the object path can be recovered again.

pub mod memory;
pub mod path;

pub use memory::MemoryStorage;
pub use path::{content_type_for, object_path, path_from_public_url, sanitize_file_name};

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::BackendError;

/// Options for an upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Overwrite an existing object at the same path
    pub upsert: bool,
    pub content_type: Option<String>,
}

/// Hosted object storage
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: UploadOptions,
    ) -> Result<(), BackendError>;

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), BackendError>;

    /// Public URL of an object; does not check that it exists
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

pub type DynObjectStorage = Arc<dyn ObjectStorage>;

/// Public URL layout shared by the hosted storage and the in-memory one
pub(crate) fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!(
        "{}/storage/v1/object/public/{}/{}",
        base_url.trim_end_matches('/'),
        bucket,
        encoded.join("/")
    )
}
