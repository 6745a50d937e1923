//! In-process object storage

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{public_object_url, ObjectStorage, UploadOptions};
use crate::error::BackendError;

/// One recorded storage call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    Upload { bucket: String, path: String },
    Remove { bucket: String, paths: Vec<String> },
}

#[derive(Default)]
struct StorageState {
    objects: BTreeMap<(String, String), Vec<u8>>,
    upload_error: Option<String>,
    remove_error: Option<String>,
    calls: Vec<StorageCall>,
}

/// Buckets held in memory
pub struct MemoryStorage {
    base_url: String,
    state: Mutex<StorageState>,
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            state: Mutex::new(StorageState::default()),
        }
    }

    /// Place an object directly, bypassing the call log
    pub fn put(&self, bucket: &str, path: &str, bytes: Vec<u8>) {
        self.lock()
            .objects
            .insert((bucket.to_string(), path.to_string()), bytes);
    }

    pub fn contains(&self, bucket: &str, path: &str) -> bool {
        self.lock()
            .objects
            .contains_key(&(bucket.to_string(), path.to_string()))
    }

    /// Paths stored in `bucket`
    pub fn paths(&self, bucket: &str) -> Vec<String> {
        self.lock()
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn fail_uploads(&self, message: &str) {
        self.lock().upload_error = Some(message.to_string());
    }

    pub fn fail_removals(&self, message: &str) {
        self.lock().remove_error = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StorageState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: UploadOptions,
    ) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.calls.push(StorageCall::Upload {
            bucket: bucket.to_string(),
            path: path.to_string(),
        });

        if let Some(message) = &state.upload_error {
            return Err(BackendError::new(message.clone()));
        }

        let key = (bucket.to_string(), path.to_string());
        if !options.upsert && state.objects.contains_key(&key) {
            return Err(BackendError::new("The resource already exists").with_code("409"));
        }
        state.objects.insert(key, bytes);
        Ok(())
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.calls.push(StorageCall::Remove {
            bucket: bucket.to_string(),
            paths: paths.to_vec(),
        });

        if let Some(message) = &state.remove_error {
            return Err(BackendError::new(message.clone()));
        }

        for path in paths {
            state.objects.remove(&(bucket.to_string(), path.clone()));
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.base_url, bucket, path)
    }
}
