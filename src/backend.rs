//! Backend handle
//!
//! The three collaborators bundled together. A [`Backend`] is built once at
//! startup and handed to every section explicitly; it is never mutated
//! afterwards.

use std::sync::Arc;

use crate::auth::{AuthProvider, DynAuthProvider};
use crate::config::BackendConfig;
use crate::db::{DataStore, DynDataStore};
use crate::error::BackendError;
use crate::storage::{DynObjectStorage, ObjectStorage};
use crate::supabase::SupabaseClient;

#[derive(Clone)]
pub struct Backend {
    pub auth: DynAuthProvider,
    pub store: DynDataStore,
    pub storage: DynObjectStorage,
}

impl Backend {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn DataStore>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            auth,
            store,
            storage,
        }
    }

    /// All three collaborators served by one hosted project
    pub fn supabase(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Arc::new(SupabaseClient::new(config)?);
        Ok(Self {
            auth: client.clone(),
            store: client.clone(),
            storage: client,
        })
    }
}
