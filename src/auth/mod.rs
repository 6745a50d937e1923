//! Authentication collaborator
//!
//! Sessions are issued by the hosted auth provider. The console only needs
//! three calls: password sign-in, sign-out and "current session".

pub mod memory;

pub use memory::MemoryAuth;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::BackendError;

/// Authenticated user identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUser,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |expires_at| expires_at <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Hosted authentication provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Password sign-in; the new session becomes current
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    /// End the current session
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// The current, unexpired session if any
    async fn get_session(&self) -> Result<Option<Session>, BackendError>;
}

pub type DynAuthProvider = Arc<dyn AuthProvider>;
