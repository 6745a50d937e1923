//! In-process auth provider

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{AuthProvider, AuthUser, Session};
use crate::error::BackendError;

#[derive(Default)]
struct AuthState {
    accounts: HashMap<String, (String, AuthUser)>,
    current: Option<Session>,
    session_error: Option<String>,
    sign_out_error: Option<String>,
    issued: u64,
}

/// Accounts and the current session held in memory
#[derive(Default)]
pub struct MemoryAuth {
    state: Mutex<AuthState>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that can sign in
    pub fn with_account(self, email: &str, password: &str, user_id: &str) -> Self {
        self.lock().accounts.insert(
            email.to_string(),
            (
                password.to_string(),
                AuthUser {
                    id: user_id.to_string(),
                    email: Some(email.to_string()),
                },
            ),
        );
        self
    }

    /// Start with an active session for `user_id`
    pub fn signed_in_as(self, user_id: &str) -> Self {
        let session = self.issue(AuthUser {
            id: user_id.to_string(),
            email: None,
        });
        self.lock().current = Some(session);
        self
    }

    /// Make `get_session` fail with `message`
    pub fn fail_session_lookup(&self, message: &str) {
        self.lock().session_error = Some(message.to_string());
    }

    /// Make `sign_out` fail with `message`
    pub fn fail_sign_out(&self, message: &str) {
        self.lock().sign_out_error = Some(message.to_string());
    }

    pub fn current(&self) -> Option<Session> {
        self.lock().current.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn issue(&self, user: AuthUser) -> Session {
        let mut state = self.lock();
        state.issued += 1;
        Session {
            access_token: format!("memory-token-{}", state.issued),
            refresh_token: None,
            expires_at: None,
            user,
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let user = {
            let state = self.lock();
            match state.accounts.get(email) {
                Some((expected, user)) if expected == password => user.clone(),
                _ => {
                    return Err(BackendError::new("Invalid login credentials")
                        .with_code("invalid_credentials"))
                }
            }
        };

        let session = self.issue(user);
        self.lock().current = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let mut state = self.lock();
        if let Some(message) = &state.sign_out_error {
            return Err(BackendError::new(message.clone()));
        }
        state.current = None;
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let state = self.lock();
        if let Some(message) = &state.session_error {
            return Err(BackendError::new(message.clone()));
        }
        Ok(state.current.clone().filter(|s| !s.is_expired()))
    }
}
