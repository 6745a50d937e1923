//! Hosted backend client
//!
//! [`SupabaseClient`] talks to a Supabase project over HTTP and implements
//! all three collaborator traits:
//! - [`AuthProvider`](crate::auth::AuthProvider) via `/auth/v1`
//! - [`DataStore`](crate::db::DataStore) via `/rest/v1`
//! - [`ObjectStorage`](crate::storage::ObjectStorage) via `/storage/v1`
//!
//! The session obtained at sign-in is kept in the client and its access
//! token authorizes every later data and storage call, expired or not, so
//! the backend reports the expiry itself. Only a client that never signed in
//! (or signed out) falls back to the anon key.

mod auth;
mod rest;
mod storage;

#[cfg(test)]
mod tests;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::sync::RwLock;
use std::time::Duration;

use crate::auth::Session;
use crate::config::BackendConfig;
use crate::error::BackendError;

/// HTTP client for a Supabase project
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<Session>>,
}

impl SupabaseClient {
    /// Create a client from backend configuration
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| BackendError::new(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            session: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn store_session(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = session;
    }

    /// `apikey` plus a bearer token: the session's if signed in, else the anon key
    fn auth_headers(&self) -> HeaderMap {
        let token = self
            .current_session()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.anon_key.clone());

        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }
}

/// Turn a non-success response into a [`BackendError`]
///
/// The auth, REST and storage services each report errors in a slightly
/// different JSON shape; the first message-like field wins.
async fn error_from_response(response: reqwest::Response) -> BackendError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_from_body(status, &body)
}

fn error_from_body(status: reqwest::StatusCode, body: &str) -> BackendError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let message = parsed
        .as_ref()
        .and_then(|json| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(Value::as_str))
                .map(str::to_string)
        })
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    let code = parsed
        .as_ref()
        .and_then(|json| {
            ["code", "error_code", "statusCode"]
                .iter()
                .find_map(|key| json.get(*key))
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
        })
        .unwrap_or_else(|| status.as_u16().to_string());

    BackendError::new(message).with_code(code)
}
