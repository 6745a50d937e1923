//! `/auth/v1` endpoints

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{error_from_response, SupabaseClient};
use crate::auth::{AuthProvider, AuthUser, Session};
use crate::error::BackendError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let response = self
            .http
            .post(self.endpoint("/auth/v1/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let token: TokenResponse = response.json().await?;
        let session = token.into_session(Utc::now());
        tracing::info!("Signed in as {}", session.user.id);

        self.store_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if self.current_session().is_none() {
            return Ok(());
        }

        let response = self
            .http
            .post(self.endpoint("/auth/v1/logout"))
            .headers(self.auth_headers())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        self.store_session(None);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        Ok(self.current_session().filter(|s| !s.is_expired()))
    }
}
