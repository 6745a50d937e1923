//! Session guard and login/logout
//!
//! The admin page is fail-closed: no session, an expired session or a
//! failed session lookup all redirect to the login page.

use crate::auth::{AuthUser, DynAuthProvider};
use crate::backend::Backend;
use crate::config::SiteConfig;
use crate::error::{ConsoleError, ConsoleResult};

use super::prompt::DynPrompt;

/// Result of checking the session on admin-page load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Granted(AuthUser),
    /// Navigate to this page instead
    Redirect(String),
}

pub struct SessionGuard {
    auth: DynAuthProvider,
    login_page: String,
}

impl SessionGuard {
    pub fn new(backend: &Backend, site: &SiteConfig) -> Self {
        Self {
            auth: backend.auth.clone(),
            login_page: site.login_page.clone(),
        }
    }

    pub async fn check(&self) -> GuardOutcome {
        match self.auth.get_session().await {
            Ok(Some(session)) if !session.is_expired() => {
                tracing::info!("Admin session granted for user {}", session.user.id);
                GuardOutcome::Granted(session.user)
            }
            Ok(Some(_)) => {
                tracing::info!("Session expired, redirecting to {}", self.login_page);
                GuardOutcome::Redirect(self.login_page.clone())
            }
            Ok(None) => {
                tracing::info!("No session, redirecting to {}", self.login_page);
                GuardOutcome::Redirect(self.login_page.clone())
            }
            Err(e) => {
                tracing::warn!("Session lookup failed ({}), redirecting to {}", e, self.login_page);
                GuardOutcome::Redirect(self.login_page.clone())
            }
        }
    }
}

/// Login form and logout link
pub struct AuthService {
    auth: DynAuthProvider,
    site: SiteConfig,
    prompt: DynPrompt,
}

impl AuthService {
    pub fn new(backend: &Backend, site: &SiteConfig, prompt: DynPrompt) -> Self {
        Self {
            auth: backend.auth.clone(),
            site: site.clone(),
            prompt,
        }
    }

    /// Sign in; returns the page to navigate to
    pub async fn login(&self, email: &str, password: &str) -> ConsoleResult<String> {
        match self.auth.sign_in(email, password).await {
            Ok(session) => {
                tracing::info!("User {} signed in", session.user.id);
                Ok(self.site.admin_page.clone())
            }
            Err(e) => {
                tracing::error!("Login failed for {}: {}", email, e);
                self.prompt.alert(&format!("Login failed: {}", e.message));
                Err(ConsoleError::auth(e))
            }
        }
    }

    /// Sign out; returns the page to navigate to, or `None` when the
    /// sign-out failed and the user stays where they are
    pub async fn logout(&self) -> Option<String> {
        match self.auth.sign_out().await {
            Ok(()) => Some(self.site.login_page.clone()),
            Err(e) => {
                tracing::error!("Error logging out: {}", e);
                None
            }
        }
    }
}
