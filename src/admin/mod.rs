//! Admin dashboard
//!
//! Opening the admin page runs the session guard first. Without a valid
//! session nothing else happens and the caller is told where to redirect.
//! With one, every section present on the page is built against the same
//! backend and loads its data independently of the others.

use serde::Serialize;

use crate::auth::AuthUser;
use crate::backend::Backend;
use crate::config::Config;
use crate::error::{ConsoleError, ConsoleResult};
use crate::services::{
    ApplicationsTriage, DynPrompt, GalleryManager, GuardOutcome, MessagesTriage, SessionGuard, StatsEditor,
};
use crate::views::{ApplicationsView, Command, GalleryView, ListState, MessageCard, StatsForm};

/// Which management sections the page contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub stats: bool,
    pub gallery: bool,
    pub applications: bool,
    pub messages: bool,
}

impl PageLayout {
    pub fn full() -> Self {
        Self {
            stats: true,
            gallery: true,
            applications: true,
            messages: true,
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::full()
    }
}

pub enum AdminPage {
    Redirect(String),
    Dashboard(AdminDashboard),
}

/// Everything the dashboard currently shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub user: AuthUser,
    pub stats: Option<StatsForm>,
    pub gallery: Option<GalleryView>,
    pub applications: Option<ApplicationsView>,
    pub messages: Option<ListState<MessageCard>>,
}

pub struct AdminDashboard {
    user: AuthUser,
    stats: Option<StatsEditor>,
    gallery: Option<GalleryManager>,
    applications: Option<ApplicationsTriage>,
    messages: Option<MessagesTriage>,
}

impl AdminDashboard {
    /// Guard the page, then build and load the sections in `layout`
    pub async fn open(backend: &Backend, config: &Config, layout: PageLayout, prompt: DynPrompt) -> AdminPage {
        let user = match SessionGuard::new(backend, &config.site).check().await {
            GuardOutcome::Granted(user) => user,
            GuardOutcome::Redirect(target) => return AdminPage::Redirect(target),
        };

        let dashboard = Self {
            stats: layout.stats.then(|| StatsEditor::new(backend)),
            gallery: layout
                .gallery
                .then(|| GalleryManager::new(backend, &config.storage, user.clone(), prompt.clone())),
            applications: layout
                .applications
                .then(|| ApplicationsTriage::new(backend, prompt.clone())),
            messages: layout.messages.then(|| MessagesTriage::new(backend, prompt.clone())),
            user,
        };
        dashboard.init().await;
        AdminPage::Dashboard(dashboard)
    }

    /// Load every present section; a failing section shows its own error
    /// state and does not hold back the others
    async fn init(&self) {
        let stats = async {
            if let Some(stats) = &self.stats {
                if let Err(e) = stats.load().await {
                    tracing::warn!("Stats section failed to load: {}", e);
                }
            }
        };
        let gallery = async {
            if let Some(gallery) = &self.gallery {
                if let Err(e) = gallery.init().await {
                    tracing::warn!("Gallery section failed to load: {}", e);
                }
            }
        };
        let applications = async {
            if let Some(applications) = &self.applications {
                if let Err(e) = applications.list().await {
                    tracing::warn!("Applications section failed to load: {}", e);
                }
            }
        };
        let messages = async {
            if let Some(messages) = &self.messages {
                if let Err(e) = messages.list().await {
                    tracing::warn!("Messages section failed to load: {}", e);
                }
            }
        };
        futures::join!(stats, gallery, applications, messages);
        tracing::info!("Admin dashboard ready for {}", self.user.id);
    }

    /// Route a row or card action to its section
    pub async fn dispatch(&self, command: Command) -> ConsoleResult<()> {
        tracing::debug!("Dispatching {:?}", command);
        match command {
            Command::Gallery(action) => self.gallery()?.dispatch(action).await,
            Command::Application(action) => self.applications()?.dispatch(action).await,
            Command::Message(action) => self.messages()?.dispatch(action).await,
        }
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    pub fn stats(&self) -> ConsoleResult<&StatsEditor> {
        self.stats.as_ref().ok_or_else(|| missing("stats"))
    }

    pub fn gallery(&self) -> ConsoleResult<&GalleryManager> {
        self.gallery.as_ref().ok_or_else(|| missing("gallery"))
    }

    pub fn applications(&self) -> ConsoleResult<&ApplicationsTriage> {
        self.applications.as_ref().ok_or_else(|| missing("applications"))
    }

    pub fn messages(&self) -> ConsoleResult<&MessagesTriage> {
        self.messages.as_ref().ok_or_else(|| missing("messages"))
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            user: self.user.clone(),
            stats: self.stats.as_ref().map(StatsEditor::view),
            gallery: self.gallery.as_ref().map(GalleryManager::view),
            applications: self.applications.as_ref().map(ApplicationsTriage::view),
            messages: self.messages.as_ref().map(MessagesTriage::view),
        }
    }
}

fn missing(section: &str) -> ConsoleError {
    ConsoleError::NotFound(format!("The {} section is not on this page.", section))
}
