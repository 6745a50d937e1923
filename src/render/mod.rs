//! HTML rendering
//!
//! Section snapshots are rendered with Tera from templates compiled into
//! the binary. Autoescaping is on for every template, so titles, names and
//! message bodies coming from visitors are escaped.

use anyhow::{Context, Result};
use serde::Serialize;
use std::error::Error as StdError;
use tera::{Context as TeraContext, Tera};

use crate::admin::DashboardSnapshot;
use crate::models::ApplicationStatus;
use crate::views::{
    ApplicationsView, GalleryView, ListState, MessageCard, PublicGalleryCard, PublicStatsView, StatsForm,
};

const TEMPLATES: &[(&str, &str)] = &[
    ("macros.html", include_str!("templates/macros.html")),
    ("admin.html", include_str!("templates/admin.html")),
    ("stats.html", include_str!("templates/stats.html")),
    ("gallery.html", include_str!("templates/gallery.html")),
    ("applications.html", include_str!("templates/applications.html")),
    ("messages.html", include_str!("templates/messages.html")),
    ("public_gallery.html", include_str!("templates/public_gallery.html")),
    ("public_stats.html", include_str!("templates/public_stats.html")),
];

/// Message card plus the values the template cannot compute itself
#[derive(Serialize)]
struct MessageCardContext<'a> {
    #[serde(flatten)]
    card: &'a MessageCard,
    accent: &'static str,
    can_mark_read: bool,
    reply_href: String,
}

impl<'a> From<&'a MessageCard> for MessageCardContext<'a> {
    fn from(card: &'a MessageCard) -> Self {
        Self {
            card,
            accent: card.accent(),
            can_mark_read: card.actions().len() > 1,
            reply_href: card.reply_href(),
        }
    }
}

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    TemplateError(String),
}

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .context("Failed to load built-in templates")?;
        Ok(Self { tera })
    }

    pub fn render_stats(&self, form: &StatsForm) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("form", form);
        self.render("stats.html", &context)
    }

    pub fn render_gallery(&self, gallery: &GalleryView) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("gallery", gallery);
        context.insert("image_required", &gallery.form.image_required());
        context.insert("shows_cancel", &gallery.form.shows_cancel());
        context.insert("editing_id", &gallery.form.editing_id());
        self.render("gallery.html", &context)
    }

    pub fn render_applications(&self, applications: &ApplicationsView) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("applications", applications);
        context.insert("statuses", &ApplicationStatus::ALL);
        self.render("applications.html", &context)
    }

    pub fn render_messages(&self, messages: &ListState<MessageCard>) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("messages", &messages.map(MessageCardContext::from));
        self.render("messages.html", &context)
    }

    /// Whole admin page with the sections present on it
    pub fn render_dashboard(&self, snapshot: &DashboardSnapshot) -> Result<String> {
        let mut sections = Vec::new();
        if let Some(stats) = &snapshot.stats {
            sections.push(self.render_stats(stats)?);
        }
        if let Some(gallery) = &snapshot.gallery {
            sections.push(self.render_gallery(gallery)?);
        }
        if let Some(applications) = &snapshot.applications {
            sections.push(self.render_applications(applications)?);
        }
        if let Some(messages) = &snapshot.messages {
            sections.push(self.render_messages(messages)?);
        }

        let mut context = TeraContext::new();
        context.insert("user_email", &snapshot.user.email);
        context.insert("sections", &sections);
        self.render("admin.html", &context)
    }

    pub fn render_public_gallery(&self, gallery: &ListState<PublicGalleryCard>) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("gallery", gallery);
        self.render("public_gallery.html", &context)
    }

    pub fn render_public_stats(&self, stats: &PublicStatsView) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("stats", stats);
        self.render("public_stats.html", &context)
    }

    fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        self.tera.render(template, context).map_err(|e| {
            let mut error_msg = format!("Failed to render '{}': {}", template, e);
            let mut source = e.source();
            while let Some(s) = source {
                error_msg.push_str(&format!("\n  Caused by: {}", s));
                source = s.source();
            }
            RenderError::TemplateError(error_msg).into()
        })
    }
}
