//! Gallery section view state

use serde::Serialize;

use super::{ListState, Notice};
use crate::models::GalleryPost;

/// Whether the post form creates a new post or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Create,
    Edit { post_id: i64 },
}

/// The post form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct GalleryForm {
    pub mode: FormMode,
    pub title: String,
    pub description: String,
    /// URL of the image currently shown next to the form
    pub image_preview: Option<String>,
    pub notice: Option<Notice>,
}

impl GalleryForm {
    pub fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create New Post",
            FormMode::Edit { .. } => "Edit Post",
        }
    }

    /// An image must be picked for new posts only
    pub fn image_required(&self) -> bool {
        self.mode == FormMode::Create
    }

    pub fn shows_cancel(&self) -> bool {
        !self.image_required()
    }

    pub fn editing_id(&self) -> Option<i64> {
        match self.mode {
            FormMode::Create => None,
            FormMode::Edit { post_id } => Some(post_id),
        }
    }

    /// Back to an empty Create form
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Load a post for editing
    pub fn edit(&mut self, post: &GalleryPost) {
        self.mode = FormMode::Edit { post_id: post.id };
        self.title = post.title.clone();
        self.description = post.description.clone().unwrap_or_default();
        self.image_preview = Some(post.image_url.clone());
        self.notice = None;
    }
}

/// One post in the admin grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryCard {
    pub id: i64,
    pub title: String,
    pub image_url: String,
}

impl From<&GalleryPost> for GalleryCard {
    fn from(post: &GalleryPost) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            image_url: post.image_url.clone(),
        }
    }
}

/// Everything the gallery section shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    pub heading: &'static str,
    pub form: GalleryForm,
    pub posts: ListState<GalleryCard>,
}
