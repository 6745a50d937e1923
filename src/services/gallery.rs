//! Gallery manager
//!
//! Lifecycle of image-backed posts. Saving uploads the image first and
//! only writes the row once the upload succeeded; deleting removes the row
//! first and the stored object second, tolerating a failure of the latter.
//!
//! The post form is an explicit [`FormMode`]: `Create` until an edit is
//! started, back to `Create` on cancel or after a successful save.

use std::sync::Mutex;

use chrono::Utc;

use crate::auth::AuthUser;
use crate::backend::Backend;
use crate::config::StorageConfig;
use crate::db::repositories::GalleryRepository;
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{GalleryPostInput, ImageFile};
use crate::storage::{object_path, path_from_public_url, DynObjectStorage, UploadOptions};
use crate::views::{FormMode, GalleryAction, GalleryCard, GalleryForm, GalleryView, ListState, Notice};

use super::in_flight::{InFlight, OperationKey};
use super::prompt::DynPrompt;

const EMPTY_TEXT: &str = "No posts yet. Create one using the form above.";

/// What the admin typed into the post form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    /// Newly picked image, if any
    pub image: Option<ImageFile>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageFile) -> Self {
        self.image = Some(image);
        self
    }
}

struct GalleryState {
    form: GalleryForm,
    posts: ListState<GalleryCard>,
}

pub struct GalleryManager {
    posts: GalleryRepository,
    storage: DynObjectStorage,
    storage_config: StorageConfig,
    owner: AuthUser,
    prompt: DynPrompt,
    in_flight: InFlight,
    state: Mutex<GalleryState>,
}

impl GalleryManager {
    pub fn new(
        backend: &Backend,
        storage_config: &StorageConfig,
        owner: AuthUser,
        prompt: DynPrompt,
    ) -> Self {
        Self {
            posts: GalleryRepository::new(backend.store.clone()),
            storage: backend.storage.clone(),
            storage_config: storage_config.clone(),
            owner,
            prompt,
            in_flight: InFlight::new(),
            state: Mutex::new(GalleryState {
                form: GalleryForm::default(),
                posts: ListState::Loading("Loading posts...".to_string()),
            }),
        }
    }

    /// Empty Create form and a fresh post list
    pub async fn init(&self) -> ConsoleResult<()> {
        self.state().form.reset();
        self.list().await
    }

    /// Fetch all posts, newest first, into the grid
    pub async fn list(&self) -> ConsoleResult<()> {
        self.state().posts = ListState::Loading("Loading posts...".to_string());

        let result = self.posts.list().await;

        let mut state = self.state();
        match result {
            Ok(posts) => {
                let cards = posts.iter().map(GalleryCard::from).collect();
                state.posts = ListState::from_items(cards, EMPTY_TEXT);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error loading gallery posts: {}", e);
                state.posts = ListState::Error("Error loading posts.".to_string());
                Err(ConsoleError::query(e))
            }
        }
    }

    /// Store `file` under the owner's folder and return its public URL
    pub async fn upload_image(&self, file: Option<&ImageFile>, owner_id: &str) -> ConsoleResult<String> {
        let file = match file {
            Some(file) if !file.is_empty() => file,
            _ => {
                return Err(ConsoleError::validation(
                    "The selected file is empty or invalid. Please choose a valid image.",
                ))
            }
        };
        if owner_id.is_empty() {
            return Err(ConsoleError::validation("User ID is missing. Please log in again."));
        }

        let path = object_path(
            &self.storage_config.path_prefix,
            owner_id,
            Utc::now().timestamp_millis(),
            &file.name,
        );
        let options = UploadOptions {
            upsert: true,
            content_type: Some(file.mime_type()),
        };

        self.storage
            .upload(&self.storage_config.bucket, &path, file.bytes.clone(), options)
            .await
            .map_err(|e| {
                tracing::error!("Upload of {} failed: {}", path, e);
                ConsoleError::storage(e)
            })?;

        tracing::debug!("Uploaded gallery image {}", path);
        Ok(self.storage.public_url(&self.storage_config.bucket, &path))
    }

    /// Create or update a post depending on the form mode
    pub async fn save(&self, draft: PostDraft) -> ConsoleResult<()> {
        let _token = self.in_flight.acquire(OperationKey::new("gallery", "save"))?;

        let mode = {
            let mut state = self.state();
            let form = &mut state.form;
            form.title = draft.title.clone();
            form.description = draft.description.clone();

            if form.image_required() && draft.image.is_none() {
                let err = ConsoleError::validation("An image is required for a new post.");
                form.notice = Some(Notice::error(err.message()));
                return Err(err);
            }
            form.notice = Some(Notice::pending("Saving..."));
            form.mode
        };

        match self.write_post(mode, &draft).await {
            Ok(()) => {
                let text = match mode {
                    FormMode::Create => "Post created successfully!",
                    FormMode::Edit { .. } => "Post updated successfully!",
                };
                {
                    let mut state = self.state();
                    state.form.reset();
                    state.form.notice = Some(Notice::success(text));
                }
                if let Err(e) = self.list().await {
                    tracing::warn!("Post saved but the list could not be reloaded: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                self.state().form.notice = Some(Notice::error(format!("Error: {}", e)));
                Err(e)
            }
        }
    }

    async fn write_post(&self, mode: FormMode, draft: &PostDraft) -> ConsoleResult<()> {
        let image_url = match &draft.image {
            Some(image) => Some(self.upload_image(Some(image), &self.owner.id).await?),
            None => None,
        };

        let input = GalleryPostInput {
            title: draft.title.clone(),
            description: draft.description.clone(),
            user_id: self.owner.id.clone(),
            image_url,
        };

        let result = match mode {
            FormMode::Create => self.posts.create(&input).await,
            FormMode::Edit { post_id } => self.posts.update(post_id, &input).await,
        };
        result.map_err(|e| {
            tracing::error!("Saving gallery post failed: {}", e);
            ConsoleError::query(e)
        })?;

        tracing::info!("Gallery post saved ({:?})", mode);
        Ok(())
    }

    /// Load post `id` into the form for editing
    pub async fn begin_edit(&self, id: i64) -> ConsoleResult<()> {
        match self.posts.get(id).await {
            Ok(post) => {
                self.state().form.edit(&post);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Could not fetch post {} to edit: {}", id, e);
                self.prompt.alert("Could not fetch post to edit.");
                Err(ConsoleError::query(e))
            }
        }
    }

    pub fn cancel_edit(&self) {
        self.state().form.reset();
    }

    /// Delete a post shown in the grid. Returns `false` if the admin
    /// declined the confirmation.
    pub async fn delete(&self, id: i64) -> ConsoleResult<bool> {
        let image_url = self
            .state()
            .posts
            .items()
            .iter()
            .find(|card| card.id == id)
            .map(|card| card.image_url.clone())
            .ok_or_else(|| ConsoleError::NotFound(format!("Post {} is not listed.", id)))?;

        self.delete_post(id, &image_url).await
    }

    /// Delete the row, then the stored image. A failed image removal is
    /// logged and the delete still counts as done.
    pub async fn delete_post(&self, id: i64, image_url: &str) -> ConsoleResult<bool> {
        let _token = self.in_flight.acquire(OperationKey::new("gallery", "delete").on(id))?;

        if !self.prompt.confirm("Are you sure you want to delete this post?") {
            return Ok(false);
        }

        if let Err(e) = self.posts.delete(id).await {
            tracing::error!("Deleting gallery post {} failed: {}", id, e);
            self.prompt.alert(&format!("Error deleting post: {}", e.message));
            return Err(ConsoleError::query(e));
        }

        let bucket = &self.storage_config.bucket;
        match path_from_public_url(image_url, bucket) {
            Some(path) => {
                if let Err(e) = self.storage.remove(bucket, &[path]).await {
                    tracing::warn!("DB record deleted, but storage file may remain: {}", e);
                }
            }
            None => tracing::warn!("DB record deleted, but no storage path in {}", image_url),
        }

        tracing::info!("Gallery post {} deleted", id);
        self.prompt.alert("Post deleted successfully.");
        if let Err(e) = self.list().await {
            tracing::warn!("Post deleted but the list could not be reloaded: {}", e);
        }
        Ok(true)
    }

    pub async fn dispatch(&self, action: GalleryAction) -> ConsoleResult<()> {
        match action {
            GalleryAction::Edit(id) => self.begin_edit(id).await,
            GalleryAction::Delete(id) => self.delete(id).await.map(|_| ()),
            GalleryAction::CancelEdit => {
                self.cancel_edit();
                Ok(())
            }
        }
    }

    pub fn view(&self) -> GalleryView {
        let state = self.state();
        GalleryView {
            heading: state.form.heading(),
            form: state.form.clone(),
            posts: state.posts.clone(),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, GalleryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
