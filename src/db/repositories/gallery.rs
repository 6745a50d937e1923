//! `gallery_posts` repository

use crate::db::{tables, DynDataStore, Filter, Select};
use crate::error::BackendError;
use crate::models::{GalleryPost, GalleryPostInput, PublicGalleryPost};

use super::{decode_rows, decode_single, encode_row};

#[derive(Clone)]
pub struct GalleryRepository {
    store: DynDataStore,
}

impl GalleryRepository {
    pub fn new(store: DynDataStore) -> Self {
        Self { store }
    }

    /// All posts, newest first
    pub async fn list(&self) -> Result<Vec<GalleryPost>, BackendError> {
        let rows = self
            .store
            .select(&Select::from(tables::GALLERY_POSTS).order("created_at", false))
            .await?;
        decode_rows(rows)
    }

    /// Public columns only, newest first
    pub async fn list_public(&self) -> Result<Vec<PublicGalleryPost>, BackendError> {
        let rows = self
            .store
            .select(
                &Select::from(tables::GALLERY_POSTS)
                    .columns(PublicGalleryPost::COLUMNS)
                    .order("created_at", false),
            )
            .await?;
        decode_rows(rows)
    }

    pub async fn get(&self, id: i64) -> Result<GalleryPost, BackendError> {
        let rows = self
            .store
            .select(&Select::from(tables::GALLERY_POSTS).eq("id", id).single())
            .await?;
        decode_single(rows)
    }

    pub async fn create(&self, input: &GalleryPostInput) -> Result<(), BackendError> {
        self.store
            .insert(tables::GALLERY_POSTS, vec![encode_row(input)?])
            .await
    }

    pub async fn update(&self, id: i64, input: &GalleryPostInput) -> Result<(), BackendError> {
        self.store
            .update(tables::GALLERY_POSTS, encode_row(input)?, &Filter::eq("id", id))
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), BackendError> {
        self.store
            .delete(tables::GALLERY_POSTS, &Filter::eq("id", id))
            .await
    }
}
