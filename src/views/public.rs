//! Public page view state

use serde::Serialize;

use crate::config::FallbackStats;
use crate::models::{PublicGalleryPost, StatsRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicGalleryCard {
    pub title: String,
    pub description: String,
    pub image_url: String,
}

impl From<PublicGalleryPost> for PublicGalleryCard {
    fn from(post: PublicGalleryPost) -> Self {
        Self {
            title: post.title,
            description: post.description.unwrap_or_default(),
            image_url: post.image_url,
        }
    }
}

/// Counter targets for the home page stats block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicStatsView {
    pub students_enrolled: i64,
    pub qualified_teachers: i64,
    pub grade_level_text: String,
    /// Set when the fetch failed and configured values are shown
    pub from_fallback: bool,
}

impl From<&StatsRecord> for PublicStatsView {
    fn from(record: &StatsRecord) -> Self {
        Self {
            students_enrolled: record.students_enrolled,
            qualified_teachers: record.qualified_teachers,
            grade_level_text: record.grade_level_text.clone(),
            from_fallback: false,
        }
    }
}

impl From<&FallbackStats> for PublicStatsView {
    fn from(fallback: &FallbackStats) -> Self {
        Self {
            students_enrolled: fallback.students_enrolled,
            qualified_teachers: fallback.qualified_teachers,
            grade_level_text: fallback.grade_level_text.clone(),
            from_fallback: true,
        }
    }
}
