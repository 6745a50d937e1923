//! View state
//!
//! What each section currently shows: list contents or their loading,
//! empty and error states, form contents and their status notices, the
//! application modal. Sections own their view state and expose snapshots;
//! `crate::render` turns snapshots into HTML.

mod applications;
mod command;
mod gallery;
mod messages;
mod public;
mod stats;

pub use applications::{humanize_label, ApplicationModal, ApplicationRow, ApplicationsView, DetailField, ModalClick};
pub use command::{ApplicationAction, Command, GalleryAction, MessageAction};
pub use gallery::{FormMode, GalleryCard, GalleryForm, GalleryView};
pub use messages::{MessageCard, NEW_ACCENT, READ_ACCENT};
pub use public::{PublicGalleryCard, PublicStatsView};
pub use stats::StatsForm;

use serde::Serialize;
use std::time::Duration;

/// Visual tone of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Pending,
    Success,
    Error,
}

/// Inline status message next to a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub text: String,
    pub tone: Tone,
    /// Hide automatically after this long
    #[serde(skip)]
    pub hide_after: Option<Duration>,
}

impl Notice {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            hide_after: None,
        }
    }

    pub fn pending(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Pending)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Error)
    }

    pub fn hiding_after(mut self, duration: Duration) -> Self {
        self.hide_after = Some(duration);
        self
    }
}

/// Contents of a list container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ListState<T> {
    Loading(String),
    Empty(String),
    Error(String),
    Items(Vec<T>),
}

impl<T> ListState<T> {
    /// Items, or an empty list for every other state
    pub fn items(&self) -> &[T] {
        match self {
            Self::Items(items) => items,
            _ => &[],
        }
    }

    pub fn items_mut(&mut self) -> Option<&mut Vec<T>> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }

    /// Same state with every item converted
    pub fn map<'a, U>(&'a self, f: impl FnMut(&'a T) -> U) -> ListState<U> {
        match self {
            Self::Loading(text) => ListState::Loading(text.clone()),
            Self::Empty(text) => ListState::Empty(text.clone()),
            Self::Error(text) => ListState::Error(text.clone()),
            Self::Items(items) => ListState::Items(items.iter().map(f).collect()),
        }
    }

    /// `Items` for a non-empty list, else `Empty(empty_text)`
    pub fn from_items(items: Vec<T>, empty_text: &str) -> Self {
        if items.is_empty() {
            Self::Empty(empty_text.to_string())
        } else {
            Self::Items(items)
        }
    }
}
