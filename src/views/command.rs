//! Closed set of row and card actions
//!
//! Every rendered row or card carries an identity; user input on it is
//! turned into one of these values and dispatched through
//! `AdminDashboard::dispatch`.

use crate::error::{ConsoleError, ConsoleResult};
use crate::models::ApplicationStatus;

use super::ModalClick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryAction {
    Edit(i64),
    Delete(i64),
    CancelEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationAction {
    View(i64),
    Delete(i64),
    SetStatus(i64, ApplicationStatus),
    Modal(ModalClick),
}

impl ApplicationAction {
    /// A status change picked from a row's selector, by option value
    pub fn status_choice(id: i64, value: &str) -> ConsoleResult<Self> {
        value
            .parse::<ApplicationStatus>()
            .map(|status| Self::SetStatus(id, status))
            .map_err(|e| ConsoleError::validation(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAction {
    /// Click on the card outside its buttons
    ToggleBody(i64),
    MarkRead(i64),
    Delete(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Gallery(GalleryAction),
    Application(ApplicationAction),
    Message(MessageAction),
}

impl From<GalleryAction> for Command {
    fn from(action: GalleryAction) -> Self {
        Self::Gallery(action)
    }
}

impl From<ApplicationAction> for Command {
    fn from(action: ApplicationAction) -> Self {
        Self::Application(action)
    }
}

impl From<MessageAction> for Command {
    fn from(action: MessageAction) -> Self {
        Self::Message(action)
    }
}
