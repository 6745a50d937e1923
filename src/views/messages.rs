//! Messages section view state

use serde::Serialize;

use super::MessageAction;
use crate::models::{ContactMessage, MessageStatus};

pub const NEW_ACCENT: &str = "#007BFF";
pub const READ_ACCENT: &str = "#ccc";

/// One contact message card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageCard {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub received_at: String,
    pub status: MessageStatus,
    /// Whether the body is shown
    pub expanded: bool,
}

impl MessageCard {
    /// Border accent: highlighted while unread
    pub fn accent(&self) -> &'static str {
        match self.status {
            MessageStatus::New => NEW_ACCENT,
            MessageStatus::Read => READ_ACCENT,
        }
    }

    /// Buttons shown inside the expanded body
    pub fn actions(&self) -> Vec<MessageAction> {
        let mut actions = vec![MessageAction::Delete(self.id)];
        if self.status == MessageStatus::New {
            actions.push(MessageAction::MarkRead(self.id));
        }
        actions
    }

    pub fn reply_href(&self) -> String {
        format!("mailto:{}", self.email)
    }
}

impl From<&ContactMessage> for MessageCard {
    fn from(message: &ContactMessage) -> Self {
        Self {
            id: message.id,
            name: message.name.clone(),
            email: message.email.clone(),
            subject: message.subject.clone(),
            body: message.message.clone(),
            received_at: message.created_at.format("%Y-%m-%d %H:%M").to_string(),
            status: message.status,
            expanded: false,
        }
    }
}
