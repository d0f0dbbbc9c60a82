//! Employee–admin messaging threads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The employee owning the conversation.
    Employee,
    /// An administrator.
    Admin,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier.
    pub id: Uuid,
    /// Who wrote it.
    pub sender: Sender,
    /// Message body.
    pub text: String,
    /// When it was written.
    pub created_at: DateTime<Utc>,
}

/// The thread between one employee and the administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// The employee the thread belongs to.
    pub employee_id: String,
    /// Messages in chronological order.
    pub messages: Vec<Message>,
    /// Set when the employee wrote something the admins have not read.
    pub unread_by_admin: bool,
    /// Set when an admin wrote something the employee has not read.
    pub unread_by_employee: bool,
    /// Timestamp of the last message.
    pub last_message_at: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            messages: Vec::new(),
            unread_by_admin: false,
            unread_by_employee: false,
            last_message_at: None,
        }
    }

    /// Appends a message and raises the other side's unread flag.
    pub fn push(&mut self, sender: Sender, text: String, at: DateTime<Utc>) -> &Message {
        match sender {
            Sender::Employee => self.unread_by_admin = true,
            Sender::Admin => self.unread_by_employee = true,
        }
        self.last_message_at = Some(at);
        self.messages.push(Message {
            id: Uuid::new_v4(),
            sender,
            text,
            created_at: at,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Clears the reader's unread flag.
    pub fn mark_read(&mut self, reader: Sender) {
        match reader {
            Sender::Employee => self.unread_by_employee = false,
            Sender::Admin => self.unread_by_admin = false,
        }
    }
}
