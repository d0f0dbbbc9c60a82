//! Employee-admin conversations.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{Conversation, Sender};
use crate::store::Store;

/// Longest message accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Lists conversations, most recent first.
pub async fn list_conversations(store: &Store) -> Vec<Conversation> {
    let data = store.read().await;
    let mut conversations: Vec<Conversation> = data.conversations.values().cloned().collect();
    conversations.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
    conversations
}

/// Returns the conversation of an employee, empty if none was started.
pub async fn get_conversation(store: &Store, employee_id: &str) -> EngineResult<Conversation> {
    let data = store.read().await;
    data.employee(employee_id)?;
    Ok(data
        .conversations
        .get(employee_id)
        .cloned()
        .unwrap_or_else(|| Conversation::new(employee_id)))
}

/// Appends a message to an employee's conversation, starting it if needed.
///
/// # Errors
///
/// [`EngineError::ValidationError`] for an empty or overlong message,
/// [`EngineError::EmployeeNotFound`] for an unknown employee.
pub async fn post_message(
    store: &Store,
    employee_id: &str,
    sender: Sender,
    text: &str,
    now: DateTime<Utc>,
) -> EngineResult<Conversation> {
    let text = text.trim();
    if text.is_empty() {
        return Err(EngineError::validation("text", "must not be empty"));
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(EngineError::validation(
            "text",
            format!("must be at most {} characters", MAX_MESSAGE_CHARS),
        ));
    }

    let conversation = store
        .mutate(|data| {
            data.employee(employee_id)?;
            let conversation = data
                .conversations
                .entry(employee_id.to_string())
                .or_insert_with(|| Conversation::new(employee_id));
            conversation.push(sender, text.to_string(), now);
            Ok(conversation.clone())
        })
        .await?;

    info!(
        employee_id = %employee_id,
        sender = ?sender,
        messages = conversation.messages.len(),
        "Message posted"
    );
    Ok(conversation)
}

/// Clears the reader's unread flag.
pub async fn mark_read(
    store: &Store,
    employee_id: &str,
    reader: Sender,
) -> EngineResult<Conversation> {
    store
        .mutate(|data| {
            let conversation = data.conversations.get_mut(employee_id).ok_or_else(|| {
                EngineError::NotFound {
                    entity: "conversation",
                    id: employee_id.to_string(),
                }
            })?;
            conversation.mark_read(reader);
            Ok(conversation.clone())
        })
        .await
}
