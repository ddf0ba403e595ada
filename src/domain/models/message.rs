#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::Reference;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Developer,
}

/// Assistant replies arrive either as plain text or wrapped in an `answer`
/// object, depending on which backend endpoint produced them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Answer { answer: String },
}

impl MessageContent {
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Text(text) => return text,
            MessageContent::Answer { answer } => return answer,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: MessageContent,
    #[serde(default)]
    pub references: Vec<Reference>,
}

impl ChatMessage {
    pub fn new(role: Role, text: &str) -> ChatMessage {
        return ChatMessage {
            id: ChatMessage::create_id(),
            role,
            content: MessageContent::Text(text.to_string()),
            references: vec![],
        };
    }

    pub fn with_id(id: &str, role: Role, content: MessageContent) -> ChatMessage {
        return ChatMessage {
            id: id.to_string(),
            role,
            content,
            references: vec![],
        };
    }

    /// Short random id, the first two groups of a v4 UUID.
    pub fn create_id() -> String {
        return Uuid::new_v4()
            .to_string()
            .split('-')
            .take(2)
            .collect::<Vec<&str>>()
            .join("-");
    }

    pub fn text(&self) -> &str {
        return self.content.as_str();
    }

    pub fn is_user(&self) -> bool {
        return self.role == Role::User;
    }
}
