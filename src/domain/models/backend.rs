#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::ChatMessage;
use super::DeskResult;
use super::Filing;
use super::MessageContent;
use super::Reference;
use super::Role;
use super::SessionKey;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub ticker: String,
    pub message: String,
    pub chat_history: Vec<HistoryTurn>,
    pub accession_number: String,
}

impl ChatRequest {
    /// Builds the request for `text`, sending `history` as prior turns.
    pub fn new(key: &SessionKey, text: &str, history: &[ChatMessage]) -> ChatRequest {
        let chat_history = history
            .iter()
            .map(|msg| {
                return HistoryTurn {
                    role: msg.role,
                    content: msg.text().to_string(),
                };
            })
            .collect();

        return ChatRequest {
            ticker: key.ticker.to_string(),
            message: text.to_string(),
            chat_history,
            accession_number: key.accession_number.to_string(),
        };
    }
}

/// A chat request tagged with the session it belongs to and the sequence the
/// store handed out, so late replies can be told apart from current ones.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatPrompt {
    pub key: SessionKey,
    pub sequence: u64,
    pub request: ChatRequest,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub role: Role,
    pub content: MessageContent,
    #[serde(default)]
    pub references: Vec<Reference>,
}

impl HistoryEntry {
    pub fn into_message(self) -> ChatMessage {
        let id = self
            .id
            .filter(|id| return !id.is_empty())
            .unwrap_or_else(ChatMessage::create_id);

        return ChatMessage {
            id,
            role: self.role,
            content: self.content,
            references: self.references,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub chat_history: Vec<HistoryEntry>,
}

impl ChatResponse {
    /// Server history becomes the canonical message list.
    pub fn into_messages(self) -> Vec<ChatMessage> {
        return self
            .chat_history
            .into_iter()
            .map(|entry| return entry.into_message())
            .collect();
    }
}

#[async_trait]
pub trait FilingsBackend {
    /// Used before opening a chat to confirm the backend is reachable.
    async fn health_check(&self) -> DeskResult<()>;

    /// Sends one chat turn about a filing. The backend answers with its full
    /// canonical history, which replaces whatever the client holds.
    async fn chat(&self, request: &ChatRequest) -> DeskResult<ChatResponse>;

    async fn list_filings(&self, ticker: &str) -> DeskResult<Vec<Filing>>;

    /// Rendered HTML of a single filing.
    async fn fetch_document(&self, ticker: &str, accession_number: &str) -> DeskResult<String>;
}

pub type BackendBox = Box<dyn FilingsBackend + Send + Sync>;
