#[cfg(test)]
#[path = "chat_store_test.rs"]
mod tests;

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::domain::models::ChatAction;
use crate::domain::models::ChatMessage;
use crate::domain::models::ChatPrompt;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatSession;
use crate::domain::models::Event;
use crate::domain::models::Role;
use crate::domain::models::SessionField;
use crate::domain::models::SessionKey;
use crate::domain::models::SessionValue;

/// All chat sessions of the running application, one per filing.
#[derive(Default)]
pub struct ChatStore {
    sessions: HashMap<SessionKey, ChatSession>,
    tx: Option<mpsc::UnboundedSender<Event>>,
}

impl ChatStore {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> ChatStore {
        return ChatStore {
            sessions: HashMap::new(),
            tx: Some(tx),
        };
    }

    pub fn session(&self, key: &SessionKey) -> Option<&ChatSession> {
        return self.sessions.get(key);
    }

    /// Seeds a session, e.g. one loaded from the archive.
    pub fn restore(&mut self, key: SessionKey, session: ChatSession) {
        self.sessions.insert(key.clone(), session);
        self.notify(&key);
    }

    pub fn read(&self, key: &SessionKey, field: SessionField) -> Option<SessionValue> {
        return self.sessions.get(key).map(|s| return s.read(field));
    }

    pub fn write(&mut self, key: &SessionKey, value: SessionValue) {
        tracing::debug!(path = key.path(value.field()), "chat store write");
        self.sessions.entry(key.clone()).or_default().write(value);
        self.notify(key);
    }

    pub fn messages(&self, key: &SessionKey) -> &[ChatMessage] {
        if let Some(session) = self.sessions.get(key) {
            return &session.messages;
        }

        return &[];
    }

    pub fn is_typing(&self, key: &SessionKey) -> bool {
        return self.sessions.get(key).map(|s| return s.typing).unwrap_or(false);
    }

    pub fn tips_visible(&self, key: &SessionKey) -> bool {
        return self
            .sessions
            .get(key)
            .map(|s| return s.tips_visible)
            .unwrap_or(true);
    }

    pub fn input(&self, key: &SessionKey) -> &str {
        if let Some(session) = self.sessions.get(key) {
            return &session.input;
        }

        return "";
    }

    pub fn last_error(&self, key: &SessionKey) -> Option<&str> {
        return self
            .sessions
            .get(key)
            .and_then(|s| return s.last_error.as_deref());
    }

    /// Applies an action. Sending (or retrying) returns the prompt that must
    /// be handed to the backend worker.
    pub fn dispatch(&mut self, action: ChatAction) -> Option<ChatPrompt> {
        let key = action.key().clone();
        let prompt = match action {
            ChatAction::SendMessage { key, text } => self.send_message(&key, &text),
            ChatAction::ReceiveHistory {
                key,
                sequence,
                history,
            } => {
                self.receive_history(&key, sequence, history);
                None
            }
            ChatAction::RequestFailed {
                key,
                sequence,
                error,
            } => {
                self.request_failed(&key, sequence, error);
                None
            }
            ChatAction::Retry { key } => self.retry(&key),
            ChatAction::DismissTips { key } => {
                self.sessions.entry(key).or_default().tips_visible = false;
                None
            }
            ChatAction::SetInput { key, text } => {
                self.sessions.entry(key).or_default().input = text;
                None
            }
            ChatAction::Clear { key } => {
                let session = self.sessions.entry(key).or_default();
                let sequence = session.request_sequence + 1;
                *session = ChatSession::default();
                session.request_sequence = sequence;
                None
            }
        };

        self.notify(&key);
        return prompt;
    }

    fn send_message(&mut self, key: &SessionKey, text: &str) -> Option<ChatPrompt> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let session = self.sessions.entry(key.clone()).or_default();
        let is_first = !session.messages.iter().any(|m| return m.is_user());
        let request = ChatRequest::new(key, text, &session.messages);

        session.messages.push(ChatMessage::new(Role::User, text));
        session.input = "".to_string();
        session.typing = true;
        session.last_error = None;
        if is_first {
            session.tips_visible = false;
        }
        session.request_sequence += 1;

        return Some(ChatPrompt {
            key: key.clone(),
            sequence: session.request_sequence,
            request,
        });
    }

    fn receive_history(&mut self, key: &SessionKey, sequence: u64, history: Vec<ChatMessage>) {
        let session = self.sessions.entry(key.clone()).or_default();
        if sequence < session.request_sequence {
            tracing::debug!(
                session = key.footprint(),
                sequence,
                latest = session.request_sequence,
                "Dropping stale chat history"
            );
            return;
        }

        session.messages = history;
        session.typing = false;
        session.last_error = None;
    }

    fn request_failed(&mut self, key: &SessionKey, sequence: u64, error: String) {
        let session = self.sessions.entry(key.clone()).or_default();
        if sequence < session.request_sequence {
            tracing::debug!(session = key.footprint(), sequence, "Ignoring stale chat failure");
            return;
        }

        tracing::warn!(session = key.footprint(), error, "Chat request failed");
        session.typing = false;
        session.last_error = Some(error);
    }

    fn retry(&mut self, key: &SessionKey) -> Option<ChatPrompt> {
        let session = self.sessions.get_mut(key)?;
        if session.last_error.is_none() || session.typing {
            return None;
        }

        let text = session
            .messages
            .iter()
            .rev()
            .find(|m| return m.is_user())?
            .text()
            .to_string();

        // The failed turn is resent, not duplicated.
        if session.messages.last().map(|m| return m.is_user()) == Some(true) {
            session.messages.pop();
        }

        return self.send_message(key, &text);
    }

    fn notify(&self, key: &SessionKey) {
        if let Some(tx) = &self.tx {
            if let Err(err) = tx.send(Event::ChatSessionUpdated(key.clone())) {
                tracing::debug!(error = ?err, "No chat store subscriber listening");
            }
        }
    }
}
