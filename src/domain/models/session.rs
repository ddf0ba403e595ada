#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::fmt;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::ChatMessage;

/// Identifies the conversation attached to one filing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub ticker: String,
    pub accession_number: String,
}

impl SessionKey {
    pub fn new(ticker: &str, accession_number: &str) -> SessionKey {
        return SessionKey {
            ticker: ticker.trim().to_uppercase(),
            accession_number: accession_number.trim().to_string(),
        };
    }

    /// Compact identifier used for archive file names.
    pub fn footprint(&self) -> String {
        return format!("{}_{}", self.ticker, self.accession_number);
    }

    pub fn parse_footprint(footprint: &str) -> Option<SessionKey> {
        let (ticker, accession_number) = footprint.split_once('_')?;
        if ticker.is_empty() || accession_number.is_empty() {
            return None;
        }

        return Some(SessionKey::new(ticker, accession_number));
    }

    pub fn path(&self, field: SessionField) -> String {
        return format!(
            "chat.{}.{}.{field}",
            self.ticker, self.accession_number
        );
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{} {}", self.ticker, self.accession_number);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "camelCase")]
pub enum SessionField {
    Messages,
    Input,
    Typing,
    TipsVisible,
    LastError,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionValue {
    Messages(Vec<ChatMessage>),
    Input(String),
    Typing(bool),
    TipsVisible(bool),
    LastError(Option<String>),
}

impl SessionValue {
    pub fn field(&self) -> SessionField {
        match self {
            SessionValue::Messages(_) => return SessionField::Messages,
            SessionValue::Input(_) => return SessionField::Input,
            SessionValue::Typing(_) => return SessionField::Typing,
            SessionValue::TipsVisible(_) => return SessionField::TipsVisible,
            SessionValue::LastError(_) => return SessionField::LastError,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
    pub tips_visible: bool,
    #[serde(skip)]
    pub input: String,
    #[serde(skip)]
    pub typing: bool,
    #[serde(skip)]
    pub last_error: Option<String>,
    #[serde(skip)]
    pub request_sequence: u64,
}

impl Default for ChatSession {
    fn default() -> ChatSession {
        return ChatSession {
            messages: vec![],
            tips_visible: true,
            input: "".to_string(),
            typing: false,
            last_error: None,
            request_sequence: 0,
        };
    }
}

impl ChatSession {
    pub fn read(&self, field: SessionField) -> SessionValue {
        match field {
            SessionField::Messages => return SessionValue::Messages(self.messages.clone()),
            SessionField::Input => return SessionValue::Input(self.input.to_string()),
            SessionField::Typing => return SessionValue::Typing(self.typing),
            SessionField::TipsVisible => return SessionValue::TipsVisible(self.tips_visible),
            SessionField::LastError => return SessionValue::LastError(self.last_error.clone()),
        }
    }

    pub fn write(&mut self, value: SessionValue) {
        match value {
            SessionValue::Messages(messages) => self.messages = messages,
            SessionValue::Input(input) => self.input = input,
            SessionValue::Typing(typing) => self.typing = typing,
            SessionValue::TipsVisible(visible) => self.tips_visible = visible,
            SessionValue::LastError(err) => self.last_error = err,
        }
    }
}

/// On-disk form of a chat session.
#[derive(Serialize, Deserialize)]
pub struct ArchivedSession {
    pub key: SessionKey,
    pub version: String,
    pub timestamp: String,
    pub session: ChatSession,
}
