use super::ChatMessage;
use super::SessionKey;

pub enum Event {
    ChatHistoryReceived(SessionKey, u64, Vec<ChatMessage>),
    ChatRequestFailed(SessionKey, u64, String),
    ChatSessionUpdated(SessionKey),
    DocumentFailed(SessionKey, String),
    DocumentLoaded(SessionKey, String),
    HighlightFinished(SessionKey),
    HighlightScrolled(SessionKey),
}
