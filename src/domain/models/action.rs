use super::ChatMessage;
use super::ChatPrompt;
use super::SessionKey;

/// Work handed from the chat loop to the backend worker.
pub enum Action {
    BackendAbort(),
    BackendRequest(ChatPrompt),
    FetchDocument(SessionKey),
}

/// State transitions understood by the chat store.
#[derive(Clone, Debug, PartialEq)]
pub enum ChatAction {
    SendMessage { key: SessionKey, text: String },
    ReceiveHistory { key: SessionKey, sequence: u64, history: Vec<ChatMessage> },
    RequestFailed { key: SessionKey, sequence: u64, error: String },
    Retry { key: SessionKey },
    DismissTips { key: SessionKey },
    SetInput { key: SessionKey, text: String },
    Clear { key: SessionKey },
}

impl ChatAction {
    pub fn key(&self) -> &SessionKey {
        match self {
            ChatAction::SendMessage { key, .. } => return key,
            ChatAction::ReceiveHistory { key, .. } => return key,
            ChatAction::RequestFailed { key, .. } => return key,
            ChatAction::Retry { key } => return key,
            ChatAction::DismissTips { key } => return key,
            ChatAction::SetInput { key, .. } => return key,
            ChatAction::Clear { key } => return key,
        }
    }
}
