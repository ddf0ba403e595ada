use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::ChatMessage;
use crate::domain::models::ChatPrompt;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatResponse;
use crate::domain::models::DeskError;
use crate::domain::models::DeskResult;
use crate::domain::models::Event;
use crate::domain::models::Filing;
use crate::domain::models::FilingsBackend;
use crate::domain::models::SessionKey;

#[derive(Default)]
struct FakeBackend {
    hang: bool,
}

#[async_trait]
impl FilingsBackend for FakeBackend {
    async fn health_check(&self) -> DeskResult<()> {
        return Ok(());
    }

    async fn chat(&self, request: &ChatRequest) -> DeskResult<ChatResponse> {
        if self.hang {
            futures::future::pending::<()>().await;
        }
        if request.message == "fail" {
            return Err(DeskError::TransientNetwork("connection reset".to_string()));
        }

        let payload = serde_json::json!({
            "response": "ok",
            "chatHistory": [
                { "id": "m-1", "role": "user", "content": request.message },
                { "id": "m-2", "role": "assistant", "content": { "answer": "Net sales grew." } },
            ],
        });
        return Ok(serde_json::from_value(payload).unwrap());
    }

    async fn list_filings(&self, _ticker: &str) -> DeskResult<Vec<Filing>> {
        return Ok(vec![]);
    }

    async fn fetch_document(&self, ticker: &str, accession_number: &str) -> DeskResult<String> {
        if ticker == "MISSING" {
            return Err(DeskError::NotFound(format!("filing {accession_number}")));
        }
        return Ok(format!("<p>{ticker} {accession_number}</p>"));
    }
}

fn key() -> SessionKey {
    return SessionKey::new("AAPL", "0000320193-23-000106");
}

fn prompt(text: &str, sequence: u64) -> ChatPrompt {
    return ChatPrompt {
        key: key(),
        sequence,
        request: ChatRequest::new(&key(), text, &[]),
    };
}

fn start(backend: FakeBackend) -> (mpsc::UnboundedSender<Action>, mpsc::UnboundedReceiver<Event>) {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let backend: BackendBox = Box::new(backend);

    tokio::spawn(async move {
        return ActionsService::start(backend, event_tx, &mut action_rx).await;
    });

    return (action_tx, event_rx);
}

#[tokio::test]
async fn it_reports_chat_history() -> Result<()> {
    let (tx, mut rx) = start(FakeBackend::default());
    tx.send(Action::BackendRequest(prompt("How did sales do?", 3)))?;

    match rx.recv().await {
        Some(Event::ChatHistoryReceived(received_key, sequence, messages)) => {
            assert_eq!(received_key, key());
            assert_eq!(sequence, 3);
            assert_eq!(
                messages.iter().map(ChatMessage::text).collect::<Vec<&str>>(),
                vec!["How did sales do?", "Net sales grew."]
            );
        }
        _ => panic!("expected chat history"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_reports_chat_failures() -> Result<()> {
    let (tx, mut rx) = start(FakeBackend::default());
    tx.send(Action::BackendRequest(prompt("fail", 1)))?;

    match rx.recv().await {
        Some(Event::ChatRequestFailed(_, sequence, error)) => {
            assert_eq!(sequence, 1);
            insta::assert_snapshot!(error, @"Network request failed: connection reset");
        }
        _ => panic!("expected a failure"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_cancels_in_flight_requests() -> Result<()> {
    let (tx, mut rx) = start(FakeBackend { hang: true });
    tx.send(Action::BackendRequest(prompt("slow", 7)))?;
    tokio::task::yield_now().await;
    tx.send(Action::BackendAbort())?;

    match rx.recv().await {
        Some(Event::ChatRequestFailed(_, sequence, error)) => {
            assert_eq!(sequence, 7);
            assert_eq!(error, "Request cancelled");
        }
        _ => panic!("expected a cancellation"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_fetches_documents() -> Result<()> {
    let (tx, mut rx) = start(FakeBackend::default());
    tx.send(Action::FetchDocument(key()))?;

    match rx.recv().await {
        Some(Event::DocumentLoaded(_, content)) => {
            assert_eq!(content, "<p>AAPL 0000320193-23-000106</p>");
        }
        _ => panic!("expected a document"),
    }

    tx.send(Action::FetchDocument(SessionKey::new("missing", "1")))?;
    match rx.recv().await {
        Some(Event::DocumentFailed(_, error)) => {
            assert_eq!(error, "Not found: filing 1");
        }
        _ => panic!("expected a failure"),
    }

    return Ok(());
}
