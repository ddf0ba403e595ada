#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::ChatPrompt;
use crate::domain::models::Event;
use crate::domain::models::SessionKey;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /cite (/c) [NUMBER] - Jumps to the filing passage behind citation NUMBER in the last answer and highlights it.
- /retry (/r) - Resends your last question after a failed request.
- /clear - Clears the conversation for this filing.
- /dismiss (/d) - Hides the starter tips.
- /quit /exit (/q) - Exit the chat. The conversation is archived.
- /help (/h) - Provides this help menu.

CITATIONS:
Answers cite the filing with numbered markers such as [1]. The same source always carries the same number within an answer. Use /cite with that number to see the passage in context.
        "#;

    return text.trim().to_string();
}

async fn chat(backend: Arc<BackendBox>, prompt: ChatPrompt, tx: mpsc::UnboundedSender<Event>) -> Result<()> {
    let ChatPrompt {
        key,
        sequence,
        request,
    } = prompt;

    match backend.chat(&request).await {
        Ok(response) => {
            tracing::debug!(key = %key, sequence, "Chat response received");
            tx.send(Event::ChatHistoryReceived(key, sequence, response.into_messages()))?;
        }
        Err(err) => {
            tracing::error!(key = %key, sequence, error = %err, "Chat request failed");
            tx.send(Event::ChatRequestFailed(key, sequence, err.to_string()))?;
        }
    }

    return Ok(());
}

async fn fetch_document(backend: Arc<BackendBox>, key: SessionKey, tx: mpsc::UnboundedSender<Event>) -> Result<()> {
    match backend
        .fetch_document(&key.ticker, &key.accession_number)
        .await
    {
        Ok(content) => {
            tx.send(Event::DocumentLoaded(key, content))?;
        }
        Err(err) => {
            tracing::error!(key = %key, error = %err, "Document fetch failed");
            tx.send(Event::DocumentFailed(key, err.to_string()))?;
        }
    }

    return Ok(());
}

/// Runs backend round-trips off the chat loop and reports back as events.
pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend = Arc::new(backend);

        // Lazy default.
        let mut worker: JoinHandle<Result<()>> = tokio::spawn(async {
            return Ok(());
        });
        let mut in_flight: Option<(SessionKey, u64)> = None;

        while let Some(action) = rx.recv().await {
            let worker_tx = tx.clone();
            match action {
                Action::BackendAbort() => {
                    if worker.is_finished() {
                        continue;
                    }

                    worker.abort();
                    if let Some((key, sequence)) = in_flight.take() {
                        tx.send(Event::ChatRequestFailed(
                            key,
                            sequence,
                            "Request cancelled".to_string(),
                        ))?;
                    }
                }
                Action::BackendRequest(prompt) => {
                    in_flight = Some((prompt.key.clone(), prompt.sequence));
                    worker = tokio::spawn(chat(backend.clone(), prompt, worker_tx));
                }
                Action::FetchDocument(key) => {
                    tokio::spawn(fetch_document(backend.clone(), key, worker_tx));
                }
            }
        }

        return Ok(());
    }
}
