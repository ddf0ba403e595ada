#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::domain::models::Action;
use crate::domain::models::ChatAction;
use crate::domain::models::ChatMessage;
use crate::domain::models::Event;
use crate::domain::models::SessionKey;
use crate::domain::models::SlashCommand;
use crate::domain::services::actions::help_text;
use crate::domain::services::annotation;
use crate::domain::services::highlight_chunk;
use crate::domain::services::process_citations;
use crate::domain::services::resolve_citation;
use crate::domain::services::ChatArchive;
use crate::domain::services::ChatStore;
use crate::domain::services::Highlighter;
use crate::infrastructure::surfaces::RenderedDocument;

const TIPS: &str = "Ask anything about this filing, e.g. \"What drove revenue growth?\". Answers cite the filing with [n] markers; use /cite n to jump to the source. /help lists all commands, /dismiss hides these tips.";

/// Replaces citation annotations with plain `[n]` markers for the terminal.
pub fn render_answer(text: &str) -> String {
    let processed = process_citations(text);
    let mut rendered = processed.text.to_string();
    for (idx, id) in processed.order.iter().enumerate() {
        let number = idx + 1;
        rendered = rendered.replace(&annotation(id, number), &format!("[{number}]"));
    }

    return rendered;
}

pub struct ChatRepl {
    key: SessionKey,
    store: ChatStore,
    archive: ChatArchive,
    action_tx: mpsc::UnboundedSender<Action>,
    event_tx: mpsc::UnboundedSender<Event>,
    document: Option<Arc<RenderedDocument>>,
    highlighter: Highlighter,
    highlighting: bool,
}

impl ChatRepl {
    pub fn new(
        key: SessionKey,
        archive: ChatArchive,
        highlighter: Highlighter,
        action_tx: mpsc::UnboundedSender<Action>,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> ChatRepl {
        return ChatRepl {
            key,
            store: ChatStore::new(event_tx.clone()),
            archive,
            action_tx,
            event_tx,
            document: None,
            highlighter,
            highlighting: false,
        };
    }

    pub fn is_typing(&self) -> bool {
        return self.store.is_typing(&self.key);
    }

    fn sequence(&self) -> u64 {
        return self
            .store
            .session(&self.key)
            .map(|session| return session.request_sequence)
            .unwrap_or(0);
    }

    fn last_answer(&self) -> Option<ChatMessage> {
        return self
            .store
            .messages(&self.key)
            .iter()
            .rev()
            .find(|message| return !message.is_user())
            .cloned();
    }

    fn print_answer(&self) {
        if let Some(message) = self.last_answer() {
            println!("\n{} {}\n", "assistant:".bold().green(), render_answer(message.text()));
        }
    }

    /// Restores the archived conversation and starts loading the filing.
    pub async fn open(&mut self) -> Result<()> {
        if let Some(session) = self.archive.load(&self.key).await? {
            let count = session.messages.len();
            self.store.restore(self.key.clone(), session);
            println!("Restored {count} message(s) from your last visit.");
        }

        self.action_tx.send(Action::FetchDocument(self.key.clone()))?;

        println!("{}", format!("Chatting about {}", self.key).bold());
        if self.store.tips_visible(&self.key) {
            println!("{}", TIPS.dimmed());
        }
        self.print_answer();

        return Ok(());
    }

    pub async fn close(&mut self) -> Result<()> {
        if self.is_typing() {
            self.action_tx.send(Action::BackendAbort())?;
        }
        self.highlighter.cancel();

        if let Some(session) = self.store.session(&self.key) {
            if !session.messages.is_empty() {
                self.archive.save(&self.key, session).await?;
                tracing::info!(session = self.key.footprint(), "Chat archived");
            }
        }

        return Ok(());
    }

    pub fn abort(&mut self) -> Result<()> {
        self.action_tx.send(Action::BackendAbort())?;
        return Ok(());
    }

    fn send(&mut self, action: ChatAction) -> Result<()> {
        if let Some(prompt) = self.store.dispatch(action) {
            self.action_tx.send(Action::BackendRequest(prompt))?;
            println!("{}", "Thinking...".dimmed());
        }

        return Ok(());
    }

    /// Returns false once the user asked to leave.
    pub fn handle_input(&mut self, line: &str) -> Result<bool> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }

        if let Some(cmd) = SlashCommand::parse(line) {
            if cmd.is_quit() {
                return Ok(false);
            }

            if cmd.is_help() {
                println!("{}", help_text());
            } else if cmd.is_clear() {
                self.store.dispatch(ChatAction::Clear {
                    key: self.key.clone(),
                });
                println!("Conversation cleared.");
            } else if cmd.is_dismiss_tips() {
                self.store.dispatch(ChatAction::DismissTips {
                    key: self.key.clone(),
                });
            } else if cmd.is_retry() {
                if self.store.last_error(&self.key).is_none() {
                    println!("Nothing to retry.");
                    return Ok(true);
                }
                self.send(ChatAction::Retry {
                    key: self.key.clone(),
                })?;
            } else if cmd.is_cite() {
                match cmd.citation_number() {
                    Some(number) => self.cite(number)?,
                    None => println!("Usage: /cite NUMBER"),
                }
            }

            return Ok(true);
        }

        if line.starts_with('/') {
            println!("Unknown command {line}. Type /help for the list.");
            return Ok(true);
        }

        self.send(ChatAction::SendMessage {
            key: self.key.clone(),
            text: line.to_string(),
        })?;

        return Ok(true);
    }

    fn cite(&mut self, number: usize) -> Result<()> {
        let message = match self.last_answer() {
            Some(message) => message,
            None => {
                println!("There is no answer to cite yet.");
                return Ok(());
            }
        };

        let processed = process_citations(message.text());
        let reference = match processed
            .id_for_number(number)
            .and_then(|id| return resolve_citation(id, &message.references))
        {
            Some(reference) => reference,
            None => {
                println!("The last answer has no source for citation [{number}].");
                return Ok(());
            }
        };

        println!("[{number}] {}", reference.chunk_value.text.italic());

        let document = match &self.document {
            Some(document) => document.clone(),
            None => {
                println!("The filing is still loading, try again in a moment.");
                return Ok(());
            }
        };

        if self.highlighting {
            println!("Still highlighting the previous citation.");
            return Ok(());
        }

        let outcome = highlight_chunk(&document.html(), &reference.chunk_value.html, true);
        let offset = match outcome.offset {
            Some(offset) if outcome.wrapped => offset,
            _ => {
                println!("That passage could not be located in the filing.");
                return Ok(());
            }
        };

        document.set_html(&outcome.html);
        self.highlighting = true;
        println!("Highlighted in the filing at position {offset}:");

        let scrolled_tx = self.event_tx.clone();
        let scrolled_key = self.key.clone();
        let tx = self.event_tx.clone();
        let key = self.key.clone();
        self.highlighter.schedule_with_scroll(
            document,
            move || {
                if let Err(err) = scrolled_tx.send(Event::HighlightScrolled(scrolled_key)) {
                    tracing::debug!(error = ?err, "Chat closed before highlight scrolled");
                }
            },
            move || {
                if let Err(err) = tx.send(Event::HighlightFinished(key)) {
                    tracing::debug!(error = ?err, "Chat closed before highlight finished");
                }
            },
        );

        return Ok(());
    }

    /// What the filing shows from the highlighted passage on.
    pub fn scroll_notice(&self) -> Option<String> {
        let excerpt = self.document.as_ref().and_then(|doc| return doc.excerpt())?;
        if excerpt.is_empty() {
            return None;
        }

        return Some(format!("  > {excerpt}"));
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::ChatHistoryReceived(key, sequence, history) => {
                if key != self.key {
                    return Ok(());
                }
                let current = sequence >= self.sequence();
                self.store.dispatch(ChatAction::ReceiveHistory {
                    key,
                    sequence,
                    history,
                });
                if current {
                    self.print_answer();
                }
            }
            Event::ChatRequestFailed(key, sequence, error) => {
                if key != self.key {
                    return Ok(());
                }
                let current = sequence >= self.sequence();
                self.store.dispatch(ChatAction::RequestFailed {
                    key,
                    sequence,
                    error: error.to_string(),
                });
                if current {
                    println!("{} {error}. Type /retry to resend.", "error:".bold().red());
                }
            }
            Event::DocumentLoaded(key, content) => {
                if key != self.key {
                    return Ok(());
                }
                println!("{}", format!("Filing loaded ({} characters).", content.len()).dimmed());
                self.document = Some(Arc::new(RenderedDocument::new(&content)));
            }
            Event::DocumentFailed(key, error) => {
                if key != self.key {
                    return Ok(());
                }
                println!("{} could not load the filing: {error}", "warning:".bold().yellow());
            }
            Event::HighlightScrolled(key) => {
                if key != self.key {
                    return Ok(());
                }
                if let Some(notice) = self.scroll_notice() {
                    println!("{notice}");
                }
            }
            Event::HighlightFinished(key) => {
                if key == self.key {
                    self.highlighting = false;
                    tracing::debug!("Highlight cleared");
                }
            }
            Event::ChatSessionUpdated(_) => {}
        }

        return Ok(());
    }
}

pub async fn start(
    key: SessionKey,
    action_tx: mpsc::UnboundedSender<Action>,
    event_tx: mpsc::UnboundedSender<Event>,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let highlighter = Highlighter::new(Config::highlight_delay()?);
    let mut repl = ChatRepl::new(key, ChatArchive::default(), highlighter, action_tx, event_tx);
    repl.open().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !repl.handle_input(&line)? {
                            break;
                        }
                    }
                    None => break,
                }
            }
            event = event_rx.recv() => {
                match event {
                    Some(event) => repl.handle_event(event)?,
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                if repl.is_typing() {
                    repl.abort()?;
                    continue;
                }
                break;
            }
        }
    }

    repl.close().await?;
    return Ok(());
}
