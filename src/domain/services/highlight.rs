#[cfg(test)]
#[path = "highlight_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::domain::models::HighlightSurface;

pub const HIGHLIGHT_ID: &str = "highlighted-chunk";
const HIGHLIGHT_OPEN: &str = "<div id=\"highlighted-chunk\" data-highlight=\"true\">";
const DIV_OPEN: &str = "<div";
const DIV_CLOSE: &str = "</div>";

#[derive(Clone, Debug, PartialEq)]
pub struct HighlightOutcome {
    pub html: String,
    pub wrapped: bool,
    /// Byte offset of the wrapped chunk in the original content.
    pub offset: Option<usize>,
}

impl HighlightOutcome {
    fn unchanged(content: &str) -> HighlightOutcome {
        return HighlightOutcome {
            html: content.to_string(),
            wrapped: false,
            offset: None,
        };
    }
}

/// Wraps the first occurrence of `chunk_html` in the highlight container.
///
/// The needle is trimmed for searching, but the wrapped span is measured
/// with the untrimmed length. When the chunk carries surrounding whitespace
/// the span therefore runs past the match by that amount; rendered output
/// depends on this, so it is kept.
pub fn highlight_chunk(content: &str, chunk_html: &str, is_being_highlighted: bool) -> HighlightOutcome {
    if chunk_html.is_empty() || !is_being_highlighted {
        return HighlightOutcome::unchanged(content);
    }

    let needle = chunk_html.trim();
    if needle.is_empty() {
        return HighlightOutcome::unchanged(content);
    }

    let start = match content.find(needle) {
        Some(start) => start,
        None => {
            tracing::debug!(len = needle.len(), "Chunk not found in document");
            return HighlightOutcome::unchanged(content);
        }
    };

    let mut end = (start + chunk_html.len()).min(content.len());
    while !content.is_char_boundary(end) {
        end -= 1;
    }

    let html = format!(
        "{}{HIGHLIGHT_OPEN}{}{DIV_CLOSE}{}",
        &content[..start],
        &content[start..end],
        &content[end..]
    );

    return HighlightOutcome {
        html,
        wrapped: true,
        offset: Some(start),
    };
}

/// Finds the `</div>` closing the div whose body starts at `from`.
fn matching_close(html: &str, from: usize) -> Option<usize> {
    let mut depth = 1;
    let mut cursor = from;

    loop {
        let rest = &html[cursor..];
        let close = rest.find(DIV_CLOSE)?;
        match rest.find(DIV_OPEN) {
            Some(open) if open < close => {
                depth += 1;
                cursor += open + DIV_OPEN.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(cursor + close);
                }
                cursor += close + DIV_CLOSE.len();
            }
        }
    }
}

/// Replaces the highlight container with its inner content. Documents
/// without a container come back unchanged.
pub fn unwrap_highlight(html: &str) -> String {
    let start = match html.find(HIGHLIGHT_OPEN) {
        Some(start) => start,
        None => return html.to_string(),
    };

    let body_start = start + HIGHLIGHT_OPEN.len();
    let body_end = match matching_close(html, body_start) {
        Some(end) => end,
        None => return html.to_string(),
    };

    return format!(
        "{}{}{}",
        &html[..start],
        &html[body_start..body_end],
        &html[body_end + DIV_CLOSE.len()..]
    );
}

/// Drives the timed half of highlighting: scroll once the wrapped chunk is
/// painted, then strip the container after `delay`.
pub struct Highlighter {
    delay: Duration,
    cancel: CancellationToken,
}

impl Default for Highlighter {
    fn default() -> Highlighter {
        return Highlighter::new(Duration::from_secs(5));
    }
}

impl Highlighter {
    pub fn new(delay: Duration) -> Highlighter {
        return Highlighter {
            delay,
            cancel: CancellationToken::new(),
        };
    }

    /// Stops pending highlights without touching their surfaces. Completion
    /// callbacks still run.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// `on_complete` runs exactly once on every path, so the caller's
    /// highlighting flag never stays set.
    pub fn schedule<S, F>(&self, surface: Arc<S>, on_complete: F) -> JoinHandle<()>
    where
        S: HighlightSurface + Send + Sync + ?Sized + 'static,
        F: FnOnce() + Send + 'static,
    {
        return self.schedule_with_scroll(surface, || {}, on_complete);
    }

    /// Like `schedule`, and also runs `on_scrolled` once the surface has
    /// brought the chunk into view.
    pub fn schedule_with_scroll<S, G, F>(
        &self,
        surface: Arc<S>,
        on_scrolled: G,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        S: HighlightSurface + Send + Sync + ?Sized + 'static,
        G: FnOnce() + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let cancel = self.cancel.child_token();

        return tokio::spawn(async move {
            // Let the wrapped markup render first.
            tokio::task::yield_now().await;

            if cancel.is_cancelled() || !surface.is_attached() {
                on_complete();
                return;
            }

            if !surface.scroll_into_view(HIGHLIGHT_ID) {
                tracing::warn!("Highlighted chunk missing from the live document");
                on_complete();
                return;
            }
            on_scrolled();

            tokio::select! {
                _ = cancel.cancelled() => {
                    on_complete();
                    return;
                }
                _ = time::sleep(delay) => {}
            }

            if surface.is_attached() {
                surface.unwrap_element(HIGHLIGHT_ID);
            }

            on_complete();
        });
    }
}
