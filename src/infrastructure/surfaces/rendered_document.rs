#[cfg(test)]
#[path = "rendered_document_test.rs"]
mod tests;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use crate::domain::models::HighlightSurface;
use crate::domain::services::unwrap_highlight;

const EXCERPT_CHARS: usize = 240;

/// An in-memory filing view. The terminal has no viewport, so scrolling
/// records the text of the marked element for the caller to print.
pub struct RenderedDocument {
    html: Mutex<String>,
    attached: AtomicBool,
    excerpt: Mutex<Option<String>>,
}

impl RenderedDocument {
    pub fn new(html: &str) -> RenderedDocument {
        return RenderedDocument {
            html: Mutex::new(html.to_string()),
            attached: AtomicBool::new(true),
            excerpt: Mutex::new(None),
        };
    }

    pub fn html(&self) -> String {
        return match self.html.lock() {
            Ok(html) => html.to_string(),
            Err(poisoned) => poisoned.into_inner().to_string(),
        };
    }

    pub fn set_html(&self, html: &str) {
        if let Ok(mut current) = self.html.lock() {
            *current = html.to_string();
        }
    }

    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }

    /// Text of the element last scrolled to.
    pub fn excerpt(&self) -> Option<String> {
        return self.excerpt.lock().ok().and_then(|excerpt| return excerpt.clone());
    }
}

/// Drops tags and collapses whitespace.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    return text.split_whitespace().collect::<Vec<&str>>().join(" ");
}

impl HighlightSurface for RenderedDocument {
    fn is_attached(&self) -> bool {
        return self.attached.load(Ordering::SeqCst);
    }

    fn scroll_into_view(&self, element_id: &str) -> bool {
        let html = self.html();
        let marker = format!("id=\"{element_id}\"");
        let start = match html.find(&marker) {
            Some(start) => start,
            None => return false,
        };

        let body = match html[start..].find('>') {
            Some(end) => &html[start + end + 1..],
            None => return false,
        };

        let text: String = strip_tags(body).chars().take(EXCERPT_CHARS).collect();
        if let Ok(mut excerpt) = self.excerpt.lock() {
            *excerpt = Some(text);
        }

        return true;
    }

    fn unwrap_element(&self, element_id: &str) {
        tracing::debug!(element_id, "Removing highlight");
        let unwrapped = unwrap_highlight(&self.html());
        self.set_html(&unwrapped);
    }
}
