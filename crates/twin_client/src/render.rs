//! HTML rendering of query outcomes and health state into named slots
//! behind the [`RenderTarget`] interface.

use tracing::warn;

use crate::client::{HealthStatus, QueryOutcome};

/// Slot id of the health indicator.
pub const HEALTH_TARGET_ID: &str = "twin-health-status";
/// Default slot id for rendered answers.
pub const ANSWER_TARGET_ID: &str = "twin-answer";

/// A rendering surface made of named slots that accept HTML fragments.
/// The CLI prints its page after rendering; embedders map slots onto their
/// own presentation; tests inspect a [`MemoryPage`].
pub trait RenderTarget {
    /// Replace the contents of slot `id`. Returns false when the surface has
    /// no such slot.
    fn write_html(&mut self, id: &str, html: &str) -> bool;
}

/// In-memory [`RenderTarget`]: a fixed set of slots in declaration order.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    slots: Vec<(String, String)>,
}

impl MemoryPage {
    /// Page with the given slots, all empty.
    pub fn with_slots<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: ids
                .into_iter()
                .map(|id| (id.into(), String::new()))
                .collect(),
        }
    }

    /// Contents of slot `id`, when it exists.
    pub fn html(&self, id: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(slot, _)| slot == id)
            .map(|(_, html)| html.as_str())
    }

    /// Non-empty slot contents joined in declaration order.
    pub fn to_html(&self) -> String {
        let fragments: Vec<&str> = self
            .slots
            .iter()
            .map(|(_, html)| html.as_str())
            .filter(|html| !html.is_empty())
            .collect();
        fragments.join("\n")
    }
}

impl RenderTarget for MemoryPage {
    fn write_html(&mut self, id: &str, html: &str) -> bool {
        match self.slots.iter_mut().find(|(slot, _)| slot == id) {
            Some((_, contents)) => {
                *contents = html.to_string();
                true
            }
            None => false,
        }
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` for HTML-context insertion.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// HTML fragment for one query outcome: escaped question, answer, optional
/// error, and the status line.
pub fn answer_fragment(outcome: &QueryOutcome) -> String {
    let tone = if outcome.success { "success" } else { "error" };
    let mut fragment = format!("<div class=\"twin-response {}\">\n", tone);
    fragment.push_str(&format!(
        "  <div class=\"question\"><strong>Question:</strong> {}</div>\n",
        escape_html(&outcome.question)
    ));
    fragment.push_str(&format!(
        "  <div class=\"answer\"><strong>Answer:</strong> {}</div>\n",
        escape_html(&outcome.answer)
    ));
    if let Some(error) = &outcome.error {
        fragment.push_str(&format!(
            "  <div class=\"error\">Error: {}</div>\n",
            escape_html(error)
        ));
    }
    fragment.push_str(&format!(
        "  <div class=\"status\">Status: {}</div>\n",
        escape_html(&outcome.status)
    ));
    fragment.push_str("</div>");
    fragment
}

/// Health indicator fragment: online/offline text, a tone class, and a
/// title carrying the raw status value.
pub fn health_fragment(status: HealthStatus) -> String {
    let healthy = status.is_healthy();
    let text = if healthy { "API Online" } else { "API Offline" };
    let tone = if healthy { "healthy" } else { "error" };
    format!(
        "<span class=\"health-indicator {}\" title=\"Digital Twin API is {}\">{}</span>",
        tone, status, text
    )
}

/// Render `outcome` into slot `element_id`. A missing slot is logged and
/// ignored; rendering never fails.
pub fn display_answer(target: &mut dyn RenderTarget, outcome: &QueryOutcome, element_id: &str) {
    if !target.write_html(element_id, &answer_fragment(outcome)) {
        warn!(element_id, "render slot not found");
    }
}

/// Render the health indicator into [`HEALTH_TARGET_ID`]. A surface without
/// that slot is skipped silently.
pub fn update_health_indicator(target: &mut dyn RenderTarget, status: HealthStatus) {
    let _ = target.write_html(HEALTH_TARGET_ID, &health_fragment(status));
}
