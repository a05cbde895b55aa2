//! Primary text selection from a parsed MIME tree.
//!
//! One string represents the mail body for classification: the first
//! `text/plain` body if one exists and is non-empty, otherwise the first
//! `text/html` body verbatim (tags included), otherwise the empty string.
//! Plain text wins over HTML regardless of where the parts sit in the tree.
//! Attachments never participate.

use mail_parser::{Message, PartType};

/// Select the primary text of a message.
pub fn primary_text(message: &Message<'_>) -> String {
    if let Some(text) = first_plain_body(message)
        && !text.is_empty()
    {
        return text;
    }
    first_html_body(message).unwrap_or_default()
}

/// First non-attachment `text/plain` body, decoded.
///
/// The parser's `text_body` list also references HTML parts when no plain
/// part exists (so callers can ask for a text rendition); those are skipped
/// here — an HTML-only message must fall through to the HTML branch verbatim,
/// never as a down-converted rendition.
fn first_plain_body(message: &Message<'_>) -> Option<String> {
    message
        .text_body
        .iter()
        .filter_map(|id| message.parts.get(*id as usize))
        .find_map(|part| match &part.body {
            PartType::Text(text) => Some(text.to_string()),
            _ => None,
        })
}

/// First non-attachment `text/html` body, as raw HTML source.
fn first_html_body(message: &Message<'_>) -> Option<String> {
    message
        .html_body
        .iter()
        .filter_map(|id| message.parts.get(*id as usize))
        .find_map(|part| match &part.body {
            PartType::Html(html) => Some(html.to_string()),
            _ => None,
        })
}
