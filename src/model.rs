//! Wire types for the classification request.
//!
//! Key order and null-vs-absent semantics are part of the wire contract:
//! some consumers compare serialized requests textually, so the structs
//! below declare their fields in the exact order the service documents and
//! a missing display name serializes as an explicit `null`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BuildError;
use crate::mail::Mailbox;

// ── Addresses ───────────────────────────────────────────────────────

/// A normalized mail address: optional display name plus the address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Display name; serialized as `null` when the source carries none.
    pub name: Option<String>,
    /// The mail address.
    pub address: String,
}

impl From<&Mailbox> for Address {
    fn from(mailbox: &Mailbox) -> Self {
        Self {
            name: mailbox.name.clone(),
            address: mailbox.address.clone(),
        }
    }
}

/// Map a mailbox channel to addresses, preserving order and duplicates.
pub fn addresses_from(mailboxes: &[Mailbox]) -> Vec<Address> {
    mailboxes.iter().map(Address::from).collect()
}

/// Recipients grouped by channel. Channels with no recipients serialize as
/// empty arrays, never as absent fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecipientSet {
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
}

// ── Request ─────────────────────────────────────────────────────────

/// The canonical representation of one mail, sent to the classification
/// service as the POST body.
///
/// `message_id` identifies the *request*, not the email — it is freshly
/// generated for every build. `subject` always holds exactly one element
/// (the empty string when the mail has no subject) and `text_body` is never
/// absent, defaulting to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRequest {
    pub message_id: Uuid,
    pub from: Vec<Address>,
    pub recipients: RecipientSet,
    pub subject: Vec<String>,
    pub text_body: String,
}

impl ClassificationRequest {
    /// Serialize to the exact JSON shape the service expects.
    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string(self)?)
    }
}

// ── Request identifiers ─────────────────────────────────────────────

/// Source of per-request identifiers.
///
/// Injected into the request builder so tests can substitute a fixed
/// generator and assert byte-identical serialization.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

/// Production generator: random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

// ── Service answer ──────────────────────────────────────────────────

/// Documented shape of the classification service's answer.
///
/// The stage itself never decodes the response — the raw body is attached
/// as the header value verbatim. This type exists for downstream consumers
/// that want to read the header back as structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationGuess {
    pub mailbox_id: String,
    pub mailbox_name: String,
    pub confidence: f64,
}
