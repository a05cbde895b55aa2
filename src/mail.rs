//! Boundary to the hosting pipeline's mail object.
//!
//! The stage never owns the mail — it only needs read access to the
//! structured envelope fields and the raw MIME bytes, plus one mutation:
//! appending a header. `Mail` captures exactly that surface; the hosting
//! pipeline adapts its native mail type to it. `InMemoryMail` is a simple
//! owned implementation used by the demo binary and the tests.

use std::io;

/// A display name + address pair, as carried by mail address headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Optional display name ("Alice Example").
    pub name: Option<String>,
    /// The mail address itself ("alice@example.com").
    pub address: String,
}

impl Mailbox {
    /// A bare address with no display name.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    /// An address with a display name.
    pub fn named(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }
}

/// Read surface of an in-flight mail, plus the single mutation the
/// classification stage performs.
///
/// Appending a header is additive: repeated appends with the same name
/// accumulate fields, never overwrite.
pub trait Mail: Send {
    /// Addresses from the From header, in header order.
    fn from_mailboxes(&self) -> &[Mailbox];
    /// To recipients, in header order.
    fn to_mailboxes(&self) -> &[Mailbox];
    /// Cc recipients, in header order.
    fn cc_mailboxes(&self) -> &[Mailbox];
    /// Bcc recipients, in header order.
    fn bcc_mailboxes(&self) -> &[Mailbox];
    /// Subject line, if present.
    fn subject(&self) -> Option<&str>;
    /// Envelope recipients (all channels combined), as plain addresses.
    fn envelope_recipients(&self) -> &[String];
    /// Re-materialize the full RFC 822 message bytes.
    fn raw_mime(&self) -> io::Result<Vec<u8>>;
    /// Append one header field to the message.
    fn append_header(&mut self, name: &str, value: &str);
}

/// Owned mail backed by its raw RFC 822 bytes.
///
/// Structured fields are read from the message headers at construction;
/// appended headers are kept alongside rather than spliced back into the
/// bytes, which is all the demo binary and the tests need.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMail {
    from: Vec<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
    subject: Option<String>,
    envelope_recipients: Vec<String>,
    raw: Vec<u8>,
    appended: Vec<(String, String)>,
}

impl InMemoryMail {
    /// Build from raw RFC 822 bytes, reading the address headers and subject
    /// out of the message itself and deriving the envelope recipients from
    /// the To, Cc and Bcc channels.
    ///
    /// Header parsing here is lenient — a message the parser cannot make
    /// sense of simply yields empty fields. Strictness lives in the request
    /// builder, where an undecodable body is a build failure.
    pub fn from_rfc822(raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();

        let mut mail = Self {
            raw,
            ..Self::default()
        };

        if let Some(parsed) = mail_parser::MessageParser::default().parse(&mail.raw) {
            mail.from = mailboxes_from(parsed.from());
            mail.to = mailboxes_from(parsed.to());
            mail.cc = mailboxes_from(parsed.cc());
            mail.bcc = mailboxes_from(parsed.bcc());
            mail.subject = parsed.subject().map(str::to_string);
        }

        mail.envelope_recipients = mail
            .to
            .iter()
            .chain(mail.cc.iter())
            .chain(mail.bcc.iter())
            .map(|mailbox| mailbox.address.clone())
            .collect();

        mail
    }

    /// Override the envelope recipients (they need not match the headers).
    pub fn with_envelope_recipients(mut self, recipients: Vec<String>) -> Self {
        self.envelope_recipients = recipients;
        self
    }

    /// Headers appended by the stage, in append order.
    pub fn appended_headers(&self) -> &[(String, String)] {
        &self.appended
    }
}

impl Mail for InMemoryMail {
    fn from_mailboxes(&self) -> &[Mailbox] {
        &self.from
    }

    fn to_mailboxes(&self) -> &[Mailbox] {
        &self.to
    }

    fn cc_mailboxes(&self) -> &[Mailbox] {
        &self.cc
    }

    fn bcc_mailboxes(&self) -> &[Mailbox] {
        &self.bcc
    }

    fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    fn envelope_recipients(&self) -> &[String] {
        &self.envelope_recipients
    }

    fn raw_mime(&self) -> io::Result<Vec<u8>> {
        Ok(self.raw.clone())
    }

    fn append_header(&mut self, name: &str, value: &str) {
        self.appended.push((name.to_string(), value.to_string()));
    }
}

/// Flatten a mail_parser address header into mailboxes, preserving order.
///
/// Groups are flattened into their member addresses. Entries without an
/// address are dropped; entries without a display name keep `name: None`.
fn mailboxes_from(addr: Option<&mail_parser::Address>) -> Vec<Mailbox> {
    let Some(addr) = addr else {
        return Vec::new();
    };
    match addr {
        mail_parser::Address::List(addrs) => addrs.iter().filter_map(to_mailbox).collect(),
        mail_parser::Address::Group(groups) => groups
            .iter()
            .flat_map(|g| g.addresses.iter().filter_map(to_mailbox))
            .collect(),
    }
}

fn to_mailbox(addr: &mail_parser::Addr) -> Option<Mailbox> {
    let address = addr.address.as_ref()?.to_string();
    Some(Mailbox {
        name: addr.name.as_ref().map(|n| n.to_string()),
        address,
    })
}
