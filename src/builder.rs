//! Builds the canonical classification request from an in-flight mail.

use std::sync::Arc;

use mail_parser::MessageParser;

use crate::error::BuildError;
use crate::extractor;
use crate::mail::Mail;
use crate::model::{ClassificationRequest, IdGenerator, RecipientSet, addresses_from};

/// Assembles `ClassificationRequest`s.
///
/// The id generator is injected so tests can pin it and assert byte-exact
/// serialization; production wiring uses `RandomIdGenerator`.
pub struct RequestBuilder {
    ids: Arc<dyn IdGenerator>,
}

impl RequestBuilder {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Build the request for one mail.
    ///
    /// Address channels are mapped in original order, duplicates preserved.
    /// The subject is taken verbatim (empty string when absent) and wrapped
    /// as a one-element sequence. The text body comes from re-parsing the
    /// raw MIME bytes; a source that cannot be re-materialized or decoded is
    /// a build failure, not a partial request.
    pub fn build(&self, mail: &dyn Mail) -> Result<ClassificationRequest, BuildError> {
        let raw = mail.raw_mime()?;

        let text_body = if raw.is_empty() {
            String::new()
        } else {
            let parsed = MessageParser::default()
                .parse(&raw)
                .ok_or(BuildError::MimeDecode)?;
            extractor::primary_text(&parsed)
        };

        Ok(ClassificationRequest {
            message_id: self.ids.generate(),
            from: addresses_from(mail.from_mailboxes()),
            recipients: RecipientSet {
                to: addresses_from(mail.to_mailboxes()),
                cc: addresses_from(mail.cc_mailboxes()),
                bcc: addresses_from(mail.bcc_mailboxes()),
            },
            subject: vec![mail.subject().unwrap_or_default().to_string()],
            text_body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::InMemoryMail;
    use uuid::Uuid;

    struct FixedIdGenerator(Uuid);

    impl IdGenerator for FixedIdGenerator {
        fn generate(&self) -> Uuid {
            self.0
        }
    }

    fn fixed_builder() -> RequestBuilder {
        let id = "524e4f85-2d2f-4927-ab98-bd7a2f689773".parse().unwrap();
        RequestBuilder::new(Arc::new(FixedIdGenerator(id)))
    }

    #[test]
    fn empty_mail_builds_empty_request() {
        let mail = InMemoryMail::from_rfc822("");
        let json = fixed_builder().build(&mail).unwrap().to_json().unwrap();

        assert_eq!(
            json,
            "{\"messageId\":\"524e4f85-2d2f-4927-ab98-bd7a2f689773\",\
             \"from\":[],\
             \"recipients\":{\"to\":[],\"cc\":[],\"bcc\":[]},\
             \"subject\":[\"\"],\
             \"textBody\":\"\"}"
        );
    }

    #[test]
    fn simple_text_message_builds_full_request() {
        let mail = InMemoryMail::from_rfc822(
            "From: From <from@james.org>, from2@james.org\r\n\
             To: to@james.org, To2 <to2@james.org>\r\n\
             Cc: cc@james.org, CC2 <cc2@james.org>\r\n\
             Bcc: bcc@james.org, Bcc2 <bcc2@james.org>, bcc3@james.org\r\n\
             Subject: my subject\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             this is my body",
        );

        let json = fixed_builder().build(&mail).unwrap().to_json().unwrap();

        assert_eq!(
            json,
            "{\"messageId\":\"524e4f85-2d2f-4927-ab98-bd7a2f689773\",\
             \"from\":[{\"name\":\"From\",\"address\":\"from@james.org\"},\
             {\"name\":null,\"address\":\"from2@james.org\"}],\
             \"recipients\":{\
             \"to\":[{\"name\":null,\"address\":\"to@james.org\"},\
             {\"name\":\"To2\",\"address\":\"to2@james.org\"}],\
             \"cc\":[{\"name\":null,\"address\":\"cc@james.org\"},\
             {\"name\":\"CC2\",\"address\":\"cc2@james.org\"}],\
             \"bcc\":[{\"name\":null,\"address\":\"bcc@james.org\"},\
             {\"name\":\"Bcc2\",\"address\":\"bcc2@james.org\"},\
             {\"name\":null,\"address\":\"bcc3@james.org\"}]},\
             \"subject\":[\"my subject\"],\
             \"textBody\":\"this is my body\"}"
        );
    }

    #[test]
    fn missing_subject_maps_to_single_empty_element() {
        let mail = InMemoryMail::from_rfc822(
            "From: a@x.org\r\nContent-Type: text/plain\r\n\r\nhello",
        );
        let request = fixed_builder().build(&mail).unwrap();
        assert_eq!(request.subject, vec![String::new()]);
    }

    #[test]
    fn subject_sequence_always_has_one_element() {
        let mail =
            InMemoryMail::from_rfc822("Subject: hi\r\nContent-Type: text/plain\r\n\r\nhello");
        let request = fixed_builder().build(&mail).unwrap();
        assert_eq!(request.subject, vec!["hi".to_string()]);
    }

    #[test]
    fn channel_lengths_match_source_channels() {
        let mail = InMemoryMail::from_rfc822(
            "From: a@x.org\r\n\
             To: t1@x.org, t2@x.org, t1@x.org\r\n\
             Cc: c1@x.org\r\n\
             \r\n\
             body",
        );
        let request = fixed_builder().build(&mail).unwrap();
        assert_eq!(request.from.len(), 1);
        assert_eq!(request.recipients.to.len(), 3);
        assert_eq!(request.recipients.to[0], request.recipients.to[2]);
        assert_eq!(request.recipients.cc.len(), 1);
        assert!(request.recipients.bcc.is_empty());
    }

    #[test]
    fn building_twice_is_byte_identical_with_fixed_ids() {
        let mail = InMemoryMail::from_rfc822(
            "From: a@x.org\r\nSubject: hi\r\nContent-Type: text/plain\r\n\r\nhello",
        );
        let builder = fixed_builder();
        let first = builder.build(&mail).unwrap().to_json().unwrap();
        let second = builder.build(&mail).unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unreadable_source_is_a_build_failure() {
        struct BrokenMail;

        impl Mail for BrokenMail {
            fn from_mailboxes(&self) -> &[crate::mail::Mailbox] {
                &[]
            }
            fn to_mailboxes(&self) -> &[crate::mail::Mailbox] {
                &[]
            }
            fn cc_mailboxes(&self) -> &[crate::mail::Mailbox] {
                &[]
            }
            fn bcc_mailboxes(&self) -> &[crate::mail::Mailbox] {
                &[]
            }
            fn subject(&self) -> Option<&str> {
                None
            }
            fn envelope_recipients(&self) -> &[String] {
                &[]
            }
            fn raw_mime(&self) -> std::io::Result<Vec<u8>> {
                Err(std::io::Error::other("gone"))
            }
            fn append_header(&mut self, _name: &str, _value: &str) {}
        }

        let result = fixed_builder().build(&BrokenMail);
        assert!(matches!(result, Err(BuildError::Source(_))));
    }
}
