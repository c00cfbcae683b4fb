// --- File: crates/frontdesk_mail/src/transport.rs ---
//! Mail delivery.
//!
//! [`MailTransport`] takes a fully composed [`OutgoingEmail`]; the production
//! adapter [`SmtpMailer`] submits it over an authenticated TLS session.

use frontdesk_common::BoxFuture;
use frontdesk_config::SmtpConfig;
use lettre::address::{Address, AddressError, Envelope};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

/// Port that speaks TLS from the first byte; every other port upgrades with STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("invalid email address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: AddressError,
    },
    #[error("email has no recipients")]
    NoRecipients,
    #[error("invalid attachment content type {0:?}")]
    ContentType(String),
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A message ready to send. The sender is fixed by the transport.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<EmailAttachment>,
}

pub trait MailTransport: Send + Sync {
    fn send(&self, email: OutgoingEmail) -> BoxFuture<'_, (), MailError>;
}

pub fn parse_address(address: &str) -> Result<Address, MailError> {
    address.trim().parse::<Address>().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

/// True when `address` is a syntactically valid mailbox.
pub fn is_valid_address(address: &str) -> bool {
    parse_address(address).is_ok()
}

/// `user+tag@domain` becomes `user@domain`. Some relays reject sub-addressed
/// envelope recipients even though they deliver them fine in headers.
pub fn strip_plus_alias(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) => match local.split_once('+') {
            Some((user, _)) => format!("{}@{}", user, domain),
            None => address.to_string(),
        },
        None => address.to_string(),
    }
}

/// `user@domain` becomes `user+tag@domain`.
pub fn plus_alias(address: &str, tag: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) => format!("{}+{}@{}", local, tag, domain),
        None => address.to_string(),
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    Ok(Mailbox::new(None, parse_address(address)?))
}

/// Builds the RFC 5322 message for `email` sent by `from`.
pub fn build_message(from: &Mailbox, email: &OutgoingEmail) -> Result<Message, MailError> {
    if email.to.is_empty() {
        return Err(MailError::NoRecipients);
    }

    let mut builder = Message::builder().from(from.clone()).subject(email.subject.clone());
    for to in &email.to {
        builder = builder.to(mailbox(to)?);
    }
    for cc in &email.cc {
        builder = builder.cc(mailbox(cc)?);
    }
    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(mailbox(reply_to)?);
    }

    let message = match &email.attachment {
        None => builder
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())?,
        Some(attachment) => {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|_| MailError::ContentType(attachment.content_type.clone()))?;
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(email.html_body.clone()))
                    .singlepart(
                        Attachment::new(attachment.filename.clone())
                            .body(attachment.content.clone(), content_type),
                    ),
            )?
        }
    };
    Ok(message)
}

/// SMTP envelope for `email`: every header recipient, with plus-aliases stripped.
pub fn build_envelope(from: &Mailbox, email: &OutgoingEmail) -> Result<Envelope, MailError> {
    let recipients = email
        .to
        .iter()
        .chain(email.cc.iter())
        .map(|address| parse_address(&strip_plus_alias(address)))
        .collect::<Result<Vec<_>, _>>()?;
    Envelope::new(Some(from.email.clone()), recipients).map_err(MailError::Build)
}

/// Production transport backed by an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };
        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.send_from.clone(),
                config.password.clone(),
            ))
            .build();
        let from = Mailbox::new(
            Some(config.sender_name().to_string()),
            parse_address(&config.send_from)?,
        );
        info!(
            "✅ SMTP transport configured for {}:{}",
            config.host, config.port
        );
        Ok(Self { transport, from })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, email: OutgoingEmail) -> BoxFuture<'_, (), MailError> {
        Box::pin(async move {
            let message = build_message(&self.from, &email)?;
            let envelope = build_envelope(&self.from, &email)?;
            self.transport
                .send_raw(&envelope, &message.formatted())
                .await?;
            info!("📧 Sent \"{}\" to {}", email.subject, email.to.join(", "));
            Ok(())
        })
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Keeps sent mail in memory. Can be switched to fail every send.
    #[derive(Default)]
    pub struct RecordingTransport {
        sent: Mutex<Vec<OutgoingEmail>>,
        failing: AtomicBool,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            let transport = Self::default();
            transport.failing.store(true, Ordering::SeqCst);
            transport
        }

        pub fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_with_subject(&self, subject: &str) -> Vec<OutgoingEmail> {
            self.sent()
                .into_iter()
                .filter(|email| email.subject == subject)
                .collect()
        }
    }

    impl MailTransport for RecordingTransport {
        fn send(&self, email: OutgoingEmail) -> BoxFuture<'_, (), MailError> {
            Box::pin(async move {
                if self.failing.load(Ordering::SeqCst) {
                    return Err(MailError::Unavailable("relay refused connection".into()));
                }
                self.sent.lock().unwrap().push(email);
                Ok(())
            })
        }
    }
}
