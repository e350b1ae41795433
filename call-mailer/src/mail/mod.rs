//! Mail delivery.
//!
//! Every backend implements [`MailSender`]. Sending is a single attempt with
//! no retry; configuration problems are reported as [`MailError::Config`]
//! before any network activity.

pub mod sendgrid;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::{MailConfig, TransportKind};
use crate::error::MailError;

pub use sendgrid::SendGridMailer;
pub use smtp::SmtpMailer;

/// Delivers one HTML email.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Sender identity shared by the backends.
#[derive(Debug, Clone, Default)]
pub struct Sender {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl Sender {
    pub fn new(email: Option<String>, name: Option<String>) -> Self {
        Self { email, name }
    }

    /// The sender address, or a configuration error when it is missing.
    pub fn require_email(&self) -> Result<&str, MailError> {
        self.email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| MailError::Config("EMAIL_FROM is not set".into()))
    }
}

/// Reject an empty recipient before touching the network.
pub(crate) fn require_recipient(to: &str) -> Result<&str, MailError> {
    let to = to.trim();
    if to.is_empty() {
        return Err(MailError::Config("recipient address is missing".into()));
    }
    Ok(to)
}

/// Backend used when no transport credentials are configured.
#[derive(Debug, Clone)]
pub struct DisabledMailer {
    reason: String,
}

impl DisabledMailer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl MailSender for DisabledMailer {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> Result<(), MailError> {
        Err(MailError::Config(format!("mail sending is disabled: {}", self.reason)))
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Build the configured mail backend.
///
/// Missing credentials do not abort startup; they produce a
/// [`DisabledMailer`] whose every send fails with the reason.
pub fn build_mailer(config: &MailConfig, client: Client) -> Arc<dyn MailSender> {
    let sender = Sender::new(config.from_email.clone(), config.from_name.clone());
    if sender.email.is_none() {
        warn!("mail_sender_address_missing");
    }

    let mailer: Arc<dyn MailSender> = match config.resolved_transport() {
        Some(TransportKind::SendGrid) => match &config.sendgrid_api_key {
            Some(api_key) => Arc::new(SendGridMailer::new(
                client,
                api_key.clone(),
                config.sendgrid_api_url.clone(),
                sender,
            )),
            None => Arc::new(DisabledMailer::new("SENDGRID_API_KEY is not set")),
        },
        Some(TransportKind::Smtp) => match &config.smtp_host {
            Some(host) => match SmtpMailer::new(config, host, sender) {
                Ok(mailer) => Arc::new(mailer),
                Err(e) => Arc::new(DisabledMailer::new(e.to_string())),
            },
            None => Arc::new(DisabledMailer::new("SMTP_HOST is not set")),
        },
        None => Arc::new(DisabledMailer::new(
            "no mail transport configured (set SENDGRID_API_KEY or SMTP_HOST)",
        )),
    };

    if mailer.name() == "disabled" {
        warn!(transport = mailer.name(), "mail_transport_disabled");
    } else {
        info!(transport = mailer.name(), "mail_transport_ready");
    }

    mailer
}
