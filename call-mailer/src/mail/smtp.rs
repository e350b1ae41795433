//! SMTP backend using lettre's async tokio transport.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info, warn};

use super::{require_recipient, MailSender, Sender};
use crate::config::{MailConfig, SmtpTls};
use crate::error::MailError;

/// Sends mail through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    sender: Sender,
}

impl SmtpMailer {
    /// Build the transport. No connection is opened until the first send.
    pub fn new(config: &MailConfig, host: &str, sender: Sender) -> Result<Self, MailError> {
        let builder = match config.smtp_tls {
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| MailError::Config(format!("SMTP relay {}: {}", host, e)))?,
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| MailError::Config(format!("SMTP relay {}: {}", host, e)))?,
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        };

        let mut builder = builder.port(config.smtp_port);
        match (&config.smtp_user, &config.smtp_password) {
            (Some(user), Some(password)) => {
                builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
            }
            (None, None) => {}
            (user, _) => {
                warn!(
                    smtp_host = %host,
                    user_set = user.is_some(),
                    "smtp_credentials_incomplete"
                );
            }
        }

        Ok(Self {
            transport: builder.build(),
            host: host.to_string(),
            sender,
        })
    }

    fn build_message(&self, to: &str, subject: &str, html: &str) -> Result<Message, MailError> {
        let from_address: Address = self
            .sender
            .require_email()?
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("sender: {}", e)))?;
        let from = Mailbox::new(self.sender.name.clone(), from_address);

        let to: Mailbox = require_recipient(to)?
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("recipient '{}': {}", to, e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let message = self.build_message(to, subject, html)?;

        match self.transport.send(message).await {
            Ok(response) => {
                info!(
                    to = %to,
                    smtp_host = %self.host,
                    smtp_code = %response.code(),
                    "smtp_mail_sent"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    to = %to,
                    smtp_host = %self.host,
                    permanent = e.is_permanent(),
                    error = %e,
                    "smtp_send_failed"
                );
                Err(MailError::Transport(e.to_string()))
            }
        }
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
