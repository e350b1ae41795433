//! Call report processing - the work done after a webhook is acknowledged.
//!
//! ```text
//! body → CallEvent → (ignored | call) → customer phone → translate? → subject + html → mail
//! ```
//!
//! The webhook handler never waits for any of this. [`CallProcessor::spawn`]
//! runs the pipeline as a detached task whose outcome is only visible in logs.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::body::Bytes;
use futures::FutureExt;
use handlebars::TemplateError;
use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::call::{CallEvent, Direction};
use crate::config::Config;
use crate::error::{ProcessError, Result};
use crate::mail::{build_mailer, MailSender};
use crate::report::ReportRenderer;
use crate::translate::{translate_call, GoogleTranslator, Translator};

/// How a webhook ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Event type other than `call_analyzed`
    Ignored { event: Option<String> },
    /// Report delivered to the mail backend
    Sent {
        call_id: Option<String>,
        subject: String,
    },
}

/// Everything needed to turn a call event into a delivered report.
pub struct CallProcessor {
    recipient: String,
    renderer: ReportRenderer,
    mailer: Arc<dyn MailSender>,
    translation: Option<(Arc<dyn Translator>, String)>,
}

impl CallProcessor {
    pub fn new(recipient: String, renderer: ReportRenderer, mailer: Arc<dyn MailSender>) -> Self {
        Self {
            recipient,
            renderer,
            mailer,
            translation: None,
        }
    }

    /// Translate analysis text into `target_language` before rendering.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>, target_language: String) -> Self {
        self.translation = Some((translator, target_language));
        self
    }

    /// Wire up renderer, mail backend and optional translator from config.
    pub fn from_config(config: &Config, client: Client) -> std::result::Result<Self, TemplateError> {
        let renderer = ReportRenderer::new(config.report.clone())?;
        let mailer = build_mailer(&config.mail, client.clone());
        let processor = Self::new(config.recipient.clone(), renderer, mailer);

        let translate = &config.translate;
        match (&translate.target_language, &translate.google_api_key) {
            (Some(target), Some(api_key)) => {
                info!(target_language = %target, "translation_enabled");
                let translator = GoogleTranslator::new(
                    client,
                    api_key.clone(),
                    translate.google_api_url.clone(),
                );
                Ok(processor.with_translator(Arc::new(translator), target.clone()))
            }
            (Some(target), None) => {
                warn!(
                    target_language = %target,
                    "translation_disabled_missing_api_key"
                );
                Ok(processor)
            }
            _ => Ok(processor),
        }
    }

    /// Parse a raw webhook body and run the pipeline.
    pub async fn process(&self, body: &[u8]) -> Result<Outcome> {
        let event: CallEvent = serde_json::from_slice(body)?;
        self.process_event(event).await
    }

    /// Run the pipeline for an already parsed event.
    pub async fn process_event(&self, event: CallEvent) -> Result<Outcome> {
        if !event.is_call_analyzed() {
            return Ok(Outcome::Ignored { event: event.event });
        }

        let call = event
            .call
            .ok_or_else(|| ProcessError::Payload("call_analyzed event without a call".into()))?;

        let labels = self.renderer.labels();
        let phone = call
            .customer_phone()
            .unwrap_or(labels.unknown_number)
            .to_string();

        info!(
            call_id = ?call.call_id,
            inbound = call.direction == Some(Direction::Inbound),
            phone = %phone,
            "call_report_processing"
        );

        let call = match &self.translation {
            Some((translator, target_language)) => {
                translate_call(translator.as_ref(), &call, target_language).await
            }
            None => call,
        };

        let email = self.renderer.render_email(&call, &phone)?;

        info!(
            call_id = ?call.call_id,
            to = %self.recipient,
            subject = %email.subject,
            html_length = email.html.len(),
            transport = self.mailer.name(),
            "call_report_sending"
        );

        self.mailer
            .send(&self.recipient, &email.subject, &email.html)
            .await?;

        Ok(Outcome::Sent {
            call_id: call.call_id,
            subject: email.subject,
        })
    }

    /// Run the pipeline for `body` and log how it ended.
    ///
    /// Never returns an error and never unwinds: failures and panics are
    /// logged with the call id when the body was readable enough to carry one.
    pub async fn run(&self, body: &[u8]) {
        let event: CallEvent = match serde_json::from_slice(body) {
            Ok(event) => event,
            Err(e) => {
                let error = ProcessError::from(e);
                error!(body_length = body.len(), error = %error, "call_report_failed");
                return;
            }
        };
        let call_id = event.call.as_ref().and_then(|call| call.call_id.clone());

        let result = AssertUnwindSafe(self.process_event(event))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(Outcome::Sent { subject, .. })) => {
                info!(call_id = ?call_id, subject = %subject, "call_report_sent");
            }
            Ok(Ok(Outcome::Ignored { event })) => {
                info!(call_id = ?call_id, event = ?event, "call_event_ignored");
            }
            Ok(Err(e)) => {
                error!(call_id = ?call_id, error = %e, "call_report_failed");
            }
            Err(panic) => {
                error!(
                    call_id = ?call_id,
                    panic = %panic_message(panic.as_ref()),
                    "call_report_panicked"
                );
            }
        }
    }

    /// Process `body` in a detached task; see [`CallProcessor::run`].
    pub fn spawn(self: &Arc<Self>, body: Bytes) -> JoinHandle<()> {
        let processor = Arc::clone(self);
        tokio::spawn(async move { processor.run(&body).await })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
