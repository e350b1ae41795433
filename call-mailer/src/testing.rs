//! In-memory fakes shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{MailError, TranslateError};
use crate::mail::MailSender;
use crate::translate::Translator;

/// Records every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    /// `(to, subject, html)` for every send so far.
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), html.to_string()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub struct FailingMailer;

#[async_trait]
impl MailSender for FailingMailer {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> Result<(), MailError> {
        Err(MailError::Transport("connection refused".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

pub struct PanickingMailer;

#[async_trait]
impl MailSender for PanickingMailer {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> Result<(), MailError> {
        panic!("mail backend exploded")
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}

/// Prefixes every text with `"{target}:"`.
#[derive(Default)]
pub struct PrefixTranslator;

#[async_trait]
impl Translator for PrefixTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError> {
        Ok(format!("{}:{}", target_language, text))
    }
}
