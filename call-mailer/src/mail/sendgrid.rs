//! SendGrid Web API v3 backend.
//!
//! Reference: https://docs.sendgrid.com/api-reference/mail-send/mail-send

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{error, info, warn};

use super::{require_recipient, MailSender, Sender};
use crate::error::MailError;

#[derive(Serialize)]
struct MailSendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: EmailAddress<'a>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [EmailAddress<'a>; 1],
}

#[derive(Serialize)]
struct EmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: &'a str,
}

/// Sends mail through the SendGrid HTTP API.
#[derive(Clone)]
pub struct SendGridMailer {
    client: Client,
    api_key: String,
    base_url: String,
    sender: Sender,
}

impl SendGridMailer {
    pub fn new(client: Client, api_key: String, base_url: String, sender: Sender) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            sender,
        }
    }
}

#[async_trait]
impl MailSender for SendGridMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let from = self.sender.require_email()?;
        let to = require_recipient(to)?;

        let request = MailSendRequest {
            personalizations: [Personalization {
                to: [EmailAddress { email: to, name: None }],
            }],
            from: EmailAddress {
                email: from,
                name: self.sender.name.as_deref(),
            },
            subject,
            content: [Content {
                content_type: "text/html",
                value: html,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(to = %to, error = %e, "sendgrid_request_failed");
                MailError::Transport(e.to_string())
            })?;

        let status = response.status();
        match status {
            StatusCode::OK | StatusCode::ACCEPTED => {
                info!(to = %to, status_code = status.as_u16(), "sendgrid_mail_sent");
                Ok(())
            }
            s if s.is_success() => {
                warn!(to = %to, status_code = s.as_u16(), "sendgrid_unexpected_status");
                Ok(())
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                error!(
                    to = %to,
                    status_code = s.as_u16(),
                    response_body = %body,
                    "sendgrid_mail_rejected"
                );
                Err(MailError::Rejected {
                    status: s.as_u16(),
                    body,
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "sendgrid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mailer(server: &MockServer, from: Option<&str>) -> SendGridMailer {
        SendGridMailer::new(
            Client::new(),
            "SG.test-key".to_string(),
            server.uri(),
            Sender::new(from.map(str::to_string), Some("Front Desk".to_string())),
        )
    }

    #[tokio::test]
    async fn test_send_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .and(header("authorization", "Bearer SG.test-key"))
            .and(body_partial_json(json!({
                "personalizations": [{"to": [{"email": "ops@example.com"}]}],
                "from": {"email": "reports@example.com", "name": "Front Desk"},
                "subject": "New Call: Schmidt",
                "content": [{"type": "text/html", "value": "<p>report</p>"}]
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        mailer(&server, Some("reports@example.com"))
            .send("ops@example.com", "New Call: Schmidt", "<p>report</p>")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errors": [{"message": "The provided authorization grant is invalid"}]
            })))
            .mount(&server)
            .await;

        let err = mailer(&server, Some("reports@example.com"))
            .send("ops@example.com", "s", "<p></p>")
            .await
            .unwrap_err();

        match err {
            MailError::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("authorization grant is invalid"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_sender_never_calls_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .expect(0)
            .mount(&server)
            .await;

        let mailer = mailer(&server, None);
        for _ in 0..3 {
            let err = mailer
                .send("ops@example.com", "s", "<p></p>")
                .await
                .unwrap_err();
            assert!(err.is_config());
        }
    }

    #[tokio::test]
    async fn test_missing_recipient_never_calls_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .expect(0)
            .mount(&server)
            .await;

        let err = mailer(&server, Some("reports@example.com"))
            .send("", "s", "<p></p>")
            .await
            .unwrap_err();
        assert!(err.is_config());
    }
}
