//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup into [`Config`], which is then shared
//! by reference through the web state. Nothing here is process-global.

use std::env;
use tracing::warn;

use crate::locale::ReportLocale;

/// Recipient used when `TARGET_EMAIL` is not configured.
pub const DEFAULT_RECIPIENT: &str = "client@example.com";

/// Which mail backend to build at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    SendGrid,
    Smtp,
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// Plain connection upgraded with STARTTLS
    StartTls,
    /// Implicit TLS (usually port 465)
    Tls,
    /// No encryption, for local relays only
    None,
}

/// Mail transport settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Explicitly selected transport, `None` means auto-detect from credentials
    pub transport: Option<TransportKind>,

    /// Sender address; sending is impossible without it
    pub from_email: Option<String>,

    /// Optional display name for the sender
    pub from_name: Option<String>,

    /// SendGrid Web API key
    pub sendgrid_api_key: Option<String>,

    /// SendGrid API base URL
    pub sendgrid_api_url: String,

    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_tls: SmtpTls,
}

impl MailConfig {
    /// Resolve the transport to use, honouring an explicit selection first.
    pub fn resolved_transport(&self) -> Option<TransportKind> {
        self.transport.or_else(|| {
            if self.sendgrid_api_key.is_some() {
                Some(TransportKind::SendGrid)
            } else if self.smtp_host.is_some() {
                Some(TransportKind::Smtp)
            } else {
                None
            }
        })
    }
}

/// Translation settings.
#[derive(Debug, Clone)]
pub struct TranslateConfig {
    /// Target language code (e.g. "de"); translation is off when unset
    pub target_language: Option<String>,

    /// Google Cloud Translation API key
    pub google_api_key: Option<String>,

    /// Google Cloud Translation API base URL
    pub google_api_url: String,
}

impl TranslateConfig {
    /// Translation only runs with both a target language and a credential.
    pub fn is_enabled(&self) -> bool {
        self.target_language.is_some() && self.google_api_key.is_some()
    }
}

/// Report rendering settings.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Language of labels, fallbacks and placeholders
    pub locale: ReportLocale,

    /// Offset applied when displaying the call date; `None` uses the server's local offset
    pub utc_offset_minutes: Option<i32>,

    /// Logical names probed, in order, for the guest identity
    pub guest_name_fields: Vec<String>,

    /// Logical names probed, in order, for the call reason
    pub reason_fields: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            locale: ReportLocale::English,
            utc_offset_minutes: None,
            guest_name_fields: vec!["guestname".to_string(), "accommodationname".to_string()],
            reason_fields: vec!["reasonofcall".to_string()],
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Recipient of every call report
    pub recipient: String,

    pub mail: MailConfig,
    pub translate: TranslateConfig,
    pub report: ReportConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let recipient = match non_empty("TARGET_EMAIL") {
            Some(to) => to,
            None => {
                warn!(
                    default_recipient = DEFAULT_RECIPIENT,
                    "target_email_not_configured"
                );
                DEFAULT_RECIPIENT.to_string()
            }
        };

        let report_defaults = ReportConfig::default();

        Config {
            port: parse_or("PORT", 3000),

            recipient,

            mail: MailConfig {
                transport: parse_transport("MAIL_TRANSPORT"),
                from_email: non_empty("EMAIL_FROM"),
                from_name: non_empty("EMAIL_FROM_NAME"),
                sendgrid_api_key: non_empty("SENDGRID_API_KEY"),
                sendgrid_api_url: non_empty("SENDGRID_API_URL")
                    .unwrap_or_else(|| "https://api.sendgrid.com".to_string()),
                smtp_host: non_empty("SMTP_HOST"),
                smtp_port: parse_or("SMTP_PORT", 587),
                smtp_user: non_empty("SMTP_USER"),
                smtp_password: non_empty("SMTP_PASSWORD"),
                smtp_tls: parse_smtp_tls("SMTP_TLS"),
            },

            translate: TranslateConfig {
                target_language: non_empty("TRANSLATE_TARGET_LANGUAGE"),
                google_api_key: non_empty("GOOGLE_TRANSLATE_API_KEY"),
                google_api_url: non_empty("GOOGLE_TRANSLATE_API_URL")
                    .unwrap_or_else(|| "https://translation.googleapis.com".to_string()),
            },

            report: ReportConfig {
                locale: parse_locale("REPORT_LANGUAGE"),
                utc_offset_minutes: non_empty("REPORT_UTC_OFFSET_MINUTES").and_then(|raw| {
                    match raw.parse() {
                        Ok(minutes) => Some(minutes),
                        Err(_) => {
                            warn!(env_var = "REPORT_UTC_OFFSET_MINUTES", value = %raw, "Invalid offset, using local time");
                            None
                        }
                    }
                }),
                guest_name_fields: parse_csv("GUEST_NAME_FIELDS")
                    .filter(|fields| !fields.is_empty())
                    .unwrap_or(report_defaults.guest_name_fields),
                reason_fields: parse_csv("REASON_FIELDS")
                    .filter(|fields| !fields.is_empty())
                    .unwrap_or(report_defaults.reason_fields),
            },
        }
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a variable, falling back to `default` when missing or malformed.
fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match non_empty(name) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }),
    }
}

fn parse_transport(name: &str) -> Option<TransportKind> {
    let raw = non_empty(name)?;
    match raw.to_lowercase().as_str() {
        "sendgrid" => Some(TransportKind::SendGrid),
        "smtp" => Some(TransportKind::Smtp),
        _ => {
            warn!(env_var = name, value = %raw, "Unknown mail transport, auto-detecting");
            None
        }
    }
}

fn parse_smtp_tls(name: &str) -> SmtpTls {
    let Some(raw) = non_empty(name) else {
        return SmtpTls::StartTls;
    };
    match raw.to_lowercase().as_str() {
        "starttls" => SmtpTls::StartTls,
        "tls" | "ssl" => SmtpTls::Tls,
        "none" | "off" => SmtpTls::None,
        _ => {
            warn!(env_var = name, value = %raw, "Unknown SMTP TLS mode, using starttls");
            SmtpTls::StartTls
        }
    }
}

fn parse_locale(name: &str) -> ReportLocale {
    let Some(raw) = non_empty(name) else {
        return ReportLocale::English;
    };
    ReportLocale::from_code(&raw).unwrap_or_else(|| {
        warn!(env_var = name, value = %raw, "Unsupported report language, using en");
        ReportLocale::English
    })
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config() -> MailConfig {
        MailConfig {
            transport: None,
            from_email: None,
            from_name: None,
            sendgrid_api_key: None,
            sendgrid_api_url: "https://api.sendgrid.com".to_string(),
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_password: None,
            smtp_tls: SmtpTls::StartTls,
        }
    }

    #[test]
    fn test_parse_csv() {
        env::set_var("CALLMAIL_TEST_CSV", "guestname, accommodation_name ,,");
        let result = parse_csv("CALLMAIL_TEST_CSV");
        assert_eq!(
            result,
            Some(vec!["guestname".to_string(), "accommodation_name".to_string()])
        );
        env::remove_var("CALLMAIL_TEST_CSV");
    }

    #[test]
    fn test_parse_or_falls_back_on_garbage() {
        env::set_var("CALLMAIL_TEST_PORT", "not-a-port");
        assert_eq!(parse_or::<u16>("CALLMAIL_TEST_PORT", 3000), 3000);
        env::set_var("CALLMAIL_TEST_PORT", "8081");
        assert_eq!(parse_or::<u16>("CALLMAIL_TEST_PORT", 3000), 8081);
        env::remove_var("CALLMAIL_TEST_PORT");
    }

    #[test]
    fn test_non_empty_treats_blank_as_unset() {
        env::set_var("CALLMAIL_TEST_BLANK", "   ");
        assert_eq!(non_empty("CALLMAIL_TEST_BLANK"), None);
        env::remove_var("CALLMAIL_TEST_BLANK");
    }

    #[test]
    fn test_parse_smtp_tls() {
        assert_eq!(parse_smtp_tls("CALLMAIL_TEST_TLS_UNSET"), SmtpTls::StartTls);
        env::set_var("CALLMAIL_TEST_TLS", "TLS");
        assert_eq!(parse_smtp_tls("CALLMAIL_TEST_TLS"), SmtpTls::Tls);
        env::set_var("CALLMAIL_TEST_TLS", "none");
        assert_eq!(parse_smtp_tls("CALLMAIL_TEST_TLS"), SmtpTls::None);
        env::remove_var("CALLMAIL_TEST_TLS");
    }

    #[test]
    fn test_resolved_transport_auto_detect() {
        let mut mail = mail_config();
        assert_eq!(mail.resolved_transport(), None);

        mail.smtp_host = Some("smtp.example.com".to_string());
        assert_eq!(mail.resolved_transport(), Some(TransportKind::Smtp));

        mail.sendgrid_api_key = Some("SG.key".to_string());
        assert_eq!(mail.resolved_transport(), Some(TransportKind::SendGrid));

        mail.transport = Some(TransportKind::Smtp);
        assert_eq!(mail.resolved_transport(), Some(TransportKind::Smtp));
    }

    #[test]
    fn test_translate_enabled_needs_key_and_target() {
        let mut translate = TranslateConfig {
            target_language: Some("de".to_string()),
            google_api_key: None,
            google_api_url: "https://translation.googleapis.com".to_string(),
        };
        assert!(!translate.is_enabled());
        translate.google_api_key = Some("key".to_string());
        assert!(translate.is_enabled());
    }
}
