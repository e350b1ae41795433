//! HTML rendering of a call report.
//!
//! The template is compiled once at startup. Every interpolation goes through
//! Handlebars' default HTML escaping, so transcript, summary and custom values
//! cannot break the document structure.

use chrono::FixedOffset;
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;
use tracing::debug;

use super::format::{format_call_date, format_duration, offset_from_minutes, SentimentTone};
use super::subject::build_subject;
use crate::call::{CallRecord, CustomData};
use crate::config::ReportConfig;
use crate::error::RenderError;
use crate::extract::{extract_first, remaining_fields, ExtractedField};
use crate::locale::Labels;

const TEMPLATE_NAME: &str = "call_report";
const TEMPLATE_SOURCE: &str = include_str!("templates/call_report.hbs");

/// A rendered report, ready for the mail sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// One row of the "additional details" table.
#[derive(Debug, Serialize)]
struct DetailRow {
    label: String,
    value: String,
}

/// Everything the template interpolates.
#[derive(Debug, Serialize)]
struct ReportContext<'a> {
    labels: &'static Labels,
    reason: &'a str,
    guest: &'a str,
    phone: &'a str,
    duration: String,
    sentiment: &'a str,
    sentiment_color: &'static str,
    date: String,
    summary: &'a str,
    details: Vec<DetailRow>,
    transcript: &'a str,
    recording_url: Option<&'a str>,
    call_id: Option<&'a str>,
}

/// Guest and reason fields pulled from custom data with the configured probes.
#[derive(Debug)]
pub struct KeyFields<'a> {
    pub guest: ExtractedField<'a>,
    pub reason: ExtractedField<'a>,
}

impl KeyFields<'_> {
    /// Keys already shown elsewhere in the report.
    pub fn used_keys(&self) -> Vec<&str> {
        [self.guest.key, self.reason.key].into_iter().flatten().collect()
    }
}

/// Compiled report template plus the settings it renders with.
pub struct ReportRenderer {
    registry: Handlebars<'static>,
    settings: ReportConfig,
    offset: Option<FixedOffset>,
}

impl ReportRenderer {
    pub fn new(settings: ReportConfig) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_template_string(TEMPLATE_NAME, TEMPLATE_SOURCE)?;

        let offset = settings.utc_offset_minutes.and_then(offset_from_minutes);

        Ok(Self {
            registry,
            settings,
            offset,
        })
    }

    pub fn labels(&self) -> &'static Labels {
        self.settings.locale.labels()
    }

    /// Extract guest and reason from custom data, with locale fallbacks.
    pub fn key_fields<'a>(&self, data: &'a CustomData) -> KeyFields<'a> {
        let labels = self.labels();
        KeyFields {
            guest: extract_first(data, &self.settings.guest_name_fields, labels.unknown_guest),
            reason: extract_first(data, &self.settings.reason_fields, labels.general_inquiry),
        }
    }

    /// Render the HTML body for `call`, showing `display_phone` as the contact.
    pub fn render(&self, call: &CallRecord, display_phone: &str) -> Result<String, RenderError> {
        let labels = self.labels();
        let empty = CustomData::new();
        let data = call.custom_data().unwrap_or(&empty);
        let analysis = call.call_analysis.as_ref();

        let fields = self.key_fields(data);
        let used_keys = fields.used_keys();
        let details: Vec<DetailRow> = remaining_fields(data, &used_keys)
            .map(|(label, value)| DetailRow { label, value })
            .collect();

        let sentiment = analysis
            .and_then(|a| a.user_sentiment.as_deref())
            .filter(|s| !s.trim().is_empty());

        let context = ReportContext {
            labels,
            reason: &fields.reason.value,
            guest: &fields.guest.value,
            phone: display_phone,
            duration: format_duration(call.duration_ms),
            sentiment: sentiment.unwrap_or(labels.neutral),
            sentiment_color: SentimentTone::classify(sentiment).color(),
            date: format_call_date(call.start_timestamp, self.offset, self.settings.locale),
            summary: analysis
                .and_then(|a| a.call_summary.as_deref())
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(labels.no_summary),
            details,
            transcript: call
                .transcript
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(labels.no_transcript),
            recording_url: call.recording_url.as_deref().filter(|u| !u.is_empty()),
            call_id: call.call_id.as_deref().filter(|id| !id.is_empty()),
        };

        debug!(
            call_id = ?context.call_id,
            detail_rows = context.details.len(),
            "report_render_start"
        );

        Ok(self.registry.render(TEMPLATE_NAME, &context)?)
    }

    /// Render subject and body together.
    pub fn render_email(&self, call: &CallRecord, display_phone: &str) -> Result<RenderedEmail, RenderError> {
        let empty = CustomData::new();
        let data = call.custom_data().unwrap_or(&empty);
        let fields = self.key_fields(data);

        Ok(RenderedEmail {
            subject: build_subject(self.labels(), &fields, display_phone),
            html: self.render(call, display_phone)?,
        })
    }
}
