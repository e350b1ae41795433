//! User-facing strings of the call report, per output language.

use serde::Serialize;

/// Output language of the report and subject line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportLocale {
    #[default]
    English,
    German,
}

/// All labels and placeholders of one locale.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Labels {
    pub new_call: &'static str,
    pub header: &'static str,
    pub reason_heading: &'static str,
    pub guest: &'static str,
    pub phone: &'static str,
    pub duration: &'static str,
    pub sentiment: &'static str,
    pub date: &'static str,
    pub summary_heading: &'static str,
    pub details_heading: &'static str,
    pub transcript_heading: &'static str,
    pub recording_link: &'static str,
    pub call_id: &'static str,
    pub unknown_guest: &'static str,
    pub general_inquiry: &'static str,
    pub unknown_number: &'static str,
    pub no_summary: &'static str,
    pub no_transcript: &'static str,
    pub just_now: &'static str,
    pub neutral: &'static str,
    /// Abbreviated month names, January first
    pub months: [&'static str; 12],
}

const ENGLISH: Labels = Labels {
    new_call: "New Call",
    header: "Call Summary",
    reason_heading: "Reason for call",
    guest: "Guest",
    phone: "Phone",
    duration: "Duration",
    sentiment: "Sentiment",
    date: "Date",
    summary_heading: "AI Summary",
    details_heading: "Additional Details",
    transcript_heading: "Transcript",
    recording_link: "Listen to recording",
    call_id: "Call ID",
    unknown_guest: "Unknown Guest",
    general_inquiry: "General Inquiry",
    unknown_number: "Unknown number",
    no_summary: "No summary.",
    no_transcript: "No transcript available.",
    just_now: "Just now",
    neutral: "Neutral",
    months: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
};

const GERMAN: Labels = Labels {
    new_call: "Neuer Anruf",
    header: "Anruf Zusammenfassung",
    reason_heading: "Grund des Anrufs",
    guest: "Unterkunft",
    phone: "Telefon",
    duration: "Dauer",
    sentiment: "Stimmung",
    date: "Datum",
    summary_heading: "KI Zusammenfassung",
    details_heading: "Weitere Details",
    transcript_heading: "Transkript",
    recording_link: "Aufnahme anhören",
    call_id: "Anruf-ID",
    unknown_guest: "Unbekannter Gast",
    general_inquiry: "Allgemeine Anfrage",
    unknown_number: "Unbekannte Nummer",
    no_summary: "Keine Zusammenfassung.",
    no_transcript: "Kein Transkript verfügbar.",
    just_now: "Gerade eben",
    neutral: "Neutral",
    months: [
        "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.",
        "Dez.",
    ],
};

impl ReportLocale {
    /// Parse a language code such as "de", "de-DE" or "en_US".
    pub fn from_code(code: &str) -> Option<Self> {
        let lang = code
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match lang.as_str() {
            "en" => Some(ReportLocale::English),
            "de" => Some(ReportLocale::German),
            _ => None,
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            ReportLocale::English => &ENGLISH,
            ReportLocale::German => &GERMAN,
        }
    }

    /// Format month, day, hour and minute the way the locale writes them.
    pub fn format_date(self, month0: u32, day: u32, hour: u32, minute: u32) -> String {
        let month = self.labels().months[month0 as usize % 12];
        match self {
            ReportLocale::English => format!("{} {}, {:02}:{:02}", month, day, hour, minute),
            ReportLocale::German => format!("{}. {}, {:02}:{:02}", day, month, hour, minute),
        }
    }
}
