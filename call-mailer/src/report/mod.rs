//! Call report rendering.
//!
//! ```text
//! CallRecord + display phone → ReportRenderer → RenderedEmail { subject, html }
//! ```

pub mod format;
pub mod render;
pub mod subject;

pub use format::{format_call_date, format_duration, SentimentTone};
pub use render::{KeyFields, RenderedEmail, ReportRenderer};
pub use subject::build_subject;
