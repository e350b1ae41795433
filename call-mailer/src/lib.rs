//! Callmail - call report mailer for a voice-AI phone agent.
//!
//! The platform posts a webhook after it has analysed a call. The server
//! acknowledges immediately and then, in a detached task, turns the call
//! into an HTML report and emails it to a fixed recipient.
//!
//! ## Architecture
//!
//! ```text
//! POST /webhook → 200 ack
//!                  └─ spawn → CallEvent → extract key fields → translate? → render → MailSender
//! ```

pub mod call;
pub mod config;
pub mod error;
pub mod extract;
pub mod locale;
pub mod mail;
pub mod processor;
pub mod report;
pub mod translate;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use call::{CallEvent, CallRecord};
pub use config::Config;
pub use error::{MailError, ProcessError, TranslateError};
pub use locale::ReportLocale;
pub use mail::{build_mailer, MailSender};
pub use processor::{CallProcessor, Outcome};
pub use report::{RenderedEmail, ReportRenderer};
pub use translate::{GoogleTranslator, Translator};
pub use web::{router, AppState};
