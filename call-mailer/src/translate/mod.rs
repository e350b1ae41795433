//! Best-effort translation of a call's analysis text.
//!
//! Translation is an enrichment step: each field is translated independently
//! and concurrently, and any field whose translation fails keeps its
//! original text. The caller always gets a complete call record back.

pub mod google;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

use crate::call::CallRecord;
use crate::error::TranslateError;

pub use google::GoogleTranslator;

/// Translates a single piece of text.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError>;
}

/// Which part of the call a translation belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Summary,
    Sentiment,
    Custom(String),
}

impl Slot {
    fn name(&self) -> &str {
        match self {
            Slot::Summary => "call_summary",
            Slot::Sentiment => "user_sentiment",
            Slot::Custom(key) => key,
        }
    }
}

/// Return a translated copy of `call`; the input is left untouched.
///
/// Translates the summary, the sentiment and every string value in the
/// custom analysis data. All requests run concurrently and are joined before
/// returning.
pub async fn translate_call(
    translator: &dyn Translator,
    call: &CallRecord,
    target_language: &str,
) -> CallRecord {
    let mut translated = call.clone();

    let Some(analysis) = call.call_analysis.as_ref() else {
        return translated;
    };

    let mut jobs: Vec<(Slot, &str)> = Vec::new();
    if let Some(summary) = analysis.call_summary.as_deref() {
        jobs.push((Slot::Summary, summary));
    }
    if let Some(sentiment) = analysis.user_sentiment.as_deref() {
        jobs.push((Slot::Sentiment, sentiment));
    }
    for (key, value) in &analysis.custom_analysis_data {
        if let Some(text) = value.as_str() {
            jobs.push((Slot::Custom(key.clone()), text));
        }
    }
    jobs.retain(|(_, text)| !text.trim().is_empty());

    if jobs.is_empty() {
        return translated;
    }

    let requested = jobs.len();
    let results = join_all(jobs.into_iter().map(|(slot, text)| async move {
        let result = translator.translate(text, target_language).await;
        (slot, result)
    }))
    .await;

    let Some(target) = translated.call_analysis.as_mut() else {
        return translated;
    };

    let mut failed = 0usize;
    for (slot, result) in results {
        match result {
            Ok(text) => match &slot {
                Slot::Summary => target.call_summary = Some(text),
                Slot::Sentiment => target.user_sentiment = Some(text),
                Slot::Custom(key) => {
                    if let Some(value) = target.custom_analysis_data.get_mut(key) {
                        *value = serde_json::Value::String(text);
                    }
                }
            },
            Err(e) => {
                failed += 1;
                warn!(
                    call_id = ?call.call_id,
                    field = slot.name(),
                    error = %e,
                    "translation_field_failed"
                );
            }
        }
    }

    info!(
        call_id = ?call.call_id,
        target_language = target_language,
        fields_requested = requested,
        fields_failed = failed,
        "translation_complete"
    );

    translated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::CallAnalysis;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Uppercases text, failing for anything containing "FAIL".
    struct ShoutingTranslator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for ShoutingTranslator {
        async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("FAIL") {
                return Err(TranslateError::Api {
                    status: 400,
                    message: "unsupported text".into(),
                });
            }
            Ok(format!("[{}] {}", target_language, text.to_uppercase()))
        }
    }

    /// Completes only once `parties` requests are waiting at the same time.
    struct RendezvousTranslator {
        barrier: tokio::sync::Barrier,
    }

    #[async_trait]
    impl Translator for RendezvousTranslator {
        async fn translate(&self, text: &str, _target_language: &str) -> Result<String, TranslateError> {
            self.barrier.wait().await;
            Ok(text.to_uppercase())
        }
    }

    fn translator() -> ShoutingTranslator {
        ShoutingTranslator {
            calls: AtomicUsize::new(0),
        }
    }

    fn call(custom: Value) -> CallRecord {
        let custom_analysis_data = match custom {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        };
        CallRecord {
            call_id: Some("call_1".to_string()),
            transcript: Some("hello".to_string()),
            call_analysis: Some(CallAnalysis {
                call_summary: Some("guest asked about breakfast".to_string()),
                user_sentiment: Some("positive".to_string()),
                custom_analysis_data,
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_translate_call_translates_all_text_fields() {
        let t = translator();
        let original = call(json!({"reason": "breakfast", "guests": 2, "late": true}));

        let translated = translate_call(&t, &original, "de").await;
        let analysis = translated.call_analysis.unwrap();

        assert_eq!(analysis.call_summary.as_deref(), Some("[de] GUEST ASKED ABOUT BREAKFAST"));
        assert_eq!(analysis.user_sentiment.as_deref(), Some("[de] POSITIVE"));
        assert_eq!(analysis.custom_analysis_data["reason"], json!("[de] BREAKFAST"));
        assert_eq!(analysis.custom_analysis_data["guests"], json!(2));
        assert_eq!(analysis.custom_analysis_data["late"], json!(true));
        assert_eq!(t.calls.load(Ordering::SeqCst), 3);

        // transcript is not part of the translated fields
        assert_eq!(translated.transcript.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_translate_call_does_not_mutate_input() {
        let t = translator();
        let original = call(json!({"reason": "breakfast"}));

        let _ = translate_call(&t, &original, "de").await;

        let analysis = original.call_analysis.as_ref().unwrap();
        assert_eq!(analysis.call_summary.as_deref(), Some("guest asked about breakfast"));
        assert_eq!(analysis.custom_analysis_data["reason"], json!("breakfast"));
    }

    #[tokio::test]
    async fn test_translate_call_keeps_original_on_failure() {
        let t = translator();
        let original = call(json!({"reason": "FAIL here", "room": "suite"}));

        let translated = translate_call(&t, &original, "fr").await;
        let analysis = translated.call_analysis.unwrap();

        assert_eq!(analysis.custom_analysis_data["reason"], json!("FAIL here"));
        assert_eq!(analysis.custom_analysis_data["room"], json!("[fr] SUITE"));
        assert_eq!(analysis.user_sentiment.as_deref(), Some("[fr] POSITIVE"));
    }

    #[tokio::test]
    async fn test_translate_call_runs_requests_concurrently() {
        // summary, sentiment and two custom strings
        let t = RendezvousTranslator {
            barrier: tokio::sync::Barrier::new(4),
        };
        let original = call(json!({"reason": "breakfast", "room": "suite"}));

        let translated = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            translate_call(&t, &original, "de"),
        )
        .await
        .expect("translations did not run concurrently");

        let analysis = translated.call_analysis.unwrap();
        assert_eq!(analysis.call_summary.as_deref(), Some("GUEST ASKED ABOUT BREAKFAST"));
        assert_eq!(analysis.custom_analysis_data["room"], json!("SUITE"));
    }

    #[tokio::test]
    async fn test_translate_call_without_analysis() {
        let t = translator();
        let original = CallRecord {
            call_id: Some("call_2".to_string()),
            ..Default::default()
        };

        let translated = translate_call(&t, &original, "de").await;
        assert!(translated.call_analysis.is_none());
        assert_eq!(t.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_translate_call_skips_blank_text() {
        let t = translator();
        let mut original = call(json!({"note": "  "}));
        if let Some(analysis) = original.call_analysis.as_mut() {
            analysis.call_summary = Some(String::new());
        }

        let translated = translate_call(&t, &original, "de").await;
        let analysis = translated.call_analysis.unwrap();

        assert_eq!(analysis.call_summary.as_deref(), Some(""));
        assert_eq!(analysis.custom_analysis_data["note"], json!("  "));
        assert_eq!(t.calls.load(Ordering::SeqCst), 1);
    }
}
