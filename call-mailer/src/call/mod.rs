//! Inbound call payload types.
//!
//! These mirror the JSON the voice-AI platform posts to the webhook. Every
//! field except the event discriminator is optional so that partial payloads
//! still produce a report.

pub mod types;

pub use types::{CallAnalysis, CallEvent, CallRecord, CustomData, Direction, CALL_ANALYZED};
