//! Field extraction from free-form custom analysis data.
//!
//! Integrations spell the same logical field in many ways ("ReasonOfCall",
//! "reason_of_call", "Reason of call"). Lookups therefore compare keys after
//! normalisation, and the first matching key in iteration order wins.
//!
//! ```text
//! custom data ──find_key()──▶ (actual key, value) ──extract_field()──▶ display text
//!             └─remaining_fields(used keys)──▶ (label, value) rows
//! ```

pub mod fields;
pub mod keys;

pub use fields::{
    display_value, extract_field, extract_first, humanize_label, is_truthy, remaining_fields,
    ExtractedField,
};
pub use keys::{find_key, normalize_key};
