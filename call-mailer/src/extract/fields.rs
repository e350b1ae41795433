//! Logical field extraction and the leftover "additional details" rows.

use serde_json::Value;

use super::keys::find_key;
use crate::call::CustomData;

/// Result of looking up one logical field.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField<'a> {
    /// Display text, or the fallback when the field is missing or empty
    pub value: String,
    /// Key the value was found under, even if its value was empty
    pub key: Option<&'a str>,
}

/// Whether a custom value counts as present.
///
/// `null`, blank strings, `false` and numeric zero are treated as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text shown for a custom value. Strings are shown without JSON quoting.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Look up `logical_name` in `data`, falling back when absent or empty.
pub fn extract_field<'a>(data: &'a CustomData, logical_name: &str, fallback: &str) -> ExtractedField<'a> {
    match find_key(data, logical_name) {
        Some((key, value)) if is_truthy(value) => ExtractedField {
            value: display_value(value),
            key: Some(key),
        },
        Some((key, _)) => ExtractedField {
            value: fallback.to_string(),
            key: Some(key),
        },
        None => ExtractedField {
            value: fallback.to_string(),
            key: None,
        },
    }
}

/// Probe several logical names in order and return the first with a value.
///
/// When every match is empty, the first matched key is still reported so the
/// caller can keep it out of the details table.
pub fn extract_first<'a, S: AsRef<str>>(
    data: &'a CustomData,
    logical_names: &[S],
    fallback: &str,
) -> ExtractedField<'a> {
    let mut first_empty: Option<&'a str> = None;

    for name in logical_names {
        let field = extract_field(data, name.as_ref(), fallback);
        let found_key = field.key;
        match found_key {
            Some(_) if field.value != fallback => return field,
            Some(key) if first_empty.is_none() => first_empty = Some(key),
            _ => {}
        }
    }

    ExtractedField {
        value: fallback.to_string(),
        key: first_empty,
    }
}

/// Turn "appointment_time" into "Appointment Time".
pub fn humanize_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut previous_is_word = false;

    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_alphanumeric();
        if is_word && !previous_is_word {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        previous_is_word = is_word;
    }

    label
}

/// Every entry not in `used_keys`, as `(label, value)` pairs in payload order.
pub fn remaining_fields<'a>(
    data: &'a CustomData,
    used_keys: &'a [&'a str],
) -> impl Iterator<Item = (String, String)> + 'a {
    data.iter()
        .filter(move |(key, _)| !used_keys.contains(&key.as_str()))
        .map(|(key, value)| (humanize_label(key), display_value(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> CustomData {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_extract_field_found() {
        let d = data(json!({"Reason_Of_Call": "Billing"}));
        let field = extract_field(&d, "reasonofcall", "General Inquiry");
        assert_eq!(field.value, "Billing");
        assert_eq!(field.key, Some("Reason_Of_Call"));
    }

    #[test]
    fn test_extract_field_missing_uses_fallback() {
        let d = data(json!({"other": "x"}));
        let field = extract_field(&d, "reasonofcall", "General Inquiry");
        assert_eq!(field.value, "General Inquiry");
        assert_eq!(field.key, None);
    }

    #[test]
    fn test_extract_field_empty_value_keeps_key() {
        let d = data(json!({"guest_name": "  ", "reason": null}));

        let field = extract_field(&d, "guestname", "Unknown Guest");
        assert_eq!(field.value, "Unknown Guest");
        assert_eq!(field.key, Some("guest_name"));

        let field = extract_field(&d, "reason", "General Inquiry");
        assert_eq!(field.value, "General Inquiry");
        assert_eq!(field.key, Some("reason"));
    }

    #[test]
    fn test_extract_field_numbers() {
        let d = data(json!({"room": 12, "nights": 0}));
        assert_eq!(extract_field(&d, "room", "-").value, "12");
        assert_eq!(extract_field(&d, "nights", "-").value, "-");
    }

    #[test]
    fn test_extract_first_probes_in_order() {
        let d = data(json!({"AccommodationName": "Haus am See", "GuestName": "Schmidt"}));

        let field = extract_first(&d, &["guestname", "accommodationname"], "Unknown Guest");
        assert_eq!(field.value, "Schmidt");
        assert_eq!(field.key, Some("GuestName"));

        let field = extract_first(&d, &["accommodationname", "guestname"], "Unknown Guest");
        assert_eq!(field.value, "Haus am See");
    }

    #[test]
    fn test_extract_first_skips_empty_matches() {
        let d = data(json!({"guest_name": "", "accommodation_name": "Pension Sonne"}));

        let field = extract_first(&d, &["guestname", "accommodationname"], "Unknown Guest");
        assert_eq!(field.value, "Pension Sonne");
        assert_eq!(field.key, Some("accommodation_name"));

        let d = data(json!({"guest_name": ""}));
        let field = extract_first(&d, &["guestname", "accommodationname"], "Unknown Guest");
        assert_eq!(field.value, "Unknown Guest");
        assert_eq!(field.key, Some("guest_name"));
    }

    #[test]
    fn test_humanize_label() {
        assert_eq!(humanize_label("appointment_time"), "Appointment Time");
        assert_eq!(humanize_label("room number"), "Room Number");
        assert_eq!(humanize_label("GuestName"), "GuestName");
        assert_eq!(humanize_label("check-in_date"), "Check-In Date");
        assert_eq!(humanize_label(""), "");
    }

    #[test]
    fn test_remaining_fields_excludes_used_and_keeps_order() {
        let d = data(json!({"a": "1", "b": "2", "c": "3"}));
        let used = ["b"];

        let rows: Vec<(String, String)> = remaining_fields(&d, &used).collect();
        assert_eq!(
            rows,
            vec![
                ("A".to_string(), "1".to_string()),
                ("C".to_string(), "3".to_string())
            ]
        );
    }

    #[test]
    fn test_remaining_fields_display_values() {
        let d = data(json!({"late_checkout": true, "extra": null, "guests": 2}));
        let rows: Vec<(String, String)> = remaining_fields(&d, &[]).collect();
        assert_eq!(rows[0], ("Late Checkout".to_string(), "true".to_string()));
        assert_eq!(rows[1], ("Extra".to_string(), String::new()));
        assert_eq!(rows[2], ("Guests".to_string(), "2".to_string()));
    }
}
