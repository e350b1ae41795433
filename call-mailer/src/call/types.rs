//! Call event, call record and analysis types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The only event type that triggers a report.
pub const CALL_ANALYZED: &str = "call_analyzed";

/// Free-form analysis fields. Iteration follows the payload's key order.
pub type CustomData = Map<String, Value>;

/// Top-level webhook payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallEvent {
    /// Event discriminator, e.g. "call_started", "call_ended", "call_analyzed"
    #[serde(default, deserialize_with = "lenient_string")]
    pub event: Option<String>,
    /// The call this event refers to
    #[serde(default)]
    pub call: Option<CallRecord>,
}

impl CallEvent {
    /// Whether this event carries a finished call analysis.
    pub fn is_call_analyzed(&self) -> bool {
        self.event.as_deref() == Some(CALL_ANALYZED)
    }
}

/// Direction of a call from the platform's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
    #[serde(other)]
    Unknown,
}

/// One completed phone call.
///
/// Scalars are read leniently: a value of the wrong JSON type becomes `None`
/// (or is converted, for numbers sent as strings) instead of rejecting the
/// whole event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub call_id: Option<String>,
    /// Start of the call in epoch milliseconds
    #[serde(default, deserialize_with = "lenient_i64")]
    pub start_timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration_ms: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transcript: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recording_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub from_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_direction")]
    pub direction: Option<Direction>,
    #[serde(default, deserialize_with = "lenient_analysis")]
    pub call_analysis: Option<CallAnalysis>,
}

impl CallRecord {
    /// Phone number of the person on the other end of the line.
    ///
    /// Inbound calls come from the customer; for everything else the
    /// customer is the number that was dialled.
    pub fn customer_phone(&self) -> Option<&str> {
        let number = match self.direction {
            Some(Direction::Inbound) => self.from_number.as_deref(),
            _ => self.to_number.as_deref(),
        };
        number.filter(|n| !n.trim().is_empty())
    }

    /// Custom analysis fields, if the call was analysed at all.
    pub fn custom_data(&self) -> Option<&CustomData> {
        self.call_analysis
            .as_ref()
            .map(|analysis| &analysis.custom_analysis_data)
    }
}

/// AI-derived analysis of a call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallAnalysis {
    #[serde(default, deserialize_with = "lenient_string")]
    pub call_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_sentiment: Option<String>,
    #[serde(default, deserialize_with = "object_or_default")]
    pub custom_analysis_data: CustomData,
}

/// Anything but a JSON object reads as an empty map.
fn object_or_default<'de, D>(deserializer: D) -> Result<CustomData, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => CustomData::new(),
    })
}

/// Strings as-is, numbers and booleans in their JSON form, anything else `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// A JSON number or a numeric string, as a finite float.
fn number_from(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(exact) = value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    {
        return Ok(Some(exact));
    }
    Ok(number_from(&value)
        .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f.round() as i64))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(exact) = value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    {
        return Ok(Some(exact));
    }
    Ok(number_from(&value)
        .filter(|f| *f >= 0.0 && *f <= u64::MAX as f64)
        .map(|f| f.round() as u64))
}

fn lenient_direction<'de, D>(deserializer: D) -> Result<Option<Direction>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => serde_json::from_value(Value::String(s)).ok(),
        _ => Some(Direction::Unknown),
    })
}

fn lenient_analysis<'de, D>(deserializer: D) -> Result<Option<CallAnalysis>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}
