//! Email subject line.

use super::render::KeyFields;
use crate::locale::Labels;

/// Whether `value` is a stand-in rather than real data.
fn is_placeholder(value: &str, labels: &Labels) -> bool {
    let value = value.trim();
    value.is_empty()
        || value.eq_ignore_ascii_case("unknown")
        || value == labels.unknown_guest
        || value == labels.general_inquiry
}

/// `"<New Call>: <guest or phone>[ - <reason>]"`.
pub fn build_subject(labels: &Labels, fields: &KeyFields<'_>, phone: &str) -> String {
    let guest = &fields.guest.value;
    let identity = if !is_placeholder(guest, labels) {
        guest.as_str()
    } else {
        phone
    };

    let mut subject = format!("{}: {}", labels.new_call, identity);

    let reason = &fields.reason.value;
    if !is_placeholder(reason, labels) {
        subject.push_str(" - ");
        subject.push_str(reason);
    }

    subject
}
