use chrono::{DateTime, Utc};

/// Shown wherever a value is missing or blank.
pub const PLACEHOLDER: &str = "-";

pub fn value_or_dash(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

/// `2024-01-01 12:00`, or the placeholder when the timestamp is unknown.
pub fn format_time(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_date(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn bool_label(v: bool) -> &'static str {
    if v { "true" } else { "false" }
}

pub fn join_topics(topics: &[String]) -> String {
    value_or_dash(&topics.join(", "))
}
