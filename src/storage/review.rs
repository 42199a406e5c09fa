use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;

/// A single movie review as persisted in the collection file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    #[serde(deserialize_with = "loose_text")]
    pub movie_title: String,
    #[serde(deserialize_with = "loose_text")]
    pub director: String,
    #[serde(deserialize_with = "loose_text")]
    pub review_text: String,
    #[serde(serialize_with = "serialize_rating", deserialize_with = "loose_rating")]
    pub rating: f64,
    #[serde(default, deserialize_with = "loose_tags")]
    pub tags: Vec<String>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Review {
    /// Decode one stored record, coercing the loosely typed values older
    /// writers left behind (numeric titles, `null` text, mixed tag arrays).
    pub fn from_stored(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn has_title(&self, title: &str) -> bool {
        self.movie_title.to_lowercase() == title.to_lowercase()
    }
}

/// Current time as ISO-8601 UTC with millisecond precision
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Arrays keep their scalar elements as text, a non-empty string becomes a
/// one-element list, anything else is empty.
pub fn tags_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn loose_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(tags_from_value(&Value::deserialize(deserializer)?))
}

fn loose_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let rating = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    rating
        .filter(|r| r.is_finite())
        .ok_or_else(|| de::Error::custom(format!("invalid rating: {value}")))
}

// Whole ratings are written as integers (`7`, not `7.0`).
fn serialize_rating<S: Serializer>(rating: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if rating.fract() == 0.0 && rating.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*rating as i64)
    } else {
        serializer.serialize_f64(*rating)
    }
}
