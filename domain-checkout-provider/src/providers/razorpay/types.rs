//! Razorpay API wire types

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::OrderNotes;

/// `POST /orders` request body.
#[derive(Debug, Serialize)]
pub struct RazorpayOrderBody<'a> {
    pub amount: u64,
    pub currency: &'a str,
    pub receipt: &'a str,
    pub notes: &'a OrderNotes,
}

/// Order entity as returned by `POST /orders` and `GET /orders/{id}`.
#[derive(Debug, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: u64,
    #[serde(default)]
    pub amount_paid: u64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default, deserialize_with = "notes_from_object_or_array")]
    pub notes: OrderNotes,
    /// Unix timestamp (seconds).
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Error body: `{"error": {"code": "...", "description": "...", "field": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct RazorpayErrorEnvelope {
    pub error: RazorpayErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct RazorpayErrorBody {
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub field: Option<String>,
}

/// Razorpay returns `[]` instead of `{}` when an order has no notes.
/// Non-string values are rendered with their JSON text.
fn notes_from_object_or_array<'de, D>(deserializer: D) -> Result<OrderNotes, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNotes {
        Map(serde_json::Map<String, serde_json::Value>),
        List(#[allow(dead_code)] Vec<serde::de::IgnoredAny>),
        Null,
    }

    Ok(match RawNotes::deserialize(deserializer)? {
        RawNotes::Map(map) => map
            .into_iter()
            .map(|(k, v)| {
                let value = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, value)
            })
            .collect(),
        RawNotes::List(_) | RawNotes::Null => OrderNotes::new(),
    })
}
