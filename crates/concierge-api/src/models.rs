// Wire types for the concierge guest API.
//
// Field names follow the server's JSON exactly, including the camelCase
// `propertyId` the chat endpoint expects next to snake_case elsewhere.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ── Match guest ─────────────────────────────────────────────────────

/// Body of `POST /api/match-guest`.
///
/// Only the identifying fields the login form collected are sent;
/// absent fields are omitted rather than sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchGuestRequest {
    pub property_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

/// The `{status, message?, row_index?, data?}` envelope returned by
/// the match endpoint.
///
/// Only a body that is not a JSON object fails to decode. A field of
/// the wrong shape reads as absent, so an `"ok"` match is never turned
/// into a rejection by its extras.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MatchEnvelope {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_row_index")]
    pub row_index: Option<u64>,
    #[serde(default, deserialize_with = "lenient_record")]
    pub data: Option<ReservationRecord>,
}

/// A reservation row as returned in `data` by the match endpoint.
///
/// Only the guest-identifying columns are typed; everything else the
/// server sends (booking reference, codes, notes) is kept in `extra`.
/// Empty strings are normalized to `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReservationRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub guest_first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub guest_last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub checkin_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub checkout_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A confirmed reservation match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedGuest {
    /// Row of the reservation in the server's booking sheet.
    pub row_index: Option<u64>,
    /// Reservation data, when the server sent any.
    pub reservation: Option<ReservationRecord>,
}

// ── Chat ────────────────────────────────────────────────────────────

/// Body of `POST /api/chat`.
///
/// Guest context fields are always present; unknown values are sent as
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "propertyId")]
    pub property_id: String,
    pub locale: String,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
}

/// Reply from the chat endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub used_ai: Option<bool>,
}

impl ChatReply {
    /// The answer text, if the server produced a non-empty one.
    pub fn answer(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

// ── Registration ────────────────────────────────────────────────────

/// Body of `POST /api/guest/register`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterGuestRequest {
    pub arrival_date: String,
    pub last_name: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Result of a registration: whether the server created or updated the row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RegisteredGuest {
    pub status: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub notification: Option<String>,
}

// ── Health ──────────────────────────────────────────────────────────

/// Reply from `GET /api/health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub area: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Accept strings, numbers and booleans as text; map `null` and `""` to `None`.
///
/// Reservation rows come from a spreadsheet, so a date or name column
/// is not guaranteed to arrive as a JSON string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// A non-negative integer, or a string holding one.
fn lenient_row_index<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A reservation object; anything else (`[]`, `""`, `null`) is no data.
fn lenient_record<'de, D>(deserializer: D) -> Result<Option<ReservationRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(object @ Value::Object(_)) => serde_json::from_value(object).ok(),
        _ => None,
    })
}
