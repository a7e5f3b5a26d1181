// ── Core error types ──
//
// User-facing errors from concierge-core. Front ends never see raw HTTP
// status codes or JSON parse failures; `From<concierge_api::Error>`
// folds transport errors into these variants.
//
// The guest flows report every failure through the view first. The
// error is also returned so a non-interactive caller can pick an exit
// code.

use std::path::PathBuf;

use thiserror::Error;

use crate::identity::GuestField;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach concierge server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Concierge server did not answer in time")]
    Timeout,

    // ── Guest identity ───────────────────────────────────────────────
    #[error("Missing guest details: {}", join_fields(fields))]
    MissingFields { fields: Vec<GuestField> },

    #[error("Reservation not found{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    ReservationNotFound { message: Option<String> },

    #[error("Guest is not identified; log in first")]
    NotIdentified,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Storage errors ───────────────────────────────────────────────
    #[error("Cookie storage error at {}: {reason}", path.display())]
    CookieStorage { path: PathBuf, reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the failure was reaching the server rather than its answer.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout)
    }
}

fn join_fields(fields: &[GuestField]) -> String {
    fields
        .iter()
        .map(|f| f.key())
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<concierge_api::Error> for CoreError {
    fn from(err: concierge_api::Error) -> Self {
        match err {
            concierge_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() || e.is_request() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            concierge_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            concierge_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            concierge_api::Error::Rejected { message, .. } => {
                CoreError::ReservationNotFound { message }
            }
            concierge_api::Error::Http { status, body } => CoreError::Api {
                message: body,
                status: Some(status),
            },
            concierge_api::Error::Deserialization { message, .. } => CoreError::Api {
                message: format!("unexpected response: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_match_becomes_reservation_not_found() {
        let err: CoreError = concierge_api::Error::Rejected {
            status: 200,
            code: Some("not_found".into()),
            message: Some("Nessuna prenotazione".into()),
        }
        .into();
        assert!(matches!(
            err,
            CoreError::ReservationNotFound { message: Some(ref m) } if m == "Nessuna prenotazione"
        ));
        assert!(!err.is_network());
    }

    #[test]
    fn missing_fields_lists_keys() {
        let err = CoreError::MissingFields {
            fields: vec![GuestField::ArrivalDate, GuestField::DepartureDate],
        };
        assert_eq!(
            err.to_string(),
            "Missing guest details: arrival_date, departure_date"
        );
    }
}
