use thiserror::Error;

/// Top-level error type for the `concierge-api` crate.
///
/// Covers every failure mode of the guest API surface: transport,
/// the match-guest envelope, plain HTTP failures, and body decoding.
/// `concierge-core` maps these into user-facing outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Guest matching ──────────────────────────────────────────────
    /// The server did not confirm a reservation.
    ///
    /// Raised for a non-2xx status as well as for a 2xx body whose
    /// `status` is anything other than `"ok"`. `message` carries the
    /// server's `message` field when the body had one.
    #[error("Reservation not confirmed (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },

    // ── Generic HTTP ────────────────────────────────────────────────
    /// Non-2xx response from an endpoint without a status envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The guest flows never retry; this only drives log levels.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Rejected { status: 404, .. } | Self::Http { status: 404, .. } => true,
            Self::Rejected { code, .. } => code.as_deref() == Some("not_found"),
            _ => false,
        }
    }

    /// The server-supplied message, if the error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
