//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use concierge_config::ConfigError;
use concierge_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_IDENTIFIED: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the concierge server at {url}")]
    #[diagnostic(
        code(concierge::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Try: concierge health --server {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("The concierge server did not answer in time")]
    #[diagnostic(
        code(concierge::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout,

    // ── Guest identity ───────────────────────────────────────────────
    #[error("You are not identified yet")]
    #[diagnostic(
        code(concierge::not_identified),
        help("Run: concierge login (or start `concierge chat` in a terminal)")
    )]
    NotIdentified,

    #[error("{message}")]
    #[diagnostic(
        code(concierge::reservation_not_found),
        help(
            "Check the details match your booking confirmation.\n\
             New guests can ask the host to authorize them: concierge register --help"
        )
    )]
    ReservationNotFound { message: String },

    #[error("Missing guest details: {fields}")]
    #[diagnostic(
        code(concierge::missing_fields),
        help("Pass them as flags, e.g. concierge login --arrival 2025-12-10 --departure 2025-12-13")
    )]
    MissingFields { fields: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Server error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    #[diagnostic(code(concierge::api_error))]
    ApiError { message: String, status: Option<u16> },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(concierge::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(concierge::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: concierge config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No concierge server configured")]
    #[diagnostic(
        code(concierge::no_config),
        help(
            "Create a profile with: concierge config init\n\
             Or pass --server (CONCIERGE_SERVER).\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(concierge::config))]
    Config(Box<figment::Error>),

    // ── Storage ──────────────────────────────────────────────────────
    #[error("Cannot use cookie jar {path}: {reason}")]
    #[diagnostic(
        code(concierge::cookie_storage),
        help("Point --cookie-file at a writable location.")
    )]
    CookieStorage { path: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(concierge::internal))]
    Internal(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotIdentified => exit_code::NOT_IDENTIFIED,
            Self::ReservationNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::MissingFields { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout => CliError::Timeout,
            CoreError::NotIdentified => CliError::NotIdentified,
            CoreError::ReservationNotFound { message } => CliError::ReservationNotFound {
                message: message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Reservation not found".into()),
            },
            CoreError::MissingFields { fields } => CliError::MissingFields {
                fields: fields
                    .iter()
                    .map(|f| f.key().replace('_', "-"))
                    .collect::<Vec<_>>()
                    .join(", "),
            },
            CoreError::Api { message, status } => CliError::ApiError { message, status },
            CoreError::CookieStorage { path, reason } => CliError::CookieStorage {
                path: path.display().to_string(),
                reason,
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Serialization(e) => CliError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::GuestField;

    #[test]
    fn exit_codes_follow_failure_kind() {
        assert_eq!(CliError::from(CoreError::NotIdentified).exit_code(), 3);
        assert_eq!(
            CliError::from(CoreError::ReservationNotFound { message: None }).exit_code(),
            4
        );
        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), 8);
        assert_eq!(
            CliError::from(CoreError::ConnectionFailed {
                url: "http://x".into(),
                reason: "refused".into()
            })
            .exit_code(),
            7
        );
        assert_eq!(exit_code::SUCCESS, 0);
    }

    #[test]
    fn missing_fields_are_named_like_flags() {
        let err = CliError::from(CoreError::MissingFields {
            fields: vec![GuestField::ArrivalDate, GuestField::LastName],
        });
        assert_eq!(err.to_string(), "Missing guest details: arrival-date, last-name");
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
