// ── Runtime widget configuration ──
//
// These types describe *which* server to talk to and how the guest is
// identified. The CLI/TUI builds a `WidgetConfig` from the config file
// and hands it in; core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use concierge_api::{TlsMode, TransportConfig};
use url::Url;

use crate::guest::GuestInfo;
use crate::identity::IdentityProfile;

pub const DEFAULT_PROPERTY_ID: &str = "CT-01";
pub const DEFAULT_LOCALE: &str = "it";
pub const DEFAULT_COOKIE_NAME: &str = "concierge_guest";
pub const DEFAULT_COOKIE_DAYS: u32 = 7;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Name and lifetime of the guest cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub name: String,
    /// Days until the cookie expires after a successful login.
    pub days: u32,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.into(),
            days: DEFAULT_COOKIE_DAYS,
        }
    }
}

/// Configuration for one mounted widget.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Concierge server root (e.g. `https://concierge.example.com`).
    pub server: Url,
    /// Property override, applied after the cookie is restored.
    pub property_id: Option<String>,
    /// Locale override, applied after the cookie is restored.
    pub locale: Option<String>,
    /// Property used when neither the cookie nor an override sets one.
    pub default_property_id: String,
    /// Locale used when neither the cookie nor an override sets one.
    pub default_locale: String,
    pub identity: IdentityProfile,
    pub cookie: CookieSettings,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl WidgetConfig {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            property_id: None,
            locale: None,
            default_property_id: DEFAULT_PROPERTY_ID.into(),
            default_locale: DEFAULT_LOCALE.into(),
            identity: IdentityProfile::default(),
            cookie: CookieSettings::default(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// The guest record before any cookie is read.
    pub fn default_guest(&self) -> GuestInfo {
        GuestInfo::new(&self.default_property_id, &self.default_locale)
    }

    /// Apply the property and locale overrides to a guest record.
    ///
    /// Empty overrides are ignored, like an empty `data-*` attribute.
    pub fn apply_overrides(&self, guest: &mut GuestInfo) {
        if let Some(property_id) = self.property_id.as_deref().filter(|p| !p.is_empty()) {
            property_id.clone_into(&mut guest.property_id);
        }
        if let Some(locale) = self.locale.as_deref().filter(|l| !l.is_empty()) {
            locale.clone_into(&mut guest.locale);
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> WidgetConfig {
        WidgetConfig::new(Url::parse("http://localhost:8000").unwrap())
    }

    #[test]
    fn default_guest_uses_builtin_property_and_locale() {
        let guest = config().default_guest();
        assert_eq!(guest.property_id, "CT-01");
        assert_eq!(guest.locale, "it");
        assert_eq!(guest.arrival_date, None);
    }

    #[test]
    fn overrides_replace_only_non_empty_values() {
        let mut config = config();
        config.property_id = Some("LAGO-02".into());
        config.locale = Some(String::new());

        let mut guest = config.default_guest();
        guest.locale = "en".into();
        config.apply_overrides(&mut guest);

        assert_eq!(guest.property_id, "LAGO-02");
        assert_eq!(guest.locale, "en");
    }
}
