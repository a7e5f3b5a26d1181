//! Shared configuration for the concierge CLI and TUI.
//!
//! TOML profiles, platform paths for the config file and cookie jars,
//! and translation to `concierge_core::WidgetConfig`. Both binaries
//! depend on this crate; the CLI layers its flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use concierge_core::cookie::MAX_COOKIE_DAYS;
use concierge_core::{CookieSettings, IdentityPreset, MergePolicy, TlsVerification, WidgetConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name.to_owned(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named concierge server profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Server root URL (e.g., "https://concierge.example.com").
    pub server: String,

    /// Property the widget is mounted for.
    pub property_id: Option<String>,

    /// Locale override ("it", "en").
    pub locale: Option<String>,

    /// Identity preset: "stay-range" or "surname-arrival".
    #[serde(default = "default_identity")]
    pub identity: String,

    /// Override the preset's cookie merge policy: "field-by-field" or "replace".
    pub merge: Option<String>,

    /// Cookie lifetime in days after a successful login.
    pub cookie_days: Option<u32>,

    /// Cookie jar path. Defaults to `<data dir>/<profile>.cookies`.
    pub cookie_file: Option<PathBuf>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

fn default_identity() -> String {
    IdentityPreset::default().to_string()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "concierge", "concierge")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding cookie jars and logs.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("concierge");
    p
}

/// Cookie jar for a profile: its `cookie_file`, else `<data dir>/<name>.cookies`.
pub fn cookie_file(profile: &Profile, profile_name: &str) -> PathBuf {
    profile
        .cookie_file
        .clone()
        .unwrap_or_else(|| data_dir().join(format!("{profile_name}.cookies")))
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still layering `CONCIERGE_` env vars on top.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CONCIERGE_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse a kebab-case enum value, naming the field on failure.
pub fn parse_choice<T: FromStr>(field: &str, value: &str, expected: &str) -> Result<T, ConfigError> {
    T::from_str(value).map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("expected {expected}, got '{value}'"),
    })
}

/// Build a `WidgetConfig` from a profile. No CLI flag overrides.
pub fn profile_to_widget_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<WidgetConfig, ConfigError> {
    let server: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let preset: IdentityPreset = parse_choice(
        "identity",
        &profile.identity,
        "'stay-range' or 'surname-arrival'",
    )?;
    let mut identity = preset.profile();
    if let Some(ref merge) = profile.merge {
        let merge: MergePolicy =
            parse_choice("merge", merge, "'field-by-field' or 'replace'")?;
        identity = identity.with_merge(merge);
    }

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut cookie = CookieSettings::default();
    if let Some(days) = profile.cookie_days {
        if !(1..=MAX_COOKIE_DAYS).contains(&days) {
            return Err(ConfigError::Validation {
                field: "cookie_days".into(),
                reason: format!("expected 1..={MAX_COOKIE_DAYS}, got {days}"),
            });
        }
        cookie.days = days;
    }

    let mut config = WidgetConfig::new(server);
    config.property_id.clone_from(&profile.property_id);
    config.locale.clone_from(&profile.locale);
    config.identity = identity;
    config.cookie = cookie;
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use concierge_core::IdentityProfile;
    use pretty_assertions::assert_eq;

    fn profile() -> Profile {
        Profile {
            server: "https://concierge.example.com".into(),
            identity: default_identity(),
            ..Profile::default()
        }
    }

    #[test]
    fn minimal_profile_uses_widget_defaults() {
        let config = profile_to_widget_config(&profile(), &Defaults::default()).unwrap();

        assert_eq!(config.server.as_str(), "https://concierge.example.com/");
        assert_eq!(config.identity, IdentityProfile::stay_range());
        assert_eq!(config.cookie, CookieSettings::default());
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.default_guest().property_id, "CT-01");
    }

    #[test]
    fn profile_fields_flow_into_widget_config() {
        let p = Profile {
            property_id: Some("LAGO-02".into()),
            locale: Some("en".into()),
            identity: "surname-arrival".into(),
            merge: Some("field-by-field".into()),
            cookie_days: Some(30),
            insecure: Some(true),
            timeout: Some(5),
            ..profile()
        };
        let config = profile_to_widget_config(&p, &Defaults::default()).unwrap();

        assert_eq!(config.property_id.as_deref(), Some("LAGO-02"));
        assert_eq!(config.locale.as_deref(), Some("en"));
        assert_eq!(
            config.identity,
            IdentityProfile::surname_arrival().with_merge(MergePolicy::FieldByField)
        );
        assert_eq!(config.cookie.days, 30);
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_values_name_the_field() {
        let bad_identity = Profile {
            identity: "passport".into(),
            ..profile()
        };
        let err = profile_to_widget_config(&bad_identity, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "identity"));

        let bad_url = Profile {
            server: "not a url".into(),
            ..profile()
        };
        let err = profile_to_widget_config(&bad_url, &Defaults::default()).unwrap_err();
        assert!(err.to_string().starts_with("invalid server"));
    }

    #[test]
    fn cookie_days_out_of_range_is_rejected() {
        for days in [0, MAX_COOKIE_DAYS + 1, 100_000_000] {
            let p = Profile {
                cookie_days: Some(days),
                ..profile()
            };
            let err = profile_to_widget_config(&p, &Defaults::default()).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "cookie_days"),
                "{days}: {err}"
            );
        }

        let longest = Profile {
            cookie_days: Some(MAX_COOKIE_DAYS),
            ..profile()
        };
        let config = profile_to_widget_config(&longest, &Defaults::default()).unwrap();
        assert_eq!(config.cookie.days, MAX_COOKIE_DAYS);
    }

    #[test]
    fn config_round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                cookie_file: Some(dir.path().join("jar.cookies")),
                ..profile()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (name, p) = loaded.profile(None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(p.server, "https://concierge.example.com");
        assert_eq!(p.identity, "stay-range");
        assert_eq!(cookie_file(p, &name), dir.path().join("jar.cookies"));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile(Some("staging")),
            Err(ConfigError::UnknownProfile { ref name }) if name == "staging"
        ));
    }

    #[test]
    fn default_cookie_file_is_per_profile() {
        let path = cookie_file(&profile(), "staging");
        assert!(path.ends_with("staging.cookies"));
    }
}
