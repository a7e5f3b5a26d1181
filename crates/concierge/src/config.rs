//! CLI configuration, a thin wrapper around `concierge_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--server, --property, etc.).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use concierge_core::{
    FileCookieStore, IdentityPreset, TlsVerification, Widget, WidgetConfig, WidgetView,
};

use crate::cli::{GlobalOpts, IdentityArg};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use concierge_config::{
    Config, Defaults, Profile, config_path, cookie_file, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Everything a command needs to build a widget.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub widget: WidgetConfig,
    pub cookie_file: PathBuf,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Resolve the widget configuration from the config file, the active
/// profile and CLI overrides.
///
/// Without a matching profile the widget is built from flags alone,
/// which requires `--server`. An explicit `--profile` that does not
/// exist is always an error.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => {
            let server = global.server.clone().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            Profile {
                server,
                identity: IdentityPreset::default().to_string(),
                ..Profile::default()
            }
        }
    };

    let widget = resolve_profile(&profile, &cfg.defaults, global)?;
    let cookie_file = global
        .cookie_file
        .clone()
        .unwrap_or_else(|| cookie_file(&profile, &profile_name));

    Ok(Resolved {
        profile_name,
        widget,
        cookie_file,
    })
}

/// Translate a `Profile` + global flags into a `WidgetConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<WidgetConfig, CliError> {
    let mut profile = profile.clone();

    // 1. Server URL (flag > env > profile)
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }

    // 2. Identity preset
    if let Some(identity) = global.identity {
        profile.identity = preset_of(identity).to_string();
    }

    let mut config = concierge_config::profile_to_widget_config(&profile, defaults)?;

    // 3. Widget attributes
    if let Some(ref property) = global.property {
        config.property_id = Some(property.clone());
    }
    if let Some(ref locale) = global.locale {
        config.locale = Some(locale.clone());
    }

    // 4. TLS and timeout
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }

    Ok(config)
}

fn preset_of(arg: IdentityArg) -> IdentityPreset {
    match arg {
        IdentityArg::StayRange => IdentityPreset::StayRange,
        IdentityArg::SurnameArrival => IdentityPreset::SurnameArrival,
    }
}

/// A widget bound to the active profile's cookie jar.
pub struct Connection {
    pub widget: Widget,
    pub profile_name: String,
    pub cookie_file: PathBuf,
}

/// Resolve config, open the profile's cookie jar and build the widget.
pub fn connect(global: &GlobalOpts, view: Arc<dyn WidgetView>) -> Result<Connection, CliError> {
    let Resolved {
        profile_name,
        widget,
        cookie_file,
    } = resolve(global)?;
    tracing::debug!(
        profile = %profile_name,
        server = %widget.server,
        cookie_file = %cookie_file.display(),
        "resolved widget config"
    );
    let cookies = Arc::new(FileCookieStore::open(cookie_file.clone())?);
    Ok(Connection {
        widget: Widget::connect(widget, cookies, view)?,
        profile_name,
        cookie_file,
    })
}
