//! Config subcommand handlers.

use std::collections::HashMap;

use dialoguer::{Input, Select};
use serde::Serialize;
use tabled::Tabled;

use concierge_core::IdentityPreset;
use concierge_core::config::{DEFAULT_LOCALE, DEFAULT_PROPERTY_ID};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config as TOML-like text for display.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(ref pid) = p.property_id {
            let _ = writeln!(out, "property_id = \"{pid}\"");
        }
        if let Some(ref locale) = p.locale {
            let _ = writeln!(out, "locale = \"{locale}\"");
        }
        let _ = writeln!(out, "identity = \"{}\"", p.identity);
        if let Some(ref merge) = p.merge {
            let _ = writeln!(out, "merge = \"{merge}\"");
        }
        if let Some(days) = p.cookie_days {
            let _ = writeln!(out, "cookie_days = {days}");
        }
        if let Some(ref jar) = p.cookie_file {
            let _ = writeln!(out, "cookie_file = \"{}\"", jar.display());
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

#[derive(Debug, Serialize)]
struct ProfileEntry {
    name: String,
    default: bool,
    server: String,
    property_id: Option<String>,
    identity: String,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Property")]
    property: String,
    #[tabled(rename = "Identity")]
    identity: String,
}

fn profile_entries(cfg: &Config) -> Vec<ProfileEntry> {
    let default = cfg.default_profile.as_deref().unwrap_or("default");
    let mut entries: Vec<_> = cfg
        .profiles
        .iter()
        .map(|(name, p)| ProfileEntry {
            name: name.clone(),
            default: name == default,
            server: p.server.clone(),
            property_id: p.property_id.clone(),
            identity: p.identity.clone(),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => init(),

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: concierge config init");
                return Ok(());
            }
            let entries = profile_entries(&cfg);
            let out = output::render_list(
                &global.output,
                &entries,
                |e| ProfileRow {
                    marker: if e.default { "*" } else { "" },
                    name: e.name.clone(),
                    server: e.server.clone(),
                    property: e.property_id.clone().unwrap_or_else(|| "-".into()),
                    identity: e.identity.clone(),
                },
                |e| e.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("✨ Concierge configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Server URL
    let server: String = Input::new()
        .with_prompt("Concierge server URL")
        .interact_text()
        .map_err(prompt_err)?;
    if url::Url::parse(&server).is_err() {
        return Err(CliError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {server}"),
        });
    }

    // 3. Property
    let property_id: String = Input::new()
        .with_prompt("Property ID")
        .default(DEFAULT_PROPERTY_ID.into())
        .interact_text()
        .map_err(prompt_err)?;

    // 4. Locale
    let locales = &["it", "en"];
    let locale_idx = Select::new()
        .with_prompt("Guest language")
        .items(locales)
        .default(usize::from(DEFAULT_LOCALE == "en"))
        .interact()
        .map_err(prompt_err)?;

    // 5. Identity preset
    let identity_choices = &[
        "Arrival and departure dates",
        "Last name and arrival date",
    ];
    let identity = match Select::new()
        .with_prompt("How guests identify their reservation")
        .items(identity_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => IdentityPreset::StayRange,
        _ => IdentityPreset::SurnameArrival,
    };

    // 6. Build profile and config
    let profile = Profile {
        server,
        property_id: Some(property_id),
        locale: locales.get(locale_idx).map(|l| (*l).to_owned()),
        identity: identity.to_string(),
        ..Profile::default()
    };

    let mut profiles = HashMap::new();
    profiles.insert(profile_name.clone(), profile);

    let cfg = Config {
        default_profile: Some(profile_name.clone()),
        defaults: Defaults::default(),
        profiles,
    };

    // 7. Write config
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: concierge health");

    Ok(())
}
