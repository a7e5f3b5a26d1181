//! `concierge-tui`: terminal chat widget for a property's virtual concierge.
//!
//! Built on [ratatui](https://ratatui.rs) around `concierge-core`'s
//! [`Widget`](concierge_core::Widget). The guest starts on the reservation
//! form unless the profile's cookie jar already identifies them, then talks
//! to the concierge on the chat screen.
//!
//! Logs are written to a file (default `/tmp/concierge-tui.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod terminal;
mod theme;
mod view;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use concierge_config::{Profile, config_path, cookie_file, load_config_or_default};
use concierge_core::{FileCookieStore, IdentityPreset, WidgetConfig};

use crate::app::App;

/// Terminal chat with a property's virtual concierge.
#[derive(Parser, Debug)]
#[command(name = "concierge-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short = 'p', long, env = "CONCIERGE_PROFILE")]
    profile: Option<String>,

    /// Concierge server URL (overrides the profile)
    #[arg(short = 's', long, env = "CONCIERGE_SERVER")]
    server: Option<String>,

    /// Property ID (overrides the cookie and profile)
    #[arg(long, env = "CONCIERGE_PROPERTY")]
    property: Option<String>,

    /// Guest locale, e.g. `it` or `en`
    #[arg(long, env = "CONCIERGE_LOCALE")]
    locale: Option<String>,

    /// Identity preset: `stay-range` or `surname-arrival`
    #[arg(long, env = "CONCIERGE_IDENTITY")]
    identity: Option<String>,

    /// Cookie jar path (overrides the profile)
    #[arg(long, env = "CONCIERGE_COOKIE_FILE")]
    cookie_file: Option<PathBuf>,

    /// Log file path (defaults to /tmp/concierge-tui.log)
    #[arg(long, default_value = "/tmp/concierge-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Never stdout/stderr, which would corrupt
/// the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("concierge_tui={log_level},concierge_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("concierge-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the widget config and cookie jar.
///
/// Priority: CLI flags > config profile. Without a profile, `--server`
/// is required.
fn build_widget_config(cli: &Cli) -> Result<(WidgetConfig, PathBuf)> {
    let cfg = load_config_or_default();
    let profile_name = cli
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if cli.profile.is_some() => bail!("profile '{profile_name}' not found in config"),
        None if cli.server.is_none() => bail!(
            "no concierge server configured; pass --server or run `concierge config init` ({})",
            config_path().display()
        ),
        None => Profile {
            identity: IdentityPreset::default().to_string(),
            ..Profile::default()
        },
    };

    if let Some(ref server) = cli.server {
        profile.server.clone_from(server);
    }
    if let Some(ref identity) = cli.identity {
        profile.identity.clone_from(identity);
    }

    let mut config = concierge_config::profile_to_widget_config(&profile, &cfg.defaults)?;
    if cli.property.is_some() {
        config.property_id.clone_from(&cli.property);
    }
    if cli.locale.is_some() {
        config.locale.clone_from(&cli.locale);
    }

    let jar = cli
        .cookie_file
        .clone()
        .unwrap_or_else(|| cookie_file(&profile, &profile_name));
    Ok((config, jar))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    terminal::install_hooks()?;

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let (config, jar) = build_widget_config(&cli)?;
    info!(
        server = %config.server,
        cookie_file = %jar.display(),
        "starting concierge-tui"
    );

    let cookies = Arc::new(FileCookieStore::open(jar)?);
    let mut app = App::new(config, cookies)?;
    app.run().await?;

    Ok(())
}
