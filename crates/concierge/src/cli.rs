//! Clap derive structures for the `concierge` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// concierge -- talk to your stay's virtual concierge from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "concierge",
    version,
    about = "Chat with a property's virtual concierge from the command line",
    long_about = "Identify your reservation once, then ask the concierge about \
        check-in, wifi, parking and anything else about your stay.\n\n\
        The guest identity is kept in a cookie jar between runs, so later \
        commands go straight to the chat.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "CONCIERGE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Concierge server URL (overrides profile)
    #[arg(long, env = "CONCIERGE_SERVER", global = true)]
    pub server: Option<String>,

    /// Property identifier (overrides profile)
    #[arg(long, env = "CONCIERGE_PROPERTY", global = true)]
    pub property: Option<String>,

    /// Guest locale, e.g. "it" or "en" (overrides profile)
    #[arg(long, env = "CONCIERGE_LOCALE", global = true)]
    pub locale: Option<String>,

    /// Which details identify a reservation
    #[arg(long, env = "CONCIERGE_IDENTITY", global = true)]
    pub identity: Option<IdentityArg>,

    /// Cookie jar file (overrides profile)
    #[arg(long, env = "CONCIERGE_COOKIE_FILE", global = true)]
    pub cookie_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CONCIERGE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CONCIERGE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CONCIERGE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text (scripting)
    Plain,
}

impl OutputFormat {
    /// JSON or YAML, meant for machines rather than people.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json | Self::JsonCompact | Self::Yaml)
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IdentityArg {
    /// Arrival and departure dates
    StayRange,
    /// Last name and arrival date
    SurnameArrival,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive concierge chat
    #[command(alias = "c")]
    Chat,

    /// Identify your reservation
    Login(LoginArgs),

    /// Ask a single question and print the answer
    Ask(AskArgs),

    /// Inspect or reset the stored guest session
    Session(SessionArgs),

    /// Register your stay so the host can authorize it
    Register(RegisterArgs),

    /// Check that the concierge server is up
    Health,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Guest commands ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Last name on the reservation
    #[arg(long)]
    pub last_name: Option<String>,

    /// First name on the reservation
    #[arg(long)]
    pub first_name: Option<String>,

    /// Arrival date (YYYY-MM-DD)
    #[arg(long, alias = "checkin")]
    pub arrival: Option<String>,

    /// Departure date (YYYY-MM-DD)
    #[arg(long, alias = "checkout")]
    pub departure: Option<String>,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// The question for the concierge
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Show the current guest and widget mode
    Show,

    /// Delete the stored guest cookie
    #[command(alias = "logout")]
    Forget,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Arrival date (YYYY-MM-DD)
    #[arg(long)]
    pub arrival: String,

    /// Last name
    #[arg(long)]
    pub last_name: String,

    /// First name
    #[arg(long)]
    pub first_name: String,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub departure: Option<String>,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,

    /// Contact phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Notes for the host
    #[arg(long)]
    pub notes: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
