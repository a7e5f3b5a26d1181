//! Command dispatch: bridges CLI args -> widget flows -> output formatting.

pub mod ask;
pub mod chat;
pub mod config_cmd;
pub mod health;
pub mod login;
pub mod register;
pub mod session;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Chat => chat::handle(global).await,
        Command::Login(args) => login::handle(args, global).await,
        Command::Ask(args) => ask::handle(args, global).await,
        Command::Session(args) => session::handle(&args, global),
        Command::Register(args) => register::handle(args, global).await,
        Command::Health => health::handle(global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are not server commands".into(),
        )),
    }
}
