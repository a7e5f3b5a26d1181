//! Inspect or reset the stored guest.

use std::path::PathBuf;

use serde::Serialize;

use concierge_core::{GuestInfo, Mode};

use crate::cli::{GlobalOpts, SessionArgs, SessionCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct SessionSummary {
    profile: String,
    mode: Mode,
    cookie_file: PathBuf,
    guest: GuestInfo,
}

fn detail(s: &SessionSummary) -> String {
    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    output::detail_lines(&[
        ("Profile", s.profile.clone()),
        ("Mode", s.mode.to_string()),
        ("Property", s.guest.property_id.clone()),
        ("Locale", s.guest.locale.clone()),
        ("Last name", show(&s.guest.last_name)),
        ("First name", show(&s.guest.first_name)),
        ("Arrival", show(&s.guest.arrival_date)),
        ("Departure", show(&s.guest.departure_date)),
        ("Cookie jar", s.cookie_file.display().to_string()),
    ])
}

pub fn handle(args: &SessionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (conn, _view) = util::open(global, false)?;
    let widget = conn.widget;

    match args.command {
        SessionCommand::Show => {
            let summary = SessionSummary {
                profile: conn.profile_name,
                mode: widget.mode(),
                cookie_file: conn.cookie_file,
                guest: widget.snapshot().as_ref().clone(),
            };
            let out = output::render_single(&global.output, &summary, detail, |s| {
                s.mode.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
        SessionCommand::Forget => {
            widget.forget()?;
            if !global.quiet {
                eprintln!("✓ Guest forgotten ({})", conn.cookie_file.display());
            }
            Ok(())
        }
    }
}
