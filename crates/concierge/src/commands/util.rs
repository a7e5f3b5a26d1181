//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use dialoguer::Input;

use concierge_core::{GuestField, LoginForm, WidgetView};

use crate::cli::GlobalOpts;
use crate::config::{self, Connection};
use crate::error::CliError;
use crate::output;
use crate::view::{Presentation, TerminalView};

/// Connect a widget with a terminal view suited to the command.
pub fn open(
    global: &GlobalOpts,
    interactive: bool,
) -> Result<(Connection, Arc<TerminalView>), CliError> {
    let presentation = if interactive {
        Presentation::Interactive
    } else if global.quiet || global.output.is_structured() {
        Presentation::Silent
    } else {
        Presentation::OneShot
    };
    let view = Arc::new(TerminalView::new(
        presentation,
        output::should_color(&global.color),
    ));
    let conn = config::connect(global, Arc::clone(&view) as Arc<dyn WidgetView>)?;
    view.use_messages(conn.widget.messages());
    Ok((conn, view))
}

pub fn stdin_is_terminal() -> bool {
    io::stdin().is_terminal()
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_label(field: GuestField) -> &'static str {
    match field {
        GuestField::LastName => "Last name",
        GuestField::FirstName => "First name",
        GuestField::ArrivalDate => "Arrival date (YYYY-MM-DD)",
        GuestField::DepartureDate => "Departure date (YYYY-MM-DD)",
    }
}

/// Ask for every form field of `fields` that `form` does not already hold.
///
/// Blank answers are allowed; the login flow reports what is missing.
pub fn prompt_missing(
    mut form: LoginForm,
    fields: impl Iterator<Item = GuestField>,
) -> Result<LoginForm, CliError> {
    for field in fields {
        if form.value(field).is_some() {
            continue;
        }
        let value: String = Input::new()
            .with_prompt(prompt_label(field))
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_err)?;
        form.set(field, Some(value));
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_prompts_show_the_format() {
        assert!(prompt_label(GuestField::ArrivalDate).ends_with("(YYYY-MM-DD)"));
        assert!(prompt_label(GuestField::DepartureDate).ends_with("(YYYY-MM-DD)"));
        assert_eq!(prompt_label(GuestField::LastName), "Last name");
    }

    #[test]
    fn prompt_failures_are_validation_errors() {
        let err = prompt_err("not a terminal");
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "interactive"));
    }
}
