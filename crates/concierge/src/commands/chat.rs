//! Interactive chat: identify if needed, then relay lines until `/quit`.

use std::io::{self, Write};

use tracing::{debug, warn};

use concierge_core::{CoreError, LoginForm, Mode, Widget};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;
use crate::view::TerminalView;

use super::util;

const QUIT: &[&str] = &["/quit", "/exit"];

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (conn, view) = util::open(global, true)?;
    let widget = conn.widget;
    let color = output::should_color(&global.color);

    if widget.mount() == Mode::Login {
        identify(&widget, &view).await?;
    }
    view.flush();

    while let Some(line) = read_line(color)? {
        let line = line.trim();
        if QUIT.contains(&line) {
            break;
        }
        // Failures are already on screen as a bot bubble.
        if let Err(err) = widget.send(line).await {
            warn!(error = %err, "chat message failed");
        }
        view.flush();
    }
    Ok(())
}

/// Prompt for the identity fields until the server matches a reservation.
async fn identify(widget: &Widget, view: &TerminalView) -> Result<(), CliError> {
    if !util::stdin_is_terminal() {
        return Err(CliError::NotIdentified);
    }
    loop {
        let form = util::prompt_missing(LoginForm::new(), widget.profile().form_fields())?;
        let result = widget.login(&form).await;
        view.flush();
        match result {
            Ok(guest) => {
                debug!(name = ?guest.display_name(), "identified");
                return Ok(());
            }
            Err(CoreError::MissingFields { .. } | CoreError::ReservationNotFound { .. }) => {}
            Err(err) => return Err(err.into()),
        }
    }
}

/// Next line from stdin, `None` at end of input.
fn read_line(color: bool) -> Result<Option<String>, CliError> {
    if util::stdin_is_terminal() {
        eprint!("{} ", output::dim("›", color));
        let _ = io::stderr().flush();
    }
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf))
}
