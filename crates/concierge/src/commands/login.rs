//! One-shot identification.

use concierge_core::{GuestField, LoginForm};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (conn, view) = util::open(global, false)?;
    let widget = conn.widget;

    let mut form = LoginForm::new();
    form.set(GuestField::LastName, args.last_name);
    form.set(GuestField::FirstName, args.first_name);
    form.set(GuestField::ArrivalDate, args.arrival);
    form.set(GuestField::DepartureDate, args.departure);

    if util::stdin_is_terminal() && !global.output.is_structured() {
        let missing = form.missing(widget.profile());
        form = util::prompt_missing(form, missing.into_iter())?;
    }

    let guest = widget.login(&form).await?;
    view.flush();

    let welcome = widget.messages().welcome(&guest);
    let out = output::render_single(
        &global.output,
        guest.as_ref(),
        |_| output::bot(&welcome, output::should_color(&global.color)),
        |g| g.display_name().unwrap_or_default().to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
