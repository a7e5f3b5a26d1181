//! Guest self-registration for stays the host has not matched yet.

use concierge_core::{CoreError, RegisterGuestRequest, RegisteredGuest};

use crate::cli::{GlobalOpts, RegisterArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(r: &RegisteredGuest) -> String {
    let note = r
        .notification
        .clone()
        .unwrap_or_else(|| "The host will review your stay.".into());
    output::detail_lines(&[("Status", r.status.clone()), ("Action", r.action.clone()), ("Note", note)])
}

pub async fn handle(args: RegisterArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (conn, _view) = util::open(global, false)?;
    let guest = conn.widget.snapshot();

    let request = RegisterGuestRequest {
        arrival_date: args.arrival,
        last_name: args.last_name,
        first_name: args.first_name,
        guest_email: args.email,
        property_id: Some(guest.property_id.clone()),
        locale: Some(guest.locale.clone()),
        phone: args.phone,
        checkout_date: args.departure,
        notes: args.notes,
    };

    let registered = conn
        .widget
        .client()
        .register_guest(&request)
        .await
        .map_err(|e| match CoreError::from(e) {
            // A refused registration is not a missing reservation.
            CoreError::ReservationNotFound { message } => CliError::ApiError {
                message: message.unwrap_or_else(|| "registration refused".into()),
                status: None,
            },
            other => other.into(),
        })?;

    let out = output::render_single(&global.output, &registered, detail, |r| {
        r.action.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
