// ── Login flow ──
//
// Validate the form, ask the server to match a reservation, then fold
// the reservation into the session, persist it, and switch the view to
// chat with a welcome message.

use std::sync::Arc;

use concierge_api::{MatchGuestRequest, MatchedGuest};
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::guest::GuestInfo;
use crate::identity::GuestField;
use crate::messages::Messages;
use crate::view::{Author, LoginForm};
use crate::widget::Widget;

impl Widget {
    /// Identify the guest from the login form.
    ///
    /// Every outcome is shown through the view. On failure the session
    /// and cookie are left untouched and the error is returned as well.
    pub async fn login(&self, form: &LoginForm) -> Result<Arc<GuestInfo>, CoreError> {
        let inner = self.inner();
        let current = self.snapshot();
        let messages = Messages::for_locale(&current.locale);

        let missing = form.missing(self.profile());
        if !missing.is_empty() {
            inner.view.alert(&messages.missing_fields(&missing));
            return Err(CoreError::MissingFields { fields: missing });
        }

        let request = self.match_request(&current.property_id, form);
        let matched = match inner.client.match_guest(&request).await {
            Ok(matched) => matched,
            Err(e @ concierge_api::Error::Rejected { .. }) => {
                warn!(error = %e, "reservation not matched");
                let text = e
                    .server_message()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(messages.reservation_not_found);
                inner.view.alert(text);
                return Err(e.into());
            }
            Err(e) => {
                error!(error = %e, "match-guest request failed");
                inner.view.alert(messages.connection_error);
                return Err(e.into());
            }
        };

        let guest = inner
            .session
            .update(|guest| self.apply_match(guest, form, &matched));
        self.persist(&guest);

        inner.view.show_chat();
        inner
            .view
            .append_message(Author::Bot, &Messages::for_locale(&guest.locale).welcome(&guest));
        info!(row = ?matched.row_index, property_id = %guest.property_id, "guest identified");
        Ok(guest)
    }

    fn match_request(&self, property_id: &str, form: &LoginForm) -> MatchGuestRequest {
        let mut request = MatchGuestRequest {
            property_id: property_id.to_owned(),
            ..MatchGuestRequest::default()
        };
        for field in self.profile().form_fields() {
            let value = form.value(field).map(str::to_owned);
            match field {
                GuestField::LastName => request.last_name = value,
                GuestField::FirstName => request.first_name = value,
                GuestField::ArrivalDate => request.arrival_date = value,
                GuestField::DepartureDate => request.departure_date = value,
            }
        }
        request
    }

    /// Submitted values first, then reservation data on top.
    ///
    /// Names come from the reservation, falling back to what was typed.
    /// Dates come from the reservation, falling back to the current value.
    fn apply_match(&self, guest: &mut GuestInfo, form: &LoginForm, matched: &MatchedGuest) {
        for field in self.profile().form_fields() {
            if let Some(value) = form.value(field) {
                guest.set_field(field, Some(value.to_owned()));
            }
        }

        let Some(record) = &matched.reservation else {
            return;
        };

        guest.last_name = record
            .guest_last_name
            .clone()
            .or_else(|| form.value(GuestField::LastName).map(str::to_owned));
        guest.first_name = record
            .guest_first_name
            .clone()
            .or_else(|| form.value(GuestField::FirstName).map(str::to_owned));
        if let Some(checkout) = &record.checkout_date {
            guest.departure_date = Some(checkout.clone());
        }
        if let Some(checkin) = &record.checkin_date {
            guest.arrival_date = Some(checkin.clone());
        }
    }
}
