// ── View binding ──
//
// The operations a front end exposes to the guest flows. The flows
// decide *what* the guest sees; a view only decides *how*.

use crate::identity::{GuestField, IdentityProfile};

/// Handle to a message bubble a view has appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

/// Who a chat bubble belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Author {
    Bot,
    User,
}

/// Rendering surface for the widget.
///
/// Implementations must be cheap and non-blocking; flows call them from
/// async tasks.
pub trait WidgetView: Send + Sync {
    /// Show the identification form for `profile`'s fields.
    fn show_login(&self, profile: &IdentityProfile);

    /// Hide the form and show the conversation.
    fn show_chat(&self);

    fn append_message(&self, author: Author, text: &str) -> MessageId;

    /// Style an appended bubble as a pending request.
    fn mark_loading(&self, id: MessageId);

    fn remove_message(&self, id: MessageId);

    /// A blocking notice (the browser's `alert`).
    fn alert(&self, text: &str);

    /// Empty the chat input.
    fn clear_input(&self);
}

/// Values the guest typed into the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: GuestField, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    pub fn set(&mut self, field: GuestField, value: Option<String>) {
        let slot = match field {
            GuestField::LastName => &mut self.last_name,
            GuestField::FirstName => &mut self.first_name,
            GuestField::ArrivalDate => &mut self.arrival_date,
            GuestField::DepartureDate => &mut self.departure_date,
        };
        *slot = value;
    }

    /// The trimmed value of `field`, or `None` when blank.
    pub fn value(&self, field: GuestField) -> Option<&str> {
        let raw = match field {
            GuestField::LastName => self.last_name.as_deref(),
            GuestField::FirstName => self.first_name.as_deref(),
            GuestField::ArrivalDate => self.arrival_date.as_deref(),
            GuestField::DepartureDate => self.departure_date.as_deref(),
        };
        raw.map(str::trim).filter(|v| !v.is_empty())
    }

    /// Required fields of `profile` left blank, in profile order.
    pub fn missing(&self, profile: &IdentityProfile) -> Vec<GuestField> {
        profile
            .required
            .iter()
            .copied()
            .filter(|f| self.value(*f).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_values_count_as_missing() {
        let form = LoginForm::new()
            .with(GuestField::ArrivalDate, " 2025-12-10 ")
            .with(GuestField::DepartureDate, "   ");

        assert_eq!(form.value(GuestField::ArrivalDate), Some("2025-12-10"));
        assert_eq!(
            form.missing(&IdentityProfile::stay_range()),
            vec![GuestField::DepartureDate]
        );
        assert_eq!(
            form.missing(&IdentityProfile::surname_arrival()),
            vec![GuestField::LastName]
        );
    }
}
