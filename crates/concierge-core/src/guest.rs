// ── Guest record ──
//
// The identity the widget carries between sessions. Serialized as-is
// into the `concierge_guest` cookie, with `propertyId` in camelCase and
// unknown values written as `null`.

use serde::{Deserialize, Serialize};

use crate::identity::{GuestField, IdentityProfile};

/// Current guest identity and context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    #[serde(rename = "propertyId")]
    pub property_id: String,
    pub locale: String,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
}

impl GuestInfo {
    /// A record for the given property and locale with no identity set.
    pub fn new(property_id: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            locale: locale.into(),
            arrival_date: None,
            departure_date: None,
            last_name: None,
            first_name: None,
        }
    }

    pub fn field(&self, field: GuestField) -> Option<&str> {
        match field {
            GuestField::LastName => self.last_name.as_deref(),
            GuestField::FirstName => self.first_name.as_deref(),
            GuestField::ArrivalDate => self.arrival_date.as_deref(),
            GuestField::DepartureDate => self.departure_date.as_deref(),
        }
    }

    pub fn set_field(&mut self, field: GuestField, value: Option<String>) {
        let slot = match field {
            GuestField::LastName => &mut self.last_name,
            GuestField::FirstName => &mut self.first_name,
            GuestField::ArrivalDate => &mut self.arrival_date,
            GuestField::DepartureDate => &mut self.departure_date,
        };
        *slot = value;
    }

    /// Every required field of `profile` is present and non-empty.
    pub fn is_identified(&self, profile: &IdentityProfile) -> bool {
        profile
            .required
            .iter()
            .all(|f| self.field(*f).is_some_and(|v| !v.is_empty()))
    }

    /// The name used to greet the guest: first name, else last name.
    pub fn display_name(&self) -> Option<&str> {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|n| !n.is_empty())
    }

    /// JSON text stored in the guest cookie.
    pub fn to_cookie_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
