// ── Guest identity profiles ──
//
// A profile names the fields that identify a reservation and how a
// stored cookie is merged onto the default guest record. Two presets
// exist: a stay range (arrival + departure) and surname + arrival.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One identifying field of a guest record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GuestField {
    LastName,
    FirstName,
    ArrivalDate,
    DepartureDate,
}

impl GuestField {
    pub const ALL: [GuestField; 4] = [
        GuestField::LastName,
        GuestField::FirstName,
        GuestField::ArrivalDate,
        GuestField::DepartureDate,
    ];

    /// Key used in the cookie JSON and in request bodies.
    pub fn key(self) -> &'static str {
        match self {
            Self::LastName => "last_name",
            Self::FirstName => "first_name",
            Self::ArrivalDate => "arrival_date",
            Self::DepartureDate => "departure_date",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(self, Self::ArrivalDate | Self::DepartureDate)
    }
}

/// How a restored cookie combines with the default guest record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MergePolicy {
    /// Each field present in the cookie overrides the default; absent
    /// fields keep their default.
    #[default]
    FieldByField,
    /// The cookie replaces the whole record. Missing `propertyId` and
    /// `locale` still fall back to the defaults.
    Replace,
}

/// Named identity presets, selectable from configuration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IdentityPreset {
    /// Arrival and departure dates identify the stay.
    #[default]
    StayRange,
    /// Last name and arrival date identify the stay.
    SurnameArrival,
}

impl IdentityPreset {
    pub fn profile(self) -> IdentityProfile {
        match self {
            Self::StayRange => IdentityProfile::stay_range(),
            Self::SurnameArrival => IdentityProfile::surname_arrival(),
        }
    }
}

/// Which fields the login form collects and which of them are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    /// Fields that must be non-empty for the guest to be in chat mode.
    pub required: Vec<GuestField>,
    /// Extra fields the login form offers but does not require.
    pub optional: Vec<GuestField>,
    pub merge: MergePolicy,
}

impl Default for IdentityProfile {
    fn default() -> Self {
        Self::stay_range()
    }
}

impl IdentityProfile {
    pub fn stay_range() -> Self {
        Self {
            required: vec![GuestField::ArrivalDate, GuestField::DepartureDate],
            optional: Vec::new(),
            merge: MergePolicy::FieldByField,
        }
    }

    pub fn surname_arrival() -> Self {
        Self {
            required: vec![GuestField::LastName, GuestField::ArrivalDate],
            optional: vec![GuestField::FirstName],
            merge: MergePolicy::Replace,
        }
    }

    #[must_use]
    pub fn with_merge(mut self, merge: MergePolicy) -> Self {
        self.merge = merge;
        self
    }

    /// Every field the login form shows, required ones first.
    pub fn form_fields(&self) -> impl Iterator<Item = GuestField> + '_ {
        self.required.iter().chain(self.optional.iter()).copied()
    }

    pub fn is_required(&self, field: GuestField) -> bool {
        self.required.contains(&field)
    }
}
