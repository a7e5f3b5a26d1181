// ── Guest restoration ──
//
// Builds the starting guest record for a mounted widget:
// defaults, then the stored cookie (per the profile's merge policy),
// then the widget's property/locale overrides. A cookie that does not
// parse is logged, deleted, and ignored.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::WidgetConfig;
use crate::cookie::CookieStore;
use crate::guest::GuestInfo;
use crate::identity::{GuestField, MergePolicy};

const PROPERTY_KEY: &str = "propertyId";
const LOCALE_KEY: &str = "locale";

/// Why a stored guest cookie was rejected.
#[derive(Debug, Error)]
pub enum CookieParseError {
    #[error("cookie is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cookie JSON is not an object")]
    NotAnObject,

    #[error("cookie field `{key}` is not a string")]
    InvalidField { key: &'static str },
}

/// Decode a guest cookie and combine it with `defaults`.
///
/// Known keys must hold a string or `null`; other keys are ignored.
pub fn parse_guest_cookie(
    raw: &str,
    defaults: &GuestInfo,
    merge: MergePolicy,
) -> Result<GuestInfo, CookieParseError> {
    let Value::Object(map) = serde_json::from_str::<Value>(raw)? else {
        return Err(CookieParseError::NotAnObject);
    };

    let mut guest = match merge {
        MergePolicy::FieldByField => defaults.clone(),
        MergePolicy::Replace => GuestInfo::new(&defaults.property_id, &defaults.locale),
    };

    if let Some(property_id) = string_field(&map, PROPERTY_KEY)? {
        guest.property_id = property_id;
    }
    if let Some(locale) = string_field(&map, LOCALE_KEY)? {
        guest.locale = locale;
    }

    for field in GuestField::ALL {
        match map.get(field.key()) {
            None => {}
            Some(Value::Null) => guest.set_field(field, None),
            Some(Value::String(s)) => guest.set_field(field, Some(s.clone())),
            Some(_) => return Err(CookieParseError::InvalidField { key: field.key() }),
        }
    }

    Ok(guest)
}

/// `Some(value)` for a string, `None` for absent or `null`.
fn string_field(
    map: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, CookieParseError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(CookieParseError::InvalidField { key }),
    }
}

/// Resolve the guest a widget starts with.
pub fn restore_guest(config: &WidgetConfig, cookies: &dyn CookieStore) -> GuestInfo {
    let defaults = config.default_guest();
    let raw = cookies.get(&config.cookie.name);

    let mut guest = if raw.is_empty() {
        debug!(cookie = %config.cookie.name, "no stored guest");
        defaults
    } else {
        match parse_guest_cookie(&raw, &defaults, config.identity.merge) {
            Ok(guest) => {
                debug!(cookie = %config.cookie.name, "restored guest from cookie");
                guest
            }
            Err(e) => {
                warn!(cookie = %config.cookie.name, error = %e, "invalid guest cookie, discarding");
                if let Err(e) = cookies.delete(&config.cookie.name) {
                    warn!(error = %e, "failed to delete invalid guest cookie");
                }
                defaults
            }
        }
    };

    config.apply_overrides(&mut guest);
    guest
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cookie::MemoryCookieStore;
    use crate::identity::IdentityProfile;
    use pretty_assertions::assert_eq;
    use url::Url;

    fn defaults() -> GuestInfo {
        GuestInfo::new("CT-01", "it")
    }

    fn config() -> WidgetConfig {
        WidgetConfig::new(Url::parse("http://localhost:8000").unwrap())
    }

    #[test]
    fn field_by_field_keeps_defaults_for_absent_keys() {
        let guest = parse_guest_cookie(
            r#"{"arrival_date":"2025-12-10","departure_date":"2025-12-13"}"#,
            &defaults(),
            MergePolicy::FieldByField,
        )
        .unwrap();

        assert_eq!(guest.property_id, "CT-01");
        assert_eq!(guest.locale, "it");
        assert_eq!(guest.arrival_date.as_deref(), Some("2025-12-10"));
        assert_eq!(guest.departure_date.as_deref(), Some("2025-12-13"));
    }

    #[test]
    fn replace_drops_prior_identity_but_keeps_context_defaults() {
        let mut prior = defaults();
        prior.first_name = Some("Old".into());

        let guest = parse_guest_cookie(
            r#"{"last_name":"Rossi","arrival_date":"2025-11-03"}"#,
            &prior,
            MergePolicy::Replace,
        )
        .unwrap();

        assert_eq!(guest.property_id, "CT-01");
        assert_eq!(guest.first_name, None);
        assert_eq!(guest.last_name.as_deref(), Some("Rossi"));
    }

    #[test]
    fn null_context_fields_fall_back_to_defaults() {
        let guest = parse_guest_cookie(
            r#"{"propertyId":null,"locale":"en"}"#,
            &defaults(),
            MergePolicy::FieldByField,
        )
        .unwrap();
        assert_eq!(guest.property_id, "CT-01");
        assert_eq!(guest.locale, "en");
    }

    #[test]
    fn malformed_cookies_are_rejected() {
        for raw in ["not json", "[1,2]", r#"{"arrival_date":42}"#, r#"{"locale":true}"#] {
            assert!(
                parse_guest_cookie(raw, &defaults(), MergePolicy::FieldByField).is_err(),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn restore_round_trips_a_saved_guest() {
        let store = MemoryCookieStore::new();
        let saved = GuestInfo {
            arrival_date: Some("2025-12-10".into()),
            departure_date: Some("2025-12-13".into()),
            first_name: Some("Mario".into()),
            ..GuestInfo::new("LAGO-02", "en")
        };
        store
            .set("concierge_guest", &saved.to_cookie_value().unwrap(), 7)
            .unwrap();

        for merge in [MergePolicy::FieldByField, MergePolicy::Replace] {
            let mut config = config();
            config.identity = IdentityProfile::stay_range().with_merge(merge);
            assert_eq!(restore_guest(&config, &store), saved);
        }
    }

    #[test]
    fn restore_deletes_invalid_cookie() {
        let store = MemoryCookieStore::new();
        store.set("concierge_guest", "{broken", 7).unwrap();

        let guest = restore_guest(&config(), &store);

        assert_eq!(guest, defaults());
        assert_eq!(store.get("concierge_guest"), "");
    }

    #[test]
    fn overrides_apply_after_cookie() {
        let store = MemoryCookieStore::new();
        store
            .set("concierge_guest", r#"{"propertyId":"OLD","locale":"en"}"#, 7)
            .unwrap();

        let mut config = config();
        config.property_id = Some("NEW".into());

        let guest = restore_guest(&config, &store);
        assert_eq!(guest.property_id, "NEW");
        assert_eq!(guest.locale, "en");
    }
}
