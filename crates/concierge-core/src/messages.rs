// ── Guest-facing text ──
//
// Fixed strings the widget shows, per locale. Italian is the default
// and the fallback for any locale without its own catalog.

use crate::guest::GuestInfo;
use crate::identity::GuestField;

/// Text catalog for one locale.
#[derive(Debug)]
pub struct Messages {
    pub loading: &'static str,
    pub no_answer: &'static str,
    pub chat_network_error: &'static str,
    pub connection_error: &'static str,
    pub reservation_not_found: &'static str,
    greeting_named: &'static str,
    greeting_anonymous: &'static str,
    found_range: &'static str,
    found_single: &'static str,
    enter: &'static str,
    and: &'static str,
    labels: [&'static str; 4],
}

pub static ITALIAN: Messages = Messages {
    loading: "Sto controllando le informazioni…",
    no_answer: "Non ho trovato una risposta nei dati disponibili. Contatto l’host.",
    chat_network_error: "C'è stato un problema di rete con il concierge.",
    connection_error: "Errore di connessione al server.",
    reservation_not_found: "Prenotazione non trovata.",
    greeting_named: "Ciao {name}!",
    greeting_anonymous: "Ottimo!",
    found_range: "Ho trovato la tua prenotazione dal {from} al {to}.",
    found_single: "Ho trovato la tua prenotazione del {from}.",
    enter: "Inserisci",
    and: "e",
    labels: [
        "il cognome",
        "il nome",
        "la data di arrivo",
        "la data di partenza",
    ],
};

pub static ENGLISH: Messages = Messages {
    loading: "Checking the information…",
    no_answer: "I couldn't find an answer in the available data. Contact the host.",
    chat_network_error: "There was a network problem reaching the concierge.",
    connection_error: "Server connection error.",
    reservation_not_found: "Reservation not found.",
    greeting_named: "Hi {name}!",
    greeting_anonymous: "Great!",
    found_range: "I found your reservation from {from} to {to}.",
    found_single: "I found your reservation for {from}.",
    enter: "Please enter",
    and: "and",
    labels: [
        "your last name",
        "your first name",
        "the arrival date",
        "the departure date",
    ],
};

impl Messages {
    /// Catalog for a locale tag such as `it`, `en`, or `en-GB`.
    pub fn for_locale(locale: &str) -> &'static Messages {
        let lang = locale.split(['-', '_']).next().unwrap_or_default();
        if lang.eq_ignore_ascii_case("en") {
            &ENGLISH
        } else {
            &ITALIAN
        }
    }

    pub fn label(&self, field: GuestField) -> &'static str {
        let idx = match field {
            GuestField::LastName => 0,
            GuestField::FirstName => 1,
            GuestField::ArrivalDate => 2,
            GuestField::DepartureDate => 3,
        };
        self.labels[idx]
    }

    /// The alert shown when required login fields are blank.
    pub fn missing_fields(&self, fields: &[GuestField]) -> String {
        let labels: Vec<&str> = fields.iter().map(|f| self.label(*f)).collect();
        let list = match labels.as_slice() {
            [] => String::new(),
            [only] => (*only).to_owned(),
            [init @ .., last] => format!("{} {} {last}", init.join(", "), self.and),
        };
        format!("{} {list}.", self.enter)
    }

    /// Welcome bubble after a successful login.
    pub fn welcome(&self, guest: &GuestInfo) -> String {
        let greeting = match guest.display_name() {
            Some(name) => self.greeting_named.replace("{name}", name),
            None => self.greeting_anonymous.to_owned(),
        };
        let from = guest.arrival_date.as_deref().unwrap_or_default();
        let found = match guest.departure_date.as_deref().filter(|d| !d.is_empty()) {
            Some(to) => self.found_range.replace("{from}", from).replace("{to}", to),
            None => self.found_single.replace("{from}", from),
        };
        format!("{greeting} {found}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest() -> GuestInfo {
        GuestInfo {
            arrival_date: Some("2025-12-10".into()),
            departure_date: Some("2025-12-13".into()),
            ..GuestInfo::new("CT-01", "it")
        }
    }

    #[test]
    fn welcome_with_name_and_range() {
        let mut g = guest();
        g.first_name = Some("Mario".into());
        g.last_name = Some("Rossi".into());
        assert_eq!(
            ITALIAN.welcome(&g),
            "Ciao Mario! Ho trovato la tua prenotazione dal 2025-12-10 al 2025-12-13."
        );
    }

    #[test]
    fn welcome_without_name_or_departure() {
        let mut g = guest();
        g.departure_date = None;
        assert_eq!(
            ITALIAN.welcome(&g),
            "Ottimo! Ho trovato la tua prenotazione del 2025-12-10."
        );
    }

    #[test]
    fn missing_fields_reads_naturally() {
        assert_eq!(
            ITALIAN.missing_fields(&[GuestField::ArrivalDate, GuestField::DepartureDate]),
            "Inserisci la data di arrivo e la data di partenza."
        );
        assert_eq!(
            ENGLISH.missing_fields(&[GuestField::LastName]),
            "Please enter your last name."
        );
    }

    #[test]
    fn unknown_locales_fall_back_to_italian() {
        assert!(std::ptr::eq(Messages::for_locale("en-GB"), &ENGLISH));
        assert!(std::ptr::eq(Messages::for_locale("de"), &ITALIAN));
        assert!(std::ptr::eq(Messages::for_locale(""), &ITALIAN));
    }
}
