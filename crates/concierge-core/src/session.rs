// ── Guest session ──
//
// Single source of truth for the current guest. Every update publishes
// a fresh `Arc<GuestInfo>` snapshot through a `watch` channel, so views
// can subscribe and readers never observe a half-applied change.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::guest::GuestInfo;
use crate::identity::IdentityProfile;

/// Which of the two widget screens is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Login,
    Chat,
}

impl Mode {
    pub fn of(guest: &GuestInfo, profile: &IdentityProfile) -> Self {
        if guest.is_identified(profile) {
            Self::Chat
        } else {
            Self::Login
        }
    }
}

/// Reactive holder for the current [`GuestInfo`].
#[derive(Debug)]
pub struct Session {
    guest: watch::Sender<Arc<GuestInfo>>,
}

impl Session {
    pub fn new(initial: GuestInfo) -> Self {
        let (guest, _) = watch::channel(Arc::new(initial));
        Self { guest }
    }

    /// The current guest.
    pub fn snapshot(&self) -> Arc<GuestInfo> {
        Arc::clone(&self.guest.borrow())
    }

    /// Apply `f` to a copy of the current guest and publish the result.
    ///
    /// Returns the snapshot that was published.
    pub fn update(&self, f: impl FnOnce(&mut GuestInfo)) -> Arc<GuestInfo> {
        let mut published = None;
        self.guest.send_modify(|current| {
            let mut next = GuestInfo::clone(current);
            f(&mut next);
            *current = Arc::new(next);
            published = Some(Arc::clone(current));
        });
        published.unwrap_or_else(|| self.snapshot())
    }

    /// Publish `guest` as the current record.
    pub fn replace(&self, guest: GuestInfo) -> Arc<GuestInfo> {
        let guest = Arc::new(guest);
        self.guest.send_replace(Arc::clone(&guest));
        guest
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<GuestInfo>> {
        self.guest.subscribe()
    }

    pub fn mode(&self, profile: &IdentityProfile) -> Mode {
        Mode::of(&self.snapshot(), profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_publishes_new_snapshot_and_keeps_old_ones_intact() {
        let session = Session::new(GuestInfo::new("CT-01", "it"));
        let before = session.snapshot();
        let mut rx = session.subscribe();

        let after = session.update(|g| g.arrival_date = Some("2025-12-10".into()));

        assert_eq!(before.arrival_date, None);
        assert_eq!(after.arrival_date.as_deref(), Some("2025-12-10"));
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(rx.borrow_and_update().arrival_date, after.arrival_date);
    }

    #[test]
    fn mode_follows_profile_requirements() {
        let session = Session::new(GuestInfo::new("CT-01", "it"));
        let profile = IdentityProfile::stay_range();
        assert_eq!(session.mode(&profile), Mode::Login);

        session.update(|g| {
            g.arrival_date = Some("2025-12-10".into());
            g.departure_date = Some("2025-12-13".into());
        });
        assert_eq!(session.mode(&profile), Mode::Chat);
        assert_eq!(Mode::Chat.to_string(), "chat");
    }
}
