// ── Widget facade ──
//
// One `Widget` per mounted front end. It owns the API client, the
// cookie store, the session and the view, and exposes the guest
// operations. Cheaply cloneable via `Arc<WidgetInner>` so UI tasks can
// share it.

use std::sync::Arc;

use concierge_api::ConciergeClient;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::WidgetConfig;
use crate::cookie::CookieStore;
use crate::error::CoreError;
use crate::guest::GuestInfo;
use crate::identity::IdentityProfile;
use crate::messages::Messages;
use crate::resolver::restore_guest;
use crate::session::{Mode, Session};
use crate::view::WidgetView;

/// The concierge chat widget.
#[derive(Clone)]
pub struct Widget {
    inner: Arc<WidgetInner>,
}

pub(crate) struct WidgetInner {
    pub(crate) config: WidgetConfig,
    pub(crate) client: ConciergeClient,
    pub(crate) cookies: Arc<dyn CookieStore>,
    pub(crate) view: Arc<dyn WidgetView>,
    pub(crate) session: Session,
}

impl Widget {
    /// Build a widget and restore the guest from the cookie store.
    ///
    /// Nothing is rendered until [`mount`](Self::mount).
    pub fn new(
        config: WidgetConfig,
        client: ConciergeClient,
        cookies: Arc<dyn CookieStore>,
        view: Arc<dyn WidgetView>,
    ) -> Self {
        let guest = restore_guest(&config, cookies.as_ref());
        debug!(
            property_id = %guest.property_id,
            locale = %guest.locale,
            identified = guest.is_identified(&config.identity),
            "widget created"
        );
        Self {
            inner: Arc::new(WidgetInner {
                session: Session::new(guest),
                config,
                client,
                cookies,
                view,
            }),
        }
    }

    /// Build the HTTP client from `config` and create the widget.
    pub fn connect(
        config: WidgetConfig,
        cookies: Arc<dyn CookieStore>,
        view: Arc<dyn WidgetView>,
    ) -> Result<Self, CoreError> {
        let client = ConciergeClient::new(config.server.clone(), &config.transport())?;
        Ok(Self::new(config, client, cookies, view))
    }

    /// Show the screen that matches the restored guest.
    pub fn mount(&self) -> Mode {
        let mode = self.mode();
        match mode {
            Mode::Chat => self.inner.view.show_chat(),
            Mode::Login => self.inner.view.show_login(self.profile()),
        }
        info!(%mode, "widget mounted");
        mode
    }

    /// Drop the stored guest and return to the login screen.
    pub fn forget(&self) -> Result<(), CoreError> {
        self.inner.cookies.delete(&self.inner.config.cookie.name)?;
        let mut guest = self.inner.config.default_guest();
        self.inner.config.apply_overrides(&mut guest);
        self.inner.session.replace(guest);
        self.inner.view.show_login(self.profile());
        info!("guest forgotten");
        Ok(())
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.inner.session.mode(self.profile())
    }

    pub fn snapshot(&self) -> Arc<GuestInfo> {
        self.inner.session.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<GuestInfo>> {
        self.inner.session.subscribe()
    }

    pub fn profile(&self) -> &IdentityProfile {
        &self.inner.config.identity
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ConciergeClient {
        &self.inner.client
    }

    /// Text catalog for the current guest's locale.
    pub fn messages(&self) -> &'static Messages {
        Messages::for_locale(&self.snapshot().locale)
    }

    // ── Internals shared by the flows ───────────────────────────────

    pub(crate) fn inner(&self) -> &WidgetInner {
        &self.inner
    }

    /// Write `guest` to the cookie store. Failures are logged, not raised:
    /// the guest stays identified for this session either way.
    pub(crate) fn persist(&self, guest: &GuestInfo) {
        let cookie = &self.inner.config.cookie;
        let stored = guest
            .to_cookie_value()
            .map_err(|e| CoreError::Internal(e.to_string()))
            .and_then(|value| self.inner.cookies.set(&cookie.name, &value, cookie.days));
        if let Err(e) = stored {
            warn!(error = %e, cookie = %cookie.name, "failed to store guest cookie");
        }
    }
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("server", &self.inner.config.server.as_str())
            .field("guest", &self.snapshot())
            .finish_non_exhaustive()
    }
}
