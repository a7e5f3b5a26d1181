//! Guest session layer between `concierge-api` and UI front ends (CLI / TUI).
//!
//! This crate owns everything the concierge chat widget does between the
//! user and the server:
//!
//! - **[`Widget`]**: Facade built once per front end. On construction it
//!   restores the guest from the `concierge_guest` cookie, then exposes
//!   [`mount()`](Widget::mount), [`login()`](Widget::login) and
//!   [`send()`](Widget::send) as the three user-facing operations.
//!
//! - **[`Session`]**: Holds the current [`GuestInfo`] as an immutable
//!   `Arc` snapshot behind a `tokio::sync::watch` channel. Every update
//!   publishes a new snapshot.
//!
//! - **[`CookieStore`]**: Browser-style `set`/`get`/`delete` over a
//!   [`CookieJar`], in memory or persisted to a file.
//!
//! - **[`WidgetView`]**: The view binding a front end injects. Flows
//!   never render anything themselves; they call the view.
//!
//! - **[`IdentityProfile`]**: Which guest fields identify a reservation
//!   and how a stored cookie is merged onto defaults.

pub mod chat;
pub mod config;
pub mod cookie;
pub mod error;
pub mod guest;
pub mod identity;
pub mod login;
pub mod messages;
pub mod resolver;
pub mod session;
pub mod view;
pub mod widget;

// ── Primary re-exports ──────────────────────────────────────────────
pub use chat::ChatOutcome;
pub use config::{CookieSettings, TlsVerification, WidgetConfig};
pub use cookie::{Cookie, CookieJar, CookieStore, FileCookieStore, MemoryCookieStore};
pub use error::CoreError;
pub use guest::GuestInfo;
pub use identity::{GuestField, IdentityPreset, IdentityProfile, MergePolicy};
pub use messages::Messages;
pub use session::{Mode, Session};
pub use view::{Author, LoginForm, MessageId, WidgetView};
pub use widget::Widget;

// ── API types surfaced to front ends ────────────────────────────────
pub use concierge_api::{HealthStatus, RegisterGuestRequest, RegisteredGuest};
