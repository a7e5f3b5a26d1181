//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;

use concierge_core::{Author, IdentityProfile, LoginForm, MessageId};

/// Every state change in the TUI flows through an `Action`.
///
/// Key handling and the widget's view binding both produce actions; the
/// app loop is the only consumer.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ───────────────────────────────────────────────────
    Quit,
    /// Next throbber frame; only sent while requests are pending.
    Spin,

    // ── View binding (sent by the widget) ───────────────────────────
    ShowLogin(IdentityProfile),
    ShowChat,
    AppendMessage {
        id: MessageId,
        author: Author,
        text: String,
    },
    MarkLoading(MessageId),
    RemoveMessage(MessageId),
    Alert(String),
    ClearInput,

    // ── Guest input ─────────────────────────────────────────────────
    SubmitLogin(LoginForm),
    SubmitChat(String),
    DismissAlert,

    /// A spawned flow has returned.
    FlowFinished,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppendMessage { id, author, .. } => write!(f, "AppendMessage({author}, {})", id.0),
            Self::SubmitChat(_) => f.write_str("SubmitChat"),
            Self::SubmitLogin(_) => f.write_str("SubmitLogin"),
            Self::Alert(_) => f.write_str("Alert"),
            other => write!(f, "{other:?}"),
        }
    }
}
