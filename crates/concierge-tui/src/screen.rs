//! Screen identifier enum.

use std::fmt;

/// The two widget screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    /// Reservation form, shown until the guest is identified.
    #[default]
    Login,
    /// Conversation with the concierge.
    Chat,
}

impl ScreenId {
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Chat => "Chat",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
