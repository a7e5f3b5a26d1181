//! Screen implementations. Each screen is a top-level Component.

pub mod chat;
pub mod login;

use concierge_core::Messages;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create the screen components, labelled in the guest's language.
pub fn create_screens(messages: &'static Messages) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Login, Box::new(login::LoginScreen::new(messages))),
        (ScreenId::Chat, Box::new(chat::ChatScreen::new())),
    ]
}
