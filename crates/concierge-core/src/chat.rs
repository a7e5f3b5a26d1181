// ── Chat flow ──
//
// Relay one guest message to the concierge with the full guest context
// and render the reply. A loading bubble covers the request and is
// always removed before the outcome is shown.

use concierge_api::ChatRequest;
use tracing::{debug, error};

use crate::error::CoreError;
use crate::guest::GuestInfo;
use crate::messages::Messages;
use crate::view::Author;
use crate::widget::Widget;

/// What became of a submitted chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Blank input; nothing was sent or shown.
    Ignored,
    /// The concierge answered.
    Answered { text: String, used_ai: Option<bool> },
    /// The server replied without usable text; the fallback was shown.
    NoAnswer,
}

impl Widget {
    /// Send a chat message for the identified guest.
    pub async fn send(&self, text: &str) -> Result<ChatOutcome, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(ChatOutcome::Ignored);
        }

        let guest = self.snapshot();
        if !guest.is_identified(self.profile()) {
            return Err(CoreError::NotIdentified);
        }

        let view = &self.inner().view;
        let messages = Messages::for_locale(&guest.locale);

        view.append_message(Author::User, text);
        view.clear_input();
        let loading = view.append_message(Author::Bot, messages.loading);
        view.mark_loading(loading);

        let result = self
            .inner()
            .client
            .chat(&chat_request(text, &guest))
            .await;
        view.remove_message(loading);

        match result {
            Ok(reply) => {
                debug!(used_ai = ?reply.used_ai, "concierge replied");
                if let Some(answer) = reply.answer() {
                    view.append_message(Author::Bot, answer);
                    Ok(ChatOutcome::Answered {
                        text: answer.to_owned(),
                        used_ai: reply.used_ai,
                    })
                } else {
                    view.append_message(Author::Bot, messages.no_answer);
                    Ok(ChatOutcome::NoAnswer)
                }
            }
            Err(e) => {
                error!(error = %e, "chat request failed");
                view.append_message(Author::Bot, messages.chat_network_error);
                Err(e.into())
            }
        }
    }
}

fn chat_request(text: &str, guest: &GuestInfo) -> ChatRequest {
    ChatRequest {
        message: text.to_owned(),
        property_id: guest.property_id.clone(),
        locale: guest.locale.clone(),
        arrival_date: guest.arrival_date.clone(),
        departure_date: guest.departure_date.clone(),
        last_name: guest.last_name.clone(),
        first_name: guest.first_name.clone(),
    }
}
