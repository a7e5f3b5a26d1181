//! Channel-backed view binding.
//!
//! The widget's flows run in spawned tasks; every view call becomes an
//! [`Action`] on the app loop's channel, so rendering state is only ever
//! touched by the loop itself.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use concierge_core::{Author, IdentityProfile, MessageId, WidgetView};

use crate::action::Action;

pub struct ChannelView {
    tx: UnboundedSender<Action>,
    next_id: AtomicU64,
}

impl ChannelView {
    pub fn new(tx: UnboundedSender<Action>) -> Self {
        Self {
            tx,
            next_id: AtomicU64::new(1),
        }
    }

    fn send(&self, action: Action) {
        trace!(%action, "view action");
        // The loop has exited; nothing left to draw.
        let _ = self.tx.send(action);
    }
}

impl WidgetView for ChannelView {
    fn show_login(&self, profile: &IdentityProfile) {
        self.send(Action::ShowLogin(profile.clone()));
    }

    fn show_chat(&self) {
        self.send(Action::ShowChat);
    }

    fn append_message(&self, author: Author, text: &str) -> MessageId {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.send(Action::AppendMessage {
            id,
            author,
            text: text.to_owned(),
        });
        id
    }

    fn mark_loading(&self, id: MessageId) {
        self.send(Action::MarkLoading(id));
    }

    fn remove_message(&self, id: MessageId) {
        self.send(Action::RemoveMessage(id));
    }

    fn alert(&self, text: &str) {
        self.send(Action::Alert(text.to_owned()));
    }

    fn clear_input(&self) {
        self.send(Action::ClearInput);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn view_calls_become_actions_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let view = ChannelView::new(tx);

        let user = view.append_message(Author::User, "wifi?");
        view.clear_input();
        let loading = view.append_message(Author::Bot, "Sto controllando le informazioni…");
        view.mark_loading(loading);
        view.remove_message(loading);

        assert_ne!(user, loading);
        assert!(matches!(
            rx.try_recv().unwrap(),
            Action::AppendMessage { author: Author::User, ref text, .. } if text == "wifi?"
        ));
        assert!(matches!(rx.try_recv().unwrap(), Action::ClearInput));
        assert!(matches!(rx.try_recv().unwrap(), Action::AppendMessage { author: Author::Bot, .. }));
        assert!(matches!(rx.try_recv().unwrap(), Action::MarkLoading(id) if id == loading));
        assert!(matches!(rx.try_recv().unwrap(), Action::RemoveMessage(id) if id == loading));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let view = ChannelView::new(tx);
        view.alert("Errore di connessione al server.");
        assert_eq!(view.append_message(Author::Bot, "Ciao!"), MessageId(1));
    }
}
