//! Terminal binding for the widget's view trait.
//!
//! The last bot bubble is held back until the next view call. If that call
//! marks it loading it becomes a spinner, otherwise it is printed. This is
//! what lets the "checking…" bubble spin while the request is in flight and
//! vanish once it is removed.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use concierge_core::{Author, IdentityProfile, MessageId, Messages, WidgetView};

use crate::output;

/// How much of the conversation reaches the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// `concierge chat`: bubbles on stdout, alerts and headings on stderr.
    Interactive,
    /// Single commands render their own result; only the spinner shows.
    OneShot,
    /// Structured output or `--quiet`: nothing but the command's result.
    Silent,
}

#[derive(Default)]
struct ViewState {
    pending: Option<(MessageId, String)>,
    spinner: Option<(MessageId, ProgressBar)>,
}

pub struct TerminalView {
    presentation: Presentation,
    color: bool,
    messages: OnceLock<&'static Messages>,
    next_id: AtomicU64,
    state: Mutex<ViewState>,
}

impl TerminalView {
    pub fn new(presentation: Presentation, color: bool) -> Self {
        Self {
            presentation,
            color,
            messages: OnceLock::new(),
            next_id: AtomicU64::new(1),
            state: Mutex::new(ViewState::default()),
        }
    }

    /// Catalog for the login heading. Set once the guest's locale is known.
    pub fn use_messages(&self, messages: &'static Messages) {
        let _ = self.messages.set(messages);
    }

    /// Print any bubble still held back.
    pub fn flush(&self) {
        let pending = self.state().pending.take();
        if let Some((_, text)) = pending {
            self.print_bot(&text);
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn print_bot(&self, text: &str) {
        if self.presentation != Presentation::Interactive {
            return;
        }
        let prefix = output::dim("concierge ›", self.color);
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{prefix} {}", output::bot(text, self.color));
    }

    fn print_notice(&self, text: &str) {
        if self.presentation == Presentation::Interactive {
            eprintln!("{text}");
        }
    }

    fn spinner(&self, text: &str) -> ProgressBar {
        if self.presentation == Presentation::Silent {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(text.to_owned());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }
}

impl WidgetView for TerminalView {
    fn show_login(&self, profile: &IdentityProfile) {
        self.flush();
        let messages = self
            .messages
            .get()
            .copied()
            .unwrap_or_else(|| Messages::for_locale(""));
        let heading = messages.missing_fields(&profile.required);
        self.print_notice(&output::dim(&format!("» {heading}"), self.color));
    }

    fn show_chat(&self) {
        self.flush();
        self.print_notice(&output::dim("» /quit", self.color));
    }

    fn append_message(&self, author: Author, text: &str) -> MessageId {
        self.flush();
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        // The guest's own line is already on screen.
        if author == Author::Bot {
            self.state().pending = Some((id, text.to_owned()));
        }
        id
    }

    fn mark_loading(&self, id: MessageId) {
        let mut state = self.state();
        match state.pending.take() {
            Some((pending_id, text)) if pending_id == id => {
                state.spinner = Some((id, self.spinner(&text)));
            }
            other => state.pending = other,
        }
    }

    fn remove_message(&self, id: MessageId) {
        let mut state = self.state();
        if state.spinner.as_ref().is_some_and(|(sid, _)| *sid == id) {
            if let Some((_, spinner)) = state.spinner.take() {
                spinner.finish_and_clear();
            }
        } else if state.pending.as_ref().is_some_and(|(pid, _)| *pid == id) {
            state.pending = None;
        }
    }

    fn alert(&self, message: &str) {
        self.flush();
        self.print_notice(&output::alert(&format!("! {message}"), self.color));
    }

    fn clear_input(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> TerminalView {
        TerminalView::new(Presentation::Silent, false)
    }

    #[test]
    fn loading_bubble_becomes_spinner_and_is_removed() {
        let view = view();
        let user = view.append_message(Author::User, "wifi?");
        let loading = view.append_message(Author::Bot, "Sto controllando le informazioni…");
        assert_ne!(user, loading);

        view.mark_loading(loading);
        assert!(view.state().pending.is_none());
        assert!(view.state().spinner.is_some());

        view.remove_message(loading);
        assert!(view.state().spinner.is_none());
    }

    #[test]
    fn next_bubble_releases_the_pending_one() {
        let view = view();
        let first = view.append_message(Author::Bot, "Ciao!");
        let second = view.append_message(Author::Bot, "Ottimo!");

        let state = view.state();
        assert_eq!(state.pending.as_ref().map(|(id, _)| *id), Some(second));
        assert_ne!(first, second);
    }

    #[test]
    fn marking_an_unknown_id_keeps_the_bubble() {
        let view = view();
        let id = view.append_message(Author::Bot, "Ciao!");
        view.mark_loading(MessageId(999));
        assert_eq!(view.state().pending.as_ref().map(|(p, _)| *p), Some(id));

        view.flush();
        assert!(view.state().pending.is_none());
    }

    #[test]
    fn user_messages_are_not_held() {
        let view = view();
        view.append_message(Author::User, "ciao");
        assert!(view.state().pending.is_none());
    }
}
