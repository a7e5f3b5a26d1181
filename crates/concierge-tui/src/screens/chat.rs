//! Conversation log and message input.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_input::Input;

use concierge_core::{Author, MessageId};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::text_input;

#[derive(Debug)]
struct Bubble {
    id: MessageId,
    author: Author,
    text: String,
    loading: bool,
}

pub struct ChatScreen {
    bubbles: Vec<Bubble>,
    input: Input,
    throbber_state: ThrobberState,
}

impl ChatScreen {
    pub fn new() -> Self {
        Self {
            bubbles: Vec::new(),
            input: Input::default(),
            throbber_state: ThrobberState::default(),
        }
    }

    fn bubble_mut(&mut self, id: MessageId) -> Option<&mut Bubble> {
        self.bubbles.iter_mut().find(|b| b.id == id)
    }

    fn log_lines(&self) -> Vec<Line<'static>> {
        let throbber = Throbber::default().throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        let mut lines = Vec::with_capacity(self.bubbles.len() * 2);
        for bubble in &self.bubbles {
            let (name, style) = match bubble.author {
                Author::Bot => ("concierge", theme::bot_message()),
                Author::User => ("you", theme::user_message()),
            };
            let mut spans = vec![Span::styled(format!("{name} › "), theme::author_label())];
            if bubble.loading {
                spans.push(throbber.to_symbol_span(&self.throbber_state));
                spans.push(Span::styled(bubble.text.clone(), theme::loading_message()));
            } else {
                spans.push(Span::styled(bubble.text.clone(), style));
            }
            lines.push(Line::from(spans));
            lines.push(Line::default());
        }
        lines
    }
}

impl Default for ChatScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows `lines` take once wrapped to `width` columns.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

impl Component for ChatScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Enter {
            return Ok(Some(Action::SubmitChat(self.input.value().to_owned())));
        }
        text_input::handle_key(&mut self.input, key);
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AppendMessage { id, author, text } => self.bubbles.push(Bubble {
                id: *id,
                author: *author,
                text: text.clone(),
                loading: false,
            }),
            Action::MarkLoading(id) => {
                if let Some(bubble) = self.bubble_mut(*id) {
                    bubble.loading = true;
                }
            }
            Action::RemoveMessage(id) => self.bubbles.retain(|b| b.id != *id),
            Action::ClearInput => self.input.reset(),
            Action::Spin => {
                if self.bubbles.iter().any(|b| b.loading) {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [log_area, input_area, hints_area] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let block = Block::default()
            .title(" Concierge ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(log_area);

        // Keep the newest bubble in view.
        let lines = self.log_lines();
        let overflow = wrapped_height(&lines, inner.width).saturating_sub(usize::from(inner.height));
        let log = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(overflow).unwrap_or(u16::MAX), 0));
        frame.render_widget(log, log_area);

        text_input::render(
            frame,
            input_area,
            &self.input,
            "Message",
            theme::border_focused(),
            true,
        );

        let hints = Line::from(vec![
            Span::styled(" Enter ", theme::key_hint_key()),
            Span::styled("send  ", theme::key_hint()),
            Span::styled("Ctrl+U ", theme::key_hint_key()),
            Span::styled("clear  ", theme::key_hint()),
            Span::styled("Ctrl+C ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hints_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn append(screen: &mut ChatScreen, id: u64, author: Author, text: &str) {
        screen
            .update(&Action::AppendMessage {
                id: MessageId(id),
                author,
                text: text.to_owned(),
            })
            .unwrap_or_default();
    }

    #[test]
    fn enter_submits_the_typed_text() {
        let mut screen = ChatScreen::new();
        for c in "wifi?".chars() {
            screen
                .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .unwrap_or_default();
        }
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap_or_default();
        assert!(matches!(action, Some(Action::SubmitChat(ref text)) if text == "wifi?"));

        screen.update(&Action::ClearInput).unwrap_or_default();
        assert_eq!(screen.input.value(), "");
    }

    #[test]
    fn loading_bubble_is_marked_then_removed() {
        let mut screen = ChatScreen::new();
        append(&mut screen, 1, Author::User, "wifi?");
        append(&mut screen, 2, Author::Bot, "Sto controllando le informazioni…");

        screen.update(&Action::MarkLoading(MessageId(2))).unwrap_or_default();
        assert!(screen.bubbles[1].loading);
        assert!(!screen.bubbles[0].loading);

        screen.update(&Action::RemoveMessage(MessageId(2))).unwrap_or_default();
        append(&mut screen, 3, Author::Bot, "La password è ospite123");
        let texts: Vec<_> = screen.bubbles.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, ["wifi?", "La password è ospite123"]);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut screen = ChatScreen::new();
        append(&mut screen, 1, Author::Bot, "Ciao!");
        screen.update(&Action::MarkLoading(MessageId(9))).unwrap_or_default();
        screen.update(&Action::RemoveMessage(MessageId(9))).unwrap_or_default();
        assert_eq!(screen.bubbles.len(), 1);
        assert!(!screen.bubbles[0].loading);
    }

    #[test]
    fn wrapped_height_counts_blank_and_long_lines() {
        let lines = vec![Line::from("x".repeat(25)), Line::default()];
        assert_eq!(wrapped_height(&lines, 10), 4);
    }
}
