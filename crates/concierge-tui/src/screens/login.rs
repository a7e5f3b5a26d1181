//! Reservation form: one input per identity field.
//!
//! Tab / Shift+Tab (or ↑/↓) move between fields, Enter submits. Values are
//! kept after a failed attempt so the guest only fixes what was wrong.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tui_input::Input;

use concierge_core::{GuestField, IdentityProfile, LoginForm, Messages};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::text_input;

struct Field {
    field: GuestField,
    input: Input,
}

pub struct LoginScreen {
    messages: &'static Messages,
    heading: String,
    fields: Vec<Field>,
    focus: usize,
}

impl LoginScreen {
    pub fn new(messages: &'static Messages) -> Self {
        let mut screen = Self {
            messages,
            heading: String::new(),
            fields: Vec::new(),
            focus: 0,
        };
        screen.reset(&IdentityProfile::default());
        screen
    }

    /// Rebuild the inputs for `profile`, required fields first.
    fn reset(&mut self, profile: &IdentityProfile) {
        self.heading = self.messages.missing_fields(&profile.required);
        self.fields = profile
            .form_fields()
            .map(|field| Field {
                field,
                input: Input::default(),
            })
            .collect();
        self.focus = 0;
    }

    /// The form as typed so far.
    fn form(&self) -> LoginForm {
        let mut form = LoginForm::new();
        for f in &self.fields {
            form.set(f.field, Some(f.input.value().to_owned()));
        }
        form
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn label(&self, field: GuestField) -> String {
        let text = self.messages.label(field);
        let mut chars = text.chars();
        let mut label: String = chars
            .next()
            .map(|c| c.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        if field.is_date() {
            label.push_str(" (YYYY-MM-DD)");
        }
        label
    }
}

impl Component for LoginScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Enter => return Ok(Some(Action::SubmitLogin(self.form()))),
            _ => {
                if let Some(f) = self.fields.get_mut(self.focus) {
                    text_input::handle_key(&mut f.input, key);
                }
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ShowLogin(profile) = action {
            self.reset(profile);
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows = u16::try_from(self.fields.len()).unwrap_or(u16::MAX);
        let height = rows.saturating_mul(3).saturating_add(6);
        let [column] = Layout::horizontal([Constraint::Length(64)])
            .flex(Flex::Center)
            .areas(area);
        let [panel] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(column);

        let block = Block::default()
            .title(" Concierge ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let mut constraints = vec![Constraint::Length(2)];
        constraints.extend(self.fields.iter().map(|_| Constraint::Length(3)));
        constraints.push(Constraint::Length(1));
        let layout = Layout::vertical(constraints).split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(self.heading.as_str(), theme::field_label()))
                .wrap(Wrap { trim: true }),
            layout[0],
        );

        for (i, f) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let border = if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            };
            text_input::render(
                frame,
                layout[i + 1],
                &f.input,
                &self.label(f.field),
                border,
                focused,
            );
        }

        let hints = Line::from(vec![
            Span::styled(" Tab ", theme::key_hint_key()),
            Span::styled("next field  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("submit  ", theme::key_hint()),
            Span::styled("Ctrl+C ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[layout.len() - 1]);
    }
}
