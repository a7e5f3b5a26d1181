//! Application core: event loop, screen switching, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use concierge_core::{CookieStore, Widget, WidgetConfig};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, Events};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::terminal::Session;
use crate::theme;
use crate::view::ChannelView;

/// Throbber frame interval.
const SPIN_EVERY: Duration = Duration::from_millis(100);

/// Why the loop woke up.
enum Wake {
    Input(Option<Event>),
    Action(Option<Action>),
}

/// Top-level application state and event loop.
pub struct App {
    widget: Widget,
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Alert overlay (blocks other input while shown).
    alert: Option<String>,
    /// Login or chat requests still running. Submits never wait on each other.
    in_flight: usize,
    /// Whether the app should keep running.
    running: bool,
    /// Action sender, shared with the widget's view binding.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver, drained by the main loop.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    /// Build the widget against a channel-backed view and create the screens.
    pub fn new(config: WidgetConfig, cookies: Arc<dyn CookieStore>) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let view = Arc::new(ChannelView::new(action_tx.clone()));
        let widget = Widget::connect(config, cookies, view)?;
        let screens = create_screens(widget.messages()).into_iter().collect();

        Ok(Self {
            widget,
            active_screen: ScreenId::default(),
            screens,
            alert: None,
            in_flight: 0,
            running: true,
            action_tx,
            action_rx,
        })
    }

    /// Run until the guest quits or the terminal closes.
    ///
    /// Redraws after every wake-up. Nothing wakes an idle chat except
    /// input and the widget's own view updates.
    pub async fn run(&mut self) -> Result<()> {
        let mut session = Session::start()?;
        let mut events = Events::spawn(SPIN_EVERY);

        let mode = self.widget.mount();
        info!(?mode, "widget mounted");

        while self.running {
            self.drain_actions()?;
            events.set_pending(self.in_flight);
            if !self.running {
                break;
            }
            session.draw(|frame| self.render(frame))?;

            let wake = tokio::select! {
                event = events.next() => Wake::Input(event),
                action = self.action_rx.recv() => Wake::Action(action),
            };
            match wake {
                Wake::Input(Some(event)) => {
                    if let Some(action) = self.handle_event(event)? {
                        self.process_action(action)?;
                    }
                }
                Wake::Action(Some(action)) => self.process_action(action)?,
                Wake::Input(None) | Wake::Action(None) => break,
            }
        }

        info!("TUI event loop ended");
        Ok(())
    }

    fn drain_actions(&mut self) -> Result<()> {
        while let Ok(action) = self.action_rx.try_recv() {
            self.process_action(action)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<Option<Action>> {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            // The next draw picks up the new size.
            Event::Resize(..) => Ok(None),
            Event::Spin => Ok(Some(Action::Spin)),
        }
    }

    /// Global keys first, then the alert overlay, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.alert.is_some() {
            return Ok(match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(Action::DismissAlert),
                _ => None,
            });
        }

        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    fn process_action(&mut self, action: Action) -> Result<()> {
        if !matches!(action, Action::Spin) {
            debug!(%action, "processing action");
        }

        match action {
            Action::Quit => self.running = false,

            Action::Spin => self.forward(ScreenId::Chat, &action)?,

            Action::ShowLogin(_) => {
                self.active_screen = ScreenId::Login;
                self.forward(ScreenId::Login, &action)?;
            }

            Action::ShowChat => self.active_screen = ScreenId::Chat,

            Action::AppendMessage { .. }
            | Action::MarkLoading(_)
            | Action::RemoveMessage(_)
            | Action::ClearInput => self.forward(ScreenId::Chat, &action)?,

            Action::Alert(text) => self.alert = Some(text),

            Action::DismissAlert => self.alert = None,

            Action::SubmitLogin(form) => {
                let widget = self.widget.clone();
                let tx = self.begin_flow();
                tokio::spawn(async move {
                    if let Err(e) = widget.login(&form).await {
                        warn!(error = %e, "login failed");
                    }
                    let _ = tx.send(Action::FlowFinished);
                });
            }

            Action::SubmitChat(text) => {
                let widget = self.widget.clone();
                let tx = self.begin_flow();
                tokio::spawn(async move {
                    if let Err(e) = widget.send(&text).await {
                        warn!(error = %e, "chat message failed");
                    }
                    let _ = tx.send(Action::FlowFinished);
                });
            }

            Action::FlowFinished => self.in_flight = self.in_flight.saturating_sub(1),
        }
        Ok(())
    }

    /// Count a spawned flow; it reports back on the returned sender.
    fn begin_flow(&mut self) -> mpsc::UnboundedSender<Action> {
        self.in_flight += 1;
        debug!(in_flight = self.in_flight, "request started");
        self.action_tx.clone()
    }

    fn forward(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Rendering ──────────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [content_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.render(frame, content_area);
        }
        self.render_status_bar(frame, status_area);

        if let Some(ref text) = self.alert {
            render_alert(frame, area, text);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let guest = self.widget.snapshot();
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(guest.property_id.clone(), theme::title_style()),
            Span::styled(" │ ", theme::key_hint()),
            Span::styled(self.active_screen.label(), theme::field_label()),
        ];
        if let Some(name) = guest.display_name() {
            spans.push(Span::styled(" │ ", theme::key_hint()));
            spans.push(Span::styled(name.to_owned(), Style::default().fg(theme::SUCCESS_GREEN)));
        }
        if self.in_flight > 0 {
            spans.push(Span::styled(" │ ", theme::key_hint()));
            spans.push(Span::styled("◐ sending", Style::default().fg(theme::ELECTRIC_YELLOW)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Centered alert dialog over the current screen.
fn render_alert(frame: &mut Frame, area: Rect, text: &str) {
    let width = 56u16.min(area.width.saturating_sub(4));
    let height = 7u16.min(area.height);
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    let dialog_area = Rect::new(area.x + x, area.y + y, width, height);

    frame.render_widget(Clear, dialog_area);
    let block = Block::default()
        .title(" ! ")
        .title_style(theme::alert())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::alert())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let [message_area, hint_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
    frame.render_widget(
        Paragraph::new(Span::styled(text.to_owned(), theme::alert())).wrap(Wrap { trim: true }),
        message_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", theme::key_hint_key()),
            Span::styled("ok", theme::key_hint()),
        ])),
        hint_area,
    );
}
