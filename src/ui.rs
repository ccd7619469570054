//! TUI module using ratatui.
//!
//! A single form: a masked API token field, a URL field and a result panel.
//! Field contents survive between runs; each Enter builds a fresh request.

use crate::agent::InferenceEndpoint;
use crate::dispatcher::{DispatchError, Dispatcher};
use crate::loader::ContentLoader;
use crate::request::SummarizeRequest;
use crate::summary::Summary;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{DefaultTerminal, Frame};
use std::time::Duration;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_INTERVAL: Duration = Duration::from_millis(100);
const IDLE_POLL: Duration = Duration::from_millis(250);
const MASK: char = '•';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Credential,
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Working,
    Succeeded(Summary),
    Failed {
        message: String,
        detail: Option<String>,
    },
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Submit(SummarizeRequest),
    Quit,
}

#[derive(Debug, Clone)]
pub struct App {
    pub credential: String,
    pub url: String,
    pub focus: Focus,
    pub status: Status,
    spinner: usize,
}

impl App {
    /// Start with the URL field focused when a token is already known
    pub fn new(credential: Option<String>) -> Self {
        let focus = if credential.is_some() {
            Focus::Url
        } else {
            Focus::Credential
        };
        Self {
            credential: credential.unwrap_or_default(),
            url: String::new(),
            focus,
            status: Status::Idle,
            spinner: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Action::Quit;
        }
        if self.status == Status::Working {
            return Action::None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    Focus::Credential => Focus::Url,
                    Focus::Url => Focus::Credential,
                };
            }
            KeyCode::Enter => {
                return Action::Submit(SummarizeRequest::new(
                    self.credential.clone(),
                    self.url.clone(),
                ));
            }
            KeyCode::Backspace => {
                self.focused_field().pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focused_field().push(c);
            }
            _ => {}
        }
        Action::None
    }

    pub fn start(&mut self) {
        self.status = Status::Working;
        self.spinner = 0;
    }

    pub fn tick(&mut self) {
        self.spinner = (self.spinner + 1) % SPINNER_FRAMES.len();
    }

    /// Show the outcome and return to the input-ready state
    pub fn finish(&mut self, outcome: Result<Summary, DispatchError>) {
        self.status = match outcome {
            Ok(summary) => Status::Succeeded(summary),
            Err(err) => Status::Failed {
                message: err.to_string(),
                detail: err.detail(),
            },
        };
    }

    fn focused_field(&mut self) -> &mut String {
        match self.focus {
            Focus::Credential => &mut self.credential,
            Focus::Url => &mut self.url,
        }
    }
}

/// Run the TUI until the user quits
pub async fn run<V, G, E>(dispatcher: &Dispatcher<V, G, E>, credential: Option<String>) -> anyhow::Result<()>
where
    V: ContentLoader,
    G: ContentLoader,
    E: InferenceEndpoint,
{
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, dispatcher, App::new(credential)).await;
    ratatui::restore();
    result
}

async fn event_loop<V, G, E>(
    terminal: &mut DefaultTerminal,
    dispatcher: &Dispatcher<V, G, E>,
    mut app: App,
) -> anyhow::Result<()>
where
    V: ContentLoader,
    G: ContentLoader,
    E: InferenceEndpoint,
{
    loop {
        terminal.draw(|frame| draw(frame, &app))?;

        if !event::poll(IDLE_POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.handle_key(key) {
            Action::Quit => return Ok(()),
            Action::Submit(request) => {
                app.start();
                let work = dispatcher.dispatch(&request);
                tokio::pin!(work);
                let mut ticker = tokio::time::interval(SPINNER_INTERVAL);

                let outcome = loop {
                    tokio::select! {
                        outcome = &mut work => break outcome,
                        _ = ticker.tick() => {
                            app.tick();
                            terminal.draw(|frame| draw(frame, &app))?;
                        }
                    }
                };
                app.finish(outcome);

                // Discard keys typed while busy
                while event::poll(Duration::ZERO)? {
                    event::read()?;
                }
            }
            Action::None => {}
        }
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let [title_area, credential_area, url_area, help_area, result_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new("Summarize Text From YouTube or a Website")
            .style(Style::new().add_modifier(Modifier::BOLD)),
        title_area,
    );

    let masked: String = std::iter::repeat(MASK).take(app.credential.chars().count()).collect();
    render_input(frame, credential_area, "🔐 Hugging Face API Token", &masked, app.focus == Focus::Credential);
    render_input(frame, url_area, "Enter a YouTube or Website URL", &app.url, app.focus == Focus::Url);

    frame.render_widget(
        Paragraph::new("Enter: summarize   Tab: switch field   Esc: quit")
            .style(Style::new().fg(Color::DarkGray)),
        help_area,
    );

    render_status(frame, result_area, app);

    if app.status != Status::Working {
        let (area, len) = match app.focus {
            Focus::Credential => (credential_area, masked.chars().count()),
            Focus::Url => (url_area, app.url.chars().count()),
        };
        let max_x = area.x + area.width.saturating_sub(2);
        let x = (area.x + 1).saturating_add(len as u16).min(max_x);
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border = if focused {
        Style::new().fg(Color::Cyan)
    } else {
        Style::new()
    };
    frame.render_widget(
        Paragraph::new(value.to_string()).block(Block::bordered().title(title).border_style(border)),
        area,
    );
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let widget = match &app.status {
        Status::Idle => Paragraph::new("Enter a URL and press Enter to summarize.")
            .block(Block::bordered().title("Summary")),
        Status::Working => Paragraph::new(format!(
            "{} Fetching and summarizing content...",
            SPINNER_FRAMES[app.spinner]
        ))
        .block(Block::bordered().title("Working")),
        Status::Succeeded(summary) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "📄 Summary:",
                    Style::new().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            lines.extend(summary.text.lines().map(|l| Line::from(l.to_string())));
            Paragraph::new(lines).block(
                Block::bordered()
                    .title("✅ Summary generated successfully!")
                    .border_style(Style::new().fg(Color::Green)),
            )
        }
        Status::Failed { message, detail } => {
            let mut lines = vec![Line::from(Span::styled(
                format!("⚠️ {message}"),
                Style::new().fg(Color::Red),
            ))];
            if let Some(detail) = detail {
                lines.push(Line::from(""));
                lines.extend(detail.lines().map(|l| Line::from(l.to_string())));
            }
            Paragraph::new(lines).block(
                Block::bordered()
                    .title("Error")
                    .border_style(Style::new().fg(Color::Red)),
            )
        }
    };
    frame.render_widget(widget.wrap(Wrap { trim: false }), area);
}
