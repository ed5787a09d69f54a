// src/tui.rs
use std::io;

use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc;

use crate::config::WidgetConfig;
use crate::error::TransportError;
use crate::message::ChatResponse;
use crate::services::controller::{ChatController, InputEvent, PendingRequest, Submit};
use crate::services::render::RenderToken;
use crate::services::transport::Transport;
use crate::state::{ChatView, Focus, MessageId, MessageKind, Sender};

type Finished = (MessageId, Result<ChatResponse, TransportError>);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Input(InputEvent),
}

/// Puts the terminal back on drop, including early returns and panics.
struct TerminalGuard {
    restore: fn() -> io::Result<()>,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // nothing useful to do with a failure while unwinding
        let _ = (self.restore)();
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

/// Run the widget until the user quits, restoring the terminal afterwards.
pub async fn run<T: Transport>(mut controller: ChatController<T>) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let _guard = TerminalGuard { restore: restore_terminal };

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    run_loop(&mut terminal, &mut controller).await
}

async fn run_loop<B: Backend, T: Transport>(
    terminal: &mut Terminal<B>,
    controller: &mut ChatController<T>,
) -> anyhow::Result<()> {
    let (done_tx, mut done_rx) = mpsc::channel::<Finished>(8);
    let mut events = EventStream::new();

    loop {
        terminal.draw(|f| draw(f, &mut *controller))?;

        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                let Event::Key(key) = event? else { continue };
                match map_key(key) {
                    Some(Action::Quit) => break,
                    Some(Action::Input(input)) => {
                        if let Submit::Started(pending) = controller.handle_input(input) {
                            spawn_send(controller.transport().clone(), pending, done_tx.clone());
                        }
                    }
                    None => {}
                }
            }
            Some((placeholder, result)) = done_rx.recv() => {
                controller.complete(placeholder, result);
            }
        }
    }

    Ok(())
}

fn spawn_send<T: Transport>(transport: T, pending: PendingRequest, done: mpsc::Sender<Finished>) {
    tokio::spawn(async move {
        let result = transport.send(&pending.text).await;
        // receiver is gone only once the UI has quit
        let _ = done.send((pending.placeholder, result)).await;
    });
}

/// Translate a key stroke into a widget action.
///
/// Only `Press` events count, so terminals that also report releases and
/// repeats still produce one send per Enter.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let input = match key.code {
        KeyCode::Esc => return Some(Action::Quit),
        KeyCode::Char('c') if ctrl => return Some(Action::Quit),
        KeyCode::Char('s') if ctrl => InputEvent::FormSubmit,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => InputEvent::Char(c),
        KeyCode::Backspace => InputEvent::Backspace,
        KeyCode::Enter => InputEvent::Enter,
        KeyCode::Tab => InputEvent::ToggleFocus,
        KeyCode::PageUp => InputEvent::ScrollUp,
        KeyCode::PageDown => InputEvent::ScrollDown,
        KeyCode::F(n @ 1..=9) => InputEvent::QuickReply(usize::from(n - 1)),
        _ => return None,
    };
    Some(Action::Input(input))
}

fn draw<T: Transport>(f: &mut Frame, controller: &mut ChatController<T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(3)])
        .split(f.area());

    let list_area = chunks[0];
    let width = usize::from(list_area.width.saturating_sub(2));
    let height = usize::from(list_area.height.saturating_sub(2));
    let lines = message_lines(controller.view(), controller.config(), width);
    controller.view_mut().set_viewport(lines.len(), height);

    let view = controller.view();
    let config = controller.config();
    let offset = bottom_offset(lines.len(), height, view.scroll_back());

    let list_style = if view.focus() == Focus::MessageList {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let messages = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(list_style).title("Chat"))
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    f.render_widget(messages, list_area);

    let hints = Paragraph::new(hint_line(config)).style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, chunks[1]);

    let title = if view.is_input_enabled() { "Message" } else { "Message (waiting for reply)" };
    let input_style = if view.focus() == Focus::Input {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(view.input())
        .block(Block::default().borders(Borders::ALL).border_style(input_style).title(title));
    f.render_widget(input, chunks[2]);

    if view.focus() == Focus::Input && view.is_input_enabled() {
        let typed = u16::try_from(view.input().chars().count()).unwrap_or(u16::MAX);
        let max_x = chunks[2].right().saturating_sub(2);
        let x = chunks[2].x.saturating_add(1).saturating_add(typed).min(max_x);
        f.set_cursor_position((x, chunks[2].y + 1));
    }
}

/// First visible row so that the newest line sits on the bottom edge.
pub fn bottom_offset(total: usize, height: usize, scroll_back: usize) -> usize {
    total.saturating_sub(height).saturating_sub(scroll_back)
}

/// Pre-wrapped lines for the message pane, one or more per message.
pub fn message_lines(view: &ChatView, config: &WidgetConfig, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for message in view.messages() {
        let label = match message.sender {
            Sender::User => &config.user_label,
            Sender::Bot => &config.bot_label,
        };
        let style = match (message.sender, message.kind) {
            (_, MessageKind::Error) => Style::default().fg(Color::Red),
            (_, MessageKind::Loading) => {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
            }
            (Sender::User, MessageKind::Normal) => Style::default().fg(Color::Cyan),
            (Sender::Bot, MessageKind::Normal) => Style::default(),
        };

        for token in &message.body {
            let (text, style) = match token {
                RenderToken::Text(text) => (format!("{label}: {text}"), style),
                RenderToken::Image(url) => (
                    format!("  [image] {url}"),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                ),
            };
            for row in textwrap::wrap(&text, width) {
                lines.push(Line::styled(row.into_owned(), style));
            }
        }
    }

    lines
}

fn hint_line(config: &WidgetConfig) -> String {
    let mut hints: Vec<String> = config
        .quick_replies
        .iter()
        .take(9)
        .enumerate()
        .map(|(i, reply)| format!("F{} {reply}", i + 1))
        .collect();
    hints.push("Tab focus · PgUp/PgDn scroll · Esc quit".to_string());
    hints.join(" | ")
}
