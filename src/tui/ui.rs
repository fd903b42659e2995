use std::io::{self, Stdout};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};

use super::{App, Screen};
use crate::playback::Session;

const PINK: Color = Color::Rgb(236, 72, 153);
const ORANGE: Color = Color::Rgb(251, 146, 60);
const VIOLET: Color = Color::Rgb(139, 92, 246);
const BG: Color = Color::Rgb(12, 12, 14);
const FG: Color = Color::Rgb(240, 240, 245);
const DIM: Color = Color::Rgb(120, 120, 130);
const ERROR: Color = Color::Rgb(255, 100, 100);

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    pub fn draw(&mut self, app: &App) -> Result<()> {
        self.terminal.draw(|f| render(f, app))?;
        Ok(())
    }

    pub fn poll_key(&self) -> Result<Option<KeyEvent>> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(BG)), area);

    match &app.screen {
        Screen::Home => render_home(frame, app, area),
        Screen::Player(session) => render_player(frame, app, session, area),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    let title = vec![
        Line::from(Span::styled(
            "ytshuffle",
            Style::default().fg(PINK).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Paste the URL of a YouTube playlist and press ", Style::default().fg(DIM)),
            Span::styled("enter", Style::default().fg(FG).add_modifier(Modifier::BOLD)),
        ]),
    ];
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let input = if app.input.is_empty() {
        Span::styled("https://www.youtube.com/playlist?list=...", Style::default().fg(DIM))
    } else {
        Span::styled(app.input.as_str(), Style::default().fg(FG))
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(VIOLET));
    frame.render_widget(Paragraph::new(Line::from(input)).block(input_block), chunks[1]);

    let status = if app.is_loading() {
        Line::from(Span::styled("◌ Loading…", Style::default().fg(ORANGE)))
    } else {
        Line::from(Span::styled("⤮ SHUFFLE", Style::default().fg(PINK).add_modifier(Modifier::BOLD)))
    };
    frame.render_widget(Paragraph::new(status), chunks[2]);

    draw_error(frame, app, chunks[3]);
    draw_recent(frame, app, chunks[4]);

    let controls = Line::from(vec![
        Span::styled("[enter]", Style::default().fg(PINK)),
        Span::styled(" shuffle ", Style::default().fg(DIM)),
        Span::styled("[↑/↓]", Style::default().fg(PINK)),
        Span::styled(" recent ", Style::default().fg(DIM)),
        Span::styled("[tab]", Style::default().fg(PINK)),
        Span::styled(" use ", Style::default().fg(DIM)),
        Span::styled("[del]", Style::default().fg(PINK)),
        Span::styled(" forget ", Style::default().fg(DIM)),
        Span::styled("[esc]", Style::default().fg(PINK)),
        Span::styled(if app.is_loading() { " cancel" } else { " quit" }, Style::default().fg(DIM)),
    ]);
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(VIOLET));
    frame.render_widget(Paragraph::new(controls).block(block), chunks[5]);
}

fn draw_error(frame: &mut Frame, app: &App, area: Rect) {
    let Some(error) = &app.error else {
        return;
    };

    let content = vec![
        Line::from(Span::styled("Error", Style::default().fg(ERROR).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(error.as_str(), Style::default().fg(FG))),
    ];
    frame.render_widget(Paragraph::new(content).wrap(Wrap { trim: true }), area);
}

fn draw_recent(frame: &mut Frame, app: &App, area: Rect) {
    let recent = app.recent_list();
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = recent
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == app.selected_index {
                Style::default().fg(BG).bg(PINK)
            } else {
                Style::default().fg(FG)
            };
            ListItem::new(truncate(&entry.name, width)).style(style)
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" recent ", Style::default().fg(PINK)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DIM));

    frame.render_widget(List::new(items).block(block), area);
}

fn render_player(frame: &mut Frame, app: &App, session: &Session, area: Rect) {
    // Split horizontally: player (left) and video list (right)
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(main_chunks[0]);

    draw_header(frame, app, session, left_chunks[0]);
    draw_now_playing(frame, app, left_chunks[1]);
    draw_error(frame, app, left_chunks[2]);
    draw_controls(frame, left_chunks[4]);

    draw_video_list(frame, app, session, main_chunks[1]);
}

fn draw_header(frame: &mut Frame, app: &App, session: &Session, area: Rect) {
    let status = if app.is_playing { "▶" } else { "⏸" };

    let header = Line::from(vec![
        Span::styled("ytshuffle ", Style::default().fg(PINK).add_modifier(Modifier::BOLD)),
        Span::styled(status, Style::default().fg(ORANGE)),
        Span::styled(" ", Style::default()),
        Span::styled(session.playlist_id(), Style::default().fg(DIM)),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(PINK));

    frame.render_widget(Paragraph::new(header).block(block), area);
}

fn draw_now_playing(frame: &mut Frame, app: &App, area: Rect) {
    let (title, channel) = app
        .current_entry()
        .map(|e| (e.title.clone(), e.channel_title.clone()))
        .unwrap_or(("—".into(), String::new()));

    let content = vec![
        Line::from(Span::styled("now playing", Style::default().fg(DIM))),
        Line::from(""),
        Line::from(Span::styled(title, Style::default().fg(FG).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(channel, Style::default().fg(VIOLET))),
    ];

    frame.render_widget(Paragraph::new(content), area);
}

fn draw_video_list(frame: &mut Frame, app: &App, session: &Session, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize; // Account for border
    let width = area.width.saturating_sub(4) as usize;

    // Keep the highlighted row in view
    let scroll_offset = if app.selected_index >= visible_height {
        app.selected_index - visible_height + 1
    } else {
        0
    };

    let items: Vec<ListItem> = session
        .ordered_entries()
        .skip_while(|(i, _)| *i < scroll_offset)
        .take(visible_height)
        .map(|(i, entry)| {
            let is_current = i == session.cursor();
            let is_selected = i == app.selected_index;

            let prefix = if is_current { "▶ " } else { "  " };
            let label = format!("{}#{} • {} — {}", prefix, i + 1, entry.channel_title, entry.title);

            let style = if is_selected {
                Style::default().fg(BG).bg(PINK)
            } else if is_current {
                Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)
            } else if entry.is_unavailable() {
                Style::default().fg(DIM).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(FG)
            };

            ListItem::new(truncate(&label, width)).style(style)
        })
        .collect();

    let title = format!(" video list {} / {} ", session.cursor() + 1, session.len());
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(PINK)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DIM));

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_controls(frame: &mut Frame, area: Rect) {
    let controls = Line::from(vec![
        Span::styled("[space]", Style::default().fg(PINK)),
        Span::styled(" play/pause ", Style::default().fg(DIM)),
        Span::styled("[n/p]", Style::default().fg(PINK)),
        Span::styled(" skip ", Style::default().fg(DIM)),
        Span::styled("[s]", Style::default().fg(PINK)),
        Span::styled(" reshuffle ", Style::default().fg(DIM)),
        Span::styled("[↑/↓ enter]", Style::default().fg(PINK)),
        Span::styled(" pick ", Style::default().fg(DIM)),
        Span::styled("[o]", Style::default().fg(PINK)),
        Span::styled(" browser ", Style::default().fg(DIM)),
        Span::styled("[b]", Style::default().fg(PINK)),
        Span::styled(" back ", Style::default().fg(DIM)),
        Span::styled("[q]", Style::default().fg(PINK)),
        Span::styled(" quit", Style::default().fg(DIM)),
    ]);

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(PINK));

    frame.render_widget(
        Paragraph::new(controls).wrap(Wrap { trim: true }).block(block),
        area,
    );
}
