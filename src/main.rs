use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

mod colormap;
mod density;
mod events;
mod http_client;
mod pitch;
mod provider;
mod state;
mod statsbomb;

use crate::colormap::Rgb;
use crate::density::{DensityGrid, SHADE_LEVELS};
use crate::pitch::{PitchMask, PITCH_LENGTH, PITCH_WIDTH};
use crate::state::{apply_delta, AppState, ColorSlot, Control, Delta, ProviderCommand};
use crate::statsbomb::{competition_label, match_header, match_label};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.color_entry.is_some() {
            self.on_color_entry_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc if self.state.help_overlay => self.state.help_overlay = false,
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => self.state.focus_next(),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => self.state.focus_prev(),
            KeyCode::Left | KeyCode::Char('h') => self.state.cycle_value(-1),
            KeyCode::Right | KeyCode::Char('l') => self.state.cycle_value(1),
            KeyCode::Enter => match self.state.focus {
                Control::Color(_) => self.state.begin_color_entry(),
                _ => self.state.cycle_value(1),
            },
            KeyCode::Char('r') => self.refetch_focused(),
            _ => {}
        }
    }

    fn on_color_entry_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.state.commit_color_entry(),
            KeyCode::Esc => self.state.cancel_color_entry(),
            KeyCode::Backspace => self.state.color_entry_backspace(),
            KeyCode::Char(ch) => self.state.color_entry_push(ch),
            _ => {}
        }
    }

    // Drop the focused stage's data; the reconciler refetches it on the
    // next tick.
    fn refetch_focused(&mut self) {
        match self.state.focus {
            Control::Competition => {
                self.state.competitions.clear();
                self.state.competitions_loading = false;
                self.state.competitions_failed = false;
            }
            Control::Match => {
                self.state.matches_for = None;
                self.state.matches_loading = false;
                self.state.matches_failed = false;
            }
            _ => {
                self.state.events_for = None;
                self.state.events_loading = false;
                self.state.events_failed = false;
            }
        }
    }

    /// Reconcile fetched data with the current selection: whatever stage
    /// is missing or stale gets requested, one command per tick.
    fn sync_fetches(&mut self) {
        let Some(cmd) = self.state.wanted_fetch() else {
            return;
        };
        self.state.mark_loading(&cmd);
        let label = match &cmd {
            ProviderCommand::FetchCompetitions => "competitions".to_string(),
            ProviderCommand::FetchMatches {
                competition_id,
                season_id,
            } => format!("matches {competition_id}/{season_id}"),
            ProviderCommand::FetchEvents { match_id } => format!("events {match_id}"),
        };
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Fetcher thread is gone");
        } else {
            self.state.push_log(format!("[INFO] Fetching {label}"));
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.sync_fetches();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(42), Constraint::Min(30)])
        .split(chunks[1]);

    render_sidebar(frame, columns[0], &app.state);
    render_heatmap_panel(frame, columns[1], &app.state);
    render_footer(frame, chunks[2], &app.state);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let selection = match (state.selected_player(), state.filtered().len()) {
        (Some(player), count) => {
            format!(
                "{player} | {} | {} | {count} events",
                state.action_type(),
                state.location.label()
            )
        }
        (None, _) => "no selection yet".to_string(),
    };
    format!(" pitchheat | {selection}")
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Selection").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    push_select_line(
        &mut lines,
        state,
        Control::Competition,
        "Competition",
        competition_value(state),
        state.competitions.len(),
        state.competition_idx,
    );
    push_select_line(
        &mut lines,
        state,
        Control::Match,
        "Match",
        match_value(state),
        state.matches.len(),
        state.match_idx,
    );
    push_select_line(
        &mut lines,
        state,
        Control::Player,
        "Player",
        player_value(state),
        state.players.len(),
        state.player_idx,
    );
    push_select_line(
        &mut lines,
        state,
        Control::ActionType,
        "Action Type",
        state.action_type().to_string(),
        crate::events::ACTION_TYPES.len(),
        state.action_type_idx,
    );
    lines.push(line_for(
        state,
        Control::Location,
        "Location",
        location_value(state),
    ));
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Colors",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    for slot in ColorSlot::ALL {
        lines.push(color_line(state, slot));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

fn push_select_line(
    lines: &mut Vec<Line<'_>>,
    state: &AppState,
    control: Control,
    name: &'static str,
    value: String,
    total: usize,
    idx: usize,
) {
    let value = if total > 0 {
        format!("{value}  [{}/{total}]", idx + 1)
    } else {
        value
    };
    lines.push(line_for(state, control, name, value));
    lines.push(Line::raw(""));
}

fn line_for(state: &AppState, control: Control, name: &'static str, value: String) -> Line<'static> {
    let focused = state.focus == control;
    let marker = if focused { "> " } else { "  " };
    let name_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    Line::from(vec![
        Span::styled(format!("{marker}{name}: "), name_style),
        Span::raw(value),
    ])
}

fn competition_value(state: &AppState) -> String {
    if state.competitions_loading {
        return "loading...".to_string();
    }
    match state.selected_competition() {
        Some(comp) => competition_label(comp),
        None => "no competitions".to_string(),
    }
}

fn match_value(state: &AppState) -> String {
    if state.matches_loading {
        return "loading...".to_string();
    }
    match state.selected_match() {
        Some(row) => match_label(row),
        None => "no matches".to_string(),
    }
}

fn player_value(state: &AppState) -> String {
    if state.events_loading {
        return "loading...".to_string();
    }
    match state.selected_player() {
        Some(player) => player.to_string(),
        None => "no players".to_string(),
    }
}

fn location_value(state: &AppState) -> String {
    state
        .location_choices()
        .iter()
        .map(|choice| {
            if *choice == state.location {
                format!("(*) {}", choice.label())
            } else {
                format!("( ) {}", choice.label())
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn color_line(state: &AppState, slot: ColorSlot) -> Line<'static> {
    let control = Control::Color(slot);
    let focused = state.focus == control;
    let marker = if focused { "> " } else { "  " };
    let color = state.color(slot);
    let value = match (&state.color_entry, focused) {
        (Some(entry), true) => format!("{entry}_"),
        _ => color.to_hex(),
    };
    let name_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{marker}{:<11}", slot.label()), name_style),
        Span::raw(format!(" {value} ")),
        Span::styled("██", Style::default().fg(to_tui_color(color))),
    ])
}

fn render_heatmap_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = match state.selected_match() {
        Some(row) => match_header(row),
        None => "Pitch".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }
    if state.events_loading {
        let waiting = Paragraph::new("Fetching events...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(waiting, inner);
        return;
    }

    render_heatmap(frame, inner, state);
}

/// Pitch plus density overlay as half-block pixels: each terminal cell
/// holds two vertically stacked pixels (fg = upper, bg = lower), which
/// makes pixels close to square in common fonts.
fn render_heatmap(frame: &mut Frame, area: Rect, state: &AppState) {
    let max_px_w = area.width as f32;
    let max_px_h = (area.height as f32) * 2.0;
    let scale = (max_px_w / PITCH_LENGTH).min(max_px_h / PITCH_WIDTH);
    let px_w = (PITCH_LENGTH * scale).floor() as usize;
    let px_h = (PITCH_WIDTH * scale).floor() as usize;
    if px_w < 12 || px_h < 8 {
        let small = Paragraph::new("Terminal too small for the pitch")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(small, area);
        return;
    }

    let cell_rows = px_h.div_ceil(2);
    let x0 = area.x + (area.width - px_w as u16) / 2;
    let y0 = area.y + (area.height - cell_rows as u16) / 2;

    let points = state.heat_points();
    let grid = DensityGrid::estimate(&points, px_w, px_h);
    let mask = PitchMask::rasterize(px_w, px_h);
    let cmap = state.colormap();
    let background = state.color(ColorSlot::Background);
    let line = state.color(ColorSlot::Line);

    let pixel = |col: usize, row: usize| -> Rgb {
        if mask.is_line(col, row) {
            return line;
        }
        match grid.shade_band(col, row, SHADE_LEVELS) {
            Some(band) => cmap.sample(band as f32 / SHADE_LEVELS as f32),
            None => background,
        }
    };

    let buf = frame.buffer_mut();
    for cell_row in 0..cell_rows {
        let upper_row = cell_row * 2;
        let lower_row = upper_row + 1;
        for col in 0..px_w {
            let upper = pixel(col, upper_row);
            let lower = if lower_row < px_h {
                pixel(col, lower_row)
            } else {
                background
            };
            let cell = buf.get_mut(x0 + col as u16, y0 + cell_row as u16);
            cell.set_char('▀');
            cell.set_fg(to_tui_color(upper));
            cell.set_bg(to_tui_color(lower));
        }
    }
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[0]);

    let hints = Paragraph::new(
        "Tab/j/k Focus | ←/→ Cycle | Enter Hex (colors) | r Refetch | ? Help | q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, rows[1]);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "pitchheat - Help",
        "",
        "Navigation:",
        "  Tab / j / ↓   Next control",
        "  S-Tab / k / ↑ Previous control",
        "  ← / h         Previous value",
        "  → / l         Next value",
        "  Enter         Edit hex (on a color slot)",
        "  r             Refetch the focused stage",
        "  ?             Toggle help",
        "  q             Quit",
        "",
        "Location End is offered for Pass and Carry only.",
        "",
        "Data: StatsBomb open data.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

fn to_tui_color(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}
