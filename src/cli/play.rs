//! Play command implementation - Interactive TUI game.

// TUI rendering uses intentional casts for layout
#![allow(clippy::needless_pass_by_value, clippy::cast_possible_truncation)]

use super::{load_catalog, resolve_seed, CliError};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kingdom::chronicle::CannedChronicle;
use kingdom::game::{Action, GameState, Outcome, Phase};
use kingdom::{GameConfig, Kingdom, Session};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the objectives cannot be loaded or the TUI fails.
pub(crate) fn execute(
    seed: Option<u64>,
    objectives: Option<PathBuf>,
    speed: u64,
) -> Result<(), CliError> {
    let catalog = load_catalog(objectives.as_deref())?;
    let seed = resolve_seed(seed);

    let config = GameConfig {
        phase_delay: Duration::from_millis(speed),
        ..GameConfig::default()
    };
    let kingdom = Kingdom::new(config, catalog)?;
    let session = Session::new(kingdom, seed).with_chronicle(Arc::new(CannedChronicle::default()));

    run_tui(session)
}

/// App state for the TUI.
struct App {
    session: Session,
    status: Option<String>,
}

impl App {
    fn new(session: Session) -> Self {
        Self {
            session,
            status: None,
        }
    }

    fn act(&mut self, action: Action) {
        let outcome = self.session.act(action, Instant::now());
        self.report(action.to_string(), outcome);
    }

    fn end_phase(&mut self) {
        let outcome = self.session.end_phase(Instant::now());
        self.report("End phase".to_string(), outcome);
    }

    fn report(&mut self, what: String, outcome: Outcome) {
        self.status = match outcome {
            Outcome::Rejected(rejection) => Some(format!("{what}: {rejection}")),
            Outcome::Ignored => Some(format!("{what}: not now")),
            Outcome::Applied | Outcome::Night(_) => None,
        };
    }

    fn restart(&mut self) {
        self.session.restart(Instant::now());
        self.status = Some("A new reign begins.".to_string());
    }
}

fn run_tui(session: Session) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut app = App::new(session);

    loop {
        app.session.poll(Instant::now());

        terminal.draw(|f| ui(f, &app)).map_err(|e| CliError::new(e.to_string()))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(50)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Left | KeyCode::Char('h') => app.act(Action::MoveLeft),
                KeyCode::Right | KeyCode::Char('l') => app.act(Action::MoveRight),
                KeyCode::Char('p') => app.act(Action::HirePeasant),
                KeyCode::Char('a') => app.act(Action::TrainArcher),
                KeyCode::Char('w') => app.act(Action::BuildWall),
                KeyCode::Char('f') => app.act(Action::BuildFarm),
                KeyCode::Enter | KeyCode::Char(' ' | 'e') => app.end_phase(),
                KeyCode::Char('r') => app.restart(),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(6), // Board
            Constraint::Min(8),    // Log and objectives
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_board(f, chunks[1], app.session.state());

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[2]);

    render_log(f, lower[0], app.session.state());
    render_objectives(f, lower[1], app);
    render_footer(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();

    let status = if state.game_over {
        "FALLEN".to_string()
    } else {
        match app.session.remaining(Instant::now()) {
            Some(left) => format!("{} in {:.1}s", state.phase, left.as_secs_f64()),
            None => state.phase.to_string(),
        }
    };

    let title = format!(
        " Kingdom | Day {} | {} | Coins: {} | Peasants: {} | Actions: {} ",
        state.day, status, state.coins, state.peasants, state.actions_left
    );

    let color = if state.game_over { Color::Red } else { Color::Cyan };
    let header = Paragraph::new(title)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_board(f: &mut Frame, area: Rect, state: &GameState) {
    let mut marker = Vec::with_capacity(state.world.len());
    let mut ground = Vec::with_capacity(state.world.len());
    let mut defense = Vec::with_capacity(state.world.len());

    for (i, tile) in state.world.iter() {
        let player = if i == state.player_pos { " @ " } else { "   " };
        marker.push(Span::styled(player, Style::default().fg(Color::Yellow)));

        let (glyph, color) = if state.enemies.iter().any(|e| e.position == i) {
            (" G ", Color::Red)
        } else if i == state.crown_pos {
            (" K ", Color::Yellow)
        } else if tile.is_farm() {
            (" F ", Color::Green)
        } else {
            (" . ", Color::DarkGray)
        };
        ground.push(Span::styled(glyph, Style::default().fg(color)));

        let guard = match (tile.wall_level > 0, tile.archer_count()) {
            (true, 0) => " # ".to_string(),
            (false, 0) => "   ".to_string(),
            (true, n) => format!("#A{}", n.min(9)),
            (false, n) => format!(" A{}", n.min(9)),
        };
        defense.push(Span::styled(guard, Style::default().fg(Color::Gray)));
    }

    let lines = vec![Line::from(marker), Line::from(ground), Line::from(defense)];
    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Realm "));

    f.render_widget(board, area);
}

fn render_log(f: &mut Frame, area: Rect, state: &GameState) {
    let visible = (area.height as usize).saturating_sub(2);
    let lines: Vec<Line> = state
        .event_log
        .iter()
        .take(visible)
        .map(|entry| Line::from(entry.to_string()))
        .collect();

    let log = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Chronicle "))
        .wrap(Wrap { trim: false });

    f.render_widget(log, area);
}

fn render_objectives(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .session
        .kingdom()
        .objectives()
        .iter()
        .map(|objective| {
            if objective.completed {
                Line::from(Span::styled(
                    format!("[x] {}", objective.description),
                    Style::default().fg(Color::Green),
                ))
            } else {
                Line::from(format!("[ ] {}", objective.description))
            }
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Objectives "))
        .wrap(Wrap { trim: false });

    f.render_widget(widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();
    let controls = if let Some(status) = &app.status {
        format!(" {status} ")
    } else if state.game_over {
        " [r] Restart  [q] Quit ".to_string()
    } else {
        match state.phase {
            Phase::Player => {
                " [←/→] Move  [p] Hire peasant  [a] Train archer  [Enter] End phase  [r] Restart  [q] Quit "
                    .to_string()
            }
            Phase::Build => {
                " [w] Build wall  [f] Build farm  [Enter] End phase  [r] Restart  [q] Quit ".to_string()
            }
            Phase::Enemy | Phase::Income => " The realm holds its breath...  [r] Restart  [q] Quit ".to_string(),
        }
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
