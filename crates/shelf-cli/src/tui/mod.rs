//! Terminal user interface (TUI) for shelf.
//!
//! ## Views
//!
//! - Search: Title/Author/ISBN inputs, a results table, and a status line.
//! - Library: the saved catalog.
//!
//! The fetch runs on the UI thread; the screen is redrawn with a
//! "Searching…" status before the request blocks.

pub mod app;
pub mod form;
pub mod render;

use crate::context::Context;
use anyhow::{Context as _, Result};
use app::{Action, App};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Puts the terminal back on drop, including on early return and panic
/// unwinding.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err).context("enter alternate screen");
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

/// Run the interactive UI until the user quits.
///
/// # Errors
///
/// Returns an error if the catalog cannot be opened or the terminal fails.
pub fn run(ctx: &Context) -> Result<()> {
    let conn = ctx.open_catalog()?;
    let mut app = App::new(Box::new(ctx.client()), conn);
    tracing::info!(db = %ctx.db_path.display(), "tui started");

    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout())).context("create terminal")?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut app);
    tracing::info!(ok = result.is_ok(), "tui stopped");
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| render::draw(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::Search => {
                app.begin_search();
                terminal.draw(|frame| render::draw(frame, app))?;
                app.run_search();
            }
        }
    }
}
