//! Terminal rendering and event loop for sgt.
//!
//! Handles setup/teardown of raw mode, alternate screen, redraws,
//! and events (keypress, resize) to app logic.
//!
//! Work that needs the terminal itself is done here: paste asks about name conflicts with
//! a blocking prompt, and editor/viewer/search hand the terminal to an external program.

use crate::app::{AppState, Command, KeypressResult};
use crate::core::ops::{ConflictResolver, Resolution};
use crate::core::proc;
use crate::ui;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::{io, time::Duration};

/// Initializes the terminal in raw mode and alternate screen and runs the main event loop.
///
/// The UI is drawn on stderr, leaving stdout to the directory printed on exit.
/// Blocks until quit and returns the directory sgt was in, for the caller to print once
/// the terminal is restored.
///
/// Returns an std::io::Error if terminal setup or teardown fails.
pub fn run_terminal(app: &mut AppState) -> io::Result<PathBuf> {
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr))?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    result.map(|()| app.nav().current_dir().to_path_buf())
}

/// Main event loop of sgt: draws UI, polls for events and dispatches them to the app.
/// Returns on quit
fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    let mut dirty = true;
    loop {
        dirty |= app.refresh_if_needed();
        if dirty {
            terminal.draw(|f| ui::render(f, app))?;
            dirty = false;
        }

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match app.handle_keypress(key) {
                    KeypressResult::Quit => break,
                    KeypressResult::Paste => {
                        let mut resolver = PromptResolver { terminal };
                        app.apply(Command::Paste, &mut resolver);
                    }
                    KeypressResult::Preview(path) => {
                        let result = proc::view(&path);
                        resume(terminal, app, result)?;
                    }
                    KeypressResult::Edit(path) => {
                        let result = proc::edit(app.config().editor(), &path);
                        resume(terminal, app, result)?;
                    }
                    KeypressResult::Search => {
                        let dir = app.nav().current_dir().to_path_buf();
                        match proc::search(&dir) {
                            Ok(choice) => {
                                resume(terminal, app, Ok(()))?;
                                if let Some(path) = choice {
                                    app.apply(Command::GoTo(path), &mut Resolution::Skip);
                                }
                            }
                            Err(e) => resume(terminal, app, Err(e))?,
                        }
                    }
                    KeypressResult::Shell(line) => {
                        let dir = app.nav().current_dir().to_path_buf();
                        let result = proc::run_shell(&line, &dir).map(|status| {
                            if !status.success() {
                                app.set_message(format!("Command failed: {status}"));
                            }
                        });
                        resume(terminal, app, result)?;
                    }
                    KeypressResult::Continue | KeypressResult::Consumed => {}
                }
                dirty = true;
            }

            Event::Resize(_, _) => dirty = true,

            _ => {}
        }
    }
    Ok(())
}

/// Re-entry after an external program: full clear, forced refresh and the error, if any,
/// as the status message.
fn resume<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    result: io::Result<()>,
) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    terminal.clear()?;
    app.after_external();
    if let Err(e) = result {
        tracing::warn!(error = %e, "external program failed");
        app.set_message(e.to_string());
    }
    Ok(())
}

/// Asks about each paste conflict with a popup and waits for `s`, `o` or `r`.
///
/// Esc, and any terminal failure while asking, skips the item.
struct PromptResolver<'t, B: Backend> {
    terminal: &'t mut Terminal<B>,
}

impl<B: Backend> ConflictResolver for PromptResolver<'_, B> {
    fn resolve(&mut self, name: &OsStr, dest: &Path) -> Resolution {
        if self
            .terminal
            .draw(|f| ui::widgets::draw_conflict_prompt(f, name, dest))
            .is_err()
        {
            tracing::warn!("failed to draw conflict prompt, skipping");
            return Resolution::Skip;
        }

        loop {
            let key = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read conflict answer, skipping");
                    return Resolution::Skip;
                }
            };
            match key.code {
                KeyCode::Char('s') | KeyCode::Esc => return Resolution::Skip,
                KeyCode::Char('o') => return Resolution::Overwrite,
                KeyCode::Char('r') => return Resolution::Rename,
                _ => {}
            }
        }
    }
}
