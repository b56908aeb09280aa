//! UI-related tests for sgt
//!
//! These tests render full frames into ratatui's TestBackend and check what ends up on
//! screen: header, listing, status line and dialogs.
//!
//! These tests may create temporary directories and files to simulate different UI scenarios.
//! These temporary resources are automatically cleaned up after the tests complete.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use sgt::app::AppState;
use sgt::config::Config;
use sgt::core::{self, History, Session};
use sgt::ui;

use std::fs::{self, File};
use tempfile::tempdir;

fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

fn press(app: &mut AppState, c: char) {
    app.handle_keypress(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
}

#[test]
fn test_ui_sanitization_and_exact_width() {
    let cases = ["short.txt", "very_long_filename.txt", "🦀_crab.rs", "\t_tab"];

    for input in cases {
        let result = core::sanitize_to_exact_width(input, 10);
        let actual_width = unicode_width::UnicodeWidthStr::width(result.as_str());

        assert_eq!(actual_width, 10, "wrong width for {input:?}: {result:?}");
        assert!(
            !result.chars().any(|c| c.is_control()),
            "Result contains control characters: {:?}",
            result
        );
    }
}

#[test]
fn frame_shows_listing_and_status() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("projects"))?;
    File::create(dir.path().join("notes.txt"))?;

    let config = Config::default();
    let mut app = AppState::new(&config, dir.path(), History::in_memory(5), Session::new(None))?;
    let mut terminal = Terminal::new(TestBackend::new(80, 12))?;

    press(&mut app, 'j');
    press(&mut app, ' ');
    terminal.draw(|f| ui::render(f, &mut app))?;
    let lines = screen(&terminal);

    assert!(lines[0].starts_with("sgt "));
    assert!(lines[1].starts_with("  .."));
    assert!(lines[2].starts_with("* projects/"));
    assert!(lines[3].starts_with("  notes.txt"));
    assert!(lines[10].contains("1 marked"), "status line was {:?}", lines[10]);
    Ok(())
}

#[test]
fn scroll_follows_selection() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    for i in 0..30 {
        File::create(dir.path().join(format!("file_{i:02}")))?;
    }

    let config = Config::default();
    let mut app = AppState::new(&config, dir.path(), History::in_memory(5), Session::new(None))?;
    let mut terminal = Terminal::new(TestBackend::new(60, 10))?;

    press(&mut app, 'G');
    terminal.draw(|f| ui::render(f, &mut app))?;
    let lines = screen(&terminal);

    // 7 listing rows, the last one is the selected entry.
    assert!(lines[7].starts_with("  file_29"), "got {:?}", lines[7]);
    assert_eq!(app.nav().scroll(), 31 - 7);
    Ok(())
}

#[test]
fn delete_confirmation_dialog() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("victim.txt"))?;

    let config = Config::default();
    let mut app = AppState::new(&config, dir.path(), History::in_memory(5), Session::new(None))?;
    let mut terminal = Terminal::new(TestBackend::new(80, 20))?;

    press(&mut app, 'j');
    press(&mut app, ' ');
    press(&mut app, 'd');
    terminal.draw(|f| ui::render(f, &mut app))?;
    let text = screen(&terminal).join("\n");

    assert!(text.contains("Confirm Delete"));
    assert!(text.contains("Delete 1 item(s)? [y/N]"));
    assert!(text.contains("- victim.txt"));
    Ok(())
}
