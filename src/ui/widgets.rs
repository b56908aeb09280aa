//! Dialog widgets for sgt.
//!
//! Every dialog is a bordered box centered over the listing. The area below is cleared
//! first, so a dialog never blends with the rows it covers.

use crate::app::AppState;
use crate::app::actions::{ActionMode, Picker, PickerKind};
use crate::core::formatter::truncate_left;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use std::ffi::OsStr;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// Lines of the key reference shown by the help dialog.
const HELP_LINES: &[(&str, &str)] = &[
    ("j / k", "move down / up"),
    ("l / Enter", "open directory, view file"),
    ("h", "parent directory"),
    ("g / G", "first / last entry"),
    ("PageUp / PageDown", "move one page"),
    ("Space", "mark and move down"),
    ("u", "unmark all"),
    ("c / x / p", "copy / cut / paste marked"),
    ("d", "delete marked"),
    ("r", "rename"),
    ("n", "new file (f) or directory (d)"),
    ("f", "filter the listing"),
    ("o", "toggle ownership columns"),
    ("R", "refresh"),
    ("b / H", "bookmarks / history"),
    ("e / v", "edit / view file"),
    ("/", "search with fzf"),
    (":", "run a shell command here"),
    ("q", "quit and print the directory"),
];

/// Returns a `width` x `height` rectangle centered in `area`, clamped to it.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn dialog_block(title: &str, border: Style) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Span::styled(format!(" {title} "), border))
}

fn draw_box(frame: &mut Frame, area: Rect, title: &str, border: Style, text: Text) {
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(dialog_block(title, border)), area);
}

/// Draws whichever dialog the current mode asks for.
pub fn draw_dialogs(frame: &mut Frame, app: &AppState) {
    let accent = app.config().theme().header_style();
    match app.actions().mode() {
        ActionMode::Normal => {}
        ActionMode::Input { prompt, .. } => draw_input(frame, app, prompt, accent),
        ActionMode::ChooseCreateKind => {
            let area = centered_rect(frame.area(), 36, 3);
            draw_box(
                frame,
                area,
                "Create",
                accent,
                Text::from("[f]ile or [d]irectory?"),
            );
        }
        ActionMode::ConfirmDelete { count } => draw_confirm_delete(frame, app, *count),
        ActionMode::Picker(picker) => draw_picker(frame, picker, accent),
        ActionMode::Help => draw_help(frame, accent),
    }
}

/// Draws a one-line text input and places the terminal cursor on the insert position.
fn draw_input(frame: &mut Frame, app: &AppState, prompt: &str, accent: Style) {
    let area = centered_rect(frame.area(), 60, 3);
    let inner_width = area.width.saturating_sub(2) as usize;

    let buffer = app.actions().input_buffer();
    let cursor = app.actions().input_cursor_pos();
    let before_cursor = buffer[..cursor].width();

    // Keep the cursor visible by scrolling long input horizontally.
    let offset = before_cursor.saturating_sub(inner_width.saturating_sub(1));
    let paragraph = Paragraph::new(buffer)
        .scroll((0, offset as u16))
        .block(dialog_block(prompt.trim_end_matches(':'), accent));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
    frame.set_cursor_position((
        area.x + 1 + (before_cursor - offset) as u16,
        area.y + 1,
    ));
}

fn draw_confirm_delete(frame: &mut Frame, app: &AppState, count: usize) {
    let danger = Style::default().fg(Color::Red);
    let mut names: Vec<String> = app
        .nav()
        .marked_paths()
        .iter()
        .map(|p| p.file_name().unwrap_or(p.as_os_str()).to_string_lossy().into_owned())
        .collect();
    names.sort();

    let area = centered_rect(frame.area(), 50, (names.len() as u16).min(10) + 4);
    let mut lines = vec![Line::from(Span::styled(
        format!("Delete {count} item(s)? [y/N]"),
        danger.add_modifier(Modifier::BOLD),
    ))];
    let room = area.height.saturating_sub(3) as usize;
    for name in names.iter().take(room) {
        lines.push(Line::raw(format!("  - {name}")));
    }
    if names.len() > room {
        lines.push(Line::raw(format!("  ... and {} more", names.len() - room)));
    }

    draw_box(frame, area, "Confirm Delete", danger, Text::from(lines));
}

fn draw_picker(frame: &mut Frame, picker: &Picker, accent: Style) {
    let title = match picker.kind() {
        PickerKind::Bookmarks => "Bookmarks",
        PickerKind::History => "History",
    };
    let height = (picker.items().len() as u16).min(20) + 2;
    let area = centered_rect(frame.area(), 70, height);
    let inner_width = area.width.saturating_sub(8) as usize;

    // Scroll so the selected row stays inside the box.
    let visible = height.saturating_sub(2) as usize;
    let first = picker.selected().saturating_sub(visible.saturating_sub(1));

    let lines: Vec<Line> = picker
        .items()
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(idx, (label, path))| {
            let number = if idx < 9 {
                format!("{} ", idx + 1)
            } else {
                "  ".to_string()
            };
            let text = if picker.kind() == PickerKind::Bookmarks {
                format!("{label}  {}", path.display())
            } else {
                label.clone()
            };
            let line = format!("{number}{}", truncate_left(&text, inner_width));
            if idx == picker.selected() {
                Line::from(Span::styled(line, Style::default().add_modifier(Modifier::REVERSED)))
            } else {
                Line::raw(line)
            }
        })
        .collect();

    draw_box(frame, area, title, accent, Text::from(lines));
}

fn draw_help(frame: &mut Frame, accent: Style) {
    let area = centered_rect(frame.area(), 56, HELP_LINES.len() as u16 + 2);
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:>18}  "), accent),
                Span::raw(*what),
            ])
        })
        .collect();
    draw_box(frame, area, "Keys", accent, Text::from(lines));
}

/// Draws the name conflict question asked while pasting.
pub fn draw_conflict_prompt(frame: &mut Frame, name: &OsStr, dest: &Path) {
    let warn = Style::default().fg(Color::Yellow);
    let area = centered_rect(frame.area(), 60, 6);
    let inner_width = area.width.saturating_sub(2) as usize;
    let text = Text::from(vec![
        Line::raw(format!("'{}' already exists in", name.to_string_lossy())),
        Line::raw(truncate_left(&dest.display().to_string(), inner_width)),
        Line::raw(""),
        Line::from(Span::styled("[s]kip  [o]verwrite  [r]ename", warn)),
    ]);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(dialog_block("Conflict", warn)),
        area,
    );
}
