//! UI renderer implementation.
//!
//! Contains the top-level [render] entry point used by the terminal loop and the layout
//! helper that splits the screen into header, listing, status and footer rows.
//!
//! This module should stay mostly "pure rendering": it reads state and config and produces
//! widgets. The only state it writes is the scroll offset and page size, since both depend
//! on the height of the listing area.

use crate::app::AppState;
use crate::config::Theme;
use crate::core::formatter::{format_file_size, format_file_time, sanitize_to_exact_width};
use crate::core::Entry;
use crate::ui::widgets;
use crate::utils::shorten_home_path;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

const MARK_WIDTH: usize = 2;
const SIZE_WIDTH: usize = 10;
const TIME_WIDTH: usize = 12;
const PERMS_WIDTH: usize = 10;
const OWNER_WIDTH: usize = 16;
/// Names never get narrower than this, columns are dropped first.
const MIN_NAME_WIDTH: usize = 12;

const FOOTER: &str = concat!(
    "j/k move  l open  h back  space mark  c/x/p copy/cut/paste  ",
    "d delete  r rename  n new  f filter  m help  q quit"
);

/// Splits `area` into header, listing, status and footer rows.
pub fn layout_chunks(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

/// Render function which renders the entire terminal UI for sgt on each frame.
pub fn render(frame: &mut Frame, app: &mut AppState) {
    let [header, list, status, footer] = layout_chunks(frame.area());

    let rows = list.height as usize;
    app.set_page_size(rows);
    app.nav_mut().update_scroll(rows);

    let app: &AppState = app;
    let theme = app.config().theme();

    frame.render_widget(Paragraph::new(header_line(app, theme)), header);
    draw_listing(frame, app, list);
    frame.render_widget(Paragraph::new(status_line(app, theme)), status);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(FOOTER, theme.path_style()))),
        footer,
    );

    widgets::draw_dialogs(frame, app);
}

fn header_line<'a>(app: &'a AppState, theme: &Theme) -> Line<'a> {
    let mut spans = vec![
        Span::styled("sgt ", theme.header_style()),
        Span::styled(shorten_home_path(app.nav().current_dir()), theme.path_style()),
    ];
    if let Some(branch) = app.git_branch() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("({branch})"), theme.git_branch_style()));
    }
    Line::from(spans)
}

fn status_line<'a>(app: &'a AppState, theme: &Theme) -> Line<'a> {
    if let Some(message) = app.message() {
        return Line::from(Span::styled(message, theme.header_style()));
    }

    let nav = app.nav();
    let mut parts = vec![format!(
        "{}/{}",
        nav.selected_idx() + 1,
        nav.items().len()
    )];
    if !nav.markers().is_empty() {
        parts.push(format!("{} marked", nav.markers().len()));
    }
    if let Some(clipboard) = app.clipboard() {
        let verb = if clipboard.is_cut() { "cut" } else { "copied" };
        parts.push(format!("{} {verb}", clipboard.len()));
    }
    if !nav.filter().is_empty() {
        parts.push(format!("filter: {}", nav.filter()));
    }
    Line::from(Span::styled(parts.join("  |  "), theme.path_style()))
}

fn draw_listing(frame: &mut Frame, app: &AppState, area: Rect) {
    let nav = app.nav();
    let theme = app.config().theme();
    let width = area.width as usize;

    let lines: Vec<Line> = nav
        .items()
        .iter()
        .enumerate()
        .skip(nav.scroll())
        .take(area.height as usize)
        .map(|(idx, entry)| {
            let row = RowStyle {
                selected: idx == nav.selected_idx(),
                marked: nav.is_marked(entry.path()),
            };
            entry_line(entry, theme, row, app.show_ownership(), width)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RowStyle {
    pub selected: bool,
    pub marked: bool,
}

/// Builds one listing row: mark, name, then size, time and (optionally) ownership columns.
///
/// Columns that do not fit next to a name of [MIN_NAME_WIDTH] are left out, from the
/// right.
pub fn entry_line(
    entry: &Entry,
    theme: &Theme,
    row: RowStyle,
    show_ownership: bool,
    width: usize,
) -> Line<'static> {
    let meta = entry.metadata();

    let mut columns: Vec<String> = Vec::new();
    if !entry.is_parent() {
        columns.push(format!(
            "{:>SIZE_WIDTH$}",
            format_file_size(meta.map(|m| m.size()), entry.is_dir())
        ));
        columns.push(format!(
            "{:>TIME_WIDTH$}",
            format_file_time(meta.and_then(|m| m.modified()))
        ));
        if show_ownership {
            let perms = meta.and_then(|m| m.permissions()).unwrap_or("");
            let owner = meta.and_then(|m| m.owner()).unwrap_or("");
            columns.push(format!("{perms:<PERMS_WIDTH$}"));
            columns.push(sanitize_to_exact_width(owner, OWNER_WIDTH));
        }
    }

    let available = width.saturating_sub(MARK_WIDTH);
    while !columns.is_empty() && available < MIN_NAME_WIDTH + columns_width(&columns) {
        columns.pop();
    }
    let name_width = available.saturating_sub(columns_width(&columns));

    let mut name = entry.name_str().into_owned();
    if entry.is_dir() && !entry.is_parent() {
        name.push('/');
    }

    let base = if entry.is_dir() {
        theme.directory_style()
    } else {
        theme.file_style()
    };
    let mark_style = theme.marked_style();
    let (mark, name_style) = if row.marked {
        ("* ", base.patch(mark_style))
    } else {
        ("  ", base)
    };

    let mut spans = vec![
        Span::styled(mark, mark_style),
        Span::styled(sanitize_to_exact_width(&name, name_width), name_style),
    ];
    for column in columns {
        spans.push(Span::raw(" "));
        spans.push(Span::raw(column));
    }

    let line = Line::from(spans);
    if row.selected {
        line.style(theme.selection_style())
    } else {
        line.style(Style::default())
    }
}

fn columns_width(columns: &[String]) -> usize {
    columns.iter().map(|c| c.chars().count() + 1).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileMetadata;
    use std::path::PathBuf;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn row_has_mark_name_and_columns() {
        let entry = Entry::new(
            "notes.txt".into(),
            PathBuf::from("/tmp/notes.txt"),
            FileMetadata::new(false, 2048, None),
        );
        let theme = Theme::default();
        let marked = RowStyle {
            selected: false,
            marked: true,
        };

        let line = entry_line(&entry, &theme, marked, false, 60);
        let rendered = text(&line);
        assert!(rendered.starts_with("* notes.txt"));
        assert!(rendered.contains("KiB"));
        assert_eq!(rendered.chars().count(), 60);
    }

    #[test]
    fn narrow_rows_drop_columns_first() {
        let entry = Entry::new(
            "src".into(),
            PathBuf::from("/tmp/src"),
            FileMetadata::new(true, 0, None),
        );
        let line = entry_line(&entry, &Theme::default(), RowStyle::default(), true, 20);
        let rendered = text(&line);
        assert!(rendered.starts_with("  src/"));
        assert_eq!(rendered.chars().count(), 20);
    }

    #[test]
    fn layout_leaves_room_for_listing() {
        let [header, list, status, footer] = layout_chunks(Rect::new(0, 0, 80, 10));
        assert_eq!(header.height, 1);
        assert_eq!(list.height, 7);
        assert_eq!(status.y, 8);
        assert_eq!(footer.y, 9);
    }
}
