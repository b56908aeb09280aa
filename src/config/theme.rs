//! Theme configuration options for sgt
//!
//! This module defines the `[theme]` table of sgt.toml. Colors are given as terminal color
//! names ("cyan") or hex codes ("#RRGGBB", "#RGB").
//!
//! # Examples
//! ```toml
//! [theme]
//! directories = "blue"
//! selected_bg = "#3c3836"
//! ```

use crate::utils::parse_color;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// Theme configuration options
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "deserialize_color_field")]
    directories: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    files: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    selected_fg: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    selected_bg: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    header: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    path: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    git_branch: Color,
    #[serde(deserialize_with = "deserialize_color_field")]
    marked: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            directories: Color::Cyan,
            files: Color::White,
            selected_fg: Color::Black,
            selected_bg: Color::Cyan,
            header: Color::Yellow,
            path: Color::Green,
            git_branch: Color::Magenta,
            marked: Color::Yellow,
        }
    }
}

impl Theme {
    /// A theme without colors, used for `--no-color`. Selection stays visible through
    /// reversed video.
    pub fn plain() -> Self {
        Theme {
            directories: Color::Reset,
            files: Color::Reset,
            selected_fg: Color::Reset,
            selected_bg: Color::Reset,
            header: Color::Reset,
            path: Color::Reset,
            git_branch: Color::Reset,
            marked: Color::Reset,
        }
    }

    fn is_plain(&self) -> bool {
        self == &Self::plain()
    }

    pub fn directory_style(&self) -> Style {
        Style::default()
            .fg(self.directories)
            .add_modifier(Modifier::BOLD)
    }

    pub fn file_style(&self) -> Style {
        Style::default().fg(self.files)
    }

    pub fn selection_style(&self) -> Style {
        if self.is_plain() {
            return Style::default().add_modifier(Modifier::REVERSED);
        }
        Style::default().fg(self.selected_fg).bg(self.selected_bg)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header).add_modifier(Modifier::BOLD)
    }

    pub fn path_style(&self) -> Style {
        Style::default().fg(self.path)
    }

    pub fn git_branch_style(&self) -> Style {
        Style::default().fg(self.git_branch)
    }

    pub fn marked_style(&self) -> Style {
        Style::default().fg(self.marked).add_modifier(Modifier::BOLD)
    }
}

/// Helper function to deserialize a color from a string.
fn deserialize_color_field<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(parse_color(&s))
}
