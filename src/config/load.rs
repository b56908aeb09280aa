//! The main config loading module for sgt.
//!
//! Handles loading and deserializing settings from `sgt.toml`.
//!
//! [RawConfig] is what serde reads; [Config] is the processed form handed to the rest of
//! the program. A missing file means defaults.

use crate::config::{Editor, General, InternalGeneral, Keys, Theme};
use crate::error::{Result, SgtError};
use crate::utils::expand_home_path;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Raw configuration as read from the toml file
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    theme: Theme,
    editor: Editor,
    keys: Keys,
    bookmarks: BTreeMap<String, String>,
}

/// A named directory shortcut from the `[bookmarks]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    name: String,
    path: PathBuf,
}

impl Bookmark {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Main configuration struct for sgt
#[derive(Debug, Clone)]
pub struct Config {
    general: InternalGeneral,
    theme: Theme,
    editor: Editor,
    keys: Keys,
    bookmarks: Vec<Bookmark>,
}

/// Conversion from RawConfig to Config
impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let bookmarks = raw
            .bookmarks
            .into_iter()
            .filter(|(_, path)| !path.trim().is_empty())
            .map(|(name, path)| Bookmark {
                name,
                path: expand_home_path(&path),
            })
            .collect();

        Self {
            general: InternalGeneral::from(raw.general),
            theme: raw.theme,
            editor: raw.editor,
            keys: raw.keys,
            bookmarks,
        }
    }
}

/// Default configuration options
impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

impl Config {
    /// Loads the configuration from [Config::default_path].
    ///
    /// Read or parse failures are logged and fall back to the defaults.
    pub fn load() -> Self {
        let path = Self::default_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default config");
                Self::default()
            }
        }
    }

    /// Loads the configuration at `path`. A missing file yields the defaults.
    ///
    /// # Errors
    /// [SgtError::ConfigIo] when the file exists but cannot be read, and
    /// [SgtError::Config] when it is not valid toml for sgt.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SgtError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let raw: RawConfig = toml::from_str(&content)?;
        Ok(raw.into())
    }

    /// Returns this config with every theme color removed.
    pub fn without_colors(mut self) -> Self {
        self.theme = Theme::plain();
        self
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[inline]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    #[inline]
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    #[inline]
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Determine the default configuration file path.
    /// Checks the SGT_CONFIG environment variable first,
    /// Checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/sgt/sgt.toml,
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("SGT_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("sgt/sgt.toml");
        }

        if let Some(home) = dirs::home_dir() {
            return home.join(".config/sgt/sgt.toml");
        }
        PathBuf::from("sgt.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {}", path.display()),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
        println!("Default config generated at {}", path.display());
        Ok(())
    }
}

const DEFAULT_CONFIG: &str = r##"# sgt.toml - default configuration for sgt
#
# Commented values are the internal defaults.
# Colors are terminal color names ("cyan") or hex codes ("#RRGGBB").

[general]
# show_ownership = false     # show owner and permission columns
# restore_session = false    # start in the directory of the last run
# cache_ttl_ms = 5000        # how long a stat result stays valid
# cache_capacity = 5000      # cached paths (16 to 1000000)
# history_size = 50          # remembered directories (1 to 1000)

[theme]
# directories = "cyan"
# files = "white"
# selected_fg = "black"
# selected_bg = "cyan"
# header = "yellow"
# path = "green"
# git_branch = "magenta"
# marked = "yellow"

[bookmarks]
# home = "~"
# projects = "~/projects"

[editor]
# cmd = "nvim"               # otherwise $EDITOR, $VISUAL, nvim, nano, vim, vi

# [keys]
# go_up = ["k", "Up"]
# go_down = ["j", "Down"]
# go_into_dir = ["l", "Right", "Enter"]
# go_parent = ["h", "Left"]
# page_up = ["PageUp"]
# page_down = ["PageDown"]
# go_to_top = ["g", "Home"]
# go_to_bottom = ["G", "End"]
# toggle_marker = ["Space"]
# unmark_all = ["u"]
# copy = ["c"]
# cut = ["x"]
# paste = ["p"]
# delete = ["d"]
# rename = ["r"]
# create = ["n"]
# filter = ["f"]
# toggle_ownership = ["o"]
# refresh = ["R"]
# bookmarks = ["b"]
# history = ["H"]
# edit = ["e"]
# view = ["v"]
# search = ["/"]
# shell = [":"]
# help = ["m"]
# quit = ["q", "Esc"]
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = Config::load_from(&dir.path().join("absent.toml"))?;
        assert!(config.bookmarks().is_empty());
        assert_eq!(config.general().history_size(), 50);
        Ok(())
    }

    #[test]
    fn generated_default_parses() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/sgt.toml");
        Config::generate_default(&path)?;
        let config = Config::load_from(&path)?;
        assert_eq!(config.theme(), &Theme::default());
        assert!(Config::generate_default(&path).is_err());
        Ok(())
    }

    #[test]
    fn bookmarks_expand_home() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("sgt.toml");
        fs::write(
            &path,
            "[bookmarks]\nroot = \"/\"\nhome = \"~\"\nempty = \"  \"\n",
        )?;

        let config = Config::load_from(&path)?;
        let names: Vec<&str> = config.bookmarks().iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["home", "root"]);
        assert_eq!(config.bookmarks()[1].path(), Path::new("/"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.bookmarks()[0].path(), home.as_path());
        }
        Ok(())
    }

    #[test]
    fn invalid_toml_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("sgt.toml");
        fs::write(&path, "[general\nshow_ownership = maybe")?;
        assert!(matches!(Config::load_from(&path), Err(SgtError::Config(_))));
        Ok(())
    }
}
