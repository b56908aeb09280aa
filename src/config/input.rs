//! Input configuration options for sgt
//!
//! This module defines the `[keys]` and `[editor]` tables of sgt.toml.

use serde::Deserialize;

/// Editors tried in order when neither the config nor the environment names one.
const FALLBACK_EDITORS: &[&str] = &["nvim", "nano", "vim", "vi"];

/// Input configuration options of all actions
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Keys {
    go_up: Vec<String>,
    go_down: Vec<String>,
    go_into_dir: Vec<String>,
    go_parent: Vec<String>,
    page_up: Vec<String>,
    page_down: Vec<String>,
    go_to_top: Vec<String>,
    go_to_bottom: Vec<String>,
    toggle_marker: Vec<String>,
    unmark_all: Vec<String>,
    copy: Vec<String>,
    cut: Vec<String>,
    paste: Vec<String>,
    delete: Vec<String>,
    rename: Vec<String>,
    create: Vec<String>,
    filter: Vec<String>,
    toggle_ownership: Vec<String>,
    refresh: Vec<String>,
    bookmarks: Vec<String>,
    history: Vec<String>,
    edit: Vec<String>,
    view: Vec<String>,
    search: Vec<String>,
    shell: Vec<String>,
    help: Vec<String>,
    quit: Vec<String>,
}

macro_rules! accessor {
    ($($name:ident),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+
        }
    };
}

accessor!(
    go_up,
    go_down,
    go_into_dir,
    go_parent,
    page_up,
    page_down,
    go_to_top,
    go_to_bottom,
    toggle_marker,
    unmark_all,
    copy,
    cut,
    paste,
    delete,
    rename,
    create,
    filter,
    toggle_ownership,
    refresh,
    bookmarks,
    history,
    edit,
    view,
    search,
    shell,
    help,
    quit,
);

/// Default input configuration options
impl Default for Keys {
    fn default() -> Self {
        Keys {
            go_up: vec!["k".into(), "Up".into()],
            go_down: vec!["j".into(), "Down".into()],
            go_into_dir: vec!["l".into(), "Right".into(), "Enter".into()],
            go_parent: vec!["h".into(), "Left".into()],
            page_up: vec!["PageUp".into()],
            page_down: vec!["PageDown".into()],
            go_to_top: vec!["g".into(), "Home".into()],
            go_to_bottom: vec!["G".into(), "End".into()],

            toggle_marker: vec!["Space".into()],
            unmark_all: vec!["u".into()],

            copy: vec!["c".into()],
            cut: vec!["x".into()],
            paste: vec!["p".into()],
            delete: vec!["d".into()],
            rename: vec!["r".into()],
            create: vec!["n".into()],
            filter: vec!["f".into()],

            toggle_ownership: vec!["o".into()],
            refresh: vec!["R".into()],
            bookmarks: vec!["b".into()],
            history: vec!["H".into()],
            edit: vec!["e".into()],
            view: vec!["v".into()],
            search: vec!["/".into()],
            shell: vec![":".into()],
            help: vec!["m".into()],

            quit: vec!["q".into(), "Esc".into()],
        }
    }
}

/// Editor configuration options
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Editor {
    cmd: Option<String>,
}

impl Editor {
    pub fn new(cmd: Option<String>) -> Self {
        Self { cmd }
    }

    /// The editor command to run.
    ///
    /// Order: the configured `cmd`, `$EDITOR`, `$VISUAL`, then the first of nvim, nano, vim
    /// and vi found on the PATH. Falls back to `vi`.
    pub fn cmd(&self) -> String {
        let configured = self
            .cmd
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        configured
            .or_else(|| env_editor("EDITOR"))
            .or_else(|| env_editor("VISUAL"))
            .or_else(|| {
                FALLBACK_EDITORS
                    .iter()
                    .find(|e| which::which(e).is_ok())
                    .map(|e| e.to_string())
            })
            .unwrap_or_else(|| "vi".to_string())
    }
}

fn env_editor(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
