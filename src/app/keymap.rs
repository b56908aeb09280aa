//! Key mapping for sgt
//!
//! Maps key events to an [Action] using the key lists from the `[keys]` config table.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Every action a key can be bound to in normal mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    GoUp,
    GoDown,
    GoIntoDir,
    GoParent,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    ToggleMarker,
    UnmarkAll,
    Copy,
    Cut,
    Paste,
    Delete,
    Rename,
    Create,
    Filter,
    ToggleOwnership,
    Refresh,
    Bookmarks,
    History,
    Edit,
    View,
    Search,
    Shell,
    Help,
    Quit,
}

/// Key + modifiers as used in keybind/keymap
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

/// Stores the mapping from Key to action, which is built in the config
#[derive(Debug)]
pub struct Keymap {
    map: HashMap<Key, Action>,
}

impl Keymap {
    /// Builds the keymap from the config
    #[rustfmt::skip]
    pub fn from_config(config: &crate::config::Config) -> Self {
        let mut map = HashMap::new();
        let keys = config.keys();

        macro_rules! bind {
            ($keys:expr, $action:expr) => {
                bind($keys, $action, &mut map);
            };
        }

        use Action as A;

        bind!(keys.go_up(),            A::GoUp);
        bind!(keys.go_down(),          A::GoDown);
        bind!(keys.go_into_dir(),      A::GoIntoDir);
        bind!(keys.go_parent(),        A::GoParent);
        bind!(keys.page_up(),          A::PageUp);
        bind!(keys.page_down(),        A::PageDown);
        bind!(keys.go_to_top(),        A::GoToTop);
        bind!(keys.go_to_bottom(),     A::GoToBottom);
        bind!(keys.toggle_marker(),    A::ToggleMarker);
        bind!(keys.unmark_all(),       A::UnmarkAll);

        bind!(keys.copy(),             A::Copy);
        bind!(keys.cut(),              A::Cut);
        bind!(keys.paste(),            A::Paste);
        bind!(keys.delete(),           A::Delete);
        bind!(keys.rename(),           A::Rename);
        bind!(keys.create(),           A::Create);
        bind!(keys.filter(),           A::Filter);

        bind!(keys.toggle_ownership(), A::ToggleOwnership);
        bind!(keys.refresh(),          A::Refresh);
        bind!(keys.bookmarks(),        A::Bookmarks);
        bind!(keys.history(),          A::History);
        bind!(keys.edit(),             A::Edit);
        bind!(keys.view(),             A::View);
        bind!(keys.search(),           A::Search);
        bind!(keys.shell(),            A::Shell);
        bind!(keys.help(),             A::Help);
        bind!(keys.quit(),             A::Quit);

        Keymap { map }
    }

    /// Looks up the action for a given key event
    pub fn lookup(&self, key: KeyEvent) -> Option<Action> {
        let k = Key {
            code: key.code,
            modifiers: key.modifiers,
        };

        if let Some(action) = self.map.get(&k).copied() {
            return Some(action);
        }

        if matches!(key.code, KeyCode::Char(_)) && key.modifiers.contains(KeyModifiers::SHIFT) {
            let k2 = Key {
                code: key.code,
                modifiers: key.modifiers - KeyModifiers::SHIFT,
            };
            return self.map.get(&k2).copied();
        }
        None
    }
}

/// Parses a key description such as `"k"`, `"Up"`, `"Ctrl+c"`, `"<c-x>"` or `"Shift+h"`.
pub fn parse_key(s: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut code: Option<KeyCode> = None;

    // A lone "+" or "-" is the key itself, not a separator.
    if s == "+" || s == "-" {
        return s.chars().next().map(|c| Key {
            code: KeyCode::Char(c),
            modifiers,
        });
    }

    let is_bracketed = s.starts_with('<') && s.ends_with('>');
    let mut input = s.trim_start_matches('<').trim_end_matches('>').to_string();

    if is_bracketed && input.contains('-') {
        let parts: Vec<&str> = input.split('-').collect();

        for &prefix in parts.iter().take(parts.len().saturating_sub(1)) {
            match prefix.to_lowercase().as_str() {
                "c" | "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "a" | "m" | "alt" => modifiers |= KeyModifiers::ALT,
                "s" | "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        input = parts.last()?.to_string();
    }

    let normalized = input.replace('-', "+");
    for part in normalized.split('+') {
        let p_low = part.to_lowercase();
        match p_low.as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "meta" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,

            "up" => code = Some(KeyCode::Up),
            "down" => code = Some(KeyCode::Down),
            "left" => code = Some(KeyCode::Left),
            "right" => code = Some(KeyCode::Right),
            "enter" => code = Some(KeyCode::Enter),
            "esc" => code = Some(KeyCode::Esc),
            "backspace" | "back" => code = Some(KeyCode::Backspace),
            "tab" => code = Some(KeyCode::Tab),
            "space" | "spc" => code = Some(KeyCode::Char(' ')),
            "pageup" | "pgup" => code = Some(KeyCode::PageUp),
            "pagedown" | "pgdn" => code = Some(KeyCode::PageDown),
            "home" => code = Some(KeyCode::Home),
            "end" => code = Some(KeyCode::End),

            _ => {
                if part.chars().count() == 1 {
                    let mut c = part.chars().next()?;
                    if modifiers.contains(KeyModifiers::SHIFT) {
                        c = c.to_ascii_uppercase();
                    }
                    code = Some(KeyCode::Char(c));
                } else if p_low.starts_with('f')
                    && p_low.len() > 1
                    && p_low[1..].chars().all(|c| c.is_ascii_digit())
                {
                    let n = p_low[1..].parse().ok()?;
                    code = Some(KeyCode::F(n));
                } else if part.is_empty() {
                    continue;
                } else {
                    return None;
                }
            }
        }
    }

    Some(Key {
        code: code?,
        modifiers,
    })
}

fn bind(key_list: &[String], action: Action, map: &mut HashMap<Key, Action>) {
    for k in key_list {
        match parse_key(k) {
            Some(key) => {
                map.insert(key, action);
            }
            None => tracing::warn!(key = %k, ?action, "ignoring unparsable key binding"),
        }
    }
}
