// Input handling module for keyboard commands and key parsing
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::config::default_keybindings;

/// Represents a parsed key from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKey {
    /// Single character key, matched exactly ("G" is not "g")
    Simple(char),
    /// Control + character combination
    Ctrl(char),
}

impl ActionKey {
    /// Parse a key string from YAML configuration
    ///
    /// Supports formats:
    /// - Single char: "d", "e", "G"
    /// - The word "space"
    /// - Ctrl combination: "ctrl+e", "Ctrl+E", "CTRL+E" (case insensitive)
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() {
            return Err("Key cannot be empty".to_string());
        }

        if s.eq_ignore_ascii_case("space") {
            return Ok(ActionKey::Simple(' '));
        }

        // Check for ctrl+ prefix (case insensitive)
        if let Some(stripped) = s.to_lowercase().strip_prefix("ctrl+") {
            let mut chars = stripped.chars();
            return match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii_alphanumeric() => Ok(ActionKey::Ctrl(ch)),
                (Some(_), None) => Err(format!(
                    "Invalid Ctrl combination '{}': character must be alphanumeric",
                    s
                )),
                _ => Err(format!(
                    "Invalid Ctrl combination '{}': expected single character after 'ctrl+'",
                    s
                )),
            };
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ActionKey::Simple(ch)),
            _ => Err(format!(
                "Invalid key format '{}': expected single character, 'space' or 'ctrl+X'",
                s
            )),
        }
    }

    /// Check if a KeyEvent matches this ActionKey
    pub fn matches(&self, key: &KeyEvent) -> bool {
        match self {
            ActionKey::Simple(ch) => {
                matches!(key.code, KeyCode::Char(c) if c == *ch)
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            }
            ActionKey::Ctrl(ch) => {
                matches!(key.code, KeyCode::Char(c) if c.to_ascii_lowercase() == *ch)
                    && key.modifiers.contains(KeyModifiers::CONTROL)
            }
        }
    }

    /// Format the key for display in UI
    pub fn display(&self) -> String {
        match self {
            ActionKey::Simple(' ') => "Space".to_string(),
            ActionKey::Simple(ch) => ch.to_string(),
            ActionKey::Ctrl(ch) => format!("Ctrl+{}", ch.to_ascii_uppercase()),
        }
    }
}

/// What a key press asks the table view to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Quit,
    Search,
    Down,
    Up,
    Top,
    Bottom,
    ToggleRow,
    ToggleAll,
    SelectAll,
    Delete,
    Export,
}

impl Command {
    pub const ALL: [Command; 11] = [
        Command::Quit,
        Command::Search,
        Command::Down,
        Command::Up,
        Command::Top,
        Command::Bottom,
        Command::ToggleRow,
        Command::ToggleAll,
        Command::SelectAll,
        Command::Delete,
        Command::Export,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Quit => "quit",
            Command::Search => "search",
            Command::Down => "down",
            Command::Up => "up",
            Command::Top => "top",
            Command::Bottom => "bottom",
            Command::ToggleRow => "toggle_row",
            Command::ToggleAll => "toggle_all",
            Command::SelectAll => "select_all",
            Command::Delete => "delete",
            Command::Export => "export",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|cmd| cmd.name() == name)
    }
}

/// Resolved key -> command table
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(ActionKey, Command)>,
}

impl KeyMap {
    /// Default bindings with the configured overrides applied
    pub fn from_overrides(overrides: &HashMap<String, String>) -> Result<Self, String> {
        let mut merged = default_keybindings();
        for (name, key) in overrides {
            if Command::from_name(name).is_none() {
                return Err(format!("Unknown command '{}'", name));
            }
            merged.insert(name.clone(), key.clone());
        }

        let mut bindings: Vec<(ActionKey, Command)> = Vec::with_capacity(merged.len());
        for cmd in Command::ALL {
            let Some(raw) = merged.get(cmd.name()) else {
                continue;
            };
            let key = ActionKey::parse(raw).map_err(|e| format!("{}: {}", cmd.name(), e))?;

            if let Some((_, other)) = bindings.iter().find(|(k, _)| *k == key) {
                return Err(format!(
                    "Key '{}' is bound to both '{}' and '{}'",
                    key.display(),
                    other.name(),
                    cmd.name()
                ));
            }
            bindings.push((key, cmd));
        }

        Ok(Self { bindings })
    }

    /// Map a key press to a command. Arrow keys always navigate.
    pub fn resolve(&self, key: &KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Down => return Some(Command::Down),
            KeyCode::Up => return Some(Command::Up),
            KeyCode::Home => return Some(Command::Top),
            KeyCode::End => return Some(Command::Bottom),
            _ => {}
        }

        self.bindings
            .iter()
            .find(|(k, _)| k.matches(key))
            .map(|(_, cmd)| *cmd)
    }

    /// Display string of the key bound to `cmd`, for the status bar
    pub fn hint(&self, cmd: Command) -> String {
        self.bindings
            .iter()
            .find(|(_, c)| *c == cmd)
            .map(|(k, _)| k.display())
            .unwrap_or_else(|| "-".to_string())
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_overrides(&HashMap::new()).expect("default keybindings are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(ActionKey::parse("d").unwrap(), ActionKey::Simple('d'));
        assert_eq!(ActionKey::parse("G").unwrap(), ActionKey::Simple('G'));
        assert_eq!(ActionKey::parse("/").unwrap(), ActionKey::Simple('/'));
        assert_eq!(ActionKey::parse("space").unwrap(), ActionKey::Simple(' '));
        assert_eq!(ActionKey::parse("Space").unwrap(), ActionKey::Simple(' '));
    }

    #[test]
    fn test_parse_ctrl() {
        assert_eq!(ActionKey::parse("ctrl+e").unwrap(), ActionKey::Ctrl('e'));
        assert_eq!(ActionKey::parse("Ctrl+E").unwrap(), ActionKey::Ctrl('e'));
        assert_eq!(ActionKey::parse("CTRL+D").unwrap(), ActionKey::Ctrl('d'));
    }

    #[test]
    fn test_parse_errors() {
        assert!(ActionKey::parse("").is_err());
        assert!(ActionKey::parse("ctrl+").is_err());
        assert!(ActionKey::parse("ctrl+ll").is_err());
        assert!(ActionKey::parse("ctrl+/").is_err());
        assert!(ActionKey::parse("invalid").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ActionKey::Simple('d').display(), "d");
        assert_eq!(ActionKey::Simple(' ').display(), "Space");
        assert_eq!(ActionKey::Ctrl('e').display(), "Ctrl+E");
    }

    #[test]
    fn test_matches() {
        let simple_key = ActionKey::Simple('g');
        let upper_key = ActionKey::Simple('G');
        let ctrl_key = ActionKey::Ctrl('e');

        let event = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        assert!(simple_key.matches(&event));
        assert!(!upper_key.matches(&event));

        let event = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert!(upper_key.matches(&event));
        assert!(!simple_key.matches(&event));

        let event = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert!(ctrl_key.matches(&event));
        assert!(!ActionKey::Simple('e').matches(&event));
    }

    #[test]
    fn test_default_keymap_resolves() {
        let keymap = KeyMap::default();
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(keymap.resolve(&press(KeyCode::Char(' '))), Some(Command::ToggleRow));
        assert_eq!(keymap.resolve(&press(KeyCode::Char('d'))), Some(Command::Delete));
        assert_eq!(keymap.resolve(&press(KeyCode::Char('e'))), Some(Command::Export));
        assert_eq!(keymap.resolve(&press(KeyCode::Down)), Some(Command::Down));
        assert_eq!(keymap.resolve(&press(KeyCode::Char('z'))), None);
        assert_eq!(keymap.hint(Command::ToggleRow), "Space");
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("delete".to_string(), "x".to_string());
        let keymap = KeyMap::from_overrides(&overrides).unwrap();

        let press = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(keymap.resolve(&press('x')), Some(Command::Delete));
        assert_eq!(keymap.resolve(&press('d')), None);
    }

    #[test]
    fn test_conflicting_override_is_rejected() {
        let mut overrides = HashMap::new();
        overrides.insert("export".to_string(), "d".to_string());
        let err = KeyMap::from_overrides(&overrides).unwrap_err();
        assert!(err.contains("bound to both"));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let mut overrides = HashMap::new();
        overrides.insert("launch".to_string(), "l".to_string());
        assert!(KeyMap::from_overrides(&overrides).is_err());
    }
}
