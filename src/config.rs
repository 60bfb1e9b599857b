//! User configuration — keybindings and drift tuning, persisted as a
//! simple key-value text file at `$XDG_CONFIG_HOME/drift/config.toml`
//! (default `~/.config/drift/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::autoscroll::DriftTuning;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    HalfPageUp,
    HalfPageDown,
    PageUp,
    PageDown,
    GotoTop,
    GotoBottom,
    StartDrift,
    StopDrift,
    ToggleHelp,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help overlay).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::HalfPageUp,
        Action::HalfPageDown,
        Action::PageUp,
        Action::PageDown,
        Action::GotoTop,
        Action::GotoBottom,
        Action::StartDrift,
        Action::StopDrift,
        Action::ToggleHelp,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::HalfPageUp => "Half Page Up",
            Action::HalfPageDown => "Half Page Down",
            Action::PageUp => "Page Up",
            Action::PageDown => "Page Down",
            Action::GotoTop => "Go to Top",
            Action::GotoBottom => "Go to Bottom",
            Action::StartDrift => "Start Drift",
            Action::StopDrift => "Stop Drift",
            Action::ToggleHelp => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::HalfPageUp => "half_page_up",
            Action::HalfPageDown => "half_page_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::GotoTop => "goto_top",
            Action::GotoBottom => "goto_bottom",
            Action::StartDrift => "start_drift",
            Action::StopDrift => "stop_drift",
            Action::ToggleHelp => "toggle_help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "scroll_up" => Some(Action::ScrollUp),
            "scroll_down" => Some(Action::ScrollDown),
            "half_page_up" => Some(Action::HalfPageUp),
            "half_page_down" => Some(Action::HalfPageDown),
            "page_up" => Some(Action::PageUp),
            "page_down" => Some(Action::PageDown),
            "goto_top" => Some(Action::GotoTop),
            "goto_bottom" => Some(Action::GotoBottom),
            "start_drift" => Some(Action::StartDrift),
            "stop_drift" => Some(Action::StopDrift),
            "toggle_help" => Some(Action::ToggleHelp),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Ctrl+d"`, `"PgDn"`, `"g"`).
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Ctrl+d"`, `"PageDown"`).
    fn to_config_string(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+d"`, `"PageDown"`, `"g"`, `"Esc"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => {
                // Single letters keep their case ("G" vs "g").
                KeyCode::Char(key_part.chars().next()?)
            }
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — keybindings and drift tuning.
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Full-traversal drift duration.
    pub drift_duration_ms: u64,
    /// Offset jump (rows) between scroll events that counts as the user
    /// taking over.
    pub interrupt_threshold_rows: u64,
    /// Gap after which a pause ends an ongoing user gesture.
    pub interrupt_quiet_ms: u64,
    /// Rows moved per mouse-wheel notch.
    pub wheel_scroll_lines: u64,
}

impl AppConfig {
    /// Hard-coded default bindings (vim keys plus the obvious specials).
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::Char;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let shift = KeyModifiers::SHIFT;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(KeyCode::Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(KeyCode::Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(HalfPageUp, vec![KeyBind::new(Char('u'), ctrl)]);
        m.insert(HalfPageDown, vec![KeyBind::new(Char('d'), ctrl)]);
        m.insert(PageUp, vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('b'), n)]);
        m.insert(PageDown, vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char('f'), n)]);
        m.insert(GotoTop, vec![KeyBind::new(KeyCode::Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(GotoBottom, vec![KeyBind::new(KeyCode::End, n), KeyBind::new(Char('G'), shift)]);
        m.insert(StartDrift, vec![KeyBind::new(Char(' '), n), KeyBind::new(Char('s'), n)]);
        m.insert(StopDrift, vec![KeyBind::new(KeyCode::Esc, n)]);
        m.insert(ToggleHelp, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"↓/j"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: drift to bottom | {}/{}: scroll | {}: help | {}: quit",
            self.short_binding(Action::StartDrift),
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::ToggleHelp),
            self.short_binding(Action::Quit),
        )
    }

    /// Drift tuning derived from the numeric settings.
    pub fn drift_tuning(&self) -> DriftTuning {
        DriftTuning {
            duration: Duration::from_millis(self.drift_duration_ms),
            interrupt_threshold_rows: self.interrupt_threshold_rows,
            quiet_window: Duration::from_millis(self.interrupt_quiet_ms),
        }
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults. On first run the
    /// default template is written out so the knobs are discoverable.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(_) => {
                let config = Self::defaults();
                let _ = config.save();
                config
            }
        }
    }

    /// Built-in defaults (no disk access).
    pub fn defaults() -> Self {
        Self {
            bindings: Self::default_bindings(),
            drift_duration_ms: 15_000,
            interrupt_threshold_rows: 50,
            interrupt_quiet_ms: 150,
            wheel_scroll_lines: 3,
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::defaults();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Numeric settings, each kept within sane bounds.
            match key {
                "drift_duration_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.drift_duration_ms = v.clamp(500, 600_000);
                    }
                    continue;
                }
                "interrupt_threshold_rows" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.interrupt_threshold_rows = v.clamp(1, 1_000);
                    }
                    continue;
                }
                "interrupt_quiet_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.interrupt_quiet_ms = v.clamp(20, 5_000);
                    }
                    continue;
                }
                "wheel_scroll_lines" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.wheel_scroll_lines = v.clamp(1, 50);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# drift configuration".to_string(),
            String::new(),
            "# Drift tuning".to_string(),
            format!("drift_duration_ms = {}", self.drift_duration_ms),
            format!("interrupt_threshold_rows = {}", self.interrupt_threshold_rows),
            format!("interrupt_quiet_ms = {}", self.interrupt_quiet_ms),
            format!("wheel_scroll_lines = {}", self.wheel_scroll_lines),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/drift/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("drift").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overrides_tuning_with_clamping() {
        let config = AppConfig::parse_config(
            "drift_duration_ms = 30000\ninterrupt_threshold_rows = 0\nwheel_scroll_lines = 5\n",
        );
        assert_eq!(config.drift_duration_ms, 30_000);
        assert_eq!(config.interrupt_threshold_rows, 1); // clamped up
        assert_eq!(config.wheel_scroll_lines, 5);
        assert_eq!(config.interrupt_quiet_ms, 150); // untouched default
    }

    #[test]
    fn parse_rebinds_action() {
        let config = AppConfig::parse_config("start_drift = Enter, Ctrl+Space\n");
        let binds = &config.bindings[&Action::StartDrift];
        assert_eq!(binds.len(), 2);
        assert_eq!(binds[0].code, KeyCode::Enter);
        assert_eq!(binds[1].modifiers, KeyModifiers::CONTROL);
    }

    #[test]
    fn serialise_round_trips() {
        let config = AppConfig::defaults();
        let parsed = AppConfig::parse_config(&config.serialise());
        assert_eq!(parsed.drift_duration_ms, config.drift_duration_ms);
        assert_eq!(parsed.bindings[&Action::Quit], config.bindings[&Action::Quit]);
    }

    #[test]
    fn match_key_honours_ctrl_modifier() {
        let config = AppConfig::defaults();
        let ev = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(config.match_key(ev), Some(Action::HalfPageDown));
    }

    #[test]
    fn uppercase_g_is_distinct_from_lowercase() {
        let config = AppConfig::defaults();
        // crossterm reports Shift+G as Char('G') with SHIFT set.
        let ev = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(config.match_key(ev), Some(Action::GotoTop));
    }
}
