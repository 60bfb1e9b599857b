//! Input handling — maps key/mouse events to state mutations.
//!
//! Every manual scroll path lands in `AppState::scroll_by`/`scroll_to`,
//! which feeds the resulting offset to the drift controller's
//! interruption detector. The three user-input routes are the wheel, a
//! vertical drag, and key-driven scrolling.

use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;

use super::state::AppState;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl+c always quits, regardless of overlay.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    if state.show_help {
        handle_help_key(state, key);
        return;
    }

    let now = Instant::now();
    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::ScrollUp => state.scroll_by(-1, now),
        Action::ScrollDown => state.scroll_by(1, now),
        Action::HalfPageUp => state.scroll_by(-half_page(state), now),
        Action::HalfPageDown => state.scroll_by(half_page(state), now),
        Action::PageUp => state.scroll_by(-full_page(state), now),
        Action::PageDown => state.scroll_by(full_page(state), now),
        Action::GotoTop => state.scroll_to(0, now),
        Action::GotoBottom => {
            let bottom = state.max_offset();
            state.scroll_to(bottom, now);
        }
        Action::StartDrift => start_drift(state, now),
        Action::StopDrift => {
            if state.drift.is_active() {
                state.drift.stop();
                state.status_message = Some("drift stopped".into());
            }
        }
        Action::ToggleHelp => state.show_help = true,
        Action::Quit => state.should_quit = true,
    }
}

fn handle_help_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.show_help = false;
        }
        _ => {}
    }
}

fn start_drift(state: &mut AppState, now: Instant) {
    let target = state.drift_target();
    let current = state.offset;
    if state.drift.scroll_to_bottom(now, current, target) {
        state.status_message = Some("drifting — scroll to take over".into());
    } else {
        state.status_message = Some("nothing to drift to".into());
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event. Wheel notches scroll by the configured line
/// count; a held-button vertical drag scrolls touch-style (content
/// follows the pointer).
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let now = Instant::now();

    match mouse.kind {
        MouseEventKind::ScrollUp => {
            state.scroll_by(-(state.config.wheel_scroll_lines as i64), now);
        }
        MouseEventKind::ScrollDown => {
            state.scroll_by(state.config.wheel_scroll_lines as i64, now);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            state.last_drag_row = Some(mouse.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(last_row) = state.last_drag_row {
                // Dragging down moves the content down, i.e. scrolls up.
                let delta = i64::from(last_row) - i64::from(mouse.row);
                if delta != 0 {
                    state.scroll_by(delta, now);
                }
            }
            state.last_drag_row = Some(mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.last_drag_row = None;
        }
        _ => {}
    }
}

/// Half the viewport, at least one row.
fn half_page(state: &AppState) -> i64 {
    (state.viewport_rows / 2).max(1) as i64
}

fn full_page(state: &AppState) -> i64 {
    state.viewport_rows.max(1) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::document::Document;

    fn state() -> AppState {
        let text: String = (0..300).map(|i| format!("{i}\n")).collect();
        let mut s = AppState::new(Document::from_str("t", &text), AppConfig::defaults());
        s.viewport_rows = 40;
        s
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn wheel(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn vim_keys_scroll() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('j')));
        handle_key(&mut s, press(KeyCode::Char('j')));
        handle_key(&mut s, press(KeyCode::Char('k')));
        assert_eq!(s.offset, 1);
    }

    #[test]
    fn wheel_uses_configured_lines() {
        let mut s = state();
        handle_mouse(&mut s, wheel(MouseEventKind::ScrollDown));
        assert_eq!(s.offset, s.config.wheel_scroll_lines);
        handle_mouse(&mut s, wheel(MouseEventKind::ScrollUp));
        assert_eq!(s.offset, 0);
    }

    #[test]
    fn drag_scrolls_touch_style() {
        let mut s = state();
        s.offset = 100;
        handle_mouse(
            &mut s,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 0,
                row: 20,
                modifiers: KeyModifiers::NONE,
            },
        );
        handle_mouse(
            &mut s,
            MouseEvent {
                kind: MouseEventKind::Drag(MouseButton::Left),
                column: 0,
                row: 25, // pointer moved down 5 rows
                modifiers: KeyModifiers::NONE,
            },
        );
        assert_eq!(s.offset, 95);
    }

    #[test]
    fn space_starts_drift_and_escape_stops_it() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char(' ')));
        assert!(s.drift.is_active());
        handle_key(&mut s, press(KeyCode::Esc));
        assert!(!s.drift.is_active());
    }

    #[test]
    fn drift_is_refused_when_nothing_to_scroll() {
        let mut s = state();
        s.viewport_rows = 1_000; // document fits entirely
        handle_key(&mut s, press(KeyCode::Char(' ')));
        assert!(!s.drift.is_active());
        assert!(!s.drift.interrupted());
    }

    #[test]
    fn help_overlay_swallows_scroll_keys() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('?')));
        assert!(s.show_help);
        handle_key(&mut s, press(KeyCode::Char('j')));
        assert_eq!(s.offset, 0);
        handle_key(&mut s, press(KeyCode::Esc));
        assert!(!s.show_help);
    }
}
