//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event
//! handling).

use std::time::Instant;

use crate::config::AppConfig;
use crate::core::autoscroll::AutoScroll;
use crate::core::document::Document;

/// Top-level application state.
pub struct AppState {
    /// The text being paged.
    pub document: Document,
    /// Current scroll offset (first visible document row).
    pub offset: u64,
    /// Viewport height in rows. Zero until the first draw resolves the
    /// layout — scrolling and drifting are no-ops until then.
    pub viewport_rows: u64,
    /// The drift-mode controller.
    pub drift: AutoScroll,
    /// User-configurable keybindings and tuning.
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Terminal row of the last mouse press/drag, for drag-to-scroll.
    pub last_drag_row: Option<u16>,
}

impl AppState {
    pub fn new(document: Document, config: AppConfig) -> Self {
        let drift = AutoScroll::new(config.drift_tuning());
        Self {
            document,
            offset: 0,
            viewport_rows: 0,
            drift,
            config,
            should_quit: false,
            show_help: false,
            status_message: None,
            last_drag_row: None,
        }
    }

    /// Largest valid scroll offset (0 when the document fits).
    pub fn max_offset(&self) -> u64 {
        self.document
            .max_scroll(self.viewport_rows)
            .unwrap_or(0)
    }

    /// The drift target, or `None` when there is nothing to scroll to —
    /// the "target not resolvable" case.
    pub fn drift_target(&self) -> Option<u64> {
        self.document.max_scroll(self.viewport_rows)
    }

    /// Move the viewport by `delta` rows and report the resulting offset
    /// to the interruption detector.
    pub fn scroll_by(&mut self, delta: i64, now: Instant) {
        let max = self.max_offset();
        let next = self.offset.saturating_add_signed(delta).min(max);
        self.offset = next;
        self.drift.observe_scroll(now, next);
    }

    /// Jump the viewport to `target` (clamped) and report it.
    pub fn scroll_to(&mut self, target: u64, now: Instant) {
        self.offset = target.min(self.max_offset());
        self.drift.observe_scroll(now, self.offset);
    }
}
