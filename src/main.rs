//! A terminal pager that drifts to the bottom on its own.
//!
//! Open a file (or pipe text in) and press Space: the viewport glides to
//! the end over a fixed duration. Scroll with the wheel, a drag, or the
//! keyboard and drift mode cedes control immediately.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::core::autoscroll::Tick;
use crate::core::document::Document;
use crate::ui::{help::HelpPopup, layout::AppLayout, theme::Theme, viewer::ViewerWidget};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Auto-drifting terminal pager")]
struct Cli {
    /// File to open (reads stdin when omitted and piped).
    file: Option<PathBuf>,

    /// Override the drift duration in seconds.
    #[arg(long)]
    duration_secs: Option<u64>,
}

/// Frame pulse for the drift animation (~30 fps).
const TICK_RATE: Duration = Duration::from_millis(33);

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── load the document ─────────────────────────────────────
    let document = match cli.file {
        Some(ref path) => Document::load(path)?,
        None => Document::from_stdin()?,
    };

    let mut user_config = config::AppConfig::load();
    if let Some(secs) = cli.duration_secs {
        user_config.drift_duration_ms = secs.clamp(1, 600).saturating_mul(1000);
    }
    let mut state = AppState::new(document, user_config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── event loop ────────────────────────────────────────────
    let mut events = spawn_event_reader(TICK_RATE);

    loop {
        // ── draw first ─────────────────────────────────────────
        // The draw resolves the viewport height; scrolling and drift are
        // no-ops until the first frame has done so.
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());

            // Inner height = pane minus its top/bottom border.
            state.viewport_rows = u64::from(layout.viewer_area.height.saturating_sub(2));

            let viewer_block = Block::default()
                .title(format!(" {} ", state.document.name))
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());

            let viewer = ViewerWidget::new(&state.document, state.offset).block(viewer_block);
            frame.render_widget(viewer, layout.viewer_area);

            let hint = state.config.status_bar_hint();
            let (status_text, status_style) = if state.drift.is_active() {
                (
                    "drifting — scroll or Esc to take over".to_string(),
                    Theme::drifting_style(),
                )
            } else {
                (
                    state
                        .status_message
                        .as_deref()
                        .unwrap_or(&hint)
                        .to_string(),
                    Theme::status_bar_style(),
                )
            };
            let status = Paragraph::new(status_text).style(status_style);
            frame.render_widget(status, layout.status_area);

            if state.show_help {
                frame.render_widget(
                    HelpPopup {
                        config: &state.config,
                    },
                    frame.area(),
                );
            }
        })?;

        let Some(event) = events.recv().await else {
            break; // event reader gone — nothing more to do
        };

        let was_drifting = state.drift.is_active();
        match event {
            AppEvent::Key(k) => handler::handle_key(&mut state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
            AppEvent::Resize(_, _) => {}
            AppEvent::Tick => {}
        }

        // ── advance the drift animation ───────────────────────
        match state.drift.tick(Instant::now()) {
            Tick::MoveTo(offset) => {
                state.offset = offset.min(state.max_offset());
            }
            Tick::Finished(offset) => {
                state.offset = offset.min(state.max_offset());
                state.status_message = Some("reached the bottom".into());
            }
            Tick::Idle => {
                if was_drifting && state.drift.interrupted() {
                    state.status_message = Some("you take it from here".into());
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    // Dropping the state also drops the controller and any active run.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
