//! Help popup overlay — lists the current keybindings.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::config::{Action, AppConfig};

/// Keybinding help overlay.
pub struct HelpPopup<'a> {
    pub config: &'a AppConfig,
}

impl<'a> Widget for HelpPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Action rows + blank above/below + hint + borders.
        let height = (Action::ALL.len() as u16) + 5;
        let popup = centered_fixed(46, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Keys ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = Vec::new();
        lines.push(Line::raw(""));

        for &action in Action::ALL {
            let label_col = format!("   {:<18}", action.label());
            let keys_display = self.config.display_bindings(action);
            let inner_width = inner.width as usize;
            let keys_width = inner_width.saturating_sub(label_col.len()).max(1);
            let keys_col = format!("{keys_display:>keys_width$}");

            lines.push(Line::from(vec![
                Span::styled(label_col, Style::default().fg(Color::White)),
                Span::styled(keys_col, Style::default().fg(Color::Yellow)),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Edit bindings in ~/.config/drift/config.toml",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
