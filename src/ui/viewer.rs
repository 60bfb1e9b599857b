//! The document viewport — renders the visible slice of the document at
//! the current scroll offset, with a position indicator in the corner.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::core::document::Document;

use super::theme::Theme;

/// The viewer widget — created fresh each frame.
pub struct ViewerWidget<'a> {
    document: &'a Document,
    offset: u64,
    block: Option<Block<'a>>,
}

impl<'a> ViewerWidget<'a> {
    pub fn new(document: &'a Document, offset: u64) -> Self {
        Self {
            document,
            offset,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Position indicator for the title corner ("TOP", "42%", "BOT").
    fn position_label(&self, viewport_rows: u64) -> String {
        match self.document.max_scroll(viewport_rows) {
            None => "ALL".into(),
            Some(_) if self.offset == 0 => "TOP".into(),
            Some(max) if self.offset >= max => "BOT".into(),
            Some(max) => format!("{}%", self.offset * 100 / max),
        }
    }
}

impl<'a> Widget for ViewerWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Resolve the inner area (inside the optional block border).
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        for i in 0..inner.height {
            let row = self.offset + u64::from(i);
            let Ok(idx) = usize::try_from(row) else {
                break;
            };
            let Some(text) = self.document.line(idx) else {
                break;
            };
            let line = Line::from(Span::styled(text, Theme::text_style()));
            buf.set_line(inner.x, inner.y + i, &line, inner.width);
        }

        // Position indicator, bottom-right of the border area.
        let label = self.position_label(u64::from(inner.height));
        if area.height >= 2 && area.width > label.len() as u16 + 3 {
            let x = area.x + area.width - label.len() as u16 - 2;
            let y = area.y + area.height - 1;
            buf.set_string(x, y, &label, Theme::position_style());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(n: usize) -> Document {
        let text: String = (0..n).map(|i| format!("row {i}\n")).collect();
        Document::from_str("t", &text)
    }

    #[test]
    fn position_label_tracks_offset() {
        let d = doc(300);
        assert_eq!(ViewerWidget::new(&d, 0).position_label(100), "TOP");
        assert_eq!(ViewerWidget::new(&d, 100).position_label(100), "50%");
        assert_eq!(ViewerWidget::new(&d, 200).position_label(100), "BOT");
    }

    #[test]
    fn position_label_for_short_document() {
        let d = doc(10);
        assert_eq!(ViewerWidget::new(&d, 0).position_label(100), "ALL");
    }

    #[test]
    fn renders_visible_slice() {
        let d = doc(50);
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        ViewerWidget::new(&d, 10).render(area, &mut buf);

        let first_row: String = (0..6).map(|x| buf[(x, 0)].symbol()).collect();
        assert_eq!(first_row, "row 10");
    }
}
