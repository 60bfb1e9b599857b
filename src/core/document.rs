//! Document model — the text being paged.
//!
//! Lines are kept as-is and clipped horizontally at render time, so the
//! content height is simply the line count and never depends on the
//! terminal width.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
    #[error("no input: give a file argument or pipe text on stdin")]
    NoInput,
}

/// An immutable, fully loaded text document.
#[derive(Debug)]
pub struct Document {
    /// Display name for the title bar ("stdin" when piped).
    pub name: String,
    lines: Vec<String>,
}

impl Document {
    pub fn from_str(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_str(name, &text))
    }

    /// Read the whole of stdin. Refuses to "page" an interactive terminal.
    pub fn from_stdin() -> Result<Self, DocumentError> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            return Err(DocumentError::NoInput);
        }
        let mut text = String::new();
        stdin
            .lock()
            .read_to_string(&mut text)
            .map_err(DocumentError::Stdin)?;
        Ok(Self::from_str("stdin", &text))
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// Content height in rows.
    pub fn height(&self) -> u64 {
        self.lines.len() as u64
    }

    /// Maximum scroll offset for a viewport of `viewport_rows`, or `None`
    /// when the whole document already fits (nothing to scroll).
    pub fn max_scroll(&self, viewport_rows: u64) -> Option<u64> {
        if viewport_rows == 0 {
            return None;
        }
        let max = self.height().saturating_sub(viewport_rows);
        (max > 0).then_some(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(n: usize) -> Document {
        let text: String = (0..n).map(|i| format!("line {i}\n")).collect();
        Document::from_str("test", &text)
    }

    #[test]
    fn height_counts_lines() {
        assert_eq!(doc(0).height(), 0);
        assert_eq!(doc(42).height(), 42);
    }

    #[test]
    fn max_scroll_is_overflow_only() {
        let d = doc(3000);
        assert_eq!(d.max_scroll(1000), Some(2000));
        assert_eq!(d.max_scroll(3000), None); // fits exactly
        assert_eq!(d.max_scroll(5000), None); // fits with room
        assert_eq!(d.max_scroll(0), None); // viewport not laid out yet
    }

    #[test]
    fn trailing_newline_does_not_add_a_row() {
        let d = Document::from_str("t", "a\nb\n");
        assert_eq!(d.height(), 2);
        assert_eq!(d.line(1), Some("b"));
        assert_eq!(d.line(2), None);
    }
}
