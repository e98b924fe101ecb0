//! Terminal emulation core
//!
//! `Terminal` is one session's engine: it owns the grid, the escape-sequence
//! parser state, the scroll position, and the active selection. Bytes from
//! the remote side go in through [`Terminal::feed`]; the host pulls frames
//! with [`Terminal::viewport`].

pub mod grid;
pub mod line_edit;
pub mod parser;
pub mod selection;
pub mod sgr;
pub mod viewport;

use log::debug;

use crate::config::Config;
use crate::constants::DEFAULT_MAX_HISTORY;

pub use grid::{Cell, Color, Grid, Style, StyleFlags, TerminalModes};
pub use selection::Selection;
pub use viewport::Viewport;

use line_edit::RewriteTracker;
use parser::Performer;

/// One terminal session's engine state
pub struct Terminal {
    grid: Grid,
    parser: vte::Parser,
    /// Rows scrolled back from the live tail; 0 means following output
    scroll_offset: usize,
    selection: Option<Selection>,
    selecting: bool,
    line_edit: RewriteTracker,
}

impl Terminal {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self::with_history(cols, rows, DEFAULT_MAX_HISTORY)
    }

    pub fn with_history(cols: usize, rows: usize, max_history: usize) -> Self {
        Self {
            grid: Grid::new(cols, rows, max_history),
            parser: vte::Parser::new(),
            scroll_offset: 0,
            selection: None,
            selecting: false,
            line_edit: RewriteTracker::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_history(
            config.terminal.cols,
            config.terminal.rows,
            config.terminal.scrollback,
        )
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Whether the remote shell appears to be redrawing the input line
    pub fn is_rewriting(&self) -> bool {
        self.line_edit.is_rewriting()
    }

    // ========== Byte stream ==========

    /// Feed bytes from the remote side through the dispatcher.
    /// Returns any bytes the engine owes the remote side (status reports).
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<u8> {
        let mut responses = Vec::new();
        let mut performer = Performer::new(
            &mut self.grid,
            &mut self.scroll_offset,
            &mut self.line_edit,
            &mut responses,
        );
        for &byte in bytes {
            self.parser.advance(&mut performer, byte);
        }
        let trimmed = self.grid.take_trimmed();
        if trimmed > 0 {
            self.shift_selection(trimmed);
        }
        self.clamp_scroll_offset();
        responses
    }

    /// History trimming dropped `trimmed` rows from the head; move the
    /// selection with its content, or drop it if that content is gone
    fn shift_selection(&mut self, trimmed: usize) {
        self.selection = self.selection.and_then(|mut sel| {
            let (_, (end_row, _)) = sel.normalized();
            if end_row < trimmed {
                return None;
            }
            sel.anchor.0 = sel.anchor.0.saturating_sub(trimmed);
            sel.extent.0 = sel.extent.0.saturating_sub(trimmed);
            Some(sel)
        });
    }

    /// Encode host paste text for the remote side, honoring bracketed paste
    pub fn paste_bytes(&self, text: &str) -> Vec<u8> {
        if self.grid.modes.bracketed_paste {
            let mut bytes = Vec::with_capacity(text.len() + 12);
            bytes.extend_from_slice(b"\x1b[200~");
            bytes.extend_from_slice(text.as_bytes());
            bytes.extend_from_slice(b"\x1b[201~");
            bytes
        } else {
            text.as_bytes().to_vec()
        }
    }

    // ========== Resize ==========

    /// Resize the viewport. Zero dimensions are rejected.
    pub fn resize(&mut self, cols: usize, rows: usize) -> bool {
        if cols == 0 || rows == 0 {
            return false;
        }
        debug!("resize to {}x{}", cols, rows);
        self.grid.resize(cols, rows);
        self.scroll_offset = 0;
        self.selection = None;
        self.selecting = false;
        true
    }

    // ========== Viewport ==========

    /// Project the current frame at the terminal's own dimensions
    pub fn viewport(&self) -> Viewport {
        viewport::project(
            &self.grid,
            self.grid.view_rows(),
            self.grid.cols(),
            self.scroll_offset,
        )
    }

    /// Project a frame at caller-chosen dimensions (thumbnails, previews)
    pub fn viewport_at(&self, rows: usize, cols: usize) -> Viewport {
        viewport::project(&self.grid, rows, cols, self.scroll_offset)
    }

    pub fn scroll_back(&mut self, n: usize) {
        self.scroll_offset += n;
        self.clamp_scroll_offset();
    }

    pub fn scroll_forward(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    fn clamp_scroll_offset(&mut self) {
        let max = self.grid.len().saturating_sub(self.grid.view_rows());
        self.scroll_offset = self.scroll_offset.min(max);
    }

    // ========== Selection ==========

    /// Translate viewport coordinates (what the host clicks on) to buffer
    /// coordinates (what selections are stored in)
    fn buffer_position(&self, view_row: usize, col: usize) -> (usize, usize) {
        let rows = self.grid.view_rows();
        let len = self.grid.len();
        let offset = self.scroll_offset.min(len.saturating_sub(rows));
        let end = len - offset;
        let start = end.saturating_sub(rows);
        let pad = rows - (end - start);
        let row = (start + view_row.saturating_sub(pad)).min(len - 1);
        (row, col.min(self.grid.cols() - 1))
    }

    pub fn begin_selection(&mut self, view_row: usize, col: usize) {
        let (row, col) = self.buffer_position(view_row, col);
        self.selection = Some(Selection::new(row, col));
        self.selecting = true;
    }

    pub fn extend_selection(&mut self, view_row: usize, col: usize) {
        if !self.selecting {
            return;
        }
        let extent = self.buffer_position(view_row, col);
        if let Some(sel) = self.selection.as_mut() {
            sel.extent = extent;
        }
    }

    pub fn end_selection(&mut self) {
        self.selecting = false;
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.selecting = false;
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Double-click: select the word under the cell, if any
    pub fn select_word(&mut self, view_row: usize, col: usize) {
        let (row, col) = self.buffer_position(view_row, col);
        self.selection = selection::select_word_at(&self.grid, row, col);
        self.selecting = false;
    }

    /// Triple-click: select the whole row
    pub fn select_line(&mut self, view_row: usize) {
        let (row, _) = self.buffer_position(view_row, 0);
        self.selection = selection::select_line_at(&self.grid, row);
        self.selecting = false;
    }

    pub fn selected_text(&self) -> Option<String> {
        self.selection
            .map(|sel| selection::extract_text(&self.grid, &sel))
    }
}
