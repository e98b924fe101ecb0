//! Screen buffer
//!
//! Growable row buffer that manages terminal screen state: cursor position,
//! pen attributes, scroll region, alternate screen, and history trimming.
//! The visible page is the tail of the buffer; older rows are scrollback.

use std::collections::VecDeque;

use bitflags::bitflags;
use log::{trace, warn};

use crate::constants::TAB_WIDTH;

/// Text color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Default color (foreground: host theme, background: transparent)
    Default,
    /// 16-color palette slot (0-7 normal, 8-15 bright)
    Indexed(u8),
    /// True Color (24bit RGB)
    Rgb(u8, u8, u8),
}

bitflags! {
    /// Cell character attributes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StyleFlags: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const BLINK     = 0b0001_0000;
        const INVERSE   = 0b0010_0000;
        const HIDDEN    = 0b0100_0000;
        const STRIKE    = 0b1000_0000;
    }
}

/// Display style carried by the pen and stamped onto written cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub flags: StyleFlags,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            flags: StyleFlags::empty(),
            fg: Color::Default,
            bg: Color::Default,
        }
    }
}

/// Data for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    /// Blank cell with default style
    pub fn blank() -> Cell {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

/// One screen row, always exactly `cols` cells wide
pub type Row = Vec<Cell>;

fn blank_row(cols: usize) -> Row {
    vec![Cell::blank(); cols]
}

/// Saved cursor slot (DECSC / SCOSC)
#[derive(Debug, Clone, Copy)]
struct SavedCursor {
    row: usize,
    col: usize,
    style: Style,
}

/// Main-screen state stashed while the alternate screen is active
struct SavedMain {
    buffer: VecDeque<Row>,
    cursor_row: usize,
    cursor_col: usize,
    scroll_top: usize,
    scroll_bottom: usize,
}

/// Terminal mode flags (DECSET/DECRST)
#[derive(Debug, Clone)]
pub struct TerminalModes {
    /// Cursor visibility flag (DECTCEM, ?25)
    pub cursor_visible: bool,
    /// Application cursor keys mode (DECCKM, ?1)
    pub application_cursor_keys: bool,
    /// Bracketed paste mode (?2004)
    pub bracketed_paste: bool,
}

impl Default for TerminalModes {
    fn default() -> Self {
        Self {
            cursor_visible: true,
            application_cursor_keys: false,
            bracketed_paste: false,
        }
    }
}

/// Growable character grid with scrollback and alternate screen
pub struct Grid {
    /// Row buffer (oldest at front, visible page at the back)
    buffer: VecDeque<Row>,
    /// Number of columns
    cols: usize,
    /// Viewport height in rows
    view_rows: usize,
    /// Cursor row (buffer coordinates)
    pub cursor_row: usize,
    /// Cursor column
    pub cursor_col: usize,
    /// Current pen style
    pen: Style,
    /// Maximum history rows before trimming
    max_history: usize,
    /// Top of scroll region (0-indexed, page-relative)
    scroll_top: usize,
    /// Bottom of scroll region (0-indexed, page-relative, inclusive)
    scroll_bottom: usize,
    /// DECSC slot (ESC 7 / ESC 8)
    dec_saved_cursor: Option<SavedCursor>,
    /// SCOSC slot (CSI s / CSI u)
    sco_saved_cursor: Option<SavedCursor>,
    /// Main screen stash; Some while the alternate screen is active
    main_screen: Option<SavedMain>,
    /// Last printed character, for REP (CSI b)
    last_char: Option<char>,
    /// Rows dropped by history trimming since the last take_trimmed call
    trimmed_rows: usize,
    /// Terminal mode flags
    pub modes: TerminalModes,
}

impl Grid {
    /// Create a grid for a `cols` x `view_rows` viewport
    pub fn new(cols: usize, view_rows: usize, max_history: usize) -> Self {
        let cols = cols.max(1);
        let view_rows = view_rows.max(1);
        let mut buffer = VecDeque::new();
        buffer.push_back(blank_row(cols));
        Self {
            buffer,
            cols,
            view_rows,
            cursor_row: 0,
            cursor_col: 0,
            pen: Style::default(),
            max_history: max_history.max(view_rows),
            scroll_top: 0,
            scroll_bottom: view_rows - 1,
            dec_saved_cursor: None,
            sco_saved_cursor: None,
            main_screen: None,
            last_char: None,
            trimmed_rows: 0,
            modes: TerminalModes::default(),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn view_rows(&self) -> usize {
        self.view_rows
    }

    /// Number of rows currently in the active buffer
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_alternate(&self) -> bool {
        self.main_screen.is_some()
    }

    /// Get a row by buffer index
    pub fn row(&self, idx: usize) -> Option<&[Cell]> {
        self.buffer.get(idx).map(|r| r.as_slice())
    }

    /// Get a cell, blank-padding out-of-range addresses
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.buffer
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or_else(Cell::blank)
    }

    /// Current pen style
    pub fn pen(&self) -> Style {
        self.pen
    }

    pub fn pen_mut(&mut self) -> &mut Style {
        &mut self.pen
    }

    pub fn reset_pen(&mut self) {
        self.pen = Style::default();
    }

    /// First buffer row of the visible page
    pub fn page_base(&self) -> usize {
        self.buffer.len().saturating_sub(self.view_rows)
    }

    /// Scroll region bounds in buffer coordinates
    fn region_bounds(&self) -> (usize, usize) {
        let base = self.page_base();
        let last = self.buffer.len() - 1;
        let top = (base + self.scroll_top).min(last);
        let bottom = (base + self.scroll_bottom).min(last);
        (top, bottom)
    }

    /// Scroll region in page-relative coordinates
    pub fn scroll_region(&self) -> (usize, usize) {
        (self.scroll_top, self.scroll_bottom)
    }

    fn region_restricted(&self) -> bool {
        self.scroll_top != 0 || self.scroll_bottom != self.view_rows - 1
    }

    fn clear_row(&mut self, row: usize) {
        if let Some(r) = self.buffer.get_mut(row) {
            r.fill(Cell::blank());
        }
    }

    // ========== History ==========

    /// Drop oldest rows past the history cap, shifting the cursor down with
    /// the surviving content. Returns the trimmed row count.
    fn trim_history(&mut self) -> usize {
        if self.is_alternate() {
            return 0;
        }
        let mut trimmed = 0;
        while self.buffer.len() > self.max_history {
            self.buffer.pop_front();
            trimmed += 1;
        }
        if trimmed > 0 {
            self.cursor_row = self.cursor_row.saturating_sub(trimmed);
            if let Some(saved) = self.dec_saved_cursor.as_mut() {
                saved.row = saved.row.saturating_sub(trimmed);
            }
            if let Some(saved) = self.sco_saved_cursor.as_mut() {
                saved.row = saved.row.saturating_sub(trimmed);
            }
            self.trimmed_rows += trimmed;
            trace!("history trimmed by {} rows", trimmed);
        }
        trimmed
    }

    /// Rows trimmed since the last call; lets callers shift any state they
    /// keep in buffer coordinates (selections) along with the content
    pub fn take_trimmed(&mut self) -> usize {
        std::mem::take(&mut self.trimmed_rows)
    }

    // ========== Character writing ==========

    /// Write a character at the cursor with the current pen and advance,
    /// wrapping to the next row when the line fills
    pub fn put_char(&mut self, ch: char) {
        if self.cursor_col >= self.cols {
            self.cursor_col = 0;
            self.advance_row();
        }
        let pen = self.pen;
        let row = self.cursor_row;
        let col = self.cursor_col;
        if let Some(cell) = self.buffer.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = Cell { ch, style: pen };
        }
        self.last_char = Some(ch);
        self.cursor_col += 1;
        if self.cursor_col >= self.cols {
            self.cursor_col = 0;
            self.advance_row();
        }
    }

    /// Repeat the last printed character (CSI b / REP)
    pub fn repeat_char(&mut self, n: usize) {
        let Some(ch) = self.last_char else {
            return;
        };
        for _ in 0..n {
            self.put_char(ch);
        }
    }

    /// Move the cursor down one row: scroll a confined region in place,
    /// otherwise grow the buffer at the tail
    fn advance_row(&mut self) {
        let (_, region_bottom) = self.region_bounds();
        if self.cursor_row == region_bottom && (self.is_alternate() || self.region_restricted()) {
            self.scroll_region_up(1);
            return;
        }
        self.cursor_row += 1;
        if self.cursor_row >= self.buffer.len() {
            let cols = self.cols;
            self.buffer.push_back(blank_row(cols));
            self.trim_history();
        }
    }

    // ========== Control characters ==========

    /// Line feed (LF)
    pub fn linefeed(&mut self) {
        self.advance_row();
    }

    /// Carriage return (CR)
    pub fn carriage_return(&mut self) {
        self.cursor_col = 0;
    }

    /// Tab (HT): advance to the next multiple-of-8 stop
    pub fn tab(&mut self) {
        let next_stop = (self.cursor_col / TAB_WIDTH + 1) * TAB_WIDTH;
        self.cursor_col = next_stop.min(self.cols - 1);
    }

    /// Backspace (BS): moves only, erasure is left to an explicit erase
    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        }
    }

    /// Reverse index (RI / ESC M)
    pub fn reverse_index(&mut self) {
        let (region_top, _) = self.region_bounds();
        if self.cursor_row == region_top {
            self.scroll_region_down(1);
        } else if self.cursor_row > self.page_base() {
            self.cursor_row -= 1;
        }
    }

    // ========== Cursor movement ==========

    /// Absolute cursor position (1-indexed, page-relative)
    pub fn move_cursor_to(&mut self, row: usize, col: usize) {
        let base = self.page_base();
        let last = self.buffer.len() - 1;
        self.cursor_row = (base + row.max(1) - 1).min(last);
        self.cursor_col = (col.max(1) - 1).min(self.cols - 1);
    }

    /// Move cursor up (CSI A), stopping at the scroll region top
    pub fn move_cursor_up(&mut self, n: usize) {
        let (region_top, _) = self.region_bounds();
        let bound = if self.cursor_row >= region_top {
            region_top
        } else {
            self.page_base()
        };
        self.cursor_row = self.cursor_row.saturating_sub(n).max(bound);
    }

    /// Move cursor down (CSI B), stopping at the scroll region bottom
    pub fn move_cursor_down(&mut self, n: usize) {
        let (_, region_bottom) = self.region_bounds();
        let bound = if self.cursor_row <= region_bottom {
            region_bottom
        } else {
            self.buffer.len() - 1
        };
        self.cursor_row = (self.cursor_row + n).min(bound);
    }

    /// Move cursor right (CSI C)
    pub fn move_cursor_forward(&mut self, n: usize) {
        self.cursor_col = (self.cursor_col + n).min(self.cols - 1);
    }

    /// Move cursor left (CSI D)
    pub fn move_cursor_backward(&mut self, n: usize) {
        self.cursor_col = self.cursor_col.saturating_sub(n);
    }

    /// Absolute column (CSI G), 1-indexed
    pub fn set_column(&mut self, col: usize) {
        self.cursor_col = (col.max(1) - 1).min(self.cols - 1);
    }

    /// Absolute row (CSI d), 1-indexed page-relative, column unchanged
    pub fn set_row(&mut self, row: usize) {
        let base = self.page_base();
        let last = self.buffer.len() - 1;
        self.cursor_row = (base + row.max(1) - 1).min(last);
    }

    /// Cursor row in page-relative coordinates (for cursor position reports)
    pub fn page_cursor_row(&self) -> usize {
        self.cursor_row.saturating_sub(self.page_base())
    }

    // ========== Erase ==========

    /// Erase display (CSI J)
    /// mode: 0=cursor to end, 1=start to cursor, 2=whole screen
    pub fn erase_display(&mut self, mode: u16) {
        match mode {
            0 => {
                self.erase_line(0);
                for row in (self.cursor_row + 1)..self.buffer.len() {
                    self.clear_row(row);
                }
            }
            1 => {
                let base = self.page_base();
                for row in base..self.cursor_row {
                    self.clear_row(row);
                }
                self.erase_line(1);
            }
            2 | 3 => {
                // Hard replace: a fresh single page, not a blanked history
                let cols = self.cols;
                self.buffer.clear();
                for _ in 0..self.view_rows {
                    self.buffer.push_back(blank_row(cols));
                }
                self.cursor_row = 0;
                self.cursor_col = 0;
            }
            _ => {}
        }
    }

    /// Erase line (CSI K)
    /// mode: 0=cursor to end, 1=start to cursor, 2=whole line
    pub fn erase_line(&mut self, mode: u16) {
        let row = self.cursor_row;
        let col = self.cursor_col.min(self.cols - 1);
        let Some(r) = self.buffer.get_mut(row) else {
            return;
        };
        match mode {
            0 => r[col..].fill(Cell::blank()),
            1 => r[..=col].fill(Cell::blank()),
            2 => r.fill(Cell::blank()),
            _ => {}
        }
    }

    /// Delete characters (CSI P / DCH): shift the rest of the line left,
    /// blank-filling the tail
    pub fn delete_chars(&mut self, n: usize) {
        let col = self.cursor_col.min(self.cols - 1);
        let n = n.min(self.cols - col);
        let row = self.cursor_row;
        let cols = self.cols;
        if let Some(r) = self.buffer.get_mut(row) {
            r.copy_within(col + n..cols, col);
            r[cols - n..].fill(Cell::blank());
        }
    }

    /// Insert characters (CSI @ / ICH): shift the rest of the line right
    pub fn insert_chars(&mut self, n: usize) {
        let col = self.cursor_col.min(self.cols - 1);
        let n = n.min(self.cols - col);
        let row = self.cursor_row;
        let cols = self.cols;
        if let Some(r) = self.buffer.get_mut(row) {
            r.copy_within(col..cols - n, col + n);
            r[col..col + n].fill(Cell::blank());
        }
    }

    /// Erase characters (CSI X / ECH): overwrite with blanks, no shift
    pub fn erase_chars(&mut self, n: usize) {
        let col = self.cursor_col.min(self.cols - 1);
        let n = n.min(self.cols - col);
        let row = self.cursor_row;
        if let Some(r) = self.buffer.get_mut(row) {
            r[col..col + n].fill(Cell::blank());
        }
    }

    // ========== Scroll ==========

    /// Scroll the region contents up by n rows, blanking the vacated bottom
    pub fn scroll_region_up(&mut self, n: usize) {
        let (top, bottom) = self.region_bounds();
        let height = bottom - top + 1;
        let n = n.min(height);
        for row in top..=bottom {
            if row + n <= bottom {
                let src = self.buffer[row + n].clone();
                self.buffer[row] = src;
            } else {
                self.clear_row(row);
            }
        }
    }

    /// Scroll the region contents down by n rows, blanking the vacated top
    pub fn scroll_region_down(&mut self, n: usize) {
        let (top, bottom) = self.region_bounds();
        let height = bottom - top + 1;
        let n = n.min(height);
        for row in ((top + n)..=bottom).rev() {
            let src = self.buffer[row - n].clone();
            self.buffer[row] = src;
        }
        for row in top..(top + n) {
            self.clear_row(row);
        }
    }

    /// Scroll up command (CSI S): history-preserving on the main screen
    pub fn scroll_up(&mut self, n: usize) {
        if self.is_alternate() || self.region_restricted() {
            self.scroll_region_up(n);
            return;
        }
        let cols = self.cols;
        for _ in 0..n {
            self.buffer.push_back(blank_row(cols));
        }
        self.cursor_row = (self.cursor_row + n).min(self.buffer.len() - 1);
        self.trim_history();
    }

    /// Scroll down command (CSI T)
    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_region_down(n);
    }

    /// Insert lines at the cursor (CSI L), confined to the scroll region
    pub fn insert_lines(&mut self, n: usize) {
        let (top, bottom) = self.region_bounds();
        if self.cursor_row < top || self.cursor_row > bottom {
            return;
        }
        let n = n.min(bottom - self.cursor_row + 1);
        for row in ((self.cursor_row + n)..=bottom).rev() {
            let src = self.buffer[row - n].clone();
            self.buffer[row] = src;
        }
        for row in self.cursor_row..(self.cursor_row + n) {
            self.clear_row(row);
        }
    }

    /// Delete lines at the cursor (CSI M), confined to the scroll region
    pub fn delete_lines(&mut self, n: usize) {
        let (top, bottom) = self.region_bounds();
        if self.cursor_row < top || self.cursor_row > bottom {
            return;
        }
        let n = n.min(bottom - self.cursor_row + 1);
        for row in self.cursor_row..=bottom {
            if row + n <= bottom {
                let src = self.buffer[row + n].clone();
                self.buffer[row] = src;
            } else {
                self.clear_row(row);
            }
        }
    }

    /// Set scroll region (CSI r / DECSTBM), 1-indexed; 0 means default.
    /// Invalid margins (top >= bottom) discard the whole sequence.
    /// Moves the cursor to the region origin.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let top = if top == 0 { 1 } else { top };
        let bottom = if bottom == 0 { self.view_rows } else { bottom };
        let top = (top - 1).min(self.view_rows - 1);
        let bottom = (bottom - 1).min(self.view_rows - 1);
        if top >= bottom {
            return;
        }
        self.scroll_top = top;
        self.scroll_bottom = bottom;
        self.cursor_row = (self.page_base() + self.scroll_top).min(self.buffer.len() - 1);
        self.cursor_col = 0;
    }

    // ========== Saved cursor ==========

    /// Save cursor and pen (ESC 7 / DECSC)
    pub fn save_cursor_dec(&mut self) {
        self.dec_saved_cursor = Some(SavedCursor {
            row: self.cursor_row,
            col: self.cursor_col,
            style: self.pen,
        });
    }

    /// Restore cursor and pen (ESC 8 / DECRC)
    pub fn restore_cursor_dec(&mut self) {
        if let Some(saved) = self.dec_saved_cursor {
            self.cursor_row = saved.row.min(self.buffer.len() - 1);
            self.cursor_col = saved.col.min(self.cols - 1);
            self.pen = saved.style;
        }
    }

    /// Save cursor position (CSI s / SCOSC)
    pub fn save_cursor(&mut self) {
        self.sco_saved_cursor = Some(SavedCursor {
            row: self.cursor_row,
            col: self.cursor_col,
            style: self.pen,
        });
    }

    /// Restore cursor position (CSI u / SCORC)
    pub fn restore_cursor(&mut self) {
        if let Some(saved) = self.sco_saved_cursor {
            self.cursor_row = saved.row.min(self.buffer.len() - 1);
            self.cursor_col = saved.col.min(self.cols - 1);
        }
    }

    // ========== Alternate screen ==========

    /// Switch to a fresh alternate buffer (?1049 / ?47 set).
    /// `save_cursor` is set for the 1049 form.
    pub fn enter_alternate_screen(&mut self, save_cursor: bool) {
        if self.is_alternate() {
            return;
        }
        if save_cursor {
            self.save_cursor_dec();
        }
        let cols = self.cols;
        let mut fresh = VecDeque::new();
        for _ in 0..self.view_rows {
            fresh.push_back(blank_row(cols));
        }
        let saved = SavedMain {
            buffer: std::mem::replace(&mut self.buffer, fresh),
            cursor_row: self.cursor_row,
            cursor_col: self.cursor_col,
            scroll_top: self.scroll_top,
            scroll_bottom: self.scroll_bottom,
        };
        self.main_screen = Some(saved);
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.scroll_top = 0;
        self.scroll_bottom = self.view_rows - 1;
        trace!("entered alternate screen");
    }

    /// Return to the main buffer (?1049 / ?47 reset); alternate content is
    /// discarded, never merged back
    pub fn leave_alternate_screen(&mut self, restore_cursor: bool) {
        let Some(saved) = self.main_screen.take() else {
            return;
        };
        self.buffer = saved.buffer;
        self.cursor_row = saved.cursor_row.min(self.buffer.len() - 1);
        self.cursor_col = saved.cursor_col.min(self.cols - 1);
        self.scroll_top = saved.scroll_top;
        self.scroll_bottom = saved.scroll_bottom.min(self.view_rows - 1);
        if restore_cursor {
            self.restore_cursor_dec();
        }
        trace!("left alternate screen");
    }

    /// Full reset (ESC c / RIS)
    pub fn full_reset(&mut self) {
        *self = Grid::new(self.cols, self.view_rows, self.max_history);
    }

    // ========== Resize ==========

    /// Resize the viewport, re-allocating rows and copying the overlapping
    /// content. Zero dimensions are rejected and the prior size retained.
    pub fn resize(&mut self, new_cols: usize, new_rows: usize) {
        if new_cols == 0 || new_rows == 0 {
            warn!("resize rejected: {}x{}", new_cols, new_rows);
            return;
        }
        if new_cols == self.cols && new_rows == self.view_rows {
            return;
        }

        for row in self.buffer.iter_mut() {
            row.resize(new_cols, Cell::blank());
        }
        self.cols = new_cols;
        self.view_rows = new_rows;
        self.max_history = self.max_history.max(new_rows);

        if self.is_alternate() {
            // The alternate buffer stays exactly viewport-sized
            while self.buffer.len() > new_rows {
                self.buffer.pop_back();
            }
            while self.buffer.len() < new_rows {
                self.buffer.push_back(blank_row(new_cols));
            }
            if let Some(main) = self.main_screen.as_mut() {
                for row in main.buffer.iter_mut() {
                    row.resize(new_cols, Cell::blank());
                }
                main.scroll_top = 0;
                main.scroll_bottom = new_rows - 1;
            }
        }

        self.cursor_row = self.cursor_row.min(self.buffer.len() - 1);
        self.cursor_col = self.cursor_col.min(new_cols - 1);
        self.scroll_top = 0;
        self.scroll_bottom = new_rows - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(10, 4, 100)
    }

    #[test]
    fn starts_with_single_blank_row() {
        let g = grid();
        assert_eq!(g.len(), 1);
        assert_eq!(g.cursor_row, 0);
        assert_eq!(g.cursor_col, 0);
        assert_eq!(g.cell(0, 0), Cell::blank());
    }

    #[test]
    fn put_char_advances_and_wraps() {
        let mut g = grid();
        for _ in 0..11 {
            g.put_char('x');
        }
        // 10 columns: the 11th character lands on the next row
        assert_eq!(g.cursor_row, 1);
        assert_eq!(g.cursor_col, 1);
        assert_eq!(g.cell(1, 0).ch, 'x');
    }

    #[test]
    fn linefeed_grows_buffer() {
        let mut g = grid();
        for _ in 0..6 {
            g.linefeed();
        }
        assert_eq!(g.len(), 7);
        assert_eq!(g.cursor_row, 6);
    }

    #[test]
    fn history_trim_shifts_cursor() {
        let mut g = Grid::new(10, 4, 8);
        g.put_char('a');
        for _ in 0..20 {
            g.linefeed();
        }
        assert_eq!(g.len(), 8);
        // Cursor still points at the last row of the surviving content
        assert_eq!(g.cursor_row, 7);
    }

    #[test]
    fn erase_display_2_is_hard_replace() {
        let mut g = grid();
        for _ in 0..10 {
            g.put_char('y');
            g.linefeed();
        }
        g.erase_display(2);
        assert_eq!(g.len(), 4);
        assert_eq!(g.cursor_row, 0);
        assert_eq!(g.cursor_col, 0);
        for r in 0..4 {
            for c in 0..10 {
                assert_eq!(g.cell(r, c), Cell::blank());
            }
        }
    }

    #[test]
    fn delete_chars_shifts_left() {
        let mut g = grid();
        for ch in "abcdef".chars() {
            g.put_char(ch);
        }
        g.carriage_return();
        g.move_cursor_forward(1);
        g.delete_chars(2);
        let row: String = (0..6).map(|c| g.cell(0, c).ch).collect();
        assert_eq!(row, "adef  ");
    }

    #[test]
    fn scroll_region_confines_index() {
        let mut g = Grid::new(10, 6, 100);
        for i in 0..6u8 {
            g.put_char(char::from(b'0' + i));
            if i < 5 {
                g.carriage_return();
                g.linefeed();
            }
        }
        g.set_scroll_region(3, 6); // page rows 2..=5
        g.move_cursor_to(6, 1);
        g.linefeed(); // at region bottom: scrolls rows 2-5 up
        assert_eq!(g.cell(0, 0).ch, '0');
        assert_eq!(g.cell(1, 0).ch, '1');
        assert_eq!(g.cell(2, 0).ch, '3');
        assert_eq!(g.cell(4, 0).ch, '5');
        assert_eq!(g.cell(5, 0).ch, ' ');
    }

    #[test]
    fn rows_outside_region_untouched_by_region_scroll() {
        let mut g = Grid::new(10, 6, 100);
        for i in 0..6u8 {
            g.put_char(char::from(b'a' + i));
            if i < 5 {
                g.carriage_return();
                g.linefeed();
            }
        }
        g.set_scroll_region(2, 5); // page rows 1..=4
        g.move_cursor_to(5, 1);
        g.linefeed();
        assert_eq!(g.cell(0, 0).ch, 'a');
        assert_eq!(g.cell(5, 0).ch, 'f');
        assert_eq!(g.cell(1, 0).ch, 'c');
        assert_eq!(g.cell(4, 0).ch, ' ');
    }

    #[test]
    fn insert_chars_shifts_right() {
        let mut g = grid();
        for ch in "abcdef".chars() {
            g.put_char(ch);
        }
        g.carriage_return();
        g.move_cursor_forward(1);
        g.insert_chars(2);
        let row: String = (0..10).map(|c| g.cell(0, c).ch).collect();
        assert_eq!(row, "a  bcdef  ");
    }

    #[test]
    fn erase_chars_blanks_without_shift() {
        let mut g = grid();
        for ch in "abcdef".chars() {
            g.put_char(ch);
        }
        g.carriage_return();
        g.move_cursor_forward(1);
        g.erase_chars(2);
        let row: String = (0..6).map(|c| g.cell(0, c).ch).collect();
        assert_eq!(row, "a  def");
    }

    #[test]
    fn insert_and_delete_lines_inside_region() {
        let mut g = Grid::new(10, 6, 100);
        for i in 0..6u8 {
            g.put_char(char::from(b'a' + i));
            if i < 5 {
                g.carriage_return();
                g.linefeed();
            }
        }
        g.set_scroll_region(2, 5); // page rows 1..=4, cursor homes to row 1
        g.insert_lines(1);
        assert_eq!(g.cell(0, 0).ch, 'a');
        assert_eq!(g.cell(1, 0).ch, ' ');
        assert_eq!(g.cell(2, 0).ch, 'b');
        assert_eq!(g.cell(4, 0).ch, 'd');
        assert_eq!(g.cell(5, 0).ch, 'f'); // outside the region, untouched
        g.delete_lines(1);
        assert_eq!(g.cell(1, 0).ch, 'b');
        assert_eq!(g.cell(3, 0).ch, 'd');
        assert_eq!(g.cell(4, 0).ch, ' ');
        assert_eq!(g.cell(5, 0).ch, 'f');
    }

    #[test]
    fn lines_outside_region_ignore_insert_delete() {
        let mut g = Grid::new(10, 6, 100);
        for i in 0..6u8 {
            g.put_char(char::from(b'a' + i));
            if i < 5 {
                g.carriage_return();
                g.linefeed();
            }
        }
        g.set_scroll_region(2, 5);
        g.move_cursor_to(6, 1); // below the region
        g.insert_lines(1);
        g.delete_lines(1);
        for (i, ch) in "abcdef".chars().enumerate() {
            assert_eq!(g.cell(i, 0).ch, ch);
        }
    }

    #[test]
    fn scroll_down_blanks_vacated_top() {
        let mut g = grid();
        for i in 0..4u8 {
            g.put_char(char::from(b'a' + i));
            if i < 3 {
                g.carriage_return();
                g.linefeed();
            }
        }
        g.scroll_down(1);
        assert_eq!(g.cell(0, 0).ch, ' ');
        assert_eq!(g.cell(1, 0).ch, 'a');
        assert_eq!(g.cell(3, 0).ch, 'c');
    }

    #[test]
    fn scroll_up_on_main_screen_keeps_history() {
        let mut g = grid();
        for i in 0..4u8 {
            g.put_char(char::from(b'a' + i));
            if i < 3 {
                g.carriage_return();
                g.linefeed();
            }
        }
        g.scroll_up(1);
        // The buffer grows instead of discarding the top row
        assert_eq!(g.len(), 5);
        assert_eq!(g.cell(0, 0).ch, 'a');
        assert_eq!(g.cursor_row, 4);
    }

    #[test]
    fn invalid_scroll_region_is_ignored() {
        let mut g = Grid::new(10, 6, 100);
        g.move_cursor_to(4, 3);
        g.set_scroll_region(5, 2);
        assert_eq!(g.scroll_region(), (0, 5));
        assert_eq!((g.cursor_row, g.cursor_col), (3, 2));
        g.set_scroll_region(3, 3);
        assert_eq!(g.scroll_region(), (0, 5));
        assert_eq!((g.cursor_row, g.cursor_col), (3, 2));
    }

    #[test]
    fn alternate_screen_round_trip() {
        let mut g = grid();
        for ch in "main".chars() {
            g.put_char(ch);
        }
        g.enter_alternate_screen(true);
        assert!(g.is_alternate());
        assert_eq!(g.len(), 4);
        assert_eq!(g.cell(0, 0), Cell::blank());
        for ch in "alt".chars() {
            g.put_char(ch);
        }
        g.leave_alternate_screen(true);
        assert!(!g.is_alternate());
        let row: String = (0..4).map(|c| g.cell(0, c).ch).collect();
        assert_eq!(row, "main");
        assert_eq!(g.cursor_col, 4);
    }

    #[test]
    fn resize_copies_overlap_and_clamps() {
        let mut g = grid();
        for ch in "hello".chars() {
            g.put_char(ch);
        }
        g.resize(3, 2);
        assert_eq!(g.cols(), 3);
        assert_eq!(g.view_rows(), 2);
        assert_eq!(g.cell(0, 0).ch, 'h');
        assert_eq!(g.cell(0, 2).ch, 'l');
        assert!(g.cursor_col < 3);
        // Zero dimensions are rejected
        g.resize(0, 5);
        assert_eq!(g.cols(), 3);
    }

    #[test]
    fn tab_stops_every_eight() {
        let mut g = Grid::new(20, 4, 100);
        g.tab();
        assert_eq!(g.cursor_col, 8);
        g.put_char('x');
        g.tab();
        assert_eq!(g.cursor_col, 16);
        g.tab();
        assert_eq!(g.cursor_col, 19); // clamped to last column
    }

    #[test]
    fn backspace_stops_at_left_edge() {
        let mut g = grid();
        g.put_char('x');
        g.backspace();
        assert_eq!(g.cursor_col, 0);
        g.backspace();
        assert_eq!(g.cursor_col, 0);
        // Backspace never erases
        assert_eq!(g.cell(0, 0).ch, 'x');
    }
}
