//! VT escape sequence dispatcher
//!
//! Implements vte crate's Perform trait and applies parsed results to Grid.
//! Unknown sequences are consumed and traced, never printed as text.

use log::trace;
use vte::{Params, Perform};

use super::grid::Grid;
use super::line_edit::RewriteTracker;
use super::sgr;

/// vte::Perform implementation
/// Holds a reference to Grid and directly applies parsed results
pub struct Performer<'a> {
    pub grid: &'a mut Grid,
    /// Viewport scroll offset; hard clears and alternate screen reset it
    pub scroll_offset: &'a mut usize,
    pub line_edit: &'a mut RewriteTracker,
    /// Bytes owed to the transport (DSR replies)
    pub responses: &'a mut Vec<u8>,
}

impl<'a> Performer<'a> {
    pub fn new(
        grid: &'a mut Grid,
        scroll_offset: &'a mut usize,
        line_edit: &'a mut RewriteTracker,
        responses: &'a mut Vec<u8>,
    ) -> Self {
        Self {
            grid,
            scroll_offset,
            line_edit,
            responses,
        }
    }
}

impl<'a> Perform for Performer<'a> {
    /// Handle printable character
    fn print(&mut self, c: char) {
        self.grid.put_char(c);
    }

    /// Handle C0 control character
    fn execute(&mut self, byte: u8) {
        match byte {
            0x08 => {
                // BS
                self.grid.backspace();
                self.line_edit.note_backspace();
            }
            0x09 => self.grid.tab(), // HT
            0x0A | 0x0B | 0x0C => {
                // LF, VT, FF
                self.grid.linefeed();
                self.line_edit.finish();
            }
            0x0D => {
                // CR
                self.line_edit.note_carriage_return(self.grid.cursor_col);
                self.grid.carriage_return();
            }
            0x07 => trace!("BEL"),
            _ => {
                trace!("Unhandled control character: 0x{:02x}", byte);
            }
        }
    }

    /// Handle CSI sequence
    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        // Convert parameters to flat array (supports sub-parameters)
        let flat_params: Vec<Vec<u16>> = params.iter().map(|p| p.to_vec()).collect();

        // First parameter (with default value)
        let param0 = flat_params
            .first()
            .and_then(|p| p.first().copied())
            .unwrap_or(0);
        let count = if param0 == 0 { 1 } else { param0 as usize };

        match (action, intermediates) {
            ('A', []) => self.grid.move_cursor_up(count), // CUU
            ('B', []) => self.grid.move_cursor_down(count), // CUD
            ('C', []) => self.grid.move_cursor_forward(count), // CUF
            ('D', []) => self.grid.move_cursor_backward(count), // CUB
            ('E', []) => {
                // CNL - Cursor Next Line
                self.grid.move_cursor_down(count);
                self.grid.carriage_return();
            }
            ('F', []) => {
                // CPL - Cursor Previous Line
                self.grid.move_cursor_up(count);
                self.grid.carriage_return();
            }
            ('H' | 'f', []) => {
                // CUP - Cursor Position
                let col = flat_params
                    .get(1)
                    .and_then(|p| p.first().copied())
                    .map(|v| if v == 0 { 1 } else { v as usize })
                    .unwrap_or(1);
                self.grid.move_cursor_to(count, col);
            }
            ('G', []) => self.grid.set_column(count), // CHA
            ('d', []) => self.grid.set_row(count),    // VPA
            ('J', []) => {
                // ED - Erase in Display
                self.grid.erase_display(param0);
                if param0 == 2 || param0 == 3 {
                    *self.scroll_offset = 0;
                }
            }
            ('K', []) => self.grid.erase_line(param0), // EL
            ('L', []) => self.grid.insert_lines(count), // IL
            ('M', []) => self.grid.delete_lines(count), // DL
            ('P', []) => self.grid.delete_chars(count), // DCH
            ('@', []) => self.grid.insert_chars(count), // ICH
            ('X', []) => self.grid.erase_chars(count), // ECH
            ('S', []) => self.grid.scroll_up(count),   // SU
            ('T', []) => self.grid.scroll_down(count), // SD
            ('b', []) => self.grid.repeat_char(count), // REP
            ('s', []) => self.grid.save_cursor(),      // SCOSC
            ('u', []) => self.grid.restore_cursor(),   // SCORC
            ('m', []) => sgr::apply(&flat_params, self.grid.pen_mut()),
            ('n', []) => {
                // DSR - Device Status Report
                match param0 {
                    5 => {
                        // Status report: normal operation
                        self.responses.extend_from_slice(b"\x1b[0n");
                    }
                    6 => {
                        // Cursor position report: ESC [ row ; col R
                        let row = self.grid.page_cursor_row() + 1;
                        let col = self.grid.cursor_col + 1;
                        self.responses
                            .extend_from_slice(format!("\x1b[{};{}R", row, col).as_bytes());
                    }
                    _ => {}
                }
            }
            ('r', []) => {
                // DECSTBM - Set Top and Bottom Margins
                let top = param0 as usize;
                let bottom = flat_params
                    .get(1)
                    .and_then(|p| p.first().copied())
                    .unwrap_or(0) as usize;
                self.grid.set_scroll_region(top, bottom);
            }
            ('h', [b'?']) => self.handle_decset(param0, true),
            ('l', [b'?']) => self.handle_decset(param0, false),
            ('~', []) => {
                // Keyboard editing-key echo; 3 is the delete key
                if param0 == 3 {
                    self.line_edit.note_delete_key();
                }
            }
            _ => {
                trace!(
                    "Unhandled CSI: action='{}', intermediates={:?}, params={:?}",
                    action,
                    intermediates,
                    flat_params
                );
            }
        }
    }

    /// Handle escape sequence
    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        match (byte, intermediates) {
            (b'7', []) => self.grid.save_cursor_dec(), // DECSC
            (b'8', []) => self.grid.restore_cursor_dec(), // DECRC
            (b'D', []) => {
                // IND - Index (move cursor down 1 line, with scroll)
                self.grid.linefeed();
            }
            (b'E', []) => {
                // NEL - Next Line
                self.grid.carriage_return();
                self.grid.linefeed();
            }
            (b'M', []) => {
                // RI - Reverse Index (move cursor up 1 line)
                self.grid.reverse_index();
            }
            (b'c', []) => {
                // RIS - Full Reset
                self.grid.full_reset();
                *self.scroll_offset = 0;
                self.line_edit.finish();
            }
            _ => {
                trace!(
                    "Unhandled ESC: byte=0x{:02x}, intermediates={:?}",
                    byte,
                    intermediates
                );
            }
        }
    }

    /// DCS sequence start: consumed, not interpreted
    fn hook(&mut self, _params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        trace!("Ignored DCS: action='{}', intermediates={:?}", action, intermediates);
    }

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    /// OSC sequences (titles, hyperlinks, ...) are consumed whole
    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        if params.is_empty() {
            return;
        }
        let cmd = std::str::from_utf8(params[0]).unwrap_or("");
        trace!("Ignored OSC: cmd={}", cmd);
    }
}

impl<'a> Performer<'a> {
    /// DECSET/DECRST handling
    fn handle_decset(&mut self, mode: u16, enable: bool) {
        match mode {
            1 => {
                // DECCKM - Application Cursor Keys
                self.grid.modes.application_cursor_keys = enable;
            }
            25 => {
                // DECTCEM - Cursor visibility
                self.grid.modes.cursor_visible = enable;
            }
            47 => {
                // Alternate screen (no cursor save)
                if enable {
                    self.grid.enter_alternate_screen(false);
                    *self.scroll_offset = 0;
                } else {
                    self.grid.leave_alternate_screen(false);
                }
            }
            1049 => {
                // Alternate screen with cursor save/restore
                if enable {
                    self.grid.enter_alternate_screen(true);
                    *self.scroll_offset = 0;
                } else {
                    self.grid.leave_alternate_screen(true);
                }
            }
            2004 => {
                // Bracketed paste
                self.grid.modes.bracketed_paste = enable;
            }
            _ => {
                trace!("Unhandled private mode: {} enable={}", mode, enable);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::grid::{Cell, Color};

    fn feed(grid: &mut Grid, bytes: &[u8]) -> Vec<u8> {
        let mut offset = 0;
        let mut tracker = RewriteTracker::default();
        let mut responses = Vec::new();
        let mut parser = vte::Parser::new();
        let mut performer = Performer::new(grid, &mut offset, &mut tracker, &mut responses);
        for &b in bytes {
            parser.advance(&mut performer, b);
        }
        responses
    }

    fn row_text(grid: &Grid, row: usize) -> String {
        (0..grid.cols()).map(|c| grid.cell(row, c).ch).collect()
    }

    #[test]
    fn plain_text_prints() {
        let mut g = Grid::new(10, 4, 100);
        feed(&mut g, b"hi");
        assert_eq!(g.cell(0, 0).ch, 'h');
        assert_eq!(g.cell(0, 1).ch, 'i');
        assert_eq!(g.cursor_col, 2);
    }

    #[test]
    fn cursor_position_defaults_and_clamps() {
        let mut g = Grid::new(10, 4, 100);
        feed(&mut g, b"\x1b[H");
        assert_eq!((g.cursor_row, g.cursor_col), (0, 0));
        feed(&mut g, b"\x1b[999;999H");
        assert_eq!(g.cursor_row, g.len() - 1);
        assert_eq!(g.cursor_col, 9);
    }

    #[test]
    fn sgr_flows_into_cells() {
        let mut g = Grid::new(10, 4, 100);
        feed(&mut g, b"\x1b[31mx\x1b[0my");
        assert_eq!(g.cell(0, 0).style.fg, Color::Indexed(1));
        assert_eq!(g.cell(0, 1).style.fg, Color::Default);
    }

    #[test]
    fn dsr_cursor_report() {
        let mut g = Grid::new(10, 4, 100);
        let resp = feed(&mut g, b"ab\x1b[6n");
        assert_eq!(resp, b"\x1b[1;3R");
    }

    #[test]
    fn unknown_csi_is_swallowed() {
        let mut g = Grid::new(10, 4, 100);
        feed(&mut g, b"\x1b[?9999zok");
        assert_eq!(row_text(&g, 0).trim_end(), "ok");
    }

    #[test]
    fn split_sequence_resumes_across_chunks() {
        let mut g = Grid::new(10, 4, 100);
        let mut offset = 0;
        let mut tracker = RewriteTracker::default();
        let mut responses = Vec::new();
        let mut parser = vte::Parser::new();
        for chunk in [b"\x1b[3".as_slice(), b"1mz".as_slice()] {
            let mut performer =
                Performer::new(&mut g, &mut offset, &mut tracker, &mut responses);
            for &b in chunk {
                parser.advance(&mut performer, b);
            }
        }
        assert_eq!(g.cell(0, 0).ch, 'z');
        assert_eq!(g.cell(0, 0).style.fg, Color::Indexed(1));
    }

    #[test]
    fn rep_repeats_last_printable() {
        let mut g = Grid::new(10, 4, 100);
        feed(&mut g, b"a\x1b[3b");
        assert_eq!(row_text(&g, 0).trim_end(), "aaaa");
    }

    #[test]
    fn alternate_screen_modes() {
        let mut g = Grid::new(10, 4, 100);
        feed(&mut g, b"main\x1b[?1049h");
        assert!(g.is_alternate());
        assert_eq!(g.cell(0, 0), Cell::blank());
        feed(&mut g, b"alt\x1b[?1049l");
        assert!(!g.is_alternate());
        assert_eq!(row_text(&g, 0).trim_end(), "main");
    }

    #[test]
    fn mode_47_alternate_round_trip() {
        let mut g = Grid::new(10, 4, 100);
        feed(&mut g, b"one\x1b[?47h");
        assert!(g.is_alternate());
        feed(&mut g, b"two");
        assert_eq!(row_text(&g, 0).trim_end(), "two");
        feed(&mut g, b"\x1b[?47l");
        assert!(!g.is_alternate());
        assert_eq!(row_text(&g, 0).trim_end(), "one");
    }

    #[test]
    fn insert_delete_erase_chars_dispatch() {
        let mut g = Grid::new(10, 4, 100);
        feed(&mut g, b"abcdef\x1b[2G\x1b[2@");
        assert_eq!(row_text(&g, 0).trim_end(), "a  bcdef");
        feed(&mut g, b"\x1b[2P");
        assert_eq!(row_text(&g, 0).trim_end(), "abcdef");
        feed(&mut g, b"\x1b[2X");
        assert_eq!(row_text(&g, 0).trim_end(), "a  def");
    }

    #[test]
    fn scroll_command_dispatch() {
        let mut g = Grid::new(10, 4, 100);
        feed(&mut g, b"r0\r\nr1\r\nr2\r\nr3");
        feed(&mut g, b"\x1b[T");
        assert_eq!(row_text(&g, 0).trim_end(), "");
        assert_eq!(row_text(&g, 1).trim_end(), "r0");
        assert_eq!(row_text(&g, 3).trim_end(), "r2");
        feed(&mut g, b"\x1b[S");
        // Unrestricted scroll-up on the main screen grows the buffer
        assert_eq!(g.len(), 5);
        assert_eq!(row_text(&g, 1).trim_end(), "r0");
    }

    #[test]
    fn insert_delete_lines_dispatch() {
        let mut g = Grid::new(10, 6, 100);
        feed(&mut g, b"a\r\nb\r\nc\r\nd\r\ne\r\nf");
        feed(&mut g, b"\x1b[2;5r\x1b[2L");
        assert_eq!(row_text(&g, 1).trim_end(), "");
        assert_eq!(row_text(&g, 3).trim_end(), "b");
        assert_eq!(row_text(&g, 5).trim_end(), "f");
        feed(&mut g, b"\x1b[2M");
        assert_eq!(row_text(&g, 1).trim_end(), "b");
        assert_eq!(row_text(&g, 5).trim_end(), "f");
    }

    #[test]
    fn decset_flags_toggle() {
        let mut g = Grid::new(10, 4, 100);
        feed(&mut g, b"\x1b[?1h\x1b[?25l\x1b[?2004h");
        assert!(g.modes.application_cursor_keys);
        assert!(!g.modes.cursor_visible);
        assert!(g.modes.bracketed_paste);
        feed(&mut g, b"\x1b[?1l\x1b[?25h\x1b[?2004l");
        assert!(!g.modes.application_cursor_keys);
        assert!(g.modes.cursor_visible);
        assert!(!g.modes.bracketed_paste);
    }

    #[test]
    fn osc_title_is_discarded() {
        let mut g = Grid::new(20, 4, 100);
        feed(&mut g, b"\x1b]0;window title\x07after");
        assert_eq!(row_text(&g, 0).trim_end(), "after");
    }
}
