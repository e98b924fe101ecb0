//! Viewport projection
//!
//! Pure mapping from the grid buffer and a scroll offset to the host-visible
//! rectangle. The buffer is the source of truth; the viewport is a window
//! over its tail, shifted back by the scroll offset, blank-padded on top
//! while the buffer is still shorter than the window.

use super::grid::{Cell, Grid};

/// One projected frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// Exactly `rows` x `cols` cells
    pub cells: Vec<Vec<Cell>>,
    /// Cursor in viewport coordinates; None while scrolled back or hidden
    pub cursor: Option<(usize, usize)>,
}

/// Project a `rows` x `cols` window onto the buffer at `scroll_offset` rows
/// back from the live tail. The offset is clamped to the available history.
pub fn project(grid: &Grid, rows: usize, cols: usize, scroll_offset: usize) -> Viewport {
    if rows == 0 || cols == 0 {
        return Viewport {
            cells: Vec::new(),
            cursor: None,
        };
    }

    let len = grid.len();
    let max_offset = len.saturating_sub(rows);
    let offset = scroll_offset.min(max_offset);
    let end = len - offset;
    let start = end.saturating_sub(rows);

    let pad = rows - (end - start);
    let mut cells = Vec::with_capacity(rows);
    for _ in 0..pad {
        cells.push(vec![Cell::blank(); cols]);
    }
    for buf_row in start..end {
        let mut out = Vec::with_capacity(cols);
        for col in 0..cols {
            out.push(grid.cell(buf_row, col));
        }
        cells.push(out);
    }

    let cursor = if offset == 0
        && grid.modes.cursor_visible
        && grid.cursor_row >= start
        && grid.cursor_row < end
    {
        let row = pad + grid.cursor_row - start;
        let col = grid.cursor_col.min(cols.saturating_sub(1));
        Some((row, col))
    } else {
        None
    };

    Viewport { cells, cursor }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_lines(lines: &[&str]) -> Grid {
        let mut g = Grid::new(10, 4, 100);
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                g.carriage_return();
                g.linefeed();
            }
            for ch in line.chars() {
                g.put_char(ch);
            }
        }
        g
    }

    fn row_text(vp: &Viewport, row: usize) -> String {
        vp.cells[row].iter().map(|c| c.ch).collect::<String>().trim_end().to_string()
    }

    #[test]
    fn short_buffer_is_bottom_anchored() {
        let g = grid_with_lines(&["one", "two"]);
        let vp = project(&g, 4, 10, 0);
        assert_eq!(vp.cells.len(), 4);
        assert_eq!(row_text(&vp, 0), "");
        assert_eq!(row_text(&vp, 1), "");
        assert_eq!(row_text(&vp, 2), "one");
        assert_eq!(row_text(&vp, 3), "two");
        // Cursor follows its row down to the anchored position
        assert_eq!(vp.cursor, Some((3, 3)));
    }

    #[test]
    fn deep_buffer_shows_tail() {
        let g = grid_with_lines(&["a", "b", "c", "d", "e", "f"]);
        let vp = project(&g, 4, 10, 0);
        assert_eq!(row_text(&vp, 0), "c");
        assert_eq!(row_text(&vp, 3), "f");
    }

    #[test]
    fn scroll_offset_shifts_window_and_hides_cursor() {
        let g = grid_with_lines(&["a", "b", "c", "d", "e", "f"]);
        let vp = project(&g, 4, 10, 1);
        assert_eq!(row_text(&vp, 0), "b");
        assert_eq!(row_text(&vp, 3), "e");
        assert_eq!(vp.cursor, None);
    }

    #[test]
    fn offset_clamps_to_history() {
        let g = grid_with_lines(&["a", "b", "c", "d", "e", "f"]);
        let vp = project(&g, 4, 10, 999);
        assert_eq!(row_text(&vp, 0), "a");
        assert_eq!(row_text(&vp, 3), "d");
    }

    #[test]
    fn narrow_projection_truncates_and_wide_pads() {
        let g = grid_with_lines(&["abcdef"]);
        let narrow = project(&g, 1, 3, 0);
        assert_eq!(narrow.cells[0].len(), 3);
        assert_eq!(row_text(&narrow, 0), "abc");
        let wide = project(&g, 1, 15, 0);
        assert_eq!(wide.cells[0].len(), 15);
        assert_eq!(wide.cells[0][12].ch, ' ');
    }

    #[test]
    fn hidden_cursor_not_reported() {
        let mut g = grid_with_lines(&["x"]);
        g.modes.cursor_visible = false;
        let vp = project(&g, 4, 10, 0);
        assert_eq!(vp.cursor, None);
    }
}
