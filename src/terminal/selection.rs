//! Text selection
//!
//! Selections live in buffer coordinates so they stay attached to their rows
//! while the viewport scrolls. Anchor and extent are the two drag endpoints
//! in either order; both endpoint cells are inside the selection.

use super::grid::Grid;

/// A selection span between two buffer positions, endpoint-inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where the drag started (row, col)
    pub anchor: (usize, usize),
    /// Where the drag currently ends (row, col)
    pub extent: (usize, usize),
}

impl Selection {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            anchor: (row, col),
            extent: (row, col),
        }
    }

    /// Endpoints in buffer order (start <= end)
    pub fn normalized(&self) -> ((usize, usize), (usize, usize)) {
        if self.anchor <= self.extent {
            (self.anchor, self.extent)
        } else {
            (self.extent, self.anchor)
        }
    }

    /// Whether a buffer cell falls inside the selection
    pub fn contains(&self, row: usize, col: usize) -> bool {
        let (start, end) = self.normalized();
        (row, col) >= start && (row, col) <= end
    }
}

/// Character classes for word selection boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    /// Identifier characters: letters, digits, underscore
    Word,
    /// Filesystem-path punctuation
    Path,
    /// Any other non-whitespace symbol
    Other,
    Whitespace,
}

fn classify(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Whitespace
    } else if ch.is_ascii_alphanumeric() || ch == '_' {
        CharClass::Word
    } else if matches!(ch, '/' | '\\' | '.' | '-') {
        CharClass::Path
    } else {
        CharClass::Other
    }
}

/// Characters that always end a path run
fn is_path_delimiter(ch: char) -> bool {
    matches!(
        ch,
        '(' | ')' | '[' | ']' | '{' | '}' | '<' | '>' | '\'' | '"' | '`'
    )
}

/// Select the word under a buffer cell. Whitespace selects nothing.
///
/// A click on an identifier character expands over identifier characters
/// only; a click on path punctuation greedily takes the surrounding
/// path-like run (`/usr/local/bin-x.y`); any other symbol expands over its
/// own class.
pub fn select_word_at(grid: &Grid, row: usize, col: usize) -> Option<Selection> {
    if row >= grid.len() {
        return None;
    }
    let col = col.min(grid.cols().saturating_sub(1));
    let clicked = classify(grid.cell(row, col).ch);

    let keep = |ch: char| -> bool {
        match clicked {
            CharClass::Whitespace => false,
            CharClass::Word => classify(ch) == CharClass::Word,
            CharClass::Path => !ch.is_whitespace() && !is_path_delimiter(ch),
            CharClass::Other => classify(ch) == CharClass::Other,
        }
    };

    if !keep(grid.cell(row, col).ch) {
        return None;
    }

    let mut start = col;
    while start > 0 && keep(grid.cell(row, start - 1).ch) {
        start -= 1;
    }
    let mut end = col;
    while end + 1 < grid.cols() && keep(grid.cell(row, end + 1).ch) {
        end += 1;
    }

    Some(Selection {
        anchor: (row, start),
        extent: (row, end),
    })
}

/// Select a whole buffer row
pub fn select_line_at(grid: &Grid, row: usize) -> Option<Selection> {
    if row >= grid.len() {
        return None;
    }
    Some(Selection {
        anchor: (row, 0),
        extent: (row, grid.cols().saturating_sub(1)),
    })
}

/// Extract the selected text. Rows are joined with `\n`; every row but the
/// last has its trailing blanks trimmed.
pub fn extract_text(grid: &Grid, selection: &Selection) -> String {
    let ((start_row, start_col), (end_row, end_col)) = selection.normalized();
    let end_row = end_row.min(grid.len().saturating_sub(1));
    let last_col = grid.cols().saturating_sub(1);

    let mut lines = Vec::new();
    for row in start_row..=end_row {
        let from = if row == start_row { start_col.min(last_col) } else { 0 };
        let to = if row == end_row {
            end_col.min(last_col)
        } else {
            last_col
        };
        let text: String = (from..=to).map(|c| grid.cell(row, c).ch).collect();
        lines.push(text);
    }
    let n = lines.len();
    for line in lines.iter_mut().take(n.saturating_sub(1)) {
        let trimmed = line.trim_end().len();
        line.truncate(trimmed);
    }
    lines.join("\n")
}
