//! Line-rewrite heuristic
//!
//! Tracks whether the remote shell appears to be redrawing the current input
//! line (backspace echo, delete-key echo, or a carriage return with text
//! pending on the row). Purely advisory: hosts may use it to debounce
//! rendering or mute intermediate states, and it never affects buffer
//! contents.

/// Advisory "line rewrite in progress" state
#[derive(Debug, Default)]
pub struct RewriteTracker {
    rewriting: bool,
}

impl RewriteTracker {
    /// Backspace echo from the remote side
    pub fn note_backspace(&mut self) {
        self.rewriting = true;
    }

    /// Delete-key echo from the remote side
    pub fn note_delete_key(&mut self) {
        self.rewriting = true;
    }

    /// Carriage return; a CR with text already on the row means the line is
    /// about to be redrawn in place
    pub fn note_carriage_return(&mut self, cursor_col: usize) {
        if cursor_col > 0 {
            self.rewriting = true;
        }
    }

    /// Linefeed commits the line and ends any rewrite
    pub fn finish(&mut self) {
        self.rewriting = false;
    }

    pub fn is_rewriting(&self) -> bool {
        self.rewriting
    }
}
