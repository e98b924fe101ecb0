//! Engine-wide constants

/// Tab stop interval
pub const TAB_WIDTH: usize = 8;

/// Default scrollback history cap (rows)
pub const DEFAULT_MAX_HISTORY: usize = 10_000;

/// Default grid width
pub const DEFAULT_COLS: usize = 80;

/// Default grid height
pub const DEFAULT_ROWS: usize = 24;
