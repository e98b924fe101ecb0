//! Session management
//!
//! `SessionManager` hosts many independent terminal engines, keyed by
//! `SessionId`, and owns the two outward capabilities the engine needs:
//! a byte sink toward the transport and a clipboard. Both are injected at
//! construction so the engine never touches a global.

use std::collections::HashMap;
use std::fmt;

use log::{debug, info};

use crate::error::EngineError;
use crate::input::{encode, Key, Modifiers};
use crate::terminal::{Terminal, Viewport};

/// Opaque session handle chosen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound bytes toward the remote side (the host owns the transport)
pub trait ByteSink {
    fn write(&mut self, id: SessionId, bytes: &[u8]);
    /// Dimension change notification for the remote side
    fn resize(&mut self, id: SessionId, cols: u16, rows: u16);
}

/// Host clipboard access
pub trait Clipboard {
    fn set_text(&mut self, text: &str);
}

/// Registry of live terminal sessions plus the injected capabilities
pub struct SessionManager {
    sessions: HashMap<SessionId, Terminal>,
    sink: Box<dyn ByteSink>,
    clipboard: Box<dyn Clipboard>,
}

impl SessionManager {
    pub fn new(sink: Box<dyn ByteSink>, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            sessions: HashMap::new(),
            sink,
            clipboard,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn terminal(&self, id: SessionId) -> Result<&Terminal, EngineError> {
        self.sessions.get(&id).ok_or(EngineError::UnknownSession(id))
    }

    fn terminal_mut(&mut self, id: SessionId) -> Result<&mut Terminal, EngineError> {
        self.sessions
            .get_mut(&id)
            .ok_or(EngineError::UnknownSession(id))
    }

    // ========== Lifecycle ==========

    pub fn open(&mut self, id: SessionId, cols: u16, rows: u16) -> Result<(), EngineError> {
        if cols == 0 || rows == 0 {
            return Err(EngineError::InvalidDimensions { cols, rows });
        }
        if self.sessions.contains_key(&id) {
            return Err(EngineError::SessionExists(id));
        }
        info!("session {} opened at {}x{}", id, cols, rows);
        self.sessions
            .insert(id, Terminal::new(cols as usize, rows as usize));
        Ok(())
    }

    pub fn close(&mut self, id: SessionId) -> Result<(), EngineError> {
        self.sessions
            .remove(&id)
            .map(|_| info!("session {} closed", id))
            .ok_or(EngineError::UnknownSession(id))
    }

    // ========== Byte stream ==========

    /// Feed remote output into a session; status-report replies go straight
    /// back out through the sink
    pub fn feed(&mut self, id: SessionId, bytes: &[u8]) -> Result<(), EngineError> {
        let responses = self.terminal_mut(id)?.feed(bytes);
        if !responses.is_empty() {
            self.sink.write(id, &responses);
        }
        Ok(())
    }

    /// Encode a keypress and send it to the remote side
    pub fn send_key(&mut self, id: SessionId, key: Key, mods: Modifiers) -> Result<(), EngineError> {
        let term = self.terminal(id)?;
        let app_cursor = term.grid().modes.application_cursor_keys;
        let bytes = encode(key, mods, app_cursor);
        if !bytes.is_empty() {
            self.sink.write(id, &bytes);
        }
        Ok(())
    }

    /// Send host paste text, honoring the session's bracketed paste mode
    pub fn paste(&mut self, id: SessionId, text: &str) -> Result<(), EngineError> {
        let bytes = self.terminal(id)?.paste_bytes(text);
        self.sink.write(id, &bytes);
        Ok(())
    }

    /// Resize a session and notify the remote side
    pub fn resize(&mut self, id: SessionId, cols: u16, rows: u16) -> Result<(), EngineError> {
        if cols == 0 || rows == 0 {
            return Err(EngineError::InvalidDimensions { cols, rows });
        }
        self.terminal_mut(id)?.resize(cols as usize, rows as usize);
        debug!("session {} resized to {}x{}", id, cols, rows);
        self.sink.resize(id, cols, rows);
        Ok(())
    }

    // ========== Viewport ==========

    pub fn viewport(&self, id: SessionId) -> Result<Viewport, EngineError> {
        Ok(self.terminal(id)?.viewport())
    }

    pub fn scroll_back(&mut self, id: SessionId, n: usize) -> Result<(), EngineError> {
        self.terminal_mut(id)?.scroll_back(n);
        Ok(())
    }

    pub fn scroll_forward(&mut self, id: SessionId, n: usize) -> Result<(), EngineError> {
        self.terminal_mut(id)?.scroll_forward(n);
        Ok(())
    }

    pub fn scroll_to_bottom(&mut self, id: SessionId) -> Result<(), EngineError> {
        self.terminal_mut(id)?.scroll_to_bottom();
        Ok(())
    }

    // ========== Selection ==========

    pub fn begin_selection(
        &mut self,
        id: SessionId,
        row: usize,
        col: usize,
    ) -> Result<(), EngineError> {
        self.terminal_mut(id)?.begin_selection(row, col);
        Ok(())
    }

    pub fn extend_selection(
        &mut self,
        id: SessionId,
        row: usize,
        col: usize,
    ) -> Result<(), EngineError> {
        self.terminal_mut(id)?.extend_selection(row, col);
        Ok(())
    }

    pub fn end_selection(&mut self, id: SessionId) -> Result<(), EngineError> {
        self.terminal_mut(id)?.end_selection();
        Ok(())
    }

    pub fn select_word(
        &mut self,
        id: SessionId,
        row: usize,
        col: usize,
    ) -> Result<(), EngineError> {
        self.terminal_mut(id)?.select_word(row, col);
        Ok(())
    }

    pub fn select_line(&mut self, id: SessionId, row: usize) -> Result<(), EngineError> {
        self.terminal_mut(id)?.select_line(row);
        Ok(())
    }

    pub fn selected_text(&self, id: SessionId) -> Result<Option<String>, EngineError> {
        Ok(self.terminal(id)?.selected_text())
    }

    /// Copy the current selection to the host clipboard, if there is one
    pub fn copy_selection(&mut self, id: SessionId) -> Result<(), EngineError> {
        if let Some(text) = self.terminal(id)?.selected_text() {
            if !text.is_empty() {
                self.clipboard.set_text(&text);
            }
        }
        Ok(())
    }
}
