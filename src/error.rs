//! Engine error types

use thiserror::Error;

use crate::session::SessionId;

/// Errors surfaced at the session-management boundary.
///
/// Byte-stream dispatch never fails: malformed or unknown sequences are
/// consumed silently. Errors exist only where the host can act on them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    #[error("session already exists: {0}")]
    SessionExists(SessionId),

    #[error("invalid dimensions: {cols}x{rows}")]
    InvalidDimensions { cols: u16, rows: u16 },
}
