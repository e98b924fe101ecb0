//! vtgrid - terminal emulation engine for remote shell sessions
//!
//! Turns the byte stream coming back from a remote shell into an addressable
//! screen buffer, and local key intent into the bytes the shell expects.
//! Transport, rendering, and platform integration belong to the host and are
//! reached through injected capabilities.
//!
//! # Architecture
//!
//! ```text
//!   remote bytes                        host UI
//!        |                                 ^
//!        v                                 | Viewport frames
//!   SessionManager --- feed --> Terminal --+
//!        |                      |  vte::Parser -> Performer
//!        |                      |  Grid (buffer, cursor, modes)
//!        |                      |  Selection / scroll offset
//!        | send_key / paste     |
//!        +--> input::encode ----+--> ByteSink (transport, injected)
//!        +--> Clipboard (injected)
//! ```
//!
//! Dispatch never fails: malformed or unsupported sequences are consumed
//! silently so one bad byte cannot wedge a session.

pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod session;
pub mod terminal;

pub use config::Config;
pub use error::EngineError;
pub use input::{encode, Key, Modifiers};
pub use session::{ByteSink, Clipboard, SessionId, SessionManager};
pub use terminal::{Cell, Color, Grid, Selection, Style, StyleFlags, Terminal, Viewport};
