//! Key input handling

pub mod encoder;

pub use encoder::{encode, Key, Modifiers};
