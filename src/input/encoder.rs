//! Key to byte sequence encoding
//!
//! Converts host key intent into the bytes a remote shell expects: plain
//! characters, control chords, Alt-as-ESC-prefix, and the CSI/SS3 sequences
//! for arrows, navigation, and function keys with xterm modifier codes.

/// A key the host can deliver. Printable input arrives as `Char`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Tab,
    Escape,
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    /// Function key, 1-12
    F(u8),
}

/// Modifier state at the time of the keypress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
    };

    fn any(&self) -> bool {
        self.shift || self.alt || self.ctrl
    }

    /// xterm modifier parameter: 1 + shift(1) + alt(2) + ctrl(4)
    fn code(&self) -> u8 {
        let mut code = 1;
        if self.shift {
            code += 1;
        }
        if self.alt {
            code += 2;
        }
        if self.ctrl {
            code += 4;
        }
        code
    }
}

/// Encode a keypress. `app_cursor` is the DECCKM state from the grid modes.
/// Keys with no encoding return an empty vector.
pub fn encode(key: Key, mods: Modifiers, app_cursor: bool) -> Vec<u8> {
    match key {
        Key::Char(c) => encode_char(c, mods),
        Key::Enter => prefix_alt(mods, vec![b'\r']),
        Key::Backspace => prefix_alt(mods, vec![0x08]),
        Key::Tab => {
            if mods.shift {
                b"\x1b[Z".to_vec()
            } else {
                prefix_alt(mods, vec![b'\t'])
            }
        }
        Key::Escape => vec![0x1b],
        Key::Up => cursor_key(b'A', mods, app_cursor),
        Key::Down => cursor_key(b'B', mods, app_cursor),
        Key::Right => cursor_key(b'C', mods, app_cursor),
        Key::Left => cursor_key(b'D', mods, app_cursor),
        Key::Home => cursor_key(b'H', mods, app_cursor),
        Key::End => cursor_key(b'F', mods, app_cursor),
        Key::Insert => tilde_key(2, mods),
        Key::Delete => tilde_key(3, mods),
        Key::PageUp => tilde_key(5, mods),
        Key::PageDown => tilde_key(6, mods),
        Key::F(n) => function_key(n, mods),
    }
}

fn encode_char(c: char, mods: Modifiers) -> Vec<u8> {
    // Alt chords send ESC plus the lowercased character
    let c = if mods.alt { c.to_ascii_lowercase() } else { c };
    let base: Vec<u8> = if mods.ctrl {
        match c {
            'a'..='z' => vec![c as u8 - b'a' + 1],
            'A'..='Z' => vec![c as u8 - b'A' + 1],
            ' ' | '@' => vec![0x00],
            '[' => vec![0x1b],
            '\\' => vec![0x1c],
            ']' => vec![0x1d],
            '^' => vec![0x1e],
            '_' | '/' => vec![0x1f],
            '?' => vec![0x7f],
            _ => c.to_string().into_bytes(),
        }
    } else {
        c.to_string().into_bytes()
    };
    prefix_alt(mods, base)
}

fn prefix_alt(mods: Modifiers, mut bytes: Vec<u8>) -> Vec<u8> {
    if mods.alt {
        bytes.insert(0, 0x1b);
    }
    bytes
}

/// Arrows and Home/End: CSI with a modifier parameter when chorded,
/// SS3 in application cursor mode, bare CSI otherwise
fn cursor_key(final_byte: u8, mods: Modifiers, app_cursor: bool) -> Vec<u8> {
    if mods.any() {
        format!("\x1b[1;{}{}", mods.code(), final_byte as char).into_bytes()
    } else if app_cursor {
        vec![0x1b, b'O', final_byte]
    } else {
        vec![0x1b, b'[', final_byte]
    }
}

/// Editing/navigation keys of the `CSI code ~` family
fn tilde_key(code: u8, mods: Modifiers) -> Vec<u8> {
    if mods.any() {
        format!("\x1b[{};{}~", code, mods.code()).into_bytes()
    } else {
        format!("\x1b[{}~", code).into_bytes()
    }
}

fn function_key(n: u8, mods: Modifiers) -> Vec<u8> {
    match n {
        1..=4 => {
            let final_byte = b'P' + (n - 1);
            if mods.any() {
                format!("\x1b[1;{}{}", mods.code(), final_byte as char).into_bytes()
            } else {
                vec![0x1b, b'O', final_byte]
            }
        }
        5..=12 => {
            let code = match n {
                5 => 15,
                6 => 17,
                7 => 18,
                8 => 19,
                9 => 20,
                10 => 21,
                11 => 23,
                _ => 24,
            };
            tilde_key(code, mods)
        }
        _ => Vec::new(),
    }
}
