//! SGR (Select Graphic Rendition) interpreter
//!
//! Pure transformation of a CSI m parameter list onto a pen style. Parameter
//! groups are the vte parameter slices: colon sub-parameters arrive inside a
//! group (`38:2:r:g:b`), semicolon forms arrive as consecutive single-element
//! groups (`38;2;r;g;b`) and are consumed by an index cursor so that a
//! malformed color never swallows an unrelated sibling parameter.

use super::grid::{Color, Style, StyleFlags};

/// Apply an SGR parameter list to the pen style. An empty list means reset.
pub fn apply(params: &[Vec<u16>], style: &mut Style) {
    if params.is_empty() {
        *style = Style::default();
        return;
    }
    let mut i = 0;
    while i < params.len() {
        let group = &params[i];
        let code = group.first().copied().unwrap_or(0);
        match code {
            0 => *style = Style::default(),
            1 => style.flags.insert(StyleFlags::BOLD),
            2 => style.flags.insert(StyleFlags::DIM),
            3 => style.flags.insert(StyleFlags::ITALIC),
            4 => {
                // 4:0 is "underline off" in the sub-parameter form
                if group.get(1) == Some(&0) {
                    style.flags.remove(StyleFlags::UNDERLINE);
                } else {
                    style.flags.insert(StyleFlags::UNDERLINE);
                }
            }
            5 | 6 => style.flags.insert(StyleFlags::BLINK),
            7 => style.flags.insert(StyleFlags::INVERSE),
            8 => style.flags.insert(StyleFlags::HIDDEN),
            9 => style.flags.insert(StyleFlags::STRIKE),
            21 | 22 => style.flags.remove(StyleFlags::BOLD | StyleFlags::DIM),
            23 => style.flags.remove(StyleFlags::ITALIC),
            24 => style.flags.remove(StyleFlags::UNDERLINE),
            25 => style.flags.remove(StyleFlags::BLINK),
            27 => style.flags.remove(StyleFlags::INVERSE),
            28 => style.flags.remove(StyleFlags::HIDDEN),
            29 => style.flags.remove(StyleFlags::STRIKE),
            30..=37 => style.fg = Color::Indexed((code - 30) as u8),
            39 => style.fg = Color::Default,
            40..=47 => style.bg = Color::Indexed((code - 40) as u8),
            49 => style.bg = Color::Default,
            90..=97 => style.fg = Color::Indexed((code - 90 + 8) as u8),
            100..=107 => style.bg = Color::Indexed((code - 100 + 8) as u8),
            38 | 48 | 58 => {
                let (color, consumed) = if group.len() > 1 {
                    // Colon sub-parameter form, self-delimited
                    (parse_extended_color(&group[1..]).0, 0)
                } else {
                    let tail: Vec<u16> = params[i + 1..]
                        .iter()
                        .map(|g| g.first().copied().unwrap_or(0))
                        .collect();
                    parse_extended_color(&tail)
                };
                i += consumed;
                // 58 (underline color) is consumed but not carried
                if let Some(color) = color {
                    match code {
                        38 => style.fg = color,
                        48 => style.bg = color,
                        _ => {}
                    }
                }
            }
            59 => {}
            _ => {}
        }
        i += 1;
    }
}

/// Parse a `5;idx` or `2;r;g;b` extended color argument list.
/// Returns the color (if well-formed) and how many parameters were consumed.
fn parse_extended_color(args: &[u16]) -> (Option<Color>, usize) {
    match args.first() {
        Some(5) => match args.get(1) {
            Some(&idx) if idx <= 255 => (Some(palette_color(idx as u8)), 2),
            Some(_) => (None, 2),
            None => (None, 1),
        },
        Some(2) => {
            if args.len() >= 4 {
                let (r, g, b) = (args[1], args[2], args[3]);
                if r <= 255 && g <= 255 && b <= 255 {
                    (Some(Color::Rgb(r as u8, g as u8, b as u8)), 4)
                } else {
                    (None, 4)
                }
            } else {
                (None, args.len())
            }
        }
        Some(_) => (None, 1),
        None => (None, 0),
    }
}

/// Resolve a 256-color palette index.
/// 0-15 stay as palette slots (host themable); 16-231 is the 6x6x6 color
/// cube with channel steps of 51; 232-255 is the grayscale ramp.
pub fn palette_color(idx: u8) -> Color {
    match idx {
        0..=15 => Color::Indexed(idx),
        16..=231 => {
            let v = idx - 16;
            let r = (v / 36) % 6;
            let g = (v / 6) % 6;
            let b = v % 6;
            Color::Rgb(r * 51, g * 51, b * 51)
        }
        232..=255 => {
            let level = 8 + 10 * (idx - 232);
            Color::Rgb(level, level, level)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(codes: &[u16]) -> Vec<Vec<u16>> {
        codes.iter().map(|&c| vec![c]).collect()
    }

    #[test]
    fn empty_params_reset() {
        let mut style = Style::default();
        apply(&groups(&[1, 31]), &mut style);
        assert!(style.flags.contains(StyleFlags::BOLD));
        apply(&[], &mut style);
        assert_eq!(style, Style::default());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut style = Style::default();
        apply(&groups(&[0]), &mut style);
        apply(&groups(&[0]), &mut style);
        assert_eq!(style, Style::default());
    }

    #[test]
    fn basic_colors_and_bright() {
        let mut style = Style::default();
        apply(&groups(&[31, 42]), &mut style);
        assert_eq!(style.fg, Color::Indexed(1));
        assert_eq!(style.bg, Color::Indexed(2));
        apply(&groups(&[95]), &mut style);
        assert_eq!(style.fg, Color::Indexed(13));
        apply(&groups(&[39, 49]), &mut style);
        assert_eq!(style.fg, Color::Default);
        assert_eq!(style.bg, Color::Default);
    }

    #[test]
    fn rgb_semicolon_form() {
        let mut style = Style::default();
        apply(&groups(&[38, 2, 10, 20, 30]), &mut style);
        assert_eq!(style.fg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn rgb_colon_form() {
        let mut style = Style::default();
        apply(&[vec![38, 2, 1, 2, 3]], &mut style);
        assert_eq!(style.fg, Color::Rgb(1, 2, 3));
    }

    #[test]
    fn extended_color_consumes_its_arguments() {
        let mut style = Style::default();
        // The 1 after the color belongs to BOLD, not to the color payload
        apply(&groups(&[38, 5, 196, 1]), &mut style);
        assert!(style.flags.contains(StyleFlags::BOLD));
        assert_ne!(style.fg, Color::Default);
    }

    #[test]
    fn palette_cube_and_grayscale() {
        // index 232 is the first grayscale step
        assert_eq!(palette_color(232), Color::Rgb(8, 8, 8));
        assert_eq!(palette_color(255), Color::Rgb(238, 238, 238));
        // cube corner checks
        assert_eq!(palette_color(16), Color::Rgb(0, 0, 0));
        assert_eq!(palette_color(231), Color::Rgb(255, 255, 255));
        assert_eq!(palette_color(196), Color::Rgb(255, 0, 0));
        // 0-15 stay indexed
        assert_eq!(palette_color(9), Color::Indexed(9));
    }

    #[test]
    fn truncated_color_payload_ignored() {
        let mut style = Style::default();
        apply(&groups(&[38, 2, 10]), &mut style);
        assert_eq!(style.fg, Color::Default);
        apply(&groups(&[38, 5]), &mut style);
        assert_eq!(style.fg, Color::Default);
    }

    #[test]
    fn bold_dim_cleared_together() {
        let mut style = Style::default();
        apply(&groups(&[1, 2]), &mut style);
        apply(&groups(&[22]), &mut style);
        assert!(!style.flags.contains(StyleFlags::BOLD));
        assert!(!style.flags.contains(StyleFlags::DIM));
    }
}
