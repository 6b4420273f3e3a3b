// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::color::palette::css;
use text_runs::Color;

fn hex_digit(byte: u8) -> Option<u8> {
    char::from(byte)
        .to_digit(16)
        .and_then(|digit| u8::try_from(digit).ok())
}

fn hex_bytes<const N: usize>(digits: &[u8]) -> Option<[u8; N]> {
    if digits.len() != N * 2 {
        return None;
    }
    let mut out = [0_u8; N];
    for (i, pair) in digits.chunks_exact(2).enumerate() {
        out[i] = (hex_digit(pair[0])? << 4) | hex_digit(pair[1])?;
    }
    Some(out)
}

/// Parses a markup color value.
///
/// Accepted forms: `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `0xAARRGGBB` and the names `black`,
/// `white`, `red`, `green`, `blue`, `yellow`, `magenta`, `cyan` and `transparent`
/// (case-insensitive).
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        let digits = hex.as_bytes();
        return match digits.len() {
            3 => {
                let r = hex_digit(digits[0])?;
                let g = hex_digit(digits[1])?;
                let b = hex_digit(digits[2])?;
                Some(Color::from_rgba8(r * 17, g * 17, b * 17, 255))
            }
            6 => {
                let [r, g, b] = hex_bytes::<3>(digits)?;
                Some(Color::from_rgba8(r, g, b, 255))
            }
            8 => {
                let [r, g, b, a] = hex_bytes::<4>(digits)?;
                Some(Color::from_rgba8(r, g, b, a))
            }
            _ => None,
        };
    }
    if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        let [a, r, g, b] = hex_bytes::<4>(hex.as_bytes())?;
        return Some(Color::from_rgba8(r, g, b, a));
    }

    let named = match value.to_ascii_lowercase().as_str() {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => css::RED,
        "green" => Color::from_rgba8(0, 255, 0, 255),
        "blue" => css::BLUE,
        "yellow" => css::YELLOW,
        "magenta" => css::MAGENTA,
        "cyan" => css::CYAN,
        "transparent" => Color::TRANSPARENT,
        _ => return None,
    };
    Some(named)
}

#[cfg(test)]
mod tests {
    use super::parse_color;
    use peniko::color::palette::css;
    use text_runs::Color;

    #[test]
    fn hex_forms() {
        assert_eq!(parse_color("#f00"), Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(
            parse_color("#00FF7f"),
            Some(Color::from_rgba8(0, 255, 127, 255))
        );
        assert_eq!(
            parse_color("#11223344"),
            Some(Color::from_rgba8(0x11, 0x22, 0x33, 0x44))
        );
        assert_eq!(
            parse_color("0x80FF0000"),
            Some(Color::from_rgba8(255, 0, 0, 0x80))
        );
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(parse_color("Red"), Some(css::RED));
        assert_eq!(parse_color(" BLUE "), Some(css::BLUE));
        assert_eq!(parse_color("green"), Some(Color::from_rgba8(0, 255, 0, 255)));
        assert_eq!(parse_color("transparent"), Some(Color::TRANSPARENT));
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("#ff"), None);
        assert_eq!(parse_color("#gg0000"), None);
        assert_eq!(parse_color("0xFF00"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }
}
