// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Visual weight class of a font, typically on a scale from 1.0 to 1000.0.
///
/// This uses an `f32` so that it can represent the full range of values possible with
/// variable fonts.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontWeight(f32);

impl FontWeight {
    /// Weight value of 100.
    pub const THIN: Self = Self(100.0);

    /// Weight value of 200.
    pub const EXTRA_LIGHT: Self = Self(200.0);

    /// Weight value of 300.
    pub const LIGHT: Self = Self(300.0);

    /// Weight value of 350.
    pub const SEMI_LIGHT: Self = Self(350.0);

    /// Weight value of 380.
    pub const BOOK: Self = Self(380.0);

    /// Weight value of 400. This is the default value.
    pub const NORMAL: Self = Self(400.0);

    /// Weight value of 500.
    pub const MEDIUM: Self = Self(500.0);

    /// Weight value of 600.
    pub const SEMI_BOLD: Self = Self(600.0);

    /// Weight value of 700.
    pub const BOLD: Self = Self(700.0);

    /// Weight value of 800.
    pub const EXTRA_BOLD: Self = Self(800.0);

    /// Weight value of 900.
    pub const BLACK: Self = Self(900.0);

    /// Weight value of 950.
    pub const EXTRA_BLACK: Self = Self(950.0);

    /// Creates a new weight value.
    pub fn new(weight: f32) -> Self {
        Self(weight)
    }

    /// Returns the underlying weight value.
    pub fn value(self) -> f32 {
        self.0
    }

    /// Whether this weight is rendered as bold.
    pub fn is_bold(self) -> bool {
        self.0 >= Self::SEMI_BOLD.0
    }

    /// Parses a markup `weight` value.
    ///
    /// Supported syntax (after trimming ASCII whitespace): the keywords `thin`,
    /// `ultra-light`/`extra-light`, `light`, `demi-light`/`semi-light`, `book`,
    /// `normal`/`regular`, `medium`, `demi-bold`/`semi-bold`, `bold`,
    /// `ultra-bold`/`extra-bold`, `black`/`heavy`, `extra-black`/`ultra-black`, or a number.
    ///
    /// ```
    /// use text_runs::FontWeight;
    ///
    /// assert_eq!(FontWeight::parse("regular"), Some(FontWeight::NORMAL));
    /// assert_eq!(FontWeight::parse("bold"), Some(FontWeight::BOLD));
    /// assert_eq!(FontWeight::parse("850"), Some(FontWeight::new(850.0)));
    /// assert_eq!(FontWeight::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Some(match s {
            "thin" => Self::THIN,
            "ultra-light" | "extra-light" => Self::EXTRA_LIGHT,
            "light" => Self::LIGHT,
            "demi-light" | "semi-light" => Self::SEMI_LIGHT,
            "book" => Self::BOOK,
            "normal" | "regular" => Self::NORMAL,
            "medium" => Self::MEDIUM,
            "demi-bold" | "semi-bold" => Self::SEMI_BOLD,
            "bold" => Self::BOLD,
            "ultra-bold" | "extra-bold" => Self::EXTRA_BOLD,
            "black" | "heavy" => Self::BLACK,
            "extra-black" | "ultra-black" => Self::EXTRA_BLACK,
            _ => Self(s.parse::<f32>().ok()?),
        })
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "The integer keyword mapping is only used when the cast is lossless (checked)."
        )]
        let int_value = self.0 as i32;

        if self.0 == int_value as f32 {
            let keyword = match int_value {
                100 => "thin",
                200 => "extra-light",
                300 => "light",
                350 => "semi-light",
                380 => "book",
                400 => "normal",
                500 => "medium",
                600 => "semi-bold",
                700 => "bold",
                800 => "extra-bold",
                900 => "black",
                950 => "extra-black",
                _ => return write!(f, "{}", self.0),
            };
            f.write_str(keyword)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Visual width of a font, as a ratio of the normal aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontWidth(f32);

impl FontWidth {
    /// Width that is 50% of normal.
    pub const ULTRA_CONDENSED: Self = Self(0.5);

    /// Width that is 62.5% of normal.
    pub const EXTRA_CONDENSED: Self = Self(0.625);

    /// Width that is 75% of normal.
    pub const CONDENSED: Self = Self(0.75);

    /// Width that is 87.5% of normal.
    pub const SEMI_CONDENSED: Self = Self(0.875);

    /// Width that is 100% of normal. This is the default value.
    pub const NORMAL: Self = Self(1.0);

    /// Width that is 112.5% of normal.
    pub const SEMI_EXPANDED: Self = Self(1.125);

    /// Width that is 125% of normal.
    pub const EXPANDED: Self = Self(1.25);

    /// Width that is 150% of normal.
    pub const EXTRA_EXPANDED: Self = Self(1.5);

    /// Width that is 200% of normal.
    pub const ULTRA_EXPANDED: Self = Self(2.0);

    /// Creates a new width value with the given ratio.
    pub fn from_ratio(ratio: f32) -> Self {
        Self(ratio)
    }

    /// Returns the width value as a ratio, with `1.0` being normal width.
    pub fn ratio(self) -> f32 {
        self.0
    }

    /// Parses a markup `width` value.
    ///
    /// Supported keywords (after trimming ASCII whitespace): `ultra-condensed`,
    /// `extra-condensed`, `condensed`, `semi-condensed`, `normal`, `semi-expanded`,
    /// `expanded`, `extra-expanded`, `ultra-expanded`.
    ///
    /// ```
    /// use text_runs::FontWidth;
    ///
    /// assert_eq!(FontWidth::parse("semi-condensed"), Some(FontWidth::SEMI_CONDENSED));
    /// assert_eq!(FontWidth::parse("wideload"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "ultra-condensed" => Self::ULTRA_CONDENSED,
            "extra-condensed" => Self::EXTRA_CONDENSED,
            "condensed" => Self::CONDENSED,
            "semi-condensed" => Self::SEMI_CONDENSED,
            "normal" => Self::NORMAL,
            "semi-expanded" => Self::SEMI_EXPANDED,
            "expanded" => Self::EXPANDED,
            "extra-expanded" => Self::EXTRA_EXPANDED,
            "ultra-expanded" => Self::ULTRA_EXPANDED,
            _ => return None,
        })
    }
}

impl Default for FontWidth {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0 * 1000.0;

        #[allow(
            clippy::cast_possible_truncation,
            reason = "The integer keyword mapping is only used when the cast is lossless (checked)."
        )]
        let int_value = value as i32;

        if value == int_value as f32 {
            let keyword = match int_value {
                500 => "ultra-condensed",
                625 => "extra-condensed",
                750 => "condensed",
                875 => "semi-condensed",
                1000 => "normal",
                1125 => "semi-expanded",
                1250 => "expanded",
                1500 => "extra-expanded",
                2000 => "ultra-expanded",
                _ => return write!(f, "{}%", self.0 * 100.0),
            };
            f.write_str(keyword)
        } else {
            write!(f, "{}%", self.0 * 100.0)
        }
    }
}

/// Visual slope of a font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FontSlant {
    /// `normal` (also spelled `roman`).
    #[default]
    Normal,
    /// `italic`.
    Italic,
    /// `oblique`.
    Oblique,
}

impl FontSlant {
    /// Parses a markup `slant` value.
    ///
    /// ```
    /// use text_runs::FontSlant;
    ///
    /// assert_eq!(FontSlant::parse("roman"), Some(FontSlant::Normal));
    /// assert_eq!(FontSlant::parse(" italic "), Some(FontSlant::Italic));
    /// assert_eq!(FontSlant::parse("sideways"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "normal" | "roman" => Self::Normal,
            "italic" => Self::Italic,
            "oblique" => Self::Oblique,
            _ => return None,
        })
    }

    /// Whether the slant is rendered slanted.
    pub fn is_slanted(self) -> bool {
        self != Self::Normal
    }
}

impl fmt::Display for FontSlant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FontSlant, FontWeight, FontWidth};

    #[test]
    fn fontweight_parse_keywords_and_numbers() {
        assert_eq!(FontWeight::parse("normal"), Some(FontWeight::NORMAL));
        assert_eq!(FontWeight::parse("heavy"), Some(FontWeight::BLACK));
        assert_eq!(FontWeight::parse("demi-bold"), Some(FontWeight::SEMI_BOLD));
        assert_eq!(FontWeight::parse(" 850 "), Some(FontWeight::new(850.0)));
        assert_eq!(FontWeight::parse("invalid"), None);
    }

    #[test]
    fn fontweight_bold_threshold() {
        assert!(!FontWeight::MEDIUM.is_bold());
        assert!(FontWeight::SEMI_BOLD.is_bold());
        assert!(FontWeight::BLACK.is_bold());
    }

    #[test]
    fn fontweight_display_keywords() {
        assert_eq!(FontWeight::BOLD.to_string(), "bold");
        assert_eq!(FontWeight::BOOK.to_string(), "book");
        assert_eq!(FontWeight::new(450.5).to_string(), "450.5");
    }

    #[test]
    fn fontwidth_parse_keywords() {
        assert_eq!(FontWidth::parse("normal"), Some(FontWidth::NORMAL));
        assert_eq!(
            FontWidth::parse("ultra-condensed"),
            Some(FontWidth::ULTRA_CONDENSED)
        );
        assert_eq!(FontWidth::parse("  condensed "), Some(FontWidth::CONDENSED));
        assert_eq!(FontWidth::parse("80%"), None);
    }

    #[test]
    fn fontwidth_display() {
        assert_eq!(FontWidth::EXPANDED.to_string(), "expanded");
        assert!(FontWidth::from_ratio(0.8).to_string().ends_with('%'));
    }

    #[test]
    fn fontslant_round_trip_keywords() {
        for slant in [FontSlant::Normal, FontSlant::Italic, FontSlant::Oblique] {
            assert_eq!(FontSlant::parse(&slant.to_string()), Some(slant));
        }
        assert!(FontSlant::Oblique.is_slanted());
        assert!(!FontSlant::Normal.is_slanted());
    }
}
