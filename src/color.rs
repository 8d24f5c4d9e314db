//! Parsing, normalising and adjusting colors.  Colors are stored as [`RGB8`] and written as
//! canonical `#rrggbb` text.

use std::str::FromStr;

use rgb::RGB8;

/// Parses any CSS/SVG color notation (`#rgb`, `#rrggbb`, `rgb(..)`, `hsl(..)` or a named color
/// like `"teal"`).  Any alpha component is discarded.  Returns `None` if `text` isn't a color.
pub fn parse(text: &str) -> Option<RGB8> {
    let color = svgtypes::Color::from_str(text.trim()).ok()?;
    Some(RGB8::new(color.red, color.green, color.blue))
}

/// Parses `text` and returns its canonical `#rrggbb` form
pub fn normalize(text: &str) -> Option<String> {
    parse(text).map(to_hex)
}

/// Formats a color as lowercase `#rrggbb`
pub fn to_hex(color: RGB8) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// A color in hue/saturation/lightness space.  `hue` is in degrees `[0, 360)`, the other two
/// components are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn from_rgb(color: RGB8) -> Self {
        let r = color.r as f32 / 255.0;
        let g = color.g as f32 / 255.0;
        let b = color.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;
        let delta = max - min;
        if delta <= f32::EPSILON {
            // Greys have no hue
            return Self {
                hue: 0.0,
                saturation: 0.0,
                lightness,
            };
        }
        let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
        let hue = if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    pub fn to_rgb(self) -> RGB8 {
        let hue = self.hue.rem_euclid(360.0);
        let saturation = self.saturation.clamp(0.0, 1.0);
        let lightness = self.lightness.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = chroma * (1.0 - ((hue / 60.0).rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match (hue / 60.0) as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = lightness - chroma / 2.0;
        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        RGB8::new(channel(r), channel(g), channel(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_notations() {
        assert_eq!(normalize("#FF8000").as_deref(), Some("#ff8000"));
        assert_eq!(normalize("#f80").as_deref(), Some("#ff8800"));
        assert_eq!(normalize("  red ").as_deref(), Some("#ff0000"));
        assert_eq!(normalize("rgb(0, 128, 255)").as_deref(), Some("#0080ff"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(normalize("not-a-color"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("#12345"), None);
    }

    #[test]
    fn hsl_round_trips_primaries() {
        for color in [
            RGB8::new(255, 0, 0),
            RGB8::new(0, 255, 0),
            RGB8::new(0, 0, 255),
            RGB8::new(128, 128, 128),
            RGB8::new(12, 200, 99),
        ] {
            assert_eq!(Hsl::from_rgb(color).to_rgb(), color);
        }
    }
}
