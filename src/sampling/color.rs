use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::geometry::PixelPoint;

/// `#RRGGBB`, uppercase.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PixelColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn hex(&self) -> String {
        rgb_to_hex(self.r, self.g, self.b)
    }

    pub fn rgb(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Alpha is written as a 0..1 fraction with two decimals.
    pub fn rgba(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.2})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}

impl From<Rgba<u8>> for PixelColor {
    fn from(px: Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        Self { r, g, b, a }
    }
}

/// A colour read at an original-image position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub x: i32,
    pub y: i32,
    pub color: PixelColor,
}

impl ColorSample {
    pub fn new(position: PixelPoint, color: PixelColor) -> Self {
        Self {
            x: position.x,
            y: position.y,
            color,
        }
    }

    pub fn position(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }

    pub fn hex(&self) -> String {
        self.color.hex()
    }

    pub fn rgb(&self) -> String {
        self.color.rgb()
    }

    pub fn rgba(&self) -> String {
        self.color.rgba()
    }

    /// Clipboard form `x|y|#RRGGBB`.
    pub fn copy_text(&self) -> String {
        format!("{}|{}|{}", self.x, self.y, self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_uppercase_and_padded() {
        assert_eq!(rgb_to_hex(0, 255, 128), "#00FF80");
        assert_eq!(rgb_to_hex(18, 52, 86), "#123456");
        assert_eq!(rgb_to_hex(10, 11, 171), "#0A0BAB");
    }

    #[test]
    fn css_strings() {
        let c = PixelColor::new(1, 2, 3, 128);
        assert_eq!(c.rgb(), "rgb(1, 2, 3)");
        assert_eq!(c.rgba(), "rgba(1, 2, 3, 0.50)");
        assert_eq!(PixelColor::new(0, 0, 0, 255).rgba(), "rgba(0, 0, 0, 1.00)");
    }

    #[test]
    fn copy_text_format() {
        let s = ColorSample::new(PixelPoint::new(12, 340), PixelColor::from(Rgba([255, 0, 16, 255])));
        assert_eq!(s.copy_text(), "12|340|#FF0010");
    }
}
