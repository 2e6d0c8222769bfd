//! HSV conversion and color ranges.
//!
//! Conversion follows the 8-bit convention used by the cameras' tuning tools:
//! `V = max(r, g, b)`, `S = 255 * (max - min) / max`, hue in degrees mapped
//! either onto `0..=179` (half degrees) or `0..=255`.

use serde::{Deserialize, Serialize};

/// How the hue channel is packed into one byte.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HueScale {
    /// Degrees / 2, range `0..=179`.
    #[default]
    Half,
    /// Degrees * 255 / 360, range `0..=255`.
    Full,
}

impl HueScale {
    /// Number of distinct hue values for this scale.
    pub fn range(self) -> u16 {
        match self {
            HueScale::Half => 180,
            HueScale::Full => 256,
        }
    }
}

/// Convert one RGB pixel to packed HSV `[h, s, v]`.
#[inline]
pub fn rgb_to_hsv(rgb: [u8; 3], scale: HueScale) -> [u8; 3] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if max == 0 {
        return [0, 0, 0];
    }
    let diff = (max - min) as f32;
    let s = (255.0 * diff / max as f32).round() as u8;
    if diff == 0.0 {
        return [0, s, v];
    }

    let (r, g, b) = (r as f32, g as f32, b as f32);
    let mut deg = if max as f32 == r {
        60.0 * (g - b) / diff
    } else if max as f32 == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if deg < 0.0 {
        deg += 360.0;
    }

    let h = match scale {
        HueScale::Half => deg / 2.0,
        HueScale::Full => deg * 255.0 / 360.0,
    };
    let h = (h.round() as u16) % scale.range();
    [h as u8, s, v]
}

/// Inclusive lower/upper bounds per HSV channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// `lower <= upper` on every channel.
    pub fn is_ordered(&self) -> bool {
        self.lower.iter().zip(self.upper.iter()).all(|(l, u)| l <= u)
    }

    /// Componentwise inclusive membership test.
    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }
}

impl Default for ColorRange {
    /// Everything passes.
    fn default() -> Self {
        Self::new([0, 0, 0], [255, 255, 255])
    }
}
