//! Pad colour used to fill the letterbox around an image in pad mode.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::fmt;
use std::str::FromStr;

use image::{DynamicImage, GenericImageView, Rgb};

use crate::error::TilesError;

/// Fill colour for padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadColor {
    /// A fixed colour.
    Rgb([u8; 3]),
    /// Derived from the image: the mean of its border pixels.
    Auto,
}

impl Default for PadColor {
    fn default() -> Self {
        Self::Rgb([0, 0, 0])
    }
}

/// Swatches offered by the colour picker, in display order.
pub const PRESET_PAD_COLORS: [PadColor; 3] =
    [PadColor::Rgb([0, 0, 0]), PadColor::Rgb([255, 255, 255]), PadColor::Auto];

impl PadColor {
    /// The concrete colour to paint behind `image`.
    #[must_use]
    pub fn resolve(self, image: &DynamicImage) -> Rgb<u8> {
        match self {
            Self::Rgb(rgb) => Rgb(rgb),
            Self::Auto => border_mean(image),
        }
    }
}

/// Mean colour of the outermost ring of pixels.
fn border_mean(image: &DynamicImage) -> Rgb<u8> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Rgb([0, 0, 0]);
    }

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    let mut add = |x: u32, y: u32| {
        let px = image.get_pixel(x, y).0;
        for (acc, channel) in sum.iter_mut().zip(px) {
            *acc += u64::from(channel);
        }
        count += 1;
    };

    for x in 0..width {
        add(x, 0);
        if height > 1 {
            add(x, height - 1);
        }
    }
    for y in 1..height.saturating_sub(1) {
        add(0, y);
        if width > 1 {
            add(width - 1, y);
        }
    }

    let mean = |total: u64| ((total + count / 2) / count) as u8;
    Rgb([mean(sum[0]), mean(sum[1]), mean(sum[2])])
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex
        .bytes()
        .map(hex_nibble)
        .collect::<Option<Vec<u8>>>()?;
    match digits.as_slice() {
        [r, g, b] => Some([r * 17, g * 17, b * 17]),
        [r1, r0, g1, g0, b1, b0] => Some([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0]),
        _ => None,
    }
}

impl FromStr for PadColor {
    type Err = TilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "black" => Some(Self::Rgb([0, 0, 0])),
            "white" => Some(Self::Rgb([255, 255, 255])),
            other => other.strip_prefix('#').and_then(parse_hex).map(Self::Rgb),
        };
        parsed.ok_or_else(|| TilesError::InvalidColor(s.to_owned()))
    }
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb([r, g, b]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Auto => f.write_str("auto"),
        }
    }
}
