//! Rectangle arithmetic: crop boxes, pad placement, and tile slicing.
//!
//! All coordinates are integer source pixels with the origin at the top-left.
//! Fractional positions are rounded half-up so that the same inputs always
//! produce the same pixels on every target.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_CROP_PX;
use crate::error::{Result, TilesError};

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height. Infinite or NaN for a zero height.
    #[must_use]
    pub fn ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the rectangle lies entirely inside an image of `size`.
    #[must_use]
    pub fn fits_in(self, size: Size) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(size.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(size.height)
    }
}

/// Where a padded image lands on its enlarged canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub canvas: Size,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// One cell of a sliced grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub row: u32,
    pub col: u32,
    /// Pixels taken from the source.
    pub source: Rect,
    /// Pixels written to the tile; identical for every cell of a grid.
    pub output: Size,
}

/// File name of the tile at `row`, `col` (both zero-based).
#[must_use]
pub fn tile_name(row: u32, col: u32) -> String {
    format!("image_{}-{}.png", row + 1, col + 1)
}

fn round_px(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

fn valid_ratio(ratio: f64) -> bool {
    ratio.is_finite() && ratio > 0.0
}

/// The largest centred rectangle of `target_ratio` that fits inside `image`.
///
/// An unusable ratio yields the whole image.
///
/// # Errors
///
/// Returns [`TilesError::EmptyImage`] when `image` has no pixels.
pub fn default_crop(image: Size, target_ratio: f64) -> Result<Rect> {
    if image.is_empty() {
        return Err(TilesError::EmptyImage);
    }
    if !valid_ratio(target_ratio) {
        return Ok(Rect::new(0, 0, image.width, image.height));
    }

    let (width, height) = if image.ratio() > target_ratio {
        let width = round_px(f64::from(image.height) * target_ratio).clamp(1, image.width);
        (width, image.height)
    } else {
        let height = round_px(f64::from(image.width) / target_ratio).clamp(1, image.height);
        (image.width, height)
    };

    Ok(Rect::new(
        (image.width - width) / 2,
        (image.height - height) / 2,
        width,
        height,
    ))
}

/// Move `crop` by (`dx`, `dy`) source pixels, keeping it inside `image`.
#[must_use]
pub fn pan_crop(image: Size, crop: Rect, dx: f64, dy: f64) -> Rect {
    let max_x = image.width.saturating_sub(crop.width);
    let max_y = image.height.saturating_sub(crop.height);
    let x = (f64::from(crop.x) + dx).round().clamp(0.0, f64::from(max_x)) as u32;
    let y = (f64::from(crop.y) + dy).round().clamp(0.0, f64::from(max_y)) as u32;
    Rect { x, y, ..crop }
}

/// Zoom `crop` about its centre by `factor` while holding `target_ratio`.
///
/// The result is never larger than [`default_crop`] and never has an edge
/// shorter than [`MIN_CROP_PX`] (unless the image itself is smaller). A
/// non-positive or non-finite factor leaves the crop unchanged.
///
/// # Errors
///
/// Returns [`TilesError::EmptyImage`] when `image` has no pixels.
pub fn scale_crop(image: Size, crop: Rect, factor: f64, target_ratio: f64) -> Result<Rect> {
    let max = default_crop(image, target_ratio)?;
    if !valid_ratio(factor) || !valid_ratio(target_ratio) {
        return Ok(crop);
    }

    let min_width = if target_ratio >= 1.0 {
        round_px(f64::from(MIN_CROP_PX) * target_ratio)
    } else {
        MIN_CROP_PX
    }
    .min(max.width);

    let width = round_px(f64::from(crop.width) * factor).clamp(min_width, max.width);
    let height = if width == max.width {
        max.height
    } else {
        round_px(f64::from(width) / target_ratio).clamp(1, max.height)
    };

    let cx = f64::from(crop.x) + f64::from(crop.width) / 2.0;
    let cy = f64::from(crop.y) + f64::from(crop.height) / 2.0;
    let x = (cx - f64::from(width) / 2.0)
        .round()
        .clamp(0.0, f64::from(image.width - width)) as u32;
    let y = (cy - f64::from(height) / 2.0)
        .round()
        .clamp(0.0, f64::from(image.height - height)) as u32;

    Ok(Rect::new(x, y, width, height))
}

/// Canvas size and offset that letterbox `image` to `target_ratio`.
///
/// The image keeps its pixels; only the canvas grows, along whichever axis is
/// short. The image is centred, with odd leftovers going to the right/bottom.
///
/// # Errors
///
/// Returns [`TilesError::EmptyImage`] when `image` has no pixels.
pub fn pad_placement(image: Size, target_ratio: f64) -> Result<Placement> {
    if image.is_empty() {
        return Err(TilesError::EmptyImage);
    }
    let canvas = if !valid_ratio(target_ratio) {
        image
    } else if target_ratio > image.ratio() {
        let width = round_px(f64::from(image.height) * target_ratio).max(image.width);
        Size::new(width, image.height)
    } else {
        let height = round_px(f64::from(image.width) / target_ratio).max(image.height);
        Size::new(image.width, height)
    };

    Ok(Placement {
        canvas,
        offset_x: (canvas.width - image.width) / 2,
        offset_y: (canvas.height - image.height) / 2,
    })
}

/// `round(index * total / parts)` in exact integer arithmetic.
fn grid_edge(index: u32, total: u32, parts: u32) -> u32 {
    let num = 2 * u64::from(index) * u64::from(total) + u64::from(parts);
    (num / (2 * u64::from(parts))) as u32
}

/// Slice `source` into a `cols` × `rows` grid, row-major.
///
/// Source rectangles tile the image exactly: neighbouring cells share an edge
/// and the last cell ends on the image border. Every cell reports the same
/// output size, `round(width / cols)` × `round(height / rows)`.
///
/// # Errors
///
/// - [`TilesError::EmptyGrid`] for zero `cols` or `rows`.
/// - [`TilesError::EmptyImage`] when `source` has no pixels.
/// - [`TilesError::TooSmall`] when some cell would be less than a pixel wide.
pub fn tile_rects(source: Size, cols: u32, rows: u32) -> Result<Vec<TileRect>> {
    if cols == 0 || rows == 0 {
        return Err(TilesError::EmptyGrid);
    }
    if source.is_empty() {
        return Err(TilesError::EmptyImage);
    }
    if source.width < cols || source.height < rows {
        return Err(TilesError::TooSmall { width: source.width, height: source.height, cols, rows });
    }

    let output = Size::new(grid_edge(1, source.width, cols), grid_edge(1, source.height, rows));

    let mut rects = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        let top = grid_edge(row, source.height, rows);
        let bottom = grid_edge(row + 1, source.height, rows);
        for col in 0..cols {
            let left = grid_edge(col, source.width, cols);
            let right = grid_edge(col + 1, source.width, cols);
            rects.push(TileRect {
                row,
                col,
                source: Rect::new(left, top, right - left, bottom - top),
                output,
            });
        }
    }
    Ok(rects)
}
