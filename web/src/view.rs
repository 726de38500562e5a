#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use tiles::geometry::{Rect, Size};

/// A point in either screen (CSS pixel) or image (source pixel) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How an image is letterboxed into a preview canvas.
///
/// `scale` maps source pixels to CSS pixels; the offsets centre the scaled
/// image in the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl Viewport {
    /// Fit `image` entirely inside a `canvas_w` × `canvas_h` canvas.
    #[must_use]
    pub fn fit(image: Size, canvas_w: f64, canvas_h: f64) -> Self {
        if image.is_empty() || canvas_w <= 0.0 || canvas_h <= 0.0 {
            return Self::default();
        }
        let w = f64::from(image.width);
        let h = f64::from(image.height);
        let scale = (canvas_w / w).min(canvas_h / h);
        Self {
            scale,
            offset_x: (canvas_w - w * scale) / 2.0,
            offset_y: (canvas_h - h * scale) / 2.0,
        }
    }

    #[must_use]
    pub fn image_to_screen(&self, p: Point) -> Point {
        Point {
            x: p.x * self.scale + self.offset_x,
            y: p.y * self.scale + self.offset_y,
        }
    }

    /// A screen-space drag distance in source pixels.
    #[must_use]
    pub fn screen_dist_to_image(&self, dist: f64) -> f64 {
        dist / self.scale
    }

    /// `rect` in screen space as `(x, y, w, h)`.
    #[must_use]
    pub fn rect_to_screen(&self, rect: Rect) -> (f64, f64, f64, f64) {
        let origin = self.image_to_screen(Point::new(f64::from(rect.x), f64::from(rect.y)));
        (
            origin.x,
            origin.y,
            f64::from(rect.width) * self.scale,
            f64::from(rect.height) * self.scale,
        )
    }
}

/// Wheel delta to crop zoom factor: scrolling down widens the box.
#[must_use]
pub fn wheel_zoom_factor(delta_y: f64, notch_px: f64, step: f64) -> f64 {
    step.powf(delta_y / notch_px)
}
