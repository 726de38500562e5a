//! Preview rendering for the crop step.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of wizard state and produces pixels; it never
//! mutates the session.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use tiles::geometry::{Placement, Rect, Size};
use tiles::options::GridOption;

use crate::consts::{CROP_STROKE, CROP_STROKE_PX, CROP_VEIL, GUIDE_STROKE, GUIDE_STROKE_PX};
use crate::view::Viewport;

/// Canvas dimensions in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

fn begin(ctx: &CanvasRenderingContext2d, surface: Surface) -> Result<(), JsValue> {
    ctx.set_transform(surface.dpr, 0.0, 0.0, surface.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, surface.width, surface.height);
    Ok(())
}

/// Wipe the whole backing store.
pub fn clear(ctx: &CanvasRenderingContext2d, width: u32, height: u32) {
    ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
}

/// Draw the source image with the crop box, veiling everything outside it.
///
/// Returns the viewport used, so pointer input can be mapped back to source
/// pixels.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw_crop(
    ctx: &CanvasRenderingContext2d,
    img: &HtmlImageElement,
    image: Size,
    crop: Rect,
    option: &GridOption,
    surface: Surface,
) -> Result<Viewport, JsValue> {
    begin(ctx, surface)?;
    let vp = Viewport::fit(image, surface.width, surface.height);
    let (ix, iy, iw, ih) = vp.rect_to_screen(Rect::new(0, 0, image.width, image.height));
    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, ix, iy, iw, ih)?;

    let (cx, cy, cw, ch) = vp.rect_to_screen(crop);
    ctx.set_fill_style_str(CROP_VEIL);
    ctx.fill_rect(ix, iy, iw, cy - iy);
    ctx.fill_rect(ix, cy + ch, iw, iy + ih - (cy + ch));
    ctx.fill_rect(ix, cy, cx - ix, ch);
    ctx.fill_rect(cx + cw, cy, ix + iw - (cx + cw), ch);

    draw_guides(ctx, (cx, cy, cw, ch), option);

    ctx.set_stroke_style_str(CROP_STROKE);
    ctx.set_line_width(CROP_STROKE_PX);
    ctx.stroke_rect(cx, cy, cw, ch);
    Ok(vp)
}

/// Draw the letterboxed result of pad mode: `fill` behind the centred image.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw_pad(
    ctx: &CanvasRenderingContext2d,
    img: &HtmlImageElement,
    image: Size,
    placement: Placement,
    fill: &str,
    option: &GridOption,
    surface: Surface,
) -> Result<(), JsValue> {
    begin(ctx, surface)?;
    let vp = Viewport::fit(placement.canvas, surface.width, surface.height);
    let frame = vp.rect_to_screen(Rect::new(0, 0, placement.canvas.width, placement.canvas.height));

    ctx.set_fill_style_str(fill);
    ctx.fill_rect(frame.0, frame.1, frame.2, frame.3);

    let (ix, iy, iw, ih) = vp.rect_to_screen(Rect::new(
        placement.offset_x,
        placement.offset_y,
        image.width,
        image.height,
    ));
    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, ix, iy, iw, ih)?;

    draw_guides(ctx, frame, option);
    Ok(())
}

/// Thin lines where the tiles will be cut.
fn draw_guides(ctx: &CanvasRenderingContext2d, frame: (f64, f64, f64, f64), option: &GridOption) {
    let (x, y, w, h) = frame;
    ctx.set_stroke_style_str(GUIDE_STROKE);
    ctx.set_line_width(GUIDE_STROKE_PX);
    ctx.begin_path();
    for col in 1..option.cols {
        let gx = x + w * f64::from(col) / f64::from(option.cols);
        ctx.move_to(gx, y);
        ctx.line_to(gx, y + h);
    }
    for row in 1..option.rows {
        let gy = y + h * f64::from(row) / f64::from(option.rows);
        ctx.move_to(x, gy);
        ctx.line_to(x + w, gy);
    }
    ctx.stroke();
}
