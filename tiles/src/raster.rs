//! Pixel operations: decode, crop, pad, split, encode.
//!
//! Images are decoded upright (EXIF orientation applied) because that is how a
//! browser shows them; cropping coordinates chosen against a preview would not
//! line up otherwise.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageFormat, ImageReader, Rgba, RgbaImage};

use crate::color::PadColor;
use crate::error::{Result, TilesError};
use crate::geometry::{self, Rect, Size, tile_name};
use crate::options::GridOption;

/// One generated, PNG-encoded tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Download name, e.g. `image_1-2.png`.
    pub name: String,
    pub row: u32,
    pub col: u32,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Dimensions of `image` as a [`Size`].
#[must_use]
pub fn size_of(image: &DynamicImage) -> Size {
    let (width, height) = image.dimensions();
    Size::new(width, height)
}

/// Decode an uploaded file, sniffing the format from its contents.
///
/// # Errors
///
/// Returns [`TilesError::Decode`] for unsupported or corrupt data, and
/// [`TilesError::Io`] if the format sniffing read fails.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let mut decoder = reader.into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    if size_of(&image).is_empty() {
        return Err(TilesError::EmptyImage);
    }
    Ok(image)
}

/// Cut `rect` out of `image`.
///
/// # Errors
///
/// Returns [`TilesError::CropOutOfBounds`] when `rect` leaves the image, and
/// [`TilesError::EmptyImage`] for a zero-sized rect.
pub fn crop(image: &DynamicImage, rect: Rect) -> Result<DynamicImage> {
    let size = size_of(image);
    if !rect.fits_in(size) {
        return Err(TilesError::CropOutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            image_width: size.width,
            image_height: size.height,
        });
    }
    if rect.size().is_empty() {
        return Err(TilesError::EmptyImage);
    }
    Ok(image.crop_imm(rect.x, rect.y, rect.width, rect.height))
}

/// Letterbox `image` to `target_ratio` on a canvas filled with `color`.
///
/// # Errors
///
/// Returns [`TilesError::EmptyImage`] when `image` has no pixels.
pub fn pad(image: &DynamicImage, target_ratio: f64, color: PadColor) -> Result<DynamicImage> {
    let placement = geometry::pad_placement(size_of(image), target_ratio)?;
    let [r, g, b] = color.resolve(image).0;
    let mut canvas = RgbaImage::from_pixel(
        placement.canvas.width,
        placement.canvas.height,
        Rgba([r, g, b, 255]),
    );
    imageops::overlay(
        &mut canvas,
        &image.to_rgba8(),
        i64::from(placement.offset_x),
        i64::from(placement.offset_y),
    );
    Ok(DynamicImage::ImageRgba8(canvas))
}

/// Encode `image` as PNG.
///
/// # Errors
///
/// Returns [`TilesError::Decode`] if the encoder rejects the image.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Slice `image` into `option`'s grid, row-major.
///
/// Cells whose source rectangle is a pixel off the common tile size are
/// resampled so every tile comes out the same size.
///
/// # Errors
///
/// Propagates [`geometry::tile_rects`] errors and PNG encoding failures.
pub fn split(image: &DynamicImage, option: &GridOption) -> Result<Vec<Tile>> {
    let rects = geometry::tile_rects(size_of(image), option.cols, option.rows)?;
    let mut tiles = Vec::with_capacity(rects.len());
    for cell in rects {
        let src = cell.source;
        let mut piece = image.crop_imm(src.x, src.y, src.width, src.height);
        if src.size() != cell.output {
            piece = DynamicImage::ImageRgba8(imageops::resize(
                &piece,
                cell.output.width,
                cell.output.height,
                FilterType::Triangle,
            ));
        }
        tiles.push(Tile {
            name: tile_name(cell.row, cell.col),
            row: cell.row,
            col: cell.col,
            width: cell.output.width,
            height: cell.output.height,
            png: encode_png(&piece)?,
        });
    }
    Ok(tiles)
}
