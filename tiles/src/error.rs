//! Error type shared by every fallible operation in the crate.

/// Errors raised while choosing, cropping, slicing, or bundling.
#[derive(Debug, thiserror::Error)]
pub enum TilesError {
    /// The grid id is not part of the catalog.
    #[error("unknown grid layout: {0}")]
    UnknownGrid(String),
    /// A grid with zero columns or rows.
    #[error("grid must have at least one column and one row")]
    EmptyGrid,
    /// The source image has a zero-sized edge.
    #[error("image has no pixels")]
    EmptyImage,
    /// Fewer pixels than grid cells along some axis.
    #[error("{width}x{height} image is too small for a {cols}x{rows} grid")]
    TooSmall { width: u32, height: u32, cols: u32, rows: u32 },
    /// A crop rectangle that does not fit inside the image.
    #[error("crop {x},{y} {width}x{height} is outside the {image_width}x{image_height} image")]
    CropOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },
    /// The pad colour string could not be parsed.
    #[error("invalid pad color `{0}`; expected #rrggbb, #rgb, black, white or auto")]
    InvalidColor(String),
    /// Bundling was requested before any tiles exist.
    #[error("no tiles to bundle")]
    NothingToBundle,
    /// Image decoding or encoding failed.
    #[error("image codec failed: {0}")]
    Decode(#[from] image::ImageError),
    /// The ZIP writer failed.
    #[error("archive creation failed: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// Writing archive entries failed.
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, TilesError>;
