//! ZIP bundling of generated tiles.

#[cfg(test)]
#[path = "archive_test.rs"]
mod archive_test;

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::{Result, TilesError};
use crate::raster::Tile;

/// Bundle `tiles` into an in-memory ZIP archive, one entry per tile in order.
///
/// Entries are stored uncompressed: PNG data is already deflated.
///
/// # Errors
///
/// Returns [`TilesError::NothingToBundle`] for an empty slice and
/// [`TilesError::Archive`] / [`TilesError::Io`] if writing fails.
pub fn bundle(tiles: &[Tile]) -> Result<Vec<u8>> {
    if tiles.is_empty() {
        return Err(TilesError::NothingToBundle);
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for tile in tiles {
        writer.start_file(tile.name.as_str(), options)?;
        writer.write_all(&tile.png)?;
    }
    Ok(writer.finish()?.into_inner())
}
