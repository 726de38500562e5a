//! Shared constants for the tiles crate.

// ── Grid selection ──────────────────────────────────────────────

/// How many layouts the "change grid" screen offers, best fit first.
pub const RANKED_OPTION_LIMIT: usize = 4;

// ── Cropping ────────────────────────────────────────────────────

/// Smallest crop box edge, in source pixels.
pub const MIN_CROP_PX: u32 = 16;

/// Per-notch zoom factor applied to the crop box by a wheel step.
pub const CROP_ZOOM_STEP: f64 = 1.1;

// ── Output ──────────────────────────────────────────────────────

/// File name of the bundled download.
pub const ARCHIVE_NAME: &str = "insta-grid-images.zip";

/// MIME type of the bundled download.
pub const ARCHIVE_MIME: &str = "application/zip";

/// MIME type of every generated tile.
pub const TILE_MIME: &str = "image/png";
