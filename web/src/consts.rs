//! Shared constants for the web host.

// ── Crop preview ────────────────────────────────────────────────

/// Veil drawn over the part of the image that will be cut away.
pub const CROP_VEIL: &str = "rgba(0, 0, 0, 0.55)";

/// Crop box outline.
pub const CROP_STROKE: &str = "#FFFFFF";

/// Crop box outline width in CSS pixels.
pub const CROP_STROKE_PX: f64 = 2.0;

/// Tile guide lines inside the crop box.
pub const GUIDE_STROKE: &str = "rgba(255, 255, 255, 0.6)";

/// Guide line width in CSS pixels.
pub const GUIDE_STROKE_PX: f64 = 1.0;

// ── Wheel ───────────────────────────────────────────────────────

/// Wheel delta (in pixels) that counts as one zoom notch.
pub const WHEEL_NOTCH_PX: f64 = 100.0;

// ── In-app browser escape ───────────────────────────────────────

/// Delay before closing the in-app browser after handing off the URL.
pub const ESCAPE_CLOSE_DELAY_MS: i32 = 500;

// ── DOM ids ─────────────────────────────────────────────────────

pub const STEP_UPLOAD_ID: &str = "step-1-upload";
pub const STEP_CROP_ID: &str = "step-2-crop";
pub const STEP_OPTIONS_ID: &str = "step-2-options";
pub const STEP_RESULT_ID: &str = "step-3-result";

/// Class marking the visible step, the active option card and active swatch.
pub const ACTIVE_CLASS: &str = "active";
