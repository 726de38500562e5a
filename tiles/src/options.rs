//! Grid layout catalog and aspect-ratio matching.
//!
//! Every layout slices the image into three columns, which is what a profile
//! feed shows per row. The "panorama" variants target 4:5 portrait tiles
//! instead of squares, so their overall ratio differs from `cols / rows`.

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;

use std::str::FromStr;

use serde::Serialize;

use crate::consts::RANKED_OPTION_LIMIT;
use crate::error::TilesError;

/// One selectable grid layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridOption {
    /// Stable identifier, e.g. `"3x3"` or `"3x2-pano"`.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub cols: u32,
    pub rows: u32,
    /// Width / height of the whole grid.
    pub target_ratio: f64,
}

impl GridOption {
    /// Whether the tiles are 4:5 portrait rather than square.
    #[must_use]
    pub fn is_panorama(&self) -> bool {
        self.id.ends_with("-pano")
    }

    /// Number of tiles the layout produces.
    #[must_use]
    pub fn tile_count(&self) -> u32 {
        self.cols * self.rows
    }

    /// Absolute distance between this layout's ratio and `image_ratio`.
    #[must_use]
    pub fn ratio_diff(&self, image_ratio: f64) -> f64 {
        (image_ratio - self.target_ratio).abs()
    }
}

impl FromStr for GridOption {
    type Err = TilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_option(s)
            .copied()
            .ok_or_else(|| TilesError::UnknownGrid(s.to_owned()))
    }
}

/// The full catalog, in display order. Ties in ratio matching go to the
/// earlier entry.
pub const ALL_GRID_OPTIONS: [GridOption; 6] = [
    GridOption { id: "3x1", label: "3x1 square", cols: 3, rows: 1, target_ratio: 3.0 },
    GridOption { id: "3x2", label: "3x2 square", cols: 3, rows: 2, target_ratio: 1.5 },
    GridOption { id: "3x3", label: "3x3 square", cols: 3, rows: 3, target_ratio: 1.0 },
    GridOption { id: "3x4", label: "3x4 square", cols: 3, rows: 4, target_ratio: 0.75 },
    GridOption { id: "3x2-pano", label: "3x2 (4:5 panorama)", cols: 3, rows: 2, target_ratio: 1.2 },
    GridOption { id: "3x3-pano", label: "3x3 (4:5 panorama)", cols: 3, rows: 3, target_ratio: 0.8 },
];

/// Look up a layout by id.
#[must_use]
pub fn find_option(id: &str) -> Option<&'static GridOption> {
    ALL_GRID_OPTIONS.iter().find(|o| o.id == id)
}

/// The layout whose ratio is closest to `image_ratio`.
///
/// A NaN ratio compares false against everything, so the first entry wins.
#[must_use]
pub fn best_option(image_ratio: f64) -> &'static GridOption {
    let mut best = &ALL_GRID_OPTIONS[0];
    let mut min_diff = f64::INFINITY;
    for option in &ALL_GRID_OPTIONS {
        let diff = option.ratio_diff(image_ratio);
        if diff < min_diff {
            min_diff = diff;
            best = option;
        }
    }
    best
}

/// Up to [`RANKED_OPTION_LIMIT`] layouts ordered by closeness to `image_ratio`.
#[must_use]
pub fn ranked_options(image_ratio: f64) -> Vec<&'static GridOption> {
    let mut ranked: Vec<&'static GridOption> = ALL_GRID_OPTIONS.iter().collect();
    ranked.sort_by(|a, b| a.ratio_diff(image_ratio).total_cmp(&b.ratio_diff(image_ratio)));
    ranked.truncate(RANKED_OPTION_LIMIT);
    ranked
}
