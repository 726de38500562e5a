//! The upload → grid → crop/pad → split → download session.
//!
//! [`WizardCore`] holds all session state and never touches a UI. Each
//! operation mutates the state and returns the [`Action`]s the host must apply
//! to its view, in order. Hosts differ only in how they render those actions.
//!
//! Slow work (splitting, bundling) is a two-phase [`Job`]: [`WizardCore::request`]
//! marks the job busy and asks the host to schedule it, so the host can paint
//! the busy label before [`WizardCore::run`] blocks.

#[cfg(test)]
#[path = "wizard_test.rs"]
mod wizard_test;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::archive;
use crate::color::PadColor;
use crate::consts::{ARCHIVE_MIME, ARCHIVE_NAME, TILE_MIME};
use crate::error::{Result, TilesError};
use crate::geometry::{self, Rect, Size};
use crate::options::{self, GridOption};
use crate::raster::{self, Tile};

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Upload,
    Crop,
    Options,
    Result,
}

/// How the image is fitted to the grid's ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Cut away what falls outside the crop box.
    #[default]
    Crop,
    /// Keep the whole image and fill the gap with the pad colour.
    Pad,
}

impl FitMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Crop => Self::Pad,
            Self::Pad => Self::Crop,
        }
    }
}

/// Long-running work a host schedules on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Crop or pad, then slice into tiles.
    Split,
    /// Bundle all tiles into one archive.
    DownloadAll,
}

impl Job {
    /// Button label while the job runs.
    #[must_use]
    pub fn busy_label(self) -> &'static str {
        match self {
            Self::Split => "Splitting...",
            Self::DownloadAll => "Zipping...",
        }
    }

    /// Button label when idle.
    #[must_use]
    pub fn idle_label(self) -> &'static str {
        match self {
            Self::Split => "Split it like this",
            Self::DownloadAll => "Download all as .zip",
        }
    }
}

/// A view update for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show exactly this step.
    GoTo(Step),
    /// A new source image was accepted.
    ImageLoaded(Size),
    /// The grid layout changed; the crop UI should be rebuilt for it.
    GridSelected(GridOption),
    /// Populate the "change grid" screen; `active` is the current layout id.
    ShowOptions { options: Vec<GridOption>, active: &'static str },
    /// The crop box moved or was reset.
    CropChanged(Rect),
    FitModeChanged(FitMode),
    PadColorChanged(PadColor),
    /// Tiles were regenerated; lay them out `cols` wide.
    TilesReady { cols: u32, count: usize },
    /// Disable the job's button and show its busy label.
    Busy(Job),
    /// Run the job once the busy state is on screen.
    Schedule(Job),
    /// Re-enable the job's button with its idle label.
    Idle(Job),
    /// Hand a file to the user.
    Download { name: String, mime: &'static str, bytes: Vec<u8> },
    /// Something went wrong; the session stays where it was.
    Failed(String),
    /// Drop every view resource derived from the previous image.
    Reset,
}

/// All state of one session.
#[derive(Default)]
pub struct WizardCore {
    step: Step,
    image: Option<DynamicImage>,
    option: Option<GridOption>,
    fit_mode: FitMode,
    pad_color: PadColor,
    crop: Option<Rect>,
    tiles: Vec<Tile>,
    busy: Option<Job>,
}

impl WizardCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn image_size(&self) -> Option<Size> {
        self.image.as_ref().map(raster::size_of)
    }

    #[must_use]
    pub fn option(&self) -> Option<&GridOption> {
        self.option.as_ref()
    }

    #[must_use]
    pub fn fit_mode(&self) -> FitMode {
        self.fit_mode
    }

    #[must_use]
    pub fn pad_color(&self) -> PadColor {
        self.pad_color
    }

    #[must_use]
    pub fn crop(&self) -> Option<Rect> {
        self.crop
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// A single tile for individual download.
    #[must_use]
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    // --- Navigation ---

    fn go_to(&mut self, step: Step) -> Action {
        self.step = step;
        Action::GoTo(step)
    }

    /// Accept an uploaded file and jump to cropping with the best-fit grid.
    pub fn load_image(&mut self, bytes: &[u8]) -> Vec<Action> {
        let image = match raster::decode(bytes) {
            Ok(image) => image,
            Err(e) => return vec![Action::Failed(e.to_string())],
        };
        let size = raster::size_of(&image);
        let best = *options::best_option(size.ratio());
        self.image = Some(image);
        self.tiles.clear();

        let mut actions = vec![Action::ImageLoaded(size), self.go_to(Step::Crop)];
        actions.extend(self.select_grid(best));
        actions
    }

    /// Show the closest layouts for the current image.
    pub fn open_options(&mut self) -> Vec<Action> {
        let (Some(size), Some(option)) = (self.image_size(), self.option) else {
            return Vec::new();
        };
        let ranked = options::ranked_options(size.ratio()).into_iter().copied().collect();
        vec![
            Action::ShowOptions { options: ranked, active: option.id },
            self.go_to(Step::Options),
        ]
    }

    /// Pick a layout by id from the options screen. Unknown ids are ignored.
    pub fn choose_option(&mut self, id: &str) -> Vec<Action> {
        let Some(option) = options::find_option(id).copied() else {
            return Vec::new();
        };
        if self.image.is_none() {
            return Vec::new();
        }
        let mut actions = vec![self.go_to(Step::Crop)];
        actions.extend(self.select_grid(option));
        actions
    }

    /// Leave the options screen without changing anything.
    pub fn back_to_crop(&mut self) -> Vec<Action> {
        vec![self.go_to(Step::Crop)]
    }

    /// Forget the image and every derived tile.
    pub fn restart(&mut self) -> Vec<Action> {
        self.image = None;
        self.option = None;
        self.crop = None;
        self.tiles.clear();
        self.fit_mode = FitMode::Crop;
        self.busy = None;
        vec![Action::Reset, self.go_to(Step::Upload)]
    }

    // --- Crop / pad ---

    /// Install `option` and start over in crop mode with a full-size crop box.
    fn select_grid(&mut self, option: GridOption) -> Vec<Action> {
        self.option = Some(option);
        self.fit_mode = FitMode::Crop;
        let mut actions = vec![Action::GridSelected(option), Action::FitModeChanged(FitMode::Crop)];
        actions.extend(self.reset_crop());
        actions
    }

    fn reset_crop(&mut self) -> Option<Action> {
        let size = self.image_size()?;
        let option = self.option?;
        let action = match geometry::default_crop(size, option.target_ratio) {
            Ok(crop) => {
                self.crop = Some(crop);
                Action::CropChanged(crop)
            }
            Err(e) => Action::Failed(e.to_string()),
        };
        Some(action)
    }

    /// Switch between cropping and padding. Returning to crop mode rebuilds the
    /// crop box from scratch.
    pub fn toggle_fit_mode(&mut self) -> Vec<Action> {
        self.fit_mode = self.fit_mode.toggled();
        let mut actions = vec![Action::FitModeChanged(self.fit_mode)];
        if self.fit_mode == FitMode::Crop {
            actions.extend(self.reset_crop());
        }
        actions
    }

    pub fn set_pad_color(&mut self, color: PadColor) -> Vec<Action> {
        self.pad_color = color;
        vec![Action::PadColorChanged(color)]
    }

    /// Drag the crop box by a source-pixel delta.
    pub fn pan_crop(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        if self.fit_mode != FitMode::Crop {
            return Vec::new();
        }
        let (Some(size), Some(crop)) = (self.image_size(), self.crop) else {
            return Vec::new();
        };
        let moved = geometry::pan_crop(size, crop, dx, dy);
        if moved == crop {
            return Vec::new();
        }
        self.crop = Some(moved);
        vec![Action::CropChanged(moved)]
    }

    /// Zoom the crop box about its centre.
    pub fn scale_crop(&mut self, factor: f64) -> Vec<Action> {
        if self.fit_mode != FitMode::Crop {
            return Vec::new();
        }
        let (Some(size), Some(crop), Some(option)) = (self.image_size(), self.crop, self.option)
        else {
            return Vec::new();
        };
        match geometry::scale_crop(size, crop, factor, option.target_ratio) {
            Ok(scaled) if scaled != crop => {
                self.crop = Some(scaled);
                vec![Action::CropChanged(scaled)]
            }
            Ok(_) => Vec::new(),
            Err(e) => vec![Action::Failed(e.to_string())],
        }
    }

    // --- Jobs ---

    /// Mark `job` busy and ask the host to schedule it. Ignored while another
    /// job is running.
    pub fn request(&mut self, job: Job) -> Vec<Action> {
        if self.busy.is_some() {
            return Vec::new();
        }
        if job == Job::DownloadAll && self.tiles.is_empty() {
            return Vec::new();
        }
        self.busy = Some(job);
        vec![Action::Busy(job), Action::Schedule(job)]
    }

    /// Execute `job`. Always ends with [`Action::Idle`].
    pub fn run(&mut self, job: Job) -> Vec<Action> {
        let mut actions = match job {
            Job::Split => match self.split() {
                Ok(count) => {
                    let cols = self.option.map_or(1, |o| o.cols);
                    vec![Action::TilesReady { cols, count }, self.go_to(Step::Result)]
                }
                Err(e) => vec![Action::Failed(e.to_string())],
            },
            Job::DownloadAll => match self.bundle() {
                Ok(Some(bytes)) => vec![Action::Download {
                    name: ARCHIVE_NAME.to_owned(),
                    mime: ARCHIVE_MIME,
                    bytes,
                }],
                Ok(None) => Vec::new(),
                Err(e) => vec![Action::Failed(e.to_string())],
            },
        };
        self.busy = None;
        actions.push(Action::Idle(job));
        actions
    }

    /// Download action for one tile.
    #[must_use]
    pub fn download_tile(&self, index: usize) -> Option<Action> {
        self.tile(index).map(|tile| Action::Download {
            name: tile.name.clone(),
            mime: TILE_MIME,
            bytes: tile.png.clone(),
        })
    }

    /// The image the grid will be cut from, after crop or pad.
    ///
    /// # Errors
    ///
    /// Fails without an image or layout, or if the crop/pad itself fails.
    pub fn prepared_image(&self) -> Result<DynamicImage> {
        let image = self.image.as_ref().ok_or(TilesError::EmptyImage)?;
        let option = self.option.as_ref().ok_or(TilesError::EmptyGrid)?;
        match self.fit_mode {
            FitMode::Crop => {
                let size = raster::size_of(image);
                let crop = match self.crop {
                    Some(crop) => crop,
                    None => geometry::default_crop(size, option.target_ratio)?,
                };
                raster::crop(image, crop)
            }
            FitMode::Pad => raster::pad(image, option.target_ratio, self.pad_color),
        }
    }

    fn split(&mut self) -> Result<usize> {
        let prepared = self.prepared_image()?;
        let option = self.option.as_ref().ok_or(TilesError::EmptyGrid)?;
        self.tiles = raster::split(&prepared, option)?;
        Ok(self.tiles.len())
    }

    fn bundle(&self) -> Result<Option<Vec<u8>>> {
        if self.tiles.is_empty() {
            return Ok(None);
        }
        archive::bundle(&self.tiles).map(Some)
    }
}
