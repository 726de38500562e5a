use std::io::Cursor;

use image::{Rgb, RgbImage};

use super::*;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 0])
    }));
    raster::encode_png(&img).expect("encode")
}

fn loaded(width: u32, height: u32) -> WizardCore {
    let mut core = WizardCore::new();
    core.load_image(&png(width, height));
    core
}

fn has_failure(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::Failed(_)))
}

// --- load_image ---

#[test]
fn new_session_starts_on_upload() {
    let core = WizardCore::new();
    assert_eq!(core.step(), Step::Upload);
    assert!(core.image().is_none());
    assert!(!core.is_busy());
}

#[test]
fn load_image_picks_best_grid_and_goes_to_crop() {
    let mut core = WizardCore::new();
    let actions = core.load_image(&png(300, 200));
    assert_eq!(core.step(), Step::Crop);
    assert_eq!(core.option().map(|o| o.id), Some("3x2"));
    assert_eq!(core.fit_mode(), FitMode::Crop);
    assert_eq!(core.crop(), Some(Rect::new(0, 0, 300, 200)));
    assert_eq!(actions[0], Action::ImageLoaded(Size::new(300, 200)));
    assert_eq!(actions[1], Action::GoTo(Step::Crop));
    assert!(actions.contains(&Action::CropChanged(Rect::new(0, 0, 300, 200))));
}

#[test]
fn load_image_garbage_fails_and_stays_put() {
    let mut core = WizardCore::new();
    let actions = core.load_image(b"nope");
    assert!(has_failure(&actions));
    assert_eq!(core.step(), Step::Upload);
    assert!(core.image().is_none());
}

// --- options ---

#[test]
fn open_options_ranks_and_marks_active() {
    let mut core = loaded(100, 100);
    let actions = core.open_options();
    assert_eq!(core.step(), Step::Options);
    let Some(Action::ShowOptions { options, active }) = actions.first() else {
        panic!("expected ShowOptions, got {actions:?}");
    };
    assert_eq!(*active, "3x3");
    assert_eq!(options.len(), 4);
    assert_eq!(options[0].id, "3x3");
}

#[test]
fn open_options_without_image_is_noop() {
    let mut core = WizardCore::new();
    assert!(core.open_options().is_empty());
    assert_eq!(core.step(), Step::Upload);
}

#[test]
fn choose_option_resets_crop_for_new_ratio() {
    let mut core = loaded(100, 100);
    core.toggle_fit_mode();
    let actions = core.choose_option("3x1");
    assert_eq!(core.step(), Step::Crop);
    assert_eq!(core.fit_mode(), FitMode::Crop);
    assert_eq!(core.crop(), Some(Rect::new(0, 33, 100, 33)));
    assert!(actions.iter().any(|a| matches!(a, Action::GridSelected(o) if o.id == "3x1")));
}

#[test]
fn choose_option_unknown_id_is_ignored() {
    let mut core = loaded(100, 100);
    core.open_options();
    assert!(core.choose_option("9x9").is_empty());
    assert_eq!(core.step(), Step::Options);
    assert_eq!(core.option().map(|o| o.id), Some("3x3"));
}

#[test]
fn back_to_crop_keeps_selection() {
    let mut core = loaded(100, 100);
    core.open_options();
    assert_eq!(core.back_to_crop(), vec![Action::GoTo(Step::Crop)]);
    assert_eq!(core.option().map(|o| o.id), Some("3x3"));
}

// --- fit mode / crop box ---

#[test]
fn toggle_fit_mode_round_trip_rebuilds_crop() {
    let mut core = loaded(400, 200);
    core.choose_option("3x3");
    core.pan_crop(50.0, 0.0);
    assert_eq!(core.crop(), Some(Rect::new(150, 0, 200, 200)));

    assert_eq!(core.toggle_fit_mode(), vec![Action::FitModeChanged(FitMode::Pad)]);
    let actions = core.toggle_fit_mode();
    assert_eq!(actions[0], Action::FitModeChanged(FitMode::Crop));
    assert_eq!(core.crop(), Some(Rect::new(100, 0, 200, 200)));
}

#[test]
fn pan_and_scale_ignored_in_pad_mode() {
    let mut core = loaded(400, 200);
    core.toggle_fit_mode();
    assert!(core.pan_crop(10.0, 10.0).is_empty());
    assert!(core.scale_crop(0.5).is_empty());
}

#[test]
fn pan_crop_at_edge_emits_nothing() {
    let mut core = loaded(300, 200);
    assert!(core.pan_crop(10.0, 10.0).is_empty());
}

#[test]
fn scale_crop_shrinks_box() {
    let mut core = loaded(200, 200);
    let actions = core.scale_crop(0.5);
    assert_eq!(actions, vec![Action::CropChanged(Rect::new(50, 50, 100, 100))]);
}

#[test]
fn set_pad_color_is_remembered() {
    let mut core = WizardCore::new();
    core.set_pad_color(PadColor::Rgb([255, 255, 255]));
    assert_eq!(core.pad_color(), PadColor::Rgb([255, 255, 255]));
}

// --- jobs ---

#[test]
fn request_split_marks_busy_and_schedules() {
    let mut core = loaded(90, 90);
    let actions = core.request(Job::Split);
    assert_eq!(actions, vec![Action::Busy(Job::Split), Action::Schedule(Job::Split)]);
    assert!(core.is_busy());
    assert!(core.request(Job::Split).is_empty());
}

#[test]
fn run_split_in_crop_mode_produces_tiles() {
    let mut core = loaded(120, 90);
    core.choose_option("3x3");
    core.request(Job::Split);
    let actions = core.run(Job::Split);
    assert_eq!(
        actions,
        vec![
            Action::TilesReady { cols: 3, count: 9 },
            Action::GoTo(Step::Result),
            Action::Idle(Job::Split),
        ]
    );
    assert!(!core.is_busy());
    assert!(core.tiles().iter().all(|t| t.width == 30 && t.height == 30));
}

#[test]
fn run_split_in_pad_mode_keeps_whole_image() {
    let mut core = loaded(60, 90);
    core.choose_option("3x3");
    core.toggle_fit_mode();
    core.set_pad_color(PadColor::Rgb([255, 255, 255]));
    core.run(Job::Split);
    let prepared = core.prepared_image().expect("prepared");
    assert_eq!(raster::size_of(&prepared), Size::new(90, 90));
    assert_eq!(core.tiles().len(), 9);
    assert!(core.tiles().iter().all(|t| t.width == 30 && t.height == 30));
}

#[test]
fn run_split_without_image_fails_but_goes_idle() {
    let mut core = WizardCore::new();
    let actions = core.run(Job::Split);
    assert!(has_failure(&actions));
    assert_eq!(actions.last(), Some(&Action::Idle(Job::Split)));
    assert_eq!(core.step(), Step::Upload);
}

#[test]
fn download_all_without_tiles_is_not_scheduled() {
    let mut core = loaded(90, 90);
    assert!(core.request(Job::DownloadAll).is_empty());
    assert_eq!(core.run(Job::DownloadAll), vec![Action::Idle(Job::DownloadAll)]);
}

#[test]
fn download_all_bundles_every_tile() {
    let mut core = loaded(90, 60);
    core.run(Job::Split);
    let actions = core.run(Job::DownloadAll);
    let Some(Action::Download { name, mime, bytes }) = actions.first() else {
        panic!("expected Download, got {actions:?}");
    };
    assert_eq!(name, ARCHIVE_NAME);
    assert_eq!(*mime, ARCHIVE_MIME);
    let archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).expect("archive");
    assert_eq!(archive.len(), 6);
}

#[test]
fn download_tile_returns_png() {
    let mut core = loaded(90, 90);
    core.run(Job::Split);
    let Some(Action::Download { name, mime, .. }) = core.download_tile(4) else {
        panic!("expected tile download");
    };
    assert_eq!(name, "image_2-2.png");
    assert_eq!(mime, TILE_MIME);
    assert!(core.download_tile(9).is_none());
}

// --- restart ---

#[test]
fn restart_clears_everything() {
    let mut core = loaded(90, 90);
    core.run(Job::Split);
    let actions = core.restart();
    assert_eq!(actions, vec![Action::Reset, Action::GoTo(Step::Upload)]);
    assert!(core.image().is_none());
    assert!(core.option().is_none());
    assert!(core.tiles().is_empty());
}
