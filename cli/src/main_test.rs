use std::fs::File;

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

use super::*;

fn write_png(dir: &Path, width: u32, height: u32) -> PathBuf {
    let path = dir.join("photo.png");
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 80, 120])));
    img.save(&path).expect("save fixture");
    path
}

fn split_args(argv: &[&str]) -> SplitArgs {
    let cli = Cli::try_parse_from(argv).expect("parse");
    match cli.command {
        Command::Split(args) => args,
        Command::Options(_) => panic!("expected split"),
    }
}

// --- argument parsing ---

#[test]
fn split_defaults() {
    let args = split_args(&["tilegrid", "split", "in.png"]);
    assert_eq!(args.image, PathBuf::from("in.png"));
    assert!(args.grid.is_none());
    assert_eq!(args.mode, ModeArg::Crop);
    assert!(!args.dir);
}

#[test]
fn split_parses_grid_mode_and_color() {
    let args = split_args(&[
        "tilegrid", "split", "in.png", "--grid", "3x3-pano", "--mode", "pad", "--pad-color", "#fff",
    ]);
    assert_eq!(args.grid.map(|g| g.id), Some("3x3-pano"));
    assert_eq!(args.mode, ModeArg::Pad);
    assert_eq!(args.pad_color, PadColor::Rgb([255, 255, 255]));
}

#[test]
fn split_rejects_unknown_grid() {
    let err = Cli::try_parse_from(["tilegrid", "split", "in.png", "--grid", "5x5"]).expect_err("bad grid");
    assert!(err.to_string().contains("5x5"));
}

#[test]
fn mode_arg_maps_to_fit_mode() {
    assert_eq!(FitMode::from(ModeArg::Crop), FitMode::Crop);
    assert_eq!(FitMode::from(ModeArg::Pad), FitMode::Pad);
}

// --- run_split ---

#[test]
fn run_split_writes_archive() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_png(tmp.path(), 300, 300);
    let out = tmp.path().join("grid.zip");
    let args = split_args(&[
        "tilegrid",
        "split",
        input.to_str().expect("utf8 path"),
        "--output",
        out.to_str().expect("utf8 path"),
    ]);

    let written = run_split(&args).expect("split");
    assert_eq!(written, vec![out.clone()]);
    let archive = zip::ZipArchive::new(File::open(&out).expect("open")).expect("zip");
    assert_eq!(archive.len(), 9);
}

#[test]
fn run_split_dir_mode_writes_loose_tiles() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_png(tmp.path(), 300, 200);
    let out = tmp.path().join("tiles");
    let args = split_args(&[
        "tilegrid",
        "split",
        input.to_str().expect("utf8 path"),
        "--grid",
        "3x1",
        "--mode",
        "pad",
        "--dir",
        "--output",
        out.to_str().expect("utf8 path"),
    ]);

    let written = run_split(&args).expect("split");
    assert_eq!(written.len(), 3);
    assert!(out.join("image_1-3.png").exists());
    let tile = image::open(out.join("image_1-1.png")).expect("tile");
    assert_eq!(tile.dimensions(), (200, 200));
}

#[test]
fn run_split_missing_input_reports_path() {
    let args = split_args(&["tilegrid", "split", "/nonexistent/photo.png"]);
    let err = run_split(&args).expect_err("missing file");
    assert!(matches!(err, CliError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/photo.png"));
}

#[test]
fn check_turns_failure_into_error() {
    let err = check(vec![Action::Failed("boom".to_owned())]).expect_err("failure");
    assert_eq!(err.to_string(), "boom");
}
