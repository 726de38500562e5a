use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tiles::color::PadColor;
use tiles::consts::ARCHIVE_NAME;
use tiles::options::{self, GridOption};
use tiles::raster;
use tiles::wizard::{Action, FitMode, Job, WizardCore};
use tracing_subscriber::EnvFilter;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Tiles(#[from] tiles::TilesError),
    #[error("{0}")]
    Wizard(String),
    #[error("nothing was produced")]
    NoOutput,
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tilegrid", about = "Split a photo into a grid of equally sized tiles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the grid layouts that best fit an image, closest first.
    Options(OptionsArgs),
    /// Crop or pad an image to a grid and slice it into tiles.
    Split(SplitArgs),
}

#[derive(Args, Debug)]
struct OptionsArgs {
    image: PathBuf,

    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Crop,
    Pad,
}

impl From<ModeArg> for FitMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Crop => Self::Crop,
            ModeArg::Pad => Self::Pad,
        }
    }
}

#[derive(Args, Debug)]
struct SplitArgs {
    image: PathBuf,

    #[arg(long, help = "Grid id such as 3x3 or 3x2-pano; defaults to the best fit")]
    grid: Option<GridOption>,

    #[arg(long, value_enum, default_value_t = ModeArg::Crop)]
    mode: ModeArg,

    #[arg(long, env = "TILEGRID_PAD_COLOR", default_value = "black", help = "#rrggbb, #rgb, black, white or auto")]
    pad_color: PadColor,

    #[arg(short, long, env = "TILEGRID_OUTPUT", help = "Archive path, or directory with --dir")]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Write loose PNG tiles instead of a zip archive")]
    dir: bool,
}

#[derive(Serialize)]
struct RankedOption<'a> {
    #[serde(flatten)]
    option: &'a GridOption,
    ratio_diff: f64,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Options(args) => run_options(&args),
        Command::Split(args) => run_split(&args).map(|written| {
            for path in written {
                println!("{}", path.display());
            }
        }),
    }
}

fn read_image(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes).map_err(|source| CliError::Write { path: path.to_owned(), source })
}

/// Surface the first failure in a batch of wizard actions as an error.
fn check(actions: Vec<Action>) -> Result<Vec<Action>, CliError> {
    for action in &actions {
        match action {
            Action::Failed(message) => return Err(CliError::Wizard(message.clone())),
            Action::Download { name, bytes, .. } => {
                tracing::debug!(%name, size = bytes.len(), "download ready");
            }
            other => tracing::debug!(action = ?other, "wizard"),
        }
    }
    Ok(actions)
}

fn run_options(args: &OptionsArgs) -> Result<(), CliError> {
    let image = raster::decode(&read_image(&args.image)?)?;
    let ratio = raster::size_of(&image).ratio();
    let ranked: Vec<RankedOption<'_>> = options::ranked_options(ratio)
        .into_iter()
        .map(|option| RankedOption { option, ratio_diff: option.ratio_diff(ratio) })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }
    for entry in &ranked {
        println!(
            "{:<10} {:<20} {}x{}  diff {:.3}",
            entry.option.id, entry.option.label, entry.option.cols, entry.option.rows, entry.ratio_diff
        );
    }
    Ok(())
}

/// Run the whole wizard non-interactively and return the paths written.
fn run_split(args: &SplitArgs) -> Result<Vec<PathBuf>, CliError> {
    let bytes = read_image(&args.image)?;
    let mut core = WizardCore::new();
    check(core.load_image(&bytes))?;
    if let Some(grid) = &args.grid {
        check(core.choose_option(grid.id))?;
    }
    if FitMode::from(args.mode) != core.fit_mode() {
        check(core.toggle_fit_mode())?;
    }
    check(core.set_pad_color(args.pad_color))?;

    if let Some(option) = core.option() {
        tracing::info!(grid = option.id, mode = ?core.fit_mode(), "splitting {}", args.image.display());
    }
    check(core.run(Job::Split))?;

    if args.dir {
        let dir = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir).map_err(|source| CliError::Write { path: dir.clone(), source })?;
        let mut written = Vec::with_capacity(core.tiles().len());
        for tile in core.tiles() {
            let path = dir.join(&tile.name);
            write_file(&path, &tile.png)?;
            written.push(path);
        }
        tracing::info!(count = written.len(), "wrote tiles to {}", dir.display());
        return Ok(written);
    }

    let archive_path = args.output.clone().unwrap_or_else(|| PathBuf::from(ARCHIVE_NAME));
    for action in check(core.run(Job::DownloadAll))? {
        if let Action::Download { bytes, .. } = action {
            write_file(&archive_path, &bytes)?;
            tracing::info!(tiles = core.tiles().len(), "wrote {}", archive_path.display());
            return Ok(vec![archive_path]);
        }
    }
    Err(CliError::NoOutput)
}
