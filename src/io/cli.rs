//! Command-line interface for building, inspecting and exporting levels

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::io::configuration::{
    DEFAULT_LOG_FILTER, DEFAULT_PALETTE_SIZE, LEVEL_EXTENSION, OCCUPIED_COLOR, QUIET_LOG_FILTER,
    VERBOSE_LOG_FILTER,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{export_mask_png, mask_from_png};
use crate::io::progress::ProgressManager;
use crate::io::store::{FileStore, LevelStore};
use crate::scene::palette::LevelSet;
use crate::spatial::grid::TileGrid;
use crate::spatial::mask::TileMask;

#[derive(Parser)]
#[command(name = "tilegrid")]
#[command(author, version, about = "Build and inspect tile-based levels")]
/// Command-line arguments for the level tool
pub struct Cli {
    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output and informational logs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log every tile operation
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
}

/// Level tool operations
#[derive(Subcommand)]
pub enum Command {
    /// Convert mask PNGs (black = tile) into level files
    Build {
        /// Input PNG file or directory to process
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Directory for the level files (defaults to next to each input)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Number of prefabs the palette offers
        #[arg(short, long, default_value_t = DEFAULT_PALETTE_SIZE)]
        palette_size: usize,

        /// Process files even if the level already exists
        #[arg(short, long)]
        no_skip: bool,
    },

    /// Print a summary of a level file
    Info {
        /// Level file to inspect
        #[arg(value_name = "LEVEL")]
        level: PathBuf,
    },

    /// Write a level's occupied cells as a mask PNG
    Export {
        /// Level file to export
        #[arg(value_name = "LEVEL")]
        level: PathBuf,

        /// PNG to write
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

impl Cli {
    /// Log filter matching the verbosity flags
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            QUIET_LOG_FILTER
        } else if self.verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Summary of a stored level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSummary {
    /// Number of tiles
    pub tile_count: usize,
    /// Lowest corner and extent `(width, height)`, if the level has tiles
    pub bounds: Option<(i32, i32, usize, usize)>,
    /// Tile count per prefab index
    pub prefab_counts: BTreeMap<usize, usize>,
}

/// Runs a parsed command
pub struct LevelTool {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl LevelTool {
    /// Create a tool for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Execute the selected command
    ///
    /// # Errors
    ///
    /// Returns an error if reading, converting or writing any level fails
    pub fn run(&mut self) -> Result<()> {
        match &self.cli.command {
            Command::Build {
                target,
                out_dir,
                palette_size,
                no_skip,
            } => {
                let (target, out_dir) = (target.clone(), out_dir.clone());
                let (palette_size, skip_existing) = (*palette_size, !*no_skip);
                self.build(&target, out_dir.as_deref(), palette_size, skip_existing)
            }
            Command::Info { level } => {
                let summary = summarize_level(level)?;
                print_summary(level, &summary);
                Ok(())
            }
            Command::Export { level, output } => export_level(level, output),
        }
    }

    fn build(
        &mut self,
        target: &Path,
        out_dir: Option<&Path>,
        palette_size: usize,
        skip_existing: bool,
    ) -> Result<()> {
        if palette_size == 0 {
            return Err(invalid_parameter(
                "palette-size",
                &palette_size,
                &"mask tiles use prefab 0, so the palette needs at least one prefab",
            ));
        }

        let files: Vec<PathBuf> = collect_pngs(target)?
            .into_iter()
            .filter(|path| !skip_existing || !level_exists(path, out_dir))
            .collect();

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for file in &files {
            if let Some(ref pm) = self.progress_manager {
                pm.start_file(file);
            }

            build_level(file, out_dir, palette_size)?;

            if let Some(ref mut pm) = self.progress_manager {
                pm.complete_file();
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }
}

/// PNG files named by `target`, a file or a directory
///
/// # Errors
///
/// Returns an error if the target is neither a PNG file nor a readable directory
pub fn collect_pngs(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        if is_png(target) {
            Ok(vec![target.to_path_buf()])
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"target file must be a PNG image",
            ))
        }
    } else if target.is_dir() {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(target)? {
            let path = entry?.path();
            if is_png(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    } else {
        Err(invalid_parameter(
            "target",
            &target.display(),
            &"target must be a PNG file or directory",
        ))
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

// Level name is the input stem; the store lives in `out_dir` or next to the input
fn level_store_for(input: &Path, out_dir: Option<&Path>) -> (FileStore, String) {
    let name = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let root = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    (FileStore::new(root), name)
}

fn level_exists(input: &Path, out_dir: Option<&Path>) -> bool {
    let (store, name) = level_store_for(input, out_dir);
    let exists = store.exists(&name);
    if exists {
        info!("Skipping: {} (level exists)", input.display());
    }
    exists
}

/// Convert one mask PNG into a level file, returning the tile count
///
/// # Errors
///
/// Returns an error if the image cannot be decoded or the level cannot be saved
pub fn build_level(input: &Path, out_dir: Option<&Path>, palette_size: usize) -> Result<usize> {
    let mask = mask_from_png(input, OCCUPIED_COLOR)?;
    let mut grid = TileGrid::new(LevelSet::with_size(palette_size));
    let report = grid.load_from_mask(&mask);
    if !report.is_complete() {
        warn!(
            "{}: {} tiles rejected",
            input.display(),
            report.rejected.len()
        );
    }

    let (mut store, name) = level_store_for(input, out_dir);
    grid.save_to(&mut store, &name)?;
    Ok(grid.len())
}

fn open_level(level: &Path) -> Result<(FileStore, String)> {
    if level.extension().and_then(|s| s.to_str()) != Some(LEVEL_EXTENSION) {
        return Err(invalid_parameter(
            "level",
            &level.display(),
            &format!("level files must end in .{LEVEL_EXTENSION}"),
        ));
    }
    let name = level
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let root = level.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((FileStore::new(root), name))
}

/// Count the tiles of a level file
///
/// # Errors
///
/// Returns an error if the file is not a readable level
pub fn summarize_level(level: &Path) -> Result<LevelSummary> {
    let (store, name) = open_level(level)?;
    let entries = store.load(&name)?;

    let mut prefab_counts = BTreeMap::new();
    for tile in entries.values() {
        *prefab_counts.entry(tile.prefab_index).or_insert(0) += 1;
    }

    let bounds = TileMask::from_coords(entries.keys())
        .ok()
        .map(|(mask, origin)| (origin.x, origin.y, mask.width(), mask.height()));

    Ok(LevelSummary {
        tile_count: entries.len(),
        bounds,
        prefab_counts,
    })
}

// Allow print for the summary, which is the command's output
#[allow(clippy::print_stdout)]
fn print_summary(level: &Path, summary: &LevelSummary) {
    println!("{}", level.display());
    println!("  tiles: {}", summary.tile_count);
    if let Some((x, y, width, height)) = summary.bounds {
        println!("  bounds: {width}x{height} from x:{x} y:{y}");
    }
    for (prefab, count) in &summary.prefab_counts {
        println!("  prefab {prefab}: {count}");
    }
}

/// Write a level file's occupied cells as a mask PNG
///
/// The image covers the level's bounding box; its lower-left pixel is the
/// lowest tile coordinate.
///
/// # Errors
///
/// Returns an error if the level cannot be read, is empty, or the image
/// cannot be written
pub fn export_level(level: &Path, output: &Path) -> Result<()> {
    let (store, name) = open_level(level)?;
    let entries = store.load(&name)?;
    let (mask, origin) = TileMask::from_coords(entries.keys())?;

    export_mask_png(&mask, OCCUPIED_COLOR, output)?;
    info!(
        "Exported {} tiles to {} (origin {origin})",
        entries.len(),
        output.display()
    );
    Ok(())
}
