//! The batch driver: one sprite sheet per discovered video.
//!
//! [`run_batch`] discovers videos in an input directory, then processes them
//! strictly sequentially: each video's frames are extracted into a fresh
//! scratch directory, composed into a sheet at
//! `<output_dir>/<stem>_sheet.<format>`, and the scratch directory is dropped
//! (or its frames moved to `<output_dir>/<stem>_frames/` when keep-frames is
//! on). The first failure halts the remaining batch; there is no per-video
//! error isolation.
//!
//! # Example
//!
//! ```no_run
//! use framesheet::{BatchOptions, FfmpegDecoder, FramesheetError, run_batch};
//!
//! let decoder = FfmpegDecoder::new("bin/ffmpeg")?;
//! let options = BatchOptions::new()
//!     .with_input_dir("clips")
//!     .with_output_dir("spritesheets")
//!     .with_columns(8);
//! let summary = run_batch(&decoder, &options)?;
//! println!("wrote {} sheet(s)", summary.sheets.len());
//! # Ok::<(), FramesheetError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::decoder::{FrameDecoder, extract_frames};
use crate::error::FramesheetError;
use crate::frames::FrameSet;
use crate::progress::{NoOpProgress, ProgressCallback, ProgressInfo};
use crate::sheet::compose;

/// Configuration for a batch run.
///
/// A builder in the `with_*` style; a default-constructed value matches the
/// CLI defaults (current directory in, `spritesheets/` out, auto layout,
/// `mp4` inputs, `png` sheets, scratch frames discarded).
#[derive(Clone)]
#[must_use]
pub struct BatchOptions {
    /// Directory searched (non-recursively) for input videos.
    pub(crate) input_dir: PathBuf,
    /// Directory sheets (and optionally persisted frames) are written to.
    pub(crate) output_dir: PathBuf,
    /// Forced grid width; 0 selects the square-ish auto layout.
    pub(crate) columns: u32,
    /// Persist extracted frames instead of deleting them.
    pub(crate) keep_frames: bool,
    /// Extension matched when discovering videos (without the dot).
    pub(crate) video_extension: String,
    /// Extension (and thereby encoding) of the output sheets.
    pub(crate) sheet_format: String,
    /// Per-video progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for BatchOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BatchOptions")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("columns", &self.columns)
            .field("keep_frames", &self.keep_frames)
            .field("video_extension", &self.video_extension)
            .field("sheet_format", &self.sheet_format)
            .finish_non_exhaustive()
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchOptions {
    /// Create options with the default settings.
    pub fn new() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("spritesheets"),
            columns: 0,
            keep_frames: false,
            video_extension: "mp4".to_string(),
            sheet_format: "png".to_string(),
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the directory searched for input videos.
    pub fn with_input_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the directory sheets are written to.
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Force the grid width. 0 (the default) selects the square-ish auto
    /// layout.
    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = columns;
        self
    }

    /// Persist extracted frames to `<output_dir>/<stem>_frames/` instead of
    /// deleting them.
    pub fn with_keep_frames(mut self, keep: bool) -> Self {
        self.keep_frames = keep;
        self
    }

    /// Set the extension matched when discovering videos (without the dot,
    /// compared case-insensitively).
    pub fn with_video_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.video_extension = extension.into();
        self
    }

    /// Set the extension of the output sheets. The image encoding is
    /// inferred from it.
    pub fn with_sheet_format<S: Into<String>>(mut self, format: S) -> Self {
        self.sheet_format = format.into();
        self
    }

    /// Attach a per-video progress callback.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }
}

/// What one video's processing produced.
#[derive(Debug, Clone)]
pub struct SheetReport {
    /// The source video.
    pub video: PathBuf,
    /// The written sheet.
    pub sheet: PathBuf,
    /// Number of frames placed on the sheet.
    pub frame_count: usize,
    /// Grid width used.
    pub columns: u32,
    /// Grid height used.
    pub rows: u32,
    /// Sheet width in pixels.
    pub sheet_width: u32,
    /// Sheet height in pixels.
    pub sheet_height: u32,
    /// Where the frames were persisted, when keep-frames was on.
    pub frames_dir: Option<PathBuf>,
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// One report per processed video, in processing order.
    pub sheets: Vec<SheetReport>,
}

/// Discover video files in `input_dir` (non-recursive).
///
/// Matches regular files whose extension equals `extension`
/// (case-insensitive), sorted by file name.
///
/// # Errors
///
/// Returns [`FramesheetError::NoVideosFound`] if nothing matches, or
/// [`FramesheetError::IoError`] if the directory cannot be read.
pub fn discover_videos(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>, FramesheetError> {
    let mut videos = Vec::new();

    for entry in std::fs::read_dir(input_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            videos.push(path);
        }
    }

    if videos.is_empty() {
        return Err(FramesheetError::NoVideosFound {
            directory: input_dir.to_path_buf(),
        });
    }

    videos.sort();

    log::debug!(
        "Discovered {} video(s) in {}",
        videos.len(),
        input_dir.display()
    );

    Ok(videos)
}

/// Run the whole batch: extract and compose every discovered video.
///
/// Videos are processed strictly sequentially, one at a time. The progress
/// callback fires once per video, before that video is processed. The first
/// failure propagates immediately and halts the remaining videos.
///
/// # Errors
///
/// Returns [`FramesheetError::NoVideosFound`] before any per-video work if
/// the input directory has no matching videos, and otherwise whatever the
/// failing extraction or composition reports.
pub fn run_batch(
    decoder: &dyn FrameDecoder,
    options: &BatchOptions,
) -> Result<BatchSummary, FramesheetError> {
    let videos = discover_videos(&options.input_dir, &options.video_extension)?;
    let total = videos.len();

    let mut summary = BatchSummary::default();
    for (index, video) in videos.iter().enumerate() {
        options.progress.on_video(&ProgressInfo {
            current: index + 1,
            total,
            video: video.clone(),
        });
        summary.sheets.push(process_video(decoder, options, video)?);
    }

    Ok(summary)
}

/// Process a single video: scratch directory, extraction, composition,
/// optional frame persistence.
///
/// The scratch directory is owned by a [`tempfile::TempDir`] guard and is
/// removed on every exit path, including errors.
fn process_video(
    decoder: &dyn FrameDecoder,
    options: &BatchOptions,
    video: &Path,
) -> Result<SheetReport, FramesheetError> {
    let stem = video.file_stem().map_or_else(
        || "video".to_string(),
        |stem| stem.to_string_lossy().into_owned(),
    );

    let scratch = tempfile::Builder::new()
        .prefix(&format!("{stem}_frames_"))
        .tempdir()?;

    extract_frames(decoder, video, scratch.path())?;
    let frames = FrameSet::scan(scratch.path())?;
    let sheet = compose(&frames, options.columns)?;

    let sheet_path = options
        .output_dir
        .join(format!("{stem}_sheet.{}", options.sheet_format));
    sheet.save(&sheet_path)?;

    let frames_dir = if options.keep_frames {
        Some(persist_frames(
            &frames,
            &options.output_dir.join(format!("{stem}_frames")),
        )?)
    } else {
        None
    };

    log::debug!(
        "Wrote {} ({}x{}, {} frame(s))",
        sheet_path.display(),
        sheet.width(),
        sheet.height(),
        sheet.frame_count
    );

    Ok(SheetReport {
        video: video.to_path_buf(),
        sheet: sheet_path,
        frame_count: sheet.frame_count,
        columns: sheet.layout.columns,
        rows: sheet.layout.rows,
        sheet_width: sheet.width(),
        sheet_height: sheet.height(),
        frames_dir,
    })
}

/// Move the frame files of `frames` into `destination` for inspection.
fn persist_frames(frames: &FrameSet, destination: &Path) -> Result<PathBuf, FramesheetError> {
    std::fs::create_dir_all(destination)?;

    for frame in frames.frames() {
        let Some(file_name) = frame.path.file_name() else {
            continue;
        };
        move_file(&frame.path, &destination.join(file_name))?;
    }

    Ok(destination.to_path_buf())
}

/// Rename `source` to `destination`, falling back to copy-and-remove when the
/// rename crosses filesystems (the scratch directory lives in the system temp
/// location, which may be a different mount than the output directory).
fn move_file(source: &Path, destination: &Path) -> Result<(), FramesheetError> {
    if std::fs::rename(source, destination).is_err() {
        std::fs::copy(source, destination)?;
        std::fs::remove_file(source)?;
    }
    Ok(())
}
