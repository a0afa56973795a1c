//! # framesheet
//!
//! Turn video clips into sprite sheets: extract every frame of a video with
//! an external `ffmpeg` executable and composite the frames into a single
//! grid image.
//!
//! `framesheet` shells out to the decoder (it does not link FFmpeg): given a
//! video, the decoder writes one lossless PNG per frame into a scratch
//! directory, and the composer blits them row-major onto a transparent RGBA
//! canvas sized `(frame_width × columns, frame_height × rows)`. The batch
//! driver does this for every video in a directory, one video at a time.
//!
//! ## Quick Start
//!
//! ### Process a directory of clips
//!
//! ```no_run
//! use framesheet::{BatchOptions, FfmpegDecoder, run_batch};
//!
//! let decoder = FfmpegDecoder::new("bin/ffmpeg").unwrap();
//! let options = BatchOptions::new()
//!     .with_input_dir("clips")
//!     .with_output_dir("spritesheets");
//! let summary = run_batch(&decoder, &options).unwrap();
//! for report in &summary.sheets {
//!     println!("{} -> {}", report.video.display(), report.sheet.display());
//! }
//! ```
//!
//! ### Compose a sheet from already-extracted frames
//!
//! ```no_run
//! use framesheet::{FrameSet, compose};
//!
//! let frames = FrameSet::scan("scratch/clip").unwrap();
//! let sheet = compose(&frames, 8).unwrap(); // 8 columns, partial last row ok
//! sheet.save("clip_sheet.png").unwrap();
//! ```
//!
//! ## Features
//!
//! - **Frame extraction**: one still per decoded frame, no frame-rate
//!   resampling, via a caller-supplied decoder executable
//! - **Grid composition**: explicit column count or square-ish auto layout
//!   (`columns = ceil(sqrt(n))`), transparent unused cells
//! - **Batch driver**: per-video scratch directories with guaranteed
//!   cleanup, optional frame persistence for inspection, fail-fast
//!   propagation
//! - **Mockable decoder**: the [`FrameDecoder`] trait keeps the external
//!   process behind a seam tests can substitute
//! - **Per-video progress**: observe-only [`ProgressCallback`] so front
//!   ends own all terminal output
//!
//! ## Requirements
//!
//! An `ffmpeg` executable. The path is explicit configuration: pass it to
//! [`FfmpegDecoder::new`]; nothing is looked up implicitly.

pub mod batch;
pub mod decoder;
pub mod error;
pub mod frames;
pub mod progress;
pub mod sheet;

pub use batch::{BatchOptions, BatchSummary, SheetReport, discover_videos, run_batch};
pub use decoder::{FfmpegDecoder, FrameDecoder, extract_frames};
pub use error::FramesheetError;
pub use frames::{FRAME_EXTENSION, FRAME_INDEX_WIDTH, FRAME_PREFIX, FrameFile, FrameSet, frame_file_name};
pub use progress::{ProgressCallback, ProgressInfo};
pub use sheet::{SheetLayout, SpriteSheet, compose};
