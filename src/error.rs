//! Error types for the `framesheet` crate.
//!
//! This module defines [`FramesheetError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry rich context to aid
//! debugging, including file paths, frame dimensions, and captured decoder
//! output.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framesheet` operations.
///
/// Every public method that can fail returns `Result<T, FramesheetError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramesheetError {
    /// The decoder executable does not exist at the configured path.
    #[error("Decoder executable not found at {path}")]
    DecoderNotFound {
        /// Path that was passed to [`crate::FfmpegDecoder::new`].
        path: PathBuf,
    },

    /// The decoder process could not be started.
    #[error("Failed to run decoder at {path}: {reason}")]
    DecoderSpawn {
        /// Path to the decoder executable.
        path: PathBuf,
        /// Underlying reason the spawn failed.
        reason: String,
    },

    /// The decoder process exited with a non-zero status.
    ///
    /// `detail` carries the decoder's captured stderr output.
    #[error("Decoder failed on {video}: {detail}")]
    DecoderFailed {
        /// The video being decoded when the failure occurred.
        video: PathBuf,
        /// Captured stderr from the decoder process.
        detail: String,
    },

    /// The input directory contains no video files with the expected
    /// extension.
    #[error("No video files found in {directory}")]
    NoVideosFound {
        /// The directory that was searched.
        directory: PathBuf,
    },

    /// The scratch directory contains no files matching the frame naming
    /// pattern.
    #[error("No frames found in {directory}")]
    NoFramesFound {
        /// The directory that was scanned.
        directory: PathBuf,
    },

    /// A frame's dimensions differ from the first frame in its set.
    ///
    /// All frames of one set must share identical pixel dimensions; a
    /// mismatched frame would silently misalign every cell placed after it.
    #[error(
        "Frame {frame} is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}"
    )]
    FrameSizeMismatch {
        /// The offending frame file.
        frame: PathBuf,
        /// Expected width, taken from the first frame of the set.
        expected_width: u32,
        /// Expected height, taken from the first frame of the set.
        expected_height: u32,
        /// The mismatched frame's actual width.
        actual_width: u32,
        /// The mismatched frame's actual height.
        actual_height: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while decoding a frame or encoding
    /// the sheet.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}
