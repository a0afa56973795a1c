//! The external frame decoder as a swappable capability.
//!
//! Frame extraction shells out to an external decoder executable rather than
//! linking a decoding library. The [`FrameDecoder`] trait is the narrow seam
//! between the rest of the crate and that process boundary: production code
//! uses [`FfmpegDecoder`], tests substitute a mock that writes synthetic
//! frames without spawning anything.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use framesheet::{FfmpegDecoder, FramesheetError, extract_frames};
//!
//! let decoder = FfmpegDecoder::new("bin/ffmpeg")?;
//! extract_frames(&decoder, Path::new("clip.mp4"), Path::new("scratch/clip"))?;
//! # Ok::<(), FramesheetError>(())
//! ```

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use crate::error::FramesheetError;
use crate::frames::frame_output_pattern;

/// A source of decoded video frames.
///
/// Implementations write one still image per frame of `video` into
/// `frames_dir`, named with the crate's frame naming pattern (see
/// [`crate::frames`]). The directory is expected to exist; use
/// [`extract_frames`] to create it first.
///
/// Implementations must be [`Send`] and [`Sync`] so a single decoder value
/// can be shared across a whole batch run.
pub trait FrameDecoder: Send + Sync {
    /// Decode every frame of `video` into `frames_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder cannot be started or reports failure.
    fn extract(&self, video: &Path, frames_dir: &Path) -> Result<(), FramesheetError>;
}

/// Run the Frame Extractor: ensure `frames_dir` exists (creating parents as
/// needed), then decode every frame of `video` into it.
///
/// # Errors
///
/// Returns [`FramesheetError::IoError`] if the directory cannot be created,
/// or whatever the decoder reports.
pub fn extract_frames(
    decoder: &dyn FrameDecoder,
    video: &Path,
    frames_dir: &Path,
) -> Result<(), FramesheetError> {
    std::fs::create_dir_all(frames_dir)?;
    decoder.extract(video, frames_dir)
}

/// [`FrameDecoder`] implementation backed by an `ffmpeg` executable.
///
/// The executable path is explicit configuration; there is no `$PATH`
/// lookup. The decoder is invoked non-interactively with error-only logging,
/// overwrite permission, and frame-rate resampling disabled, so exactly one
/// image is written per decoded frame.
///
/// # Example
///
/// ```no_run
/// use framesheet::{FfmpegDecoder, FramesheetError};
///
/// let decoder = FfmpegDecoder::new("bin/ffmpeg")?;
/// println!("using {}", decoder.executable().display());
/// # Ok::<(), FramesheetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    executable: PathBuf,
}

impl FfmpegDecoder {
    /// Create a decoder wrapping the executable at `executable`.
    ///
    /// The path is checked up front so a missing decoder is reported before
    /// any per-video work begins.
    ///
    /// # Errors
    ///
    /// Returns [`FramesheetError::DecoderNotFound`] if `executable` does not
    /// reference an existing file.
    pub fn new<P: AsRef<Path>>(executable: P) -> Result<Self, FramesheetError> {
        let executable = executable.as_ref().to_path_buf();
        if !executable.is_file() {
            return Err(FramesheetError::DecoderNotFound { path: executable });
        }
        Ok(Self { executable })
    }

    /// Path to the wrapped executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Build the argument list for one extraction run.
    ///
    /// `-vsync 0` disables frame-rate resampling (no duplicated or dropped
    /// frames); the output pattern yields lossless, alpha-capable PNG stills
    /// with zero-padded sequential indices starting at 1.
    fn extraction_args(video: &Path, frames_dir: &Path) -> Vec<OsString> {
        vec![
            OsString::from("-y"),
            OsString::from("-hide_banner"),
            OsString::from("-loglevel"),
            OsString::from("error"),
            OsString::from("-i"),
            video.as_os_str().to_os_string(),
            OsString::from("-vsync"),
            OsString::from("0"),
            frames_dir.join(frame_output_pattern()).into_os_string(),
        ]
    }
}

impl FrameDecoder for FfmpegDecoder {
    fn extract(&self, video: &Path, frames_dir: &Path) -> Result<(), FramesheetError> {
        let args = Self::extraction_args(video, frames_dir);

        log::debug!(
            "Running {} on {} -> {}",
            self.executable.display(),
            video.display(),
            frames_dir.display()
        );

        let output = Command::new(&self.executable).args(&args).output().map_err(
            |error| FramesheetError::DecoderSpawn {
                path: self.executable.clone(),
                reason: error.to_string(),
            },
        )?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FramesheetError::DecoderFailed {
                video: video.to_path_buf(),
                detail: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_executable_is_reported_up_front() {
        let result = FfmpegDecoder::new("this/decoder/does/not/exist");
        assert!(result.is_err());

        let error_message = result.unwrap_err().to_string();
        assert!(
            error_message.contains("Decoder executable not found"),
            "Error message should mention the missing decoder: {error_message}",
        );
    }

    #[test]
    fn existing_file_is_accepted() {
        let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
        let executable = temporary_directory.path().join("ffmpeg");
        std::fs::write(&executable, b"").expect("Failed to create fake executable");

        let decoder = FfmpegDecoder::new(&executable).expect("Existing file should be accepted");
        assert_eq!(decoder.executable(), executable.as_path());
    }

    #[test]
    fn extraction_args_request_every_frame() {
        let args =
            FfmpegDecoder::extraction_args(Path::new("clip.mp4"), Path::new("scratch"));
        let rendered: Vec<String> = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        assert_eq!(rendered[0], "-y");
        assert!(rendered.contains(&"-hide_banner".to_string()));
        assert!(rendered.contains(&"error".to_string()));
        assert!(rendered.contains(&"clip.mp4".to_string()));
        // -vsync 0 keeps a 1:1 mapping between decoded and written frames.
        let vsync_position = rendered
            .iter()
            .position(|arg| arg == "-vsync")
            .expect("-vsync flag missing");
        assert_eq!(rendered[vsync_position + 1], "0");
        assert!(
            rendered.last().unwrap().ends_with("frame_%04d.png"),
            "Output pattern should be the last argument: {rendered:?}",
        );
    }
}
