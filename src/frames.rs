//! Frame naming and frame-set discovery.
//!
//! A *frame set* is the ordered sequence of still images the decoder wrote
//! for one video. Frames are named `frame_<index>.png` with a zero-padded
//! sequential index starting at 1, so lexical filename order equals capture
//! order within the pad width. [`FrameSet::scan`] parses the index out of
//! each name and sorts numerically, which matches lexical order inside the
//! pad width and stays correct when the decoder widens the field past it.

use std::path::{Path, PathBuf};

use crate::error::FramesheetError;

/// Common prefix of every frame file name.
pub const FRAME_PREFIX: &str = "frame_";

/// Extension of every frame file. PNG keeps frames lossless and preserves
/// alpha.
pub const FRAME_EXTENSION: &str = "png";

/// Zero-pad width of the sequential frame index.
pub const FRAME_INDEX_WIDTH: usize = 4;

/// The decoder-side output pattern (`frame_%04d.png`).
pub(crate) fn frame_output_pattern() -> String {
    format!("{FRAME_PREFIX}%0{FRAME_INDEX_WIDTH}d.{FRAME_EXTENSION}")
}

/// File name of the frame at `index` (1-based), e.g. `frame_0007.png`.
pub fn frame_file_name(index: u64) -> String {
    format!(
        "{FRAME_PREFIX}{index:0width$}.{FRAME_EXTENSION}",
        width = FRAME_INDEX_WIDTH
    )
}

/// Parse the sequential index out of a frame file name.
///
/// Returns `None` for names that do not match the frame naming pattern.
fn parse_frame_index(file_name: &str) -> Option<u64> {
    let digits = file_name
        .strip_prefix(FRAME_PREFIX)?
        .strip_suffix(&format!(".{FRAME_EXTENSION}"))?;
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// One still image of a frame set.
#[derive(Debug, Clone)]
pub struct FrameFile {
    /// The sequential index parsed from the file name (1-based).
    pub index: u64,
    /// Full path to the image file.
    pub path: PathBuf,
}

/// An ordered frame set discovered in a scratch directory.
///
/// Construct with [`FrameSet::scan`]; a `FrameSet` always contains at least
/// one frame.
///
/// # Example
///
/// ```no_run
/// use framesheet::{FrameSet, FramesheetError};
///
/// let frames = FrameSet::scan("scratch/clip")?;
/// let (width, height) = frames.frame_dimensions()?;
/// println!("{} frames of {width}x{height}", frames.len());
/// # Ok::<(), FramesheetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FrameSet {
    directory: PathBuf,
    frames: Vec<FrameFile>,
}

impl FrameSet {
    /// Scan `directory` for files matching the frame naming pattern and
    /// return them ordered by sequential index.
    ///
    /// Files that do not match the pattern are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FramesheetError::NoFramesFound`] if no file matches, or
    /// [`FramesheetError::IoError`] if the directory cannot be read.
    pub fn scan<P: AsRef<Path>>(directory: P) -> Result<Self, FramesheetError> {
        let directory = directory.as_ref().to_path_buf();
        let mut frames = Vec::new();

        for entry in std::fs::read_dir(&directory)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(index) = parse_frame_index(file_name) {
                frames.push(FrameFile {
                    index,
                    path: entry.path(),
                });
            }
        }

        if frames.is_empty() {
            return Err(FramesheetError::NoFramesFound { directory });
        }

        frames.sort_by_key(|frame| frame.index);

        log::debug!("Found {} frame(s) in {}", frames.len(), directory.display());

        Ok(Self { directory, frames })
    }

    /// The scanned directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The frames, ordered by sequential index.
    pub fn frames(&self) -> &[FrameFile] {
        &self.frames
    }

    /// Number of frames in the set. Always at least 1.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Pixel dimensions shared by every frame of the set.
    ///
    /// Read from the first frame's header only; the composer verifies the
    /// remaining frames against it as they are decoded.
    ///
    /// # Errors
    ///
    /// Returns [`FramesheetError::ImageError`] if the first frame cannot be
    /// probed.
    pub fn frame_dimensions(&self) -> Result<(u32, u32), FramesheetError> {
        let dimensions = image::image_dimensions(&self.frames[0].path)?;
        Ok(dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_file_names_are_zero_padded() {
        assert_eq!(frame_file_name(1), "frame_0001.png");
        assert_eq!(frame_file_name(42), "frame_0042.png");
        assert_eq!(frame_file_name(9999), "frame_9999.png");
        // Past the pad width the index keeps growing, as ffmpeg's %04d does.
        assert_eq!(frame_file_name(10000), "frame_10000.png");
    }

    #[test]
    fn output_pattern_matches_file_names() {
        assert_eq!(frame_output_pattern(), "frame_%04d.png");
    }

    #[test]
    fn parses_only_matching_names() {
        assert_eq!(parse_frame_index("frame_0001.png"), Some(1));
        assert_eq!(parse_frame_index("frame_10000.png"), Some(10000));
        assert_eq!(parse_frame_index("frame_.png"), None);
        assert_eq!(parse_frame_index("frame_12.jpg"), None);
        assert_eq!(parse_frame_index("thumb_0001.png"), None);
        assert_eq!(parse_frame_index("frame_00x1.png"), None);
    }

    #[test]
    fn scan_orders_numerically_past_the_pad_width() {
        let scratch = tempfile::tempdir().expect("Failed to create temp dir");
        for name in ["frame_10000.png", "frame_0002.png", "frame_9999.png"] {
            std::fs::write(scratch.path().join(name), b"stub").expect("Failed to write frame");
        }

        let frames = FrameSet::scan(scratch.path()).expect("Scan should find frames");
        let indices: Vec<u64> = frames.frames().iter().map(|frame| frame.index).collect();
        assert_eq!(
            indices,
            vec![2, 9999, 10000],
            "Frames must be ordered by numeric index, not lexically",
        );
    }

    #[test]
    fn scan_of_empty_directory_fails() {
        let scratch = tempfile::tempdir().expect("Failed to create temp dir");
        let result = FrameSet::scan(scratch.path());
        assert!(result.is_err());

        let error_message = result.unwrap_err().to_string();
        assert!(
            error_message.contains("No frames found"),
            "Error message should mention missing frames: {error_message}",
        );
    }
}
