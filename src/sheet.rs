//! Sprite-sheet layout and composition.
//!
//! The composer takes a [`FrameSet`], computes a grid layout, and blits each
//! frame into its cell on a transparent RGBA canvas. Frames are placed
//! left-to-right, top-to-bottom, row-major, starting at cell (0,0); unused
//! trailing cells stay fully transparent.
//!
//! # Example
//!
//! ```no_run
//! use framesheet::{FrameSet, FramesheetError, compose};
//!
//! let frames = FrameSet::scan("scratch/clip")?;
//! let sheet = compose(&frames, 0)?; // 0 = square-ish auto layout
//! sheet.save("spritesheets/clip_sheet.png")?;
//! # Ok::<(), FramesheetError>(())
//! ```

use std::path::Path;

use image::{GenericImage, RgbaImage};

use crate::error::FramesheetError;
use crate::frames::FrameSet;

/// Grid dimensions of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    /// Number of cells per row.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
}

impl SheetLayout {
    /// Compute the layout for `frame_count` frames.
    ///
    /// A `requested_columns` of 0 selects a square-ish grid: the ceiling of
    /// the square root of the frame count. Rows are the ceiling of
    /// `frame_count / columns`; a partial last row is expected and allowed.
    /// Both dimensions are floored at 1.
    pub fn compute(frame_count: usize, requested_columns: u32) -> Self {
        let columns = if requested_columns > 0 {
            requested_columns
        } else {
            (frame_count as f64).sqrt().ceil() as u32
        }
        .max(1);
        let rows = (frame_count as u32).div_ceil(columns).max(1);
        Self { columns, rows }
    }

    /// Pixel origin of the cell at zero-based `index`, given the frame size.
    pub fn cell_origin(&self, index: usize, frame_width: u32, frame_height: u32) -> (u32, u32) {
        let column = index as u32 % self.columns;
        let row = index as u32 / self.columns;
        (column * frame_width, row * frame_height)
    }
}

/// A composed sprite sheet, ready to be saved.
///
/// Produced by [`compose`]. Holds the canvas together with the layout and
/// frame geometry it was built from.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    /// The composed canvas.
    pub image: RgbaImage,
    /// The grid layout used.
    pub layout: SheetLayout,
    /// Number of populated cells.
    pub frame_count: usize,
    /// Width of one frame (and of each cell).
    pub frame_width: u32,
    /// Height of one frame (and of each cell).
    pub frame_height: u32,
}

impl SpriteSheet {
    /// Total canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Total canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Persist the sheet to `path`, creating parent directories as needed.
    ///
    /// The image format is inferred from the path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`FramesheetError::IoError`] if the parent directories cannot
    /// be created, or [`FramesheetError::ImageError`] if encoding fails
    /// (including unsupported extensions).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), FramesheetError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.image.save(path)?;
        Ok(())
    }
}

/// Compose the frames of `frames` into a single sprite sheet.
///
/// `requested_columns` forces the grid width; 0 selects the square-ish auto
/// layout (see [`SheetLayout::compute`]). The canvas is allocated fully
/// transparent and each frame's pixels (alpha included) overwrite its cell
/// with no blending.
///
/// Every frame is verified against the first frame's dimensions as it is
/// decoded; a mismatched frame would silently misalign the grid, so it fails
/// loudly instead.
///
/// # Errors
///
/// Returns [`FramesheetError::FrameSizeMismatch`] on a mismatched frame, or
/// [`FramesheetError::ImageError`] if a frame cannot be decoded.
pub fn compose(frames: &FrameSet, requested_columns: u32) -> Result<SpriteSheet, FramesheetError> {
    let (frame_width, frame_height) = frames.frame_dimensions()?;
    let layout = SheetLayout::compute(frames.len(), requested_columns);

    log::debug!(
        "Composing {} frame(s) of {}x{} into a {}x{} grid",
        frames.len(),
        frame_width,
        frame_height,
        layout.columns,
        layout.rows
    );

    let mut canvas = RgbaImage::new(
        frame_width * layout.columns,
        frame_height * layout.rows,
    );

    for (index, frame) in frames.frames().iter().enumerate() {
        let image = image::open(&frame.path)?.to_rgba8();
        let (actual_width, actual_height) = image.dimensions();
        if (actual_width, actual_height) != (frame_width, frame_height) {
            return Err(FramesheetError::FrameSizeMismatch {
                frame: frame.path.clone(),
                expected_width: frame_width,
                expected_height: frame_height,
                actual_width,
                actual_height,
            });
        }

        let (x, y) = layout.cell_origin(index, frame_width, frame_height);
        canvas.copy_from(&image, x, y)?;
    }

    Ok(SpriteSheet {
        image: canvas,
        layout,
        frame_count: frames.len(),
        frame_width,
        frame_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_columns_are_respected() {
        let layout = SheetLayout::compute(3, 2);
        assert_eq!(layout, SheetLayout { columns: 2, rows: 2 });

        let layout = SheetLayout::compute(12, 5);
        assert_eq!(layout, SheetLayout { columns: 5, rows: 3 });
    }

    #[test]
    fn auto_layout_is_square_ish() {
        assert_eq!(SheetLayout::compute(1, 0), SheetLayout { columns: 1, rows: 1 });
        assert_eq!(SheetLayout::compute(9, 0), SheetLayout { columns: 3, rows: 3 });
        assert_eq!(SheetLayout::compute(10, 0), SheetLayout { columns: 4, rows: 3 });
        assert_eq!(SheetLayout::compute(16, 0), SheetLayout { columns: 4, rows: 4 });
        assert_eq!(SheetLayout::compute(17, 0), SheetLayout { columns: 5, rows: 4 });
    }

    #[test]
    fn partial_last_row_is_allowed() {
        let layout = SheetLayout::compute(7, 3);
        assert_eq!(layout.rows, 3, "7 frames over 3 columns need 3 rows");
    }

    #[test]
    fn cell_origins_are_row_major() {
        let layout = SheetLayout { columns: 2, rows: 2 };
        assert_eq!(layout.cell_origin(0, 64, 48), (0, 0));
        assert_eq!(layout.cell_origin(1, 64, 48), (64, 0));
        assert_eq!(layout.cell_origin(2, 64, 48), (0, 48));
    }
}
