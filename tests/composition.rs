//! Sheet composition integration tests.
//!
//! Frames are synthesized with the `image` crate; no decoder is involved.

use std::path::Path;

use framesheet::{FrameSet, compose, frame_file_name};
use image::{Rgba, RgbaImage};

fn write_frame(directory: &Path, index: u64, width: u32, height: u32, color: Rgba<u8>) {
    let frame = RgbaImage::from_pixel(width, height, color);
    frame
        .save(directory.join(frame_file_name(index)))
        .expect("Failed to write synthetic frame");
}

#[test]
fn three_frames_two_columns_end_to_end() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let red = Rgba([255, 0, 0, 255]);
    let green = Rgba([0, 255, 0, 255]);
    let blue = Rgba([0, 0, 255, 255]);
    write_frame(scratch.path(), 1, 64, 64, red);
    write_frame(scratch.path(), 2, 64, 64, green);
    write_frame(scratch.path(), 3, 64, 64, blue);

    let frames = FrameSet::scan(scratch.path()).expect("Scan should find frames");
    let sheet = compose(&frames, 2).expect("Composition should succeed");

    assert_eq!((sheet.width(), sheet.height()), (128, 128));
    assert_eq!(sheet.layout.columns, 2);
    assert_eq!(sheet.layout.rows, 2);

    assert_eq!(*sheet.image.get_pixel(0, 0), red, "frame 1 belongs at (0,0)");
    assert_eq!(*sheet.image.get_pixel(64, 0), green, "frame 2 belongs at (64,0)");
    assert_eq!(*sheet.image.get_pixel(0, 64), blue, "frame 3 belongs at (0,64)");

    // The unused trailing cell stays fully transparent.
    assert_eq!(sheet.image.get_pixel(64, 64)[3], 0);
    assert_eq!(sheet.image.get_pixel(127, 127)[3], 0);
}

#[test]
fn auto_layout_matches_ceil_sqrt() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    for index in 1..=10 {
        write_frame(scratch.path(), index, 8, 8, Rgba([0, 0, 0, 255]));
    }

    let frames = FrameSet::scan(scratch.path()).expect("Scan should find frames");
    let sheet = compose(&frames, 0).expect("Composition should succeed");

    // 10 frames auto-lay out as 4 columns x 3 rows.
    assert_eq!(sheet.layout.columns, 4);
    assert_eq!(sheet.layout.rows, 3);
    assert_eq!((sheet.width(), sheet.height()), (32, 24));
    assert_eq!(sheet.frame_count, 10);
}

#[test]
fn frames_are_placed_in_numeric_order() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    // Lexical sort of unpadded indices would place 10..12 before 2.
    for index in 1..=12 {
        write_frame(
            scratch.path(),
            index,
            4,
            4,
            Rgba([index as u8, 0, 0, 255]),
        );
    }

    let frames = FrameSet::scan(scratch.path()).expect("Scan should find frames");
    let sheet = compose(&frames, 4).expect("Composition should succeed");

    for position in 0..12u32 {
        let x = (position % 4) * 4;
        let y = (position / 4) * 4;
        assert_eq!(
            sheet.image.get_pixel(x, y)[0],
            (position + 1) as u8,
            "cell {position} should hold frame {}",
            position + 1,
        );
    }
}

#[test]
fn composition_is_idempotent() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    for index in 1..=5 {
        write_frame(
            scratch.path(),
            index,
            16,
            16,
            Rgba([index as u8 * 40, 128, 0, 255]),
        );
    }

    let frames = FrameSet::scan(scratch.path()).expect("Scan should find frames");
    let first = compose(&frames, 2).expect("First composition should succeed");
    let second = compose(&frames, 2).expect("Second composition should succeed");

    assert_eq!(first.width(), second.width());
    assert_eq!(first.height(), second.height());
    assert_eq!(
        first.image.as_raw(),
        second.image.as_raw(),
        "Recomposing an unmodified frame set must produce identical pixels",
    );
}

#[test]
fn empty_directory_is_an_error() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");

    let result = FrameSet::scan(scratch.path());
    assert!(result.is_err(), "Expected an error for an empty scratch directory");

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("No frames found"),
        "Error message should mention missing frames: {error_message}",
    );
}

#[test]
fn non_frame_files_are_ignored() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    write_frame(scratch.path(), 1, 8, 8, Rgba([0, 0, 0, 255]));
    write_frame(scratch.path(), 2, 8, 8, Rgba([0, 0, 0, 255]));
    std::fs::write(scratch.path().join("notes.txt"), b"not a frame")
        .expect("Failed to write stray file");
    std::fs::write(scratch.path().join("thumb_0001.png"), b"wrong prefix")
        .expect("Failed to write stray file");

    let frames = FrameSet::scan(scratch.path()).expect("Scan should find frames");
    assert_eq!(frames.len(), 2);
}

#[test]
fn mismatched_frame_dimensions_fail_loudly() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    write_frame(scratch.path(), 1, 64, 64, Rgba([255, 0, 0, 255]));
    write_frame(scratch.path(), 2, 64, 64, Rgba([0, 255, 0, 255]));
    write_frame(scratch.path(), 3, 32, 64, Rgba([0, 0, 255, 255]));

    let frames = FrameSet::scan(scratch.path()).expect("Scan should find frames");
    let result = compose(&frames, 2);
    assert!(result.is_err(), "A mismatched frame must not compose silently");

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("expected 64x64"),
        "Error message should carry the expected dimensions: {error_message}",
    );
    assert!(
        error_message.contains("frame_0003"),
        "Error message should name the offending frame: {error_message}",
    );
}

#[test]
fn saving_creates_parent_directories() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    write_frame(scratch.path(), 1, 8, 8, Rgba([1, 2, 3, 255]));

    let frames = FrameSet::scan(scratch.path()).expect("Scan should find frames");
    let sheet = compose(&frames, 0).expect("Composition should succeed");

    let output_root = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = output_root.path().join("nested").join("deep").join("sheet.png");
    sheet.save(&output_path).expect("Save should create parents");
    assert!(output_path.is_file());
}

#[test]
fn unsupported_output_extension_is_an_error() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    write_frame(scratch.path(), 1, 8, 8, Rgba([1, 2, 3, 255]));

    let frames = FrameSet::scan(scratch.path()).expect("Scan should find frames");
    let sheet = compose(&frames, 0).expect("Composition should succeed");

    let output_root = tempfile::tempdir().expect("Failed to create temp dir");
    let result = sheet.save(output_root.path().join("sheet.notaformat"));
    assert!(result.is_err(), "Unknown extensions must surface an error");
}
