use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use framesheet::{
    BatchOptions, FfmpegDecoder, FrameSet, ProgressCallback, ProgressInfo, compose,
    extract_frames, run_batch,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framesheet generate --input-dir clips --output-dir spritesheets --columns 8\n  framesheet generate --keep-frames --json\n  framesheet extract clip.mp4 --out frames --ffmpeg bin/ffmpeg\n  framesheet compose frames --out clip_sheet.png --columns 4\n  framesheet completions zsh > _framesheet";

#[derive(Debug, Parser)]
#[command(
    name = "framesheet",
    version,
    about = "Turn video clips into sprite-sheet images",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar where supported.
    #[arg(long)]
    progress: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate one sprite sheet per video in a directory.
    #[command(
        about = "Generate sprite sheets for every video in a directory",
        visible_alias = "gen",
        after_help = "Examples:\n  framesheet generate\n  framesheet generate --input-dir clips --columns 8 --keep-frames\n  framesheet generate --ext mov --sheet-format webp --json"
    )]
    Generate {
        /// Directory containing input videos.
        #[arg(long, default_value = ".")]
        input_dir: PathBuf,

        /// Directory to write sprite sheets (and persisted frames) to.
        #[arg(long, default_value = "spritesheets")]
        output_dir: PathBuf,

        /// Number of columns in each sheet. 0 selects a square-ish grid.
        #[arg(long, default_value_t = 0)]
        columns: u32,

        /// Path to the ffmpeg executable.
        #[arg(long, default_value_os_t = default_decoder_path())]
        ffmpeg: PathBuf,

        /// Keep extracted frames in <output-dir>/<stem>_frames/ instead of
        /// deleting them.
        #[arg(long)]
        keep_frames: bool,

        /// Video extension matched in the input directory.
        #[arg(long, default_value = "mp4")]
        ext: String,

        /// Extension (and encoding) of the output sheets.
        #[arg(long, default_value = "png")]
        sheet_format: String,

        /// Print the run summary as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Extract every frame of one video to a directory.
    #[command(about = "Extract every frame of a video as numbered PNG stills")]
    Extract {
        /// Input video path.
        video: PathBuf,

        /// Output directory for the frame images.
        #[arg(long)]
        out: PathBuf,

        /// Path to the ffmpeg executable.
        #[arg(long, default_value_os_t = default_decoder_path())]
        ffmpeg: PathBuf,
    },

    /// Compose a sprite sheet from an existing directory of frames.
    #[command(about = "Compose already-extracted frames into a sprite sheet")]
    Compose {
        /// Directory containing frame_NNNN.png files.
        frames_dir: PathBuf,

        /// Output image path; the format is inferred from its extension.
        #[arg(long)]
        out: PathBuf,

        /// Number of columns. 0 selects a square-ish grid.
        #[arg(long, default_value_t = 0)]
        columns: u32,
    },

    /// Generate shell completions.
    #[command(about = "Generate shell completions")]
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Default decoder location, matching the bundled-binary convention.
fn default_decoder_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("bin/ffmpeg.exe")
    } else {
        PathBuf::from("bin/ffmpeg")
    }
}

/// Normalize a user-supplied extension: trim whitespace and leading dots,
/// lowercase the rest.
fn normalize_extension(value: &str) -> String {
    value.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Per-video progress output: a bar when `--progress` is set, a plain
/// processing line otherwise.
struct TerminalProgress {
    bar: Option<ProgressBar>,
}

impl ProgressCallback for TerminalProgress {
    fn on_video(&self, info: &ProgressInfo) {
        let name = info
            .video
            .file_name()
            .map_or_else(|| info.video.display().to_string(), |name| {
                name.to_string_lossy().into_owned()
            });

        if let Some(bar) = &self.bar {
            bar.set_length(info.total as u64);
            bar.set_position((info.current - 1) as u64);
            bar.set_message(name);
        } else {
            println!(
                "{} [{}/{}] {}",
                "processing".cyan().bold(),
                info.current,
                info.total,
                name
            );
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input_dir,
            output_dir,
            columns,
            ffmpeg,
            keep_frames,
            ext,
            sheet_format,
            json,
        } => {
            let decoder = FfmpegDecoder::new(&ffmpeg)?;

            let progress_bar = if cli.global.progress {
                let bar = ProgressBar::new(0);
                let style = ProgressStyle::with_template(
                    "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?;
                bar.set_style(style.progress_chars("##-"));
                Some(bar)
            } else {
                None
            };

            let options = BatchOptions::new()
                .with_input_dir(input_dir)
                .with_output_dir(&output_dir)
                .with_columns(columns)
                .with_keep_frames(keep_frames)
                .with_video_extension(normalize_extension(&ext))
                .with_sheet_format(normalize_extension(&sheet_format))
                .with_progress(Arc::new(TerminalProgress {
                    bar: progress_bar.clone(),
                }));

            let summary = run_batch(&decoder, &options)?;

            if let Some(bar) = progress_bar {
                bar.finish_with_message("done");
            }

            if cli.global.verbose {
                for report in &summary.sheets {
                    eprintln!(
                        "wrote {} ({}x{}, {} frame(s), {}x{} grid)",
                        report.sheet.display(),
                        report.sheet_width,
                        report.sheet_height,
                        report.frame_count,
                        report.columns,
                        report.rows,
                    );
                }
            }

            if json {
                let payload = json!({
                    "sheets": summary.sheets.iter().map(|report| json!({
                        "video": report.video.display().to_string(),
                        "sheet": report.sheet.display().to_string(),
                        "frames": report.frame_count,
                        "columns": report.columns,
                        "rows": report.rows,
                        "width": report.sheet_width,
                        "height": report.sheet_height,
                        "frames_dir": report.frames_dir.as_ref().map(|dir| dir.display().to_string()),
                    })).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{} {}",
                    "success:".green().bold(),
                    format!(
                        "Wrote {} sheet(s) to {}",
                        summary.sheets.len(),
                        output_dir.display()
                    )
                    .green()
                );
            }
        }
        Commands::Extract { video, out, ffmpeg } => {
            let decoder = FfmpegDecoder::new(&ffmpeg)?;
            extract_frames(&decoder, &video, &out)?;
            let frames = FrameSet::scan(&out)?;

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Extracted {} frame(s) to {}", frames.len(), out.display()).green()
            );
        }
        Commands::Compose {
            frames_dir,
            out,
            columns,
        } => {
            let frames = FrameSet::scan(&frames_dir)?;
            let sheet = compose(&frames, columns)?;
            sheet.save(&out)?;

            if cli.global.verbose {
                eprintln!(
                    "{} frame(s) of {}x{} on a {}x{} grid",
                    sheet.frame_count,
                    sheet.frame_width,
                    sheet.frame_height,
                    sheet.layout.columns,
                    sheet.layout.rows,
                );
            }

            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Composed {} frame(s) into {} ({}x{})",
                    sheet.frame_count,
                    out.display(),
                    sheet.width(),
                    sheet.height()
                )
                .green()
            );
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framesheet", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
