mod source;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use pex_vision::{FingerprintPipeline, PipelineConfig, TimeSeriesWriter};
use source::{FrameSource, ImageSequence};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Fingerprint video keyframes as grids of median intensities")]
struct Args {
    /// Video file (requires the `video` feature) or directory of frame images in file-name order
    #[arg(short, long)]
    input: PathBuf,

    /// CSV file receiving one `timestamp,value0,value1,...` line per keyframe
    #[arg(short, long)]
    output: PathBuf,

    /// Number of grid rows
    #[arg(short, long, default_value_t = 32)]
    rows: u32,

    /// Number of grid columns
    #[arg(short, long, default_value_t = 32)]
    cols: u32,

    /// Frame rate of an image sequence, used to derive its timestamps
    #[arg(long, default_value_t = 25)]
    fps: u32,

    /// Treat every N-th decoded frame as a keyframe
    #[arg(long, default_value_t = 1)]
    keyframe_interval: usize,
}

impl Args {
    fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            bail!("grid must have at least one row and one column (got {}x{})", self.cols, self.rows);
        }
        if self.fps == 0 {
            bail!("frame rate must be positive");
        }
        if self.keyframe_interval == 0 {
            bail!("keyframe interval must be at least 1");
        }
        if !self.input.exists() {
            bail!("input '{}' does not exist", self.input.display());
        }
        if self.input.is_file() && !cfg!(feature = "video") {
            bail!(
                "'{}' is a file; video input needs pex_tester built with the `video` feature",
                self.input.display()
            );
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --- 1. Argument Parsing & Validation ---
    let args = Args::parse();
    args.validate()?;

    let lines = run(&args)?;
    info!("processing complete: {} keyframes saved to {}", lines, args.output.display());
    Ok(())
}

/// Opens the decoder matching the kind of input: a directory or a video file.
fn open_source(args: &Args) -> Result<Box<dyn FrameSource>> {
    if args.input.is_dir() {
        info!("reading frame images from {}", args.input.display());
        return Ok(Box::new(ImageSequence::open(&args.input, args.fps, args.keyframe_interval)?));
    }

    #[cfg(feature = "video")]
    {
        Ok(Box::new(source::VideoFile::open(&args.input, args.keyframe_interval)?))
    }
    #[cfg(not(feature = "video"))]
    {
        bail!("video input '{}' needs the `video` feature", args.input.display())
    }
}

/// Fingerprints the keyframes of `args.input` into `args.output`.
/// Returns the number of lines written.
fn run(args: &Args) -> Result<u64> {
    // --- 2. Decoder Initialization ---
    let mut source = open_source(args)?;

    // --- 3. Pipeline Initialization ---
    // The grid is planned from the stream resolution, which is fixed for its lifetime.
    let (image_width, image_height) = source.dimensions();
    let mut pipeline = FingerprintPipeline::new(PipelineConfig {
        image_width,
        image_height,
        grid_cols: args.cols,
        grid_rows: args.rows,
    })
    .context("could not plan the fingerprint grid")?;

    let mut writer = TimeSeriesWriter::create(&args.output)
        .with_context(|| format!("could not open output file '{}'", args.output.display()))?;

    // --- 4. Main Processing Loop ---
    let mut keyframe = 0u64;
    while let Some(decoded) = source.next_keyframe()? {
        info!("processing keyframe #{} (t = {}s)", keyframe, decoded.timestamp);

        let fingerprint = pipeline
            .process(&decoded.view()?)
            .with_context(|| format!("could not fingerprint keyframe #{keyframe}"))?;
        writer.write_line(decoded.timestamp, &fingerprint)?;
        keyframe += 1;
    }

    let lines = writer.lines_written();
    writer.finish()?;
    Ok(lines)
}
