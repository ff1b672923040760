// THEORY:
// A frame source is the decoder side of the tester. It hands the main loop one
// grayscale keyframe at a time, already stamped with its presentation time in seconds,
// and reports the stream resolution up front so the grid can be planned before the
// first frame is decoded.
//
// Two sources exist:
// 1.  **Video** (`video` feature): an OpenCV `VideoCapture` decodes the container.
//     Timestamps come from the decoder's position of each frame.
// 2.  **Image sequence**: a directory of still images, one per frame, in file-name
//     order. Such a sequence carries no timing, so timestamps are derived from a
//     frame rate given on the command line.
//
// Both keep every N-th decoded frame as a keyframe. The fingerprint engine itself has
// no notion of which frames matter.

use anyhow::{Context, Result, bail};
use log::warn;
use pex_vision::{GrayFrame, TimeBase};
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "pgm", "webp"];

/// One decoded keyframe, owning its 8-bit luma pixels.
pub struct DecodedFrame {
    /// Presentation time in seconds.
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
    /// Bytes between the starts of two rows.
    pub stride: usize,
    pub pixels: Vec<u8>,
}

impl DecodedFrame {
    pub fn view(&self) -> pex_vision::Result<GrayFrame<'_>> {
        GrayFrame::with_stride(self.width, self.height, self.stride, &self.pixels)
    }
}

pub trait FrameSource {
    /// Width and height shared by every frame of the stream.
    fn dimensions(&self) -> (u32, u32);

    /// Decodes up to the next keyframe; `None` once the stream is exhausted.
    fn next_keyframe(&mut self) -> Result<Option<DecodedFrame>>;
}

/// Still images in a directory, treated as consecutive frames.
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next_index: usize,
    keyframe_interval: usize,
    time_base: TimeBase,
    dimensions: (u32, u32),
}

impl ImageSequence {
    pub fn open(dir: &Path, fps: u32, keyframe_interval: usize) -> Result<Self> {
        let paths = collect_frame_paths(dir)?;
        let Some(first) = paths.first() else {
            bail!("no frame images found in '{}'", dir.display());
        };
        let dimensions = image::image_dimensions(first)
            .with_context(|| format!("could not read frame '{}'", first.display()))?;

        Ok(Self {
            paths,
            next_index: 0,
            keyframe_interval,
            time_base: TimeBase::new(1, fps as i32),
            dimensions,
        })
    }
}

impl FrameSource for ImageSequence {
    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn next_keyframe(&mut self) -> Result<Option<DecodedFrame>> {
        let index = self.next_index;
        let Some(path) = self.paths.get(index) else {
            return Ok(None);
        };
        self.next_index += self.keyframe_interval;

        let image = image::open(path)
            .with_context(|| format!("could not decode frame '{}'", path.display()))?
            .to_luma8();
        let (width, height) = image.dimensions();

        Ok(Some(DecodedFrame {
            timestamp: self.time_base.seconds(index as i64),
            width,
            height,
            stride: width as usize,
            pixels: image.into_raw(),
        }))
    }
}

/// Lists the image files of `dir`, sorted by file name.
pub fn collect_frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("could not read '{}'", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_frame = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if is_frame {
            paths.push(path);
        } else {
            warn!("skipping non-image file {}", path.display());
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(feature = "video")]
pub use video::VideoFile;

#[cfg(feature = "video")]
mod video {
    use super::{DecodedFrame, FrameSource};
    use anyhow::{Result, bail};
    use opencv::{core::Mat, imgproc, prelude::*, videoio};
    use pex_vision::TimeBase;
    use std::path::Path;

    /// A video container decoded through OpenCV.
    pub struct VideoFile {
        cap: videoio::VideoCapture,
        frame: Mat,
        gray: Mat,
        next_index: usize,
        keyframe_interval: usize,
        /// The decoder reports positions in milliseconds; they are kept at microsecond precision.
        time_base: TimeBase,
        dimensions: (u32, u32),
    }

    impl VideoFile {
        pub fn open(path: &Path, keyframe_interval: usize) -> Result<Self> {
            let Some(path_str) = path.to_str() else {
                bail!("video path '{}' is not valid UTF-8", path.display());
            };
            let cap = videoio::VideoCapture::from_file(path_str, videoio::CAP_ANY)?;
            if !cap.is_opened()? {
                bail!("could not open video file '{}'", path.display());
            }

            let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
            let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
            log::info!(
                "opened {} ({}x{} @ {:.2} fps)",
                path.display(),
                width,
                height,
                cap.get(videoio::CAP_PROP_FPS)?
            );

            Ok(Self {
                cap,
                frame: Mat::default(),
                gray: Mat::default(),
                next_index: 0,
                keyframe_interval,
                time_base: TimeBase::new(1, 1_000_000),
                dimensions: (width, height),
            })
        }
    }

    impl FrameSource for VideoFile {
        fn dimensions(&self) -> (u32, u32) {
            self.dimensions
        }

        fn next_keyframe(&mut self) -> Result<Option<DecodedFrame>> {
            loop {
                if !self.cap.read(&mut self.frame)? || self.frame.empty() {
                    return Ok(None);
                }
                let index = self.next_index;
                self.next_index += 1;
                if index % self.keyframe_interval != 0 {
                    continue;
                }

                let position_ms = self.cap.get(videoio::CAP_PROP_POS_MSEC)?;
                imgproc::cvt_color(&self.frame, &mut self.gray, imgproc::COLOR_BGR2GRAY, 0)?;

                return Ok(Some(DecodedFrame {
                    timestamp: self.time_base.seconds((position_ms * 1000.0).round() as i64),
                    width: self.gray.cols() as u32,
                    height: self.gray.rows() as u32,
                    stride: self.gray.step1(0)?,
                    pixels: self.gray.data_bytes()?.to_vec(),
                }));
            }
        }
    }
}
