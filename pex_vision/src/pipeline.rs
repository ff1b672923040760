// THEORY:
// The `pipeline` module is the top-level API of the engine. A `FingerprintPipeline`
// is built once per video stream, as soon as the frame resolution is known, and then
// turns each frame it is handed into a `Fingerprint`: the median intensity of every
// grid cell, in row-major order.
//
// The pipeline owns the grid plan and the tile buffers. Buffers are reused in place for
// every frame, which is why `process` takes `&mut self`: one pipeline serves one
// sequential stream, and callers that want to work on several frames at once build one
// pipeline per worker from the same `PipelineConfig`.

use crate::core_modules::binner;
use crate::core_modules::frame::GrayFrame;
use crate::core_modules::grid_spec::GridSpec;
use crate::core_modules::median::median;
use crate::core_modules::tile_buffers::TileBuffers;
use crate::error::Result;
use log::{debug, trace};

/// Configuration for a `FingerprintPipeline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub image_width: u32,
    pub image_height: u32,
    pub grid_cols: u32,
    pub grid_rows: u32,
}

/// Median intensities of one frame's grid cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    grid_cols: u32,
    grid_rows: u32,
    values: Vec<u8>,
}

impl Fingerprint {
    pub fn grid_cols(&self) -> u32 {
        self.grid_cols
    }

    pub fn grid_rows(&self) -> u32 {
        self.grid_rows
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The median of the cell at (`cell_row`, `cell_col`), if it is inside the grid.
    pub fn cell(&self, cell_row: u32, cell_col: u32) -> Option<u8> {
        if cell_row >= self.grid_rows || cell_col >= self.grid_cols {
            return None;
        }
        Some(self.values[cell_row as usize * self.grid_cols as usize + cell_col as usize])
    }
}

/// Turns a stream of same-sized grayscale frames into fingerprints.
pub struct FingerprintPipeline {
    spec: GridSpec,
    buffers: TileBuffers,
    frames_processed: u64,
}

impl FingerprintPipeline {
    /// Plans the grid and allocates the tile buffers for the stream.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let spec = GridSpec::plan(
            config.image_width,
            config.image_height,
            config.grid_cols,
            config.grid_rows,
        )?;
        let buffers = TileBuffers::allocate(&spec);

        debug!(
            "fingerprint pipeline: {}x{} image, {}x{} grid, cells {}x{} (last {}x{})",
            spec.image_width(),
            spec.image_height(),
            spec.grid_cols(),
            spec.grid_rows(),
            spec.cell_width(),
            spec.cell_height(),
            spec.last_cell_width(),
            spec.last_cell_height(),
        );

        Ok(Self {
            spec,
            buffers,
            frames_processed: 0,
        })
    }

    pub fn initialize(image_width: u32, image_height: u32, grid_cols: u32, grid_rows: u32) -> Result<Self> {
        Self::new(PipelineConfig {
            image_width,
            image_height,
            grid_cols,
            grid_rows,
        })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Computes the fingerprint of `frame`.
    ///
    /// Fails with `FrameDimensionMismatch` when the frame is not the size the
    /// pipeline was built for; no buffer is touched in that case.
    pub fn process(&mut self, frame: &GrayFrame<'_>) -> Result<Fingerprint> {
        binner::bin(frame, &self.spec, &mut self.buffers)?;

        let values: Vec<u8> = self.buffers.cells_mut().map(median).collect();
        self.frames_processed += 1;
        trace!("frame {} fingerprinted into {} cells", self.frames_processed, values.len());

        Ok(Fingerprint {
            grid_cols: self.spec.grid_cols(),
            grid_rows: self.spec.grid_rows(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    fn uniform(width: u32, height: u32, value: u8) -> Vec<u8> {
        vec![value; (width * height) as usize]
    }

    #[test]
    fn uniform_frame_fingerprints_to_its_value() {
        let mut pipeline = FingerprintPipeline::initialize(100, 100, 32, 32).unwrap();
        let data = uniform(100, 100, 10);
        let print = pipeline.process(&GrayFrame::new(100, 100, &data).unwrap()).unwrap();

        assert_eq!(print.len(), 32 * 32);
        assert!(print.values().iter().all(|&v| v == 10));
    }

    #[test]
    fn fingerprint_is_row_major() {
        // 4x4 image split into 2x2 quadrants with distinct values.
        #[rustfmt::skip]
        let data: [u8; 16] = [
            1, 1, 2, 2,
            1, 1, 2, 2,
            3, 3, 4, 4,
            3, 3, 4, 4,
        ];
        let mut pipeline = FingerprintPipeline::initialize(4, 4, 2, 2).unwrap();
        let print = pipeline.process(&GrayFrame::new(4, 4, &data).unwrap()).unwrap();

        assert_eq!(print.values(), &[1, 2, 3, 4]);
        assert_eq!(print.cell(1, 0), Some(3));
        assert_eq!(print.cell(2, 0), None);
    }

    #[test]
    fn repeated_frames_give_identical_fingerprints() {
        let data: Vec<u8> = (0..64u32 * 48).map(|i| (i * 7 % 256) as u8).collect();
        let frame = GrayFrame::new(64, 48, &data).unwrap();
        let mut pipeline = FingerprintPipeline::initialize(64, 48, 5, 3).unwrap();

        let first = pipeline.process(&frame).unwrap();
        let second = pipeline.process(&frame).unwrap();

        assert_eq!(first, second);
        assert_eq!(pipeline.frames_processed(), 2);
    }

    #[test]
    fn previous_frame_does_not_leak_into_next() {
        let mut pipeline = FingerprintPipeline::initialize(9, 7, 4, 3).unwrap();
        let bright = uniform(9, 7, 200);
        let dark = uniform(9, 7, 3);

        pipeline.process(&GrayFrame::new(9, 7, &bright).unwrap()).unwrap();
        let print = pipeline.process(&GrayFrame::new(9, 7, &dark).unwrap()).unwrap();

        assert!(print.values().iter().all(|&v| v == 3));
    }

    #[test]
    fn grid_wider_than_image_is_rejected() {
        let err = FingerprintPipeline::initialize(10, 10, 20, 1).err().unwrap();
        assert!(matches!(err, GridError::InvalidGridDimensions { grid_cols: 20, .. }));
    }

    #[test]
    fn wrong_frame_size_is_rejected() {
        let mut pipeline = FingerprintPipeline::initialize(16, 16, 4, 4).unwrap();
        let data = uniform(16, 8, 0);

        let err = pipeline.process(&GrayFrame::new(16, 8, &data).unwrap()).unwrap_err();
        assert!(matches!(err, GridError::FrameDimensionMismatch { .. }));
        assert_eq!(pipeline.frames_processed(), 0);
    }
}
