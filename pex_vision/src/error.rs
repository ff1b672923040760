// THEORY:
// Every failure the engine can report lives in one enum so that callers (the
// tester binary, or any other orchestrator) can match on the kind of problem
// without parsing strings.
//
// 1.  **Configuration errors** (`InvalidGridDimensions`) are raised once, when a
//     pipeline is initialized, and mean the stream cannot be fingerprinted at all.
// 2.  **Per-frame errors** (`FrameDimensionMismatch`, `InvalidFrameLayout`) reject a
//     single frame before any pixel is copied.
// 3.  **Orchestration defects** (`IndexOutOfRange`) can only come from a bug in the
//     code that drives the tile buffers. They are still returned, never panicked.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    /// The requested grid cannot give every cell at least one pixel in each dimension.
    #[error(
        "invalid grid {grid_cols}x{grid_rows} for a {image_width}x{image_height} image"
    )]
    InvalidGridDimensions {
        image_width: u32,
        image_height: u32,
        grid_cols: u32,
        grid_rows: u32,
    },

    /// A frame's size disagrees with the size the pipeline was initialized with.
    #[error("frame size {actual:?} does not match the pipeline's {expected:?}")]
    FrameDimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// A cell coordinate outside the grid was requested.
    #[error("cell ({cell_row}, {cell_col}) is outside the {grid_cols}x{grid_rows} grid")]
    IndexOutOfRange {
        cell_row: u32,
        cell_col: u32,
        grid_rows: u32,
        grid_cols: u32,
    },

    /// The pixel buffer cannot hold a frame with the given geometry.
    #[error(
        "buffer of {len} bytes cannot hold a {width}x{height} frame with stride {stride}"
    )]
    InvalidFrameLayout {
        width: u32,
        height: u32,
        stride: usize,
        len: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
