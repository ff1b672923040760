// THEORY:
// The binner is the data transformation step between a raw frame and the grid. It
// scans the frame once, top to bottom, and scatters each image row into the cells
// of the band it belongs to: the row is cut into one run per cell column and each
// run is appended to that cell's buffer at the cell-local row offset.
//
// Because rows are visited in order and each run lands at `width * row_offset`, a
// cell buffer is filled front to back and is complete once the last row of its band
// has been scanned. After the final image row every byte of every buffer has been
// written, so buffers can be reused across frames without being cleared.

use crate::core_modules::frame::GrayFrame;
use crate::core_modules::grid_spec::GridSpec;
use crate::core_modules::tile_buffers::TileBuffers;
use crate::error::{GridError, Result};

/// Copies every pixel of `frame` into the tile buffer of the cell that owns it.
pub fn bin(frame: &GrayFrame<'_>, spec: &GridSpec, buffers: &mut TileBuffers) -> Result<()> {
    let expected = (spec.image_width(), spec.image_height());
    let actual = (frame.width(), frame.height());
    if expected != actual {
        return Err(GridError::FrameDimensionMismatch { expected, actual });
    }

    match frame.as_slice() {
        // Packed rows: walk the slice directly instead of recomputing each row start.
        Some(pixels) => {
            for (y, row) in pixels.chunks_exact(frame.width() as usize).enumerate() {
                scatter_row(row, y as u32, spec, buffers)?;
            }
        }
        None => {
            for y in 0..frame.height() {
                scatter_row(frame.row(y), y, spec, buffers)?;
            }
        }
    }

    Ok(())
}

/// Splits image row `y` into per-cell runs and stores each run in its cell buffer.
fn scatter_row(row: &[u8], y: u32, spec: &GridSpec, buffers: &mut TileBuffers) -> Result<()> {
    let (cell_row, row_offset) = spec.locate_row(y);

    for cell_col in 0..spec.grid_cols() {
        let run = spec.column_width(cell_col) as usize;
        let src = spec.column_offset(cell_col) as usize;
        let dst = run * row_offset as usize;

        let cell = buffers.cell_buffer(cell_row, cell_col)?;
        cell[dst..dst + run].copy_from_slice(&row[src..src + run]);
    }

    Ok(())
}
