// THEORY:
// The `GridSpec` is the geometric plan for slicing an image into a fixed grid of
// cells. It is computed once per stream, since the resolution of a video does not
// change, and every later stage (buffer allocation, binning, reduction) reads from it.
//
// Regular cells are `image / grid` pixels wide and tall. The rightmost column and the
// bottom row absorb the division remainder, so the cells always cover the image
// exactly and every pixel belongs to exactly one cell.

use crate::error::{GridError, Result};

/// Immutable tile geometry for one image size and one grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    image_width: u32,
    image_height: u32,
    grid_cols: u32,
    grid_rows: u32,
    cell_width: u32,
    cell_height: u32,
    width_remainder: u32,
    height_remainder: u32,
}

impl GridSpec {
    /// Plans a `grid_cols` x `grid_rows` grid over an `image_width` x `image_height` image.
    ///
    /// Every cell must be at least one pixel wide and tall, so the grid may not be
    /// empty and may not be larger than the image in either direction.
    pub fn plan(image_width: u32, image_height: u32, grid_cols: u32, grid_rows: u32) -> Result<Self> {
        if grid_cols == 0 || grid_rows == 0 || image_width < grid_cols || image_height < grid_rows {
            return Err(GridError::InvalidGridDimensions {
                image_width,
                image_height,
                grid_cols,
                grid_rows,
            });
        }

        Ok(Self {
            image_width,
            image_height,
            grid_cols,
            grid_rows,
            cell_width: image_width / grid_cols,
            cell_height: image_height / grid_rows,
            width_remainder: image_width % grid_cols,
            height_remainder: image_height % grid_rows,
        })
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn grid_cols(&self) -> u32 {
        self.grid_cols
    }

    pub fn grid_rows(&self) -> u32 {
        self.grid_rows
    }

    /// Width of every cell except those in the last column.
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Height of every cell except those in the last row.
    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    pub fn width_remainder(&self) -> u32 {
        self.width_remainder
    }

    pub fn height_remainder(&self) -> u32 {
        self.height_remainder
    }

    pub fn last_cell_width(&self) -> u32 {
        self.cell_width + self.width_remainder
    }

    pub fn last_cell_height(&self) -> u32 {
        self.cell_height + self.height_remainder
    }

    /// Total number of cells, which is also the length of a fingerprint.
    pub fn cell_count(&self) -> usize {
        self.grid_cols as usize * self.grid_rows as usize
    }

    /// Width of the cells in column `cell_col`.
    #[inline]
    pub fn column_width(&self, cell_col: u32) -> u32 {
        if cell_col + 1 == self.grid_cols {
            self.last_cell_width()
        } else {
            self.cell_width
        }
    }

    /// Height of the cells in row `cell_row`.
    #[inline]
    pub fn row_height(&self, cell_row: u32) -> u32 {
        if cell_row + 1 == self.grid_rows {
            self.last_cell_height()
        } else {
            self.cell_height
        }
    }

    /// First image column covered by cell column `cell_col`.
    #[inline]
    pub fn column_offset(&self, cell_col: u32) -> u32 {
        self.cell_width * cell_col
    }

    /// Number of pixels held by the cell at (`cell_row`, `cell_col`).
    pub fn cell_len(&self, cell_row: u32, cell_col: u32) -> usize {
        self.row_height(cell_row) as usize * self.column_width(cell_col) as usize
    }

    /// Maps image row `y` to its cell row and its row offset inside that cell.
    /// Rows past the last regular band belong to the bottom row of cells.
    #[inline]
    pub fn locate_row(&self, y: u32) -> (u32, u32) {
        let cell_row = (y / self.cell_height).min(self.grid_rows - 1);
        (cell_row, y - cell_row * self.cell_height)
    }
}
