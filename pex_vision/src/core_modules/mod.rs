pub mod binner;
pub mod frame;
pub mod grid_spec;
pub mod median;
pub mod tile_buffers;
