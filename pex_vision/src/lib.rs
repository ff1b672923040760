// THEORY:
// This file is the entry point for the `pex_vision` library crate. It exposes the
// `FingerprintPipeline`, which reduces every grayscale keyframe of a video to a small
// grid of median intensities, and the `TimeSeriesWriter`, which records those
// fingerprints next to their timestamps.
//
// Decoding video and choosing which frames to fingerprint are left to the caller
// (see the `pex_tester` binary). The `core_modules` hold the individual stages:
// grid planning, tile buffers, binning and median reduction.

pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod sink;

pub use core_modules::frame::{GrayFrame, TimeBase};
pub use core_modules::grid_spec::GridSpec;
pub use error::{GridError, Result};
pub use pipeline::{Fingerprint, FingerprintPipeline, PipelineConfig};
pub use sink::TimeSeriesWriter;
