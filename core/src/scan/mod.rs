//! QR capture pipeline: camera ownership, per-frame decoding and venue
//! validation, with a typed-URL fallback.

mod camera;
mod decoder;
mod pipeline;

#[cfg(test)]
mod pipeline_tests;

pub use camera::{CameraError, CameraStream, PERMISSION_DENIED};
pub use decoder::{QrDecoder, RgbaFrame, RqrrDecoder};
pub use pipeline::{CameraRequest, ManualCheck, ScanPhase, ScanPipeline, ScanStep};
