//! Devplan Media - video frame sampling through ffmpeg
//!
//! All decoding is done by the `ffmpeg` and `ffprobe` binaries; this crate
//! only builds their command lines and reads back the results.

mod error;
mod extract;
mod probe;

pub use error::{Error, Result};
pub use extract::{
    count_frames, expected_frames, within_tolerance, ExtractOptions, ExtractionReport,
    FrameExtractor,
};
pub use probe::{parse_probe_output, VideoInfo, UNKNOWN};
