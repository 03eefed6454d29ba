//! Video metadata via ffprobe

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, FrameExtractor, Result};

/// Placeholder for fields ffprobe didn't report
pub const UNKNOWN: &str = "unknown";

/// Basic properties of the first video stream
///
/// Values are kept as ffprobe prints them (e.g. fps is "30/1").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub width: String,
    pub height: String,
    pub fps: String,
    pub duration: String,
}

impl VideoInfo {
    /// Duration in seconds, if ffprobe reported a number
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.parse().ok()
    }
}

/// Parse `key=value` lines from `ffprobe -of default=noprint_wrappers=1`
pub fn parse_probe_output(stdout: &str) -> VideoInfo {
    let fields: HashMap<&str, &str> = stdout
        .lines()
        .filter_map(|line| line.split_once('='))
        .collect();

    let get = |key: &str| fields.get(key).copied().unwrap_or(UNKNOWN).to_string();

    VideoInfo {
        width: get("width"),
        height: get("height"),
        fps: get("r_frame_rate"),
        duration: get("duration"),
    }
}

impl FrameExtractor {
    /// Probe width, height, frame rate and duration of `video`
    pub async fn probe(&self, video: impl AsRef<Path>) -> Result<VideoInfo> {
        let video = video.as_ref();

        if !video.exists() {
            return Err(Error::NotFound(video.to_path_buf()));
        }

        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            "-show_entries".to_string(),
            "stream=width,height,r_frame_rate,duration".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1".to_string(),
            video.display().to_string(),
        ];

        let stdout = self.run_tool(self.ffprobe_path(), &args).await?;
        let info = parse_probe_output(&stdout);
        debug!(video = %video.display(), ?info, "Probed video");
        Ok(info)
    }
}
