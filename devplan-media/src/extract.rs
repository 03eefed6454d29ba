//! Frame extraction with ffmpeg

use std::path::{Path, PathBuf};
use std::sync::Arc;

use devplan_core::{display_command, CommandRunner, MediaConfig, ProcessRunner};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Frame extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Frames sampled per second of video
    pub fps: f64,
    /// Image extension (jpg, png, ...)
    pub format: String,
    /// ffmpeg `-q:v` value, 2-31, lower is better
    pub quality: u8,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            fps: 1.0,
            format: "jpg".to_string(),
            quality: 2,
        }
    }
}

/// What an extraction produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub output_dir: PathBuf,
    /// Number of `frame_*.<format>` files in the output directory afterwards
    pub frame_count: usize,
    /// The ffmpeg command line that was run
    pub command: String,
    pub fps: f64,
}

/// Drives ffmpeg and ffprobe
pub struct FrameExtractor {
    runner: Arc<dyn CommandRunner>,
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FrameExtractor {
    /// Create an extractor running ffmpeg/ffprobe from PATH
    pub fn new() -> Self {
        Self::with_runner(Arc::new(ProcessRunner::new()))
    }

    /// Create an extractor on top of a specific command runner
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }

    /// Use the tool paths from configuration
    pub fn with_config(mut self, config: &MediaConfig) -> Self {
        self.ffmpeg_path = config.ffmpeg_path.clone();
        self.ffprobe_path = config.ffprobe_path.clone();
        self
    }

    pub(crate) fn ffprobe_path(&self) -> &str {
        &self.ffprobe_path
    }

    /// Run a tool, turning a nonzero exit into [`Error::Tool`]
    pub(crate) async fn run_tool(&self, program: &str, args: &[String]) -> Result<String> {
        let output = self.runner.run(program, args).await?;

        if !output.is_success() {
            return Err(Error::Tool {
                command: display_command(program, args),
                stderr: output.stderr,
            });
        }

        Ok(output.stdout)
    }

    /// Extract frames from `video` into `output_dir`
    ///
    /// Frames are written as `frame_0001.<format>`, `frame_0002.<format>`, ...
    /// The output directory is created if needed. Existing frames with the
    /// same pattern are overwritten by ffmpeg and included in the count.
    pub async fn extract(
        &self,
        video: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        options: &ExtractOptions,
    ) -> Result<ExtractionReport> {
        let video = video.as_ref();
        let output_dir = output_dir.as_ref();

        if !video.exists() {
            return Err(Error::NotFound(video.to_path_buf()));
        }

        tokio::fs::create_dir_all(output_dir).await?;

        let pattern = output_dir.join(format!("frame_%04d.{}", options.format));
        let args = vec![
            "-i".to_string(),
            video.display().to_string(),
            "-vf".to_string(),
            format!("fps={}", options.fps),
            "-q:v".to_string(),
            options.quality.to_string(),
            pattern.display().to_string(),
        ];
        let command = display_command(&self.ffmpeg_path, &args);

        debug!(video = %video.display(), fps = options.fps, "Extracting frames");
        self.run_tool(&self.ffmpeg_path, &args).await?;

        let frame_count = count_frames(output_dir, &options.format).await?;
        info!(
            output_dir = %output_dir.display(),
            frame_count,
            "Extracted frames"
        );

        Ok(ExtractionReport {
            output_dir: output_dir.to_path_buf(),
            frame_count,
            command,
            fps: options.fps,
        })
    }

    /// Render a synthetic 1280x720, 30 fps test pattern of `duration_secs`
    /// seconds to `path`, overwriting it
    pub async fn generate_test_video(&self, path: impl AsRef<Path>, duration_secs: u32) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let args = vec![
            "-f".to_string(),
            "lavfi".to_string(),
            "-i".to_string(),
            format!("testsrc=duration={}:size=1280x720:rate=30", duration_secs),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-y".to_string(),
            path.display().to_string(),
        ];

        self.run_tool(&self.ffmpeg_path, &args).await?;
        info!(path = %path.display(), duration_secs, "Generated test video");
        Ok(())
    }
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameExtractor")
            .field("ffmpeg_path", &self.ffmpeg_path)
            .field("ffprobe_path", &self.ffprobe_path)
            .finish_non_exhaustive()
    }
}

/// Count `frame_*.<format>` files in `dir`
pub async fn count_frames(dir: &Path, format: &str) -> Result<usize> {
    let suffix = format!(".{}", format);
    let mut count = 0;

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("frame_") && name.ends_with(&suffix) {
            count += 1;
        }
    }

    Ok(count)
}

/// Frames expected from `duration_secs` of video sampled at `fps`
pub fn expected_frames(duration_secs: f64, fps: f64) -> usize {
    (duration_secs * fps).round().max(0.0) as usize
}

/// Whether `actual` is within `tolerance` frames of `expected`
pub fn within_tolerance(actual: usize, expected: usize, tolerance: usize) -> bool {
    actual.abs_diff(expected) <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use devplan_core::CommandOutput;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Pretends to be ffmpeg: writes `frames` files to the output pattern
    struct FakeFfmpeg {
        frames: usize,
        exit_code: i32,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl FakeFfmpeg {
        fn new(frames: usize, exit_code: i32) -> Arc<Self> {
            Arc::new(Self {
                frames,
                exit_code,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CommandRunner for FakeFfmpeg {
        async fn run(
            &self,
            program: &str,
            args: &[String],
        ) -> devplan_core::Result<CommandOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));

            if self.exit_code != 0 {
                return Ok(CommandOutput::failure(self.exit_code, "Invalid data found"));
            }

            if let Some(pattern) = args.last().filter(|a| a.contains("%04d")) {
                for i in 1..=self.frames {
                    std::fs::write(pattern.replace("%04d", &format!("{:04}", i)), b"")?;
                }
            }

            Ok(CommandOutput::success(""))
        }
    }

    fn fake_video(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("input.mp4");
        std::fs::write(&path, b"not really a video").unwrap();
        path
    }

    #[tokio::test]
    async fn test_extract_builds_command_and_counts_frames() {
        let tmp = TempDir::new().unwrap();
        let video = fake_video(&tmp);
        let out_dir = tmp.path().join("frames").join("1fps");
        let runner = FakeFfmpeg::new(10, 0);
        let extractor = FrameExtractor::with_runner(runner.clone());

        let report = extractor
            .extract(&video, &out_dir, &ExtractOptions::default())
            .await
            .unwrap();

        assert_eq!(report.frame_count, 10);
        assert_eq!(report.output_dir, out_dir);
        assert_eq!(report.fps, 1.0);
        assert!(out_dir.is_dir());

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].0, "ffmpeg");
        let args = &calls[0].1;
        assert_eq!(args[0], "-i");
        assert_eq!(args[2..6], ["-vf", "fps=1", "-q:v", "2"]);
        assert!(args[6].ends_with("frame_%04d.jpg"));
        assert!(report.command.starts_with("ffmpeg -i "));
    }

    #[tokio::test]
    async fn test_extract_counts_only_matching_format() {
        let tmp = TempDir::new().unwrap();
        let video = fake_video(&tmp);
        let out_dir = tmp.path().join("frames");
        std::fs::create_dir_all(&out_dir).unwrap();
        std::fs::write(out_dir.join("frame_0001.jpg"), b"").unwrap();
        std::fs::write(out_dir.join("notes.txt"), b"").unwrap();

        let extractor = FrameExtractor::with_runner(FakeFfmpeg::new(3, 0));
        let options = ExtractOptions {
            fps: 5.0,
            format: "png".to_string(),
            quality: 5,
        };

        let report = extractor.extract(&video, &out_dir, &options).await.unwrap();
        assert_eq!(report.frame_count, 3);
    }

    #[tokio::test]
    async fn test_extract_missing_video() {
        let tmp = TempDir::new().unwrap();
        let runner = FakeFfmpeg::new(0, 0);
        let extractor = FrameExtractor::with_runner(runner.clone());

        let result = extractor
            .extract(tmp.path().join("missing.mp4"), tmp.path(), &ExtractOptions::default())
            .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extract_tool_failure() {
        let tmp = TempDir::new().unwrap();
        let video = fake_video(&tmp);
        let extractor = FrameExtractor::with_runner(FakeFfmpeg::new(0, 1))
            .with_config(&MediaConfig {
                ffmpeg_path: "/opt/ffmpeg".to_string(),
                ffprobe_path: "ffprobe".to_string(),
            });

        let result = extractor
            .extract(&video, tmp.path().join("out"), &ExtractOptions::default())
            .await;

        match result {
            Err(Error::Tool { command, stderr }) => {
                assert!(command.starts_with("/opt/ffmpeg -i"));
                assert_eq!(stderr, "Invalid data found");
            }
            other => panic!("expected tool error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_test_video_args() {
        let tmp = TempDir::new().unwrap();
        let runner = FakeFfmpeg::new(0, 0);
        let extractor = FrameExtractor::with_runner(runner.clone());
        let target = tmp.path().join("data").join("raw").join("test_video.mp4");

        extractor.generate_test_video(&target, 10).await.unwrap();

        assert!(target.parent().unwrap().is_dir());
        let calls = runner.calls.lock().unwrap();
        let args = &calls[0].1;
        assert!(args.contains(&"testsrc=duration=10:size=1280x720:rate=30".to_string()));
        assert!(args.contains(&"-y".to_string()));
    }

    #[tokio::test]
    async fn test_count_frames() {
        let tmp = TempDir::new().unwrap();
        for name in ["frame_0001.png", "frame_0002.png", "frame_0003.jpg", "cover.png"] {
            std::fs::write(tmp.path().join(name), b"").unwrap();
        }

        assert_eq!(count_frames(tmp.path(), "png").await.unwrap(), 2);
        assert_eq!(count_frames(tmp.path(), "jpg").await.unwrap(), 1);

        let missing = tmp.path().join("missing");
        assert!(matches!(
            count_frames(&missing, "jpg").await,
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_expected_frames() {
        assert_eq!(expected_frames(10.0, 1.0), 10);
        assert_eq!(expected_frames(10.0, 5.0), 50);
        assert_eq!(expected_frames(2.5, 1.0), 3);
        assert_eq!(expected_frames(0.0, 30.0), 0);
    }

    #[test]
    fn test_within_tolerance() {
        assert!(within_tolerance(11, 10, 2));
        assert!(within_tolerance(8, 10, 2));
        assert!(!within_tolerance(13, 10, 2));
        assert!(within_tolerance(46, 50, 5));
        assert!(!within_tolerance(44, 50, 5));
    }
}
