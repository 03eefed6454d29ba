//! Frames commands - sample video frames with ffmpeg

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use devplan_core::Config;
use devplan_media::{
    expected_frames, within_tolerance, ExtractOptions, ExtractionReport, FrameExtractor,
};

const RULE: &str = "============================================================";

/// Frame extraction commands
#[derive(Args, Debug)]
pub struct FramesArgs {
    #[command(subcommand)]
    pub command: FramesCommand,
}

#[derive(Subcommand, Debug)]
pub enum FramesCommand {
    /// Extract frames from a video
    Extract {
        /// Input video
        video: PathBuf,

        /// Directory to write frame_NNNN.<format> files to
        output_dir: PathBuf,

        /// Frames per second to sample
        #[arg(long, default_value = "1.0")]
        fps: f64,

        /// Image format (file extension)
        #[arg(long, default_value = "jpg")]
        format: String,

        /// JPEG quality, 2-31 (lower is better)
        #[arg(long, default_value = "2", value_parser = clap::value_parser!(u8).range(2..=31))]
        quality: u8,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolution, frame rate and duration of a video
    Probe {
        /// Input video
        video: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a test video and check extraction at 1 and 5 fps
    Selftest {
        /// Where the generated test video is kept
        #[arg(long, default_value = "data/raw")]
        data_dir: PathBuf,

        /// Where extracted frames are written
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Length of the generated video in seconds
        #[arg(long, default_value = "10")]
        duration: u32,
    },
}

impl FramesArgs {
    /// Execute the frames command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let extractor = FrameExtractor::new().with_config(&config.media);

        if verbose {
            tracing::info!(?extractor, "Using media tools");
        }

        match &self.command {
            FramesCommand::Extract {
                video,
                output_dir,
                fps,
                format,
                quality,
                json,
            } => {
                let options = ExtractOptions {
                    fps: *fps,
                    format: format.clone(),
                    quality: *quality,
                };
                let report = extractor.extract(video, output_dir, &options).await?;

                if *json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print_report(&report);
                }
                Ok(())
            }
            FramesCommand::Probe { video, json } => {
                let info = extractor.probe(video).await?;

                if *json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    println!("Resolution: {}x{}", info.width, info.height);
                    println!("FPS: {}", info.fps);
                    println!("Duration: {} seconds", info.duration);
                }
                Ok(())
            }
            FramesCommand::Selftest {
                data_dir,
                output_dir,
                duration,
            } => {
                if selftest(&extractor, data_dir, output_dir, *duration).await {
                    Ok(())
                } else {
                    anyhow::bail!("Frame extraction self-test failed")
                }
            }
        }
    }
}

fn print_report(report: &ExtractionReport) {
    println!("✓ Extracted {} frames", report.frame_count);
    println!("✓ Output directory: {}", report.output_dir.display());
    println!("✓ Command: {}", report.command);
}

/// Extract at `fps` and compare the frame count with what the duration predicts
///
/// Returns the frame count, or `None` if ffmpeg failed. An unexpected count
/// is only a warning.
async fn check_extraction(
    extractor: &FrameExtractor,
    video: &Path,
    output_dir: PathBuf,
    duration: u32,
    fps: f64,
    tolerance: usize,
) -> Option<usize> {
    let options = ExtractOptions {
        fps,
        ..Default::default()
    };

    match extractor.extract(video, output_dir, &options).await {
        Ok(report) => {
            print_report(&report);
            let expected = expected_frames(duration as f64, fps);
            if within_tolerance(report.frame_count, expected, tolerance) {
                println!("✓ Frame count is as expected (~{} frames)", expected);
            } else {
                println!(
                    "⚠ Warning: Expected ~{} frames, got {}",
                    expected, report.frame_count
                );
            }
            Some(report.frame_count)
        }
        Err(e) => {
            println!("✗ Failed: {}", e);
            None
        }
    }
}

/// Generate a test video, probe it and extract at 1 and 5 fps
async fn selftest(
    extractor: &FrameExtractor,
    data_dir: &Path,
    output_dir: &Path,
    duration: u32,
) -> bool {
    let video = data_dir.join("test_video.mp4");

    println!("{}", RULE);
    println!("FFmpeg Frame Extraction Test");
    println!("{}", RULE);

    if !video.exists() {
        println!("Generating test video: {}", video.display());
        match extractor.generate_test_video(&video, duration).await {
            Ok(()) => println!("✓ Test video generated: {}", video.display()),
            Err(e) => {
                println!("✗ Failed to generate test video: {}", e);
                return false;
            }
        }
    }

    println!();
    println!("Test video: {}", video.display());

    println!();
    println!("--- Video Information ---");
    match extractor.probe(&video).await {
        Ok(info) => {
            println!("✓ Resolution: {}x{}", info.width, info.height);
            println!("✓ FPS: {}", info.fps);
            println!("✓ Duration: {} seconds", info.duration);
        }
        Err(e) => {
            println!("✗ Failed to get video info: {}", e);
            return false;
        }
    }

    println!();
    println!("--- Test 1: Extract frames at 1 fps ---");
    let Some(count_1fps) = check_extraction(
        extractor,
        &video,
        output_dir.join("frames_1fps"),
        duration,
        1.0,
        2,
    )
    .await
    else {
        return false;
    };

    println!();
    println!("--- Test 2: Extract frames at 5 fps ---");
    let Some(count_5fps) = check_extraction(
        extractor,
        &video,
        output_dir.join("frames_5fps"),
        duration,
        5.0,
        5,
    )
    .await
    else {
        return false;
    };

    println!();
    println!("{}", RULE);
    println!("TEST SUMMARY");
    println!("{}", RULE);
    println!("✓ Video generation: SUCCESS");
    println!("✓ Video info extraction: SUCCESS");
    println!("✓ Frame extraction (1fps): SUCCESS - {} frames", count_1fps);
    println!("✓ Frame extraction (5fps): SUCCESS - {} frames", count_5fps);
    println!();
    println!("✓ All tests passed!");
    println!("{}", RULE);

    true
}
