//! Tests against real ffmpeg/ffprobe binaries
//!
//! Run with `cargo test -p devplan-media -- --ignored`.

use devplan_media::{
    expected_frames, within_tolerance, Error, ExtractOptions, FrameExtractor, UNKNOWN,
};
use tempfile::TempDir;

const DURATION_SECS: u32 = 10;

async fn test_video(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("test_video.mp4");
    FrameExtractor::new()
        .generate_test_video(&path, DURATION_SECS)
        .await
        .expect("ffmpeg should render the test pattern");
    path
}

#[tokio::test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
async fn probe_reports_stream_properties() {
    let tmp = TempDir::new().unwrap();
    let video = test_video(&tmp).await;

    let info = FrameExtractor::new().probe(&video).await.unwrap();

    assert_eq!(info.width, "1280");
    assert_eq!(info.height, "720");
    assert_ne!(info.duration, UNKNOWN);
    let duration = info.duration_secs().unwrap();
    assert!((duration - DURATION_SECS as f64).abs() < 0.5);
}

#[tokio::test]
async fn probe_missing_file_is_not_found() {
    let result = FrameExtractor::new().probe("/nonexistent/video.mp4").await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
async fn extract_one_fps() {
    let tmp = TempDir::new().unwrap();
    let video = test_video(&tmp).await;

    let report = FrameExtractor::new()
        .extract(&video, tmp.path().join("frames_1fps"), &ExtractOptions::default())
        .await
        .unwrap();

    let expected = expected_frames(DURATION_SECS as f64, 1.0);
    assert!(
        within_tolerance(report.frame_count, expected, 2),
        "expected ~{} frames, got {}",
        expected,
        report.frame_count
    );
}

#[tokio::test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
async fn extract_five_fps() {
    let tmp = TempDir::new().unwrap();
    let video = test_video(&tmp).await;
    let options = ExtractOptions {
        fps: 5.0,
        ..Default::default()
    };

    let report = FrameExtractor::new()
        .extract(&video, tmp.path().join("frames_5fps"), &options)
        .await
        .unwrap();

    let expected = expected_frames(DURATION_SECS as f64, 5.0);
    assert!(
        within_tolerance(report.frame_count, expected, 5),
        "expected ~{} frames, got {}",
        expected,
        report.frame_count
    );
}
