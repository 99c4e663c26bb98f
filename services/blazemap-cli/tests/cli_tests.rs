//! End-to-end tests for the blazemap binary.

use std::path::Path;
use std::process::Command;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

fn blazemap() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_blazemap"));
    cmd.env("BLAZEMAP_LOG_LEVEL", "warn");
    cmd
}

fn sample_scene() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/scenes/sample.yaml"))
}

#[test]
fn test_render_sample_scene_indexed() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("sample.png");

    let status = blazemap()
        .arg("--scene")
        .arg(sample_scene())
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let png = std::fs::read(&output).unwrap();
    assert_eq!(&png[..8], &PNG_SIGNATURE);
    // IHDR: width, height, bit depth, color type 3
    assert_eq!(&png[16..24], &[0, 0, 0, 200, 0, 0, 0, 200]);
    assert_eq!(png[25], 3);
}

#[test]
fn test_render_points_from_flags_rgba() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("flags.png");

    let status = blazemap()
        .args(["--width", "40", "--height", "30", "--format", "rgba"])
        .args(["-p", "10,10", "-p", "20,15,2"])
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let png = std::fs::read(&output).unwrap();
    assert_eq!(&png[16..24], &[0, 0, 0, 40, 0, 0, 0, 30]);
    assert_eq!(png[25], 6);
}

#[test]
fn test_invalid_radius_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.png");

    let result = blazemap()
        .arg("--radius=-1")
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("radius"));
    assert!(!output.exists());
}

#[test]
fn test_capacity_overflow_fails_unless_truncating() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cap.png");

    let rejected = blazemap()
        .arg("--scene")
        .arg(sample_scene())
        .args(["--capacity", "2"])
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(!rejected.success());

    let truncated = blazemap()
        .arg("--scene")
        .arg(sample_scene())
        .args(["--capacity", "2", "--truncate"])
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(truncated.success());
    assert!(output.exists());
}
