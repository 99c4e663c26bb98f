//! Tests for scene-level deserialization of shared types.

use blaze_common::{
    ColorGradient, HeatmapOptions, OverflowPolicy, Point, PointTermination, Rgba,
};

// ============================================================================
// Point parsing
// ============================================================================

#[test]
fn test_point_forms() {
    let json = r#"[[10, 20], [30, 40, 2.5], {"x": 1, "y": 2}, {"x": 3, "y": 4, "weight": 0.5}]"#;
    let points: Vec<Point> = serde_json::from_str(json).unwrap();

    assert_eq!(points[0], Point::new(10.0, 20.0, 1.0));
    assert_eq!(points[1], Point::new(30.0, 40.0, 2.5));
    assert_eq!(points[2], Point::new(1.0, 2.0, 1.0));
    assert_eq!(points[3], Point::new(3.0, 4.0, 0.5));
}

// ============================================================================
// Gradient parsing
// ============================================================================

#[test]
fn test_gradient_mixed_stop_colors() {
    let yaml = r##"
- position: 0.0
  color: 0
- position: 0.5
  color: "#00FF0080"
- position: 1.0
  color: 4294967295
"##;
    let gradient: ColorGradient = serde_yaml::from_str(yaml).unwrap();
    let stops = gradient.validate().unwrap();

    assert_eq!(stops.len(), 3);
    assert_eq!(stops[1].1, Rgba::new(0, 255, 0, 128));
    assert_eq!(stops[2].1, Rgba::new(255, 255, 255, 255));
}

#[test]
fn test_gradient_bad_hex_fails_validation() {
    let json = r##"[{"position": 0, "color": "#nothex"}, {"position": 1, "color": 0}]"##;
    let gradient: ColorGradient = serde_json::from_str(json).unwrap();
    assert!(gradient.validate().unwrap_err().is_configuration());
}

// ============================================================================
// Options parsing
// ============================================================================

#[test]
fn test_partial_options_fill_defaults() {
    let yaml = r#"
width: 200
height: 100
overflow: truncate
termination: sentinel
"#;
    let options: HeatmapOptions = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(options.width, 200);
    assert_eq!(options.height, 100);
    assert_eq!(options.radius, 25.0);
    assert_eq!(options.overflow, OverflowPolicy::Truncate);
    assert_eq!(options.termination, PointTermination::Sentinel);
    assert_eq!(options.colors, ColorGradient::default());
}
